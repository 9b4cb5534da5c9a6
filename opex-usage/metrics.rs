use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::UsageKind;

/// Nodes metrics keyed by node identifier, as published in `nodes.json`.\
/// **Note** that nodes are always visited in key order, not in the order they appear in the document.
/// Datasets, summaries and warnings follow that order, so the last warning belongs to the greatest key.
pub type NodesMap = BTreeMap<String, NodeMetrics>;

/// Resource usage of a single node together with the pods running on it.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_runtime: Option<String>,

    pub cpu_usage: Option<f64>,
    pub cpu_capacity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_allocatable: Option<f64>,

    pub mem_usage: Option<f64>,
    pub mem_capacity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_allocatable: Option<f64>,

    #[serde(default)]
    pub pods_running: Vec<PodMetrics>,
}

impl NodeMetrics {
    /// Returns node usage for the specified resource kind.
    pub fn usage(&self, kind: UsageKind) -> Option<f64> {
        match kind {
            UsageKind::Cpu => self.cpu_usage,
            UsageKind::Memory => self.mem_usage,
        }
    }

    /// Returns node capacity for the specified resource kind.
    pub fn capacity(&self, kind: UsageKind) -> Option<f64> {
        match kind {
            UsageKind::Cpu => self.cpu_capacity,
            UsageKind::Memory => self.mem_capacity,
        }
    }
}

/// Resource usage of a single pod.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodMetrics {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub cpu_usage: f64,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub mem_usage: f64,
}

impl PodMetrics {
    /// Returns pod usage for the specified resource kind.
    pub fn usage(&self, kind: UsageKind) -> f64 {
        match kind {
            UsageKind::Cpu => self.cpu_usage,
            UsageKind::Memory => self.mem_usage,
        }
    }
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}
