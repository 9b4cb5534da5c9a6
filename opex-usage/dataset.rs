use opex_common::truncate_with_ending;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::{NodeMetrics, NodesMap, PodMetrics, RgbColor, UsageKind, compute_load, heat_map_color};

#[cfg(test)]
#[path = "./dataset.tests.rs"]
mod dataset_tests;

/// Slice ID of the synthetic slice that shows unused node capacity.
pub const UNUSED_SLICE_ID: usize = 9999;

/// Label of the synthetic slice that shows unused node capacity.
pub const UNUSED_SLICE_LABEL: &str = "unused";

/// Maximum number of characters in a slice label.
pub const MAX_LABEL_CHARS: usize = 25;

const LABEL_ENDING: &str = "...";

/// Possible errors from building node datasets.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// Usage kind is neither CPU nor memory.
    #[error("unknown load type: {0}")]
    UnknownUsageKind(String),
}

/// Reason why a node was left out of the datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningReason {
    /// Node does not report usage for the selected resource.
    NoMetric,

    /// Node reports zero usage for the selected resource.
    ZeroUsage,

    /// Node does not report a positive capacity for the selected resource.
    NoCapacity,
}

/// Non-fatal issue found for a single node while building datasets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataWarning {
    pub node: String,
    pub name: String,
    pub kind: UsageKind,
    pub reason: WarningReason,
}

impl Display for DataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            WarningReason::NoMetric => write!(f, "No {} metric on node: {}", self.kind.usage_field(), self.name),
            WarningReason::ZeroUsage => write!(
                f,
                "ignoring node {} with {} equals to zero",
                self.name,
                self.kind.usage_field()
            ),
            WarningReason::NoCapacity => write!(
                f,
                "ignoring node {} without {}",
                self.name,
                self.kind.capacity_field()
            ),
        }
    }
}

/// One segment of a node chart: a single pod or the unused capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    #[serde(rename = "name")]
    pub label: String,

    #[serde(rename = "id")]
    pub slice_id: usize,

    pub quantity: f64,
    pub percentage: f64,
}

impl ChartSlice {
    /// Returns `true` if this is the synthetic unused capacity slice.
    pub fn is_unused(&self) -> bool {
        self.slice_id == UNUSED_SLICE_ID
    }
}

/// Chart series of a single node with colors aligned to its slices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeDataset {
    #[serde(rename = "chartData")]
    pub slices: Vec<ChartSlice>,

    #[serde(rename = "colorSchema")]
    pub colors: Vec<RgbColor>,
}

/// Datasets for all nodes that could be charted, with warnings for the skipped ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDatasets {
    pub kind: UsageKind,
    pub datasets: BTreeMap<String, NodeDataset>,
    pub warnings: Vec<DataWarning>,
}

impl NodeDatasets {
    /// Returns dataset for the specified node key.
    pub fn get(&self, node: &str) -> Option<&NodeDataset> {
        self.datasets.get(node)
    }

    /// Returns `true` if no node could be charted.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Builds per-node chart datasets for the usage kind given by name.\
/// **Note** that an unknown usage kind fails the whole build before any node is processed.
pub fn build(nodes: &NodesMap, usage_kind: &str) -> Result<NodeDatasets, DatasetError> {
    let kind = usage_kind.parse::<UsageKind>()?;
    Ok(build_for_kind(nodes, kind))
}

/// Builds per-node chart datasets for the specified usage kind.
pub fn build_for_kind(nodes: &NodesMap, kind: UsageKind) -> NodeDatasets {
    let mut datasets = BTreeMap::new();
    let mut warnings = Vec::new();

    for (key, node) in nodes {
        match build_node_dataset(node, kind) {
            Ok(dataset) => {
                datasets.insert(key.clone(), dataset);
            },
            Err(reason) => warnings.push(DataWarning {
                node: key.clone(),
                name: node.name.clone(),
                kind,
                reason,
            }),
        }
    }

    tracing::debug!(
        "Built {} node datasets for {} usage, {} nodes skipped",
        datasets.len(),
        kind,
        warnings.len()
    );

    NodeDatasets {
        kind,
        datasets,
        warnings,
    }
}

fn build_node_dataset(node: &NodeMetrics, kind: UsageKind) -> Result<NodeDataset, WarningReason> {
    let used = match node.usage(kind) {
        None => return Err(WarningReason::NoMetric),
        Some(used) if used == 0.0 => return Err(WarningReason::ZeroUsage),
        Some(used) => used,
    };
    let capacity = match node.capacity(kind) {
        Some(capacity) if capacity > 0.0 => capacity,
        _ => return Err(WarningReason::NoCapacity),
    };

    let mut pods = node.pods_running.iter().collect::<Vec<&PodMetrics>>();
    pods.sort_by(|a, b| a.usage(kind).partial_cmp(&b.usage(kind)).unwrap_or(Ordering::Equal));

    let mut dataset = NodeDataset {
        slices: Vec::with_capacity(pods.len() + 1),
        colors: Vec::with_capacity(pods.len() + 1),
    };

    let mut sum_load = 0.0;
    for (slice_id, pod) in pods.into_iter().enumerate() {
        let pod_used = pod.usage(kind);
        let pod_load = compute_load(pod_used, capacity);
        sum_load += pod_load;

        // zero pods keep their position, so slice IDs may have gaps
        if pod_used > 0.0 {
            dataset.slices.push(ChartSlice {
                label: truncate_with_ending(&pod.name, MAX_LABEL_CHARS, LABEL_ENDING),
                slice_id,
                quantity: pod_used,
                percentage: pod_load,
            });
            dataset.colors.push(heat_map_color(compute_load(pod_used, used)));
        }
    }

    dataset.slices.push(ChartSlice {
        label: UNUSED_SLICE_LABEL.to_owned(),
        slice_id: UNUSED_SLICE_ID,
        quantity: capacity - capacity * sum_load / 100.0,
        percentage: 100.0 - sum_load,
    });
    dataset.colors.push(heat_map_color(0.0));

    Ok(dataset)
}
