use serde::Serialize;

use crate::{NodeMetrics, NodesMap, compute_load};

#[cfg(test)]
#[path = "./summary.tests.rs"]
mod summary_tests;

/// Entry of the nodes list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeListEntry {
    pub id: String,
    pub name: String,
}

/// Returns all nodes as a list of IDs and display names, in the nodes map order.
pub fn node_list(nodes: &NodesMap) -> Vec<NodeListEntry> {
    nodes
        .values()
        .map(|node| NodeListEntry {
            id: node.id.clone(),
            name: node.name.clone(),
        })
        .collect()
}

/// Details shown for a node, with allocatable and usage values as percentages of node capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub host: String,
    pub uid: String,
    pub container_runtime: Option<String>,
    pub state: Option<String>,
    pub cpu_capacity: Option<f64>,
    pub cpu_allocatable: Option<f64>,
    pub cpu_usage: Option<f64>,
    pub mem_capacity: Option<f64>,
    pub mem_allocatable: Option<f64>,
    pub mem_usage: Option<f64>,
    pub pods_running: usize,
}

impl From<&NodeMetrics> for NodeSummary {
    fn from(node: &NodeMetrics) -> Self {
        Self {
            host: node.name.clone(),
            uid: node.id.clone(),
            container_runtime: node.container_runtime.clone(),
            state: node.state.clone(),
            cpu_capacity: node.cpu_capacity,
            cpu_allocatable: percentage_of(node.cpu_allocatable, node.cpu_capacity),
            cpu_usage: percentage_of(node.cpu_usage, node.cpu_capacity),
            mem_capacity: node.mem_capacity,
            mem_allocatable: percentage_of(node.mem_allocatable, node.mem_capacity),
            mem_usage: percentage_of(node.mem_usage, node.mem_capacity),
            pods_running: node.pods_running.len(),
        }
    }
}

fn percentage_of(value: Option<f64>, capacity: Option<f64>) -> Option<f64> {
    match (value, capacity) {
        (Some(value), Some(capacity)) if capacity > 0.0 => Some(compute_load(value, capacity)),
        _ => None,
    }
}
