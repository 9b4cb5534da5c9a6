use opex_client::{DataFile, RefreshEvent, RefreshPayload, RefreshResult};
use opex_usage::{DataWarning, NodeDatasets, NodeListEntry, NodeSummary, NodesMap, node_list};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(test)]
#[path = "./state.tests.rs"]
mod state_tests;

/// Trend or aggregate chart data.
#[derive(Debug, Serialize)]
pub struct ChartState {
    pub title: &'static str,
    pub y_label: Option<&'static str>,
    pub generation: u64,
    pub data: serde_json::Value,
}

/// Node usage charts data.
#[derive(Debug, Default, Serialize)]
pub struct NodesState {
    pub generation: u64,
    pub list: Vec<NodeListEntry>,
    pub summaries: BTreeMap<String, NodeSummary>,
    pub datasets: Option<NodeDatasets>,
}

/// Everything the dashboard shows, updated target by target as fetches complete.\
/// **Note** that a completion older than the data a target already shows is discarded.
#[derive(Debug, Default, Serialize)]
pub struct DashboardState {
    pub generation: u64,
    pub banner: Option<String>,
    pub charts: BTreeMap<DataFile, ChartState>,
    pub nodes: NodesState,

    #[serde(skip)]
    received: BTreeSet<DataFile>,
}

impl DashboardState {
    /// Applies refresher event to the state and returns `true` if the state changed.
    pub fn apply(&mut self, event: RefreshEvent) -> bool {
        match event {
            RefreshEvent::CycleStarted(generation) => self.start_cycle(generation),
            RefreshEvent::Completed(result) => self.complete(*result),
        }
    }

    /// Returns `true` if all data files of the current cycle were received.
    pub fn is_cycle_complete(&self) -> bool {
        self.generation > 0 && self.received.len() == DataFile::ALL.len()
    }

    /// Returns generation of the data currently shown for the specified file.
    pub fn shown_generation(&self, file: DataFile) -> Option<u64> {
        if file == DataFile::Nodes {
            (self.nodes.generation > 0).then_some(self.nodes.generation)
        } else {
            self.charts.get(&file).map(|c| c.generation)
        }
    }

    fn start_cycle(&mut self, generation: u64) -> bool {
        if generation <= self.generation {
            return false;
        }

        self.generation = generation;
        self.banner = None;
        self.received.clear();

        true
    }

    fn complete(&mut self, result: RefreshResult) -> bool {
        if result.generation == self.generation {
            self.received.insert(result.file);
        }

        if self.shown_generation(result.file).is_some_and(|g| g > result.generation) {
            tracing::debug!(
                "Discarding {} from cycle {}, cycle {} is already shown",
                result.file,
                result.generation,
                self.shown_generation(result.file).unwrap_or_default()
            );
            return false;
        }

        match result.outcome {
            Ok(RefreshPayload::Series(data)) => {
                self.charts.insert(
                    result.file,
                    ChartState {
                        title: result.file.title(),
                        y_label: result.file.y_label(),
                        generation: result.generation,
                        data,
                    },
                );
            },
            Ok(RefreshPayload::Nodes { nodes, datasets }) => {
                self.update_nodes(result.generation, &nodes);
                match datasets {
                    Ok(datasets) => {
                        self.show_warnings(result.generation, &datasets.warnings);
                        self.nodes.datasets = Some(datasets);
                    },
                    Err(error) => {
                        tracing::error!("Cannot build node datasets: {error}");
                        self.nodes.datasets = None;
                        self.show_banner(result.generation, error.to_string());
                    },
                }
            },
            Err(error) => {
                self.show_banner(result.generation, error.to_string());
                return result.generation == self.generation;
            },
        }

        true
    }

    fn update_nodes(&mut self, generation: u64, nodes: &NodesMap) {
        self.nodes.generation = generation;
        self.nodes.list = node_list(nodes);
        self.nodes.summaries = nodes
            .iter()
            .map(|(key, node)| (key.clone(), NodeSummary::from(node)))
            .collect();
    }

    fn show_warnings(&mut self, generation: u64, warnings: &[DataWarning]) {
        for warning in warnings {
            tracing::warn!("{warning}");
        }

        if let Some(last) = warnings.last() {
            self.show_banner(generation, last.to_string());
        }
    }

    fn show_banner(&mut self, generation: u64, message: String) {
        if generation == self.generation {
            self.banner = Some(message);
        }
    }
}
