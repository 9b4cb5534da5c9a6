pub use self::dataset::{
    ChartSlice, DataWarning, DatasetError, MAX_LABEL_CHARS, NodeDataset, NodeDatasets, UNUSED_SLICE_ID, UNUSED_SLICE_LABEL,
    WarningReason, build, build_for_kind,
};
pub use self::kind::UsageKind;
pub use self::load::{HEAT_MAP_STOPS, RgbColor, compute_load, heat_map_color};
pub use self::metrics::{NodeMetrics, NodesMap, PodMetrics};
pub use self::summary::{NodeListEntry, NodeSummary, node_list};

mod dataset;
mod kind;
mod load;
mod metrics;
mod summary;
