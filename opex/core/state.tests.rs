use opex_client::TransportError;
use opex_usage::{NodeMetrics, PodMetrics};

use super::*;

fn series(generation: u64, file: DataFile, value: i64) -> RefreshEvent {
    RefreshEvent::Completed(Box::new(RefreshResult {
        generation,
        file,
        outcome: Ok(RefreshPayload::Series(serde_json::json!([{ "usage": value }]))),
    }))
}

fn failure(generation: u64, file: DataFile) -> RefreshEvent {
    RefreshEvent::Completed(Box::new(RefreshResult {
        generation,
        file,
        outcome: Err(TransportError::Status {
            status: 404,
            text: "Not Found".to_owned(),
        }),
    }))
}

fn sample_nodes() -> NodesMap {
    let worker = NodeMetrics {
        id: "w-uid".to_owned(),
        name: "worker".to_owned(),
        cpu_usage: Some(40.0),
        cpu_capacity: Some(100.0),
        pods_running: vec![PodMetrics {
            name: "api".to_owned(),
            cpu_usage: 40.0,
            mem_usage: 0.0,
        }],
        ..NodeMetrics::default()
    };
    let idle = NodeMetrics {
        id: "i-uid".to_owned(),
        name: "idle".to_owned(),
        cpu_usage: Some(0.0),
        cpu_capacity: Some(100.0),
        ..NodeMetrics::default()
    };

    [("worker".to_owned(), worker), ("idle".to_owned(), idle)].into_iter().collect()
}

fn nodes(generation: u64, usage_kind: &str) -> RefreshEvent {
    let nodes = sample_nodes();
    let datasets = opex_usage::build(&nodes, usage_kind);
    RefreshEvent::Completed(Box::new(RefreshResult {
        generation,
        file: DataFile::Nodes,
        outcome: Ok(RefreshPayload::Nodes { nodes, datasets }),
    }))
}

#[test]
fn cycle_start_clears_banner_test() {
    let mut state = DashboardState::default();

    assert!(state.apply(RefreshEvent::CycleStarted(1)));
    assert!(state.apply(failure(1, DataFile::CpuTrends)));
    assert_eq!(Some("error 404 (Not Found)"), state.banner.as_deref());

    assert!(state.apply(RefreshEvent::CycleStarted(2)));
    assert_eq!(None, state.banner);
    assert!(!state.apply(RefreshEvent::CycleStarted(1)));
    assert_eq!(2, state.generation);
}

#[test]
fn stale_completion_is_discarded_test() {
    let mut state = DashboardState::default();
    state.apply(RefreshEvent::CycleStarted(1));
    state.apply(RefreshEvent::CycleStarted(2));

    assert!(state.apply(series(2, DataFile::CpuDaily, 20)));
    assert!(!state.apply(series(1, DataFile::CpuDaily, 10)));

    let chart = &state.charts[&DataFile::CpuDaily];
    assert_eq!(2, chart.generation);
    assert_eq!(20, chart.data[0]["usage"]);
    assert_eq!("Daily CPU Usage", chart.title);
}

#[test]
fn late_completion_fills_empty_target_test() {
    let mut state = DashboardState::default();
    state.apply(RefreshEvent::CycleStarted(1));
    state.apply(RefreshEvent::CycleStarted(2));

    assert!(state.apply(series(1, DataFile::MemoryTrends, 10)));
    assert_eq!(Some(1), state.shown_generation(DataFile::MemoryTrends));

    assert!(!state.apply(failure(1, DataFile::CpuTrends)));
    assert_eq!(None, state.banner);
}

#[test]
fn nodes_completion_test() {
    let mut state = DashboardState::default();
    state.apply(RefreshEvent::CycleStarted(1));

    assert!(state.apply(nodes(1, "cpu")));

    let datasets = state.nodes.datasets.as_ref().unwrap();
    assert_eq!(2, datasets.datasets["worker"].slices.len());
    assert!(datasets.get("idle").is_none());
    assert_eq!(
        Some("ignoring node idle with cpuUsage equals to zero"),
        state.banner.as_deref()
    );
    assert_eq!(2, state.nodes.list.len());
    assert_eq!(Some(40.0), state.nodes.summaries["worker"].cpu_usage);
}

#[test]
fn unknown_usage_kind_clears_datasets_test() {
    let mut state = DashboardState::default();
    state.apply(RefreshEvent::CycleStarted(1));
    state.apply(nodes(1, "cpu"));
    state.apply(RefreshEvent::CycleStarted(2));

    assert!(state.apply(nodes(2, "gpu")));

    assert!(state.nodes.datasets.is_none());
    assert_eq!(2, state.nodes.generation);
    assert_eq!(Some("unknown load type: gpu"), state.banner.as_deref());
}

#[test]
fn cycle_complete_test() {
    let mut state = DashboardState::default();
    assert!(!state.is_cycle_complete());

    state.apply(RefreshEvent::CycleStarted(1));
    for file in DataFile::ALL {
        assert!(!state.is_cycle_complete());
        if file == DataFile::Nodes {
            state.apply(nodes(1, "cpu"));
        } else {
            state.apply(series(1, file, 1));
        }
    }

    assert!(state.is_cycle_complete());
}

#[test]
fn serialize_state_test() {
    let mut state = DashboardState::default();
    state.apply(RefreshEvent::CycleStarted(1));
    state.apply(series(1, DataFile::CpuMonthly, 5));
    state.apply(nodes(1, "cpu"));

    let json = serde_json::to_value(&state).unwrap();

    assert_eq!(1, json["generation"]);
    assert_eq!("Monthly CPU Usage", json["charts"]["cpu_monthly"]["title"]);
    assert_eq!("usage ratio (%)", json["charts"]["cpu_monthly"]["y_label"]);
    assert_eq!("api", json["nodes"]["datasets"]["datasets"]["worker"]["chartData"][0]["name"]);
    assert!(json.get("received").is_none());
}
