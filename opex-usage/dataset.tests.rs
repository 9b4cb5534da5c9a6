use rstest::rstest;

use super::*;

fn pod(name: &str, cpu_usage: f64, mem_usage: f64) -> PodMetrics {
    PodMetrics {
        name: name.to_owned(),
        cpu_usage,
        mem_usage,
    }
}

fn node(name: &str, cpu: (Option<f64>, Option<f64>), pods: Vec<PodMetrics>) -> NodeMetrics {
    NodeMetrics {
        id: format!("{name}-uid"),
        name: name.to_owned(),
        cpu_usage: cpu.0,
        cpu_capacity: cpu.1,
        mem_usage: Some(2048.0),
        mem_capacity: Some(8192.0),
        pods_running: pods,
        ..NodeMetrics::default()
    }
}

fn nodes(list: Vec<NodeMetrics>) -> NodesMap {
    list.into_iter().map(|n| (n.name.clone(), n)).collect()
}

#[test]
fn build_single_node_test() {
    let nodes = nodes(vec![node(
        "N1",
        (Some(40.0), Some(100.0)),
        vec![pod("P2", 30.0, 0.0), pod("P1", 10.0, 0.0)],
    )]);

    let result = build(&nodes, "cpu").unwrap();
    let dataset = result.get("N1").unwrap();

    assert!(result.warnings.is_empty());
    assert_eq!(
        vec![
            ChartSlice {
                label: "P1".to_owned(),
                slice_id: 0,
                quantity: 10.0,
                percentage: 10.0,
            },
            ChartSlice {
                label: "P2".to_owned(),
                slice_id: 1,
                quantity: 30.0,
                percentage: 30.0,
            },
            ChartSlice {
                label: UNUSED_SLICE_LABEL.to_owned(),
                slice_id: UNUSED_SLICE_ID,
                quantity: 60.0,
                percentage: 60.0,
            },
        ],
        dataset.slices
    );
    assert_eq!(
        vec![heat_map_color(25.0), heat_map_color(75.0), heat_map_color(0.0)],
        dataset.colors
    );
}

#[test]
fn build_sorts_pods_ascending_test() {
    let pods = vec![
        pod("d", 4.0, 1.0),
        pod("a", 1.0, 4.0),
        pod("c", 3.0, 2.0),
        pod("b", 2.0, 3.0),
    ];
    let mut node = node("worker", (Some(10.0), Some(20.0)), pods);
    node.mem_usage = Some(10.0);
    node.mem_capacity = Some(20.0);
    let nodes = nodes(vec![node]);

    let labels = |kind| {
        build_for_kind(&nodes, kind).datasets["worker"]
            .slices
            .iter()
            .filter(|s| !s.is_unused())
            .map(|s| s.label.clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(vec!["a", "b", "c", "d"], labels(UsageKind::Cpu));
    assert_eq!(vec!["d", "c", "b", "a"], labels(UsageKind::Memory));
}

#[test]
fn build_keeps_ties_in_input_order_test() {
    let nodes = nodes(vec![node(
        "worker",
        (Some(10.0), Some(20.0)),
        vec![pod("second", 5.0, 0.0), pod("first", 5.0, 0.0), pod("small", 1.0, 0.0)],
    )]);

    let result = build_for_kind(&nodes, UsageKind::Cpu);
    let slices = &result.datasets["worker"].slices;

    assert_eq!(vec!["small", "second", "first", "unused"], slices.iter().map(|s| s.label.as_str()).collect::<Vec<_>>());
    assert_eq!(vec![0, 1, 2, UNUSED_SLICE_ID], slices.iter().map(|s| s.slice_id).collect::<Vec<_>>());
}

#[test]
fn build_drops_zero_pods_but_keeps_their_ids_test() {
    let nodes = nodes(vec![node(
        "worker",
        (Some(10.0), Some(10.0)),
        vec![pod("b", 5.0, 0.0), pod("idle", 0.0, 0.0), pod("c", 5.0, 0.0)],
    )]);

    let result = build_for_kind(&nodes, UsageKind::Cpu);
    let dataset = &result.datasets["worker"];

    assert_eq!(vec![1, 2, UNUSED_SLICE_ID], dataset.slices.iter().map(|s| s.slice_id).collect::<Vec<_>>());
    assert_eq!(dataset.slices.len(), dataset.colors.len());

    let unused = dataset.slices.last().unwrap();
    assert_eq!(0.0, unused.percentage);
    assert_eq!(0.0, unused.quantity);
}

#[test]
fn build_does_not_clamp_unused_slice_test() {
    let nodes = nodes(vec![node(
        "worker",
        (Some(3.0), Some(3.0)),
        vec![pod("a", 1.0, 0.0), pod("b", 1.0, 0.0), pod("c", 1.0, 0.0)],
    )]);

    let result = build_for_kind(&nodes, UsageKind::Cpu);
    let dataset = &result.datasets["worker"];
    let unused = dataset.slices.last().unwrap();

    assert!(unused.percentage < 0.0);
    assert!((unused.percentage + 0.02).abs() < 1e-9);
    assert!(unused.quantity < 0.0);
    assert_eq!(heat_map_color(0.0), *dataset.colors.last().unwrap());
}

#[test]
fn build_node_without_pods_test() {
    let nodes = nodes(vec![node("empty", (Some(1.0), Some(4.0)), Vec::new())]);

    let result = build_for_kind(&nodes, UsageKind::Cpu);
    let dataset = &result.datasets["empty"];

    assert_eq!(1, dataset.slices.len());
    assert_eq!(100.0, dataset.slices[0].percentage);
    assert_eq!(4.0, dataset.slices[0].quantity);
    assert_eq!(vec![heat_map_color(0.0)], dataset.colors);
}

#[rstest]
#[case(None, Some(10.0), WarningReason::NoMetric)]
#[case(Some(0.0), Some(10.0), WarningReason::ZeroUsage)]
#[case(Some(1.0), None, WarningReason::NoCapacity)]
#[case(Some(1.0), Some(0.0), WarningReason::NoCapacity)]
fn build_skips_node_test(#[case] usage: Option<f64>, #[case] capacity: Option<f64>, #[case] reason: WarningReason) {
    let nodes = nodes(vec![
        node("bad", (usage, capacity), vec![pod("a", 1.0, 1.0)]),
        node("good", (Some(1.0), Some(10.0)), vec![pod("a", 1.0, 1.0)]),
    ]);

    let result = build(&nodes, "CPU").unwrap();

    assert!(result.get("bad").is_none());
    assert!(result.get("good").is_some());
    assert_eq!(
        vec![DataWarning {
            node: "bad".to_owned(),
            name: "bad".to_owned(),
            kind: UsageKind::Cpu,
            reason,
        }],
        result.warnings
    );
}

#[test]
fn build_unknown_kind_test() {
    let nodes = nodes(vec![node("good", (Some(1.0), Some(10.0)), Vec::new())]);

    assert_eq!(
        Err(DatasetError::UnknownUsageKind("gpu".to_owned())),
        build(&nodes, "gpu")
    );
}

#[test]
fn build_truncates_labels_test() {
    let nodes = nodes(vec![node(
        "worker",
        (Some(1.0), Some(10.0)),
        vec![pod("kube-controller-manager-control-plane", 1.0, 0.0)],
    )]);

    let result = build_for_kind(&nodes, UsageKind::Cpu);

    assert_eq!("kube-controller-manage...", result.datasets["worker"].slices[0].label);
}

#[test]
fn build_from_json_test() {
    let json = r#"{
        "node-b": {
            "id": "b-uid", "name": "node-b",
            "cpuUsage": 0.5, "cpuCapacity": 2, "memUsage": 0, "memCapacity": 4096,
            "podsRunning": [ { "name": "api", "cpuUsage": 0.5, "memUsage": null } ]
        },
        "node-a": {
            "id": "a-uid", "name": "node-a",
            "cpuCapacity": 4, "memUsage": 1024, "memCapacity": 4096
        }
    }"#;
    let nodes = serde_json::from_str::<NodesMap>(json).unwrap();

    let cpu = build(&nodes, "cpu").unwrap();
    assert_eq!(vec!["node-b"], cpu.datasets.keys().collect::<Vec<_>>());
    assert_eq!(WarningReason::NoMetric, cpu.warnings[0].reason);
    assert_eq!("No cpuUsage metric on node: node-a", cpu.warnings[0].to_string());
    assert_eq!(25.0, cpu.datasets["node-b"].slices[0].percentage);

    let memory = build(&nodes, "memory").unwrap();
    assert_eq!(vec!["node-a"], memory.datasets.keys().collect::<Vec<_>>());
    assert_eq!("ignoring node node-b with memUsage equals to zero", memory.warnings[0].to_string());
    assert_eq!(1, memory.datasets["node-a"].slices.len());
}

#[test]
fn build_reports_warnings_in_key_order_test() {
    let json = r#"{
        "node-c": { "id": "c-uid", "name": "node-c", "cpuCapacity": 2 },
        "node-a": { "id": "a-uid", "name": "node-a", "cpuCapacity": 2 },
        "node-b": { "id": "b-uid", "name": "node-b", "cpuUsage": 0, "cpuCapacity": 2 }
    }"#;
    let nodes = serde_json::from_str::<NodesMap>(json).unwrap();

    let result = build(&nodes, "cpu").unwrap();

    assert!(result.is_empty());
    assert_eq!(
        vec![
            ("node-a", WarningReason::NoMetric),
            ("node-b", WarningReason::ZeroUsage),
            ("node-c", WarningReason::NoMetric),
        ],
        result
            .warnings
            .iter()
            .map(|w| (w.node.as_str(), w.reason))
            .collect::<Vec<_>>()
    );
}

#[test]
fn serialize_dataset_test() {
    let nodes = nodes(vec![node("n", (Some(1.0), Some(2.0)), vec![pod("p", 1.0, 0.0)])]);

    let json = serde_json::to_value(build_for_kind(&nodes, UsageKind::Cpu)).unwrap();

    assert_eq!("cpu", json["kind"]);
    assert_eq!("p", json["datasets"]["n"]["chartData"][0]["name"]);
    assert_eq!(9999, json["datasets"]["n"]["chartData"][1]["id"]);
    assert_eq!("rgb(255,0,0)", json["datasets"]["n"]["colorSchema"][0]);
}
