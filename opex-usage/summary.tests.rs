use super::*;
use crate::PodMetrics;

#[test]
fn summary_from_node_test() {
    let node = NodeMetrics {
        id: "8f3c".to_owned(),
        name: "worker-1".to_owned(),
        state: Some("Ready".to_owned()),
        container_runtime: Some("containerd://1.7.2".to_owned()),
        cpu_usage: Some(1.0),
        cpu_capacity: Some(3.0),
        cpu_allocatable: Some(2.5),
        mem_usage: Some(512.0),
        mem_capacity: Some(2048.0),
        mem_allocatable: None,
        pods_running: vec![PodMetrics::default(), PodMetrics::default()],
    };

    let summary = NodeSummary::from(&node);

    assert_eq!("worker-1", summary.host);
    assert_eq!("8f3c", summary.uid);
    assert_eq!(Some(83.34), summary.cpu_allocatable);
    assert_eq!(Some(33.34), summary.cpu_usage);
    assert_eq!(Some(25.0), summary.mem_usage);
    assert_eq!(None, summary.mem_allocatable);
    assert_eq!(2, summary.pods_running);
}

#[test]
fn summary_zero_capacity_test() {
    let node = NodeMetrics {
        cpu_usage: Some(1.0),
        cpu_capacity: Some(0.0),
        ..NodeMetrics::default()
    };

    assert_eq!(None, NodeSummary::from(&node).cpu_usage);
}

#[test]
fn node_list_test() {
    let nodes = [("b", "node-b"), ("a", "node-a")]
        .into_iter()
        .map(|(key, name)| {
            (
                key.to_owned(),
                NodeMetrics {
                    id: format!("{key}-uid"),
                    name: name.to_owned(),
                    ..NodeMetrics::default()
                },
            )
        })
        .collect::<NodesMap>();

    assert_eq!(
        vec!["node-a", "node-b"],
        node_list(&nodes).into_iter().map(|n| n.name).collect::<Vec<_>>()
    );
}
