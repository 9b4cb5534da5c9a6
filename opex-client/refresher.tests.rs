use std::path::Path;
use tokio::time::timeout;

use super::*;
use crate::DataSource;

const NODES_JSON: &str = r#"{
    "n1": {
        "id": "n1-uid", "name": "n1",
        "cpuUsage": 40, "cpuCapacity": 100, "memUsage": 512, "memCapacity": 2048,
        "podsRunning": [
            { "name": "P2", "cpuUsage": 30, "memUsage": 256 },
            { "name": "P1", "cpuUsage": 10, "memUsage": 256 }
        ]
    }
}"#;

async fn write_data_files(dir: &Path) {
    tokio::fs::write(dir.join("nodes.json"), NODES_JSON).await.unwrap();
    for file in DataFile::ALL {
        if file != DataFile::Nodes && file != DataFile::MemoryMonthly {
            tokio::fs::write(dir.join(file.file_name()), "[]").await.unwrap();
        }
    }
}

async fn collect_cycle(refresher: &mut BgRefresher) -> (u64, Vec<RefreshResult>) {
    let mut generation = 0;
    let mut results = Vec::new();

    while results.len() < DataFile::ALL.len() {
        match timeout(Duration::from_secs(10), refresher.next()).await.unwrap().unwrap() {
            RefreshEvent::CycleStarted(started) => generation = started,
            RefreshEvent::Completed(result) => results.push(*result),
        }
    }

    results.sort_by_key(|r| r.file);
    (generation, results)
}

fn nodes_datasets(results: &[RefreshResult]) -> &Result<NodeDatasets, DatasetError> {
    results
        .iter()
        .find_map(|r| match &r.outcome {
            Ok(RefreshPayload::Nodes { datasets, .. }) => Some(datasets),
            _ => None,
        })
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refresh_cycles_test() {
    let dir = tempfile::tempdir().unwrap();
    write_data_files(dir.path()).await;

    let client = UsageClient::new(DataSource::Directory(dir.path().to_path_buf()), Duration::from_secs(5)).unwrap();
    let mut refresher = BgRefresher::new(Handle::current(), client, "cpu");
    refresher.start(Duration::from_secs(3600));

    let (generation, results) = collect_cycle(&mut refresher).await;
    assert_eq!(1, generation);
    assert!(results.iter().all(|r| r.generation == 1));
    assert!(matches!(
        results.iter().find(|r| r.file == DataFile::MemoryMonthly).unwrap().outcome,
        Err(TransportError::Io(_))
    ));
    assert_eq!(
        5,
        results
            .iter()
            .filter(|r| matches!(r.outcome, Ok(RefreshPayload::Series(_))))
            .count()
    );

    let datasets = nodes_datasets(&results).as_ref().unwrap();
    assert_eq!(3, datasets.datasets["n1"].slices.len());
    assert_eq!(60.0, datasets.datasets["n1"].slices[2].percentage);

    refresher.set_usage_kind("gpu");
    assert_eq!("gpu", refresher.usage_kind());
    refresher.refresh();

    let (generation, results) = collect_cycle(&mut refresher).await;
    assert_eq!(2, generation);
    assert_eq!(2, refresher.generation());
    assert_eq!(
        &Err(DatasetError::UnknownUsageKind("gpu".to_owned())),
        nodes_datasets(&results)
    );

    refresher.stop();
    assert!(!refresher.is_running());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shared_generation_continues_test() {
    let dir = tempfile::tempdir().unwrap();
    write_data_files(dir.path()).await;

    let client = UsageClient::new(DataSource::Directory(dir.path().to_path_buf()), Duration::from_secs(5)).unwrap();
    let mut first = BgRefresher::new(Handle::current(), client.clone(), "cpu");
    first.start(Duration::from_secs(3600));
    let (generation, _) = collect_cycle(&mut first).await;
    assert_eq!(1, generation);
    first.stop();

    let mut second = BgRefresher::with_generation(Handle::current(), client, "cpu", first.generation_counter());
    second.start(Duration::from_secs(3600));
    let (generation, results) = collect_cycle(&mut second).await;

    assert_eq!(2, generation);
    assert!(results.iter().all(|r| r.generation == 2));
    second.stop();
}
