use opex_client::DataFile;
use opex_config::Persistable;
use opex_usage::UsageKind;
use serde_json::json;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

use super::*;
use crate::core::SNAPSHOT_FILE_NAME;

const NODES_JSON: &str = r#"{
    "n1": {
        "id": "n1-uid", "name": "n1",
        "cpuUsage": 40, "cpuCapacity": 100, "memUsage": 512, "memCapacity": 2048,
        "podsRunning": [
            { "name": "P1", "cpuUsage": 10, "memUsage": 256 },
            { "name": "P2", "cpuUsage": 30, "memUsage": 256 }
        ]
    }
}"#;

fn new_runtime() -> Runtime {
    Builder::new_multi_thread().worker_threads(2).enable_all().build().unwrap()
}

fn write_data_files(dir: &Path, series: &str) {
    for file in DataFile::ALL {
        let content = if file == DataFile::Nodes { NODES_JSON } else { series };
        std::fs::write(dir.join(file.file_name()), content).unwrap();
    }
}

fn new_app(runtime: &Runtime, data_dir: &Path, config_path: PathBuf) -> App {
    let config = Config {
        data_url: data_dir.display().to_string(),
        refresh_interval: 3600,
        ..Config::default()
    };

    App::new(runtime.handle().clone(), Args::default(), config, config_path).unwrap()
}

fn wait_until(app: &mut App, condition: impl Fn(&DashboardState) -> bool) -> bool {
    for _ in 0..400 {
        assert_eq!(ExecutionFlow::Continue, app.process_events().unwrap());
        if condition(&app.state) {
            return true;
        }

        sleep(Duration::from_millis(25));
    }

    false
}

fn cycle_completed(generation: u64) -> impl Fn(&DashboardState) -> bool {
    move |state| state.generation == generation && state.is_cycle_complete()
}

fn datasets_kind(state: &DashboardState) -> Option<UsageKind> {
    state.nodes.datasets.as_ref().map(|d| d.kind)
}

#[test]
fn restarted_refresher_keeps_updating_state_test() {
    let runtime = new_runtime();
    let dir = tempfile::tempdir().unwrap();
    write_data_files(dir.path(), "[1]");
    let mut app = new_app(&runtime, dir.path(), dir.path().join("config.yaml"));

    app.refresher.start(app.config.refresh_interval());
    assert!(wait_until(&mut app, cycle_completed(1)));
    app.refresher.refresh();
    assert!(wait_until(&mut app, cycle_completed(2)));

    std::fs::write(dir.path().join(DataFile::CpuTrends.file_name()), "[2]").unwrap();
    let config = Config {
        data_url: format!("{}/", app.config.data_url),
        ..app.config.clone()
    };
    app.apply_config(config);

    assert!(wait_until(&mut app, cycle_completed(3)));
    assert_eq!(3, app.refresher.generation());
    assert_eq!(json!([2]), app.state.charts[&DataFile::CpuTrends].data);
    assert_eq!(Some(3), app.state.shown_generation(DataFile::Nodes));
}

#[test]
fn invalid_output_dir_keeps_previous_writer_test() {
    let runtime = new_runtime();
    let dir = tempfile::tempdir().unwrap();
    write_data_files(dir.path(), "[]");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let mut app = new_app(&runtime, dir.path(), dir.path().join("config.yaml"));

    let config = Config {
        output_dir: Some(blocker.join("out")),
        refresh_interval: 60,
        ..app.config.clone()
    };
    app.apply_config(config);

    assert!(app.writer.is_none());
    assert_eq!(None, app.config.output_dir);
    assert_eq!(60, app.config.refresh_interval);
    assert_eq!(ExecutionFlow::Continue, app.process_events().unwrap());

    let output_dir = dir.path().join("out");
    let config = Config {
        output_dir: Some(output_dir.clone()),
        ..app.config.clone()
    };
    app.apply_config(config);
    assert!(wait_until(&mut app, cycle_completed(1)));
    app.refresher.refresh();

    assert!(wait_until(&mut app, cycle_completed(2)));
    assert_eq!(Some(output_dir.clone()), app.config.output_dir);
    assert!(output_dir.join(SNAPSHOT_FILE_NAME).exists());
}

#[test]
fn usage_kind_change_refreshes_without_restart_test() {
    let runtime = new_runtime();
    let dir = tempfile::tempdir().unwrap();
    write_data_files(dir.path(), "[]");
    let mut app = new_app(&runtime, dir.path(), dir.path().join("config.yaml"));

    app.refresher.start(app.config.refresh_interval());
    assert!(wait_until(&mut app, cycle_completed(1)));
    assert_eq!(Some(UsageKind::Cpu), datasets_kind(&app.state));

    let generation = app.refresher.generation_counter();
    let config = Config {
        usage_kind: "memory".to_owned(),
        ..app.config.clone()
    };
    app.apply_config(config);

    assert!(wait_until(&mut app, cycle_completed(2)));
    assert_eq!(Some(UsageKind::Memory), datasets_kind(&app.state));
    assert_eq!("memory", app.refresher.usage_kind());
    assert!(Arc::ptr_eq(&generation, &app.refresher.generation_counter()));
}

#[test]
fn usage_kind_change_from_config_file_test() {
    let runtime = new_runtime();
    let dir = tempfile::tempdir().unwrap();
    write_data_files(dir.path(), "[]");
    let config_path = dir.path().join("config.yaml");
    let mut app = new_app(&runtime, dir.path(), config_path.clone());
    runtime.block_on(app.config.save(&config_path)).unwrap();

    app.refresher.start(app.config.refresh_interval());
    app.config_watcher.start().unwrap();
    assert!(wait_until(&mut app, cycle_completed(1)));

    let config = Config {
        usage_kind: "mem".to_owned(),
        ..app.config.clone()
    };
    let tmp_path = config_path.with_extension("yaml.tmp");
    runtime.block_on(config.save(&tmp_path)).unwrap();
    std::fs::rename(&tmp_path, &config_path).unwrap();

    assert!(wait_until(&mut app, |state| datasets_kind(state) == Some(UsageKind::Memory)));
    assert_eq!("mem", app.config.usage_kind);
    assert_eq!(Some(&"mem".to_owned()), app.usage_kind.current());
}
