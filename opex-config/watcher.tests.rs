use std::time::Duration;
use tokio::runtime::Handle;

use super::*;
use crate::Config;

async fn wait_for_config(watcher: &mut ConfigWatcher<Config>, usage_kind: &str) -> bool {
    for _ in 0..100 {
        while let Some(config) = watcher.try_next() {
            if config.usage_kind == usage_kind {
                return true;
            }
        }

        sleep(Duration::from_millis(50)).await;
    }

    false
}

async fn replace_config(path: &Path, usage_kind: &str) {
    let config = Config {
        usage_kind: usage_kind.to_owned(),
        ..Config::default()
    };
    let tmp_path = path.with_extension("yaml.tmp");
    config.save(&tmp_path).await.unwrap();
    tokio::fs::rename(&tmp_path, path).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reload_on_modify_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    Config::default().save(&path).await.unwrap();

    let mut watcher = Config::watcher(Handle::current(), path.clone());
    watcher.start().unwrap();

    tokio::fs::write(&path, "usage_kind: memory\n").await.unwrap();

    assert!(wait_for_config(&mut watcher, "memory").await);
    watcher.stop();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reload_after_file_replaced_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    Config::default().save(&path).await.unwrap();

    let mut watcher = Config::watcher(Handle::current(), path.clone());
    watcher.start().unwrap();

    replace_config(&path, "memory").await;
    assert!(wait_for_config(&mut watcher, "memory").await);

    replace_config(&path, "cpu").await;
    assert!(wait_for_config(&mut watcher, "cpu").await);

    watcher.stop();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn other_files_are_ignored_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    Config::default().save(&path).await.unwrap();

    let mut watcher = Config::watcher(Handle::current(), path.clone());
    watcher.start().unwrap();

    tokio::fs::write(dir.path().join("other.yaml"), "usage_kind: memory\n").await.unwrap();
    sleep(POLL_INTERVAL * 3).await;

    assert!(watcher.try_next().is_none());
    watcher.stop();
}
