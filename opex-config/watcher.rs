use anyhow::Result;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::sleep,
};
use tokio_util::sync::CancellationToken;

use crate::ConfigError;

#[cfg(test)]
#[path = "./watcher.tests.rs"]
mod watcher_tests;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Configurations that can be saved to and load from a file.
pub trait Persistable<T> {
    /// Returns the default configuration path.
    fn default_path() -> PathBuf;

    /// Loads configuration from the specified file.
    fn load(path: &Path) -> impl Future<Output = Result<T, ConfigError>> + Send;

    /// Saves configuration to the specified file.
    fn save(&self, path: &Path) -> impl Future<Output = Result<(), ConfigError>> + Send;
}

/// Observes for changes in the configuration file.\
/// **Note** that the parent directory is watched, so the file can also be replaced by a rename.
pub struct ConfigWatcher<T: Persistable<T> + Send + 'static> {
    path: PathBuf,
    watched_dir: PathBuf,
    watcher: Option<RecommendedWatcher>,
    runtime: Handle,
    task: Option<JoinHandle<()>>,
    cancellation_token: Option<CancellationToken>,
    config_tx: UnboundedSender<T>,
    config_rx: UnboundedReceiver<T>,
}

impl<T: Persistable<T> + Send + 'static> ConfigWatcher<T> {
    /// Creates new [`ConfigWatcher`] instance.
    pub fn new(runtime: Handle, config_to_watch: PathBuf) -> Self {
        let (config_tx, config_rx) = mpsc::unbounded_channel();
        let watched_dir = match config_to_watch.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self {
            path: config_to_watch,
            watched_dir,
            watcher: None,
            runtime,
            task: None,
            cancellation_token: None,
            config_tx,
            config_rx,
        }
    }

    /// Runs a background task to observe configuration changes.
    pub fn start(&mut self) -> Result<()> {
        let (_tx, mut _rx) = mpsc::channel(10);
        let mut watcher = RecommendedWatcher::new(
            move |result| {
                let _ = _tx.blocking_send(result);
            },
            notify::Config::default(),
        )?;

        watcher.watch(&self.watched_dir, RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);

        let cancellation_token = CancellationToken::new();
        let _cancellation_token = cancellation_token.clone();
        let _path = self.path.clone();
        let _file_name = self.path.file_name().map(OsString::from).unwrap_or_default();
        let _config_tx = self.config_tx.clone();

        let task = self.runtime.spawn(async move {
            while !_cancellation_token.is_cancelled() {
                sleep(POLL_INTERVAL).await;

                let mut configuration_modified = false;
                while let Ok(result) = _rx.try_recv() {
                    if let Ok(event) = result
                        && is_file_changed(&event, &_file_name)
                    {
                        configuration_modified = true;
                    }
                }

                if configuration_modified {
                    match T::load(&_path).await {
                        Ok(config) => {
                            tracing::info!("Configuration file {} re-loaded", _path.display());
                            let _ = _config_tx.send(config);
                        },
                        Err(error) => tracing::warn!("Cannot re-load config file: {}", error),
                    }
                }
            }
        });

        self.cancellation_token = Some(cancellation_token);
        self.task = Some(task);

        Ok(())
    }

    /// Cancels [`ConfigWatcher`] task.
    pub fn cancel(&mut self) {
        self.stop_watcher();
        if let Some(cancellation_token) = self.cancellation_token.take() {
            cancellation_token.cancel();
        }
    }

    /// Cancels [`ConfigWatcher`] task and waits until it is finished.
    pub fn stop(&mut self) {
        self.cancel();
        opex_common::tasks::wait_for_task(self.task.take(), "configuration watcher");
    }

    /// Tries to get a new configuration if it has been reloaded due to a file modification.
    pub fn try_next(&mut self) -> Option<T> {
        self.config_rx.try_recv().ok()
    }

    fn stop_watcher(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            let _ = watcher.unwatch(&self.watched_dir);
        }
    }
}

impl<T: Persistable<T> + Send + 'static> Drop for ConfigWatcher<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn is_file_changed(event: &Event, file_name: &OsString) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|path| path.file_name() == Some(file_name.as_os_str()))
}
