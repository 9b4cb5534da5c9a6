use anyhow::Result;
use opex_client::{BgRefresher, DataSource, UsageClient};
use opex_common::StateChangeTracker;
use opex_config::{Config, ConfigWatcher};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::runtime::Handle;

use crate::cli::Args;
use crate::core::{DashboardState, SnapshotWriter};

#[cfg(test)]
#[path = "./app.tests.rs"]
mod app_tests;

/// Application execution flow.
#[derive(Clone, Debug, PartialEq)]
pub enum ExecutionFlow {
    Continue,
    Stop,
}

/// Main application object that owns the dashboard state and its background workers.
pub struct App {
    args: Args,
    config: Config,
    runtime: Handle,
    refresher: BgRefresher,
    config_watcher: ConfigWatcher<Config>,
    writer: Option<SnapshotWriter>,
    state: DashboardState,
    usage_kind: StateChangeTracker<String>,
    stop_requested: Arc<AtomicBool>,
}

impl App {
    /// Creates new [`App`] instance.
    pub fn new(runtime: Handle, args: Args, config: Config, config_path: PathBuf) -> Result<Self> {
        let refresher = new_refresher(runtime.clone(), &config, Arc::new(AtomicU64::new(0)))?;
        let writer = new_writer(&config)?;

        Ok(Self {
            args,
            usage_kind: StateChangeTracker::new(Some(config.usage_kind.clone())),
            config,
            runtime: runtime.clone(),
            refresher,
            config_watcher: Config::watcher(runtime, config_path),
            writer,
            state: DashboardState::default(),
            stop_requested: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Starts refreshing data, watching configuration changes and listening for the interrupt signal.
    pub fn start(&mut self) -> Result<()> {
        self.refresher.start(self.config.refresh_interval());
        if let Err(error) = self.config_watcher.start() {
            tracing::warn!("Cannot watch configuration file: {error}");
        }

        let stop_requested = Arc::clone(&self.stop_requested);
        self.runtime.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, stopping");
                stop_requested.store(true, Ordering::Relaxed);
            }
        });

        Ok(())
    }

    /// Cancels all app tasks.
    pub fn cancel(&mut self) {
        self.refresher.cancel();
        self.config_watcher.cancel();
    }

    /// Stops app.
    pub fn stop(&mut self) {
        self.refresher.stop();
        self.config_watcher.stop();
    }

    /// Process all waiting events.
    pub fn process_events(&mut self) -> Result<ExecutionFlow> {
        if self.stop_requested.load(Ordering::Relaxed) {
            return Ok(ExecutionFlow::Stop);
        }

        if let Some(config) = self.config_watcher.try_next() {
            self.apply_config(self.args.apply(config));
        }

        let mut is_dirty = false;
        while let Some(event) = self.refresher.try_next() {
            is_dirty |= self.state.apply(event);
        }

        if is_dirty {
            self.write_snapshot();
        }

        Ok(ExecutionFlow::Continue)
    }

    /// Runs a single refresh cycle and waits until all its data files are processed.
    pub async fn run_once(&mut self) -> &DashboardState {
        self.refresher.start(self.config.refresh_interval());

        while !self.state.is_cycle_complete() {
            let Some(event) = self.refresher.next().await else {
                break;
            };
            self.state.apply(event);
        }

        self.refresher.cancel();
        self.write_snapshot();

        &self.state
    }

    /// Applies reloaded configuration.\
    /// **Note** that settings which cannot be applied are logged and the previous ones are kept.
    fn apply_config(&mut self, mut config: Config) {
        let needs_restart = config.data_url != self.config.data_url
            || config.request_timeout != self.config.request_timeout
            || config.refresh_interval != self.config.refresh_interval;

        if config.output_dir != self.config.output_dir {
            match new_writer(&config) {
                Ok(writer) => self.writer = writer,
                Err(error) => {
                    tracing::warn!("Cannot apply new output directory: {error:#}");
                    config.output_dir = self.config.output_dir.clone();
                },
            }
        }

        if needs_restart {
            match new_refresher(self.runtime.clone(), &config, self.refresher.generation_counter()) {
                Ok(refresher) => {
                    tracing::info!("Data source or refresh interval changed, restarting refresher");
                    self.refresher.stop();
                    self.refresher = refresher;
                    self.refresher.start(config.refresh_interval());
                    self.usage_kind.changed(config.usage_kind.clone());
                },
                Err(error) => {
                    tracing::warn!("Cannot apply new data source settings: {error:#}");
                    config.data_url = self.config.data_url.clone();
                    config.request_timeout = self.config.request_timeout;
                    config.refresh_interval = self.config.refresh_interval;
                    self.apply_usage_kind(&config.usage_kind);
                },
            }
        } else {
            self.apply_usage_kind(&config.usage_kind);
        }

        self.config = config;
    }

    fn apply_usage_kind(&mut self, usage_kind: &str) {
        if let Some(usage_kind) = self.usage_kind.changed(usage_kind.to_owned()) {
            tracing::info!("Usage kind changed to {usage_kind}");
            self.refresher.set_usage_kind(usage_kind.as_str());
            self.refresher.refresh();
        }
    }

    fn write_snapshot(&self) {
        if let Some(writer) = &self.writer
            && let Err(error) = writer.write(&self.state)
        {
            tracing::error!("Cannot write dashboard snapshot to {}: {}", writer.path().display(), error);
        }
    }
}

fn new_refresher(runtime: Handle, config: &Config, generation: Arc<AtomicU64>) -> Result<BgRefresher> {
    let client = UsageClient::new(DataSource::new(&config.data_url), config.request_timeout())?;
    Ok(BgRefresher::with_generation(
        runtime,
        client,
        config.usage_kind.clone(),
        generation,
    ))
}

fn new_writer(config: &Config) -> Result<Option<SnapshotWriter>> {
    config.output_dir.as_deref().map(SnapshotWriter::new).transpose()
}
