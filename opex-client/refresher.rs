use opex_usage::{DatasetError, NodeDatasets, NodesMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::{DataFile, TransportError, UsageClient};

#[cfg(test)]
#[path = "./refresher.tests.rs"]
mod refresher_tests;

/// Content of a successfully fetched data file.
#[derive(Debug)]
pub enum RefreshPayload {
    /// Nodes metrics together with datasets built for the usage kind selected when the cycle started.
    Nodes {
        nodes: NodesMap,
        datasets: Result<NodeDatasets, DatasetError>,
    },

    /// Trend or aggregate series, passed through as is.
    Series(serde_json::Value),
}

/// Completion of a single data file fetch.
#[derive(Debug)]
pub struct RefreshResult {
    pub generation: u64,
    pub file: DataFile,
    pub outcome: Result<RefreshPayload, TransportError>,
}

/// Events reported by [`BgRefresher`].
#[derive(Debug)]
pub enum RefreshEvent {
    /// New refresh cycle was started.
    CycleStarted(u64),

    /// One data file of the given cycle was fetched or failed.
    Completed(Box<RefreshResult>),
}

/// Periodically fetches all data files and builds node datasets in the background.\
/// **Note** that every cycle gets a new generation number, so results of a slow cycle can be told apart.
pub struct BgRefresher {
    client: Arc<UsageClient>,
    runtime: Handle,
    task: Option<JoinHandle<()>>,
    cancellation_token: Option<CancellationToken>,
    events_tx: UnboundedSender<RefreshEvent>,
    events_rx: UnboundedReceiver<RefreshEvent>,
    usage_kind: watch::Sender<String>,
    refresh_now: Arc<Notify>,
    generation: Arc<AtomicU64>,
}

impl BgRefresher {
    /// Creates new [`BgRefresher`] instance.
    pub fn new(runtime: Handle, client: UsageClient, usage_kind: impl Into<String>) -> Self {
        Self::with_generation(runtime, client, usage_kind, Arc::new(AtomicU64::new(0)))
    }

    /// Creates new [`BgRefresher`] instance that numbers its cycles with the shared `generation` counter.\
    /// **Note** that a refresher replacing another one must share its counter, so new cycles are never older.
    pub fn with_generation(
        runtime: Handle,
        client: UsageClient,
        usage_kind: impl Into<String>,
        generation: Arc<AtomicU64>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (usage_kind, _) = watch::channel(usage_kind.into());
        Self {
            client: Arc::new(client),
            runtime,
            task: None,
            cancellation_token: None,
            events_tx,
            events_rx,
            usage_kind,
            refresh_now: Arc::new(Notify::new()),
            generation,
        }
    }

    /// Starts refreshing data immediately and then every `period`.\
    /// **Note** that it stops the old task if any is running.
    pub fn start(&mut self, period: Duration) {
        self.stop();

        let cancellation_token = CancellationToken::new();
        let _cancellation_token = cancellation_token.clone();
        let _client = Arc::clone(&self.client);
        let _events_tx = self.events_tx.clone();
        let _usage_kind = self.usage_kind.subscribe();
        let _refresh_now = Arc::clone(&self.refresh_now);
        let _generation = Arc::clone(&self.generation);

        let task = self.runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = _cancellation_token.cancelled() => break,
                    _ = ticker.tick() => (),
                    () = _refresh_now.notified() => ticker.reset(),
                }

                let generation = _generation.fetch_add(1, Ordering::Relaxed) + 1;
                let usage_kind = _usage_kind.borrow().clone();
                tracing::info!("Starting refresh cycle {generation} for {usage_kind} usage");

                if _events_tx.send(RefreshEvent::CycleStarted(generation)).is_err() {
                    break;
                }

                for file in DataFile::ALL {
                    tokio::spawn(run_fetch(
                        Arc::clone(&_client),
                        file,
                        generation,
                        usage_kind.clone(),
                        _events_tx.clone(),
                        _cancellation_token.child_token(),
                    ));
                }
            }
        });

        self.cancellation_token = Some(cancellation_token);
        self.task = Some(task);
    }

    /// Sets usage kind for the node datasets built in the next cycles.
    pub fn set_usage_kind(&self, usage_kind: impl Into<String>) {
        self.usage_kind.send_replace(usage_kind.into());
    }

    /// Returns usage kind the next cycle will build node datasets for.
    pub fn usage_kind(&self) -> String {
        self.usage_kind.borrow().clone()
    }

    /// Starts a new refresh cycle now and restarts the period.
    pub fn refresh(&self) {
        self.refresh_now.notify_one();
    }

    /// Returns generation of the most recently started cycle.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Returns the generation counter shared by this refresher's cycles.
    pub fn generation_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.generation)
    }

    /// Returns `true` if the refresher is running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancels [`BgRefresher`] task together with its in-flight fetches.
    pub fn cancel(&mut self) {
        if let Some(cancellation_token) = self.cancellation_token.take() {
            cancellation_token.cancel();
        }
    }

    /// Cancels [`BgRefresher`] task and waits until it is finished.
    pub fn stop(&mut self) {
        self.cancel();
        opex_common::tasks::wait_for_task(self.task.take(), "refresher");
    }

    /// Tries to get the next [`RefreshEvent`].
    pub fn try_next(&mut self) -> Option<RefreshEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Waits for the next [`RefreshEvent`].
    pub async fn next(&mut self) -> Option<RefreshEvent> {
        self.events_rx.recv().await
    }
}

impl Drop for BgRefresher {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_fetch(
    client: Arc<UsageClient>,
    file: DataFile,
    generation: u64,
    usage_kind: String,
    events_tx: UnboundedSender<RefreshEvent>,
    cancellation_token: CancellationToken,
) {
    let outcome = tokio::select! {
        () = cancellation_token.cancelled() => return,
        outcome = fetch_payload(&client, file, &usage_kind) => outcome,
    };

    if let Err(error) = &outcome {
        tracing::warn!("Cannot fetch {} from {:?}: {}", file, client.source(), error);
    }

    let _ = events_tx.send(RefreshEvent::Completed(Box::new(RefreshResult {
        generation,
        file,
        outcome,
    })));
}

async fn fetch_payload(client: &UsageClient, file: DataFile, usage_kind: &str) -> Result<RefreshPayload, TransportError> {
    if file == DataFile::Nodes {
        let nodes = client.fetch_nodes().await?;
        let datasets = opex_usage::build(&nodes, usage_kind);
        Ok(RefreshPayload::Nodes { nodes, datasets })
    } else {
        Ok(RefreshPayload::Series(client.fetch(file).await?))
    }
}
