// ── Polling coordinator ──
//
// Lifecycle management for one heater: identity lookup, periodic and
// on-demand refresh cycles, committed state publication, and change
// notification. Commands live in `command.rs`.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::Utc;
use heatctl_api::DeviceClient;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

use crate::builder::SnapshotBuilder;
use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::model::{DeviceInfo, Snapshot, SnapshotValue};
use crate::state::{CoordinatorState, Health};
use crate::stream::StateStream;
use crate::subscription::{Subscribers, Subscription};

/// Whether a cycle may be satisfied by one that completed while waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CycleMode {
    Coalesce,
    Force,
}

// ── Coordinator ──────────────────────────────────────────────────

/// Central polling coordinator for one device.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. At most one refresh
/// cycle runs at a time; every completed cycle is committed to the
/// published [`CoordinatorState`] before subscribers hear about it.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: CoordinatorConfig,
    client: DeviceClient,
    device: OnceLock<DeviceInfo>,
    state: watch::Sender<CoordinatorState>,
    subscribers: Arc<Subscribers>,
    /// Held for the duration of a cycle.
    refresh_lock: Mutex<()>,
    span: Span,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Coordinator {
    /// Create a coordinator for `config.host`. Does NOT contact the
    /// device -- call [`start()`](Self::start).
    pub fn new(config: CoordinatorConfig) -> Result<Self, CoreError> {
        let span = info_span!("coordinator", host = %config.host);
        Self::with_span(config, span)
    }

    /// Like [`new`](Self::new), instrumenting all work with `span`.
    pub fn with_span(config: CoordinatorConfig, span: Span) -> Result<Self, CoreError> {
        let client = DeviceClient::new(&config.host, &config.transport())?;
        Ok(Self::with_client(config, client, span))
    }

    /// Create a coordinator around an existing client.
    pub fn with_client(config: CoordinatorConfig, client: DeviceClient, span: Span) -> Self {
        let (state, _) = watch::channel(CoordinatorState::default());

        Self {
            inner: Arc::new(CoordinatorInner {
                config,
                client,
                device: OnceLock::new(),
                state,
                subscribers: Arc::new(Subscribers::default()),
                refresh_lock: Mutex::new(()),
                span,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    pub(crate) fn client(&self) -> &DeviceClient {
        &self.inner.client
    }

    pub(crate) fn span(&self) -> &Span {
        &self.inner.span
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Identify the device, run the first cycle, and start the poll timer.
    ///
    /// Fails if the identity cannot be fetched or the first cycle is
    /// rejected for authentication. Any other first-cycle failure leaves
    /// the coordinator [`Degraded`](Health::Degraded) and polling. A later
    /// authentication failure pauses the timer until a manual
    /// [`refresh()`](Self::refresh) succeeds.
    pub async fn start(&self) -> Result<(), CoreError> {
        async {
            let mut handles = self.inner.task_handles.lock().await;
            if !handles.is_empty() {
                debug!("coordinator already started");
                return Ok(());
            }

            let device = DeviceInfo::from(self.inner.client.get_system().await?);
            info!(
                product_id = %device.product_id,
                model = %device.model,
                firmware = %device.firmware,
                "device identified"
            );
            let _ = self.inner.device.set(device);

            if let Err(e) = self.run_cycle(CycleMode::Force).await {
                if e.requires_reauth() {
                    return Err(e);
                }
                debug!("first refresh failed, polling continues");
            }

            let interval = self.inner.config.poll_interval;
            if interval.is_zero() {
                info!("poll timer disabled, refreshing on demand only");
            } else {
                let ctrl = self.clone();
                let cancel = self.inner.cancel.clone();
                handles.push(tokio::spawn(
                    poll_task(ctrl, interval, cancel).instrument(Span::current()),
                ));
                info!(interval_secs = interval.as_secs(), "coordinator started");
            }
            Ok(())
        }
        .instrument(self.inner.span.clone())
        .await
    }

    /// Stop the poll timer and wait for it to exit. A cycle already in
    /// flight runs to completion first.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!(parent: &self.inner.span, "coordinator stopped");
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Run one cycle now.
    ///
    /// If another cycle is in flight, waits for it and returns its
    /// outcome instead of starting a second one.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.run_cycle(CycleMode::Coalesce)
            .instrument(self.inner.span.clone())
            .await
    }

    pub(crate) async fn run_cycle(&self, mode: CycleMode) -> Result<(), CoreError> {
        let seen = self.inner.state.borrow().cycles;
        let _guard = self.inner.refresh_lock.lock().await;

        if mode == CycleMode::Coalesce {
            let state = self.inner.state.borrow();
            if state.cycles != seen {
                debug!("joined a cycle that completed while waiting");
                return state.last_error.clone().map_or(Ok(()), Err);
            }
        }

        let result = SnapshotBuilder::new(&self.inner.client).build().await;
        self.commit(result)
    }

    /// Publish the outcome of a cycle, then notify subscribers.
    fn commit(&self, result: Result<Snapshot, CoreError>) -> Result<(), CoreError> {
        let (outcome, notify) = match result {
            Ok(snapshot) => {
                let mut recovered = false;
                self.inner.state.send_modify(|state| {
                    recovered = state.health == Health::Degraded;
                    let snapshot = match state.snapshot.as_deref() {
                        Some(previous) => snapshot.carry_forward(previous),
                        None => snapshot,
                    };
                    debug!(
                        fields = snapshot.len(),
                        running = snapshot.status_running(),
                        "refresh succeeded"
                    );
                    state.health = Health::Healthy;
                    state.snapshot = Some(Arc::new(snapshot));
                    state.last_error = None;
                    state.reauth_required = false;
                    state.last_success = Some(Utc::now());
                    state.cycles += 1;
                    state.consecutive_failures = 0;
                });
                if recovered {
                    info!("device reachable again");
                }
                (Ok(()), true)
            }
            Err(err) => {
                let mut changed = false;
                let mut failures = 0;
                self.inner.state.send_if_modified(|state| {
                    changed = state.health != Health::Degraded
                        || state.last_error.as_ref().map(CoreError::kind) != Some(err.kind());
                    state.health = Health::Degraded;
                    state.reauth_required |= err.requires_reauth();
                    state.last_error = Some(err.clone());
                    state.cycles += 1;
                    state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                    failures = state.consecutive_failures;
                    changed
                });

                if err.requires_reauth() {
                    error!(error = %err, "device rejected credentials, re-authentication required");
                } else if changed {
                    warn!(error = %err, kind = %err.kind(), "refresh failed");
                } else {
                    debug!(error = %err, failures, "refresh still failing");
                }

                // Same failure as last cycle: state updated silently.
                (Err(err), changed)
            }
        };

        if notify {
            let state = self.inner.state.borrow().clone();
            self.inner.subscribers.notify(&state);
        }
        outcome
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Snapshot of the committed state.
    pub fn state(&self) -> CoordinatorState {
        self.inner.state.borrow().clone()
    }

    pub fn health(&self) -> Health {
        self.inner.state.borrow().health
    }

    /// Last good snapshot, regardless of availability.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.state.borrow().snapshot.clone()
    }

    /// Current value of `key`, only while the field is available.
    pub fn value(&self, key: &str) -> Option<SnapshotValue> {
        self.inner.state.borrow().value(key).cloned()
    }

    pub fn is_available(&self, key: &str) -> bool {
        self.inner.state.borrow().is_available(key)
    }

    pub fn is_device_running(&self) -> bool {
        self.inner.state.borrow().is_device_running()
    }

    pub fn requires_reauth(&self) -> bool {
        self.inner.state.borrow().reauth_required
    }

    /// Device identity, once [`start()`](Self::start) has fetched it.
    pub fn identity(&self) -> Option<&DeviceInfo> {
        self.inner.device.get()
    }

    // ── Subscriptions ────────────────────────────────────────────

    /// Register `callback` to run after each published state change.
    ///
    /// Runs on the task that completed the cycle, after the state is
    /// committed. Keep it short.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CoordinatorState) + Send + Sync + 'static,
    {
        self.inner.subscribers.insert(Arc::new(callback))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Async receiver of published state.
    pub fn watch(&self) -> StateStream {
        StateStream::new(self.inner.state.subscribe())
    }
}

// ── Background tasks ─────────────────────────────────────────────

async fn poll_task(coordinator: Coordinator, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // Rejected credentials stay rejected until an explicit
                // refresh succeeds.
                if coordinator.requires_reauth() {
                    debug!("re-authentication required, skipping scheduled refresh");
                    continue;
                }
                // Outcome is committed to state and logged by `commit`.
                let _ = coordinator.run_cycle(CycleMode::Coalesce).await;
            }
        }
    }
    debug!("poll task exited");
}
