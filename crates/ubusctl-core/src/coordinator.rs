// ── Polling coordinator ──
//
// Owns the ubus client and the current snapshot. A refresh cycle acquires a
// session, fans out to every data source concurrently, resolves device names
// and swaps the finished snapshot in atomically. Readers load the current
// `Arc<Snapshot>` and never wait on a cycle in progress.
//
// Cycles are serialized by `refresh_lock`. Out-of-band refresh requests go
// through a single-slot channel, so any number of requests made during a
// cycle collapse into one follow-up cycle.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ubusctl_api::{TlsMode, TransportConfig, UbusClient};

use crate::config::{RouterConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::Snapshot;
use crate::naming;
use crate::sources;

/// Coordinator lifecycle as seen by observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// No cycle running.
    Idle,
    /// A refresh cycle is in flight.
    Refreshing,
}

// ── Coordinator ──────────────────────────────────────────────────

/// Session-managed polling coordinator for one router.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: RouterConfig,
    client: UbusClient,
    snapshot: ArcSwapOption<Snapshot>,
    snapshot_tx: watch::Sender<Option<Arc<Snapshot>>>,
    state_tx: watch::Sender<CoordinatorState>,
    /// Held for the whole of a cycle.
    refresh_lock: Mutex<()>,
    refresh_tx: mpsc::Sender<()>,
    refresh_rx: Mutex<Option<mpsc::Receiver<()>>>,
    /// MAC (lowercased) to time of the last kick.
    kicked: DashMap<String, DateTime<Utc>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Coordinator {
    /// Build a coordinator. No network traffic happens until the first
    /// refresh.
    pub fn new(config: RouterConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::new(config.timeout).with_tls(tls_mode(&config.tls));
        let client = UbusClient::new(
            &config.host,
            config.username.clone(),
            config.password.clone(),
            &transport,
        )?;

        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        let (snapshot_tx, _) = watch::channel(None);
        let (state_tx, _) = watch::channel(CoordinatorState::Idle);

        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                config,
                client,
                snapshot: ArcSwapOption::empty(),
                snapshot_tx,
                state_tx,
                refresh_lock: Mutex::new(()),
                refresh_tx,
                refresh_rx: Mutex::new(Some(refresh_rx)),
                kicked: DashMap::new(),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    pub(crate) fn client(&self) -> &UbusClient {
        &self.inner.client
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Initial bring-up: the first refresh must succeed.
    pub async fn first_refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.refresh().await.map_err(|e| CoreError::SetupFailed {
            source: Box::new(e),
        })
    }

    /// Run the first refresh, then spawn the periodic poll and the refresh
    /// request listener.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.first_refresh().await?;

        let mut handles = self.inner.task_handles.lock().await;
        let cancel = self.inner.cancel.child_token();

        if self.inner.config.poll_interval.is_zero() {
            debug!("poll interval is zero, periodic refresh disabled");
        } else {
            handles.push(tokio::spawn(poll_task(
                self.clone(),
                self.inner.config.poll_interval,
                cancel.clone(),
            )));
        }

        if let Some(rx) = self.inner.refresh_rx.lock().await.take() {
            handles.push(tokio::spawn(refresh_request_task(self.clone(), rx, cancel)));
        }

        info!(
            host = %self.inner.config.host,
            interval_secs = self.inner.config.poll_interval.as_secs(),
            "coordinator started"
        );
        Ok(())
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let handles: Vec<_> = self.inner.task_handles.lock().await.drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
        debug!("coordinator shut down");
    }

    // ── Snapshot access ──────────────────────────────────────────

    /// The last published snapshot, if any cycle has succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshot.load_full()
    }

    /// Receive every newly published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.inner.snapshot_tx.subscribe()
    }

    pub fn state(&self) -> CoordinatorState {
        *self.inner.state_tx.borrow()
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Run one refresh cycle now, waiting for any cycle already in flight.
    ///
    /// On failure the session is dropped, the previous snapshot stays
    /// current and the error comes back as [`CoreError::UpdateFailed`].
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        let _cycle = self.inner.refresh_lock.lock().await;
        let _state = StateGuard::enter(&self.inner.state_tx);

        match self.run_cycle().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.inner.snapshot.store(Some(Arc::clone(&snapshot)));
                self.inner.snapshot_tx.send_replace(Some(Arc::clone(&snapshot)));
                debug!(
                    devices = snapshot.devices.len(),
                    networks = snapshot.wireless_networks.len(),
                    services = snapshot.services.len(),
                    "snapshot published"
                );
                Ok(snapshot)
            }
            Err(e) => {
                self.inner.client.invalidate_session().await;
                warn!(error = %e, "refresh cycle failed");
                Err(CoreError::from(e).into_update_failed())
            }
        }
    }

    /// Ask for a refresh without waiting for it.
    ///
    /// Requests made while one is already queued are coalesced. Requests are
    /// served by the listener spawned in [`start`](Self::start).
    pub fn request_refresh(&self) {
        match self.inner.refresh_tx.try_send(()) {
            Ok(()) => debug!("refresh requested"),
            Err(mpsc::error::TrySendError::Full(())) => debug!("refresh already queued"),
            Err(mpsc::error::TrySendError::Closed(())) => {}
        }
    }

    /// Request a refresh once `delay` has passed. Returns immediately.
    pub fn schedule_refresh(&self, delay: Duration) {
        let coordinator = self.clone();
        let cancel = self.inner.cancel.child_token();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => coordinator.request_refresh(),
            }
        });
    }

    async fn run_cycle(&self) -> Result<Snapshot, ubusctl_api::Error> {
        let client = &self.inner.client;
        let config = &self.inner.config;

        client.ensure_session().await?;

        let (system, wireless_info, dhcp_leases, services, wireless_networks, ethers) =
            tokio::join!(
                sources::system::fetch(client, config.cpu_cores),
                sources::wireless::clients(client, config.wireless_backend),
                sources::dhcp::leases(client, config.dhcp_backend),
                sources::services::status(client, &config.managed_services),
                sources::wireless::networks(client),
                sources::ethers::load(client),
            );

        let wireless_info = wireless_info?;
        let connected_devices = sources::wireless::connected_devices(&wireless_info);
        let dhcp_leases = dhcp_leases?;
        let ethers = ethers?;
        let devices = naming::process_devices(&connected_devices, &dhcp_leases, &ethers);

        Ok(Snapshot {
            system: system?,
            wireless_info,
            wireless_networks: wireless_networks?,
            connected_devices,
            dhcp_leases,
            services: services?,
            ethers,
            devices,
            refreshed_at: Utc::now(),
        })
    }

    // ── Kick ledger ──────────────────────────────────────────────

    pub(crate) fn record_kick(&self, mac: &str) {
        self.inner.kicked.insert(mac.to_lowercase(), Utc::now());
    }

    /// When `mac` was last kicked by this coordinator.
    pub fn last_kick(&self, mac: &str) -> Option<DateTime<Utc>> {
        self.inner.kicked.get(&mac.to_lowercase()).map(|t| *t)
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

/// Marks the coordinator `Refreshing` until dropped, so a cancelled cycle
/// still returns to `Idle`.
struct StateGuard<'a> {
    tx: &'a watch::Sender<CoordinatorState>,
}

impl<'a> StateGuard<'a> {
    fn enter(tx: &'a watch::Sender<CoordinatorState>) -> Self {
        tx.send_replace(CoordinatorState::Refreshing);
        Self { tx }
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.tx.send_replace(CoordinatorState::Idle);
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically run a refresh cycle.
async fn poll_task(coordinator: Coordinator, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = coordinator.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

/// Serve out-of-band refresh requests.
async fn refresh_request_task(
    coordinator: Coordinator,
    mut rx: mpsc::Receiver<()>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            request = rx.recv() => {
                let Some(()) = request else { break };
                if let Err(e) = coordinator.refresh().await {
                    warn!(error = %e, "requested refresh failed");
                }
            }
        }
    }
}
