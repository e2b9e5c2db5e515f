use std::sync::Arc;
use std::time::Duration;

use plantbuddy_api::{DeviceState, Id};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::normalizer::WaterLevelScale;
use crate::remote::RemoteStateClient;
use crate::state::LocalUiState;

/// What a polling loop reads from the store and which fields it owns locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollKind {
    /// Water level, light level, soil moisture and the optional climate readings
    Telemetry,
    /// The pump request flag, authoritative for `is_watering`
    PumpStatus,
}

impl PollKind {
    pub fn name(&self) -> &'static str {
        match self {
            PollKind::Telemetry => "telemetry",
            PollKind::PumpStatus => "pump-status",
        }
    }

    /// Applies a fetched snapshot to the fields this loop owns. `observed_epoch`
    /// is the pump flag's epoch from when the fetch started. Returns whether
    /// anything visible changed.
    pub fn apply(
        &self,
        ui: &mut LocalUiState,
        device: &DeviceState,
        scale: &WaterLevelScale,
        observed_epoch: u64,
    ) -> bool {
        match self {
            PollKind::Telemetry => {
                ui.apply_telemetry(device, scale);
                true
            }
            PollKind::PumpStatus => {
                let before = ui.is_watering;
                ui.is_watering.confirm(device.is_pump_requested, observed_epoch);
                before != ui.is_watering
            }
        }
    }
}

/// Shared handles a loop needs on every tick.
pub struct PollTarget<C: ?Sized> {
    pub client: Arc<C>,
    pub device_id: Id,
    pub state: Arc<watch::Sender<LocalUiState>>,
    pub scale: WaterLevelScale,
}

impl<C: ?Sized> Clone for PollTarget<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            device_id: self.device_id,
            state: Arc::clone(&self.state),
            scale: self.scale,
        }
    }
}

struct PollingTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// One cancellable periodic refresh loop.
///
/// Ticks are strictly sequential: the next tick is not taken until the
/// previous fetch resolved, and missed ticks are delayed rather than burst.
pub struct Poller {
    kind: PollKind,
    interval: Duration,
    task: Option<PollingTask>,
}

impl Poller {
    pub fn new(kind: PollKind, interval: Duration) -> Self {
        Self {
            kind,
            interval,
            task: None,
        }
    }

    pub fn kind(&self) -> PollKind {
        self.kind
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| !task.cancel.is_cancelled() && !task.handle.is_finished())
    }

    /// Spawns the loop. Returns `false` when it is already running.
    pub fn start<C>(&mut self, target: PollTarget<C>) -> bool
    where
        C: RemoteStateClient + ?Sized + 'static,
    {
        if self.is_running() {
            tracing::debug!("{} poller already running", self.kind.name());
            return false;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.kind,
            self.interval,
            target,
            cancel.clone(),
        ));

        tracing::info!(
            "Started {} poller every {:?}",
            self.kind.name(),
            self.interval
        );
        self.task = Some(PollingTask { cancel, handle });
        true
    }

    /// Cancels the loop and waits for it to exit. Once this returns no tick of
    /// the old loop can mutate state. Returns `false` when nothing was running.
    pub async fn stop(&mut self) -> bool {
        let Some(task) = self.task.take() else {
            return false;
        };

        task.cancel.cancel();
        if let Err(e) = task.handle.await {
            if e.is_panic() {
                tracing::error!("{} poller panicked: {}", self.kind.name(), e);
            }
        }

        tracing::info!("Stopped {} poller", self.kind.name());
        true
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel.cancel();
            task.handle.abort();
        }
    }
}

async fn poll_loop<C>(
    kind: PollKind,
    interval: Duration,
    target: PollTarget<C>,
    cancel: CancellationToken,
) where
    C: RemoteStateClient + ?Sized,
{
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let epoch = target.state.borrow().is_watering.epoch();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = target.client.fetch_state(target.device_id) => result,
        };

        match result {
            Ok(device) => {
                target.state.send_if_modified(|ui| {
                    // A stopped loop discards whatever was still in flight
                    if cancel.is_cancelled() {
                        return false;
                    }
                    kind.apply(ui, &device, &target.scale, epoch)
                });
                tracing::debug!("{} tick applied for device {}", kind.name(), target.device_id);
            }
            Err(e) => {
                tracing::error!(
                    "Failed to fetch {} for device {}: {}",
                    kind.name(),
                    target.device_id,
                    e
                );
            }
        }
    }
}
