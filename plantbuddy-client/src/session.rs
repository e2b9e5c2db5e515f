use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use plantbuddy_api::{DeviceStatePatch, Id, LightMode};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::configs::Settings;
use crate::gesture::GestureMapper;
use crate::guard::{CommandGuard, CommandOutcome, GuardState};
use crate::normalizer::{WaterLevelScale, clamp_percent};
use crate::remote::RemoteStateClient;
use crate::scheduler::{PollKind, PollTarget, Poller};
use crate::state::LocalUiState;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub device_id: Id,
    pub scale: WaterLevelScale,
    pub telemetry_interval: Duration,
    pub pump_interval: Duration,
    pub slider_width: f32,
    pub persist_light_mode: bool,
}

impl From<&Settings> for SessionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            device_id: settings.device.id,
            scale: settings.water_level_scale(),
            telemetry_interval: settings.polling.telemetry_interval(),
            pump_interval: settings.polling.pump_interval(),
            slider_width: settings.controls.slider_width,
            persist_light_mode: settings.controls.persist_light_mode,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            device_id: 1,
            scale: WaterLevelScale::default(),
            telemetry_interval: Duration::from_secs(10),
            pump_interval: Duration::from_secs(3),
            slider_width: 300.0,
            persist_light_mode: false,
        }
    }
}

/// Sends light-mode writes one at a time, in the order the modes were chosen.
struct LightModeWriter {
    sender: mpsc::UnboundedSender<LightMode>,
    receiver: Option<mpsc::UnboundedReceiver<LightMode>>,
    handle: Option<JoinHandle<()>>,
}

impl LightModeWriter {
    fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            sender,
            receiver: Some(receiver),
            handle: None,
        }
    }

    /// Spawns the writer on first call. Modes queued before that are written then.
    fn start<C>(&mut self, client: Arc<C>, device_id: Id)
    where
        C: RemoteStateClient + ?Sized + 'static,
    {
        if let Some(receiver) = self.receiver.take() {
            self.handle = Some(tokio::spawn(write_light_modes(client, device_id, receiver)));
        }
    }

    fn send(&self, mode: LightMode) {
        if self.sender.send(mode).is_err() {
            tracing::warn!("Light mode writer stopped, mode {} kept local", mode);
        }
    }
}

impl Drop for LightModeWriter {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn write_light_modes<C>(
    client: Arc<C>,
    device_id: Id,
    mut receiver: mpsc::UnboundedReceiver<LightMode>,
) where
    C: RemoteStateClient + ?Sized,
{
    while let Some(mut mode) = receiver.recv().await {
        // Only the latest queued mode is worth sending
        while let Ok(newer) = receiver.try_recv() {
            mode = newer;
        }

        let patch = DeviceStatePatch::light_mode(mode);
        match client.update_state(device_id, &patch).await {
            Ok(()) => tracing::debug!("Persisted light mode {} for device {}", mode, device_id),
            Err(e) => tracing::warn!("Failed to persist light mode {}: {}", mode, e),
        }
    }
}

/// Owns the local state of one control session for one device.
///
/// The rendering side reads [`snapshot`](Self::snapshot) or listens on
/// [`subscribe`](Self::subscribe) and calls the action methods; all remote
/// traffic goes through the injected client.
pub struct SessionController<C: RemoteStateClient + 'static> {
    client: Arc<C>,
    config: SessionConfig,
    state: Arc<watch::Sender<LocalUiState>>,
    telemetry: Poller,
    pump_status: Poller,
    pump_guard: CommandGuard,
    slider: Mutex<GestureMapper>,
    light_mode_writer: Option<LightModeWriter>,
}

impl<C: RemoteStateClient + 'static> SessionController<C> {
    pub fn new(client: Arc<C>, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(LocalUiState::default());

        Self {
            client,
            telemetry: Poller::new(PollKind::Telemetry, config.telemetry_interval),
            pump_status: Poller::new(PollKind::PumpStatus, config.pump_interval),
            pump_guard: CommandGuard::new("pump"),
            slider: Mutex::new(GestureMapper::new(config.slider_width)),
            light_mode_writer: config.persist_light_mode.then(LightModeWriter::new),
            state: Arc::new(state),
            config,
        }
    }

    pub fn device_id(&self) -> Id {
        self.config.device_id
    }

    pub fn snapshot(&self) -> LocalUiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LocalUiState> {
        self.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.telemetry.is_running() || self.pump_status.is_running()
    }

    pub fn pump_guard_state(&self) -> GuardState {
        self.pump_guard.state()
    }

    /// Starts both polling loops, and the light-mode writer when modes are
    /// persisted. Loops already running are left alone.
    pub fn start(&mut self) {
        let target = PollTarget {
            client: Arc::clone(&self.client),
            device_id: self.config.device_id,
            state: Arc::clone(&self.state),
            scale: self.config.scale,
        };

        self.telemetry.start(target.clone());
        self.pump_status.start(target);

        if let Some(writer) = self.light_mode_writer.as_mut() {
            writer.start(Arc::clone(&self.client), self.config.device_id);
        }
    }

    /// Stops both loops; a no-op when nothing is running. Queued light-mode
    /// writes still go out.
    pub async fn stop(&mut self) {
        self.telemetry.stop().await;
        self.pump_status.stop().await;
        self.lock_slider().release();
    }

    /// One-shot "Water Now".
    ///
    /// `is_watering` is assumed true as soon as the request is accepted. On a
    /// failed write it is rolled back before returning; on success it stands
    /// until a pump-status fetch started after the write reports the stored flag.
    pub async fn request_pump_activation(&self) -> CommandOutcome {
        let Some(_pending) = self.pump_guard.try_begin() else {
            tracing::warn!("Pump activation already pending, ignoring request");
            return CommandOutcome::AlreadyPending;
        };

        let already_watering = self.state.borrow().watering();
        if already_watering {
            tracing::warn!("Pump is already running, ignoring request");
            return CommandOutcome::AlreadyActive;
        }

        self.state.send_modify(|ui| ui.is_watering.assume(true));

        let patch = DeviceStatePatch::pump_requested(true);
        match self.client.update_state(self.config.device_id, &patch).await {
            Ok(()) => {
                // Not a visible change
                self.state.send_if_modified(|ui| {
                    ui.is_watering.settle();
                    false
                });
                tracing::info!("Pump activation requested for device {}", self.config.device_id);
                CommandOutcome::Issued
            }
            Err(e) => {
                tracing::error!("Failed to update pump state: {}", e);
                self.state.send_modify(|ui| ui.is_watering.rollback());
                CommandOutcome::Failed(e)
            }
        }
    }

    /// Advances Auto -> On -> Off -> Auto and returns the new mode.
    pub fn cycle_light_mode(&self) -> LightMode {
        let mut mode = LightMode::default();
        self.state.send_modify(|ui| {
            ui.light_mode = ui.light_mode.next();
            mode = ui.light_mode;
        });

        tracing::debug!("Light mode set to {}", mode);

        if let Some(writer) = &self.light_mode_writer {
            writer.send(mode);
        }

        mode
    }

    /// Sets the local light intensity, clamped into [0, 100]. Local only.
    pub fn set_light_intensity(&self, value: i32) -> u8 {
        let value = clamp_percent(value);
        self.state.send_if_modified(|ui| {
            let changed = ui.light_intensity_percent != value;
            ui.light_intensity_percent = value;
            changed
        });
        value
    }

    pub fn slider_press(&self, position: f32) -> Option<u8> {
        let control = self.state.borrow().light_slider();
        let value = self.lock_slider().press(position, control)?;
        Some(self.set_light_intensity(value as i32))
    }

    pub fn slider_move(&self, position: f32) -> Option<u8> {
        let control = self.state.borrow().light_slider();
        let value = self.lock_slider().drag(position, control)?;
        Some(self.set_light_intensity(value as i32))
    }

    pub fn slider_release(&self) {
        self.lock_slider().release();
    }

    fn lock_slider(&self) -> MutexGuard<'_, GestureMapper> {
        self.slider.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
