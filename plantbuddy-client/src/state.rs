use plantbuddy_api::{DeviceState, LightMode};
use time::OffsetDateTime;

use crate::normalizer::{StepMode, WaterLevelScale, clamp_percent};

// Defaults shown before the first successful poll
const INITIAL_WATER_LEVEL: u8 = 78;
const INITIAL_LIGHT_INTENSITY: u8 = 65;

/// A value that may be assumed locally before the remote store confirms it.
///
/// The optimistic value is shown while present. It is only cleared by a
/// confirmation read after the write that backs it has settled, so neither a
/// poll racing the write nor a late rollback can flip the shown value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confirmable<T> {
    confirmed: T,
    optimistic: Option<T>,
    in_flight: bool,
    epoch: u64,
}

impl<T: Copy> Confirmable<T> {
    pub fn new(confirmed: T) -> Self {
        Self {
            confirmed,
            optimistic: None,
            in_flight: false,
            epoch: 0,
        }
    }

    pub fn value(&self) -> T {
        self.optimistic.unwrap_or(self.confirmed)
    }

    pub fn confirmed(&self) -> T {
        self.confirmed
    }

    pub fn is_optimistic(&self) -> bool {
        self.optimistic.is_some()
    }

    /// Bumped by every assume, settle and rollback. A reader captures it
    /// before fetching and hands it back to [`confirm`](Self::confirm).
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Shows `value` until confirmed; the backing write is in flight.
    pub fn assume(&mut self, value: T) {
        self.optimistic = Some(value);
        self.in_flight = true;
        self.epoch += 1;
    }

    /// The backing write reached the store.
    pub fn settle(&mut self) {
        self.in_flight = false;
        self.epoch += 1;
    }

    /// Records a value read from the store. `observed_epoch` is the epoch seen
    /// when the read started; reads older than the last settle only update the
    /// confirmed value.
    pub fn confirm(&mut self, value: T, observed_epoch: u64) {
        self.confirmed = value;
        if !self.in_flight && observed_epoch == self.epoch {
            self.optimistic = None;
        }
    }

    pub fn rollback(&mut self) {
        self.optimistic = None;
        self.in_flight = false;
        self.epoch += 1;
    }
}

/// Per-session state rendered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalUiState {
    pub water_level_percent: u8,
    pub light_intensity_percent: u8,
    pub soil_moist: bool,
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
    pub light_mode: LightMode,
    pub is_watering: Confirmable<bool>,
    /// Time of the last successful telemetry refresh
    pub last_telemetry_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpButton {
    pub enabled: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSlider {
    pub visible: bool,
    pub enabled: bool,
    pub step: StepMode,
}

impl LocalUiState {
    pub fn watering(&self) -> bool {
        self.is_watering.value()
    }

    /// Overwrites the telemetry fields from a fresh store snapshot.
    pub fn apply_telemetry(&mut self, device: &DeviceState, scale: &WaterLevelScale) {
        self.water_level_percent = scale.percent(device.raw_water_level);
        self.light_intensity_percent = clamp_percent(device.light_level);
        self.soil_moist = device.is_soil_moist;
        if device.temperature.is_some() {
            self.temperature = device.temperature;
        }
        if device.humidity.is_some() {
            self.humidity = device.humidity;
        }
        self.last_telemetry_at = Some(OffsetDateTime::now_utc());
    }

    pub fn pump_button(&self) -> PumpButton {
        if self.watering() {
            PumpButton {
                enabled: false,
                label: "Watering...",
            }
        } else {
            PumpButton {
                enabled: true,
                label: "Water Now",
            }
        }
    }

    /// Slider is hidden in Auto, greyed out in Off and snaps to 5% in On.
    pub fn light_slider(&self) -> LightSlider {
        match self.light_mode {
            LightMode::Auto => LightSlider {
                visible: false,
                enabled: false,
                step: StepMode::Free,
            },
            LightMode::On => LightSlider {
                visible: true,
                enabled: true,
                step: StepMode::Snap5,
            },
            LightMode::Off => LightSlider {
                visible: true,
                enabled: false,
                step: StepMode::Free,
            },
        }
    }

    pub fn soil_label(&self) -> &'static str {
        if self.soil_moist { "Moist" } else { "Dry" }
    }
}

impl Default for LocalUiState {
    fn default() -> Self {
        Self {
            water_level_percent: INITIAL_WATER_LEVEL,
            light_intensity_percent: INITIAL_LIGHT_INTENSITY,
            soil_moist: true,
            temperature: None,
            humidity: None,
            light_mode: LightMode::Auto,
            is_watering: Confirmable::new(false),
            last_telemetry_at: None,
        }
    }
}
