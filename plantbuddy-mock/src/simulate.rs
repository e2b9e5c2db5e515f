use std::f64::consts::PI;

use plantbuddy_api::DeviceState;

/// Ticks without watering before the soil switch reads dry.
const SOIL_DRY_AFTER_TICKS: u32 = 600;

const MOONLIGHT_PERCENT: f64 = 1.0;
const SUNRISE_START: f64 = 0.23;
const SUNRISE_END: f64 = 0.27;
const SUNSET_START: f64 = 0.73;
const SUNSET_END: f64 = 0.77;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpEvent {
    Idle,
    Started,
    Running,
    /// The run completed and the request flag was cleared
    Finished,
}

/// Plays the plant pot: consumes pump requests and drifts the sensors.
#[derive(Debug, Clone)]
pub struct Simulator {
    watering_ticks: u32,
    drain_per_tick: i32,
    remaining_ticks: Option<u32>,
    ticks_since_watering: u32,
}

impl Simulator {
    pub fn new(watering_ticks: u32, drain_per_tick: i32) -> Self {
        Self {
            watering_ticks: watering_ticks.max(1),
            drain_per_tick: drain_per_tick.max(0),
            remaining_ticks: None,
            ticks_since_watering: 0,
        }
    }

    pub fn is_pumping(&self) -> bool {
        self.remaining_ticks.is_some()
    }

    /// Advances the device by one tick. `jitter` is added to the light reading.
    pub fn step(&mut self, state: &mut DeviceState, day_fraction: f64, jitter: f64) -> PumpEvent {
        let event = self.step_pump(state);

        let light = (daylight_percent(day_fraction) + jitter).round();
        state.light_level = light.clamp(0.0, 100.0) as i32;
        state.temperature = Some(simulated_temperature(day_fraction));
        state.humidity = Some(simulated_humidity(day_fraction));

        event
    }

    fn step_pump(&mut self, state: &mut DeviceState) -> PumpEvent {
        if !state.is_pump_requested {
            // Flag cleared by someone else mid-run
            self.remaining_ticks = None;
            self.ticks_since_watering = self.ticks_since_watering.saturating_add(1);
            if self.ticks_since_watering >= SOIL_DRY_AFTER_TICKS {
                state.is_soil_moist = false;
            }
            return PumpEvent::Idle;
        }

        let started = self.remaining_ticks.is_none();
        let remaining = self.remaining_ticks.unwrap_or(self.watering_ticks);

        // An empty reservoir ends the run at once
        if state.raw_water_level <= 0 {
            state.raw_water_level = 0;
            return self.finish(state);
        }

        state.raw_water_level = (state.raw_water_level - self.drain_per_tick).max(0);
        state.is_soil_moist = true;
        self.ticks_since_watering = 0;

        match remaining - 1 {
            0 => self.finish(state),
            left => {
                self.remaining_ticks = Some(left);
                if started {
                    PumpEvent::Started
                } else {
                    PumpEvent::Running
                }
            }
        }
    }

    fn finish(&mut self, state: &mut DeviceState) -> PumpEvent {
        state.is_pump_requested = false;
        self.remaining_ticks = None;
        PumpEvent::Finished
    }
}

/// Light level in percent over a day: ramps at dawn and dusk, faint at night.
pub fn daylight_percent(day_fraction: f64) -> f64 {
    if !(SUNRISE_START..=SUNSET_END).contains(&day_fraction) {
        return MOONLIGHT_PERCENT;
    }

    if day_fraction <= SUNRISE_END {
        let phase = (day_fraction - SUNRISE_START) / (SUNRISE_END - SUNRISE_START);
        MOONLIGHT_PERCENT.max((phase * PI / 2.0).sin() * 100.0)
    } else if day_fraction >= SUNSET_START {
        let phase = (day_fraction - SUNSET_START) / (SUNSET_END - SUNSET_START);
        MOONLIGHT_PERCENT.max((phase * PI / 2.0).cos() * 100.0)
    } else {
        100.0
    }
}

/// Air temperature peaking mid-afternoon.
pub fn simulated_temperature(day_fraction: f64) -> f32 {
    let radians = (day_fraction - 0.375) * 2.0 * PI;
    ((18.0 + radians.sin() * 6.0) * 10.0).round() as f32 / 10.0
}

/// Relative humidity, lowest when the air is warmest.
pub fn simulated_humidity(day_fraction: f64) -> f32 {
    let radians = (day_fraction - 0.375) * 2.0 * PI;
    (60.0 - radians.sin() * 15.0).round() as f32
}
