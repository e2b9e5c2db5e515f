//! Conversions from raw device units and pointer positions into display values.

/// Full-scale reading of the 10-bit water-level ADC found on the stock board.
pub const DEFAULT_ADC_MAX: u16 = 1023;

const PERCENT_MAX: u8 = 100;
const SNAP_STEP: u8 = 5;

/// Quantization applied to slider positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// Any integer percentage
    Free,
    /// Nearest multiple of 5
    Snap5,
}

/// Maps raw water-level readings onto a 0-100 percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaterLevelScale {
    adc_max: u16,
}

impl WaterLevelScale {
    pub fn new(adc_max: u16) -> Self {
        Self {
            adc_max: adc_max.max(1),
        }
    }

    pub fn adc_max(&self) -> u16 {
        self.adc_max
    }

    /// Rounds half-up and clamps, so a reading outside the ADC range never
    /// leaves [0, 100].
    pub fn percent(&self, raw: i32) -> u8 {
        let percent = (raw as f64 / self.adc_max as f64 * 100.0).round();
        percent.clamp(0.0, PERCENT_MAX as f64) as u8
    }
}

impl Default for WaterLevelScale {
    fn default() -> Self {
        Self::new(DEFAULT_ADC_MAX)
    }
}

pub fn normalize_water_level(raw: i32) -> u8 {
    WaterLevelScale::default().percent(raw)
}

/// Converts a pointer offset along a track into an intensity percentage.
///
/// Positions outside the track, infinite ones included, clamp to the nearest
/// edge. A NaN position or a degenerate track width yields 0.
pub fn quantize_gesture(position: f32, track_width: f32, step: StepMode) -> u8 {
    if position.is_nan() || track_width.is_nan() || track_width <= 0.0 {
        return 0;
    }

    let raw = (position / track_width * 100.0).round();
    // Only an infinite position on an infinite track gets here as NaN
    let value = if raw.is_nan() {
        0
    } else {
        raw.clamp(0.0, PERCENT_MAX as f32) as u8
    };

    match step {
        StepMode::Free => value,
        StepMode::Snap5 => snap(value),
    }
}

/// Clamps an externally supplied intensity into range.
pub fn clamp_percent(value: i32) -> u8 {
    value.clamp(0, PERCENT_MAX as i32) as u8
}

fn snap(value: u8) -> u8 {
    let steps = (value as f32 / SNAP_STEP as f32).round() as u8;
    steps * SNAP_STEP
}
