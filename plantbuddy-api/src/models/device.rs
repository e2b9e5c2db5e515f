use serde::{Deserialize, Serialize};

use super::LightMode;

/// One row of the shared device-state store.
///
/// Field names on the wire follow the store's columns; the remote store
/// owns this record and both the device and any number of clients write it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Raw water-level reading in device ADC units
    #[serde(rename = "water_level")]
    pub raw_water_level: i32,
    /// Light level percentage (0-100)
    pub light_level: i32,
    /// Soil moisture switch
    #[serde(rename = "is_moist")]
    pub is_soil_moist: bool,
    /// Set by a client to request a watering run, cleared by the device once done
    #[serde(rename = "is_button_pump")]
    pub is_pump_requested: bool,
    /// Air temperature in Celsius, when the device reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Relative humidity percentage, when the device reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f32>,
    /// Persisted light mode, only written by clients that share it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_mode: Option<LightMode>,
}

/// Partial update of a [`DeviceState`]. Only `Some` fields are sent and applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatePatch {
    #[serde(rename = "water_level", default, skip_serializing_if = "Option::is_none")]
    pub raw_water_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_level: Option<i32>,
    #[serde(rename = "is_moist", default, skip_serializing_if = "Option::is_none")]
    pub is_soil_moist: Option<bool>,
    #[serde(rename = "is_button_pump", default, skip_serializing_if = "Option::is_none")]
    pub is_pump_requested: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_mode: Option<LightMode>,
}

impl DeviceStatePatch {
    pub fn pump_requested(requested: bool) -> Self {
        Self {
            is_pump_requested: Some(requested),
            ..Default::default()
        }
    }

    pub fn light_mode(mode: LightMode) -> Self {
        Self {
            light_mode: Some(mode),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl DeviceState {
    /// Applies the named fields of `patch`, leaving every other field untouched.
    pub fn apply(&mut self, patch: &DeviceStatePatch) {
        if let Some(value) = patch.raw_water_level {
            self.raw_water_level = value;
        }
        if let Some(value) = patch.light_level {
            self.light_level = value;
        }
        if let Some(value) = patch.is_soil_moist {
            self.is_soil_moist = value;
        }
        if let Some(value) = patch.is_pump_requested {
            self.is_pump_requested = value;
        }
        if patch.temperature.is_some() {
            self.temperature = patch.temperature;
        }
        if patch.humidity.is_some() {
            self.humidity = patch.humidity;
        }
        if patch.light_mode.is_some() {
            self.light_mode = patch.light_mode;
        }
    }
}
