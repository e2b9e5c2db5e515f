use std::env;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use plantbuddy_api::Id;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::normalizer::WaterLevelScale;

/// Environment variable naming a settings file layered over the compiled-in default.
pub const CONFIG_ENV: &str = "PLANTBUDDY_CONFIG";

/// Prefix of single-value overrides, e.g. `PLANTBUDDY_REMOTE__BASE_URL`.
pub const ENV_PREFIX: &str = "PLANTBUDDY";

const DEFAULT_SETTINGS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../",
    "configs/default.toml"
));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Remote {
    pub base_url: String,
    pub table: String,
    /// Per-request timeout. Absent means requests may hang indefinitely.
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: Id,
    /// Full-scale reading of the water-level ADC
    pub adc_max: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polling {
    pub telemetry_interval_ms: u64,
    pub pump_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Controls {
    /// Width of the intensity slider track, in the renderer's pointer units
    pub slider_width: f32,
    /// Also write the light mode to the remote store on every cycle
    pub persist_light_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub remote: Remote,
    pub device: Device,
    #[serde(default)]
    pub polling: Polling,
    #[serde(default)]
    pub controls: Controls,
}

impl Settings {
    /// Compiled-in default, then the file named by `PLANTBUDDY_CONFIG`, then
    /// `PLANTBUDDY_*` environment variables.
    pub fn new() -> Result<Self> {
        let path = env::var(CONFIG_ENV).ok();
        Self::load(path.as_deref(), environment())
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    fn load(path: Option<&str>, environment: Environment) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));

        if let Some(path) = path {
            tracing::debug!("Loading settings from {}", path);
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder.add_source(environment).build()?.try_deserialize()?;

        Ok(settings)
    }

    pub fn water_level_scale(&self) -> WaterLevelScale {
        WaterLevelScale::new(self.device.adc_max)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Polling {
    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_millis(self.telemetry_interval_ms)
    }

    pub fn pump_interval(&self) -> Duration {
        Duration::from_millis(self.pump_interval_ms)
    }
}

impl Remote {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            telemetry_interval_ms: 10_000,
            pump_interval_ms: 3_000,
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            slider_width: 300.0,
            persist_light_mode: false,
        }
    }
}
