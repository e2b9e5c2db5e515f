use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightMode {
    /// Device decides from the ambient light reading
    #[default]
    Auto,
    /// Grow light forced on, intensity set by the user
    On,
    /// Grow light forced off
    Off,
}

impl LightMode {
    /// Transition table for the light button: Auto -> On -> Off -> Auto.
    pub fn next(self) -> Self {
        match self {
            LightMode::Auto => LightMode::On,
            LightMode::On => LightMode::Off,
            LightMode::Off => LightMode::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LightMode::Auto => "Auto",
            LightMode::On => "On",
            LightMode::Off => "Off",
        }
    }
}

impl fmt::Display for LightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_returns_to_start() {
        let mut mode = LightMode::Auto;
        mode = mode.next();
        assert_eq!(mode, LightMode::On);
        mode = mode.next();
        assert_eq!(mode, LightMode::Off);
        mode = mode.next();
        assert_eq!(mode, LightMode::Auto);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&LightMode::On).unwrap(), "\"On\"");
        assert_eq!(
            serde_json::from_str::<LightMode>("\"Off\"").unwrap(),
            LightMode::Off
        );
        assert_eq!(LightMode::Auto.to_string(), "Auto");
    }
}
