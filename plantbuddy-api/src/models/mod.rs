mod control;
mod device;

pub use control::*;
pub use device::*;

/// Identifier of the single device record a session controls.
pub type Id = i32;
