use crate::normalizer::{StepMode, quantize_gesture};
use crate::state::LightSlider;

/// Tracks one drag on a fixed-width slider track.
///
/// Positions are offsets from the left edge of the track along its primary
/// axis. No velocity or momentum is modelled: each event maps directly to a
/// value.
#[derive(Debug, Clone)]
pub struct GestureMapper {
    track_width: f32,
    engaged: bool,
    value: Option<u8>,
}

impl GestureMapper {
    pub fn new(track_width: f32) -> Self {
        Self {
            track_width,
            engaged: false,
            value: None,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Last value produced by this mapper, if any.
    pub fn value(&self) -> Option<u8> {
        self.value
    }

    /// Pointer down. Returns the new value, or `None` when the control rejects input.
    pub fn press(&mut self, position: f32, control: LightSlider) -> Option<u8> {
        if !Self::accepts(control) {
            return None;
        }

        self.engaged = true;
        self.map(position, control.step)
    }

    /// Pointer move. Ignored unless a press on an enabled control is still engaged.
    pub fn drag(&mut self, position: f32, control: LightSlider) -> Option<u8> {
        if !self.engaged {
            return None;
        }
        if !Self::accepts(control) {
            self.engaged = false;
            return None;
        }

        self.map(position, control.step)
    }

    /// Pointer lifted or left the track.
    pub fn release(&mut self) {
        self.engaged = false;
    }

    fn accepts(control: LightSlider) -> bool {
        control.visible && control.enabled
    }

    fn map(&mut self, position: f32, step: StepMode) -> Option<u8> {
        let value = quantize_gesture(position, self.track_width, step);
        self.value = Some(value);
        Some(value)
    }
}
