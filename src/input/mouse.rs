use crate::config::{MouseAxis, MouseConfig};

use super::{
    state::{AxisId, ChannelState},
    target::TargetMouse,
    SetupError,
};

/// Fractional mouse motion carried over between ticks. After every call to
/// [MouseAccumulator::take_whole] both remainders have a magnitude below 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseAccumulator {
    pub remainder_x: f64,
    pub remainder_y: f64,
}

impl MouseAccumulator {
    /// Add the given motion to the given axis
    pub fn accumulate(&mut self, axis: MouseAxis, amount: f64) {
        match axis {
            MouseAxis::X => self.remainder_x += amount,
            MouseAxis::Y => self.remainder_y += amount,
        }
    }

    /// Remove and return the whole part of the accumulated motion, truncated
    /// toward zero. Only the fractional part is kept.
    pub fn take_whole(&mut self) -> (i32, i32) {
        let move_x = self.remainder_x.trunc();
        let move_y = self.remainder_y.trunc();
        self.remainder_x -= move_x;
        self.remainder_y -= move_y;
        (move_x as i32, move_y as i32)
    }
}

/// Axis to mouse motion mapping resolved against the device channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseBinding {
    pub axis: AxisId,
    pub output: MouseAxis,
    pub gain: f64,
}

/// Converts axis values into relative mouse motion without losing sub-pixel
/// motion to integer truncation
#[derive(Debug, Clone, Default)]
pub struct MouseIntegrator {
    bindings: Vec<MouseBinding>,
    accumulator: MouseAccumulator,
}

impl MouseIntegrator {
    pub fn new(bindings: Vec<MouseBinding>) -> Self {
        Self {
            bindings,
            accumulator: MouseAccumulator::default(),
        }
    }

    /// Resolve the configured axis mappings against the given channel state
    pub fn from_config(config: &MouseConfig, state: &ChannelState) -> Result<Self, SetupError> {
        let mut bindings = Vec::with_capacity(config.axes.len());
        for mapping in config.axes.iter() {
            let axis = state
                .axis_id(&mapping.axis)
                .ok_or_else(|| SetupError::UnknownAxis(mapping.axis.clone()))?;
            bindings.push(MouseBinding {
                axis,
                output: mapping.output,
                gain: mapping.gain,
            });
        }
        Ok(Self::new(bindings))
    }

    #[cfg(test)]
    pub fn accumulator(&self) -> &MouseAccumulator {
        &self.accumulator
    }

    /// Accumulate the motion of every mapped axis and emit the whole part as
    /// a single relative move
    pub fn tick(&mut self, state: &ChannelState, mouse: &mut dyn TargetMouse) {
        if self.bindings.is_empty() {
            return;
        }
        for binding in self.bindings.iter() {
            let value = state.axis_value(binding.axis);
            self.accumulator.accumulate(binding.output, value * binding.gain);
        }

        let (move_x, move_y) = self.accumulator.take_whole();
        if move_x == 0 && move_y == 0 {
            return;
        }
        log::trace!("Mouse move: ({move_x}, {move_y})");
        if let Err(e) = mouse.move_relative(move_x, move_y) {
            log::warn!("Failed to emit mouse motion: {e}");
        }
    }
}
