use crate::config::MouseConfig;

use super::{
    state::{ButtonId, ChannelState},
    target::{mouse::MouseButton, TargetMouse},
    SetupError,
};

/// Button to mouse button mapping resolved against the device channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonBinding {
    pub button: ButtonId,
    pub mouse_button: MouseButton,
}

/// Mirrors joystick buttons onto mouse buttons. A press or release is only
/// emitted when the source button differs from the last emitted state, so
/// repeating the same state is a no-op.
#[derive(Debug, Clone, Default)]
pub struct ButtonPassthrough {
    bindings: Vec<(ButtonBinding, bool)>,
}

impl ButtonPassthrough {
    pub fn new(bindings: Vec<ButtonBinding>) -> Self {
        let bindings = bindings.into_iter().map(|b| (b, false)).collect();
        Self { bindings }
    }

    /// Resolve the configured button mappings against the given channel state
    pub fn from_config(config: &MouseConfig, state: &ChannelState) -> Result<Self, SetupError> {
        let mut bindings = Vec::with_capacity(config.buttons.len());
        for mapping in config.buttons.iter() {
            let button = state
                .button_id(&mapping.button)
                .ok_or_else(|| SetupError::UnknownButton(mapping.button.clone()))?;
            bindings.push(ButtonBinding {
                button,
                mouse_button: mapping.mouse_button,
            });
        }
        Ok(Self::new(bindings))
    }

    /// Emit a press or release for every mapped button whose state changed
    pub fn tick(&mut self, state: &ChannelState, mouse: &mut dyn TargetMouse) {
        for (binding, emitted) in self.bindings.iter_mut() {
            let pressed = state.is_pressed(binding.button);
            if pressed == *emitted {
                continue;
            }
            log::debug!(
                "{} -> {:?} {}",
                state.button(binding.button).name,
                binding.mouse_button,
                if pressed { "pressed" } else { "released" }
            );
            let result = if pressed {
                mouse.press(binding.mouse_button)
            } else {
                mouse.release(binding.mouse_button)
            };
            match result {
                Ok(_) => *emitted = pressed,
                Err(e) => log::warn!("Failed to emit {:?}: {e}", binding.mouse_button),
            }
        }
    }

    /// Release every mouse button that is currently pressed
    pub fn release_all(&mut self, mouse: &mut dyn TargetMouse) {
        for (binding, emitted) in self.bindings.iter_mut() {
            if !*emitted {
                continue;
            }
            if let Err(e) = mouse.release(binding.mouse_button) {
                log::warn!("Failed to release {:?}: {e}", binding.mouse_button);
            }
            *emitted = false;
        }
    }
}
