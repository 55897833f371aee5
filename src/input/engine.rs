use std::time::Duration;

use evdev::KeyCode;

use crate::{config::Config, drivers::joystick::event::Event};

use super::{
    buttons::ButtonPassthrough,
    mouse::MouseIntegrator,
    pwm::PwmKeyEmulator,
    state::{ChannelState, Update},
    target::Targets,
    SetupError,
};

/// Owns the channel state and every translator driven from it. One call to
/// [Engine::tick] advances all translators by the elapsed time.
#[derive(Debug, Clone)]
pub struct Engine {
    state: ChannelState,
    pwm: PwmKeyEmulator,
    mouse: MouseIntegrator,
    buttons: ButtonPassthrough,
}

impl Engine {
    /// Create a new engine for the given device channels. Fails if any
    /// mapping references an axis, button or key that does not exist.
    pub fn new(config: &Config, state: ChannelState) -> Result<Self, SetupError> {
        let pwm = PwmKeyEmulator::from_config(&config.pwm, &state)?;
        let mouse = MouseIntegrator::from_config(&config.mouse, &state)?;
        let buttons = ButtonPassthrough::from_config(&config.mouse, &state)?;

        Ok(Self {
            state,
            pwm,
            mouse,
            buttons,
        })
    }

    pub fn state(&self) -> &ChannelState {
        &self.state
    }

    #[cfg(test)]
    pub fn pwm(&self) -> &PwmKeyEmulator {
        &self.pwm
    }

    #[cfg(test)]
    pub fn mouse(&self) -> &MouseIntegrator {
        &self.mouse
    }

    /// Returns every key the engine may press
    pub fn keys(&self) -> Vec<KeyCode> {
        self.pwm.keys()
    }

    /// Apply a decoded device event to the channel state
    pub fn apply(&mut self, event: &Event) -> Option<Update> {
        self.state.apply(event)
    }

    /// Advance every translator by the given elapsed time
    pub fn tick(&mut self, delta: Duration, targets: &mut Targets) {
        let delta = delta.as_secs_f64();
        self.pwm.tick(delta, &self.state, targets.keyboard);
        self.mouse.tick(&self.state, targets.mouse);
        self.buttons.tick(&self.state, targets.mouse);
    }

    /// Release every held key and mouse button
    pub fn shutdown(&mut self, targets: &mut Targets) {
        log::debug!("Releasing all held keys and buttons");
        self.pwm.release_all(targets.keyboard);
        self.buttons.release_all(targets.mouse);
    }
}
