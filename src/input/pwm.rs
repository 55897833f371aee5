use evdev::KeyCode;

use crate::config::PwmConfig;

use super::{
    state::{AxisId, ChannelState},
    target::{keys::key_from_name, TargetKeyboard},
    SetupError,
};

/// Timing parameters shared by every PWM channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwmSettings {
    /// Length of one PWM period in seconds
    pub period: f64,
    /// Axis magnitude at or below which no key is pressed
    pub deadzone: f64,
}

impl From<&PwmConfig> for PwmSettings {
    fn from(config: &PwmConfig) -> Self {
        Self {
            period: config.period(),
            deadzone: config.deadzone,
        }
    }
}

/// Phase of a [PwmChannel] within the current period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for the axis to leave the deadzone
    #[default]
    Idle,
    /// A key is held for this channel
    Pressed,
    /// The pulse for this period is over
    WaitingForPeriodEnd,
}

/// Key change requested by a [PwmChannel]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(KeyCode),
    Release(KeyCode),
}

/// Keys pulsed for each sign of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    pub negative: KeyCode,
    pub positive: KeyCode,
}

impl KeyPair {
    /// Returns the key for the sign of the given value
    pub fn for_value(&self, value: f64) -> KeyCode {
        if value < 0.0 {
            self.negative
        } else {
            self.positive
        }
    }
}

/// State machine that turns the magnitude of an axis into the duty cycle of
/// a key press within a fixed period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PwmChannel {
    /// Seconds elapsed since the current period started
    period_elapsed: f64,
    phase: Phase,
    /// Key pressed at the start of the pulse. Always the key that gets released.
    held: Option<KeyCode>,
}

impl PwmChannel {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn held(&self) -> Option<KeyCode> {
        self.held
    }

    #[cfg(test)]
    pub fn period_elapsed(&self) -> f64 {
        self.period_elapsed
    }

    /// Advance the channel by `delta` seconds with the current axis value and
    /// return the key changes to emit, in order.
    pub fn advance(
        &mut self,
        delta: f64,
        value: f64,
        keys: &KeyPair,
        settings: &PwmSettings,
    ) -> Vec<KeyAction> {
        let mut actions = Vec::new();
        let magnitude = value.abs();

        self.period_elapsed += delta;

        // A new period always starts idle, even if the previous pulse never
        // released. At full deflection this keeps the key down across periods.
        if self.period_elapsed >= settings.period {
            self.period_elapsed = 0.0;
            self.phase = Phase::Idle;
        }

        if self.phase == Phase::Idle {
            if magnitude > settings.deadzone {
                let key = keys.for_value(value);
                // At most one key per channel may be held
                if let Some(held) = self.held.filter(|held| *held != key) {
                    actions.push(KeyAction::Release(held));
                }
                actions.push(KeyAction::Press(key));
                self.held = Some(key);
                self.phase = Phase::Pressed;
            } else if let Some(held) = self.held.take() {
                actions.push(KeyAction::Release(held));
            }
        }

        if self.phase == Phase::Pressed && self.period_elapsed > magnitude * settings.period {
            if let Some(held) = self.held.take() {
                actions.push(KeyAction::Release(held));
            }
            self.phase = Phase::WaitingForPeriodEnd;
        }

        actions
    }

    /// Release the held key, if any, and return to idle
    pub fn reset(&mut self) -> Option<KeyAction> {
        self.period_elapsed = 0.0;
        self.phase = Phase::Idle;
        self.held.take().map(KeyAction::Release)
    }
}

/// Axis to keys mapping resolved against the device channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwmBinding {
    pub axis: AxisId,
    pub keys: KeyPair,
}

/// Drives one [PwmChannel] per configured axis to keys mapping
#[derive(Debug, Clone)]
pub struct PwmKeyEmulator {
    settings: PwmSettings,
    channels: Vec<(PwmBinding, PwmChannel)>,
}

impl PwmKeyEmulator {
    /// Create a new emulator with the given bindings
    pub fn new(settings: PwmSettings, bindings: Vec<PwmBinding>) -> Self {
        let channels = bindings
            .into_iter()
            .map(|binding| (binding, PwmChannel::new()))
            .collect();
        Self { settings, channels }
    }

    /// Resolve the configured mappings against the given channel state
    pub fn from_config(config: &PwmConfig, state: &ChannelState) -> Result<Self, SetupError> {
        let mut bindings = Vec::with_capacity(config.mappings.len());
        for mapping in config.mappings.iter() {
            let axis = state
                .axis_id(&mapping.axis)
                .ok_or_else(|| SetupError::UnknownAxis(mapping.axis.clone()))?;
            let negative = key_from_name(&mapping.negative_key)
                .ok_or_else(|| SetupError::UnknownKey(mapping.negative_key.clone()))?;
            let positive = key_from_name(&mapping.positive_key)
                .ok_or_else(|| SetupError::UnknownKey(mapping.positive_key.clone()))?;
            bindings.push(PwmBinding {
                axis,
                keys: KeyPair { negative, positive },
            });
        }

        Ok(Self::new(config.into(), bindings))
    }

    /// Returns every key this emulator may press
    pub fn keys(&self) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> = self
            .channels
            .iter()
            .flat_map(|(binding, _)| [binding.keys.negative, binding.keys.positive])
            .collect();
        keys.sort_by_key(|key| key.0);
        keys.dedup();
        keys
    }

    /// Returns the channel bound to the given axis
    #[cfg(test)]
    pub fn channel(&self, axis: AxisId) -> Option<&PwmChannel> {
        self.channels
            .iter()
            .find(|(binding, _)| binding.axis == axis)
            .map(|(_, channel)| channel)
    }

    /// Advance every channel by `delta` seconds and emit the resulting key
    /// events
    pub fn tick(&mut self, delta: f64, state: &ChannelState, keyboard: &mut dyn TargetKeyboard) {
        for (binding, channel) in self.channels.iter_mut() {
            let value = state.axis_value(binding.axis);
            for action in channel.advance(delta, value, &binding.keys, &self.settings) {
                log::trace!("{}: {action:?}", state.axis(binding.axis).name);
                emit(keyboard, action);
            }
        }
    }

    /// Release every held key
    pub fn release_all(&mut self, keyboard: &mut dyn TargetKeyboard) {
        for (_, channel) in self.channels.iter_mut() {
            if let Some(action) = channel.reset() {
                emit(keyboard, action);
            }
        }
    }
}

fn emit(keyboard: &mut dyn TargetKeyboard, action: KeyAction) {
    let result = match action {
        KeyAction::Press(key) => keyboard.press(key),
        KeyAction::Release(key) => keyboard.release(key),
    };
    if let Err(e) = result {
        log::warn!("Failed to emit {action:?}: {e}");
    }
}
