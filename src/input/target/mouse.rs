use std::error::Error;

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, KeyCode, RelativeAxisCode, SynchronizationCode,
    SynchronizationEvent,
};
use serde::{Deserialize, Serialize};

use super::{OutputError, TargetMouse};

/// Buttons the virtual mouse can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Side,
    Extra,
}

impl MouseButton {
    /// Returns the evdev key code for this button
    pub fn key_code(&self) -> KeyCode {
        match self {
            MouseButton::Left => KeyCode::BTN_LEFT,
            MouseButton::Right => KeyCode::BTN_RIGHT,
            MouseButton::Middle => KeyCode::BTN_MIDDLE,
            MouseButton::Side => KeyCode::BTN_SIDE,
            MouseButton::Extra => KeyCode::BTN_EXTRA,
        }
    }
}

/// Virtual mouse that emits relative motion and button events through uinput
pub struct MouseDevice {
    device: VirtualDevice,
}

impl MouseDevice {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        log::debug!("Creating virtual mouse");
        let device = MouseDevice::create_virtual_device()?;
        Ok(Self { device })
    }

    /// Create the virtual device to emulate
    fn create_virtual_device() -> Result<VirtualDevice, Box<dyn Error>> {
        let mut buttons = AttributeSet::<KeyCode>::new();
        buttons.insert(KeyCode::BTN_LEFT);
        buttons.insert(KeyCode::BTN_RIGHT);
        buttons.insert(KeyCode::BTN_MIDDLE);
        buttons.insert(KeyCode::BTN_SIDE);
        buttons.insert(KeyCode::BTN_EXTRA);

        let device = VirtualDeviceBuilder::new()?
            .name("joypwm Mouse")
            .with_keys(&buttons)?
            .with_relative_axes(&AttributeSet::from_iter([
                RelativeAxisCode::REL_X,
                RelativeAxisCode::REL_Y,
            ]))?
            .build()?;

        Ok(device)
    }

    /// Emit the given events followed by a sync report
    fn write_events(&mut self, events: &[InputEvent]) -> Result<(), OutputError> {
        self.device.emit(events)?;
        self.device
            .emit(&[SynchronizationEvent::new(SynchronizationCode::SYN_REPORT, 0).into()])?;
        Ok(())
    }
}

impl TargetMouse for MouseDevice {
    fn move_relative(&mut self, dx: i32, dy: i32) -> Result<(), OutputError> {
        let mut events = Vec::with_capacity(2);
        if dx != 0 {
            events.push(InputEvent::new(
                EventType::RELATIVE.0,
                RelativeAxisCode::REL_X.0,
                dx,
            ));
        }
        if dy != 0 {
            events.push(InputEvent::new(
                EventType::RELATIVE.0,
                RelativeAxisCode::REL_Y.0,
                dy,
            ));
        }
        if events.is_empty() {
            return Ok(());
        }
        self.write_events(events.as_slice())
    }

    fn press(&mut self, button: MouseButton) -> Result<(), OutputError> {
        let event = InputEvent::new(EventType::KEY.0, button.key_code().0, 1);
        self.write_events(&[event])
    }

    fn release(&mut self, button: MouseButton) -> Result<(), OutputError> {
        let event = InputEvent::new(EventType::KEY.0, button.key_code().0, 0);
        self.write_events(&[event])
    }
}

impl std::fmt::Debug for MouseDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MouseDevice").finish()
    }
}
