use std::{collections::HashSet, error::Error};

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, KeyCode, SynchronizationCode, SynchronizationEvent,
};

use super::{OutputError, TargetKeyboard};

/// Virtual keyboard that emits key events through uinput. Only the keys the
/// device was created with can be emitted.
pub struct KeyboardDevice {
    device: VirtualDevice,
    keys: HashSet<KeyCode>,
}

impl KeyboardDevice {
    /// Create a new virtual keyboard capable of emitting the given keys
    pub fn new(keys: &[KeyCode]) -> Result<Self, Box<dyn Error>> {
        log::debug!("Creating virtual keyboard");
        let device = KeyboardDevice::create_virtual_device(keys)?;
        Ok(Self {
            device,
            keys: keys.iter().copied().collect(),
        })
    }

    /// Create the virtual device to emulate
    fn create_virtual_device(keys: &[KeyCode]) -> Result<VirtualDevice, Box<dyn Error>> {
        let mut key_set = AttributeSet::<KeyCode>::new();
        for key in keys {
            key_set.insert(*key);
        }

        let device = VirtualDeviceBuilder::new()?
            .name("joypwm Keyboard")
            .with_keys(&key_set)?
            .build()?;

        Ok(device)
    }

    /// Emit the given key value followed by a sync report
    fn write_key(&mut self, key: KeyCode, value: i32) -> Result<(), OutputError> {
        if !self.keys.contains(&key) {
            log::warn!("Key {key:?} is not supported by the virtual keyboard");
            return Ok(());
        }
        let event = InputEvent::new(EventType::KEY.0, key.0, value);
        self.device.emit(&[event])?;
        self.device
            .emit(&[SynchronizationEvent::new(SynchronizationCode::SYN_REPORT, 0).into()])?;
        Ok(())
    }
}

impl TargetKeyboard for KeyboardDevice {
    fn press(&mut self, key: KeyCode) -> Result<(), OutputError> {
        self.write_key(key, 1)
    }

    fn release(&mut self, key: KeyCode) -> Result<(), OutputError> {
        self.write_key(key, 0)
    }
}

impl std::fmt::Debug for KeyboardDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardDevice")
            .field("keys", &self.keys)
            .finish()
    }
}
