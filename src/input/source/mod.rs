use thiserror::Error;

use crate::drivers::joystick::{driver::Driver, event::Event, DriverError};

/// Possible errors while reading from a source device
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Device error: {0}")]
    DeviceError(#[from] DriverError),
}

/// A [SourceInputDevice] is any physical input device that emits input events
pub trait SourceInputDevice {
    /// Poll the device for at most one input event without blocking
    fn poll(&mut self) -> Result<Option<Event>, InputError>;
}

impl SourceInputDevice for Driver {
    fn poll(&mut self) -> Result<Option<Event>, InputError> {
        Ok(Driver::poll(self)?)
    }
}
