pub mod driver;
pub mod event;
pub mod js_event;
#[cfg(test)]
mod js_event_test;
pub mod names;

use std::io;

use thiserror::Error;

/// Possible errors opening or reading a joystick device
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Could not read device: {0}")]
    IoError(#[from] io::Error),
    #[error("Device control call failed: {0}")]
    IoctlError(#[from] nix::Error),
    #[error("Invalid event size: {0} bytes")]
    InvalidPacketSize(usize),
    #[error("Unable to unpack event: {0}")]
    UnpackError(#[from] packed_struct::PackingError),
}
