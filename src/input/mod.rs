pub mod buttons;
pub mod engine;
pub mod mouse;
pub mod pwm;
#[cfg(test)]
mod pwm_test;
pub mod scheduler;
pub mod source;
pub mod state;
pub mod target;

use thiserror::Error;

/// Possible errors resolving the configured mappings against a device
#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("Mapping references axis '{0}' which the device does not have")]
    UnknownAxis(String),
    #[error("Mapping references button '{0}' which the device does not have")]
    UnknownButton(String),
    #[error("Unknown key name '{0}'")]
    UnknownKey(String),
}
