pub mod keyboard;
pub mod keys;
pub mod mouse;
#[cfg(test)]
pub mod recorder;

use std::io;

use evdev::KeyCode;
use thiserror::Error;

use self::mouse::MouseButton;

/// Possible errors while emitting events to a target device
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to emit event: {0}")]
    IoError(#[from] io::Error),
}

/// A [TargetKeyboard] is any device that can emit key presses and releases
pub trait TargetKeyboard {
    /// Press the given key
    fn press(&mut self, key: KeyCode) -> Result<(), OutputError>;
    /// Release the given key
    fn release(&mut self, key: KeyCode) -> Result<(), OutputError>;
}

/// A [TargetMouse] is any device that can emit relative motion and mouse
/// button presses and releases
pub trait TargetMouse {
    /// Move the pointer by the given relative amount
    fn move_relative(&mut self, dx: i32, dy: i32) -> Result<(), OutputError>;
    /// Press the given mouse button
    fn press(&mut self, button: MouseButton) -> Result<(), OutputError>;
    /// Release the given mouse button
    fn release(&mut self, button: MouseButton) -> Result<(), OutputError>;
}

/// Collection of target devices that translated events are written to
pub struct Targets<'a> {
    pub keyboard: &'a mut dyn TargetKeyboard,
    pub mouse: &'a mut dyn TargetMouse,
}
