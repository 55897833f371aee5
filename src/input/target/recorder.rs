use std::collections::HashSet;

use evdev::KeyCode;

use super::{mouse::MouseButton, OutputError, TargetKeyboard, TargetMouse};

/// Output event captured by the [Recorder]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputEvent {
    KeyPress(KeyCode),
    KeyRelease(KeyCode),
    MouseMove(i32, i32),
    MousePress(MouseButton),
    MouseRelease(MouseButton),
}

/// Target device that records every emitted event and tracks which keys are
/// currently held
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<OutputEvent>,
    pub held_keys: HashSet<KeyCode>,
    pub held_buttons: HashSet<MouseButton>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events and clears the log
    pub fn take(&mut self) -> Vec<OutputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sum of every relative mouse motion emitted
    pub fn total_motion(&self) -> (i32, i32) {
        self.events.iter().fold((0, 0), |(x, y), event| match event {
            OutputEvent::MouseMove(dx, dy) => (x + dx, y + dy),
            _ => (x, y),
        })
    }

    /// Number of key and mouse button events emitted
    pub fn button_event_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| !matches!(event, OutputEvent::MouseMove(..)))
            .count()
    }
}

impl TargetKeyboard for Recorder {
    fn press(&mut self, key: KeyCode) -> Result<(), OutputError> {
        self.held_keys.insert(key);
        self.events.push(OutputEvent::KeyPress(key));
        Ok(())
    }

    fn release(&mut self, key: KeyCode) -> Result<(), OutputError> {
        self.held_keys.remove(&key);
        self.events.push(OutputEvent::KeyRelease(key));
        Ok(())
    }
}

impl TargetMouse for Recorder {
    fn move_relative(&mut self, dx: i32, dy: i32) -> Result<(), OutputError> {
        self.events.push(OutputEvent::MouseMove(dx, dy));
        Ok(())
    }

    fn press(&mut self, button: MouseButton) -> Result<(), OutputError> {
        self.held_buttons.insert(button);
        self.events.push(OutputEvent::MousePress(button));
        Ok(())
    }

    fn release(&mut self, button: MouseButton) -> Result<(), OutputError> {
        self.held_buttons.remove(&button);
        self.events.push(OutputEvent::MouseRelease(button));
        Ok(())
    }
}
