use std::collections::HashMap;

use crate::drivers::joystick::{event::Event, names::canonical_axis_name};

/// Identifier of an axis slot, resolved once from the axis name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisId(usize);

/// Identifier of a button slot, resolved once from the button name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonId(usize);

/// Latest known value of a named axis, normalized between -1.0 and 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct AxisReading {
    pub name: String,
    pub value: f64,
}

/// Latest known state of a named button
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonReading {
    pub name: String,
    pub pressed: bool,
}

/// A change applied to the [ChannelState]
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Axis(AxisId, f64),
    Button(ButtonId, bool),
}

/// Latest value of every axis and button exposed by the device. Device
/// indices that share a name share a single slot.
#[derive(Debug, Clone, Default)]
pub struct ChannelState {
    axes: Vec<AxisReading>,
    buttons: Vec<ButtonReading>,
    /// Device axis index to axis slot
    axis_map: Vec<AxisId>,
    /// Device button index to button slot
    button_map: Vec<ButtonId>,
    axis_ids: HashMap<String, AxisId>,
    button_ids: HashMap<String, ButtonId>,
}

impl ChannelState {
    /// Create a new channel state from the axis and button names of a
    /// device, in device index order. Every value starts at rest.
    pub fn new(axis_names: &[String], button_names: &[String]) -> Self {
        let mut state = Self::default();
        for name in axis_names {
            let id = match state.axis_ids.get(name) {
                Some(id) => *id,
                None => {
                    let id = AxisId(state.axes.len());
                    state.axes.push(AxisReading {
                        name: name.clone(),
                        value: 0.0,
                    });
                    state.axis_ids.insert(name.clone(), id);
                    id
                }
            };
            state.axis_map.push(id);
        }
        for name in button_names {
            let id = match state.button_ids.get(name) {
                Some(id) => *id,
                None => {
                    let id = ButtonId(state.buttons.len());
                    state.buttons.push(ButtonReading {
                        name: name.clone(),
                        pressed: false,
                    });
                    state.button_ids.insert(name.clone(), id);
                    id
                }
            };
            state.button_map.push(id);
        }

        state
    }

    /// Look up the axis with the given name
    pub fn axis_id(&self, name: &str) -> Option<AxisId> {
        self.axis_ids.get(canonical_axis_name(name)).copied()
    }

    /// Look up the button with the given name
    pub fn button_id(&self, name: &str) -> Option<ButtonId> {
        self.button_ids.get(name).copied()
    }

    pub fn axis(&self, id: AxisId) -> &AxisReading {
        &self.axes[id.0]
    }

    pub fn button(&self, id: ButtonId) -> &ButtonReading {
        &self.buttons[id.0]
    }

    /// Returns the current value of the given axis
    pub fn axis_value(&self, id: AxisId) -> f64 {
        self.axes[id.0].value
    }

    /// Returns whether or not the given button is currently pressed
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.buttons[id.0].pressed
    }

    #[cfg(test)]
    pub fn axes(&self) -> &[AxisReading] {
        &self.axes
    }

    #[cfg(test)]
    pub fn buttons(&self) -> &[ButtonReading] {
        &self.buttons
    }

    /// Set the value of the given axis directly
    pub fn set_axis(&mut self, id: AxisId, value: f64) {
        self.axes[id.0].value = value;
    }

    /// Set the state of the given button directly
    pub fn set_button(&mut self, id: ButtonId, pressed: bool) {
        self.buttons[id.0].pressed = pressed;
    }

    /// Apply the given decoded event. Events for device indices outside of
    /// the known axis or button maps are ignored.
    pub fn apply(&mut self, event: &Event) -> Option<Update> {
        let initial = if event.is_initial() { "(initial) " } else { "" };
        match event {
            Event::Axis(axis) => {
                let Some(id) = self.axis_map.get(axis.index as usize).copied() else {
                    log::trace!("{initial}Ignoring event for unmapped axis {}", axis.index);
                    return None;
                };
                self.set_axis(id, axis.value);
                Some(Update::Axis(id, axis.value))
            }
            Event::Button(button) => {
                let Some(id) = self.button_map.get(button.index as usize).copied() else {
                    log::trace!(
                        "{initial}Ignoring event for unmapped button {}",
                        button.index
                    );
                    return None;
                };
                self.set_button(id, button.pressed);
                Some(Update::Button(id, button.pressed))
            }
        }
    }
}
