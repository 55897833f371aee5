use packed_struct::types::SizedInteger;

use super::js_event::{JsEventRecord, AXIS_MAX};

/// Events that can be decoded from a joystick device
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Axis(AxisEvent),
    Button(ButtonEvent),
}

impl Event {
    /// Decode the given record into an event. Records that carry neither the
    /// axis nor the button flag produce no event.
    pub fn from_record(record: &JsEventRecord) -> Option<Event> {
        let initial = record.initial;
        let index = record.number;
        let value = record.value.to_primitive();

        if record.button {
            return Some(Event::Button(ButtonEvent {
                index,
                pressed: value != 0,
                initial,
            }));
        }
        if record.axis {
            return Some(Event::Axis(AxisEvent {
                index,
                value: normalize_axis_value(value),
                initial,
            }));
        }

        None
    }

    /// Whether the event was synthesized by the kernel to report the initial
    /// device state
    pub fn is_initial(&self) -> bool {
        match self {
            Event::Axis(event) => event.initial,
            Event::Button(event) => event.initial,
        }
    }
}

/// Axis input normalized between -1.0 and 1.0
#[derive(Clone, Debug, PartialEq)]
pub struct AxisEvent {
    pub index: u8,
    pub value: f64,
    pub initial: bool,
}

/// Binary input contain either pressed or unpressed
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonEvent {
    pub index: u8,
    pub pressed: bool,
    pub initial: bool,
}

/// Normalize the raw signed axis value to a value between -1.0 and 1.0.
/// A raw value of -32768 is clamped to -1.0.
pub fn normalize_axis_value(raw_value: i16) -> f64 {
    (raw_value as f64 / AXIS_MAX).clamp(-1.0, 1.0)
}
