//! Reference: https://www.kernel.org/doc/html/latest/input/joydev/joystick-api.html
use packed_struct::prelude::*;

/// Size in bytes of a single `struct js_event` read from the joystick device
pub const JS_EVENT_SIZE: usize = 8;

/// Largest raw axis value reported by the joystick API
pub const AXIS_MAX: f64 = 32767.0;

/// Event type flags
pub const JS_EVENT_BUTTON: u8 = 0x01;
pub const JS_EVENT_AXIS: u8 = 0x02;
pub const JS_EVENT_INIT: u8 = 0x80;

// JsEventRecord
//
// struct js_event {
//     __u32 time;     /* event timestamp in milliseconds */
//     __s16 value;    /* value */
//     __u8 type;      /* event type */
//     __u8 number;    /* axis/button number */
// };
//
// Axis 0 pushed fully right
// E: 7c 3a 01 00 ff 7f 02 00
// Button 3 pressed
// E: 90 3b 01 00 01 00 01 03
// Synthetic state of axis 1 sent on open
// E: 10 27 00 00 00 00 82 01
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq, Default)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "8")]
pub struct JsEventRecord {
    // BYTE 0-3
    #[packed_field(bytes = "0..=3", endian = "lsb")]
    pub time: Integer<u32, packed_bits::Bits<32>>,
    // BYTE 4-5
    #[packed_field(bytes = "4..=5", endian = "lsb")]
    pub value: Integer<i16, packed_bits::Bits<16>>,
    // BYTE 6
    #[packed_field(bits = "48")]
    pub initial: bool,
    #[packed_field(bits = "49..=53")]
    pub _unused: Integer<u8, packed_bits::Bits<5>>,
    #[packed_field(bits = "54")]
    pub axis: bool,
    #[packed_field(bits = "55")]
    pub button: bool,
    // BYTE 7
    #[packed_field(bytes = "7")]
    pub number: u8,
}

impl JsEventRecord {
    /// Returns the raw event type byte
    pub fn event_type(&self) -> u8 {
        let mut kind = 0;
        if self.button {
            kind |= JS_EVENT_BUTTON;
        }
        if self.axis {
            kind |= JS_EVENT_AXIS;
        }
        if self.initial {
            kind |= JS_EVENT_INIT;
        }
        kind
    }
}
