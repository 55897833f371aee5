use std::error::Error;

use packed_struct::{types::SizedInteger, PackedStruct};

use crate::drivers::joystick::{
    event::{AxisEvent, ButtonEvent, Event},
    js_event::{JsEventRecord, JS_EVENT_AXIS, JS_EVENT_BUTTON, JS_EVENT_INIT},
};

#[test]
fn test_unpack_axis_record() -> Result<(), Box<dyn Error>> {
    let buf = [0x7c, 0x3a, 0x01, 0x00, 0xff, 0x7f, 0x02, 0x00];
    let record = JsEventRecord::unpack(&buf)?;
    println!("Record: {record:?}");

    assert_eq!(record.time.to_primitive(), 0x00013a7c);
    assert_eq!(record.value.to_primitive(), 32767);
    assert!(record.axis);
    assert!(!record.button);
    assert!(!record.initial);
    assert_eq!(record.number, 0);
    assert_eq!(record.event_type(), JS_EVENT_AXIS);

    let event = Event::from_record(&record);
    assert_eq!(
        event,
        Some(Event::Axis(AxisEvent {
            index: 0,
            value: 1.0,
            initial: false
        }))
    );

    Ok(())
}

#[test]
fn test_unpack_negative_axis() -> Result<(), Box<dyn Error>> {
    let buf = [0x00, 0x00, 0x00, 0x00, 0x01, 0x80, 0x02, 0x04];
    let record = JsEventRecord::unpack(&buf)?;
    assert_eq!(record.value.to_primitive(), -32767);

    let Some(Event::Axis(axis)) = Event::from_record(&record) else {
        panic!("should decode an axis event");
    };
    assert_eq!(axis.index, 4);
    assert_eq!(axis.value, -1.0);

    // The most negative raw value must stay inside the normalized range
    let buf = [0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x02, 0x04];
    let record = JsEventRecord::unpack(&buf)?;
    let Some(Event::Axis(axis)) = Event::from_record(&record) else {
        panic!("should decode an axis event");
    };
    assert_eq!(axis.value, -1.0);

    Ok(())
}

#[test]
fn test_unpack_button_record() -> Result<(), Box<dyn Error>> {
    let buf = [0x90, 0x3b, 0x01, 0x00, 0x01, 0x00, 0x01, 0x03];
    let record = JsEventRecord::unpack(&buf)?;
    assert_eq!(record.event_type(), JS_EVENT_BUTTON);

    let event = Event::from_record(&record);
    assert_eq!(
        event,
        Some(Event::Button(ButtonEvent {
            index: 3,
            pressed: true,
            initial: false
        }))
    );

    let buf = [0x90, 0x3b, 0x01, 0x00, 0x00, 0x00, 0x01, 0x03];
    let record = JsEventRecord::unpack(&buf)?;
    let Some(Event::Button(button)) = Event::from_record(&record) else {
        panic!("should decode a button event");
    };
    assert!(!button.pressed);

    Ok(())
}

#[test]
fn test_initial_flag_does_not_change_decoding() -> Result<(), Box<dyn Error>> {
    let buf = [0x10, 0x27, 0x00, 0x00, 0x00, 0x40, 0x82, 0x01];
    let record = JsEventRecord::unpack(&buf)?;
    assert_eq!(record.event_type(), JS_EVENT_AXIS | JS_EVENT_INIT);

    let Some(event) = Event::from_record(&record) else {
        panic!("should decode an axis event");
    };
    assert!(event.is_initial());
    let Event::Axis(axis) = event else {
        panic!("should decode an axis event");
    };
    assert_eq!(axis.index, 1);
    assert!((axis.value - 16384.0 / 32767.0).abs() < f64::EPSILON);

    Ok(())
}

#[test]
fn test_record_without_type_is_ignored() -> Result<(), Box<dyn Error>> {
    let buf = [0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
    let record = JsEventRecord::unpack(&buf)?;
    assert_eq!(Event::from_record(&record), None);

    Ok(())
}
