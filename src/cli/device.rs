use std::error::Error;

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::drivers::joystick::driver::{list_devices, Driver};

#[derive(Tabled)]
struct JoystickRow {
    path: String,
    name: String,
    axes: String,
    buttons: String,
}

/// Print a table of every joystick device that can be opened
pub fn handle_devices() -> Result<(), Box<dyn Error>> {
    let paths = list_devices()?;

    let mut rows = Vec::with_capacity(paths.len());
    for path in paths {
        let driver = match Driver::open(&path) {
            Ok(driver) => driver,
            Err(e) => {
                log::warn!("Unable to open {}: {e}", path.display());
                continue;
            }
        };
        let info = driver.info();
        rows.push(JoystickRow {
            path: path.display().to_string(),
            name: info.name.clone(),
            axes: info.axis_names().join(", "),
            buttons: info.button_names().join(", "),
        });
    }

    let count = rows.len();
    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Joystick Devices"));
    println!("{table}");
    println!("Found {count} joystick device(s)");

    Ok(())
}
