use std::env;
use std::error::Error;

use clap::Parser;

use crate::cli::{main_cli, Args};
use crate::config::Config;
use crate::drivers::joystick::driver::Driver;
use crate::input::engine::Engine;
use crate::input::scheduler::Scheduler;
use crate::input::state::ChannelState;
use crate::input::target::keyboard::KeyboardDevice;
use crate::input::target::mouse::MouseDevice;

mod cli;
mod config;
mod drivers;
mod input;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();

    let args = Args::parse();
    if main_cli(&args)? {
        return Ok(());
    }

    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting joypwm v{}", VERSION);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(device) = args.device {
        config.device = device;
    }

    // Open the joystick and describe it
    let driver = Driver::open(&config.device)?;
    let info = driver.info();
    let axis_names = info.axis_names();
    let button_names = info.button_names();
    log::info!("Device: {} ({})", info.name, driver.path().display());
    log::info!("{} axes found: {}", axis_names.len(), axis_names.join(", "));
    log::info!(
        "{} buttons found: {}",
        button_names.len(),
        button_names.join(", ")
    );

    let state = ChannelState::new(&axis_names, &button_names);
    let engine = Engine::new(&config, state)?;

    // Create the virtual output devices
    let keyboard = KeyboardDevice::new(&engine.keys())?;
    let mouse = MouseDevice::new()?;

    let mut scheduler = Scheduler::new(driver, engine, keyboard, mouse, config.tick_interval());
    log::info!("Translating input from {}", config.device.display());
    scheduler.run().await?;

    log::info!("joypwm stopped");

    Ok(())
}
