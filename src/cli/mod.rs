pub mod device;

use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};

use device::handle_devices;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Joystick device to read from, overriding the configured device
    #[arg(short, long, global = true)]
    pub device: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Translate joystick input into keyboard and mouse events (default)
    Run,
    /// List available joystick devices
    Devices,
}

/// Handle any command that does not start the translation loop. Returns
/// false if the caller should continue with [Commands::Run].
pub fn main_cli(args: &Args) -> Result<bool, Box<dyn Error>> {
    let Some(cmd) = args.cmd.as_ref() else {
        return Ok(false);
    };

    match cmd {
        Commands::Run => Ok(false),
        Commands::Devices => {
            handle_devices()?;
            Ok(true)
        }
    }
}
