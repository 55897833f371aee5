pub mod path;


use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::target::{keys::key_from_name, mouse::MouseButton};

/// Represents all possible errors loading a [Config]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Represents invalid values in an otherwise well-formed [Config]
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("PWM frequency must be a positive number, got {0}")]
    InvalidFrequency(f64),
    #[error("Deadzone must be between 0.0 and 1.0, got {0}")]
    InvalidDeadzone(f64),
    #[error("Tick rate must give a non-zero tick interval, got {0}")]
    InvalidTickRate(f64),
    #[error("Gain for axis '{0}' must be a finite number")]
    InvalidGain(String),
    #[error("Unknown key name '{0}'")]
    UnknownKey(String),
    #[error("Key '{0}' is mapped to more than one axis")]
    DuplicateKey(String),
}

/// Top level joypwm configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Joystick device to read from (e.g. "/dev/input/js0")
    pub device: PathBuf,
    /// Number of scheduler ticks per second
    pub tick_rate: f64,
    pub pwm: PwmConfig,
    pub mouse: MouseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/input/js0"),
            tick_rate: 1000.0,
            pwm: PwmConfig::default(),
            mouse: MouseConfig::default(),
        }
    }
}

impl Config {
    /// Load a [Config] from the given YAML string
    pub fn from_yaml(content: String) -> Result<Config, LoadError> {
        let config: Config = serde_yaml::from_str(content.as_str())?;
        config.validate()?;
        Ok(config)
    }

    /// Load a [Config] from the given YAML file
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<Config, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Config::from_yaml(content)
    }

    /// Load the configuration from the given path. If no path is given, the
    /// first config file found in the standard locations is used. If none
    /// exist, the default configuration is returned.
    pub fn load(path: Option<&Path>) -> Result<Config, LoadError> {
        if let Some(path) = path {
            log::info!("Loading config from {}", path.display());
            return Config::from_yaml_path(path);
        }
        match path::find_config_file() {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Config::from_yaml_path(path)
            }
            None => {
                log::info!("No config file found. Using default config.");
                Ok(Config::default())
            }
        }
    }

    /// Validate the values in the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if tick_interval(self.tick_rate).is_none() {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        self.pwm.validate()?;
        self.mouse.validate()?;
        Ok(())
    }

    /// Returns the interval between scheduler ticks. An invalid tick rate
    /// falls back to the default rate.
    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.tick_rate).unwrap_or(DEFAULT_TICK_INTERVAL)
    }
}

/// Interval between ticks at the default rate of 1000 ticks per second
const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Returns the non-zero interval between ticks at the given rate
fn tick_interval(tick_rate: f64) -> Option<Duration> {
    if !(tick_rate.is_finite() && tick_rate > 0.0) {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / tick_rate)
        .ok()
        .filter(|interval| !interval.is_zero())
}

/// Configuration of the axis to key PWM emulation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct PwmConfig {
    /// Frequency of key pressing in Hz
    pub frequency: f64,
    /// Axis magnitude at or below which no key is pressed
    pub deadzone: f64,
    pub mappings: Vec<AxisKeyMapping>,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency: 10.0,
            deadzone: 0.150,
            mappings: vec![
                AxisKeyMapping::new("x", "a", "d"),
                AxisKeyMapping::new("y", "w", "s"),
            ],
        }
    }
}

impl PwmConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(ConfigError::InvalidFrequency(self.frequency));
        }
        if !(0.0..1.0).contains(&self.deadzone) {
            return Err(ConfigError::InvalidDeadzone(self.deadzone));
        }
        // Each key belongs to a single channel
        let mut owners = HashMap::new();
        for (index, mapping) in self.mappings.iter().enumerate() {
            for key in [&mapping.negative_key, &mapping.positive_key] {
                let Some(code) = key_from_name(key) else {
                    return Err(ConfigError::UnknownKey(key.clone()));
                };
                if *owners.entry(code).or_insert(index) != index {
                    return Err(ConfigError::DuplicateKey(key.clone()));
                }
            }
        }
        Ok(())
    }

    /// Returns the length of a single PWM period in seconds
    pub fn period(&self) -> f64 {
        1.0 / self.frequency
    }
}

/// Maps an axis to a pair of keys. The negative key is pulsed while the axis
/// is negative and the positive key while it is positive.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct AxisKeyMapping {
    pub axis: String,
    pub negative_key: String,
    pub positive_key: String,
}

impl AxisKeyMapping {
    pub fn new(axis: &str, negative_key: &str, positive_key: &str) -> Self {
        Self {
            axis: axis.to_string(),
            negative_key: negative_key.to_string(),
            positive_key: positive_key.to_string(),
        }
    }
}

/// Configuration of the mouse emulation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct MouseConfig {
    pub axes: Vec<MouseAxisMapping>,
    pub buttons: Vec<MouseButtonMapping>,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            axes: vec![
                MouseAxisMapping::new("rx", MouseAxis::X, 0.5),
                MouseAxisMapping::new("ry", MouseAxis::Y, 0.5),
            ],
            buttons: vec![
                MouseButtonMapping::new("tr2", MouseButton::Left),
                MouseButtonMapping::new("tl2", MouseButton::Right),
            ],
        }
    }
}

impl MouseConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for mapping in self.axes.iter() {
            if !mapping.gain.is_finite() {
                return Err(ConfigError::InvalidGain(mapping.axis.clone()));
            }
        }
        Ok(())
    }
}

/// Relative mouse axis
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MouseAxis {
    X,
    Y,
}

/// Maps an axis to relative mouse motion. Each tick the pointer moves by
/// `value * gain` along the output axis.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct MouseAxisMapping {
    pub axis: String,
    pub output: MouseAxis,
    pub gain: f64,
}

impl MouseAxisMapping {
    pub fn new(axis: &str, output: MouseAxis, gain: f64) -> Self {
        Self {
            axis: axis.to_string(),
            output,
            gain,
        }
    }
}

/// Maps a joystick button to a mouse button
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct MouseButtonMapping {
    pub button: String,
    pub mouse_button: MouseButton,
}

impl MouseButtonMapping {
    pub fn new(button: &str, mouse_button: MouseButton) -> Self {
        Self {
            button: button.to_string(),
            mouse_button,
        }
    }
}
