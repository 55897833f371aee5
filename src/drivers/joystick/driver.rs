use std::{
    fs::{self, File},
    io::{self, Read},
    os::fd::AsRawFd,
    path::{Path, PathBuf},
};

use nix::fcntl::{FcntlArg, OFlag};
use packed_struct::PackedStruct;

use super::{
    event::Event,
    js_event::{JsEventRecord, JS_EVENT_SIZE},
    names, DriverError,
};

/// Directory where the kernel exposes joystick devices
pub const INPUT_DIR: &str = "/dev/input";

/// Number of entries in the axis map (ABS_CNT)
const AXMAP_SIZE: usize = 0x40;
/// Number of entries in the button map (KEY_MAX - BTN_MISC + 1)
const BTNMAP_SIZE: usize = 0x200;
/// Maximum length of the device name
const NAME_SIZE: usize = 128;

// Joystick ioctls from linux/joystick.h
nix::ioctl_read!(jsiocgaxes, b'j', 0x11, u8);
nix::ioctl_read!(jsiocgbuttons, b'j', 0x12, u8);
nix::ioctl_read_buf!(jsiocgname, b'j', 0x13, u8);
nix::ioctl_read_buf!(jsiocgaxmap, b'j', 0x32, u8);
nix::ioctl_read_buf!(jsiocgbtnmap, b'j', 0x34, u16);

/// Metadata describing an opened joystick device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceInfo {
    pub name: String,
    /// ABS_* code of each axis, in device index order
    pub axis_codes: Vec<u8>,
    /// BTN_* code of each button, in device index order
    pub button_codes: Vec<u16>,
}

impl DeviceInfo {
    /// Names of every axis in device index order
    pub fn axis_names(&self) -> Vec<String> {
        self.axis_codes
            .iter()
            .map(|code| names::axis_name(*code))
            .collect()
    }

    /// Names of every button in device index order
    pub fn button_names(&self) -> Vec<String> {
        self.button_codes
            .iter()
            .map(|code| names::button_name(*code))
            .collect()
    }
}

/// Returns the paths of all joystick devices (e.g. "/dev/input/js0")
pub fn list_devices() -> Result<Vec<PathBuf>, DriverError> {
    let mut devices = Vec::new();
    for entry in fs::read_dir(INPUT_DIR)? {
        let entry = entry?;
        let is_joystick = entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with("js"))
            .unwrap_or_default();
        if is_joystick {
            devices.push(entry.path());
        }
    }
    devices.sort();

    Ok(devices)
}

/// Driver for a device using the Linux joystick API
#[derive(Debug)]
pub struct Driver {
    /// Joystick device handle opened in non-blocking mode
    device: File,
    path: PathBuf,
    info: DeviceInfo,
}

impl Driver {
    /// Open the joystick device at the given path and query its metadata
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DriverError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening joystick device at: {}", path.display());
        let device = File::open(&path)?;

        // Set the device to do non-blocking reads
        let raw_fd = device.as_raw_fd();
        nix::fcntl::fcntl(raw_fd, FcntlArg::F_SETFL(OFlag::O_NONBLOCK))?;

        let info = Driver::query_info(&device)?;

        Ok(Self { device, path, info })
    }

    /// Returns the path this device was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the metadata queried when the device was opened
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Query the name, axis map and button map of the given device
    fn query_info(device: &File) -> Result<DeviceInfo, DriverError> {
        let fd = device.as_raw_fd();

        let mut name = [0u8; NAME_SIZE];
        let mut num_axes = 0u8;
        let mut num_buttons = 0u8;
        let mut axmap = [0u8; AXMAP_SIZE];
        let mut btnmap = [0u16; BTNMAP_SIZE];

        // SAFETY: every buffer outlives the call and the request sizes are
        // derived from the buffer lengths.
        unsafe {
            jsiocgname(fd, &mut name)?;
            jsiocgaxes(fd, &mut num_axes)?;
            jsiocgbuttons(fd, &mut num_buttons)?;
            jsiocgaxmap(fd, &mut axmap)?;
            jsiocgbtnmap(fd, &mut btnmap)?;
        }

        let name_len = name.iter().position(|b| *b == 0).unwrap_or(NAME_SIZE);
        let num_axes = (num_axes as usize).min(AXMAP_SIZE);
        let num_buttons = (num_buttons as usize).min(BTNMAP_SIZE);

        Ok(DeviceInfo {
            name: String::from_utf8_lossy(&name[..name_len]).into_owned(),
            axis_codes: axmap[..num_axes].to_vec(),
            button_codes: btnmap[..num_buttons].to_vec(),
        })
    }

    /// Poll the device for a single event. Returns `None` when the device has
    /// nothing queued.
    pub fn poll(&mut self) -> Result<Option<Event>, DriverError> {
        read_event(&mut self.device)
    }
}

/// Read and decode a single `js_event` record from the given non-blocking
/// reader. Returns `None` if no record is available.
pub fn read_event<R: Read>(reader: &mut R) -> Result<Option<Event>, DriverError> {
    let mut buf = [0; JS_EVENT_SIZE];
    let bytes_read = match reader.read(&mut buf) {
        Ok(bytes_read) => bytes_read,
        Err(e) => match e.kind() {
            // Do nothing if this would block
            io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => return Ok(None),
            _ => return Err(e.into()),
        },
    };
    if bytes_read == 0 {
        return Ok(None);
    }
    if bytes_read != JS_EVENT_SIZE {
        return Err(DriverError::InvalidPacketSize(bytes_read));
    }

    let record = JsEventRecord::unpack(&buf)?;
    let event = Event::from_record(&record);
    if event.is_none() {
        log::trace!("Ignoring record with type {:#04x}", record.event_type());
    }

    Ok(event)
}
