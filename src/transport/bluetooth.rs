//! # Bluetooth RFCOMM Transport
//!
//! This module talks to the printer over Bluetooth Serial Port Profile (SPP)
//! via an RFCOMM tty, and finds printers by their advertised name.
//!
//! ## Discovery
//!
//! [`scan`] runs a time-bounded `bluetoothctl` scan, then reports every
//! known device to a callback. [`discover_by_name`] keeps the first device
//! whose name matches exactly. "Not found" is `Ok(None)`, which callers can
//! tell apart from a later connection failure.
//!
//! ## Connecting
//!
//! A transport targets either an RFCOMM device path that is already bound
//! (e.g. `/dev/rfcomm0`) or a Bluetooth address. For an address,
//! [`Transport::connect`] reuses an existing RFCOMM binding when there is one
//! and otherwise creates it:
//!
//! ```bash
//! bluetoothctl connect <MAC>
//! l2ping -c 1 <MAC>
//! rfcomm bind <channel> <MAC> 1   # needs root
//! ```
//!
//! ## TTY Configuration
//!
//! The RFCOMM device is opened in raw mode to ensure binary data is
//! transmitted without modification:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **8-bit characters**: CS8 (8 data bits, no parity)
//! - **No echo**: Disable ECHO, ECHONL
//! - **Non-canonical mode**: Disable ICANON (no line buffering)

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::PrinterError;

use super::Transport;

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// A device seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredDevice {
    /// Bluetooth address, upper case (`XX:XX:XX:XX:XX:XX`)
    pub address: String,
    /// Advertised name
    pub name: String,
}

#[derive(Debug, Clone)]
enum Target {
    Device(PathBuf),
    Address(String),
}

/// # Bluetooth Printer Transport
///
/// ## Example
///
/// ```no_run
/// use std::time::Duration;
/// use thermal_raster::transport::{BluetoothTransport, Transport};
///
/// let mut transport = BluetoothTransport::discover("MTP-2", Duration::from_secs(5), 0)?;
/// transport.connect()?;
/// transport.write(&[0x1B, b'@'])?;
/// transport.disconnect();
/// # Ok::<(), thermal_raster::PrinterError>(())
/// ```
#[derive(Debug)]
pub struct BluetoothTransport {
    target: Target,
    channel: u8,
    file: Option<File>,
}

impl BluetoothTransport {
    /// Target an RFCOMM device that is already bound.
    pub fn for_device<P: AsRef<Path>>(device: P) -> Self {
        Self {
            target: Target::Device(device.as_ref().to_path_buf()),
            channel: 0,
            file: None,
        }
    }

    /// Target a printer by Bluetooth address, binding `/dev/rfcomm<channel>`
    /// on connect if needed.
    pub fn for_address(mac: &str, channel: u8) -> Result<Self, PrinterError> {
        if !is_valid_mac(mac) {
            return Err(PrinterError::Transport(format!(
                "Invalid Bluetooth address '{}'",
                mac
            )));
        }
        Ok(Self {
            target: Target::Address(mac.to_uppercase()),
            channel,
            file: None,
        })
    }

    /// Scan for `name` and target the first exact match.
    ///
    /// ## Errors
    ///
    /// [`PrinterError::NotFound`] if the scan ends without a match.
    pub fn discover(name: &str, timeout: Duration, channel: u8) -> Result<Self, PrinterError> {
        let device = discover_by_name(name, timeout)?
            .ok_or_else(|| PrinterError::NotFound(name.to_string()))?;
        Self::for_address(&device.address, channel)
    }

    /// Open a bound RFCOMM device right away.
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self, PrinterError> {
        let mut transport = Self::for_device(device);
        transport.connect()?;
        Ok(transport)
    }

    /// Open with default device path (/dev/rfcomm0)
    pub fn open_default() -> Result<Self, PrinterError> {
        Self::open(DEFAULT_DEVICE)
    }

    /// RFCOMM device path to open, binding one for address targets.
    fn resolve_device(&self) -> Result<PathBuf, PrinterError> {
        match &self.target {
            Target::Device(path) => Ok(path.clone()),
            Target::Address(mac) => match find_rfcomm_for_mac(mac)? {
                Some(existing) => {
                    debug!(device = %existing, "reusing rfcomm binding");
                    Ok(PathBuf::from(existing))
                }
                None => setup_rfcomm(mac, self.channel).map(PathBuf::from),
            },
        }
    }
}

impl Transport for BluetoothTransport {
    fn connect(&mut self) -> Result<(), PrinterError> {
        if self.file.is_some() {
            return Ok(());
        }
        let path = self.resolve_device()?;

        let file = OpenOptions::new().write(true).open(&path).map_err(|e| {
            PrinterError::Transport(format!("Failed to open {}: {}", path.display(), e))
        })?;

        // Configure TTY for raw mode
        configure_tty_raw(file.as_raw_fd())?;

        info!(device = %path.display(), "printer connected");
        self.file = Some(file);
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.file.take().is_some() {
            info!("printer disconnected");
        }
    }

    fn is_connected(&self) -> bool {
        self.file.is_some()
    }

    fn write(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| PrinterError::Transport("not connected".to_string()))?;
        file.write_all(data)
            .map_err(|e| PrinterError::Transport(format!("Write failed: {}", e)))?;
        file.flush()
            .map_err(|e| PrinterError::Transport(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

// ============================================================================
// DISCOVERY
// ============================================================================

/// Scan for nearby devices for `timeout`, calling `on_device` for each one.
///
/// The scan blocks for the whole timeout; `bluetoothctl` enforces it.
/// Returns every device reported.
pub fn scan<F>(timeout: Duration, mut on_device: F) -> Result<Vec<DiscoveredDevice>, PrinterError>
where
    F: FnMut(&DiscoveredDevice),
{
    let secs = timeout.as_secs().max(1);
    info!(timeout_secs = secs, "scanning for Bluetooth devices");

    let output = Command::new("bluetoothctl")
        .arg("--timeout")
        .arg(secs.to_string())
        .arg("scan")
        .arg("on")
        .output()
        .map_err(|e| PrinterError::Transport(format!("Failed to run bluetoothctl: {}", e)))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(stderr = %stderr.trim(), "bluetoothctl scan exited with an error");
    }

    let output = Command::new("bluetoothctl")
        .arg("devices")
        .output()
        .map_err(|e| PrinterError::Transport(format!("Failed to run bluetoothctl: {}", e)))?;

    let devices = devices_from_output(&output)?;
    for device in &devices {
        debug!(address = %device.address, name = %device.name, "scan result");
        on_device(device);
    }
    Ok(devices)
}

/// Device list from a finished `bluetoothctl devices` run.
///
/// A non-zero exit (adapter down, daemon missing) is a transport error, not
/// an empty scan.
fn devices_from_output(output: &Output) -> Result<Vec<DiscoveredDevice>, PrinterError> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrinterError::Transport(format!(
            "bluetoothctl devices failed ({}): {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(parse_devices(&String::from_utf8_lossy(&output.stdout)))
}

/// Scan for a device whose advertised name equals `name`.
pub fn discover_by_name(name: &str, timeout: Duration) -> Result<Option<DiscoveredDevice>, PrinterError> {
    let mut found = None;
    scan(timeout, |device| {
        if found.is_none() && device.name == name {
            found = Some(device.clone());
        }
    })?;

    match &found {
        Some(device) => info!(address = %device.address, name, "printer found"),
        None => info!(name, "printer not found"),
    }
    Ok(found)
}

/// Parse `bluetoothctl devices` output (`Device XX:XX:XX:XX:XX:XX Name`).
pub fn parse_devices(output: &str) -> Vec<DiscoveredDevice> {
    output
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("Device ")?;
            let (address, name) = rest.split_once(' ').unwrap_or((rest, ""));
            if !is_valid_mac(address) {
                return None;
            }
            Some(DiscoveredDevice {
                address: address.to_uppercase(),
                name: name.trim().to_string(),
            })
        })
        .collect()
}

// ============================================================================
// TTY SETUP
// ============================================================================

/// Configure a file descriptor for raw TTY mode.
///
/// This disables all input/output processing so binary data passes through
/// unmodified.
///
/// IXON/IXOFF/IXANY must be off: 0x11 (XON) and 0x13 (XOFF) appear in raster
/// data.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<(), PrinterError> {
    use std::mem::MaybeUninit;

    // Get current terminal attributes
    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(PrinterError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    // Apply settings immediately
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(PrinterError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32) -> Result<(), PrinterError> {
    Ok(())
}

// ============================================================================
// RFCOMM SETUP HELPERS
// ============================================================================

/// Validate a Bluetooth MAC address format (XX:XX:XX:XX:XX:XX).
pub fn is_valid_mac(mac: &str) -> bool {
    let parts: Vec<&str> = mac.split(':').collect();
    if parts.len() != 6 {
        return false;
    }
    parts
        .iter()
        .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Device name (`rfcomm0`) of the first listing line mentioning `mac`.
///
/// Both `/proc/net/rfcomm` and `rfcomm -a` print lines starting with
/// `rfcommN:`.
fn rfcomm_name_for_mac(listing: &str, mac: &str) -> Option<String> {
    let mac_upper = mac.to_uppercase();
    listing
        .lines()
        .filter(|line| line.to_uppercase().contains(&mac_upper))
        .filter_map(|line| line.split(':').next())
        .map(|name| name.trim().to_string())
        .find(|name| name.starts_with("rfcomm"))
}

/// Find an existing RFCOMM device bound to the given MAC address.
///
/// Checks `/proc/net/rfcomm` and falls back to `rfcomm -a` command.
/// Returns the device path (e.g., "/dev/rfcomm0") if found.
pub fn find_rfcomm_for_mac(mac: &str) -> Result<Option<String>, PrinterError> {
    let existing = |listing: &str| {
        rfcomm_name_for_mac(listing, mac)
            .map(|name| format!("/dev/{}", name))
            .filter(|path| Path::new(path).exists())
    };

    if let Ok(contents) = fs::read_to_string("/proc/net/rfcomm") {
        if let Some(path) = existing(&contents) {
            return Ok(Some(path));
        }
    }

    let output = Command::new("rfcomm")
        .arg("-a")
        .output()
        .map_err(|e| PrinterError::Transport(format!("Failed to run 'rfcomm -a': {}", e)))?;

    Ok(existing(&String::from_utf8_lossy(&output.stdout)))
}

/// Set up an RFCOMM device for a Bluetooth MAC address.
///
/// Returns the device path on success (e.g., "/dev/rfcomm0").
///
/// **Requires root privileges** for `rfcomm bind`.
pub fn setup_rfcomm(mac: &str, channel: u8) -> Result<String, PrinterError> {
    let mac_upper = mac.to_uppercase();
    let device_path = format!("/dev/rfcomm{}", channel);

    // May fail if already connected; l2ping verifies below
    info!(address = %mac_upper, "connecting");
    let output = Command::new("bluetoothctl")
        .arg("connect")
        .arg(&mac_upper)
        .output()
        .map_err(|e| PrinterError::Transport(format!("Failed to run bluetoothctl: {}", e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !(stdout.contains("Connection successful") || stdout.contains("already connected")) {
        debug!(output = %stdout.trim(), "bluetoothctl connect");
    }

    thread::sleep(Duration::from_millis(500));

    let output = Command::new("l2ping")
        .arg("-c")
        .arg("1")
        .arg(&mac_upper)
        .output()
        .map_err(|e| PrinterError::Transport(format!("Failed to run l2ping: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrinterError::Transport(format!(
            "Device {} not reachable: {}",
            mac_upper,
            stderr.trim()
        )));
    }

    info!(channel, "binding rfcomm");
    let output = Command::new("rfcomm")
        .arg("bind")
        .arg(channel.to_string())
        .arg(&mac_upper)
        .arg("1") // RFCOMM channel 1 (standard for SPP)
        .output()
        .map_err(|e| PrinterError::Transport(format!("Failed to run rfcomm bind: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrinterError::Transport(format!(
            "rfcomm bind failed: {}",
            stderr.trim()
        )));
    }

    // Wait for device to appear
    thread::sleep(Duration::from_millis(500));

    if !Path::new(&device_path).exists() {
        return Err(PrinterError::Transport(format!(
            "Device {} was not created",
            device_path
        )));
    }

    Ok(device_path)
}

// ============================================================================
// TESTS
// ============================================================================
