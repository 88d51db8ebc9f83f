//! # Printer Configuration
//!
//! Hardware and link settings for a Bluetooth thermal printer, loadable from
//! TOML.
//!
//! ## Example File
//!
//! ```toml
//! name = "MTP-2"
//! width_dots = 384
//! scan_timeout_secs = 5
//! rfcomm_channel = 0
//! # device = "/dev/rfcomm0"   # skip discovery
//!
//! [pacing]
//! base_ms = 1
//! bytes_per_ms = 8
//! ```
//!
//! Every key is optional; missing keys take the defaults shown.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PrinterError;
use crate::protocol::raster::Pacing;
use crate::render::framebuffer::pitch_for;

/// # Printer Configuration
///
/// ## Physical Properties
///
/// - **width_dots**: printable width, which is also the framebuffer width.
///   58mm printers are 384 dots (48 bytes) at 203 DPI.
///
/// ## Link
///
/// - **name**: advertised Bluetooth name matched during discovery
/// - **device**: an already-bound RFCOMM path; when set, no scan happens
/// - **pacing**: per-row delay while streaming
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Advertised printer name
    pub name: String,

    /// Print width in dots
    pub width_dots: u16,

    /// How long discovery scans before giving up
    pub scan_timeout_secs: u64,

    /// `N` in `/dev/rfcommN` when a binding has to be created
    pub rfcomm_channel: u8,

    /// Pre-bound RFCOMM device
    pub device: Option<PathBuf>,

    /// Row pacing while streaming
    pub pacing: Pacing,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            name: "MTP-2".to_string(),
            width_dots: 384,
            scan_timeout_secs: 5,
            rfcomm_channel: 0,
            device: None,
            pacing: Pacing::default(),
        }
    }
}

impl PrinterConfig {
    /// Parse and validate a TOML document.
    ///
    /// ```
    /// use thermal_raster::PrinterConfig;
    ///
    /// let config = PrinterConfig::from_toml_str("name = \"PT-210\"\nwidth_dots = 576")?;
    /// assert_eq!(config.name, "PT-210");
    /// assert_eq!(config.pitch(), 72);
    /// assert_eq!(config.scan_timeout_secs, 5);
    /// # Ok::<(), thermal_raster::PrinterError>(())
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, PrinterError> {
        let config: Self = toml::from_str(s).map_err(|e| PrinterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PrinterError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            PrinterError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, PrinterError> {
        toml::to_string_pretty(self).map_err(|e| PrinterError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), PrinterError> {
        if self.width_dots == 0 {
            return Err(PrinterError::Config("width_dots must be at least 1".to_string()));
        }
        if self.pacing.bytes_per_ms == 0 {
            return Err(PrinterError::Config(
                "pacing.bytes_per_ms must be at least 1".to_string(),
            ));
        }
        if self.name.is_empty() && self.device.is_none() {
            return Err(PrinterError::Config(
                "either a printer name or a device path is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Bytes per raster row.
    #[inline]
    pub fn pitch(&self) -> usize {
        pitch_for(self.width_dots as usize)
    }

    #[inline]
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }
}

// ============================================================================
// TESTS
// ============================================================================
