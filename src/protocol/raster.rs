//! # Raster Print Encoding
//!
//! Serializes a [`FrameBuffer`] into the raster bit-image command and streams
//! it through a [`Transport`].
//!
//! ## Frame Layout
//!
//! ```text
//! byte 0    GS   (0x1D)
//! byte 1    'v'
//! byte 2    '0'
//! byte 3    '0'  (normal mode)
//! byte 4-5  row width in bytes, little-endian
//! byte 6-7  height in dots, little-endian
//! then      height rows × row-width bytes, MSB = leftmost dot
//! ```
//!
//! ## Pacing
//!
//! The printer's receive buffer is small and it drops data when flooded.
//! After every row the stream pauses for [`Pacing::delay_for`] the row
//! width, `base_ms + pitch / bytes_per_ms` milliseconds (1 + pitch / 8 by
//! default). Nothing is read back from the printer; the delay is open loop.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PrinterError;
use crate::render::FrameBuffer;
use crate::transport::Transport;

use super::commands::{GS, RASTER_BIT_IMAGE, RASTER_FUNCTION, RASTER_MODE_NORMAL, u16_le};

/// Length of the raster command header.
pub const HEADER_LEN: usize = 8;

/// Per-row pause after each raster row write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Fixed part of the delay, milliseconds
    pub base_ms: u64,
    /// Row bytes the printer absorbs per extra millisecond
    pub bytes_per_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            base_ms: 1,
            bytes_per_ms: 8,
        }
    }
}

impl Pacing {
    /// No pause at all, for transports that never reach a printer.
    pub const NONE: Self = Self {
        base_ms: 0,
        bytes_per_ms: u64::MAX,
    };

    /// Delay after writing one row of `pitch` bytes.
    ///
    /// ```
    /// use std::time::Duration;
    /// use thermal_raster::protocol::raster::Pacing;
    ///
    /// let pacing = Pacing::default();
    /// assert_eq!(pacing.delay_for(48), Duration::from_millis(7));
    /// assert_eq!(pacing.delay_for(7), Duration::from_millis(1));
    /// ```
    pub fn delay_for(&self, pitch: usize) -> Duration {
        let extra = (pitch as u64).checked_div(self.bytes_per_ms).unwrap_or(0);
        Duration::from_millis(self.base_ms + extra)
    }
}

/// Outcome of [`stream_buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintStatus {
    /// Header and every row were handed to the transport
    Sent { rows: usize, bytes: usize },
    /// The transport was not connected; nothing was written
    Skipped,
}

/// Build the 8-byte raster header for a `width_dots` × `height` image.
///
/// ```
/// use thermal_raster::protocol::raster::encode_header;
///
/// assert_eq!(encode_header(384, 200), [0x1D, b'v', b'0', b'0', 48, 0, 200, 0]);
/// ```
pub fn encode_header(width_dots: u16, height: u16) -> [u8; HEADER_LEN] {
    let [xl, xh] = u16_le(width_dots.div_ceil(8));
    let [yl, yh] = u16_le(height);
    [
        GS,
        RASTER_BIT_IMAGE,
        RASTER_FUNCTION,
        RASTER_MODE_NORMAL,
        xl,
        xh,
        yl,
        yh,
    ]
}

/// Header for a bound framebuffer, checking both dimensions fit 16 bits.
pub fn header_for(fb: &FrameBuffer<'_>) -> Result<[u8; HEADER_LEN], PrinterError> {
    if !fb.is_bound() {
        return Err(PrinterError::Unbound);
    }
    let width = u16::try_from(fb.width()).map_err(|_| {
        PrinterError::InvalidCommand(format!("width {} does not fit the raster header", fb.width()))
    })?;
    let height = u16::try_from(fb.height()).map_err(|_| {
        PrinterError::InvalidCommand(format!("height {} does not fit the raster header", fb.height()))
    })?;
    Ok(encode_header(width, height))
}

/// The whole raster command (header followed by every row) as one buffer.
///
/// Useful for dumping a print job to a file; printing should go through
/// [`stream_buffer`] so rows are paced.
pub fn raster_command(fb: &FrameBuffer<'_>) -> Result<Vec<u8>, PrinterError> {
    let header = header_for(fb)?;
    let data = fb.as_bytes()?;

    let mut cmd = Vec::with_capacity(HEADER_LEN + data.len());
    cmd.extend_from_slice(&header);
    cmd.extend_from_slice(data);
    Ok(cmd)
}

/// Send the framebuffer to the printer.
///
/// Writes the header, then each row top to bottom as its own write of
/// exactly `pitch` bytes, pausing [`Pacing::delay_for`] after every row.
/// Blocks until the last row is written.
///
/// ## Errors
///
/// - [`PrinterError::Unbound`] if no buffer is bound
/// - [`PrinterError::InvalidCommand`] if a dimension exceeds 65535
/// - whatever the transport reports for a failed write
///
/// A disconnected transport is not an error: the call returns
/// [`PrintStatus::Skipped`] without writing anything.
pub fn stream_buffer<T: Transport + ?Sized>(
    fb: &FrameBuffer<'_>,
    transport: &mut T,
    pacing: &Pacing,
) -> Result<PrintStatus, PrinterError> {
    let header = header_for(fb)?;

    if !transport.is_connected() {
        warn!("printer not connected, skipping print");
        return Ok(PrintStatus::Skipped);
    }

    let delay = pacing.delay_for(fb.pitch());
    debug!(
        width = fb.width(),
        height = fb.height(),
        pitch = fb.pitch(),
        delay_ms = delay.as_millis() as u64,
        "streaming raster image"
    );

    transport.write(&header)?;
    let mut bytes = header.len();
    let mut rows = 0;
    for row in fb.rows()? {
        transport.write(row)?;
        transport.pause(delay);
        bytes += row.len();
        rows += 1;
    }

    debug!(rows, bytes, "raster image sent");
    Ok(PrintStatus::Sent { rows, bytes })
}

// ============================================================================
// TESTS
// ============================================================================
