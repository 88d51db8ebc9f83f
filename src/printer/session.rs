//! # Printer Session
//!
//! [`Printer`] owns a transport and its configuration and sends finished
//! framebuffers to the device.

use tracing::{info, warn};

use crate::error::PrinterError;
use crate::protocol::raster::{self, PrintStatus};
use crate::render::FrameBuffer;
use crate::transport::Transport;

use super::config::PrinterConfig;

/// A printer reachable through `T`.
///
/// The connection is closed when the `Printer` is dropped.
///
/// ## Example
///
/// ```
/// use thermal_raster::{Printer, PrinterConfig, PrintStatus};
/// use thermal_raster::render::FrameBuffer;
/// use thermal_raster::transport::MemoryTransport;
///
/// let mut memory = vec![0u8; 48 * 16];
/// let mut fb = FrameBuffer::with_buffer(&mut memory, 384, 16)?;
/// fb.draw_line(0, 8, 383, 8, true)?;
///
/// let mut printer = Printer::new(MemoryTransport::new(), PrinterConfig::default());
/// printer.connect()?;
/// assert_eq!(printer.print(&fb)?, PrintStatus::Sent { rows: 16, bytes: 8 + 48 * 16 });
/// # Ok::<(), thermal_raster::PrinterError>(())
/// ```
pub struct Printer<T: Transport> {
    transport: T,
    config: PrinterConfig,
}

impl<T: Transport> Printer<T> {
    pub fn new(transport: T, config: PrinterConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn connect(&mut self) -> Result<(), PrinterError> {
        self.transport.connect()?;
        info!(printer = %self.config.name, "session open");
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.transport.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Stream `fb` to the printer with the configured pacing.
    ///
    /// Returns [`PrintStatus::Skipped`] when not connected.
    pub fn print(&mut self, fb: &FrameBuffer<'_>) -> Result<PrintStatus, PrinterError> {
        if fb.is_bound() && fb.width() != self.config.width_dots as usize {
            warn!(
                buffer_width = fb.width(),
                printer_width = self.config.width_dots,
                "framebuffer width differs from printer width"
            );
        }
        raster::stream_buffer(fb, &mut self.transport, &self.config.pacing)
    }
}

impl<T: Transport> Drop for Printer<T> {
    fn drop(&mut self) {
        self.transport.disconnect();
    }
}
