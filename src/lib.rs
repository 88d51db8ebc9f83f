//! # thermal-raster - Bluetooth Thermal Printer Graphics
//!
//! thermal-raster draws text and lines into a 1-bit-per-pixel framebuffer
//! and prints it on small Bluetooth thermal printers with the `GS v 0`
//! raster command. It provides:
//!
//! - **Framebuffer**: a borrowed, packed 1bpp bitmap (MSB = leftmost dot)
//! - **Rasterizer**: Bresenham lines and 8×8 / 16×32 bitmap text
//! - **Protocol**: raster header encoding and paced row streaming
//! - **Transport**: Bluetooth RFCOMM with discovery by printer name
//!
//! ## Quick Start
//!
//! ```no_run
//! use thermal_raster::{
//!     Printer, PrinterConfig,
//!     render::{FontSize, Fonts, FrameBuffer},
//!     transport::BluetoothTransport,
//! };
//!
//! let config = PrinterConfig::default();
//! let fonts = Fonts::spleen()?;
//!
//! // The framebuffer borrows memory owned by the caller
//! let height = 200;
//! let mut memory = vec![0u8; config.pitch() * height];
//! let mut fb = FrameBuffer::with_buffer(&mut memory, config.width_dots as usize, height)?;
//!
//! fb.set_wrap(true);
//! fb.draw_text(&fonts, Some((0, 0)), "Hello", FontSize::Large, false)?;
//! fb.draw_line(0, 40, 383, 40, true)?;
//!
//! // Find the printer by name and send the bitmap
//! let transport = BluetoothTransport::discover(&config.name, config.scan_timeout(), config.rfcomm_channel)?;
//! let mut printer = Printer::new(transport, config);
//! printer.connect()?;
//! printer.print(&fb)?;
//!
//! # Ok::<(), thermal_raster::PrinterError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | Framebuffer, lines, text, PNG preview |
//! | [`protocol`] | Raster command encoding and streaming |
//! | [`transport`] | Communication backends |
//! | [`printer`] | Printer configuration and sessions |
//! | [`error`] | Error types |

pub mod error;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use error::PrinterError;
pub use printer::{Printer, PrinterConfig};
pub use protocol::raster::PrintStatus;
pub use render::FrameBuffer;
