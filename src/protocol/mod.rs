//! # Raster Print Protocol
//!
//! Command bytes and the paced raster-image stream understood by small
//! ESC/POS-style Bluetooth thermal printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: command byte constants and integer encoding
//! - [`raster`]: `GS v 0` header encoding and row-by-row streaming
//!
//! ## Usage Example
//!
//! ```
//! use thermal_raster::protocol::raster::{self, Pacing, PrintStatus};
//! use thermal_raster::render::FrameBuffer;
//! use thermal_raster::transport::MemoryTransport;
//!
//! let mut memory = vec![0u8; 48 * 200];
//! let mut fb = FrameBuffer::with_buffer(&mut memory, 384, 200)?;
//! fb.fill(0xFF)?;
//!
//! let mut transport = MemoryTransport::connected();
//! let status = raster::stream_buffer(&fb, &mut transport, &Pacing::default())?;
//! assert_eq!(status, PrintStatus::Sent { rows: 200, bytes: 8 + 48 * 200 });
//! assert_eq!(&transport.bytes()[..8], &[0x1D, b'v', b'0', b'0', 48, 0, 200, 0]);
//! # Ok::<(), thermal_raster::PrinterError>(())
//! ```

pub mod commands;
pub mod raster;
