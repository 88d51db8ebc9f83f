//! # Error Types
//!
//! This module defines the error type used throughout the thermal-raster library.
//!
//! Drawing precondition failures (unbound buffer, out-of-range coordinates,
//! no room for a glyph) are reported as errors and never touch the buffer.
//! A print against a disconnected transport is *not* an error: it is reported
//! as [`PrintStatus::Skipped`](crate::protocol::raster::PrintStatus::Skipped).

use thiserror::Error;

/// Main error type for thermal-raster operations
#[derive(Debug, Error)]
pub enum PrinterError {
    /// A drawing or print operation ran before a buffer was bound
    #[error("Framebuffer has no bound buffer")]
    Unbound,

    /// Width or height of zero
    #[error("Invalid framebuffer dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// The region handed to `bind` cannot hold `pitch * height` bytes
    #[error("Buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// A coordinate outside `[0, width) x [0, height)`
    #[error("Coordinate ({x}, {y}) is outside the framebuffer")]
    OutOfBounds { x: i64, y: i64 },

    /// The text cursor leaves no room for the selected glyph
    #[error("No room for a {glyph_height}px glyph at cursor ({x}, {y})")]
    NoRoom {
        x: usize,
        y: usize,
        glyph_height: usize,
    },

    /// Font size tag that is neither small nor large
    #[error("Unknown font size '{0}'")]
    UnknownFontSize(String),

    /// Malformed glyph table
    #[error("Font error: {0}")]
    Font(String),

    /// Invalid command or parameter
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Transport-level errors (connection, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Discovery finished without seeing the named printer
    #[error("Printer '{0}' not found")]
    NotFound(String),

    /// Bad configuration value or file
    #[error("Config error: {0}")]
    Config(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
