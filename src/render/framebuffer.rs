//! # 1bpp Framebuffer
//!
//! A [`FrameBuffer`] borrows a caller-allocated byte region and treats it as a
//! packed monochrome bitmap, laid out exactly as the printer expects it:
//!
//! ```text
//! (0,0) ──────────────────────► X (width dots)
//!   │   byte 0     byte 1     ...  byte pitch-1
//!   │   76543210   76543210        76543210     ← bit 7 (MSB) = leftmost dot
//!   ▼
//!   Y (row r starts at byte r * pitch)
//! ```
//!
//! `pitch = ceil(width / 8)`. Pixel `(x, y)` lives in byte `y * pitch + x / 8`
//! under mask `0x80 >> (x % 8)`. A set bit prints black.
//!
//! The framebuffer never allocates: [`FrameBuffer::bind`] records a borrowed
//! `&mut [u8]` for as long as the binding lives. Until a region is bound,
//! every drawing call fails with [`PrinterError::Unbound`].
//!
//! ## Example
//!
//! ```
//! use thermal_raster::render::FrameBuffer;
//!
//! let mut memory = vec![0u8; 48 * 64];
//! let mut fb = FrameBuffer::new();
//! fb.bind(&mut memory, 384, 64)?;
//! assert_eq!(fb.pitch(), 48);
//!
//! fb.set_pixel(9, 0, true)?;
//! assert!(fb.pixel(9, 0)?);
//! # Ok::<(), thermal_raster::PrinterError>(())
//! ```

use std::fmt;

use crate::error::PrinterError;

/// Bytes per row for a bitmap `width` dots wide.
#[inline]
pub const fn pitch_for(width: usize) -> usize {
    width.div_ceil(8)
}

/// Mask selecting dot `x` inside its byte (MSB-first).
#[inline]
pub(crate) const fn bit_mask(x: usize) -> u8 {
    0x80 >> (x & 7)
}

/// # Packed 1bpp Drawing Surface
///
/// Holds the borrowed pixel memory together with the text cursor and the
/// word-wrap flag. All drawing operations ([`draw_line`](Self::draw_line),
/// [`draw_text`](Self::draw_text)) are methods on this type, so there is no
/// process-wide drawing state.
#[derive(Default)]
pub struct FrameBuffer<'a> {
    buffer: Option<&'a mut [u8]>,
    width: usize,
    height: usize,
    pitch: usize,
    pub(crate) cursor_x: usize,
    pub(crate) cursor_y: usize,
    wrap: bool,
}

impl<'a> FrameBuffer<'a> {
    /// Create an unbound framebuffer.
    pub const fn new() -> Self {
        Self {
            buffer: None,
            width: 0,
            height: 0,
            pitch: 0,
            cursor_x: 0,
            cursor_y: 0,
            wrap: false,
        }
    }

    /// Create a framebuffer already bound to `region`.
    pub fn with_buffer(region: &'a mut [u8], width: usize, height: usize) -> Result<Self, PrinterError> {
        let mut fb = Self::new();
        fb.bind(region, width, height)?;
        Ok(fb)
    }

    /// Bind (or rebind) the framebuffer to `region`.
    ///
    /// Recomputes `pitch`. The cursor is left where it was; callers that
    /// rebind to a smaller surface should reposition it themselves.
    ///
    /// ## Errors
    ///
    /// - [`PrinterError::InvalidDimensions`] if `width` or `height` is zero
    /// - [`PrinterError::BufferTooSmall`] if `region` is shorter than
    ///   `pitch * height` bytes
    pub fn bind(&mut self, region: &'a mut [u8], width: usize, height: usize) -> Result<(), PrinterError> {
        if width == 0 || height == 0 {
            return Err(PrinterError::InvalidDimensions { width, height });
        }
        let pitch = pitch_for(width);
        let needed = pitch * height;
        if region.len() < needed {
            return Err(PrinterError::BufferTooSmall {
                needed,
                actual: region.len(),
            });
        }

        self.buffer = Some(&mut region[..needed]);
        self.width = width;
        self.height = height;
        self.pitch = pitch;
        Ok(())
    }

    /// Release the bound region, returning it to the caller.
    pub fn unbind(&mut self) -> Option<&'a mut [u8]> {
        self.width = 0;
        self.height = 0;
        self.pitch = 0;
        self.buffer.take()
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.buffer.is_some()
    }

    /// Width in dots.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row, `ceil(width / 8)`.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Write `value` into every byte of the bound region.
    ///
    /// `0x00` clears to white, `0xFF` fills black, anything else gives a
    /// vertical stripe pattern.
    pub fn fill(&mut self, value: u8) -> Result<(), PrinterError> {
        self.bytes_mut()?.fill(value);
        Ok(())
    }

    /// Set (`on == true`) or clear a single dot.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> Result<(), PrinterError> {
        let index = self.index_of(x, y)?;
        let mask = bit_mask(x);
        let bytes = self.bytes_mut()?;
        if on {
            bytes[index] |= mask;
        } else {
            bytes[index] &= !mask;
        }
        Ok(())
    }

    /// Read back a single dot.
    pub fn pixel(&self, x: usize, y: usize) -> Result<bool, PrinterError> {
        let index = self.index_of(x, y)?;
        Ok(self.as_bytes()?[index] & bit_mask(x) != 0)
    }

    /// Enable or disable word wrap for [`draw_text`](Self::draw_text).
    pub fn set_wrap(&mut self, enabled: bool) {
        self.wrap = enabled;
    }

    #[inline]
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// Current text cursor `(x, y)` in dots.
    #[inline]
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    /// Move the text cursor. No bounds check; text drawing validates it.
    pub fn set_cursor(&mut self, x: usize, y: usize) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    /// The bound bitmap, exactly `pitch * height` bytes.
    pub fn as_bytes(&self) -> Result<&[u8], PrinterError> {
        self.buffer.as_deref().ok_or(PrinterError::Unbound)
    }

    /// Iterate rows top to bottom, each `pitch` bytes long.
    pub fn rows(&self) -> Result<std::slice::ChunksExact<'_, u8>, PrinterError> {
        Ok(self.as_bytes()?.chunks_exact(self.pitch))
    }

    pub(crate) fn bytes_mut(&mut self) -> Result<&mut [u8], PrinterError> {
        self.buffer.as_deref_mut().ok_or(PrinterError::Unbound)
    }

    /// Byte offset of dot `(x, y)`, bounds-checked.
    fn index_of(&self, x: usize, y: usize) -> Result<usize, PrinterError> {
        if !self.is_bound() {
            return Err(PrinterError::Unbound);
        }
        if x >= self.width || y >= self.height {
            return Err(PrinterError::OutOfBounds {
                x: x as i64,
                y: y as i64,
            });
        }
        Ok(y * self.pitch + x / 8)
    }
}

impl fmt::Debug for FrameBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("bound", &self.is_bound())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .field("cursor", &self.cursor())
            .field("wrap", &self.wrap)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
