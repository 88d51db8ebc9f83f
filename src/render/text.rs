//! # Text Drawing
//!
//! Blits glyphs from a [`FontTable`](super::font::FontTable) into the
//! framebuffer at the text cursor.
//!
//! Glyph rows are copied as whole bytes, so a glyph always lands on the byte
//! column `cursor_x / 8`. Cursor positions that are not a multiple of 8 are
//! rounded down to that column rather than shifted bit by bit, and each
//! glyph overwrites the bytes it covers. Glyph bytes that would fall past
//! the end of a row are dropped.
//!
//! ## Cursor Rules
//!
//! - `at: Some((x, y))` moves the cursor before drawing; `None` continues
//!   from wherever the previous call left it.
//! - After each glyph the cursor advances by the glyph width. With wrap on,
//!   reaching the right edge returns it to column 0 one glyph height lower.
//! - Drawing stops quietly once the cursor leaves the buffer; glyphs already
//!   drawn stay.

use tracing::trace;

use crate::error::PrinterError;

use super::font::{FontSize, Fonts};
use super::framebuffer::FrameBuffer;

impl FrameBuffer<'_> {
    /// Draw `text` at `at` (or at the current cursor) in the given font size.
    ///
    /// `invert` draws each glyph as its bitwise complement (white on black).
    ///
    /// ## Errors
    ///
    /// - [`PrinterError::Unbound`] before a buffer is bound
    /// - [`PrinterError::NoRoom`] if the cursor is past the right edge, or
    ///   fewer than one glyph height of rows remain below it. Nothing is drawn.
    ///
    /// ## Example
    ///
    /// ```
    /// use thermal_raster::render::{FontSize, Fonts, FrameBuffer};
    ///
    /// let fonts = Fonts::spleen()?;
    /// let mut memory = vec![0u8; 48 * 64];
    /// let mut fb = FrameBuffer::with_buffer(&mut memory, 384, 64)?;
    ///
    /// fb.draw_text(&fonts, Some((0, 0)), "HELLO", FontSize::Small, false)?;
    /// assert_eq!(fb.cursor(), (40, 0));
    ///
    /// // Continue on the same line
    /// fb.draw_text(&fonts, None, " WORLD", FontSize::Small, false)?;
    /// assert_eq!(fb.cursor(), (88, 0));
    /// # Ok::<(), thermal_raster::PrinterError>(())
    /// ```
    pub fn draw_text(
        &mut self,
        fonts: &Fonts,
        at: Option<(usize, usize)>,
        text: &str,
        size: FontSize,
        invert: bool,
    ) -> Result<(), PrinterError> {
        if !self.is_bound() {
            return Err(PrinterError::Unbound);
        }
        if let Some((x, y)) = at {
            self.set_cursor(x, y);
        }

        let (width, height, pitch, wrap) = (self.width(), self.height(), self.pitch(), self.wrap());
        let glyph_w = size.glyph_width();
        let glyph_h = size.glyph_height();
        let row_bytes = size.bytes_per_row();
        let (mut cx, mut cy) = self.cursor();

        if !has_room(cx, cy, width, height, glyph_h) {
            return Err(PrinterError::NoRoom {
                x: cx,
                y: cy,
                glyph_height: glyph_h,
            });
        }

        let table = fonts.table(size);
        let mut scratch = [0u8; FontSize::Large.glyph_bytes()];
        let bytes = self.bytes_mut()?;

        for ch in text.chars() {
            if !has_room(cx, cy, width, height, glyph_h) {
                trace!(x = cx, y = cy, "text cursor left the buffer");
                break;
            }

            let glyph = &mut scratch[..size.glyph_bytes()];
            glyph.copy_from_slice(table.glyph(ch));
            if invert {
                glyph.iter_mut().for_each(|b| *b = !*b);
            }

            let column = cx / 8;
            let span = row_bytes.min(pitch - column);
            for (row, src) in glyph.chunks_exact(row_bytes).enumerate() {
                let start = (cy + row) * pitch + column;
                bytes[start..start + span].copy_from_slice(&src[..span]);
            }

            cx += glyph_w;
            if cx >= width && wrap {
                cx = 0;
                cy += glyph_h;
            }
        }

        self.set_cursor(cx, cy);
        Ok(())
    }
}

/// Whether a glyph `glyph_h` rows tall fits with its top-left corner at
/// `(x, y)`.
fn has_room(x: usize, y: usize, width: usize, height: usize, glyph_h: usize) -> bool {
    x < width && y.checked_add(glyph_h).is_some_and(|bottom| bottom <= height)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::font::{FontTable, GLYPH_COUNT};
    use pretty_assertions::assert_eq;

    /// Small glyph for code `c` is `[c, c+1, ..., c+7]`; large glyph bytes
    /// are `c` on even offsets and `!c` on odd ones.
    fn test_fonts() -> Fonts {
        let small: Vec<u8> = (0..GLYPH_COUNT)
            .flat_map(|g| (0..8).map(move |r| (g as u8 + 32).wrapping_add(r)))
            .collect();
        let large: Vec<u8> = (0..GLYPH_COUNT)
            .flat_map(|g| {
                let c = g as u8 + 32;
                (0..64).map(move |i| if i % 2 == 0 { c } else { !c })
            })
            .collect();
        Fonts::new(
            FontTable::new(FontSize::Small, small).unwrap(),
            FontTable::new(FontSize::Large, large).unwrap(),
        )
        .unwrap()
    }

    fn column(memory: &[u8], pitch: usize, byte_col: usize, rows: std::ops::Range<usize>) -> Vec<u8> {
        rows.map(|r| memory[r * pitch + byte_col]).collect()
    }

    #[test]
    fn test_small_glyph_copied_verbatim() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 4 * 16];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 32, 16).unwrap();
            fb.draw_text(&fonts, Some((8, 4)), "A", FontSize::Small, false).unwrap();
            assert_eq!(fb.cursor(), (16, 4));
        }
        assert_eq!(column(&memory, 4, 1, 4..12), fonts.small.glyph('A').to_vec());
        // Nothing else touched
        assert_eq!(column(&memory, 4, 0, 0..16), vec![0; 16]);
        assert_eq!(column(&memory, 4, 1, 0..4), vec![0; 4]);
        assert_eq!(column(&memory, 4, 1, 12..16), vec![0; 4]);
    }

    #[test]
    fn test_small_glyph_inverted() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 8];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 8, 8).unwrap();
            fb.draw_text(&fonts, Some((0, 0)), "Z", FontSize::Small, true).unwrap();
        }
        let expected: Vec<u8> = fonts.small.glyph('Z').iter().map(|b| !b).collect();
        assert_eq!(memory, expected);
    }

    #[test]
    fn test_large_glyph_two_bytes_per_row() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 4 * 32];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 32, 32).unwrap();
            fb.draw_text(&fonts, Some((16, 0)), "B", FontSize::Large, false).unwrap();
            assert_eq!(fb.cursor(), (32, 0));
        }
        let glyph = fonts.large.glyph('B');
        for row in 0..32 {
            assert_eq!(&memory[row * 4..row * 4 + 2], &[0, 0]);
            assert_eq!(&memory[row * 4 + 2..row * 4 + 4], &glyph[row * 2..row * 2 + 2]);
        }
    }

    #[test]
    fn test_unaligned_cursor_rounds_down_to_byte() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 2 * 8];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 16, 8).unwrap();
            fb.draw_text(&fonts, Some((5, 0)), "A", FontSize::Small, false).unwrap();
            assert_eq!(fb.cursor(), (13, 0));
        }
        assert_eq!(column(&memory, 2, 0, 0..8), fonts.small.glyph('A').to_vec());
    }

    #[test]
    fn test_large_glyph_clipped_at_row_end() {
        let fonts = test_fonts();
        // 24 dots wide: a large glyph at x=16 only has one byte of room
        let mut memory = vec![0u8; 3 * 32];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 24, 32).unwrap();
            fb.draw_text(&fonts, Some((16, 0)), "C", FontSize::Large, false).unwrap();
        }
        let glyph = fonts.large.glyph('C');
        for row in 0..32 {
            assert_eq!(&memory[row * 3..row * 3 + 2], &[0, 0]);
            assert_eq!(memory[row * 3 + 2], glyph[row * 2]);
        }
    }

    #[test]
    fn test_word_wrap_moves_to_next_line() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 3 * 16];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 24, 16).unwrap();
            fb.set_wrap(true);
            fb.draw_text(&fonts, Some((0, 0)), "ABCD", FontSize::Small, false).unwrap();
            assert_eq!(fb.cursor(), (8, 8));
        }
        assert_eq!(column(&memory, 3, 2, 0..8), fonts.small.glyph('C').to_vec());
        assert_eq!(column(&memory, 3, 0, 8..16), fonts.small.glyph('D').to_vec());
    }

    #[test]
    fn test_wrap_at_exact_edge() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 3 * 16];
        let mut fb = FrameBuffer::with_buffer(&mut memory, 24, 16).unwrap();
        fb.set_wrap(true);
        fb.draw_text(&fonts, Some((0, 0)), "ABC", FontSize::Small, false).unwrap();
        assert_eq!(fb.cursor(), (0, 8));
    }

    #[test]
    fn test_no_wrap_stops_at_edge() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 2 * 16];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 16, 16).unwrap();
            fb.draw_text(&fonts, Some((0, 0)), "ABCD", FontSize::Small, false).unwrap();
            assert_eq!(fb.cursor(), (16, 0));
        }
        // Second line untouched
        assert!(memory[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_wrap_stops_at_bottom() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 2 * 16];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 16, 16).unwrap();
            fb.set_wrap(true);
            fb.draw_text(&fonts, Some((0, 0)), "ABCDEF", FontSize::Small, false).unwrap();
            assert_eq!(fb.cursor(), (0, 16));
        }
        assert_eq!(column(&memory, 2, 1, 8..16), fonts.small.glyph('D').to_vec());
    }

    #[test]
    fn test_cursor_continues_between_calls() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 4 * 8];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 32, 8).unwrap();
            fb.draw_text(&fonts, Some((0, 0)), "A", FontSize::Small, false).unwrap();
            fb.draw_text(&fonts, None, "B", FontSize::Small, false).unwrap();
            assert_eq!(fb.cursor(), (16, 0));
        }
        assert_eq!(column(&memory, 4, 1, 0..8), fonts.small.glyph('B').to_vec());
    }

    #[test]
    fn test_no_room_draws_nothing() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 4 * 40];
        let mut fb = FrameBuffer::with_buffer(&mut memory, 32, 40).unwrap();

        // 33 + 8 > 40
        assert!(matches!(
            fb.draw_text(&fonts, Some((0, 33)), "A", FontSize::Small, false),
            Err(PrinterError::NoRoom { glyph_height: 8, .. })
        ));
        // 9 + 32 > 40
        assert!(matches!(
            fb.draw_text(&fonts, Some((0, 9)), "A", FontSize::Large, false),
            Err(PrinterError::NoRoom { glyph_height: 32, .. })
        ));
        // past the right edge
        assert!(fb.draw_text(&fonts, Some((32, 0)), "A", FontSize::Small, false).is_err());
        assert!(fb.as_bytes().unwrap().iter().all(|&b| b == 0));

        // exactly enough room
        fb.draw_text(&fonts, Some((0, 8)), "A", FontSize::Large, false).unwrap();
    }

    #[test]
    fn test_huge_cursor_is_no_room() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 48 * 64];
        let mut fb = FrameBuffer::with_buffer(&mut memory, 384, 64).unwrap();

        assert!(matches!(
            fb.draw_text(&fonts, Some((0, usize::MAX)), "A", FontSize::Small, false),
            Err(PrinterError::NoRoom { glyph_height: 8, .. })
        ));
        assert!(matches!(
            fb.draw_text(&fonts, Some((0, usize::MAX - 16)), "A", FontSize::Large, false),
            Err(PrinterError::NoRoom { glyph_height: 32, .. })
        ));
        assert!(matches!(
            fb.draw_text(&fonts, Some((usize::MAX, 0)), "A", FontSize::Small, false),
            Err(PrinterError::NoRoom { .. })
        ));
        assert!(fb.as_bytes().unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_large_wrap_advances_one_glyph_height() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 4 * 64];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 32, 64).unwrap();
            fb.set_wrap(true);
            fb.draw_text(&fonts, Some((0, 0)), "ABC", FontSize::Large, false).unwrap();
            assert_eq!(fb.cursor(), (16, 32));
        }
        let b = fonts.large.glyph('B');
        let c = fonts.large.glyph('C');
        for row in 0..32 {
            assert_eq!(&memory[row * 4 + 2..row * 4 + 4], &b[row * 2..row * 2 + 2]);
            // 'C' starts column 0 on the second text line
            let below = (row + 32) * 4;
            assert_eq!(&memory[below..below + 2], &c[row * 2..row * 2 + 2]);
            assert_eq!(&memory[below + 2..below + 4], &[0, 0]);
        }
    }

    #[test]
    fn test_large_glyph_inverted() {
        let fonts = test_fonts();
        let mut memory = vec![0u8; 2 * 32];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 16, 32).unwrap();
            fb.draw_text(&fonts, Some((0, 0)), "Q", FontSize::Large, true).unwrap();
        }
        let expected: Vec<u8> = fonts.large.glyph('Q').iter().map(|b| !b).collect();
        assert_eq!(expected.len(), 64);
        assert_eq!(memory, expected);
    }

    #[test]
    fn test_unbound_text_fails() {
        let fonts = test_fonts();
        let mut fb = FrameBuffer::new();
        assert!(matches!(
            fb.draw_text(&fonts, Some((0, 0)), "A", FontSize::Small, false),
            Err(PrinterError::Unbound)
        ));
    }
}
