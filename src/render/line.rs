//! # Line Rasterization
//!
//! Integer Bresenham lines drawn straight into the packed bitmap.
//!
//! Endpoints are reordered so the major axis always advances in the positive
//! direction. The rasterizer then walks a byte index and a bit mask instead of
//! recomputing `y * pitch + x / 8` for every dot:
//!
//! | Step | Byte index | Mask |
//! |------|------------|------|
//! | x + 1 | `+1` when the mask wraps past bit 0 | `>> 1`, wraps to `0x80` |
//! | x - 1 | `-1` when the mask wraps past bit 7 | `<< 1`, wraps to `0x01` |
//! | y + 1 | `+pitch` | unchanged |
//! | y - 1 | `-pitch` | unchanged |
//!
//! Lines are all-or-nothing: if either endpoint lies outside the framebuffer
//! nothing is drawn.

use crate::error::PrinterError;

use super::framebuffer::{FrameBuffer, bit_mask};

/// Running write position inside the bitmap.
struct Pen<'b> {
    bytes: &'b mut [u8],
    index: usize,
    mask: u8,
    pitch: usize,
    on: bool,
}

impl Pen<'_> {
    #[inline]
    fn plot(&mut self) {
        if self.on {
            self.bytes[self.index] |= self.mask;
        } else {
            self.bytes[self.index] &= !self.mask;
        }
    }

    #[inline]
    fn step_right(&mut self) {
        self.mask >>= 1;
        if self.mask == 0 {
            self.mask = 0x80;
            self.index += 1;
        }
    }

    #[inline]
    fn step_left(&mut self) {
        if self.mask == 0x80 {
            self.mask = 0x01;
            self.index -= 1;
        } else {
            self.mask <<= 1;
        }
    }

    #[inline]
    fn step_down(&mut self) {
        self.index += self.pitch;
    }

    #[inline]
    fn step_up(&mut self) {
        self.index -= self.pitch;
    }
}

impl FrameBuffer<'_> {
    /// Draw a line from `(x1, y1)` to `(x2, y2)` inclusive.
    ///
    /// `on` sets dots black, `!on` clears them.
    ///
    /// ## Errors
    ///
    /// - [`PrinterError::Unbound`] before a buffer is bound
    /// - [`PrinterError::OutOfBounds`] naming the first endpoint outside
    ///   `[0, width) x [0, height)`; the buffer is left untouched
    ///
    /// ## Example
    ///
    /// ```
    /// use thermal_raster::render::FrameBuffer;
    ///
    /// let mut memory = vec![0u8; 4 * 32];
    /// let mut fb = FrameBuffer::with_buffer(&mut memory, 32, 32)?;
    /// fb.draw_line(0, 0, 31, 31, true)?;
    /// assert!(fb.pixel(17, 17)?);
    /// assert!(fb.draw_line(0, 0, 32, 0, true).is_err());
    /// # Ok::<(), thermal_raster::PrinterError>(())
    /// ```
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, on: bool) -> Result<(), PrinterError> {
        if !self.is_bound() {
            return Err(PrinterError::Unbound);
        }
        for (x, y) in [(x1, y1), (x2, y2)] {
            if !self.contains(x, y) {
                return Err(PrinterError::OutOfBounds {
                    x: i64::from(x),
                    y: i64::from(y),
                });
            }
        }

        let (mut x1, mut y1, mut x2, mut y2) = (x1, y1, x2, y2);
        let pitch = self.pitch();

        if (x2 - x1).abs() > (y2 - y1).abs() {
            // X major: one dot per column
            if x2 < x1 {
                std::mem::swap(&mut x1, &mut x2);
                std::mem::swap(&mut y1, &mut y2);
            }
            let dx = x2 - x1;
            let dy = (y2 - y1).abs();
            let downward = y2 >= y1;
            let mut error = dx >> 1;

            let mut pen = Pen {
                index: y1 as usize * pitch + x1 as usize / 8,
                mask: bit_mask(x1 as usize),
                bytes: self.bytes_mut()?,
                pitch,
                on,
            };
            for x in x1..=x2 {
                pen.plot();
                if x == x2 {
                    break;
                }
                pen.step_right();
                error -= dy;
                if error < 0 {
                    error += dx;
                    if downward {
                        pen.step_down();
                    } else {
                        pen.step_up();
                    }
                }
            }
        } else {
            // Y major: one dot per row
            if y1 > y2 {
                std::mem::swap(&mut x1, &mut x2);
                std::mem::swap(&mut y1, &mut y2);
            }
            let dy = y2 - y1;
            let dx = (x2 - x1).abs();
            let rightward = x2 >= x1;
            let mut error = dy >> 1;

            let mut pen = Pen {
                index: y1 as usize * pitch + x1 as usize / 8,
                mask: bit_mask(x1 as usize),
                bytes: self.bytes_mut()?,
                pitch,
                on,
            };
            for y in y1..=y2 {
                pen.plot();
                if y == y2 {
                    break;
                }
                pen.step_down();
                error -= dx;
                if error < 0 {
                    error += dy;
                    if rightward {
                        pen.step_right();
                    } else {
                        pen.step_left();
                    }
                }
            }
        }

        Ok(())
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::framebuffer::pitch_for;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    /// Collect the set dots of a bitmap.
    fn dots(bytes: &[u8], width: usize, height: usize) -> BTreeSet<(usize, usize)> {
        let pitch = pitch_for(width);
        let mut set = BTreeSet::new();
        for y in 0..height {
            for x in 0..width {
                if bytes[y * pitch + x / 8] & (0x80 >> (x % 8)) != 0 {
                    set.insert((x, y));
                }
            }
        }
        set
    }

    fn draw(width: usize, height: usize, line: (i32, i32, i32, i32)) -> Vec<u8> {
        let mut memory = vec![0u8; pitch_for(width) * height];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, width, height).unwrap();
            let _ = fb.draw_line(line.0, line.1, line.2, line.3, true);
        }
        memory
    }

    /// Same stepping rules, but each dot addressed from its (x, y) coordinates.
    fn reference_line(x1: i32, y1: i32, x2: i32, y2: i32) -> BTreeSet<(usize, usize)> {
        let (mut x1, mut y1, mut x2, mut y2) = (x1, y1, x2, y2);
        let mut set = BTreeSet::new();
        if (x2 - x1).abs() > (y2 - y1).abs() {
            if x2 < x1 {
                std::mem::swap(&mut x1, &mut x2);
                std::mem::swap(&mut y1, &mut y2);
            }
            let dx = x2 - x1;
            let dy = (y2 - y1).abs();
            let yinc = if y2 >= y1 { 1 } else { -1 };
            let mut error = dx >> 1;
            let mut y = y1;
            for x in x1..=x2 {
                set.insert((x as usize, y as usize));
                error -= dy;
                if error < 0 {
                    error += dx;
                    y += yinc;
                }
            }
        } else {
            if y1 > y2 {
                std::mem::swap(&mut x1, &mut x2);
                std::mem::swap(&mut y1, &mut y2);
            }
            let dy = y2 - y1;
            let dx = (x2 - x1).abs();
            let xinc = if x2 >= x1 { 1 } else { -1 };
            let mut error = dy >> 1;
            let mut x = x1;
            for y in y1..=y2 {
                set.insert((x as usize, y as usize));
                error -= dx;
                if error < 0 {
                    error += dy;
                    x += xinc;
                }
            }
        }
        set
    }

    #[test]
    fn test_vertical_line_column_zero() {
        let (w, h) = (20, 12);
        let memory = draw(w, h, (0, 0, 0, h as i32 - 1));
        let pitch = pitch_for(w);
        for row in memory.chunks(pitch) {
            assert_eq!(row, &[0x80, 0x00, 0x00]);
        }
    }

    #[test]
    fn test_horizontal_line_crosses_bytes() {
        let memory = draw(24, 2, (3, 1, 18, 1));
        assert_eq!(&memory[..3], &[0, 0, 0]);
        assert_eq!(&memory[3..], &[0b0001_1111, 0xFF, 0b1110_0000]);
    }

    #[test]
    fn test_single_point() {
        let memory = draw(16, 4, (10, 2, 10, 2));
        let set = dots(&memory, 16, 4);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![(10, 2)]);
    }

    #[test]
    fn test_diagonal() {
        let memory = draw(8, 8, (0, 0, 7, 7));
        for (y, byte) in memory.iter().enumerate() {
            assert_eq!(*byte, 0x80 >> y);
        }
    }

    #[test]
    fn test_anti_diagonal_steps_left_across_bytes() {
        // y-major, x decreasing through a byte boundary
        let memory = draw(16, 16, (12, 0, 3, 15));
        assert_eq!(dots(&memory, 16, 16), reference_line(12, 0, 3, 15));
    }

    #[test]
    fn test_x_major_upward() {
        let memory = draw(32, 8, (0, 7, 31, 0));
        assert_eq!(dots(&memory, 32, 8), reference_line(0, 7, 31, 0));
        assert_eq!(dots(&memory, 32, 8).len(), 32);
    }

    #[test]
    fn test_clear_color_removes_dots() {
        let mut memory = vec![0xFFu8; 2 * 4];
        {
            let mut fb = FrameBuffer::with_buffer(&mut memory, 16, 4).unwrap();
            fb.draw_line(0, 1, 15, 1, false).unwrap();
        }
        assert_eq!(memory, vec![0xFF, 0xFF, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_out_of_bounds_rejects_whole_line() {
        for line in [(-1, 0, 5, 5), (0, 0, 16, 3), (0, 0, 3, 8), (2, -4, 2, 2)] {
            let memory = draw(16, 8, line);
            assert!(memory.iter().all(|&b| b == 0), "line {:?} drew dots", line);
        }
        let mut memory = vec![0u8; 2 * 8];
        let mut fb = FrameBuffer::with_buffer(&mut memory, 16, 8).unwrap();
        assert!(matches!(
            fb.draw_line(0, 0, 16, 3, true),
            Err(PrinterError::OutOfBounds { x: 16, y: 3 })
        ));
    }

    #[test]
    fn test_unbound_line_fails() {
        let mut fb = FrameBuffer::new();
        assert!(matches!(fb.draw_line(0, 0, 1, 1, true), Err(PrinterError::Unbound)));
    }

    proptest! {
        #[test]
        fn prop_line_matches_coordinate_reference(
            x1 in 0i32..40, y1 in 0i32..30, x2 in 0i32..40, y2 in 0i32..30,
        ) {
            let memory = draw(40, 30, (x1, y1, x2, y2));
            prop_assert_eq!(dots(&memory, 40, 30), reference_line(x1, y1, x2, y2));
        }

        #[test]
        fn prop_line_is_symmetric(
            x1 in 0i32..40, y1 in 0i32..30, x2 in 0i32..40, y2 in 0i32..30,
        ) {
            prop_assert_eq!(draw(40, 30, (x1, y1, x2, y2)), draw(40, 30, (x2, y2, x1, y1)));
        }

        #[test]
        fn prop_line_endpoints_are_set(
            x1 in 0i32..40, y1 in 0i32..30, x2 in 0i32..40, y2 in 0i32..30,
        ) {
            let set = dots(&draw(40, 30, (x1, y1, x2, y2)), 40, 30);
            prop_assert!(set.contains(&(x1 as usize, y1 as usize)));
            prop_assert!(set.contains(&(x2 as usize, y2 as usize)));
        }

        #[test]
        fn prop_outside_endpoint_draws_nothing(
            x1 in -10i32..50, y1 in -10i32..40, x2 in -10i32..50, y2 in -10i32..40,
        ) {
            let inside = |x: i32, y: i32| (0..40).contains(&x) && (0..30).contains(&y);
            prop_assume!(!inside(x1, y1) || !inside(x2, y2));
            prop_assert!(draw(40, 30, (x1, y1, x2, y2)).iter().all(|&b| b == 0));
        }
    }
}
