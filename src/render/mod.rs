//! # Bitmap Rendering
//!
//! Drawing into a packed 1bpp framebuffer.
//!
//! ## Components
//!
//! - [`framebuffer`]: the borrowed bitmap, pixels, cursor and wrap state
//! - [`line`]: Bresenham lines with all-or-nothing bounds rejection
//! - [`font`]: glyph tables for the small (8×8) and large (16×32) fonts
//! - [`text`]: glyph blitting with cursor advance, wrap and inversion
//! - [`preview`]: PNG export for checking output on screen

pub mod font;
pub mod framebuffer;
pub mod line;
pub mod preview;
pub mod text;

pub use font::{FontSize, FontTable, Fonts};
pub use framebuffer::{FrameBuffer, pitch_for};
