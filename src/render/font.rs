//! # Glyph Tables
//!
//! Text is drawn from flat glyph tables: one fixed-size bitmap per printable
//! ASCII code, starting at code 32 (space) and ending at 127.
//!
//! | Size | Cell | Bytes per row | Bytes per glyph |
//! |------|------|---------------|-----------------|
//! | [`FontSize::Small`] | 8×8 | 1 | 8 |
//! | [`FontSize::Large`] | 16×32 | 2 | 64 |
//!
//! Rows are packed MSB-first like the framebuffer, so a glyph row can be
//! copied into the bitmap byte for byte.
//!
//! Tables are opaque data: bring your own with [`FontTable::new`], or build
//! the bundled ones from the Spleen bitmap fonts with [`Fonts::spleen`].

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use spleen_font::{FONT_5X8, FONT_16X32, PSF2Font};

use crate::error::PrinterError;

/// First character code stored in a table.
pub const FIRST_CHAR: u8 = 32;

/// Number of glyphs in a table (codes 32..=127).
pub const GLYPH_COUNT: usize = 96;

/// Drawn in place of characters a table has no glyph for.
pub const REPLACEMENT_CHAR: char = '?';

/// Font size tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    /// 8×8 cell
    Small,
    /// 16×32 cell
    Large,
}

impl FontSize {
    /// Glyph width in dots (also the cursor advance).
    pub const fn glyph_width(self) -> usize {
        match self {
            FontSize::Small => 8,
            FontSize::Large => 16,
        }
    }

    /// Glyph height in rows (also the wrap line advance).
    pub const fn glyph_height(self) -> usize {
        match self {
            FontSize::Small => 8,
            FontSize::Large => 32,
        }
    }

    pub const fn bytes_per_row(self) -> usize {
        self.glyph_width() / 8
    }

    pub const fn glyph_bytes(self) -> usize {
        self.bytes_per_row() * self.glyph_height()
    }
}

impl FromStr for FontSize {
    type Err = PrinterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" | "8x8" => Ok(FontSize::Small),
            "large" | "16x32" => Ok(FontSize::Large),
            _ => Err(PrinterError::UnknownFontSize(s.to_string())),
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSize::Small => f.write_str("small"),
            FontSize::Large => f.write_str("large"),
        }
    }
}

/// A table of [`GLYPH_COUNT`] glyphs of one [`FontSize`].
#[derive(Clone)]
pub struct FontTable {
    size: FontSize,
    data: Cow<'static, [u8]>,
}

impl FontTable {
    /// Wrap raw glyph data.
    ///
    /// ## Errors
    ///
    /// [`PrinterError::Font`] if `data` is shorter than
    /// `GLYPH_COUNT * size.glyph_bytes()` bytes.
    pub fn new(size: FontSize, data: impl Into<Cow<'static, [u8]>>) -> Result<Self, PrinterError> {
        let data = data.into();
        let needed = GLYPH_COUNT * size.glyph_bytes();
        if data.len() < needed {
            return Err(PrinterError::Font(format!(
                "{} table needs {} bytes, got {}",
                size,
                needed,
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    #[inline]
    pub fn size(&self) -> FontSize {
        self.size
    }

    /// Glyph bytes for `ch`, row-major, `size.bytes_per_row()` bytes per row.
    ///
    /// Characters outside 32..=127 map to [`REPLACEMENT_CHAR`].
    pub fn glyph(&self, ch: char) -> &[u8] {
        let code = match u8::try_from(ch) {
            Ok(code) if code >= FIRST_CHAR && code < 128 => code,
            _ => REPLACEMENT_CHAR as u8,
        };
        let len = self.size.glyph_bytes();
        let offset = (code - FIRST_CHAR) as usize * len;
        &self.data[offset..offset + len]
    }

    /// Build a table from the bundled Spleen fonts.
    ///
    /// - Small: Spleen 5×8, left-aligned in the 8×8 cell
    /// - Large: Spleen 16×32
    ///
    /// Spleen stores glyph rows MSB-first padded to whole bytes, which is
    /// already the table layout, so glyphs are copied as-is.
    pub fn spleen(size: FontSize) -> Result<Self, PrinterError> {
        let (source, label) = match size {
            FontSize::Small => (FONT_5X8, "5x8"),
            FontSize::Large => (FONT_16X32, "16x32"),
        };
        let mut font = PSF2Font::new(source)
            .map_err(|e| PrinterError::Font(format!("failed to parse Spleen {}: {}", label, e)))?;

        let mut data = vec![0u8; GLYPH_COUNT * size.glyph_bytes()];
        for (i, glyph_bytes) in data.chunks_exact_mut(size.glyph_bytes()).enumerate() {
            let code = FIRST_CHAR + i as u8;
            let Some(spleen_glyph) = font.get_glyph_data(&[code]) else {
                continue;
            };
            if spleen_glyph.len() != glyph_bytes.len() {
                return Err(PrinterError::Font(format!(
                    "Spleen {} glyph {} is {} bytes, expected {}",
                    label,
                    code,
                    spleen_glyph.len(),
                    glyph_bytes.len()
                )));
            }
            glyph_bytes.copy_from_slice(spleen_glyph);
        }

        Self::new(size, data)
    }
}

impl fmt::Debug for FontTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontTable")
            .field("size", &self.size)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// The pair of tables text drawing chooses from.
#[derive(Debug, Clone)]
pub struct Fonts {
    pub small: FontTable,
    pub large: FontTable,
}

impl Fonts {
    /// Pair two caller-supplied tables.
    pub fn new(small: FontTable, large: FontTable) -> Result<Self, PrinterError> {
        if small.size() != FontSize::Small || large.size() != FontSize::Large {
            return Err(PrinterError::Font(
                "expected a small table and a large table".to_string(),
            ));
        }
        Ok(Self { small, large })
    }

    /// Both tables built from the bundled Spleen fonts.
    pub fn spleen() -> Result<Self, PrinterError> {
        Ok(Self {
            small: FontTable::spleen(FontSize::Small)?,
            large: FontTable::spleen(FontSize::Large)?,
        })
    }

    pub fn table(&self, size: FontSize) -> &FontTable {
        match size {
            FontSize::Small => &self.small,
            FontSize::Large => &self.large,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
