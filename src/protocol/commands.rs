//! # Protocol Constants
//!
//! The printer speaks an ESC/POS-style byte protocol. This crate only needs
//! the raster bit-image command:
//!
//! | Format  | Bytes |
//! |---------|-------|
//! | ASCII   | GS v 0 m xL xH yL yH d1...dk |
//! | Hex     | 1D 76 30 30 xL xH yL yH d1...dk |
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

/// GS (Group Separator) - graphics command prefix
pub const GS: u8 = 0x1D;

/// Raster bit-image subcommand (`v`)
pub const RASTER_BIT_IMAGE: u8 = b'v';

/// Function selector (`0`)
pub const RASTER_FUNCTION: u8 = b'0';

/// Normal density mode (`0`); double-width/height modes are not used
pub const RASTER_MODE_NORMAL: u8 = b'0';

/// Encode a u16 as little-endian bytes
///
/// ## Example
///
/// ```
/// use thermal_raster::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(200), [200, 0]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0), [0, 0]);
        assert_eq!(u16_le(48), [48, 0]);
        assert_eq!(u16_le(500), [0xF4, 0x01]);
        assert_eq!(u16_le(u16::MAX), [0xFF, 0xFF]);
    }

    #[test]
    fn test_raster_command_bytes() {
        assert_eq!([GS, RASTER_BIT_IMAGE, RASTER_FUNCTION, RASTER_MODE_NORMAL], *b"\x1dv00");
    }
}
