//! PNG previews of a framebuffer, for checking a layout without paper.

use std::io::Cursor;
use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};

use crate::error::PrinterError;

use super::framebuffer::FrameBuffer;

/// Convert the bound bitmap to a grayscale image (set dots black).
pub fn to_image(fb: &FrameBuffer<'_>) -> Result<GrayImage, PrinterError> {
    let data = fb.as_bytes()?;
    let (width, height, pitch) = (fb.width(), fb.height(), fb.pitch());

    let mut img = GrayImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            let byte_idx = y * pitch + x / 8;
            let bit_idx = 7 - (x % 8);
            let is_black = (data[byte_idx] >> bit_idx) & 1 == 1;

            let color = if is_black { 0u8 } else { 255u8 };
            img.put_pixel(x as u32, y as u32, Luma([color]));
        }
    }
    Ok(img)
}

/// Save the bitmap as a PNG file.
pub fn save_png<P: AsRef<Path>>(fb: &FrameBuffer<'_>, path: P) -> Result<(), PrinterError> {
    let path = path.as_ref();
    to_image(fb)?
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| PrinterError::Image(format!("Failed to save {}: {}", path.display(), e)))
}

/// Encode the bitmap as PNG bytes.
pub fn to_png_bytes(fb: &FrameBuffer<'_>) -> Result<Vec<u8>, PrinterError> {
    let mut png_bytes = Vec::new();
    to_image(fb)?
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| PrinterError::Image(format!("Failed to encode PNG: {}", e)))?;
    Ok(png_bytes)
}
