//! # Monochrome Raster
//!
//! The 1-bit image the printer receives, plus its BMP container.
//!
//! ## Bit Packing
//!
//! Rows are packed MSB first, padded to whole bytes:
//! - Bit 7 (MSB) = leftmost pixel
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! ```
//!
//! ## Quantization
//!
//! Grayscale pixels darker than [`MONO_THRESHOLD`] become black. There is
//! no dithering: label content is line art, and a fixed threshold keeps
//! barcodes crisp and output reproducible.
//!
//! ## BMP Layout
//!
//! ```text
//! BITMAPFILEHEADER   14 bytes   "BM", file size, pixel offset (62)
//! BITMAPINFOHEADER   40 bytes   width, height (positive = bottom-up), 1 bpp
//! Palette             8 bytes   index 0 = black, index 1 = white
//! Pixel rows                    bottom row first, each padded to 4 bytes
//! ```
//!
//! The file stores palette indices, so raster bits are inverted on the way
//! out (black pixel → index 0).

use std::fs;
use std::path::Path;

use image::{GrayImage, ImageEncoder, Luma};

use crate::error::LabelError;

/// Luma values below this are black.
pub const MONO_THRESHOLD: u8 = 128;

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;
const PALETTE_LEN: u32 = 8;

/// Pack a row of boolean pixel values into bytes (true = black, MSB first).
///
/// ```
/// use labelpress::render::mono::pack_row;
///
/// let row = vec![true, true, false, false, true, false, true, false];
/// assert_eq!(pack_row(&row), vec![0b11001010]);
/// assert_eq!(pack_row(&[true; 12]), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }

    bytes
}

/// A 1-bit-per-pixel label image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoRaster {
    width: u32,
    height: u32,
    dpi: u32,
    data: Vec<u8>,
}

impl MonoRaster {
    /// Threshold a grayscale image, row-major.
    pub fn from_luma(gray: &GrayImage, dpi: u32) -> Self {
        let (width, height) = gray.dimensions();
        let mut data = Vec::with_capacity(width.div_ceil(8) as usize * height as usize);
        let mut row = Vec::with_capacity(width as usize);

        for y in 0..height {
            row.clear();
            row.extend((0..width).map(|x| gray.get_pixel(x, y)[0] < MONO_THRESHOLD));
            data.extend(pack_row(&row));
        }

        Self {
            width,
            height,
            dpi,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Bytes per packed row.
    pub fn width_bytes(&self) -> usize {
        self.width.div_ceil(8) as usize
    }

    /// Packed rows, top row first.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_black(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.data[y as usize * self.width_bytes() + x as usize / 8];
        (byte >> (7 - (x % 8))) & 1 == 1
    }

    pub fn black_count(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Encode as a 1-bpp BMP file.
    pub fn to_bmp(&self) -> Vec<u8> {
        let stride = self.width.div_ceil(32) as usize * 4;
        let pixel_bytes = stride * self.height as usize;
        let offset = FILE_HEADER_LEN + INFO_HEADER_LEN + PALETTE_LEN;
        let file_size = offset as usize + pixel_bytes;
        // 1 inch = 0.0254 m
        let ppm = (self.dpi as f64 / 0.0254).round() as i32;

        let mut out = Vec::with_capacity(file_size);

        out.extend_from_slice(b"BM");
        out.extend_from_slice(&(file_size as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());

        out.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
        out.extend_from_slice(&(self.width as i32).to_le_bytes());
        out.extend_from_slice(&(self.height as i32).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // planes
        out.extend_from_slice(&1u16.to_le_bytes()); // bits per pixel
        out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
        out.extend_from_slice(&(pixel_bytes as u32).to_le_bytes());
        out.extend_from_slice(&ppm.to_le_bytes());
        out.extend_from_slice(&ppm.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());

        out.extend_from_slice(&[0, 0, 0, 0]);
        out.extend_from_slice(&[255, 255, 255, 0]);

        let width_bytes = self.width_bytes();
        for y in (0..self.height as usize).rev() {
            let row = &self.data[y * width_bytes..(y + 1) * width_bytes];
            out.extend(row.iter().map(|b| !b));
            out.resize(out.len() + (stride - width_bytes), 0);
        }

        out
    }

    /// Write the BMP encoding to `path`.
    pub fn save_bmp(&self, path: &Path) -> Result<(), LabelError> {
        fs::write(path, self.to_bmp())?;
        Ok(())
    }

    /// Encode as an 8-bit grayscale PNG, for previews.
    pub fn to_png(&self) -> Result<Vec<u8>, LabelError> {
        let mut img = GrayImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let color = if self.is_black(x, y) { 0u8 } else { 255u8 };
                img.put_pixel(x, y, Luma([color]));
            }
        }

        let mut png_bytes = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png_bytes)
            .write_image(
                img.as_raw(),
                self.width,
                self.height,
                image::ExtendedColorType::L8,
            )
            .map_err(|e| LabelError::Image(format!("Failed to encode PNG: {}", e)))?;

        Ok(png_bytes)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn checker(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 { Luma([0]) } else { Luma([255]) }
        })
    }

    #[test]
    fn test_pack_row_padding() {
        assert_eq!(pack_row(&[true]), vec![0x80]);
        assert_eq!(pack_row(&[false; 9]), vec![0x00, 0x00]);
        assert!(pack_row(&[]).is_empty());
    }

    #[test]
    fn test_threshold_midpoint() {
        let gray = GrayImage::from_fn(4, 1, |x, _| Luma([[0, 127, 128, 255][x as usize]]));
        let raster = MonoRaster::from_luma(&gray, 203);
        assert!(raster.is_black(0, 0));
        assert!(raster.is_black(1, 0));
        assert!(!raster.is_black(2, 0));
        assert!(!raster.is_black(3, 0));
    }

    #[test]
    fn test_white_image_is_all_zero() {
        let gray = GrayImage::from_pixel(13, 5, Luma([255]));
        let raster = MonoRaster::from_luma(&gray, 300);
        assert_eq!(raster.width_bytes(), 2);
        assert_eq!(raster.data().len(), 10);
        assert!(raster.data().iter().all(|&b| b == 0));
        assert_eq!(raster.black_count(), 0);
    }

    #[test]
    fn test_row_major_order() {
        let raster = MonoRaster::from_luma(&checker(10, 3), 300);
        for y in 0..3 {
            for x in 0..10 {
                assert_eq!(raster.is_black(x, y), (x + y) % 2 == 0);
            }
        }
        assert!(!raster.is_black(10, 0));
    }

    #[test]
    fn test_bmp_headers() {
        let raster = MonoRaster::from_luma(&checker(40, 3), 300);
        let bmp = raster.to_bmp();

        assert_eq!(&bmp[0..2], b"BM");
        assert_eq!(u32_at(&bmp, 2) as usize, bmp.len());
        assert_eq!(u32_at(&bmp, 10), 62);
        assert_eq!(u32_at(&bmp, 14), 40);
        assert_eq!(u32_at(&bmp, 18), 40); // width
        assert_eq!(u32_at(&bmp, 22), 3); // height
        assert_eq!(u16::from_le_bytes([bmp[28], bmp[29]]), 1); // bpp
        assert_eq!(u32_at(&bmp, 38), 11811); // 300 dpi in pixels per metre

        // 40 px → 5 bytes → padded to 8
        assert_eq!(bmp.len(), 62 + 8 * 3);
    }

    #[test]
    fn test_bmp_rows_bottom_up_and_inverted() {
        // Top row black, rest white
        let gray = GrayImage::from_fn(8, 2, |_, y| if y == 0 { Luma([0]) } else { Luma([255]) });
        let bmp = MonoRaster::from_luma(&gray, 203).to_bmp();

        let pixels = &bmp[62..];
        // First stored row is the bottom (white → palette index 1)
        assert_eq!(pixels[0], 0xFF);
        // Second stored row is the top (black → palette index 0)
        assert_eq!(pixels[4], 0x00);
    }

    #[test]
    fn test_png_preview() {
        let raster = MonoRaster::from_luma(&checker(16, 16), 203);
        let png = raster.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
