//! 1-bit drawing surface
//!
//! [`MonochromeImage`] is what callers draw on. Rows are padded to whole
//! bytes, MSB first, a set bit being white paper. It implements the
//! embedded-graphics [`DrawTarget`] with [`BinaryColor::On`] as black ink,
//! so text and primitives draw dark on a white page.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use image::{DynamicImage, GrayImage, Luma};

use eink_emulator::{FrameBuffer, Orientation};

use crate::error::DisplayError;

/// Luma below which an imported pixel becomes ink
pub const INK_THRESHOLD: u8 = 128;

/// Byte-padded 1-bit image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeImage {
    width: u32,
    height: u32,
    stride: usize,
    bits: Vec<u8>,
}

impl MonochromeImage {
    /// White image of `width × height`
    pub fn new(width: u32, height: u32) -> Result<Self, DisplayError> {
        Self::filled(width, height, BinaryColor::Off)
    }

    /// Image of `width × height` filled with `color`
    pub fn filled(width: u32, height: u32, color: BinaryColor) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::InvalidDimension { width, height });
        }
        let stride = usize::try_from(width.div_ceil(8))
            .map_err(|_| DisplayError::InvalidDimension { width, height })?;
        let len = usize::try_from(height)
            .ok()
            .and_then(|rows| rows.checked_mul(stride))
            .ok_or(DisplayError::InvalidDimension { width, height })?;
        let mut image = Self {
            width,
            height,
            stride,
            bits: vec![0; len],
        };
        image.fill(color);
        Ok(image)
    }

    /// Threshold a grayscale image: luma below 128 becomes ink
    pub fn from_luma(source: &GrayImage) -> Result<Self, DisplayError> {
        let (width, height) = source.dimensions();
        let mut image = Self::new(width, height)?;
        for (x, y, Luma([luma])) in source.enumerate_pixels() {
            if *luma < INK_THRESHOLD {
                image.set_pixel(x, y, BinaryColor::On);
            }
        }
        Ok(image)
    }

    /// Convert any decoded image to luma, then threshold
    pub fn from_dynamic(source: &DynamicImage) -> Result<Self, DisplayError> {
        Self::from_luma(&source.to_luma8())
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw row-padded bits
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Color at `(x, y)`, `None` if out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        let (index, mask) = self.locate(x, y)?;
        let byte = self.bits.get(index)?;
        Some(if byte & mask != 0 {
            BinaryColor::Off
        } else {
            BinaryColor::On
        })
    }

    /// Set `(x, y)` to `color`; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, color: BinaryColor) {
        let Some((index, mask)) = self.locate(x, y) else {
            return;
        };
        if let Some(byte) = self.bits.get_mut(index) {
            match color {
                BinaryColor::Off => *byte |= mask,
                BinaryColor::On => *byte &= !mask,
            }
        }
    }

    /// Fill the whole image with `color`
    pub fn fill(&mut self, color: BinaryColor) {
        match color {
            BinaryColor::On => self.bits.fill(0x00),
            BinaryColor::Off => {
                self.bits.fill(0xFF);
                self.clear_row_padding();
            }
        }
    }

    /// Number of ink pixels
    pub fn count_ink(&self) -> u64 {
        let white: u64 = self.bits.iter().map(|byte| u64::from(byte.count_ones())).sum();
        u64::from(self.width)
            .saturating_mul(u64::from(self.height))
            .saturating_sub(white)
    }

    /// Repack into a contiguous frame tagged with `orientation`
    pub fn to_frame_buffer(&self, orientation: Orientation) -> Result<FrameBuffer, DisplayError> {
        let frame = FrameBuffer::from_fn(self.width, self.height, orientation, |x, y| {
            self.pixel(x, y) == Some(BinaryColor::Off)
        })?;
        Ok(frame)
    }

    /// Unpack a frame (set bit = white)
    pub fn from_frame_buffer(frame: &FrameBuffer) -> Result<Self, DisplayError> {
        let mut image = Self::filled(frame.width(), frame.height(), BinaryColor::On)?;
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.pixel(x, y) == Some(true) {
                    image.set_pixel(x, y, BinaryColor::Off);
                }
            }
        }
        Ok(image)
    }

    /// Export as 8-bit luma (0 ink, 255 paper)
    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| match self.pixel(x, y) {
            Some(BinaryColor::On) => Luma([0]),
            _ => Luma([255]),
        })
    }

    // SAFETY: x < width and y < height are checked first; y * stride + x / 8
    // is below bits.len() = height * stride.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = usize::try_from(y).ok()?;
        let col = usize::try_from(x / 8).ok()?;
        let mask = 0x80u8 >> (x % 8) as u8;
        Some((row * self.stride + col, mask))
    }

    // SAFETY: used is in 1..8 here, so the shift is in 1..8.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn clear_row_padding(&mut self) {
        let used = self.width % 8;
        if used == 0 {
            return;
        }
        let mask = 0xFFu8 << (8 - used) as u8;
        for row in self.bits.chunks_mut(self.stride) {
            if let Some(last) = row.last_mut() {
                *last &= mask;
            }
        }
    }
}

impl OriginDimensions for MonochromeImage {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for MonochromeImage {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_new_is_white_with_padded_rows() {
        let image = MonochromeImage::new(10, 3).unwrap();
        assert_eq!(image.stride(), 2);
        assert_eq!(image.as_bytes(), &[0xFF, 0xC0, 0xFF, 0xC0, 0xFF, 0xC0]);
        assert_eq!(image.count_ink(), 0);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            MonochromeImage::new(0, 5),
            Err(DisplayError::InvalidDimension {
                width: 0,
                height: 5
            })
        );
    }

    #[test]
    fn test_set_and_get() {
        let mut image = MonochromeImage::new(9, 2).unwrap();
        image.set_pixel(8, 1, BinaryColor::On);
        assert_eq!(image.pixel(8, 1), Some(BinaryColor::On));
        assert_eq!(image.pixel(7, 1), Some(BinaryColor::Off));
        assert_eq!(image.pixel(9, 1), None);
        assert_eq!(image.count_ink(), 1);
    }

    #[test]
    fn test_draw_rectangle() {
        let mut image = MonochromeImage::new(16, 16).unwrap();
        Rectangle::new(Point::new(2, 2), Size::new(4, 3))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut image)
            .unwrap();

        assert_eq!(image.count_ink(), 12);
        assert_eq!(image.pixel(2, 2), Some(BinaryColor::On));
        assert_eq!(image.pixel(6, 2), Some(BinaryColor::Off));
    }

    #[test]
    fn test_negative_points_ignored() {
        let mut image = MonochromeImage::new(4, 4).unwrap();
        Pixel(Point::new(-1, 0), BinaryColor::On).draw(&mut image).unwrap();
        assert_eq!(image.count_ink(), 0);
    }

    #[test]
    fn test_frame_buffer_is_contiguous() {
        // 10 px wide: padded rows are 2 bytes, contiguous frame is 20 bits
        let mut image = MonochromeImage::new(10, 2).unwrap();
        image.set_pixel(0, 1, BinaryColor::On);
        let frame = image.to_frame_buffer(Orientation::Normal).unwrap();

        assert_eq!(frame.bits(), &[0xFF, 0xDF, 0xF0]);
        assert_eq!(MonochromeImage::from_frame_buffer(&frame).unwrap(), image);
    }

    #[test]
    fn test_from_luma_thresholds_at_mid_gray() {
        let source = GrayImage::from_fn(4, 1, |x, _| Luma([[0, 127, 128, 255][x as usize]]));
        let image = MonochromeImage::from_luma(&source).unwrap();
        assert_eq!(image.pixel(0, 0), Some(BinaryColor::On));
        assert_eq!(image.pixel(1, 0), Some(BinaryColor::On));
        assert_eq!(image.pixel(2, 0), Some(BinaryColor::Off));
        assert_eq!(image.pixel(3, 0), Some(BinaryColor::Off));
    }

    #[test]
    fn test_luma_export() {
        let mut image = MonochromeImage::new(2, 1).unwrap();
        image.set_pixel(1, 0, BinaryColor::On);
        let luma = image.to_luma();
        assert_eq!(luma.get_pixel(0, 0).0, [255]);
        assert_eq!(luma.get_pixel(1, 0).0, [0]);
    }
}
