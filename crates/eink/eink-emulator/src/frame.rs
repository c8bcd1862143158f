//! Rendered emulator output

use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::GrayColor;
use image::{GrayImage, Luma};

use crate::config::{BLACK_LEVEL, WHITE_LEVEL};
use crate::framebuffer::FrameBuffer;

/// What an emulated region shows after one write
///
/// One [`Gray8`] level per pixel in scan order. Pixels still walking a
/// ghost ladder show intermediate grays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    width: u32,
    height: u32,
    levels: Vec<Gray8>,
}

impl RenderedFrame {
    pub(crate) fn from_levels(width: u32, height: u32, levels: Vec<Gray8>) -> Self {
        Self {
            width,
            height,
            levels,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Level at `(x, y)`, `None` if out of bounds
    pub fn level(&self, x: u32, y: u32) -> Option<Gray8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = u64::from(y)
            .checked_mul(u64::from(self.width))?
            .checked_add(u64::from(x))?;
        self.levels.get(usize::try_from(index).ok()?).copied()
    }

    /// All levels in scan order
    pub fn levels(&self) -> &[Gray8] {
        &self.levels
    }

    /// True when every pixel is pure black or pure white (no ghosting)
    pub fn is_polar(&self) -> bool {
        self.levels
            .iter()
            .all(|level| matches!(level.luma(), BLACK_LEVEL | WHITE_LEVEL))
    }

    /// Number of pixels showing an intermediate gray
    pub fn ghost_pixels(&self) -> usize {
        self.levels
            .iter()
            .filter(|level| !matches!(level.luma(), BLACK_LEVEL | WHITE_LEVEL))
            .count()
    }

    /// Threshold to a packed frame; only fully white pixels count as white
    pub fn to_frame_buffer(&self) -> FrameBuffer {
        FrameBuffer::from_pixels(
            self.width,
            self.height,
            self.levels.iter().map(|level| level.luma() == WHITE_LEVEL),
        )
    }

    /// Copy into an `image` luma buffer (for screenshots and golden files)
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([self.level(x, y).map_or(WHITE_LEVEL, |level| level.luma())])
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn frame() -> RenderedFrame {
        RenderedFrame::from_levels(
            2,
            2,
            vec![
                Gray8::new(0),
                Gray8::new(180),
                Gray8::new(255),
                Gray8::new(255),
            ],
        )
    }

    #[test]
    fn test_level_lookup() {
        let frame = frame();
        assert_eq!(frame.level(1, 0), Some(Gray8::new(180)));
        assert_eq!(frame.level(0, 1), Some(Gray8::new(255)));
        assert_eq!(frame.level(2, 0), None);
    }

    #[test]
    fn test_ghost_detection() {
        let frame = frame();
        assert!(!frame.is_polar());
        assert_eq!(frame.ghost_pixels(), 1);
    }

    #[test]
    fn test_threshold_to_frame_buffer() {
        let packed = frame().to_frame_buffer();
        assert_eq!(packed.pixel(0, 0), Some(false));
        assert_eq!(packed.pixel(1, 0), Some(false), "ghost is not white yet");
        assert_eq!(packed.pixel(0, 1), Some(true));
    }

    #[test]
    fn test_gray_image_export() {
        let img = frame().to_gray_image();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 0).0, [180]);
    }
}
