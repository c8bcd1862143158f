//! Packed monochrome frame buffer
//!
//! One bit per pixel, row-major, MSB first, with no row padding: pixel
//! `(x, y)` is bit `y * width + x`. A set bit is white paper, a clear bit is
//! black ink. Unused bits in the final byte are always zero, so byte
//! equality is pixel equality.

use thiserror_no_std::Error;

/// Orientation the content was prepared for
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    /// Content as drawn
    #[default]
    Normal,
    /// Content rotated 180° (panel mounted upside down)
    UpsideDown,
}

impl Orientation {
    /// The opposite orientation
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Normal => Orientation::UpsideDown,
            Orientation::UpsideDown => Orientation::Normal,
        }
    }
}

/// Frame construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Width or height is zero, or the pixel count does not fit in memory
    #[error("invalid frame dimension {width}x{height}")]
    InvalidDimension {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Supplied bit buffer has the wrong length
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    BufferLength {
        /// Bytes required for the dimensions
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
}

/// Immutable-by-convention packed 1-bit frame
///
/// Equality compares dimensions and bits only; the orientation tag records
/// how the content was produced and does not change what is displayed.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    orientation: Orientation,
    bits: Vec<u8>,
}

impl PartialEq for FrameBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.bits == other.bits
    }
}

impl Eq for FrameBuffer {}

/// Bytes needed for a `width × height` frame
pub fn byte_len(width: u32, height: u32) -> Result<usize, FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::InvalidDimension { width, height });
    }
    let pixels = u64::from(width).saturating_mul(u64::from(height));
    usize::try_from(pixels.div_ceil(8)).map_err(|_| FrameError::InvalidDimension { width, height })
}

impl FrameBuffer {
    /// Create a zeroed (all black) frame
    pub fn new(width: u32, height: u32, orientation: Orientation) -> Result<Self, FrameError> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            orientation,
            bits: vec![0; len],
        })
    }

    /// Create a frame filled with white (`true`) or black (`false`)
    pub fn filled(
        width: u32,
        height: u32,
        orientation: Orientation,
        white: bool,
    ) -> Result<Self, FrameError> {
        let mut frame = Self::new(width, height, orientation)?;
        if white {
            frame.bits.fill(0xFF);
            frame.clear_padding();
        }
        Ok(frame)
    }

    /// Wrap an existing packed buffer
    ///
    /// Padding bits past the last pixel are cleared.
    pub fn from_bits(
        width: u32,
        height: u32,
        orientation: Orientation,
        bits: Vec<u8>,
    ) -> Result<Self, FrameError> {
        let expected = byte_len(width, height)?;
        if bits.len() != expected {
            return Err(FrameError::BufferLength {
                expected,
                actual: bits.len(),
            });
        }
        let mut frame = Self {
            width,
            height,
            orientation,
            bits,
        };
        frame.clear_padding();
        Ok(frame)
    }

    /// Build a frame by asking `white(x, y)` for every pixel
    pub fn from_fn(
        width: u32,
        height: u32,
        orientation: Orientation,
        mut white: impl FnMut(u32, u32) -> bool,
    ) -> Result<Self, FrameError> {
        let mut frame = Self::new(width, height, orientation)?;
        for y in 0..height {
            for x in 0..width {
                if white(x, y) {
                    frame.set_pixel(x, y, true);
                }
            }
        }
        Ok(frame)
    }

    /// Build a frame from pixels in scan order, `true` = white
    ///
    /// Only for dimensions already validated by another frame.
    pub(crate) fn from_pixels(
        width: u32,
        height: u32,
        pixels: impl Iterator<Item = bool>,
    ) -> FrameBuffer {
        let len = usize::try_from(u64::from(width).saturating_mul(u64::from(height)).div_ceil(8))
            .unwrap_or(0);
        let mut frame = FrameBuffer {
            width,
            height,
            orientation: Orientation::Normal,
            bits: vec![0; len],
        };
        for (index, white) in (0u64..).zip(pixels) {
            if white {
                frame.set_bit(index, true);
            }
        }
        frame
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Orientation tag
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Packed bits, ready for the panel
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Consume the frame and return its packed bits
    pub fn into_bits(self) -> Vec<u8> {
        self.bits
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width).saturating_mul(u64::from(self.height))
    }

    /// True if pixel `(x, y)` is white, `None` if out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<bool> {
        let index = self.index(x, y)?;
        self.bit(index)
    }

    /// Set pixel `(x, y)`; out-of-bounds writes are ignored
    pub(crate) fn set_pixel(&mut self, x: u32, y: u32, white: bool) {
        if let Some(index) = self.index(x, y) {
            self.set_bit(index, white);
        }
    }

    /// Pixels in scan order, `true` = white
    pub fn iter_pixels(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.pixel_count()).map(|index| self.bit(index).unwrap_or(false))
    }

    /// Count of white pixels
    pub fn count_white(&self) -> u64 {
        self.bits.iter().map(|byte| u64::from(byte.count_ones())).sum()
    }

    /// New frame with pixel order reversed in both axes
    ///
    /// The orientation tag is flipped; applying this twice yields the
    /// original frame.
    pub fn rotated180(&self) -> FrameBuffer {
        let count = self.pixel_count();
        let mut out = FrameBuffer {
            width: self.width,
            height: self.height,
            orientation: self.orientation.flipped(),
            bits: vec![0; self.bits.len()],
        };
        for (index, white) in self.iter_pixels().enumerate() {
            if white {
                // SAFETY: index < count, so count - 1 - index cannot underflow.
                #[allow(clippy::arithmetic_side_effects)]
                let mirrored = count - 1 - index as u64;
                out.set_bit(mirrored, true);
            }
        }
        out
    }

    /// New frame rotated 90° counter-clockwise (width and height swap)
    // SAFETY: remap only calls with x < w and y < h.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn rotated90_ccw(&self) -> FrameBuffer {
        self.remap(|x, y, w, _h| (y, w - 1 - x))
    }

    /// New frame rotated 90° clockwise (width and height swap)
    #[allow(clippy::arithmetic_side_effects)]
    pub fn rotated90_cw(&self) -> FrameBuffer {
        self.remap(|x, y, _w, h| (h - 1 - y, x))
    }

    /// Build a rotated copy; `map(x, y, w, h)` gives the destination of a
    /// source pixel in a frame of size `h × w`.
    fn remap(&self, map: impl Fn(u32, u32, u32, u32) -> (u32, u32)) -> FrameBuffer {
        let mut out = FrameBuffer {
            width: self.height,
            height: self.width,
            orientation: self.orientation,
            bits: vec![0; self.bits.len()],
        };
        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixel(x, y) == Some(true) {
                    let (dx, dy) = map(x, y, self.width, self.height);
                    out.set_pixel(dx, dy, true);
                }
            }
        }
        out
    }

    // SAFETY: x < width and y < height are checked before use; y * width + x is
    // bounded by width * height which fits in u64.
    #[allow(clippy::arithmetic_side_effects)]
    fn index(&self, x: u32, y: u32) -> Option<u64> {
        if x < self.width && y < self.height {
            Some(u64::from(y) * u64::from(self.width) + u64::from(x))
        } else {
            None
        }
    }

    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn bit(&self, index: u64) -> Option<bool> {
        let byte = self.bits.get(usize::try_from(index / 8).ok()?)?;
        let mask = 0x80u8 >> (index % 8) as u8;
        Some(byte & mask != 0)
    }

    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn set_bit(&mut self, index: u64, white: bool) {
        let Ok(byte_index) = usize::try_from(index / 8) else {
            return;
        };
        let mask = 0x80u8 >> (index % 8) as u8;
        if let Some(byte) = self.bits.get_mut(byte_index) {
            if white {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    // SAFETY: rem is in 1..8, so the shift amount is in 1..8.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn clear_padding(&mut self) {
        let rem = (self.pixel_count() % 8) as u32;
        if rem != 0 {
            if let Some(last) = self.bits.last_mut() {
                *last &= 0xFFu8 << (8 - rem);
            }
        }
    }
}
