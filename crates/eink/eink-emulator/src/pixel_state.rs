//! Per-Pixel State Tracking
//!
//! Each pixel holds the luma it currently shows and the polarity it is
//! being driven towards. A write moves it one rung along the matching
//! ladder, so a pixel mid-transition renders as gray: the ghost a real
//! panel leaves behind after a partial refresh.

use embedded_graphics::pixelcolor::Gray8;

use crate::config::{EmulatorConfig, BLACK_LEVEL, WHITE_LEVEL};
use crate::framebuffer::FrameBuffer;
use crate::frame::RenderedFrame;
use platform::Region;

/// Physical state of a single e-ink pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelState {
    /// Luma currently shown (0 = black, 255 = white)
    pub level: u8,
    /// Polarity the pixel is being driven towards
    pub target_white: bool,
}

impl PixelState {
    /// Settled white paper, the state of a panel after a full clear
    pub const WHITE: Self = Self {
        level: WHITE_LEVEL,
        target_white: true,
    };

    /// Settled black ink
    pub const BLACK: Self = Self {
        level: BLACK_LEVEL,
        target_white: false,
    };

    /// Point the pixel at a new polarity; returns true if the target changed
    pub fn retarget(&mut self, white: bool) -> bool {
        let changed = self.target_white != white;
        self.target_white = white;
        changed
    }

    /// Advance one rung towards the target
    ///
    /// Lightening takes the first rung above the current level, darkening
    /// the first rung below it. A settled pixel does not move.
    pub fn step(&mut self, config: &EmulatorConfig) {
        let next = if self.target_white {
            config
                .lighten_ladder
                .iter()
                .copied()
                .find(|&rung| rung > self.level)
        } else {
            config
                .darken_ladder
                .iter()
                .copied()
                .find(|&rung| rung < self.level)
        };
        if let Some(level) = next {
            self.level = level;
        }
    }

    /// True once the pixel shows its target polarity exactly
    pub fn is_settled(&self) -> bool {
        if self.target_white {
            self.level == WHITE_LEVEL
        } else {
            self.level == BLACK_LEVEL
        }
    }
}

/// Pixel states for a whole panel, in native coordinates
///
/// Region operations touch only the pixels inside the region, clipped to
/// the panel, so full-frame and partial writes share one picture.
#[derive(Debug, Clone)]
pub struct PixelStateBuffer {
    width: u32,
    height: u32,
    pixels: Vec<PixelState>,
}

impl PixelStateBuffer {
    /// A `width × height` panel, every pixel settled white
    pub fn new_white(width: u32, height: u32) -> Self {
        let count = usize::try_from(u64::from(width).saturating_mul(u64::from(height))).unwrap_or(0);
        Self {
            width,
            height,
            pixels: vec![PixelState::WHITE; count],
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

    /// True if `frame` covers the whole panel
    pub fn matches(&self, frame: &FrameBuffer) -> bool {
        frame.width() == self.width && frame.height() == self.height
    }

    /// The part of `region` that lies on the panel
    pub fn clip(&self, region: Region) -> Region {
        let x = region.x.min(self.width);
        let y = region.y.min(self.height);
        let right = region.right().map_or(self.width, |r| r.min(self.width));
        let bottom = region.bottom().map_or(self.height, |b| b.min(self.height));
        Region::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    /// State of pixel `(x, y)`, `None` if off the panel
    pub fn get(&self, x: u32, y: u32) -> Option<PixelState> {
        let clip = self.clip(Region::new(x, y, 1, 1));
        Self::cells(self.width, clip)
            .next()
            .and_then(|(index, _, _)| self.pixels.get(index).copied())
    }

    /// Retarget the pixels of `region` at the polarity in `frame`
    ///
    /// The frame's top-left pixel sits at the region origin. Pixels off
    /// the panel or outside the frame are left alone. Returns the number
    /// of pixels whose target flipped.
    pub fn retarget(&mut self, region: Region, frame: &FrameBuffer) -> usize {
        let clip = self.clip(region);
        let mut flipped = 0usize;
        for (index, x, y) in Self::cells(self.width, clip) {
            if let (Some(white), Some(pixel)) = (frame.pixel(x, y), self.pixels.get_mut(index)) {
                if pixel.retarget(white) {
                    flipped = flipped.saturating_add(1);
                }
            }
        }
        flipped
    }

    /// Advance every pixel of `region` one rung
    pub fn step(&mut self, region: Region, config: &EmulatorConfig) {
        let clip = self.clip(region);
        for (index, _, _) in Self::cells(self.width, clip) {
            if let Some(pixel) = self.pixels.get_mut(index) {
                pixel.step(config);
            }
        }
    }

    /// Pixels of `region` not yet showing their target polarity
    pub fn pending(&self, region: Region) -> usize {
        self.states(region).filter(|pixel| !pixel.is_settled()).count()
    }

    /// Current luma of every pixel in `region`
    ///
    /// `None` if the region lies entirely off the panel.
    pub fn render(&self, region: Region) -> Option<RenderedFrame> {
        let clip = self.clip(region);
        if clip.is_empty() {
            return None;
        }
        let levels = self.states(clip).map(|pixel| Gray8::new(pixel.level)).collect();
        Some(RenderedFrame::from_levels(clip.width, clip.height, levels))
    }

    /// Target polarity of every pixel in `region` as a packed frame
    pub fn targets(&self, region: Region) -> Option<FrameBuffer> {
        self.to_frame(region, |pixel| pixel.target_white)
    }

    /// Pixels of `region` currently showing settled white
    pub fn visible(&self, region: Region) -> Option<FrameBuffer> {
        self.to_frame(region, |pixel| pixel.level == WHITE_LEVEL)
    }

    fn to_frame(&self, region: Region, white: impl Fn(PixelState) -> bool) -> Option<FrameBuffer> {
        let clip = self.clip(region);
        if clip.is_empty() {
            return None;
        }
        Some(FrameBuffer::from_pixels(
            clip.width,
            clip.height,
            self.states(clip).map(white),
        ))
    }

    fn states(&self, region: Region) -> impl Iterator<Item = PixelState> + '_ {
        Self::cells(self.width, self.clip(region))
            .filter_map(|(index, _, _)| self.pixels.get(index).copied())
    }

    /// Panel index and region-local coordinates of every pixel in `clip`
    // SAFETY: `clip` lies on a panel `panel_width` wide, so every sum stays
    // below the panel extents and the index below the pixel count.
    #[allow(clippy::arithmetic_side_effects)]
    fn cells(panel_width: u32, clip: Region) -> impl Iterator<Item = (usize, u32, u32)> {
        let stride = u64::from(panel_width);
        (0..clip.height).flat_map(move |dy| {
            (0..clip.width).map(move |dx| {
                let index = u64::from(clip.y + dy) * stride + u64::from(clip.x + dx);
                (usize::try_from(index).unwrap_or(usize::MAX), dx, dy)
            })
        })
    }
}
