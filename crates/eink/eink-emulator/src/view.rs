//! Presentation of emulated frames
//!
//! The emulator only produces [`RenderedFrame`]s. Where they end up is the
//! business of an [`EmulatorView`]: nowhere ([`NullView`]), a list kept for
//! assertions ([`RecordingView`]), or a panel-sized canvas that can be
//! saved as PNG ([`CanvasView`]).

use std::path::Path;

use embedded_graphics::prelude::GrayColor;
use image::{GrayImage, Luma};
use platform::RegionKey;

use crate::config::{Presentation, WHITE_LEVEL};
use crate::frame::RenderedFrame;

/// Receives every frame the emulator renders
pub trait EmulatorView {
    /// Show `frame` at `region`
    fn present(&mut self, region: RegionKey, frame: &RenderedFrame);
}

impl<V: EmulatorView + ?Sized> EmulatorView for &mut V {
    fn present(&mut self, region: RegionKey, frame: &RenderedFrame) {
        (**self).present(region, frame);
    }
}

impl<V: EmulatorView + ?Sized> EmulatorView for Box<V> {
    fn present(&mut self, region: RegionKey, frame: &RenderedFrame) {
        (**self).present(region, frame);
    }
}

/// Discards frames
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NullView;

impl EmulatorView for NullView {
    fn present(&mut self, _region: RegionKey, _frame: &RenderedFrame) {}
}

/// Keeps every presented frame in order
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    frames: Vec<(RegionKey, RenderedFrame)>,
}

impl RecordingView {
    /// Empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames presented so far
    pub fn frames(&self) -> &[(RegionKey, RenderedFrame)] {
        &self.frames
    }

    /// Number of frames presented
    pub fn count(&self) -> usize {
        self.frames.len()
    }

    /// Number of frames presented for `region`
    pub fn count_for(&self, region: RegionKey) -> usize {
        self.frames.iter().filter(|(key, _)| *key == region).count()
    }

    /// Most recent frame
    pub fn last(&self) -> Option<&RenderedFrame> {
        self.frames.last().map(|(_, frame)| frame)
    }

    /// Forget recorded frames
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl EmulatorView for RecordingView {
    fn present(&mut self, region: RegionKey, frame: &RenderedFrame) {
        self.frames.push((region, frame.clone()));
    }
}

/// Panel-sized canvas composited from presented frames
///
/// The canvas is kept in native panel coordinates and starts white.
/// Rotation and scaling from [`Presentation`] are applied on export.
#[derive(Debug, Clone)]
pub struct CanvasView {
    canvas: GrayImage,
    presentation: Presentation,
    presented: u64,
}

impl CanvasView {
    /// Blank canvas for a `width × height` panel
    pub fn new(width: u32, height: u32, presentation: Presentation) -> Self {
        Self {
            canvas: GrayImage::from_pixel(width, height, Luma([WHITE_LEVEL])),
            presentation,
            presented: 0,
        }
    }

    /// Presentation settings
    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    /// Number of frames presented
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Canvas in native panel coordinates
    pub fn native(&self) -> &GrayImage {
        &self.canvas
    }

    /// Canvas rotated and scaled for viewing
    pub fn image(&self) -> GrayImage {
        let (width, height) = self.canvas.dimensions();
        let (out_w, out_h) = self.presentation.canvas_size(width, height);
        let scale = self.presentation.scale.max(1);
        let rotation = self.presentation.rotation;
        let mut out = GrayImage::new(out_w, out_h);
        for (x, y, pixel) in self.canvas.enumerate_pixels() {
            let (rx, ry) = rotation.apply_to_point(x, y, width, height);
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = rx.saturating_mul(scale).saturating_add(dx);
                    let py = ry.saturating_mul(scale).saturating_add(dy);
                    if px < out_w && py < out_h {
                        out.put_pixel(px, py, *pixel);
                    }
                }
            }
        }
        out
    }

    /// Save the presented canvas as PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        let path = path.as_ref();
        self.image().save(path)?;
        tracing::debug!(path = %path.display(), "saved emulator canvas");
        Ok(())
    }
}

impl EmulatorView for CanvasView {
    fn present(&mut self, region: RegionKey, frame: &RenderedFrame) {
        let (width, height) = self.canvas.dimensions();
        let region = region.resolve(width, height);
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let (Some(cx), Some(cy)) = (region.x.checked_add(x), region.y.checked_add(y)) else {
                    continue;
                };
                if cx >= width || cy >= height {
                    continue;
                }
                if let Some(level) = frame.level(x, y) {
                    self.canvas.put_pixel(cx, cy, Luma([level.luma()]));
                }
            }
        }
        self.presented = self.presented.saturating_add(1);
    }
}
