//! E-Ink Display Emulator
//!
//! Software stand-in for a monochrome e-paper panel. Frames written to the
//! emulator do not appear instantly: pixels turning white pass through
//! gray levels over several writes, the way a real panel ghosts after a
//! partial refresh. The simulation is deterministic; the only time-based
//! behaviour is the optional per-write delay from [`Pacing`].
//!
//! # Example
//!
//! ```
//! use eink_emulator::{EmulatorConfig, FrameBuffer, GhostEmulator, Orientation, RecordingView};
//! use platform::RegionKey;
//!
//! let mut emulator = GhostEmulator::new(8, 8, EmulatorConfig::default()).unwrap();
//! let mut view = RecordingView::new();
//!
//! let black = FrameBuffer::new(8, 8, Orientation::Normal).unwrap();
//! let white = FrameBuffer::filled(8, 8, Orientation::Normal, true).unwrap();
//!
//! emulator.write(RegionKey::FullFrame, &black, &mut view);
//! assert!(emulator.is_settled(RegionKey::FullFrame));
//!
//! // Black to white leaves a ghost until the third write.
//! emulator.write(RegionKey::FullFrame, &white, &mut view);
//! assert!(!emulator.is_settled(RegionKey::FullFrame));
//! emulator.write(RegionKey::FullFrame, &white, &mut view);
//! emulator.write(RegionKey::FullFrame, &white, &mut view);
//! assert!(emulator.is_settled(RegionKey::FullFrame));
//! assert_eq!(view.count(), 4);
//! ```

pub mod config;
mod frame;
mod framebuffer;
mod pixel_state;
pub mod view;

pub use config::{ConfigError, EmulatorConfig, Pacing, Presentation, Rotation};
pub use frame::RenderedFrame;
pub use framebuffer::{byte_len, FrameBuffer, FrameError, Orientation};
pub use pixel_state::{PixelState, PixelStateBuffer};
pub use view::{CanvasView, EmulatorView, NullView, RecordingView};

use std::time::Duration;

use eink_specs::DisplaySpec;
use platform::RegionKey;

/// Where a region is in its transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostPhase {
    /// Every pixel shows its target polarity
    Settled,
    /// Some pixels are still walking a ladder
    Transitioning {
        /// Pixels not yet settled
        pending: usize,
    },
}

/// Ghost simulation for one panel
///
/// The panel keeps a single pixel state in native coordinates, starting
/// from settled white paper. A region write retargets and steps only the
/// pixels inside its rectangle, so a partial update begins from whatever
/// the panel shows there, including earlier full-frame content.
#[derive(Debug)]
pub struct GhostEmulator {
    config: EmulatorConfig,
    panel_write: Duration,
    panel: PixelStateBuffer,
    writes: u64,
}

impl GhostEmulator {
    /// Emulator for a `width × height` panel with no panel timing
    pub fn new(width: u32, height: u32, config: EmulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            panel_write: Duration::ZERO,
            panel: PixelStateBuffer::new_white(width, height),
            writes: 0,
        })
    }

    /// Emulator sized and paced like `spec` (its partial refresh duration)
    pub fn for_spec(spec: &DisplaySpec, config: EmulatorConfig) -> Result<Self, ConfigError> {
        let mut emulator = Self::new(spec.width, spec.height, config)?;
        emulator.panel_write = spec.partial_refresh_duration();
        Ok(emulator)
    }

    /// Active configuration
    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Total writes rendered
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Panel width and height
    pub fn panel_size(&self) -> (u32, u32) {
        (self.panel.width(), self.panel.height())
    }

    /// Current state of panel pixel `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<PixelState> {
        self.panel.get(x, y)
    }

    /// Point `region` at `frame`
    ///
    /// Pixels whose polarity differs from their current target start a
    /// transition; the rest keep their state. Returns the number of
    /// pixels that flipped. A full frame with new dimensions resizes the
    /// panel, which starts over from white.
    pub fn begin_transition(&mut self, region: RegionKey, frame: &FrameBuffer) -> usize {
        if region == RegionKey::FullFrame && !self.panel.matches(frame) {
            tracing::warn!(
                old_width = self.panel.width(),
                old_height = self.panel.height(),
                width = frame.width(),
                height = frame.height(),
                "panel dimensions changed, ghost state reset"
            );
            self.panel = PixelStateBuffer::new_white(frame.width(), frame.height());
        }
        let rect = self.resolve(region);
        let flipped = self.panel.retarget(rect, frame);
        tracing::trace!(?region, flipped, "transition started");
        flipped
    }

    /// Advance `region` one refresh step and return what it shows
    ///
    /// Returns `None` if the region lies entirely off the panel.
    pub fn step_and_render(&mut self, region: RegionKey) -> Option<RenderedFrame> {
        let rect = self.resolve(region);
        self.panel.step(rect, &self.config);
        self.panel.render(rect)
    }

    /// One emulated panel write: retarget, step once, pace, present
    ///
    /// Returns `None`, presenting nothing, if the region lies entirely
    /// off the panel.
    pub fn write<V: EmulatorView + ?Sized>(
        &mut self,
        region: RegionKey,
        frame: &FrameBuffer,
        view: &mut V,
    ) -> Option<RenderedFrame> {
        self.begin_transition(region, frame);
        let rendered = self.step_and_render(region)?;
        self.writes = self.writes.saturating_add(1);

        let delay = self.config.pacing.delay(self.panel_write);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        tracing::debug!(
            ?region,
            pending = self.pending(region),
            ghosts = rendered.ghost_pixels(),
            "emulated write"
        );
        view.present(region, &rendered);
        Some(rendered)
    }

    /// Pixels of `region` not yet showing their target
    pub fn pending(&self, region: RegionKey) -> usize {
        self.panel.pending(self.resolve(region))
    }

    /// Transition phase of `region`
    pub fn phase(&self, region: RegionKey) -> GhostPhase {
        match self.pending(region) {
            0 => GhostPhase::Settled,
            pending => GhostPhase::Transitioning { pending },
        }
    }

    /// True if every pixel of `region` shows its target exactly
    pub fn is_settled(&self, region: RegionKey) -> bool {
        self.phase(region) == GhostPhase::Settled
    }

    /// The frame `region` is converging to
    pub fn settled(&self, region: RegionKey) -> Option<FrameBuffer> {
        self.panel.targets(self.resolve(region))
    }

    /// Pixels of `region` currently showing settled white
    pub fn visible(&self, region: RegionKey) -> Option<FrameBuffer> {
        self.panel.visible(self.resolve(region))
    }

    /// What `region` shows right now, without stepping
    pub fn render(&self, region: RegionKey) -> Option<RenderedFrame> {
        self.panel.render(self.resolve(region))
    }

    /// Return the whole panel to settled white
    pub fn reset(&mut self) {
        self.panel = PixelStateBuffer::new_white(self.panel.width(), self.panel.height());
    }

    fn resolve(&self, region: RegionKey) -> platform::Region {
        region.resolve(self.panel.width(), self.panel.height())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use embedded_graphics::prelude::GrayColor;
    use platform::Region;

    fn emulator() -> GhostEmulator {
        GhostEmulator::new(4, 4, EmulatorConfig::default()).unwrap()
    }

    fn frame(white: bool) -> FrameBuffer {
        FrameBuffer::filled(4, 4, Orientation::Normal, white).unwrap()
    }

    fn luma(frame: &RenderedFrame, x: u32, y: u32) -> u8 {
        frame.level(x, y).unwrap().luma()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EmulatorConfig::default();
        config.darken_ladder.clear();
        assert!(GhostEmulator::new(4, 4, config).is_err());
    }

    #[test]
    fn test_fresh_panel_is_settled_white() {
        let mut emulator = emulator();
        assert!(emulator.is_settled(RegionKey::FullFrame));
        assert_eq!(emulator.settled(RegionKey::FullFrame), Some(frame(true)));
        let shown = emulator.step_and_render(RegionKey::FullFrame).unwrap();
        assert!(shown.levels().iter().all(|level| level.luma() == 255));
    }

    #[test]
    fn test_first_write_starts_from_white() {
        let mut emulator = emulator();
        assert_eq!(emulator.begin_transition(RegionKey::FullFrame, &frame(true)), 0);
        assert_eq!(emulator.begin_transition(RegionKey::FullFrame, &frame(false)), 16);
    }

    #[test]
    fn test_step_and_render_walks_black_to_white() {
        let mut emulator = emulator();
        let key = RegionKey::FullFrame;
        emulator.begin_transition(key, &frame(false));
        emulator.step_and_render(key).unwrap();
        assert!(emulator.is_settled(key));

        assert_eq!(emulator.begin_transition(key, &frame(true)), 16);
        let mut seen = Vec::new();
        while !emulator.is_settled(key) {
            let shown = emulator.step_and_render(key).unwrap();
            assert!(shown.levels().iter().all(|level| level.luma() > 0));
            seen.push(luma(&shown, 1, 2));
        }
        assert_eq!(seen, vec![180, 220, 255]);
        assert_eq!(emulator.render(key).unwrap().to_frame_buffer(), frame(true));
        assert_eq!(emulator.write_count(), 0);
    }

    #[test]
    fn test_ghost_levels_per_write() {
        let mut emulator = emulator();
        let mut view = NullView;
        let key = RegionKey::FullFrame;

        let shown = emulator.write(key, &frame(false), &mut view).unwrap();
        assert_eq!(luma(&shown, 0, 0), 0);

        let mut seen = Vec::new();
        for _ in 0..3 {
            let shown = emulator.write(key, &frame(true), &mut view).unwrap();
            seen.push(luma(&shown, 2, 2));
        }
        assert_eq!(seen, vec![180, 220, 255]);
        assert_eq!(emulator.phase(key), GhostPhase::Settled);
        assert_eq!(emulator.write_count(), 4);
    }

    #[test]
    fn test_phase_reports_pending() {
        let mut emulator = emulator();
        let key = RegionKey::FullFrame;
        emulator.write(key, &frame(false), &mut NullView);
        emulator.write(key, &frame(true), &mut NullView);

        assert_eq!(emulator.phase(key), GhostPhase::Transitioning { pending: 16 });
        assert_eq!(emulator.settled(key), Some(frame(true)));
        assert_eq!(emulator.visible(key), Some(frame(false)));
    }

    #[test]
    fn test_partial_write_starts_from_full_frame_content() {
        let mut emulator = GhostEmulator::new(8, 4, EmulatorConfig::default()).unwrap();
        let black = FrameBuffer::new(8, 4, Orientation::Normal).unwrap();
        emulator.write(RegionKey::FullFrame, &black, &mut NullView);

        let rect = RegionKey::Rect(Region::new(0, 0, 4, 4));
        let shown = emulator.write(rect, &frame(true), &mut NullView).unwrap();
        assert_eq!(luma(&shown, 1, 1), 180);
        assert_eq!(emulator.pending(rect), 16);
        assert_eq!(emulator.pending(RegionKey::FullFrame), 16);
        assert_eq!(emulator.pixel(5, 1), Some(PixelState::BLACK));
    }

    #[test]
    fn test_full_write_sees_settled_partial_content() {
        let mut emulator = GhostEmulator::new(8, 4, EmulatorConfig::default()).unwrap();
        let rect = RegionKey::Rect(Region::new(4, 0, 4, 4));
        emulator.write(rect, &frame(false), &mut NullView);
        for _ in 0..3 {
            emulator.write(rect, &frame(true), &mut NullView);
        }
        assert!(emulator.is_settled(RegionKey::FullFrame));

        let white = FrameBuffer::filled(8, 4, Orientation::Normal, true).unwrap();
        let shown = emulator.write(RegionKey::FullFrame, &white, &mut NullView).unwrap();
        assert!(shown.is_polar());
        assert_eq!(luma(&shown, 6, 2), 255);
    }

    #[test]
    fn test_regions_step_independently() {
        let mut emulator = GhostEmulator::new(8, 4, EmulatorConfig::default()).unwrap();
        let a = RegionKey::Rect(Region::new(0, 0, 4, 4));
        let b = RegionKey::Rect(Region::new(4, 0, 4, 4));

        emulator.write(a, &frame(false), &mut NullView);
        emulator.write(a, &frame(true), &mut NullView);
        emulator.write(b, &frame(false), &mut NullView);

        assert!(!emulator.is_settled(a));
        assert!(emulator.is_settled(b));
        // writing b does not advance a's ghost
        assert_eq!(emulator.pixel(0, 0).unwrap().level, 180);
    }

    #[test]
    fn test_dimension_change_resizes_panel() {
        let mut emulator = emulator();
        let key = RegionKey::FullFrame;
        emulator.write(key, &frame(false), &mut NullView);

        let wide = FrameBuffer::filled(8, 2, Orientation::Normal, true).unwrap();
        let shown = emulator.write(key, &wide, &mut NullView).unwrap();
        assert!(shown.is_polar());
        assert!(emulator.is_settled(key));
        assert_eq!(emulator.panel_size(), (8, 2));
    }

    #[test]
    fn test_off_panel_region_renders_nothing() {
        let mut emulator = emulator();
        let outside = RegionKey::Rect(Region::new(4, 0, 2, 2));
        let black = FrameBuffer::new(2, 2, Orientation::Normal).unwrap();
        assert!(emulator.write(outside, &black, &mut NullView).is_none());
        assert_eq!(emulator.write_count(), 0);
    }

    #[test]
    fn test_reset_returns_to_white() {
        let mut emulator = emulator();
        emulator.write(RegionKey::FullFrame, &frame(false), &mut NullView);
        emulator.reset();
        assert_eq!(emulator.settled(RegionKey::FullFrame), Some(frame(true)));
        assert_eq!(emulator.pixel(0, 0), Some(PixelState::WHITE));
    }

    #[test]
    fn test_for_spec_sizes_panel() {
        let emulator = GhostEmulator::for_spec(
            &eink_specs::displays::WAVESHARE_2_13_V2,
            EmulatorConfig::instant(),
        )
        .unwrap();
        assert_eq!(emulator.config().pacing, Pacing::Instant);
        assert_eq!(emulator.panel_size(), (122, 250));
    }
}
