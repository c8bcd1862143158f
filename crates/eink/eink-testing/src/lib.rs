//! E-Paper Display Testing Utilities
//!
//! Headless harness for code that drives a [`DisplayController`]. A
//! [`TestDisplay`] wraps a controller over either a recording mock panel
//! or the ghost emulator, and adds dispatch counting, frame assertions and
//! golden screenshot comparison.
//!
//! # Quick start
//!
//! ```
//! use eink_testing::{Layout, Orientation, TestDisplay};
//!
//! let mut t = TestDisplay::emulated("epd2in13_V2").unwrap();
//! let image = t.new_image(Layout::Horizontal).unwrap();
//!
//! t.display_image(&image, Orientation::Normal, 10).unwrap();
//! t.assert_dispatches(3).unwrap();
//! ```
//!
//! # Golden screenshot testing
//!
//! ```no_run
//! # use eink_testing::TestDisplay;
//! # let t = TestDisplay::emulated("epd2in13_V2").unwrap();
//! // First run: set UPDATE_GOLDEN=1 to create/update the reference file.
//! t.assert_matches_golden("tests/golden/my_screen.png", 0).unwrap();
//! ```

#![warn(clippy::all)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![allow(clippy::module_name_repetitions)]

use std::path::Path;

use embedded_graphics::pixelcolor::BinaryColor;
use image::{GenericImageView, GrayImage};

pub use eink_display::{
    ControllerConfig, DisplayController, DisplayError, Layout, MonochromeImage, Orientation,
    Region, RegionKey, RepeatSummary, WriteOutcome,
};
pub use eink_emulator::{
    CanvasView, EmulatorView, FrameBuffer, GhostEmulator, NullView, Presentation, RecordingView,
    RenderedFrame,
};
pub use eink_specs::DisplaySpec;
pub use platform::mocks::{MockPanel, PanelCall};
use platform::NoPanel;

/// Install a test-friendly `tracing` subscriber once
///
/// Honours `RUST_LOG`; output goes through the test harness capture.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// HarnessView
// ─────────────────────────────────────────────────────────────────────────────

/// Emulator view that both records frames and composites a canvas
#[derive(Debug, Clone)]
pub struct HarnessView {
    /// Every presented frame, in order
    pub recording: RecordingView,
    /// Composited panel surface
    pub canvas: CanvasView,
}

impl EmulatorView for HarnessView {
    fn present(&mut self, region: RegionKey, frame: &RenderedFrame) {
        self.recording.present(region, frame);
        self.canvas.present(region, frame);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TestDisplay
// ─────────────────────────────────────────────────────────────────────────────

enum Backend {
    Panel(DisplayController<MockPanel, NullView>),
    Emulated(DisplayController<NoPanel, HarnessView>),
}

macro_rules! with_controller {
    (ref $self:expr, $c:ident => $body:expr) => {
        match &$self.backend {
            Backend::Panel($c) => $body,
            Backend::Emulated($c) => $body,
        }
    };
    ($self:expr, $c:ident => $body:expr) => {
        match &mut $self.backend {
            Backend::Panel($c) => $body,
            Backend::Emulated($c) => $body,
        }
    };
}

/// Headless display under test
pub struct TestDisplay {
    backend: Backend,
}

impl TestDisplay {
    /// Emulated display for `model`, canvas in native orientation
    pub fn emulated(model: &str) -> Result<Self, DisplayError> {
        Self::emulated_with(model, Presentation::NATIVE, ControllerConfig::default())
    }

    /// Emulated display with explicit presentation and config
    pub fn emulated_with(
        model: &str,
        presentation: Presentation,
        config: ControllerConfig,
    ) -> Result<Self, DisplayError> {
        init_tracing();
        let spec = eink_specs::displays::by_model(model)
            .ok_or_else(|| DisplayError::UnknownDriver(model.to_owned()))?;
        let view = HarnessView {
            recording: RecordingView::new(),
            canvas: CanvasView::new(spec.width, spec.height, presentation),
        };
        Ok(Self {
            backend: Backend::Emulated(DisplayController::emulated(model, view, config)?),
        })
    }

    /// Display for `model` on a recording mock panel
    pub fn with_panel(model: &str) -> Result<Self, DisplayError> {
        Self::with_panel_config(model, MockPanel::new(), ControllerConfig::default())
    }

    /// Display on a prepared mock panel (e.g. with queued failures)
    pub fn with_panel_config(
        model: &str,
        panel: MockPanel,
        config: ControllerConfig,
    ) -> Result<Self, DisplayError> {
        init_tracing();
        Ok(Self {
            backend: Backend::Panel(DisplayController::physical(model, panel, config)?),
        })
    }

    // ── Controller passthrough ───────────────────────────────────────────────

    /// See [`DisplayController::display_full`]
    pub fn display_full(
        &mut self,
        image: &MonochromeImage,
        orientation: Orientation,
    ) -> Result<WriteOutcome, DisplayError> {
        with_controller!(self, c => c.display_full(image, orientation))
    }

    /// See [`DisplayController::display_partial`]
    pub fn display_partial(
        &mut self,
        region: RegionKey,
        image: &MonochromeImage,
    ) -> Result<WriteOutcome, DisplayError> {
        with_controller!(self, c => c.display_partial(region, image))
    }

    /// See [`DisplayController::display_image`]
    pub fn display_image(
        &mut self,
        image: &MonochromeImage,
        orientation: Orientation,
        repeat: u32,
    ) -> Result<RepeatSummary, DisplayError> {
        with_controller!(self, c => c.display_image(image, orientation, repeat))
    }

    /// See [`DisplayController::clear`]
    pub fn clear(&mut self, color: BinaryColor) -> Result<WriteOutcome, DisplayError> {
        with_controller!(self, c => c.clear(color))
    }

    /// See [`DisplayController::new_image`]
    pub fn new_image(&self, layout: Layout) -> Result<MonochromeImage, DisplayError> {
        with_controller!(ref self, c => c.new_image(layout))
    }

    /// Panel specification
    pub fn spec(&self) -> &'static DisplaySpec {
        with_controller!(ref self, c => c.spec())
    }

    // ── Backend access ───────────────────────────────────────────────────────

    /// The mock panel, when running on one
    pub fn panel(&self) -> Option<&MockPanel> {
        match &self.backend {
            Backend::Panel(c) => c.sink().driver(),
            Backend::Emulated(_) => None,
        }
    }

    /// The mock panel, mutably
    pub fn panel_mut(&mut self) -> Option<&mut MockPanel> {
        match &mut self.backend {
            Backend::Panel(c) => c.sink_mut().driver_mut(),
            Backend::Emulated(_) => None,
        }
    }

    /// The ghost emulator, when emulated
    pub fn emulator(&self) -> Option<&GhostEmulator> {
        match &self.backend {
            Backend::Panel(_) => None,
            Backend::Emulated(c) => c.sink().emulator(),
        }
    }

    /// The harness view, when emulated
    pub fn view(&self) -> Option<&HarnessView> {
        match &self.backend {
            Backend::Panel(_) => None,
            Backend::Emulated(c) => c.sink().view(),
        }
    }

    /// Frames that reached the panel or the emulator
    pub fn dispatch_count(&self) -> usize {
        match &self.backend {
            Backend::Panel(c) => c.sink().driver().map_or(0, MockPanel::write_count),
            Backend::Emulated(c) => c.sink().view().map_or(0, |v| v.recording.count()),
        }
    }

    /// Current canvas (rotated and scaled), when emulated
    pub fn screen(&self) -> Option<GrayImage> {
        self.view().map(|view| view.canvas.image())
    }

    // ── Assertions ───────────────────────────────────────────────────────────

    /// Assert the total number of dispatched frames
    pub fn assert_dispatches(&self, expected: usize) -> Result<(), String> {
        let actual = self.dispatch_count();
        if actual == expected {
            Ok(())
        } else {
            Err(format!(
                "assert_dispatches: expected {expected} writes, got {actual}"
            ))
        }
    }

    /// Assert that the emulated `region` shows its last frame without ghosts
    pub fn assert_settled(&self, region: RegionKey) -> Result<(), String> {
        let emulator = self
            .emulator()
            .ok_or("assert_settled: display is not emulated")?;
        match emulator.pending(region) {
            0 => Ok(()),
            pending => Err(format!(
                "assert_settled({region:?}): {pending} pixels still transitioning"
            )),
        }
    }

    /// Assert that the most recent write carried exactly `expected`
    ///
    /// `expected` is in native panel layout.
    pub fn assert_last_frame(&self, expected: &MonochromeImage) -> Result<(), String> {
        let expected = expected
            .to_frame_buffer(Orientation::Normal)
            .map_err(|e| format!("assert_last_frame: {e}"))?;
        let actual = match &self.backend {
            Backend::Panel(c) => c
                .sink()
                .driver()
                .and_then(MockPanel::last_write)
                .map(<[u8]>::to_vec),
            Backend::Emulated(c) => c
                .sink()
                .view()
                .and_then(|v| v.recording.last())
                .map(|frame| frame.to_frame_buffer().into_bits()),
        }
        .ok_or("assert_last_frame: nothing written yet")?;

        if actual == expected.bits() {
            Ok(())
        } else {
            let differing = actual
                .iter()
                .zip(expected.bits())
                .map(|(a, b)| (a ^ b).count_ones())
                .sum::<u32>();
            Err(format!(
                "assert_last_frame: {differing} pixels differ from the expected frame"
            ))
        }
    }

    // ── Screenshots ──────────────────────────────────────────────────────────

    /// Save the current screen to a PNG file
    pub fn screenshot(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let view = self.view().ok_or("screenshot: display is not emulated")?;
        view.canvas.save_png(path)?;
        Ok(())
    }

    /// Save the current screen as the golden reference PNG
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_golden(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.screenshot(path)
    }

    /// Assert the current screen matches a golden reference PNG
    ///
    /// `threshold` is the largest per-pixel luma difference tolerated.
    ///
    /// Set the `UPDATE_GOLDEN=1` environment variable to **update** the golden
    /// file instead of comparing:
    ///
    /// ```text
    /// UPDATE_GOLDEN=1 cargo test
    /// ```
    pub fn assert_matches_golden(
        &self,
        golden_path: impl AsRef<Path>,
        threshold: u8,
    ) -> Result<(), String> {
        let golden_path = golden_path.as_ref();

        if std::env::var("UPDATE_GOLDEN").is_ok() {
            return self.save_golden(golden_path).map_err(|e| {
                format!(
                    "Failed to save golden '{p}': {e}",
                    p = golden_path.display()
                )
            });
        }

        let current = self
            .screen()
            .ok_or("assert_matches_golden: display is not emulated")?;
        let golden = image::open(golden_path).map_err(|e| {
            format!(
                "Failed to open golden '{}': {e}\nRun with UPDATE_GOLDEN=1 to create it.",
                golden_path.display()
            )
        })?;

        if current.dimensions() != golden.dimensions() {
            let (cw, ch) = current.dimensions();
            let (gw, gh) = golden.dimensions();
            return Err(format!(
                "Dimension mismatch: screenshot is {cw}×{ch}, golden is {gw}×{gh}"
            ));
        }

        let golden = golden.to_luma8();
        let diff_pixels = current
            .pixels()
            .zip(golden.pixels())
            .filter(|(c, g)| c.0[0].abs_diff(g.0[0]) > threshold)
            .count();

        if diff_pixels > 0 {
            Err(format!(
                "{diff_pixels} pixels differ from golden '{}' (threshold={threshold})",
                golden_path.display()
            ))
        } else {
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
