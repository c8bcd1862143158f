//! Display controller
//!
//! [`DisplayController`] is the public entry point. Every write, full or
//! partial, goes through one [`WriteLimiter`] before it reaches the sink,
//! so no region ever receives more than three copies of the same frame.

use embedded_graphics::pixelcolor::BinaryColor;
use tracing::{debug, info, warn};

use eink_emulator::{EmulatorView, FrameBuffer, GhostEmulator, NullView, Orientation};
use eink_specs::{displays, DisplaySpec};
use platform::{HardwarePresence, NoPanel, PanelDriver, RegionKey};

use crate::config::ControllerConfig;
use crate::error::DisplayError;
use crate::monochrome::MonochromeImage;
use crate::sink::WriteSink;
use crate::write_limiter::WriteLimiter;

/// Result of one display call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The frame reached the panel or the emulator
    Written,
    /// Identical frame already written three times; nothing was sent
    Skipped,
}

/// Result of [`DisplayController::display_image`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepeatSummary {
    /// Submissions that were dispatched
    pub written: u32,
    /// Submissions suppressed by the limiter
    pub skipped: u32,
}

/// Image layout for [`DisplayController::new_image`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// Long side horizontal (`height × width` of the native panel)
    #[default]
    Horizontal,
    /// Native panel orientation (`width × height`)
    Vertical,
}

/// E-paper display with write coalescing and an emulated fallback
pub struct DisplayController<D = NoPanel, V = NullView> {
    spec: &'static DisplaySpec,
    limiter: WriteLimiter,
    sink: WriteSink<D, V>,
}

fn lookup(model: &str) -> Result<&'static DisplaySpec, DisplayError> {
    displays::by_model(model).ok_or_else(|| DisplayError::UnknownDriver(model.to_owned()))
}

impl<D: PanelDriver, V: EmulatorView> DisplayController<D, V> {
    /// Open the panel named `model`
    ///
    /// Asks `presence` once whether a physical panel is attached. If so,
    /// `driver` receives every write (and `initialize` when
    /// `config.auto_init` is set); otherwise frames are simulated and
    /// presented on `view`. The choice never changes afterwards.
    pub fn open(
        model: &str,
        presence: &dyn HardwarePresence,
        driver: D,
        view: V,
        config: ControllerConfig,
    ) -> Result<Self, DisplayError> {
        let spec = lookup(model)?;
        config.emulator.validate()?;
        if presence.panel_present() {
            Self::with_driver(spec, driver, config)
        } else {
            Self::with_emulator(spec, view, config)
        }
    }

    fn with_driver(
        spec: &'static DisplaySpec,
        mut driver: D,
        config: ControllerConfig,
    ) -> Result<Self, DisplayError> {
        if config.auto_init {
            driver.initialize(spec.model)?;
        }
        info!(model = spec.model, auto_init = config.auto_init, "display opened on panel");
        Ok(Self {
            spec,
            limiter: WriteLimiter::new(),
            sink: WriteSink::Physical(driver),
        })
    }

    fn with_emulator(
        spec: &'static DisplaySpec,
        view: V,
        config: ControllerConfig,
    ) -> Result<Self, DisplayError> {
        let emulator = GhostEmulator::for_spec(spec, config.emulator)?;
        info!(model = spec.model, "no panel found, display opened in emulation");
        Ok(Self {
            spec,
            limiter: WriteLimiter::new(),
            sink: WriteSink::Emulated { emulator, view },
        })
    }

    /// Show a full-panel image
    ///
    /// The image may be in native layout (`width × height`) or horizontal
    /// (`height × width`). Horizontal images are turned 90°
    /// counter-clockwise into native order, clockwise when `UpsideDown`;
    /// native images are turned 180° when `UpsideDown`. A square panel
    /// treats every image as native.
    pub fn display_full(
        &mut self,
        image: &MonochromeImage,
        orientation: Orientation,
    ) -> Result<WriteOutcome, DisplayError> {
        let frame = self.full_frame(image, orientation)?;
        self.submit(RegionKey::FullFrame, &frame)
    }

    /// Show `image` in a sub-rectangle of the panel
    ///
    /// The region is in native coordinates and the image must be exactly
    /// its size. Writes to different regions are limited independently.
    pub fn display_partial(
        &mut self,
        region: RegionKey,
        image: &MonochromeImage,
    ) -> Result<WriteOutcome, DisplayError> {
        let rect = region.resolve(self.spec.width, self.spec.height);
        if rect.is_empty() || !rect.fits_within(self.spec.width, self.spec.height) {
            return Err(DisplayError::RegionOutOfBounds {
                region: rect,
                panel_width: self.spec.width,
                panel_height: self.spec.height,
            });
        }
        if (image.width(), image.height()) != (rect.width, rect.height) {
            return Err(DisplayError::ImageSizeMismatch {
                expected_width: rect.width,
                expected_height: rect.height,
                actual_width: image.width(),
                actual_height: image.height(),
            });
        }
        let frame = image.to_frame_buffer(Orientation::Normal)?;
        self.submit(region, &frame)
    }

    /// Submit the same full-panel image `repeat` times
    ///
    /// Each submission passes the limiter, so at most three are written
    /// and `repeat > 3` behaves exactly like `repeat == 3`.
    pub fn display_image(
        &mut self,
        image: &MonochromeImage,
        orientation: Orientation,
        repeat: u32,
    ) -> Result<RepeatSummary, DisplayError> {
        let mut summary = RepeatSummary::default();
        if repeat == 0 {
            return Ok(summary);
        }
        let frame = self.full_frame(image, orientation)?;
        for done in 0..repeat {
            match self.submit(RegionKey::FullFrame, &frame)? {
                WriteOutcome::Written => summary.written = summary.written.saturating_add(1),
                WriteOutcome::Skipped => {
                    // Further identical submissions only saturate the tracker.
                    summary.skipped = repeat.saturating_sub(done);
                    break;
                }
            }
        }
        debug!(repeat, written = summary.written, skipped = summary.skipped, "image repeated");
        Ok(summary)
    }

    /// Fill the whole panel with one color, through the limiter
    pub fn clear(&mut self, color: BinaryColor) -> Result<WriteOutcome, DisplayError> {
        let image = self.new_image_filled(Layout::Vertical, color)?;
        self.display_full(&image, Orientation::Normal)
    }

    /// Put the panel into deep sleep; a no-op when emulated
    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        self.sink.sleep().map_err(|error| {
            warn!(model = self.spec.model, %error, "panel sleep failed");
            DisplayError::from(error)
        })?;
        debug!(model = self.spec.model, "panel asleep");
        Ok(())
    }

    fn full_frame(
        &self,
        image: &MonochromeImage,
        orientation: Orientation,
    ) -> Result<FrameBuffer, DisplayError> {
        let (width, height) = (self.spec.width, self.spec.height);
        let native = match (image.width(), image.height()) {
            (w, h) if (w, h) == (width, height) => image.to_frame_buffer(Orientation::Normal)?,
            (w, h) if (w, h) == (height, width) => {
                image.to_frame_buffer(Orientation::Normal)?.rotated90_ccw()
            }
            (w, h) => {
                return Err(DisplayError::ImageSizeMismatch {
                    expected_width: width,
                    expected_height: height,
                    actual_width: w,
                    actual_height: h,
                })
            }
        };
        // A quarter turn counter-clockwise plus a half turn is a clockwise quarter turn.
        Ok(match orientation {
            Orientation::Normal => native,
            Orientation::UpsideDown => native.rotated180(),
        })
    }

    fn submit(&mut self, region: RegionKey, frame: &FrameBuffer) -> Result<WriteOutcome, DisplayError> {
        if !self.limiter.should_write(region, frame) {
            return Ok(WriteOutcome::Skipped);
        }
        match self.sink.dispatch(region, frame) {
            Ok(()) => {
                debug!(?region, emulated = self.sink.is_emulated(), "frame written");
                Ok(WriteOutcome::Written)
            }
            Err(error) => {
                warn!(?region, %error, "panel write failed");
                self.limiter.forget(region);
                Err(error.into())
            }
        }
    }
}

impl<D: PanelDriver> DisplayController<D, NullView> {
    /// Open `model` on a physical panel without probing for presence
    pub fn physical(model: &str, driver: D, config: ControllerConfig) -> Result<Self, DisplayError> {
        let spec = lookup(model)?;
        Self::with_driver(spec, driver, config)
    }
}

impl<V: EmulatorView> DisplayController<NoPanel, V> {
    /// Open `model` in emulation, presenting frames on `view`
    pub fn emulated(model: &str, view: V, config: ControllerConfig) -> Result<Self, DisplayError> {
        let spec = lookup(model)?;
        Self::with_emulator(spec, view, config)
    }
}

impl<D, V> DisplayController<D, V> {
    /// Panel specification
    pub fn spec(&self) -> &'static DisplaySpec {
        self.spec
    }

    /// True when frames are simulated instead of sent to a panel
    pub fn is_emulated(&self) -> bool {
        self.sink.is_emulated()
    }

    /// Where writes go
    pub fn sink(&self) -> &WriteSink<D, V> {
        &self.sink
    }

    /// Where writes go, mutably
    pub fn sink_mut(&mut self) -> &mut WriteSink<D, V> {
        &mut self.sink
    }

    /// The write limiter and its per-region history
    pub fn limiter(&self) -> &WriteLimiter {
        &self.limiter
    }

    /// Image dimensions for `layout`
    pub fn image_size(&self, layout: Layout) -> (u32, u32) {
        match layout {
            Layout::Horizontal => self.spec.landscape_size(),
            Layout::Vertical => self.spec.portrait_size(),
        }
    }

    /// White image sized for `layout`
    pub fn new_image(&self, layout: Layout) -> Result<MonochromeImage, DisplayError> {
        self.new_image_filled(layout, BinaryColor::Off)
    }

    /// Image sized for `layout`, filled with `color`
    pub fn new_image_filled(
        &self,
        layout: Layout,
        color: BinaryColor,
    ) -> Result<MonochromeImage, DisplayError> {
        let (width, height) = self.image_size(layout);
        MonochromeImage::filled(width, height, color)
    }
}
