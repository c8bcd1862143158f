//! E-paper display controller
//!
//! Drives a monochrome e-paper panel, or a ghosting emulator when no panel
//! is attached, behind one API. Every write is checked against the last
//! frame sent to the same region: an unchanged frame is written at most
//! three times (enough for a panel to lose the ghost of the previous
//! image) and then suppressed.
//!
//! # Architecture
//!
//! ```text
//! caller
//!   ↓ MonochromeImage
//! DisplayController ── orientation ──→ FrameBuffer
//!   ↓
//! WriteLimiter (ChangeTracker per RegionKey)
//!   ↓ dispatch
//! WriteSink::Physical(PanelDriver) | WriteSink::Emulated(GhostEmulator → EmulatorView)
//! ```
//!
//! # Example
//!
//! ```
//! use eink_display::{ControllerConfig, DisplayController, Layout, WriteOutcome};
//! use eink_emulator::{Orientation, RecordingView};
//! use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
//! use embedded_graphics::pixelcolor::BinaryColor;
//! use embedded_graphics::prelude::*;
//! use embedded_graphics::text::Text;
//!
//! let mut display =
//!     DisplayController::emulated("epd2in13_V2", RecordingView::new(), ControllerConfig::default())?;
//!
//! let mut image = display.new_image(Layout::Horizontal)?;
//! Text::new("12:34", Point::new(10, 20), MonoTextStyle::new(&FONT_6X10, BinaryColor::On))
//!     .draw(&mut image)?;
//!
//! let summary = display.display_image(&image, Orientation::Normal, 5)?;
//! assert_eq!((summary.written, summary.skipped), (3, 2));
//! assert_eq!(display.display_full(&image, Orientation::Normal)?, WriteOutcome::Skipped);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code

pub mod change_tracker;
pub mod config;
pub mod controller;
pub mod error;
pub mod monochrome;
pub mod sink;
pub mod write_limiter;

pub use change_tracker::{ChangeTracker, Classification, WriteRecord, MAX_WRITES_PER_FRAME};
pub use config::ControllerConfig;
pub use controller::{DisplayController, Layout, RepeatSummary, WriteOutcome};
pub use error::DisplayError;
pub use monochrome::MonochromeImage;
pub use sink::WriteSink;
pub use write_limiter::WriteLimiter;

pub use eink_emulator::Orientation;
pub use platform::{Region, RegionKey};
