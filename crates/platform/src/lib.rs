//! Platform capabilities for the e-paper display stack
//!
//! This crate holds the seams between the display controller and the
//! outside world, so the controller can run with or without a physical
//! panel.
//!
//! # Architecture Layers
//!
//! ```text
//! Application
//!         ↓
//! eink-display (DisplayController, write limiting)
//!         ↓                         ↓
//! Platform (this crate)        eink-emulator (ghost simulation)
//!         ↓
//! Vendor panel driver (SPI/GPIO)
//! ```
//!
//! # Capabilities
//!
//! - [`PanelDriver`] - writes packed frames to a physical panel
//! - [`HardwarePresence`] - decides once whether a physical panel exists
//! - [`Region`] / [`RegionKey`] - addressable display targets
//!
//! # Features
//!
//! - `mocks`: recording [`mocks::MockPanel`] for tests

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod display;
pub mod presence;
pub mod region;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use display::{DriverError, NoPanel, PanelDriver};
pub use presence::{ForcedPresence, HardwarePresence, HostBoard, SpiProbe};
pub use region::{Region, RegionKey};
