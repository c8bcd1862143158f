//! E-Paper Panel Specifications
//!
//! Static descriptions of monochrome e-paper panels: native resolution,
//! controller and refresh timing.
//!
//! Panels are selected by their driver-name string, the same identifier the
//! vendor driver modules use (`"epd2in13_V2"`, `"epd4in2"`, ...).
//!
//! # Example
//!
//! ```
//! use eink_specs::displays;
//!
//! let spec = displays::by_model("epd2in13_V2").unwrap();
//! assert_eq!((spec.width, spec.height), (122, 250));
//! assert_eq!(spec.landscape_size(), (250, 122));
//! assert!(displays::by_model("epd0in00").is_none());
//! ```
//!
//! # Custom panels
//!
//! ```
//! use eink_specs::{Controller, DisplaySpec, PanelType};
//!
//! const MY_PANEL: DisplaySpec = DisplaySpec {
//!     name: "Bench panel",
//!     model: "bench",
//!     width: 64,
//!     height: 32,
//!     controller: Controller::Generic,
//!     panel_type: PanelType::Carta1000,
//!     full_refresh_ms: 2000,
//!     partial_refresh_ms: 300,
//! };
//! assert_eq!(MY_PANEL.frame_bytes(), 256);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod display_spec;
pub mod displays;

pub use display_spec::{Controller, DisplaySpec, PanelType};
