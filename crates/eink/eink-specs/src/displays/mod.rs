//! Pre-configured display specifications
//!
//! Panel templates plus the driver-name lookup used when a controller is
//! opened by model string.

pub mod waveshare;

pub use waveshare::*;

use crate::DisplaySpec;

/// Every panel this crate knows, in lookup order
pub static ALL: &[&DisplaySpec] = &[
    &WAVESHARE_1_54_V2,
    &WAVESHARE_2_13_V2,
    &WAVESHARE_2_13_V3,
    &WAVESHARE_2_13_V4,
    &WAVESHARE_2_9_V2,
    &WAVESHARE_4_2,
    &WAVESHARE_7_5_V2,
];

/// Look up a panel by its driver-name string
///
/// Matching is exact; `"epd2in13_v2"` is not `"epd2in13_V2"`.
pub fn by_model(model: &str) -> Option<&'static DisplaySpec> {
    ALL.iter().copied().find(|spec| spec.model == model)
}

/// Driver-name strings of every known panel
pub fn models() -> impl Iterator<Item = &'static str> {
    ALL.iter().map(|spec| spec.model)
}
