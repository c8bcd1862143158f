//! Waveshare e-paper display specifications
//!
//! Pre-configured specs for the Waveshare monochrome modules, keyed by the
//! name of their vendor driver module.

use crate::{Controller, DisplaySpec, PanelType};

/// Waveshare 1.54" V2 (200×200, SSD1681)
pub const WAVESHARE_1_54_V2: DisplaySpec = DisplaySpec {
    name: "Waveshare 1.54\" V2",
    model: "epd1in54_V2",
    width: 200,
    height: 200,
    controller: Controller::SSD1681,
    panel_type: PanelType::Carta1000,
    full_refresh_ms: 2000,
    partial_refresh_ms: 300,
};

/// Waveshare 2.13" V2 (122×250 native, SSD1675B)
///
/// The panel the write-coalescing behaviour was tuned on: after a partial
/// refresh, black areas turned white need three writes to lose their
/// ghost.
pub const WAVESHARE_2_13_V2: DisplaySpec = DisplaySpec {
    name: "Waveshare 2.13\" V2",
    model: "epd2in13_V2",
    width: 122,
    height: 250,
    controller: Controller::SSD1675B,
    panel_type: PanelType::Carta1000,
    full_refresh_ms: 2000,
    partial_refresh_ms: 300,
};

/// Waveshare 2.13" V3 (122×250 native, SSD1680)
pub const WAVESHARE_2_13_V3: DisplaySpec = DisplaySpec {
    name: "Waveshare 2.13\" V3",
    model: "epd2in13_V3",
    width: 122,
    height: 250,
    controller: Controller::SSD1680,
    panel_type: PanelType::Carta1000,
    full_refresh_ms: 2000,
    partial_refresh_ms: 300,
};

/// Waveshare 2.13" V4 (122×250 native, SSD1680)
///
/// Faster partial refresh than V2/V3.
pub const WAVESHARE_2_13_V4: DisplaySpec = DisplaySpec {
    name: "Waveshare 2.13\" V4",
    model: "epd2in13_V4",
    width: 122,
    height: 250,
    controller: Controller::SSD1680,
    panel_type: PanelType::Carta1000,
    full_refresh_ms: 2000,
    partial_refresh_ms: 260,
};

/// Waveshare 2.9" V2 (128×296 native, SSD1680)
pub const WAVESHARE_2_9_V2: DisplaySpec = DisplaySpec {
    name: "Waveshare 2.9\" V2",
    model: "epd2in9_V2",
    width: 128,
    height: 296,
    controller: Controller::SSD1680,
    panel_type: PanelType::Carta1000,
    full_refresh_ms: 2000,
    partial_refresh_ms: 300,
};

/// Waveshare 4.2" (400×300, UC8176)
///
/// Older Pearl panel; partial updates are slow and ghost for longer.
pub const WAVESHARE_4_2: DisplaySpec = DisplaySpec {
    name: "Waveshare 4.2\"",
    model: "epd4in2",
    width: 400,
    height: 300,
    controller: Controller::UC8176,
    panel_type: PanelType::Pearl,
    full_refresh_ms: 4000,
    partial_refresh_ms: 800,
};

/// Waveshare 7.5" V2 (800×480, UC8179)
pub const WAVESHARE_7_5_V2: DisplaySpec = DisplaySpec {
    name: "Waveshare 7.5\" V2",
    model: "epd7in5_V2",
    width: 800,
    height: 480,
    controller: Controller::UC8179,
    panel_type: PanelType::Carta1200,
    full_refresh_ms: 5000,
    partial_refresh_ms: 1500,
};
