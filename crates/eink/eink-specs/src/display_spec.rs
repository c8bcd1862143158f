//! Display specification types
//!
//! Defines the characteristics of a monochrome e-paper panel that the
//! controller and the emulator need.

use core::time::Duration;

/// Complete specification of an e-paper panel
///
/// `width` and `height` are the panel's *native* addressing dimensions: the
/// order in which the controller RAM is scanned. Most small panels are
/// portrait-native (e.g. 122×250) and are used in landscape by rotating
/// images before they are written.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DisplaySpec {
    /// Display name (e.g., "Waveshare 2.13\" V2")
    pub name: &'static str,

    /// Driver-name string used to select this panel (e.g., "epd2in13_V2")
    pub model: &'static str,

    /// Native width in pixels
    pub width: u32,

    /// Native height in pixels
    pub height: u32,

    /// Display controller chip
    pub controller: Controller,

    /// E-ink panel type
    pub panel_type: PanelType,

    /// Full refresh duration in milliseconds (typical: 2000ms)
    pub full_refresh_ms: u32,

    /// Partial refresh duration in milliseconds (typical: 300ms)
    pub partial_refresh_ms: u32,
}

impl DisplaySpec {
    /// Get display aspect ratio (width / height)
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Get approximate diagonal size in inches
    ///
    /// Assumes typical e-ink PPI of 130. Use for rough size estimates only.
    // SAFETY: panel dimensions are at most a few thousand pixels, so the
    // squared sum fits comfortably in u64.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn diagonal_inches(&self) -> f32 {
        const TYPICAL_PPI: f32 = 130.0;
        let w = u64::from(self.width);
        let h = u64::from(self.height);
        let diagonal_px = libm::sqrtf((w * w + h * h) as f32);
        diagonal_px / TYPICAL_PPI
    }

    /// Number of pixels on the panel
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width).saturating_mul(u64::from(self.height))
    }

    /// Bytes needed to hold one contiguously packed 1-bit frame
    pub fn frame_bytes(&self) -> u64 {
        self.pixel_count().div_ceil(8)
    }

    /// Dimensions of an image in native (vertical) layout
    pub fn portrait_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Dimensions of an image in horizontal layout (width and height swapped)
    pub fn landscape_size(&self) -> (u32, u32) {
        (self.height, self.width)
    }

    /// Get full refresh duration as Duration
    pub fn full_refresh_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.full_refresh_ms))
    }

    /// Get partial refresh duration as Duration
    pub fn partial_refresh_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.partial_refresh_ms))
    }
}

/// E-paper display controller chips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Controller {
    /// Solomon Systech SSD1675B (Waveshare 2.13" V2)
    SSD1675B,
    /// Solomon Systech SSD1680 (Waveshare 2.13" V3/V4, 2.9" V2)
    SSD1680,
    /// Solomon Systech SSD1681 (Waveshare 1.54" V2)
    SSD1681,
    /// UltraChip UC8176 (Waveshare 4.2")
    UC8176,
    /// UltraChip UC8179 (Waveshare 7.5" V2)
    UC8179,
    /// Generic/unknown controller
    Generic,
}

/// E-ink panel technology types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PanelType {
    /// E Ink Pearl (older generation)
    Pearl,
    /// E Ink Carta 1000 (improved contrast)
    Carta1000,
    /// E Ink Carta 1200 (faster response)
    Carta1200,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_spec() -> DisplaySpec {
        DisplaySpec {
            name: "Test Display",
            model: "test",
            width: 122,
            height: 250,
            controller: Controller::SSD1675B,
            panel_type: PanelType::Carta1000,
            full_refresh_ms: 2000,
            partial_refresh_ms: 300,
        }
    }

    #[test]
    fn test_aspect_ratio() {
        let spec = test_spec();
        assert!((spec.aspect_ratio() - 0.488).abs() < 0.01);
    }

    #[test]
    fn test_diagonal_inches() {
        let spec = test_spec();
        let diagonal = spec.diagonal_inches();
        assert!(diagonal > 1.0 && diagonal < 3.0);
    }

    #[test]
    fn test_frame_bytes_rounds_up() {
        let mut spec = test_spec();
        assert_eq!(spec.pixel_count(), 30_500);
        assert_eq!(spec.frame_bytes(), 3813);

        spec.width = 3;
        spec.height = 3;
        assert_eq!(spec.frame_bytes(), 2);
    }

    #[test]
    fn test_layout_sizes() {
        let spec = test_spec();
        assert_eq!(spec.portrait_size(), (122, 250));
        assert_eq!(spec.landscape_size(), (250, 122));
    }

    #[test]
    fn test_durations() {
        let spec = test_spec();
        assert_eq!(spec.full_refresh_duration(), Duration::from_secs(2));
        assert_eq!(spec.partial_refresh_duration(), Duration::from_millis(300));
    }
}
