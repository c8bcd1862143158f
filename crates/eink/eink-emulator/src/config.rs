//! Emulator configuration
//!
//! [`EmulatorConfig`] controls how the ghost model moves pixels between
//! polarities and how long an emulated write takes. [`Presentation`]
//! controls how a [`CanvasView`](crate::view::CanvasView) lays frames out.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Luma of settled black ink
pub const BLACK_LEVEL: u8 = 0;

/// Luma of settled white paper
pub const WHITE_LEVEL: u8 = 255;

/// Ghost model and timing for the emulated panel
///
/// Each dispatched write moves every pixel one rung along a ladder of
/// luma levels towards its target. A pixel turning white walks
/// `lighten_ladder`, a pixel turning black walks `darken_ladder`; the last
/// rung of each is the settled level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Levels visited on the way to white, strictly increasing, ending at 255
    pub lighten_ladder: Vec<u8>,
    /// Levels visited on the way to black, strictly decreasing, ending at 0
    pub darken_ladder: Vec<u8>,
    /// Time spent per emulated write
    pub pacing: Pacing,
}

impl EmulatorConfig {
    /// Default ladders with no write delay
    pub fn instant() -> Self {
        Self {
            lighten_ladder: vec![180, 220, WHITE_LEVEL],
            darken_ladder: vec![BLACK_LEVEL],
            pacing: Pacing::Instant,
        }
    }

    /// Default ladders, each write taking the panel's partial refresh time
    pub fn realtime() -> Self {
        Self {
            pacing: Pacing::Realtime,
            ..Self::instant()
        }
    }

    /// Writes needed for a black pixel to settle white
    pub fn lighten_steps(&self) -> usize {
        self.lighten_ladder.len()
    }

    /// Writes needed for a white pixel to settle black
    pub fn darken_steps(&self) -> usize {
        self.darken_ladder.len()
    }

    /// Check ladder shape
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ladder(&self.lighten_ladder, Ladder::Lighten)?;
        validate_ladder(&self.darken_ladder, Ladder::Darken)
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self::instant()
    }
}

/// Which ladder a [`ConfigError`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ladder {
    /// Towards white
    Lighten,
    /// Towards black
    Darken,
}

impl core::fmt::Display for Ladder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Ladder::Lighten => write!(f, "lighten"),
            Ladder::Darken => write!(f, "darken"),
        }
    }
}

/// Emulator configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Ladder has no rungs
    #[error("{0} ladder is empty")]
    EmptyLadder(Ladder),
    /// Ladder does not end at the settled level
    #[error("{ladder} ladder must end at {expected}, ends at {actual}")]
    UnsettledEnd {
        /// Offending ladder
        ladder: Ladder,
        /// Required final level
        expected: u8,
        /// Actual final level
        actual: u8,
    },
    /// Ladder rungs do not move monotonically towards the target
    #[error("{0} ladder is not strictly monotone")]
    NotMonotone(Ladder),
    /// JSON could not be parsed
    #[error("invalid emulator config: {0}")]
    Parse(String),
}

fn validate_ladder(ladder: &[u8], kind: Ladder) -> Result<(), ConfigError> {
    let last = *ladder.last().ok_or(ConfigError::EmptyLadder(kind))?;
    let expected = match kind {
        Ladder::Lighten => WHITE_LEVEL,
        Ladder::Darken => BLACK_LEVEL,
    };
    if last != expected {
        return Err(ConfigError::UnsettledEnd {
            ladder: kind,
            expected,
            actual: last,
        });
    }
    let monotone = ladder.windows(2).all(|pair| match (kind, pair) {
        (Ladder::Lighten, [a, b]) => a < b,
        (Ladder::Darken, [a, b]) => a > b,
        _ => true,
    });
    if !monotone {
        return Err(ConfigError::NotMonotone(kind));
    }
    Ok(())
}

/// Time spent per emulated write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// Return immediately
    #[default]
    Instant,
    /// Block for the panel's partial refresh duration
    Realtime,
    /// Block for a fixed number of milliseconds
    Fixed {
        /// Delay per write
        millis: u64,
    },
}

impl Pacing {
    /// Delay for one write on a panel whose partial refresh takes `panel`
    pub fn delay(self, panel: Duration) -> Duration {
        match self {
            Pacing::Instant => Duration::ZERO,
            Pacing::Realtime => panel,
            Pacing::Fixed { millis } => Duration::from_millis(millis),
        }
    }
}

/// Canvas presentation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    /// Canvas rotation (affects presentation only, not panel coordinates)
    pub rotation: Rotation,
    /// Upscaling factor (1 = no scaling, 2 = 2x for visibility, etc.)
    pub scale: u32,
}

impl Presentation {
    /// No rotation, no upscaling (1:1 pixel mapping)
    pub const NATIVE: Self = Self {
        rotation: Rotation::Degrees0,
        scale: 1,
    };

    /// Portrait-native panel shown in landscape (90° rotation), no upscaling
    pub const LANDSCAPE: Self = Self {
        rotation: Rotation::Degrees90,
        scale: 1,
    };

    /// Landscape, 2x upscaling
    pub const LANDSCAPE_2X: Self = Self {
        rotation: Rotation::Degrees90,
        scale: 2,
    };

    /// Canvas dimensions for a `width × height` panel
    pub fn canvas_size(&self, width: u32, height: u32) -> (u32, u32) {
        let (w, h) = self.rotation.apply_to_dimensions(width, height);
        let scale = self.scale.max(1);
        (w.saturating_mul(scale), h.saturating_mul(scale))
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::NATIVE
    }
}

/// Display rotation modes
///
/// Rotation is applied to the **canvas presentation only**, not to panel
/// coordinates. Frames stay in native panel order and are rotated when
/// composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation
    Degrees0,
    /// Rotate 90° clockwise (height × width)
    Degrees90,
    /// Rotate 180°
    Degrees180,
    /// Rotate 270° clockwise / 90° counter-clockwise (height × width)
    Degrees270,
}

impl Rotation {
    /// Check if rotation swaps width and height
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Rotation::Degrees90 | Rotation::Degrees270)
    }

    /// Calculate canvas dimensions after rotation
    pub fn apply_to_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Map native `(x, y)` in a `width × height` frame to rotated coordinates
    // SAFETY: callers pass x < width and y < height, so no subtraction underflows.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn apply_to_point(&self, x: u32, y: u32, width: u32, height: u32) -> (u32, u32) {
        match self {
            Rotation::Degrees0 => (x, y),
            Rotation::Degrees90 => (height - 1 - y, x),
            Rotation::Degrees180 => (width - 1 - x, height - 1 - y),
            Rotation::Degrees270 => (y, width - 1 - x),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_default_ladders_are_valid() {
        let config = EmulatorConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.lighten_steps(), 3);
        assert_eq!(config.darken_steps(), 1);
        assert_eq!(EmulatorConfig::realtime().pacing, Pacing::Realtime);
    }

    #[test]
    fn test_validate_rejects_bad_ladders() {
        let mut config = EmulatorConfig::default();
        config.lighten_ladder.clear();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyLadder(Ladder::Lighten))
        );

        config.lighten_ladder = vec![100, 200];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsettledEnd { actual: 200, .. })
        ));

        config.lighten_ladder = vec![200, 100, 255];
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotMonotone(Ladder::Lighten))
        );

        config = EmulatorConfig::default();
        config.darken_ladder = vec![50, 80, 0];
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotMonotone(Ladder::Darken))
        );
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = EmulatorConfig::from_json(r#"{ "lighten_ladder": [128, 255] }"#).unwrap();
        assert_eq!(config.lighten_ladder, vec![128, 255]);
        assert_eq!(config.darken_ladder, vec![0]);
        assert_eq!(config.pacing, Pacing::Instant);

        let config = EmulatorConfig::from_json(r#"{ "pacing": { "fixed": { "millis": 5 } } }"#)
            .unwrap();
        assert_eq!(config.pacing, Pacing::Fixed { millis: 5 });
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            EmulatorConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EmulatorConfig::from_json(r#"{ "darken_ladder": [10] }"#),
            Err(ConfigError::UnsettledEnd { .. })
        ));
    }

    #[test]
    fn test_pacing_delay() {
        let panel = Duration::from_millis(300);
        assert_eq!(Pacing::Instant.delay(panel), Duration::ZERO);
        assert_eq!(Pacing::Realtime.delay(panel), panel);
        assert_eq!(
            Pacing::Fixed { millis: 7 }.delay(panel),
            Duration::from_millis(7)
        );
    }

    #[test]
    fn test_rotation_dimensions() {
        assert_eq!(Rotation::Degrees0.apply_to_dimensions(122, 250), (122, 250));
        assert_eq!(Rotation::Degrees90.apply_to_dimensions(122, 250), (250, 122));
        assert_eq!(Presentation::LANDSCAPE_2X.canvas_size(122, 250), (500, 244));
    }

    #[test]
    fn test_rotation_points() {
        // top-left corner of a 4x2 frame
        assert_eq!(Rotation::Degrees90.apply_to_point(0, 0, 4, 2), (1, 0));
        assert_eq!(Rotation::Degrees180.apply_to_point(0, 0, 4, 2), (3, 1));
        assert_eq!(Rotation::Degrees270.apply_to_point(0, 0, 4, 2), (0, 3));
    }
}
