//! Display controller errors

use eink_emulator::{ConfigError, FrameError};
use platform::{DriverError, Region};
use thiserror_no_std::Error;

/// Errors returned by [`DisplayController`](crate::DisplayController)
///
/// A suppressed repeat write is not an error; it is reported as
/// [`WriteOutcome::Skipped`](crate::WriteOutcome::Skipped).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    /// Width or height is zero or too large
    #[error("invalid image dimension {width}x{height}")]
    InvalidDimension {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// No panel is registered under this driver name
    #[error("unknown panel driver {0:?}")]
    UnknownDriver(String),
    /// Region is empty or extends past the panel edge
    #[error("region {region:?} does not fit a {panel_width}x{panel_height} panel")]
    RegionOutOfBounds {
        /// Offending region
        region: Region,
        /// Native panel width
        panel_width: u32,
        /// Native panel height
        panel_height: u32,
    },
    /// Image does not match the target size in either accepted layout
    #[error("image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    ImageSizeMismatch {
        /// Expected width
        expected_width: u32,
        /// Expected height
        expected_height: u32,
        /// Supplied width
        actual_width: u32,
        /// Supplied height
        actual_height: u32,
    },
    /// Packed frame could not be built
    #[error(transparent)]
    Frame(FrameError),
    /// Emulator or controller configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The physical panel driver failed
    #[error("panel driver error: {0}")]
    Driver(#[from] DriverError),
}

impl From<FrameError> for DisplayError {
    fn from(error: FrameError) -> Self {
        match error {
            FrameError::InvalidDimension { width, height } => {
                DisplayError::InvalidDimension { width, height }
            }
            other => DisplayError::Frame(other),
        }
    }
}
