//! Panel driver abstraction
//!
//! The controller never talks SPI or GPIO itself. A vendor driver (or a
//! mock) implements [`PanelDriver`] and receives frames that are already
//! packed one bit per pixel, row-major, MSB first, set bit = white.

use thiserror_no_std::Error;

use crate::region::Region;

/// Physical panel driver
///
/// Implementations are selected by the driver-name string given at
/// [`initialize`](PanelDriver::initialize) time. Calls are synchronous: the
/// write latency of the panel is opaque to the caller.
pub trait PanelDriver {
    /// Bring the panel up for the given model
    ///
    /// Runs the panel's init sequence for both full and partial update
    /// waveforms.
    fn initialize(&mut self, model: &str) -> Result<(), DriverError>;

    /// Write a whole frame and trigger a refresh
    fn write_full(&mut self, bits: &[u8]) -> Result<(), DriverError>;

    /// Write a sub-rectangle and trigger a partial refresh
    fn write_partial(&mut self, region: Region, bits: &[u8]) -> Result<(), DriverError>;

    /// Enter deep sleep mode
    fn sleep(&mut self) -> Result<(), DriverError>;

    /// Clear the panel to white
    fn clear(&mut self) -> Result<(), DriverError>;
}

impl<D: PanelDriver + ?Sized> PanelDriver for Box<D> {
    fn initialize(&mut self, model: &str) -> Result<(), DriverError> {
        (**self).initialize(model)
    }

    fn write_full(&mut self, bits: &[u8]) -> Result<(), DriverError> {
        (**self).write_full(bits)
    }

    fn write_partial(&mut self, region: Region, bits: &[u8]) -> Result<(), DriverError> {
        (**self).write_partial(region, bits)
    }

    fn sleep(&mut self) -> Result<(), DriverError> {
        (**self).sleep()
    }

    fn clear(&mut self) -> Result<(), DriverError> {
        (**self).clear()
    }
}

/// Placeholder driver for sessions that never touch hardware
///
/// Used as the driver type of an emulated-only controller. Every call
/// fails with [`DriverError::NotInitialized`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPanel;

impl PanelDriver for NoPanel {
    fn initialize(&mut self, _model: &str) -> Result<(), DriverError> {
        Err(DriverError::NotInitialized)
    }

    fn write_full(&mut self, _bits: &[u8]) -> Result<(), DriverError> {
        Err(DriverError::NotInitialized)
    }

    fn write_partial(&mut self, _region: Region, _bits: &[u8]) -> Result<(), DriverError> {
        Err(DriverError::NotInitialized)
    }

    fn sleep(&mut self) -> Result<(), DriverError> {
        Err(DriverError::NotInitialized)
    }

    fn clear(&mut self) -> Result<(), DriverError> {
        Err(DriverError::NotInitialized)
    }
}

/// Panel driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DriverError {
    /// SPI or GPIO communication error
    #[error("display communication error")]
    Communication,
    /// Display busy
    #[error("display is busy")]
    Busy,
    /// Invalid state
    #[error("display in invalid state")]
    InvalidState,
    /// Timeout waiting on the BUSY line
    #[error("display operation timeout")]
    Timeout,
    /// No panel has been initialized
    #[error("display not initialized")]
    NotInitialized,
}
