//! Mock implementations for testing
//!
//! [`MockPanel`] records every call it receives so tests can count
//! physical writes and inspect the exact bytes that reached the panel.

use std::collections::VecDeque;

use crate::display::{DriverError, PanelDriver};
use crate::region::Region;

/// One call received by a [`MockPanel`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCall {
    /// `initialize(model)`
    Initialize(String),
    /// `write_full(bits)`
    WriteFull(Vec<u8>),
    /// `write_partial(region, bits)`
    WritePartial(Region, Vec<u8>),
    /// `sleep()`
    Sleep,
    /// `clear()`
    Clear,
}

impl PanelCall {
    /// True for calls that put pixels on the panel
    pub fn is_write(&self) -> bool {
        matches!(self, PanelCall::WriteFull(_) | PanelCall::WritePartial(..))
    }
}

/// Mock panel driver
///
/// Calls are recorded in order. Queued failures are returned, one per
/// call, before any recording happens, so a failed call leaves no trace in
/// [`calls`](MockPanel::calls).
#[derive(Debug, Default)]
pub struct MockPanel {
    calls: Vec<PanelCall>,
    failures: VecDeque<DriverError>,
    initialized_model: Option<String>,
}

impl MockPanel {
    /// Create new mock panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&mut self, error: DriverError) {
        self.failures.push_back(error);
    }

    /// Every call recorded so far
    pub fn calls(&self) -> &[PanelCall] {
        &self.calls
    }

    /// Number of frame writes (full and partial)
    pub fn write_count(&self) -> usize {
        self.calls.iter().filter(|call| call.is_write()).count()
    }

    /// Bytes of the most recent frame write
    pub fn last_write(&self) -> Option<&[u8]> {
        self.calls.iter().rev().find_map(|call| match call {
            PanelCall::WriteFull(bits) | PanelCall::WritePartial(_, bits) => {
                Some(bits.as_slice())
            }
            _ => None,
        })
    }

    /// Model passed to the last successful `initialize`
    pub fn initialized_model(&self) -> Option<&str> {
        self.initialized_model.as_deref()
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn take_failure(&mut self) -> Result<(), DriverError> {
        match self.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl PanelDriver for MockPanel {
    fn initialize(&mut self, model: &str) -> Result<(), DriverError> {
        self.take_failure()?;
        self.initialized_model = Some(model.to_owned());
        self.calls.push(PanelCall::Initialize(model.to_owned()));
        Ok(())
    }

    fn write_full(&mut self, bits: &[u8]) -> Result<(), DriverError> {
        self.take_failure()?;
        self.calls.push(PanelCall::WriteFull(bits.to_vec()));
        Ok(())
    }

    fn write_partial(&mut self, region: Region, bits: &[u8]) -> Result<(), DriverError> {
        self.take_failure()?;
        self.calls.push(PanelCall::WritePartial(region, bits.to_vec()));
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), DriverError> {
        self.take_failure()?;
        self.calls.push(PanelCall::Sleep);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DriverError> {
        self.take_failure()?;
        self.calls.push(PanelCall::Clear);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_mock_panel_records_writes() {
        let mut panel = MockPanel::new();

        panel.initialize("epd2in13_V2").unwrap();
        panel.write_full(&[0xFF, 0x00]).unwrap();
        panel.write_partial(Region::new(0, 0, 8, 1), &[0x0F]).unwrap();
        panel.sleep().unwrap();

        assert_eq!(panel.write_count(), 2);
        assert_eq!(panel.last_write(), Some(&[0x0F][..]));
        assert_eq!(panel.initialized_model(), Some("epd2in13_V2"));
        assert_eq!(panel.calls().len(), 4);
    }

    #[test]
    fn test_mock_panel_failure_injection() {
        let mut panel = MockPanel::new();
        panel.fail_next(DriverError::Busy);

        assert_eq!(panel.write_full(&[0xFF]), Err(DriverError::Busy));
        assert_eq!(panel.write_count(), 0);

        panel.write_full(&[0xFF]).unwrap();
        assert_eq!(panel.write_count(), 1);
    }
}
