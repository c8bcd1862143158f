//! The single gate every display path passes through

use eink_emulator::FrameBuffer;
use platform::RegionKey;

use crate::change_tracker::{ChangeTracker, Classification};

/// Caps identical writes to a region at three
#[derive(Debug, Default)]
pub struct WriteLimiter {
    tracker: ChangeTracker,
}

impl WriteLimiter {
    /// Limiter with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `buffer` for `region` and decide whether to dispatch it
    pub fn should_write(&mut self, region: RegionKey, buffer: &FrameBuffer) -> bool {
        self.classify(region, buffer).dispatches()
    }

    /// Like [`should_write`](Self::should_write), returning the full classification
    pub fn classify(&mut self, region: RegionKey, buffer: &FrameBuffer) -> Classification {
        let classification = self.tracker.record_and_classify(region, buffer);
        if !classification.dispatches() {
            tracing::trace!(?region, "identical frame suppressed");
        }
        classification
    }

    /// Drop the history of `region` so the next submission dispatches
    pub fn forget(&mut self, region: RegionKey) {
        self.tracker.forget(region);
    }

    /// Underlying tracker
    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use eink_emulator::Orientation;

    #[test]
    fn test_three_writes_then_suppressed() {
        let mut limiter = WriteLimiter::new();
        let frame = FrameBuffer::filled(4, 4, Orientation::Normal, true).unwrap();

        let decisions: Vec<bool> = (0..6)
            .map(|_| limiter.should_write(RegionKey::FullFrame, &frame))
            .collect();
        assert_eq!(decisions, vec![true, true, true, false, false, false]);
    }

    #[test]
    fn test_forget_reopens_gate() {
        let mut limiter = WriteLimiter::new();
        let frame = FrameBuffer::filled(4, 4, Orientation::Normal, true).unwrap();
        for _ in 0..3 {
            limiter.should_write(RegionKey::FullFrame, &frame);
        }
        limiter.forget(RegionKey::FullFrame);
        assert!(limiter.should_write(RegionKey::FullFrame, &frame));
        assert_eq!(limiter.tracker().repeat_count(RegionKey::FullFrame), Some(0));
    }
}
