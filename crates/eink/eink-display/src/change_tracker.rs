//! Per-region change detection
//!
//! Bit-exact comparison of each submitted frame against the last one
//! dispatched to the same region, with a saturating repeat counter.

use std::collections::HashMap;

use eink_emulator::FrameBuffer;
use platform::RegionKey;

/// Most dispatches of one unchanged frame (the first write included)
pub const MAX_WRITES_PER_FRAME: u8 = 3;

/// Ceiling of [`WriteRecord::repeat_count`]
pub const MAX_REPEAT_COUNT: u8 = MAX_WRITES_PER_FRAME;

/// How a submission relates to the last dispatched frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// First frame for the region, or different from the last one
    Changed,
    /// Same frame again; the payload is the repeat number (1 or 2)
    RepeatWithinLimit(u8),
    /// Same frame, already dispatched the maximum number of times
    RepeatOverLimit,
}

impl Classification {
    /// True unless the write should be suppressed
    pub fn dispatches(self) -> bool {
        !matches!(self, Classification::RepeatOverLimit)
    }
}

/// Last dispatched frame for one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// Frame most recently accepted for the region
    pub last_buffer: FrameBuffer,
    /// Identical submissions since the last change, capped at 3
    pub repeat_count: u8,
}

/// Change tracking for every region seen so far
#[derive(Debug, Default)]
pub struct ChangeTracker {
    records: HashMap<RegionKey, WriteRecord>,
}

impl ChangeTracker {
    /// Tracker with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `buffer` with the region's last frame and record it
    ///
    /// A new or different frame resets the repeat count. An equal frame
    /// bumps it (saturating at 3); the first two repeats dispatch, the
    /// rest are over the limit.
    pub fn record_and_classify(&mut self, region: RegionKey, buffer: &FrameBuffer) -> Classification {
        match self.records.get_mut(&region) {
            Some(record) if record.last_buffer == *buffer => {
                record.repeat_count = record
                    .repeat_count
                    .saturating_add(1)
                    .min(MAX_REPEAT_COUNT);
                if record.repeat_count < MAX_WRITES_PER_FRAME {
                    Classification::RepeatWithinLimit(record.repeat_count)
                } else {
                    Classification::RepeatOverLimit
                }
            }
            Some(record) => {
                record.last_buffer = buffer.clone();
                record.repeat_count = 0;
                Classification::Changed
            }
            None => {
                self.records.insert(
                    region,
                    WriteRecord {
                        last_buffer: buffer.clone(),
                        repeat_count: 0,
                    },
                );
                Classification::Changed
            }
        }
    }

    /// Drop the history of `region`; its next submission is `Changed`
    pub fn forget(&mut self, region: RegionKey) -> Option<WriteRecord> {
        self.records.remove(&region)
    }

    /// Repeat count of `region`, `None` if never seen
    pub fn repeat_count(&self, region: RegionKey) -> Option<u8> {
        self.records.get(&region).map(|record| record.repeat_count)
    }

    /// Record for `region`
    pub fn record(&self, region: RegionKey) -> Option<&WriteRecord> {
        self.records.get(&region)
    }

    /// Regions with history
    pub fn regions(&self) -> impl Iterator<Item = &RegionKey> {
        self.records.keys()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use eink_emulator::Orientation;
    use platform::Region;

    fn frame(white: bool) -> FrameBuffer {
        FrameBuffer::filled(8, 2, Orientation::Normal, white).unwrap()
    }

    #[test]
    fn test_first_submission_is_changed() {
        let mut tracker = ChangeTracker::new();
        assert_eq!(
            tracker.record_and_classify(RegionKey::FullFrame, &frame(true)),
            Classification::Changed
        );
        assert_eq!(tracker.repeat_count(RegionKey::FullFrame), Some(0));
    }

    #[test]
    fn test_repeat_sequence() {
        let mut tracker = ChangeTracker::new();
        let key = RegionKey::FullFrame;
        let white = frame(true);

        let seen: Vec<_> = (0..5)
            .map(|_| tracker.record_and_classify(key, &white))
            .collect();
        assert_eq!(
            seen,
            vec![
                Classification::Changed,
                Classification::RepeatWithinLimit(1),
                Classification::RepeatWithinLimit(2),
                Classification::RepeatOverLimit,
                Classification::RepeatOverLimit,
            ]
        );
        assert_eq!(tracker.repeat_count(key), Some(3));
    }

    #[test]
    fn test_change_resets_count() {
        let mut tracker = ChangeTracker::new();
        let key = RegionKey::FullFrame;
        for _ in 0..4 {
            tracker.record_and_classify(key, &frame(true));
        }
        assert_eq!(
            tracker.record_and_classify(key, &frame(false)),
            Classification::Changed
        );
        assert_eq!(tracker.repeat_count(key), Some(0));
        assert_eq!(
            tracker.record_and_classify(key, &frame(true)),
            Classification::Changed,
            "A after B is a change even if A was seen before"
        );
    }

    #[test]
    fn test_regions_do_not_interfere() {
        let mut tracker = ChangeTracker::new();
        let a = RegionKey::Rect(Region::new(0, 0, 8, 2));
        let b = RegionKey::Rect(Region::new(8, 0, 8, 2));
        for _ in 0..3 {
            tracker.record_and_classify(a, &frame(true));
        }
        assert_eq!(
            tracker.record_and_classify(b, &frame(true)),
            Classification::Changed
        );
        assert_eq!(tracker.regions().count(), 2);
    }

    #[test]
    fn test_forget_restarts_region() {
        let mut tracker = ChangeTracker::new();
        let key = RegionKey::FullFrame;
        tracker.record_and_classify(key, &frame(true));
        assert!(tracker.forget(key).is_some());
        assert_eq!(tracker.repeat_count(key), None);
        assert_eq!(
            tracker.record_and_classify(key, &frame(true)),
            Classification::Changed
        );
    }
}
