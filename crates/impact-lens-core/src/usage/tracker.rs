//! Owner of the persisted usage counter.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::clock::Clock;
use super::types::{period_key, UsageRecord};
use crate::storage::{Storage, StoreError};

/// Exclusive read-modify-write interface over the `usage` key
pub struct UsageTracker {
    storage: Storage,
    clock: Arc<dyn Clock>,
    /// Serializes `record_usage` so overlapping calls cannot lose an increment
    write_gate: Mutex<()>,
}

impl UsageTracker {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            write_gate: Mutex::new(()),
        }
    }

    /// Current record with month rollover applied.
    ///
    /// A missing record reads as zero for the current month. Rollover is not
    /// persisted here; the next `record_usage` writes the new period.
    pub fn get_record(&self) -> Result<UsageRecord, StoreError> {
        let current = period_key(self.clock.now());
        let record = self
            .storage
            .load_usage()?
            .unwrap_or_else(|| UsageRecord::empty(current.clone()));
        Ok(record.rolled_over(&current))
    }

    /// Count one analysis of `word_count` words against the current month
    pub fn record_usage(&self, word_count: u64) -> Result<UsageRecord, StoreError> {
        let _guard = self.write_gate.lock();

        let mut record = self.get_record()?;
        record.month_count += 1;
        record.total_words += word_count;
        self.storage.save_usage(&record)?;

        info!(
            month = %record.period_key,
            count = record.month_count,
            words = record.total_words,
            "Usage recorded"
        );
        Ok(record)
    }

    /// Overwrite the stored record (used by `usage --reset` and tests)
    pub fn reset(&self) -> Result<UsageRecord, StoreError> {
        let _guard = self.write_gate.lock();
        let record = UsageRecord::empty(period_key(self.clock.now()));
        self.storage.save_usage(&record)?;
        debug!("Usage reset for {}", record.period_key);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedClock;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn tracker_at(year: i32, month: u32) -> (UsageTracker, Arc<FixedClock>, Storage) {
        let clock = Arc::new(FixedClock::at(
            chrono::Utc.with_ymd_and_hms(year, month, 15, 10, 0, 0).unwrap(),
        ));
        let storage = Storage::in_memory();
        (UsageTracker::new(storage.clone(), clock.clone()), clock, storage)
    }

    #[test]
    fn test_get_record_defaults_to_zero() {
        let (tracker, _, _) = tracker_at(2026, 3);
        assert_eq!(tracker.get_record().unwrap(), UsageRecord::empty("2026-03"));
    }

    #[test]
    fn test_record_usage_increments() {
        let (tracker, _, _) = tracker_at(2026, 3);
        let first = tracker.record_usage(120).unwrap();
        let second = tracker.record_usage(0).unwrap();

        assert_eq!(first.month_count, 1);
        assert_eq!(first.total_words, 120);
        assert_eq!(second.month_count, 2);
        assert_eq!(second.total_words, 120);
        assert_eq!(tracker.get_record().unwrap(), second);
    }

    #[test]
    fn test_rollover_on_read_is_idempotent() {
        let (tracker, clock, _) = tracker_at(2026, 3);
        for _ in 0..4 {
            tracker.record_usage(100).unwrap();
        }

        clock.set(chrono::Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 1).unwrap());
        let once = tracker.get_record().unwrap();
        let twice = tracker.get_record().unwrap();

        assert_eq!(once.month_count, 0);
        assert_eq!(once.period_key, "2026-04");
        assert_eq!(once.total_words, 400);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_record_usage_after_rollover_starts_at_one() {
        let (tracker, clock, storage) = tracker_at(2026, 12);
        tracker.record_usage(10).unwrap();
        tracker.record_usage(10).unwrap();

        clock.set(chrono::Utc.with_ymd_and_hms(2027, 1, 2, 0, 0, 0).unwrap());
        let record = tracker.record_usage(30).unwrap();

        assert_eq!(record.month_count, 1);
        assert_eq!(record.period_key, "2027-01");
        assert_eq!(storage.load_usage().unwrap(), Some(record));
    }

    #[test]
    fn test_concurrent_record_usage_loses_nothing() {
        let (tracker, _, _) = tracker_at(2026, 3);
        let tracker = Arc::new(tracker);

        std::thread::scope(|scope| {
            for _ in 0..16 {
                let tracker = tracker.clone();
                scope.spawn(move || {
                    tracker.record_usage(5).unwrap();
                });
            }
        });

        let record = tracker.get_record().unwrap();
        assert_eq!(record.month_count, 16);
        assert_eq!(record.total_words, 80);
    }

    #[test]
    fn test_reset() {
        let (tracker, _, _) = tracker_at(2026, 3);
        tracker.record_usage(50).unwrap();
        assert_eq!(tracker.reset().unwrap(), UsageRecord::empty("2026-03"));
        assert_eq!(tracker.get_record().unwrap().month_count, 0);
    }
}
