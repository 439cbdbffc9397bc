//! Usage record persisted under the `usage` key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of free analyses per calendar month
pub const FREE_MONTHLY_LIMIT: u32 = 5;

/// Period key for the calendar month containing `now` (e.g. "2026-03")
pub fn period_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}

/// Monthly usage of the free tier.
///
/// Field names on disk match what older builds of the extension wrote. Their
/// month keys were zero-based local months, so an old record never matches
/// `period_key` and starts the month at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Analyses performed in `period_key`
    #[serde(rename = "monthly", default)]
    pub month_count: u32,
    /// Words analysed since the record was created (never reset)
    #[serde(rename = "words", default)]
    pub total_words: u64,
    /// Month of the last mutation
    #[serde(rename = "month", default)]
    pub period_key: String,
}

impl UsageRecord {
    /// Zero record for the given period
    pub fn empty(period_key: impl Into<String>) -> Self {
        Self {
            month_count: 0,
            total_words: 0,
            period_key: period_key.into(),
        }
    }

    /// Apply month rollover: a record from another period restarts at zero.
    ///
    /// Idempotent for a fixed `current` period.
    pub fn rolled_over(mut self, current: &str) -> Self {
        if self.period_key != current {
            self.month_count = 0;
            self.period_key = current.to_string();
        }
        self
    }

    /// Free analyses left this month
    pub fn remaining(&self) -> u32 {
        FREE_MONTHLY_LIMIT.saturating_sub(self.month_count)
    }

    /// Whether the free tier is used up
    pub fn is_exhausted(&self) -> bool {
        self.month_count >= FREE_MONTHLY_LIMIT
    }
}
