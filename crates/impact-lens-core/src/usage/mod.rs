//! Usage monitoring: monthly counter of free analyses.
//!
//! The counter lives in storage under a key only this module can touch and
//! resets lazily when the calendar month changes.

pub mod clock;
pub mod tracker;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use tracker::UsageTracker;
pub use types::{period_key, UsageRecord, FREE_MONTHLY_LIMIT};
