//! Quota decision for one analysis attempt.
//!
//! ```text
//! Unknown ──get_user()──► Paid                    (always admitted)
//!                    └──► Unpaid { month_count }  (admitted iff count < limit)
//! ```
//!
//! The entitlement is fetched fresh on every attempt.

use std::sync::Arc;

use tracing::debug;

use super::error::AnalysisError;
use crate::entitlement::{EntitlementProvider, EntitlementStatus};
use crate::storage::StoreError;
use crate::usage::{UsageRecord, UsageTracker, FREE_MONTHLY_LIMIT};

/// Where an attempt stands with respect to the quota
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuotaState {
    /// Entitlement not fetched yet
    #[default]
    Unknown,
    Paid,
    Unpaid { month_count: u32 },
}

impl QuotaState {
    /// Resolve the state from a fresh entitlement. Usage is only read for unpaid users.
    pub fn resolve(
        status: EntitlementStatus,
        usage: impl FnOnce() -> Result<UsageRecord, StoreError>,
    ) -> Result<Self, StoreError> {
        if status.is_paid {
            return Ok(QuotaState::Paid);
        }
        let record = usage()?;
        Ok(QuotaState::Unpaid {
            month_count: record.month_count,
        })
    }

    /// Whether an analysis may be sent in this state
    pub fn admits(&self) -> bool {
        match self {
            QuotaState::Unknown => false,
            QuotaState::Paid => true,
            QuotaState::Unpaid { month_count } => *month_count < FREE_MONTHLY_LIMIT,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, QuotaState::Paid)
    }
}

/// Gate consulted by the background before every analysis
pub struct QuotaGate<E> {
    entitlement: Arc<E>,
    tracker: Arc<UsageTracker>,
}

impl<E: EntitlementProvider> QuotaGate<E> {
    pub fn new(entitlement: Arc<E>, tracker: Arc<UsageTracker>) -> Self {
        Self {
            entitlement,
            tracker,
        }
    }

    /// Decide one attempt. `UsageLimitExceeded` is terminal for the attempt.
    pub async fn admit(&self) -> Result<QuotaState, AnalysisError> {
        let status = self.entitlement.get_user().await?;
        let state = QuotaState::resolve(status, || self.tracker.get_record())?;
        debug!(?state, "Quota decision");

        match state {
            QuotaState::Unpaid { month_count } if !state.admits() => {
                Err(AnalysisError::UsageLimitExceeded { used: month_count })
            }
            _ => Ok(state),
        }
    }
}
