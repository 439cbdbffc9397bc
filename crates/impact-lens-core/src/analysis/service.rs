//! Analysis as performed by the background: length check, quota gate,
//! remote call, usage accounting and result caching.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::client::{AnalysisClient, AnalysisTransport};
use super::error::AnalysisError;
use super::quota::QuotaGate;
use super::types::{AnalysisRequest, AnalysisResult};
use crate::entitlement::EntitlementProvider;
use crate::storage::Storage;
use crate::usage::{Clock, UsageRecord, UsageTracker};

/// A successful analysis and the usage it consumed
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    /// Updated record for unpaid users; `None` when the user is paid
    pub usage: Option<UsageRecord>,
}

/// Background-side analysis pipeline.
///
/// Attempts run one at a time: the quota check and the usage it records must
/// not interleave with another attempt.
pub struct AnalysisService<T, E> {
    client: AnalysisClient<T>,
    in_flight: Mutex<()>,
    gate: QuotaGate<E>,
    tracker: Arc<UsageTracker>,
    storage: Storage,
    clock: Arc<dyn Clock>,
}

impl<T: AnalysisTransport, E: EntitlementProvider> AnalysisService<T, E> {
    pub fn new(
        client: AnalysisClient<T>,
        entitlement: Arc<E>,
        tracker: Arc<UsageTracker>,
        storage: Storage,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            in_flight: Mutex::new(()),
            gate: QuotaGate::new(entitlement, tracker.clone()),
            tracker,
            storage,
            clock,
        }
    }

    pub fn client(&self) -> &AnalysisClient<T> {
        &self.client
    }

    /// Run one attempt. Every failure is terminal; nothing is retried.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        AnalysisClient::<T>::check_length(request)?;

        let _in_flight = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("Waiting for the previous analysis to finish");
                self.in_flight.lock().await
            }
        };
        let quota = self.gate.admit().await?;
        let result = self.client.analyze(request).await?;

        let usage = if quota.is_paid() {
            None
        } else {
            Some(self.tracker.record_usage(result.word_count)?)
        };

        // The cache is a convenience for reopening the panel; losing it is not a failure
        if let Err(e) = self.storage.save_latest_analysis(&result, self.clock.now()) {
            warn!("Failed to cache analysis result: {}", e);
        }

        info!(
            "Analysis complete: {} questions, {} impact points",
            result.critical_questions.len(),
            result.impact_summary.len()
        );
        Ok(AnalysisOutcome { result, usage })
    }
}
