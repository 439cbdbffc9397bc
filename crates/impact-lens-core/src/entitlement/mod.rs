//! Paid/unpaid status from the subscription collaborator.
//!
//! The subscription system is a black box: it answers "is this user paid?"
//! and can open its payment page. Nothing here caches its answer.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EntitlementSettings;

/// Plan nickname offered from the upgrade prompt
pub const UNLIMITED_PLAN: &str = "unlimited";

/// Entitlement as reported by the subscription system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementStatus {
    #[serde(rename = "paid")]
    pub is_paid: bool,
}

/// Error type for entitlement operations
#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("subscription service unavailable: {0}")]
    Unavailable(String),

    #[error("no payment page configured")]
    NoPaymentPage,

    #[error("invalid payment page url: {0}")]
    InvalidUrl(String),
}

/// Subscription collaborator
pub trait EntitlementProvider: Send + Sync + 'static {
    /// Fetch the current user's status (always fresh)
    fn get_user(&self) -> impl Future<Output = Result<EntitlementStatus, EntitlementError>> + Send;

    /// Open the payment page, optionally preselecting a plan. Returns the URL opened.
    fn open_payment_page(&self, plan: Option<&str>) -> Result<String, EntitlementError>;
}

/// Entitlement read from the local configuration
#[derive(Debug, Clone)]
pub struct ConfiguredEntitlement {
    paid: bool,
    payment_page_url: Option<String>,
}

impl ConfiguredEntitlement {
    pub fn new(settings: &EntitlementSettings) -> Self {
        Self {
            paid: settings.paid,
            payment_page_url: settings.payment_page_url.clone(),
        }
    }
}

impl EntitlementProvider for ConfiguredEntitlement {
    async fn get_user(&self) -> Result<EntitlementStatus, EntitlementError> {
        Ok(EntitlementStatus { is_paid: self.paid })
    }

    fn open_payment_page(&self, plan: Option<&str>) -> Result<String, EntitlementError> {
        let base = self
            .payment_page_url
            .as_deref()
            .ok_or(EntitlementError::NoPaymentPage)?;
        let mut url =
            reqwest::Url::parse(base).map_err(|e| EntitlementError::InvalidUrl(e.to_string()))?;
        if let Some(plan) = plan {
            url.query_pairs_mut().append_pair("plan", plan);
        }
        tracing::info!("Opening payment page {}", url);
        Ok(url.to_string())
    }
}
