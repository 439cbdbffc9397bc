use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::client::MIN_WORDS;
use crate::entitlement::EntitlementError;
use crate::storage::StoreError;
use crate::usage::FREE_MONTHLY_LIMIT;

/// Error type for an analysis attempt
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Fewer than [`MIN_WORDS`] words; nothing was sent
    #[error(
        "article too short for analysis: {words} words (minimum {min} required)",
        min = MIN_WORDS
    )]
    TooShort { words: usize },

    /// The free tier is used up for this month; nothing was sent
    #[error(
        "free analyses used up for this month ({used}/{limit})",
        limit = FREE_MONTHLY_LIMIT
    )]
    UsageLimitExceeded { used: u32 },

    /// The service answered with a non-2xx status
    #[error("API error: {status} - {body}")]
    Http { status: u16, body: String },

    /// The request never got a response
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx response whose body is not an analysis result
    #[error("malformed analysis response: {0}")]
    Decode(String),

    #[error(transparent)]
    Entitlement(#[from] EntitlementError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl AnalysisError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AnalysisError::TooShort { .. } => FailureKind::InsufficientContent,
            AnalysisError::UsageLimitExceeded { .. } => FailureKind::UsageLimitExceeded,
            AnalysisError::Http { .. } => FailureKind::Http,
            AnalysisError::Network(_) => FailureKind::Network,
            AnalysisError::Decode(_)
            | AnalysisError::Entitlement(_)
            | AnalysisError::Storage(_) => FailureKind::Internal,
        }
    }
}

/// Failure categories visible to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Too little page text or too few words
    InsufficientContent,
    /// Quota gate refused the attempt; the panel shows the upgrade path
    UsageLimitExceeded,
    Http,
    Network,
    /// The message relay broke or the target never answered
    ChannelClosed,
    Internal,
}

/// Serializable failure carried back across the message relay
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AnalysisFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl AnalysisFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&AnalysisError> for AnalysisFailure {
    fn from(error: &AnalysisError) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}
