//! Remote content analysis: request/result types, the HTTP client, the quota
//! gate and the background-side pipeline tying them together.

pub mod client;
pub mod error;
pub mod quota;
pub mod service;
pub mod types;

pub use client::{AnalysisClient, AnalysisTransport, HttpTransport, ServiceHealth, MIN_WORDS};
pub use error::{AnalysisError, AnalysisFailure, FailureKind};
pub use quota::{QuotaGate, QuotaState};
pub use service::{AnalysisOutcome, AnalysisService};
pub use types::{AnalysisRequest, AnalysisResult, CriticalQuestion, Source};
