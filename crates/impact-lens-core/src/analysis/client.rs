//! HTTP client for the remote analysis service.

use std::future::Future;

use serde::Deserialize;
use tracing::{debug, info};

use super::error::AnalysisError;
use super::types::{AnalysisRequest, AnalysisResult, WireAnalysis};

/// Articles shorter than this are rejected before any network call
pub const MIN_WORDS: usize = 50;

/// Network seam for the analysis service
pub trait AnalysisTransport: Send + Sync + 'static {
    /// Send one `POST /analyze`. A single attempt, no retry.
    fn post_analyze(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = Result<AnalysisResult, AnalysisError>> + Send;
}

/// Body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// reqwest-backed transport.
///
/// The underlying client is built without a request timeout; a stalled
/// service stalls the attempt.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the service whether it is up
    pub async fn health(&self) -> Result<ServiceHealth, AnalysisError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Http {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| AnalysisError::Decode(e.to_string()))
    }
}

impl AnalysisTransport for HttpTransport {
    async fn post_analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let url = format!("{}/analyze", self.base_url);
        debug!("Sending API request to {} ({} chars)", url, request.text.len());

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();
        debug!("API response status: {}", status);
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| AnalysisError::Network(e.to_string()))?;
            debug!("API error response: {}", body);
            return Err(AnalysisError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let wire: WireAnalysis = response
            .json()
            .await
            .map_err(|e| AnalysisError::Decode(e.to_string()))?;
        Ok(wire.into())
    }
}

/// Client for the analysis endpoint
#[derive(Debug, Clone)]
pub struct AnalysisClient<T> {
    transport: T,
}

impl<T: AnalysisTransport> AnalysisClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Reject requests below [`MIN_WORDS`]; returns the word count otherwise
    pub fn check_length(request: &AnalysisRequest) -> Result<usize, AnalysisError> {
        let words = request.word_count();
        if words < MIN_WORDS {
            return Err(AnalysisError::TooShort { words });
        }
        Ok(words)
    }

    /// Analyze one article
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let words = Self::check_length(request)?;
        info!(
            "Analyzing content: {} chars, {} words ({})",
            request.text.chars().count(),
            words,
            request.language
        );
        self.transport.post_analyze(request).await
    }
}
