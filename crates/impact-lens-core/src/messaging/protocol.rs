//! Messages exchanged between the page, background and panel contexts.
//!
//! Requests are tagged by their action name on the wire (`analyzeContent`,
//! `contentReady`, ...); every request gets exactly one [`Response`].

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::analysis::{AnalysisFailure, AnalysisRequest, AnalysisResult};
use crate::content::ContentPayload;

/// Browser tab identifier
pub type TabId = u32;

/// An addressable execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tab", rename_all = "snake_case")]
pub enum Endpoint {
    /// The script embedded in one tab's page
    Page(TabId),
    /// The persistent background worker
    Background,
    /// The visible side panel
    Panel,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Page(tab) => write!(f, "page:{}", tab),
            Endpoint::Background => f.write_str("background"),
            Endpoint::Panel => f.write_str("panel"),
        }
    }
}

/// Request sent to another context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Panel → background: run an analysis
    AnalyzeContent { content: AnalysisRequest },
    /// Page → background: this page holds an article (fire-and-forget)
    ContentReady { content: ContentPayload },
    /// Page → background: open the side panel for the sender's tab
    OpenSidePanel,
    /// Panel → page: extract the article text now
    ExtractContent,
}

impl Request {
    /// Wire name of the action
    pub fn action(&self) -> &'static str {
        match self {
            Request::AnalyzeContent { .. } => "analyzeContent",
            Request::ContentReady { .. } => "contentReady",
            Request::OpenSidePanel => "openSidePanel",
            Request::ExtractContent => "extractContent",
        }
    }
}

/// Reply to a [`Request`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// Notification accepted
    Ack,
    /// Extraction result
    Content { content: ContentPayload },
    /// Analysis succeeded
    Analyzed { data: AnalysisResult },
    /// Analysis failed
    Failed { error: AnalysisFailure },
    /// The receiving context does not handle this action
    Unhandled { action: String },
}

impl Response {
    pub fn unhandled(request: &Request) -> Self {
        Response::Unhandled {
            action: request.action().to_string(),
        }
    }
}

/// A request in flight, carrying its own reply slot
#[derive(Debug)]
pub struct Envelope {
    /// Correlation id, used for logging only
    pub id: uuid::Uuid,
    pub origin: Endpoint,
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}
