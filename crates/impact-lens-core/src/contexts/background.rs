//! The persistent background worker: owns the quota decision, talks to the
//! analysis service and caches what pages announce.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::analysis::{AnalysisFailure, AnalysisRequest, AnalysisService, AnalysisTransport};
use crate::content::ContentPayload;
use crate::entitlement::EntitlementProvider;
use crate::messaging::{Endpoint, Handler, Request, Response};
use crate::runtime::ExtensionEvent;
use crate::storage::Storage;
use crate::usage::Clock;

/// Background context
pub struct BackgroundContext<T, E> {
    service: AnalysisService<T, E>,
    storage: Storage,
    clock: Arc<dyn Clock>,
    event_tx: broadcast::Sender<ExtensionEvent>,
}

impl<T: AnalysisTransport, E: EntitlementProvider> BackgroundContext<T, E> {
    pub fn new(
        service: AnalysisService<T, E>,
        storage: Storage,
        clock: Arc<dyn Clock>,
        event_tx: broadcast::Sender<ExtensionEvent>,
    ) -> Self {
        Self {
            service,
            storage,
            clock,
            event_tx,
        }
    }

    pub fn service(&self) -> &AnalysisService<T, E> {
        &self.service
    }

    fn emit(&self, event: ExtensionEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    async fn analyze(&self, request: AnalysisRequest) -> Response {
        match self.service.analyze(&request).await {
            Ok(outcome) => {
                if let Some(usage) = &outcome.usage {
                    self.emit(usage.into());
                }
                self.emit(ExtensionEvent::AnalysisCompleted {
                    url: request.url,
                    word_count: outcome.result.word_count,
                });
                Response::Analyzed {
                    data: outcome.result,
                }
            }
            Err(e) => {
                tracing::info!("Analysis of {} failed: {}", request.url, e);
                Response::Failed {
                    error: AnalysisFailure::from(&e),
                }
            }
        }
    }

    fn content_ready(&self, origin: Endpoint, content: ContentPayload) -> Response {
        if let Err(e) = self.storage.save_latest_content(&content, self.clock.now()) {
            tracing::warn!("Failed to cache content from {}: {}", origin, e);
        }
        let tab_id = match origin {
            Endpoint::Page(tab) => Some(tab),
            _ => None,
        };
        tracing::debug!("Content ready from {}: {} chars", origin, content.char_len());
        self.emit(ExtensionEvent::ContentReady {
            tab_id,
            url: content.url,
        });
        Response::Ack
    }

    fn open_side_panel(&self, origin: Endpoint) -> Response {
        match origin {
            Endpoint::Page(tab_id) => {
                self.emit(ExtensionEvent::SidePanelRequested { tab_id });
                Response::Ack
            }
            other => {
                tracing::debug!("Ignoring side panel request from {}", other);
                Response::unhandled(&Request::OpenSidePanel)
            }
        }
    }
}

impl<T: AnalysisTransport, E: EntitlementProvider> Handler for BackgroundContext<T, E> {
    async fn handle(&self, origin: Endpoint, request: Request) -> Response {
        match request {
            Request::AnalyzeContent { content } => self.analyze(content).await,
            Request::ContentReady { content } => self.content_ready(origin, content),
            Request::OpenSidePanel => self.open_side_panel(origin),
            Request::ExtractContent => Response::unhandled(&request),
        }
    }
}
