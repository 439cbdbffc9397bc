//! In-process relay between execution contexts.
//!
//! Each served endpoint owns an mpsc inbox. A request travels with a fresh
//! oneshot reply slot, so the response is correlated by construction and the
//! caller never sees another exchange's reply.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::protocol::{Endpoint, Envelope, Request, Response};
use crate::analysis::{AnalysisFailure, FailureKind};

/// Inbox depth per endpoint
const INBOX_CAPACITY: usize = 32;

/// Error type for a message exchange
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The target is not registered, its inbox is gone, or it dropped the
    /// reply slot without answering
    #[error("no response from {target}: channel closed")]
    ChannelClosed { target: Endpoint },

    /// The target received the request but does not handle the action
    #[error("{target} does not handle '{action}'")]
    Unhandled { target: Endpoint, action: String },
}

impl From<&RouterError> for AnalysisFailure {
    fn from(error: &RouterError) -> Self {
        let kind = match error {
            RouterError::ChannelClosed { .. } => FailureKind::ChannelClosed,
            RouterError::Unhandled { .. } => FailureKind::Internal,
        };
        AnalysisFailure::new(kind, error.to_string())
    }
}

/// Something that answers requests for one endpoint
pub trait Handler: Send + Sync + 'static {
    /// Produce the single response for `request`. May suspend on I/O; the
    /// router waits for the future before replying.
    fn handle(&self, origin: Endpoint, request: Request)
        -> impl Future<Output = Response> + Send;
}

/// Shared relay handle; clones talk to the same set of inboxes
#[derive(Clone, Default)]
pub struct MessageRouter {
    inboxes: Arc<RwLock<HashMap<Endpoint, mpsc::Sender<Envelope>>>>,
}

impl std::fmt::Debug for MessageRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRouter")
            .field("endpoints", &self.inboxes.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `endpoint` and start its receive loop.
    ///
    /// Each request runs in its own task, so a slow handler does not hold up
    /// other exchanges. Re-serving an endpoint replaces the previous inbox.
    pub fn serve<H: Handler>(&self, endpoint: Endpoint, handler: Arc<H>) -> JoinHandle<()> {
        let (tx, mut rx) = mpsc::channel::<Envelope>(INBOX_CAPACITY);
        self.inboxes.write().insert(endpoint, tx);
        tracing::debug!("Serving {}", endpoint);

        tokio::spawn(async move {
            while let Some(envelope) = rx.recv().await {
                let handler = handler.clone();
                tokio::spawn(async move {
                    let Envelope {
                        id,
                        origin,
                        request,
                        reply,
                    } = envelope;
                    let action = request.action();
                    tracing::debug!("{} <- {} [{}] {}", endpoint, origin, id, action);

                    let response = handler.handle(origin, request).await;
                    if let Response::Unhandled { .. } = &response {
                        tracing::warn!("{} does not handle '{}' from {}", endpoint, action, origin);
                    }
                    if reply.send(response).is_err() {
                        tracing::debug!("Caller for [{}] went away before the reply", id);
                    }
                });
            }
            tracing::debug!("Inbox for {} closed", endpoint);
        })
    }

    /// Remove an endpoint; its receive loop ends once in-flight sends drain
    pub fn unregister(&self, endpoint: Endpoint) {
        if self.inboxes.write().remove(&endpoint).is_some() {
            tracing::debug!("Unregistered {}", endpoint);
        }
    }

    pub fn is_registered(&self, endpoint: Endpoint) -> bool {
        self.inboxes.read().contains_key(&endpoint)
    }

    /// Send `request` from `origin` to `target` and wait for its response
    pub async fn send(
        &self,
        origin: Endpoint,
        target: Endpoint,
        request: Request,
    ) -> Result<Response, RouterError> {
        let inbox = self
            .inboxes
            .read()
            .get(&target)
            .cloned()
            .ok_or(RouterError::ChannelClosed { target })?;

        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = Envelope {
            id: uuid::Uuid::new_v4(),
            origin,
            request,
            reply: reply_tx,
        };
        tracing::debug!(
            "{} -> {} [{}] {}",
            origin,
            target,
            envelope.id,
            envelope.request.action()
        );

        inbox
            .send(envelope)
            .await
            .map_err(|_| RouterError::ChannelClosed { target })?;

        match reply_rx.await {
            Ok(Response::Unhandled { action }) => Err(RouterError::Unhandled { target, action }),
            Ok(response) => Ok(response),
            Err(_) => Err(RouterError::ChannelClosed { target }),
        }
    }
}
