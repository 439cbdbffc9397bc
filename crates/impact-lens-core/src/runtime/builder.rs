//! Builder for constructing an [`ImpactLens`] instance.
//!
//! ```ignore
//! let lens = ImpactLensBuilder::new(settings)
//!     .with_storage(storage)
//!     .with_view(Arc::new(TerminalView::new()))
//!     .build();
//! ```

use std::sync::Arc;

use tokio::sync::broadcast;

use super::core::{ImpactLens, Parts};
use super::events::EVENT_CAPACITY;
use crate::analysis::{AnalysisClient, AnalysisService, AnalysisTransport, HttpTransport};
use crate::config::Settings;
use crate::content::ContentExtractor;
use crate::contexts::BackgroundContext;
use crate::entitlement::{ConfiguredEntitlement, EntitlementProvider};
use crate::messaging::{Endpoint, MessageRouter};
use crate::panel::{LogView, PanelController, PanelView};
use crate::storage::Storage;
use crate::usage::{Clock, SystemClock, UsageTracker};

/// Builder for constructing an [`ImpactLens`] facade
pub struct ImpactLensBuilder<T = HttpTransport, E = ConfiguredEntitlement> {
    settings: Arc<Settings>,
    transport: T,
    entitlement: E,
    storage: Option<Storage>,
    clock: Option<Arc<dyn Clock>>,
    view: Option<Arc<dyn PanelView>>,
}

impl ImpactLensBuilder {
    /// Create a builder talking to the configured service and subscription
    pub fn new(settings: Settings) -> Self {
        let transport = HttpTransport::new(settings.api_base_url.clone());
        let entitlement = ConfiguredEntitlement::new(&settings.entitlement);
        Self {
            settings: Arc::new(settings),
            transport,
            entitlement,
            storage: None,
            clock: None,
            view: None,
        }
    }
}

impl<T, E> ImpactLensBuilder<T, E> {
    /// Replace the analysis transport
    pub fn with_transport<U>(self, transport: U) -> ImpactLensBuilder<U, E> {
        ImpactLensBuilder {
            settings: self.settings,
            transport,
            entitlement: self.entitlement,
            storage: self.storage,
            clock: self.clock,
            view: self.view,
        }
    }

    /// Replace the subscription collaborator
    pub fn with_entitlement<F>(self, entitlement: F) -> ImpactLensBuilder<T, F> {
        ImpactLensBuilder {
            settings: self.settings,
            transport: self.transport,
            entitlement,
            storage: self.storage,
            clock: self.clock,
            view: self.view,
        }
    }

    /// Use an existing store instead of an in-memory one
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the panel's rendering surface
    pub fn with_view(mut self, view: Arc<dyn PanelView>) -> Self {
        self.view = Some(view);
        self
    }
}

impl<T: AnalysisTransport, E: EntitlementProvider> ImpactLensBuilder<T, E> {
    /// Build the facade and start the background context.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> ImpactLens<E> {
        let storage = self.storage.unwrap_or_else(Storage::in_memory);
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let view = self.view.unwrap_or_else(|| Arc::new(LogView));
        let entitlement = Arc::new(self.entitlement);
        let tracker = Arc::new(UsageTracker::new(storage.clone(), clock.clone()));
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let extractor = if self.settings.content_selectors.is_empty() {
            ContentExtractor::new()
        } else {
            ContentExtractor::new().with_content_selectors(self.settings.content_selectors.clone())
        };

        let service = AnalysisService::new(
            AnalysisClient::new(self.transport),
            entitlement.clone(),
            tracker.clone(),
            storage.clone(),
            clock.clone(),
        );
        let router = MessageRouter::new();
        let background_task = router.serve(
            Endpoint::Background,
            Arc::new(BackgroundContext::new(
                service,
                storage.clone(),
                clock.clone(),
                event_tx.clone(),
            )),
        );

        let panel = Arc::new(PanelController::new(
            router.clone(),
            entitlement,
            tracker.clone(),
            storage.clone(),
            clock.clone(),
            view,
            self.settings.default_language,
        ));

        ImpactLens::from_parts(Parts {
            settings: self.settings,
            router,
            storage,
            tracker,
            panel,
            extractor,
            clock,
            background_task,
            event_tx,
        })
    }
}
