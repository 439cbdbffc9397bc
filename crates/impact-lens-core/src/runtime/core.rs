//! ImpactLens: the facade that owns the three contexts and their wiring.
//!
//! Consumers open tabs, drive the panel and read usage through this type;
//! they never register endpoints or share storage handles themselves.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::events::ExtensionEvent;
use crate::config::Settings;
use crate::content::{ContentExtractor, RenderedDocument};
use crate::contexts::PageContext;
use crate::entitlement::{ConfiguredEntitlement, EntitlementProvider};
use crate::messaging::{Endpoint, MessageRouter, TabId};
use crate::panel::PanelController;
use crate::storage::{Storage, StoreError};
use crate::usage::{Clock, UsageRecord, UsageTracker};

/// Running extension: background served, panel ready, tabs on demand.
///
/// Constructed via [`ImpactLensBuilder`](super::builder::ImpactLensBuilder).
pub struct ImpactLens<E = ConfiguredEntitlement> {
    settings: Arc<Settings>,
    router: MessageRouter,
    storage: Storage,
    tracker: Arc<UsageTracker>,
    panel: Arc<PanelController<E>>,
    extractor: ContentExtractor,
    clock: Arc<dyn Clock>,
    pages: RwLock<HashMap<TabId, (Arc<PageContext>, JoinHandle<()>)>>,
    next_tab: AtomicU32,
    background_task: Mutex<Option<JoinHandle<()>>>,
    event_tx: broadcast::Sender<ExtensionEvent>,
}

/// Everything the builder hands over
pub(crate) struct Parts<E> {
    pub settings: Arc<Settings>,
    pub router: MessageRouter,
    pub storage: Storage,
    pub tracker: Arc<UsageTracker>,
    pub panel: Arc<PanelController<E>>,
    pub extractor: ContentExtractor,
    pub clock: Arc<dyn Clock>,
    pub background_task: JoinHandle<()>,
    pub event_tx: broadcast::Sender<ExtensionEvent>,
}

impl<E> ImpactLens<E> {
    pub(crate) fn from_parts(parts: Parts<E>) -> Self {
        Self {
            settings: parts.settings,
            router: parts.router,
            storage: parts.storage,
            tracker: parts.tracker,
            panel: parts.panel,
            extractor: parts.extractor,
            clock: parts.clock,
            pages: RwLock::new(HashMap::new()),
            next_tab: AtomicU32::new(1),
            background_task: Mutex::new(Some(parts.background_task)),
            event_tx: parts.event_tx,
        }
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<ExtensionEvent> {
        self.event_tx.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn panel(&self) -> &Arc<PanelController<E>> {
        &self.panel
    }

    /// Current usage with rollover applied
    pub fn usage(&self) -> Result<UsageRecord, StoreError> {
        self.tracker.get_record()
    }

    pub fn tracker(&self) -> &Arc<UsageTracker> {
        &self.tracker
    }

    pub fn page(&self, tab: TabId) -> Option<Arc<PageContext>> {
        self.pages.read().get(&tab).map(|(page, _)| page.clone())
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        let mut tabs: Vec<_> = self.pages.read().keys().copied().collect();
        tabs.sort_unstable();
        tabs
    }

    /// Stop every context. Requests in flight fail with `ChannelClosed`.
    pub fn shutdown(&self) {
        for (tab, (_, task)) in self.pages.write().drain() {
            self.router.unregister(Endpoint::Page(tab));
            task.abort();
        }
        self.router.unregister(Endpoint::Background);
        if let Some(task) = self.background_task.lock().take() {
            task.abort();
        }
        tracing::debug!("ImpactLens shut down");
    }
}

impl<E: EntitlementProvider> ImpactLens<E> {
    /// Open a tab showing `document` and make it the panel's active tab.
    ///
    /// Article pages announce themselves to the background right away.
    pub async fn open_tab(&self, document: RenderedDocument) -> TabId {
        let tab = self.next_tab.fetch_add(1, Ordering::SeqCst);
        let page = Arc::new(PageContext::new(
            tab,
            document,
            self.extractor.clone(),
            self.clock.clone(),
        ));
        let task = self.router.serve(Endpoint::Page(tab), page.clone());
        self.pages.write().insert(tab, (page.clone(), task));
        self.panel.set_active_tab(Some(tab));
        tracing::debug!("Opened tab {}", tab);

        self.announce(&page).await;
        tab
    }

    /// Load another document into an open tab. Returns false for unknown tabs.
    pub async fn navigate(&self, tab: TabId, document: RenderedDocument) -> bool {
        let Some(page) = self.page(tab) else {
            return false;
        };
        page.navigate(document);
        if self.panel.active_tab() == Some(tab) {
            self.panel.invalidate();
        }
        self.announce(&page).await;
        true
    }

    /// Close a tab; the panel loses it if it was active
    pub fn close_tab(&self, tab: TabId) {
        if let Some((_, task)) = self.pages.write().remove(&tab) {
            self.router.unregister(Endpoint::Page(tab));
            task.abort();
        }
        if self.panel.active_tab() == Some(tab) {
            self.panel.set_active_tab(None);
        }
    }

    async fn announce(&self, page: &PageContext) {
        match page.announce_if_article(&self.router).await {
            Ok(true) => tracing::debug!("Tab {} announced its content", page.tab_id()),
            Ok(false) => {}
            Err(e) => tracing::warn!("Tab {} could not announce content: {}", page.tab_id(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::FailureKind;
    use crate::config::Settings;
    use crate::content::RenderedDocument;
    use crate::panel::{PanelOutcome, UsageDisplay};
    use crate::runtime::{ExtensionEvent, ImpactLens, ImpactLensBuilder};
    use crate::test_support::{
        article_text, sample_result, FakeEntitlement, FakeTransport, FixedClock, RecordingView,
        ViewCall,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    struct Harness {
        lens: ImpactLens<FakeEntitlement>,
        transport: FakeTransport,
        view: Arc<RecordingView>,
    }

    fn harness(paid: bool, count: u32, transport: FakeTransport) -> Harness {
        let view = Arc::new(RecordingView::default());
        let lens = ImpactLensBuilder::new(Settings::default())
            .with_transport(transport.clone())
            .with_entitlement(FakeEntitlement::new(paid))
            .with_clock(Arc::new(FixedClock::default()))
            .with_view(view.clone())
            .build();
        for _ in 0..count {
            lens.tracker().record_usage(100).unwrap();
        }
        Harness {
            lens,
            transport,
            view,
        }
    }

    fn article(words: usize) -> RenderedDocument {
        RenderedDocument::from_text("https://news.example/story", "Story", "menu footer")
            .with_region("article", article_text(words))
    }

    #[tokio::test]
    async fn test_unpaid_fourth_to_fifth_analysis() {
        let h = harness(false, 4, FakeTransport::succeeding(200));
        h.lens.open_tab(article(200)).await;

        let outcome = h.lens.panel().analyze_active_tab().await;

        assert_eq!(outcome, PanelOutcome::Rendered(sample_result(200)));
        assert_eq!(h.transport.calls(), 1);
        let usage = h.lens.usage().unwrap();
        assert_eq!(usage.month_count, 5);
        assert_eq!(usage.total_words, 600);
    }

    #[tokio::test]
    async fn test_unpaid_exhausted_prompts_upgrade() {
        let h = harness(false, 5, FakeTransport::succeeding(200));
        h.lens.open_tab(article(200)).await;

        let outcome = h.lens.panel().analyze_active_tab().await;

        assert_eq!(outcome, PanelOutcome::UpgradeRequired);
        assert_eq!(h.transport.calls(), 0);
        assert_eq!(
            h.view.calls().last(),
            Some(&ViewCall::UpgradePrompt(UsageDisplay::Free { used: 5, limit: 5 }))
        );
    }

    #[tokio::test]
    async fn test_paid_never_counts() {
        let h = harness(true, 7, FakeTransport::succeeding(300));
        h.lens.open_tab(article(300)).await;

        let outcome = h.lens.panel().analyze_active_tab().await;

        assert!(matches!(outcome, PanelOutcome::Rendered(_)));
        assert_eq!(h.lens.usage().unwrap().month_count, 7);
    }

    #[tokio::test]
    async fn test_article_tab_announces_content() {
        let h = harness(false, 0, FakeTransport::succeeding(200));
        let mut events = h.lens.subscribe();

        let tab = h.lens.open_tab(article(200)).await;

        assert_eq!(
            events.recv().await.unwrap(),
            ExtensionEvent::ContentReady {
                tab_id: Some(tab),
                url: "https://news.example/story".into()
            }
        );
        let cached = h.lens.storage().latest_content().unwrap().unwrap();
        assert_eq!(cached.value.word_count, 200);
    }

    #[tokio::test]
    async fn test_side_panel_request_event() {
        let h = harness(false, 0, FakeTransport::succeeding(200));
        let tab = h
            .lens
            .open_tab(RenderedDocument::from_text("u", "t", "short"))
            .await;
        let mut events = h.lens.subscribe();

        let page = h.lens.page(tab).unwrap();
        page.request_side_panel(h.lens.router()).await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            ExtensionEvent::SidePanelRequested { tab_id: tab }
        );
    }

    #[tokio::test]
    async fn test_closed_tab_is_insufficient_content() {
        let h = harness(false, 0, FakeTransport::succeeding(200));
        let tab = h.lens.open_tab(article(200)).await;
        h.lens.close_tab(tab);

        assert_eq!(h.lens.panel().active_tab(), None);
        assert_eq!(
            h.lens.panel().analyze_active_tab().await,
            PanelOutcome::InsufficientContent
        );
        assert!(h.lens.tab_ids().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_closes_background() {
        let h = harness(false, 0, FakeTransport::succeeding(200));
        h.lens.open_tab(article(200)).await;
        let tab = h.lens.tab_ids()[0];
        h.lens.shutdown();

        h.lens.panel().set_active_tab(Some(tab));
        // Page is gone too, so extraction fails first
        assert_eq!(
            h.lens.panel().analyze_active_tab().await,
            PanelOutcome::InsufficientContent
        );
    }

    #[tokio::test]
    async fn test_background_gone_is_channel_closed() {
        let h = harness(false, 0, FakeTransport::succeeding(200));
        h.lens.open_tab(article(200)).await;
        h.lens.router().unregister(crate::messaging::Endpoint::Background);

        let outcome = h.lens.panel().analyze_active_tab().await;
        let PanelOutcome::Failed(failure) = outcome else {
            panic!("Expected Failed, got {outcome:?}");
        };
        assert_eq!(failure.kind, FailureKind::ChannelClosed);
    }
}
