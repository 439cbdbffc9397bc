//! Side panel orchestration.
//!
//! One attempt runs extraction (page) → analysis (background) → render. Each
//! attempt takes a generation token; anything that comes back after the
//! token went stale is dropped without touching the view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::view::{PanelView, UsageDisplay};
use crate::analysis::{AnalysisFailure, AnalysisRequest, AnalysisResult, FailureKind};
use crate::content::ContentPayload;
use crate::entitlement::{EntitlementError, EntitlementProvider, UNLIMITED_PLAN};
use crate::i18n::Language;
use crate::messaging::{Endpoint, MessageRouter, Request, Response, TabId};
use crate::storage::{Storage, StoreError};
use crate::usage::{Clock, UsageTracker, FREE_MONTHLY_LIMIT};

/// Extracted text shorter than this is not worth sending
pub const PANEL_MIN_CHARS: usize = 100;

/// How long a cached analysis is shown when the panel opens
const CACHED_ANALYSIS_MAX_AGE_MINUTES: i64 = 60;

/// Error type for panel operations outside an analysis attempt
#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Entitlement(#[from] EntitlementError),
}

/// How an attempt ended
#[derive(Debug, Clone, PartialEq)]
pub enum PanelOutcome {
    Rendered(AnalysisResult),
    InsufficientContent,
    UpgradeRequired,
    Failed(AnalysisFailure),
    /// A newer attempt or an invalidation superseded this one
    Discarded,
}

/// Panel context
pub struct PanelController<E> {
    router: MessageRouter,
    entitlement: Arc<E>,
    tracker: Arc<UsageTracker>,
    storage: Storage,
    clock: Arc<dyn Clock>,
    view: Arc<dyn PanelView>,
    language: RwLock<Language>,
    active_tab: RwLock<Option<TabId>>,
    generation: AtomicU64,
}

impl<E: EntitlementProvider> PanelController<E> {
    pub fn new(
        router: MessageRouter,
        entitlement: Arc<E>,
        tracker: Arc<UsageTracker>,
        storage: Storage,
        clock: Arc<dyn Clock>,
        view: Arc<dyn PanelView>,
        language: Language,
    ) -> Self {
        Self {
            router,
            entitlement,
            tracker,
            storage,
            clock,
            view,
            language: RwLock::new(language),
            active_tab: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn language(&self) -> Language {
        *self.language.read()
    }

    /// Switch language and persist the choice
    pub fn set_language(&self, language: Language) -> Result<(), PanelError> {
        self.storage.save_selected_language(language)?;
        *self.language.write() = language;
        tracing::debug!("Panel language set to {}", language);
        Ok(())
    }

    /// Restore the persisted language, keeping the current one if none was saved
    pub fn load_language(&self) -> Result<Language, PanelError> {
        if let Some(language) = self.storage.selected_language()? {
            *self.language.write() = language;
        }
        Ok(self.language())
    }

    pub fn active_tab(&self) -> Option<TabId> {
        *self.active_tab.read()
    }

    /// Point the panel at another tab; results for the previous tab are dropped
    pub fn set_active_tab(&self, tab: Option<TabId>) {
        *self.active_tab.write() = tab;
        self.invalidate();
    }

    /// Make every attempt in flight stale
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn begin_attempt(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Run one full analysis of the active tab
    pub async fn analyze_active_tab(&self) -> PanelOutcome {
        let generation = self.begin_attempt();
        let language = self.language();
        let strings = language.strings();
        self.view.show_loading(strings);

        let payload = self.extract().await;
        if !self.is_current(generation) {
            tracing::debug!("Discarding stale extraction (generation {})", generation);
            return PanelOutcome::Discarded;
        }
        let Some(payload) = payload.filter(|p| p.char_len() >= PANEL_MIN_CHARS) else {
            self.view.show_insufficient_content(strings);
            return PanelOutcome::InsufficientContent;
        };

        let request = AnalysisRequest::from_payload(&payload, language);
        let response = self
            .router
            .send(
                Endpoint::Panel,
                Endpoint::Background,
                Request::AnalyzeContent { content: request },
            )
            .await;
        if !self.is_current(generation) {
            tracing::debug!("Discarding stale analysis (generation {})", generation);
            return PanelOutcome::Discarded;
        }

        let failure = match response {
            Ok(Response::Analyzed { data }) => {
                self.view.show_results(&data, strings);
                if let Err(e) = self.refresh_usage().await {
                    tracing::warn!("Failed to refresh usage: {}", e);
                }
                return PanelOutcome::Rendered(data);
            }
            Ok(Response::Failed { error }) => error,
            Ok(other) => AnalysisFailure::new(
                FailureKind::Internal,
                format!("unexpected response to analyzeContent: {:?}", other),
            ),
            Err(e) => AnalysisFailure::from(&e),
        };

        match failure.kind {
            FailureKind::UsageLimitExceeded => {
                let used = self
                    .tracker
                    .get_record()
                    .map(|r| r.month_count)
                    .unwrap_or(FREE_MONTHLY_LIMIT);
                let usage = UsageDisplay::Free {
                    used,
                    limit: FREE_MONTHLY_LIMIT,
                };
                self.view.show_upgrade_prompt(&usage, strings);
                PanelOutcome::UpgradeRequired
            }
            FailureKind::InsufficientContent => {
                self.view.show_insufficient_content(strings);
                PanelOutcome::InsufficientContent
            }
            _ => {
                self.view.show_error(&failure.message, strings);
                PanelOutcome::Failed(failure)
            }
        }
    }

    async fn extract(&self) -> Option<ContentPayload> {
        let tab = self.active_tab()?;
        match self
            .router
            .send(Endpoint::Panel, Endpoint::Page(tab), Request::ExtractContent)
            .await
        {
            Ok(Response::Content { content }) => Some(content),
            Ok(other) => {
                tracing::debug!("Unexpected extraction response: {:?}", other);
                None
            }
            Err(e) => {
                tracing::debug!("Extraction failed: {}", e);
                None
            }
        }
    }

    /// Current usage indicator from a fresh entitlement lookup
    pub async fn usage_display(&self) -> Result<UsageDisplay, PanelError> {
        let status = self.entitlement.get_user().await?;
        if status.is_paid {
            return Ok(UsageDisplay::Premium);
        }
        Ok(UsageDisplay::Free {
            used: self.tracker.get_record()?.month_count,
            limit: FREE_MONTHLY_LIMIT,
        })
    }

    /// Re-read entitlement and usage and update the header
    pub async fn refresh_usage(&self) -> Result<UsageDisplay, PanelError> {
        let usage = self.usage_display().await?;
        self.view.show_usage(&usage, self.language().strings());
        Ok(usage)
    }

    /// Show the cached analysis if it is less than an hour old
    pub fn show_cached_analysis(&self) -> Result<Option<AnalysisResult>, PanelError> {
        let max_age = chrono::Duration::minutes(CACHED_ANALYSIS_MAX_AGE_MINUTES);
        match self.storage.latest_analysis()? {
            Some(cached) if cached.is_fresh(self.clock.now(), max_age) => {
                self.view.show_results(&cached.value, self.language().strings());
                Ok(Some(cached.value))
            }
            _ => Ok(None),
        }
    }

    /// Open the payment page with the unlimited plan preselected
    pub fn open_upgrade(&self) -> Result<String, PanelError> {
        Ok(self.entitlement.open_payment_page(Some(UNLIMITED_PLAN))?)
    }

    /// Open the payment page for an existing subscription
    pub fn open_manage(&self) -> Result<String, PanelError> {
        Ok(self.entitlement.open_payment_page(None)?)
    }
}
