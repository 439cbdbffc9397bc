//! Fakes shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::analysis::{
    AnalysisError, AnalysisRequest, AnalysisResult, AnalysisTransport, CriticalQuestion, Source,
};
use crate::entitlement::{EntitlementError, EntitlementProvider, EntitlementStatus};
use crate::i18n::Strings;
use crate::panel::{PanelView, UsageDisplay};
use crate::usage::Clock;

/// Clock that only moves when told to
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(Utc.with_ymd_and_hms(2026, 3, 15, 9, 30, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Article body of exactly `words` words
pub fn article_text(words: usize) -> String {
    (0..words)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A plausible analysis result billed at `word_count` words
pub fn sample_result(word_count: u64) -> AnalysisResult {
    AnalysisResult {
        claim_summary: Some("De gemeente verhoogt de belasting.".to_string()),
        impact_summary: vec!["Hogere lasten voor huishoudens".to_string()],
        critical_questions: vec![
            CriticalQuestion {
                question: "Hoeveel stijgt de belasting?".to_string(),
                answer: Some("Drie procent".to_string()),
            },
            CriticalQuestion {
                question: "Wie is vrijgesteld?".to_string(),
                answer: None,
            },
        ],
        sources: vec![Source {
            title: "Gemeenteraad".to_string(),
            url: "https://gemeente.example/besluit".to_string(),
        }],
        word_count,
        timestamp: Some("2026-03-15T09:30:00".to_string()),
    }
}

#[derive(Debug, Clone)]
enum FakeReply {
    Success(u64),
    Http(u16, String),
}

/// Transport that counts calls and answers from a script.
///
/// Clones share their counters, so a test can keep one while the background
/// owns another.
#[derive(Clone)]
pub struct FakeTransport {
    reply: FakeReply,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<AnalysisRequest>>>,
    gate: Option<Arc<Notify>>,
}

impl FakeTransport {
    fn with_reply(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Every call returns `sample_result(word_count)`
    pub fn succeeding(word_count: u64) -> Self {
        Self::with_reply(FakeReply::Success(word_count))
    }

    /// Every call fails with the given status and body
    pub fn failing_http(status: u16, body: &str) -> Self {
        Self::with_reply(FakeReply::Http(status, body.to_string()))
    }

    /// Hold every call until `gate` is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<AnalysisRequest> {
        self.requests.lock().last().cloned()
    }
}

impl AnalysisTransport for FakeTransport {
    async fn post_analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            FakeReply::Success(word_count) => Ok(sample_result(*word_count)),
            FakeReply::Http(status, body) => Err(AnalysisError::Http {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

/// Subscription collaborator whose answer can be flipped mid-test
#[derive(Clone)]
pub struct FakeEntitlement {
    paid: Arc<AtomicBool>,
    lookups: Arc<AtomicUsize>,
}

impl FakeEntitlement {
    pub fn new(paid: bool) -> Self {
        Self {
            paid: Arc::new(AtomicBool::new(paid)),
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_paid(&self, paid: bool) {
        self.paid.store(paid, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl EntitlementProvider for FakeEntitlement {
    async fn get_user(&self) -> Result<EntitlementStatus, EntitlementError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(EntitlementStatus {
            is_paid: self.paid.load(Ordering::SeqCst),
        })
    }

    fn open_payment_page(&self, plan: Option<&str>) -> Result<String, EntitlementError> {
        let base = "https://pay.example/checkout";
        Ok(match plan {
            Some(plan) => format!("{}?plan={}", base, plan),
            None => base.to_string(),
        })
    }
}

/// One call made on a [`RecordingView`]
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Loading,
    InsufficientContent,
    Error(String),
    UpgradePrompt(UsageDisplay),
    Results(AnalysisResult),
    Usage(UsageDisplay),
}

/// View that remembers what it was asked to show
#[derive(Default)]
pub struct RecordingView {
    calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().clone()
    }

    fn push(&self, call: ViewCall) {
        self.calls.lock().push(call);
    }
}

impl PanelView for RecordingView {
    fn show_loading(&self, _strings: &Strings) {
        self.push(ViewCall::Loading);
    }

    fn show_insufficient_content(&self, _strings: &Strings) {
        self.push(ViewCall::InsufficientContent);
    }

    fn show_error(&self, message: &str, _strings: &Strings) {
        self.push(ViewCall::Error(message.to_string()));
    }

    fn show_upgrade_prompt(&self, usage: &UsageDisplay, _strings: &Strings) {
        self.push(ViewCall::UpgradePrompt(*usage));
    }

    fn show_results(&self, result: &AnalysisResult, _strings: &Strings) {
        self.push(ViewCall::Results(result.clone()));
    }

    fn show_usage(&self, usage: &UsageDisplay, _strings: &Strings) {
        self.push(ViewCall::Usage(*usage));
    }
}
