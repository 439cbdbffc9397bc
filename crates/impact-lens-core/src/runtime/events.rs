//! Push notifications from the background to interested consumers.

use tokio::sync::broadcast;

use super::core::ImpactLens;
use crate::messaging::TabId;
use crate::usage::UsageRecord;

/// Capacity of the event channel
pub(crate) const EVENT_CAPACITY: usize = 256;

/// Events emitted by the background context.
///
/// Consumers call [`ImpactLens::subscribe()`] to receive these events via a
/// `broadcast::Receiver`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionEvent {
    /// A page announced article content, now cached as the latest content
    ContentReady {
        tab_id: Option<TabId>,
        url: String,
    },

    /// A page asked for the side panel to be opened
    SidePanelRequested { tab_id: TabId },

    /// An unpaid analysis was counted
    UsageRecorded { month_count: u32, total_words: u64 },

    /// An analysis finished successfully
    AnalysisCompleted { url: String, word_count: u64 },
}

impl From<&UsageRecord> for ExtensionEvent {
    fn from(record: &UsageRecord) -> Self {
        ExtensionEvent::UsageRecorded {
            month_count: record.month_count,
            total_words: record.total_words,
        }
    }
}

impl<E> ImpactLens<E> {
    /// Subscribe to extension events.
    ///
    /// If the receiver falls behind, older events are dropped (lagged).
    pub fn subscribe(&self) -> broadcast::Receiver<ExtensionEvent> {
        self.event_sender().subscribe()
    }
}
