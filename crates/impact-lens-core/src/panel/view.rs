//! Rendering seam of the side panel and the usage indicator.

use serde::Serialize;

use crate::analysis::AnalysisResult;
use crate::i18n::Strings;

/// Usage indicator shown in the panel header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum UsageDisplay {
    Premium,
    Free { used: u32, limit: u32 },
}

impl UsageDisplay {
    pub fn is_exhausted(&self) -> bool {
        match self {
            UsageDisplay::Premium => false,
            UsageDisplay::Free { used, limit } => used >= limit,
        }
    }

    /// Translated one-line label, e.g. `3/5 used`
    pub fn label(&self, strings: &Strings) -> String {
        match self {
            UsageDisplay::Premium => {
                format!("{} · {}", strings.premium_account, strings.unlimited_analyses)
            }
            UsageDisplay::Free { used, limit } => format!("{}/{} {}", used, limit, strings.usage),
        }
    }
}

/// Rendering surface of the side panel.
///
/// Every method receives the strings of the language the panel is in.
pub trait PanelView: Send + Sync {
    fn show_loading(&self, strings: &Strings);

    fn show_insufficient_content(&self, strings: &Strings);

    fn show_error(&self, message: &str, strings: &Strings);

    /// The quota is used up; offer the upgrade path
    fn show_upgrade_prompt(&self, usage: &UsageDisplay, strings: &Strings);

    fn show_results(&self, result: &AnalysisResult, strings: &Strings);

    fn show_usage(&self, usage: &UsageDisplay, strings: &Strings);
}

/// View that only logs; used when no surface is attached
#[derive(Debug, Default)]
pub struct LogView;

impl PanelView for LogView {
    fn show_loading(&self, strings: &Strings) {
        tracing::debug!("{}", strings.analyzing);
    }

    fn show_insufficient_content(&self, strings: &Strings) {
        tracing::info!("{}", strings.insufficient_content);
    }

    fn show_error(&self, message: &str, _strings: &Strings) {
        tracing::warn!("Analysis failed: {}", message);
    }

    fn show_upgrade_prompt(&self, usage: &UsageDisplay, strings: &Strings) {
        tracing::info!("{} {}", strings.limit_reached, usage.label(strings));
    }

    fn show_results(&self, result: &AnalysisResult, strings: &Strings) {
        tracing::info!(
            "{}: {}",
            strings.main_claim,
            result.claim_summary.as_deref().unwrap_or(strings.no_claim)
        );
    }

    fn show_usage(&self, usage: &UsageDisplay, strings: &Strings) {
        tracing::debug!("{}", usage.label(strings));
    }
}
