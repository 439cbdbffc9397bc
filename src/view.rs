//! Terminal rendering of the side panel.

use std::fmt::Write as _;

use impact_lens_core::analysis::AnalysisResult;
use impact_lens_core::i18n::Strings;
use impact_lens_core::panel::{PanelView, UsageDisplay};

/// Panel view that prints to stdout
#[derive(Debug, Default)]
pub struct TerminalView;

impl TerminalView {
    pub fn new() -> Self {
        Self
    }
}

impl PanelView for TerminalView {
    fn show_loading(&self, strings: &Strings) {
        println!("{}", strings.analyzing);
    }

    fn show_insufficient_content(&self, strings: &Strings) {
        println!("{}", strings.insufficient_content);
    }

    fn show_error(&self, message: &str, _strings: &Strings) {
        eprintln!("Error: {}", message);
    }

    fn show_upgrade_prompt(&self, usage: &UsageDisplay, strings: &Strings) {
        print!("{}", render_upgrade_prompt(usage, strings));
    }

    fn show_results(&self, result: &AnalysisResult, strings: &Strings) {
        print!("{}", render_results(result, strings));
    }

    fn show_usage(&self, usage: &UsageDisplay, strings: &Strings) {
        println!("[{}]", usage.label(strings));
    }
}

/// Format an analysis the way the panel lays it out
pub fn render_results(result: &AnalysisResult, strings: &Strings) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", strings.main_claim);
    let _ = writeln!(
        out,
        "  {}",
        result.claim_summary.as_deref().unwrap_or(strings.no_claim)
    );

    if !result.impact_summary.is_empty() {
        let _ = writeln!(out, "\n{}", strings.impact_summary);
        for point in &result.impact_summary {
            let _ = writeln!(out, "  • {}", point);
        }
    }

    if !result.critical_questions.is_empty() {
        let _ = writeln!(out, "\n{}", strings.critical_questions);
        for (i, q) in result.critical_questions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, q.question);
            let answer = q.answer.as_deref().unwrap_or(strings.question_not_answered);
            let _ = writeln!(out, "     {}: {}", strings.answer, answer);
        }
    }

    if !result.sources.is_empty() {
        let _ = writeln!(out, "\n{}", strings.sources);
        for source in &result.sources {
            let _ = writeln!(out, "  - {} <{}>", source.title, source.url);
        }
    }

    out
}

fn render_upgrade_prompt(usage: &UsageDisplay, strings: &Strings) -> String {
    format!(
        "\n{}\n{}\n[{}]\n\n{}\n  {}\n  → impact-lens upgrade\n",
        strings.limit_reached,
        strings.limit_reached_text,
        usage.label(strings),
        strings.upgrade_to_premium,
        strings.premium_benefits,
    )
}
