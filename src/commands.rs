//! Subcommand handlers.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use impact_lens_core::analysis::HttpTransport;
use impact_lens_core::config::Settings;
use impact_lens_core::content::RenderedDocument;
use impact_lens_core::entitlement::EntitlementProvider;
use impact_lens_core::i18n::Language;
use impact_lens_core::panel::{PanelOutcome, UsageDisplay};
use impact_lens_core::runtime::ImpactLens;
use impact_lens_core::usage::{UsageRecord, FREE_MONTHLY_LIMIT};

use crate::cli::Command;

/// Dispatch a subcommand against a running instance
pub async fn run<E: EntitlementProvider>(lens: &ImpactLens<E>, command: Option<Command>) -> Result<()> {
    match command {
        None => overview(lens).await,
        Some(Command::Analyze {
            file,
            url,
            title,
            language,
        }) => analyze(lens, &file, url, title, language).await,
        Some(Command::Usage { reset, json }) => usage(lens, reset, json).await,
        Some(Command::Last) => last(lens),
        Some(Command::Language { tag }) => language(lens, tag),
        Some(Command::Upgrade { manage }) => upgrade(lens, manage),
        Some(Command::Health) => bail!("health is handled before startup"),
    }
}

/// What the panel shows when it opens: usage plus the cached analysis
async fn overview<E: EntitlementProvider>(lens: &ImpactLens<E>) -> Result<()> {
    let panel = lens.panel();
    panel.refresh_usage().await?;
    if panel.show_cached_analysis()?.is_none() {
        let strings = panel.language().strings();
        println!("{}", strings.no_content);
        println!("  → impact-lens analyze <FILE>  ({})", strings.analyze);
    }
    Ok(())
}

async fn analyze<E: EntitlementProvider>(
    lens: &ImpactLens<E>,
    file: &Path,
    url: Option<String>,
    title: Option<String>,
    language: Option<String>,
) -> Result<()> {
    let document = load_document(file, url, title)?;
    if let Some(tag) = language {
        lens.panel().set_language(Language::from_tag(&tag))?;
    }

    lens.open_tab(document).await;
    match lens.panel().analyze_active_tab().await {
        PanelOutcome::Rendered(_) | PanelOutcome::UpgradeRequired => Ok(()),
        PanelOutcome::InsufficientContent => bail!("not enough article text in {:?}", file),
        PanelOutcome::Failed(failure) => Err(anyhow::Error::new(failure).context("analysis failed")),
        PanelOutcome::Discarded => bail!("analysis was superseded"),
    }
}

/// Read a page: `.json` files are rendered snapshots, anything else is the
/// article text itself.
pub fn load_document(
    file: &Path,
    url: Option<String>,
    title: Option<String>,
) -> Result<RenderedDocument> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read article file: {:?}", file))?;

    if file.extension().is_some_and(|ext| ext == "json") {
        return serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse page snapshot: {:?}", file));
    }

    let url = url.unwrap_or_else(|| {
        let absolute = std::fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());
        format!("file://{}", absolute.display())
    });
    let title = title.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    Ok(RenderedDocument::from_text(url, title, content.clone()).with_region("article", content))
}

#[derive(Serialize)]
struct UsageReport {
    #[serde(flatten)]
    record: UsageRecord,
    limit: u32,
    display: UsageDisplay,
}

async fn usage<E: EntitlementProvider>(lens: &ImpactLens<E>, reset: bool, json: bool) -> Result<()> {
    if reset {
        lens.tracker().reset()?;
    }
    let record = lens.usage()?;

    if json {
        let display = lens.panel().usage_display().await?;
        let report = UsageReport {
            record,
            limit: FREE_MONTHLY_LIMIT,
            display,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let display = lens.panel().refresh_usage().await?;
    let strings = lens.panel().language().strings();
    println!(
        "{}: {} analyses, {} words",
        record.period_key, record.month_count, record.total_words
    );
    if display.is_exhausted() {
        println!("{} → impact-lens upgrade", strings.upgrade);
    }
    Ok(())
}

fn last<E: EntitlementProvider>(lens: &ImpactLens<E>) -> Result<()> {
    if lens.panel().show_cached_analysis()?.is_none() {
        println!("{}", lens.panel().language().strings().no_content);
    }
    Ok(())
}

fn language<E: EntitlementProvider>(lens: &ImpactLens<E>, tag: Option<String>) -> Result<()> {
    if let Some(tag) = tag {
        lens.panel().set_language(Language::from_tag(&tag))?;
    }
    println!("{}", lens.panel().language());
    Ok(())
}

fn upgrade<E: EntitlementProvider>(lens: &ImpactLens<E>, manage: bool) -> Result<()> {
    let strings = lens.panel().language().strings();
    let url = if manage {
        lens.panel().open_manage()?
    } else {
        lens.panel().open_upgrade()?
    };
    let label = if manage {
        strings.manage
    } else {
        strings.upgrade_to_premium
    };
    println!("{}: {}", label, url);
    Ok(())
}

/// Query `GET /health` without starting any context
pub async fn health(settings: &Settings) -> Result<()> {
    let transport = HttpTransport::new(settings.api_base_url.clone());
    let health = transport
        .health()
        .await
        .with_context(|| format!("Service at {} is not reachable", transport.base_url()))?;
    println!(
        "{}: {}{}",
        transport.base_url(),
        health.status,
        health
            .timestamp
            .map(|t| format!(" ({})", t))
            .unwrap_or_default()
    );
    Ok(())
}
