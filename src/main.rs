mod cli;
mod commands;
mod view;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use impact_lens_core::config::Settings;
use impact_lens_core::runtime::ImpactLensBuilder;
use impact_lens_core::storage::{JsonFileStore, Storage};

use cli::{Command, Config};
use view::TerminalView;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.apply_env();
    settings.validate();

    if let Some(Command::Health) = cli.command {
        return commands::health(&settings).await;
    }

    let storage = if cli.ephemeral {
        Storage::in_memory()
    } else {
        let path = settings.storage_file();
        let store = JsonFileStore::open(&path)
            .with_context(|| format!("Failed to open storage at {:?}", path))?;
        Storage::new(Arc::new(store))
    };

    let lens = ImpactLensBuilder::new(settings)
        .with_storage(storage)
        .with_view(Arc::new(TerminalView::new()))
        .build();
    lens.panel().load_language()?;

    let result = commands::run(&lens, cli.command).await;
    lens.shutdown();
    result
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("impact_lens=debug,impact_lens_core=debug")
    } else {
        EnvFilter::new("impact_lens=info,impact_lens_core=info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
