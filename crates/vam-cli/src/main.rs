//! vam - Voice Assistant Manager from the terminal
//!
//! Connects to Home Assistant, loads the voice_assistant_manager state and
//! runs one panel command against it.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vam_client::WsBackend;
use vam_config::PanelConfig;
use vam_panel::{Panel, PanelOptions};

use cli::{print_notices, run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    let url = config.websocket_url();
    let backend = WsBackend::connect(&url, &config.token, config.connect_timeout())
        .await
        .with_context(|| format!("connecting to {url}"))?;

    let options = PanelOptions {
        language: config.language.clone(),
        page_size: config.page_size()?,
        search_debounce: config.search_debounce(),
    };
    let mut panel = Panel::new(backend, options);
    let mut notices = panel.subscribe();

    panel.load().await?;
    if let Some(platform) = cli.platform {
        panel.set_platform(platform);
    }

    let result = run(&mut panel, cli.command).await;
    print_notices(&mut notices);
    panel.backend().close().await;
    result
}

/// Read the config file if present, then apply `--url` / `--token`
fn load_config(cli: &Cli) -> Result<PanelConfig> {
    let config = if cli.config.exists() {
        PanelConfig::read_path(&cli.config)
            .with_context(|| format!("loading {}", cli.config.display()))?
    } else {
        debug!(path = %cli.config.display(), "No config file, using defaults");
        PanelConfig::default()
    };

    let config = config.with_overrides(cli.url.clone(), cli.token.clone());
    config.validate()?;
    info!(url = %config.url, language = %config.language, "Configuration loaded");
    Ok(config)
}
