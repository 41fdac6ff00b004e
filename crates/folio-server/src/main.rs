//! `folio` command-line entry point

use anyhow::Context;
use clap::Parser;
use folio_core::RemoteConfig;
use folio_logging::FolioSubscriberBuilder;
use folio_server::{AppState, Cli, Command, ServerConfig, build_router, state::open_store};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.server_config()?;

    let _guard = FolioSubscriberBuilder::new()
        .with_config(config.logging.clone())
        .init()
        .context("failed to initialize logging")?;

    match cli.command() {
        Command::Serve { .. } => serve(config).await,
        Command::Show => show(&config).await,
        Command::Reset { yes } => reset(&config, yes).await,
        Command::CheckRemote { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let remote = RemoteConfig::parse(&text)?;
            println!("ok: {}", remote.endpoint());
            Ok(())
        }
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::open(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %config.bind, "Folio API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Folio API stopped");
    Ok(())
}

async fn show(config: &ServerConfig) -> anyhow::Result<()> {
    let store = open_store(config, false).await?;
    let content = store.snapshot().await;
    println!("{}", serde_json::to_string_pretty(&*content)?);
    Ok(())
}

async fn reset(config: &ServerConfig, yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("reset replaces all content with defaults and cannot be undone; pass --yes");
    }

    let store = open_store(config, true).await?;
    store.ready().await;
    let outcome = store.reset().await;
    for warning in &outcome.warnings {
        warn!(%warning, "Reset side effect failed");
        eprintln!("warning: {warning}");
    }
    println!("content reset to defaults");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
