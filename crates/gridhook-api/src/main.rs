//! Gridhook webhook server entry point.
//!
//! Binary name: `gridhook`
//!
//! Parses CLI arguments, loads settings, wires the Graph client and
//! services, kicks off the startup subscription check, and serves the
//! webhook endpoint until Ctrl+C or SIGTERM.

mod http;
mod state;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use gridhook_infra::settings::load_settings;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "gridhook", version, about = "Directory change notification webhook server")]
struct Cli {
    /// Path to the TOML settings file
    #[arg(short, long, default_value = "gridhook.toml")]
    config: PathBuf,

    /// Bind address (overrides the settings file)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides the settings file)
    #[arg(long)]
    port: Option<u16>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Emit OpenTelemetry spans to stdout
    #[arg(long)]
    otel: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,gridhook=debug",
        _ => "trace",
    };
    gridhook_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Settings are mandatory: a server without credentials cannot manage
    // its subscription or resolve users, so a missing file is fatal.
    let mut settings = load_settings(&cli.config)
        .await
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }

    let state = AppState::init(settings);

    // Make sure exactly one change subscription exists. The check runs in
    // the background: a Graph outage at boot must not keep the webhook
    // from answering validation handshakes.
    let lifecycle = state.lifecycle.clone();
    tokio::spawn(async move {
        if let Err(e) = lifecycle.ensure_subscription().await {
            tracing::error!(error = %e, "startup subscription check failed");
        }
    });

    let addr = format!("{}:{}", state.settings.host, state.settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    println!(
        "  {} Gridhook listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    gridhook_observe::tracing_setup::shutdown_tracing();

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
