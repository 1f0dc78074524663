//! shopgen CLI and REST API entry point.
//!
//! Binary name: `shopgen`
//!
//! Parses CLI arguments, loads configuration, wires services, then runs the
//! requested command or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use console::style;

use cli::{Cli, Commands};
use shopgen_infra::config::load_config;
use shopgen_observe::tracing_setup::{init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_directive(), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.config).await;

    match cli.command {
        Commands::Serve { port, host } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState::init(config)?;

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "API server listening");

            if !cli.quiet {
                println!(
                    "  {} shopgen API listening on {}",
                    style("⚡").bold(),
                    style(format!("http://{addr}")).cyan()
                );
                println!("  {}", style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Generate {
            skill,
            message,
            shop_context,
            model,
            images,
        } => {
            let state = AppState::init(config)?;
            let request = cli::generate::build_request(skill, message, shop_context, model, images);
            cli::generate::generate(&state, request, cli.json).await?;
        }

        Commands::Check {
            content,
            platform,
            content_type,
            feature,
            replace,
            no_quality,
        } => {
            let state = AppState::init(config)?;
            let request = cli::check::build_request(
                content,
                platform.as_deref(),
                content_type.as_deref(),
                feature,
                replace,
                no_quality,
            )?;
            cli::check::check(&state, &request, cli.json)?;
        }

        Commands::Skills => {
            let state = AppState::init(config)?;
            cli::skill::list_skills(&state, cli.json)?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
