use std::sync::Arc;

use clap::Parser;
use mcp_foundation_models::{
    ChatCompletionsBackend, FoundationModelsService, Result, ServerConfig, ServerError,
};
use rmcp::ServiceExt;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "mcp-foundation-models")]
#[command(version)]
#[command(about = "MCP server that provides text generation over stdio")]
#[command(long_about = "This server implements the Model Context Protocol (MCP) to provide \
text generation through an OpenAI-compatible model endpoint.

Environment variables:
- SYSTEM_INSTRUCTIONS: set default system instructions
- DEBUG: enable debug logging (any value, presence suffices)
- MODEL_ENDPOINT / MODEL_NAME / MODEL_API_KEY: backend settings")]
struct Cli {
    /// Alternate system instructions. Overrides the SYSTEM_INSTRUCTIONS
    /// environment variable.
    #[arg(long)]
    system_instructions: Option<String>,

    /// Enable debug logging. Can also be enabled with the DEBUG environment
    /// variable.
    #[arg(long)]
    debug: bool,

    /// Base URL of the OpenAI-compatible endpoint (e.g. http://localhost:8080/v1).
    /// Overrides the MODEL_ENDPOINT environment variable.
    #[arg(long)]
    endpoint: Option<String>,

    /// Model name passed to the backend. Overrides the MODEL_NAME
    /// environment variable.
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::new(cli.system_instructions, cli.debug, cli.endpoint, cli.model);

    init_logging(&config);
    log_startup_info(&config);

    let backend = ChatCompletionsBackend::new(&config);
    let service = FoundationModelsService::new(config, Arc::new(backend));
    run_server(service).await
}

/// Logs go to stderr only; stdout is reserved for the MCP stdio transport.
fn init_logging(config: &ServerConfig) {
    let level = if config.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if config.debug {
        tracing::debug!("Debug logging enabled");
    }
}

fn log_startup_info(config: &ServerConfig) {
    tracing::info!("Starting {} v{}", config.server_name, config.server_version);
    tracing::debug!("Configuration:");
    tracing::debug!("  System instructions: {}", config.system_instructions);
    tracing::debug!("  Debug enabled: {}", config.debug);
    tracing::debug!("  Endpoint: {}", config.endpoint);
    tracing::debug!("  Model: {}", config.model);
}

async fn run_server(service: FoundationModelsService) -> Result<()> {
    // Cancelled on SIGTERM/SIGINT; the rmcp session shuts down when its
    // token fires or the client closes the transport.
    let ct = CancellationToken::new();
    let signal_ct = ct.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, stopping server");
        signal_ct.cancel();
    });

    let running = service
        .serve_with_ct((tokio::io::stdin(), tokio::io::stdout()), ct)
        .await
        .map_err(|e| ServerError::ServerSetupFailed(e.to_string()))
        .inspect_err(|e| tracing::error!("Failed to start server: {e}"))?;

    tracing::info!("Server running and ready to accept connections");
    let quit_reason = running.waiting().await?;
    tracing::info!(?quit_reason, "Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
