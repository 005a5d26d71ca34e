#![forbid(unsafe_code)]

//! `pwndbg-mcp`: MCP server binary driving a pwndbg/GDB session.
//!
//! Loads configuration, serves MCP over stdio, and tears down any active
//! debugger session before exiting.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use pwndbg_mcp::config::GlobalConfig;
use pwndbg_mcp::mcp::handler::AppState;
use pwndbg_mcp::mcp::transport;
use pwndbg_mcp::{AppError, Result, SessionError};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Transport {
    Stdio,
}

#[derive(Debug, Parser)]
#[command(name = "pwndbg-mcp", about = "pwndbg MCP server", version, long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json). Logs go to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// MCP transport (only stdio is supported).
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("pwndbg-mcp server bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let config = match args.config {
        Some(ref path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };
    info!(debugger = %config.debugger, prompt = %config.prompt, "configuration loaded");

    let state = Arc::new(AppState::new(config));

    // ── Start transport ─────────────────────────────────
    let ct = CancellationToken::new();
    let Transport::Stdio = args.transport;
    let stdio_ct = ct.clone();
    let stdio_state = Arc::clone(&state);
    let mut stdio_handle = tokio::spawn(async move {
        if let Err(err) = transport::serve_stdio(stdio_state, stdio_ct).await {
            error!(%err, "stdio transport failed");
        }
    });

    info!("MCP server ready");

    // ── Wait for client disconnect or shutdown signal ───
    tokio::select! {
        _ = &mut stdio_handle => {
            info!("stdio client disconnected");
        }
        () = shutdown_signal() => {
            info!("shutdown signal received");
            ct.cancel();
            let _ = stdio_handle.await;
        }
    }

    // ── Never leave the debugger orphaned ───────────────
    teardown_session(&state).await;
    info!("pwndbg-mcp shut down");

    Ok(())
}

/// Stop the debugger session if one is active.
async fn teardown_session(state: &AppState) {
    let mut session = state.session.lock().await;
    match session.stop().await {
        Ok(()) => info!("active debugger session terminated"),
        Err(SessionError::NotActive) => {}
        Err(err) => error!(%err, "failed to stop debugger session"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the MCP protocol; logs must stay on stderr.
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
