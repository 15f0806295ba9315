//! Photoscope gateway binary: thin CLI shell over the [`photoscope_server`] library crate.

use clap::Parser;
use tracing::{error, info};
use url::Url;

use photoscope_server::build_router;
use photoscope_server::detect::{create_detector, DetectorKind};
use photoscope_server::types::*;

/// Local photo search and upload gateway with in-memory storage.
#[derive(Parser)]
#[command(name = "photoscope-gateway", version, about)]
struct Cli {
    /// Port to listen on (default: $PORT, else the first free port from 8480)
    #[arg(long)]
    port: Option<u16>,

    /// Bind to 0.0.0.0 instead of 127.0.0.1
    #[arg(long)]
    bind_all: bool,

    /// Base URL used in photo links (default: http://127.0.0.1:<port>)
    #[arg(long)]
    public_url: Option<Url>,

    /// Response envelope for /search
    #[arg(long, value_enum, default_value_t = EnvelopeStyle::Plain)]
    envelope: EnvelopeStyle,

    /// Maximum upload size in megabytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    max_upload_mb: usize,

    /// Label detector merged with custom labels
    #[arg(long, value_enum, default_value_t = DetectorKind::None)]
    detector: DetectorKind,
}

// ---------------------------------------------------------------------------
// Graceful shutdown signal
// ---------------------------------------------------------------------------

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl+C");
        info!("Received Ctrl+C, shutting down...");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("photoscope=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let bind_addr = if cli.bind_all { "0.0.0.0" } else { "127.0.0.1" };
    let explicit_port: Option<u16> =
        cli.port.or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()));

    let listener = if let Some(port) = explicit_port {
        tokio::net::TcpListener::bind(format!("{bind_addr}:{port}")).await.unwrap_or_else(|e| {
            error!(port = port, error = %e, "Could not bind to port");
            eprintln!("  Port {port} was set explicitly. Choose a different port.");
            std::process::exit(1);
        })
    } else {
        let mut found = None;
        for port in PORT_SCAN_BASE..PORT_SCAN_BASE + PORT_SCAN_RANGE {
            if let Ok(l) = tokio::net::TcpListener::bind(format!("{bind_addr}:{port}")).await {
                found = Some(l);
                break;
            }
        }
        found.unwrap_or_else(|| {
            error!(
                range_start = PORT_SCAN_BASE,
                range_end = PORT_SCAN_BASE + PORT_SCAN_RANGE - 1,
                "No free port found"
            );
            eprintln!("  Try: photoscope-gateway --port <port>");
            std::process::exit(1);
        })
    };

    let port = match listener.local_addr() {
        Ok(addr) => addr.port(),
        Err(e) => {
            error!(error = %e, "Listener has no local address");
            std::process::exit(1);
        }
    };

    let public_url = match cli.public_url {
        Some(url) => url,
        None => match Url::parse(&format!("http://127.0.0.1:{port}")) {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, "Could not build public URL");
                std::process::exit(1);
            }
        },
    };

    let detector = create_detector(cli.detector);
    let config = GatewayConfig {
        public_url,
        envelope: cli.envelope,
        max_upload_bytes: cli.max_upload_mb.saturating_mul(1024 * 1024),
    };
    info!(
        envelope = ?config.envelope,
        detector = detector.name(),
        max_upload_mb = cli.max_upload_mb,
        public_url = %config.public_url,
        "Gateway configured"
    );

    let app = build_router(GatewayContext::new(config, detector));

    info!(port = port, "http://localhost:{port}");
    // Machine-readable line for scripts (not through tracing)
    eprintln!("PHOTOSCOPE_PORT={port}");

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
