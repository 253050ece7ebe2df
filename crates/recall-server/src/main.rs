//! recall-server - REST API server binary.

use std::net::SocketAddr;

use recall_core::{RecallConfig, RecallEngine};
use recall_server::{create_server, AppState};
use tokio::signal;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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
}

/// Load configuration from `RECALL_CONFIG` if set, then overlay the environment.
fn load_config() -> Result<RecallConfig, Box<dyn std::error::Error>> {
    let mut config = match std::env::var("RECALL_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading configuration file");
            RecallConfig::from_file(path)?
        }
        Err(_) => RecallConfig::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("recall_server=debug".parse()?),
        )
        .init();

    // Get configuration from environment
    let host = std::env::var("RECALL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("RECALL_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .map_err(|_| "RECALL_PORT must be a valid port number")?;

    let config = load_config()?;
    info!(
        db_path = %config.db_path.display(),
        strength_policy = %config.strength.policy,
        stress_threshold = config.fti.stress_threshold,
        "Configuration loaded"
    );

    let engine = RecallEngine::with_sqlite(config)?;
    let app = create_server(AppState::new(engine));

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting recall-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
