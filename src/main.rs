//! News Classifier - Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use news_classifier::{
    CategoryTable, ModelLoader, NewsClassifier,
    api::{self, AppState},
    config::ServiceConfig,
    metrics,
};
use std::future::IntoFuture;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "news-classifier")]
#[command(about = "fastText news classification service", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/classifier.toml")]
    config: PathBuf,

    /// Override server port
    #[arg(long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (json or pretty)
    #[arg(long, default_value = "json")]
    log_format: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    match cli.log_format.as_str() {
        "pretty" => {
            tracing_subscriber::fmt()
                .with_env_filter(&cli.log_level)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(&cli.log_level)
                .json()
                .init();
        }
    }

    tracing::info!("Starting News Classifier Service");

    // Load configuration
    let mut config = ServiceConfig::load(&cli.config)?;

    // CLI overrides
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    config.validate()?;

    let table = CategoryTable::from_config(&config.categories)
        .context("Invalid category configuration")?;

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        workers = config.server.workers,
        repo_id = %config.model.repo_id,
        filename = %config.model.filename,
        native_labels = table.mapping_len(),
        categories = table.names_len(),
        default_category = table.default_category().id,
        "Configuration loaded"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers)
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(run(config, table))
}

async fn run(config: ServiceConfig, table: CategoryTable) -> Result<()> {
    // Setup metrics
    let prometheus_handle = metrics::setup_metrics()?;
    metrics::set_model_ready(false);

    let classifier = Arc::new(NewsClassifier::new(table, config.model.clone()));

    // Setup API
    let app_state = AppState::new(
        classifier.clone(),
        prometheus_handle,
        config.server.max_batch_items,
    );
    let app = api::create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", addr))?;

    tracing::info!(addr = %addr, "Starting API server");

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    tokio::pin!(server);

    // Serve /health while the model loads; a load failure stops the process
    let loader = ModelLoader::new();
    tokio::select! {
        result = &mut server => {
            result.context("API server error")?;
            tracing::info!("Server stopped before the model finished loading");
            return Ok(());
        }
        result = loader.load(&classifier) => {
            let path = result.context("Failed to initialize classifier")?;
            tracing::info!(path = ?path, "Classifier initialized successfully");
        }
    }

    server.await.context("API server error")?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
