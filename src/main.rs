//! Task Tracker API server
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `in_memory` (default) | `postgres`
//! - `DATABASE_URL`: `PostgreSQL` connection URL (required when `STORAGE_MODE=postgres`)
//! - `RUST_LOG`: Logging level (e.g., `debug`, `info`, `task_tracker=debug`)
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `8080`)
//! - `API_BASE_PATH`: Prefix for the task routes (default: `/api`)
//! - `ALLOWED_ORIGINS`, `FRONTEND_URL`, `ALLOWED_ORIGIN_PATTERNS`: CORS policy
//! - `WORKER_THREADS`: Number of tokio worker threads (default: logical CPU count)

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_tracker::api::{AppState, router};
use task_tracker::config::ServerConfig;
use task_tracker::infrastructure::{RepositoryConfig, RepositoryFactory};

/// Outcome of reading `WORKER_THREADS`.
#[derive(Debug, PartialEq, Eq)]
struct WorkerThreads {
    threads: Option<usize>,
    warning: Option<String>,
}

fn parse_worker_threads(value: Option<&str>, max_threads: usize) -> WorkerThreads {
    let default = |warning: Option<String>| WorkerThreads {
        threads: None,
        warning,
    };

    let Some(trimmed) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return default(None);
    };

    match trimmed.parse::<usize>() {
        Ok(0) => default(Some(
            "WORKER_THREADS=0 is invalid (must be > 0), using default".to_string(),
        )),
        Ok(threads) if threads > max_threads => WorkerThreads {
            threads: Some(max_threads),
            warning: Some(format!(
                "WORKER_THREADS={threads} exceeds recommended limit ({max_threads}), capping to {max_threads}"
            )),
        },
        Ok(threads) => WorkerThreads {
            threads: Some(threads),
            warning: None,
        },
        Err(error) => default(Some(format!(
            "WORKER_THREADS='{trimmed}' is not a valid number ({error}), using default"
        ))),
    }
}

fn main() {
    dotenvy::dotenv().ok();

    let max_threads = std::thread::available_parallelism()
        .map(|parallelism| parallelism.get().saturating_mul(4))
        .unwrap_or(64);
    let worker_threads = parse_worker_threads(
        std::env::var("WORKER_THREADS").ok().as_deref(),
        max_threads,
    );

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    // The subscriber is not installed yet, so startup notes go to stderr.
    if let Some(warning) = &worker_threads.warning {
        eprintln!("Warning: {warning}");
    }
    if let Some(threads) = worker_threads.threads {
        builder.worker_threads(threads);
    }

    let runtime = match builder.build() {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("Failed to create tokio runtime: {error}");
            std::process::exit(1);
        }
    };
    runtime.block_on(async_main());
}

async fn async_main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_tracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Task Tracker API");

    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    let repository_config = match RepositoryConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    tracing::info!(
        storage_mode = ?repository_config.storage_mode,
        base_path = %server_config.base_path,
        allowed_origins = ?server_config.cors.allowed_origins,
        allowed_origin_patterns = ?server_config.cors.pattern_sources(),
        "Configuration loaded"
    );

    let repository = match RepositoryFactory::new(repository_config).create().await {
        Ok(repository) => {
            tracing::info!("Repository initialized successfully");
            repository
        }
        Err(error) => {
            tracing::error!("Failed to initialize repository: {}", error);
            std::process::exit(1);
        }
    };

    let application = router(AppState::from_repository(repository), &server_config);

    let address = match server_config.socket_address() {
        Ok(address) => address,
        Err(error) => {
            tracing::error!(%error, "Invalid server address");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, "Failed to bind to address {}", address);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on {}", address),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    if let Err(error) = axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

/// Completes when SIGINT (Ctrl+C) or, on Unix, SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
