#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

use hoods_goods::{AppConfig, AppError, Result, app};
use tokio::{net::TcpListener, signal};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        tracing::error!("HoodsGoods API exited: {}", e);
        std::process::exit(1);
    }

    tracing::info!("HoodsGoods API stopped");
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;
    let router = app::build(&config).await?;

    let addr = config.server_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::ConfigError(format!("cannot bind {}: {}", addr, e)))?;

    tracing::info!(
        "HoodsGoods API listening on {} (store guard: {}, pickup points: {})",
        addr,
        config.marketplace.require_active_store,
        config.marketplace.pickup_points.join(", ")
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::InternalError(format!("server error: {}", e)))
}

/// Resolves on Ctrl-C or SIGTERM. A handler that fails to install never fires.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => tracing::info!("Ctrl-C received, draining connections"),
        _ = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}
