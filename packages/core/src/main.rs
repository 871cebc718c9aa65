use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::RwLock;

use admin_gateway::api::{self, logs::LogsApiState};
use admin_gateway::cli::Cli;
use admin_gateway::config::Config;
use admin_gateway::db::create_pool;
use admin_gateway::error::AppError;
use admin_gateway::logging::init_logging;
use admin_gateway::logs::{LogDirectory, LogSource};
use admin_gateway::metrics::AppMetrics;
use admin_gateway::repository::NotificationRepository;
use admin_gateway::scheduler::{refresh_once, run_log_refresh};
use admin_gateway::store::LogStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging("info");

    if let Err(err) = run(cli).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env()
        .map_err(AppError::Config)?
        .with_cli_overrides(&cli);
    tracing::info!("Service starting with config: {:?}", config);

    let metrics = Arc::new(
        AppMetrics::new().map_err(|err| AppError::Internal(err.to_string()))?,
    );

    let pool = create_pool(&config.database_url).await?;
    let repository = Arc::new(NotificationRepository::new(pool));

    let source: Arc<dyn LogSource + Send + Sync> = Arc::new(
        LogDirectory::new(&config.log_dir).with_tail_lines(config.tail_lines),
    );
    let store = Arc::new(RwLock::new(LogStore::new(config.store_capacity)));

    // Warm the store so the first request does not see an empty snapshot.
    refresh_once(&source, &store, Some(metrics.as_ref())).await;

    let logs_state = Arc::new(LogsApiState {
        store: store.clone(),
        source: Some(source.clone()),
        metrics: Some(metrics.clone()),
    });
    let app = api::build_router(logs_state, repository, metrics.clone());

    let refresh = tokio::spawn(run_log_refresh(
        source,
        store,
        Some(metrics),
        config.refresh_interval_seconds,
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::Config(format!("Failed to bind {}: {}", addr, err)))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .map_err(|err| AppError::Internal(err.to_string()))?;

    let _ = refresh.await;
    tracing::info!("Service stopped");
    Ok(())
}
