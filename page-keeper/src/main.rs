use std::sync::Arc;

use anyhow::Context;
use page_keeper::api::{ApiServer, AppState};
use page_keeper::config::AppConfig;
use page_keeper::credentials::{
    CredentialService, ServiceOptions, SweepScheduler, SystemClock, platforms::GraphAuthority,
};
use page_keeper::database::{self, SqlxRecordStore};
use page_keeper::logging;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    // Keep the guard alive until exit, or buffered file output is lost.
    let (logging_handle, _log_guard) =
        logging::init_logging(&config.log_dir).context("failed to initialize logging")?;

    let cancel_token = CancellationToken::new();
    logging_handle.start_retention_cleanup(cancel_token.child_token());

    // Initialize database
    let pool = database::init_pool(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    database::run_migrations(&pool).await?;

    let authority = GraphAuthority::from_config(&config.graph_base_url, config.authority_timeout)?;
    let service = Arc::new(CredentialService::new(
        Arc::new(SqlxRecordStore::new(pool)),
        Arc::new(authority),
        Arc::new(SystemClock),
        ServiceOptions {
            sync_concurrency: config.sync_concurrency,
        },
    ));

    let scheduler = config.sweep_interval.map(|interval| {
        SweepScheduler::new(service.sweeper(), interval).start(cancel_token.child_token())
    });

    {
        let cancel_token = cancel_token.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            tracing::info!("Shutdown signal received");
            cancel_token.cancel();
        });
    }

    let server = ApiServer::new(config.api.clone(), AppState::new(service))
        .with_cancel_token(cancel_token.clone());
    let result = server.run().await;

    cancel_token.cancel();
    if let Some(handle) = scheduler {
        let _ = handle.await;
    }

    result?;
    tracing::info!("page-keeper stopped");
    Ok(())
}
