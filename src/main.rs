use mimalloc::MiMalloc;
use receipt_desk::config::Config;
use receipt_desk::db::{self, ReceiptStorage};
use receipt_desk::router::{ReceiptState, receipt_router};
use receipt_desk::service::org_profile::OrgProfileStore;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.storage.database_url,
        org_profile = %cfg.storage.org_profile_path.display(),
        loglevel = %cfg.basic.loglevel,
    );

    let pool = db::connect(&cfg.storage.database_url).await?;
    let storage = ReceiptStorage::new(pool);
    storage.init_schema().await?;

    let profile = OrgProfileStore::open(&cfg.storage.org_profile_path)?;
    if !profile.is_configured().await {
        warn!("no organization profile yet; visit /setup or enter organization details per receipt");
    }

    let state = ReceiptState::new(storage, profile);
    let app = receipt_router(state);

    let listener = TcpListener::bind(cfg.basic.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
