//! Waitlist Backend
//! Mission: Collect waitlist signups and let admins manage them

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waitlist_backend::{
    api::{build_router, AppState},
    auth::JwtHandler,
    config::{load_env, Config},
    notifier::{LogNotifier, Notifier, PostmarkNotifier},
    waitlist::{WaitlistService, WaitlistStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    info!("🚀 Waitlist backend starting");

    let config = Config::from_env().context("Invalid configuration")?;
    info!("⚙️  {:?}", config);

    // Keys and database are required; any failure here ends the process
    let jwt_handler = Arc::new(
        JwtHandler::from_pem(&config.private_key_pem, &config.public_key_pem)
            .context("Failed to load signing keys")?,
    );
    info!("🔐 Signing keys loaded");

    let store = Arc::new(WaitlistStore::new(&config.db_path)?);
    let existing = store
        .count_waitlist()
        .await
        .context("Database is not readable")?;
    info!("💾 Existing waitlist entries: {}", existing);

    let notifier: Arc<dyn Notifier> = if config.postmark_key.is_empty() {
        warn!("⚠️  POSTMARK_KEY not configured - signup emails will only be logged");
        Arc::new(LogNotifier)
    } else {
        Arc::new(PostmarkNotifier::new(
            &config.postmark_key,
            &config.platform_email,
            &config.postmark_api_url,
            config.op_timeout,
        )?)
    };

    let service = Arc::new(WaitlistService::new(
        store,
        notifier,
        jwt_handler.clone(),
        config.op_timeout,
    ));
    let app = build_router(AppState::new(service, jwt_handler));

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("👋 Waitlist backend stopped");
    Ok(())
}

/// Initialize tracing with env-configurable filtering
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waitlist_backend=debug,waitlist=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
