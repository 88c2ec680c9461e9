//! Tally API Server
//!
//! Main entry point for the Tally backend service.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, create_router};
use tally_db::migration::{Migrator, MigratorTrait};
use tally_db::{SessionRepository, connect};
use tally_shared::config::LoggingConfig;
use tally_shared::{AppConfig, JwtConfig, JwtService, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    if config.database.auto_migrate {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    spawn_session_cleanup(db.clone(), config.server.session_cleanup_interval());

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
    };

    let app = create_router(state);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

/// Periodically deletes refresh sessions that have expired.
fn spawn_session_cleanup(db: DatabaseConnection, every: Duration) {
    tokio::spawn(async move {
        let sessions = SessionRepository::new(db);
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match sessions.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "expired sessions removed"),
                Err(e) => warn!(error = %e, "session cleanup failed"),
            }
        }
    });
}
