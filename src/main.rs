// src/main.rs
use axum::serve;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rh_portal::config::Config;
use rh_portal::routes::create_app;
use rh_portal::services::users::{PgUserDirectory, UnconfiguredDirectory, UserDirectory};
use rh_portal::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rh_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Connections are opened on first use, so a database outage shows up at
    // the login form instead of preventing startup.
    let users: Arc<dyn UserDirectory> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(5).connect_lazy(url)?;
            Arc::new(PgUserDirectory::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; user sign-in and client screens are disabled");
            Arc::new(UnconfiguredDirectory)
        }
    };
    if config.admin_credentials().is_err() {
        tracing::warn!("ADMIN_EMAIL or ADMIN_PASSWORD_HASH is not set; admin sign-in is disabled");
    }

    let addr: SocketAddr = config.server_addr().parse()?;
    let app = create_app(Arc::new(AppState::new(config, users)?));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server running on {}", addr);
    serve(listener, app.into_make_service()).await?;
    Ok(())
}
