use chrono::Utc;
use tracing::info;

mod api;
mod chat;
mod config;
mod directory;
mod entity;
mod error;
mod fixtures;
mod login;
mod ride;
mod session;
mod views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let dotenv = dotenvy::dotenv();

    // Initialize logging with default filter if RUST_LOG is not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Err(e) = dotenv {
        // Not fatal, the defaults cover local use
        info!("No .env file found or failed to load: {}", e);
    }

    info!("CampusPool starting...");

    let config = config::Config::from_env();
    info!(?config, "Loaded configuration");

    let session = if config.seed_fixtures {
        session::Session::seeded(config.email_suffix.clone(), fixtures::seed(Utc::now()))
    } else {
        session::Session::new(config.email_suffix.clone())
    };
    info!(
        rides = session.rides().len(),
        conversations = session.directory().len(),
        empty = session.rides().is_empty() && session.directory().is_empty(),
        "Session ready"
    );

    let app = api::router(api::AppState::new(session));

    info!("Starting API server on {}", config.http_addr);
    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        res = axum::serve(listener, app) => {
            res?;
        }
    }

    Ok(())
}
