//! Listinha backend server.
//!
//! Serves the shopping-list REST API and the WebSocket change feed over a
//! SQLite database. Access is fully collaborative: every connected client
//! reads and writes the same lists.
//!
//! # Configuration
//!
//! Environment variables:
//! - `LISTINHA_PORT`: Port to listen on (default: 4000)
//! - `LISTINHA_DATABASE_PATH`: SQLite file (default: ~/.local/share/listinha/listinha.db)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `GET|POST /lists`, `PATCH|DELETE /lists/{id}`, `DELETE /lists/{id}/items`
//! - `GET|POST /items`, `PATCH|DELETE /items/{id}`
//! - `GET /feed/lists`, `GET /feed/items?list_id=…`: WebSocket change feeds

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use listinha::db::init_db;
use listinha::server::{app, AppState};

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    /// Port to listen on
    port: u16,
    /// SQLite database file
    database_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let port = std::env::var("LISTINHA_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(4000);

        let database_path = std::env::var("LISTINHA_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("listinha")
                    .join("listinha.db")
            });

        Self {
            port,
            database_path,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listinha=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Database: {}", config.database_path.display());

    let pool = match init_db(config.database_path.clone()).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(pool);
    let router = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
