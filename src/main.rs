use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledvision_api::config::Config;
use ledvision_api::db::Database;
use ledvision_api::dispatch::NotificationDispatcher;
use ledvision_api::handlers::AppState;
use ledvision_api::notifier::TelegramNotifier;
use ledvision_api::routes::build_router;
use ledvision_api::store::postgres::PostgresStore;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the database pool and schema, and the
/// optional Telegram notifier, then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledvision_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool and tables
    let db = Database::new(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Database connection pool established");

    // Lead notifications are optional; a broken setup only disables them
    let notifications = match config.telegram() {
        Some(telegram) => match TelegramNotifier::new(&telegram) {
            Ok(notifier) => {
                tracing::info!("✓ Telegram notifier initialized for chat {}", telegram.chat_id);
                NotificationDispatcher::new(Arc::new(notifier))
            }
            Err(e) => {
                tracing::error!("Failed to initialize Telegram notifier: {}", e);
                NotificationDispatcher::disabled()
            }
        },
        None => NotificationDispatcher::disabled(),
    };

    // Build application state
    let app_state = Arc::new(AppState {
        store: Arc::new(PostgresStore::new(db.pool.clone())),
        notifications,
    });

    let app = build_router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
