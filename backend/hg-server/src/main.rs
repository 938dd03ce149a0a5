use hg_server::mailer::Mailer;
use hg_server::services::maintenance;
use hg_server::{AppState, build_router, logger};

use std::error::Error;

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = hg_config::Config::load()?;
    config.validate()?;

    // Initialize logger (before any other logging)
    logger::initialize(&config.logging)?;

    info!("Starting hg-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Initialize database pool
    let database_path = config.database_path()?;
    info!("Connecting to database: {}", database_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(database_path)
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(std::time::Duration::from_secs(5)),
        )
        .await?;

    info!("Database connection established");

    info!("Running database migrations...");
    sqlx::migrate!("../crates/hg-db/migrations")
        .run(&pool)
        .await?;
    info!("Migrations complete");

    let bind_addr = config.bind_addr();

    // Background email worker
    let mailer = Mailer::spawn();

    // Build application state and start maintenance sweeps
    let state = AppState::new(pool, config, mailer);
    maintenance::spawn(&state);

    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received SIGINT (Ctrl+C), shutting down");
            }
        })
        .await?;

    Ok(())
}
