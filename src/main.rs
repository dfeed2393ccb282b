use liftlog::api::routes::create_routes;
use liftlog::config::{AppConfig, DatabaseConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let db = db_config.create_pool().await?;
    sqlx::migrate!().run(&db).await?;

    let app = create_routes(db, &config.jwt_secret);

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("liftlog server starting on http://{address}");
    info!("Health check available at http://{address}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
