use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinecat_service::CatalogConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinecat_service=debug,cinecat_db=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = CatalogConfig::from_env()?;
    tracing::info!(
        max_connections = config.max_connections,
        default_page_size = config.default_page_size,
        run_migrations = config.run_migrations,
        "Loaded catalog configuration"
    );

    // --- Database ---
    let pool = cinecat_db::create_pool(&config.database_url, config.max_connections).await?;
    tracing::info!("Database connection pool created");

    cinecat_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    if config.run_migrations {
        cinecat_db::run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    } else {
        tracing::info!("Skipping migrations (RUN_MIGRATIONS=false)");
    }

    pool.close().await;
    tracing::info!("Catalog bootstrap complete");
    Ok(())
}
