use color_eyre::eyre::Result;
use dentalsync_api::config::ApiConfig;
use dentalsync_db::{create_pool, schema::initialize_database};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url, config.max_connections).await?;

    // Schema creation is idempotent, seeding is left to db-migrate
    initialize_database(&db_pool).await?;

    dentalsync_api::start_server(config, db_pool).await?;

    Ok(())
}
