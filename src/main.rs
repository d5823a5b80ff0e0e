use std::sync::Arc;

use clap::Parser;

use vaxsched::app_data::AppData;
use vaxsched::cli::{Cli, SchedulerCli};
use vaxsched::config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::logging::init_logging()?;

    let cli = Cli::parse();
    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite://scheduler.db?mode=rwc".to_string());

    let db = config::database::init_database(&database_url).await?;
    config::database::migrate_database(&db).await?;

    let app_data = Arc::new(AppData::init(db));

    SchedulerCli::new(app_data).run().await?;

    Ok(())
}
