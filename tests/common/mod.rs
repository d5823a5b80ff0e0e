use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

use vaxsched::AppData;

/// Create an in-memory database with the full schema and wired stores
pub async fn setup_app() -> Arc<AppData> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    Arc::new(AppData::init(db))
}

pub fn date(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date must be valid")
}
