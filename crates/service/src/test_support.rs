#![cfg(test)]
use sea_orm::DatabaseConnection;
use configs::DatabaseConfig;

/// Fresh, migrated in-memory SQLite database; each call is isolated.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_and_migrate(&DatabaseConfig::in_memory()).await
}
