//! Migrator creating the document table and the connector history table.
//! Every migration uses `IF NOT EXISTS`, so running it against a database
//! created by an older deployment is a no-op.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_files;
mod m20240101_000002_create_connectors;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_files::Migration),
            Box::new(m20240101_000002_create_connectors::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

    async fn memory_db() -> Result<DatabaseConnection, DbErr> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        Database::connect(opt).await
    }

    #[tokio::test]
    async fn up_is_idempotent_on_sqlite() -> Result<(), DbErr> {
        let db = memory_db().await?;
        Migrator::up(&db, None).await?;
        Migrator::up(&db, None).await?;

        let manager = SchemaManager::new(&db);
        assert!(manager.has_table("files").await?);
        assert!(manager.has_table("connectors").await?);

        db.execute_unprepared("INSERT INTO files (name, content) VALUES ('a', '1')").await?;
        Ok(())
    }

    #[tokio::test]
    async fn down_drops_tables() -> Result<(), DbErr> {
        let db = memory_db().await?;
        Migrator::up(&db, None).await?;
        Migrator::down(&db, None).await?;

        let manager = SchemaManager::new(&db);
        assert!(!manager.has_table("files").await?);
        assert!(!manager.has_table("connectors").await?);
        Ok(())
    }
}
