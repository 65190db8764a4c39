use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::errors::ModelError;
use crate::errors::ServiceError;

pub use models::connector_config::Model as ConnectorRecord;

/// Append-only history of connector configs submitted through the editor.
#[async_trait]
pub trait ConnectorHistoryRepository: Send + Sync {
    async fn record(&self, name: &str, config: &str) -> Result<ConnectorRecord, ServiceError>;
    /// Newest first.
    async fn history(&self, name: &str) -> Result<Vec<ConnectorRecord>, ServiceError>;
}

fn storage_err(e: ModelError) -> ServiceError {
    match e {
        ModelError::Db(msg) => ServiceError::Db(msg),
        other => ServiceError::Model(other),
    }
}

pub struct SeaOrmConnectorHistoryRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmConnectorHistoryRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl ConnectorHistoryRepository for SeaOrmConnectorHistoryRepository {
    async fn record(&self, name: &str, config: &str) -> Result<ConnectorRecord, ServiceError> {
        models::connector_config::record(&self.db, name, config).await.map_err(storage_err)
    }

    async fn history(&self, name: &str) -> Result<Vec<ConnectorRecord>, ServiceError> {
        models::connector_config::history(&self.db, name).await.map_err(storage_err)
    }
}

/// In-memory history for tests
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockConnectorHistoryRepository {
        rows: Mutex<Vec<ConnectorRecord>>,
        failing: AtomicBool,
    }

    impl MockConnectorHistoryRepository {
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), ServiceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ConnectorHistoryRepository for MockConnectorHistoryRepository {
        async fn record(&self, name: &str, config: &str) -> Result<ConnectorRecord, ServiceError> {
            self.check()?;
            let mut rows = self.rows.lock().map_err(|_| ServiceError::Db("mock store poisoned".into()))?;
            let row = ConnectorRecord {
                id: rows.len() as i32 + 1,
                name: name.to_string(),
                config: config.to_string(),
                created_at: chrono::Utc::now().into(),
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn history(&self, name: &str) -> Result<Vec<ConnectorRecord>, ServiceError> {
            self.check()?;
            let rows = self.rows.lock().map_err(|_| ServiceError::Db("mock store poisoned".into()))?;
            Ok(rows.iter().rev().filter(|r| r.name == name).cloned().collect())
        }
    }
}
