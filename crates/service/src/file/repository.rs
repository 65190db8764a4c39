use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::errors::ModelError;
use crate::errors::ServiceError;

pub use models::file::Model as Document;

/// Storage accessor for documents, one row per name.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// All names, order unspecified.
    async fn list(&self) -> Result<Vec<String>, ServiceError>;
    async fn get(&self, name: &str) -> Result<Option<Document>, ServiceError>;
    /// Insert or replace by name; the count is informational.
    async fn upsert(&self, doc: &Document) -> Result<u64, ServiceError>;
}

fn storage_err(e: ModelError) -> ServiceError {
    match e {
        ModelError::Db(msg) => ServiceError::Db(msg),
        other => ServiceError::Model(other),
    }
}

/// SeaORM-backed repository (SQLite or Postgres).
pub struct SeaOrmFileRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmFileRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl FileRepository for SeaOrmFileRepository {
    async fn list(&self) -> Result<Vec<String>, ServiceError> {
        models::file::list_names(&self.db).await.map_err(storage_err)
    }

    async fn get(&self, name: &str) -> Result<Option<Document>, ServiceError> {
        models::file::find(&self.db, name).await.map_err(storage_err)
    }

    async fn upsert(&self, doc: &Document) -> Result<u64, ServiceError> {
        models::file::upsert(&self.db, &doc.name, &doc.content).await.map_err(storage_err)
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockFileRepository {
        docs: Mutex<HashMap<String, String>>,
        failing: AtomicBool,
        upserts: AtomicUsize,
    }

    impl MockFileRepository {
        /// Make every later call fail as if the backend were unreachable.
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Number of upserts that reached the repository.
        pub fn upsert_calls(&self) -> usize {
            self.upserts.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<(), ServiceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("connection refused".into()));
            }
            Ok(())
        }

        fn docs(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, ServiceError> {
            self.docs.lock().map_err(|_| ServiceError::Db("mock store poisoned".into()))
        }
    }

    #[async_trait]
    impl FileRepository for MockFileRepository {
        async fn list(&self) -> Result<Vec<String>, ServiceError> {
            self.check()?;
            Ok(self.docs()?.keys().cloned().collect())
        }

        async fn get(&self, name: &str) -> Result<Option<Document>, ServiceError> {
            self.check()?;
            Ok(self.docs()?.get(name).map(|content| Document { name: name.to_string(), content: content.clone() }))
        }

        async fn upsert(&self, doc: &Document) -> Result<u64, ServiceError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.docs()?.insert(doc.name.clone(), doc.content.clone());
            Ok(1)
        }
    }
}
