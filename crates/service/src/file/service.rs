use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use models::file;
use crate::errors::ServiceError;
use super::repository::{Document, FileRepository};

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub name: String,
    pub rows_affected: u64,
}

/// Document business service independent of web framework.
///
/// Writes are validated before they reach the repository; no step is retried.
pub struct FileService<R: FileRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: FileRepository + ?Sized> FileService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<String>, ServiceError> {
        let names = self.repo.list().await?;
        info!(count = names.len(), "files_listed");
        Ok(names)
    }

    /// Fetch one document by exact name.
    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> Result<Document, ServiceError> {
        self.repo
            .get(name)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("file '{name}' not found")))
    }

    /// Validate the document, then insert or replace it.
    ///
    /// # Examples
    /// ```
    /// use service::file::{Document, FileService, repository::mock::MockFileRepository};
    /// use std::sync::Arc;
    /// let svc = FileService::new(Arc::new(MockFileRepository::default()));
    /// let doc = Document { name: "settings".into(), content: r#"{"debug":true}"#.into() };
    /// let saved = tokio_test::block_on(svc.save(doc)).unwrap();
    /// assert_eq!(saved.name, "settings");
    /// let bad = Document { name: "settings".into(), content: "{not json".into() };
    /// assert!(tokio_test::block_on(svc.save(bad)).is_err());
    /// ```
    #[instrument(skip(self, doc), fields(name = %doc.name))]
    pub async fn save(&self, doc: Document) -> Result<SaveOutcome, ServiceError> {
        if let Err(e) = file::validate_name(&doc.name).and_then(|_| file::validate_content(&doc.content)) {
            warn!(error = %e, "file_rejected");
            return Err(e.into());
        }

        let rows_affected = self.repo.upsert(&doc).await.map_err(|e| {
            error!(error = %e, "file_save_failed");
            e
        })?;

        info!(rows_affected, "file_saved");
        Ok(SaveOutcome { name: doc.name, rows_affected })
    }
}
