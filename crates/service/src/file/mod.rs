//! Named JSON documents: storage accessor (repository) and the
//! validate-then-upsert service on top of it.

pub mod repository;
pub mod service;

pub use repository::{Document, FileRepository, SeaOrmFileRepository};
pub use service::{FileService, SaveOutcome};
