use std::sync::Arc;

use service::connect::{ConnectorHistoryRepository, ConnectorService};
use service::file::{FileRepository, FileService};

/// Shared state of the document store app.
#[derive(Clone)]
pub struct ServerState {
    pub files: Arc<FileService<dyn FileRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn FileRepository>) -> Self {
        Self { files: Arc::new(FileService::new(repo)) }
    }
}

/// Shared state of the connector config editor.
#[derive(Clone)]
pub struct ConnectState {
    pub connectors: Arc<ConnectorService<dyn ConnectorHistoryRepository>>,
}

impl ConnectState {
    pub fn new(connectors: ConnectorService<dyn ConnectorHistoryRepository>) -> Self {
        Self { connectors: Arc::new(connectors) }
    }
}
