//! Kafka Connect connector config editor: REST client, local history of
//! submitted configs, and the service tying them together.

pub mod client;
pub mod repository;
pub mod service;

pub use client::{KafkaConnectClient, UpstreamReply};
pub use repository::{ConnectorHistoryRepository, ConnectorRecord, SeaOrmConnectorHistoryRepository};
pub use service::ConnectorService;
