use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::errors::ServiceError;
use super::client::{KafkaConnectClient, UpstreamReply};
use super::repository::{ConnectorHistoryRepository, ConnectorRecord};

/// Loads connector configs from Kafka Connect and applies edits, keeping a
/// local copy of every submitted config.
pub struct ConnectorService<R: ConnectorHistoryRepository + ?Sized> {
    repo: Arc<R>,
    client: KafkaConnectClient,
}

fn require_name(name: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("connector name required".into()));
    }
    Ok(())
}

impl<R: ConnectorHistoryRepository + ?Sized> ConnectorService<R> {
    pub fn new(repo: Arc<R>, client: KafkaConnectClient) -> Self { Self { repo, client } }

    pub async fn load(&self, name: &str) -> Result<UpstreamReply, ServiceError> {
        require_name(name)?;
        self.client.fetch_config(name).await.map_err(|e| {
            error!(connector = %name, error = %e, "connector_fetch_failed");
            e
        })
    }

    /// Record the config locally, then PUT it to Kafka Connect. The local copy
    /// is kept even when the upstream call fails.
    #[instrument(skip(self, config), fields(connector = %name))]
    pub async fn update(&self, name: &str, config: String) -> Result<UpstreamReply, ServiceError> {
        require_name(name)?;
        let saved = self.repo.record(name, &config).await.map_err(|e| {
            error!(error = %e, "connector_history_save_failed");
            e
        })?;
        info!(history_id = saved.id, "connector_config_recorded");

        let reply = self.client.put_config(name, config).await.map_err(|e| {
            error!(error = %e, "connector_update_failed");
            e
        })?;
        info!(status = reply.status, "connector_config_applied");
        Ok(reply)
    }

    pub async fn history(&self, name: &str) -> Result<Vec<ConnectorRecord>, ServiceError> {
        require_name(name)?;
        self.repo.history(name).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use axum::{extract::Path, http::StatusCode, routing::get, Router};

    use super::*;
    use crate::connect::repository::{mock::MockConnectorHistoryRepository, SeaOrmConnectorHistoryRepository};
    use crate::test_support::get_db;

    type Puts = Arc<Mutex<Vec<(String, String)>>>;

    /// Minimal stand-in for a Kafka Connect worker.
    async fn spawn_kafka_connect() -> anyhow::Result<(String, Puts)> {
        let puts: Puts = Arc::default();
        let recorded = Arc::clone(&puts);
        let app = Router::new().route(
            "/connectors/:name/config",
            get(|Path(name): Path<String>| async move {
                if name == "missing" {
                    return (StatusCode::NOT_FOUND, r#"{"error_code":404,"message":"Connector missing not found"}"#.to_string());
                }
                (StatusCode::OK, format!(r#"{{"name":"{name}","tasks.max":"1"}}"#))
            })
            .put(move |Path(name): Path<String>, body: String| {
                let recorded = Arc::clone(&recorded);
                async move {
                    recorded.lock().unwrap().push((name, body.clone()));
                    (StatusCode::CREATED, body)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok((format!("http://{addr}"), puts))
    }

    async fn closed_port_url() -> anyhow::Result<String> {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        drop(listener);
        Ok(format!("http://{addr}"))
    }

    fn client(url: &str) -> KafkaConnectClient {
        KafkaConnectClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn load_returns_upstream_body() -> anyhow::Result<()> {
        let (url, _) = spawn_kafka_connect().await?;
        let svc = ConnectorService::new(Arc::new(MockConnectorHistoryRepository::default()), client(&url));

        let reply = svc.load("jdbc-sink").await?;
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, r#"{"name":"jdbc-sink","tasks.max":"1"}"#);

        let missing = svc.load("missing").await?;
        assert_eq!(missing.status, 404);
        Ok(())
    }

    #[tokio::test]
    async fn update_records_history_then_puts() -> anyhow::Result<()> {
        let (url, puts) = spawn_kafka_connect().await?;
        let db = get_db().await?;
        let repo = Arc::new(SeaOrmConnectorHistoryRepository::new(db));
        let svc = ConnectorService::new(repo, client(&url));

        let body = r#"{"connector.class":"io.confluent.connect.jdbc.JdbcSinkConnector"}"#.to_string();
        let reply = svc.update("jdbc-sink", body.clone()).await?;
        assert_eq!(reply.status, 201);
        assert_eq!(reply.body, body);
        assert_eq!(puts.lock().unwrap().as_slice(), &[("jdbc-sink".to_string(), body.clone())]);

        let history = svc.history("jdbc-sink").await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].config, body);
        Ok(())
    }

    #[tokio::test]
    async fn history_is_kept_when_upstream_is_down() -> anyhow::Result<()> {
        let url = closed_port_url().await?;
        let repo = Arc::new(MockConnectorHistoryRepository::default());
        let svc = ConnectorService::new(Arc::clone(&repo), client(&url));

        let err = svc.update("jdbc-sink", "{}".into()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream(_)));
        assert_eq!(svc.history("jdbc-sink").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn history_failure_skips_upstream_call() -> anyhow::Result<()> {
        let (url, puts) = spawn_kafka_connect().await?;
        let repo = Arc::new(MockConnectorHistoryRepository::default());
        repo.set_failing(true);
        let svc = ConnectorService::new(Arc::clone(&repo), client(&url));

        assert!(matches!(svc.update("jdbc-sink", "{}".into()).await, Err(ServiceError::Db(_))));
        assert!(puts.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn blank_name_is_rejected() -> anyhow::Result<()> {
        let url = closed_port_url().await?;
        let svc = ConnectorService::new(Arc::new(MockConnectorHistoryRepository::default()), client(&url));
        assert!(matches!(svc.load(" ").await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.update("", "{}".into()).await, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
