use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client, Url};
use tracing::{debug, instrument};

use crate::errors::ServiceError;

/// Status and body returned by Kafka Connect, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

/// Thin client for `/connectors/{name}/config` on a Kafka Connect worker.
#[derive(Clone)]
pub struct KafkaConnectClient {
    http: Client,
    base_url: Url,
}

impl KafkaConnectClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ServiceError::Validation(format!("invalid Kafka Connect URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Validation(format!("Kafka Connect URL {base_url} cannot be a base")));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    /// `{base}/connectors/{name}/config`, with `name` percent-encoded as a single segment.
    pub fn config_url(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["connectors", name, "config"]);
        }
        url
    }

    #[instrument(skip(self))]
    pub async fn fetch_config(&self, name: &str) -> Result<UpstreamReply, ServiceError> {
        let resp = self
            .http
            .get(self.config_url(name))
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;
        read_reply(resp).await
    }

    #[instrument(skip(self, body), fields(bytes = body.len()))]
    pub async fn put_config(&self, name: &str, body: String) -> Result<UpstreamReply, ServiceError> {
        let resp = self
            .http
            .put(self.config_url(name))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;
        read_reply(resp).await
    }
}

async fn read_reply(resp: reqwest::Response) -> Result<UpstreamReply, ServiceError> {
    let status = resp.status().as_u16();
    let body = resp.text().await.map_err(|e| ServiceError::Upstream(e.to_string()))?;
    debug!(status, bytes = body.len(), "kafka_connect_reply");
    Ok(UpstreamReply { status, body })
}
