use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub connect: ConnectConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            worker_threads: Some(4),
            frontend_dir: default_frontend_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Settings for the Kafka Connect config editor.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_kafka_connect_url")]
    pub kafka_connect_url: String,
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_static_dir")]
    pub static_dir: String,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            kafka_connect_url: default_kafka_connect_url(),
            database_url: String::new(),
            request_timeout_secs: default_request_timeout(),
            static_dir: default_connect_static_dir(),
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_request_timeout() -> u64 { 30 }
fn default_frontend_dir() -> String { "frontend".into() }
fn default_connect_static_dir() -> String { "frontend/connect".into() }
fn default_kafka_connect_url() -> String { "http://localhost:8083".into() }

pub const DEFAULT_FILES_DATABASE_URL: &str = "sqlite://files.db?mode=rwc";
pub const DEFAULT_CONNECTORS_DATABASE_URL: &str = "sqlite://connectors.db?mode=rwc";

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file when present, otherwise defaults overridden by environment
    /// variables (`SERVER_HOST`, `SERVER_PORT`, `CONNECT_HOST`, `CONNECT_PORT`).
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        // a file that exists but does not parse is an error, not a fallback
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            Self::from_env()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Ok(host) = std::env::var("CONNECT_HOST") {
            cfg.connect.host = host;
        }
        if let Some(port) = std::env::var("CONNECT_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.connect.port = port;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.connect.normalize_from_env();
        self.connect.validate()?;
        Ok(())
    }

    /// Database settings for the connector history store: the pool settings of
    /// `[database]` with the editor's own URL.
    pub fn connect_database(&self) -> DatabaseConfig {
        DatabaseConfig { url: self.connect.database_url.clone(), ..self.database.clone() }
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.frontend_dir.trim().is_empty() {
            self.frontend_dir = default_frontend_dir();
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Single-connection in-memory SQLite; every connection would otherwise see
    /// its own empty database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }

    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            self.url = std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_FILES_DATABASE_URL.to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_database_url("database.url", &self.url)?;
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl ConnectConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("KAFKA_CONNECT_URL") {
            if !url.trim().is_empty() {
                self.kafka_connect_url = url;
            }
        }
        if self.database_url.trim().is_empty() {
            self.database_url = std::env::var("CONNECT_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_CONNECTORS_DATABASE_URL.to_string());
        }
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("connect.port must be in 1..=65535"));
        }
        let lower = self.kafka_connect_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("connect.kafka_connect_url must start with http:// or https://"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("connect.request_timeout_secs must be positive"));
        }
        validate_database_url("connect.database_url", &self.database_url)
    }
}

fn validate_database_url(field: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(anyhow!("{field} is empty; set it in config.toml or the environment"));
    }
    let lower = url.to_lowercase();
    if !(lower.starts_with("sqlite:") || lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
        return Err(anyhow!("{field} must start with sqlite:, postgres:// or postgresql://"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file_with_defaults() {
        let cfg = parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [database]
            url = "sqlite://data/files.db?mode=rwc"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.frontend_dir, "frontend");
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.connect.port, 3000);
        assert_eq!(cfg.connect.kafka_connect_url, "http://localhost:8083");
    }

    #[test]
    fn rejects_unknown_database_scheme() {
        let db = DatabaseConfig { url: "mysql://localhost/db".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let db = DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 2,
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
    }

    #[test]
    fn in_memory_is_valid() {
        assert!(DatabaseConfig::in_memory().validate().is_ok());
    }

    #[test]
    fn normalize_fills_worker_threads_and_host() {
        let mut server = ServerConfig { host: " ".into(), port: 8080, worker_threads: Some(0), frontend_dir: "".into() };
        server.normalize().unwrap();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.worker_threads, Some(4));
        assert_eq!(server.frontend_dir, "frontend");
    }

    #[test]
    fn connect_rejects_non_http_upstream() {
        let connect = ConnectConfig {
            kafka_connect_url: "localhost:8083".into(),
            database_url: "sqlite::memory:".into(),
            ..ConnectConfig::default()
        };
        assert!(connect.validate().is_err());
    }

    #[test]
    fn connect_database_reuses_pool_settings() {
        let mut cfg = AppConfig::default();
        cfg.database.max_connections = 7;
        cfg.connect.database_url = "sqlite://connectors.db?mode=rwc".into();
        let db = cfg.connect_database();
        assert_eq!(db.url, "sqlite://connectors.db?mode=rwc");
        assert_eq!(db.max_connections, 7);
    }

    #[test]
    fn load_from_missing_file_errors() {
        let path = std::env::temp_dir().join(format!("missing_{}.toml", uuid::Uuid::new_v4()));
        assert!(load_from_file(path.to_str().unwrap()).is_err());
    }
}
