//! Environment/runtime helpers
//!
//! Sanity checks on directories the services read from at startup.

use tracing::warn;

/// Warn when a directory of static pages is missing. Pages will 404 but the
/// JSON API keeps working, so this never fails startup.
pub async fn check_frontend_dir(frontend_dir: &str) -> bool {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend directory not found; pages and static assets will 404");
        return false;
    }
    true
}

/// Ensure the parent directory of a SQLite database file exists so that
/// `mode=rwc` can create the file. Non-SQLite URLs are left alone.
pub async fn ensure_sqlite_parent(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_file_path(database_url) else { return Ok(()) };
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

/// Extract the file path from `sqlite://path?opts` / `sqlite:path`; `None` for
/// in-memory or non-SQLite URLs.
pub fn sqlite_file_path(database_url: &str) -> Option<&str> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(path)
}
