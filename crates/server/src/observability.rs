use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static FILES_SAVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "docstore_files_saved_total",
        "Documents written (inserted or replaced)"
    )
    .expect("register files_saved_total")
});

pub static FILES_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "docstore_files_rejected_total",
        "Save requests rejected before reaching storage"
    )
    .expect("register files_rejected_total")
});

pub static STORAGE_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "docstore_storage_errors_total",
        "Requests that failed because storage failed"
    )
    .expect("register storage_errors_total")
});

/// Touch every metric so `/metrics` lists them before the first event.
pub fn register_all() {
    Lazy::force(&FILES_SAVED_TOTAL);
    Lazy::force(&FILES_REJECTED_TOTAL);
    Lazy::force(&STORAGE_ERRORS_TOTAL);
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
