use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, HttpMakeClassifier, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::observability;
use crate::openapi::ApiDoc;
use crate::state::{ConnectState, ServerState};

pub mod connectors;
pub mod files;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn metrics() -> (axum::http::StatusCode, String) {
    observability::encode_metrics()
}

fn trace_layer() -> TraceLayer<HttpMakeClassifier> {
    TraceLayer::new_for_http()
        // one span per request, carrying method and path
        .make_span_with(
            DefaultMakeSpan::new()
                .level(Level::INFO)
                .include_headers(false),
        )
        .on_request(
            DefaultOnRequest::new()
                .level(Level::INFO),
        )
        // status code and latency
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .include_headers(false),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR),
        )
}

/// Human-facing pages. They are static and fetch data from the JSON API, so
/// `/edit/{name}` serves the same file for every name.
fn pages<S: Clone + Send + Sync + 'static>(frontend_dir: &Path) -> Router<S> {
    Router::new()
        .route_service("/", ServeFile::new(frontend_dir.join("home.html")))
        .route_service("/list", ServeFile::new(frontend_dir.join("list_files.html")))
        .route_service("/create", ServeFile::new(frontend_dir.join("create_file.html")))
        .route_service("/edit/:name", ServeFile::new(frontend_dir.join("edit_file.html")))
        .nest_service("/static", ServeDir::new(frontend_dir.join("static")))
}

/// Build the document store router: JSON API, pages, health, metrics and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer, frontend_dir: &Path) -> Router {
    observability::register_all();

    let api = Router::new()
        .route("/api/files", get(files::list_files))
        .route("/api/file/:name", get(files::get_file))
        // documents have no size cap
        .route("/api/file", post(files::save_file).layer(DefaultBodyLimit::disable()));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(api)
        .merge(pages(frontend_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(trace_layer())
}

/// Build the connector config editor router.
pub fn build_connect_router(state: ConnectState, cors: CorsLayer, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/load", get(connectors::load))
        .route("/update", post(connectors::update).put(connectors::update))
        .route("/api/connectors/:name/history", get(connectors::history))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir.join("static")))
        .with_state(state)
        .layer(cors)
        .layer(trace_layer())
}
