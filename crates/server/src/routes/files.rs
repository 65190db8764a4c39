use axum::{extract::{rejection::JsonRejection, Path, State}, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use service::file::Document;

use crate::errors::JsonApiError;
use crate::observability::{FILES_REJECTED_TOTAL, FILES_SAVED_TOTAL};
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SaveFileRequest {
    pub name: String,
    /// JSON text; stored exactly as sent.
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FileBody {
    pub name: String,
    pub content: String,
}

impl From<Document> for FileBody {
    fn from(d: Document) -> Self {
        Self { name: d.name, content: d.content }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SaveFileResponse {
    pub message: String,
    pub name: String,
}

#[utoipa::path(
    get, path = "/api/files", tag = "files",
    responses(
        (status = 200, description = "Document names", body = [String]),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorBody)
    )
)]
pub async fn list_files(State(state): State<ServerState>) -> Result<Json<Vec<String>>, JsonApiError> {
    state
        .files
        .list()
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch files"))
}

#[utoipa::path(
    get, path = "/api/file/{name}", tag = "files",
    params(("name" = String, Path, description = "Document name")),
    responses(
        (status = 200, description = "Document", body = FileBody),
        (status = 404, description = "File not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorBody)
    )
)]
pub async fn get_file(State(state): State<ServerState>, Path(name): Path<String>) -> Result<Json<FileBody>, JsonApiError> {
    state
        .files
        .get(&name)
        .await
        .map(|d| Json(d.into()))
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch file"))
}

#[utoipa::path(
    post, path = "/api/file", tag = "files",
    request_body = SaveFileRequest,
    responses(
        (status = 200, description = "Saved", body = SaveFileResponse),
        (status = 400, description = "Invalid body or content is not valid JSON", body = crate::errors::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorBody)
    )
)]
pub async fn save_file(
    State(state): State<ServerState>,
    payload: Result<Json<SaveFileRequest>, JsonRejection>,
) -> Result<Json<SaveFileResponse>, JsonApiError> {
    let Json(input) = payload.map_err(|rejection| {
        FILES_REJECTED_TOTAL.inc();
        warn!(error = %rejection, "invalid save request body");
        JsonApiError::bad_request("Invalid request body")
    })?;

    let doc = Document { name: input.name, content: input.content };
    match state.files.save(doc).await {
        Ok(saved) => {
            FILES_SAVED_TOTAL.inc();
            Ok(Json(SaveFileResponse { message: "File saved successfully".into(), name: saved.name }))
        }
        Err(e) => {
            if e.is_client_error() {
                FILES_REJECTED_TOTAL.inc();
            }
            Err(JsonApiError::from_service(e, "Failed to save file"))
        }
    }
}
