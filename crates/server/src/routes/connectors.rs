use axum::{
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use service::connect::ConnectorRecord;
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::state::ConnectState;

#[derive(Debug, Deserialize)]
pub struct ConnectorQuery {
    #[serde(default)]
    pub name: String,
}

/// Plain-text error for the htmx-driven page.
fn text_error(e: ServiceError, public_message: &'static str) -> (StatusCode, String) {
    match e {
        ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        other => {
            tracing::error!(error = %other, "connector request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, public_message.to_string())
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Editor fragment swapped into the page: hidden textarea holding the config
/// and the CodeMirror instance bound to it.
pub fn editor_fragment(config: &str) -> String {
    format!(
        r#"<textarea id="editor-json" name="json" style="display:none;">{}</textarea>
<div id="editor"></div>
<script>
    if (window.editor) {{
        editor.toTextArea();
    }}
    editor = CodeMirror.fromTextArea(document.getElementById("editor-json"), {{
        lineNumbers: true,
        mode: "application/json",
        theme: "default"
    }});
</script>"#,
        escape_html(config)
    )
}

pub async fn load(State(state): State<ConnectState>, Query(q): Query<ConnectorQuery>) -> Result<Html<String>, (StatusCode, String)> {
    let reply = state
        .connectors
        .load(&q.name)
        .await
        .map_err(|e| text_error(e, "Failed to fetch connector"))?;
    Ok(Html(editor_fragment(&reply.body)))
}

/// Save a copy locally, apply it to Kafka Connect and mirror its reply.
pub async fn update(State(state): State<ConnectState>, Query(q): Query<ConnectorQuery>, body: String) -> Response {
    match state.connectors.update(&q.name, body).await {
        Ok(reply) => {
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, [(CONTENT_TYPE, "application/json")], reply.body).into_response()
        }
        Err(e @ (ServiceError::Db(_) | ServiceError::Model(_))) => text_error(e, "Failed to save to database").into_response(),
        Err(e) => text_error(e, "Failed to update connector").into_response(),
    }
}

pub async fn history(State(state): State<ConnectState>, Path(name): Path<String>) -> Result<Json<Vec<ConnectorRecord>>, JsonApiError> {
    state
        .connectors
        .history(&name)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Failed to fetch connector history"))
}
