//! Axum route handlers for the Documents API.

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{
    generate_document, render_blocking, DocumentStatus, GenerateRequest,
};
use crate::layout::sanitizer::sanitize;
use crate::layout::RenderedArtifact;
use crate::llm_client::is_error_marked;
use crate::models::document::DocumentType;
use crate::state::AppState;

const TRUNCATED_HEADER: &str = "x-layout-truncated";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub request_id: Uuid,
    pub document_type: DocumentType,
    pub text: String,
    pub generated_at: DateTime<Utc>,
    pub document: DocumentStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateParams {
    /// Answer with the rendered document itself instead of the JSON report.
    #[serde(default)]
    pub download: bool,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub document_type: DocumentType,
    #[serde(default)]
    pub name: String,
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/documents/generate
///
/// Generates document text from the form and reports whether a document could
/// be rendered from it. Generation failures come back as display text with
/// the document suppressed, not as an HTTP error.
///
/// With `?download=true` a rendered document is returned as an attachment.
/// When nothing was rendered the JSON report is returned instead, so the
/// caller still gets the text.
pub async fn handle_generate(
    State(state): State<AppState>,
    Query(params): Query<GenerateParams>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, AppError> {
    let person_name = request.form.name.clone();
    let outcome = generate_document(
        state.generator.as_ref(),
        state.emitter.clone(),
        &state.layout,
        request,
    )
    .await;

    if params.download {
        if let Some(artifact) = outcome.artifact {
            return attachment_response(outcome.document_type, &person_name, artifact);
        }
    }

    Ok(Json(GenerateResponse {
        request_id: outcome.request_id,
        document_type: outcome.document_type,
        text: outcome.text,
        generated_at: outcome.generated_at,
        document: outcome.document,
    })
    .into_response())
}

/// POST /api/v1/documents/render
///
/// Renders previously generated text and returns the document as a download.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    if is_error_marked(&request.text) {
        return Err(AppError::UnprocessableEntity(
            "text is a generation error report, not a document".to_string(),
        ));
    }

    let artifact = render_blocking(request.text, state.layout.clone(), state.emitter.clone()).await?;
    attachment_response(request.document_type, &request.name, artifact)
}

/// Wraps a rendered document in a download response.
fn attachment_response(
    document_type: DocumentType,
    person_name: &str,
    artifact: RenderedArtifact,
) -> Result<Response, AppError> {
    let file_name = document_type.file_name(person_name, artifact.extension);
    let disposition = content_disposition(&file_name)?;
    info!(
        file_name = %file_name,
        bytes = artifact.bytes.len(),
        truncated = artifact.truncated,
        "Serving rendered document"
    );

    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static(artifact.mime_type),
        ),
        (header::CONTENT_DISPOSITION, disposition),
        (
            HeaderName::from_static(TRUNCATED_HEADER),
            HeaderValue::from_static(if artifact.truncated { "true" } else { "false" }),
        ),
    ];
    Ok((headers, Bytes::from(artifact.bytes)).into_response())
}

/// Builds an attachment header; the name is reduced to printable ASCII first.
fn content_disposition(file_name: &str) -> Result<HeaderValue, AppError> {
    let safe: String = sanitize(file_name)
        .chars()
        .filter(|c| !c.is_ascii_control() && *c != '"' && *c != '\\')
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{safe}\""))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid download header: {e}")))
}
