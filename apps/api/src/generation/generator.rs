//! Document Generation — orchestrates the generate-then-render pipeline.
//!
//! Flow: build prompt → text generator → error-marker check →
//!       render on a blocking thread → report.
//!
//! The generated text is always handed back to the caller, whether or not a
//! document could be produced from it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::generation::prompts::DOCUMENT_PROMPT_TEMPLATE;
use crate::layout::emitter::DocumentEmitter;
use crate::layout::{render_text, LayoutConfig, RenderError, RenderedArtifact};
use crate::llm_client::{is_error_marked, TextGenerator};
use crate::models::document::{DocumentType, FormInput};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for document generation: the document type plus form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub document_type: DocumentType,
    #[serde(flatten)]
    pub form: FormInput,
}

/// What became of the document after generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// The generator reported an error; the renderer was never invoked.
    Suppressed,
    Rendered {
        file_name: String,
        mime_type: String,
        size_bytes: usize,
        truncated: bool,
        rows_rendered: usize,
    },
    /// Layout or serialization failed; the text is still available.
    Failed { message: String },
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub request_id: Uuid,
    pub document_type: DocumentType,
    pub text: String,
    pub generated_at: DateTime<Utc>,
    pub document: DocumentStatus,
    pub artifact: Option<RenderedArtifact>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs generation and, if the text is usable, rendering.
///
/// Never fails: generation errors become display text (and suppress the
/// document), render errors become `DocumentStatus::Failed`.
pub async fn generate_document(
    generator: &dyn TextGenerator,
    emitter: Arc<dyn DocumentEmitter>,
    layout: &LayoutConfig,
    request: GenerateRequest,
) -> GenerationOutcome {
    let request_id = Uuid::new_v4();
    let document_type = request.document_type;
    let prompt = build_document_prompt(document_type, &request.form);

    info!(%request_id, document_type = document_type.label(), "Generating document text");
    let text = match generator.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => e.to_string(),
    };
    let generated_at = Utc::now();

    if is_error_marked(&text) {
        warn!(%request_id, "Generation failed, document suppressed: {text}");
        return GenerationOutcome {
            request_id,
            document_type,
            text,
            generated_at,
            document: DocumentStatus::Suppressed,
            artifact: None,
        };
    }

    let (document, artifact) =
        match render_blocking(text.clone(), layout.clone(), emitter).await {
            Ok(artifact) => {
                info!(
                    %request_id,
                    bytes = artifact.bytes.len(),
                    truncated = artifact.truncated,
                    "Document rendered"
                );
                let status = DocumentStatus::Rendered {
                    file_name: document_type
                        .file_name(&request.form.name, artifact.extension),
                    mime_type: artifact.mime_type.to_string(),
                    size_bytes: artifact.bytes.len(),
                    truncated: artifact.truncated,
                    rows_rendered: artifact.rows_rendered,
                };
                (status, Some(artifact))
            }
            Err(e) => {
                warn!(%request_id, "Document render failed: {e}");
                (
                    DocumentStatus::Failed {
                        message: e.to_string(),
                    },
                    None,
                )
            }
        };

    GenerationOutcome {
        request_id,
        document_type,
        text,
        generated_at,
        document,
        artifact,
    }
}

/// Renders on the blocking pool so layout never stalls the async executor.
pub async fn render_blocking(
    text: String,
    layout: LayoutConfig,
    emitter: Arc<dyn DocumentEmitter>,
) -> Result<RenderedArtifact, RenderError> {
    tokio::task::spawn_blocking(move || render_text(&text, &layout, emitter.as_ref()))
        .await
        .map_err(|e| RenderError::Backend(format!("render task failed: {e}")))?
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building
// ────────────────────────────────────────────────────────────────────────────

/// Fills the prompt template with the form fields, verbatim.
pub fn build_document_prompt(document_type: DocumentType, form: &FormInput) -> String {
    let document_kind = document_type.label().to_lowercase();
    fill_template(
        DOCUMENT_PROMPT_TEMPLATE,
        &[
            ("document_kind", document_kind.as_str()),
            ("name", form.name.as_str()),
            ("email", form.email.as_str()),
            ("phone", form.phone.as_str()),
            ("role", form.role.as_str()),
            ("experience", form.experience.as_str()),
            ("skills", form.skills.as_str()),
            ("goals", form.goals.as_str()),
        ],
    )
}

/// Single-pass `{key}` substitution. Values are inserted as-is, so braces in
/// user input are never re-expanded.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
