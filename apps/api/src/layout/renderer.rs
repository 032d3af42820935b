//! Render entry point: raw model text in, document bytes out.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::layout::classifier::classify_document;
use crate::layout::emitter::DocumentEmitter;
use crate::layout::engine::LayoutEngine;
use crate::layout::pdf::PdfEmitter;
use crate::layout::sanitizer::sanitize;
use crate::layout::style::LayoutConfig;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document backend error: {0}")]
    Backend(String),
}

/// A serialized document plus what the layout had to drop to produce it.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub extension: &'static str,
    pub truncated: bool,
    pub rows_rendered: usize,
}

impl RenderedArtifact {
    /// Writes the document to a single output file.
    pub fn write_to(&self, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "Document written");
        Ok(())
    }
}

/// Runs the full pipeline with an arbitrary backend.
pub fn render_text(
    raw: &str,
    config: &LayoutConfig,
    emitter: &dyn DocumentEmitter,
) -> Result<RenderedArtifact, RenderError> {
    config.validate()?;

    let sanitized = sanitize(raw);
    let lines = classify_document(&sanitized, config.contact_zone_lines);
    debug!(
        input_bytes = raw.len(),
        sanitized_bytes = sanitized.len(),
        lines = lines.len(),
        "Classified document"
    );

    let outcome = LayoutEngine::new(config).layout(&lines);
    let bytes = emitter.flush(&outcome.document)?;

    Ok(RenderedArtifact {
        bytes,
        mime_type: emitter.mime_type(),
        extension: emitter.extension(),
        truncated: outcome.truncated,
        rows_rendered: outcome.rows_rendered,
    })
}

/// Renders to PDF.
pub fn render_pdf(raw: &str, config: &LayoutConfig) -> Result<RenderedArtifact, RenderError> {
    render_text(raw, config, &PdfEmitter)
}
