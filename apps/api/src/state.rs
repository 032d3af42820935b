use std::sync::Arc;

use crate::layout::emitter::DocumentEmitter;
use crate::layout::LayoutConfig;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no mutable data: every render builds its own cursor and draw list.
#[derive(Clone)]
pub struct AppState {
    /// Text-generation collaborator. Default: `LlmClient`.
    pub generator: Arc<dyn TextGenerator>,
    /// Document backend. Default: `PdfEmitter`.
    pub emitter: Arc<dyn DocumentEmitter>,
    /// Page geometry and typography for every render.
    pub layout: LayoutConfig,
}
