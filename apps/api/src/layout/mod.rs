// Markup-to-document renderer.
// Pipeline: sanitize -> classify -> wrap -> lay out -> emit.
// Layout is CPU-bound and synchronous; async callers run it inside tokio::task::spawn_blocking.

pub mod classifier;
pub mod emitter;
pub mod engine;
pub mod font_metrics;
pub mod pdf;
pub mod renderer;
pub mod sanitizer;
pub mod style;
pub mod wrapper;

// Re-export the public API consumed by the generation pipeline and handlers.
pub use pdf::{PdfEmitter, PDF_MIME_TYPE};
pub use renderer::{render_pdf, render_text, RenderError, RenderedArtifact};
pub use style::{default_layout_config, LayoutConfig};
