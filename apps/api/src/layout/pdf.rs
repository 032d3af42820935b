//! PDF backend built on `pdf-writer`.
//!
//! Writes a single page using the base-14 Helvetica faces in WinAnsi encoding.
//! Text reaching this point is sanitized ASCII, so bytes are passed through
//! unchanged.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use tracing::debug;

use crate::layout::emitter::{DocumentEmitter, DrawCommand, RenderedDocument};
use crate::layout::font_metrics::{FontFace, PT_PER_MM};
use crate::layout::RenderError;

pub const PDF_MIME_TYPE: &str = "application/pdf";

const FACES: [FontFace; 2] = [FontFace::Regular, FontFace::Bold];

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfEmitter;

impl PdfEmitter {
    /// Builds the page content stream, flipping the y axis into PDF space.
    fn content_stream(document: &RenderedDocument) -> Content {
        let page_height_pt = document.page_height_mm * PT_PER_MM;
        let to_x = |mm: f32| mm * PT_PER_MM;
        let to_y = |mm: f32| page_height_pt - mm * PT_PER_MM;

        let mut content = Content::new();
        for command in document.commands() {
            match command {
                DrawCommand::Text(run) => {
                    let (r, g, b) = run.color.unit();
                    content.set_fill_rgb(r, g, b);
                    content
                        .begin_text()
                        .set_font(Name(run.face.resource_name().as_bytes()), run.size_pt)
                        .next_line(to_x(run.x_mm), to_y(run.baseline_mm))
                        .show(Str(run.text.as_bytes()))
                        .end_text();
                }
                DrawCommand::Line(line) => {
                    let (r, g, b) = line.color.unit();
                    content
                        .set_stroke_rgb(r, g, b)
                        .set_line_width(line.width_mm * PT_PER_MM)
                        .move_to(to_x(line.x1_mm), to_y(line.y1_mm))
                        .line_to(to_x(line.x2_mm), to_y(line.y2_mm))
                        .stroke();
                }
            }
        }
        content
    }
}

impl DocumentEmitter for PdfEmitter {
    fn mime_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn flush(&self, document: &RenderedDocument) -> Result<Vec<u8>, RenderError> {
        if !(document.page_width_mm > 0.0 && document.page_height_mm > 0.0) {
            return Err(RenderError::Backend(format!(
                "invalid page size {}x{}mm",
                document.page_width_mm, document.page_height_mm
            )));
        }

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let page_id = Ref::new(3);
        let content_id = Ref::new(4);
        let font_ids = [Ref::new(5), Ref::new(6)];

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id).kids([page_id]).count(1);

        {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(
                0.0,
                0.0,
                document.page_width_mm * PT_PER_MM,
                document.page_height_mm * PT_PER_MM,
            ))
            .parent(pages_id)
            .contents(content_id);

            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for (face, id) in FACES.iter().zip(font_ids) {
                fonts.pair(Name(face.resource_name().as_bytes()), id);
            }
        }

        for (face, id) in FACES.iter().zip(font_ids) {
            pdf.type1_font(id)
                .base_font(Name(face.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let content = Self::content_stream(document);
        pdf.stream(content_id, &content.finish());

        let bytes = pdf.finish();
        debug!(
            commands = document.commands().len(),
            bytes = bytes.len(),
            "PDF serialized"
        );
        Ok(bytes)
    }
}
