//! Draw commands produced by the layout engine and the backend seam that
//! serialises them.
//!
//! Coordinates are millimetres from the top-left corner of the page. The
//! emitter does no validation of its own; it trusts the engine to keep
//! coordinates on the page.

use serde::Serialize;

use crate::layout::font_metrics::FontFace;
use crate::layout::style::Rgb;
use crate::layout::RenderError;

/// A positioned run of text on a single baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x_mm: f32,
    pub baseline_mm: f32,
    pub text: String,
    pub face: FontFace,
    pub size_pt: f32,
    pub color: Rgb,
}

/// A straight stroked line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSegment {
    pub x1_mm: f32,
    pub y1_mm: f32,
    pub x2_mm: f32,
    pub y2_mm: f32,
    pub width_mm: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Text(TextRun),
    Line(LineSegment),
}

/// Ordered draw commands for one page.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    commands: Vec<DrawCommand>,
}

impl RenderedDocument {
    pub fn new(page_width_mm: f32, page_height_mm: f32) -> Self {
        Self {
            page_width_mm,
            page_height_mm,
            commands: Vec::new(),
        }
    }

    pub fn push_text(&mut self, run: TextRun) {
        self.commands.push(DrawCommand::Text(run));
    }

    pub fn push_line(&mut self, line: LineSegment) {
        self.commands.push(DrawCommand::Line(line));
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(run) => Some(run),
            DrawCommand::Line(_) => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineSegment> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line(line) => Some(line),
            DrawCommand::Text(_) => None,
        })
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// A document backend. Any library that can place styled text and lines on a
/// page can implement this.
pub trait DocumentEmitter: Send + Sync {
    /// MIME type of the bytes returned by `flush`.
    fn mime_type(&self) -> &'static str;

    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Serialises the document to its binary form.
    fn flush(&self, document: &RenderedDocument) -> Result<Vec<u8>, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> TextRun {
        TextRun {
            x_mm: 10.0,
            baseline_mm: 20.0,
            text: text.to_string(),
            face: FontFace::Regular,
            size_pt: 12.0,
            color: Rgb::BLACK,
        }
    }

    #[test]
    fn test_commands_keep_insertion_order() {
        let mut doc = RenderedDocument::new(210.0, 297.0);
        assert!(doc.is_empty());
        doc.push_text(run("first"));
        doc.push_line(LineSegment {
            x1_mm: 10.0,
            y1_mm: 30.0,
            x2_mm: 200.0,
            y2_mm: 30.0,
            width_mm: 0.5,
            color: Rgb::BLACK,
        });
        doc.push_text(run("second"));

        assert_eq!(doc.commands().len(), 3);
        assert!(matches!(doc.commands()[1], DrawCommand::Line(_)));
        let texts: Vec<&str> = doc.text_runs().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(doc.lines().count(), 1);
    }
}
