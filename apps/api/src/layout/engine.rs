//! Page Layout Engine — places classified lines on a single page.
//!
//! # State machine
//! - `Header`: title row, joined contact row, header rule.
//! - `Body`: every remaining line, styled per `LineKind`.
//! - `Done`: input exhausted, or the next placement would cross the fullness
//!   threshold. Whatever is left is dropped; no second page is created.
//!
//! Every vertical movement goes through `fits`, so the cursor never passes
//! `LayoutConfig::fullness_threshold_mm`.

use tracing::{debug, warn};

use crate::layout::classifier::{ClassifiedLine, LineKind};
use crate::layout::emitter::{LineSegment, RenderedDocument, TextRun};
use crate::layout::font_metrics::get_metrics;
use crate::layout::style::{LayoutConfig, RuleStyle, TextStyle};
use crate::layout::wrapper::{wrap, wrap_bullet};

/// Tolerance for float accumulation when comparing against the threshold.
const EPSILON_MM: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    Header,
    Body,
    Done,
}

/// Mutable placement state, owned by one engine for one render.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub y_mm: f32,
    pub indent_mm: f32,
    pub style: TextStyle,
}

/// Result of laying out one document.
#[derive(Debug, Clone)]
pub struct LayoutOutcome {
    pub document: RenderedDocument,
    /// True when non-blank content was dropped at the fullness threshold.
    pub truncated: bool,
    /// Number of text rows placed on the page.
    pub rows_rendered: usize,
    /// Final cursor position.
    pub cursor_mm: f32,
}

pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    cursor: Cursor,
    state: LayoutState,
    document: RenderedDocument,
    rows_rendered: usize,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            cursor: Cursor {
                y_mm: config.margin_top_mm,
                indent_mm: 0.0,
                style: config.body,
            },
            state: LayoutState::Header,
            document: RenderedDocument::new(config.page_width_mm, config.page_height_mm),
            rows_rendered: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> LayoutState {
        self.state
    }

    #[cfg(test)]
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Lays out every line in order until the input or the page runs out.
    pub fn layout(mut self, lines: &[ClassifiedLine]) -> LayoutOutcome {
        let body_start = self.layout_header(lines);
        let mut stopped_at = None;

        if self.state == LayoutState::Body {
            for (i, line) in lines.iter().enumerate().skip(body_start) {
                let next = lines[i + 1..].iter().find(|l| l.kind != LineKind::Blank);
                if !self.layout_line(line, next) {
                    stopped_at = Some(i);
                    break;
                }
            }
        } else {
            stopped_at = Some(body_start);
        }

        let truncated = stopped_at
            .map(|i| lines[i.min(lines.len())..].iter().any(|l| l.kind != LineKind::Blank))
            .unwrap_or(false);
        if truncated {
            warn!(
                dropped_from_line = stopped_at.unwrap_or_default(),
                total_lines = lines.len(),
                cursor_mm = self.cursor.y_mm,
                "Page fullness threshold reached, remaining content dropped"
            );
        }
        self.state = LayoutState::Done;

        debug!(
            rows = self.rows_rendered,
            commands = self.document.commands().len(),
            truncated,
            "Layout complete"
        );

        LayoutOutcome {
            document: self.document,
            truncated,
            rows_rendered: self.rows_rendered,
            cursor_mm: self.cursor.y_mm,
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Header block
    // ────────────────────────────────────────────────────────────────────────

    /// Places the title, contact row and header rule. Returns the index of the
    /// first line left for the body.
    fn layout_header(&mut self, lines: &[ClassifiedLine]) -> usize {
        let config = self.config;
        let mut next = 0;

        if let Some(first) = lines.first().filter(|l| l.kind == LineKind::Title) {
            self.set_style(config.title, 0.0);
            if !self.place_centered(&first.text) {
                return next;
            }
            next = 1;
        }

        let mut contacts: Vec<&str> = Vec::new();
        while let Some(line) = lines.get(next).filter(|l| l.kind == LineKind::Contact) {
            if !line.text.is_empty() {
                contacts.push(&line.text);
            }
            next += 1;
        }
        if !contacts.is_empty() {
            self.set_style(config.contact, 0.0);
            if !self.place_centered(&contacts.join(config.contact_separator.as_str())) {
                return next;
            }
        }

        if !self.advance(config.header_gap_mm)
            || !self.draw_rule(&config.header_rule)
            || !self.advance(config.header_gap_mm)
        {
            return next;
        }

        self.state = LayoutState::Body;
        next
    }

    // ────────────────────────────────────────────────────────────────────────
    // Body lines
    // ────────────────────────────────────────────────────────────────────────

    /// Places one classified line. Returns false once the page is full.
    fn layout_line(&mut self, line: &ClassifiedLine, next: Option<&ClassifiedLine>) -> bool {
        let config = self.config;
        match line.kind {
            LineKind::SectionHeader => {
                // Keep the header on the page only if the row after it fits too.
                let keep_with_next = next.map(|n| self.first_row_height(n)).unwrap_or(0.0);
                let needed = config.section_gap_before_mm
                    + config.section_header.row_height_mm
                    + config.section_gap_after_mm
                    + keep_with_next;
                if !self.fits(needed) {
                    self.state = LayoutState::Done;
                    return false;
                }
                let text = if config.uppercase_section_headers {
                    line.text.to_ascii_uppercase()
                } else {
                    line.text.clone()
                };
                self.set_style(config.section_header, 0.0);
                self.advance(config.section_gap_before_mm)
                    && self.place_row(&text)
                    && self.advance(config.section_gap_after_mm)
            }
            LineKind::Bullet => {
                for segment in wrap_bullet(
                    &line.text,
                    config.bullet_width_chars,
                    config.bullet_marker.chars().count(),
                ) {
                    let (indent, text) = if segment.continuation {
                        (
                            config.bullet_indent_mm + config.continuation_indent_mm,
                            segment.text,
                        )
                    } else {
                        (
                            config.bullet_indent_mm,
                            format!("{}{}", config.bullet_marker, segment.text),
                        )
                    };
                    self.set_style(config.bullet, indent);
                    if !self.place_row(&text) {
                        return false;
                    }
                }
                true
            }
            LineKind::Rule => {
                let needed = config.rule.gap_before_mm + config.rule.gap_after_mm;
                if !self.fits(needed) {
                    self.state = LayoutState::Done;
                    return false;
                }
                self.advance(config.rule.gap_before_mm)
                    && self.draw_rule(&config.rule)
                    && self.advance(config.rule.gap_after_mm)
            }
            LineKind::Blank => self.advance(config.blank_gap_mm),
            // Title and contact lines only occur in the header zone; anything
            // reaching here is laid out as body text.
            LineKind::Body | LineKind::Title | LineKind::Contact => {
                self.set_style(config.body, 0.0);
                wrap(&line.text, config.body_width_chars)
                    .iter()
                    .all(|row| self.place_row(row))
            }
        }
    }

    /// Height of the first row a line would occupy.
    fn first_row_height(&self, line: &ClassifiedLine) -> f32 {
        let config = self.config;
        match line.kind {
            LineKind::SectionHeader => {
                config.section_gap_before_mm + config.section_header.row_height_mm
            }
            LineKind::Bullet => config.bullet.row_height_mm,
            LineKind::Rule => config.rule.gap_before_mm,
            LineKind::Blank => 0.0,
            LineKind::Body | LineKind::Title | LineKind::Contact => config.body.row_height_mm,
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Cursor primitives
    // ────────────────────────────────────────────────────────────────────────

    fn set_style(&mut self, style: TextStyle, indent_mm: f32) {
        self.cursor.style = style;
        self.cursor.indent_mm = indent_mm;
    }

    fn fits(&self, height_mm: f32) -> bool {
        self.cursor.y_mm + height_mm <= self.config.fullness_threshold_mm + EPSILON_MM
    }

    /// Moves the cursor down, or ends the layout if that would cross the threshold.
    fn advance(&mut self, height_mm: f32) -> bool {
        if !self.fits(height_mm) {
            self.state = LayoutState::Done;
            return false;
        }
        self.cursor.y_mm += height_mm;
        true
    }

    /// Places one row of text at the cursor's indent. Empty text consumes the
    /// row without drawing.
    fn place_row(&mut self, text: &str) -> bool {
        let x = self.config.margin_left_mm + self.cursor.indent_mm;
        self.place_at(x, text)
    }

    /// Places one row centred between the margins.
    fn place_centered(&mut self, text: &str) -> bool {
        let style = self.cursor.style;
        let width = get_metrics(style.face).width_mm(text, style.size_pt);
        let offset = ((self.config.content_width_mm() - width) / 2.0).max(0.0);
        self.place_at(self.config.margin_left_mm + offset, text)
    }

    fn place_at(&mut self, x_mm: f32, text: &str) -> bool {
        let style = self.cursor.style;
        if !self.fits(style.row_height_mm) {
            self.state = LayoutState::Done;
            return false;
        }
        if !text.is_empty() {
            self.document.push_text(TextRun {
                x_mm,
                baseline_mm: self.cursor.y_mm + style.baseline_offset_mm(),
                text: text.to_string(),
                face: style.face,
                size_pt: style.size_pt,
                color: style.color,
            });
            self.rows_rendered += 1;
        }
        self.cursor.y_mm += style.row_height_mm;
        true
    }

    /// Draws a full-width rule at the cursor without moving it.
    fn draw_rule(&mut self, rule: &RuleStyle) -> bool {
        self.document.push_line(LineSegment {
            x1_mm: self.config.margin_left_mm,
            y1_mm: self.cursor.y_mm,
            x2_mm: self.config.content_right_mm(),
            y2_mm: self.cursor.y_mm,
            width_mm: rule.width_mm,
            color: rule.color,
        });
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::classifier::classify_document;
    use crate::layout::emitter::DrawCommand;
    use crate::layout::font_metrics::FontFace;
    use crate::layout::style::default_layout_config;

    fn run_layout(text: &str, config: &LayoutConfig) -> LayoutOutcome {
        let lines = classify_document(text, config.contact_zone_lines);
        LayoutEngine::new(config).layout(&lines)
    }

    fn texts(outcome: &LayoutOutcome) -> Vec<String> {
        outcome
            .document
            .text_runs()
            .map(|r| r.text.clone())
            .collect()
    }

    fn body_lines(n: usize) -> String {
        let mut text = String::from("Jane Doe\njane@x.com\n### Summary");
        for i in 0..n {
            text.push_str(&format!("\nBody line number {i}"));
        }
        text
    }

    #[test]
    fn test_new_engine_starts_in_header_state() {
        let config = default_layout_config();
        let engine = LayoutEngine::new(&config);
        assert_eq!(engine.state(), LayoutState::Header);
        assert_eq!(engine.cursor().y_mm, config.margin_top_mm);
    }

    #[test]
    fn test_resume_scenario_layout() {
        let config = default_layout_config();
        let outcome = run_layout("Jane Doe\njane@x.com\n### SKILLS\n- Python\n- Go", &config);
        let commands = outcome.document.commands();

        assert_eq!(commands.len(), 6);
        let DrawCommand::Text(title) = &commands[0] else {
            panic!("expected title text first, got {:?}", commands[0]);
        };
        assert_eq!(title.text, "Jane Doe");
        assert_eq!(title.face, FontFace::Bold);
        assert_eq!(title.size_pt, 20.0);
        assert!(title.x_mm > config.margin_left_mm, "title should be centred");

        let DrawCommand::Text(contact) = &commands[1] else {
            panic!("expected contact row");
        };
        assert_eq!(contact.text, "jane@x.com");
        assert_eq!(contact.face, FontFace::Regular);

        assert!(matches!(commands[2], DrawCommand::Line(_)));

        let DrawCommand::Text(header) = &commands[3] else {
            panic!("expected section header");
        };
        assert_eq!(header.text, "SKILLS");
        assert_eq!(header.face, FontFace::Bold);
        assert_ne!(header.color, config.body.color);

        let bullets: Vec<&TextRun> = outcome.document.text_runs().skip(3).collect();
        assert_eq!(bullets.len(), 2);
        assert_eq!(bullets[0].text, "- Python");
        assert_eq!(bullets[1].text, "- Go");
        for bullet in &bullets {
            assert!((bullet.x_mm - (config.margin_left_mm + config.bullet_indent_mm)).abs() < 1e-4);
        }
        assert!(bullets[1].baseline_mm > bullets[0].baseline_mm);
        assert!(!outcome.truncated);
        assert_eq!(outcome.rows_rendered, 5);
    }

    #[test]
    fn test_contact_lines_joined_into_one_row() {
        let config = default_layout_config();
        let outcome = run_layout("Jane Doe\njane@x.com\n555-0100\n### Skills", &config);
        let rows = texts(&outcome);
        assert_eq!(rows[1], "jane@x.com | 555-0100");
        assert_eq!(rows[2], "SKILLS");
    }

    #[test]
    fn test_header_without_contact_still_draws_rule() {
        let config = default_layout_config();
        let outcome = run_layout("Jane Doe\n### Experience\nDid things.", &config);
        assert_eq!(texts(&outcome), vec!["Jane Doe", "EXPERIENCE", "Did things."]);
        assert_eq!(outcome.document.lines().count(), 1);
    }

    #[test]
    fn test_section_header_case_is_a_style_choice() {
        let mut config = default_layout_config();
        config.uppercase_section_headers = false;
        let outcome = run_layout("Jane\n### Work History\nx", &config);
        assert!(texts(&outcome).contains(&"Work History".to_string()));
    }

    #[test]
    fn test_rule_and_blank_consume_space() {
        let config = default_layout_config();
        let plain = run_layout("Jane\n### A\none\ntwo", &config);
        let spaced = run_layout("Jane\n### A\none\n---\n\ntwo", &config);
        assert_eq!(spaced.document.lines().count(), 2);
        let gap = config.rule.gap_before_mm + config.rule.gap_after_mm + config.blank_gap_mm;
        assert!((spaced.cursor_mm - plain.cursor_mm - gap).abs() < 1e-3);
        let rule = spaced.document.lines().nth(1).unwrap();
        assert_eq!(rule.color, config.rule.color);
        assert_eq!(rule.x1_mm, config.margin_left_mm);
        assert_eq!(rule.x2_mm, config.content_right_mm());
    }

    #[test]
    fn test_long_bullet_continuations_indent_further() {
        let config = default_layout_config();
        let text = format!("Jane\n### Projects\n- {}", "word ".repeat(500));
        let outcome = run_layout(&text, &config);
        let rows: Vec<&TextRun> = outcome.document.text_runs().skip(2).collect();
        assert!(rows.len() > 1);
        assert!(rows[0].text.starts_with("- "));
        assert!(rows[0].text.chars().count() <= config.bullet_width_chars);
        for row in &rows[1..] {
            assert!(row.x_mm > rows[0].x_mm);
            assert!(!row.text.starts_with("- "));
            assert!(row.text.chars().count() <= config.bullet_width_chars);
        }
    }

    #[test]
    fn test_long_body_line_wraps() {
        let config = default_layout_config();
        let paragraph = "lorem ipsum ".repeat(30);
        let outcome = run_layout(&format!("Jane\n### About\n{paragraph}"), &config);
        let rows: Vec<&TextRun> = outcome.document.text_runs().skip(2).collect();
        assert!(rows.len() >= 4);
        assert!(rows.iter().all(|r| r.x_mm == config.margin_left_mm));
        assert!(rows
            .iter()
            .all(|r| r.text.chars().count() <= config.body_width_chars));
    }

    #[test]
    fn test_overflow_truncates_and_flags() {
        let config = default_layout_config();
        let outcome = run_layout(&body_lines(100), &config);
        assert!(outcome.truncated);
        assert!(outcome.rows_rendered < 100);
        assert!(outcome.cursor_mm <= config.fullness_threshold_mm + EPSILON_MM);
    }

    #[test]
    fn test_short_document_not_truncated() {
        let config = default_layout_config();
        let outcome = run_layout(&body_lines(5), &config);
        assert!(!outcome.truncated);
        assert_eq!(outcome.rows_rendered, 3 + 5);
    }

    #[test]
    fn test_trailing_blank_lines_do_not_count_as_truncation() {
        let mut config = default_layout_config();
        config.contact_zone_lines = 1;
        // Only the header block and a single body row fit.
        config.fullness_threshold_mm = 10.0 + 12.0 + 8.0 + 5.0 + 5.0 + 8.0;
        let text = format!("Jane Doe\njane@x.com\nonly row{}", "\n".repeat(50));
        let outcome = run_layout(&text, &config);
        assert!(!outcome.truncated);
        assert_eq!(texts(&outcome).last().map(String::as_str), Some("only row"));
    }

    #[test]
    fn test_never_crosses_threshold() {
        let config = default_layout_config();
        for n in [0, 1, 10, 25, 31, 60, 200] {
            let mut text = body_lines(n);
            text.push_str("\n### Skills\n- Rust\n---\n\n- Go");
            let outcome = run_layout(&text, &config);
            assert!(
                outcome.cursor_mm <= config.fullness_threshold_mm + EPSILON_MM,
                "n={n} cursor={}",
                outcome.cursor_mm
            );
            for run in outcome.document.text_runs() {
                assert!(run.baseline_mm <= config.fullness_threshold_mm, "n={n}");
            }
            for line in outcome.document.lines() {
                assert!(line.y1_mm <= config.fullness_threshold_mm, "n={n}");
            }
        }
    }

    #[test]
    fn test_section_header_kept_with_next_row() {
        let mut config = default_layout_config();
        // Room for the section header and its gaps, but not the bullet after it.
        let header_block = 10.0 + 12.0 + 5.0 + 5.0;
        config.fullness_threshold_mm = header_block
            + config.section_gap_before_mm
            + config.section_header.row_height_mm
            + config.section_gap_after_mm
            + 1.0;
        let outcome = run_layout("Jane\n### Skills\n- Rust", &config);
        assert!(outcome.truncated);
        assert_eq!(texts(&outcome), vec!["Jane"]);
    }

    #[test]
    fn test_empty_input_renders_header_rule_only() {
        let config = default_layout_config();
        let outcome = run_layout("", &config);
        assert_eq!(outcome.document.text_runs().count(), 0);
        assert_eq!(outcome.document.lines().count(), 1);
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_overwide_contact_row_clamped_to_margin() {
        let config = default_layout_config();
        let contact = "x".repeat(300);
        let outcome = run_layout(&format!("Jane\n{contact}"), &config);
        let row = outcome.document.text_runs().nth(1).unwrap();
        assert_eq!(row.x_mm, config.margin_left_mm);
    }
}
