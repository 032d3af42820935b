//! Line classification for the markup dialect.
//!
//! Two phases: a position-based header zone (title on line 0, then up to
//! `contact_zone_lines` contact lines), followed by a pure content-based
//! classifier for everything else. Classification is total; anything that
//! matches no marker is body text.

use serde::{Deserialize, Serialize};

const HEADER_MARKER: &str = "###";
const BULLET_MARKER: &str = "- ";
const RULE_MARKER: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Title,
    Contact,
    SectionHeader,
    Bullet,
    Rule,
    Blank,
    Body,
}

/// A source line with its kind and display text (markup stripped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    pub index: usize,
    pub kind: LineKind,
    pub text: String,
}

fn is_section_header(trimmed: &str) -> bool {
    trimmed.starts_with(HEADER_MARKER)
}

/// Content-only classification, used outside the header zone.
pub fn classify_content(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if is_section_header(trimmed) {
        LineKind::SectionHeader
    } else if trimmed == RULE_MARKER {
        LineKind::Rule
    } else if line.trim_start().starts_with(BULLET_MARKER) {
        LineKind::Bullet
    } else {
        LineKind::Body
    }
}

/// Classifies `lines[index]`.
///
/// Line 0 is always the title. After it, up to `contact_zone_lines` non-empty
/// lines are contact lines; the first section header closes the zone for the
/// rest of the document. Empty lines inside the zone stay `Contact` (with
/// empty text) rather than `Blank`, and do not count against the budget.
pub fn classify(lines: &[&str], index: usize, contact_zone_lines: usize) -> LineKind {
    let Some(line) = lines.get(index) else {
        return LineKind::Blank;
    };
    if index == 0 {
        return LineKind::Title;
    }
    if in_contact_zone(&lines[1..=index], contact_zone_lines) {
        return LineKind::Contact;
    }
    classify_content(line)
}

/// True when the last of `candidates` (the lines after the title, up to and
/// including the one being classified) still belongs to the contact zone.
fn in_contact_zone(candidates: &[&str], contact_zone_lines: usize) -> bool {
    let mut used = 0;
    for line in candidates {
        let trimmed = line.trim();
        if is_section_header(trimmed) || used >= contact_zone_lines {
            return false;
        }
        if !trimmed.is_empty() {
            used += 1;
        }
    }
    true
}

/// Extracts the display text for a line of the given kind.
pub fn display_text(line: &str, kind: LineKind) -> String {
    let trimmed = line.trim();
    match kind {
        LineKind::SectionHeader => trimmed
            .strip_prefix(HEADER_MARKER)
            .unwrap_or(trimmed)
            .trim()
            .to_string(),
        LineKind::Bullet => line
            .trim_start()
            .strip_prefix(BULLET_MARKER)
            .unwrap_or(trimmed)
            .trim()
            .to_string(),
        LineKind::Rule | LineKind::Blank => String::new(),
        LineKind::Title | LineKind::Contact | LineKind::Body => trimmed.to_string(),
    }
}

/// Splits sanitized text on `\n` and classifies every line.
pub fn classify_document(text: &str, contact_zone_lines: usize) -> Vec<ClassifiedLine> {
    let lines: Vec<&str> = text.split('\n').collect();
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let kind = classify(&lines, index, contact_zone_lines);
            ClassifiedLine {
                index,
                kind,
                text: display_text(line, kind),
            }
        })
        .collect()
}
