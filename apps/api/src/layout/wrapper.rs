//! Greedy word wrapping against a character budget.
//!
//! Width is counted in characters, not rendered width. Lines are never broken
//! inside a word: a word longer than the budget is emitted whole on its own row.

/// One wrapped row of a bullet item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// False for the first row (which carries the bullet marker).
    pub continuation: bool,
}

/// Wraps `text` into rows of at most `width_budget` characters.
///
/// Always returns at least one element; empty or all-whitespace input yields a
/// single empty string. Runs of whitespace collapse to a single space.
pub fn wrap(text: &str, width_budget: usize) -> Vec<String> {
    wrap_rows(text, width_budget, width_budget)
}

/// Greedy wrap where the first row has its own budget.
fn wrap_rows(text: &str, first_budget: usize, width_budget: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let budget = if lines.is_empty() { first_budget } else { width_budget };
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= budget {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    lines.push(current);
    lines
}

/// Wraps a bullet item's text, tagging continuation rows.
///
/// The first row shares the budget with the marker, so its text gets
/// `marker_chars` fewer characters.
pub fn wrap_bullet(text: &str, width_budget: usize, marker_chars: usize) -> Vec<Segment> {
    wrap_rows(text, width_budget.saturating_sub(marker_chars), width_budget)
        .into_iter()
        .enumerate()
        .map(|(i, text)| Segment {
            text,
            continuation: i > 0,
        })
        .collect()
}
