//! Maps model output onto the character set the base-14 fonts can draw.
//!
//! Typographic variants are folded to their plain ASCII equivalents, then
//! anything outside printable ASCII (plus newline, carriage return and tab)
//! is dropped. Each substitution is no longer in UTF-8 bytes than the
//! character it replaces, so output is never longer than input.

/// Fixed substitution table, applied before filtering.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2022}', "-"),   // bullet
    ('\u{25CF}', "-"),   // black circle
    ('\u{2013}', "-"),   // en dash
    ('\u{2014}', "-"),   // em dash
    ('\u{2010}', "-"),   // hyphen
    ('\u{2011}', "-"),   // non-breaking hyphen
    ('\u{2018}', "'"),   // left single quote
    ('\u{2019}', "'"),   // right single quote
    ('\u{201C}', "\""),  // left double quote
    ('\u{201D}', "\""),  // right double quote
    ('\u{2026}', "..."), // ellipsis
    ('\u{00A0}', " "),   // no-break space
];

fn substitute(c: char) -> Option<&'static str> {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// True for characters the renderer can draw.
pub fn is_supported(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\t' | ' '..='~')
}

/// Normalises typographic characters and strips everything unsupported.
/// Never fails; the worst case is an empty string.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match substitute(c) {
            Some(plain) => out.push_str(plain),
            None if is_supported(c) => out.push(c),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curly_quote_and_bullet_glyph() {
        assert_eq!(
            sanitize("\u{2022} Jane\u{2019}s project"),
            "- Jane's project"
        );
    }

    #[test]
    fn test_dashes_quotes_and_ellipsis() {
        let input = "2019\u{2013}2023 \u{2014} \u{201C}shipped\u{201D}\u{2026}";
        assert_eq!(sanitize(input), "2019-2023 - \"shipped\"...");
    }

    #[test]
    fn test_unsupported_characters_dropped() {
        assert_eq!(sanitize("Caf\u{00e9} \u{1F680} ok"), "Caf  ok");
        assert_eq!(sanitize("\u{4e2d}\u{6587}"), "");
    }

    #[test]
    fn test_control_whitespace_kept() {
        assert_eq!(sanitize("a\tb\r\nc"), "a\tb\r\nc");
        assert_eq!(sanitize("a\u{0007}b"), "ab");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "plain ascii",
            "\u{2022} bullet \u{2014} dash \u{2026}",
            "mixed \u{00e9}\u{1F600}\u{201C}q\u{201D}\u{00A0}",
            "",
            "\n\n\t",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_output_never_longer_and_always_supported() {
        let samples = [
            "\u{2026}\u{2026}\u{2026}",
            "\u{2018}\u{2019}\u{201C}\u{201D}",
            "r\u{00e9}sum\u{00e9} \u{2013} \u{00A0}",
            "Experience:\n- Built things",
        ];
        for sample in samples {
            let out = sanitize(sample);
            assert!(out.len() <= sample.len(), "{sample:?} grew");
            assert!(out.chars().all(is_supported), "{out:?} has unsupported chars");
        }
    }
}
