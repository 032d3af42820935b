//! Page geometry and typography for the single-page document layout.
//!
//! All lengths are millimetres measured from the top-left corner of the page;
//! font sizes are points. The PDF backend converts to its own coordinate space.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{FontFace, PT_PER_MM};
use crate::layout::RenderError;

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Components scaled to 0.0..=1.0.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// Font state applied to a run of rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub face: FontFace,
    pub size_pt: f32,
    pub color: Rgb,
    /// Vertical space one row of this style consumes.
    pub row_height_mm: f32,
}

impl TextStyle {
    /// Offset from the top of a row to the text baseline, centring the cap height
    /// inside the row.
    pub fn baseline_offset_mm(&self) -> f32 {
        let cap_height_mm = 0.7 * self.size_pt / PT_PER_MM;
        (self.row_height_mm + cap_height_mm) / 2.0
    }
}

/// A horizontal stroke style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleStyle {
    pub width_mm: f32,
    pub color: Rgb,
    pub gap_before_mm: f32,
    pub gap_after_mm: f32,
}

/// Layout parameters for a single generated document page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    pub margin_top_mm: f32,
    /// Cursor limit past which nothing more is placed on the page.
    pub fullness_threshold_mm: f32,

    /// Number of lines after the title that may hold contact details.
    pub contact_zone_lines: usize,
    pub contact_separator: String,

    pub title: TextStyle,
    pub contact: TextStyle,
    /// Gap between the contact row and the header rule, and again below the rule.
    pub header_gap_mm: f32,
    pub header_rule: RuleStyle,

    pub section_header: TextStyle,
    pub section_gap_before_mm: f32,
    pub section_gap_after_mm: f32,
    pub uppercase_section_headers: bool,

    pub bullet: TextStyle,
    pub bullet_marker: String,
    /// Bullet text offset from the left margin.
    pub bullet_indent_mm: f32,
    /// Extra offset for wrapped bullet continuation rows.
    pub continuation_indent_mm: f32,
    /// Character budget per bullet row, marker included.
    pub bullet_width_chars: usize,

    pub body: TextStyle,
    pub body_width_chars: usize,

    pub rule: RuleStyle,
    pub blank_gap_mm: f32,
}

impl LayoutConfig {
    /// Right edge of the text area.
    pub fn content_right_mm(&self) -> f32 {
        self.page_width_mm - self.margin_right_mm
    }

    pub fn content_width_mm(&self) -> f32 {
        self.content_right_mm() - self.margin_left_mm
    }

    /// Rejects configurations the engine cannot lay out sensibly.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.body_width_chars == 0 || self.bullet_width_chars == 0 {
            return Err(RenderError::InvalidConfig(
                "width budgets must be at least one character".to_string(),
            ));
        }
        if self.content_width_mm() <= 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "margins ({} + {}) leave no room on a {}mm page",
                self.margin_left_mm, self.margin_right_mm, self.page_width_mm
            )));
        }
        let rows = [
            self.title.row_height_mm,
            self.contact.row_height_mm,
            self.section_header.row_height_mm,
            self.bullet.row_height_mm,
            self.body.row_height_mm,
        ];
        if rows.iter().any(|h| *h <= 0.0) {
            return Err(RenderError::InvalidConfig(
                "row heights must be positive".to_string(),
            ));
        }
        if self.fullness_threshold_mm <= self.margin_top_mm
            || self.fullness_threshold_mm > self.page_height_mm
        {
            return Err(RenderError::InvalidConfig(format!(
                "fullness threshold {}mm must lie between the top margin ({}mm) and the page height ({}mm)",
                self.fullness_threshold_mm, self.margin_top_mm, self.page_height_mm
            )));
        }
        Ok(())
    }
}

/// Returns the default layout: A4 portrait, Helvetica, 10mm side margins and a
/// 15mm bottom margin acting as the fullness threshold.
pub fn default_layout_config() -> LayoutConfig {
    let regular = |size_pt: f32, row_height_mm: f32| TextStyle {
        face: FontFace::Regular,
        size_pt,
        color: Rgb::BLACK,
        row_height_mm,
    };

    LayoutConfig {
        page_width_mm: 210.0,
        page_height_mm: 297.0,
        margin_left_mm: 10.0,
        margin_right_mm: 10.0,
        margin_top_mm: 10.0,
        fullness_threshold_mm: 282.0,

        contact_zone_lines: 2,
        contact_separator: " | ".to_string(),

        title: TextStyle {
            face: FontFace::Bold,
            size_pt: 20.0,
            color: Rgb::BLACK,
            row_height_mm: 12.0,
        },
        contact: regular(12.0, 8.0),
        header_gap_mm: 5.0,
        header_rule: RuleStyle {
            width_mm: 0.5,
            color: Rgb::BLACK,
            gap_before_mm: 0.0,
            gap_after_mm: 0.0,
        },

        section_header: TextStyle {
            face: FontFace::Bold,
            size_pt: 14.0,
            color: Rgb(31, 56, 100),
            row_height_mm: 10.0,
        },
        section_gap_before_mm: 4.0,
        section_gap_after_mm: 1.0,
        uppercase_section_headers: true,

        bullet: regular(12.0, 8.0),
        bullet_marker: "- ".to_string(),
        bullet_indent_mm: 10.0,
        continuation_indent_mm: 4.0,
        bullet_width_chars: 84,

        body: regular(12.0, 8.0),
        body_width_chars: 92,

        rule: RuleStyle {
            width_mm: 0.2,
            color: Rgb(180, 180, 180),
            gap_before_mm: 2.0,
            gap_after_mm: 2.0,
        },
        blank_gap_mm: 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = default_layout_config();
        assert!(config.validate().is_ok());
        assert!((config.content_width_mm() - 190.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_width_budget_rejected() {
        let mut config = default_layout_config();
        config.body_width_chars = 0;
        assert!(matches!(
            config.validate(),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_threshold_below_top_margin_rejected() {
        let mut config = default_layout_config();
        config.fullness_threshold_mm = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_past_page_rejected() {
        let mut config = default_layout_config();
        config.fullness_threshold_mm = 400.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_baseline_sits_inside_row() {
        let style = default_layout_config().body;
        let offset = style.baseline_offset_mm();
        assert!(offset > 0.0 && offset < style.row_height_mm);
    }

    #[test]
    fn test_rgb_unit() {
        assert_eq!(Rgb(255, 0, 0).unit(), (1.0, 0.0, 0.0));
    }
}
