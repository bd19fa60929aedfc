//! Output encoders (SVG, HTML, terminal).

mod html;
mod svg;
mod terminal;

pub use html::{Block, HtmlReport, Section};
pub use svg::{escape_xml, Paint, SvgElement, SvgEncoder, TextAnchor};
pub use terminal::{TerminalEncoder, TerminalMode};

use serde::Serialize;

/// Placeholder shown for a missing scalar.
pub const MISSING: &str = "-";

/// A titled card of `label: value` rows, shared by the HTML and terminal
/// renderers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Card {
    /// Heading.
    pub title: String,
    /// Rows in display order.
    pub rows: Vec<(String, String)>,
}

impl Card {
    /// Create an empty card.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    #[must_use]
    pub fn row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push((label.into(), value.into()));
        self
    }

    /// Value of the first row with `label`.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

/// Format an optional number with `precision` decimals, or [`MISSING`].
#[must_use]
pub fn fixed(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.precision$}"),
        _ => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_formats_or_dashes() {
        assert_eq!(fixed(Some(72.456), 2), "72.46");
        assert_eq!(fixed(Some(0.5), 3), "0.500");
        assert_eq!(fixed(None, 2), "-");
        assert_eq!(fixed(Some(f64::NAN), 2), "-");
    }

    #[test]
    fn test_card_rows() {
        let card = Card::new("Overview").row("Runs", "12").row("Avg HR", "-");
        assert_eq!(card.value("Runs"), Some("12"));
        assert_eq!(card.value("Avg HR"), Some("-"));
        assert_eq!(card.value("Avg RR"), None);
    }
}
