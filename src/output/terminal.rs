//! Terminal output encoder (ASCII/Unicode/ANSI).
//!
//! Renders the statistics page as plain text:
//! - cards as aligned `label: value` blocks
//! - descriptive statistics as a table
//! - histograms as horizontal bars (eighth-block resolution in Unicode mode)
//! - boxplots as a one-line strip plus the five-number caption

use std::fmt::Write as FmtWrite;

use super::{fixed, Card};
use crate::color::{palette, Rgba};
use crate::scale::{LinearScale, Scale};
use crate::stats::{BoxStats, DescriptiveStats, HistogramBins};

/// Terminal rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalMode {
    /// ASCII characters only (widest compatibility)
    Ascii,
    /// Unicode block and box-drawing characters
    #[default]
    Unicode,
    /// Unicode plus ANSI 24-bit color
    AnsiTrueColor,
}

/// Terminal encoder configuration.
#[derive(Debug, Clone)]
pub struct TerminalEncoder {
    mode: TerminalMode,
    width: usize,
}

impl Default for TerminalEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalEncoder {
    /// Partial blocks from one to seven eighths.
    const EIGHTHS: [char; 7] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉'];

    const RESET: &'static str = "\x1b[0m";

    /// Create a new terminal encoder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { mode: TerminalMode::default(), width: 40 }
    }

    /// Set the rendering mode.
    #[must_use]
    pub fn mode(mut self, mode: TerminalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the width of bar and strip graphics in characters.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(8);
        self
    }

    /// Current rendering mode.
    #[must_use]
    pub fn current_mode(&self) -> TerminalMode {
        self.mode
    }

    fn unicode(&self) -> bool {
        self.mode != TerminalMode::Ascii
    }

    fn paint(&self, text: &str, color: Rgba) -> String {
        if self.mode == TerminalMode::AnsiTrueColor {
            format!("{}{text}{}", color.ansi_fg(), Self::RESET)
        } else {
            text.to_string()
        }
    }

    fn heading(&self, title: &str) -> String {
        let rule = if self.unicode() { "─" } else { "-" };
        format!(
            "{}\n{}\n",
            self.paint(title, palette::TEXT),
            rule.repeat(title.chars().count().max(1))
        )
    }

    /// Render a card as aligned rows.
    #[must_use]
    pub fn card(&self, card: &Card) -> String {
        let mut out = self.heading(&card.title);
        let pad = card.rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        for (label, value) in &card.rows {
            let _ = writeln!(out, "  {label:<pad$}  {}", self.paint(value, palette::TEXT));
        }
        out
    }

    /// Render a table of descriptive statistics, one row per column.
    #[must_use]
    pub fn stats_table(&self, rows: &[(&str, DescriptiveStats)]) -> String {
        let pad = rows
            .iter()
            .map(|(l, _)| l.chars().count())
            .max()
            .unwrap_or(0)
            .max("feature".len());
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<pad$}  {:>10} {:>10} {:>10} {:>10} {:>10} {:>6}",
            "feature", "mean", "median", "min", "max", "std", "count"
        );
        let sep = if self.unicode() { '─' } else { '-' };
        let _ = writeln!(out, "{}", sep.to_string().repeat(pad + 2 + 11 * 5 + 7));
        for (label, s) in rows {
            if s.is_empty() {
                let _ = writeln!(
                    out,
                    "{label:<pad$}  {:>10} {:>10} {:>10} {:>10} {:>10} {:>6}",
                    "-", "-", "-", "-", "-", 0
                );
            } else {
                let _ = writeln!(
                    out,
                    "{label:<pad$}  {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>6}",
                    s.mean, s.median, s.min, s.max, s.std, s.count
                );
            }
        }
        out
    }

    /// A horizontal bar `value / max` of the configured width.
    fn bar(&self, value: u64, max: u64) -> String {
        if max == 0 || value == 0 {
            return String::new();
        }
        let cells = value as f64 / max as f64 * self.width as f64;
        if !self.unicode() {
            return "#".repeat(cells.round().max(1.0) as usize);
        }
        let eighths = (cells * 8.0).round().max(1.0) as usize;
        let mut bar = "█".repeat(eighths / 8);
        if eighths % 8 > 0 {
            bar.push(Self::EIGHTHS[eighths % 8 - 1]);
        }
        bar
    }

    /// Render a histogram with one bar per bucket, labeled by bucket midpoint.
    #[must_use]
    pub fn histogram(&self, title: &str, hist: Option<&HistogramBins>) -> String {
        let mut out = self.heading(title);
        let Some(hist) = hist.filter(|h| h.is_renderable()) else {
            out.push_str("  No data\n");
            return out;
        };
        let labels = hist.midpoint_labels(2);
        let pad = labels.iter().map(String::len).max().unwrap_or(0);
        let max = hist.max_count();
        for (label, count) in labels.iter().zip(&hist.counts) {
            let bar = self.paint(&self.bar(*count, max), palette::HISTOGRAM);
            let _ = writeln!(out, "  {label:>pad$} │{bar} {count}");
        }
        if !self.unicode() {
            out = out.replace('│', "|");
        }
        out
    }

    /// Render a boxplot strip with its caption.
    #[must_use]
    pub fn boxplot(&self, title: &str, stats: Option<&BoxStats>) -> String {
        let mut out = self.heading(title);
        let Some(s) = stats else {
            out.push_str("  No data\n");
            return out;
        };
        let _ = writeln!(out, "  {}", self.strip(s));
        for (name, v) in [
            ("min", s.min),
            ("q1", s.q1),
            ("median", s.median),
            ("q3", s.q3),
            ("max", s.max),
        ] {
            let _ = writeln!(out, "  {name}: {v:.3}");
        }
        if !s.outliers.is_empty() {
            let list: Vec<String> = s.outliers.iter().map(|o| fixed(Some(*o), 3)).collect();
            let _ = writeln!(out, "  outliers: {}", list.join(", "));
        }
        out
    }

    fn strip(&self, s: &BoxStats) -> String {
        let (line, cap_l, cap_r, fill, median, dot) = if self.unicode() {
            ('─', '├', '┤', '▒', '┃', '•')
        } else {
            ('-', '|', '|', '=', '#', 'o')
        };
        let n = self.width;
        let x = LinearScale::new((s.min, s.max), (0.0, (n - 1) as f64));
        let at = |v: f64| (x.scale(v).round().max(0.0) as usize).min(n - 1);

        let mut cells = vec![' '; n];
        let (lw, uw) = (at(s.lower_whisker), at(s.upper_whisker));
        for c in &mut cells[lw..=uw.max(lw)] {
            *c = line;
        }
        let (q1, q3) = (at(s.q1), at(s.q3));
        for c in &mut cells[q1..=q3.max(q1)] {
            *c = fill;
        }
        cells[lw] = cap_l;
        cells[uw] = cap_r;
        cells[at(s.median)] = median;
        for o in &s.outliers {
            cells[at(*o)] = dot;
        }

        let mut out = String::with_capacity(n * 4);
        for c in cells {
            let color = match c {
                c if c == fill => palette::BOX_STROKE,
                c if c == median => palette::MEDIAN,
                c if c == dot => palette::OUTLIER,
                _ => palette::WHISKER,
            };
            if c == ' ' {
                out.push(c);
            } else {
                out.push_str(&self.paint(&c.to_string(), color));
            }
        }
        out
    }

    /// Render a rectangular grid of cell texts with row and column labels.
    #[must_use]
    pub fn grid(&self, title: &str, columns: &[String], rows: &[(String, Vec<String>)]) -> String {
        let mut out = self.heading(title);
        if columns.is_empty() {
            out.push_str("  No data\n");
            return out;
        }
        let label_pad = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        let cell_pad = columns
            .iter()
            .map(|c| c.chars().count())
            .chain(rows.iter().flat_map(|(_, r)| r.iter().map(|c| c.chars().count())))
            .max()
            .unwrap_or(1);
        let _ = write!(out, "  {:label_pad$}", "");
        for c in columns {
            let _ = write!(out, " {c:>cell_pad$}");
        }
        out.push('\n');
        for (label, cells) in rows {
            let _ = write!(out, "  {label:<label_pad$}");
            for c in cells {
                let _ = write!(out, " {c:>cell_pad$}");
            }
            out.push('\n');
        }
        out
    }
}
