//! Self-contained HTML report with inline SVG charts.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use super::{escape_xml, Card};
use crate::error::Result;
use crate::notify::{Notice, NoticeKind};
use crate::plots::Plot;

/// One block inside a report section.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A rendered chart.
    Chart {
        /// Caption above the chart.
        title: String,
        /// SVG markup.
        svg: String,
    },
    /// An absent dataset.
    NoData {
        /// Caption above the placeholder.
        title: String,
    },
    /// A card of scalar rows.
    Card(Card),
}

/// A titled group of blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    /// Section heading.
    pub title: String,
    /// Blocks in display order.
    pub blocks: Vec<Block>,
}

impl Section {
    /// Create an empty section.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    /// Add a rendered plot.
    #[must_use]
    pub fn plot(mut self, title: &str, plot: &impl Plot) -> Self {
        self.blocks.push(Block::Chart {
            title: title.to_string(),
            svg: plot.render_svg(),
        });
        self
    }

    /// Add a plot, or a "No data" placeholder when absent.
    #[must_use]
    pub fn plot_or_empty<P: Plot>(self, title: &str, plot: Option<&P>) -> Self {
        match plot {
            Some(p) => self.plot(title, p),
            None => self.empty(title),
        }
    }

    /// Add a "No data" placeholder.
    #[must_use]
    pub fn empty(mut self, title: &str) -> Self {
        self.blocks.push(Block::NoData {
            title: title.to_string(),
        });
        self
    }

    /// Add a card.
    #[must_use]
    pub fn card(mut self, card: Card) -> Self {
        self.blocks.push(Block::Card(card));
        self
    }
}

/// HTML page builder.
#[derive(Debug, Clone, Default)]
pub struct HtmlReport {
    title: String,
    subtitle: Option<String>,
    notices: Vec<Notice>,
    sections: Vec<Section>,
    footer: Option<String>,
}

impl HtmlReport {
    /// Create a report with a page title.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Set the line under the title.
    #[must_use]
    pub fn subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    /// Add a notice banner.
    #[must_use]
    pub fn notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    /// Append a section.
    #[must_use]
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Set the footer text.
    #[must_use]
    pub fn footer(mut self, footer: &str) -> Self {
        self.footer = Some(footer.to_string());
        self
    }

    /// Sections added so far.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Render the page.
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::with_capacity(16 * 1024);
        let title = escape_xml(&self.title);
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
{STYLE}
</style>
</head>
<body>
<h1>{title}</h1>
"#
        );
        if let Some(sub) = &self.subtitle {
            let _ = writeln!(html, r#"<p class="subtitle">{}</p>"#, escape_xml(sub));
        }

        for notice in &self.notices {
            let class = match notice.kind {
                NoticeKind::Info => "notice info",
                NoticeKind::Error => "notice error",
            };
            let _ = writeln!(
                html,
                r#"<div class="{class}"><strong>{}</strong> {}</div>"#,
                escape_xml(&notice.title),
                escape_xml(&notice.message)
            );
        }

        for section in &self.sections {
            let _ = writeln!(
                html,
                "<section>\n<h2>{}</h2>\n<div class=\"grid\">",
                escape_xml(&section.title)
            );
            for block in &section.blocks {
                render_block(&mut html, block);
            }
            html.push_str("</div>\n</section>\n");
        }

        if let Some(footer) = &self.footer {
            let _ = writeln!(html, "<footer>{}</footer>", escape_xml(footer));
        }
        html.push_str("</body>\n</html>\n");
        html
    }

    /// Write the page to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }
}

fn render_block(html: &mut String, block: &Block) {
    match block {
        Block::Chart { title, svg } => {
            let _ = writeln!(
                html,
                "<div class=\"card\">\n<h3>{}</h3>\n{svg}</div>",
                escape_xml(title)
            );
        }
        Block::NoData { title } => {
            let _ = writeln!(
                html,
                "<div class=\"card\">\n<h3>{}</h3>\n<div class=\"empty\">No data</div>\n</div>",
                escape_xml(title)
            );
        }
        Block::Card(card) => {
            let _ = writeln!(html, "<div class=\"card\">\n<h3>{}</h3>", escape_xml(&card.title));
            for (label, value) in &card.rows {
                let _ = writeln!(
                    html,
                    "<p>{}: <span class=\"value\">{}</span></p>",
                    escape_xml(label),
                    escape_xml(value)
                );
            }
            html.push_str("</div>\n");
        }
    }
}

const STYLE: &str = "\
* { box-sizing: border-box; }
body {
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  margin: 0; padding: 24px; background: #000; color: #fff;
}
h1 { font-size: 2.5em; margin-bottom: 4px; }
h2 { font-size: 1.4em; margin: 32px 0 12px; }
h3 { font-size: 1em; margin: 0 0 8px; color: #e5e7eb; }
.subtitle { color: #9ca3af; margin-top: 0; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(360px, 1fr)); gap: 20px; }
.card {
  background: #0f0f0f; border: 1px solid #374151; border-radius: 12px;
  padding: 20px; overflow-x: auto;
}
.card p { margin: 4px 0; font-size: 0.9em; color: #d1d5db; }
.value { font-weight: 500; color: #f3f4f6; }
.empty { color: #9ca3af; }
.notice { border-radius: 8px; padding: 12px 16px; margin: 8px 0; }
.notice.info { background: #064e3b; }
.notice.error { background: #7f1d1d; }
footer { text-align: center; margin: 32px 0 8px; color: #9ca3af; font-size: 0.85em; }";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::BoxPlot;

    #[test]
    fn test_report_structure() {
        let html = HtmlReport::new("Statistics")
            .subtitle("3 runs")
            .section(Section::new("Overview").card(Card::new("Overview").row("Avg HR", "-")))
            .section(
                Section::new("Boxplots")
                    .plot("Range_SD", &BoxPlot::from_data([1.0, 2.0, 3.0]))
                    .empty("Heart_clean"),
            )
            .footer("Radarix")
            .render();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Overview</h2>"));
        assert!(html.contains(r#"Avg HR: <span class="value">-</span>"#));
        assert!(html.contains("<svg"));
        assert!(html.contains(r#"<div class="empty">No data</div>"#));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_report_escapes_text() {
        let html = HtmlReport::new("A & B")
            .notice(Notice::error("Oops", "<script>"))
            .render();
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"class="notice error""#));
    }

    #[test]
    fn test_plot_or_empty() {
        let none: Option<&BoxPlot> = None;
        let section = Section::new("x").plot_or_empty("a", none);
        assert_eq!(section.blocks, vec![Block::NoData { title: "a".into() }]);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        HtmlReport::new("Statistics").write_to_file(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<h1>Statistics</h1>"));
    }
}
