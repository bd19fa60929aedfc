//! SVG output encoder.
//!
//! Every chart in the report is a vector SVG built shape by shape, so the
//! HTML page stays self-contained and scales cleanly. Coordinates are
//! written with at most two decimals to keep inline documents small.

use std::fmt::{self, Write as _};
use std::path::Path;

use crate::color::{palette, Rgba};
use crate::error::Result;

/// Fill and outline of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Paint {
    /// Interior color, `None` for `fill="none"`.
    pub fill: Option<Rgba>,
    /// Outline color and width.
    pub stroke: Option<(Rgba, f64)>,
}

impl Paint {
    /// Solid fill, no outline.
    #[must_use]
    pub const fn fill(color: Rgba) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// Outline only.
    #[must_use]
    pub const fn stroke(color: Rgba, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some((color, width)),
        }
    }

    /// Add an outline.
    #[must_use]
    pub const fn outlined(mut self, color: Rgba, width: f64) -> Self {
        self.stroke = Some((color, width));
        self
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fill {
            Some(c) => write!(f, r#" fill="{}""#, c.to_css())?,
            None => f.write_str(r#" fill="none""#)?,
        }
        if let Some((c, w)) = self.stroke {
            write!(f, r#" stroke="{}" stroke-width="{}""#, c.to_css(), Num(w))?;
        }
        Ok(())
    }
}

/// Horizontal alignment of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Left edge at `x`.
    #[default]
    Start,
    /// Centered on `x`.
    Middle,
    /// Right edge at `x`.
    End,
}

impl TextAnchor {
    const fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// One shape of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgElement {
    /// Rectangle with optional rounded corners.
    Rect {
        /// Top-left corner.
        origin: (f64, f64),
        /// Width and height.
        size: (f64, f64),
        /// Corner radius.
        rx: f64,
        /// Fill and outline.
        paint: Paint,
    },
    /// Circle.
    Circle {
        /// Center.
        center: (f64, f64),
        /// Radius.
        r: f64,
        /// Fill and outline.
        paint: Paint,
    },
    /// Straight segment.
    Line {
        /// Start point.
        from: (f64, f64),
        /// End point.
        to: (f64, f64),
        /// Color and width.
        stroke: (Rgba, f64),
    },
    /// Open (`polyline`) or closed (`polygon`) point list.
    Points {
        /// Vertices in drawing order.
        points: Vec<(f64, f64)>,
        /// Whether the shape is closed.
        closed: bool,
        /// Fill and outline.
        paint: Paint,
    },
    /// Raw path data.
    Path {
        /// The `d` attribute.
        d: String,
        /// Fill and outline.
        paint: Paint,
    },
    /// Text run.
    Text {
        /// Anchor point on the baseline.
        at: (f64, f64),
        /// Content, escaped on output.
        text: String,
        /// Font size in pixels.
        size: f64,
        /// Text color.
        color: Rgba,
        /// Alignment.
        anchor: TextAnchor,
        /// Semi-bold weight.
        bold: bool,
    },
}

/// Coordinate formatter: two decimals, no trailing zeros, no `-0`.
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = (self.0 * 100.0).round() / 100.0;
        if r == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{r}")
        }
    }
}

impl SvgElement {
    fn write(&self, out: &mut String, tooltip: Option<&str>) {
        let close = match tooltip {
            Some(t) => format!("><title>{}</title></{}>", escape_xml(t), self.tag()),
            None => "/>".to_string(),
        };
        let _ = match self {
            SvgElement::Rect { origin, size, rx, paint } => {
                let rx = if *rx > 0.0 {
                    format!(r#" rx="{}""#, Num(*rx))
                } else {
                    String::new()
                };
                write!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}"{rx}{paint}{close}"#,
                    Num(origin.0),
                    Num(origin.1),
                    Num(size.0),
                    Num(size.1)
                )
            }
            SvgElement::Circle { center, r, paint } => write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}"{paint}{close}"#,
                Num(center.0),
                Num(center.1),
                Num(*r)
            ),
            SvgElement::Line { from, to, stroke } => write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}{close}"#,
                Num(from.0),
                Num(from.1),
                Num(to.0),
                Num(to.1),
                Paint::stroke(stroke.0, stroke.1)
            ),
            SvgElement::Points { points, paint, .. } => {
                let pts: Vec<String> = points
                    .iter()
                    .map(|(x, y)| format!("{},{}", Num(*x), Num(*y)))
                    .collect();
                write!(out, r#"<{} points="{}"{paint}{close}"#, self.tag(), pts.join(" "))
            }
            SvgElement::Path { d, paint } => {
                write!(out, r#"<path d="{}"{paint}{close}"#, escape_xml(d))
            }
            SvgElement::Text {
                at,
                text,
                size,
                color,
                anchor,
                bold,
            } => {
                let weight = if *bold { r#" font-weight="600""# } else { "" };
                write!(
                    out,
                    concat!(
                        r#"<text x="{}" y="{}" font-size="{}" fill="{}" "#,
                        r#"text-anchor="{}"{}>{}</text>"#
                    ),
                    Num(at.0),
                    Num(at.1),
                    Num(*size),
                    color.to_css(),
                    anchor.as_str(),
                    weight,
                    escape_xml(text)
                )
            }
        };
    }

    fn tag(&self) -> &'static str {
        match self {
            SvgElement::Rect { .. } => "rect",
            SvgElement::Circle { .. } => "circle",
            SvgElement::Line { .. } => "line",
            SvgElement::Points { closed: true, .. } => "polygon",
            SvgElement::Points { closed: false, .. } => "polyline",
            SvgElement::Path { .. } => "path",
            SvgElement::Text { .. } => "text",
        }
    }
}

/// SVG document builder.
///
/// Shapes are drawn in insertion order over an optional background.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    background: Option<Rgba>,
    elements: Vec<(SvgElement, Option<String>)>,
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(640, 360)
    }
}

impl SvgEncoder {
    /// Empty document on the dashboard card color.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(palette::CARD),
            elements: Vec::new(),
        }
    }

    /// Document width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Document height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Background color, `None` for transparent.
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Append any shape.
    #[must_use]
    pub fn push(mut self, element: SvgElement) -> Self {
        self.elements.push((element, None));
        self
    }

    /// Hover text for the shape drawn last.
    #[must_use]
    pub fn tooltip(mut self, text: &str) -> Self {
        if let Some((_, tip)) = self.elements.last_mut() {
            *tip = Some(text.to_string());
        }
        self
    }

    /// Filled rectangle.
    #[must_use]
    pub fn rect(self, x: f64, y: f64, width: f64, height: f64, fill: Rgba) -> Self {
        self.push(SvgElement::Rect {
            origin: (x, y),
            size: (width, height),
            rx: 0.0,
            paint: Paint::fill(fill),
        })
    }

    /// Rounded, outlined rectangle.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn rect_outlined(
        self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
        fill: Rgba,
        stroke: Rgba,
        stroke_width: f64,
    ) -> Self {
        self.push(SvgElement::Rect {
            origin: (x, y),
            size: (width, height),
            rx,
            paint: Paint::fill(fill).outlined(stroke, stroke_width),
        })
    }

    /// Filled circle.
    #[must_use]
    pub fn circle(self, cx: f64, cy: f64, r: f64, fill: Rgba) -> Self {
        self.push(SvgElement::Circle {
            center: (cx, cy),
            r,
            paint: Paint::fill(fill),
        })
    }

    /// Straight segment.
    #[must_use]
    pub fn line(self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Rgba, width: f64) -> Self {
        self.push(SvgElement::Line {
            from: (x1, y1),
            to: (x2, y2),
            stroke: (stroke, width),
        })
    }

    /// Open line through `points`.
    #[must_use]
    pub fn polyline(self, points: &[(f64, f64)], stroke: Rgba, width: f64) -> Self {
        self.push(SvgElement::Points {
            points: points.to_vec(),
            closed: false,
            paint: Paint::stroke(stroke, width),
        })
    }

    /// Closed, filled shape through `points`.
    #[must_use]
    pub fn polygon(
        self,
        points: &[(f64, f64)],
        fill: Rgba,
        stroke: Option<Rgba>,
        width: f64,
    ) -> Self {
        self.push(SvgElement::Points {
            points: points.to_vec(),
            closed: true,
            paint: Paint {
                fill: Some(fill),
                stroke: stroke.map(|s| (s, width)),
            },
        })
    }

    /// Raw path data.
    #[must_use]
    pub fn path(self, d: &str, fill: Option<Rgba>, stroke: Option<Rgba>, width: f64) -> Self {
        self.push(SvgElement::Path {
            d: d.to_string(),
            paint: Paint {
                fill,
                stroke: stroke.map(|s| (s, width)),
            },
        })
    }

    /// Left-aligned text.
    #[must_use]
    pub fn text(self, x: f64, y: f64, text: &str, size: f64, color: Rgba) -> Self {
        self.text_anchored(x, y, text, size, color, TextAnchor::Start)
    }

    /// Aligned text.
    #[must_use]
    pub fn text_anchored(
        self,
        x: f64,
        y: f64,
        text: &str,
        size: f64,
        color: Rgba,
        anchor: TextAnchor,
    ) -> Self {
        self.push(SvgElement::Text {
            at: (x, y),
            text: text.to_string(),
            size,
            color,
            anchor,
            bold: false,
        })
    }

    /// Semi-bold heading text.
    #[must_use]
    pub fn title(self, x: f64, y: f64, text: &str, size: f64, color: Rgba) -> Self {
        self.push(SvgElement::Text {
            at: (x, y),
            text: text.to_string(),
            size,
            color,
            anchor: TextAnchor::Start,
            bold: true,
        })
    }

    /// The document as a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(256 + self.elements.len() * 96);
        let _ = writeln!(
            svg,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" "#,
                r#"viewBox="0 0 {w} {h}" font-family="sans-serif">"#
            ),
            w = self.width,
            h = self.height
        );
        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, bg.to_css());
        }
        for (element, tooltip) in &self.elements {
            svg.push_str("  ");
            element.write(&mut svg, tooltip.as_deref());
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Write the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}

/// Escape text for XML content and attribute values.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
