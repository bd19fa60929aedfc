//! Color type, CSS formatting and the dashboard palette.

use serde::{Serialize, Serializer};
use std::fmt;

/// Straight-alpha color as written into SVG and CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Opacity, 255 is solid.
    pub a: u8,
}

impl Rgba {
    /// Solid black, the page background.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Solid white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Solid color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same hue, new opacity byte.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Create a color with alpha given as a fraction in `[0, 1]`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        self.with_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(hex.get(i..=i)?, 16)
                        .ok()
                        .map(|n| n * 17)
                };
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// CSS color string: `rgb(r,g,b)` when opaque, `rgba(r,g,b,a)` otherwise.
    #[must_use]
    pub fn to_css(self) -> String {
        let Self { r, g, b, a } = self;
        match a {
            255 => format!("rgb({r},{g},{b})"),
            _ => format!("rgba({r},{g},{b},{:.3})", f32::from(a) / 255.0),
        }
    }

    /// Blend toward `other`; `t` is clamped to `0..=1` and channels round
    /// to the nearest byte.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: u8, to: u8| {
            let (from, to) = (f64::from(from), f64::from(to));
            (from + (to - from) * t).round() as u8
        };
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// ANSI 24-bit foreground escape.
    #[must_use]
    pub fn ansi_fg(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

/// Color for a correlation coefficient.
///
/// The coefficient is clamped to `[-1, 1]`; -1 is red, +1 is green, and the
/// blue channel is fixed at 60. A missing or NaN coefficient gets
/// [`palette::GRID`].
#[must_use]
pub fn correlation_color(value: Option<f64>) -> Rgba {
    match value.filter(|v| !v.is_nan()) {
        Some(v) => {
            let t = (v.clamp(-1.0, 1.0) + 1.0) / 2.0;
            Rgba::rgb(200, 0, 60).lerp(Rgba::rgb(0, 200, 60), t)
        }
        None => palette::GRID,
    }
}

/// The dark dashboard theme.
pub mod palette {
    use super::Rgba;

    /// Page background.
    pub const PAGE: Rgba = Rgba::BLACK;
    /// Card background.
    pub const CARD: Rgba = Rgba::rgb(11, 11, 11);
    /// Card border.
    pub const BORDER: Rgba = Rgba::rgb(55, 65, 81);
    /// Grid lines and missing heatmap cells.
    pub const GRID: Rgba = Rgba::rgb(31, 41, 55);
    /// Heatmap cells outside the matrix.
    pub const EMPTY_CELL: Rgba = Rgba::rgb(17, 24, 39);
    /// Axis tick labels.
    pub const TICK: Rgba = Rgba::rgb(200, 200, 200);
    /// Titles and legend text.
    pub const TEXT: Rgba = Rgba::WHITE;
    /// Secondary text.
    pub const MUTED: Rgba = Rgba::rgb(156, 163, 175);

    /// Clean heart rate series.
    pub const HR: Rgba = Rgba::rgb(59, 130, 246);
    /// Calibrated heart rate series.
    pub const FINAL_HR: Rgba = Rgba::rgb(239, 68, 68);
    /// Respiration rate series.
    pub const RR: Rgba = Rgba::rgb(251, 113, 133);
    /// Histogram bars.
    pub const HISTOGRAM: Rgba = Rgba::rgb(96, 165, 250);

    /// SQI buckets: high, medium, low.
    pub const SQI_HIGH: Rgba = Rgba::rgb(16, 185, 129);
    /// Medium SQI bucket.
    pub const SQI_MEDIUM: Rgba = Rgba::rgb(245, 158, 11);
    /// Low SQI bucket.
    pub const SQI_LOW: Rgba = Rgba::rgb(239, 68, 68);

    /// Scatter series colors.
    pub const ORANGE: Rgba = Rgba::rgb(249, 115, 22);
    /// Emerald scatter series.
    pub const EMERALD: Rgba = Rgba::rgb(52, 211, 153);
    /// Sky scatter series.
    pub const SKY: Rgba = Rgba::rgb(96, 165, 250);
    /// Pink scatter series.
    pub const PINK: Rgba = Rgba::rgb(244, 114, 182);

    /// Boxplot box fill.
    pub const BOX_FILL: Rgba = Rgba::rgb(17, 24, 39);
    /// Boxplot box outline.
    pub const BOX_STROKE: Rgba = Rgba::rgb(96, 165, 250);
    /// Boxplot whiskers.
    pub const WHISKER: Rgba = Rgba::rgb(156, 163, 175);
    /// Boxplot median tick.
    pub const MEDIAN: Rgba = Rgba::rgb(251, 191, 36);
    /// Boxplot outlier dots.
    pub const OUTLIER: Rgba = Rgba::rgb(239, 68, 68);

    /// Error notices.
    pub const ERROR: Rgba = Rgba::rgb(248, 113, 113);
    /// Informational notices.
    pub const INFO: Rgba = Rgba::rgb(52, 211, 153);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_rounds_and_clamps() {
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 0.5), Rgba::rgb(128, 128, 128));
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, -1.0), Rgba::BLACK);
        assert_eq!(Rgba::BLACK.lerp(Rgba::WHITE, 4.0), Rgba::WHITE);
        assert_eq!(palette::HR.lerp(palette::HR.with_alpha(0), 1.0).a, 0);
    }

    #[test]
    fn test_with_alpha_keeps_hue() {
        let c = palette::HR.with_alpha(10);
        assert_eq!((c.r, c.g, c.b, c.a), (59, 130, 246, 10));
        assert_eq!(c.with_alpha(255), palette::HR);
    }

    #[test]
    fn test_css_opaque_and_alpha() {
        assert_eq!(Rgba::rgb(255, 0, 0).to_css(), "rgb(255,0,0)");
        let css = Rgba::new(255, 0, 0, 128).to_css();
        assert!(css.starts_with("rgba("));
        assert!(css.contains("0.502"));
    }

    #[test]
    fn test_with_opacity() {
        assert_eq!(Rgba::WHITE.with_opacity(0.9).a, 230);
        assert_eq!(Rgba::WHITE.with_opacity(2.0).a, 255);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex("#3b82f6"), Some(palette::HR));
        assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::from_hex("00000080"), Some(Rgba::new(0, 0, 0, 128)));
        assert_eq!(Rgba::from_hex("#12"), None);
        assert_eq!(Rgba::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_serializes_as_css() {
        let json = serde_json::to_string(&palette::SQI_HIGH).unwrap();
        assert_eq!(json, "\"rgb(16,185,129)\"");
    }

    #[test]
    fn test_correlation_color_ramp() {
        assert_eq!(correlation_color(Some(1.0)), Rgba::rgb(0, 200, 60));
        assert_eq!(correlation_color(Some(-1.0)), Rgba::rgb(200, 0, 60));
        assert_eq!(correlation_color(Some(0.0)), Rgba::rgb(100, 100, 60));
        assert_eq!(correlation_color(Some(3.0)), Rgba::rgb(0, 200, 60));
        assert_eq!(correlation_color(None), palette::GRID);
        assert_eq!(correlation_color(Some(f64::NAN)), palette::GRID);
    }
}
