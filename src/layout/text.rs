use crate::font::{encode_win_ansi, FontSpec};
use crate::units::{Mm, Pt};

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Measures and wraps text for a given font selection.
///
/// Implementations must be pure: measuring never depends on (or changes) any
/// drawing state, so wrapping can be computed long before anything is drawn
/// and can be tested without a page.
pub trait TextMeasurer {
    /// Width of a single line of text
    fn text_width(&self, text: &str, font: &FontSpec) -> Mm;

    /// Vertical distance between the tops of two consecutive lines
    fn line_height(&self, font: &FontSpec) -> Mm;

    /// Distance from the top of a line box down to the text baseline
    fn baseline_offset(&self, font: &FontSpec) -> Mm {
        let em: Mm = font.size.into();
        (self.line_height(font) - em) / 2.0 + em * 0.8
    }

    /// Height of a single line of `text`; zero for empty text
    fn measure(&self, text: &str, font: &FontSpec) -> Mm {
        if text.is_empty() {
            Mm::ZERO
        } else {
            self.line_height(font)
        }
    }

    /// Wraps `text` greedily on whitespace so that each line fits within
    /// `max_width`. A token that is wider than `max_width` on its own is kept
    /// whole on its own line. Newlines force a break. Returns no lines for
    /// empty or whitespace-only input.
    fn wrap(&self, text: &str, font: &FontSpec, max_width: Mm) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut lines: Vec<String> = Vec::new();

        for paragraph in text.split('\n') {
            let mut line = String::new();

            for token in paragraph.split_whitespace() {
                if line.is_empty() {
                    line.push_str(token);
                    continue;
                }

                // a line's width is always measured whole, never summed per token
                let candidate = format!("{line} {token}");
                if self.text_width(&candidate, font) <= max_width {
                    line = candidate;
                } else {
                    lines.push(std::mem::replace(&mut line, token.to_string()));
                }
            }

            // blank paragraphs still occupy a line
            lines.push(line);
        }

        lines
    }

    /// Height of `text` once wrapped to `max_width`, at `line_height` per line
    fn wrapped_height(&self, text: &str, font: &FontSpec, max_width: Mm, line_height: Mm) -> Mm {
        line_height * self.wrap(text, font, max_width).len() as f32
    }
}

/// Measures text set in the PDF standard fonts, using their AFM advance widths
#[derive(Debug, Default, Copy, Clone)]
pub struct StandardMetrics;

impl TextMeasurer for StandardMetrics {
    fn text_width(&self, text: &str, font: &FontSpec) -> Mm {
        let standard = font.standard_font();
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|byte| standard.advance(byte) as u32)
            .sum();
        Pt(units as f32 * font.size.0 / 1000.0).into()
    }

    fn line_height(&self, font: &FontSpec) -> Mm {
        Pt(font.size.0 * LINE_HEIGHT_FACTOR).into()
    }
}
