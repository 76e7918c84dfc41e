// src/frontend/mod.rs
//! Boundary between the engine and the pixel/font backend.
//!
//! The engine never rasterizes anything itself: it computes geometry, then
//! hands rectangles, icons and strings to a [`Frontend`]. Font metrics are
//! exposed separately through [`TextMetrics`] so that pagination can be
//! computed without a drawing surface.

pub mod display;
pub mod framebuffer;
pub mod mock;

pub use display::DisplayFrontend;
pub use framebuffer::FrameBuffer;
pub use mock::{DrawOp, MockFrontend};

use crate::icons::Icon;
use crate::types::{Area, Color, FontId, PostRefresh, RefreshMode, Transformation};

/// Characters where a wrapped line may be broken
fn is_word_delimiter(c: char) -> bool {
    matches!(c, ' ' | '-' | '_')
}

/// Font metrics.
///
/// Only the three required methods are font specific; all lengths returned by
/// the provided methods are byte lengths into the UTF-8 input.
pub trait TextMetrics {
    fn font_height(&self, font: FontId) -> u16;
    fn line_height(&self, font: FontId) -> u16;
    fn char_width(&self, font: FontId, c: char) -> u16;

    /// Width of the first line of `text`
    fn single_line_text_width(&self, font: FontId, text: &str) -> u16 {
        text.chars()
            .take_while(|&c| c != '\n')
            .map(|c| self.char_width(font, c))
            .sum()
    }

    /// Width of the widest line of `text`
    fn text_width(&self, font: FontId, text: &str) -> u16 {
        text.split('\n')
            .map(|line| self.single_line_text_width(font, line))
            .max()
            .unwrap_or(0)
    }

    /// Width of the first `len` bytes of `text`
    fn text_width_in_len(&self, font: FontId, text: &str, len: usize) -> u16 {
        let end = len.min(text.len());
        text.get(..end)
            .map(|prefix| self.single_line_text_width(font, prefix))
            .unwrap_or(0)
    }

    /// Number of bytes of the first line fitting in `max_width`, and their width.
    ///
    /// A `'\n'` ends the line and is counted in the length. When wrapping, an
    /// overflowing line is cut after its last word delimiter.
    fn max_len_and_width(
        &self,
        font: FontId,
        text: &str,
        max_width: u16,
        wrapping: bool,
    ) -> (usize, u16) {
        let mut len = 0usize;
        let mut width = 0u16;
        let mut len_at_delimiter = 0usize;
        let mut width_at_delimiter = 0u16;

        for c in text.chars() {
            if c == '\n' {
                return (len + 1, width);
            }
            let char_width = self.char_width(font, c);
            if char_width == 0 {
                len += c.len_utf8();
                continue;
            }
            if wrapping && is_word_delimiter(c) {
                len_at_delimiter = len;
                width_at_delimiter = width;
            }
            if width + char_width > max_width {
                if wrapping && width_at_delimiter > 0 {
                    return (len_at_delimiter + 1, width_at_delimiter);
                }
                return (len, width);
            }
            len += c.len_utf8();
            width += char_width;
        }
        (len, width)
    }

    /// Number of trailing bytes of `text` fitting in `max_width`, and their width
    fn max_len_and_width_from_end(&self, font: FontId, text: &str, max_width: u16) -> (usize, u16) {
        let mut len = 0usize;
        let mut width = 0u16;
        for c in text.chars().rev() {
            if c == '\n' {
                len += 1;
                continue;
            }
            let char_width = self.char_width(font, c);
            if width + char_width > max_width {
                break;
            }
            len += c.len_utf8();
            width += char_width;
        }
        (len, width)
    }

    /// Number of lines needed to render `text` in `max_width`
    fn nb_lines_in_width(&self, font: FontId, text: &str, max_width: u16, wrapping: bool) -> u16 {
        let chars: alloc::vec::Vec<char> = text.chars().collect();
        let mut nb_lines = 1u16;
        let mut width = 0u16;
        let mut last_delimiter: Option<usize> = None;
        let mut i = 0usize;

        while i < chars.len() {
            let c = chars[i];
            i += 1;
            if wrapping && is_word_delimiter(c) {
                last_delimiter = Some(i);
            }
            if c == '\n' {
                nb_lines += 1;
                width = 0;
                last_delimiter = None;
                continue;
            }
            let char_width = self.char_width(font, c);
            if char_width == 0 {
                continue;
            }
            if width + char_width > max_width {
                match last_delimiter.take() {
                    Some(resume) if wrapping => {
                        i = resume;
                        width = 0;
                    }
                    _ => width = char_width,
                }
                nb_lines += 1;
            } else {
                width += char_width;
            }
        }
        nb_lines
    }

    /// Height of `text` rendered in `max_width`
    fn text_height_in_width(&self, font: FontId, text: &str, max_width: u16, wrapping: bool) -> u16 {
        self.nb_lines_in_width(font, text, max_width, wrapping) * self.line_height(font)
    }
}

/// Pixel primitives, refresh, and environment queries of the device backend
pub trait Frontend: TextMetrics {
    /// Fill `area` with its background color
    fn draw_rect(&mut self, area: &Area);

    /// Fill `area` as a rounded rectangle, optionally with a border of the given stroke
    fn draw_rounded_rect(&mut self, area: &Area, radius: u16, fill: Color, border: Option<(Color, u8)>);

    /// Draw a line filling `area`, starting the dash pattern at `dot_start`
    fn draw_line(&mut self, area: &Area, dot_start: u8, color: Color);

    fn draw_icon(&mut self, area: &Area, transformation: Transformation, color: Color, icon: &Icon);

    /// Draw a single line of text at the top-left corner of `area`
    fn draw_text(&mut self, area: &Area, text: &str, font: FontId, color: Color);

    fn draw_qr_code(&mut self, area: &Area, text: &str, color: Color);

    /// Push the given area of the back buffer to the panel
    fn refresh_area(&mut self, area: &Area, mode: RefreshMode, post: PostRefresh);

    /// Whether the caller runs in the privileged UX context
    fn current_task_is_ux(&self) -> bool {
        false
    }

    /// Uniform random number in `low..high`
    fn random_u32_range(&mut self, low: u32, high: u32) -> u32;
}
