// src/obj/text.rs
//! Text area line breaking and truncation.
//!
//! Two truncation policies exist:
//! * `auto_hide_long_line`: a single line whose head is replaced by `"..."`
//!   so the end of the string stays visible (addresses, entered values);
//! * `nb_max_lines`: body text limited to N lines, the tail of the last line
//!   being replaced by `"..."`.

use alloc::vec::Vec;

use super::TextAreaData;
use crate::frontend::TextMetrics;
use crate::types::{Align, Area};

pub const ELLIPSIS: &str = "...";

/// One string drawn at one place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRun<'a> {
    pub area: Area,
    pub text: &'a str,
}

/// Byte offset `n` characters before `end` in `text`
fn back_chars(text: &str, end: usize, n: usize) -> usize {
    text.get(..end)
        .and_then(|prefix| prefix.char_indices().rev().nth(n.saturating_sub(1)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Split `data.text` into the runs to draw in `area`
pub fn text_area_runs<'a, M>(metrics: &M, data: &'a TextAreaData, area: &Area) -> Vec<TextRun<'a>>
where
    M: TextMetrics + ?Sized,
{
    let font = data.font;
    let font_height = metrics.font_height(font);
    let line_height = metrics.line_height(font);
    let mut runs = Vec::new();
    let text = data.text.as_str();

    let run_area = |x0: i32, y0: i32, width: u16| {
        Area::new(x0 as i16, y0 as i16, width, font_height).with_background(area.background)
    };

    if data.auto_hide_long_line && metrics.single_line_text_width(font, text) > area.width {
        let dots_width = metrics.text_width(font, ELLIPSIS);
        let y0 = area.y0 as i32 + (area.height as i32 - font_height as i32) / 2;
        runs.push(TextRun {
            area: run_area(area.x0 as i32, y0, dots_width),
            text: ELLIPSIS,
        });
        let (len, width) =
            metrics.max_len_and_width_from_end(font, text, area.width.saturating_sub(dots_width));
        let start = text.len().saturating_sub(len);
        runs.push(TextRun {
            area: run_area(area.x0 as i32 + dots_width as i32, y0, width),
            text: text.get(start..).unwrap_or(""),
        });
        return runs;
    }

    let total_lines = metrics.nb_lines_in_width(font, text, area.width, data.wrapping);
    let truncated = data.nb_max_lines > 0 && (data.nb_max_lines as u16) < total_lines;
    let nb_lines = if truncated { data.nb_max_lines as u16 } else { total_lines };
    let text_height = (nb_lines.saturating_sub(1) * line_height + font_height) as i32;
    let mid_height = (area.height as i32 - text_height) / 2;

    let mut rest = text;
    for line in 0..nb_lines {
        let (len, line_width) = metrics.max_len_and_width(font, rest, area.width, data.wrapping);
        let x0 = match data.text_align {
            Align::Center => area.x0 as i32 + (area.width as i32 - line_width as i32) / 2,
            Align::MidRight => area.x0 as i32 + area.width as i32 - line_width as i32,
            _ => area.x0 as i32,
        };
        let y0 = area.y0 as i32 + mid_height + (line * line_height) as i32;
        let len = len.min(rest.len());

        if truncated && line == nb_lines - 1 {
            let dots_width = metrics.single_line_text_width(font, ELLIPSIS);
            let mut visible = len;
            if line_width + dots_width >= area.width {
                visible = back_chars(rest, len, 3);
            }
            let head = rest.get(..visible).unwrap_or("").trim_end_matches('\n');
            let head_width = metrics.text_width_in_len(font, rest, visible);
            if !head.is_empty() {
                runs.push(TextRun {
                    area: run_area(x0, y0, head_width),
                    text: head,
                });
            }
            runs.push(TextRun {
                area: run_area(x0 + head_width as i32, y0, dots_width),
                text: ELLIPSIS,
            });
            return runs;
        }

        let chunk = rest.get(..len).unwrap_or("").trim_end_matches('\n');
        if !chunk.is_empty() {
            runs.push(TextRun {
                area: run_area(x0, y0, line_width),
                text: chunk,
            });
        }
        rest = rest.get(len..).unwrap_or("");
        if len == 0 && !rest.is_empty() {
            // box narrower than one glyph, nothing more can be laid out
            break;
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::MockFrontend;
    use crate::types::FontId;
    use alloc::string::String;

    fn data(text: &str) -> TextAreaData {
        TextAreaData {
            text: String::from(text),
            color: crate::types::Color::Black,
            text_align: Align::MidLeft,
            font: FontId::SmallRegular,
            wrapping: false,
            auto_hide_long_line: false,
            nb_max_lines: 0,
        }
    }

    fn texts<'a>(runs: &[TextRun<'a>]) -> Vec<&'a str> {
        runs.iter().map(|r| r.text).collect()
    }

    #[test]
    fn test_head_truncation() {
        let mut d = data("ABCDEFGHIJKLMNO");
        d.auto_hide_long_line = true;
        let area = Area::new(0, 0, 100, 40);
        let runs = text_area_runs(&MockFrontend::new(), &d, &area);
        assert_eq!(
            texts(&runs),
            ["...", "IJKLMNO"],
            "Ellipsis takes 3 of 10 columns, the last 7 chars follow"
        );
        assert_eq!(runs[1].area.x0, 30, "Tail starts right after the ellipsis");
        assert_eq!(runs[0].area.y0, 6, "Single line is vertically centered");
    }

    #[test]
    fn test_head_truncation_not_needed() {
        let mut d = data("short");
        d.auto_hide_long_line = true;
        let runs = text_area_runs(&MockFrontend::new(), &d, &Area::new(0, 0, 100, 32));
        assert_eq!(texts(&runs), ["short"]);
    }

    #[test]
    fn test_tail_truncation() {
        let mut d = data("0123456789abcdefghijklmnopqrstu");
        d.nb_max_lines = 2;
        let runs = text_area_runs(&MockFrontend::new(), &d, &Area::new(0, 0, 100, 64));
        assert_eq!(
            texts(&runs),
            ["0123456789", "abcdefg", "..."],
            "Last 3 chars of the second line are replaced by the ellipsis"
        );
        assert_eq!(runs[2].area.x0, 70, "Ellipsis follows the kept chars");
    }

    #[test]
    fn test_multi_line_wrapping() {
        let mut d = data("hello world again");
        d.wrapping = true;
        let runs = text_area_runs(&MockFrontend::new(), &d, &Area::new(0, 0, 100, 96));
        assert_eq!(texts(&runs), ["hello ", "world ", "again"]);
        assert_eq!(runs[1].area.y0 - runs[0].area.y0, 32, "Lines are one line height apart");
    }

    #[test]
    fn test_newlines_are_not_drawn() {
        let d = data("ab\ncd");
        let runs = text_area_runs(&MockFrontend::new(), &d, &Area::new(0, 0, 100, 64));
        assert_eq!(texts(&runs), ["ab", "cd"]);
    }

    #[test]
    fn test_centered_text() {
        let mut d = data("abcd");
        d.text_align = Align::Center;
        let runs = text_area_runs(&MockFrontend::new(), &d, &Area::new(0, 0, 100, 32));
        assert_eq!(runs[0].area.x0, 30, "(100 - 40) / 2");
    }
}
