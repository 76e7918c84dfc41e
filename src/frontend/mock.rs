// src/frontend/mock.rs
//! Recording frontend with a monospace font.
//!
//! Every primitive is appended to [`MockFrontend::ops`] so tests can assert on
//! what was drawn and refreshed. All glyphs are [`MockFrontend::CHAR_WIDTH`]
//! pixels wide.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::{Frontend, TextMetrics};
use crate::icons::Icon;
use crate::types::{Area, Color, FontId, PostRefresh, RefreshMode, Transformation};

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect(Area),
    RoundedRect { area: Area, radius: u16, fill: Color },
    Line { area: Area, color: Color },
    Icon { area: Area, name: &'static str, transformation: Transformation, color: Color },
    Text { area: Area, text: String, font: FontId, color: Color },
    QrCode { area: Area, text: String },
    Refresh { area: Area, mode: RefreshMode, post: PostRefresh },
}

/// In-memory frontend used by unit tests and headless runs
#[derive(Debug)]
pub struct MockFrontend {
    pub ops: Vec<DrawOp>,
    /// Value returned by [`Frontend::current_task_is_ux`]
    pub ux_task: bool,
    rng_state: u32,
}

impl MockFrontend {
    pub const CHAR_WIDTH: u16 = 10;

    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            ux_task: false,
            rng_state: 0x1234_5678,
        }
    }

    /// Run as the privileged UX task
    pub fn with_ux_task(mut self, ux_task: bool) -> Self {
        self.ux_task = ux_task;
        self
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// All strings drawn so far, in order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| *t == needle)
    }

    /// All refresh requests so far
    pub fn refreshes(&self) -> Vec<Area> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Refresh { area, .. } => Some(*area),
                _ => None,
            })
            .collect()
    }

    pub fn icons(&self) -> Vec<&'static str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Icon { name, .. } => Some(*name),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMetrics for MockFrontend {
    fn font_height(&self, font: FontId) -> u16 {
        match font {
            FontId::SmallRegular | FontId::SmallBold => 28,
            FontId::LargeMedium => 36,
        }
    }

    fn line_height(&self, font: FontId) -> u16 {
        match font {
            FontId::SmallRegular | FontId::SmallBold => 32,
            FontId::LargeMedium => 40,
        }
    }

    fn char_width(&self, _font: FontId, c: char) -> u16 {
        if c.is_control() { 0 } else { Self::CHAR_WIDTH }
    }
}

impl Frontend for MockFrontend {
    fn draw_rect(&mut self, area: &Area) {
        self.ops.push(DrawOp::Rect(*area));
    }

    fn draw_rounded_rect(&mut self, area: &Area, radius: u16, fill: Color, _border: Option<(Color, u8)>) {
        self.ops.push(DrawOp::RoundedRect {
            area: *area,
            radius,
            fill,
        });
    }

    fn draw_line(&mut self, area: &Area, _dot_start: u8, color: Color) {
        self.ops.push(DrawOp::Line { area: *area, color });
    }

    fn draw_icon(&mut self, area: &Area, transformation: Transformation, color: Color, icon: &Icon) {
        self.ops.push(DrawOp::Icon {
            area: *area,
            name: icon.name,
            transformation,
            color,
        });
    }

    fn draw_text(&mut self, area: &Area, text: &str, font: FontId, color: Color) {
        self.ops.push(DrawOp::Text {
            area: *area,
            text: text.to_string(),
            font,
            color,
        });
    }

    fn draw_qr_code(&mut self, area: &Area, text: &str, _color: Color) {
        self.ops.push(DrawOp::QrCode {
            area: *area,
            text: text.to_string(),
        });
    }

    fn refresh_area(&mut self, area: &Area, mode: RefreshMode, post: PostRefresh) {
        self.ops.push(DrawOp::Refresh {
            area: *area,
            mode,
            post,
        });
    }

    fn current_task_is_ux(&self) -> bool {
        self.ux_task
    }

    fn random_u32_range(&mut self, low: u32, high: u32) -> u32 {
        // xorshift32
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        if high <= low { low } else { low + x % (high - low) }
    }
}
