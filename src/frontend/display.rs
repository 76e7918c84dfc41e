// src/frontend/display.rs
//! `embedded-graphics` frontend.
//!
//! Draws into a [`FrameBuffer`] with the mono fonts bundled with
//! `embedded-graphics`, and copies the requested rectangle to the panel on
//! every refresh. Icons are rendered as labeled placeholders of the right
//! size since bitmap decompression happens outside the engine.

use embedded_graphics::mono_font::ascii::{FONT_9X15, FONT_9X18_BOLD, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_layout::prelude::*;
use log::{debug, warn};

use super::{FrameBuffer, Frontend, TextMetrics};
use crate::icons::Icon;
use crate::types::{Area, Color, FontId, PostRefresh, RefreshMode, Transformation};

/// Extra pixels between two text lines
const LINE_SPACING: u16 = 6;

fn mono_font(font: FontId) -> &'static MonoFont<'static> {
    match font {
        FontId::SmallRegular => &FONT_9X15,
        FontId::SmallBold => &FONT_9X18_BOLD,
        FontId::LargeMedium => &FONT_10X20,
    }
}

/// Frontend backed by any `Rgb565` draw target
pub struct DisplayFrontend<D> {
    panel: D,
    buffer: FrameBuffer,
    ux_task: bool,
    rng_state: u32,
}

impl<D> DisplayFrontend<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    pub fn new(panel: D) -> Self {
        let size = panel.size();
        Self {
            buffer: FrameBuffer::new(size.width as u16, size.height as u16),
            panel,
            ux_task: false,
            rng_state: 0x9E37_79B9,
        }
    }

    /// Seed the keypad shuffle generator
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng_state = seed.max(1);
        self
    }

    pub fn with_ux_task(mut self, ux_task: bool) -> Self {
        self.ux_task = ux_task;
        self
    }

    pub fn panel(&self) -> &D {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut D {
        &mut self.panel
    }
}

impl<D> TextMetrics for DisplayFrontend<D> {
    fn font_height(&self, font: FontId) -> u16 {
        mono_font(font).character_size.height as u16
    }

    fn line_height(&self, font: FontId) -> u16 {
        self.font_height(font) + LINE_SPACING
    }

    fn char_width(&self, font: FontId, c: char) -> u16 {
        if c.is_control() {
            0
        } else {
            let font = mono_font(font);
            (font.character_size.width + font.character_spacing) as u16
        }
    }
}

impl<D> Frontend for DisplayFrontend<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    fn draw_rect(&mut self, area: &Area) {
        let rect: Rectangle = (*area).into();
        let _ = self.buffer.fill_solid(&rect, area.background.to_rgb565());
    }

    fn draw_rounded_rect(&mut self, area: &Area, radius: u16, fill: Color, border: Option<(Color, u8)>) {
        let rect: Rectangle = (*area).into();
        let mut style = PrimitiveStyleBuilder::new().fill_color(fill.to_rgb565());
        if let Some((color, width)) = border {
            style = style.stroke_color(color.to_rgb565()).stroke_width(width as u32);
        }
        let radius = Size::new_equal(radius.min(area.height / 2).min(area.width / 2) as u32);
        let _ = RoundedRectangle::with_equal_corners(rect, radius)
            .into_styled(style.build())
            .draw(&mut self.buffer);
    }

    fn draw_line(&mut self, area: &Area, _dot_start: u8, color: Color) {
        let rect: Rectangle = (*area).into();
        let _ = self.buffer.fill_solid(&rect, color.to_rgb565());
    }

    fn draw_icon(&mut self, area: &Area, _transformation: Transformation, color: Color, icon: &Icon) {
        let bounds: Rectangle = (*area).into();
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(color.to_rgb565())
            .stroke_width(1)
            .build();
        let frame = Rectangle::new(Point::zero(), Size::new(icon.width as u32, icon.height as u32))
            .align_to(&bounds, horizontal::Center, vertical::Center);
        let _ = frame.into_styled(style).draw(&mut self.buffer);

        let mut initial = [0u8; 4];
        let label = icon.name.chars().next().unwrap_or('?').encode_utf8(&mut initial);
        let text_style = MonoTextStyle::new(&FONT_9X15, color.to_rgb565());
        let _ = Text::with_baseline(label, Point::zero(), text_style, Baseline::Top)
            .align_to(&frame, horizontal::Center, vertical::Center)
            .draw(&mut self.buffer);
    }

    fn draw_text(&mut self, area: &Area, text: &str, font: FontId, color: Color) {
        let style = MonoTextStyle::new(mono_font(font), color.to_rgb565());
        let origin = Point::new(area.x0 as i32, area.y0 as i32);
        let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut self.buffer);
    }

    fn draw_qr_code(&mut self, area: &Area, text: &str, color: Color) {
        // Placeholder modules seeded from the payload; real encoding is a backend concern
        const MODULES: u32 = 29;
        let module = (area.width.min(area.height) as u32 / MODULES).max(1);
        let mut seed = text.bytes().fold(0x811C_9DC5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
        for row in 0..MODULES {
            for col in 0..MODULES {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                if seed & 1 == 0 {
                    continue;
                }
                let top_left = Point::new(
                    area.x0 as i32 + (col * module) as i32,
                    area.y0 as i32 + (row * module) as i32,
                );
                let _ = self
                    .buffer
                    .fill_solid(&Rectangle::new(top_left, Size::new_equal(module)), color.to_rgb565());
            }
        }
    }

    fn refresh_area(&mut self, area: &Area, mode: RefreshMode, post: PostRefresh) {
        debug!(" Refresh {:?} ({:?}, {:?})", area, mode, post);
        if let Err(e) = self.buffer.flush_area(&(*area).into(), &mut self.panel) {
            warn!("Panel flush failed: {:?}", e);
        }
    }

    fn current_task_is_ux(&self) -> bool {
        self.ux_task
    }

    fn random_u32_range(&mut self, low: u32, high: u32) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        if high <= low { low } else { low + x % (high - low) }
    }
}
