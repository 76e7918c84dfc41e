// src/obj/draw.rs
//! Draw dispatcher.
//!
//! Walks a tree depth-first, parent before children and children in array
//! order. Each object resolves its position, inherits its parent's
//! background, issues primitives to the frontend and reports the area it
//! touched to the dirty region.

use alloc::format;

use log::debug;

use super::align::{absolute_position, relative_position};
use super::keyboard::{self, KeyboardGeometry};
use super::keypad;
use super::text::text_area_runs;
use super::{
    ButtonData, IndicatorStyle, NB_MAX_PAGES_WITH_DASHES, ObjHandle, ObjKind, ObjPool,
    PageIndicatorData, ProgressBarData, SPINNER_FIXED,
};
use crate::config::Profile;
use crate::error::NbglResult;
use crate::frontend::Frontend;
use crate::icons;
use crate::refresh::DirtyRegion;
use crate::types::{Area, Color, Direction, FontId, LIGHT_TEXT_COLOR, Transformation};

/// Gap between a button's icon and its text
pub const ICON_TEXT_SPACE: u16 = 12;

pub const RADIO_SIZE: u16 = 32;

pub const SPINNER_WIDTH: u16 = 60;
pub const SPINNER_HEIGHT: u16 = 44;
const SPINNER_DASH_WIDTH: u16 = 22;
const SPINNER_DASH_HEIGHT: u16 = 14;
const SPINNER_DASH_STROKE: u16 = 4;

/// Border stroke of progress bars
const PROGRESS_STROKE: u8 = 2;

/// Page indicator height in dash mode
const PAGE_INDICATOR_HEIGHT: u16 = 4;

/// Everything a draw pass writes to besides the tree itself
pub struct Painter<'a, F: Frontend + ?Sized> {
    pub frontend: &'a mut F,
    pub dirty: &'a mut DirtyRegion,
    pub profile: &'a Profile,
}

impl<F: Frontend + ?Sized> Painter<'_, F> {
    /// Draw `handle` then its descendants.
    ///
    /// `prev` is the previous flow sibling, `compute` whether the position
    /// must be resolved again.
    pub fn draw_obj_and_children(
        &mut self,
        pool: &mut ObjPool,
        handle: ObjHandle,
        prev: Option<ObjHandle>,
        compute: bool,
    ) -> NbglResult<()> {
        self.draw_object(pool, handle, prev, compute)?;

        let children = match pool.get(handle)?.children() {
            Some(children) => children.clone(),
            None => return Ok(()),
        };
        let mut prev_child = None;
        for child in children {
            let align_to = {
                let obj = pool.get_mut(child)?;
                obj.parent = Some(handle);
                obj.align_to
            };
            self.draw_obj_and_children(pool, child, prev_child, true)?;
            if align_to.is_none() {
                prev_child = Some(child);
            }
        }
        Ok(())
    }

    /// Size imposed by the object type, if any
    fn forced_size(&self, kind: &ObjKind) -> Option<(u16, u16)> {
        match kind {
            ObjKind::Image(image) => image.icon.map(|icon| (icon.width, icon.height)),
            ObjKind::Switch(_) => Some((icons::SWITCH.width, icons::SWITCH.height)),
            ObjKind::Radio(_) => Some((RADIO_SIZE, RADIO_SIZE)),
            ObjKind::Spinner { .. } => Some((SPINNER_WIDTH, SPINNER_HEIGHT)),
            _ => None,
        }
    }

    fn draw_object(
        &mut self,
        pool: &mut ObjPool,
        handle: ObjHandle,
        prev: Option<ObjHandle>,
        compute: bool,
    ) -> NbglResult<()> {
        // dimensions forced by the type must be known before positioning
        {
            let forced = self.forced_size(&pool.get(handle)?.kind);
            let page_indicator = match &pool.get(handle)?.kind {
                ObjKind::PageIndicator(p) if p.nb_pages > NB_MAX_PAGES_WITH_DASHES => {
                    let label = format!("{} of {}", p.active_page as u16 + 1, p.nb_pages);
                    let font = FontId::SmallRegular;
                    Some((Some(self.frontend.text_width(font, &label)), self.frontend.font_height(font)))
                }
                ObjKind::PageIndicator(_) => Some((None, PAGE_INDICATOR_HEIGHT)),
                _ => None,
            };
            let obj = pool.get_mut(handle)?;
            if let Some((w, h)) = forced {
                obj.area.width = w;
                obj.area.height = h;
            }
            if let ObjKind::Image(image) = &obj.kind
                && let Some(icon) = image.icon
            {
                obj.area.bpp = icon.bpp;
            }
            if let Some((width, height)) = page_indicator {
                if let Some(width) = width {
                    obj.area.width = width;
                }
                obj.area.height = height;
            }
        }

        let parent_area = match pool.get(handle)?.parent {
            Some(parent) => Some(pool.get(parent)?.area),
            None => None,
        };

        if compute && let Some(parent_area) = parent_area {
            let (rel, width, height) = {
                let obj = pool.get(handle)?;
                let parent = obj.parent.map(|p| pool.get(p)).transpose()?;
                let direction = match parent.map(|p| &p.kind) {
                    Some(ObjKind::Screen(c) | ObjKind::Container(c)) => c.direction,
                    _ => Direction::Vertical,
                };
                let reference = obj.align_to.map(|h| pool.get(h)).transpose()?;
                let prev_obj = prev.map(|h| pool.get(h)).transpose()?;
                (
                    relative_position(obj, &parent_area, direction, reference, prev_obj),
                    obj.area.width,
                    obj.area.height,
                )
            };
            let (x0, y0) = absolute_position(
                &parent_area,
                rel,
                width,
                height,
                self.profile.screen_width,
                self.profile.screen_height,
            );
            let obj = pool.get_mut(handle)?;
            obj.rel_x0 = rel.0;
            obj.rel_y0 = rel.1;
            obj.area.x0 = x0;
            obj.area.y0 = y0;
        }

        let obj = pool.get_mut(handle)?;
        if let Some(parent_area) = parent_area {
            obj.area.background = parent_area.background;
        }
        if matches!(obj.kind, ObjKind::QrCode(_) | ObjKind::Keypad(_)) {
            obj.area.y0 &= !3;
        }
        debug!(
            " Drawing {} at ({}, {}) {}x{}",
            obj.kind.name(),
            obj.area.x0,
            obj.area.y0,
            obj.area.width,
            obj.area.height
        );

        let area = obj.area;
        let frontend = &mut *self.frontend;
        let mut self_reported = false;

        match &mut obj.kind {
            ObjKind::Screen(_) => frontend.draw_rect(&area),
            ObjKind::Container(container) => {
                if container.force_clean {
                    frontend.draw_rect(&area);
                }
            }
            ObjKind::Line(line) => {
                let mut rect = area;
                match line.direction {
                    Direction::Vertical => rect.width = line.thickness as u16,
                    Direction::Horizontal => rect.height = line.thickness as u16,
                }
                obj.area.width = rect.width;
                obj.area.height = rect.height;
                frontend.draw_line(&rect, line.offset, line.color);
            }
            ObjKind::Image(image) => {
                if let Some(icon) = &image.icon {
                    frontend.draw_icon(&area, image.transformation, image.foreground, icon);
                }
            }
            ObjKind::Button(button) => draw_button(frontend, button, &area),
            ObjKind::TextArea(text) => {
                frontend.draw_rect(&area);
                for run in text_area_runs(&*frontend, text, &area) {
                    frontend.draw_text(&run.area, run.text, text.font, text.color);
                }
            }
            ObjKind::Switch(switch) => {
                let color = match switch.state {
                    crate::types::State::On => switch.on_color,
                    crate::types::State::Off => switch.off_color,
                };
                frontend.draw_icon(&area, Transformation::None, color, &icons::SWITCH);
            }
            ObjKind::Radio(radio) => {
                let (icon, color) = match radio.state {
                    crate::types::State::On => (&icons::RADIO_ON, radio.active_color),
                    crate::types::State::Off => (&icons::RADIO_OFF, radio.border_color),
                };
                frontend.draw_icon(&area, Transformation::None, color, icon);
            }
            ObjKind::PageIndicator(indicator) => {
                draw_page_indicator(frontend, indicator, &area, self.profile.inter_dashes)
            }
            ObjKind::ProgressBar(bar) => {
                let reported = draw_progress_bar(frontend, bar, &area);
                self.dirty.extend(&reported);
                self_reported = true;
            }
            ObjKind::Spinner { position } => draw_spinner(frontend, *position, &area),
            ObjKind::QrCode(qr) => frontend.draw_qr_code(&area, &qr.text, qr.foreground),
            ObjKind::Keyboard(data) => {
                let geometry = KeyboardGeometry::new(area.width, self.profile.keyboard_key_height);
                keyboard::draw_keyboard(frontend, data, &area, &geometry);
                data.needs_refresh = false;
            }
            ObjKind::Keypad(data) => {
                data.ensure_digit_order(frontend);
                keypad::draw_keypad(frontend, data, &area, self.profile.keypad_key_height);
            }
        }

        if !self_reported {
            self.dirty.extend(&obj.area);
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Per-type routines
// ----------------------------------------------------------------------------

fn draw_button<F: Frontend + ?Sized>(frontend: &mut F, button: &ButtonData, area: &Area) {
    let border = (button.border_color != button.inner_color).then_some((button.border_color, 2));
    frontend.draw_rounded_rect(area, button.radius, button.inner_color, border);

    let icon_width = button.icon.map(|i| i.width + ICON_TEXT_SPACE).unwrap_or(0);
    let mut text_width = 0;
    if let Some(text) = &button.text {
        let font_height = frontend.font_height(button.font);
        let mut rect = Area::new(
            area.x0 + icon_width as i16,
            area.y0 + ((area.height as i32 - font_height as i32) / 2) as i16,
            area.width.saturating_sub(icon_width),
            font_height,
        )
        .with_background(button.inner_color);
        let (len, width) = frontend.max_len_and_width(button.font, text, rect.width, true);
        text_width = width;
        if width < rect.width {
            rect.x0 += ((rect.width - width) / 2) as i16;
        }
        rect.width = width;
        let shown = text.get(..len.min(text.len())).unwrap_or("");
        frontend.draw_text(&rect, shown, button.font, button.foreground);
    }
    if let Some(icon) = &button.icon {
        let content = if text_width > 0 { text_width + icon.width + ICON_TEXT_SPACE } else { icon.width };
        let rect = Area::new(
            area.x0 + ((area.width as i32 - content as i32) / 2) as i16,
            area.y0 + ((area.height as i32 - icon.height as i32) / 2) as i16,
            icon.width,
            icon.height,
        )
        .with_background(button.inner_color)
        .with_bpp(icon.bpp);
        frontend.draw_icon(&rect, Transformation::None, button.foreground, icon);
    }
}

fn draw_page_indicator<F: Frontend + ?Sized>(
    frontend: &mut F,
    indicator: &PageIndicatorData,
    area: &Area,
    inter_dashes: u16,
) {
    let n = indicator.nb_pages as u16;
    if n < 2 {
        return;
    }
    if indicator.nb_pages <= NB_MAX_PAGES_WITH_DASHES {
        let dash_width = area.width.saturating_sub((n - 1) * inter_dashes) / n;
        let mut rect = Area::new(area.x0, area.y0, dash_width, area.height);
        for i in 0..indicator.nb_pages {
            let color = if i == indicator.active_page {
                Color::Black
            } else if i < indicator.active_page && indicator.style == IndicatorStyle::ProgressiveIndicator {
                Color::Black
            } else {
                Color::LightGray
            };
            rect.background = color;
            frontend.draw_rect(&rect);
            rect.x0 += (dash_width + inter_dashes) as i16;
        }
    } else {
        let label = format!("{} of {}", indicator.active_page as u16 + 1, n);
        frontend.draw_rect(area);
        frontend.draw_text(area, &label, FontId::SmallRegular, LIGHT_TEXT_COLOR);
    }
}

/// Returns the area actually changed
fn draw_progress_bar<F: Frontend + ?Sized>(frontend: &mut F, bar: &mut ProgressBarData, area: &Area) -> Area {
    let full_draw = !bar.partial_redraw;
    if full_draw {
        let border = bar.with_border.then_some((bar.foreground, PROGRESS_STROKE));
        frontend.draw_rounded_rect(area, 0, area.background, border);
        bar.previous_width = 0;
    }
    let bar_width = (bar.state.min(100) as u32 * area.width as u32 / 100) as u16;
    let diff = bar_width as i32 - bar.previous_width as i32;
    let mut bar_area = *area;
    if diff > 0 {
        bar_area.x0 = area.x0 + bar.previous_width as i16;
        bar_area.width = diff as u16;
        frontend.draw_rounded_rect(&bar_area, 0, bar.foreground, None);
    } else if diff < 0 {
        bar_area.x0 = area.x0 + bar_width as i16;
        bar_area.width = (-diff) as u16;
        frontend.draw_rounded_rect(&bar_area, 0, area.background, None);
    }
    bar.partial_redraw = false;
    bar.previous_width = bar_width;
    if full_draw { *area } else { bar_area }
}

fn draw_spinner<F: Frontend + ?Sized>(frontend: &mut F, position: u8, area: &Area) {
    let bg = area.background;
    let fore = if bg == Color::White { Color::Black } else { Color::White };
    let left = area.x0;
    let right = area.x0 + (area.width - SPINNER_DASH_WIDTH) as i16;
    let top = area.y0;
    let bottom = area.y0 + area.height as i16 - 3;
    let corners = [(left, top), (right, top), (right, bottom), (left, bottom)];
    let vertical_right = area.x0 + (area.width - SPINNER_DASH_STROKE) as i16;
    let vertical_bottom = area.y0 + (area.height - SPINNER_DASH_HEIGHT) as i16;
    let verticals = [
        (left, top),
        (vertical_right, top),
        (vertical_right, vertical_bottom),
        (left, vertical_bottom),
    ];

    let draw_corner = |frontend: &mut F, i: usize| {
        let (x, y) = corners[i];
        let dash = Area::new(x, y, SPINNER_DASH_WIDTH, SPINNER_DASH_STROKE).with_background(bg);
        frontend.draw_line(&dash, 0, fore);
        let (x, y) = verticals[i];
        frontend.draw_rect(&Area::new(x, y, SPINNER_DASH_STROKE, SPINNER_DASH_HEIGHT).with_background(fore));
    };

    if position == SPINNER_FIXED {
        for i in 0..4 {
            draw_corner(frontend, i);
        }
    } else if position < 4 {
        frontend.draw_rect(area);
        draw_corner(frontend, position as usize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{DrawOp, MockFrontend};
    use crate::obj::{Obj, ObjKind, ContainerData};
    use crate::types::{Align, Direction, FontId};

    fn screen(pool: &mut ObjPool, profile: &Profile) -> ObjHandle {
        let obj = Obj::new(ObjKind::Screen(ContainerData::default()))
            .with_size(profile.screen_width, profile.screen_height);
        pool.alloc(0, obj).unwrap()
    }

    #[test]
    fn test_children_flow_and_inherit_background() {
        let profile = Profile::STAX;
        let mut pool = ObjPool::new();
        let root = screen(&mut pool, &profile);
        pool.get_mut(root).unwrap().area.background = Color::Black;
        let a = pool
            .alloc_child(root, Obj::new(ObjKind::text("a", FontId::SmallRegular)).with_size(100, 40).with_margins(10, 20))
            .unwrap();
        let b = pool
            .alloc_child(root, Obj::new(ObjKind::text("b", FontId::SmallRegular)).with_size(100, 40).with_margins(10, 8))
            .unwrap();

        let mut frontend = MockFrontend::new();
        let mut dirty = DirtyRegion::new(&profile);
        Painter { frontend: &mut frontend, dirty: &mut dirty, profile: &profile }
            .draw_obj_and_children(&mut pool, root, None, true)
            .unwrap();

        let b_obj = pool.get(b).unwrap();
        assert_eq!((b_obj.area.x0, b_obj.area.y0), (10, 68), "20 + 40 + 8");
        assert_eq!(b_obj.area.background, Color::Black, "Background inherited from the screen");
        assert_eq!(pool.get(a).unwrap().parent, Some(root), "Parent link re-established");
        assert!(dirty.is_dirty());
        assert_eq!(dirty.area().width, profile.screen_width);
    }

    #[test]
    fn test_align_to_sibling_is_not_a_flow_reference() {
        let profile = Profile::STAX;
        let mut pool = ObjPool::new();
        let root = screen(&mut pool, &profile);
        let a = pool
            .alloc_child(root, Obj::new(ObjKind::container(Direction::Vertical)).with_size(100, 50).with_align(Align::TopLeft))
            .unwrap();
        let badge = pool
            .alloc_child(root, Obj::new(ObjKind::container(Direction::Vertical)).with_size(20, 20).with_align_to(a, Align::RightTop))
            .unwrap();
        let next = pool
            .alloc_child(root, Obj::new(ObjKind::container(Direction::Vertical)).with_size(100, 10))
            .unwrap();

        let mut frontend = MockFrontend::new();
        let mut dirty = DirtyRegion::new(&profile);
        Painter { frontend: &mut frontend, dirty: &mut dirty, profile: &profile }
            .draw_obj_and_children(&mut pool, root, None, true)
            .unwrap();

        assert_eq!(pool.get(badge).unwrap().area.x0, 100, "Placed right of the sibling");
        assert_eq!(
            pool.get(next).unwrap().area.y0,
            50,
            "Flow continues after the last child without align_to"
        );
    }

    #[test]
    fn test_progress_bar_reports_only_delta() {
        let profile = Profile::STAX;
        let mut pool = ObjPool::new();
        let root = screen(&mut pool, &profile);
        let bar = pool
            .alloc_child(root, Obj::new(ObjKind::progress_bar(50, false)).with_size(200, 8).with_align(Align::TopLeft))
            .unwrap();
        let mut frontend = MockFrontend::new();
        let mut dirty = DirtyRegion::new(&profile);
        Painter { frontend: &mut frontend, dirty: &mut dirty, profile: &profile }
            .draw_obj_and_children(&mut pool, root, None, true)
            .unwrap();
        dirty.reset();

        {
            let data = pool.get_mut(bar).unwrap().progress_bar_mut().unwrap();
            data.state = 75;
            data.partial_redraw = true;
        }
        Painter { frontend: &mut frontend, dirty: &mut dirty, profile: &profile }
            .draw_obj_and_children(&mut pool, bar, None, false)
            .unwrap();
        let area = dirty.area();
        assert_eq!((area.x0, area.width), (100, 50), "Only the 50..75 % slice is reported");
    }

    #[test]
    fn test_page_indicator_switches_to_text() {
        let mut frontend = MockFrontend::new();
        let indicator = PageIndicatorData { nb_pages: 8, active_page: 2, ..Default::default() };
        draw_page_indicator(&mut frontend, &indicator, &Area::new(0, 0, 60, 28), 10);
        assert_eq!(frontend.texts(), ["3 of 8"]);

        frontend.clear();
        let indicator = PageIndicatorData { nb_pages: 3, active_page: 1, ..Default::default() };
        draw_page_indicator(&mut frontend, &indicator, &Area::new(0, 0, 100, 4), 10);
        let dashes: alloc::vec::Vec<Color> = frontend
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect(a) => Some(a.background),
                _ => None,
            })
            .collect();
        assert_eq!(dashes, [Color::LightGray, Color::Black, Color::LightGray]);
    }

    #[test]
    fn test_spinner_single_corner() {
        let mut frontend = MockFrontend::new();
        draw_spinner(&mut frontend, 1, &Area::new(0, 0, SPINNER_WIDTH, SPINNER_HEIGHT));
        let line = frontend.ops.iter().find_map(|op| match op {
            DrawOp::Line { area, .. } => Some(*area),
            _ => None,
        });
        assert_eq!(line.map(|a| a.x0), Some((SPINNER_WIDTH - SPINNER_DASH_WIDTH) as i16), "Top right dash");
    }
}
