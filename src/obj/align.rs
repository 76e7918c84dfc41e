// src/obj/align.rs
//! Position resolution.
//!
//! An object without alignment flows after its previous sibling in the
//! parent's direction. Otherwise it is anchored inside its parent, or outside
//! of the sibling given by `align_to`.

use log::{debug, error};

use super::Obj;
use crate::types::{Align, Area, Direction};

/// Compute `(rel_x0, rel_y0)` of `obj`.
///
/// `reference` is the `align_to` sibling, `None` meaning the parent. `prev`
/// is the previous flow sibling, used only without alignment.
pub fn relative_position(
    obj: &Obj,
    parent: &Area,
    direction: Direction,
    reference: Option<&Obj>,
    prev: Option<&Obj>,
) -> (i16, i16) {
    let mx = obj.margin_x as i32;
    let my = obj.margin_y as i32;
    let w = obj.area.width as i32;
    let h = obj.area.height as i32;

    let (x, y) = if obj.align == Align::NoAlignment {
        match direction {
            Direction::Vertical => {
                let y = match prev {
                    Some(p) => p.rel_y0 as i32 + p.area.height as i32 + my,
                    None => my,
                };
                (mx, y)
            }
            Direction::Horizontal => {
                let x = match prev {
                    Some(p) => p.rel_x0 as i32 + p.area.width as i32 + mx,
                    None => mx,
                };
                (x, my)
            }
        }
    } else if let Some(sibling) = reference {
        let rx = sibling.rel_x0 as i32;
        let ry = sibling.rel_y0 as i32;
        let rw = sibling.area.width as i32;
        let rh = sibling.area.height as i32;
        match obj.align {
            Align::TopLeft => (rx + mx, ry - h - my),
            Align::TopMiddle => (rx + (rw - w) / 2 + mx, ry - h - my),
            Align::TopRight => (rx + (rw - w) - mx, ry - h - my),
            Align::LeftTop => (rx - w - mx, ry + my),
            Align::MidLeft => (rx - w - mx, ry + (rh - h) / 2 + my),
            Align::LeftBottom => (rx - w - mx, ry + (rh - h) + my),
            Align::RightTop => (rx + rw + mx, ry + my),
            Align::MidRight => (rx + rw + mx, ry + (rh - h) / 2 + my),
            Align::RightBottom => (rx + rw + mx, ry + (rh - h) + my),
            Align::BottomLeft => (rx + mx, ry + rh + my),
            Align::BottomMiddle => (rx + (rw - w) / 2 + mx, ry + rh + my),
            Align::BottomRight => (rx + (rw - w) - mx, ry + rh + my),
            Align::Center | Align::NoAlignment => (obj.rel_x0 as i32, obj.rel_y0 as i32),
        }
    } else {
        let pw = parent.width as i32;
        let ph = parent.height as i32;
        match obj.align {
            Align::TopLeft => (mx, my),
            Align::TopMiddle => ((pw - w) / 2 + mx, my),
            Align::TopRight => ((pw - w) - mx, my),
            Align::MidLeft => (mx, (ph - h) / 2 + my),
            Align::Center => ((pw - w) / 2 + mx, (ph - h) / 2 + my),
            Align::MidRight => ((pw - w) - mx, (ph - h) / 2 + my),
            Align::BottomLeft => (mx, (ph - h) - my),
            Align::BottomMiddle => ((pw - w) / 2 + mx, (ph - h) - my),
            Align::BottomRight => ((pw - w) - mx, (ph - h) - my),
            // outside anchors make no sense against the parent
            _ => (obj.rel_x0 as i32, obj.rel_y0 as i32),
        }
    };
    (x as i16, y as i16)
}

/// Absolute top-left corner from the parent's corner and a relative offset.
///
/// An object crossing the right or bottom edge of the screen is a layout bug:
/// it trips a debug assertion, and release builds clamp it back inside.
pub fn absolute_position(
    parent: &Area,
    rel: (i16, i16),
    width: u16,
    height: u16,
    screen_width: u16,
    screen_height: u16,
) -> (i16, i16) {
    let x0 = parent.x0 as i32 + rel.0 as i32;
    let y0 = parent.y0 as i32 + rel.1 as i32;
    let overflow = x0 + width as i32 > screen_width as i32 || y0 + height as i32 > screen_height as i32;
    debug_assert!(
        !overflow,
        "object at ({}, {}) size {}x{} exceeds the screen",
        x0, y0, width, height
    );
    if overflow {
        error!("Object at ({}, {}) size {}x{} exceeds the screen", x0, y0, width, height);
        return clamp_to_screen(x0, y0, width, height, screen_width, screen_height);
    }
    debug!(" Position resolved to ({}, {})", x0, y0);
    (x0 as i16, y0 as i16)
}

/// Move a box back inside the screen, keeping its size when possible
pub fn clamp_to_screen(
    x0: i32,
    y0: i32,
    width: u16,
    height: u16,
    screen_width: u16,
    screen_height: u16,
) -> (i16, i16) {
    let x = x0.min(screen_width as i32 - width as i32).max(0);
    let y = y0.min(screen_height as i32 - height as i32).max(0);
    (x as i16, y as i16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::ObjKind;

    fn boxed(w: u16, h: u16) -> Obj {
        Obj::new(ObjKind::Spinner { position: 0 }).with_size(w, h)
    }

    #[test]
    fn test_bottom_right_inside_parent() {
        let parent = Area::new(0, 0, 100, 50);
        let child = boxed(20, 10).with_align(Align::BottomRight).with_margins(4, 6);
        let rel = relative_position(&child, &parent, Direction::Vertical, None, None);
        assert_eq!(rel, (76, 34), "100-20-4 and 50-10-6");
    }

    #[test]
    fn test_center_inside_parent() {
        let parent = Area::new(0, 0, 100, 50);
        let child = boxed(20, 10).with_align(Align::Center);
        assert_eq!(relative_position(&child, &parent, Direction::Vertical, None, None), (40, 20));
    }

    #[test]
    fn test_vertical_flow() {
        let parent = Area::new(0, 0, 100, 200);
        let mut prev = boxed(100, 30).with_margins(0, 10);
        prev.rel_y0 = 10;
        let next = boxed(100, 30).with_margins(8, 12);
        assert_eq!(
            relative_position(&next, &parent, Direction::Vertical, None, Some(&prev)),
            (8, 52),
            "Stacks below the previous sibling plus margin"
        );
        assert_eq!(
            relative_position(&next, &parent, Direction::Vertical, None, None),
            (8, 12),
            "First child only uses its margins"
        );
    }

    #[test]
    fn test_horizontal_flow() {
        let parent = Area::new(0, 0, 400, 100);
        let mut prev = boxed(40, 30);
        prev.rel_x0 = 24;
        let next = boxed(40, 30).with_margins(16, 4);
        assert_eq!(
            relative_position(&next, &parent, Direction::Horizontal, None, Some(&prev)),
            (80, 4)
        );
    }

    #[test]
    fn test_outside_anchors() {
        let parent = Area::new(0, 0, 400, 400);
        let mut sibling = boxed(100, 40);
        sibling.rel_x0 = 50;
        sibling.rel_y0 = 100;

        let below = boxed(20, 10).with_align(Align::BottomLeft).with_margins(0, 4);
        assert_eq!(
            relative_position(&below, &parent, Direction::Vertical, Some(&sibling), None),
            (50, 144)
        );
        let right = boxed(20, 10).with_align(Align::MidRight).with_margins(8, 0);
        assert_eq!(
            relative_position(&right, &parent, Direction::Vertical, Some(&sibling), None),
            (158, 115)
        );
        let above = boxed(20, 10).with_align(Align::TopMiddle);
        assert_eq!(
            relative_position(&above, &parent, Direction::Vertical, Some(&sibling), None),
            (90, 90)
        );
        let left = boxed(20, 10).with_align(Align::LeftBottom);
        assert_eq!(
            relative_position(&left, &parent, Direction::Vertical, Some(&sibling), None),
            (30, 130)
        );
    }

    #[test]
    fn test_absolute_adds_parent_corner() {
        let parent = Area::new(24, 88, 352, 400);
        assert_eq!(absolute_position(&parent, (10, 12), 20, 20, 400, 672), (34, 100));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "exceeds the screen")]
    fn test_overflow_asserts_in_debug() {
        let parent = Area::new(300, 0, 100, 100);
        absolute_position(&parent, (50, 0), 100, 10, 400, 672);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_overflow_clamps_in_release() {
        let parent = Area::new(300, 0, 100, 100);
        assert_eq!(absolute_position(&parent, (50, 0), 100, 10, 400, 672), (300, 0));
    }

    #[test]
    fn test_clamp_to_screen() {
        assert_eq!(clamp_to_screen(350, 700, 100, 10, 400, 672), (300, 662));
        assert_eq!(clamp_to_screen(-5, -5, 10, 10, 400, 672), (0, 0));
    }
}
