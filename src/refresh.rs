// src/refresh.rs
//! Dirty region tracking.
//!
//! Every draw reports the rectangle it touched. The union of those rectangles
//! is what the next refresh pushes to the panel. The top edge is rounded down
//! and the bottom edge rounded up to the panel's vertical refresh granularity.

use crate::config::Profile;
use crate::types::{Area, Bpp};

/// Bounding box of everything drawn since the last refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRegion {
    area: Area,
    screen_width: i32,
    screen_height: i32,
    vertical_alignment: i32,
}

impl DirtyRegion {
    pub fn new(profile: &Profile) -> Self {
        let mut region = Self {
            area: Area::default(),
            screen_width: profile.screen_width as i32,
            screen_height: profile.screen_height as i32,
            vertical_alignment: profile.vertical_alignment.max(1) as i32,
        };
        region.reset();
        region
    }

    /// Back to the empty sentinel in the bottom-right corner.
    ///
    /// The sentinel position makes the next `extend` adopt the new rectangle
    /// as is, since any real top-left corner is above and left of it.
    pub fn reset(&mut self) {
        self.area.x0 = (self.screen_width - 1) as i16;
        self.area.y0 = (self.screen_height - 1) as i16;
        self.area.width = 0;
        self.area.height = 0;
        self.area.bpp = Bpp::Two;
    }

    pub fn is_dirty(&self) -> bool {
        self.area.width != 0 && self.area.height != 0
    }

    /// Current union, meaningful only when [`DirtyRegion::is_dirty`]
    pub fn area(&self) -> Area {
        self.area
    }

    /// Grow the union to include `area`
    pub fn extend(&mut self, area: &Area) {
        if area.is_empty() {
            return;
        }
        let align_mask = !(self.vertical_alignment - 1);
        let mut x0 = self.area.x0 as i32;
        let mut y0 = self.area.y0 as i32;
        let mut x1 = self.area.x1();
        let mut y1 = self.area.y1();

        if (area.x0 as i32) < x0 {
            x0 = (area.x0 as i32).max(0);
        }
        if area.x1() > x1 || self.area.width == 0 {
            x1 = area.x1().min(self.screen_width);
        }
        if (area.y0 as i32) < y0 {
            y0 = (area.y0 as i32).max(0) & align_mask;
        }
        if area.y1() > y1 || self.area.height == 0 {
            y1 = area.y1().min(self.screen_height);
            y1 = ((y1 + self.vertical_alignment - 1) & align_mask).min(self.screen_height);
        }

        self.area.x0 = x0 as i16;
        self.area.y0 = y0 as i16;
        self.area.width = (x1 - x0).max(0) as u16;
        self.area.height = (y1 - y0).max(0) as u16;
        if area.bpp > self.area.bpp {
            self.area.bpp = area.bpp;
        }
    }

    /// Return the union and reset, or `None` if nothing was drawn
    pub fn take(&mut self) -> Option<Area> {
        if !self.is_dirty() {
            return None;
        }
        let area = self.area;
        self.reset();
        Some(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> DirtyRegion {
        DirtyRegion::new(&Profile::STAX)
    }

    fn bounds(r: &DirtyRegion) -> (i16, i16, u16, u16) {
        let a = r.area();
        (a.x0, a.y0, a.width, a.height)
    }

    #[test]
    fn test_reset_sentinel() {
        let r = region();
        assert!(!r.is_dirty(), "Fresh region is clean");
        assert_eq!(bounds(&r), (399, 671, 0, 0), "Sentinel sits in the bottom-right corner");
        assert_eq!(r.area().bpp, Bpp::Two);
    }

    #[test]
    fn test_first_extend_adopts_rect() {
        let mut r = region();
        r.extend(&Area::new(10, 20, 30, 40));
        assert_eq!(bounds(&r), (10, 20, 30, 40), "Aligned rect is adopted as is");
    }

    #[test]
    fn test_vertical_alignment() {
        let mut r = region();
        r.extend(&Area::new(0, 21, 10, 10));
        assert_eq!(bounds(&r), (0, 20, 10, 12), "Top rounds down to 20, bottom 31 rounds up to 32");
    }

    #[test]
    fn test_clamped_to_screen() {
        let mut r = region();
        r.extend(&Area::new(-10, -5, 500, 700));
        assert_eq!(bounds(&r), (0, 0, 400, 672), "Union is clamped to the screen");
    }

    #[test]
    fn test_union_is_order_independent() {
        let rects = [
            Area::new(100, 200, 50, 10),
            Area::new(10, 300, 20, 20),
            Area::new(300, 8, 60, 100),
            Area::new(0, 640, 400, 32),
        ];
        let mut forward = region();
        for rect in &rects {
            forward.extend(rect);
        }
        let mut backward = region();
        for rect in rects.iter().rev() {
            backward.extend(rect);
        }
        let mut shuffled = region();
        for i in [2, 0, 3, 1] {
            shuffled.extend(&rects[i]);
        }
        assert_eq!(bounds(&forward), (0, 8, 400, 664), "Union is the bounding box");
        assert_eq!(bounds(&forward), bounds(&backward), "Union must not depend on order");
        assert_eq!(bounds(&forward), bounds(&shuffled), "Union must not depend on order");
    }

    #[test]
    fn test_reset_then_extend_is_not_polluted() {
        let mut r = region();
        r.extend(&Area::new(0, 0, 400, 672));
        r.reset();
        r.reset();
        assert!(!r.is_dirty(), "Reset is idempotent");
        r.extend(&Area::new(40, 40, 8, 8));
        assert_eq!(bounds(&r), (40, 40, 8, 8), "Previous union must be forgotten");
    }

    #[test]
    fn test_bpp_is_max() {
        let mut r = region();
        r.extend(&Area::new(0, 0, 4, 4).with_bpp(Bpp::Four));
        r.extend(&Area::new(0, 0, 4, 4).with_bpp(Bpp::One));
        assert_eq!(r.area().bpp, Bpp::Four, "Depth keeps the maximum");
    }

    #[test]
    fn test_take_resets() {
        let mut r = region();
        assert_eq!(r.take(), None, "Nothing to take when clean");
        r.extend(&Area::new(0, 0, 4, 4));
        assert!(r.take().is_some());
        assert!(!r.is_dirty(), "Take leaves the region clean");
    }
}
