// src/frontend/framebuffer.rs
//! RAM back buffer for [`DisplayFrontend`](super::DisplayFrontend).
//!
//! All primitives land in this buffer first. The engine's dirty region then
//! decides which rectangle is pushed to the panel on refresh, so the panel
//! only ever receives the area that was actually redrawn.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

/// Heap-allocated `Rgb565` back buffer implementing `DrawTarget`
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    /// Allocate a white buffer of the given size
    pub fn new(width: u16, height: u16) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            pixels: vec![Rgb565::WHITE; width * height],
            width,
            height,
        }
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * self.width + x;
        if let Some(pixel) = self.pixels.get_mut(idx) {
            *pixel = color;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x < self.width && y < self.height {
            self.pixels.get(y * self.width + x).copied()
        } else {
            None
        }
    }

    /// Copy `area` of the buffer to a panel.
    ///
    /// The area is clipped to the buffer; an empty intersection is a no-op.
    pub fn flush_area<D>(&self, area: &Rectangle, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let clipped = area.intersection(&self.bounding_box());
        if clipped.is_zero_sized() {
            return Ok(());
        }
        let min_x = clipped.top_left.x as usize;
        let min_y = clipped.top_left.y as usize;
        let width = clipped.size.width as usize;
        let height = clipped.size.height as usize;

        debug!("Flushing {}x{} region at ({}, {})", width, height, min_x, min_y);

        let pixels = &self.pixels;
        let stride = self.width;
        let pixel_iter = (min_y..min_y + height).flat_map(move |y| {
            let row_start = y * stride + min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&clipped, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as usize) < self.width
                && (coord.y as usize) < self.height
            {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        if clipped.is_zero_sized() {
            return Ok(());
        }
        let x_start = clipped.top_left.x as usize;
        let y_start = clipped.top_left.y as usize;
        for y in y_start..y_start + clipped.size.height as usize {
            for x in x_start..x_start + clipped.size.width as usize {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    #[test]
    fn test_fill_solid_is_clipped() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill_solid(&Rectangle::new(Point::new(6, 6), Size::new(10, 10)), Rgb565::BLACK)
            .unwrap();
        assert_eq!(fb.pixel(7, 7), Some(Rgb565::BLACK), "Inside part is filled");
        assert_eq!(fb.pixel(5, 5), Some(Rgb565::WHITE), "Outside part untouched");
    }

    #[test]
    fn test_flush_area_only_sends_requested_region() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill_solid(&Rectangle::new(Point::zero(), Size::new(8, 8)), Rgb565::BLACK)
            .unwrap();
        let mut panel: MockDisplay<Rgb565> = MockDisplay::new();
        fb.flush_area(&Rectangle::new(Point::new(1, 1), Size::new(2, 2)), &mut panel)
            .unwrap();
        assert_eq!(
            panel.affected_area(),
            Rectangle::new(Point::new(1, 1), Size::new(2, 2)),
            "Panel must only receive the refreshed area"
        );
    }
}
