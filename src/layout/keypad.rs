// src/layout/keypad.rs
//! PIN entry: the keypad at the bottom of the main container, and either
//! hidden digits (dots) or the entered digits in clear above it.

use log::debug;

use super::{Layout, LayoutEvent, Role};
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::gui::Gui;
use crate::icons;
use crate::obj::keypad as pad;
use crate::obj::{KeypadData, Obj, ObjHandle, ObjKind};
use crate::touch::TouchEvent;
use crate::types::{Align, Color, Direction, FontId, INVALID_TOKEN, NO_TUNE, TouchId, TouchType};

/// Max digits shown as dots
pub const KEYPAD_MAX_DIGITS: u8 = 12;

const HIDDEN_DIGITS_HEIGHT: u16 = 48;
/// Gap between the title and the dots
const HIDDEN_DIGITS_MARGIN_Y: i16 = 20;
const ENTERED_DIGITS_SIDE_MARGIN: u16 = 32;
const ENTERED_DIGITS_MARGIN_Y: i16 = 12;

/// Keypad related objects of a layout
#[derive(Debug, Clone, Default)]
pub(crate) struct KeypadArea {
    keypad: Option<ObjHandle>,
    dots: heapless::Vec<ObjHandle, { KEYPAD_MAX_DIGITS as usize }>,
    entered: Option<ObjHandle>,
}

impl Layout {
    /// Digits keypad at the bottom of the main container, with backspace
    /// and validate disabled until [`Layout::update_keypad`]
    pub fn add_keypad<F: Frontend>(&mut self, gui: &mut Gui<F>, shuffled: bool) -> NbglResult<()> {
        let profile = *gui.profile();
        let obj = Obj::new(ObjKind::Keypad(KeypadData::new(shuffled)))
            .with_size(profile.screen_width, 4 * profile.keypad_key_height)
            .with_align(Align::BottomMiddle)
            .with_touch(TouchType::Touched.mask(), TouchId::Keypad);
        let keypad = self.add_object(gui, obj)?;
        self.register(keypad, INVALID_TOKEN, 0, NO_TUNE, Role::Keypad)?;
        self.pad.keypad = Some(keypad);
        debug!(" Keypad added (shuffled: {})", shuffled);
        Ok(())
    }

    /// Enable or disable the three kinds of keys, then redraw
    pub fn update_keypad<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        enable_validate: bool,
        enable_backspace: bool,
        enable_digits: bool,
    ) -> NbglResult<()> {
        let keypad = self
            .pad
            .keypad
            .ok_or(NbglError::MalformedDescriptor("layout has no keypad"))?;
        let data = gui.pool_mut().get_mut(keypad)?.keypad_mut()?;
        data.enable_validate = enable_validate;
        data.enable_backspace = enable_backspace;
        data.enable_digits = enable_digits;
        debug!(
            " Keypad keys: validate {}, backspace {}, digits {}",
            enable_validate, enable_backspace, enable_digits
        );
        gui.draw(keypad)
    }

    pub(super) fn on_keypad_touched<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        slot: usize,
        event: &TouchEvent,
    ) -> NbglResult<Option<LayoutEvent>> {
        if event.kind != TouchType::Touched {
            return Ok(None);
        }
        let keypad = self.callbacks[slot].obj;
        let key_height = gui.profile().keypad_key_height;
        let obj = gui.pool_mut().get_mut(keypad)?;
        let (x0, y0, width) = (obj.area.x0, obj.area.y0, obj.area.width);
        let key = pad::on_touched(
            obj.keypad_mut()?,
            width,
            key_height,
            (event.first.x - x0, event.first.y - y0),
            (event.last.x - x0, event.last.y - y0),
        );
        Ok(key.map(LayoutEvent::Keypad))
    }

    /// Row of `nb_digits` empty dots below the last object, underlined
    pub fn add_hidden_digits<F: Frontend>(&mut self, gui: &mut Gui<F>, nb_digits: u8) -> NbglResult<()> {
        if nb_digits == 0 || nb_digits > KEYPAD_MAX_DIGITS {
            return Err(NbglError::MalformedDescriptor("invalid number of hidden digits"));
        }
        let space: u16 = if nb_digits > 8 { 4 } else { 12 };
        let dot = icons::ROUND_24;
        let width = nb_digits as u16 * dot.width + (nb_digits as u16 + 1) * space;

        let mut container = Obj::new(ObjKind::container(Direction::Horizontal))
            .with_size(width, HIDDEN_DIGITS_HEIGHT)
            .with_margins(0, HIDDEN_DIGITS_MARGIN_Y);
        container = match self.last_object(gui)? {
            Some(title) => container.with_align_to(title, Align::BottomMiddle),
            None => container.with_align(Align::TopMiddle),
        };
        let container = self.add_object(gui, container)?;

        self.pad.dots.clear();
        let mut previous: Option<ObjHandle> = None;
        for _ in 0..nb_digits {
            let mut image = Obj::new(ObjKind::image(dot)).with_margins(space as i16, 0);
            if let ObjKind::Image(data) = &mut image.kind {
                data.foreground = Color::White;
            }
            image = match previous {
                Some(previous) => image.with_align_to(previous, Align::MidRight),
                None => image.with_margins(space as i16, ((HIDDEN_DIGITS_HEIGHT - dot.height) / 2) as i16),
            };
            let handle = gui.pool_mut().alloc_child(container, image)?;
            let _ = self.pad.dots.push(handle);
            previous = Some(handle);
        }

        let mut line = Obj::new(ObjKind::line(Direction::Horizontal, Color::LightGray, 2))
            .with_size(width, 4)
            .with_align(Align::BottomMiddle);
        if let ObjKind::Line(data) = &mut line.kind {
            data.offset = 2;
        }
        gui.pool_mut().alloc_child(container, line)?;
        Ok(())
    }

    /// Fill the first `nb_active` dots, empty the others; only the dots
    /// that changed are redrawn
    pub fn update_hidden_digits<F: Frontend>(&mut self, gui: &mut Gui<F>, nb_active: u8) -> NbglResult<()> {
        let count = self.pad.dots.len() as u8;
        if nb_active > count {
            return Err(NbglError::ElementOutOfRange {
                index: nb_active as i32,
                count,
            });
        }
        for (i, dot) in self.pad.dots.iter().enumerate() {
            let color = if (i as u8) < nb_active { Color::Black } else { Color::White };
            let image = gui.pool_mut().get_mut(*dot)?.image_mut()?;
            if image.foreground != color {
                image.foreground = color;
                gui.draw(*dot)?;
            }
        }
        Ok(())
    }

    /// Digits in clear on an underline, `offset_y` below the last object
    pub fn add_entered_digits<F: Frontend>(&mut self, gui: &mut Gui<F>, text: &str, offset_y: i16) -> NbglResult<()> {
        let profile = *gui.profile();
        let width = profile.screen_width - 2 * ENTERED_DIGITS_SIDE_MARGIN;
        let mut line = Obj::new(ObjKind::line(Direction::Horizontal, Color::LightGray, 2))
            .with_size(width, 4)
            .with_margins(0, offset_y);
        line = match self.last_object(gui)? {
            Some(last) => line.with_align_to(last, Align::TopMiddle),
            None => line.with_align(Align::TopMiddle),
        };
        if let ObjKind::Line(data) = &mut line.kind {
            data.offset = 2;
        }
        let line = self.add_object(gui, line)?;

        let height = gui.frontend().line_height(FontId::LargeMedium);
        let entered = Obj::new(ObjKind::text(text, FontId::LargeMedium))
            .with_size(width, height)
            .with_align_to(line, Align::TopLeft)
            .with_margins(0, ENTERED_DIGITS_MARGIN_Y)
            .with_auto_hide();
        self.pad.entered = Some(self.add_object(gui, entered)?);
        Ok(())
    }

    /// Replace the entered digits; returns `true` when they overflow their area
    pub fn update_entered_digits<F: Frontend>(&mut self, gui: &mut Gui<F>, text: &str) -> NbglResult<bool> {
        let entered = self
            .pad
            .entered
            .ok_or(NbglError::MalformedDescriptor("layout has no entered digits"))?;
        let obj = gui.pool_mut().get_mut(entered)?;
        let width = obj.area.width;
        let data = obj.text_area_mut()?;
        data.text.clear();
        data.text.push_str(text);
        data.color = Color::Black;
        data.text_align = Align::MidLeft;
        gui.draw(entered)?;
        Ok(gui.frontend().single_line_text_width(FontId::LargeMedium, text) > width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutDescription;
    use crate::layout::tests::{gui, touch};
    use crate::obj::KeypadKey;
    use crate::touch::TouchPoint;

    fn press(layout: &mut Layout, gui: &mut Gui<crate::frontend::MockFrontend>, dx: i16, dy: i16) -> Option<LayoutEvent> {
        let keypad = layout.pad.keypad.unwrap();
        let area = gui.pool().get(keypad).unwrap().area;
        let point = TouchPoint::new(area.x0 + dx, area.y0 + dy);
        let mut event = touch(keypad, TouchType::Touched);
        event.first = point;
        event.last = point;
        layout.on_touch(gui, &event).unwrap()
    }

    #[test]
    fn test_keypad_keys_follow_enablement() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        layout.add_keypad(&mut gui, false).unwrap();
        layout.draw(&mut gui).unwrap();

        assert_eq!(press(&mut layout, &mut gui, 10, 10), Some(LayoutEvent::Keypad(KeypadKey::Digit(1))));
        // bottom left key is backspace, disabled at first
        assert_eq!(press(&mut layout, &mut gui, 10, 3 * 104 + 10), None);

        layout.update_keypad(&mut gui, true, true, false).unwrap();
        assert_eq!(press(&mut layout, &mut gui, 10, 3 * 104 + 10), Some(LayoutEvent::Keypad(KeypadKey::Backspace)));
        assert_eq!(press(&mut layout, &mut gui, 10, 10), None, "Digits disabled");
        assert_eq!(press(&mut layout, &mut gui, 390, 3 * 104 + 10), Some(LayoutEvent::Keypad(KeypadKey::Validate)));
    }

    #[test]
    fn test_hidden_digits_fill_and_empty() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        assert!(layout.add_hidden_digits(&mut gui, 13).is_err(), "At most 12 dots");
        layout.add_hidden_digits(&mut gui, 4).unwrap();
        layout.draw(&mut gui).unwrap();

        let container = layout.last_object(&gui).unwrap().unwrap();
        assert_eq!(gui.pool().get(container).unwrap().area.width, 4 * 24 + 5 * 12);

        layout.update_hidden_digits(&mut gui, 3).unwrap();
        let colors = |gui: &mut Gui<crate::frontend::MockFrontend>, layout: &Layout| -> alloc::vec::Vec<Color> {
            layout
                .pad
                .dots
                .iter()
                .map(|dot| gui.pool_mut().get_mut(*dot).unwrap().image_mut().unwrap().foreground)
                .collect()
        };
        assert_eq!(colors(&mut gui, &layout), [Color::Black, Color::Black, Color::Black, Color::White]);
        layout.update_hidden_digits(&mut gui, 1).unwrap();
        assert_eq!(colors(&mut gui, &layout), [Color::Black, Color::White, Color::White, Color::White]);
        assert_eq!(
            layout.update_hidden_digits(&mut gui, 5),
            Err(NbglError::ElementOutOfRange { index: 5, count: 4 })
        );
    }

    #[test]
    fn test_entered_digits_overflow() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        layout.add_entered_digits(&mut gui, "", 0).unwrap();
        layout.draw(&mut gui).unwrap();
        assert!(!layout.update_entered_digits(&mut gui, "1234").unwrap());
        assert!(gui.frontend().has_text("1234"));
        let long = "1".repeat(34);
        assert!(layout.update_entered_digits(&mut gui, &long).unwrap(), "340px > 336px");
    }
}
