// src/layout/keyboard.rs
//! Keyboard screens: the keyboard itself (in the footer), the entered text
//! area, and either the suggestion buttons or a confirmation button between
//! them.

use alloc::format;
use alloc::string::ToString;

use log::{debug, warn};

use super::{Layout, LayoutEvent, Role, SwipeUsage};
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::gui::Gui;
use crate::icons;
use crate::obj::keyboard::{self as kbd, KeyboardGeometry};
use crate::obj::{
    IndicatorStyle, KeyboardCase, KeyboardData, KeyboardMode, Obj, ObjHandle, ObjKind, PageIndicatorData,
};
use crate::touch::TouchEvent;
use crate::types::{
    Align, Color, Direction, FontId, INVALID_TOKEN, NO_TUNE, RefreshMode, Transformation, TouchId, TouchType, TuneId,
};

/// Gap between the keyboard and the bottom of the screen
const KEYBOARD_MARGIN_Y: u16 = 56;
/// Gap between the content above the keyboard and the keyboard
const BOTTOM_MARGIN: i16 = 24;
const TOP_MARGIN: i16 = 20;
/// Gap between two suggestion buttons
const INTERNAL_MARGIN: u16 = 8;
/// Room left under the buttons for the page indicator
const INDICATOR_ROOM: u16 = 28;
const INDICATOR_WIDTH: u16 = 184;
/// A horizontal line takes 4 pixels whatever its thickness
const LINE_REAL_HEIGHT: u16 = 4;
const NUMBER_WIDTH: u16 = 56;
const NUMBER_TEXT_SPACE: u16 = 8;

/// Keyboard configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardDesc {
    pub mode: KeyboardMode,
    pub casing: KeyboardCase,
    /// Three rows of letters and backspace only
    pub letters_only: bool,
    /// Bit `i` set disables key `i`
    pub key_mask: u32,
}

#[derive(Debug, Clone, Copy)]
struct EnteredText {
    container: ObjHandle,
    number: Option<ObjHandle>,
    text: ObjHandle,
}

#[derive(Debug, Clone)]
struct Suggestions {
    container: ObjHandle,
    indicator: ObjHandle,
    /// Half buttons hinting at hidden suggestions, left then right
    halves: [ObjHandle; 2],
    buttons: heapless::Vec<ObjHandle, 16>,
    nb_active: u8,
    /// Index of the first visible button
    left: u8,
}

#[derive(Debug, Clone)]
enum Below {
    Suggestions(Suggestions),
    Confirmation(ObjHandle),
}

/// Keyboard related objects of a layout
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyboardArea {
    keyboard: Option<ObjHandle>,
    entered: Option<EnteredText>,
    below: Option<Below>,
}

/// First visible suggestion after a swipe, `None` when the swipe has no effect.
///
/// Swiping left shows the next `visible` suggestions, never scrolling past
/// the last full window; swiping right goes back by `visible`.
pub fn next_suggestion_window(left: u8, nb: u8, visible: u8, swipe: TouchType) -> Option<u8> {
    let next = match swipe {
        TouchType::SwipedLeft => left.saturating_add(visible).min(nb.saturating_sub(visible)),
        TouchType::SwipedRight => left.saturating_sub(visible),
        _ => left,
    };
    (next != left).then_some(next)
}

fn suggestion_button(text: &str) -> ObjKind {
    let mut kind = ObjKind::button(Some(text.to_string()), None, Color::Black);
    if let ObjKind::Button(button) = &mut kind {
        button.radius = 32;
    }
    kind
}

fn set_button_state(obj: &mut Obj, active: bool) -> NbglResult<()> {
    let button = obj.button_mut()?;
    let color = if active { Color::Black } else { Color::LightGray };
    button.inner_color = color;
    button.border_color = color;
    if active {
        obj.touch_mask = TouchType::Touched.mask();
        obj.touch_id = TouchId::BottomButton;
    } else {
        obj.touch_mask = 0;
    }
    Ok(())
}

impl Layout {
    /// Keyboard at the bottom of the screen, occupying the footer.
    ///
    /// Returns the footer height.
    pub fn add_keyboard<F: Frontend>(&mut self, gui: &mut Gui<F>, desc: &KeyboardDesc) -> NbglResult<u16> {
        if self.footer.is_some() {
            warn!("Keyboard added to a layout with a footer");
            return Err(NbglError::MalformedDescriptor("keyboard needs an empty footer"));
        }
        let profile = *gui.profile();
        let mut data = KeyboardData::new(desc.mode, desc.letters_only);
        data.casing = desc.casing;
        data.key_mask = desc.key_mask;
        let height = data.nb_rows() * profile.keyboard_key_height;

        let footer = gui.pool_mut().alloc(
            self.layer,
            Obj::new(ObjKind::container(Direction::Vertical))
                .with_size(profile.screen_width, height + KEYBOARD_MARGIN_Y)
                .with_align(Align::BottomMiddle),
        )?;
        let keyboard = gui.pool_mut().alloc_child(
            footer,
            Obj::new(ObjKind::Keyboard(data))
                .with_size(profile.screen_width, height)
                .with_align(Align::BottomMiddle)
                .with_margins(0, KEYBOARD_MARGIN_Y as i16)
                .with_touch(TouchType::Touched.mask(), TouchId::Keyboard),
        )?;
        self.register(keyboard, INVALID_TOKEN, 0, NO_TUNE, Role::Keyboard)?;

        self.footer = Some(footer);
        self.kbd.keyboard = Some(keyboard);
        self.shrink_container(gui, height + KEYBOARD_MARGIN_Y)?;
        self.sync_screen_children(gui)?;
        debug!(" Keyboard added ({:?}, letters only: {})", desc.mode, desc.letters_only);
        Ok(height + KEYBOARD_MARGIN_Y)
    }

    fn keyboard_handle(&self) -> NbglResult<ObjHandle> {
        self.kbd
            .keyboard
            .ok_or(NbglError::MalformedDescriptor("layout has no keyboard"))
    }

    /// Change the disabled keys, and the casing if given, then redraw
    pub fn update_keyboard<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        key_mask: u32,
        casing: Option<KeyboardCase>,
    ) -> NbglResult<()> {
        let keyboard = self.keyboard_handle()?;
        let data = gui.pool_mut().get_mut(keyboard)?.keyboard_mut()?;
        data.key_mask = key_mask;
        if let Some(casing) = casing {
            data.casing = casing;
        }
        debug!(" Keyboard mask updated to {:#x}", key_mask);
        gui.draw(keyboard)
    }

    /// Whether the keyboard redrew itself since the last call
    pub fn keyboard_needs_refresh<F: Frontend>(&mut self, gui: &mut Gui<F>) -> NbglResult<bool> {
        let keyboard = self.keyboard_handle()?;
        let data = gui.pool_mut().get_mut(keyboard)?.keyboard_mut()?;
        Ok(core::mem::take(&mut data.needs_refresh))
    }

    pub(super) fn on_keyboard_touched<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        slot: usize,
        event: &TouchEvent,
    ) -> NbglResult<Option<LayoutEvent>> {
        if event.kind != TouchType::Touched {
            return Ok(None);
        }
        let keyboard = self.callbacks[slot].obj;
        let key_height = gui.profile().keyboard_key_height;
        let obj = gui.pool_mut().get_mut(keyboard)?;
        let (x0, y0, width) = (obj.area.x0, obj.area.y0, obj.area.width);
        let geometry = KeyboardGeometry::new(width, key_height);
        let data = obj.keyboard_mut()?;
        let outcome = kbd::on_touched(
            data,
            &geometry,
            (event.first.x - x0, event.first.y - y0),
            (event.last.x - x0, event.last.y - y0),
        );
        // a casing reset is refreshed by the caller, together with the entered text
        let deferred = data.needs_refresh;
        if let Some(mode) = outcome.redraw {
            gui.draw(keyboard)?;
            if deferred {
                gui.pool_mut().get_mut(keyboard)?.keyboard_mut()?.needs_refresh = true;
            } else {
                gui.refresh_special(mode);
            }
        }
        Ok(outcome.key.map(LayoutEvent::Key))
    }

    // ------------------------------------------------------------------------
    // Suggestion buttons
    // ------------------------------------------------------------------------

    /// Black suggestion buttons above the keyboard, reporting
    /// `first_token + i` when touched. Only a window of them is visible at a
    /// time; swiping the main container scrolls the window.
    pub fn add_suggestion_buttons<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        texts: &[&str],
        first_token: u8,
        tune: TuneId,
    ) -> NbglResult<()> {
        let profile = *gui.profile();
        if texts.len() > profile.nb_max_suggestion_buttons as usize {
            return Err(NbglError::MalformedDescriptor("too many suggestion buttons"));
        }
        let visible = profile.nb_max_visible_suggestion_buttons.max(1);
        let rows = visible.div_ceil(2) as u16;
        let height = rows * profile.small_button_height + (rows - 1) * INTERNAL_MARGIN + INDICATOR_ROOM;
        let container = gui.pool_mut().alloc(
            self.layer,
            Obj::new(ObjKind::container(Direction::Vertical))
                .with_size(profile.screen_width, height)
                .with_align(Align::BottomMiddle)
                .with_margins(0, BOTTOM_MARGIN),
        )?;

        let button_width = (profile.available_width() - INTERNAL_MARGIN) / 2;
        let mut buttons = heapless::Vec::new();
        for i in 0..profile.nb_max_suggestion_buttons {
            let text = texts.get(i as usize).copied().unwrap_or("");
            let button = gui.pool_mut().alloc(
                self.layer,
                Obj::new(suggestion_button(text))
                    .with_size(button_width, profile.small_button_height)
                    .with_touch(TouchType::Touched.mask(), TouchId::Controls(i)),
            )?;
            self.register(button, first_token.wrapping_add(i), 0, tune, Role::Plain)?;
            buttons
                .push(button)
                .map_err(|_| NbglError::MalformedDescriptor("too many suggestion buttons"))?;
        }

        let indicator = gui.pool_mut().alloc(
            self.layer,
            Obj::new(ObjKind::PageIndicator(PageIndicatorData {
                nb_pages: 0,
                active_page: 0,
                style: IndicatorStyle::CurrentIndicator,
            }))
            .with_size(INDICATOR_WIDTH, 0)
            .with_align(Align::BottomMiddle),
        )?;
        let half = |transformation, align| {
            let mut image = Obj::new(ObjKind::image(icons::LEFT_HALF)).with_align(align);
            if let ObjKind::Image(data) = &mut image.kind {
                data.transformation = transformation;
            }
            image
        };
        let halves = [
            gui.pool_mut()
                .alloc(self.layer, half(Transformation::VerticalMirror, Align::TopLeft))?,
            gui.pool_mut().alloc(self.layer, half(Transformation::None, Align::TopRight))?,
        ];

        let mut suggestions = Suggestions {
            container,
            indicator,
            halves,
            buttons,
            nb_active: texts.len() as u8,
            left: 0,
        };
        self.place_suggestions(gui, &mut suggestions, visible)?;
        gui.pool_mut().add_child(self.container, container)?;

        if let Some(entered) = self.kbd.entered {
            gui.pool_mut().get_mut(entered.container)?.margin_y -= (height as i16 + BOTTOM_MARGIN + TOP_MARGIN) / 2;
        }
        self.register(self.container, 0, 0, NO_TUNE, Role::Plain)?;
        gui.pool_mut().get_mut(self.container)?.touch_mask =
            TouchType::SwipedLeft.mask() | TouchType::SwipedRight.mask();
        self.swipe_usage = Some(SwipeUsage::Suggestions);
        self.kbd.below = Some(Below::Suggestions(suggestions));
        debug!(" {} suggestion buttons added", texts.len());
        Ok(())
    }

    /// Rebuild the suggestion container's children for the current window
    fn place_suggestions<F: Frontend>(
        &self,
        gui: &mut Gui<F>,
        suggestions: &mut Suggestions,
        visible: u8,
    ) -> NbglResult<()> {
        let border = gui.profile().border_margin as i16;
        let nb_pages = suggestions.nb_active.div_ceil(visible);
        let indicator = gui.pool_mut().get_mut(suggestions.indicator)?.page_indicator_mut()?;
        indicator.nb_pages = if nb_pages > 1 { nb_pages } else { 0 };
        indicator.active_page = suggestions.left / visible;

        let mut children = heapless::Vec::<ObjHandle, 20>::new();
        let _ = children.push(suggestions.indicator);
        let end = suggestions.nb_active.min(suggestions.left.saturating_add(visible));
        for (slot, i) in (suggestions.left..end).enumerate() {
            let handle = suggestions.buttons[i as usize];
            let previous = children.last().copied();
            let obj = gui.pool_mut().get_mut(handle)?;
            match (slot % 2, previous) {
                (0, _) if slot == 0 => {
                    obj.align = Align::TopLeft;
                    obj.align_to = None;
                    obj.margin_x = border;
                    obj.margin_y = 0;
                }
                (0, _) => {
                    // first of a new row, below the first of the previous one
                    obj.align = Align::BottomMiddle;
                    obj.align_to = children.get(slot - 1).copied();
                    obj.margin_x = 0;
                    obj.margin_y = INTERNAL_MARGIN as i16;
                }
                (_, previous) => {
                    obj.align = Align::MidRight;
                    obj.align_to = previous;
                    obj.margin_x = INTERNAL_MARGIN as i16;
                    obj.margin_y = 0;
                }
            }
            let _ = children.push(handle);
        }
        if suggestions.left > 0 {
            let _ = children.push(suggestions.halves[0]);
        }
        if end < suggestions.nb_active {
            let _ = children.push(suggestions.halves[1]);
        }

        let container = gui.pool_mut().get_mut(suggestions.container)?.container_mut()?;
        container.children = children;
        container.force_clean = true;
        Ok(())
    }

    /// Replace the suggestion texts, the window going back to the first ones
    pub fn update_suggestion_buttons<F: Frontend>(&mut self, gui: &mut Gui<F>, texts: &[&str]) -> NbglResult<()> {
        let Some(Below::Suggestions(mut suggestions)) = self.kbd.below.clone() else {
            return Err(NbglError::MalformedDescriptor("layout has no suggestion buttons"));
        };
        if texts.len() > suggestions.buttons.len() {
            return Err(NbglError::MalformedDescriptor("too many suggestion buttons"));
        }
        for (i, handle) in suggestions.buttons.iter().enumerate() {
            let button = gui.pool_mut().get_mut(*handle)?.button_mut()?;
            button.text = texts.get(i).map(|text| text.to_string());
        }
        suggestions.nb_active = texts.len() as u8;
        suggestions.left = 0;
        let visible = gui.profile().nb_max_visible_suggestion_buttons.max(1);
        self.place_suggestions(gui, &mut suggestions, visible)?;
        gui.draw(suggestions.container)?;
        self.kbd.below = Some(Below::Suggestions(suggestions));
        Ok(())
    }

    pub(super) fn on_suggestions_swipe<F: Frontend>(&mut self, gui: &mut Gui<F>, kind: TouchType) -> NbglResult<()> {
        let Some(Below::Suggestions(mut suggestions)) = self.kbd.below.clone() else {
            return Ok(());
        };
        let visible = gui.profile().nb_max_visible_suggestion_buttons.max(1);
        let Some(left) = next_suggestion_window(suggestions.left, suggestions.nb_active, visible, kind) else {
            return Ok(());
        };
        debug!(" Suggestion window moved to {}", left);
        suggestions.left = left;
        self.place_suggestions(gui, &mut suggestions, visible)?;
        gui.draw(suggestions.container)?;
        gui.refresh_special(RefreshMode::FullColorPartialRefresh);
        self.kbd.below = Some(Below::Suggestions(suggestions));
        Ok(())
    }

    /// First visible suggestion, for callers tracking the window
    pub fn suggestion_window(&self) -> Option<u8> {
        match &self.kbd.below {
            Some(Below::Suggestions(suggestions)) => Some(suggestions.left),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Entered text
    // ------------------------------------------------------------------------

    /// Underlined entered text, optionally preceded by "n.", centered in the
    /// main container. Touching it reports `token` when valid.
    pub fn add_entered_text<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        number: Option<u8>,
        text: &str,
        grayed_out: bool,
        token: u8,
    ) -> NbglResult<()> {
        let profile = *gui.profile();
        let width = profile.available_width();
        let entry_height = profile.text_entry_height;
        let container = gui.pool_mut().alloc(
            self.layer,
            Obj::new(ObjKind::container(Direction::Vertical))
                .with_size(width, entry_height)
                .with_align(Align::Center),
        )?;

        let number = match number {
            Some(number) => {
                let obj = Obj::new(ObjKind::text(format!("{}.", number), FontId::LargeMedium))
                    .with_text_align(Align::Center)
                    .with_size(NUMBER_WIDTH, entry_height - 2 * LINE_REAL_HEIGHT)
                    .with_align(Align::TopLeft)
                    .with_margins(0, LINE_REAL_HEIGHT as i16);
                Some(gui.pool_mut().alloc_child(container, obj)?)
            }
            None => None,
        };
        let margin_x = number.map_or(0, |_| NUMBER_WIDTH + NUMBER_TEXT_SPACE);
        let mut obj = Obj::new(ObjKind::text(text, FontId::LargeMedium))
            .with_text_color(if grayed_out { Color::LightGray } else { Color::Black })
            .with_size(width - margin_x, entry_height - 2 * LINE_REAL_HEIGHT)
            .with_align(Align::TopLeft)
            .with_margins(margin_x as i16, LINE_REAL_HEIGHT as i16)
            .with_auto_hide();
        if token != INVALID_TOKEN {
            obj = obj.with_touch(TouchType::Touched.mask(), TouchId::EnteredText);
        }
        let text_handle = gui.pool_mut().alloc_child(container, obj)?;
        if token != INVALID_TOKEN {
            self.register(text_handle, token, 0, NO_TUNE, Role::Plain)?;
        }

        let mut line = Obj::new(ObjKind::line(Direction::Horizontal, Color::LightGray, 2))
            .with_size(width, LINE_REAL_HEIGHT)
            .with_align(Align::BottomMiddle);
        if let ObjKind::Line(data) = &mut line.kind {
            data.offset = 2;
        }
        gui.pool_mut().alloc_child(container, line)?;

        let shift = match &self.kbd.below {
            Some(Below::Suggestions(suggestions)) => Some(suggestions.container),
            Some(Below::Confirmation(button)) => Some(*button),
            None => None,
        };
        if let Some(below) = shift {
            let obj = gui.pool().get(below)?;
            let offset = (obj.area.height as i16 + obj.margin_y + TOP_MARGIN) / 2;
            gui.pool_mut().get_mut(container)?.margin_y -= offset;
        }
        gui.pool_mut().add_child(self.container, container)?;
        self.kbd.entered = Some(EnteredText {
            container,
            number,
            text: text_handle,
        });
        Ok(())
    }

    /// Replace the entered text (and number), then redraw.
    ///
    /// Returns `true` when the text is wider than its area, in which case
    /// only its end is shown.
    pub fn update_entered_text<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        number: Option<u8>,
        text: &str,
        grayed_out: bool,
    ) -> NbglResult<bool> {
        let entered = self
            .kbd
            .entered
            .ok_or(NbglError::MalformedDescriptor("layout has no entered text"))?;
        let obj = gui.pool_mut().get_mut(entered.text)?;
        let width = obj.area.width;
        let data = obj.text_area_mut()?;
        data.text.clear();
        data.text.push_str(text);
        data.color = if grayed_out { Color::LightGray } else { Color::Black };
        data.text_align = Align::MidLeft;
        gui.draw(entered.text)?;

        if let (Some(number), Some(handle)) = (number, entered.number) {
            let data = gui.pool_mut().get_mut(handle)?.text_area_mut()?;
            data.text = format!("{}.", number);
            gui.draw(handle)?;
        }
        Ok(gui.frontend().single_line_text_width(FontId::LargeMedium, text) > width)
    }

    // ------------------------------------------------------------------------
    // Confirmation button
    // ------------------------------------------------------------------------

    /// Full width button between the entered text and the keyboard, grayed
    /// out and not touchable while inactive
    pub fn add_confirmation_button<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        active: bool,
        text: &str,
        token: u8,
        tune: TuneId,
    ) -> NbglResult<()> {
        let profile = *gui.profile();
        let mut kind = ObjKind::button(Some(text.to_string()), None, Color::Black);
        if let ObjKind::Button(button) = &mut kind {
            button.foreground = Color::White;
            button.radius = profile.button_diameter / 2;
        }
        let mut obj = Obj::new(kind)
            .with_size(profile.available_width(), profile.button_diameter)
            .with_align(Align::BottomMiddle)
            .with_margins(0, BOTTOM_MARGIN);
        set_button_state(&mut obj, active)?;
        let button = gui.pool_mut().alloc_child(self.container, obj)?;
        self.register(button, token, 0, tune, Role::Plain)?;

        if let Some(entered) = self.kbd.entered {
            let offset = (profile.button_diameter as i16 + BOTTOM_MARGIN + TOP_MARGIN) / 2;
            gui.pool_mut().get_mut(entered.container)?.margin_y -= offset;
        }
        self.kbd.below = Some(Below::Confirmation(button));
        Ok(())
    }

    pub fn update_confirmation_button<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        active: bool,
        text: &str,
    ) -> NbglResult<()> {
        let Some(Below::Confirmation(button)) = self.kbd.below else {
            return Err(NbglError::MalformedDescriptor("layout has no confirmation button"));
        };
        let obj = gui.pool_mut().get_mut(button)?;
        obj.button_mut()?.text = Some(text.to_string());
        set_button_state(obj, active)?;
        gui.draw(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutDescription;
    use crate::layout::tests::{gui, touch};
    use crate::obj::KeyboardKey;
    use crate::touch::TouchPoint;

    #[test]
    fn test_suggestion_window_is_clamped() {
        let left = next_suggestion_window(0, 10, 4, TouchType::SwipedLeft);
        assert_eq!(left, Some(4));
        let left = next_suggestion_window(4, 10, 4, TouchType::SwipedLeft);
        assert_eq!(left, Some(6), "Last window is full");
        assert_eq!(next_suggestion_window(6, 10, 4, TouchType::SwipedLeft), None);
        assert_eq!(next_suggestion_window(6, 10, 4, TouchType::SwipedRight), Some(2));
        assert_eq!(next_suggestion_window(2, 10, 4, TouchType::SwipedRight), Some(0));
        assert_eq!(next_suggestion_window(0, 10, 4, TouchType::SwipedRight), None);
        assert_eq!(next_suggestion_window(0, 3, 4, TouchType::SwipedLeft), None, "Everything visible");
    }

    #[test]
    fn test_keyboard_takes_the_footer() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        let height = layout.add_keyboard(&mut gui, &KeyboardDesc::default()).unwrap();
        assert_eq!(height, 4 * 60 + 56);
        assert_eq!(layout.container_height(&gui).unwrap(), 672 - height);
        assert_eq!(
            layout.add_keyboard(&mut gui, &KeyboardDesc::default()),
            Err(NbglError::MalformedDescriptor("keyboard needs an empty footer"))
        );
    }

    #[test]
    fn test_keyboard_touch_reports_key() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        layout.add_keyboard(&mut gui, &KeyboardDesc::default()).unwrap();
        layout.draw(&mut gui).unwrap();

        let keyboard = layout.kbd.keyboard.unwrap();
        let area = gui.pool().get(keyboard).unwrap().area;
        // first key of the first row
        let point = TouchPoint::new(area.x0 + 5, area.y0 + 5);
        let mut event = touch(keyboard, TouchType::Touched);
        event.first = point;
        event.last = point;
        let result = layout.on_touch(&mut gui, &event).unwrap();
        assert_eq!(result, Some(LayoutEvent::Key(KeyboardKey::Char('q'))));
    }

    #[test]
    fn test_suggestions_scroll_on_swipe() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        layout.add_keyboard(&mut gui, &KeyboardDesc::default()).unwrap();
        layout.add_entered_text(&mut gui, Some(1), "ab", false, 50).unwrap();
        let words = ["abandon", "ability", "able", "about", "above", "absent", "absorb", "abstract", "absurd", "abuse"];
        layout.add_suggestion_buttons(&mut gui, &words, 10, 0).unwrap();
        layout.draw(&mut gui).unwrap();
        assert!(gui.frontend().has_text("abandon"));
        assert!(!gui.frontend().has_text("above"), "Only the first window is shown");

        let container = layout.container();
        layout.on_touch(&mut gui, &touch(container, TouchType::SwipedLeft)).unwrap();
        assert_eq!(layout.suggestion_window(), Some(4));
        layout.on_touch(&mut gui, &touch(container, TouchType::SwipedLeft)).unwrap();
        assert_eq!(layout.suggestion_window(), Some(6));
        layout.on_touch(&mut gui, &touch(container, TouchType::SwipedLeft)).unwrap();
        assert_eq!(layout.suggestion_window(), Some(6), "No-op at the end");
        assert!(gui.frontend().has_text("abuse"));
    }

    #[test]
    fn test_suggestion_button_reports_its_token() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        layout.add_suggestion_buttons(&mut gui, &["alpha", "beta"], 10, 0).unwrap();
        layout.draw(&mut gui).unwrap();
        let beta = layout.callback_obj(1).unwrap().obj;
        let event = layout.on_touch(&mut gui, &touch(beta, TouchType::Touched)).unwrap();
        assert_eq!(
            event,
            Some(LayoutEvent::Action {
                token: 11,
                index: 0,
                tune: 0
            })
        );
    }

    #[test]
    fn test_entered_text_overflow_and_confirmation() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        layout.add_keyboard(&mut gui, &KeyboardDesc::default()).unwrap();
        layout.add_confirmation_button(&mut gui, false, "Confirm", 9, 0).unwrap();
        layout.add_entered_text(&mut gui, None, "", false, INVALID_TOKEN).unwrap();
        layout.draw(&mut gui).unwrap();

        assert!(!layout.update_entered_text(&mut gui, None, "short", false).unwrap());
        let long = "x".repeat(40);
        assert!(layout.update_entered_text(&mut gui, None, &long, false).unwrap(), "400px > 352px");

        let Some(Below::Confirmation(button)) = layout.kbd.below else {
            panic!("Confirmation button expected");
        };
        assert_eq!(gui.pool().get(button).unwrap().touch_mask, 0, "Inactive button not touchable");
        layout.update_confirmation_button(&mut gui, true, "Confirm").unwrap();
        assert_eq!(gui.pool().get(button).unwrap().touch_id, TouchId::BottomButton);
        assert!(layout.update_suggestion_buttons(&mut gui, &["a"]).is_err());
    }
}
