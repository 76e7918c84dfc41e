// src/obj/keypad.rs
//! PIN keypad object: a 3x4 grid of digits with backspace and validate keys.

use log::debug;

use crate::frontend::Frontend;
use crate::icons;
use crate::types::{Area, Color, FontId, Transformation};

const BACKSPACE_KEY_INDEX: u8 = 10;
const VALIDATE_KEY_INDEX: u8 = 11;

/// Key reported to the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadKey {
    Digit(u8),
    Backspace,
    Validate,
}

#[derive(Debug, Clone)]
pub struct KeypadData {
    pub enable_digits: bool,
    pub enable_backspace: bool,
    pub enable_validate: bool,
    pub shuffled: bool,
    /// Digit shown on each of the ten digit keys, chosen at first draw
    pub digit_indexes: Option<[u8; 10]>,
    pub border_color: Color,
    /// Validate key drawn light until the PIN is long enough
    pub soft_validation: bool,
}

impl KeypadData {
    pub fn new(shuffled: bool) -> Self {
        Self {
            enable_digits: true,
            enable_backspace: false,
            enable_validate: false,
            shuffled,
            digit_indexes: None,
            border_color: Color::LightGray,
            soft_validation: false,
        }
    }

    /// Digit on key `slot` (0 is the bottom middle key, 1..=9 the grid)
    fn digit_at(&self, slot: u8) -> u8 {
        match self.digit_indexes {
            Some(indexes) => indexes[slot as usize % 10],
            None => slot,
        }
    }

    /// Pick the digit order, shuffling when requested
    pub fn ensure_digit_order<F: Frontend + ?Sized>(&mut self, frontend: &mut F) {
        if self.digit_indexes.is_some() {
            return;
        }
        let mut indexes = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        if self.shuffled {
            // Fisher-Yates
            for i in 0..9u32 {
                let j = frontend.random_u32_range(i, 10) as usize;
                indexes.swap(i as usize, j.min(9));
            }
            debug!(" Keypad digits shuffled");
        }
        self.digit_indexes = Some(indexes);
    }
}

/// Key slot at `(x, y)` relative to the keypad: 0..=9 for digits, then
/// backspace and validate
pub fn key_index(width: u16, key_height: u16, x: i16, y: i16) -> Option<u8> {
    if x < 0 || y < 0 || key_height == 0 {
        return None;
    }
    let key_width = (width / 3).max(1);
    let col = ((x as u16) / key_width).min(2) as u8;
    match (y as u16) / key_height {
        row @ 0..=2 => Some(1 + row as u8 * 3 + col),
        3 => Some(match col {
            0 => BACKSPACE_KEY_INDEX,
            1 => 0,
            _ => VALIDATE_KEY_INDEX,
        }),
        _ => None,
    }
}

/// Resolve a tap that started at `first` and ended at `last`
pub fn on_touched(
    data: &KeypadData,
    width: u16,
    key_height: u16,
    first: (i16, i16),
    last: (i16, i16),
) -> Option<KeypadKey> {
    let index = key_index(width, key_height, first.0, first.1)?;
    if key_index(width, key_height, last.0, last.1) != Some(index) {
        return None;
    }
    match index {
        0..=9 if data.enable_digits => Some(KeypadKey::Digit(data.digit_at(index))),
        BACKSPACE_KEY_INDEX if data.enable_backspace => Some(KeypadKey::Backspace),
        VALIDATE_KEY_INDEX if data.enable_validate => Some(KeypadKey::Validate),
        _ => None,
    }
}

/// Paint the keypad in `area`
pub fn draw_keypad<F: Frontend + ?Sized>(
    frontend: &mut F,
    data: &KeypadData,
    area: &Area,
    key_height: u16,
) {
    let bg = area.background;
    let key_width = area.width / 3;
    frontend.draw_rect(area);

    for row in 0..4u16 {
        let line = Area::new(area.x0, area.y0 + (row * key_height) as i16, area.width, 1).with_background(bg);
        frontend.draw_line(&line, 1, data.border_color);
    }
    for col in 1..3u16 {
        let line = Area::new(area.x0 + (col * key_width) as i16, area.y0, 1, 4 * key_height).with_background(bg);
        frontend.draw_line(&line, 0, data.border_color);
    }

    let digit_color = if data.enable_digits { Color::Black } else { Color::LightGray };
    let font = FontId::LargeMedium;
    let font_height = frontend.font_height(font);
    let mut buf = [0u8; 4];
    for slot in 0..10u8 {
        let (row, col) = if slot == 0 { (3, 1) } else { ((slot - 1) / 3, (slot - 1) % 3) };
        let digit = data.digit_at(slot);
        let label = char::from(b'0' + digit).encode_utf8(&mut buf);
        let width = frontend.text_width(font, label);
        let text_area = Area::new(
            area.x0 + (col as u16 * key_width + (key_width - width) / 2) as i16,
            area.y0 + (row as u16 * key_height + (key_height - font_height) / 2) as i16,
            width,
            font_height,
        )
        .with_background(bg);
        frontend.draw_text(&text_area, label, font, digit_color);
    }

    let row3 = area.y0 + (3 * key_height) as i16;
    if data.enable_backspace {
        let icon = &icons::BACKSPACE;
        let icon_area = Area::new(
            area.x0 + ((key_width - icon.width) / 2) as i16,
            row3 + ((key_height - icon.height) / 2) as i16,
            icon.width,
            icon.height,
        )
        .with_background(bg);
        frontend.draw_icon(&icon_area, Transformation::None, Color::Black, icon);
    }

    let validate_x = area.x0 + (2 * key_width) as i16;
    let validate_width = area.width - 2 * key_width;
    if data.enable_validate || data.soft_validation {
        let fill = if data.enable_validate { Color::Black } else { Color::LightGray };
        let key = Area::new(validate_x + 1, row3 + 1, validate_width - 1, key_height - 1).with_background(fill);
        frontend.draw_rect(&key);
        let icon = &icons::VALIDATE;
        let icon_area = Area::new(
            validate_x + ((validate_width - icon.width) / 2) as i16,
            row3 + ((key_height - icon.height) / 2) as i16,
            icon.width,
            icon.height,
        )
        .with_background(fill);
        frontend.draw_icon(&icon_area, Transformation::None, Color::White, icon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{DrawOp, MockFrontend};

    #[test]
    fn test_key_index_grid() {
        assert_eq!(key_index(300, 100, 10, 10), Some(1));
        assert_eq!(key_index(300, 100, 250, 250), Some(9));
        assert_eq!(key_index(300, 100, 10, 350), Some(BACKSPACE_KEY_INDEX));
        assert_eq!(key_index(300, 100, 150, 350), Some(0));
        assert_eq!(key_index(300, 100, 290, 350), Some(VALIDATE_KEY_INDEX));
        assert_eq!(key_index(300, 100, 10, 450), None, "Below the grid");
    }

    #[test]
    fn test_disabled_keys_are_silent() {
        let data = KeypadData::new(false);
        assert_eq!(on_touched(&data, 300, 100, (10, 350), (10, 350)), None, "Backspace disabled");
        assert_eq!(on_touched(&data, 300, 100, (290, 350), (290, 350)), None, "Validate disabled");
        assert_eq!(on_touched(&data, 300, 100, (150, 150), (150, 150)), Some(KeypadKey::Digit(5)));
    }

    #[test]
    fn test_slide_between_keys_ignored() {
        let data = KeypadData::new(false);
        assert_eq!(on_touched(&data, 300, 100, (10, 10), (150, 10)), None);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut frontend = MockFrontend::new();
        let mut data = KeypadData::new(true);
        data.ensure_digit_order(&mut frontend);
        let mut digits = data.digit_indexes.unwrap();
        digits.sort_unstable();
        assert_eq!(digits, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9], "Every digit appears once");

        let before = data.digit_indexes;
        data.ensure_digit_order(&mut frontend);
        assert_eq!(data.digit_indexes, before, "Order is chosen only once");
    }

    #[test]
    fn test_draw_shows_validate_only_when_enabled() {
        let mut frontend = MockFrontend::new();
        let mut data = KeypadData::new(false);
        data.ensure_digit_order(&mut frontend);
        draw_keypad(&mut frontend, &data, &Area::new(0, 0, 300, 400), 100);
        assert!(frontend.has_text("0") && frontend.has_text("9"));
        assert!(!frontend.ops.iter().any(|op| matches!(op, DrawOp::Icon { name: "validate", .. })));

        frontend.clear();
        data.enable_validate = true;
        draw_keypad(&mut frontend, &data, &Area::new(0, 0, 300, 400), 100);
        assert!(frontend.ops.iter().any(|op| matches!(op, DrawOp::Icon { name: "validate", .. })));
    }
}
