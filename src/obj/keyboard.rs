// src/obj/keyboard.rs
//! On-screen QWERTY keyboard object.
//!
//! Rows, from top to bottom:
//! 1. 10 keys (`qwertyuiop` or `1234567890`)
//! 2. 9 keys, shifted right by half a key
//! 3. shift (or the special-chars toggle), 7 letters (5 symbols) and backspace
//! 4. mode switch and space, absent in letters-only mode

use log::debug;

use crate::frontend::Frontend;
use crate::icons;
use crate::types::{Area, Color, FontId, RefreshMode, Transformation};

const KBD_CHARS: &[u8; 26] = b"qwertyuiopasdfghjklzxcvbnm";
const KBD_CHARS_UPPER: &[u8; 26] = b"QWERTYUIOPASDFGHJKLZXCVBNM";
const KBD_DIGITS: &[u8; 24] = b"1234567890-/:;()&@\".,?!'";
const KBD_SPECIALS: &[u8; 24] = b"[]{}#%^*+=_\\|~<>$`\".,?!'";

const FIRST_LINE_CHAR_COUNT: u8 = 10;
const SECOND_LINE_CHAR_COUNT: u8 = 9;

pub const SHIFT_KEY_INDEX: u8 = 26;
pub const DIGITS_SWITCH_KEY_INDEX: u8 = 27;
pub const BACKSPACE_KEY_INDEX: u8 = 28;
pub const SPACE_KEY_INDEX: u8 = 29;
pub const SPECIAL_KEYS_INDEX: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardMode {
    #[default]
    Letters,
    Digits,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardCase {
    #[default]
    Lower,
    /// Upper case for the next letter only
    Upper,
    LockedUpper,
}

/// Key reported to the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardKey {
    Char(char),
    Backspace,
}

#[derive(Debug, Clone)]
pub struct KeyboardData {
    pub mode: KeyboardMode,
    pub casing: KeyboardCase,
    /// Only letters and backspace, three rows
    pub letters_only: bool,
    /// Bit `i` set disables key `i` (letters are 0..26, then the special keys)
    pub key_mask: u32,
    pub text_color: Color,
    pub border_color: Color,
    /// Set when the keyboard redrew itself and the caller must refresh
    pub needs_refresh: bool,
}

impl KeyboardData {
    pub fn new(mode: KeyboardMode, letters_only: bool) -> Self {
        Self {
            mode,
            casing: KeyboardCase::Lower,
            letters_only,
            key_mask: 0,
            text_color: Color::Black,
            border_color: Color::LightGray,
            needs_refresh: false,
        }
    }

    pub fn is_masked(&self, index: u8) -> bool {
        index < 32 && self.key_mask & (1 << index) != 0
    }

    pub fn nb_rows(&self) -> u16 {
        if self.letters_only { 3 } else { 4 }
    }
}

/// Pixel geometry of the keys, derived from the screen width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardGeometry {
    pub key_width: u16,
    pub key_height: u16,
    pub second_line_offset: u16,
    pub shift_key_width: u16,
    pub special_chars_key_width: u16,
    pub switch_key_width: u16,
    pub space_key_width: u16,
}

impl KeyboardGeometry {
    pub fn new(screen_width: u16, key_height: u16) -> Self {
        let key_width = screen_width / FIRST_LINE_CHAR_COUNT as u16;
        let second_line_offset = (screen_width - SECOND_LINE_CHAR_COUNT as u16 * key_width) / 2;
        let space_key_width = screen_width * 69 / 100;
        Self {
            key_width,
            key_height,
            second_line_offset,
            shift_key_width: key_width + second_line_offset,
            special_chars_key_width: 2 * key_width + second_line_offset,
            switch_key_width: screen_width - space_key_width,
            space_key_width,
        }
    }

    /// Key index at `(x, y)` relative to the keyboard's top-left corner
    pub fn key_index(&self, data: &KeyboardData, x: i16, y: i16) -> u8 {
        if x < 0 || y < 0 {
            return u8::MAX;
        }
        let (x, y) = (x as u16, y as u16);
        let kh = self.key_height;
        let kw = self.key_width;
        if y < kh {
            (x / kw).min(FIRST_LINE_CHAR_COUNT as u16 - 1) as u8
        } else if y < 2 * kh {
            let i = FIRST_LINE_CHAR_COUNT as u16 + x.saturating_sub(self.second_line_offset) / kw;
            i.min((FIRST_LINE_CHAR_COUNT + SECOND_LINE_CHAR_COUNT) as u16 - 1) as u8
        } else if y < 3 * kh {
            let base = (FIRST_LINE_CHAR_COUNT + SECOND_LINE_CHAR_COUNT) as u16;
            if data.mode == KeyboardMode::Letters {
                if data.letters_only {
                    let i = base + x / kw;
                    if i >= 26 { BACKSPACE_KEY_INDEX } else { i as u8 }
                } else if x < self.shift_key_width {
                    SHIFT_KEY_INDEX
                } else {
                    let i = base + (x - self.shift_key_width) / kw;
                    if i >= 26 { BACKSPACE_KEY_INDEX } else { i as u8 }
                }
            } else if x < self.special_chars_key_width {
                SPECIAL_KEYS_INDEX
            } else {
                let i = base + (x - self.special_chars_key_width) / kw;
                if i >= 24 { BACKSPACE_KEY_INDEX } else { i as u8 }
            }
        } else if !data.letters_only && y < 4 * kh {
            if x < self.switch_key_width {
                DIGITS_SWITCH_KEY_INDEX
            } else {
                SPACE_KEY_INDEX
            }
        } else {
            u8::MAX
        }
    }
}

/// Result of a tap on the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardOutcome {
    pub key: Option<KeyboardKey>,
    /// The keyboard changed its own look and must be redrawn with this mode
    pub redraw: Option<RefreshMode>,
}

/// Resolve a tap that started at `first` and ended at `last`, both relative
/// to the keyboard. A finger that slid to another key is ignored.
pub fn on_touched(
    data: &mut KeyboardData,
    geometry: &KeyboardGeometry,
    first: (i16, i16),
    last: (i16, i16),
) -> KeyboardOutcome {
    let mut outcome = KeyboardOutcome::default();
    let index = geometry.key_index(data, first.0, first.1);
    if index > SPECIAL_KEYS_INDEX || geometry.key_index(data, last.0, last.1) != index {
        return outcome;
    }
    debug!(" Keyboard key {} touched in {:?}", index, data.mode);

    match data.mode {
        KeyboardMode::Letters => {
            let casing = data.casing;
            if casing == KeyboardCase::Upper && index != SHIFT_KEY_INDEX && !data.is_masked(index) {
                data.casing = KeyboardCase::Lower;
                data.needs_refresh = true;
                outcome.redraw = Some(RefreshMode::BlackAndWhiteFastRefresh);
            }
            if index < 26 && !data.is_masked(index) {
                let table = if casing != KeyboardCase::Lower { KBD_CHARS_UPPER } else { KBD_CHARS };
                outcome.key = Some(KeyboardKey::Char(table[index as usize] as char));
            } else if index == SHIFT_KEY_INDEX {
                data.casing = match data.casing {
                    KeyboardCase::Lower => KeyboardCase::Upper,
                    KeyboardCase::Upper => KeyboardCase::LockedUpper,
                    KeyboardCase::LockedUpper => KeyboardCase::Lower,
                };
                outcome.redraw = Some(RefreshMode::BlackAndWhiteRefresh);
            } else if index == DIGITS_SWITCH_KEY_INDEX {
                data.mode = KeyboardMode::Digits;
                outcome.redraw = Some(RefreshMode::FullColorRefresh);
            }
        }
        KeyboardMode::Digits | KeyboardMode::Special => {
            let table = if data.mode == KeyboardMode::Digits { KBD_DIGITS } else { KBD_SPECIALS };
            if (index as usize) < table.len() {
                outcome.key = Some(KeyboardKey::Char(table[index as usize] as char));
            } else if index == SPECIAL_KEYS_INDEX {
                data.mode = if data.mode == KeyboardMode::Digits {
                    KeyboardMode::Special
                } else {
                    KeyboardMode::Digits
                };
                outcome.redraw = Some(RefreshMode::BlackAndWhiteRefresh);
            } else if index == DIGITS_SWITCH_KEY_INDEX {
                data.mode = KeyboardMode::Letters;
                outcome.redraw = Some(RefreshMode::FullColorRefresh);
            }
        }
    }

    if index == BACKSPACE_KEY_INDEX {
        outcome.key = Some(KeyboardKey::Backspace);
    } else if index == SPACE_KEY_INDEX && !data.is_masked(SPACE_KEY_INDEX) {
        outcome.key = Some(KeyboardKey::Char(' '));
    }
    outcome
}

// ----------------------------------------------------------------------------
// Drawing
// ----------------------------------------------------------------------------

fn key_color(data: &KeyboardData, index: u8) -> Color {
    if data.is_masked(index) { Color::White } else { data.text_color }
}

fn draw_key_label<F: Frontend + ?Sized>(
    frontend: &mut F,
    label: &str,
    x0: i32,
    y0: i32,
    key_width: u16,
    key_height: u16,
    color: Color,
    background: Color,
) {
    let font = FontId::SmallRegular;
    let width = frontend.text_width(font, label);
    let height = frontend.font_height(font);
    let area = Area::new(
        (x0 + (key_width as i32 - width as i32) / 2) as i16,
        (y0 + (key_height as i32 - height as i32) / 2) as i16,
        width,
        height,
    )
    .with_background(background);
    frontend.draw_text(&area, label, font, color);
}

fn draw_key_icon<F: Frontend + ?Sized>(
    frontend: &mut F,
    icon: &icons::Icon,
    x0: i32,
    y0: i32,
    key_width: u16,
    key_height: u16,
    color: Color,
    background: Color,
) {
    let area = Area::new(
        (x0 + (key_width as i32 - icon.width as i32) / 2) as i16,
        (y0 + (key_height as i32 - icon.height as i32) / 2) as i16,
        icon.width,
        icon.height,
    )
    .with_background(background);
    frontend.draw_icon(&area, Transformation::None, color, icon);
}

/// Paint the whole keyboard in `area`
pub fn draw_keyboard<F: Frontend + ?Sized>(
    frontend: &mut F,
    data: &KeyboardData,
    area: &Area,
    geometry: &KeyboardGeometry,
) {
    let bg = area.background;
    let kw = geometry.key_width;
    let kh = geometry.key_height;
    let x0 = area.x0 as i32;
    let y0 = area.y0 as i32;

    frontend.draw_rect(area);
    for row in 0..=data.nb_rows() {
        let line = Area::new(area.x0, (y0 + (row * kh) as i32) as i16, area.width, 1).with_background(bg);
        if line.y1() <= area.y1() {
            frontend.draw_line(&line, 1, data.border_color);
        }
    }

    let mut buf = [0u8; 4];
    let table: &[u8] = match (data.mode, data.casing) {
        (KeyboardMode::Letters, KeyboardCase::Lower) => KBD_CHARS,
        (KeyboardMode::Letters, _) => KBD_CHARS_UPPER,
        (KeyboardMode::Digits, _) => KBD_DIGITS,
        (KeyboardMode::Special, _) => KBD_SPECIALS,
    };

    // first two rows
    for i in 0..(FIRST_LINE_CHAR_COUNT + SECOND_LINE_CHAR_COUNT) {
        let (kx, ky) = if i < FIRST_LINE_CHAR_COUNT {
            (x0 + (i as u16 * kw) as i32, y0)
        } else {
            let col = (i - FIRST_LINE_CHAR_COUNT) as u16;
            (x0 + (geometry.second_line_offset + col * kw) as i32, y0 + kh as i32)
        };
        let label = (table[i as usize] as char).encode_utf8(&mut buf);
        draw_key_label(frontend, label, kx, ky, kw, kh, key_color(data, i), bg);
    }

    // third row
    let row3 = y0 + 2 * kh as i32;
    let (first_shift, last_key) = if data.mode == KeyboardMode::Letters {
        if data.letters_only {
            (0, 26u8)
        } else {
            let shift_bg = if data.casing != KeyboardCase::Lower { Color::Black } else { bg };
            let shift_area = Area::new(area.x0, row3 as i16, geometry.shift_key_width, kh).with_background(shift_bg);
            frontend.draw_rect(&shift_area);
            let icon = if data.casing == KeyboardCase::LockedUpper {
                &icons::SHIFT_LOCKED
            } else {
                &icons::SHIFT
            };
            let color = if data.is_masked(SHIFT_KEY_INDEX) {
                Color::White
            } else {
                shift_bg.contrast()
            };
            draw_key_icon(frontend, icon, x0, row3, geometry.shift_key_width, kh, color, shift_bg);
            (geometry.shift_key_width, 26u8)
        }
    } else {
        let label = if data.mode == KeyboardMode::Digits { "#+=" } else { "123" };
        draw_key_label(
            frontend,
            label,
            x0,
            row3,
            geometry.special_chars_key_width,
            kh,
            key_color(data, SPECIAL_KEYS_INDEX),
            bg,
        );
        (geometry.special_chars_key_width, 24u8)
    };
    let base = FIRST_LINE_CHAR_COUNT + SECOND_LINE_CHAR_COUNT;
    for i in base..last_key {
        let kx = x0 + (first_shift + (i - base) as u16 * kw) as i32;
        let label = (table[i as usize] as char).encode_utf8(&mut buf);
        draw_key_label(frontend, label, kx, row3, kw, kh, key_color(data, i), bg);
    }
    let backspace_x = first_shift + (last_key - base) as u16 * kw;
    draw_key_icon(
        frontend,
        &icons::BACKSPACE,
        x0 + backspace_x as i32,
        row3,
        area.width.saturating_sub(backspace_x),
        kh,
        key_color(data, BACKSPACE_KEY_INDEX),
        bg,
    );

    // fourth row
    if !data.letters_only {
        let row4 = y0 + 3 * kh as i32;
        let label = if data.mode == KeyboardMode::Letters { ".?123" } else { "abc" };
        draw_key_label(
            frontend,
            label,
            x0,
            row4,
            geometry.switch_key_width,
            kh,
            key_color(data, DIGITS_SWITCH_KEY_INDEX),
            bg,
        );
        let separator = Area::new((x0 + geometry.switch_key_width as i32) as i16, row4 as i16, 1, kh).with_background(bg);
        frontend.draw_line(&separator, 0, data.border_color);
        draw_key_label(
            frontend,
            "space",
            x0 + geometry.switch_key_width as i32,
            row4,
            geometry.space_key_width,
            kh,
            key_color(data, SPACE_KEY_INDEX),
            bg,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> KeyboardGeometry {
        KeyboardGeometry::new(400, 60)
    }

    #[test]
    fn test_geometry_for_400px() {
        let g = geometry();
        assert_eq!(g.key_width, 40);
        assert_eq!(g.second_line_offset, 20, "(400 - 9*40) / 2");
        assert_eq!(g.shift_key_width, 60);
        assert_eq!(g.space_key_width, 276);
    }

    #[test]
    fn test_key_index_rows() {
        let g = geometry();
        let data = KeyboardData::new(KeyboardMode::Letters, false);
        assert_eq!(g.key_index(&data, 5, 5), 0, "q");
        assert_eq!(g.key_index(&data, 25, 70), 10, "a, second row starts after the offset");
        assert_eq!(g.key_index(&data, 10, 130), SHIFT_KEY_INDEX);
        assert_eq!(g.key_index(&data, 70, 130), 19, "z");
        assert_eq!(g.key_index(&data, 390, 130), BACKSPACE_KEY_INDEX);
        assert_eq!(g.key_index(&data, 10, 190), DIGITS_SWITCH_KEY_INDEX);
        assert_eq!(g.key_index(&data, 200, 190), SPACE_KEY_INDEX);
    }

    #[test]
    fn test_upper_once_falls_back_to_lower() {
        let g = geometry();
        let mut data = KeyboardData::new(KeyboardMode::Letters, false);
        let shift = on_touched(&mut data, &g, (10, 130), (10, 130));
        assert_eq!(shift.key, None);
        assert_eq!(data.casing, KeyboardCase::Upper);
        let q = on_touched(&mut data, &g, (5, 5), (6, 6));
        assert_eq!(q.key, Some(KeyboardKey::Char('Q')), "First letter after shift is upper case");
        assert_eq!(data.casing, KeyboardCase::Lower, "Casing goes back to lower");
        let w = on_touched(&mut data, &g, (45, 5), (45, 5));
        assert_eq!(w.key, Some(KeyboardKey::Char('w')));
    }

    #[test]
    fn test_slide_to_other_key_is_dropped() {
        let g = geometry();
        let mut data = KeyboardData::new(KeyboardMode::Letters, false);
        let outcome = on_touched(&mut data, &g, (5, 5), (85, 5));
        assert_eq!(outcome.key, None, "Finger moved from q to e");
    }

    #[test]
    fn test_masked_key_is_ignored() {
        let g = geometry();
        let mut data = KeyboardData::new(KeyboardMode::Letters, true);
        data.key_mask = 1 << 0;
        assert_eq!(on_touched(&mut data, &g, (5, 5), (5, 5)).key, None);
        assert_eq!(
            on_touched(&mut data, &g, (390, 130), (390, 130)).key,
            Some(KeyboardKey::Backspace),
            "Backspace is never masked"
        );
    }

    #[test]
    fn test_mode_switch() {
        let g = geometry();
        let mut data = KeyboardData::new(KeyboardMode::Letters, false);
        on_touched(&mut data, &g, (10, 190), (10, 190));
        assert_eq!(data.mode, KeyboardMode::Digits);
        assert_eq!(on_touched(&mut data, &g, (5, 5), (5, 5)).key, Some(KeyboardKey::Char('1')));
        on_touched(&mut data, &g, (10, 130), (10, 130));
        assert_eq!(data.mode, KeyboardMode::Special);
        assert_eq!(on_touched(&mut data, &g, (5, 5), (5, 5)).key, Some(KeyboardKey::Char('[')));
    }
}
