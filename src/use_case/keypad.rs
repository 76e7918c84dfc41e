// src/use_case/keypad.rs
//! PIN entry on a digits keypad.

use log::{debug, info};

use super::{BACK_TOKEN, Pin, Session, UseCaseEvent, UseCases};
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::layout::keypad::KEYPAD_MAX_DIGITS;
use crate::layout::{HeaderDesc, HeaderKind, Layout, LayoutDescription};
use crate::obj::KeypadKey;
use crate::types::{NO_TUNE, RefreshMode};

/// Digits typed so far and their bounds
#[derive(Debug, Clone)]
pub(super) struct PinEntry {
    min_digits: u8,
    max_digits: u8,
    hidden: bool,
    digits: Pin,
}

impl PinEntry {
    fn len(&self) -> u8 {
        self.digits.len() as u8
    }

    /// Validate, backspace and digits enablement
    fn keys(&self) -> (bool, bool, bool) {
        let len = self.len();
        (len >= self.min_digits, len > 0, len < self.max_digits)
    }
}

impl<F: Frontend> UseCases<F> {
    /// Keypad under `title`, validated once `min_digits` are typed.
    ///
    /// With `hidden`, digits show as dots. The validated PIN is reported as
    /// [`UseCaseEvent::Pin`], the back key as [`UseCaseEvent::Quit`].
    pub fn keypad(&mut self, title: &str, min_digits: u8, max_digits: u8, shuffled: bool, hidden: bool) -> NbglResult<()> {
        if min_digits == 0 || min_digits > max_digits || max_digits > KEYPAD_MAX_DIGITS {
            return Err(NbglError::MalformedDescriptor("invalid PIN length bounds"));
        }
        let entry = PinEntry {
            min_digits,
            max_digits,
            hidden,
            digits: Pin::new(),
        };

        let mut layout = Layout::new(&mut self.gui, &LayoutDescription::default())?;
        layout.add_header(
            &mut self.gui,
            &HeaderDesc {
                kind: HeaderKind::BackAndText {
                    text: Some(title),
                    token: BACK_TOKEN,
                    tune: NO_TUNE,
                },
                separation_line: false,
            },
        )?;
        if hidden {
            layout.add_hidden_digits(&mut self.gui, max_digits)?;
        } else {
            layout.add_entered_digits(&mut self.gui, "", 0)?;
        }
        layout.add_keypad(&mut self.gui, shuffled)?;
        layout.draw(&mut self.gui)?;
        let (validate, backspace, digits) = entry.keys();
        layout.update_keypad(&mut self.gui, validate, backspace, digits)?;
        info!("PIN entry of {} to {} digits", min_digits, max_digits);
        self.start(Session::Keypad(entry), layout);
        Ok(())
    }

    pub(super) fn on_keypad_key(&mut self, key: KeypadKey) -> NbglResult<Option<UseCaseEvent>> {
        let (Session::Keypad(entry), Some(layout)) = (&mut self.session, self.layout.as_mut()) else {
            return Ok(None);
        };
        match key {
            KeypadKey::Validate if entry.len() >= entry.min_digits => {
                info!("PIN validated");
                return Ok(Some(UseCaseEvent::Pin(entry.digits.clone())));
            }
            KeypadKey::Validate => return Ok(None),
            KeypadKey::Backspace => {
                entry.digits.pop();
            }
            KeypadKey::Digit(digit) => {
                let c = char::from_digit(digit as u32, 10).ok_or(NbglError::MalformedDescriptor("not a digit"))?;
                if entry.len() >= entry.max_digits || entry.digits.push(c).is_err() {
                    return Ok(None);
                }
            }
        }
        debug!(" {} digits entered", entry.len());

        if entry.hidden {
            layout.update_hidden_digits(&mut self.gui, entry.len())?;
        } else {
            layout.update_entered_digits(&mut self.gui, &entry.digits)?;
        }
        let (validate, backspace, digits) = entry.keys();
        layout.update_keypad(&mut self.gui, validate, backspace, digits)?;
        self.gui.refresh_special(RefreshMode::FullColorPartialRefresh);
        Ok(None)
    }
}
