// src/icons.rs
//! Icon descriptors.
//!
//! The engine only needs an icon's dimensions and depth to lay it out. The
//! bitmap itself is resolved by the frontend from the icon name.

use crate::types::Bpp;

/// A frontend-resolved icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub name: &'static str,
    pub width: u16,
    pub height: u16,
    pub bpp: Bpp,
}

impl Icon {
    pub const fn new(name: &'static str, width: u16, height: u16) -> Self {
        Self {
            name,
            width,
            height,
            bpp: Bpp::One,
        }
    }

    pub const fn with_bpp(mut self, bpp: Bpp) -> Self {
        self.bpp = bpp;
        self
    }
}

pub const CHEVRON_BACK: Icon = Icon::new("chevron_back", 32, 32);
pub const CHEVRON_NEXT: Icon = Icon::new("chevron_next", 32, 32);
pub const CLOSE: Icon = Icon::new("close", 32, 32);
pub const MINI_PUSH: Icon = Icon::new("mini_push", 24, 24);
pub const PUSH: Icon = Icon::new("push", 32, 32);
pub const QR_CODE: Icon = Icon::new("qr_code", 32, 32);
pub const SETTINGS: Icon = Icon::new("settings", 32, 32);
pub const INFO: Icon = Icon::new("info", 32, 32);
pub const WARNING: Icon = Icon::new("warning", 64, 64);
pub const CHECK_CIRCLE: Icon = Icon::new("check_circle", 64, 64);
pub const DENIED_CIRCLE: Icon = Icon::new("denied_circle", 64, 64);
pub const SWITCH: Icon = Icon::new("switch", 60, 40);
pub const RADIO_ON: Icon = Icon::new("radio_on", 32, 32);
pub const RADIO_OFF: Icon = Icon::new("radio_off", 32, 32);
pub const ROUND_24: Icon = Icon::new("round_24", 24, 24);
pub const LEFT_HALF: Icon = Icon::new("left_half", 24, 64);
pub const BACKSPACE: Icon = Icon::new("backspace", 32, 32);
pub const SHIFT: Icon = Icon::new("shift", 32, 32);
pub const SHIFT_LOCKED: Icon = Icon::new("shift_locked", 32, 32);
pub const VALIDATE: Icon = Icon::new("validate", 32, 32);
