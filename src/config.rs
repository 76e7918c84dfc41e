// src/config.rs
//! Device-class geometry profile.
//!
//! Every dimension the layout builder and the paginator depend on lives here,
//! so the same engine can drive a large (Stax-class) or a medium (Flex-class)
//! touchscreen. Profiles are plain `serde` structs and can be persisted with
//! `postcard`.

use alloc::vec::Vec;
use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{NbglError, NbglResult};

/// Geometry and timing constants for one screen size class.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub screen_width: u16,
    pub screen_height: u16,
    /// Left/right margin of the main content
    pub border_margin: u16,
    /// Vertical refresh granularity, a power of two
    pub vertical_alignment: u16,

    // ------------------------------------------------------------------------
    // Bars, headers and footers
    // ------------------------------------------------------------------------
    pub touchable_header_bar_height: u16,
    pub touchable_main_bar_height: u16,
    pub touchable_bar_height: u16,
    pub small_footer_height: u16,
    pub simple_footer_height: u16,
    pub footer_button_height: u16,
    pub footer_in_pair_height: u16,
    pub rounded_and_footer_height: u16,
    pub small_centering_header: u16,
    pub medium_centering_header: u16,
    pub long_press_button_height: u16,
    pub up_footer_button_height: u16,
    pub navigation_height: u16,

    // ------------------------------------------------------------------------
    // Buttons and list items
    // ------------------------------------------------------------------------
    pub button_diameter: u16,
    pub button_width: u16,
    pub small_button_height: u16,
    pub small_button_radius: u16,
    pub nav_button_width: u16,
    pub nav_indicator_width: u16,
    pub radio_choice_height: u16,
    pub bar_intervale: u16,
    pub list_item_min_text_height: u16,
    pub list_item_pre_heading: u16,
    pub list_item_heading_sub_text: u16,

    // ------------------------------------------------------------------------
    // Tag/value pagination
    // ------------------------------------------------------------------------
    pub pre_tag_value_margin: u16,
    pub inter_tag_value_margin: u16,
    pub tag_value_intervale: u16,
    pub nb_max_lines_in_review: u8,
    pub nb_max_lines_in_details: u8,

    // ------------------------------------------------------------------------
    // Keyboard and keypad
    // ------------------------------------------------------------------------
    pub keyboard_key_height: u16,
    pub keypad_key_height: u16,
    pub text_entry_height: u16,
    pub nb_max_suggestion_buttons: u8,
    pub nb_max_visible_suggestion_buttons: u8,

    // ------------------------------------------------------------------------
    // Hold-to-approve progress
    // ------------------------------------------------------------------------
    pub hold_to_approve_step_percent: u8,
    pub hold_to_approve_step_duration_ms: u16,
    pub hold_to_approve_first_step: u8,

    /// Space between page indicator dashes
    pub inter_dashes: u16,
}

impl Profile {
    /// Large screen class (400x672)
    pub const STAX: Self = Self {
        screen_width: 400,
        screen_height: 672,
        border_margin: 24,
        vertical_alignment: 4,
        touchable_header_bar_height: 88,
        touchable_main_bar_height: 96,
        touchable_bar_height: 96,
        small_footer_height: 88,
        simple_footer_height: 92,
        footer_button_height: 128,
        footer_in_pair_height: 80,
        rounded_and_footer_height: 192,
        small_centering_header: 32,
        medium_centering_header: 56,
        long_press_button_height: 128,
        up_footer_button_height: 120,
        navigation_height: 92,
        button_diameter: 64,
        button_width: 64,
        small_button_height: 64,
        small_button_radius: 32,
        nav_button_width: 80,
        nav_indicator_width: 109,
        radio_choice_height: 96,
        bar_intervale: 12,
        list_item_min_text_height: 40,
        list_item_pre_heading: 24,
        list_item_heading_sub_text: 8,
        pre_tag_value_margin: 24,
        inter_tag_value_margin: 24,
        tag_value_intervale: 4,
        nb_max_lines_in_review: 10,
        nb_max_lines_in_details: 12,
        keyboard_key_height: 60,
        keypad_key_height: 104,
        text_entry_height: 64,
        nb_max_suggestion_buttons: 12,
        nb_max_visible_suggestion_buttons: 4,
        hold_to_approve_step_percent: 25,
        hold_to_approve_step_duration_ms: 400,
        hold_to_approve_first_step: 1,
        inter_dashes: 10,
    };

    /// Medium screen class (480x600)
    pub const FLEX: Self = Self {
        screen_width: 480,
        screen_height: 600,
        border_margin: 32,
        vertical_alignment: 4,
        touchable_header_bar_height: 96,
        touchable_main_bar_height: 100,
        touchable_bar_height: 92,
        small_footer_height: 96,
        simple_footer_height: 96,
        footer_button_height: 136,
        footer_in_pair_height: 88,
        rounded_and_footer_height: 208,
        small_centering_header: 40,
        medium_centering_header: 64,
        long_press_button_height: 152,
        up_footer_button_height: 136,
        navigation_height: 96,
        button_diameter: 64,
        button_width: 72,
        small_button_height: 64,
        small_button_radius: 32,
        nav_button_width: 104,
        nav_indicator_width: 132,
        radio_choice_height: 92,
        bar_intervale: 16,
        list_item_min_text_height: 40,
        list_item_pre_heading: 28,
        list_item_heading_sub_text: 12,
        pre_tag_value_margin: 24,
        inter_tag_value_margin: 24,
        tag_value_intervale: 4,
        nb_max_lines_in_review: 9,
        nb_max_lines_in_details: 11,
        keyboard_key_height: 64,
        keypad_key_height: 88,
        text_entry_height: 72,
        nb_max_suggestion_buttons: 8,
        nb_max_visible_suggestion_buttons: 2,
        hold_to_approve_step_percent: 7,
        hold_to_approve_step_duration_ms: 100,
        hold_to_approve_first_step: 0,
        inter_dashes: 8,
    };

    /// Width usable by content between the two border margins
    pub const fn available_width(&self) -> u16 {
        self.screen_width - 2 * self.border_margin
    }

    /// Height available for tag/value pairs between a centering header and a simple footer
    pub const fn tag_value_area_height(&self) -> u16 {
        self.screen_height - self.small_centering_header - self.simple_footer_height
    }

    /// Height available for list items below a touchable header
    pub const fn infos_area_height(&self) -> u16 {
        self.screen_height - self.touchable_header_bar_height
    }

    /// Hold-to-approve percentage reached after `touch_duration_ms`, capped at 100
    pub fn hold_to_approve_percent(&self, touch_duration_ms: u32) -> u8 {
        let step = self.hold_to_approve_step_duration_ms.max(1) as u32;
        let steps = touch_duration_ms / step + self.hold_to_approve_first_step as u32;
        (steps * self.hold_to_approve_step_percent as u32).min(100) as u8
    }

    /// Serialize this profile with postcard
    pub fn to_bytes(&self) -> NbglResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| NbglError::InvalidProfile)
    }

    /// Restore a profile previously written by [`Profile::to_bytes`]
    pub fn from_bytes(bytes: &[u8]) -> NbglResult<Self> {
        postcard::from_bytes(bytes).map_err(|_| NbglError::InvalidProfile)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::STAX
    }
}

/// Period of the status banner auto-dismiss
pub const STATUS_SCREEN_DURATION: Duration = Duration::from_millis(3000);

/// Period of the spinner animation
pub const SPINNER_REFRESH_PERIOD: Duration = Duration::from_millis(400);
