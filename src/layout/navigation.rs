// src/layout/navigation.rs
//! Navigation bar: exit key, previous/next chevrons and an optional "n of N"
//! page text, laid out inside a footer container.

use alloc::format;

use log::debug;

use crate::config::Profile;
use crate::error::NbglResult;
use crate::icons;
use crate::obj::{Obj, ObjHandle, ObjKind, ObjPool};
use crate::types::{Align, Color, EXIT_PAGE, FontId, NO_TUNE, TouchId, TouchType, TuneId};

/// Height of the chevron keys on the large screen class
pub const NAV_BUTTON_HEIGHT: u16 = 80;

/// Extra offset of the previous key when the page text sits between the chevrons
const PAGE_TEXT_SHIFT: i16 = 79;

/// Navigation bar configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationBar {
    pub nb_pages: u8,
    pub active_page: u8,
    pub with_exit_key: bool,
    pub with_back_key: bool,
    pub with_page_indicator: bool,
    pub with_separation_line: bool,
    pub token: u8,
    pub tune: TuneId,
}

impl Default for NavigationBar {
    fn default() -> Self {
        Self {
            nb_pages: 1,
            active_page: 0,
            with_exit_key: false,
            with_back_key: true,
            with_page_indicator: false,
            with_separation_line: false,
            token: 0,
            tune: NO_TUNE,
        }
    }
}

/// Objects making up a populated navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavButtons {
    pub container: ObjHandle,
    pub exit: Option<ObjHandle>,
    pub previous: Option<ObjHandle>,
    pub next: ObjHandle,
    pub page_text: Option<ObjHandle>,
}

fn nav_button(icon: icons::Icon, radius: u16) -> ObjKind {
    let mut kind = ObjKind::button(None, Some(icon), Color::White);
    if let ObjKind::Button(button) = &mut kind {
        button.border_color = Color::White;
        button.foreground = Color::Black;
        button.radius = radius;
    }
    kind
}

/// Fill `container` with the keys described by `config`
pub fn populate(
    pool: &mut ObjPool,
    profile: &Profile,
    container: ObjHandle,
    config: &NavigationBar,
) -> NbglResult<NavButtons> {
    let radius = profile.button_diameter / 2;
    let touched = TouchType::Touched.mask();

    let exit = if config.with_exit_key {
        let align = if config.nb_pages > 1 { Align::MidLeft } else { Align::Center };
        let margin_x = if config.nb_pages > 1 { 8 } else { 0 };
        let obj = Obj::new(nav_button(icons::CLOSE, radius))
            .with_size(profile.button_diameter, profile.button_diameter)
            .with_align(align)
            .with_margins(margin_x, 0)
            .with_touch(touched, TouchId::BottomButton);
        Some(pool.alloc_child(container, obj)?)
    } else {
        None
    };

    let previous = if config.with_back_key {
        let mut margin_x = profile.nav_button_width as i16;
        if config.with_page_indicator {
            margin_x += PAGE_TEXT_SHIFT;
        }
        let obj = Obj::new(nav_button(icons::CHEVRON_BACK, radius))
            .with_size(profile.nav_button_width, NAV_BUTTON_HEIGHT)
            .with_align(Align::MidRight)
            .with_margins(margin_x, 0)
            .with_touch(touched, TouchId::LeftButton);
        Some(pool.alloc_child(container, obj)?)
    } else {
        None
    };

    let next = pool.alloc_child(
        container,
        Obj::new(nav_button(icons::CHEVRON_NEXT, radius))
            .with_size(profile.nav_button_width, NAV_BUTTON_HEIGHT)
            .with_align(Align::MidRight)
            .with_touch(touched, TouchId::RightButton),
    )?;

    let page_text = if config.with_page_indicator {
        let label = format!("{} of {}", config.active_page as u16 + 1, config.nb_pages);
        let mut kind = ObjKind::text(label, FontId::SmallRegular);
        if let ObjKind::TextArea(text) = &mut kind {
            text.color = Color::DarkGray;
            text.text_align = Align::Center;
        }
        let obj = Obj::new(kind)
            .with_size(profile.nav_indicator_width, NAV_BUTTON_HEIGHT)
            .with_align(Align::Center);
        Some(pool.alloc_child(container, obj)?)
    } else {
        None
    };

    let buttons = NavButtons {
        container,
        exit,
        previous,
        next,
        page_text,
    };
    config_buttons(pool, &buttons, config.nb_pages, config.active_page)?;
    Ok(buttons)
}

/// Gray out the chevrons that lead nowhere
fn config_buttons(pool: &mut ObjPool, buttons: &NavButtons, nb_pages: u8, active_page: u8) -> NbglResult<()> {
    if let Some(previous) = buttons.previous {
        pool.get_mut(previous)?.button_mut()?.foreground =
            if active_page == 0 { Color::LightGray } else { Color::Black };
    }
    if nb_pages > 1 {
        pool.get_mut(buttons.next)?.button_mut()?.foreground =
            if active_page == nb_pages - 1 { Color::LightGray } else { Color::Black };
    }
    Ok(())
}

/// Apply a touch on one of the keys, or a swipe on the page.
///
/// Returns whether the page changes; `active_page` then holds the new page,
/// or [`EXIT_PAGE`] when the exit key was touched.
pub fn navigate(
    pool: &mut ObjPool,
    buttons: &NavButtons,
    touched: Option<ObjHandle>,
    kind: TouchType,
    nb_pages: u8,
    active_page: &mut u8,
) -> NbglResult<bool> {
    let can_go_back = *active_page > 0;
    let can_go_forward = nb_pages < 2 || *active_page < nb_pages - 1;

    let moved = match (kind, touched) {
        (TouchType::Touched, Some(obj)) if Some(obj) == buttons.exit => {
            *active_page = EXIT_PAGE;
            return Ok(true);
        }
        (TouchType::Touched, Some(obj)) if Some(obj) == buttons.previous && can_go_back => {
            *active_page -= 1;
            true
        }
        (TouchType::Touched, Some(obj)) if obj == buttons.next && can_go_forward => {
            *active_page = active_page.saturating_add(1);
            true
        }
        (TouchType::SwipedRight, None) if can_go_back => {
            *active_page -= 1;
            true
        }
        (TouchType::SwipedLeft, None) if can_go_forward => {
            *active_page = active_page.saturating_add(1);
            true
        }
        _ => false,
    };
    if moved {
        debug!(" Navigation to page {} / {}", *active_page, nb_pages);
        config_buttons(pool, buttons, nb_pages, *active_page)?;
    }
    Ok(moved)
}
