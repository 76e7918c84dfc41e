// src/layout/bars.rs
//! Header, footer and up-footer composites.
//!
//! Each of them is a full-width container attached to the screen; its height
//! is taken from the main container, and returned to the caller.

use alloc::string::{String, ToString};

use log::{debug, warn};

use super::navigation::{self, NavigationBar};
use super::{Layout, Role, SwipeUsage};
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::gui::Gui;
use crate::icons::{self, Icon};
use crate::obj::{Obj, ObjHandle, ObjKind, PageIndicatorData};
use crate::types::{Align, Color, Direction, FontId, INVALID_TOKEN, LIGHT_TEXT_COLOR, TouchId, TouchType, TuneId};

/// Width of the back key and of the header action key
pub const BACK_KEY_WIDTH: u16 = 88;
/// Width of the text part of a text-and-navigation footer
pub const FOOTER_TEXT_AND_NAV_WIDTH: u16 = 160;

const SUB_HEADER_MARGIN: u16 = 24;
const HEADER_PROGRESS_WIDTH: u16 = 224;
const SINGLE_BUTTON_MARGIN: i16 = 24;
const BUTTON_FROM_BOTTOM_MARGIN: i16 = 4;
const VERTICAL_BORDER_MARGIN: i16 = 32;
const BOTH_ROUNDED_FOOTER_HEIGHT: u16 = 192;
const ACTION_AND_FOOTER_FOOTER_HEIGHT: u16 = 208;
const LONG_PRESS_PROGRESS_HEIGHT: u16 = 8;
const LONG_PRESS_PROGRESS_ALIGN: i16 = 1;
const LEFT_CONTENT_ICON_TEXT_X: u16 = 16;
const TIP_BOX_MARGIN_Y: u16 = 24;
const TIP_BOX_TEXT_ICON_MARGIN: u16 = 24;
/// Back key, title and action icon of an extended header
const MAX_CENTERED: usize = 3;

/// Look of a single button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonStyle {
    #[default]
    BlackBackground,
    WhiteBackground,
    NoBorder,
}

impl ButtonStyle {
    /// `(inner, foreground, border)` colors
    fn colors(self) -> (Color, Color, Color) {
        match self {
            ButtonStyle::BlackBackground => (Color::Black, Color::White, Color::Black),
            ButtonStyle::WhiteBackground => (Color::White, Color::Black, Color::LightGray),
            ButtonStyle::NoBorder => (Color::White, Color::Black, Color::White),
        }
    }
}

/// Arrangement of a two-choice footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoiceStyle {
    /// Black rounded top button, plain text bottom button
    #[default]
    RoundedAndFooter,
    /// Two rounded buttons
    BothRounded,
    /// White rounded top button with icon, separated text bottom button
    SoftActionAndFooter,
    /// Black rounded top button with icon, separated text bottom button
    StrongActionAndFooter,
}

/// Rounded button of the given style
pub(crate) fn styled_button(text: Option<&str>, icon: Option<Icon>, style: ButtonStyle, radius: u16) -> ObjKind {
    let (inner, foreground, border) = style.colors();
    let mut kind = ObjKind::button(text.map(ToString::to_string), icon, inner);
    if let ObjKind::Button(button) = &mut kind {
        button.foreground = foreground;
        button.border_color = border;
        button.radius = radius;
    }
    kind
}

// ----------------------------------------------------------------------------
// Descriptors
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind<'a> {
    /// Blank space
    Empty { height: u16 },
    /// Back key and centered title; the key is inactive with an invalid token
    BackAndText {
        text: Option<&'a str>,
        token: u8,
        tune: TuneId,
    },
    /// Back key, title, optional action key and optional sub-text below a line
    ExtendedBack {
        text: Option<&'a str>,
        back_token: u8,
        text_token: u8,
        action_icon: Option<Icon>,
        action_token: u8,
        sub_text: Option<&'a str>,
        tune: TuneId,
    },
    /// Optional back key and a page indicator
    BackAndProgress {
        with_back: bool,
        nb_pages: u8,
        active_page: u8,
        token: u8,
        tune: TuneId,
    },
    /// Centered title
    Title { text: &'a str },
    /// Touchable text on the right
    RightText { text: &'a str, token: u8, tune: TuneId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDesc<'a> {
    pub kind: HeaderKind<'a>,
    pub separation_line: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterKind<'a> {
    Empty {
        height: u16,
    },
    SimpleText {
        text: &'a str,
        muted: bool,
        token: u8,
        tune: TuneId,
    },
    DoubleText {
        left_text: &'a str,
        right_text: &'a str,
        left_token: u8,
        right_token: u8,
        tune: TuneId,
    },
    TextAndNav {
        text: &'a str,
        token: u8,
        tune: TuneId,
        navigation: NavigationBar,
    },
    Nav(NavigationBar),
    SimpleButton {
        text: Option<&'a str>,
        icon: Option<Icon>,
        style: ButtonStyle,
        token: u8,
        tune: TuneId,
    },
    ChoiceButtons {
        top_text: Option<&'a str>,
        bottom_text: Option<&'a str>,
        top_icon: Option<Icon>,
        style: ChoiceStyle,
        token: u8,
        tune: TuneId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterDesc<'a> {
    pub kind: FooterKind<'a>,
    pub separation_line: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpFooterDesc<'a> {
    /// Hold-to-approve button
    LongPress { text: &'a str, token: u8, tune: TuneId },
    Button {
        text: Option<&'a str>,
        icon: Option<Icon>,
        style: ButtonStyle,
        token: u8,
        tune: TuneId,
    },
    /// White icon button on the left (index 1), black text button on the
    /// right (index 0)
    HorizontalButtons {
        left_icon: Option<Icon>,
        right_text: Option<&'a str>,
        left_token: u8,
        right_token: u8,
        tune: TuneId,
    },
    TipBox {
        text: Option<&'a str>,
        icon: Option<Icon>,
        token: u8,
        tune: TuneId,
    },
    /// Tappable band with an optional gray text
    Text { text: &'a str, token: u8, tune: TuneId },
}

// ----------------------------------------------------------------------------
// Builders
// ----------------------------------------------------------------------------

impl Layout {
    fn back_key<F: Frontend>(gui: &Gui<F>, token: u8) -> Obj {
        let height = gui.profile().touchable_header_bar_height;
        let active = token != INVALID_TOKEN;
        let mut kind = ObjKind::button(None, Some(icons::CHEVRON_BACK), Color::White);
        if let ObjKind::Button(button) = &mut kind {
            button.foreground = if active { Color::Black } else { Color::White };
        }
        let mut obj = Obj::new(kind)
            .with_size(BACK_KEY_WIDTH, height)
            .with_align(Align::MidLeft);
        obj.touch_id = TouchId::BackButton;
        if active {
            obj.touch_mask = TouchType::Touched.mask();
        }
        obj
    }

    /// Add a header, returns its height
    pub fn add_header<F: Frontend>(&mut self, gui: &mut Gui<F>, desc: &HeaderDesc) -> NbglResult<u16> {
        let profile = *gui.profile();
        let bar_height = profile.touchable_header_bar_height;
        let header = gui.pool_mut().alloc(
            self.layer,
            Obj::new(ObjKind::container(Direction::Vertical))
                .with_size(profile.screen_width, 0)
                .with_align(Align::TopMiddle),
        )?;
        let mut height = bar_height;
        debug!(" Adding header {:?}", desc.kind);

        match desc.kind {
            HeaderKind::Empty { height: empty } => height = empty,
            HeaderKind::BackAndText { text, token, tune } => {
                self.add_back_and_text(gui, header, text, token, INVALID_TOKEN, tune)?;
            }
            HeaderKind::ExtendedBack {
                text,
                back_token,
                text_token,
                action_icon,
                action_token,
                sub_text,
                tune,
            } => {
                let mut centered = self.add_back_and_text(gui, header, text, back_token, text_token, tune)?;
                if let Some(icon) = action_icon {
                    let active = action_token != INVALID_TOKEN;
                    let mut kind = ObjKind::button(None, Some(icon), Color::White);
                    if let ObjKind::Button(button) = &mut kind {
                        button.foreground = if active { Color::Black } else { Color::LightGray };
                    }
                    let mut obj = Obj::new(kind)
                        .with_size(BACK_KEY_WIDTH, bar_height)
                        .with_align(Align::MidRight);
                    obj.touch_id = TouchId::ExtraButton;
                    if active {
                        obj.touch_mask = TouchType::Touched.mask();
                    }
                    let action = gui.pool_mut().alloc_child(header, obj)?;
                    if active {
                        self.register(action, action_token, 0, tune, Role::Plain)?;
                    }
                    centered.push(action).map_err(|_| NbglError::ContainerFull { max: MAX_CENTERED })?;
                }
                if let Some(sub_text) = sub_text {
                    let line = Layout::horizontal_line(profile.screen_width)
                        .with_align(Align::TopMiddle)
                        .with_margins(0, bar_height as i16);
                    gui.pool_mut().alloc_child(header, line)?;

                    let width = profile.available_width();
                    let sub_height = gui
                        .frontend()
                        .text_height_in_width(FontId::SmallRegular, sub_text, width, true);
                    let sub = Obj::new(ObjKind::text(sub_text, FontId::SmallRegular))
                        .with_size(width, sub_height)
                        .with_align(Align::BottomMiddle)
                        .with_margins(0, SUB_HEADER_MARGIN as i16);
                    gui.pool_mut().alloc_child(header, sub)?;

                    let extra = sub_height + 2 * SUB_HEADER_MARGIN;
                    height += extra;
                    // keep the keys and the title centered in the touchable bar
                    for handle in centered {
                        gui.pool_mut().get_mut(handle)?.margin_y -= (extra / 2) as i16;
                    }
                }
            }
            HeaderKind::BackAndProgress {
                with_back,
                nb_pages,
                active_page,
                token,
                tune,
            } => {
                if with_back {
                    let obj = Self::back_key(gui, token);
                    let key = gui.pool_mut().alloc_child(header, obj)?;
                    self.register(key, token, 0, tune, Role::Plain)?;
                }
                if nb_pages > 1 {
                    let indicator = Obj::new(ObjKind::PageIndicator(PageIndicatorData {
                        nb_pages,
                        active_page,
                        ..Default::default()
                    }))
                    .with_size(HEADER_PROGRESS_WIDTH, 0)
                    .with_align(Align::Center);
                    gui.pool_mut().alloc_child(header, indicator)?;
                }
                self.active_page = active_page;
                self.nb_pages = nb_pages;
            }
            HeaderKind::Title { text } => {
                let title = Obj::new(ObjKind::text(text, FontId::SmallBold))
                    .with_text_align(Align::Center)
                    .with_size(profile.available_width(), bar_height)
                    .with_align(Align::Center);
                gui.pool_mut().alloc_child(header, title)?;
            }
            HeaderKind::RightText { text, token, tune } => {
                let obj = Obj::new(ObjKind::text(text, FontId::SmallBold))
                    .with_text_align(Align::MidRight)
                    .with_size(profile.available_width(), bar_height)
                    .with_align(Align::MidRight)
                    .with_margins(profile.border_margin as i16, 0)
                    .with_touch(TouchType::Touched.mask(), TouchId::TopRightButton);
                let right = gui.pool_mut().alloc_child(header, obj)?;
                self.register(right, token, 0, tune, Role::Plain)?;
            }
        }

        if desc.separation_line {
            let line = Layout::horizontal_line(profile.screen_width).with_align(Align::BottomMiddle);
            gui.pool_mut().alloc_child(header, line)?;
        }

        gui.pool_mut().get_mut(header)?.area.height = height;
        self.shrink_container(gui, height)?;
        let main = gui.pool_mut().get_mut(self.container)?;
        main.align_to = Some(header);
        main.align = Align::BottomLeft;
        self.header = Some(header);
        self.sync_screen_children(gui)?;
        Ok(height)
    }

    /// Back key plus optional centered title, returns the objects to keep
    /// centered in the touchable bar
    fn add_back_and_text<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        header: ObjHandle,
        text: Option<&str>,
        back_token: u8,
        text_token: u8,
        tune: TuneId,
    ) -> NbglResult<heapless::Vec<ObjHandle, MAX_CENTERED>> {
        let profile = *gui.profile();
        let mut centered = heapless::Vec::new();

        let obj = Self::back_key(gui, back_token);
        let key = gui.pool_mut().alloc_child(header, obj)?;
        if back_token != INVALID_TOKEN {
            self.register(key, back_token, 0, tune, Role::Plain)?;
        }
        centered.push(key).map_err(|_| NbglError::ContainerFull { max: MAX_CENTERED })?;

        if let Some(text) = text {
            const MAX_LINES: u16 = 2;
            let font = FontId::SmallBold;
            let width = profile.screen_width - 2 * BACK_KEY_WIDTH;
            let mut height = profile.touchable_header_bar_height;
            if gui.frontend().nb_lines_in_width(font, text, width, true) > MAX_LINES {
                warn!("Header text too long, capped to {} lines", MAX_LINES);
                height = MAX_LINES * gui.frontend().line_height(font);
            }
            let mut obj = Obj::new(ObjKind::text(text, font))
                .with_text_align(Align::Center)
                .with_size(width, height)
                .with_align(Align::Center);
            if text_token != INVALID_TOKEN {
                obj.touch_mask = TouchType::Touched.mask();
            }
            let title = gui.pool_mut().alloc_child(header, obj)?;
            if text_token != INVALID_TOKEN {
                self.register(title, text_token, 0, tune, Role::Plain)?;
            }
            centered.push(title).map_err(|_| NbglError::ContainerFull { max: MAX_CENTERED })?;
        }
        Ok(centered)
    }

    /// Add a footer, returns its height
    pub fn add_footer<F: Frontend>(&mut self, gui: &mut Gui<F>, desc: &FooterDesc) -> NbglResult<u16> {
        let profile = *gui.profile();
        let radius = profile.button_diameter / 2;
        let footer = gui.pool_mut().alloc(
            self.layer,
            Obj::new(ObjKind::container(Direction::Vertical))
                .with_size(profile.screen_width, 0)
                .with_align(Align::BottomMiddle),
        )?;
        let touched = TouchType::Touched.mask();
        let mut separator: Option<Obj> = None;
        let mut navigation_swipe: Option<(u8, TuneId)> = None;
        debug!(" Adding footer {:?}", desc.kind);

        let height = match desc.kind {
            FooterKind::Empty { height } => height,
            FooterKind::SimpleText {
                text,
                muted,
                token,
                tune,
            } => {
                let (color, height, font) = if muted {
                    (LIGHT_TEXT_COLOR, profile.small_footer_height, FontId::SmallRegular)
                } else {
                    (Color::Black, profile.simple_footer_height, FontId::SmallBold)
                };
                let obj = Obj::new(ObjKind::text(text, font))
                    .with_text_color(color)
                    .with_text_align(Align::Center)
                    .with_size(profile.available_width(), height)
                    .with_align(Align::BottomMiddle)
                    .with_touch(touched, TouchId::BottomButton);
                let handle = gui.pool_mut().alloc_child(footer, obj)?;
                self.register(handle, token, 0, tune, Role::Plain)?;
                height
            }
            FooterKind::DoubleText {
                left_text,
                right_text,
                left_token,
                right_token,
                tune,
            } => {
                let height = profile.simple_footer_height;
                let half = profile.available_width() / 2;
                let halves = [
                    (left_text, left_token, Align::BottomLeft, TouchId::BottomButton),
                    (right_text, right_token, Align::BottomRight, TouchId::RightButton),
                ];
                let mut right = None;
                for (text, token, align, id) in halves {
                    let obj = Obj::new(ObjKind::text(text, FontId::SmallBold))
                        .with_text_align(Align::Center)
                        .with_size(half, height)
                        .with_align(align)
                        .with_touch(touched, id);
                    let handle = gui.pool_mut().alloc_child(footer, obj)?;
                    self.register(handle, token, 0, tune, Role::Plain)?;
                    right = Some(handle);
                }
                if let Some(right) = right {
                    separator = Some(vertical_separator(height, right));
                }
                height
            }
            FooterKind::TextAndNav {
                text,
                token,
                tune,
                navigation,
            } => {
                let height = profile.simple_footer_height;
                let obj = Obj::new(ObjKind::text(text, FontId::SmallBold))
                    .with_text_align(Align::Center)
                    .with_size(FOOTER_TEXT_AND_NAV_WIDTH, height)
                    .with_align(Align::BottomLeft)
                    .with_touch(touched, TouchId::BottomButton);
                let handle = gui.pool_mut().alloc_child(footer, obj)?;
                self.register(handle, token, 0, tune, Role::Plain)?;

                let nav_container = gui.pool_mut().alloc_child(
                    footer,
                    Obj::new(ObjKind::container(Direction::Vertical))
                        .with_size(profile.screen_width - FOOTER_TEXT_AND_NAV_WIDTH, height)
                        .with_align(Align::BottomRight),
                )?;
                self.nav = Some(navigation::populate(gui.pool_mut(), &profile, nav_container, &navigation)?);
                self.register(nav_container, navigation.token, 0, navigation.tune, Role::Plain)?;
                separator = Some(vertical_separator(height, nav_container));
                self.active_page = navigation.active_page;
                self.nb_pages = navigation.nb_pages;
                navigation_swipe = Some((navigation.token, navigation.tune));
                height
            }
            FooterKind::Nav(navigation) => {
                gui.pool_mut().get_mut(footer)?.area.height = profile.simple_footer_height;
                self.nav = Some(navigation::populate(gui.pool_mut(), &profile, footer, &navigation)?);
                self.register(footer, navigation.token, 0, navigation.tune, Role::Plain)?;
                self.active_page = navigation.active_page;
                self.nb_pages = navigation.nb_pages;
                navigation_swipe = Some((navigation.token, navigation.tune));
                profile.simple_footer_height
            }
            FooterKind::SimpleButton {
                text,
                icon,
                style,
                token,
                tune,
            } => {
                let width = if text.is_some() {
                    profile.available_width()
                } else {
                    profile.button_diameter
                };
                let id = if text.is_some() { TouchId::SingleButton } else { TouchId::BottomButton };
                let obj = Obj::new(styled_button(text, icon, style, radius))
                    .with_size(width, profile.button_diameter)
                    .with_align(Align::BottomMiddle)
                    .with_margins(0, SINGLE_BUTTON_MARGIN)
                    .with_touch(touched, id);
                let handle = gui.pool_mut().alloc_child(footer, obj)?;
                self.register(handle, token, 0, tune, Role::Plain)?;
                profile.footer_button_height
            }
            FooterKind::ChoiceButtons {
                top_text,
                bottom_text,
                top_icon,
                style,
                token,
                tune,
            } => {
                let (Some(top_text), Some(bottom_text)) = (top_text, bottom_text) else {
                    warn!("Choice footer without both texts");
                    return Err(NbglError::MalformedDescriptor("choice buttons need two texts"));
                };
                self.add_choice_buttons(gui, footer, top_text, bottom_text, top_icon, style, token, tune)?
            }
        };

        if let Some((token, tune)) = navigation_swipe {
            let swipes = TouchType::SwipedLeft.mask() | TouchType::SwipedRight.mask();
            self.add_swipe_internal(gui, swipes, SwipeUsage::Navigation, token, tune)?;
        }
        if desc.separation_line {
            let line = Layout::horizontal_line(profile.screen_width).with_align(Align::TopMiddle);
            gui.pool_mut().alloc_child(footer, line)?;
        }
        if let Some(separator) = separator {
            gui.pool_mut().alloc_child(footer, separator)?;
        }

        gui.pool_mut().get_mut(footer)?.area.height = height;
        self.shrink_container(gui, height)?;
        self.footer = Some(footer);
        self.sync_screen_children(gui)?;
        Ok(height)
    }

    #[allow(clippy::too_many_arguments)]
    fn add_choice_buttons<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        footer: ObjHandle,
        top_text: &str,
        bottom_text: &str,
        top_icon: Option<Icon>,
        style: ChoiceStyle,
        token: u8,
        tune: TuneId,
    ) -> NbglResult<u16> {
        let profile = *gui.profile();
        let radius = profile.button_diameter / 2;
        let touched = TouchType::Touched.mask();

        // bottom button, index 1
        let (bottom_margin, bottom_border, bottom_height) = if style == ChoiceStyle::BothRounded {
            (SINGLE_BUTTON_MARGIN, Color::LightGray, profile.button_diameter)
        } else {
            (BUTTON_FROM_BOTTOM_MARGIN, Color::White, profile.footer_in_pair_height)
        };
        let mut kind = ObjKind::button(Some(String::from(bottom_text)), None, Color::White);
        if let ObjKind::Button(button) = &mut kind {
            button.border_color = bottom_border;
            button.foreground = Color::Black;
            button.radius = radius;
        }
        let bottom = gui.pool_mut().alloc_child(
            footer,
            Obj::new(kind)
                .with_size(profile.available_width(), bottom_height)
                .with_align(Align::BottomMiddle)
                .with_margins(0, bottom_margin)
                .with_touch(touched, TouchId::Choice2),
        )?;
        self.register(bottom, token, 1, tune, Role::Plain)?;

        if matches!(
            style,
            ChoiceStyle::SoftActionAndFooter | ChoiceStyle::StrongActionAndFooter
        ) {
            let line = Layout::horizontal_line(profile.screen_width).with_align_to(bottom, Align::TopMiddle);
            gui.pool_mut().alloc_child(footer, line)?;
        }

        // top button, index 0
        let top_margin = if style == ChoiceStyle::BothRounded {
            SINGLE_BUTTON_MARGIN
        } else {
            VERTICAL_BORDER_MARGIN
        };
        let button_style = if style == ChoiceStyle::SoftActionAndFooter {
            ButtonStyle::WhiteBackground
        } else {
            ButtonStyle::BlackBackground
        };
        let icon = if style == ChoiceStyle::RoundedAndFooter { None } else { top_icon };
        let top = gui.pool_mut().alloc_child(
            footer,
            Obj::new(styled_button(Some(top_text), icon, button_style, radius))
                .with_size(profile.available_width(), profile.button_diameter)
                .with_align(Align::TopMiddle)
                .with_margins(0, top_margin)
                .with_touch(touched, TouchId::Choice1),
        )?;
        self.register(top, token, 0, tune, Role::Plain)?;

        Ok(match style {
            ChoiceStyle::RoundedAndFooter => profile.rounded_and_footer_height,
            ChoiceStyle::BothRounded => BOTH_ROUNDED_FOOTER_HEIGHT,
            _ => ACTION_AND_FOOTER_FOOTER_HEIGHT,
        })
    }

    /// Navigation bar as footer
    pub fn add_navigation_bar<F: Frontend>(&mut self, gui: &mut Gui<F>, info: &NavigationBar) -> NbglResult<u16> {
        self.add_footer(
            gui,
            &FooterDesc {
                kind: FooterKind::Nav(*info),
                separation_line: info.with_separation_line,
            },
        )
    }

    /// Add an up-footer above the footer, returns its height
    pub fn add_up_footer<F: Frontend>(&mut self, gui: &mut Gui<F>, desc: &UpFooterDesc) -> NbglResult<u16> {
        let profile = *gui.profile();
        let radius = profile.button_diameter / 2;
        let border = profile.border_margin as i16;
        let touched = TouchType::Touched.mask();
        let up_footer = gui.pool_mut().alloc(
            self.layer,
            Obj::new(ObjKind::container(Direction::Vertical))
                .with_size(profile.screen_width, 0)
                .with_align_to(self.container, Align::BottomMiddle),
        )?;
        debug!(" Adding up-footer {:?}", desc);

        let height = match *desc {
            UpFooterDesc::LongPress { text, token, tune } => {
                gui.pool_mut().alloc_child(
                    up_footer,
                    Obj::new(styled_button(None, Some(icons::VALIDATE), ButtonStyle::BlackBackground, radius))
                        .with_size(profile.button_diameter, profile.button_diameter)
                        .with_align(Align::MidRight)
                        .with_margins(border, 0),
                )?;
                let width = profile.screen_width - 3 * profile.border_margin - profile.button_diameter;
                let text_height = gui
                    .frontend()
                    .text_height_in_width(FontId::LargeMedium, text, width, true);
                gui.pool_mut().alloc_child(
                    up_footer,
                    Obj::new(ObjKind::text(text, FontId::LargeMedium))
                        .with_size(width, text_height)
                        .with_align(Align::MidLeft)
                        .with_margins(border, 0),
                )?;
                let line = gui.pool_mut().alloc_child(
                    up_footer,
                    Layout::horizontal_line(profile.screen_width).with_align(Align::TopMiddle),
                )?;
                let mut bar_kind = ObjKind::progress_bar(0, false);
                if let ObjKind::ProgressBar(bar) = &mut bar_kind {
                    bar.partial_redraw = true;
                }
                let bar = gui.pool_mut().alloc_child(
                    up_footer,
                    Obj::new(bar_kind)
                        .with_size(profile.screen_width, LONG_PRESS_PROGRESS_HEIGHT)
                        .with_align(Align::TopMiddle)
                        .with_margins(0, LONG_PRESS_PROGRESS_ALIGN),
                )?;

                let obj = gui.pool_mut().get_mut(up_footer)?;
                obj.touch_id = TouchId::LongPressButton;
                obj.touch_mask = TouchType::Touching.mask()
                    | TouchType::TouchReleased.mask()
                    | TouchType::OutOfTouch.mask()
                    | TouchType::SwipedLeft.mask()
                    | TouchType::SwipedRight.mask();
                self.register(up_footer, token, 0, tune, Role::LongPress { bar, line })?;
                profile.long_press_button_height
            }
            UpFooterDesc::Button {
                text,
                icon,
                style,
                token,
                tune,
            } => {
                let handle = gui.pool_mut().alloc_child(
                    up_footer,
                    Obj::new(styled_button(text, icon, style, radius))
                        .with_size(profile.available_width(), profile.button_diameter)
                        .with_align(Align::Center)
                        .with_touch(touched, TouchId::SingleButton),
                )?;
                self.register(handle, token, 0, tune, Role::Plain)?;
                profile.up_footer_button_height
            }
            UpFooterDesc::HorizontalButtons {
                left_icon,
                right_text,
                left_token,
                right_token,
                tune,
            } => {
                let (Some(left_icon), Some(right_text)) = (left_icon, right_text) else {
                    warn!("Horizontal buttons need an icon and a text");
                    return Err(NbglError::MalformedDescriptor("horizontal buttons need an icon and a text"));
                };
                let left = gui.pool_mut().alloc_child(
                    up_footer,
                    Obj::new(styled_button(None, Some(left_icon), ButtonStyle::WhiteBackground, radius))
                        .with_size(profile.button_width, profile.button_diameter)
                        .with_align(Align::MidLeft)
                        .with_margins(border, 0)
                        .with_touch(touched, TouchId::Choice2),
                )?;
                self.register(left, left_token, 1, tune, Role::Plain)?;

                let width = profile.available_width() - profile.button_width - LEFT_CONTENT_ICON_TEXT_X;
                let right = gui.pool_mut().alloc_child(
                    up_footer,
                    Obj::new(styled_button(Some(right_text), None, ButtonStyle::BlackBackground, radius))
                        .with_size(width, profile.button_diameter)
                        .with_align(Align::MidRight)
                        .with_margins(border, 0)
                        .with_touch(touched, TouchId::Choice1),
                )?;
                self.register(right, right_token, 0, tune, Role::Plain)?;
                profile.up_footer_button_height
            }
            UpFooterDesc::TipBox { text, icon, token, tune } => {
                let Some(text) = text else {
                    warn!("Tip box without text");
                    return Err(NbglError::MalformedDescriptor("tip box needs a text"));
                };
                let mut width = profile.available_width();
                if let Some(icon) = icon {
                    width -= icon.width + TIP_BOX_TEXT_ICON_MARGIN;
                }
                let text_height = gui
                    .frontend()
                    .text_height_in_width(FontId::SmallRegular, text, width, true);
                gui.pool_mut().alloc_child(
                    up_footer,
                    Obj::new(ObjKind::text(text, FontId::SmallRegular))
                        .with_size(width, text_height)
                        .with_align(Align::MidLeft)
                        .with_margins(border, 0),
                )?;
                gui.pool_mut().alloc_child(
                    up_footer,
                    Layout::horizontal_line(profile.screen_width).with_align(Align::TopMiddle),
                )?;
                let mut height = text_height;
                if let Some(icon) = icon {
                    gui.pool_mut().alloc_child(
                        up_footer,
                        Obj::new(ObjKind::image(icon))
                            .with_align(Align::MidRight)
                            .with_margins(border, 0),
                    )?;
                    height = height.max(icon.height);
                }
                let obj = gui.pool_mut().get_mut(up_footer)?;
                obj.touch_id = TouchId::TipBox;
                obj.touch_mask = touched;
                self.register(up_footer, token, 0, tune, Role::Plain)?;
                height + 2 * TIP_BOX_MARGIN_Y
            }
            UpFooterDesc::Text { text, token, tune } => {
                if !text.is_empty() {
                    let width = profile.available_width();
                    let text_height = gui
                        .frontend()
                        .text_height_in_width(FontId::SmallRegular, text, width, true);
                    gui.pool_mut().alloc_child(
                        up_footer,
                        Obj::new(ObjKind::text(text, FontId::SmallRegular))
                            .with_text_color(LIGHT_TEXT_COLOR)
                            .with_text_align(Align::Center)
                            .with_size(width, text_height)
                            .with_align(Align::Center),
                    )?;
                }
                let obj = gui.pool_mut().get_mut(up_footer)?;
                obj.touch_id = TouchId::WholeScreen;
                obj.touch_mask = touched;
                self.register(up_footer, token, 0, tune, Role::Plain)?;
                profile.small_footer_height
            }
        };

        gui.pool_mut().get_mut(up_footer)?.area.height = height;
        self.shrink_container(gui, height)?;
        self.up_footer = Some(up_footer);
        self.sync_screen_children(gui)?;
        Ok(height)
    }

    /// Hold-to-approve button in the up-footer
    pub fn add_long_press_button<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        text: &str,
        token: u8,
        tune: TuneId,
    ) -> NbglResult<u16> {
        self.add_up_footer(gui, &UpFooterDesc::LongPress { text, token, tune })
    }
}

/// One pixel vertical line on the left of `right_of`
fn vertical_separator(height: u16, right_of: ObjHandle) -> Obj {
    Obj::new(ObjKind::line(Direction::Vertical, Color::LightGray, 1))
        .with_size(1, height)
        .with_align_to(right_of, Align::MidLeft)
        .with_margins(-1, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::{gui, touch};
    use crate::layout::{LayoutDescription, LayoutEvent};
    use crate::types::{EXIT_PAGE, NO_TUNE};

    fn layout(gui: &mut Gui<crate::frontend::MockFrontend>) -> Layout {
        Layout::new(gui, &LayoutDescription::default()).unwrap()
    }

    #[test]
    fn test_header_and_footer_shrink_main_container() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let header = layout
            .add_header(
                &mut gui,
                &HeaderDesc {
                    kind: HeaderKind::BackAndText {
                        text: Some("Settings"),
                        token: 1,
                        tune: NO_TUNE,
                    },
                    separation_line: true,
                },
            )
            .unwrap();
        assert_eq!(header, 88);
        let footer = layout
            .add_footer(
                &mut gui,
                &FooterDesc {
                    kind: FooterKind::SimpleText {
                        text: "Cancel",
                        muted: false,
                        token: 2,
                        tune: NO_TUNE,
                    },
                    separation_line: true,
                },
            )
            .unwrap();
        assert_eq!(footer, 92);
        assert_eq!(layout.container_height(&gui).unwrap(), 672 - 88 - 92);

        layout.draw(&mut gui).unwrap();
        let main = gui.pool().get(layout.container()).unwrap();
        assert_eq!(main.area.y0, 88, "Main container sits below the header");
        let footer = gui.pool().get(layout.footer().unwrap()).unwrap();
        assert_eq!(footer.area.y0, 672 - 92, "Footer at the bottom");
        assert!(gui.frontend().has_text("Settings") && gui.frontend().has_text("Cancel"));
    }

    #[test]
    fn test_inactive_back_key_is_not_registered() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        layout
            .add_header(
                &mut gui,
                &HeaderDesc {
                    kind: HeaderKind::BackAndText {
                        text: None,
                        token: INVALID_TOKEN,
                        tune: NO_TUNE,
                    },
                    separation_line: false,
                },
            )
            .unwrap();
        assert_eq!(layout.nb_callback_objs(), 0);
    }

    #[test]
    fn test_extended_header_keeps_action_icon() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        layout
            .add_header(
                &mut gui,
                &HeaderDesc {
                    kind: HeaderKind::ExtendedBack {
                        text: Some("Review"),
                        back_token: 1,
                        text_token: 2,
                        action_icon: Some(icons::CLOSE),
                        action_token: 3,
                        sub_text: None,
                        tune: NO_TUNE,
                    },
                    separation_line: false,
                },
            )
            .unwrap();
        assert_eq!(layout.nb_callback_objs(), 3, "Back key, title and action");
        layout.draw(&mut gui).unwrap();
        let action = layout.callback_obj(2).unwrap().obj;
        assert_eq!(
            layout.on_touch(&mut gui, &touch(action, TouchType::Touched)).unwrap(),
            Some(LayoutEvent::Action {
                token: 3,
                index: 0,
                tune: NO_TUNE
            })
        );
    }

    #[test]
    fn test_choice_buttons_require_both_texts() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let result = layout.add_footer(
            &mut gui,
            &FooterDesc {
                kind: FooterKind::ChoiceButtons {
                    top_text: Some("Approve"),
                    bottom_text: None,
                    top_icon: None,
                    style: ChoiceStyle::RoundedAndFooter,
                    token: 4,
                    tune: NO_TUNE,
                },
                separation_line: false,
            },
        );
        assert!(matches!(result, Err(NbglError::MalformedDescriptor(_))));
    }

    #[test]
    fn test_choice_buttons_report_index() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let height = layout
            .add_footer(
                &mut gui,
                &FooterDesc {
                    kind: FooterKind::ChoiceButtons {
                        top_text: Some("Yes"),
                        bottom_text: Some("No"),
                        top_icon: None,
                        style: ChoiceStyle::RoundedAndFooter,
                        token: 4,
                        tune: NO_TUNE,
                    },
                    separation_line: false,
                },
            )
            .unwrap();
        assert_eq!(height, 192);
        layout.draw(&mut gui).unwrap();
        let bottom = layout.callback_obj(0).unwrap().obj;
        let top = layout.callback_obj(1).unwrap().obj;
        let event = layout.on_touch(&mut gui, &touch(top, TouchType::Touched)).unwrap();
        assert_eq!(
            event,
            Some(LayoutEvent::Action {
                token: 4,
                index: 0,
                tune: NO_TUNE
            })
        );
        let event = layout.on_touch(&mut gui, &touch(bottom, TouchType::Touched)).unwrap();
        assert_eq!(
            event,
            Some(LayoutEvent::Action {
                token: 4,
                index: 1,
                tune: NO_TUNE
            })
        );
    }

    #[test]
    fn test_navigation_footer_and_swipes() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let nav = NavigationBar {
            nb_pages: 3,
            with_exit_key: true,
            token: 9,
            ..Default::default()
        };
        layout.add_navigation_bar(&mut gui, &nav).unwrap();
        layout.draw(&mut gui).unwrap();

        let main = layout.container();
        let event = layout.on_touch(&mut gui, &touch(main, TouchType::SwipedLeft)).unwrap();
        assert_eq!(
            event,
            Some(LayoutEvent::Action {
                token: 9,
                index: 1,
                tune: NO_TUNE
            })
        );
        assert_eq!(layout.active_page(), 1);
        assert_eq!(
            layout.on_touch(&mut gui, &touch(main, TouchType::SwipedRight)).unwrap(),
            Some(LayoutEvent::Action {
                token: 9,
                index: 0,
                tune: NO_TUNE
            })
        );
        assert_eq!(
            layout.on_touch(&mut gui, &touch(main, TouchType::SwipedRight)).unwrap(),
            None,
            "No page before the first"
        );

        let exit = layout.nav.unwrap().exit.unwrap();
        let event = layout.on_touch(&mut gui, &touch(exit, TouchType::Touched)).unwrap();
        assert_eq!(
            event,
            Some(LayoutEvent::Action {
                token: 9,
                index: EXIT_PAGE,
                tune: NO_TUNE
            })
        );
    }

    #[test]
    fn test_long_press_fires_once() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        layout.add_long_press_button(&mut gui, "Hold to sign", 5, NO_TUNE).unwrap();
        layout.draw(&mut gui).unwrap();
        let up_footer = layout.up_footer().unwrap();

        let mut event = touch(up_footer, TouchType::Touching);
        event.duration_ms = 400;
        assert_eq!(layout.on_touch(&mut gui, &event).unwrap(), None, "50% is not enough");

        event.duration_ms = 1200;
        assert_eq!(
            layout.on_touch(&mut gui, &event).unwrap(),
            Some(LayoutEvent::Action {
                token: 5,
                index: 0,
                tune: NO_TUNE
            })
        );
        event.duration_ms = 1600;
        assert_eq!(layout.on_touch(&mut gui, &event).unwrap(), None, "Reported only once");

        let release = touch(up_footer, TouchType::TouchReleased);
        assert_eq!(layout.on_touch(&mut gui, &release).unwrap(), None);
        let Role::LongPress { bar, .. } = layout.callback_obj(0).unwrap().role else {
            panic!("Up-footer must be a long press");
        };
        let state = gui.pool_mut().get_mut(bar).unwrap().progress_bar_mut().unwrap().state;
        assert_eq!(state, 0, "Bar emptied on release");
    }

    #[test]
    fn test_tip_box_height() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let height = layout
            .add_up_footer(
                &mut gui,
                &UpFooterDesc::TipBox {
                    text: Some("Tip"),
                    icon: Some(icons::INFO),
                    token: 1,
                    tune: NO_TUNE,
                },
            )
            .unwrap();
        assert_eq!(height, 32 + 2 * 24, "One line of text plus margins");
    }
}
