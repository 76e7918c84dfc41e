// src/layout/widgets.rs
//! Widgets stacked in the main container: list items, texts, radio choices,
//! centered info, QR code, tag/value pairs, progress bar and buttons.

use alloc::string::{String, ToString};

use log::debug;

use super::bars::{ButtonStyle, FooterDesc, FooterKind, UpFooterDesc, styled_button};
use super::{Layout, Role};
use crate::error::NbglResult;
use crate::frontend::Frontend;
use crate::gui::Gui;
use crate::icons::{self, Icon};
use crate::obj::draw::{ICON_TEXT_SPACE, RADIO_SIZE};
use crate::obj::{Obj, ObjHandle, ObjKind, QrCodeData};
use crate::types::{
    Align, Color, Direction, FontId, INACTIVE_COLOR, INVALID_TOKEN, LIGHT_TEXT_COLOR, NO_TUNE, State, TouchId,
    TouchType, TuneId,
};

const PRE_FIRST_TEXT_MARGIN: i16 = 24;
const INTER_PARAGRAPHS_MARGIN: i16 = 40;
const SUB_HEADER_MARGIN: i16 = 24;
const ICON_TITLE_MARGIN: u16 = 24;
const TITLE_DESC_MARGIN: u16 = 16;
const VERTICAL_BORDER_MARGIN: u16 = 32;
const SUB_TEXT_HUG: u16 = 8;
const CONTENT_CENTER_PADDING: u16 = 40;
const LARGE_HEADING_EXTRA: u16 = 8;
const QR_PRE_TEXT_MARGIN: u16 = 24;
const QR_INTER_TEXTS_MARGIN: u16 = 40;
const QR_MAIN_CONTAINER_MARGIN: u16 = 16;
const BAR_TEXT_MARGIN: u16 = 24;
const BAR_INTER_TEXTS_MARGIN: u16 = 16;
const BUTTON_MARGIN_Y: i16 = 12;
const TAG_VALUE_MARGIN_Y: i16 = 4;

/// Width of the progress bar widget
pub const PROGRESS_BAR_WIDTH: u16 = 120;
/// Height of the progress bar widget
pub const PROGRESS_BAR_HEIGHT: u16 = 12;

// ----------------------------------------------------------------------------
// Descriptors
// ----------------------------------------------------------------------------

/// Touchable bar: text with optional icons and sub-text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItem<'a> {
    pub text: &'a str,
    pub sub_text: Option<&'a str>,
    pub icon_left: Option<Icon>,
    pub icon_right: Option<Icon>,
    /// Grayed out and not touchable
    pub inactive: bool,
    /// Larger vertical padding
    pub large: bool,
    pub token: u8,
    pub index: u8,
    pub tune: TuneId,
}

impl<'a> ListItem<'a> {
    pub fn new(text: &'a str, token: u8) -> Self {
        Self {
            text,
            sub_text: None,
            icon_left: None,
            icon_right: None,
            inactive: false,
            large: false,
            token,
            index: 0,
            tune: NO_TUNE,
        }
    }
}

/// Text with an on/off switch on its right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch<'a> {
    pub text: &'a str,
    pub sub_text: Option<&'a str>,
    pub init_state: State,
    pub token: u8,
    pub tune: TuneId,
}

/// Exclusive choice among a few names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioChoice<'a> {
    pub names: &'a [&'a str],
    pub init_choice: u8,
    pub token: u8,
    pub tune: TuneId,
}

/// How the three texts of a centered info are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CenteredInfoStyle {
    /// Large title, regular description
    #[default]
    LargeCaseInfo,
    /// Large title, bold second text
    LargeCaseBoldInfo,
    /// Bold title, regular description
    NormalInfo,
    /// Large title, regular description, gray third text
    LargeCaseGrayInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CenteredInfo<'a> {
    pub text1: Option<&'a str>,
    pub text2: Option<&'a str>,
    pub text3: Option<&'a str>,
    pub icon: Option<Icon>,
    /// Stick to the top of the main container instead of centering
    pub on_top: bool,
    pub style: CenteredInfoStyle,
    pub offset_y: i16,
}

/// Icon and up to four texts, centered in the main container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentCenter<'a> {
    pub icon: Option<Icon>,
    pub title: Option<&'a str>,
    pub small_title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub sub_text: Option<&'a str>,
    /// Extra space around the icon
    pub icon_hug: u16,
    pub padding: bool,
}

/// QR code density, picked from the URL length and the room left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrCodeSize {
    /// 33 modules of 8 pixels
    V4,
    /// 33 modules of 4 pixels
    V4Small,
    /// 57 modules of 4 pixels
    V10,
}

impl QrCodeSize {
    const V4_NB_PIX: u16 = 33;
    const V10_NB_PIX: u16 = 57;
    /// URLs longer than this need the denser version
    const V4_MAX_LEN: usize = 62;

    pub fn for_url(url: &str) -> Self {
        if url.len() > Self::V4_MAX_LEN {
            QrCodeSize::V10
        } else {
            QrCodeSize::V4
        }
    }

    /// Side of the rendered code in pixels
    pub fn side(self) -> u16 {
        match self {
            QrCodeSize::V4 => Self::V4_NB_PIX * 8,
            QrCodeSize::V4Small => Self::V4_NB_PIX * 4,
            QrCodeSize::V10 => Self::V10_NB_PIX * 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrCodeDesc<'a> {
    pub url: &'a str,
    pub text1: Option<&'a str>,
    pub text2: Option<&'a str>,
    pub large_text1: bool,
    /// Centered in the main container, otherwise below the last object
    pub centered: bool,
    pub offset_y: i16,
}

/// One tag/value pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagValue {
    pub item: String,
    pub value: String,
    /// Icon on the right of the value, making the pair touchable
    pub value_icon: Option<Icon>,
    /// The value is an alias, touching it shows the full value
    pub alias: bool,
    /// Start a new page with this pair
    pub force_page_start: bool,
    /// Displayed alone, centered
    pub centered_info: bool,
}

impl TagValue {
    pub fn new(item: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            value: value.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagValueList<'a> {
    pub pairs: &'a [TagValue],
    /// Index of the first pair, reported in touch events
    pub start_index: u8,
    /// When non zero, values are cut to this many lines
    pub nb_max_lines_for_value: u8,
    pub small_case_for_value: bool,
    pub wrapping: bool,
    pub token: u8,
    pub tune: TuneId,
}

impl<'a> TagValueList<'a> {
    pub fn new(pairs: &'a [TagValue]) -> Self {
        Self {
            pairs,
            start_index: 0,
            nb_max_lines_for_value: 0,
            small_case_for_value: false,
            wrapping: true,
            token: INVALID_TOKEN,
            tune: NO_TUNE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressBarDesc<'a> {
    pub text: &'a str,
    pub sub_text: Option<&'a str>,
    pub percentage: u8,
}

/// Rounded button, in the main container or at the bottom of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutButton<'a> {
    pub text: Option<&'a str>,
    pub icon: Option<Icon>,
    pub style: ButtonStyle,
    /// Width fitted to the content instead of the whole available width
    pub fitting_content: bool,
    /// Placed in the footer, or in the up-footer if a footer exists
    pub on_bottom: bool,
    pub token: u8,
    pub tune: TuneId,
}

/// What [`Layout::update_spinner`] had to redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerUpdate {
    Unchanged,
    /// Only the spinner moved, a fast black and white refresh is enough
    Position,
    /// A text changed, a partial color refresh is needed
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemType {
    TouchableBar,
    Switch,
    Text,
}

struct ItemSpec<'a> {
    kind: ItemType,
    text: Option<&'a str>,
    sub_text: Option<&'a str>,
    icon_left: Option<Icon>,
    icon_right: Option<Icon>,
    state: State,
    large: bool,
    token: u8,
    index: u8,
    tune: TuneId,
}

// ----------------------------------------------------------------------------
// Builders
// ----------------------------------------------------------------------------

impl Layout {
    /// Text row with icons, switch and sub-text, returns its height
    fn add_list_item<F: Frontend>(&mut self, gui: &mut Gui<F>, item: &ItemSpec) -> NbglResult<u16> {
        let profile = *gui.profile();
        let grayed = item.kind == ItemType::TouchableBar && item.state == State::Off;
        let color = if grayed { INACTIVE_COLOR } else { Color::Black };
        let font = if grayed { FontId::SmallRegular } else { FontId::SmallBold };
        let pre_heading = if item.large {
            profile.list_item_pre_heading + LARGE_HEADING_EXTRA
        } else {
            profile.list_item_pre_heading
        };
        let intervale = profile.bar_intervale;
        let width = profile.available_width();

        let container = gui.pool_mut().alloc(
            self.layer,
            Obj::new(ObjKind::container(Direction::Horizontal))
                .with_size(width, profile.list_item_min_text_height + 2 * pre_heading)
                .with_margins(profile.border_margin as i16, 0),
        )?;
        let touchable = (item.kind == ItemType::TouchableBar && item.state == State::On) || item.kind == ItemType::Switch;
        if touchable {
            let obj = gui.pool_mut().get_mut(container)?;
            obj.touch_mask = TouchType::Touched.mask();
            obj.touch_id = TouchId::Controls(self.nb_touchable_controls);
            self.nb_touchable_controls += 1;
        }

        let text = match item.text {
            Some(text) => {
                let mut text_width = width;
                if let Some(icon) = item.icon_left {
                    text_width -= icon.width + intervale;
                }
                if let Some(icon) = item.icon_right {
                    text_width -= icon.width + intervale;
                } else if item.kind == ItemType::Switch {
                    text_width -= icons::SWITCH.width + intervale;
                }
                let height = gui
                    .frontend()
                    .text_height_in_width(font, text, text_width, true)
                    .max(profile.list_item_min_text_height);
                let mut margin_y = pre_heading as i16;
                if height > profile.list_item_min_text_height {
                    margin_y -= ((height - profile.list_item_min_text_height) / 2) as i16;
                }
                let margin_x = item.icon_left.map_or(0, |icon| (icon.width + intervale) as i16);
                let obj = Obj::new(ObjKind::text(text, font))
                    .with_text_color(color)
                    .with_size(text_width, height)
                    .with_align(Align::TopLeft)
                    .with_margins(margin_x, margin_y);
                Some(gui.pool_mut().alloc_child(container, obj)?)
            }
            None => None,
        };

        if let Some(icon) = item.icon_left {
            let mut image = Obj::new(ObjKind::image(icon)).with_margins(intervale as i16, 0);
            image = match text {
                Some(text) => image.with_align_to(text, Align::MidLeft),
                None => image.with_align(Align::MidLeft),
            };
            if let ObjKind::Image(data) = &mut image.kind {
                data.foreground = color;
            }
            gui.pool_mut().alloc_child(container, image)?;
        }

        let mut switch = None;
        let right = match item.icon_right {
            Some(icon) => {
                let mut image = Obj::new(ObjKind::image(icon));
                if let ObjKind::Image(data) = &mut image.kind {
                    data.foreground = color;
                }
                Some(image)
            }
            None if item.kind == ItemType::Switch => Some(Obj::new(ObjKind::switch(item.state))),
            None => None,
        };
        if let Some(mut right) = right {
            right = right.with_margins(intervale as i16, 0);
            right = match text {
                Some(text) => right.with_align_to(text, Align::MidRight),
                None => right.with_align(Align::MidRight),
            };
            let is_switch = matches!(right.kind, ObjKind::Switch(_));
            let handle = gui.pool_mut().alloc_child(container, right)?;
            if is_switch {
                switch = Some(handle);
            }
        }

        if let Some(sub_text) = item.sub_text {
            let sub_height = gui
                .frontend()
                .text_height_in_width(FontId::SmallRegular, sub_text, width, true);
            let mut obj = Obj::new(ObjKind::text(sub_text, FontId::SmallRegular))
                .with_text_color(color)
                .with_size(width, sub_height);
            let margin_x = item.icon_left.map_or(0, |icon| -((icon.width + intervale) as i16));
            let margin_y = match text {
                Some(text) => {
                    obj = obj.with_align_to(text, Align::BottomLeft);
                    profile.list_item_heading_sub_text as i16
                }
                None => {
                    obj = obj.with_align(Align::TopLeft);
                    gui.pool_mut().get_mut(container)?.area.height = SUB_HEADER_MARGIN as u16;
                    SUB_HEADER_MARGIN
                }
            };
            gui.pool_mut().alloc_child(container, obj.with_margins(margin_x, margin_y))?;
            gui.pool_mut().get_mut(container)?.area.height += sub_height + margin_y as u16;
        }

        if touchable {
            let role = match switch {
                Some(switch) => Role::Switch { switch },
                None => Role::Plain,
            };
            self.register(container, item.token, item.index, item.tune, role)?;
        }
        gui.pool_mut().add_child(self.container, container)?;
        Ok(gui.pool().get(container)?.area.height)
    }

    /// Touchable bar in the main container, returns its height
    pub fn add_touchable_bar<F: Frontend>(&mut self, gui: &mut Gui<F>, bar: &ListItem) -> NbglResult<u16> {
        debug!(" Adding touchable bar {:?}", bar.text);
        self.add_list_item(
            gui,
            &ItemSpec {
                kind: ItemType::TouchableBar,
                text: Some(bar.text),
                sub_text: bar.sub_text,
                icon_left: bar.icon_left,
                icon_right: bar.icon_right,
                state: if bar.inactive { State::Off } else { State::On },
                large: bar.large,
                token: bar.token,
                index: bar.index,
                tune: bar.tune,
            },
        )
    }

    /// Text with a switch; a touch toggles it and reports the new state as index
    pub fn add_switch<F: Frontend>(&mut self, gui: &mut Gui<F>, switch: &Switch) -> NbglResult<u16> {
        debug!(" Adding switch {:?}", switch.text);
        self.add_list_item(
            gui,
            &ItemSpec {
                kind: ItemType::Switch,
                text: Some(switch.text),
                sub_text: switch.sub_text,
                icon_left: None,
                icon_right: None,
                state: switch.init_state,
                large: false,
                token: switch.token,
                index: 0,
                tune: switch.tune,
            },
        )
    }

    /// Bold text and regular sub-text, not touchable
    pub fn add_text<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        text: Option<&str>,
        sub_text: Option<&str>,
    ) -> NbglResult<u16> {
        self.add_list_item(
            gui,
            &ItemSpec {
                kind: ItemType::Text,
                text,
                sub_text,
                icon_left: None,
                icon_right: None,
                state: State::On,
                large: false,
                token: INVALID_TOKEN,
                index: 0,
                tune: NO_TUNE,
            },
        )
    }

    /// Like [`Layout::add_text`], with a push icon reporting `(token, index)`
    pub fn add_text_with_alias<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        text: &str,
        sub_text: Option<&str>,
        token: u8,
        index: u8,
    ) -> NbglResult<u16> {
        self.add_list_item(
            gui,
            &ItemSpec {
                kind: ItemType::TouchableBar,
                text: Some(text),
                sub_text,
                icon_left: None,
                icon_right: Some(icons::MINI_PUSH),
                state: State::On,
                large: false,
                token,
                index,
                tune: NO_TUNE,
            },
        )
    }

    /// Paragraph in the large font, returns its height
    pub fn add_large_case_text<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        text: &str,
        grayed_out: bool,
    ) -> NbglResult<u16> {
        let profile = *gui.profile();
        let width = profile.available_width();
        let height = gui
            .frontend()
            .text_height_in_width(FontId::LargeMedium, text, width, true);
        let margin_y = if self.nb_objects(gui)? == 0 {
            PRE_FIRST_TEXT_MARGIN
        } else {
            INTER_PARAGRAPHS_MARGIN
        };
        let obj = Obj::new(ObjKind::text(text, FontId::LargeMedium))
            .with_text_color(if grayed_out { INACTIVE_COLOR } else { Color::Black })
            .with_size(width, height)
            .with_margins(profile.border_margin as i16, margin_y);
        self.add_object(gui, obj)?;
        Ok(height)
    }

    /// Radio buttons, one per name, separated by lines
    pub fn add_radio_choice<F: Frontend>(&mut self, gui: &mut Gui<F>, choices: &RadioChoice) -> NbglResult<()> {
        let profile = *gui.profile();
        debug!(" Adding {} radio choices", choices.names.len());
        for (i, name) in choices.names.iter().enumerate() {
            let selected = i == choices.init_choice as usize;
            let container = gui.pool_mut().alloc(
                self.layer,
                Obj::new(ObjKind::container(Direction::Horizontal))
                    .with_size(profile.available_width(), profile.radio_choice_height)
                    .with_margins(profile.border_margin as i16, 0)
                    .with_touch(TouchType::Touched.mask(), TouchId::Controls(self.nb_touchable_controls)),
            )?;
            self.nb_touchable_controls += 1;

            let (color, font) = if selected {
                (Color::Black, FontId::SmallBold)
            } else {
                (LIGHT_TEXT_COLOR, FontId::SmallRegular)
            };
            let text_height = gui.frontend().font_height(font);
            let text = gui.pool_mut().alloc_child(
                container,
                Obj::new(ObjKind::text(*name, font))
                    .with_text_color(color)
                    .with_size(profile.available_width() - RADIO_SIZE, text_height)
                    .with_align(Align::MidLeft),
            )?;
            let mut radio = Obj::new(ObjKind::radio(State::from(selected))).with_align(Align::MidRight);
            if let ObjKind::Radio(data) = &mut radio.kind {
                data.border_color = Color::LightGray;
            }
            let radio = gui.pool_mut().alloc_child(container, radio)?;

            self.register(container, choices.token, i as u8, choices.tune, Role::Radio { radio, text })?;
            gui.pool_mut().add_child(self.container, container)?;
            let line = Layout::horizontal_line(profile.screen_width).with_margins(0, -1);
            self.add_object(gui, line)?;
        }
        Ok(())
    }

    /// Icon and texts centered in the main container, returns the height
    pub fn add_centered_info<F: Frontend>(&mut self, gui: &mut Gui<F>, info: &CenteredInfo) -> NbglResult<u16> {
        let mut center = ContentCenter {
            icon: info.icon,
            ..Default::default()
        };
        if let Some(text1) = info.text1 {
            if info.style == CenteredInfoStyle::NormalInfo {
                center.small_title = Some(text1);
            } else {
                center.title = Some(text1);
            }
        }
        if let Some(text2) = info.text2 {
            if info.style == CenteredInfoStyle::LargeCaseBoldInfo {
                center.small_title = Some(text2);
            } else {
                center.description = Some(text2);
            }
        }
        if let Some(text3) = info.text3 {
            if info.style == CenteredInfoStyle::LargeCaseGrayInfo {
                center.sub_text = Some(text3);
            } else {
                center.description = Some(text3);
            }
        }
        let container = self.content_center(gui, &center)?;
        let border = gui.profile().border_margin as i16;
        let obj = gui.pool_mut().get_mut(container)?;
        if info.on_top {
            obj.align = Align::NoAlignment;
            obj.margin_x = border;
            obj.margin_y = border + info.offset_y;
        } else {
            obj.margin_y = info.offset_y;
        }
        Ok(obj.area.height)
    }

    /// Icon and texts centered in the main container, returns the height
    pub fn add_content_center<F: Frontend>(&mut self, gui: &mut Gui<F>, info: &ContentCenter) -> NbglResult<u16> {
        let container = self.content_center(gui, info)?;
        Ok(gui.pool().get(container)?.area.height)
    }

    fn content_center<F: Frontend>(&mut self, gui: &mut Gui<F>, info: &ContentCenter) -> NbglResult<ObjHandle> {
        let width = gui.profile().available_width();
        let container = gui.pool_mut().alloc(
            self.layer,
            Obj::new(ObjKind::container(Direction::Vertical))
                .with_size(width, 0)
                .with_align(Align::Center),
        )?;
        let mut full_height = 0u16;
        // previous child and whether it is the icon
        let mut prev: Option<(ObjHandle, bool)> = None;

        if let Some(icon) = info.icon {
            let image = Obj::new(ObjKind::image(icon))
                .with_align(Align::TopMiddle)
                .with_margins(0, info.icon_hug as i16);
            prev = Some((gui.pool_mut().alloc_child(container, image)?, true));
            full_height += icon.height + info.icon_hug;
        }

        let texts = [
            (info.title, FontId::LargeMedium, Color::Black),
            (info.small_title, FontId::SmallBold, Color::Black),
            (info.description, FontId::SmallRegular, Color::Black),
            (info.sub_text, FontId::SmallRegular, LIGHT_TEXT_COLOR),
        ];
        for (slot, (text, font, color)) in texts.into_iter().enumerate() {
            let Some(text) = text else {
                continue;
            };
            let is_sub_text = slot == 3;
            let mut height = gui.frontend().text_height_in_width(font, text, width, true);
            if is_sub_text {
                height += 2 * SUB_TEXT_HUG;
            }
            let mut obj = Obj::new(ObjKind::text(text, font))
                .with_text_color(color)
                .with_text_align(Align::Center)
                .with_size(width, height);
            let margin = match prev {
                Some((handle, after_icon)) => {
                    obj = obj.with_align_to(handle, Align::BottomMiddle);
                    match slot {
                        0 => ICON_TITLE_MARGIN + info.icon_hug,
                        1 if after_icon => VERTICAL_BORDER_MARGIN + info.icon_hug,
                        1 => TITLE_DESC_MARGIN,
                        2 if after_icon => ICON_TITLE_MARGIN + info.icon_hug,
                        2 => TITLE_DESC_MARGIN,
                        _ if after_icon => TITLE_DESC_MARGIN + info.icon_hug,
                        _ => TITLE_DESC_MARGIN,
                    }
                }
                None => {
                    obj = obj.with_align(Align::TopMiddle);
                    0
                }
            };
            full_height += height + margin;
            let handle = gui.pool_mut().alloc_child(container, obj.with_margins(0, margin as i16))?;
            prev = Some((handle, false));
        }

        if info.padding {
            full_height += CONTENT_CENTER_PADDING;
        }
        gui.pool_mut().get_mut(container)?.area.height = full_height;
        gui.pool_mut().add_child(self.container, container)?;
        Ok(container)
    }

    /// QR code with up to two texts below, returns the height
    pub fn add_qr_code<F: Frontend>(&mut self, gui: &mut Gui<F>, info: &QrCodeDesc) -> NbglResult<u16> {
        let width = gui.profile().available_width();
        let container = gui
            .pool_mut()
            .alloc(self.layer, Obj::new(ObjKind::container(Direction::Vertical)))?;
        let mut size = QrCodeSize::for_url(info.url);
        let qr_code = gui.pool_mut().alloc_child(
            container,
            Obj::new(ObjKind::QrCode(QrCodeData {
                text: info.url.to_string(),
                foreground: Color::Black,
            }))
            .with_size(size.side(), size.side())
            .with_align(Align::TopMiddle),
        )?;
        let mut full_height = size.side();
        let mut prev = qr_code;

        if let Some(text1) = info.text1 {
            let font = if info.large_text1 { FontId::LargeMedium } else { FontId::SmallRegular };
            let height = gui.frontend().text_height_in_width(font, text1, width, true);
            prev = gui.pool_mut().alloc_child(
                container,
                Obj::new(ObjKind::text(text1, font))
                    .with_text_align(Align::Center)
                    .with_size(width, height)
                    .with_align_to(prev, Align::BottomMiddle)
                    .with_margins(0, QR_PRE_TEXT_MARGIN as i16),
            )?;
            full_height += height + QR_PRE_TEXT_MARGIN;
        }
        if let Some(text2) = info.text2 {
            let height = gui
                .frontend()
                .text_height_in_width(FontId::SmallRegular, text2, width, true);
            let margin = if info.text1.is_some() {
                QR_INTER_TEXTS_MARGIN
            } else {
                QR_PRE_TEXT_MARGIN + SUB_TEXT_HUG
            };
            gui.pool_mut().alloc_child(
                container,
                Obj::new(ObjKind::text(text2, FontId::SmallRegular))
                    .with_text_color(LIGHT_TEXT_COLOR)
                    .with_text_align(Align::Center)
                    .with_size(width, height)
                    .with_align_to(prev, Align::BottomMiddle)
                    .with_margins(0, margin as i16),
            )?;
            full_height += height + margin + SUB_TEXT_HUG;
        }

        // shrink the code when it does not fit the main container
        let room = self.container_height(gui)?.saturating_sub(QR_MAIN_CONTAINER_MARGIN);
        if full_height >= room && size == QrCodeSize::V4 {
            full_height -= size.side() - QrCodeSize::V4Small.side();
            size = QrCodeSize::V4Small;
            let area = &mut gui.pool_mut().get_mut(qr_code)?.area;
            area.width = size.side();
            area.height = size.side();
            debug!(" QR code reduced to {:?}", size);
        }

        let last = self.last_object(gui)?;
        let obj = gui.pool_mut().get_mut(container)?;
        obj.area.width = width;
        obj.area.height = full_height;
        obj.margin_y = info.offset_y;
        match last {
            Some(last) if !info.centered => {
                obj.align = Align::BottomMiddle;
                obj.align_to = Some(last);
            }
            _ => obj.align = Align::Center,
        }
        gui.pool_mut().add_child(self.container, container)?;
        Ok(full_height)
    }

    /// Tag/value pairs stacked from the top of the main container
    pub fn add_tag_value_list<F: Frontend>(&mut self, gui: &mut Gui<F>, list: &TagValueList) -> NbglResult<()> {
        let profile = *gui.profile();
        let width = profile.available_width();
        let value_font = if list.small_case_for_value {
            FontId::SmallBold
        } else {
            FontId::LargeMedium
        };
        let header_has_line = match self.header {
            Some(header) => gui
                .pool()
                .get(header)?
                .children()
                .and_then(|children| children.last().copied())
                .map(|last| gui.pool().get(last).map(|obj| matches!(obj.kind, ObjKind::Line(_))))
                .transpose()?
                .unwrap_or(false),
            None => false,
        };

        for (i, pair) in list.pairs.iter().enumerate() {
            let container = gui
                .pool_mut()
                .alloc(self.layer, Obj::new(ObjKind::container(Direction::Vertical)))?;
            let item_height = gui
                .frontend()
                .text_height_in_width(FontId::SmallRegular, &pair.item, width, true);
            let item = gui.pool_mut().alloc_child(
                container,
                Obj::new(ObjKind::text(pair.item.as_str(), FontId::SmallRegular))
                    .with_text_color(LIGHT_TEXT_COLOR)
                    .with_size(width, item_height),
            )?;

            let value_icon = if pair.alias { Some(icons::MINI_PUSH) } else { pair.value_icon };
            let value_width = match value_icon {
                Some(icon) => width - icon.width - ICON_TEXT_SPACE,
                None => width,
            };
            let mut nb_lines = gui
                .frontend()
                .nb_lines_in_width(value_font, &pair.value, value_width, list.wrapping);
            let mut value = Obj::new(ObjKind::text(pair.value.as_str(), value_font));
            if list.nb_max_lines_for_value > 0 && nb_lines > list.nb_max_lines_for_value as u16 {
                nb_lines = list.nb_max_lines_for_value as u16;
                value = value.with_max_lines(list.nb_max_lines_for_value);
            }
            if let ObjKind::TextArea(data) = &mut value.kind {
                data.wrapping = list.wrapping;
            }
            let value_height = nb_lines * gui.frontend().line_height(value_font);
            let value = gui.pool_mut().alloc_child(
                container,
                value
                    .with_size(value_width, value_height)
                    .with_align_to(item, Align::BottomLeft)
                    .with_margins(0, TAG_VALUE_MARGIN_Y),
            )?;

            if let Some(icon) = value_icon {
                gui.pool_mut().alloc_child(
                    container,
                    Obj::new(ObjKind::image(icon))
                        .with_align_to(value, Align::RightTop)
                        .with_margins(ICON_TEXT_SPACE as i16, 0),
                )?;
                let index = list.start_index.saturating_add(i as u8);
                let obj = gui.pool_mut().get_mut(container)?;
                obj.touch_mask = TouchType::Touched.mask();
                obj.touch_id = TouchId::ValueButton(i as u8);
                self.register(container, list.token, index, list.tune, Role::Plain)?;
            }

            let margin_y = if i > 0 || header_has_line {
                profile.inter_tag_value_margin
            } else {
                profile.pre_tag_value_margin
            };
            let obj = gui.pool_mut().get_mut(container)?;
            obj.area.width = width;
            obj.area.height = item_height + TAG_VALUE_MARGIN_Y as u16 + value_height;
            obj.margin_x = profile.border_margin as i16;
            obj.margin_y = margin_y as i16;
            gui.pool_mut().add_child(self.container, container)?;
        }
        Ok(())
    }

    /// Progress bar with a text and an optional sub-text, centered
    pub fn add_progress_bar<F: Frontend>(&mut self, gui: &mut Gui<F>, desc: &ProgressBarDesc) -> NbglResult<u16> {
        let width = gui.profile().available_width();
        let container = gui.pool_mut().alloc(
            self.layer,
            Obj::new(ObjKind::container(Direction::Vertical))
                .with_size(width, 0)
                .with_align(Align::Center),
        )?;
        let bar = gui.pool_mut().alloc_child(
            container,
            Obj::new(ObjKind::progress_bar(desc.percentage, true))
                .with_size(PROGRESS_BAR_WIDTH, PROGRESS_BAR_HEIGHT)
                .with_align(Align::TopMiddle),
        )?;
        let mut height = PROGRESS_BAR_HEIGHT;

        let text_height = gui
            .frontend()
            .text_height_in_width(FontId::LargeMedium, desc.text, width, true);
        let text = gui.pool_mut().alloc_child(
            container,
            Obj::new(ObjKind::text(desc.text, FontId::LargeMedium))
                .with_text_align(Align::Center)
                .with_size(width, text_height)
                .with_align_to(bar, Align::BottomMiddle)
                .with_margins(0, BAR_TEXT_MARGIN as i16),
        )?;
        height += BAR_TEXT_MARGIN + text_height;

        if let Some(sub_text) = desc.sub_text {
            let sub_height = gui
                .frontend()
                .text_height_in_width(FontId::SmallRegular, sub_text, width, true);
            gui.pool_mut().alloc_child(
                container,
                Obj::new(ObjKind::text(sub_text, FontId::SmallRegular))
                    .with_text_align(Align::Center)
                    .with_size(width, sub_height)
                    .with_align_to(text, Align::BottomMiddle)
                    .with_margins(0, BAR_INTER_TEXTS_MARGIN as i16),
            )?;
            height += BAR_INTER_TEXTS_MARGIN + sub_height;
        }
        // containers are a multiple of 8 pixels high
        height = (height + 7) & !7;
        gui.pool_mut().get_mut(container)?.area.height = height;
        gui.pool_mut().add_child(self.container, container)?;
        Ok(height)
    }

    /// Light gray line below the last added object
    pub fn add_separation_line<F: Frontend>(&mut self, gui: &mut Gui<F>) -> NbglResult<()> {
        let line = Layout::horizontal_line(gui.profile().screen_width).with_margins(0, -1);
        self.add_object(gui, line)?;
        Ok(())
    }

    /// Rounded button; full-width bottom buttons go to the footer, or to the
    /// up-footer when a footer already exists
    pub fn add_button<F: Frontend>(&mut self, gui: &mut Gui<F>, info: &LayoutButton) -> NbglResult<u16> {
        if info.on_bottom && !info.fitting_content {
            if self.footer.is_none() {
                return self.add_footer(
                    gui,
                    &FooterDesc {
                        kind: FooterKind::SimpleButton {
                            text: info.text,
                            icon: info.icon,
                            style: info.style,
                            token: info.token,
                            tune: info.tune,
                        },
                        separation_line: false,
                    },
                );
            }
            return self.add_up_footer(
                gui,
                &UpFooterDesc::Button {
                    text: info.text,
                    icon: info.icon,
                    style: info.style,
                    token: info.token,
                    tune: info.tune,
                },
            );
        }

        let profile = *gui.profile();
        let (width, height, radius, mut margin_x) = if info.fitting_content {
            let text_width = info
                .text
                .map_or(0, |text| gui.frontend().text_width(FontId::SmallBold, text));
            let icon_width = info.icon.map_or(0, |icon| icon.width + ICON_TEXT_SPACE);
            (
                text_width + profile.small_button_height + icon_width,
                profile.small_button_height,
                profile.small_button_radius,
                profile.border_margin as i16,
            )
        } else {
            (
                profile.available_width(),
                profile.button_diameter,
                profile.button_diameter / 2,
                profile.border_margin as i16,
            )
        };
        if info.fitting_content && !info.on_bottom {
            margin_x += (profile.available_width().saturating_sub(width) / 2) as i16;
        }
        let id = if info.fitting_content { TouchId::ExtraButton } else { TouchId::SingleButton };
        let obj = Obj::new(styled_button(info.text, info.icon, info.style, radius))
            .with_size(width, height)
            .with_margins(margin_x, BUTTON_MARGIN_Y)
            .with_touch(TouchType::Touched.mask(), id);
        let button = self.add_object(gui, obj)?;
        self.register(button, info.token, 0, info.tune, Role::Plain)?;
        Ok(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::MockFrontend;
    use crate::layout::tests::{gui, touch};
    use crate::layout::{LayoutDescription, LayoutEvent};

    fn layout(gui: &mut Gui<MockFrontend>) -> Layout {
        Layout::new(gui, &LayoutDescription::default()).unwrap()
    }

    #[test]
    fn test_switch_toggles_and_reports_state() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let height = layout
            .add_switch(
                &mut gui,
                &Switch {
                    text: "Blind signing",
                    sub_text: Some("Enable transaction blind signing"),
                    init_state: State::Off,
                    token: 12,
                    tune: NO_TUNE,
                },
            )
            .unwrap();
        assert!(height > 40 + 2 * 24, "Sub-text adds to the minimal height");
        layout.draw(&mut gui).unwrap();

        let entry = *layout.callback_obj(0).unwrap();
        let event = layout.on_touch(&mut gui, &touch(entry.obj, TouchType::Touched)).unwrap();
        assert_eq!(
            event,
            Some(LayoutEvent::Action {
                token: 12,
                index: 1,
                tune: NO_TUNE
            }),
            "Switch now on"
        );
        let event = layout.on_touch(&mut gui, &touch(entry.obj, TouchType::Touched)).unwrap();
        assert_eq!(
            event,
            Some(LayoutEvent::Action {
                token: 12,
                index: 0,
                tune: NO_TUNE
            }),
            "Switch back off"
        );
    }

    #[test]
    fn test_inactive_bar_is_not_touchable() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let mut bar = ListItem::new("Disabled", 3);
        bar.inactive = true;
        layout.add_touchable_bar(&mut gui, &bar).unwrap();
        assert_eq!(layout.nb_callback_objs(), 0);

        let bar = ListItem {
            icon_right: Some(icons::MINI_PUSH),
            index: 4,
            ..ListItem::new("Settings", 3)
        };
        layout.add_touchable_bar(&mut gui, &bar).unwrap();
        assert_eq!(layout.callback_obj(0).unwrap().index, 4);
    }

    #[test]
    fn test_radio_choice_moves_selection() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let names = ["English", "Français", "Deutsch"];
        layout
            .add_radio_choice(
                &mut gui,
                &RadioChoice {
                    names: &names,
                    init_choice: 0,
                    token: 20,
                    tune: NO_TUNE,
                },
            )
            .unwrap();
        assert_eq!(layout.nb_objects(&gui).unwrap(), 6, "One container and one line per choice");
        layout.draw(&mut gui).unwrap();

        let third = layout.callback_obj(2).unwrap().obj;
        let event = layout.on_touch(&mut gui, &touch(third, TouchType::Touched)).unwrap();
        assert_eq!(
            event,
            Some(LayoutEvent::Action {
                token: 20,
                index: 2,
                tune: NO_TUNE
            })
        );
        let states: alloc::vec::Vec<State> = (0..3)
            .map(|i| {
                let Role::Radio { radio, .. } = layout.callback_obj(i).unwrap().role else {
                    panic!("Radio role expected");
                };
                gui.pool_mut().get_mut(radio).unwrap().radio_mut().unwrap().state
            })
            .collect();
        assert_eq!(states, [State::Off, State::Off, State::On]);
    }

    #[test]
    fn test_centered_info_height() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let height = layout
            .add_centered_info(
                &mut gui,
                &CenteredInfo {
                    text1: Some("Review"),
                    text2: Some("Send"),
                    icon: Some(icons::WARNING),
                    ..Default::default()
                },
            )
            .unwrap();
        // icon, large title, description
        assert_eq!(height, 64 + (24 + 40) + (16 + 32));
        layout.draw(&mut gui).unwrap();
        assert!(gui.frontend().has_text("Review") && gui.frontend().has_text("Send"));
    }

    #[test]
    fn test_qr_code_version_from_url_length() {
        assert_eq!(QrCodeSize::for_url("0x1234"), QrCodeSize::V4);
        let long = "a".repeat(63);
        assert_eq!(QrCodeSize::for_url(&long), QrCodeSize::V10);
        assert_eq!(QrCodeSize::V10.side(), 228);
    }

    #[test]
    fn test_qr_code_shrinks_when_too_tall() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        layout.shrink_container(&mut gui, 400).unwrap();
        let height = layout
            .add_qr_code(
                &mut gui,
                &QrCodeDesc {
                    url: "0x1234",
                    text1: Some("0x1234"),
                    text2: None,
                    large_text1: false,
                    centered: true,
                    offset_y: 0,
                },
            )
            .unwrap();
        assert_eq!(height, 132 + 24 + 32, "Small V4 code is used");
    }

    #[test]
    fn test_tag_value_alias_is_touchable() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let pairs = [
            TagValue::new("Amount", "1.5 ETH"),
            TagValue {
                alias: true,
                ..TagValue::new("To", "vitalik.eth")
            },
        ];
        let list = TagValueList {
            token: 30,
            start_index: 4,
            ..TagValueList::new(&pairs)
        };
        layout.add_tag_value_list(&mut gui, &list).unwrap();
        assert_eq!(layout.nb_callback_objs(), 1, "Only the alias pair is touchable");
        assert_eq!(layout.callback_obj(0).unwrap().index, 5);
        layout.draw(&mut gui).unwrap();
        assert!(gui.frontend().icons().contains(&"mini_push"));
    }

    #[test]
    fn test_tag_value_lines_are_capped() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let pairs = [TagValue::new("Data", "x".repeat(200))];
        let list = TagValueList {
            nb_max_lines_for_value: 2,
            ..TagValueList::new(&pairs)
        };
        layout.add_tag_value_list(&mut gui, &list).unwrap();
        let container = layout.last_object(&gui).unwrap().unwrap();
        assert_eq!(
            gui.pool().get(container).unwrap().area.height,
            32 + 4 + 2 * 40,
            "Item line plus two value lines"
        );
    }

    #[test]
    fn test_progress_bar_height_is_multiple_of_8() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let height = layout
            .add_progress_bar(
                &mut gui,
                &ProgressBarDesc {
                    text: "Updating",
                    sub_text: None,
                    percentage: 30,
                },
            )
            .unwrap();
        assert_eq!(height % 8, 0);
        assert!(height >= 12 + 24 + 40);
    }

    #[test]
    fn test_bottom_button_goes_to_footer_then_up_footer() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let button = LayoutButton {
            text: Some("Continue"),
            icon: None,
            style: ButtonStyle::BlackBackground,
            fitting_content: false,
            on_bottom: true,
            token: 1,
            tune: NO_TUNE,
        };
        layout.add_button(&mut gui, &button).unwrap();
        assert!(layout.footer().is_some());
        layout.add_button(&mut gui, &button).unwrap();
        assert!(layout.up_footer().is_some(), "Second bottom button lands in the up-footer");
        assert_eq!(layout.nb_objects(&gui).unwrap(), 0, "Main container untouched");
    }

    #[test]
    fn test_fitting_button_in_main_container() {
        let mut gui = gui();
        let mut layout = layout(&mut gui);
        let button = LayoutButton {
            text: Some("Details"),
            icon: None,
            style: ButtonStyle::WhiteBackground,
            fitting_content: true,
            on_bottom: false,
            token: 2,
            tune: NO_TUNE,
        };
        assert_eq!(layout.add_button(&mut gui, &button).unwrap(), 64);
        let handle = layout.last_object(&gui).unwrap().unwrap();
        let obj = gui.pool().get(handle).unwrap();
        assert_eq!(obj.area.width, 70 + 64, "Text width plus the small button height");
        assert_eq!(obj.touch_id, TouchId::ExtraButton);
    }
}
