// src/page.rs
//! Full pages built on top of the layout builder.
//!
//! A page is a [`Layout`] filled from a small descriptor: a generic content
//! page (one page worth of a [`Content`] plus its navigation), an info page
//! (centered info with optional buttons), or a confirmation page.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use log::debug;

use crate::config::Profile;
use crate::content::{
    BarsList, ChoicesList, Content, ExtendedCenter, InfosList, Pairs, SwitchItem, TagValueConfirm, TagValueDetails,
    TagValueListContent,
};
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::gui::{Gui, Ticker};
use crate::icons::{self, Icon};
use crate::layout::{
    ButtonStyle, CenteredInfo, ChoiceStyle, ContentCenter, FooterDesc, FooterKind, HeaderDesc, HeaderKind, Layout,
    LayoutButton, LayoutDescription, ListItem, NavigationBar, RadioChoice, Switch, TagValue, TagValueList,
    UpFooterDesc,
};
use crate::paginator::Paginator;
use crate::types::{INVALID_TOKEN, NO_TUNE, TuneId};

/// Token of the "More" button of a too long pair
pub const DETAILS_BUTTON_TOKEN: u8 = 10;
/// Token reported by a tag/value list holding aliases
pub const VALUE_ALIAS_TOKEN: u8 = 13;

/// Below this height left in the main container, list items get no separation line
const MIN_HEIGHT_FOR_SEPARATION_LINE: u16 = 10;

// ----------------------------------------------------------------------------
// Descriptors
// ----------------------------------------------------------------------------

/// Navigation controls of a generic content page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNav<'a> {
    pub active_page: u8,
    pub nb_pages: u8,
    /// Reported with the new page index as index
    pub nav_token: u8,
    /// Text on the left of the navigation keys, or alone when there is one page
    pub quit_text: Option<&'a str>,
    pub quit_token: u8,
    /// Exit key in the navigation bar, when there is no quit text
    pub quit_button: bool,
    pub back_button: bool,
    pub visible_indicator: bool,
    /// Touchable text in the top right corner
    pub skip_text: Option<&'a str>,
    pub skip_token: u8,
    pub tune: TuneId,
}

impl Default for PageNav<'_> {
    fn default() -> Self {
        Self {
            active_page: 0,
            nb_pages: 1,
            nav_token: INVALID_TOKEN,
            quit_text: None,
            quit_token: INVALID_TOKEN,
            quit_button: false,
            back_button: true,
            visible_indicator: true,
            skip_text: None,
            skip_token: INVALID_TOKEN,
            tune: NO_TUNE,
        }
    }
}

/// One page worth of a content
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Header with a back key, reporting `title_token`
    pub title: Option<String>,
    pub title_token: u8,
    pub top_right: Option<(Icon, u8)>,
    pub tune: TuneId,
    pub body: Content,
}

impl PageContent {
    pub fn new(body: Content) -> Self {
        Self {
            title: None,
            title_token: INVALID_TOKEN,
            top_right: None,
            tune: NO_TUNE,
            body,
        }
    }
}

/// Pair too long for a review page, shown in full on demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairDetails {
    pub item: String,
    pub value: String,
    pub wrapping: bool,
}

/// Centered info page with optional controls around it
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoPage<'a> {
    pub centered_info: CenteredInfo<'a>,
    pub top_right: Option<(Icon, u8)>,
    /// Fitted button below the centered info, or top button of the choice
    /// above "Quit app" when `quit_app` is set
    pub action_text: Option<&'a str>,
    pub action_icon: Option<Icon>,
    pub action_style: ButtonStyle,
    /// "Quit app" at the bottom
    pub quit_app: bool,
    /// Reported by the action button (index 0) and by "Quit app" (index 1)
    pub bottom_token: u8,
    pub footer_text: Option<&'a str>,
    pub footer_token: u8,
    /// Makes the whole page tappable
    pub tap_action_text: Option<&'a str>,
    pub tap_action_token: u8,
    pub tune: TuneId,
}

/// Centered info above a confirm button and a cancel footer
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPage<'a> {
    pub centered_info: CenteredInfo<'a>,
    pub confirmation_text: &'a str,
    /// "Cancel" when not given
    pub cancel_text: Option<&'a str>,
    /// Confirm reports index 0, cancel index 1
    pub token: u8,
    pub tune: TuneId,
    pub modal: bool,
}

/// Warning shown before a risky flow: icon and texts above a choice between
/// going back and going on, with a top right button for more information
#[derive(Debug, Clone, Copy)]
pub struct WarningPage<'a> {
    pub icon: Icon,
    pub title: &'a str,
    pub description: &'a str,
    /// Reported by the top right button
    pub info_token: u8,
    pub back_text: &'a str,
    pub continue_text: &'a str,
    /// Back reports index 0, continue index 1
    pub token: u8,
    pub tune: TuneId,
}

// ----------------------------------------------------------------------------
// Preparation
// ----------------------------------------------------------------------------

/// First page of a review: icon, title, description and a gray hint
pub fn review_first_page(
    icon: Option<Icon>,
    title: Option<&str>,
    description: Option<&str>,
    hint: &str,
) -> ExtendedCenter {
    ExtendedCenter {
        icon,
        title: title.map(String::from),
        small_title: None,
        description: description.map(String::from),
        sub_text: Some(hint.into()),
        tip_box: None,
    }
}

fn page_pairs(list: &TagValueListContent, start: u8, count: u8) -> (Pairs, u8) {
    let pairs = list.pairs.range(start as usize, count as usize);
    let token = if pairs.iter().any(|pair| pair.alias) {
        VALUE_ALIAS_TOKEN
    } else {
        list.token
    };
    (Pairs::Inline(pairs), token)
}

fn page_list(list: &TagValueListContent, start: u8, count: u8) -> TagValueListContent {
    let (pairs, token) = page_pairs(list, start, count);
    TagValueListContent {
        pairs,
        start_index: start,
        token,
        ..list.clone()
    }
}

fn slice<T: Clone>(items: &[T], start: u8, count: u8) -> Vec<T> {
    items.iter().skip(start as usize).take(count as usize).cloned().collect()
}

/// Cut the active page of `paginator` out of its content.
///
/// A flagged tag/value page becomes a centered page for a centered-info pair,
/// or a details page whose pair is returned for the "More" button.
pub fn prepare_page_content<const N: usize>(
    paginator: &Paginator<N>,
    profile: &Profile,
    title: Option<&str>,
) -> NbglResult<(PageContent, Option<PairDetails>)> {
    let content = paginator
        .current_content()
        .ok_or(NbglError::MalformedDescriptor("no content for page"))?;
    let start = paginator.current_element_idx();
    let info = paginator.active_page_info();
    let count = info.nb_elements;
    let mut details = None;

    let body = match content.as_ref() {
        Content::TagValueList(list) if info.flag => {
            let pair = list
                .pairs
                .get(start as usize)
                .ok_or(NbglError::ElementOutOfRange {
                    index: start as i32,
                    count: list.pairs.len(),
                })?;
            if pair.centered_info {
                Content::ExtendedCenter(review_first_page(
                    pair.value_icon,
                    Some(pair.item.as_str()),
                    Some(pair.value.as_str()),
                    "Swipe to review",
                ))
            } else {
                details = Some(PairDetails {
                    item: pair.item.clone(),
                    value: pair.value.clone(),
                    wrapping: list.wrapping,
                });
                Content::TagValueDetails(TagValueDetails {
                    list: TagValueListContent {
                        small_case_for_value: false,
                        nb_max_lines_for_value: profile.nb_max_lines_in_review,
                        ..page_list(list, start, count)
                    },
                    details_button_text: Some("More".into()),
                    details_button_icon: None,
                    details_button_token: DETAILS_BUTTON_TOKEN,
                })
            }
        }
        Content::TagValueList(list) => Content::TagValueList(TagValueListContent {
            small_case_for_value: false,
            nb_max_lines_for_value: profile.nb_max_lines_in_review,
            ..page_list(list, start, count)
        }),
        Content::TagValueConfirm(confirm) => {
            let list = page_list(&confirm.list, start, count);
            // the confirmation only comes with the last pairs
            if start as usize + count as usize == confirm.list.pairs.len() as usize {
                Content::TagValueConfirm(TagValueConfirm {
                    list,
                    ..confirm.clone()
                })
            } else {
                Content::TagValueList(list)
            }
        }
        Content::SwitchesList(switches) => Content::SwitchesList(slice(switches, start, count)),
        Content::InfosList(infos) => Content::InfosList(InfosList {
            types: slice(&infos.types, start, count),
            contents: slice(&infos.contents, start, count),
            extensions: slice(&infos.extensions, start, count),
            token: infos.token,
        }),
        Content::ChoicesList(choices) => {
            let init_choice = if (start..start.saturating_add(count)).contains(&choices.init_choice) {
                choices.init_choice - start
            } else {
                count
            };
            Content::ChoicesList(ChoicesList {
                names: slice(&choices.names, start, count),
                init_choice,
                ..choices.clone()
            })
        }
        Content::BarsList(bars) => Content::BarsList(BarsList {
            texts: slice(&bars.texts, start, count),
            tokens: slice(&bars.tokens, start, count),
            tune: bars.tune,
        }),
        other => other.clone(),
    };
    debug!(
        " Page {} shows {} from element {} ({} elements)",
        paginator.active_page(),
        body.name(),
        start,
        count
    );

    let page = PageContent {
        title: title.map(String::from),
        title_token: INVALID_TOKEN,
        top_right: None,
        tune: NO_TUNE,
        body,
    };
    Ok((page, details))
}

// ----------------------------------------------------------------------------
// Drawing
// ----------------------------------------------------------------------------

fn add_empty_header<F: Frontend>(layout: &mut Layout, gui: &mut Gui<F>, height: u16) -> NbglResult<u16> {
    layout.add_header(
        gui,
        &HeaderDesc {
            kind: HeaderKind::Empty { height },
            separation_line: false,
        },
    )
}

fn add_navigation<F: Frontend>(layout: &mut Layout, gui: &mut Gui<F>, nav: &PageNav) -> NbglResult<u16> {
    let mut used = 0;
    if let Some(text) = nav.skip_text {
        used += layout.add_header(
            gui,
            &HeaderDesc {
                kind: HeaderKind::RightText {
                    text,
                    token: nav.skip_token,
                    tune: nav.tune,
                },
                separation_line: false,
            },
        )?;
    }

    let kind = if nav.nb_pages > 1 {
        let navigation = NavigationBar {
            nb_pages: nav.nb_pages,
            active_page: nav.active_page,
            with_exit_key: nav.quit_text.is_none() && nav.quit_button,
            with_back_key: nav.back_button,
            with_page_indicator: nav.quit_text.is_some() && nav.visible_indicator,
            with_separation_line: false,
            token: nav.nav_token,
            tune: nav.tune,
        };
        match nav.quit_text {
            Some(text) => Some(FooterKind::TextAndNav {
                text,
                token: nav.quit_token,
                tune: nav.tune,
                navigation,
            }),
            None => Some(FooterKind::Nav(navigation)),
        }
    } else {
        nav.quit_text.map(|text| FooterKind::SimpleText {
            text,
            muted: false,
            token: nav.quit_token,
            tune: nav.tune,
        })
    };
    if let Some(kind) = kind {
        used += layout.add_footer(
            gui,
            &FooterDesc {
                kind,
                separation_line: true,
            },
        )?;
    }
    Ok(used)
}

fn add_tag_values<F: Frontend>(layout: &mut Layout, gui: &mut Gui<F>, list: &TagValueListContent) -> NbglResult<()> {
    let pairs: Cow<'_, [TagValue]> = match &list.pairs {
        Pairs::Inline(pairs) => Cow::Borrowed(pairs.as_slice()),
        Pairs::Callback { .. } => Cow::Owned(list.pairs.range(0, list.pairs.len() as usize)),
    };
    layout.add_tag_value_list(
        gui,
        &TagValueList {
            pairs: &pairs,
            start_index: list.start_index,
            nb_max_lines_for_value: list.nb_max_lines_for_value,
            small_case_for_value: list.small_case_for_value,
            wrapping: list.wrapping,
            token: list.token,
            tune: list.tune,
        },
    )
}

fn add_switches<F: Frontend>(
    layout: &mut Layout,
    gui: &mut Gui<F>,
    switches: &[SwitchItem],
    mut available: u16,
) -> NbglResult<()> {
    for switch in switches {
        let height = layout.add_switch(
            gui,
            &Switch {
                text: &switch.text,
                sub_text: switch.sub_text.as_deref(),
                init_state: switch.init_state,
                token: switch.token,
                tune: switch.tune,
            },
        )?;
        available = available.saturating_sub(height);
        if available > MIN_HEIGHT_FOR_SEPARATION_LINE {
            layout.add_separation_line(gui)?;
        }
    }
    Ok(())
}

fn add_infos<F: Frontend>(layout: &mut Layout, gui: &mut Gui<F>, infos: &InfosList, mut available: u16) -> NbglResult<()> {
    for (i, (kind, text)) in infos.types.iter().zip(&infos.contents).enumerate() {
        let height = if infos.extension(i).is_some() {
            layout.add_text_with_alias(gui, kind, Some(text.as_str()), infos.token, i as u8)?
        } else {
            layout.add_text(gui, Some(kind.as_str()), Some(text.as_str()))?
        };
        available = available.saturating_sub(height);
        if available > MIN_HEIGHT_FOR_SEPARATION_LINE {
            layout.add_separation_line(gui)?;
        }
    }
    Ok(())
}

fn add_bars<F: Frontend>(layout: &mut Layout, gui: &mut Gui<F>, bars: &BarsList, mut available: u16) -> NbglResult<()> {
    for (i, (text, &token)) in bars.texts.iter().zip(&bars.tokens).enumerate() {
        let height = layout.add_touchable_bar(
            gui,
            &ListItem {
                icon_right: Some(icons::PUSH),
                index: i as u8,
                tune: bars.tune,
                ..ListItem::new(text, token)
            },
        )?;
        available = available.saturating_sub(height);
        if available > MIN_HEIGHT_FOR_SEPARATION_LINE {
            layout.add_separation_line(gui)?;
        }
    }
    Ok(())
}

fn content_center<'a>(icon: Option<Icon>, title: &'a str) -> ContentCenter<'a> {
    ContentCenter {
        icon,
        title: Some(title),
        ..Default::default()
    }
}

fn add_content<F: Frontend>(
    layout: &mut Layout,
    gui: &mut Gui<F>,
    content: &PageContent,
    available: u16,
    mut header_added: bool,
) -> NbglResult<()> {
    let small_header = gui.profile().small_centering_header;
    if let Some(title) = &content.title {
        layout.add_header(
            gui,
            &HeaderDesc {
                kind: HeaderKind::BackAndText {
                    text: Some(title.as_str()),
                    token: content.title_token,
                    tune: content.tune,
                },
                separation_line: true,
            },
        )?;
        header_added = true;
    }
    if let Some((icon, token)) = content.top_right {
        layout.add_top_right_button(gui, icon, token, content.tune)?;
    }

    match &content.body {
        Content::InfoLongPress(info) => {
            layout.add_content_center(gui, &content_center(info.icon, &info.text))?;
            layout.add_long_press_button(gui, &info.long_press_text, info.long_press_token, info.tune)?;
        }
        Content::InfoButton(info) => {
            layout.add_content_center(gui, &content_center(info.icon, &info.text))?;
            layout.add_button(
                gui,
                &LayoutButton {
                    text: Some(info.button_text.as_str()),
                    icon: None,
                    style: ButtonStyle::BlackBackground,
                    fitting_content: false,
                    on_bottom: true,
                    token: info.button_token,
                    tune: info.tune,
                },
            )?;
        }
        Content::CenteredInfo(info) => {
            if !header_added {
                add_empty_header(layout, gui, small_header)?;
            }
            layout.add_centered_info(
                gui,
                &CenteredInfo {
                    text1: info.text1.as_deref(),
                    text2: info.text2.as_deref(),
                    text3: info.text3.as_deref(),
                    icon: info.icon,
                    on_top: info.on_top,
                    style: info.style,
                    offset_y: info.offset_y,
                },
            )?;
        }
        Content::ExtendedCenter(center) => {
            if !header_added && center.tip_box.is_none() {
                add_empty_header(layout, gui, small_header)?;
            }
            layout.add_content_center(
                gui,
                &ContentCenter {
                    icon: center.icon,
                    title: center.title.as_deref(),
                    small_title: center.small_title.as_deref(),
                    description: center.description.as_deref(),
                    sub_text: center.sub_text.as_deref(),
                    icon_hug: 0,
                    padding: false,
                },
            )?;
            if let Some(tip_box) = &center.tip_box {
                layout.add_up_footer(
                    gui,
                    &UpFooterDesc::TipBox {
                        text: Some(tip_box.text.as_str()),
                        icon: tip_box.icon,
                        token: tip_box.token,
                        tune: tip_box.tune,
                    },
                )?;
            }
        }
        Content::TagValueList(list) => {
            if !header_added {
                add_empty_header(layout, gui, small_header)?;
            }
            add_tag_values(layout, gui, list)?;
        }
        Content::TagValueDetails(details) => {
            if !header_added {
                add_empty_header(layout, gui, small_header)?;
            }
            // leave room for the button below the value
            let list = TagValueListContent {
                nb_max_lines_for_value: details.list.nb_max_lines_for_value.saturating_sub(3),
                ..details.list.clone()
            };
            add_tag_values(layout, gui, &list)?;
            layout.add_button(
                gui,
                &LayoutButton {
                    text: details.details_button_text.as_deref(),
                    icon: details.details_button_icon,
                    style: ButtonStyle::WhiteBackground,
                    fitting_content: true,
                    on_bottom: false,
                    token: details.details_button_token,
                    tune: details.list.tune,
                },
            )?;
        }
        Content::TagValueConfirm(confirm) => {
            if !header_added {
                add_empty_header(layout, gui, small_header)?;
            }
            add_tag_values(layout, gui, &confirm.list)?;
            if let Some(text) = &confirm.details_button_text {
                layout.add_button(
                    gui,
                    &LayoutButton {
                        text: Some(text.as_str()),
                        icon: confirm.details_button_icon,
                        style: ButtonStyle::WhiteBackground,
                        fitting_content: true,
                        on_bottom: false,
                        token: confirm.details_button_token,
                        tune: confirm.list.tune,
                    },
                )?;
            } else if let (Some(icon), Some(text)) = (confirm.details_button_icon, &confirm.confirmation_text) {
                layout.add_up_footer(
                    gui,
                    &UpFooterDesc::HorizontalButtons {
                        left_icon: Some(icon),
                        right_text: Some(text.as_str()),
                        left_token: confirm.details_button_token,
                        right_token: confirm.confirmation_token,
                        tune: confirm.list.tune,
                    },
                )?;
                return Ok(());
            }
            if let Some(text) = &confirm.confirmation_text {
                layout.add_button(
                    gui,
                    &LayoutButton {
                        text: Some(text.as_str()),
                        icon: None,
                        style: ButtonStyle::BlackBackground,
                        fitting_content: false,
                        on_bottom: true,
                        token: confirm.confirmation_token,
                        tune: confirm.list.tune,
                    },
                )?;
            }
        }
        Content::SwitchesList(switches) => add_switches(layout, gui, switches, available)?,
        Content::InfosList(infos) => add_infos(layout, gui, infos, available)?,
        Content::ChoicesList(choices) => {
            let names: Vec<&str> = choices.names.iter().map(String::as_str).collect();
            layout.add_radio_choice(
                gui,
                &RadioChoice {
                    names: &names,
                    init_choice: choices.init_choice,
                    token: choices.token,
                    tune: choices.tune,
                },
            )?;
        }
        Content::BarsList(bars) => add_bars(layout, gui, bars, available)?,
    }
    Ok(())
}

/// Build and draw a generic content page; the caller refreshes
pub fn draw_generic_content<F: Frontend>(
    gui: &mut Gui<F>,
    nav: Option<&PageNav>,
    content: &PageContent,
    modal: bool,
) -> NbglResult<Layout> {
    let mut layout = Layout::new(
        gui,
        &LayoutDescription {
            modal,
            with_left_border: true,
            ..Default::default()
        },
    )?;
    let mut available = gui.profile().screen_height;
    let header_added = match nav {
        Some(nav) => {
            available = available.saturating_sub(add_navigation(&mut layout, gui, nav)?);
            nav.skip_text.is_some()
        }
        None => false,
    };
    add_content(&mut layout, gui, content, available, header_added)?;
    layout.draw(gui)?;
    Ok(layout)
}

/// Build and draw an info page; the caller refreshes
pub fn draw_info<F: Frontend>(gui: &mut Gui<F>, info: &InfoPage, ticker: Option<Ticker>) -> NbglResult<Layout> {
    let mut layout = Layout::new(
        gui,
        &LayoutDescription {
            with_left_border: true,
            tap_action_text: info.tap_action_text,
            tap_action_token: info.tap_action_token,
            tap_tune: info.tune,
            ticker,
            ..Default::default()
        },
    )?;
    if info.top_right.is_some() {
        let height = gui.profile().small_centering_header;
        add_empty_header(&mut layout, gui, height)?;
    }
    layout.add_centered_info(gui, &info.centered_info)?;

    if let Some(text) = info.action_text
        && !info.quit_app
    {
        layout.add_button(
            gui,
            &LayoutButton {
                text: Some(text),
                icon: info.action_icon,
                style: info.action_style,
                fitting_content: true,
                on_bottom: false,
                token: info.bottom_token,
                tune: info.tune,
            },
        )?;
    }
    if let Some(text) = info.footer_text {
        layout.add_footer(
            gui,
            &FooterDesc {
                kind: FooterKind::SimpleText {
                    text,
                    muted: false,
                    token: info.footer_token,
                    tune: info.tune,
                },
                separation_line: true,
            },
        )?;
    }
    if let Some((icon, token)) = info.top_right {
        layout.add_top_right_button(gui, icon, token, info.tune)?;
    }
    if info.quit_app {
        let kind = match info.action_text {
            Some(text) => FooterKind::ChoiceButtons {
                top_text: Some(text),
                bottom_text: Some("Quit app"),
                top_icon: info.action_icon,
                style: if info.action_style == ButtonStyle::BlackBackground {
                    ChoiceStyle::StrongActionAndFooter
                } else {
                    ChoiceStyle::SoftActionAndFooter
                },
                token: info.bottom_token,
                tune: info.tune,
            },
            None => FooterKind::SimpleText {
                text: "Quit app",
                muted: false,
                token: info.bottom_token,
                tune: info.tune,
            },
        };
        layout.add_footer(
            gui,
            &FooterDesc {
                kind,
                separation_line: true,
            },
        )?;
    }
    layout.draw(gui)?;
    Ok(layout)
}

/// Build and draw a confirmation page; the caller refreshes
pub fn draw_confirmation<F: Frontend>(gui: &mut Gui<F>, page: &ConfirmationPage) -> NbglResult<Layout> {
    let mut layout = Layout::new(
        gui,
        &LayoutDescription {
            modal: page.modal,
            with_left_border: true,
            ..Default::default()
        },
    )?;
    let height = gui.profile().medium_centering_header;
    add_empty_header(&mut layout, gui, height)?;
    layout.add_footer(
        gui,
        &FooterDesc {
            kind: FooterKind::ChoiceButtons {
                top_text: Some(page.confirmation_text),
                bottom_text: Some(page.cancel_text.unwrap_or("Cancel")),
                top_icon: None,
                style: ChoiceStyle::RoundedAndFooter,
                token: page.token,
                tune: page.tune,
            },
            separation_line: false,
        },
    )?;
    layout.add_centered_info(gui, &page.centered_info)?;
    layout.draw(gui)?;
    Ok(layout)
}

/// Full screen warning, with the way back on top
pub fn draw_warning<F: Frontend>(gui: &mut Gui<F>, page: &WarningPage) -> NbglResult<Layout> {
    let mut layout = Layout::new(
        gui,
        &LayoutDescription {
            with_left_border: true,
            ..Default::default()
        },
    )?;
    let height = gui.profile().medium_centering_header;
    add_empty_header(&mut layout, gui, height)?;
    layout.add_top_right_button(gui, icons::INFO, page.info_token, page.tune)?;
    layout.add_footer(
        gui,
        &FooterDesc {
            kind: FooterKind::ChoiceButtons {
                top_text: Some(page.back_text),
                bottom_text: Some(page.continue_text),
                top_icon: None,
                style: ChoiceStyle::RoundedAndFooter,
                token: page.token,
                tune: page.tune,
            },
            separation_line: false,
        },
    )?;
    layout.add_content_center(
        gui,
        &ContentCenter {
            icon: Some(page.icon),
            title: Some(page.title),
            description: Some(page.description),
            ..Default::default()
        },
    )?;
    layout.draw(gui)?;
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ChoicesList, InfoLongPress};
    use crate::frontend::MockFrontend;
    use crate::paginator::AppPaginator;
    use alloc::format;
    use alloc::vec;

    fn gui() -> Gui<MockFrontend> {
        Gui::new(MockFrontend::new(), Profile::STAX)
    }

    fn pairs(n: usize) -> Vec<TagValue> {
        (0..n).map(|i| TagValue::new(format!("Tag {}", i), format!("Value {}", i))).collect()
    }

    fn paginate(contents: Vec<Content>) -> AppPaginator {
        let mut paginator = AppPaginator::new(contents);
        paginator
            .compute_pages(&MockFrontend::new(), &Profile::STAX, false)
            .unwrap();
        paginator
    }

    #[test]
    fn test_tag_value_page_is_sliced() {
        let mut paginator = paginate(vec![Content::TagValueList(TagValueListContent::new(pairs(7)))]);
        paginator.goto_page(1).unwrap();
        let (page, details) = prepare_page_content(&paginator, &Profile::STAX, None).unwrap();
        assert!(details.is_none());
        let Content::TagValueList(list) = &page.body else {
            panic!("Expected a tag/value list, got {}", page.body.name());
        };
        assert_eq!(list.pairs.len(), 2);
        assert_eq!(list.start_index, 5, "Indexes reported by touches are absolute");
        assert_eq!(list.nb_max_lines_for_value, Profile::STAX.nb_max_lines_in_review);
    }

    #[test]
    fn test_alias_switches_token() {
        let mut list = pairs(2);
        list[1].alias = true;
        let paginator = paginate(vec![Content::TagValueList(TagValueListContent::new(list))]);
        let (page, _) = prepare_page_content(&paginator, &Profile::STAX, None).unwrap();
        let Content::TagValueList(list) = &page.body else {
            panic!("Expected a tag/value list");
        };
        assert_eq!(list.token, VALUE_ALIAS_TOKEN);
    }

    #[test]
    fn test_too_long_pair_gets_details() {
        let long: String = core::iter::repeat('x').take(35 * 12).collect();
        let paginator = paginate(vec![Content::TagValueList(TagValueListContent::new(vec![TagValue::new(
            "Data",
            long.clone(),
        )]))]);
        let (page, details) = prepare_page_content(&paginator, &Profile::STAX, None).unwrap();
        assert!(matches!(page.body, Content::TagValueDetails(_)));
        assert_eq!(details.map(|d| d.value), Some(long));
    }

    #[test]
    fn test_centered_pair_becomes_center_page() {
        let mut list = pairs(1);
        list[0].centered_info = true;
        let paginator = paginate(vec![Content::TagValueList(TagValueListContent::new(list))]);
        let (page, _) = prepare_page_content(&paginator, &Profile::STAX, None).unwrap();
        let Content::ExtendedCenter(center) = &page.body else {
            panic!("Expected a centered page");
        };
        assert_eq!(center.title.as_deref(), Some("Tag 0"));
        assert_eq!(center.description.as_deref(), Some("Value 0"));
    }

    #[test]
    fn test_confirm_only_on_last_page() {
        let confirm = TagValueConfirm::new(TagValueListContent::new(pairs(7)), "Confirm", 11);
        let mut paginator = paginate(vec![Content::TagValueConfirm(confirm)]);
        let (first, _) = prepare_page_content(&paginator, &Profile::STAX, None).unwrap();
        assert!(matches!(first.body, Content::TagValueList(_)));
        paginator.goto_page(1).unwrap();
        let (last, _) = prepare_page_content(&paginator, &Profile::STAX, None).unwrap();
        assert!(matches!(last.body, Content::TagValueConfirm(_)));
    }

    #[test]
    fn test_choice_outside_page_is_unselected() {
        let choices = ChoicesList {
            names: (0..7).map(|i| format!("Choice {}", i)).collect(),
            init_choice: 6,
            token: 3,
            tune: NO_TUNE,
        };
        let mut paginator = paginate(vec![Content::ChoicesList(choices)]);
        let (first, _) = prepare_page_content(&paginator, &Profile::STAX, None).unwrap();
        let Content::ChoicesList(page) = &first.body else {
            panic!("Expected choices");
        };
        assert_eq!(page.init_choice, page.names.len() as u8, "No radio is on");

        paginator.goto_page(1).unwrap();
        let (second, _) = prepare_page_content(&paginator, &Profile::STAX, None).unwrap();
        let Content::ChoicesList(page) = &second.body else {
            panic!("Expected choices");
        };
        assert_eq!(page.init_choice, 1);
    }

    #[test]
    fn test_draw_review_page_with_navigation() {
        let mut gui = gui();
        let paginator = paginate(vec![Content::TagValueList(TagValueListContent::new(pairs(7)))]);
        let (page, _) = prepare_page_content(&paginator, &Profile::STAX, None).unwrap();
        let nav = PageNav {
            nb_pages: 2,
            quit_text: Some("Reject"),
            quit_token: 12,
            nav_token: 3,
            ..Default::default()
        };
        draw_generic_content(&mut gui, Some(&nav), &page, false).unwrap();
        let frontend = gui.frontend();
        assert!(frontend.has_text("Reject"));
        assert!(frontend.has_text("Tag 0"));
        assert!(frontend.has_text("Value 4"));
        assert!(!frontend.has_text("Tag 5"), "Pairs of the next page are not drawn");
    }

    #[test]
    fn test_draw_long_press_page() {
        let mut gui = gui();
        let page = PageContent::new(Content::InfoLongPress(InfoLongPress {
            icon: None,
            text: "Sign transaction".into(),
            long_press_text: "Hold to sign".into(),
            long_press_token: 11,
            tune: NO_TUNE,
        }));
        let layout = draw_generic_content(&mut gui, None, &page, false).unwrap();
        assert!(gui.frontend().has_text("Sign transaction"));
        assert!(gui.frontend().has_text("Hold to sign"));
        assert!(layout.up_footer().is_some());
    }

    #[test]
    fn test_draw_title_header() {
        let mut gui = gui();
        let infos = InfosList::new([("Version", "1.2.0")]);
        let page = PageContent {
            title: Some("Settings".into()),
            title_token: 2,
            ..PageContent::new(Content::InfosList(infos))
        };
        let layout = draw_generic_content(&mut gui, None, &page, false).unwrap();
        assert!(layout.header().is_some());
        assert!(gui.frontend().has_text("Settings"));
        assert!(gui.frontend().has_text("1.2.0"));
    }

    #[test]
    fn test_draw_confirmation_defaults_cancel() {
        let mut gui = gui();
        let page = ConfirmationPage {
            centered_info: CenteredInfo {
                text1: Some("Reject transaction?"),
                icon: Some(icons::WARNING),
                ..Default::default()
            },
            confirmation_text: "Yes, reject",
            cancel_text: None,
            token: 8,
            tune: NO_TUNE,
            modal: true,
        };
        let layout = draw_confirmation(&mut gui, &page).unwrap();
        assert!(layout.is_modal());
        assert!(gui.frontend().has_text("Cancel"));
        assert!(gui.frontend().has_text("Yes, reject"));
    }

    #[test]
    fn test_draw_warning_buttons() {
        let mut gui = gui();
        let page = WarningPage {
            icon: icons::WARNING,
            title: "Risky operation",
            description: "Proceed with care",
            info_token: 3,
            back_text: "Go back",
            continue_text: "Go on",
            token: 4,
            tune: NO_TUNE,
        };
        let layout = draw_warning(&mut gui, &page).unwrap();
        assert!(!layout.is_modal());
        assert!(gui.frontend().has_text("Risky operation"));
        assert!(gui.frontend().has_text("Go back"));
        assert!(gui.frontend().has_text("Go on"));
        let tokens: Vec<(u8, u8)> = (0..layout.nb_callback_objs())
            .filter_map(|slot| layout.callback_obj(slot))
            .map(|obj| (obj.token, obj.index))
            .collect();
        assert!(tokens.contains(&(3, 0)), "Top right button registered: {:?}", tokens);
        assert!(tokens.contains(&(4, 0)), "Back on the top button: {:?}", tokens);
        assert!(tokens.contains(&(4, 1)), "Continue on the bottom button: {:?}", tokens);
    }
}
