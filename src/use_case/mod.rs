// src/use_case/mod.rs
//! Ready-made flows built from pages.
//!
//! [`UseCases`] owns the [`Gui`] and at most one running flow, its
//! [`Session`]. Starting a flow drops the previous one. The caller feeds
//! touch samples and elapsed time in, and gets back the [`UseCaseEvent`]s the
//! application has to act upon.
//!
//! Paginated flows (settings, reviews, address verification) share the same
//! navigation: a [`Paginator`](crate::paginator::Paginator) over their
//! contents, one layout per page, and modals on top for details, QR codes
//! and confirmations.

mod address;
mod home;
mod keypad;
mod review;
mod status;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use embassy_time::Duration;
use log::{debug, info, warn};

use crate::config::Profile;
use crate::content::{Content, InfosList, Pairs, TagValueListContent};
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::gui::Gui;
use crate::icons::Icon;
use crate::layout::keypad::KEYPAD_MAX_DIGITS;
use crate::layout::{Layout, LayoutEvent, TagValue};
use crate::page::{self, PageContent, PageNav, PairDetails};
use crate::paginator::{self, AppPaginator};
use crate::touch::TouchSample;
use crate::types::{EXIT_PAGE, NO_TUNE};

pub use home::HomeDesc;
pub use page::{DETAILS_BUTTON_TOKEN, VALUE_ALIAS_TOKEN};
pub use review::{Operation, ReviewStatus};

// ----------------------------------------------------------------------------
// Tokens
// ----------------------------------------------------------------------------

pub const BACK_TOKEN: u8 = 0;
pub const QUIT_TOKEN: u8 = 1;
pub const NAV_TOKEN: u8 = 2;
pub const MODAL_NAV_TOKEN: u8 = 3;
pub const SKIP_TOKEN: u8 = 4;
pub const SETTINGS_TOKEN: u8 = 5;
pub const DISMISS_TOKEN: u8 = 6;
pub const ADDRESS_QRCODE_BUTTON_TOKEN: u8 = 7;
/// Top right button of a warning page
pub const WARNING_BUTTON_TOKEN: u8 = 8;
pub const CHOICE_TOKEN: u8 = 9;
pub const CONFIRM_TOKEN: u8 = 11;
pub const REJECT_TOKEN: u8 = 12;
pub const INFO_ALIAS_TOKEN: u8 = 14;
/// Back (index 0) or continue (index 1) on a warning page
pub const WARNING_CHOICE_TOKEN: u8 = 15;
/// Tokens of application contents must start here
pub const FIRST_USER_TOKEN: u8 = 20;

/// Digits typed on the keypad
pub type Pin = heapless::String<{ KEYPAD_MAX_DIGITS as usize }>;

/// What the application has to act upon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseCaseEvent {
    /// The user left the flow: quit key, back key, status dismissed
    Quit,
    /// Action button of the home page
    HomeAction,
    /// Approval (`true`) or rejection of a review, a streaming step, an
    /// address, a choice or a confirmation
    Choice(bool),
    /// The rest of a streamed review is skipped
    Skipped,
    /// A control of an application content changed
    Control { token: u8, index: u8, page: u8 },
    /// Validated PIN
    Pin(Pin),
}

// ----------------------------------------------------------------------------
// Session
// ----------------------------------------------------------------------------

/// What a paginated flow is about
#[derive(Debug, Clone)]
enum FlowKind {
    /// Settings pages; back returns to the home page when there is one
    Settings { home: Option<HomeDesc> },
    Review { operation: Operation, icon: Option<Icon> },
    /// Application contents; the quit text rejects at once
    GenericReview,
    Address { address: String },
}

/// A paginated flow
#[derive(Debug)]
struct Flow {
    kind: FlowKind,
    paginator: AppPaginator,
    /// Header with a back key
    title: Option<String>,
    /// Reports [`REJECT_TOKEN`]
    quit_text: Option<String>,
    skippable: bool,
    /// A page past the last one ends the step
    continues: bool,
    /// Pair of the active page too long to be displayed
    details: Option<PairDetails>,
}

impl Flow {
    fn new(kind: FlowKind, paginator: AppPaginator) -> Self {
        Self {
            kind,
            paginator,
            title: None,
            quit_text: None,
            skippable: false,
            continues: false,
            details: None,
        }
    }
}

#[derive(Debug, Default)]
enum Session {
    #[default]
    Idle,
    Home(HomeDesc),
    Flow(Flow),
    Status,
    Spinner,
    Choice,
    Keypad(keypad::PinEntry),
    /// Warning page, in front of the flow it leads to
    Warning(Flow),
}

#[derive(Debug)]
enum ModalKind {
    Details {
        item: String,
        pages: Vec<String>,
        wrapping: bool,
    },
    RejectConfirm,
    SkipConfirm,
    QrCode,
    /// Question asked over the running flow
    Confirm,
}

#[derive(Debug)]
struct Modal {
    layout: Layout,
    kind: ModalKind,
}

// ----------------------------------------------------------------------------
// Façade
// ----------------------------------------------------------------------------

pub struct UseCases<F: Frontend> {
    gui: Gui<F>,
    session: Session,
    layout: Option<Layout>,
    modal: Option<Modal>,
}

impl<F: Frontend> UseCases<F> {
    pub fn new(frontend: F, profile: Profile) -> Self {
        Self {
            gui: Gui::new(frontend, profile),
            session: Session::Idle,
            layout: None,
            modal: None,
        }
    }

    pub fn gui(&self) -> &Gui<F> {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut Gui<F> {
        &mut self.gui
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// Active page of the running paginated flow
    pub fn active_page(&self) -> Option<u8> {
        match &self.session {
            Session::Flow(flow) => Some(flow.paginator.active_page()),
            _ => None,
        }
    }

    /// Feed a touch sample; returns what the application must handle
    pub fn on_touch(&mut self, sample: &TouchSample) -> NbglResult<Option<UseCaseEvent>> {
        let events = self.gui.handle_touch(sample);
        for event in &events {
            let layout = match (self.modal.as_mut(), self.layout.as_mut()) {
                (Some(modal), _) => &mut modal.layout,
                (None, Some(layout)) => layout,
                (None, None) => return Ok(None),
            };
            if let Some(layout_event) = layout.on_touch(&mut self.gui, event)? {
                // the screen may have changed, the remaining events are stale
                return self.on_layout_event(layout_event);
            }
        }
        Ok(None)
    }

    /// Let time pass for the ticker of the top screen
    pub fn on_tick(&mut self, elapsed: Duration) -> NbglResult<Option<UseCaseEvent>> {
        let Some(layer) = self.gui.tick(elapsed) else {
            return Ok(None);
        };
        debug!(" Ticker of layer {} fired", layer);
        match self.session {
            Session::Status => {
                info!("Status screen timed out");
                self.end_session();
                Ok(Some(UseCaseEvent::Quit))
            }
            Session::Spinner => {
                if let Some(layout) = self.layout.as_mut() {
                    layout.on_tick(&mut self.gui)?;
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn on_layout_event(&mut self, event: LayoutEvent) -> NbglResult<Option<UseCaseEvent>> {
        let (token, index) = match event {
            LayoutEvent::Action { token, index, .. } => (token, index),
            LayoutEvent::Keypad(key) => return self.on_keypad_key(key),
            LayoutEvent::Key(_) => return Ok(None),
        };
        debug!(" Use case action: token {} index {}", token, index);
        if self.modal.is_some() {
            return self.on_modal_action(token, index);
        }
        match &self.session {
            Session::Idle => Ok(None),
            Session::Home(_) => self.on_home_action(token, index),
            Session::Flow(_) => self.on_flow_action(token, index),
            Session::Status => {
                self.end_session();
                Ok(Some(UseCaseEvent::Quit))
            }
            Session::Spinner => Ok(None),
            Session::Choice => match token {
                CHOICE_TOKEN => Ok(Some(UseCaseEvent::Choice(index == 0))),
                _ => Ok(None),
            },
            Session::Keypad(_) => match token {
                BACK_TOKEN => Ok(Some(UseCaseEvent::Quit)),
                _ => Ok(None),
            },
            Session::Warning(_) => self.on_warning_action(token, index),
        }
    }

    /// Replace the running flow
    fn start(&mut self, session: Session, layout: Layout) {
        // the base screen replaced every layer, modals included
        self.modal = None;
        self.session = session;
        self.layout = Some(layout);
        self.gui.refresh();
    }

    fn end_session(&mut self) {
        self.session = Session::Idle;
    }

    // ------------------------------------------------------------------------
    // Paginated flows
    // ------------------------------------------------------------------------

    /// Paginate `flow`, then display `init_page`
    fn start_flow(&mut self, mut flow: Flow, init_page: u8) -> NbglResult<()> {
        let profile = *self.gui.profile();
        let nb_pages = flow
            .paginator
            .compute_pages(self.gui.frontend(), &profile, flow.skippable)?;
        if nb_pages == 0 {
            warn!("Flow without any page");
            return Err(NbglError::MalformedDescriptor("nothing to display"));
        }
        if init_page > 0 {
            flow.paginator.goto_page(init_page.min(nb_pages - 1))?;
        }
        let layout = self.draw_flow_page(&mut flow)?;
        self.start(Session::Flow(flow), layout);
        Ok(())
    }

    fn draw_flow_page(&mut self, flow: &mut Flow) -> NbglResult<Layout> {
        let profile = *self.gui.profile();
        let (mut content, details) = page::prepare_page_content(&flow.paginator, &profile, flow.title.as_deref())?;
        if content.title.is_some() {
            content.title_token = BACK_TOKEN;
        }
        let nav = PageNav {
            active_page: flow.paginator.active_page(),
            nb_pages: flow.paginator.nb_pages().saturating_add(flow.continues as u8),
            nav_token: NAV_TOKEN,
            quit_text: flow.quit_text.as_deref(),
            quit_token: REJECT_TOKEN,
            skip_text: flow.skippable.then_some("Skip"),
            skip_token: SKIP_TOKEN,
            ..Default::default()
        };
        flow.details = details;
        page::draw_generic_content(&mut self.gui, Some(&nav), &content, false)
    }

    fn display_flow_page(&mut self) -> NbglResult<()> {
        let Session::Flow(mut flow) = core::mem::take(&mut self.session) else {
            return Ok(());
        };
        let layout = self.draw_flow_page(&mut flow);
        self.session = Session::Flow(flow);
        self.layout = Some(layout?);
        self.gui.refresh();
        Ok(())
    }

    fn on_flow_action(&mut self, token: u8, index: u8) -> NbglResult<Option<UseCaseEvent>> {
        let Session::Flow(flow) = &mut self.session else {
            return Ok(None);
        };
        match token {
            NAV_TOKEN if index == EXIT_PAGE => Ok(Some(UseCaseEvent::Quit)),
            NAV_TOKEN if flow.continues && index >= flow.paginator.nb_pages() => Ok(Some(UseCaseEvent::Choice(true))),
            NAV_TOKEN => {
                flow.paginator.goto_page(index)?;
                self.display_flow_page()?;
                Ok(None)
            }
            BACK_TOKEN => match &mut flow.kind {
                FlowKind::Settings { home } => match home.take() {
                    Some(home) => {
                        self.show_home(home)?;
                        Ok(None)
                    }
                    None => Ok(Some(UseCaseEvent::Quit)),
                },
                _ => Ok(Some(UseCaseEvent::Quit)),
            },
            REJECT_TOKEN => match flow.kind {
                FlowKind::Review { operation, .. } => {
                    self.open_reject_modal(operation)?;
                    Ok(None)
                }
                FlowKind::Address { .. } | FlowKind::GenericReview => Ok(Some(UseCaseEvent::Choice(false))),
                FlowKind::Settings { .. } => Ok(Some(UseCaseEvent::Quit)),
            },
            CONFIRM_TOKEN => Ok(Some(UseCaseEvent::Choice(true))),
            SKIP_TOKEN => {
                self.open_skip_modal()?;
                Ok(None)
            }
            DETAILS_BUTTON_TOKEN => {
                if let Some(details) = flow.details.clone() {
                    self.open_details(&details.item, &details.value, details.wrapping)?;
                }
                Ok(None)
            }
            VALUE_ALIAS_TOKEN => {
                let pair = match flow.paginator.current_content().as_deref().and_then(Content::tag_value_list) {
                    Some(list) => list
                        .pairs
                        .get(index as usize)
                        .map(|pair| (pair.into_owned(), list.wrapping)),
                    None => None,
                };
                if let Some((pair, wrapping)) = pair {
                    self.open_details(&pair.item, &pair.value, wrapping)?;
                }
                Ok(None)
            }
            ADDRESS_QRCODE_BUTTON_TOKEN => {
                if let FlowKind::Address { address } = &flow.kind {
                    let address = address.clone();
                    self.open_qr_code(&address)?;
                }
                Ok(None)
            }
            INFO_ALIAS_TOKEN => {
                let row = flow.paginator.current_element_idx() as usize + index as usize;
                let extension = match flow.paginator.current_content().as_deref() {
                    Some(Content::InfosList(infos)) => infos_row(infos, row),
                    _ => None,
                };
                if let Some((kind, value)) = extension {
                    self.open_details(&kind, &value, true)?;
                }
                Ok(None)
            }
            _ => {
                let start = flow.paginator.current_element_idx();
                // list positions are relative to the page
                let index = match flow.paginator.current_content().as_deref() {
                    Some(Content::ChoicesList(_) | Content::BarsList(_)) => start.saturating_add(index),
                    _ => index,
                };
                Ok(Some(UseCaseEvent::Control {
                    token,
                    index,
                    page: flow.paginator.active_page(),
                }))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Modals
    // ------------------------------------------------------------------------

    fn open_modal(&mut self, layout: Layout, kind: ModalKind) {
        debug!(" Modal {:?} opened on layer {}", kind, layout.layer());
        self.modal = Some(Modal { layout, kind });
        self.gui.refresh();
    }

    /// Pop the modal and redraw the page below
    fn close_modal(&mut self) -> NbglResult<()> {
        if let Some(modal) = self.modal.take() {
            modal.layout.release(&mut self.gui)?;
            self.gui.screen_redraw()?;
            self.gui.refresh();
        }
        Ok(())
    }

    fn on_modal_action(&mut self, token: u8, index: u8) -> NbglResult<Option<UseCaseEvent>> {
        let Some(modal) = &self.modal else {
            return Ok(None);
        };
        let event = match (&modal.kind, token) {
            (ModalKind::Details { pages, .. }, MODAL_NAV_TOKEN) if index != EXIT_PAGE && (index as usize) < pages.len() => {
                self.show_details_page(index)?;
                return Ok(None);
            }
            (ModalKind::Details { .. }, MODAL_NAV_TOKEN | DISMISS_TOKEN) => None,
            (ModalKind::RejectConfirm, CHOICE_TOKEN) => (index == 0).then_some(UseCaseEvent::Choice(false)),
            (ModalKind::SkipConfirm, CHOICE_TOKEN) => (index == 0).then_some(UseCaseEvent::Skipped),
            (ModalKind::QrCode, DISMISS_TOKEN) => None,
            (ModalKind::Confirm, CHOICE_TOKEN) => Some(UseCaseEvent::Choice(index == 0)),
            _ => return Ok(None),
        };
        self.close_modal()?;
        Ok(event)
    }

    /// Show a value in full, in as many modal pages as needed
    fn open_details(&mut self, item: &str, value: &str, wrapping: bool) -> NbglResult<()> {
        let profile = *self.gui.profile();
        let pages: Vec<String> = paginator::detail_pages(self.gui.frontend(), &profile, value, wrapping)
            .into_iter()
            .map(String::from)
            .collect();
        info!("Details of {:?} in {} pages", item, pages.len());
        let kind = ModalKind::Details {
            item: item.into(),
            pages,
            wrapping,
        };
        let layout = self.draw_details_page(&kind, 0)?;
        self.open_modal(layout, kind);
        Ok(())
    }

    fn show_details_page(&mut self, page: u8) -> NbglResult<()> {
        let Some(modal) = self.modal.take() else {
            return Ok(());
        };
        modal.layout.release(&mut self.gui)?;
        let layout = self.draw_details_page(&modal.kind, page)?;
        self.open_modal(layout, modal.kind);
        Ok(())
    }

    fn draw_details_page(&mut self, kind: &ModalKind, page: u8) -> NbglResult<Layout> {
        let ModalKind::Details { item, pages, wrapping } = kind else {
            return Err(NbglError::MalformedDescriptor("not a details modal"));
        };
        let value = pages
            .get(page as usize)
            .ok_or(NbglError::InvalidNavigation { from: 0, to: page })?;
        let nb_pages = pages.len().min(u8::MAX as usize) as u8;
        let list = TagValueListContent {
            small_case_for_value: true,
            wrapping: *wrapping,
            ..TagValueListContent::new(Pairs::Inline(vec![TagValue::new(item.as_str(), value.as_str())]))
        };
        let nav = PageNav {
            active_page: page,
            nb_pages,
            nav_token: MODAL_NAV_TOKEN,
            quit_text: (nb_pages == 1).then_some("Close"),
            quit_token: DISMISS_TOKEN,
            quit_button: true,
            tune: NO_TUNE,
            ..Default::default()
        };
        page::draw_generic_content(
            &mut self.gui,
            Some(&nav),
            &PageContent::new(Content::TagValueList(list)),
            true,
        )
    }
}

/// Type and full value of an infos row shown through an alias
fn infos_row(infos: &InfosList, row: usize) -> Option<(String, String)> {
    let extension = infos.extension(row)?;
    Some((infos.types.get(row)?.clone(), extension.into()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::content::{BarsList, ChoicesList, GenericContents, SwitchItem};
    use crate::frontend::MockFrontend;
    use crate::types::State;
    use alloc::format;

    pub(crate) fn use_cases() -> UseCases<MockFrontend> {
        UseCases::new(MockFrontend::new(), Profile::STAX)
    }

    pub(crate) fn action(token: u8, index: u8) -> LayoutEvent {
        LayoutEvent::Action {
            token,
            index,
            tune: NO_TUNE,
        }
    }

    fn bars(n: usize) -> Content {
        Content::BarsList(BarsList {
            texts: (0..n).map(|i| format!("Bar {}", i)).collect(),
            tokens: (0..n).map(|i| FIRST_USER_TOKEN + i as u8).collect(),
            tune: NO_TUNE,
        })
    }

    #[test]
    fn test_navigation_redraws_next_page() {
        let mut uc = use_cases();
        uc.settings("Settings", 0, GenericContents::from(vec![bars(8)]), None)
            .unwrap();
        assert_eq!(uc.active_page(), Some(0));
        assert!(uc.gui().frontend().has_text("Bar 0"));

        uc.gui_mut().frontend_mut().clear();
        assert_eq!(uc.on_layout_event(action(NAV_TOKEN, 1)).unwrap(), None);
        assert_eq!(uc.active_page(), Some(1));
        assert!(uc.gui().frontend().has_text("Bar 5"), "Second page starts after 5 bars");
        assert!(!uc.gui().frontend().has_text("Bar 0"));
    }

    #[test]
    fn test_bars_report_absolute_index() {
        let mut uc = use_cases();
        uc.settings("Settings", 0, GenericContents::from(vec![bars(8)]), None)
            .unwrap();
        uc.on_layout_event(action(NAV_TOKEN, 1)).unwrap();
        assert_eq!(
            uc.on_layout_event(action(FIRST_USER_TOKEN + 6, 1)).unwrap(),
            Some(UseCaseEvent::Control {
                token: FIRST_USER_TOKEN + 6,
                index: 6,
                page: 1
            })
        );
    }

    #[test]
    fn test_switch_reports_state() {
        let mut uc = use_cases();
        let switches = Content::SwitchesList(vec![SwitchItem::new("Blind signing", State::Off, FIRST_USER_TOKEN)]);
        uc.generic_configuration(Some("Settings"), 0, GenericContents::from(vec![switches]))
            .unwrap();
        assert_eq!(
            uc.on_layout_event(action(FIRST_USER_TOKEN, 1)).unwrap(),
            Some(UseCaseEvent::Control {
                token: FIRST_USER_TOKEN,
                index: 1,
                page: 0
            }),
            "Switch index is its new state"
        );
    }

    #[test]
    fn test_choices_offset_on_later_page() {
        let mut uc = use_cases();
        let choices = Content::ChoicesList(ChoicesList {
            names: (0..7).map(|i| format!("Choice {}", i)).collect(),
            init_choice: 0,
            token: FIRST_USER_TOKEN,
            tune: NO_TUNE,
        });
        uc.settings("Language", 1, GenericContents::from(vec![choices]), None)
            .unwrap();
        assert_eq!(uc.active_page(), Some(1), "Initial page honored");
        let event = uc.on_layout_event(action(FIRST_USER_TOKEN, 0)).unwrap();
        assert_eq!(
            event,
            Some(UseCaseEvent::Control {
                token: FIRST_USER_TOKEN,
                index: 5,
                page: 1
            })
        );
    }

    #[test]
    fn test_back_without_home_quits() {
        let mut uc = use_cases();
        uc.settings("Settings", 0, GenericContents::from(vec![bars(2)]), None)
            .unwrap();
        assert_eq!(uc.on_layout_event(action(BACK_TOKEN, 0)).unwrap(), Some(UseCaseEvent::Quit));
    }

    #[test]
    fn test_empty_flow_rejected() {
        let mut uc = use_cases();
        assert_eq!(
            uc.settings("Settings", 0, GenericContents::default(), None),
            Err(NbglError::MalformedDescriptor("nothing to display"))
        );
        assert!(uc.gui().frontend().refreshes().is_empty(), "Nothing rendered");
    }

    #[test]
    fn test_infos_alias_opens_details() {
        let mut uc = use_cases();
        let mut infos = InfosList::new([("Version", "1.0.0"), ("Developer", "Ledger")]);
        infos.extensions = vec![None, Some("Ledger SAS, Paris".into())];
        uc.settings("About", 0, GenericContents::default(), Some(infos)).unwrap();
        assert!(!uc.is_modal_open());

        uc.on_layout_event(action(INFO_ALIAS_TOKEN, 1)).unwrap();
        assert!(uc.is_modal_open(), "Alias row shows its extension");
        assert!(uc.gui().frontend().has_text("Ledger SAS, Paris"));

        uc.on_layout_event(action(DISMISS_TOKEN, 0)).unwrap();
        assert!(!uc.is_modal_open());
        assert_eq!(uc.gui().nb_screens(), 1, "Modal layer popped");
    }

    #[test]
    fn test_details_pages_navigation() {
        let mut uc = use_cases();
        uc.settings("Settings", 0, GenericContents::from(vec![bars(2)]), None)
            .unwrap();
        assert_eq!(uc.gui().nb_screens(), 1);
        let value: String = core::iter::repeat('a').take(35 * 30).collect();
        uc.open_details("Data", &value, true).unwrap();
        assert_eq!(uc.gui().nb_screens(), 2, "Details stacked over the flow");
        match &uc.modal.as_ref().unwrap().kind {
            ModalKind::Details { pages, .. } => assert_eq!(pages.len(), 3),
            other => panic!("unexpected modal {:?}", other),
        }

        uc.on_layout_event(action(MODAL_NAV_TOKEN, 1)).unwrap();
        assert!(uc.is_modal_open(), "Still in the details");
        assert_eq!(uc.gui().nb_screens(), 2, "Page replaced, not stacked");

        uc.on_layout_event(action(MODAL_NAV_TOKEN, EXIT_PAGE)).unwrap();
        assert!(!uc.is_modal_open(), "Exit key closes the details");
    }
}
