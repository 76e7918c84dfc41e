// src/use_case/review.rs
//! Transaction reviews: the whole review in one go, or streamed step by step.
//!
//! A review starts with a "Swipe to review" page, shows the tag/value pairs
//! and ends with a hold-to-sign page. Rejecting asks for a confirmation in a
//! modal first.
//!
//! Blind signing reviews are preceded by a warning page: going back rejects
//! the review, going on starts it, and its top right button explains the risk.
//! A generic review paginates application contents as they are, with a
//! reject text that needs no confirmation.

use alloc::format;
use alloc::string::String;
use alloc::vec;

use log::info;

use super::{
    CHOICE_TOKEN, CONFIRM_TOKEN, Flow, FlowKind, ModalKind, Session, UseCaseEvent, UseCases, WARNING_BUTTON_TOKEN,
    WARNING_CHOICE_TOKEN,
};
use crate::content::{Content, GenericContents, InfoButton, InfoLongPress, TagValueListContent};
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::icons::{self, Icon};
use crate::layout::{CenteredInfo, CenteredInfoStyle};
use crate::page::{self, ConfirmationPage, WarningPage};
use crate::paginator::AppPaginator;
use crate::types::NO_TUNE;

/// What is being signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    #[default]
    Transaction,
    Message,
    Operation,
}

impl Operation {
    pub fn noun(self) -> &'static str {
        match self {
            Operation::Transaction => "transaction",
            Operation::Message => "message",
            Operation::Operation => "operation",
        }
    }
}

/// Outcome of a review, shown as a status screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Signed(Operation),
    Rejected(Operation),
    AddressVerified,
    AddressRejected,
}

impl ReviewStatus {
    pub fn message(self) -> String {
        match self {
            ReviewStatus::Signed(operation) => format!("{} signed", capitalized(operation.noun())),
            ReviewStatus::Rejected(operation) => format!("{} rejected", capitalized(operation.noun())),
            ReviewStatus::AddressVerified => "Address verified".into(),
            ReviewStatus::AddressRejected => "Address verification\ncancelled".into(),
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ReviewStatus::Signed(_) | ReviewStatus::AddressVerified)
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const BLIND_SIGNING_TITLE: &str = "Blind signing ahead";
const BLIND_SIGNING_DESCRIPTION: &str =
    "This transaction's details are not fully verifiable. If you sign, you could lose all your assets.";
const BLIND_SIGNING_REPORT_TITLE: &str = "This transaction cannot be Clear Signed";
const BLIND_SIGNING_REPORT: &str = "This transaction or message cannot be decoded fully. If you choose to sign, \
     you could be authorizing malicious actions that can drain your wallet.\n\nLearn more: ledger.com/e8";

/// How a review ends
enum Finish {
    LongPress,
    Button,
}

fn review_flow(operation: Operation, icon: Option<Icon>, paginator: AppPaginator) -> Flow {
    let mut flow = Flow::new(FlowKind::Review { operation, icon }, paginator);
    flow.quit_text = Some("Reject".into());
    flow
}

fn first_page(icon: Option<Icon>, title: &str, sub_title: Option<&str>) -> Content {
    Content::ExtendedCenter(page::review_first_page(icon, Some(title), sub_title, "Swipe to review"))
}

/// Whole review flow: first page, pairs and the approval page
#[allow(clippy::too_many_arguments)]
fn review_contents(
    operation: Operation,
    list: TagValueListContent,
    icon: Option<Icon>,
    title: &str,
    sub_title: Option<&str>,
    finish_title: &str,
    finish: Finish,
) -> NbglResult<Flow> {
    if title.is_empty() || finish_title.is_empty() {
        return Err(NbglError::MalformedDescriptor("review titles missing"));
    }
    let last = match finish {
        Finish::LongPress => Content::InfoLongPress(InfoLongPress {
            icon,
            text: finish_title.into(),
            long_press_text: "Hold to sign".into(),
            long_press_token: CONFIRM_TOKEN,
            tune: NO_TUNE,
        }),
        Finish::Button => Content::InfoButton(InfoButton {
            icon,
            text: finish_title.into(),
            button_text: "Approve".into(),
            button_token: CONFIRM_TOKEN,
            tune: NO_TUNE,
        }),
    };
    info!("Review of a {} ({} pairs)", operation.noun(), list.pairs.len());
    let contents = vec![first_page(icon, title, sub_title), Content::TagValueList(list), last];
    Ok(review_flow(operation, icon, AppPaginator::new(contents)))
}

/// Single page flow asking for the next step once left
fn streaming_start(operation: Operation, icon: Option<Icon>, title: &str, sub_title: Option<&str>) -> NbglResult<Flow> {
    if title.is_empty() {
        return Err(NbglError::MalformedDescriptor("review title missing"));
    }
    let contents = vec![first_page(icon, title, sub_title)];
    let mut flow = review_flow(operation, icon, AppPaginator::new(contents));
    flow.continues = true;
    info!("Streaming review of a {} started", operation.noun());
    Ok(flow)
}

impl<F: Frontend> UseCases<F> {
    /// Review of `list`, approved by holding the last page's button
    pub fn review(
        &mut self,
        operation: Operation,
        list: TagValueListContent,
        icon: Option<Icon>,
        title: &str,
        sub_title: Option<&str>,
        finish_title: &str,
    ) -> NbglResult<()> {
        self.start_review(operation, list, icon, title, sub_title, finish_title, Finish::LongPress)
    }

    /// Review of `list`, approved with a simple button
    pub fn review_light(
        &mut self,
        operation: Operation,
        list: TagValueListContent,
        icon: Option<Icon>,
        title: &str,
        sub_title: Option<&str>,
        finish_title: &str,
    ) -> NbglResult<()> {
        self.start_review(operation, list, icon, title, sub_title, finish_title, Finish::Button)
    }

    /// Review of `list` behind a blind signing warning, approved by holding
    /// the last page's button
    pub fn review_blind_signing(
        &mut self,
        operation: Operation,
        list: TagValueListContent,
        icon: Option<Icon>,
        title: &str,
        sub_title: Option<&str>,
        finish_title: &str,
    ) -> NbglResult<()> {
        let flow = review_contents(operation, list, icon, title, sub_title, finish_title, Finish::LongPress)?;
        self.start_warning(flow)
    }

    #[allow(clippy::too_many_arguments)]
    fn start_review(
        &mut self,
        operation: Operation,
        list: TagValueListContent,
        icon: Option<Icon>,
        title: &str,
        sub_title: Option<&str>,
        finish_title: &str,
        finish: Finish,
    ) -> NbglResult<()> {
        let flow = review_contents(operation, list, icon, title, sub_title, finish_title, finish)?;
        self.start_flow(flow, 0)
    }

    /// First step of a streamed review; going past its page asks for the
    /// next step with [`UseCaseEvent::Choice`]
    pub fn review_streaming_start(
        &mut self,
        operation: Operation,
        icon: Option<Icon>,
        title: &str,
        sub_title: Option<&str>,
    ) -> NbglResult<()> {
        let flow = streaming_start(operation, icon, title, sub_title)?;
        self.start_flow(flow, 0)
    }

    /// First step of a streamed review, behind a blind signing warning
    pub fn review_streaming_blind_signing_start(
        &mut self,
        operation: Operation,
        icon: Option<Icon>,
        title: &str,
        sub_title: Option<&str>,
    ) -> NbglResult<()> {
        let flow = streaming_start(operation, icon, title, sub_title)?;
        self.start_warning(flow)
    }

    /// Application contents reviewed page by page; `reject_text` reports
    /// [`UseCaseEvent::Choice`] with `false` at once, the contents' own
    /// controls are reported as they are
    pub fn generic_review(&mut self, contents: impl Into<GenericContents>, reject_text: &str) -> NbglResult<()> {
        if reject_text.is_empty() {
            return Err(NbglError::MalformedDescriptor("reject text missing"));
        }
        let mut flow = Flow::new(FlowKind::GenericReview, AppPaginator::new(contents.into()));
        flow.quit_text = Some(reject_text.into());
        info!("Generic review");
        self.start_flow(flow, 0)
    }

    /// Blind signing warning in front of `flow`
    fn start_warning(&mut self, mut flow: Flow) -> NbglResult<()> {
        let profile = *self.gui.profile();
        // an empty flow must fail now, not once the warning is accepted
        if flow
            .paginator
            .compute_pages(self.gui.frontend(), &profile, flow.skippable)?
            == 0
        {
            return Err(NbglError::MalformedDescriptor("nothing to display"));
        }
        let layout = page::draw_warning(
            &mut self.gui,
            &WarningPage {
                icon: icons::WARNING,
                title: BLIND_SIGNING_TITLE,
                description: BLIND_SIGNING_DESCRIPTION,
                info_token: WARNING_BUTTON_TOKEN,
                back_text: "Back to safety",
                continue_text: "Continue anyway",
                token: WARNING_CHOICE_TOKEN,
                tune: NO_TUNE,
            },
        )?;
        info!("Blind signing warning");
        self.start(Session::Warning(flow), layout);
        Ok(())
    }

    pub(super) fn on_warning_action(&mut self, token: u8, index: u8) -> NbglResult<Option<UseCaseEvent>> {
        match token {
            WARNING_CHOICE_TOKEN if index == 0 => Ok(Some(UseCaseEvent::Choice(false))),
            WARNING_CHOICE_TOKEN => {
                let Session::Warning(flow) = core::mem::take(&mut self.session) else {
                    return Ok(None);
                };
                self.start_flow(flow, 0)?;
                Ok(None)
            }
            WARNING_BUTTON_TOKEN => {
                self.open_details(BLIND_SIGNING_REPORT_TITLE, BLIND_SIGNING_REPORT, true)?;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Next pairs of a streamed review
    pub fn review_streaming_continue(&mut self, list: TagValueListContent, skippable: bool) -> NbglResult<()> {
        if list.pairs.is_empty() {
            return Err(NbglError::MalformedDescriptor("no pairs to stream"));
        }
        let (operation, icon) = self.streamed_review();
        let mut flow = review_flow(operation, icon, AppPaginator::new(vec![Content::TagValueList(list)]));
        flow.continues = true;
        flow.skippable = skippable;
        self.start_flow(flow, 0)
    }

    /// Last step of a streamed review, with the hold-to-sign page
    pub fn review_streaming_finish(&mut self, finish_title: &str) -> NbglResult<()> {
        if finish_title.is_empty() {
            return Err(NbglError::MalformedDescriptor("review title missing"));
        }
        let (operation, icon) = self.streamed_review();
        let last = Content::InfoLongPress(InfoLongPress {
            icon,
            text: finish_title.into(),
            long_press_text: "Hold to sign".into(),
            long_press_token: CONFIRM_TOKEN,
            tune: NO_TUNE,
        });
        self.start_flow(review_flow(operation, icon, AppPaginator::new(vec![last])), 0)
    }

    /// Operation and icon of the streamed review in progress
    fn streamed_review(&self) -> (Operation, Option<Icon>) {
        match &self.session {
            Session::Flow(Flow {
                kind: FlowKind::Review { operation, icon },
                ..
            }) => (*operation, *icon),
            _ => (Operation::default(), None),
        }
    }

    /// Outcome of a review, as a status screen
    pub fn review_status(&mut self, status: ReviewStatus) -> NbglResult<()> {
        self.status(&status.message(), status.is_success())
    }

    pub(super) fn open_reject_modal(&mut self, operation: Operation) -> NbglResult<()> {
        let question = format!("Reject {}?", operation.noun());
        let cancel = format!("Go back to {}", operation.noun());
        let layout = page::draw_confirmation(
            &mut self.gui,
            &ConfirmationPage {
                centered_info: CenteredInfo {
                    text1: Some(question.as_str()),
                    style: CenteredInfoStyle::LargeCaseInfo,
                    ..Default::default()
                },
                confirmation_text: "Yes, reject",
                cancel_text: Some(cancel.as_str()),
                token: CHOICE_TOKEN,
                tune: NO_TUNE,
                modal: true,
            },
        )?;
        self.open_modal(layout, ModalKind::RejectConfirm);
        Ok(())
    }

    pub(super) fn open_skip_modal(&mut self) -> NbglResult<()> {
        let layout = page::draw_confirmation(
            &mut self.gui,
            &ConfirmationPage {
                centered_info: CenteredInfo {
                    text1: Some("Skip review?"),
                    text2: Some("If you're sure you don't need to review all fields, you can skip straight to signing."),
                    style: CenteredInfoStyle::LargeCaseInfo,
                    ..Default::default()
                },
                confirmation_text: "Yes, skip",
                cancel_text: Some("Go back to review"),
                token: CHOICE_TOKEN,
                tune: NO_TUNE,
                modal: true,
            },
        )?;
        self.open_modal(layout, ModalKind::SkipConfirm);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Pairs;
    use crate::layout::TagValue;
    use crate::types::EXIT_PAGE;
    use crate::use_case::tests::{action, use_cases};
    use crate::use_case::{DISMISS_TOKEN, NAV_TOKEN, REJECT_TOKEN, SKIP_TOKEN};
    use alloc::vec::Vec;

    fn pairs(n: usize) -> TagValueListContent {
        let pairs: Vec<TagValue> = (0..n)
            .map(|i| TagValue::new(format!("Item {}", i), format!("Value {}", i)))
            .collect();
        TagValueListContent::new(Pairs::Inline(pairs))
    }

    #[test]
    fn test_review_pages() {
        let mut uc = use_cases();
        uc.review(Operation::Transaction, pairs(2), None, "Review transaction", None, "Sign transaction?")
            .unwrap();
        assert!(uc.gui().frontend().has_text("Review transaction"));
        assert!(uc.gui().frontend().has_text("Swipe to review"));
        assert!(uc.gui().frontend().has_text("Reject"));

        uc.on_layout_event(action(NAV_TOKEN, 1)).unwrap();
        assert!(uc.gui().frontend().has_text("Item 1"), "Pairs on the second page");
        uc.on_layout_event(action(NAV_TOKEN, 2)).unwrap();
        assert!(uc.gui().frontend().has_text("Hold to sign"));
        assert_eq!(
            uc.on_layout_event(action(CONFIRM_TOKEN, 0)).unwrap(),
            Some(UseCaseEvent::Choice(true))
        );
    }

    #[test]
    fn test_reject_goes_through_confirmation() {
        let mut uc = use_cases();
        uc.review(Operation::Message, pairs(1), None, "Review message", None, "Sign message?")
            .unwrap();
        assert_eq!(uc.on_layout_event(action(REJECT_TOKEN, 0)).unwrap(), None);
        assert!(uc.is_modal_open());
        assert!(uc.gui().frontend().has_text("Reject message?"));
        assert!(uc.gui().frontend().has_text("Go back to message"));

        assert_eq!(uc.on_layout_event(action(CHOICE_TOKEN, 1)).unwrap(), None, "Going back");
        assert!(!uc.is_modal_open());

        uc.on_layout_event(action(REJECT_TOKEN, 0)).unwrap();
        assert_eq!(
            uc.on_layout_event(action(CHOICE_TOKEN, 0)).unwrap(),
            Some(UseCaseEvent::Choice(false))
        );
        assert!(!uc.is_modal_open());
    }

    #[test]
    fn test_light_review_approve_button() {
        let mut uc = use_cases();
        uc.review_light(Operation::Operation, pairs(1), None, "Review", None, "Approve?")
            .unwrap();
        uc.on_layout_event(action(NAV_TOKEN, 1)).unwrap();
        uc.on_layout_event(action(NAV_TOKEN, 2)).unwrap();
        assert!(uc.gui().frontend().has_text("Approve"));
    }

    #[test]
    fn test_missing_titles_rejected() {
        let mut uc = use_cases();
        assert_eq!(
            uc.review(Operation::Transaction, pairs(1), None, "", None, "Sign?"),
            Err(NbglError::MalformedDescriptor("review titles missing"))
        );
        assert!(uc.gui().frontend().refreshes().is_empty());
    }

    #[test]
    fn test_streaming_steps() {
        let mut uc = use_cases();
        uc.review_streaming_start(Operation::Transaction, None, "Review transaction", None)
            .unwrap();
        assert_eq!(
            uc.on_layout_event(action(NAV_TOKEN, 1)).unwrap(),
            Some(UseCaseEvent::Choice(true)),
            "Next from the single page asks for more"
        );

        uc.review_streaming_continue(pairs(3), true).unwrap();
        assert!(uc.gui().frontend().has_text("Skip"));
        uc.on_layout_event(action(SKIP_TOKEN, 0)).unwrap();
        assert!(uc.gui().frontend().has_text("Skip review?"));
        assert_eq!(uc.on_layout_event(action(CHOICE_TOKEN, 0)).unwrap(), Some(UseCaseEvent::Skipped));

        uc.review_streaming_finish("Sign transaction?").unwrap();
        assert!(uc.gui().frontend().has_text("Hold to sign"));
        assert_eq!(uc.on_layout_event(action(REJECT_TOKEN, 0)).unwrap(), None);
        assert!(
            uc.gui().frontend().has_text("Reject transaction?"),
            "Operation kept across steps"
        );
    }

    #[test]
    fn test_exit_key_quits() {
        let mut uc = use_cases();
        uc.review(Operation::Transaction, pairs(1), None, "Review", None, "Sign?")
            .unwrap();
        assert_eq!(uc.on_layout_event(action(NAV_TOKEN, EXIT_PAGE)).unwrap(), Some(UseCaseEvent::Quit));
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(ReviewStatus::Signed(Operation::Message).message(), "Message signed");
        assert_eq!(ReviewStatus::Rejected(Operation::Transaction).message(), "Transaction rejected");
        assert!(ReviewStatus::AddressVerified.is_success());
        assert!(!ReviewStatus::AddressRejected.is_success());
    }

    #[test]
    fn test_blind_signing_warning_first() {
        let mut uc = use_cases();
        uc.review_blind_signing(Operation::Transaction, pairs(2), None, "Review transaction", None, "Sign?")
            .unwrap();
        assert!(uc.gui().frontend().has_text("Back to safety"));
        assert!(uc.gui().frontend().has_text("Continue anyway"));
        assert!(!uc.gui().frontend().has_text("Swipe to review"), "Review held back");
        assert_eq!(uc.active_page(), None);

        uc.on_layout_event(action(WARNING_BUTTON_TOKEN, 0)).unwrap();
        assert!(uc.is_modal_open(), "Info button explains the risk");
        uc.on_layout_event(action(DISMISS_TOKEN, 0)).unwrap();
        assert!(!uc.is_modal_open());

        assert_eq!(uc.on_layout_event(action(WARNING_CHOICE_TOKEN, 1)).unwrap(), None);
        assert_eq!(uc.active_page(), Some(0), "Continuing starts the review");
        assert!(uc.gui().frontend().has_text("Swipe to review"));
        uc.on_layout_event(action(NAV_TOKEN, 2)).unwrap();
        assert_eq!(
            uc.on_layout_event(action(CONFIRM_TOKEN, 0)).unwrap(),
            Some(UseCaseEvent::Choice(true))
        );
    }

    #[test]
    fn test_blind_signing_back_to_safety_rejects() {
        let mut uc = use_cases();
        uc.review_blind_signing(Operation::Message, pairs(1), None, "Review message", None, "Sign?")
            .unwrap();
        assert_eq!(
            uc.on_layout_event(action(WARNING_CHOICE_TOKEN, 0)).unwrap(),
            Some(UseCaseEvent::Choice(false))
        );
        assert_eq!(
            uc.review_blind_signing(Operation::Message, pairs(1), None, "", None, "Sign?"),
            Err(NbglError::MalformedDescriptor("review titles missing"))
        );
    }

    #[test]
    fn test_streaming_blind_signing_start() {
        let mut uc = use_cases();
        uc.review_streaming_blind_signing_start(Operation::Transaction, None, "Review transaction", None)
            .unwrap();
        assert!(uc.gui().frontend().has_text("Continue anyway"));
        uc.on_layout_event(action(WARNING_CHOICE_TOKEN, 1)).unwrap();
        assert_eq!(
            uc.on_layout_event(action(NAV_TOKEN, 1)).unwrap(),
            Some(UseCaseEvent::Choice(true)),
            "Past the first page, the next step is asked for"
        );
        uc.review_streaming_continue(pairs(2), false).unwrap();
        uc.on_layout_event(action(REJECT_TOKEN, 0)).unwrap();
        assert!(
            uc.gui().frontend().has_text("Reject transaction?"),
            "Operation kept behind the warning"
        );
    }

    #[test]
    fn test_generic_review_rejects_at_once() {
        let mut uc = use_cases();
        let contents = vec![
            Content::TagValueList(pairs(3)),
            Content::InfoLongPress(InfoLongPress {
                icon: None,
                text: "Sign message?".into(),
                long_press_text: "Hold to sign".into(),
                long_press_token: 30,
                tune: NO_TUNE,
            }),
        ];
        uc.generic_review(contents, "Reject message").unwrap();
        assert!(uc.gui().frontend().has_text("Reject message"));
        assert!(uc.gui().frontend().has_text("Item 2"));

        uc.on_layout_event(action(NAV_TOKEN, 1)).unwrap();
        assert_eq!(
            uc.on_layout_event(action(30, 0)).unwrap(),
            Some(UseCaseEvent::Control {
                token: 30,
                index: 0,
                page: 1
            }),
            "Application token reported as is"
        );
        assert_eq!(
            uc.on_layout_event(action(REJECT_TOKEN, 0)).unwrap(),
            Some(UseCaseEvent::Choice(false))
        );
        assert!(!uc.is_modal_open(), "No confirmation modal");
        assert_eq!(
            uc.generic_review(vec![Content::TagValueList(pairs(1))], ""),
            Err(NbglError::MalformedDescriptor("reject text missing"))
        );
    }
}
