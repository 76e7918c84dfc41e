// src/use_case/status.rs
//! Transient screens: status, spinner, a simple choice and a confirmation
//! asked over the running flow.

use log::info;

use super::{CHOICE_TOKEN, ModalKind, QUIT_TOKEN, Session, UseCases};
use crate::config::STATUS_SCREEN_DURATION;
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::gui::Ticker;
use crate::icons::{self, Icon};
use crate::layout::{CenteredInfo, CenteredInfoStyle, Layout, LayoutDescription};
use crate::page::{self, ConfirmationPage, InfoPage};
use crate::types::NO_TUNE;

impl<F: Frontend> UseCases<F> {
    /// Full screen status, dismissed by a tap or after a few seconds with
    /// [`UseCaseEvent::Quit`](super::UseCaseEvent::Quit)
    pub fn status(&mut self, message: &str, success: bool) -> NbglResult<()> {
        if message.is_empty() {
            return Err(NbglError::MalformedDescriptor("status message missing"));
        }
        let icon = if success {
            icons::CHECK_CIRCLE
        } else {
            icons::DENIED_CIRCLE
        };
        let info = InfoPage {
            centered_info: CenteredInfo {
                text1: Some(message),
                icon: Some(icon),
                style: CenteredInfoStyle::LargeCaseInfo,
                ..Default::default()
            },
            tap_action_text: Some(""),
            tap_action_token: QUIT_TOKEN,
            tune: NO_TUNE,
            ..Default::default()
        };
        let layout = page::draw_info(&mut self.gui, &info, Some(Ticker::new(STATUS_SCREEN_DURATION)))?;
        info!("Status {:?} (success: {})", message, success);
        self.start(Session::Status, layout);
        Ok(())
    }

    /// Waiting screen; the spinner turns on every tick
    pub fn spinner(&mut self, text: &str) -> NbglResult<()> {
        let mut layout = Layout::new(&mut self.gui, &LayoutDescription::default())?;
        layout.add_spinner(&mut self.gui, text, None, 0)?;
        layout.draw(&mut self.gui)?;
        self.start(Session::Spinner, layout);
        Ok(())
    }

    /// Question with a confirm button and a cancel footer; reports
    /// [`UseCaseEvent::Choice`](super::UseCaseEvent::Choice)
    pub fn choice(
        &mut self,
        icon: Option<Icon>,
        message: &str,
        sub_message: Option<&str>,
        confirm_text: &str,
        cancel_text: &str,
    ) -> NbglResult<()> {
        if message.is_empty() || confirm_text.is_empty() || cancel_text.is_empty() {
            return Err(NbglError::MalformedDescriptor("choice texts missing"));
        }
        let layout = page::draw_confirmation(
            &mut self.gui,
            &ConfirmationPage {
                centered_info: CenteredInfo {
                    text1: Some(message),
                    text2: sub_message,
                    icon,
                    style: CenteredInfoStyle::LargeCaseInfo,
                    ..Default::default()
                },
                confirmation_text: confirm_text,
                cancel_text: Some(cancel_text),
                token: CHOICE_TOKEN,
                tune: NO_TUNE,
                modal: false,
            },
        )?;
        self.start(Session::Choice, layout);
        Ok(())
    }

    /// Question drawn as a modal over the current page, which stays as it
    /// was; reports [`UseCaseEvent::Choice`](super::UseCaseEvent::Choice)
    /// and closes either way
    pub fn confirm(
        &mut self,
        message: &str,
        sub_message: Option<&str>,
        confirm_text: &str,
        cancel_text: &str,
    ) -> NbglResult<()> {
        if message.is_empty() || confirm_text.is_empty() || cancel_text.is_empty() {
            return Err(NbglError::MalformedDescriptor("confirmation texts missing"));
        }
        // one modal at a time
        self.close_modal()?;
        let layout = page::draw_confirmation(
            &mut self.gui,
            &ConfirmationPage {
                centered_info: CenteredInfo {
                    text1: Some(message),
                    text2: sub_message,
                    icon: Some(icons::WARNING),
                    style: CenteredInfoStyle::LargeCaseInfo,
                    ..Default::default()
                },
                confirmation_text: confirm_text,
                cancel_text: Some(cancel_text),
                token: CHOICE_TOKEN,
                tune: NO_TUNE,
                modal: true,
            },
        )?;
        info!("Confirmation {:?}", message);
        self.open_modal(layout, ModalKind::Confirm);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SPINNER_REFRESH_PERIOD;
    use crate::obj::{ObjHandle, ObjKind};
    use crate::touch::TouchSample;
    use crate::use_case::UseCaseEvent;
    use crate::use_case::tests::{action, use_cases};
    use embassy_time::Duration;

    #[test]
    fn test_status_times_out() {
        let mut uc = use_cases();
        uc.status("Transaction signed", true).unwrap();
        assert!(uc.gui().frontend().has_text("Transaction signed"));
        assert_eq!(uc.on_tick(Duration::from_millis(2000)).unwrap(), None);
        assert_eq!(uc.on_tick(Duration::from_millis(1000)).unwrap(), Some(UseCaseEvent::Quit));
        assert_eq!(
            uc.on_tick(Duration::from_millis(3000)).unwrap(),
            None,
            "Nothing more once dismissed"
        );
    }

    #[test]
    fn test_status_dismissed_by_tap() {
        let mut uc = use_cases();
        uc.status("Transaction rejected", false).unwrap();
        assert_eq!(uc.on_touch(&TouchSample::pressed(200, 300, 0)).unwrap(), None);
        assert_eq!(
            uc.on_touch(&TouchSample::released(200, 300, 40)).unwrap(),
            Some(UseCaseEvent::Quit)
        );
    }

    #[test]
    fn test_spinner_turns_on_tick() {
        let mut uc = use_cases();
        uc.spinner("Processing").unwrap();
        assert!(uc.gui().frontend().has_text("Processing"));
        let position = |uc: &crate::use_case::UseCases<crate::frontend::MockFrontend>| {
            let pool = uc.gui().pool();
            (0..pool.len(0) as u16)
                .find_map(|index| match pool.get(ObjHandle { layer: 0, index }).unwrap().kind {
                    ObjKind::Spinner { position } => Some(position),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(position(&uc), 0);
        for expected in [1, 2, 3, 0] {
            assert_eq!(uc.on_tick(SPINNER_REFRESH_PERIOD).unwrap(), None);
            assert_eq!(position(&uc), expected, "Position wraps modulo 4");
        }
    }

    #[test]
    fn test_choice() {
        let mut uc = use_cases();
        uc.choice(None, "Reset settings?", None, "Reset", "Cancel").unwrap();
        assert!(uc.gui().frontend().has_text("Reset"));
        assert_eq!(
            uc.on_layout_event(action(CHOICE_TOKEN, 1)).unwrap(),
            Some(UseCaseEvent::Choice(false))
        );
        assert_eq!(
            uc.on_layout_event(action(CHOICE_TOKEN, 0)).unwrap(),
            Some(UseCaseEvent::Choice(true))
        );
        assert_eq!(
            uc.choice(None, "Reset settings?", None, "", "Cancel"),
            Err(NbglError::MalformedDescriptor("choice texts missing"))
        );
    }

    #[test]
    fn test_confirm_over_running_flow() {
        let mut uc = use_cases();
        uc.choice(None, "Reset settings?", None, "Reset", "Cancel").unwrap();
        uc.confirm("Really reset?", Some("This cannot be undone"), "Yes", "No")
            .unwrap();
        assert!(uc.is_modal_open());
        assert_eq!(uc.gui().nb_screens(), 2, "Drawn over the choice");
        assert!(uc.gui().frontend().has_text("Really reset?"));

        assert_eq!(
            uc.on_layout_event(action(CHOICE_TOKEN, 1)).unwrap(),
            Some(UseCaseEvent::Choice(false)),
            "Cancel reports a refusal"
        );
        assert!(!uc.is_modal_open());
        assert_eq!(uc.gui().nb_screens(), 1, "Choice below left as it was");

        uc.confirm("Really reset?", None, "Yes", "No").unwrap();
        assert_eq!(
            uc.on_layout_event(action(CHOICE_TOKEN, 0)).unwrap(),
            Some(UseCaseEvent::Choice(true))
        );
        assert!(!uc.is_modal_open());
    }

    #[test]
    fn test_confirm_needs_texts() {
        let mut uc = use_cases();
        assert_eq!(
            uc.confirm("Really reset?", None, "Yes", ""),
            Err(NbglError::MalformedDescriptor("confirmation texts missing"))
        );
        assert!(!uc.is_modal_open());
    }
}
