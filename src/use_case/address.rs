// src/use_case/address.rs
//! Address verification, with the address also shown as a QR code.

use alloc::vec;
use alloc::vec::Vec;

use log::info;

use super::{
    ADDRESS_QRCODE_BUTTON_TOKEN, CONFIRM_TOKEN, DISMISS_TOKEN, Flow, FlowKind, ModalKind, REJECT_TOKEN, UseCases,
};
use crate::content::{Content, Pairs, TagValueConfirm, TagValueListContent};
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::icons::{self, Icon};
use crate::layout::{FooterDesc, FooterKind, Layout, LayoutDescription, QrCodeDesc, TagValue};
use crate::page;
use crate::paginator::AppPaginator;
use crate::types::NO_TUNE;

impl<F: Frontend> UseCases<F> {
    /// Show `address` then `additional` pairs, confirmed on the last page.
    ///
    /// Reports [`UseCaseEvent::Choice`](super::UseCaseEvent::Choice), `true`
    /// when the address matches.
    pub fn address_review(
        &mut self,
        address: &str,
        additional: Vec<TagValue>,
        icon: Option<Icon>,
        title: &str,
        sub_title: Option<&str>,
    ) -> NbglResult<()> {
        if address.is_empty() || title.is_empty() {
            return Err(NbglError::MalformedDescriptor("address or title missing"));
        }
        let mut pairs = vec![TagValue::new("Address", address)];
        pairs.extend(additional);
        let confirm = TagValueConfirm {
            details_button_text: Some("Show as QR".into()),
            details_button_icon: Some(icons::QR_CODE),
            details_button_token: ADDRESS_QRCODE_BUTTON_TOKEN,
            cancel_text: Some("Cancel".into()),
            cancel_token: REJECT_TOKEN,
            ..TagValueConfirm::new(
                TagValueListContent::new(Pairs::Inline(pairs)),
                "Confirm",
                CONFIRM_TOKEN,
            )
        };
        let first = page::review_first_page(icon, Some(title), sub_title, "Swipe to continue");
        let contents = vec![Content::ExtendedCenter(first), Content::TagValueConfirm(confirm)];

        let mut flow = Flow::new(
            FlowKind::Address {
                address: address.into(),
            },
            AppPaginator::new(contents),
        );
        flow.quit_text = Some("Cancel".into());
        info!("Address review of {}", address);
        self.start_flow(flow, 0)
    }

    pub(super) fn open_qr_code(&mut self, address: &str) -> NbglResult<()> {
        let mut layout = Layout::new(
            &mut self.gui,
            &LayoutDescription {
                modal: true,
                with_left_border: true,
                ..Default::default()
            },
        )?;
        layout.add_qr_code(
            &mut self.gui,
            &QrCodeDesc {
                url: address,
                text1: Some(address),
                text2: None,
                large_text1: false,
                centered: true,
                offset_y: 0,
            },
        )?;
        layout.add_footer(
            &mut self.gui,
            &FooterDesc {
                kind: FooterKind::SimpleText {
                    text: "Close",
                    muted: false,
                    token: DISMISS_TOKEN,
                    tune: NO_TUNE,
                },
                separation_line: true,
            },
        )?;
        layout.draw(&mut self.gui)?;
        self.open_modal(layout, ModalKind::QrCode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_case::tests::{action, use_cases};
    use crate::use_case::{NAV_TOKEN, UseCaseEvent};

    const ADDRESS: &str = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";

    #[test]
    fn test_address_confirm_page() {
        let mut uc = use_cases();
        uc.address_review(ADDRESS, Vec::new(), None, "Verify BTC address", None)
            .unwrap();
        assert!(uc.gui().frontend().has_text("Verify BTC address"));
        uc.on_layout_event(action(NAV_TOKEN, 1)).unwrap();
        assert!(uc.gui().frontend().has_text("Show as QR"));
        assert!(uc.gui().frontend().has_text("Confirm"));
        assert_eq!(
            uc.on_layout_event(action(CONFIRM_TOKEN, 0)).unwrap(),
            Some(UseCaseEvent::Choice(true))
        );
    }

    #[test]
    fn test_qr_code_modal() {
        let mut uc = use_cases();
        uc.address_review(ADDRESS, Vec::new(), None, "Verify BTC address", None)
            .unwrap();
        uc.on_layout_event(action(NAV_TOKEN, 1)).unwrap();
        uc.on_layout_event(action(ADDRESS_QRCODE_BUTTON_TOKEN, 0)).unwrap();
        assert!(uc.is_modal_open());
        assert_eq!(uc.gui().nb_screens(), 2);
        assert!(uc.gui().frontend().has_text("Close"));

        assert_eq!(uc.on_layout_event(action(DISMISS_TOKEN, 0)).unwrap(), None);
        assert!(!uc.is_modal_open());
        assert_eq!(uc.gui().nb_screens(), 1);
    }

    #[test]
    fn test_cancel_rejects_directly() {
        let mut uc = use_cases();
        uc.address_review(ADDRESS, Vec::new(), None, "Verify BTC address", None)
            .unwrap();
        assert_eq!(
            uc.on_layout_event(action(REJECT_TOKEN, 0)).unwrap(),
            Some(UseCaseEvent::Choice(false)),
            "No confirmation modal for an address"
        );
        assert!(!uc.is_modal_open());
    }

    #[test]
    fn test_missing_address_is_malformed() {
        let mut uc = use_cases();
        assert!(uc.address_review("", Vec::new(), None, "Verify", None).is_err());
    }
}
