// src/use_case/home.rs
//! Home page of an application, its settings and generic configuration pages.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use log::info;

use super::{
    Flow, FlowKind, INFO_ALIAS_TOKEN, QUIT_TOKEN, SETTINGS_TOKEN, Session, UseCaseEvent, UseCases,
};
use crate::content::{Content, GenericContents, InfosList};
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::icons::{self, Icon};
use crate::layout::{ButtonStyle, CenteredInfo, CenteredInfoStyle};
use crate::page::{self, InfoPage};
use crate::paginator::AppPaginator;
use crate::types::{INVALID_TOKEN, NO_TUNE};

/// Home page of an application, with its optional settings
#[derive(Debug, Clone)]
pub struct HomeDesc {
    pub name: String,
    pub icon: Option<Icon>,
    /// Defaults to a sentence naming the application
    pub tagline: Option<String>,
    /// Button above "Quit app"
    pub action_text: Option<String>,
    pub settings: GenericContents,
    /// Shown after the settings
    pub infos: Option<InfosList>,
}

impl HomeDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            tagline: None,
            action_text: None,
            settings: GenericContents::default(),
            infos: None,
        }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = Some(tagline.into());
        self
    }

    pub fn with_action(mut self, text: impl Into<String>) -> Self {
        self.action_text = Some(text.into());
        self
    }

    pub fn with_settings(mut self, settings: impl Into<GenericContents>) -> Self {
        self.settings = settings.into();
        self
    }

    pub fn with_infos(mut self, infos: InfosList) -> Self {
        self.infos = Some(infos);
        self
    }

    fn has_settings(&self) -> bool {
        !self.settings.is_empty() || self.infos.is_some()
    }
}

/// Settings contents followed by the infos list, as one content list
fn settings_contents(contents: GenericContents, infos: Option<InfosList>) -> NbglResult<GenericContents> {
    let Some(mut infos) = infos else {
        return Ok(contents);
    };
    if infos.token == INVALID_TOKEN && infos.extensions.iter().any(Option::is_some) {
        infos.token = INFO_ALIAS_TOKEN;
    }
    let mut all: Vec<Content> = match contents {
        GenericContents::Inline(contents) => contents,
        GenericContents::Callback { nb_contents, getter } => (0..nb_contents as usize).map(|i| getter(i)).collect(),
    };
    if all.len() >= u8::MAX as usize {
        return Err(NbglError::MalformedDescriptor("too many settings contents"));
    }
    all.push(Content::InfosList(infos));
    Ok(GenericContents::Inline(all))
}

impl<F: Frontend> UseCases<F> {
    /// Home page of the application; its top right key opens the settings
    pub fn home_and_settings(&mut self, home: HomeDesc) -> NbglResult<()> {
        if home.name.is_empty() {
            return Err(NbglError::MalformedDescriptor("application name missing"));
        }
        self.show_home(home)
    }

    pub(super) fn show_home(&mut self, home: HomeDesc) -> NbglResult<()> {
        let tagline = home
            .tagline
            .clone()
            .unwrap_or_else(|| format!("This app enables signing\ntransactions on the {}\nnetwork.", home.name));
        let top_right = home.has_settings().then(|| {
            let icon = if home.settings.is_empty() {
                icons::INFO
            } else {
                icons::SETTINGS
            };
            (icon, SETTINGS_TOKEN)
        });
        let info = InfoPage {
            centered_info: CenteredInfo {
                text1: Some(home.name.as_str()),
                text2: Some(tagline.as_str()),
                icon: home.icon,
                style: CenteredInfoStyle::LargeCaseInfo,
                ..Default::default()
            },
            top_right,
            action_text: home.action_text.as_deref(),
            action_style: ButtonStyle::BlackBackground,
            quit_app: true,
            bottom_token: QUIT_TOKEN,
            tune: NO_TUNE,
            ..Default::default()
        };
        let layout = page::draw_info(&mut self.gui, &info, None)?;
        info!("Home page of {}", home.name);
        self.start(Session::Home(home), layout);
        Ok(())
    }

    pub(super) fn on_home_action(&mut self, token: u8, index: u8) -> NbglResult<Option<UseCaseEvent>> {
        let Session::Home(home) = &self.session else {
            return Ok(None);
        };
        match token {
            // the action button comes first, above "Quit app"
            QUIT_TOKEN if home.action_text.is_some() && index == 0 => Ok(Some(UseCaseEvent::HomeAction)),
            QUIT_TOKEN => Ok(Some(UseCaseEvent::Quit)),
            SETTINGS_TOKEN => {
                let home = home.clone();
                let contents = settings_contents(home.settings.clone(), home.infos.clone())?;
                let title = home.name.clone();
                let mut flow = Flow::new(FlowKind::Settings { home: Some(home) }, AppPaginator::new(contents));
                flow.title = Some(title);
                self.start_flow(flow, 0)?;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Settings pages under a title whose back key quits
    pub fn settings(
        &mut self,
        title: &str,
        init_page: u8,
        contents: impl Into<GenericContents>,
        infos: Option<InfosList>,
    ) -> NbglResult<()> {
        let contents = settings_contents(contents.into(), infos)?;
        let mut flow = Flow::new(FlowKind::Settings { home: None }, AppPaginator::new(contents));
        flow.title = Some(title.into());
        info!("Settings {:?} from page {}", title, init_page);
        self.start_flow(flow, init_page)
    }

    /// Paginated contents, under an optional title whose back key quits
    pub fn generic_configuration(
        &mut self,
        title: Option<&str>,
        init_page: u8,
        contents: impl Into<GenericContents>,
    ) -> NbglResult<()> {
        let mut flow = Flow::new(FlowKind::Settings { home: None }, AppPaginator::new(contents.into()));
        flow.title = title.map(String::from);
        // without a title, leaving goes through a quit text
        if flow.title.is_none() {
            flow.quit_text = Some("Back".into());
        }
        self.start_flow(flow, init_page)
    }
}
