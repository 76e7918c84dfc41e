// src/content.rs
//! Generic page contents.
//!
//! A [`Content`] describes what one or several pages show, independently of
//! how many pages it will take. The paginator splits each content into pages;
//! the page renderer turns one page worth of a content into layout widgets.
//! Large tag/value lists and content lists can be pulled lazily through a
//! getter instead of being held in memory.

use alloc::borrow::Cow;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use log::warn;

use crate::error::{NbglError, NbglResult};
use crate::icons::Icon;
use crate::layout::{CenteredInfoStyle, TagValue};
use crate::types::{INVALID_TOKEN, NO_TUNE, State, TuneId};

/// Max elements of one list content, element indexes being `u8`
pub const MAX_LIST_ELEMENTS: usize = u8::MAX as usize;

/// Lazily produces the pair at a given index
pub type PairGetter = Rc<dyn Fn(usize) -> TagValue>;

/// Lazily produces the content at a given index
pub type ContentGetter = Rc<dyn Fn(usize) -> Content>;

// ----------------------------------------------------------------------------
// Tag/value pairs
// ----------------------------------------------------------------------------

/// Source of the pairs of a tag/value list
#[derive(Clone)]
pub enum Pairs {
    Inline(Vec<TagValue>),
    Callback { nb_pairs: u8, getter: PairGetter },
}

impl Pairs {
    /// Pair count, saturated at [`MAX_LIST_ELEMENTS`]; see [`Content::check_len`]
    pub fn len(&self) -> u8 {
        clamp_len(self.raw_len())
    }

    fn raw_len(&self) -> usize {
        match self {
            Pairs::Inline(pairs) => pairs.len(),
            Pairs::Callback { nb_pairs, .. } => *nb_pairs as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pair at `index`, borrowed when held inline
    pub fn get(&self, index: usize) -> Option<Cow<'_, TagValue>> {
        match self {
            Pairs::Inline(pairs) => pairs.get(index).map(Cow::Borrowed),
            Pairs::Callback { nb_pairs, getter } => {
                (index < *nb_pairs as usize).then(|| Cow::Owned(getter(index)))
            }
        }
    }

    /// Owned copies of `count` pairs starting at `start`
    pub fn range(&self, start: usize, count: usize) -> Vec<TagValue> {
        (start..start + count)
            .filter_map(|i| self.get(i).map(Cow::into_owned))
            .collect()
    }
}

impl fmt::Debug for Pairs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pairs::Inline(pairs) => f.debug_tuple("Inline").field(pairs).finish(),
            Pairs::Callback { nb_pairs, .. } => f.debug_struct("Callback").field("nb_pairs", nb_pairs).finish(),
        }
    }
}

impl From<Vec<TagValue>> for Pairs {
    fn from(pairs: Vec<TagValue>) -> Self {
        Pairs::Inline(pairs)
    }
}

#[derive(Debug, Clone)]
pub struct TagValueListContent {
    pub pairs: Pairs,
    /// Index of the first pair, reported in touch events
    pub start_index: u8,
    /// When non zero, values are cut to this many lines
    pub nb_max_lines_for_value: u8,
    pub small_case_for_value: bool,
    pub wrapping: bool,
    /// Reported when a touchable value (alias or value icon) is touched
    pub token: u8,
    pub tune: TuneId,
}

impl TagValueListContent {
    pub fn new(pairs: impl Into<Pairs>) -> Self {
        Self {
            pairs: pairs.into(),
            start_index: 0,
            nb_max_lines_for_value: 0,
            small_case_for_value: false,
            wrapping: true,
            token: INVALID_TOKEN,
            tune: NO_TUNE,
        }
    }
}

// ----------------------------------------------------------------------------
// Single page contents
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CenteredInfoContent {
    pub text1: Option<String>,
    pub text2: Option<String>,
    pub text3: Option<String>,
    pub icon: Option<Icon>,
    pub on_top: bool,
    pub style: CenteredInfoStyle,
    pub offset_y: i16,
}

/// Gray box at the bottom of a page, opening more information when touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipBox {
    pub text: String,
    pub icon: Option<Icon>,
    pub token: u8,
    pub tune: TuneId,
}

/// Icon and texts centered in the page, with an optional tip box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedCenter {
    pub icon: Option<Icon>,
    pub title: Option<String>,
    pub small_title: Option<String>,
    pub description: Option<String>,
    pub sub_text: Option<String>,
    pub tip_box: Option<TipBox>,
}

/// Centered info with a hold-to-approve button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLongPress {
    pub icon: Option<Icon>,
    pub text: String,
    pub long_press_text: String,
    pub long_press_token: u8,
    pub tune: TuneId,
}

/// Centered info with a single bottom button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoButton {
    pub icon: Option<Icon>,
    pub text: String,
    pub button_text: String,
    pub button_token: u8,
    pub tune: TuneId,
}

/// Tag/value list followed by a fitted "details" button
#[derive(Debug, Clone)]
pub struct TagValueDetails {
    pub list: TagValueListContent,
    pub details_button_text: Option<String>,
    pub details_button_icon: Option<Icon>,
    pub details_button_token: u8,
}

/// Tag/value list ending with a confirmation button on its last page
#[derive(Debug, Clone)]
pub struct TagValueConfirm {
    pub list: TagValueListContent,
    pub details_button_text: Option<String>,
    pub details_button_icon: Option<Icon>,
    pub details_button_token: u8,
    pub confirmation_text: Option<String>,
    pub confirmation_token: u8,
    pub cancel_text: Option<String>,
    pub cancel_token: u8,
}

impl TagValueConfirm {
    pub fn new(list: TagValueListContent, confirmation_text: impl Into<String>, confirmation_token: u8) -> Self {
        Self {
            list,
            details_button_text: None,
            details_button_icon: None,
            details_button_token: INVALID_TOKEN,
            confirmation_text: Some(confirmation_text.into()),
            confirmation_token,
            cancel_text: None,
            cancel_token: INVALID_TOKEN,
        }
    }
}

// ----------------------------------------------------------------------------
// Lists
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchItem {
    pub text: String,
    pub sub_text: Option<String>,
    pub init_state: State,
    pub token: u8,
    pub tune: TuneId,
}

impl SwitchItem {
    pub fn new(text: impl Into<String>, init_state: State, token: u8) -> Self {
        Self {
            text: text.into(),
            sub_text: None,
            init_state,
            token,
            tune: NO_TUNE,
        }
    }

    pub fn with_sub_text(mut self, sub_text: impl Into<String>) -> Self {
        self.sub_text = Some(sub_text.into());
        self
    }
}

/// Read-only (type, content) rows, such as the app version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfosList {
    pub types: Vec<String>,
    pub contents: Vec<String>,
    /// Full value of a row whose content is an alias; such rows are touchable
    pub extensions: Vec<Option<String>>,
    pub token: u8,
}

impl InfosList {
    pub fn new<T: Into<String>, C: Into<String>>(rows: impl IntoIterator<Item = (T, C)>) -> Self {
        let (types, contents) = rows.into_iter().map(|(t, c)| (t.into(), c.into())).unzip();
        Self {
            types,
            contents,
            extensions: Vec::new(),
            token: INVALID_TOKEN,
        }
    }

    /// Full value behind the alias of row `index`
    pub fn extension(&self, index: usize) -> Option<&str> {
        self.extensions.get(index)?.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicesList {
    pub names: Vec<String>,
    pub init_choice: u8,
    pub token: u8,
    pub tune: TuneId,
}

/// Touchable bars, each with its own token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarsList {
    pub texts: Vec<String>,
    pub tokens: Vec<u8>,
    pub tune: TuneId,
}

// ----------------------------------------------------------------------------
// Content
// ----------------------------------------------------------------------------

/// What one or several pages display
#[derive(Debug, Clone)]
pub enum Content {
    CenteredInfo(CenteredInfoContent),
    ExtendedCenter(ExtendedCenter),
    InfoLongPress(InfoLongPress),
    InfoButton(InfoButton),
    TagValueList(TagValueListContent),
    TagValueDetails(TagValueDetails),
    TagValueConfirm(TagValueConfirm),
    SwitchesList(Vec<SwitchItem>),
    InfosList(InfosList),
    ChoicesList(ChoicesList),
    BarsList(BarsList),
}

fn clamp_len(len: usize) -> u8 {
    len.min(MAX_LIST_ELEMENTS) as u8
}

impl Content {
    /// Number of paginated elements; single page contents count as one
    pub fn nb_elements(&self) -> u8 {
        clamp_len(self.raw_nb_elements())
    }

    fn raw_nb_elements(&self) -> usize {
        match self {
            Content::TagValueList(list) => list.pairs.raw_len(),
            Content::TagValueConfirm(confirm) => confirm.list.pairs.raw_len(),
            Content::SwitchesList(switches) => switches.len(),
            Content::InfosList(infos) => infos.types.len().min(infos.contents.len()),
            Content::ChoicesList(choices) => choices.names.len(),
            Content::BarsList(bars) => bars.texts.len().min(bars.tokens.len()),
            _ => 1,
        }
    }

    /// Reject a list holding more than [`MAX_LIST_ELEMENTS`] elements
    pub fn check_len(&self) -> NbglResult<()> {
        let len = self.raw_nb_elements();
        if len > MAX_LIST_ELEMENTS {
            warn!("{} of {} elements, at most {}", self.name(), len, MAX_LIST_ELEMENTS);
            return Err(NbglError::MalformedDescriptor("too many elements in one content"));
        }
        Ok(())
    }

    /// Max elements of this type on one page
    pub fn max_elements_per_page(&self) -> u8 {
        match self {
            Content::SwitchesList(_) | Content::InfosList(_) => 3,
            Content::ChoicesList(_) | Content::BarsList(_) => 5,
            _ => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Content::CenteredInfo(_) => "centered info",
            Content::ExtendedCenter(_) => "extended center",
            Content::InfoLongPress(_) => "info long press",
            Content::InfoButton(_) => "info button",
            Content::TagValueList(_) => "tag/value list",
            Content::TagValueDetails(_) => "tag/value details",
            Content::TagValueConfirm(_) => "tag/value confirm",
            Content::SwitchesList(_) => "switches list",
            Content::InfosList(_) => "infos list",
            Content::ChoicesList(_) => "choices list",
            Content::BarsList(_) => "bars list",
        }
    }

    /// Pairs of the tag/value kinds
    pub fn tag_value_list(&self) -> Option<&TagValueListContent> {
        match self {
            Content::TagValueList(list) => Some(list),
            Content::TagValueDetails(details) => Some(&details.list),
            Content::TagValueConfirm(confirm) => Some(&confirm.list),
            _ => None,
        }
    }
}

/// The ordered contents of a paginated flow
#[derive(Clone)]
pub enum GenericContents {
    Inline(Vec<Content>),
    Callback { nb_contents: u8, getter: ContentGetter },
}

impl GenericContents {
    pub fn len(&self) -> u8 {
        match self {
            GenericContents::Inline(contents) => clamp_len(contents.len()),
            GenericContents::Callback { nb_contents, .. } => *nb_contents,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Cow<'_, Content>> {
        match self {
            GenericContents::Inline(contents) => contents.get(index).map(Cow::Borrowed),
            GenericContents::Callback { nb_contents, getter } => {
                (index < *nb_contents as usize).then(|| Cow::Owned(getter(index)))
            }
        }
    }
}

impl Default for GenericContents {
    fn default() -> Self {
        GenericContents::Inline(Vec::new())
    }
}

impl fmt::Debug for GenericContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericContents::Inline(contents) => f.debug_tuple("Inline").field(contents).finish(),
            GenericContents::Callback { nb_contents, .. } => f
                .debug_struct("Callback")
                .field("nb_contents", nb_contents)
                .finish(),
        }
    }
}

impl From<Vec<Content>> for GenericContents {
    fn from(contents: Vec<Content>) -> Self {
        GenericContents::Inline(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    #[test]
    fn test_callback_pairs_are_bounded() {
        let pairs = Pairs::Callback {
            nb_pairs: 3,
            getter: Rc::new(|i| TagValue::new(format!("tag {}", i), "value")),
        };
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs.get(2).map(|p| p.item.clone()), Some("tag 2".into()));
        assert!(pairs.get(3).is_none(), "Index past the count must not call the getter");
    }

    #[test]
    fn test_pairs_range() {
        let pairs = Pairs::Inline(vec![
            TagValue::new("a", "1"),
            TagValue::new("b", "2"),
            TagValue::new("c", "3"),
        ]);
        let range = pairs.range(1, 5);
        assert_eq!(range.len(), 2, "Range is cut at the end of the list");
        assert_eq!(range[0].item, "b");
    }

    #[test]
    fn test_nb_elements() {
        let infos = Content::InfosList(InfosList::new([("Version", "1.0"), ("Developer", "Ledger")]));
        assert_eq!(infos.nb_elements(), 2);
        assert_eq!(infos.max_elements_per_page(), 3);

        let button = Content::InfoButton(InfoButton {
            icon: None,
            text: "Ready".into(),
            button_text: "Go".into(),
            button_token: 1,
            tune: NO_TUNE,
        });
        assert_eq!(button.nb_elements(), 1, "Single page contents count as one element");
    }

    #[test]
    fn test_bars_with_missing_tokens() {
        let bars = Content::BarsList(BarsList {
            texts: vec!["One".into(), "Two".into()],
            tokens: vec![4],
            tune: NO_TUNE,
        });
        assert_eq!(bars.nb_elements(), 1, "Bars without a token are not shown");
    }

    #[test]
    fn test_generic_contents_callback() {
        let contents = GenericContents::Callback {
            nb_contents: 2,
            getter: Rc::new(|_| Content::CenteredInfo(CenteredInfoContent::default())),
        };
        assert_eq!(contents.len(), 2);
        assert!(contents.get(1).is_some());
        assert!(contents.get(2).is_none());
    }
}
