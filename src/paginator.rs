// src/paginator.rs
//! Generic content paginator.
//!
//! Splits an ordered list of [`Content`]s into pages. Each page only stores
//! how many elements it holds and whether it needs a specific display, packed
//! in a nibble; the position in the contents is then walked page by page by
//! [`Paginator::goto_page`], which is why only single-step backward moves are
//! possible.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use log::{debug, warn};

use crate::config::Profile;
use crate::content::{Content, GenericContents, TagValueListContent};
use crate::error::{NbglError, NbglResult};
use crate::frontend::TextMetrics;
use crate::types::FontId;

/// Max pages of an application flow
pub const MAX_PAGE_NB: usize = 256;
/// Max pages of a modal flow
pub const MAX_MODAL_PAGE_NB: usize = 32;
/// An element count is stored on 3 bits
pub const MAX_ELEMENTS_PER_PAGE: u8 = 0x07;

const NB_ELEMENTS_MASK: u8 = 0x07;
const FLAG_BIT: u8 = 0x08;

// ----------------------------------------------------------------------------
// Page info table
// ----------------------------------------------------------------------------

/// Element count of a page, and whether it needs a specific display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub nb_elements: u8,
    /// The single pair of the page is too long, or displayed centered
    pub flag: bool,
}

impl PageInfo {
    fn to_nibble(self) -> u8 {
        (self.nb_elements & NB_ELEMENTS_MASK) | if self.flag { FLAG_BIT } else { 0 }
    }

    fn from_nibble(nibble: u8) -> Self {
        Self {
            nb_elements: nibble & NB_ELEMENTS_MASK,
            flag: nibble & FLAG_BIT != 0,
        }
    }
}

/// Page infos packed two pages per byte
#[derive(Debug, Clone, Default)]
pub struct PageInfoTable<const BYTES: usize> {
    bytes: heapless::Vec<u8, BYTES>,
    nb_pages: usize,
}

pub type AppPageInfo = PageInfoTable<{ MAX_PAGE_NB / 2 }>;
pub type ModalPageInfo = PageInfoTable<{ MAX_MODAL_PAGE_NB / 2 }>;

impl<const BYTES: usize> PageInfoTable<BYTES> {
    pub fn new() -> Self {
        Self {
            bytes: heapless::Vec::new(),
            nb_pages: 0,
        }
    }

    /// Max pages, also bounded by the `u8` page count
    pub fn capacity(&self) -> usize {
        (BYTES * 2).min(u8::MAX as usize)
    }

    pub fn len(&self) -> usize {
        self.nb_pages
    }

    pub fn is_empty(&self) -> bool {
        self.nb_pages == 0
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.nb_pages = 0;
    }

    /// Append the info of the next page
    pub fn push(&mut self, info: PageInfo) -> NbglResult<()> {
        let max = self.capacity();
        if self.nb_pages >= max {
            warn!(" Page info table full ({} pages)", max);
            return Err(NbglError::PageTableFull { max });
        }
        let nibble = info.to_nibble();
        if self.nb_pages % 2 == 0 {
            self.bytes.push(nibble).map_err(|_| NbglError::PageTableFull { max })?;
        } else if let Some(last) = self.bytes.last_mut() {
            *last |= nibble << 4;
        }
        self.nb_pages += 1;
        Ok(())
    }

    pub fn get(&self, page: usize) -> Option<PageInfo> {
        if page >= self.nb_pages {
            return None;
        }
        let byte = *self.bytes.get(page / 2)?;
        let nibble = if page % 2 == 0 { byte & 0x0F } else { byte >> 4 };
        Some(PageInfo::from_nibble(nibble))
    }
}

// ----------------------------------------------------------------------------
// Fitting
// ----------------------------------------------------------------------------

/// What else shares the page with a tag/value list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagValueFit {
    /// The centering header is replaced by a touchable "Skip" header
    pub skippable: bool,
    /// A confirmation button follows the last pair
    pub has_confirmation: bool,
    /// A fitted details button follows the pairs
    pub has_details: bool,
}

/// Font the values of a tag/value list are fitted with. Small-case values
/// are drawn bold but measured in the regular weight.
pub fn value_font(small_case: bool) -> FontId {
    if small_case { FontId::SmallRegular } else { FontId::LargeMedium }
}

/// Number of pairs of `list`, starting at `start`, fitting in one review page
pub fn nb_tag_values_in_page<M: TextMetrics + ?Sized>(
    metrics: &M,
    profile: &Profile,
    list: &TagValueListContent,
    start: u8,
    fit: TagValueFit,
) -> PageInfo {
    let nb_pairs = list.pairs.len().saturating_sub(start);
    let width = profile.available_width();
    let font = value_font(list.small_case_for_value);
    let mut current = profile.pre_tag_value_margin;
    let mut max = profile.tag_value_area_height();
    if fit.skippable {
        max = max.saturating_sub(profile.touchable_header_bar_height - profile.small_centering_header);
    }

    let mut info = PageInfo::default();
    while info.nb_elements < nb_pairs && info.nb_elements < MAX_ELEMENTS_PER_PAGE {
        let Some(pair) = list.pairs.get((start + info.nb_elements) as usize) else {
            break;
        };
        if info.nb_elements > 0 {
            current += profile.inter_tag_value_margin;
            if pair.force_page_start {
                break;
            }
        }
        if pair.centered_info {
            if info.nb_elements == 0 {
                info = PageInfo { nb_elements: 1, flag: true };
            }
            break;
        }

        current = current
            .saturating_add(metrics.text_height_in_width(FontId::SmallRegular, &pair.item, width, list.wrapping))
            .saturating_add(profile.tag_value_intervale)
            .saturating_add(metrics.text_height_in_width(font, &pair.value, width, list.wrapping));
        let nb_lines = metrics.nb_lines_in_width(font, &pair.value, width, list.wrapping);
        if current >= max || nb_lines > profile.nb_max_lines_in_review as u16 {
            if info.nb_elements == 0 {
                info = PageInfo { nb_elements: 1, flag: true };
            }
            break;
        }
        info.nb_elements += 1;
    }

    // the buttons below the pairs may push the last one to the next page
    if fit.has_confirmation && info.nb_elements == nb_pairs {
        max = max.saturating_sub(profile.up_footer_button_height);
        if current > max && info.nb_elements > 1 {
            info.nb_elements -= 1;
        }
    } else if fit.has_details {
        max = max.saturating_sub(2 * profile.small_button_radius);
        if current > max && info.nb_elements > 1 {
            info.nb_elements -= 1;
        }
    }
    info
}

/// Cut a long value into the pages of its details view.
///
/// Each page holds `nb_max_lines_in_details` lines, the last one the rest.
pub fn detail_pages<'a, M: TextMetrics + ?Sized>(
    metrics: &M,
    profile: &Profile,
    value: &'a str,
    wrapping: bool,
) -> Vec<&'a str> {
    let width = profile.available_width();
    let per_page = profile.nb_max_lines_in_details.max(1);
    let mut pages = Vec::new();
    let mut page_start = 0usize;
    let mut offset = 0usize;
    let mut nb_lines = 0u8;

    while offset < value.len() {
        let rest = &value[offset..];
        let (mut len, _) = metrics.max_len_and_width(FontId::SmallRegular, rest, width, wrapping);
        if len == 0 {
            len = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        offset += len;
        nb_lines += 1;
        if nb_lines == per_page && offset < value.len() && pages.len() + 1 < MAX_MODAL_PAGE_NB {
            pages.push(&value[page_start..offset]);
            page_start = offset;
            nb_lines = 0;
        }
    }
    pages.push(&value[page_start..]);
    pages
}

/// When the trailing item may be dropped to leave room for a navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavTrim {
    /// Only when the list overflows
    OnOverflow,
    /// Whenever the items reach the navigation bar area
    Always,
}

/// Greedy fit of list items in the infos area
fn nb_list_items_in_page(
    profile: &Profile,
    heights: impl Iterator<Item = u16>,
    max_items: u8,
    with_nav: bool,
    trim: NavTrim,
) -> u8 {
    let nav_height = if with_nav { profile.simple_footer_height } else { 0 };
    let limit = profile.infos_area_height().saturating_sub(nav_height);
    let nav_limit = profile.infos_area_height().saturating_sub(profile.simple_footer_height);
    let mut current = 0u16;
    let mut previous = 0u16;
    let mut nb = 0u8;
    let mut overflow = false;

    for height in heights.take(max_items as usize) {
        current = current.saturating_add(height);
        if current >= limit {
            overflow = true;
            break;
        }
        previous = current;
        nb += 1;
    }
    let must_trim = match trim {
        NavTrim::OnOverflow => overflow,
        NavTrim::Always => true,
    };
    if must_trim && !with_nav && previous >= nav_limit && nb > 1 {
        nb -= 1;
    }
    nb.max(1)
}

fn max_items(content: &Content, start: u8) -> u8 {
    content
        .nb_elements()
        .saturating_sub(start)
        .min(content.max_elements_per_page())
}

/// Number of elements of `content`, from `start`, fitting in one page
pub fn nb_elements_in_page<M: TextMetrics + ?Sized>(
    metrics: &M,
    profile: &Profile,
    content: &Content,
    start: u8,
    is_last: bool,
    skippable: bool,
    with_nav: bool,
) -> PageInfo {
    let width = profile.available_width();
    let bar_height = profile.list_item_min_text_height + 2 * profile.list_item_pre_heading;
    let max = max_items(content, start);
    let nb_elements = match content {
        Content::TagValueList(list) => {
            return nb_tag_values_in_page(
                metrics,
                profile,
                list,
                start,
                TagValueFit {
                    skippable,
                    ..Default::default()
                },
            );
        }
        Content::TagValueConfirm(confirm) => {
            return nb_tag_values_in_page(
                metrics,
                profile,
                &confirm.list,
                start,
                TagValueFit {
                    skippable,
                    has_confirmation: is_last,
                    has_details: !is_last,
                },
            );
        }
        Content::InfosList(infos) => {
            let heights = infos.contents.iter().skip(start as usize).map(|text| {
                bar_height
                    + profile.list_item_heading_sub_text
                    + metrics.text_height_in_width(FontId::SmallRegular, text, width, true)
            });
            nb_list_items_in_page(profile, heights, max, with_nav, NavTrim::OnOverflow)
        }
        Content::SwitchesList(switches) => {
            let heights = switches.iter().skip(start as usize).map(|switch| {
                let text_height = metrics
                    .text_height_in_width(FontId::SmallBold, &switch.text, width, true)
                    .max(profile.list_item_min_text_height);
                let sub_height = switch.sub_text.as_deref().map_or(0, |sub_text| {
                    profile.list_item_heading_sub_text
                        + metrics.text_height_in_width(FontId::SmallRegular, sub_text, width, true)
                });
                text_height + 2 * profile.list_item_pre_heading + sub_height
            });
            nb_list_items_in_page(profile, heights, max, with_nav, NavTrim::Always)
        }
        Content::BarsList(_) => {
            nb_list_items_in_page(profile, core::iter::repeat(bar_height), max, with_nav, NavTrim::Always)
        }
        Content::ChoicesList(_) => {
            nb_list_items_in_page(profile, core::iter::repeat(bar_height), max, with_nav, NavTrim::OnOverflow)
        }
        _ => max,
    };
    PageInfo {
        nb_elements: nb_elements.max(1),
        flag: false,
    }
}

// ----------------------------------------------------------------------------
// Paginator
// ----------------------------------------------------------------------------

fn lookup<'a>(
    contents: &'a GenericContents,
    starting: Option<&'a Content>,
    finishing: Option<&'a Content>,
    idx: i16,
) -> Option<Cow<'a, Content>> {
    let nb = contents.len() as i16;
    match idx {
        -1 => starting.map(Cow::Borrowed),
        idx if idx == nb && finishing.is_some() => finishing.map(Cow::Borrowed),
        idx if idx >= 0 => contents.get(idx as usize),
        _ => None,
    }
}

/// Position in the contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    active_page: u8,
    /// -1 for the starting content, `nb_contents` for the finishing one
    content_idx: i16,
    element_idx: i16,
    /// Element count of the current content, 0 when not yet known
    content_nb_elements: u8,
}

/// Walks a list of contents page by page
#[derive(Debug, Clone, Default)]
pub struct Paginator<const BYTES: usize> {
    contents: GenericContents,
    starting: Option<Content>,
    finishing: Option<Content>,
    pages: PageInfoTable<BYTES>,
    cursor: Cursor,
}

pub type AppPaginator = Paginator<{ MAX_PAGE_NB / 2 }>;
pub type ModalPaginator = Paginator<{ MAX_MODAL_PAGE_NB / 2 }>;

impl<const BYTES: usize> Paginator<BYTES> {
    pub fn new(contents: impl Into<GenericContents>) -> Self {
        Self {
            contents: contents.into(),
            starting: None,
            finishing: None,
            pages: PageInfoTable::new(),
            cursor: Cursor::default(),
        }
    }

    /// Content shown before the generic contents
    pub fn with_starting_content(mut self, content: Content) -> Self {
        self.starting = Some(content);
        self
    }

    /// Content shown after the generic contents
    pub fn with_finishing_content(mut self, content: Content) -> Self {
        self.finishing = Some(content);
        self
    }

    pub fn nb_contents(&self) -> u8 {
        self.contents.len()
    }

    fn first_content_idx(&self) -> i16 {
        if self.starting.is_some() { -1 } else { 0 }
    }

    fn last_content_idx(&self) -> i16 {
        let nb = self.contents.len() as i16;
        if self.finishing.is_some() { nb } else { nb - 1 }
    }

    /// Content at `idx`, including the starting and finishing slots
    pub fn content_at(&self, idx: i16) -> Option<Cow<'_, Content>> {
        lookup(&self.contents, self.starting.as_ref(), self.finishing.as_ref(), idx)
    }

    /// Fill the page info table and move to the first page; returns the page count
    pub fn compute_pages<M: TextMetrics + ?Sized>(
        &mut self,
        metrics: &M,
        profile: &Profile,
        skippable: bool,
    ) -> NbglResult<u8> {
        let (first, last) = (self.first_content_idx(), self.last_content_idx());
        let nb_contents = self.contents.len() as i16;
        let Self {
            contents,
            starting,
            finishing,
            pages,
            ..
        } = self;
        pages.clear();
        for idx in first..=last {
            let content = lookup(contents, starting.as_ref(), finishing.as_ref(), idx)
                .ok_or(NbglError::MalformedDescriptor("missing content"))?;
            content.check_len()?;
            // the starting content is never the last one, the finishing one always is
            let is_last = idx >= nb_contents - 1;
            let nb_elements = content.nb_elements();
            let page_start = pages.len();
            let mut element = 0u8;
            while element < nb_elements {
                let with_nav = !is_last || page_start > 0 || element > 0;
                let info = nb_elements_in_page(metrics, profile, &content, element, is_last, skippable, with_nav);
                pages.push(info)?;
                element = element.saturating_add(info.nb_elements);
            }
        }
        let nb_pages = self.pages.len() as u8;
        debug!(" Paginated {} contents in {} pages", self.contents.len(), self.pages.len());

        self.cursor = Cursor {
            active_page: 0,
            content_idx: self.non_empty_content(self.first_content_idx(), 1),
            element_idx: 0,
            content_nb_elements: 0,
        };
        if nb_pages > 0 {
            self.cursor = self.next_cursor(0)?;
        }
        Ok(nb_pages)
    }

    pub fn nb_pages(&self) -> u8 {
        self.pages.len().min(u8::MAX as usize) as u8
    }

    pub fn active_page(&self) -> u8 {
        self.cursor.active_page
    }

    pub fn page_info(&self, page: u8) -> Option<PageInfo> {
        self.pages.get(page as usize)
    }

    /// Info of the active page
    pub fn active_page_info(&self) -> PageInfo {
        self.page_info(self.cursor.active_page).unwrap_or_default()
    }

    /// Index of the content of the active page, -1 being the starting content
    pub fn current_content_idx(&self) -> i16 {
        self.cursor.content_idx
    }

    /// Index in the current content of the first element of the active page
    pub fn current_element_idx(&self) -> u8 {
        self.cursor.element_idx.max(0) as u8
    }

    pub fn current_content(&self) -> Option<Cow<'_, Content>> {
        self.content_at(self.cursor.content_idx)
    }

    /// Whether the active page belongs to the last content
    pub fn is_last_content(&self) -> bool {
        self.non_empty_content(self.cursor.content_idx + 1, 1) > self.last_content_idx()
    }

    /// Move to `page`. Forward jumps walk every page in between; backward
    /// moves are limited to the previous page. On error nothing changes.
    pub fn goto_page(&mut self, page: u8) -> NbglResult<()> {
        let from = self.cursor.active_page;
        if page as usize >= self.pages.len() {
            warn!(" Page {} out of {} pages", page, self.pages.len());
            return Err(NbglError::InvalidNavigation { from, to: page });
        }
        if page < from && from - page > 1 {
            warn!(" Backward jump from page {} to {} rejected", from, page);
            return Err(NbglError::InvalidNavigation { from, to: page });
        }

        let saved = self.cursor;
        let first_step = if page > from { from + 1 } else { page };
        for step in first_step..=page {
            match self.next_cursor(step) {
                Ok(cursor) => self.cursor = cursor,
                Err(err) => {
                    self.cursor = saved;
                    return Err(err);
                }
            }
        }
        debug!(
            " Page {}: content {} element {}",
            page, self.cursor.content_idx, self.cursor.element_idx
        );
        Ok(())
    }

    /// First content from `idx` on, walking by `step`, holding elements.
    /// Empty contents have no page and are stepped over.
    fn non_empty_content(&self, mut idx: i16, step: i16) -> i16 {
        while (self.first_content_idx()..=self.last_content_idx()).contains(&idx) {
            match self.content_at(idx) {
                Some(content) if content.nb_elements() == 0 => idx += step,
                _ => break,
            }
        }
        idx
    }

    /// Cursor of `page`, from the active page
    fn next_cursor(&self, page: u8) -> NbglResult<Cursor> {
        let mut next = self.cursor;
        let target = self.page_info(page).unwrap_or_default();

        if page > next.active_page {
            let current = self.page_info(next.active_page).unwrap_or_default();
            next.element_idx += current.nb_elements as i16;
            if next.element_idx >= next.content_nb_elements as i16 && next.content_nb_elements > 0 {
                next.content_idx = self.non_empty_content(next.content_idx + 1, 1);
                next.element_idx = 0;
            }
        }
        if page < next.active_page {
            next.element_idx -= target.nb_elements as i16;
            if next.element_idx < 0 {
                next.content_idx = self.non_empty_content(next.content_idx - 1, -1);
                next.element_idx = -(target.nb_elements as i16);
            }
        }

        let content = self.content_at(next.content_idx).ok_or_else(|| {
            warn!(" No content at index {}", next.content_idx);
            NbglError::MalformedDescriptor("missing content")
        })?;
        if next.content_idx != self.cursor.content_idx || next.content_nb_elements == 0 {
            next.content_nb_elements = content.nb_elements();
            if next.element_idx < 0 {
                next.element_idx += next.content_nb_elements as i16;
            }
        }

        if next.element_idx < 0 || next.element_idx >= next.content_nb_elements as i16 {
            warn!(
                " Invalid element index {} / {}",
                next.element_idx, next.content_nb_elements
            );
            return Err(NbglError::ElementOutOfRange {
                index: next.element_idx as i32,
                count: next.content_nb_elements,
            });
        }
        next.active_page = page;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BarsList, InfoButton, InfosList, Pairs, TagValueConfirm};
    use crate::frontend::MockFrontend;
    use crate::layout::TagValue;
    use crate::types::NO_TUNE;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    fn short_pairs(n: usize) -> Vec<TagValue> {
        (0..n).map(|i| TagValue::new(format!("Tag {}", i), "10 ETH")).collect()
    }

    fn page_counts<const N: usize>(paginator: &Paginator<N>) -> Vec<u8> {
        (0..paginator.nb_pages())
            .filter_map(|p| paginator.page_info(p))
            .map(|info| info.nb_elements)
            .collect()
    }

    fn button() -> Content {
        Content::InfoButton(InfoButton {
            icon: None,
            text: "Done".into(),
            button_text: "Approve".into(),
            button_token: 1,
            tune: NO_TUNE,
        })
    }

    #[test]
    fn test_page_info_nibbles() {
        let mut table: PageInfoTable<2> = PageInfoTable::new();
        table.push(PageInfo { nb_elements: 5, flag: false }).unwrap();
        table.push(PageInfo { nb_elements: 1, flag: true }).unwrap();
        table.push(PageInfo { nb_elements: 7, flag: false }).unwrap();
        assert_eq!(table.get(0), Some(PageInfo { nb_elements: 5, flag: false }));
        assert_eq!(table.get(1), Some(PageInfo { nb_elements: 1, flag: true }));
        assert_eq!(table.get(2), Some(PageInfo { nb_elements: 7, flag: false }));
        assert_eq!(table.get(3), None);

        table.push(PageInfo::default()).unwrap();
        assert_eq!(
            table.push(PageInfo::default()),
            Err(NbglError::PageTableFull { max: 4 }),
            "Two bytes hold four pages"
        );
    }

    #[test]
    fn test_short_pairs_fill_pages() {
        let metrics = MockFrontend::new();
        let list = TagValueListContent::new(short_pairs(12));
        // each pair is 32 + 4 + 40 high, after a 24 margin
        let info = nb_tag_values_in_page(&metrics, &Profile::STAX, &list, 0, TagValueFit::default());
        assert_eq!(info, PageInfo { nb_elements: 5, flag: false });
    }

    #[test]
    fn test_pagination_conserves_elements() {
        let metrics = MockFrontend::new();
        let mut paginator = AppPaginator::new(vec![
            Content::TagValueList(TagValueListContent::new(short_pairs(12))),
            button(),
        ]);
        let nb_pages = paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap();
        assert_eq!(page_counts(&paginator), vec![5, 5, 2, 1]);
        assert_eq!(nb_pages, 4);
        let total: u32 = page_counts(&paginator).iter().map(|&n| n as u32).sum();
        assert_eq!(total, 13, "Every element lands on exactly one page");
    }

    #[test]
    fn test_pagination_is_deterministic() {
        let metrics = MockFrontend::new();
        let mut paginator = AppPaginator::new(vec![Content::TagValueList(TagValueListContent::new(short_pairs(9)))]);
        paginator.compute_pages(&metrics, &Profile::FLEX, true).unwrap();
        let first = page_counts(&paginator);
        paginator.compute_pages(&metrics, &Profile::FLEX, true).unwrap();
        assert_eq!(first, page_counts(&paginator));
    }

    #[test]
    fn test_forced_page_start() {
        let metrics = MockFrontend::new();
        let mut pairs = short_pairs(4);
        pairs[2].force_page_start = true;
        let mut paginator = AppPaginator::new(vec![Content::TagValueList(TagValueListContent::new(pairs))]);
        paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap();
        assert_eq!(page_counts(&paginator), vec![2, 2]);
    }

    #[test]
    fn test_too_long_pair_is_isolated() {
        let metrics = MockFrontend::new();
        let long: String = core::iter::repeat('x').take(35 * 11).collect();
        let pairs = vec![TagValue::new("a", "1"), TagValue::new("Data", long), TagValue::new("b", "2")];
        let mut paginator = AppPaginator::new(vec![Content::TagValueList(TagValueListContent::new(pairs))]);
        paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap();
        assert_eq!(page_counts(&paginator), vec![1, 1, 1]);
        assert!(!paginator.page_info(0).unwrap().flag);
        assert!(paginator.page_info(1).unwrap().flag, "The long pair needs a specific display");
        assert!(!paginator.page_info(2).unwrap().flag);
    }

    #[test]
    fn test_centered_info_pair() {
        let metrics = MockFrontend::new();
        let mut pairs = short_pairs(3);
        pairs[1].centered_info = true;
        let list = TagValueListContent::new(pairs);
        let first = nb_tag_values_in_page(&metrics, &Profile::STAX, &list, 0, TagValueFit::default());
        let second = nb_tag_values_in_page(&metrics, &Profile::STAX, &list, 1, TagValueFit::default());
        assert_eq!(first.nb_elements, 1);
        assert_eq!(second, PageInfo { nb_elements: 1, flag: true });
    }

    #[test]
    fn test_confirmation_button_takes_room() {
        let metrics = MockFrontend::new();
        let confirm = Content::TagValueConfirm(TagValueConfirm::new(
            TagValueListContent::new(short_pairs(5)),
            "Confirm",
            2,
        ));
        let mut paginator = AppPaginator::new(vec![confirm]);
        paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap();
        assert_eq!(page_counts(&paginator), vec![4, 1]);
    }

    #[test]
    fn test_skippable_header_takes_room() {
        let metrics = MockFrontend::new();
        let list = TagValueListContent::new(short_pairs(6));
        let fit = TagValueFit {
            skippable: true,
            ..Default::default()
        };
        let info = nb_tag_values_in_page(&metrics, &Profile::STAX, &list, 0, fit);
        assert_eq!(info.nb_elements, 4);
    }

    #[test]
    fn test_infos_capped_per_page() {
        let metrics = MockFrontend::new();
        let infos = InfosList::new((0..5).map(|i| (format!("Type {}", i), "value")));
        let mut paginator = AppPaginator::new(vec![Content::InfosList(infos)]);
        paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap();
        assert_eq!(page_counts(&paginator), vec![3, 2]);
    }

    #[test]
    fn test_bars_leave_room_for_navigation() {
        let metrics = MockFrontend::new();
        let bars = BarsList {
            texts: (0..5).map(|i| format!("Bar {}", i)).collect(),
            tokens: vec![1, 2, 3, 4, 5],
            tune: NO_TUNE,
        };
        // five 88 high bars stay above the navigation area
        let counts = nb_elements_in_page(&metrics, &Profile::STAX, &Content::BarsList(bars), 0, true, false, false);
        assert_eq!(counts.nb_elements, 5);
        assert!(5 * 88 < Profile::STAX.infos_area_height() - Profile::STAX.simple_footer_height);
    }

    #[test]
    fn test_walk_forward_and_back() {
        let metrics = MockFrontend::new();
        let mut paginator = AppPaginator::new(vec![Content::TagValueList(TagValueListContent::new(short_pairs(7)))])
            .with_starting_content(button())
            .with_finishing_content(button());
        assert_eq!(paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap(), 4);
        assert_eq!(paginator.current_content_idx(), -1, "The starting content comes first");

        paginator.goto_page(2).unwrap();
        assert_eq!(paginator.current_content_idx(), 0);
        assert_eq!(paginator.current_element_idx(), 5);

        paginator.goto_page(3).unwrap();
        assert_eq!(paginator.current_content_idx(), 1, "The finishing content sits after the list");
        assert!(paginator.is_last_content());

        paginator.goto_page(2).unwrap();
        assert_eq!(paginator.current_content_idx(), 0);
        assert_eq!(paginator.current_element_idx(), 5);

        paginator.goto_page(1).unwrap();
        assert_eq!(paginator.current_element_idx(), 0);
    }

    #[test]
    fn test_backward_jump_rejected() {
        let metrics = MockFrontend::new();
        let mut paginator = AppPaginator::new(vec![Content::TagValueList(TagValueListContent::new(short_pairs(12)))]);
        paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap();
        paginator.goto_page(2).unwrap();
        assert_eq!(
            paginator.goto_page(0),
            Err(NbglError::InvalidNavigation { from: 2, to: 0 })
        );
        assert_eq!(paginator.active_page(), 2, "A rejected move leaves the page unchanged");
        assert_eq!(paginator.current_element_idx(), 10);
    }

    #[test]
    fn test_small_case_values_fitted_in_regular_weight() {
        assert_eq!(value_font(true), FontId::SmallRegular);
        assert_eq!(value_font(false), FontId::LargeMedium);
    }

    #[test]
    fn test_empty_content_is_stepped_over() {
        let metrics = MockFrontend::new();
        let bars = |n: u8| {
            Content::BarsList(BarsList {
                texts: (0..n).map(|i| format!("Bar {}", i)).collect(),
                tokens: (0..n).collect(),
                tune: NO_TUNE,
            })
        };
        let mut paginator = AppPaginator::new(vec![bars(0), bars(2), bars(0), bars(2), bars(0)]);
        assert_eq!(paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap(), 2);
        assert_eq!(paginator.current_content_idx(), 1, "Leading empty content skipped");

        paginator.goto_page(1).unwrap();
        assert_eq!(paginator.current_content_idx(), 3);
        assert_eq!(paginator.current_element_idx(), 0);
        assert!(paginator.is_last_content(), "Only empty contents follow");

        paginator.goto_page(0).unwrap();
        assert_eq!(paginator.current_content_idx(), 1);
        assert_eq!(paginator.current_element_idx(), 0);
    }

    #[test]
    fn test_longest_list_is_conserved() {
        let metrics = MockFrontend::new();
        let n = crate::content::MAX_LIST_ELEMENTS;
        let mut paginator = AppPaginator::new(vec![Content::TagValueList(TagValueListContent::new(short_pairs(n)))]);
        let nb_pages = paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap();
        assert_eq!(page_counts(&paginator).len(), nb_pages as usize);
        let total: usize = page_counts(&paginator).iter().map(|&count| count as usize).sum();
        assert_eq!(total, n);
    }

    #[test]
    fn test_oversized_list_rejected() {
        let metrics = MockFrontend::new();
        let mut paginator = AppPaginator::new(vec![Content::TagValueList(TagValueListContent::new(short_pairs(300)))]);
        assert_eq!(
            paginator.compute_pages(&metrics, &Profile::STAX, false),
            Err(NbglError::MalformedDescriptor("too many elements in one content")),
            "Pairs past the 255th are never silently dropped"
        );
    }

    #[test]
    fn test_out_of_range_page_rejected() {
        let metrics = MockFrontend::new();
        let mut paginator = AppPaginator::new(vec![button()]);
        paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap();
        assert!(matches!(
            paginator.goto_page(1),
            Err(NbglError::InvalidNavigation { from: 0, to: 1 })
        ));
    }

    #[test]
    fn test_callback_contents() {
        let metrics = MockFrontend::new();
        let pairs = Pairs::Callback {
            nb_pairs: 10,
            getter: alloc::rc::Rc::new(|i| TagValue::new(format!("Tag {}", i), "1")),
        };
        let mut paginator = AppPaginator::new(vec![Content::TagValueList(TagValueListContent::new(pairs))]);
        paginator.compute_pages(&metrics, &Profile::STAX, false).unwrap();
        assert_eq!(page_counts(&paginator), vec![5, 5]);
    }

    #[test]
    fn test_detail_pages() {
        let metrics = MockFrontend::new();
        let value: String = core::iter::repeat('a').take(35 * 30).collect();
        let pages = detail_pages(&metrics, &Profile::STAX, &value, true);
        assert_eq!(pages.len(), 3, "30 lines of 35 chars, 12 lines per page");
        assert_eq!(pages[0].len(), 12 * 35);
        assert_eq!(pages[2].len(), 6 * 35);
        assert_eq!(detail_pages(&metrics, &Profile::STAX, "short", true), ["short"]);
    }
}
