// src/layout/mod.rs
//! Layout builder.
//!
//! A [`Layout`] composes one screen out of an optional header, the main
//! container (filled from top to bottom by the `add_*` widgets), an optional
//! up-footer and an optional footer. Touchable parts are registered as
//! callback objects carrying the caller's token; [`Layout::on_touch`] turns
//! the touch events hitting them back into [`LayoutEvent`]s.

pub mod bars;
pub mod keyboard;
pub mod keypad;
pub mod navigation;
pub mod widgets;

use log::{debug, info, warn};

use crate::config::SPINNER_REFRESH_PERIOD;
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::gui::{Gui, Ticker};
use crate::obj::{KeyboardKey, KeypadKey, NB_MAX_CONTAINER_CHILDREN, Obj, ObjHandle, ObjKind, SPINNER_FIXED};
use crate::touch::TouchEvent;
use crate::types::{
    Align, Color, Direction, FontId, INVALID_TOKEN, LIGHT_TEXT_COLOR, NO_TUNE, PostRefresh, RefreshMode, State,
    TouchId, TouchType, TuneId,
};

pub use bars::{ButtonStyle, ChoiceStyle, FooterDesc, FooterKind, HeaderDesc, HeaderKind, UpFooterDesc};
pub use keyboard::{KeyboardDesc, next_suggestion_window};
pub use navigation::{NavButtons, NavigationBar};
pub use widgets::{
    CenteredInfo, CenteredInfoStyle, ContentCenter, LayoutButton, ListItem, ProgressBarDesc, QrCodeDesc,
    QrCodeSize, RadioChoice, SpinnerUpdate, Switch, TagValue, TagValueList,
};

/// Max callback objects of one layout
pub const LAYOUT_OBJ_POOL_LEN: usize = 16;

/// Vertical space between the tap-to-continue text and the screen bottom
const TAP_TO_CONTINUE_MARGIN: i16 = 24;

/// What swipes on the main container mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeUsage {
    /// Reported as is, the index carrying the swipe type
    Custom,
    /// Drive the navigation bar of the footer
    Navigation,
    /// Scroll the keyboard suggestion buttons
    Suggestions,
}

/// How a touch on a callback object is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Plain,
    Switch { switch: ObjHandle },
    Radio { radio: ObjHandle, text: ObjHandle },
    LongPress { bar: ObjHandle, line: ObjHandle },
    Keyboard,
    Keypad,
}

/// A touchable object and the token reported when it is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutObj {
    pub obj: ObjHandle,
    pub token: u8,
    pub index: u8,
    pub tune: TuneId,
    pub(crate) role: Role,
}

/// Result of a touch on a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    Action { token: u8, index: u8, tune: TuneId },
    Key(KeyboardKey),
    Keypad(KeypadKey),
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutDescription<'a> {
    /// Pushed on top of the current screens instead of replacing them
    pub modal: bool,
    /// Built by the UX task rather than by the application
    pub ux_owned: bool,
    /// Thin vertical line on the left edge
    pub with_left_border: bool,
    /// Makes the whole screen tappable, the text (if not empty) being shown
    /// at the bottom
    pub tap_action_text: Option<&'a str>,
    pub tap_action_token: u8,
    pub tap_tune: TuneId,
    pub ticker: Option<Ticker>,
}

impl Default for LayoutDescription<'_> {
    fn default() -> Self {
        Self {
            modal: false,
            ux_owned: false,
            with_left_border: false,
            tap_action_text: None,
            tap_action_token: INVALID_TOKEN,
            tap_tune: NO_TUNE,
            ticker: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SpinnerParts {
    spinner: ObjHandle,
    text: ObjHandle,
    sub_text: Option<ObjHandle>,
}

/// One screen under construction or displayed
#[derive(Debug)]
pub struct Layout {
    layer: u8,
    modal: bool,
    screen: ObjHandle,
    container: ObjHandle,
    header: Option<ObjHandle>,
    footer: Option<ObjHandle>,
    up_footer: Option<ObjHandle>,
    top_right: Option<ObjHandle>,
    left_border: Option<ObjHandle>,
    tap_text: Option<ObjHandle>,
    callbacks: heapless::Vec<LayoutObj, LAYOUT_OBJ_POOL_LEN>,
    nb_pages: u8,
    active_page: u8,
    swipe_usage: Option<SwipeUsage>,
    nb_touchable_controls: u8,
    nav: Option<NavButtons>,
    spinner: Option<SpinnerParts>,
    kbd: keyboard::KeyboardArea,
    pad: keypad::KeypadArea,
}

impl Layout {
    /// Set (or push, for a modal) a new screen and prepare its main container
    pub fn new<F: Frontend>(gui: &mut Gui<F>, desc: &LayoutDescription) -> NbglResult<Self> {
        let screen = if desc.modal {
            gui.screen_push(desc.ux_owned, desc.ticker)?
        } else {
            gui.screen_set(desc.ux_owned, desc.ticker)?
        };
        let profile = *gui.profile();
        let container = gui.pool_mut().alloc(
            screen.layer,
            Obj::new(ObjKind::container(Direction::Vertical))
                .with_size(profile.screen_width, profile.screen_height)
                .with_align(Align::TopLeft),
        )?;
        info!("Layout created on layer {} (modal: {})", screen.layer, desc.modal);

        let mut layout = Self {
            layer: screen.layer,
            modal: desc.modal,
            screen,
            container,
            header: None,
            footer: None,
            up_footer: None,
            top_right: None,
            left_border: None,
            tap_text: None,
            callbacks: heapless::Vec::new(),
            nb_pages: 0,
            active_page: 0,
            swipe_usage: None,
            nb_touchable_controls: 0,
            nav: None,
            spinner: None,
            kbd: Default::default(),
            pad: Default::default(),
        };

        if desc.with_left_border {
            let line = Obj::new(ObjKind::line(Direction::Vertical, Color::LightGray, 1))
                .with_size(1, profile.screen_height)
                .with_align(Align::MidLeft);
            layout.left_border = Some(gui.pool_mut().alloc(layout.layer, line)?);
        }

        if let Some(text) = desc.tap_action_text {
            layout.register(container, desc.tap_action_token, 0, desc.tap_tune, Role::Plain)?;
            let obj = gui.pool_mut().get_mut(container)?;
            obj.touch_mask = TouchType::Touched.mask();
            obj.touch_id = TouchId::WholeScreen;
            if !text.is_empty() {
                layout.add_up_footer(
                    gui,
                    &UpFooterDesc::Text {
                        text,
                        token: desc.tap_action_token,
                        tune: desc.tap_tune,
                    },
                )?;
            }
        }
        layout.sync_screen_children(gui)?;
        Ok(layout)
    }

    pub fn layer(&self) -> u8 {
        self.layer
    }

    pub fn is_modal(&self) -> bool {
        self.modal
    }

    /// Main container, parent of every widget added through `add_*`
    pub fn container(&self) -> ObjHandle {
        self.container
    }

    pub fn header(&self) -> Option<ObjHandle> {
        self.header
    }

    pub fn footer(&self) -> Option<ObjHandle> {
        self.footer
    }

    pub fn up_footer(&self) -> Option<ObjHandle> {
        self.up_footer
    }

    pub fn active_page(&self) -> u8 {
        self.active_page
    }

    pub fn nb_pages(&self) -> u8 {
        self.nb_pages
    }

    /// Height left to the main container
    pub fn container_height<F: Frontend>(&self, gui: &Gui<F>) -> NbglResult<u16> {
        Ok(gui.pool().get(self.container)?.area.height)
    }

    // ------------------------------------------------------------------------
    // Callback objects
    // ------------------------------------------------------------------------

    /// Register `obj` so that touching it reports `token`
    pub fn add_callback_obj(&mut self, obj: ObjHandle, token: u8, tune: TuneId) -> NbglResult<usize> {
        self.register(obj, token, 0, tune, Role::Plain)
    }

    pub fn callback_obj(&self, slot: usize) -> Option<&LayoutObj> {
        self.callbacks.get(slot)
    }

    pub fn nb_callback_objs(&self) -> usize {
        self.callbacks.len()
    }

    fn register(&mut self, obj: ObjHandle, token: u8, index: u8, tune: TuneId, role: Role) -> NbglResult<usize> {
        let entry = LayoutObj {
            obj,
            token,
            index,
            tune,
            role,
        };
        self.callbacks.push(entry).map_err(|_| {
            warn!("No more callback objects (max: {})", LAYOUT_OBJ_POOL_LEN);
            NbglError::CallbackPoolExhausted {
                max: LAYOUT_OBJ_POOL_LEN,
            }
        })?;
        Ok(self.callbacks.len() - 1)
    }

    /// Callback slot of `obj`, or of its parent
    fn find_callback<F: Frontend>(&self, gui: &Gui<F>, obj: ObjHandle) -> Option<usize> {
        let lookup = |handle: ObjHandle| self.callbacks.iter().position(|entry| entry.obj == handle);
        lookup(obj).or_else(|| {
            let parent = gui.pool().get(obj).ok()?.parent?;
            lookup(parent)
        })
    }

    // ------------------------------------------------------------------------
    // Tree helpers
    // ------------------------------------------------------------------------

    /// Append `obj` to the main container
    fn add_object<F: Frontend>(&mut self, gui: &mut Gui<F>, obj: Obj) -> NbglResult<ObjHandle> {
        gui.pool_mut().alloc_child(self.container, obj)
    }

    /// Last child of the main container
    fn last_object<F: Frontend>(&self, gui: &Gui<F>) -> NbglResult<Option<ObjHandle>> {
        Ok(gui
            .pool()
            .get(self.container)?
            .children()
            .and_then(|children| children.last().copied()))
    }

    fn nb_objects<F: Frontend>(&self, gui: &Gui<F>) -> NbglResult<usize> {
        Ok(gui.pool().get(self.container)?.children().map_or(0, |c| c.len()))
    }

    fn shrink_container<F: Frontend>(&self, gui: &mut Gui<F>, by: u16) -> NbglResult<()> {
        let area = &mut gui.pool_mut().get_mut(self.container)?.area;
        area.height = area.height.saturating_sub(by);
        Ok(())
    }

    /// Rebuild the screen's children: header, main container, footer,
    /// up-footer, then the overlays
    fn sync_screen_children<F: Frontend>(&self, gui: &mut Gui<F>) -> NbglResult<()> {
        let order = [
            self.header,
            Some(self.container),
            self.footer,
            self.up_footer,
            self.top_right,
            self.left_border,
        ];
        let screen = gui.pool_mut().get_mut(self.screen)?.container_mut()?;
        screen.children.clear();
        for handle in order.into_iter().flatten() {
            screen.children.push(handle).map_err(|_| NbglError::ContainerFull {
                max: NB_MAX_CONTAINER_CHILDREN,
            })?;
        }
        Ok(())
    }

    /// Light gray horizontal separator
    fn horizontal_line(width: u16) -> Obj {
        Obj::new(ObjKind::line(Direction::Horizontal, Color::LightGray, 1)).with_size(width, 4)
    }

    // ------------------------------------------------------------------------
    // Swipes and overlays
    // ------------------------------------------------------------------------

    /// Make the main container report the swipes of `swipe_mask`, optionally
    /// with a "tap to continue"-like text at the bottom
    pub fn add_swipe<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        swipe_mask: u16,
        text: Option<&str>,
        token: u8,
        tune: TuneId,
    ) -> NbglResult<()> {
        if let Some(text) = text {
            let profile = *gui.profile();
            let line_height = gui.frontend().line_height(FontId::SmallRegular);
            let tap_text = Obj::new(ObjKind::text(text, FontId::SmallRegular))
                .with_text_color(LIGHT_TEXT_COLOR)
                .with_text_align(Align::Center)
                .with_size(profile.available_width(), line_height)
                .with_align(Align::BottomMiddle)
                .with_margins(0, TAP_TO_CONTINUE_MARGIN);
            self.tap_text = Some(gui.pool_mut().alloc(self.layer, tap_text)?);
        }
        self.add_swipe_internal(gui, swipe_mask, SwipeUsage::Custom, token, tune)
    }

    fn add_swipe_internal<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        swipe_mask: u16,
        usage: SwipeUsage,
        token: u8,
        tune: TuneId,
    ) -> NbglResult<()> {
        if swipe_mask & crate::types::SWIPE_MASK == 0 {
            warn!("Swipe registration without any swipe");
            return Err(NbglError::MalformedDescriptor("empty swipe mask"));
        }
        self.register(self.container, token, 0, tune, Role::Plain)?;
        gui.pool_mut().get_mut(self.container)?.touch_mask = swipe_mask;
        self.swipe_usage = Some(usage);
        Ok(())
    }

    /// Round icon button in the top right corner
    pub fn add_top_right_button<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        icon: crate::icons::Icon,
        token: u8,
        tune: TuneId,
    ) -> NbglResult<()> {
        let profile = *gui.profile();
        let mut kind = ObjKind::button(None, Some(icon), Color::White);
        if let ObjKind::Button(button) = &mut kind {
            button.border_color = Color::LightGray;
            button.foreground = Color::Black;
            button.radius = profile.button_diameter / 2;
        }
        let margin = profile.border_margin as i16;
        let obj = Obj::new(kind)
            .with_size(profile.button_diameter, profile.button_diameter)
            .with_align(Align::TopRight)
            .with_margins(margin, margin)
            .with_touch(TouchType::Touched.mask(), TouchId::TopRightButton);
        let button = gui.pool_mut().alloc(self.layer, obj)?;
        self.register(button, token, 0, tune, Role::Plain)?;
        self.top_right = Some(button);
        self.sync_screen_children(gui)
    }

    // ------------------------------------------------------------------------
    // Spinner
    // ------------------------------------------------------------------------

    /// Busy indicator with a text and an optional sub-text, animated by the
    /// screen ticker unless `position` is [`SPINNER_FIXED`]
    pub fn add_spinner<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        text: &str,
        sub_text: Option<&str>,
        position: u8,
    ) -> NbglResult<()> {
        const SPINNER_TEXT_MARGIN: i16 = 20;
        const SPINNER_INTER_TEXTS_MARGIN: i16 = 20;

        let profile = *gui.profile();
        let width = profile.available_width();
        let layer = self.layer;
        let container = gui.pool_mut().alloc(
            layer,
            Obj::new(ObjKind::container(Direction::Vertical))
                .with_size(width, 0)
                .with_align(Align::Center),
        )?;
        let spinner = gui.pool_mut().alloc_child(
            container,
            Obj::new(ObjKind::Spinner { position }).with_align(Align::TopMiddle),
        )?;
        let mut height = crate::obj::draw::SPINNER_HEIGHT;

        let font = if sub_text.is_some() { FontId::LargeMedium } else { FontId::SmallRegular };
        let text_height = gui.frontend().text_height_in_width(font, text, width, true);
        let text_obj = Obj::new(ObjKind::text(text, font))
            .with_text_align(Align::Center)
            .with_size(width, text_height)
            .with_align_to(spinner, Align::BottomMiddle)
            .with_margins(0, SPINNER_TEXT_MARGIN);
        let text_handle = gui.pool_mut().alloc_child(container, text_obj)?;
        height += SPINNER_TEXT_MARGIN as u16 + text_height;

        let sub_handle = match sub_text {
            Some(sub_text) => {
                let sub_height = gui
                    .frontend()
                    .text_height_in_width(FontId::SmallRegular, sub_text, width, true);
                let sub_obj = Obj::new(ObjKind::text(sub_text, FontId::SmallRegular))
                    .with_text_align(Align::Center)
                    .with_size(width, sub_height)
                    .with_align_to(text_handle, Align::BottomMiddle)
                    .with_margins(0, SPINNER_INTER_TEXTS_MARGIN);
                height += SPINNER_INTER_TEXTS_MARGIN as u16 + sub_height;
                Some(gui.pool_mut().alloc_child(container, sub_obj)?)
            }
            None => None,
        };
        gui.pool_mut().get_mut(container)?.area.height = height;
        gui.pool_mut().add_child(self.container, container)?;

        self.spinner = Some(SpinnerParts {
            spinner,
            text: text_handle,
            sub_text: sub_handle,
        });
        if position != SPINNER_FIXED {
            gui.set_ticker(self.layer, Some(Ticker::new(SPINNER_REFRESH_PERIOD)));
        }
        Ok(())
    }

    /// Redraw what changed in the spinner
    pub fn update_spinner<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        text: &str,
        sub_text: Option<&str>,
        position: u8,
    ) -> NbglResult<SpinnerUpdate> {
        let parts = self
            .spinner
            .ok_or(NbglError::MalformedDescriptor("layout has no spinner"))?;
        let mut update = SpinnerUpdate::Unchanged;

        let current = gui.pool_mut().get_mut(parts.spinner)?.spinner_mut()?;
        if *current != position {
            *current = position;
            gui.draw(parts.spinner)?;
            update = SpinnerUpdate::Position;
        }

        let texts = [(Some(parts.text), Some(text)), (parts.sub_text, sub_text)];
        for (handle, new_text) in texts {
            let (Some(handle), Some(new_text)) = (handle, new_text) else {
                continue;
            };
            let data = gui.pool_mut().get_mut(handle)?.text_area_mut()?;
            if data.text != new_text {
                data.text.clear();
                data.text.push_str(new_text);
                gui.draw(handle)?;
                update = SpinnerUpdate::Text;
            }
        }
        Ok(update)
    }

    /// Advance the spinner of this layout by one step, on a ticker event
    pub fn on_tick<F: Frontend>(&mut self, gui: &mut Gui<F>) -> NbglResult<()> {
        let Some(parts) = self.spinner else {
            return Ok(());
        };
        let position = gui.pool_mut().get_mut(parts.spinner)?.spinner_mut()?;
        if *position == SPINNER_FIXED {
            return Ok(());
        }
        *position = (*position + 1) % 4;
        gui.draw(parts.spinner)?;
        gui.refresh_special(RefreshMode::BlackAndWhiteFastRefresh);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Draw and release
    // ------------------------------------------------------------------------

    /// Draw the whole screen; the caller refreshes
    pub fn draw<F: Frontend>(&mut self, gui: &mut Gui<F>) -> NbglResult<()> {
        if let Some(tap_text) = self.tap_text.take() {
            gui.pool_mut().add_child(self.container, tap_text)?;
        }
        debug!(" Drawing layout of layer {}", self.layer);
        gui.draw(self.screen)
    }

    /// Give the screen back; only modal layouts pop their layer
    pub fn release<F: Frontend>(self, gui: &mut Gui<F>) -> NbglResult<()> {
        if self.modal {
            gui.screen_pop(self.layer)?;
        }
        debug!(" Layout of layer {} released", self.layer);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Touch dispatch
    // ------------------------------------------------------------------------

    /// Interpret a touch event of the top screen
    pub fn on_touch<F: Frontend>(&mut self, gui: &mut Gui<F>, event: &TouchEvent) -> NbglResult<Option<LayoutEvent>> {
        if event.obj.layer != self.layer {
            return Ok(None);
        }
        let Some(slot) = self.find_callback(gui, event.obj) else {
            warn!("Touch {:?} on an object without callback", event.kind);
            return Ok(None);
        };
        let kind = event.kind;
        debug!(" Layout touch {:?} on slot {}", kind, slot);

        if kind.is_swipe() && gui.pool().get(event.obj)?.is_container() {
            match self.swipe_usage {
                Some(SwipeUsage::Suggestions) => {
                    self.on_suggestions_swipe(gui, kind)?;
                    return Ok(None);
                }
                Some(SwipeUsage::Custom) => self.callbacks[slot].index = kind as u8,
                Some(SwipeUsage::Navigation) if event.obj == self.container => {
                    let Some(nav) = self.nav else {
                        return Ok(None);
                    };
                    if !navigation::navigate(gui.pool_mut(), &nav, None, kind, self.nb_pages, &mut self.active_page)? {
                        return Ok(None);
                    }
                    self.callbacks[slot].index = self.active_page;
                }
                _ => {}
            }
        }

        if let Some(nav) = self.nav
            && [nav.exit, nav.previous, Some(nav.next)].contains(&Some(event.obj))
        {
            let touched = Some(event.obj);
            if !navigation::navigate(gui.pool_mut(), &nav, touched, kind, self.nb_pages, &mut self.active_page)? {
                return Ok(None);
            }
            self.callbacks[slot].index = self.active_page;
            // keys changed color
            gui.draw(nav.container)?;
        }

        let mut need_refresh = false;
        match self.callbacks[slot].role {
            Role::Switch { switch } => {
                let data = gui.pool_mut().get_mut(switch)?.switch_mut()?;
                data.state = if data.state == State::On { State::Off } else { State::On };
                let state = data.state;
                gui.draw(switch)?;
                need_refresh = true;
                self.callbacks[slot].index = (state == State::On) as u8;
            }
            Role::Radio { .. } => return self.on_radio_touched(gui, slot, kind),
            Role::LongPress { bar, line } => return self.on_long_press(gui, slot, bar, line, event),
            Role::Keyboard => return self.on_keyboard_touched(gui, slot, event),
            Role::Keypad => return self.on_keypad_touched(gui, slot, event),
            Role::Plain => {}
        }

        let entry = self.callbacks[slot];
        if entry.token == INVALID_TOKEN {
            return Ok(None);
        }
        if need_refresh {
            gui.refresh_special(RefreshMode::FullColorPartialRefresh);
        }
        Ok(Some(LayoutEvent::Action {
            token: entry.token,
            index: entry.index,
            tune: entry.tune,
        }))
    }

    /// Select the touched radio choice and deselect the previous one
    fn on_radio_touched<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        slot: usize,
        kind: TouchType,
    ) -> NbglResult<Option<LayoutEvent>> {
        if kind != TouchType::Touched {
            return Ok(None);
        }
        for (i, entry) in self.callbacks.clone().iter().enumerate() {
            let Role::Radio { radio, text } = entry.role else {
                continue;
            };
            let selected = i == slot;
            let was_on = gui.pool_mut().get_mut(radio)?.radio_mut()?.state == State::On;
            if !selected && !was_on {
                continue;
            }
            let (state, color, font) = if selected {
                (State::On, Color::Black, FontId::SmallBold)
            } else {
                (State::Off, LIGHT_TEXT_COLOR, FontId::SmallRegular)
            };
            gui.pool_mut().get_mut(radio)?.radio_mut()?.state = state;
            let data = gui.pool_mut().get_mut(text)?.text_area_mut()?;
            data.color = color;
            data.font = font;
            gui.draw(entry.obj)?;
        }
        gui.refresh_special(RefreshMode::FullColorPartialRefresh);
        let entry = self.callbacks[slot];
        Ok(Some(LayoutEvent::Action {
            token: entry.token,
            index: entry.index,
            tune: entry.tune,
        }))
    }

    /// Hold-to-approve: fill the bar while the finger stays down, report once
    /// when it is full, empty it when the finger leaves
    fn on_long_press<F: Frontend>(
        &mut self,
        gui: &mut Gui<F>,
        slot: usize,
        bar: ObjHandle,
        line: ObjHandle,
        event: &TouchEvent,
    ) -> NbglResult<Option<LayoutEvent>> {
        match event.kind {
            TouchType::Touching => {
                let percent = gui.profile().hold_to_approve_percent(event.duration_ms);
                let data = gui.pool_mut().get_mut(bar)?.progress_bar_mut()?;
                let previous = data.state;
                if percent != previous {
                    data.partial_redraw = true;
                    data.state = percent;
                    gui.draw(bar)?;
                    gui.refresh_special_with_post_refresh(
                        RefreshMode::BlackAndWhiteFastRefresh,
                        PostRefresh::ForcePowerOn,
                    );
                }
                if percent >= 100 && previous < 100 {
                    let entry = self.callbacks[slot];
                    info!("Long press completed");
                    return Ok(Some(LayoutEvent::Action {
                        token: entry.token,
                        index: entry.index,
                        tune: entry.tune,
                    }));
                }
            }
            TouchType::TouchReleased | TouchType::OutOfTouch | TouchType::SwipedLeft | TouchType::SwipedRight => {
                let data = gui.pool_mut().get_mut(bar)?.progress_bar_mut()?;
                data.partial_redraw = true;
                data.state = 0;
                gui.draw(bar)?;
                gui.draw(line)?;
                gui.refresh_special_with_post_refresh(RefreshMode::BlackAndWhiteRefresh, PostRefresh::ForcePowerOff);
            }
            _ => {}
        }
        Ok(None)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::Profile;
    use crate::frontend::MockFrontend;
    use crate::touch::TouchPoint;

    pub(crate) fn gui() -> Gui<MockFrontend> {
        Gui::new(MockFrontend::new(), Profile::STAX)
    }

    pub(crate) fn touch(obj: ObjHandle, kind: TouchType) -> TouchEvent {
        TouchEvent {
            obj,
            kind,
            first: TouchPoint::new(0, 0),
            last: TouchPoint::new(0, 0),
            duration_ms: 0,
        }
    }

    #[test]
    fn test_callback_pool_refuses_extra_registration() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        let container = layout.container();
        for i in 0..LAYOUT_OBJ_POOL_LEN {
            assert_eq!(layout.add_callback_obj(container, i as u8, NO_TUNE), Ok(i));
        }
        assert_eq!(
            layout.add_callback_obj(container, 99, NO_TUNE),
            Err(NbglError::CallbackPoolExhausted {
                max: LAYOUT_OBJ_POOL_LEN
            }),
            "Registration past the capacity must fail"
        );
        for i in 0..LAYOUT_OBJ_POOL_LEN {
            let entry = layout.callback_obj(i).unwrap();
            assert_eq!((entry.obj, entry.token), (container, i as u8), "Earlier entries untouched");
        }
    }

    #[test]
    fn test_tap_to_continue_reports_token() {
        let mut gui = gui();
        let desc = LayoutDescription {
            tap_action_text: Some("Tap to continue"),
            tap_action_token: 7,
            ..Default::default()
        };
        let mut layout = Layout::new(&mut gui, &desc).unwrap();
        assert!(layout.up_footer().is_some(), "Tap text lives in the up-footer");
        layout.draw(&mut gui).unwrap();
        assert!(gui.frontend().has_text("Tap to continue"));

        let event = layout
            .on_touch(&mut gui, &touch(layout.container(), TouchType::Touched))
            .unwrap();
        assert_eq!(
            event,
            Some(LayoutEvent::Action {
                token: 7,
                index: 0,
                tune: NO_TUNE
            })
        );
    }

    #[test]
    fn test_custom_swipe_reports_direction() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        let mask = TouchType::SwipedLeft.mask() | TouchType::SwipedRight.mask();
        layout.add_swipe(&mut gui, mask, Some("Swipe"), 3, NO_TUNE).unwrap();
        layout.draw(&mut gui).unwrap();
        let event = layout
            .on_touch(&mut gui, &touch(layout.container(), TouchType::SwipedLeft))
            .unwrap();
        assert_eq!(
            event,
            Some(LayoutEvent::Action {
                token: 3,
                index: TouchType::SwipedLeft as u8,
                tune: NO_TUNE
            })
        );
        assert_eq!(
            layout.add_swipe(&mut gui, TouchType::Touched.mask(), None, 3, NO_TUNE),
            Err(NbglError::MalformedDescriptor("empty swipe mask"))
        );
    }

    #[test]
    fn test_modal_release_pops_layer() {
        let mut gui = gui();
        Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        let modal = Layout::new(
            &mut gui,
            &LayoutDescription {
                modal: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(modal.layer(), 1);
        assert_eq!(gui.nb_screens(), 2);
        modal.release(&mut gui).unwrap();
        assert_eq!(gui.nb_screens(), 1, "Modal layer popped");
    }

    #[test]
    fn test_spinner_ticks_and_updates() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        layout.add_spinner(&mut gui, "Processing", None, 0).unwrap();
        layout.draw(&mut gui).unwrap();
        assert_eq!(gui.tick(SPINNER_REFRESH_PERIOD), Some(0), "Spinner armed the ticker");

        layout.on_tick(&mut gui).unwrap();
        assert_eq!(
            layout.update_spinner(&mut gui, "Processing", None, 1).unwrap(),
            SpinnerUpdate::Unchanged,
            "Tick already moved to position 1"
        );
        assert_eq!(
            layout.update_spinner(&mut gui, "Processing", None, 2).unwrap(),
            SpinnerUpdate::Position
        );
        assert_eq!(
            layout.update_spinner(&mut gui, "Done", None, 2).unwrap(),
            SpinnerUpdate::Text
        );
        assert!(gui.frontend().has_text("Done"));
    }

    #[test]
    fn test_touch_on_other_layer_ignored() {
        let mut gui = gui();
        let mut layout = Layout::new(&mut gui, &LayoutDescription::default()).unwrap();
        let foreign = ObjHandle { layer: 2, index: 0 };
        assert_eq!(layout.on_touch(&mut gui, &touch(foreign, TouchType::Touched)), Ok(None));
    }
}
