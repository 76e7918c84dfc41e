// src/obj/mod.rs
//! Retained object tree.
//!
//! Objects live in per-layer arenas (see [`pool`]) and refer to each other
//! through [`ObjHandle`]s. Containers own their children through an ordered
//! handle list. The `parent` and `align_to` fields are plain handles that the
//! draw pass re-establishes on every traversal, they are not a source of truth
//! between draws.

pub mod align;
pub mod draw;
pub mod keyboard;
pub mod keypad;
pub mod pool;
pub mod text;

use alloc::string::String;

use crate::error::{NbglError, NbglResult};
use crate::icons::Icon;
use crate::types::{Align, Area, Color, Direction, FontId, State, TouchId, Transformation};

pub use keyboard::{KeyboardCase, KeyboardData, KeyboardKey, KeyboardMode};
pub use keypad::{KeypadData, KeypadKey};
pub use pool::{ObjPool, MAX_LAYERS, OBJ_POOL_LEN};

/// Max number of children of one container
pub const NB_MAX_CONTAINER_CHILDREN: usize = 20;

/// Page count above which a page indicator switches from dashes to text
pub const NB_MAX_PAGES_WITH_DASHES: u8 = 6;

/// Handle to an object in a layer arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjHandle {
    pub layer: u8,
    pub index: u16,
}

pub type Children = heapless::Vec<ObjHandle, NB_MAX_CONTAINER_CHILDREN>;

// ----------------------------------------------------------------------------
// Per-type payloads
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ContainerData {
    pub direction: Direction,
    pub children: Children,
    /// Paint the background when drawn
    pub force_clean: bool,
}

#[derive(Debug, Clone)]
pub struct LineData {
    pub direction: Direction,
    pub color: Color,
    pub thickness: u8,
    /// Offset of the stroke inside the 4 px high area of horizontal lines
    pub offset: u8,
}

#[derive(Debug, Clone)]
pub struct ImageData {
    pub icon: Option<Icon>,
    pub foreground: Color,
    pub transformation: Transformation,
}

#[derive(Debug, Clone)]
pub struct ButtonData {
    pub inner_color: Color,
    pub border_color: Color,
    pub foreground: Color,
    pub radius: u16,
    pub font: FontId,
    pub text: Option<String>,
    pub icon: Option<Icon>,
}

#[derive(Debug, Clone)]
pub struct TextAreaData {
    pub text: String,
    pub color: Color,
    /// `MidLeft`, `Center` or `MidRight`
    pub text_align: Align,
    pub font: FontId,
    pub wrapping: bool,
    /// Single line, head replaced by "..." when too long
    pub auto_hide_long_line: bool,
    /// When non zero, tail of the last allowed line replaced by "..."
    pub nb_max_lines: u8,
}

#[derive(Debug, Clone)]
pub struct SwitchData {
    pub on_color: Color,
    pub off_color: Color,
    pub state: State,
}

#[derive(Debug, Clone)]
pub struct RadioData {
    pub active_color: Color,
    pub border_color: Color,
    pub state: State,
}

/// Dash style of a page indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorStyle {
    /// Only the active dash is highlighted
    #[default]
    CurrentIndicator,
    /// Every dash up to the active one is highlighted
    ProgressiveIndicator,
}

#[derive(Debug, Clone, Default)]
pub struct PageIndicatorData {
    pub nb_pages: u8,
    pub active_page: u8,
    pub style: IndicatorStyle,
}

#[derive(Debug, Clone)]
pub struct ProgressBarData {
    /// Level in percent
    pub state: u8,
    pub previous_width: u16,
    /// Only redraw the delta since the previous draw
    pub partial_redraw: bool,
    pub with_border: bool,
    pub foreground: Color,
}

#[derive(Debug, Clone)]
pub struct QrCodeData {
    pub text: String,
    pub foreground: Color,
}

/// Spinner position meaning "all corners highlighted"
pub const SPINNER_FIXED: u8 = 0xFF;

/// Type-specific part of an object
#[derive(Debug, Clone)]
pub enum ObjKind {
    Screen(ContainerData),
    Container(ContainerData),
    Line(LineData),
    Image(ImageData),
    Button(ButtonData),
    TextArea(TextAreaData),
    Switch(SwitchData),
    Radio(RadioData),
    PageIndicator(PageIndicatorData),
    ProgressBar(ProgressBarData),
    Spinner { position: u8 },
    QrCode(QrCodeData),
    Keyboard(KeyboardData),
    Keypad(KeypadData),
}

impl ObjKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjKind::Screen(_) => "screen",
            ObjKind::Container(_) => "container",
            ObjKind::Line(_) => "line",
            ObjKind::Image(_) => "image",
            ObjKind::Button(_) => "button",
            ObjKind::TextArea(_) => "text area",
            ObjKind::Switch(_) => "switch",
            ObjKind::Radio(_) => "radio",
            ObjKind::PageIndicator(_) => "page indicator",
            ObjKind::ProgressBar(_) => "progress bar",
            ObjKind::Spinner { .. } => "spinner",
            ObjKind::QrCode(_) => "QR code",
            ObjKind::Keyboard(_) => "keyboard",
            ObjKind::Keypad(_) => "keypad",
        }
    }

    // ------------------------------------------------------------------------
    // Constructors with the usual defaults
    // ------------------------------------------------------------------------

    pub fn container(direction: Direction) -> Self {
        ObjKind::Container(ContainerData {
            direction,
            ..Default::default()
        })
    }

    pub fn text(text: impl Into<String>, font: FontId) -> Self {
        ObjKind::TextArea(TextAreaData {
            text: text.into(),
            color: Color::Black,
            text_align: Align::MidLeft,
            font,
            wrapping: true,
            auto_hide_long_line: false,
            nb_max_lines: 0,
        })
    }

    pub fn image(icon: Icon) -> Self {
        ObjKind::Image(ImageData {
            icon: Some(icon),
            foreground: Color::Black,
            transformation: Transformation::None,
        })
    }

    pub fn line(direction: Direction, color: Color, thickness: u8) -> Self {
        ObjKind::Line(LineData {
            direction,
            color,
            thickness,
            offset: 0,
        })
    }

    pub fn button(text: Option<String>, icon: Option<Icon>, inner_color: Color) -> Self {
        ObjKind::Button(ButtonData {
            inner_color,
            border_color: inner_color,
            foreground: inner_color.contrast(),
            radius: 0,
            font: FontId::SmallBold,
            text,
            icon,
        })
    }

    pub fn switch(state: State) -> Self {
        ObjKind::Switch(SwitchData {
            on_color: Color::Black,
            off_color: Color::LightGray,
            state,
        })
    }

    pub fn radio(state: State) -> Self {
        ObjKind::Radio(RadioData {
            active_color: Color::Black,
            border_color: Color::DarkGray,
            state,
        })
    }

    pub fn progress_bar(state: u8, with_border: bool) -> Self {
        ObjKind::ProgressBar(ProgressBarData {
            state,
            previous_width: 0,
            partial_redraw: false,
            with_border,
            foreground: Color::Black,
        })
    }
}

/// A node of the tree: common geometry plus a typed payload
#[derive(Debug, Clone)]
pub struct Obj {
    /// Absolute position, size, background and depth
    pub area: Area,
    pub rel_x0: i16,
    pub rel_y0: i16,
    pub align: Align,
    pub margin_x: i16,
    pub margin_y: i16,
    /// Sibling to align to, the parent when `None`
    pub align_to: Option<ObjHandle>,
    pub parent: Option<ObjHandle>,
    /// Bit set of [`TouchType::mask`](crate::types::TouchType::mask) values
    pub touch_mask: u16,
    pub touch_id: TouchId,
    pub kind: ObjKind,
}

impl Obj {
    pub fn new(kind: ObjKind) -> Self {
        Self {
            area: Area::default(),
            rel_x0: 0,
            rel_y0: 0,
            align: Align::NoAlignment,
            margin_x: 0,
            margin_y: 0,
            align_to: None,
            parent: None,
            touch_mask: 0,
            touch_id: TouchId::None,
            kind,
        }
    }

    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.area.width = width;
        self.area.height = height;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_margins(mut self, margin_x: i16, margin_y: i16) -> Self {
        self.margin_x = margin_x;
        self.margin_y = margin_y;
        self
    }

    pub fn with_align_to(mut self, align_to: ObjHandle, align: Align) -> Self {
        self.align_to = Some(align_to);
        self.align = align;
        self
    }

    pub fn with_touch(mut self, mask: u16, id: TouchId) -> Self {
        self.touch_mask = mask;
        self.touch_id = id;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.area.background = background;
        self
    }

    // ------------------------------------------------------------------------
    // Text area tweaks, no-ops on other kinds
    // ------------------------------------------------------------------------

    pub fn with_text_color(mut self, color: Color) -> Self {
        if let ObjKind::TextArea(text) = &mut self.kind {
            text.color = color;
        }
        self
    }

    pub fn with_text_align(mut self, text_align: Align) -> Self {
        if let ObjKind::TextArea(text) = &mut self.kind {
            text.text_align = text_align;
        }
        self
    }

    /// Cap the text to `nb_max_lines`, the last one ending with "..."
    pub fn with_max_lines(mut self, nb_max_lines: u8) -> Self {
        if let ObjKind::TextArea(text) = &mut self.kind {
            text.nb_max_lines = nb_max_lines;
        }
        self
    }

    /// Single line text whose head is replaced by "..." when too long
    pub fn with_auto_hide(mut self) -> Self {
        if let ObjKind::TextArea(text) = &mut self.kind {
            text.auto_hide_long_line = true;
            text.wrapping = false;
        }
        self
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, ObjKind::Screen(_) | ObjKind::Container(_))
    }

    pub fn children(&self) -> Option<&Children> {
        match &self.kind {
            ObjKind::Screen(c) | ObjKind::Container(c) => Some(&c.children),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Typed access
    // ------------------------------------------------------------------------

    pub fn container_mut(&mut self) -> NbglResult<&mut ContainerData> {
        match &mut self.kind {
            ObjKind::Screen(c) | ObjKind::Container(c) => Ok(c),
            _ => Err(NbglError::WrongObjectType { expected: "container" }),
        }
    }

    pub fn text_area_mut(&mut self) -> NbglResult<&mut TextAreaData> {
        match &mut self.kind {
            ObjKind::TextArea(t) => Ok(t),
            _ => Err(NbglError::WrongObjectType { expected: "text area" }),
        }
    }

    pub fn button_mut(&mut self) -> NbglResult<&mut ButtonData> {
        match &mut self.kind {
            ObjKind::Button(b) => Ok(b),
            _ => Err(NbglError::WrongObjectType { expected: "button" }),
        }
    }

    pub fn switch_mut(&mut self) -> NbglResult<&mut SwitchData> {
        match &mut self.kind {
            ObjKind::Switch(s) => Ok(s),
            _ => Err(NbglError::WrongObjectType { expected: "switch" }),
        }
    }

    pub fn radio_mut(&mut self) -> NbglResult<&mut RadioData> {
        match &mut self.kind {
            ObjKind::Radio(r) => Ok(r),
            _ => Err(NbglError::WrongObjectType { expected: "radio" }),
        }
    }

    pub fn spinner_mut(&mut self) -> NbglResult<&mut u8> {
        match &mut self.kind {
            ObjKind::Spinner { position } => Ok(position),
            _ => Err(NbglError::WrongObjectType { expected: "spinner" }),
        }
    }

    pub fn image_mut(&mut self) -> NbglResult<&mut ImageData> {
        match &mut self.kind {
            ObjKind::Image(i) => Ok(i),
            _ => Err(NbglError::WrongObjectType { expected: "image" }),
        }
    }

    pub fn page_indicator_mut(&mut self) -> NbglResult<&mut PageIndicatorData> {
        match &mut self.kind {
            ObjKind::PageIndicator(p) => Ok(p),
            _ => Err(NbglError::WrongObjectType { expected: "page indicator" }),
        }
    }

    pub fn progress_bar_mut(&mut self) -> NbglResult<&mut ProgressBarData> {
        match &mut self.kind {
            ObjKind::ProgressBar(p) => Ok(p),
            _ => Err(NbglError::WrongObjectType { expected: "progress bar" }),
        }
    }

    pub fn keyboard_mut(&mut self) -> NbglResult<&mut KeyboardData> {
        match &mut self.kind {
            ObjKind::Keyboard(k) => Ok(k),
            _ => Err(NbglError::WrongObjectType { expected: "keyboard" }),
        }
    }

    pub fn keypad_mut(&mut self) -> NbglResult<&mut KeypadData> {
        match &mut self.kind {
            ObjKind::Keypad(k) => Ok(k),
            _ => Err(NbglError::WrongObjectType { expected: "keypad" }),
        }
    }
}
