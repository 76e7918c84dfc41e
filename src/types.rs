// src/types.rs
//! Basic types shared by every layer of the engine

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use serde::{Deserialize, Serialize};

/// The four gray levels of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    Black,
    DarkGray,
    LightGray,
    #[default]
    White,
}

impl Color {
    pub fn to_rgb565(self) -> Rgb565 {
        match self {
            Color::Black => Rgb565::BLACK,
            Color::DarkGray => Rgb565::new(10, 20, 10),
            Color::LightGray => Rgb565::new(24, 48, 24),
            Color::White => Rgb565::WHITE,
        }
    }

    /// The color used for text drawn on top of this background
    pub fn contrast(self) -> Self {
        match self {
            Color::White | Color::LightGray => Color::Black,
            Color::Black | Color::DarkGray => Color::White,
        }
    }
}

/// Text colors used for secondary and inactive elements
pub const LIGHT_TEXT_COLOR: Color = Color::DarkGray;
pub const INACTIVE_COLOR: Color = Color::LightGray;

/// Bits per pixel of an area or icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Bpp {
    #[default]
    One,
    Two,
    Four,
}

/// A positioned rectangle with its background color and depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Area {
    pub x0: i16,
    pub y0: i16,
    pub width: u16,
    pub height: u16,
    pub background: Color,
    pub bpp: Bpp,
}

impl Area {
    pub const fn new(x0: i16, y0: i16, width: u16, height: u16) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
            background: Color::White,
            bpp: Bpp::One,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_bpp(mut self, bpp: Bpp) -> Self {
        self.bpp = bpp;
        self
    }

    /// Right edge, exclusive
    pub fn x1(&self) -> i32 {
        self.x0 as i32 + self.width as i32
    }

    /// Bottom edge, exclusive
    pub fn y1(&self) -> i32 {
        self.y0 as i32 + self.height as i32
    }

    pub fn contains(&self, x: i16, y: i16) -> bool {
        x >= self.x0 && (x as i32) < self.x1() && y >= self.y0 && (y as i32) < self.y1()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<Area> for Rectangle {
    fn from(area: Area) -> Self {
        Rectangle::new(
            Point::new(area.x0 as i32, area.y0 as i32),
            Size::new(area.width as u32, area.height as u32),
        )
    }
}

/// Refresh modes supported by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    FullColorPartialRefresh,
    FullColorRefresh,
    FullColorCleanRefresh,
    BlackAndWhiteRefresh,
    BlackAndWhiteFastRefresh,
}

/// What the panel does after a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostRefresh {
    ForcePowerOff,
    ForcePowerOn,
    KeepPowerState,
}

/// Placement of an object relative to its parent or to a sibling.
///
/// When the reference is the parent, the nine `Top*`/`Mid*`/`Center`/`Bottom*`
/// values place the object inside it. When the reference is a sibling (set
/// through `align_to`), the same values plus the `Left*`/`Right*` ones place
/// the object outside of that sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    NoAlignment,
    TopLeft,
    TopMiddle,
    TopRight,
    MidLeft,
    Center,
    MidRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
}

/// Flow direction of a container's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// Fonts known to the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontId {
    SmallRegular,
    SmallBold,
    LargeMedium,
}

/// Icon transformation applied while blitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transformation {
    #[default]
    None,
    HorizontalMirror,
    VerticalMirror,
}

/// On/off state of switches, radios and bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Off,
    On,
}

impl From<bool> for State {
    fn from(on: bool) -> Self {
        if on { State::On } else { State::Off }
    }
}

/// Kinds of touch events an object can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchType {
    Touched,
    LongTouched,
    Touching,
    OutOfTouch,
    TouchPressed,
    TouchReleased,
    ValueChanged,
    SwipedUp,
    SwipedDown,
    SwipedRight,
    SwipedLeft,
}

impl TouchType {
    /// Bit of this event in an object touch mask
    pub const fn mask(self) -> u16 {
        1 << (self as u16)
    }

    pub fn is_swipe(self) -> bool {
        matches!(
            self,
            TouchType::SwipedUp | TouchType::SwipedDown | TouchType::SwipedLeft | TouchType::SwipedRight
        )
    }
}

/// Mask covering the four swipe directions
pub const SWIPE_MASK: u16 = TouchType::SwipedUp.mask()
    | TouchType::SwipedDown.mask()
    | TouchType::SwipedRight.mask()
    | TouchType::SwipedLeft.mask();

/// Identifiers carried by touchable objects, used by the touch sound/tune layer
/// and to recognize well-known controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchId {
    #[default]
    None,
    BottomButton,
    LeftButton,
    RightButton,
    WholeScreen,
    TopRightButton,
    BackButton,
    SingleButton,
    ExtraButton,
    Choice1,
    Choice2,
    Keypad,
    Keyboard,
    EnteredText,
    ValueButton(u8),
    LongPressButton,
    TipBox,
    Controls(u8),
}

/// Tune played on touch, opaque to the engine
pub type TuneId = u8;

/// No tune
pub const NO_TUNE: TuneId = 0xFF;

/// Token value meaning "no callback"
pub const INVALID_TOKEN: u8 = 0xFF;

/// Page index reported by the navigation bar when the exit key is touched
pub const EXIT_PAGE: u8 = 0xFF;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_contains_is_half_open() {
        let area = Area::new(10, 20, 5, 5);
        assert!(area.contains(10, 20), "Top-left corner is inside");
        assert!(area.contains(14, 24), "Last pixel is inside");
        assert!(!area.contains(15, 24), "Right edge is exclusive");
        assert!(!area.contains(14, 25), "Bottom edge is exclusive");
    }

    #[test]
    fn test_touch_masks_are_distinct() {
        assert_eq!(TouchType::Touched.mask(), 1);
        assert_eq!(TouchType::SwipedLeft.mask(), 1 << 10);
        assert_eq!(SWIPE_MASK.count_ones(), 4, "Swipe mask covers four directions");
    }

    #[test]
    fn test_bpp_ordering() {
        assert!(Bpp::Four > Bpp::Two && Bpp::Two > Bpp::One, "Depth must be ordered");
    }
}
