// src/touch.rs
//! Touch state machine.
//!
//! Raw samples (pressed/released plus a position and a timestamp) are turned
//! into per-object [`TouchEvent`]s: press, touching, out-of-touch, release,
//! tap, long tap and swipes. Only events present in the target object's
//! touch mask are reported.

use log::debug;

use crate::obj::{ObjHandle, ObjPool};
use crate::types::TouchType;

/// Press duration from which a tap becomes a long tap
pub const LONG_TOUCH_DURATION_MS: u32 = 1500;

const SWIPE_THRESHOLD_X: i32 = 10;
const SWIPE_THRESHOLD_Y: i32 = 20;

/// Max events produced by a single sample
pub const MAX_EVENTS_PER_SAMPLE: usize = 4;

/// Represents a 2D touch point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchPoint {
    pub x: i16,
    pub y: i16,
}

impl TouchPoint {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchState {
    Pressed,
    #[default]
    Released,
}

/// One sample from the touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchSample {
    pub state: TouchState,
    pub point: TouchPoint,
    pub timestamp_ms: u32,
}

impl TouchSample {
    pub fn pressed(x: i16, y: i16, timestamp_ms: u32) -> Self {
        Self {
            state: TouchState::Pressed,
            point: TouchPoint::new(x, y),
            timestamp_ms,
        }
    }

    pub fn released(x: i16, y: i16, timestamp_ms: u32) -> Self {
        Self {
            state: TouchState::Released,
            point: TouchPoint::new(x, y),
            timestamp_ms,
        }
    }
}

/// An event delivered to one object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub obj: ObjHandle,
    pub kind: TouchType,
    /// Position where the finger went down
    pub first: TouchPoint,
    /// Latest position
    pub last: TouchPoint,
    /// Time since the finger went down
    pub duration_ms: u32,
}

pub type TouchEvents = heapless::Vec<TouchEvent, MAX_EVENTS_PER_SAMPLE>;

fn inside(pool: &ObjPool, handle: ObjHandle, point: TouchPoint) -> bool {
    pool.get(handle)
        .map(|obj| obj.area.contains(point.x, point.y))
        .unwrap_or(false)
}

/// Deepest touchable object under `point`; later children are on top
pub fn touched_object(pool: &ObjPool, root: ObjHandle, point: TouchPoint) -> Option<ObjHandle> {
    if !inside(pool, root, point) {
        return None;
    }
    let obj = pool.get(root).ok()?;
    if let Some(children) = obj.children() {
        for &child in children.iter().rev() {
            if let Some(found) = touched_object(pool, child, point) {
                return Some(found);
            }
        }
    }
    (obj.touch_mask != 0).then_some(root)
}

fn swipable_object_at(pool: &ObjPool, root: ObjHandle, point: TouchPoint, swipe: TouchType) -> Option<ObjHandle> {
    if !inside(pool, root, point) {
        return None;
    }
    let obj = pool.get(root).ok()?;
    if let Some(children) = obj.children() {
        for &child in children.iter() {
            if let Some(found) = swipable_object_at(pool, child, point, swipe) {
                return Some(found);
            }
        }
    }
    (obj.touch_mask & swipe.mask() != 0).then_some(root)
}

/// Object accepting `swipe` under both ends of the gesture
pub fn swipable_object(
    pool: &ObjPool,
    root: ObjHandle,
    first: TouchPoint,
    last: TouchPoint,
    swipe: TouchType,
) -> Option<ObjHandle> {
    let first_obj = swipable_object_at(pool, root, first, swipe)?;
    let last_obj = swipable_object_at(pool, root, last, swipe)?;
    (first_obj == last_obj).then_some(first_obj)
}

/// Swipe direction between two points, horizontal moves first
pub fn detect_swipe(first: TouchPoint, last: TouchPoint) -> Option<TouchType> {
    let dx = last.x as i32 - first.x as i32;
    let dy = last.y as i32 - first.y as i32;
    if dx >= SWIPE_THRESHOLD_X {
        Some(TouchType::SwipedRight)
    } else if -dx >= SWIPE_THRESHOLD_X {
        Some(TouchType::SwipedLeft)
    } else if dy >= SWIPE_THRESHOLD_Y {
        Some(TouchType::SwipedDown)
    } else if -dy >= SWIPE_THRESHOLD_Y {
        Some(TouchType::SwipedUp)
    } else {
        None
    }
}

/// Touch context of one execution context (UX or application)
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    last_state: TouchState,
    last_pressed_time: u32,
    last_pressed_obj: Option<ObjHandle>,
    first: TouchPoint,
    last: TouchPoint,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget any ongoing gesture
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Object currently held down, if any
    pub fn pressed_object(&self) -> Option<ObjHandle> {
        self.last_pressed_obj
    }

    fn emit(&self, pool: &ObjPool, events: &mut TouchEvents, obj: ObjHandle, kind: TouchType, now: u32) {
        let wanted = pool.get(obj).map(|o| o.touch_mask & kind.mask() != 0).unwrap_or(false);
        if !wanted {
            return;
        }
        debug!(" Touch event {:?} on {:?}", kind, obj);
        let event = TouchEvent {
            obj,
            kind,
            first: self.first,
            last: self.last,
            duration_ms: now.wrapping_sub(self.last_pressed_time),
        };
        if events.push(event).is_err() {
            log::warn!("Touch event batch full, dropping {:?}", kind);
        }
    }

    /// Feed one sample for the screen rooted at `root`
    pub fn on_sample(&mut self, pool: &ObjPool, root: ObjHandle, sample: &TouchSample) -> TouchEvents {
        let mut events = TouchEvents::new();
        let now = sample.timestamp_ms;

        if self.last_state == TouchState::Released {
            // consecutive releases carry nothing
            if sample.state == TouchState::Released {
                return events;
            }
            self.first = sample.point;
        }

        let found = touched_object(pool, root, sample.point);
        if found.is_none() {
            if sample.state == TouchState::Pressed
                && self.last_state == TouchState::Pressed
                && let Some(obj) = self.last_pressed_obj
                && pool.contains(root, obj)
            {
                self.emit(pool, &mut events, obj, TouchType::OutOfTouch, now);
            }
            self.last_pressed_obj = None;
        }
        self.last = sample.point;

        match sample.state {
            TouchState::Released => {
                self.last_state = TouchState::Released;
                let mut consumed = false;
                if let Some(swipe) = detect_swipe(self.first, self.last)
                    && let Some(obj) = swipable_object(pool, root, self.first, self.last, swipe)
                {
                    self.emit(pool, &mut events, obj, swipe, now);
                    consumed = true;
                }
                if !consumed
                    && let Some(obj) = self.last_pressed_obj
                    && (found == Some(obj) || pool.contains(root, obj))
                {
                    self.emit(pool, &mut events, obj, TouchType::TouchReleased, now);
                    if now >= self.last_pressed_time.saturating_add(LONG_TOUCH_DURATION_MS) {
                        self.emit(pool, &mut events, obj, TouchType::LongTouched, now);
                    } else {
                        self.emit(pool, &mut events, obj, TouchType::Touched, now);
                    }
                }
                self.last_pressed_obj = None;
            }
            TouchState::Pressed => {
                if self.last_state == TouchState::Pressed {
                    if let Some(obj) = self.last_pressed_obj {
                        if found != Some(obj) {
                            if pool.contains(root, obj) {
                                self.emit(pool, &mut events, obj, TouchType::OutOfTouch, now);
                            }
                            self.last_pressed_obj = None;
                        } else {
                            self.emit(pool, &mut events, obj, TouchType::Touching, now);
                        }
                    }
                } else {
                    self.last_state = TouchState::Pressed;
                    self.last_pressed_obj = found;
                    self.last_pressed_time = now;
                    if let Some(obj) = found {
                        self.emit(pool, &mut events, obj, TouchType::TouchPressed, now);
                        self.emit(pool, &mut events, obj, TouchType::Touching, now);
                    }
                }
            }
        }
        events
    }
}
