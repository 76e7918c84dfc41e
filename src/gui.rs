// src/gui.rs
//! Screen stack and draw entry points.
//!
//! [`Gui`] owns everything that was process-wide state in a firmware build:
//! the object pool, the stack of screens (one per layer), the dirty region,
//! the drawing gate and the touch contexts. Screens pushed on top of the base
//! one are modals; each may carry a periodic ticker.

use embassy_time::Duration;
use log::{debug, info, warn};

use crate::config::Profile;
use crate::error::{NbglError, NbglResult};
use crate::frontend::Frontend;
use crate::obj::draw::Painter;
use crate::obj::{ContainerData, MAX_LAYERS, Obj, ObjHandle, ObjKind, ObjPool};
use crate::refresh::DirtyRegion;
use crate::touch::{TouchEvents, TouchSample, TouchTracker};
use crate::types::{Area, Color, PostRefresh, RefreshMode};

/// Periodic timer attached to a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    pub period: Duration,
    remaining: Duration,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            remaining: period,
        }
    }

    /// Advance by `elapsed`, returns whether the period expired
    fn advance(&mut self, elapsed: Duration) -> bool {
        if elapsed >= self.remaining {
            self.remaining = self.period;
            true
        } else {
            self.remaining -= elapsed;
            false
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Screen {
    root: ObjHandle,
    ux_owned: bool,
    ticker: Option<Ticker>,
}

pub struct Gui<F: Frontend> {
    frontend: F,
    profile: Profile,
    pool: ObjPool,
    screens: heapless::Vec<Screen, MAX_LAYERS>,
    dirty: DirtyRegion,
    drawing_enabled: bool,
    app_touch: TouchTracker,
    ux_touch: TouchTracker,
}

impl<F: Frontend> Gui<F> {
    pub fn new(frontend: F, profile: Profile) -> Self {
        Self {
            frontend,
            dirty: DirtyRegion::new(&profile),
            profile,
            pool: ObjPool::new(),
            screens: heapless::Vec::new(),
            drawing_enabled: true,
            app_touch: TouchTracker::new(),
            ux_touch: TouchTracker::new(),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn pool(&self) -> &ObjPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ObjPool {
        &mut self.pool
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    pub fn dirty(&self) -> &DirtyRegion {
        &self.dirty
    }

    // ------------------------------------------------------------------------
    // Screen stack
    // ------------------------------------------------------------------------

    fn new_screen(&mut self, layer: u8, ux_owned: bool, ticker: Option<Ticker>) -> NbglResult<ObjHandle> {
        self.pool.release(layer);
        let root = Obj::new(ObjKind::Screen(ContainerData::default()))
            .with_size(self.profile.screen_width, self.profile.screen_height)
            .with_background(Color::White);
        let root = self.pool.alloc(layer, root)?;
        let screen = Screen {
            root,
            ux_owned,
            ticker,
        };
        self.screens
            .push(screen)
            .map_err(|_| NbglError::LayerStackFull { max: MAX_LAYERS })?;
        Ok(root)
    }

    /// Replace the whole stack by a single base screen
    pub fn screen_set(&mut self, ux_owned: bool, ticker: Option<Ticker>) -> NbglResult<ObjHandle> {
        for layer in 0..MAX_LAYERS as u8 {
            self.pool.release(layer);
        }
        self.screens.clear();
        self.app_touch.reset();
        self.ux_touch.reset();
        info!("Base screen set (ux: {})", ux_owned);
        self.new_screen(0, ux_owned, ticker)
    }

    /// Stack a modal screen on a free layer
    pub fn screen_push(&mut self, ux_owned: bool, ticker: Option<Ticker>) -> NbglResult<ObjHandle> {
        let layer = (1..MAX_LAYERS as u8)
            .find(|l| !self.screens.iter().any(|s| s.root.layer == *l))
            .ok_or_else(|| {
                warn!("No free layer for a modal screen");
                NbglError::LayerStackFull { max: MAX_LAYERS }
            })?;
        info!("Screen pushed on layer {}", layer);
        self.new_screen(layer, ux_owned, ticker)
    }

    /// Remove the screen of `layer` and free its objects
    pub fn screen_pop(&mut self, layer: u8) -> NbglResult<()> {
        let index = self
            .screens
            .iter()
            .position(|s| s.root.layer == layer)
            .ok_or(NbglError::InvalidHandle)?;
        self.screens.remove(index);
        self.pool.release(layer);
        self.app_touch.reset();
        self.ux_touch.reset();
        info!("Screen popped from layer {}", layer);
        Ok(())
    }

    /// Root of the top-most screen
    pub fn top_screen(&self) -> Option<ObjHandle> {
        self.screens.last().map(|s| s.root)
    }

    pub fn nb_screens(&self) -> usize {
        self.screens.len()
    }

    pub fn set_ticker(&mut self, layer: u8, ticker: Option<Ticker>) {
        if let Some(screen) = self.screens.iter_mut().find(|s| s.root.layer == layer) {
            screen.ticker = ticker;
        }
    }

    /// Redraw the top screen entirely
    pub fn screen_redraw(&mut self) -> NbglResult<()> {
        match self.top_screen() {
            Some(root) => self.draw(root),
            None => Ok(()),
        }
    }

    /// Advance the top screen's ticker, returns its layer when it fired
    pub fn tick(&mut self, elapsed: Duration) -> Option<u8> {
        let screen = self.screens.last_mut()?;
        let fired = screen.ticker.as_mut()?.advance(elapsed);
        fired.then_some(screen.root.layer)
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Enable or disable drawing of application screens
    pub fn allow_drawing(&mut self, enabled: bool) {
        self.drawing_enabled = enabled;
    }

    /// Draw `handle` and its descendants.
    ///
    /// Positions are recomputed only when drawing a whole screen. Drawing is
    /// silently dropped when the owning context does not match the caller's,
    /// or when the gate is closed for application screens.
    pub fn draw(&mut self, handle: ObjHandle) -> NbglResult<()> {
        let ux_owned = match self.screens.iter().find(|s| s.root.layer == handle.layer) {
            Some(screen) => screen.ux_owned,
            None => return Err(NbglError::InvalidHandle),
        };
        let compute = matches!(self.pool.get(handle)?.kind, ObjKind::Screen(_));
        if self.frontend.current_task_is_ux() != ux_owned {
            debug!(" Cross-context draw dropped");
            return Ok(());
        }
        if !self.drawing_enabled && !ux_owned {
            debug!(" Drawing disabled, draw dropped");
            return Ok(());
        }
        Painter {
            frontend: &mut self.frontend,
            dirty: &mut self.dirty,
            profile: &self.profile,
        }
        .draw_obj_and_children(&mut self.pool, handle, None, compute)
    }

    /// Report an area drawn outside of the object tree
    pub fn extend_refresh_area(&mut self, area: &Area) {
        self.dirty.extend(area);
    }

    pub fn refresh(&mut self) {
        self.refresh_special(RefreshMode::FullColorCleanRefresh);
    }

    pub fn refresh_special(&mut self, mode: RefreshMode) {
        self.refresh_special_with_post_refresh(mode, PostRefresh::ForcePowerOff);
    }

    pub fn refresh_special_with_post_refresh(&mut self, mode: RefreshMode, post: PostRefresh) {
        if let Some(area) = self.dirty.take() {
            debug!(
                " Refreshing ({}, {}) {}x{} with {:?}",
                area.x0, area.y0, area.width, area.height, mode
            );
            self.frontend.refresh_area(&area, mode, post);
        }
    }

    pub fn is_refresh_needed(&self) -> bool {
        self.dirty.is_dirty()
    }

    pub fn reset_refresh(&mut self) {
        self.dirty.reset();
    }

    // ------------------------------------------------------------------------
    // Touch
    // ------------------------------------------------------------------------

    /// Feed a touch sample to the top screen
    pub fn handle_touch(&mut self, sample: &TouchSample) -> TouchEvents {
        let Some(root) = self.top_screen() else {
            return TouchEvents::new();
        };
        let tracker = if self.frontend.current_task_is_ux() {
            &mut self.ux_touch
        } else {
            &mut self.app_touch
        };
        tracker.on_sample(&self.pool, root, sample)
    }
}
