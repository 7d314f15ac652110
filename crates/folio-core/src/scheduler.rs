//! Frame scheduling seam shared by every render loop.
//!
//! Engines never call the platform's frame API directly. They hand a
//! `FrameCallback` to a `Scheduler`; the web front-end plugs in a
//! `requestAnimationFrame` implementation while tests drive frames by hand
//! through `ManualScheduler`. `AnimationLoop` layers mount/visibility/teardown
//! rules on top so a component can never end up with two loops in flight.

use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::constants::FRAME_DT_MAX_MS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Per-frame callback. Receives the frame timestamp in milliseconds.
pub type FrameCallback = Rc<RefCell<dyn FnMut(f64) -> LoopControl>>;

pub fn frame_callback(f: impl FnMut(f64) -> LoopControl + 'static) -> FrameCallback {
    Rc::new(RefCell::new(f))
}

pub trait Scheduler {
    /// Begin invoking `callback` once per display frame. Calling `start`
    /// while already running keeps the existing loop.
    fn start(&mut self, callback: FrameCallback);
    /// Cancel the pending frame, if any. No callback runs after this returns.
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Scheduler driven explicitly by the caller, one frame per `advance`.
#[derive(Default)]
pub struct ManualScheduler {
    callback: Option<FrameCallback>,
    now_ms: f64,
    frame_ms: f64,
    starts: usize,
}

impl ManualScheduler {
    pub fn new(frame_ms: f64) -> Self {
        Self {
            frame_ms,
            ..Default::default()
        }
    }

    /// Run up to `frames` frames; returns how many actually ran.
    pub fn advance(&mut self, frames: usize) -> usize {
        let mut ran = 0;
        for _ in 0..frames {
            let Some(cb) = self.callback.clone() else {
                break;
            };
            self.now_ms += self.frame_ms;
            ran += 1;
            let ctrl = (&mut *cb.borrow_mut())(self.now_ms);
            if ctrl == LoopControl::Stop {
                self.callback = None;
            }
        }
        ran
    }

    /// Number of times a loop was actually (re)started.
    pub fn start_count(&self) -> usize {
        self.starts
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, callback: FrameCallback) {
        if self.callback.is_some() {
            return;
        }
        self.starts += 1;
        self.callback = Some(callback);
    }

    fn stop(&mut self) {
        self.callback = None;
    }

    fn is_running(&self) -> bool {
        self.callback.is_some()
    }
}

/// Mount/visibility/teardown gate around a scheduler.
pub struct AnimationLoop<S: Scheduler> {
    scheduler: S,
    callback: Option<FrameCallback>,
    visible: bool,
    torn_down: bool,
}

impl<S: Scheduler> AnimationLoop<S> {
    /// New loops assume the host is visible until told otherwise.
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            callback: None,
            visible: true,
            torn_down: false,
        }
    }

    pub fn mount(&mut self, callback: FrameCallback) {
        if self.torn_down {
            return;
        }
        self.callback = Some(callback.clone());
        if self.visible {
            self.scheduler.start(callback);
        }
    }

    /// Visibility change from the host. Ignored after teardown.
    pub fn set_visible(&mut self, visible: bool) {
        if self.torn_down {
            return;
        }
        self.visible = visible;
        match (visible, &self.callback) {
            (true, Some(cb)) => {
                if !self.scheduler.is_running() {
                    log::debug!("[loop] resume");
                    self.scheduler.start(cb.clone());
                }
            }
            (false, _) => {
                if self.scheduler.is_running() {
                    log::debug!("[loop] pause (hidden)");
                }
                self.scheduler.stop();
            }
            _ => {}
        }
    }

    pub fn unmount(&mut self) {
        self.scheduler.stop();
        self.callback = None;
        self.torn_down = true;
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

/// Latest-wins pointer slot. Event handlers overwrite it as often as events
/// arrive; the frame drains it once, so bursts of moves cost one update.
#[derive(Debug, Default)]
pub struct PointerQueue {
    pending: Cell<Option<Vec2>>,
}

impl PointerQueue {
    pub fn push(&self, pos: Vec2) {
        self.pending.set(Some(pos));
    }

    pub fn take(&self) -> Option<Vec2> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

/// Animation time in seconds, accumulated only across frames that ran.
///
/// Each frame contributes at most `FRAME_DT_MAX_MS`, so a loop resumed after
/// being paused continues where it left off instead of skipping ahead.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    elapsed_ms: f64,
}

impl FrameClock {
    pub fn elapsed_sec(&mut self, now_ms: f64) -> f32 {
        if let Some(last) = self.last_ms {
            self.elapsed_ms += (now_ms - last).clamp(0.0, FRAME_DT_MAX_MS);
        }
        self.last_ms = Some(now_ms);
        (self.elapsed_ms / 1000.0) as f32
    }
}
