use folio_core::{FrameCallback, LoopControl, Scheduler};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `requestAnimationFrame`-backed scheduler.
///
/// The tick closure lives as long as the scheduler and only holds a weak
/// reference back to the shared state, so a frame that fires after the
/// owner is gone does nothing.
pub struct RafScheduler {
    inner: Rc<RefCell<RafInner>>,
}

#[derive(Default)]
struct RafInner {
    handle: Option<i32>,
    callback: Option<FrameCallback>,
    tick: Option<Closure<dyn FnMut(f64)>>,
}

impl RafScheduler {
    pub fn new() -> Self {
        let inner = Rc::new(RefCell::new(RafInner::default()));
        let weak = Rc::downgrade(&inner);
        let tick = Closure::wrap(Box::new(move |ts: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let callback = {
                let mut state = inner.borrow_mut();
                state.handle = None;
                state.callback.clone()
            };
            let Some(callback) = callback else {
                return;
            };
            let control = (&mut *callback.borrow_mut())(ts);
            let mut state = inner.borrow_mut();
            match control {
                LoopControl::Continue => {
                    // stop() may have run between the two borrows
                    if state.callback.is_some() && state.handle.is_none() {
                        let handle = request_frame(state.tick.as_ref());
                        state.handle = handle;
                    }
                }
                LoopControl::Stop => {
                    log::debug!("[frame] callback asked to stop");
                    state.callback = None;
                }
            }
        }) as Box<dyn FnMut(f64)>);
        inner.borrow_mut().tick = Some(tick);
        Self { inner }
    }
}

impl Default for RafScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn request_frame(tick: Option<&Closure<dyn FnMut(f64)>>) -> Option<i32> {
    let tick = tick?;
    web::window()?
        .request_animation_frame(tick.as_ref().unchecked_ref())
        .ok()
}

impl Scheduler for RafScheduler {
    fn start(&mut self, callback: FrameCallback) {
        let mut state = self.inner.borrow_mut();
        if state.callback.is_some() {
            return;
        }
        let handle = request_frame(state.tick.as_ref());
        if handle.is_none() {
            log::warn!("[frame] requestAnimationFrame unavailable");
            return;
        }
        state.handle = handle;
        state.callback = Some(callback);
    }

    fn stop(&mut self) {
        let mut state = self.inner.borrow_mut();
        if let Some(handle) = state.handle.take() {
            if let Some(w) = web::window() {
                let _ = w.cancel_animation_frame(handle);
            }
        }
        state.callback = None;
    }

    fn is_running(&self) -> bool {
        self.inner.borrow().callback.is_some()
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
