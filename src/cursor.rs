//! Full-window metaball cursor overlay.

use crate::dom::{self, Listener};
use crate::frame::RafScheduler;
use crate::{input, render};
use anyhow::anyhow;
use folio_core::cursor::CursorEngine;
use folio_core::draw::DisplayList;
use folio_core::{frame_callback, AnimationLoop, LoopControl};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

struct CursorState {
    engine: CursorEngine,
    dl: DisplayList,
    viewport: Vec2,
}

struct CursorMount {
    animation: Rc<RefCell<AnimationLoop<RafScheduler>>>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
pub struct CursorHandle {
    mount: Option<CursorMount>,
}

#[wasm_bindgen]
impl CursorHandle {
    /// Cancel the pending frame, then detach every listener.
    pub fn unmount(&mut self) {
        if let Some(m) = self.mount.take() {
            m.animation.borrow_mut().unmount();
            log::info!("[cursor] unmounted");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.mount.is_some()
    }
}

/// Mount the cursor on `<canvas id=canvas_id>`. On touch-only devices, or
/// when the canvas cannot be set up, the returned handle is inactive.
#[wasm_bindgen]
pub fn mount_cursor(canvas_id: &str) -> CursorHandle {
    let mount = match try_mount(canvas_id) {
        Ok(m) => m,
        Err(e) => {
            log::error!("[cursor] mount failed: {:?}", e);
            None
        }
    };
    CursorHandle { mount }
}

fn try_mount(canvas_id: &str) -> anyhow::Result<Option<CursorMount>> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    if !dom::supports_fine_pointer(&window) {
        log::info!("[cursor] no fine pointer, custom cursor disabled");
        return Ok(None);
    }
    let document = window.document().ok_or_else(|| anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, canvas_id)?;
    let Some(ctx) = render::context_2d(&canvas) else {
        log::warn!("[cursor] canvas `{canvas_id}` has no 2d context");
        return Ok(None);
    };

    let viewport = dom::sync_canvas_backing_size(&canvas, dom::window_size(&window));
    let state = Rc::new(RefCell::new(CursorState {
        engine: CursorEngine::new(rand::random()),
        dl: DisplayList::default(),
        viewport,
    }));
    let animation = Rc::new(RefCell::new(AnimationLoop::new(RafScheduler::new())));

    let doc_target: &web::EventTarget = document.as_ref();
    let mut listeners = Vec::with_capacity(6);
    {
        let state = state.clone();
        listeners.push(Listener::new(doc_target, "pointermove", move |ev: web::PointerEvent| {
            let target = input::hover_target(&ev);
            state
                .borrow_mut()
                .engine
                .pointer_move(input::pointer_client(&ev), &target);
        })?);
    }
    {
        let state = state.clone();
        listeners.push(Listener::new(doc_target, "pointerdown", move |ev: web::PointerEvent| {
            state.borrow_mut().engine.pointer_down(input::pointer_client(&ev));
        })?);
    }
    {
        let state = state.clone();
        listeners.push(Listener::new(doc_target, "pointerup", move |_: web::PointerEvent| {
            state.borrow_mut().engine.pointer_up();
        })?);
    }
    if let Some(root) = document.document_element() {
        let root: &web::EventTarget = root.as_ref();
        let leave = state.clone();
        listeners.push(Listener::new(root, "pointerleave", move |_: web::PointerEvent| {
            leave.borrow_mut().engine.pointer_leave();
        })?);
        let enter = state.clone();
        listeners.push(Listener::new(root, "pointerenter", move |_: web::PointerEvent| {
            enter.borrow_mut().engine.pointer_enter();
        })?);
    }
    {
        let state = state.clone();
        let canvas = canvas.clone();
        let animation = animation.clone();
        let win_target: &web::EventTarget = window.as_ref();
        listeners.push(Listener::new(win_target, "resize", move |_: web::Event| {
            if animation.borrow().is_torn_down() {
                return;
            }
            let Some(w) = web::window() else { return };
            state.borrow_mut().viewport = dom::sync_canvas_backing_size(&canvas, dom::window_size(&w));
        })?);
    }

    let callback = frame_callback(move |_ts| {
        if !canvas.is_connected() {
            log::warn!("[cursor] canvas detached, stopping");
            return LoopControl::Stop;
        }
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        s.engine.step();
        s.dl.clear();
        s.engine.render(&mut s.dl);
        render::rasterize(&ctx, &s.dl, s.viewport, dom::device_pixel_ratio());
        LoopControl::Continue
    });
    animation.borrow_mut().mount(callback);
    log::info!("[cursor] mounted on `{canvas_id}`");

    Ok(Some(CursorMount {
        animation,
        _listeners: listeners,
    }))
}
