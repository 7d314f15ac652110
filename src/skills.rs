//! Skill universe canvas: layout on resize, float and pointer push per frame,
//! paused while scrolled out of view.

use crate::dom::{self, Listener};
use crate::frame::RafScheduler;
use crate::visibility::VisibilityObserver;
use crate::{input, render};
use anyhow::anyhow;
use folio_core::draw::DisplayList;
use folio_core::skills::layout::LayoutConfig;
use folio_core::skills::{SkillCategories, SkillGraph};
use folio_core::{frame_callback, AnimationLoop, FrameClock, LoopControl, PointerQueue};
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

struct SkillState {
    graph: SkillGraph,
    dl: DisplayList,
    viewport: Vec2,
}

struct SkillMount {
    animation: Rc<RefCell<AnimationLoop<RafScheduler>>>,
    _visibility: VisibilityObserver,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
pub struct SkillUniverseHandle {
    mount: Option<SkillMount>,
}

#[wasm_bindgen]
impl SkillUniverseHandle {
    pub fn unmount(&mut self) {
        if let Some(m) = self.mount.take() {
            m.animation.borrow_mut().unmount();
            log::info!("[skills] unmounted");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.mount.is_some()
    }
}

/// Mount the skill universe on `<canvas id=canvas_id>` from
/// `{"category": [{"name": .., "level": ..}, ..], ..}` JSON.
#[wasm_bindgen]
pub fn mount_skill_universe(canvas_id: &str, skills_json: &str) -> SkillUniverseHandle {
    let mount = match try_mount(canvas_id, skills_json) {
        Ok(m) => m,
        Err(e) => {
            log::error!("[skills] mount failed: {:?}", e);
            None
        }
    };
    SkillUniverseHandle { mount }
}

fn try_mount(canvas_id: &str, skills_json: &str) -> anyhow::Result<Option<SkillMount>> {
    let data = SkillCategories::from_json(skills_json)?;
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let document = window.document().ok_or_else(|| anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, canvas_id)?;
    let Some(ctx) = render::context_2d(&canvas) else {
        log::warn!("[skills] canvas `{canvas_id}` has no 2d context");
        return Ok(None);
    };

    let viewport = dom::sync_canvas_backing_size(&canvas, dom::container_size(&canvas));
    let mut graph = SkillGraph::new(data, LayoutConfig::default());
    graph.resize(viewport);
    let state = Rc::new(RefCell::new(SkillState {
        graph,
        dl: DisplayList::default(),
        viewport,
    }));
    let pointer = Rc::new(PointerQueue::default());
    let animation = Rc::new(RefCell::new(AnimationLoop::new(RafScheduler::new())));

    let canvas_target: &web::EventTarget = canvas.as_ref();
    let mut listeners = Vec::with_capacity(3);
    {
        let pointer = pointer.clone();
        let canvas = canvas.clone();
        listeners.push(Listener::new(canvas_target, "pointermove", move |ev: web::PointerEvent| {
            pointer.push(input::pointer_canvas_css(&ev, &canvas));
        })?);
    }
    {
        let state = state.clone();
        let pointer = pointer.clone();
        listeners.push(Listener::new(canvas_target, "pointerleave", move |_: web::PointerEvent| {
            pointer.take();
            state.borrow_mut().graph.pointer_leave();
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
            let viewport = dom::sync_canvas_backing_size(&canvas, dom::container_size(&canvas));
            let mut s = state.borrow_mut();
            if s.viewport != viewport {
                s.viewport = viewport;
                s.graph.resize(viewport);
            }
        })?);
    }

    let visibility = {
        let animation = animation.clone();
        VisibilityObserver::observe(canvas.as_ref(), move |visible| {
            animation.borrow_mut().set_visible(visible);
        })?
    };

    let started = Instant::now();
    let mut clock = FrameClock::default();
    let callback = frame_callback(move |_ts| {
        if !canvas.is_connected() {
            log::warn!("[skills] canvas detached, stopping");
            return LoopControl::Stop;
        }
        // paused stretches do not advance animation time
        let time = clock.elapsed_sec(started.elapsed().as_secs_f64() * 1000.0);
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        if let Some(p) = pointer.take() {
            s.graph.pointer_move(p);
        }
        s.graph.step(time);
        s.dl.clear();
        s.graph.render(time, &mut s.dl);
        render::rasterize(&ctx, &s.dl, s.viewport, dom::device_pixel_ratio());
        LoopControl::Continue
    });
    animation.borrow_mut().mount(callback);
    log::info!("[skills] mounted on `{canvas_id}`");

    Ok(Some(SkillMount {
        animation,
        _visibility: visibility,
        _listeners: listeners,
    }))
}
