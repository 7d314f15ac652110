//! Particle-text canvas: a symbol formed from points while focused.

use crate::constants::DEFAULT_FONT_URL;
use crate::dom::{self, Listener};
use crate::frame::RafScheduler;
use crate::render;
use crate::visibility::VisibilityObserver;
use anyhow::anyhow;
use fnv::FnvHashMap;
use folio_core::draw::DisplayList;
use folio_core::glyph::Typeface;
use folio_core::particles::{ParticleConfig, ParticleText};
use folio_core::{frame_callback, AnimationLoop, Camera, FrameClock, LoopControl};
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

thread_local! {
    // Parsed typefaces by URL, shared by every particle canvas on the page.
    static FONTS: RefCell<FnvHashMap<String, Rc<Typeface>>> = RefCell::new(FnvHashMap::default());
}

struct ParticleState {
    engine: ParticleText,
    camera: Camera,
    dl: DisplayList,
    viewport: Vec2,
}

impl ParticleState {
    fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.camera.aspect = viewport.x / viewport.y.max(1.0);
    }
}

struct ParticleMount {
    animation: Rc<RefCell<AnimationLoop<RafScheduler>>>,
    state: Rc<RefCell<ParticleState>>,
    _visibility: VisibilityObserver,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
pub struct ParticleTextHandle {
    mount: Option<ParticleMount>,
}

#[wasm_bindgen]
impl ParticleTextHandle {
    /// Hovered/focused cards pull the particles into the symbol.
    pub fn set_focused(&self, focused: bool) {
        if let Some(m) = &self.mount {
            m.state.borrow_mut().engine.set_focused(focused);
        }
    }

    pub fn set_symbol(&self, symbol: String) {
        if let Some(m) = &self.mount {
            m.state.borrow_mut().engine.set_symbol(&symbol);
        }
    }

    pub fn unmount(&mut self) {
        if let Some(m) = self.mount.take() {
            m.animation.borrow_mut().unmount();
            log::info!("[particles] unmounted");
        }
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.mount.is_some()
    }
}

/// Mount particle text for `symbol` on `<canvas id=canvas_id>`. An empty
/// `font_url` uses the bundled default typeface location. Nothing is drawn
/// until the font has loaded.
#[wasm_bindgen]
pub fn mount_particle_text(canvas_id: &str, symbol: &str, font_url: &str) -> ParticleTextHandle {
    let url = if font_url.is_empty() {
        DEFAULT_FONT_URL
    } else {
        font_url
    };
    let mount = match try_mount(canvas_id, symbol, url) {
        Ok(m) => m,
        Err(e) => {
            log::error!("[particles] mount failed: {:?}", e);
            None
        }
    };
    ParticleTextHandle { mount }
}

fn try_mount(canvas_id: &str, symbol: &str, font_url: &str) -> anyhow::Result<Option<ParticleMount>> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let document = window.document().ok_or_else(|| anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, canvas_id)?;
    let Some(ctx) = render::context_2d(&canvas) else {
        log::warn!("[particles] canvas `{canvas_id}` has no 2d context");
        return Ok(None);
    };

    let viewport = dom::sync_canvas_backing_size(&canvas, dom::container_size(&canvas));
    let mut initial = ParticleState {
        engine: ParticleText::new(symbol, ParticleConfig::default(), rand::random()),
        camera: Camera::particle_default(1.0),
        dl: DisplayList::default(),
        viewport,
    };
    initial.resize(viewport);
    let state = Rc::new(RefCell::new(initial));
    let animation = Rc::new(RefCell::new(AnimationLoop::new(RafScheduler::new())));

    load_font(font_url.to_owned(), Rc::downgrade(&state));

    let mut listeners = Vec::with_capacity(1);
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
            state.borrow_mut().resize(viewport);
        })?);
    }

    let visibility = {
        let animation = animation.clone();
        VisibilityObserver::observe(canvas.as_ref(), move |visible| {
            animation.borrow_mut().set_visible(visible);
        })?
    };

    let frame_state = state.clone();
    let started = Instant::now();
    let mut clock = FrameClock::default();
    let callback = frame_callback(move |_ts| {
        if !canvas.is_connected() {
            log::warn!("[particles] canvas detached, stopping");
            return LoopControl::Stop;
        }
        // paused stretches do not advance animation time
        let time = clock.elapsed_sec(started.elapsed().as_secs_f64() * 1000.0);
        let mut guard = frame_state.borrow_mut();
        let s = &mut *guard;
        s.engine.step(time);
        s.dl.clear();
        s.engine.render(&s.camera, s.viewport, &mut s.dl);
        render::rasterize(&ctx, &s.dl, s.viewport, dom::device_pixel_ratio());
        LoopControl::Continue
    });
    animation.borrow_mut().mount(callback);
    log::info!("[particles] mounted `{symbol}` on `{canvas_id}`");

    Ok(Some(ParticleMount {
        animation,
        state,
        _visibility: visibility,
        _listeners: listeners,
    }))
}

/// Resolve the typeface for `url` (cached or fetched) and hand it to the
/// engine if it is still mounted when the font arrives.
fn load_font(url: String, target: Weak<RefCell<ParticleState>>) {
    if let Some(font) = FONTS.with(|f| f.borrow().get(&url).cloned()) {
        if let Some(state) = target.upgrade() {
            state.borrow_mut().engine.set_font(font);
        }
        return;
    }
    wasm_bindgen_futures::spawn_local(async move {
        match fetch_typeface(&url).await {
            Ok(font) => {
                let font = FONTS.with(|f| {
                    f.borrow_mut()
                        .entry(url.clone())
                        .or_insert_with(|| Rc::new(font))
                        .clone()
                });
                log::info!("[particles] font loaded: {} glyphs from {}", font.len(), url);
                if let Some(state) = target.upgrade() {
                    state.borrow_mut().engine.set_font(font);
                }
            }
            Err(e) => log::error!("[particles] font {} failed: {:?}", url, e),
        }
    });
}

async fn fetch_typeface(url: &str) -> anyhow::Result<Typeface> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("fetch: {:?}", e))?;
    let resp: web::Response = resp_value
        .dyn_into()
        .map_err(|e| anyhow!("not a Response: {:?}", e))?;
    if !resp.ok() {
        return Err(anyhow!("HTTP {}", resp.status()));
    }
    let text = JsFuture::from(resp.text().map_err(|e| anyhow!("{:?}", e))?)
        .await
        .map_err(|e| anyhow!("body: {:?}", e))?
        .as_string()
        .ok_or_else(|| anyhow!("body is not text"))?;
    Ok(Typeface::from_json(&text)?)
}
