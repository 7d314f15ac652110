use crate::constants::{FINE_POINTER_QUERY, MAX_DEVICE_PIXEL_RATIO, MIN_CANVAS_PX};
use anyhow::anyhow;
use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn canvas_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("no element with id `{id}`"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow!("element `{id}` is not a canvas: {:?}", e))
}

/// True when the primary input can hover (mouse, trackpad, pen).
pub fn supports_fine_pointer(window: &web::Window) -> bool {
    matches!(window.match_media(FINE_POINTER_QUERY), Ok(Some(mql)) if mql.matches())
}

pub fn device_pixel_ratio() -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .clamp(1.0, MAX_DEVICE_PIXEL_RATIO)
}

/// Resize the backing store to `css_size * dpr` and return the CSS size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, css_size: Vec2) -> Vec2 {
    let dpr = device_pixel_ratio();
    let w_px = (css_size.x as f64 * dpr) as u32;
    let h_px = (css_size.y as f64 * dpr) as u32;
    if canvas.width() != w_px.max(MIN_CANVAS_PX) {
        canvas.set_width(w_px.max(MIN_CANVAS_PX));
    }
    if canvas.height() != h_px.max(MIN_CANVAS_PX) {
        canvas.set_height(h_px.max(MIN_CANVAS_PX));
    }
    css_size
}

/// CSS size of the browser viewport.
pub fn window_size(window: &web::Window) -> Vec2 {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Vec2::new(w as f32, h as f32)
}

/// CSS size of the element a canvas fills (its parent, or the canvas itself).
pub fn container_size(canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = match canvas.parent_element() {
        Some(parent) => parent.get_bounding_client_rect(),
        None => canvas.get_bounding_client_rect(),
    };
    Vec2::new(rect.width() as f32, rect.height() as f32)
}

/// An attached DOM listener. Dropping it removes the listener.
pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn new<E>(
        target: &web::EventTarget,
        kind: &'static str,
        mut handler: impl FnMut(E) + 'static,
    ) -> anyhow::Result<Self>
    where
        E: JsCast + 'static,
    {
        let closure = Closure::wrap(Box::new(move |ev: web::Event| {
            if let Ok(ev) = ev.dyn_into::<E>() {
                handler(ev);
            }
        }) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("addEventListener({kind}): {:?}", e))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}
