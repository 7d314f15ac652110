use crate::constants::{
    CURSOR_ATTR, CURSOR_ATTR_SELECTOR, EDITABLE_TAGS, INTERACTIVE_SELECTOR, MAGNET_SELECTOR,
    MEDIA_SELECTOR,
};
use folio_core::cursor::HoverTarget;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn pointer_client(ev: &web::MouseEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

/// Pointer position in the canvas' CSS pixel space.
#[inline]
pub fn pointer_canvas_css(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    pointer_client(ev) - Vec2::new(rect.left() as f32, rect.top() as f32)
}

fn event_element(ev: &web::Event) -> Option<web::Element> {
    ev.target()?.dyn_into::<web::Element>().ok()
}

fn closest(el: &web::Element, selector: &str) -> Option<web::Element> {
    el.closest(selector).ok().flatten()
}

fn rect_center(el: &web::Element) -> Vec2 {
    let r = el.get_bounding_client_rect();
    Vec2::new(
        (r.left() + r.width() * 0.5) as f32,
        (r.top() + r.height() * 0.5) as f32,
    )
}

/// Flatten the element under the pointer (and its ancestry) into a
/// `HoverTarget` for the cursor classifier.
pub fn hover_target(ev: &web::Event) -> HoverTarget {
    let Some(el) = event_element(ev) else {
        return HoverTarget::default();
    };
    let tag = el.tag_name().to_ascii_uppercase();
    let content_editable = el
        .dyn_ref::<web::HtmlElement>()
        .map(|h| h.is_content_editable())
        .unwrap_or(false);
    HoverTarget {
        cursor_attr: closest(&el, CURSOR_ATTR_SELECTOR).and_then(|c| c.get_attribute(CURSOR_ATTR)),
        interactive: closest(&el, INTERACTIVE_SELECTOR).is_some(),
        editable: EDITABLE_TAGS.contains(&tag.as_str()) || content_editable,
        media: closest(&el, MEDIA_SELECTOR).is_some(),
        magnet_center: closest(&el, MAGNET_SELECTOR).map(|m| rect_center(&m)),
    }
}
