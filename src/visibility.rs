use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type EntriesFn = dyn FnMut(js_sys::Array, web::IntersectionObserver);

/// IntersectionObserver on one element. Dropping it disconnects.
pub struct VisibilityObserver {
    observer: web::IntersectionObserver,
    _callback: Closure<EntriesFn>,
}

impl VisibilityObserver {
    pub fn observe(
        element: &web::Element,
        mut on_change: impl FnMut(bool) + 'static,
    ) -> anyhow::Result<Self> {
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web::IntersectionObserver| {
                // Only the latest entry matters when several queue up.
                let last = entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<web::IntersectionObserverEntry>().ok())
                    .last();
                if let Some(entry) = last {
                    on_change(entry.is_intersecting());
                }
            },
        ) as Box<EntriesFn>);
        let observer = web::IntersectionObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("IntersectionObserver: {:?}", e))?;
        observer.observe(element);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
