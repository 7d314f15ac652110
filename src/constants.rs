// Host-facing constants for the web front-end. Kept free of web-sys types so
// host tests can include this file directly.

/// Media query a device must match for the custom cursor to mount.
pub const FINE_POINTER_QUERY: &str = "(pointer: fine)";

/// Default glyph asset for particle text (three.js typeface JSON).
pub const DEFAULT_FONT_URL: &str = "https://threejs.org/examples/fonts/helvetiker_bold.typeface.json";

// Hover classification selectors (matched with Element::closest)
pub const CURSOR_ATTR_SELECTOR: &str = "[data-cursor]";
pub const CURSOR_ATTR: &str = "data-cursor";
pub const INTERACTIVE_SELECTOR: &str = "a, button, [role=\"button\"], label, nav, [data-interactive]";
pub const MAGNET_SELECTOR: &str = "a, button, [role=\"button\"]";
pub const MEDIA_SELECTOR: &str = "img, figure, .project-card, video";
pub const EDITABLE_TAGS: [&str; 2] = ["INPUT", "TEXTAREA"];

// Canvas backing store
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0; // cap to keep large screens cheap
pub const MIN_CANVAS_PX: u32 = 1;
