#![cfg(target_arch = "wasm32")]
mod constants;
mod cursor;
mod dom;
mod frame;
mod input;
mod particles;
mod render;
mod skills;
mod visibility;

use wasm_bindgen::prelude::*;

pub use cursor::{mount_cursor, CursorHandle};
pub use particles::{mount_particle_text, ParticleTextHandle};
pub use skills::{mount_skill_universe, SkillUniverseHandle};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("folio-web ready");
    Ok(())
}
