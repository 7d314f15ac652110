pub mod constants;
pub mod cursor;
pub mod draw;
pub mod error;
pub mod glyph;
pub mod particles;
pub mod scheduler;
pub mod skills;
pub mod spring;
pub mod state;

pub use constants::*;
pub use error::*;
pub use scheduler::*;
pub use spring::*;
pub use state::*;
