//! Platform abstraction layer
//!
//! Everything the host environment touches:
//! - Input events folded into per-tick input
//! - Fixed-rate schedules for ticks and the HUD timer
//! - Render surface and HUD seams
//! - The game loop that owns one running session

pub mod game_loop;
pub mod host;
pub mod input;
pub mod time;

pub use game_loop::GameLoop;
pub use host::{Hud, RenderSurface};
pub use input::{InputEvent, InputQueue};
pub use time::FixedSchedule;
