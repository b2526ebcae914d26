//! Quiz Breakout - a paddle-and-ball arcade game gated by vocabulary quizzes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, bricks, pills, quiz, rounds)
//! - `platform`: Host seams (input queue, fixed-step timing, HUD/render traits, game loop)
//! - `renderer`: Frame drawing onto a rectangle-filling surface
//! - `settings`: Data-driven configuration
//! - `error`: Failure taxonomy shared by setup and the tick boundary

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use platform::{GameLoop, Hud, InputEvent, RenderSurface};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default fixed simulation timestep (16 ms ticks)
    pub const SIM_DT: f32 = 0.016;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the loop will account for (seconds)
    pub const MAX_FRAME_DT: f64 = 0.25;
    /// HUD timer refresh period (seconds)
    pub const TIMER_PERIOD: f32 = 1.0;

    /// Logical render surface size
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Paddle defaults (y is fixed near the bottom edge)
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_INITIAL_WIDTH: f32 = 100.0;
    pub const PADDLE_MIN_WIDTH: f32 = 40.0;
    pub const PADDLE_MAX_WIDTH: f32 = 160.0;
    /// Pixels per tick while a direction is held
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Gap between the paddle's bottom edge and the canvas bottom
    pub const PADDLE_BOTTOM_MARGIN: f32 = 10.0;
    /// Horizontal deflection amplification for edge hits
    pub const PADDLE_DEFLECTION: f32 = 1.5;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const INITIAL_BALL_SPEED: f32 = 4.0;
    pub const BALL_SPEED_MULTIPLIER: f32 = 0.968;
    /// Round-invariant base speed per axis (pixels per tick)
    pub const BASE_SPEED_X: f32 = INITIAL_BALL_SPEED * BALL_SPEED_MULTIPLIER;
    pub const BASE_SPEED_Y: f32 = INITIAL_BALL_SPEED * BALL_SPEED_MULTIPLIER;
    /// Fresh balls spawn this far above the paddle top
    pub const BALL_SPAWN_LIFT: f32 = 20.0;
    /// Multi-ball stops spawning at this many active balls
    pub const MAX_BALLS: usize = 5;
    pub const MULTI_BALL_OFFSET: f32 = 5.0;
    pub const MULTI_BALL_LEFT_FACTOR: f32 = 0.9;
    pub const MULTI_BALL_RIGHT_FACTOR: f32 = 1.1;

    /// Brick layout
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 8.0;
    pub const BRICK_OFFSET_TOP: f32 = 40.0;
    pub const BRICK_OFFSET_LEFT: f32 = 20.0;
    pub const BRICK_FALLBACK_WIDTH: f32 = 10.0;
    pub const BASE_COLUMNS: u32 = 8;
    pub const BASE_ROWS: u32 = 4;
    pub const MAX_EXTRA_COLUMNS: u32 = 4;
    pub const MAX_EXTRA_ROWS: u32 = 3;
    /// Hard grid limits applied after round growth
    pub const MAX_GRID_COLUMNS: u32 = 64;
    pub const MAX_GRID_ROWS: u32 = 16;
    /// Share of bricks that drop a pill when destroyed
    pub const SPECIAL_BRICK_RATIO: f32 = 0.42;
    pub const TWO_HIT_CHANCE: f32 = 0.2;
    pub const THREE_HIT_CHANCE: f32 = 0.15;

    /// Scoring
    pub const BRICK_SCORE: u64 = 10;
    pub const QUIZ_SCORE: u64 = 50;

    /// Pills
    pub const PILL_RADIUS: f32 = 8.0;
    /// Pixels per tick
    pub const PILL_SPEED: f32 = 2.0;
    pub const SPEED_UP_FACTOR: f32 = 1.1;
    pub const PADDLE_GROW_FACTOR: f32 = 1.2;
    pub const PADDLE_SHRINK_FACTOR: f32 = 0.8;

    /// Quiz
    pub const QUESTIONS_TO_WIN: u32 = 6;
    /// Seconds between answering and the simulation resuming
    pub const QUIZ_RESUME_DELAY: f32 = 1.0;
}

/// Sign that keeps zero at zero (unlike `f32::signum`)
#[inline]
pub fn sign_or_zero(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_or_zero() {
        assert_eq!(sign_or_zero(3.2), 1.0);
        assert_eq!(sign_or_zero(-0.1), -1.0);
        assert_eq!(sign_or_zero(0.0), 0.0);
    }
}
