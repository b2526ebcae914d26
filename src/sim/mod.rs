//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (column-major bricks, balls and pills by insertion)
//! - No rendering or platform dependencies

pub mod collision;
pub mod pills;
pub mod quiz;
pub mod round;
pub mod state;
pub mod tick;

pub use collision::{aabb_overlap, bounce_off_paddle, paddle_deflection, reflect_off_walls};
pub use pills::{apply_effect, apply_tagged, select_kind};
pub use quiz::{Question, QuestionPool, QuizState, answers_match, default_questions};
pub use round::{check_round_clear, generate_grid, start_round, start_session};
pub use state::{
    Ball, Brick, BrickGrid, GameEvent, GameOverPayload, GamePhase, GameState, Paddle, PauseReason,
    Pill, PillKind, QuizResult, SimConfig,
};
pub use tick::{TickInput, tick};
