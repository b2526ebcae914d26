//! Round progression: grid generation, round start and round-clear detection

use glam::Vec2;
use rand::Rng;
use rand::seq::index::sample;

use super::quiz::QuizState;
use super::state::{Brick, BrickGrid, GameEvent, GamePhase, GameState, Paddle, SimConfig};
use crate::consts::*;

/// Grid size for a round: columns and rows grow for the first few rounds, then plateau.
///
/// Degenerate settings fall back to a single column/row, oversized ones to
/// the grid limits, with a warning.
pub fn grid_dimensions(round: u32, config: &SimConfig) -> (u32, u32) {
    let growth = round.saturating_sub(1);
    let mut columns = config
        .base_columns
        .saturating_add(growth.min(MAX_EXTRA_COLUMNS));
    let mut rows = config.base_rows.saturating_add(growth.min(MAX_EXTRA_ROWS));
    if columns > MAX_GRID_COLUMNS {
        log::warn!("Round {} grid has {} columns, using {}", round, columns, MAX_GRID_COLUMNS);
        columns = MAX_GRID_COLUMNS;
    }
    if rows > MAX_GRID_ROWS {
        log::warn!("Round {} grid has {} rows, using {}", round, rows, MAX_GRID_ROWS);
        rows = MAX_GRID_ROWS;
    }
    if columns == 0 {
        log::warn!("Round {} grid has no columns, using 1", round);
        columns = 1;
    }
    if rows == 0 {
        log::warn!("Round {} grid has no rows, using 1", round);
        rows = 1;
    }
    (columns, rows)
}

/// Brick width that fits `columns` across the canvas between the side offsets
pub fn brick_width(canvas_width: f32, columns: u32) -> f32 {
    let width = fitted_brick_width(canvas_width, columns);
    if width > 0.0 {
        width
    } else {
        log::warn!(
            "Brick width {} is not positive for {} columns, using {}",
            width,
            columns,
            BRICK_FALLBACK_WIDTH
        );
        BRICK_FALLBACK_WIDTH
    }
}

/// Floored layout width before any fallback; may be zero or negative
pub fn fitted_brick_width(canvas_width: f32, columns: u32) -> f32 {
    let columns = columns.max(1) as f32;
    ((canvas_width - 2.0 * BRICK_OFFSET_LEFT - (columns - 1.0) * BRICK_PADDING) / columns).floor()
}

/// Hit points for a new brick; the 3-hit roll may override the 2-hit roll
pub fn roll_hits<R: Rng + ?Sized>(rng: &mut R, round: u32) -> u8 {
    let mut hits = 1;
    if round >= 2 && rng.random::<f32>() < TWO_HIT_CHANCE {
        hits = 2;
    }
    if round >= 3 && rng.random::<f32>() < THREE_HIT_CHANCE {
        hits = 3;
    }
    hits
}

/// Build the brick grid for a round
pub fn generate_grid<R: Rng + ?Sized>(rng: &mut R, round: u32, config: &SimConfig) -> BrickGrid {
    let (columns, rows) = grid_dimensions(round, config);
    let width = brick_width(config.width, columns);

    let total = columns.saturating_mul(rows) as usize;
    let special_count = ((total as f32 * SPECIAL_BRICK_RATIO).floor() as usize)
        .max(1)
        .min(total);
    let mut special = vec![false; total];
    for index in sample(rng, total, special_count) {
        special[index] = true;
    }

    let size = Vec2::new(width, BRICK_HEIGHT);
    let mut grid = Vec::with_capacity(columns as usize);
    let mut index = 0;
    for c in 0..columns {
        let mut column = Vec::with_capacity(rows as usize);
        for r in 0..rows {
            let pos = Vec2::new(
                (c as f32 * (width + BRICK_PADDING) + BRICK_OFFSET_LEFT).floor(),
                (r as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP).floor(),
            );
            let hits = roll_hits(rng, round);
            column.push(Brick::new(pos, size, hits, special[index]));
            index += 1;
        }
        grid.push(column);
    }

    log::info!(
        "Round {}: {}x{} grid, {} special, brick width {}",
        round,
        columns,
        rows,
        special_count,
        width
    );
    BrickGrid::from_columns(grid)
}

/// Recenter the paddle at its initial width and serve one fresh ball upward
pub fn reset_ball_paddle(state: &mut GameState) {
    let (width, height) = (state.config.width, state.config.height);
    state.balls.clear();
    state.paddle = Paddle::centered(width);

    let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    state.add_ball(
        Vec2::new(width / 2.0, height - PADDLE_HEIGHT - BALL_SPAWN_LIFT),
        Vec2::new(BASE_SPEED_X * direction, -BASE_SPEED_Y),
    );
}

/// Begin a round. Round 1 also resets the session (score, quiz progress, clock).
pub fn start_round(state: &mut GameState, round: u32) {
    state.round = round;
    state.pills.clear();
    reset_ball_paddle(state);
    state.bricks = generate_grid(&mut state.rng, round, &state.config);

    if round == 1 {
        state.score = 0;
        state.correct_answers = 0;
        state.questions.reset();
        state.session_time = 0.0;
        state.final_elapsed = None;
        state.push_event(GameEvent::ScoreChanged { score: 0 });
        state.push_event(GameEvent::CorrectCountChanged {
            correct: 0,
            total: state.config.questions_to_win,
        });
    }

    state.quiz = QuizState::Idle;
    state.phase = GamePhase::Playing;
    state.push_event(GameEvent::RoundStarted { round });
}

/// Start a fresh session at round 1
pub fn start_session(state: &mut GameState) {
    log::info!("Starting session (seed {})", state.seed);
    start_round(state, 1);
}

/// Advance or finish when every brick is destroyed.
///
/// Returns true if the round transitioned. A freshly generated grid always
/// has live bricks, so one clear produces exactly one transition.
pub fn check_round_clear(state: &mut GameState) -> bool {
    if state.is_game_over() || !state.bricks.is_cleared() {
        return false;
    }
    if state.correct_answers >= state.config.questions_to_win {
        state.finish(true);
    } else {
        let next = state.round + 1;
        log::info!(
            "Round {} cleared ({}/{} answers), advancing",
            state.round,
            state.correct_answers,
            state.config.questions_to_win
        );
        start_round(state, next);
    }
    true
}
