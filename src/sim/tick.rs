//! Fixed timestep simulation tick
//!
//! Core game loop step: input, quiz resume countdown, then physics, bricks,
//! round progression and pill collection, in that order.

use glam::Vec2;

use super::collision::{ball_hits_brick, bounce_off_paddle, deflect_off_brick, reflect_off_walls};
use super::pills::{collect_pills, move_pills, spawn_pill};
use super::quiz::{advance_resume, submit_answer};
use super::round::{check_round_clear, reset_ball_paddle};
use super::state::{GameEvent, GamePhase, GameState, PauseReason};
use crate::consts::*;
use crate::error::GameError;

/// Input for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Left direction held
    pub left: bool,
    /// Right direction held
    pub right: bool,
    /// Pause toggle (ignored while a quiz is open)
    pub toggle_pause: bool,
    /// Answer submitted from the quiz modal
    pub answer: Option<String>,
}

/// Advance the game state by one fixed timestep.
///
/// `dt` only drives timers (session clock, quiz resume delay); movement is per tick.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), GameError> {
    if matches!(state.phase, GamePhase::Ready | GamePhase::GameOver { .. }) {
        return Ok(());
    }

    state.time_ticks += 1;
    state.session_time += dt as f64;

    if input.toggle_pause && !state.quiz.is_open() {
        toggle_manual_pause(state);
    }
    if let Some(answer) = &input.answer {
        submit_answer(state, answer);
    }
    advance_resume(state, dt);

    if state.phase != GamePhase::Playing {
        return Ok(());
    }

    move_balls(state);
    state.paddle.steer(input.left, input.right, state.config.width);
    move_pills(state);
    collide_bricks(state);
    if check_round_clear(state) && state.is_game_over() {
        return Ok(());
    }
    collect_pills(state);

    check_finite(state)
}

fn toggle_manual_pause(state: &mut GameState) {
    match state.phase {
        GamePhase::Playing => {
            state.phase = GamePhase::Paused(PauseReason::Manual);
            state.push_event(GameEvent::ManualPaused);
        }
        GamePhase::Paused(PauseReason::Manual) => {
            state.phase = GamePhase::Playing;
            state.push_event(GameEvent::ManualResumed);
        }
        _ => {}
    }
}

/// Integrate, reflect off walls and paddle, drop balls that left the bottom
fn move_balls(state: &mut GameState) {
    let (width, height) = (state.config.width, state.config.height);
    for ball in &mut state.balls {
        ball.pos += ball.vel;
        reflect_off_walls(ball, width);
        bounce_off_paddle(ball, &state.paddle, height);
    }
    state.balls.retain(|b| b.top() <= height);

    if state.balls.is_empty() {
        log::debug!("All balls lost, serving a new one");
        reset_ball_paddle(state);
    }
}

/// One brick hit per ball per tick, scanning column-major.
/// Newest balls resolve first, so they win a shared brick.
fn collide_bricks(state: &mut GameState) {
    let mut drops: Vec<Vec2> = Vec::new();
    let mut destroyed = 0u64;

    for ball in state.balls.iter_mut().rev() {
        let Some(brick) = state
            .bricks
            .iter_mut()
            .find(|brick| ball_hits_brick(ball, brick))
        else {
            continue;
        };

        deflect_off_brick(ball, brick);
        if brick.hit() {
            destroyed += 1;
            if brick.special {
                drops.push(brick.center());
            }
        }
    }

    if destroyed > 0 {
        state.score += destroyed * BRICK_SCORE;
        state.push_event(GameEvent::ScoreChanged { score: state.score });
    }
    for pos in drops {
        spawn_pill(state, pos);
    }
}

fn check_finite(state: &GameState) -> Result<(), GameError> {
    if let Some(ball) = state
        .balls
        .iter()
        .find(|b| !(b.pos.is_finite() && b.vel.is_finite()))
    {
        return Err(GameError::TickFault(format!(
            "ball left the number line at {:?} moving {:?}",
            ball.pos, ball.vel
        )));
    }
    if let Some(pill) = state.pills.iter().find(|p| !p.pos.is_finite()) {
        return Err(GameError::TickFault(format!(
            "{} pill at invalid position {:?}",
            pill.kind.tag(),
            pill.pos
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::round::start_session;
    use crate::sim::state::{Ball, Brick, BrickGrid, Pill, PillKind};
    use crate::sim::quiz::QuizState;

    fn session(seed: u64) -> GameState {
        let mut state = GameState::with_defaults(seed);
        start_session(&mut state);
        state.drain_events();
        state
    }

    fn step(state: &mut GameState, input: &TickInput) {
        tick(state, input, SIM_DT).unwrap();
    }

    #[test]
    fn test_ready_state_does_not_tick() {
        let mut state = GameState::with_defaults(1);
        step(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.phase, GamePhase::Ready);
    }

    #[test]
    fn test_tick_moves_ball() {
        let mut state = session(12345);
        let before = state.balls[0].pos;
        step(&mut state, &TickInput::default());
        assert_eq!(state.balls[0].pos, before + state.balls[0].vel);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = session(12345);
        let toggle = TickInput {
            toggle_pause: true,
            ..Default::default()
        };
        step(&mut state, &toggle);
        assert_eq!(state.phase, GamePhase::Paused(PauseReason::Manual));

        // Frozen while paused
        let pos = state.balls[0].pos;
        step(&mut state, &TickInput::default());
        assert_eq!(state.balls[0].pos, pos);

        step(&mut state, &toggle);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pause_toggle_ignored_while_quiz_open() {
        let mut state = session(3);
        state.phase = GamePhase::Paused(PauseReason::Quiz);
        state.quiz = QuizState::Open { question_id: 1 };
        step(
            &mut state,
            &TickInput {
                toggle_pause: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Paused(PauseReason::Quiz));
    }

    #[test]
    fn test_no_paddle_movement_while_paused() {
        let mut state = session(3);
        state.phase = GamePhase::Paused(PauseReason::Manual);
        let x = state.paddle.x;
        step(
            &mut state,
            &TickInput {
                left: true,
                ..Default::default()
            },
        );
        assert_eq!(state.paddle.x, x);
    }

    #[test]
    fn test_lost_ball_respawns() {
        let mut state = session(4);
        state.balls[0].pos = Vec2::new(50.0, 620.0);
        state.balls[0].vel = Vec2::new(0.0, 4.0);
        step(&mut state, &TickInput::default());
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].vel.y < 0.0);
    }

    #[test]
    fn test_one_brick_hit_per_tick() {
        let mut state = session(5);
        let size = Vec2::new(80.0, 20.0);
        state.bricks = BrickGrid::from_columns(vec![vec![
            Brick::new(Vec2::new(360.0, 300.0), size, 1, false),
            Brick::new(Vec2::new(360.0, 300.0), size, 1, false),
        ]]);
        state.balls = vec![Ball::new(Vec2::new(400.0, 325.0), Vec2::new(0.0, -4.0))];
        step(&mut state, &TickInput::default());
        assert_eq!(state.bricks.live_count(), 1);
        assert_eq!(state.score, 10);
        assert!(state.balls[0].vel.y > 0.0);
    }

    #[test]
    fn test_newest_ball_takes_shared_brick() {
        let mut state = session(5);
        let size = Vec2::new(80.0, 20.0);
        state.bricks = BrickGrid::from_columns(vec![vec![
            Brick::new(Vec2::new(360.0, 300.0), size, 1, false),
            Brick::new(Vec2::new(20.0, 40.0), size, 1, false),
        ]]);
        state.balls = vec![
            Ball::new(Vec2::new(380.0, 325.0), Vec2::new(0.0, -4.0)),
            Ball::new(Vec2::new(420.0, 325.0), Vec2::new(0.0, -4.0)),
        ];
        step(&mut state, &TickInput::default());

        assert_eq!(state.bricks.live_count(), 1);
        assert_eq!(state.score, 10);
        // First ball passes through, second one bounces
        assert!(state.balls[0].vel.y < 0.0);
        assert!(state.balls[1].vel.y > 0.0);
    }

    #[test]
    fn test_special_brick_drops_pill() {
        let mut state = session(6);
        state.bricks = BrickGrid::from_columns(vec![vec![
            Brick::new(Vec2::new(360.0, 300.0), Vec2::new(80.0, 20.0), 1, true),
            Brick::new(Vec2::new(20.0, 40.0), Vec2::new(80.0, 20.0), 1, false),
        ]]);
        state.balls = vec![Ball::new(Vec2::new(400.0, 325.0), Vec2::new(0.0, -4.0))];
        step(&mut state, &TickInput::default());
        assert_eq!(state.pills.len(), 1);
        assert_eq!(state.pills[0].pos, Vec2::new(400.0, 310.0));
    }

    #[test]
    fn test_single_brick_clear_advances_round() {
        let mut state = session(77);
        state.bricks = BrickGrid::from_columns(vec![vec![Brick::new(
            Vec2::new(360.0, 500.0),
            Vec2::new(80.0, 20.0),
            1,
            false,
        )]]);
        state.balls = vec![Ball::new(
            Vec2::new(400.0, 555.0),
            Vec2::new(BASE_SPEED_X, -BASE_SPEED_Y),
        )];

        let mut ticks = 0;
        while state.round == 1 {
            step(&mut state, &TickInput::default());
            ticks += 1;
            assert!(ticks < 50, "brick never cleared");
        }
        assert_eq!(state.round, 2);
        assert_eq!(state.score, 10);
        assert!(!state.is_game_over());
        assert!(state.bricks.live_count() > 0);
    }

    #[test]
    fn test_forced_clear_transitions_exactly_once() {
        let mut state = session(21);
        for brick in state.bricks.iter_mut() {
            brick.status = 0;
        }
        step(&mut state, &TickInput::default());
        assert_eq!(state.round, 2);
        step(&mut state, &TickInput::default());
        assert_eq!(state.round, 2);
        let starts = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::RoundStarted { .. }))
            .count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_quiz_pill_suspends_simulation() {
        let mut state = session(9);
        let y = state.paddle.top(600.0) - 1.0;
        state
            .pills
            .push(Pill::new(PillKind::Quiz, Vec2::new(state.paddle.center_x(), y)));
        step(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Paused(PauseReason::Quiz));
        assert!(state.quiz.is_open());

        let pos = state.balls[0].pos;
        step(&mut state, &TickInput::default());
        assert_eq!(state.balls[0].pos, pos);
    }

    #[test]
    fn test_answer_then_resume_after_delay() {
        let mut state = session(10);
        state.phase = GamePhase::Paused(PauseReason::Quiz);
        state.quiz = QuizState::Open { question_id: 3 };
        step(
            &mut state,
            &TickInput {
                answer: Some("이방인".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(state.score, 50);
        assert!(state.is_paused());

        let mut ticks = 0;
        while state.is_paused() {
            step(&mut state, &TickInput::default());
            ticks += 1;
        }
        // 1 second at 16 ms per tick
        assert!((61..=64).contains(&ticks), "resumed after {ticks} ticks");
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_answer_ignored_without_modal() {
        let mut state = session(10);
        step(
            &mut state,
            &TickInput {
                answer: Some("이방인".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_non_finite_ball_is_a_fault() {
        let mut state = session(13);
        state.balls[0].vel = Vec2::new(f32::NAN, 1.0);
        let result = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(matches!(result, Err(GameError::TickFault(_))));
    }

    #[test]
    fn test_game_over_ignores_ticks() {
        let mut state = session(14);
        state.finish(false);
        let ticks = state.time_ticks;
        step(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = session(99999);
        let mut state2 = session(99999);
        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                right: true,
                ..Default::default()
            },
        ];
        for _ in 0..300 {
            for input in &inputs {
                step(&mut state1, input);
                step(&mut state2, input);
            }
        }
        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.balls.len(), state2.balls.len());
        assert_eq!(state1.paddle.x, state2.paddle.x);
    }
}
