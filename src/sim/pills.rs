//! Power-up pills: weighted spawn selection, falling, collection and effects

use glam::Vec2;
use rand::Rng;

use super::quiz::trigger_quiz;
use super::round::reset_ball_paddle;
use super::state::{GameEvent, GameState, Pill, PillKind};
use crate::consts::*;
use crate::sign_or_zero;

impl PillKind {
    /// Fixed iteration order used by the weighted selector
    pub const ALL: [PillKind; 6] = [
        PillKind::Quiz,
        PillKind::SpeedUp,
        PillKind::SpeedReset,
        PillKind::MultiBall,
        PillKind::PaddleGrow,
        PillKind::PaddleShrink,
    ];

    /// Spawn probability weight
    pub fn weight(self) -> f32 {
        match self {
            PillKind::Quiz => 0.72,
            PillKind::SpeedUp
            | PillKind::SpeedReset
            | PillKind::MultiBall
            | PillKind::PaddleGrow
            | PillKind::PaddleShrink => 0.056,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            PillKind::Quiz => "quiz",
            PillKind::SpeedUp => "speed_up",
            PillKind::SpeedReset => "speed_reset",
            PillKind::MultiBall => "multi_ball",
            PillKind::PaddleGrow => "paddle_grow",
            PillKind::PaddleShrink => "paddle_shrink",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn color(self) -> u32 {
        match self {
            PillKind::Quiz => 0x5CB85C,
            PillKind::SpeedUp => 0xD9534F,
            PillKind::SpeedReset => 0xFFFFFF,
            PillKind::MultiBall => 0x5BC0DE,
            PillKind::PaddleGrow => 0xF0AD4E,
            PillKind::PaddleShrink => 0x777777,
        }
    }
}

/// Cumulative-distribution draw over [`PillKind::ALL`].
///
/// When quiz is drawn but unavailable the walk continues to the next kind
/// with the same roll instead of re-sampling. Falls back to `SpeedReset`.
pub fn select_kind<R: Rng + ?Sized>(rng: &mut R, quiz_available: bool) -> PillKind {
    let roll: f32 = rng.random();
    let mut cumulative = 0.0;
    for kind in PillKind::ALL {
        cumulative += kind.weight();
        if roll < cumulative {
            if kind == PillKind::Quiz && !quiz_available {
                continue;
            }
            return kind;
        }
    }
    PillKind::SpeedReset
}

/// Drop a pill of a randomly selected kind at `pos`
pub fn spawn_pill(state: &mut GameState, pos: Vec2) {
    let quiz_available = state.questions.has_unsolved();
    let kind = select_kind(&mut state.rng, quiz_available);
    log::debug!("Pill spawned: {} at ({:.0}, {:.0})", kind.tag(), pos.x, pos.y);
    state.pills.push(Pill::new(kind, pos));
    state.push_event(GameEvent::PillSpawned { kind });
}

/// Advance every pill and drop the ones that fell past the bottom edge
pub fn move_pills(state: &mut GameState) {
    let height = state.config.height;
    for pill in &mut state.pills {
        pill.pos += pill.vel;
    }
    state.pills.retain(|p| p.pos.y - PILL_RADIUS <= height);
}

/// A pill is caught when its vertical span touches the paddle band and its
/// center lies strictly inside the paddle's horizontal span
pub fn is_caught(pill: &Pill, paddle_x: f32, paddle_width: f32, band: (f32, f32)) -> bool {
    let (top, bottom) = band;
    pill.pos.y + PILL_RADIUS >= top
        && pill.pos.y - PILL_RADIUS <= bottom
        && pill.pos.x > paddle_x
        && pill.pos.x < paddle_x + paddle_width
}

/// Remove caught pills and apply each effect exactly once
pub fn collect_pills(state: &mut GameState) {
    let height = state.config.height;
    let band = (state.paddle.top(height), state.paddle.bottom(height));
    let (paddle_x, paddle_width) = (state.paddle.x, state.paddle.width);

    let mut collected = Vec::new();
    let mut i = state.pills.len();
    while i > 0 {
        i -= 1;
        if is_caught(&state.pills[i], paddle_x, paddle_width, band) {
            collected.push(state.pills.remove(i).kind);
        }
    }

    for kind in collected {
        log::debug!("Pill collected: {}", kind.tag());
        state.push_event(GameEvent::PillCollected { kind });
        apply_effect(state, kind);
    }
}

/// Effect dispatcher
pub fn apply_effect(state: &mut GameState, kind: PillKind) {
    match kind {
        PillKind::Quiz => {
            trigger_quiz(state);
        }
        PillKind::SpeedUp => {
            for ball in &mut state.balls {
                ball.vel *= SPEED_UP_FACTOR;
            }
        }
        PillKind::SpeedReset => {
            for ball in &mut state.balls {
                ball.vel = Vec2::new(
                    sign_or_zero(ball.vel.x) * BASE_SPEED_X,
                    sign_or_zero(ball.vel.y) * BASE_SPEED_Y,
                );
            }
        }
        PillKind::MultiBall => multi_ball(state),
        PillKind::PaddleGrow => {
            let width = (state.paddle.width * PADDLE_GROW_FACTOR).min(state.paddle.max_width);
            state.paddle.set_width(width, state.config.width);
        }
        PillKind::PaddleShrink => {
            let width = (state.paddle.width * PADDLE_SHRINK_FACTOR).max(state.paddle.min_width);
            state.paddle.set_width(width, state.config.width);
        }
    }
}

/// Apply an effect named by its textual tag; unknown tags are logged and ignored
pub fn apply_tagged(state: &mut GameState, tag: &str) -> bool {
    match PillKind::from_tag(tag) {
        Some(kind) => {
            apply_effect(state, kind);
            true
        }
        None => {
            log::warn!("Unknown pill type {:?}, ignoring", tag);
            false
        }
    }
}

fn multi_ball(state: &mut GameState) {
    let count = state.balls.len();
    if count == 0 {
        reset_ball_paddle(state);
        return;
    }
    if count >= MAX_BALLS {
        return;
    }

    let origin = &state.balls[state.rng.random_range(0..count)];
    let (pos, dy) = (origin.pos, origin.vel.y);
    state.add_ball(
        pos + Vec2::new(MULTI_BALL_OFFSET, 0.0),
        Vec2::new(-BASE_SPEED_X * MULTI_BALL_LEFT_FACTOR, dy),
    );
    state.add_ball(
        pos - Vec2::new(MULTI_BALL_OFFSET, 0.0),
        Vec2::new(BASE_SPEED_X * MULTI_BALL_RIGHT_FACTOR, dy),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Ball, GamePhase, PauseReason};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state() -> GameState {
        let mut state = GameState::with_defaults(7);
        state.phase = GamePhase::Playing;
        state.add_ball(Vec2::new(400.0, 300.0), Vec2::new(BASE_SPEED_X, -BASE_SPEED_Y));
        state
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f32 = PillKind::ALL.iter().map(|k| k.weight()).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tags_round_trip() {
        for kind in PillKind::ALL {
            assert_eq!(PillKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(PillKind::from_tag("laser"), None);
    }

    #[test]
    fn test_quiz_frequency_converges() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let draws = 100_000;
        let quiz = (0..draws)
            .filter(|_| select_kind(&mut rng, true) == PillKind::Quiz)
            .count();
        let freq = quiz as f64 / draws as f64;
        assert!((freq - 0.72).abs() < 0.01, "quiz frequency {freq}");
    }

    #[test]
    fn test_unavailable_quiz_falls_through_to_next_kind() {
        let mut rng = Pcg32::seed_from_u64(99);
        let draws = 20_000;
        let speed_up = (0..draws)
            .map(|_| select_kind(&mut rng, false))
            .inspect(|kind| assert_ne!(*kind, PillKind::Quiz))
            .filter(|kind| *kind == PillKind::SpeedUp)
            .count();
        // Quiz's share lands on speed_up: 0.72 + 0.056
        let freq = speed_up as f64 / draws as f64;
        assert!((freq - 0.776).abs() < 0.02, "speed_up frequency {freq}");
    }

    #[test]
    fn test_speed_up_compounds() {
        let mut state = playing_state();
        apply_effect(&mut state, PillKind::SpeedUp);
        apply_effect(&mut state, PillKind::SpeedUp);
        let expected = BASE_SPEED_X * 1.1 * 1.1;
        assert!((state.balls[0].vel.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_speed_reset_is_idempotent() {
        let mut state = playing_state();
        state.balls[0].vel = Vec2::new(-9.0, 2.5);
        apply_effect(&mut state, PillKind::SpeedReset);
        let once = state.balls[0].vel;
        apply_effect(&mut state, PillKind::SpeedReset);
        assert_eq!(state.balls[0].vel, once);
        assert_eq!(once, Vec2::new(-BASE_SPEED_X, BASE_SPEED_Y));
    }

    #[test]
    fn test_speed_reset_keeps_zero_component() {
        let mut state = playing_state();
        state.balls[0].vel = Vec2::new(0.0, -7.0);
        apply_effect(&mut state, PillKind::SpeedReset);
        assert_eq!(state.balls[0].vel, Vec2::new(0.0, -BASE_SPEED_Y));
    }

    #[test]
    fn test_multi_ball_four_becomes_six() {
        let mut state = playing_state();
        for _ in 0..3 {
            state.add_ball(Vec2::new(200.0, 200.0), Vec2::new(1.0, 2.0));
        }
        apply_effect(&mut state, PillKind::MultiBall);
        assert_eq!(state.balls.len(), 6);
        let left = &state.balls[4];
        let right = &state.balls[5];
        assert!((left.vel.x + BASE_SPEED_X * 0.9).abs() < 1e-5);
        assert!((right.vel.x - BASE_SPEED_X * 1.1).abs() < 1e-5);
        assert_eq!(left.vel.y, right.vel.y);
    }

    #[test]
    fn test_multi_ball_capped_at_five() {
        let mut state = playing_state();
        for _ in 0..4 {
            state.add_ball(Vec2::new(200.0, 200.0), Vec2::new(1.0, 2.0));
        }
        apply_effect(&mut state, PillKind::MultiBall);
        assert_eq!(state.balls.len(), 5);
    }

    #[test]
    fn test_multi_ball_without_balls_respawns() {
        let mut state = playing_state();
        state.balls.clear();
        apply_effect(&mut state, PillKind::MultiBall);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_quiz_pill_opens_quiz() {
        let mut state = playing_state();
        apply_effect(&mut state, PillKind::Quiz);
        assert_eq!(state.phase, GamePhase::Paused(PauseReason::Quiz));
    }

    #[test]
    fn test_unknown_tag_changes_nothing() {
        let mut state = playing_state();
        let before = state.balls[0].vel;
        assert!(!apply_tagged(&mut state, "laser"));
        assert_eq!(state.balls[0].vel, before);
        assert!(apply_tagged(&mut state, "speed_up"));
    }

    #[test]
    fn test_pill_falls_and_leaves() {
        let mut state = playing_state();
        state.pills.push(Pill::new(PillKind::SpeedUp, Vec2::new(10.0, 605.0)));
        move_pills(&mut state);
        assert_eq!(state.pills[0].pos.y, 607.0);
        for _ in 0..2 {
            move_pills(&mut state);
        }
        assert!(state.pills.is_empty());
    }

    #[test]
    fn test_collect_requires_center_inside_paddle() {
        let mut state = playing_state();
        let y = state.paddle.top(600.0);
        let edge = state.paddle.x;
        state.pills.push(Pill::new(PillKind::SpeedUp, Vec2::new(edge, y)));
        state
            .pills
            .push(Pill::new(PillKind::PaddleGrow, Vec2::new(state.paddle.center_x(), y)));
        collect_pills(&mut state);
        assert_eq!(state.pills.len(), 1);
        assert_eq!(state.pills[0].kind, PillKind::SpeedUp);
        assert!((state.paddle.width - PADDLE_INITIAL_WIDTH * 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_ball_helper_base_speed() {
        let ball = Ball::new(Vec2::ZERO, Vec2::new(-3.0, 4.0));
        assert_eq!(ball.base_speed, Vec2::new(3.0, 4.0));
    }

    proptest! {
        #[test]
        fn prop_paddle_resizes_stay_in_bounds(
            start_x in 0.0f32..700.0,
            ops in proptest::collection::vec(any::<bool>(), 1..40),
        ) {
            let mut state = playing_state();
            state.paddle.x = start_x;
            state.paddle.clamp_to(800.0);
            for grow in ops {
                let kind = if grow { PillKind::PaddleGrow } else { PillKind::PaddleShrink };
                apply_effect(&mut state, kind);
                let p = &state.paddle;
                prop_assert!(p.width >= p.min_width && p.width <= p.max_width);
                prop_assert!(p.x >= 0.0);
                prop_assert!(p.x + p.width <= 800.0 + 1e-3);
            }
        }
    }
}
