//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; the tick is the only writer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::quiz::{QuestionPool, QuizState, default_questions};
use crate::consts::*;

/// Why the simulation is suspended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseReason {
    /// Player toggled pause
    Manual,
    /// A quiz is open or its resume delay is running
    Quiz,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created but no round has been started yet
    Ready,
    /// Active gameplay
    Playing,
    /// Simulation frozen, rendering continues
    Paused(PauseReason),
    /// Session ended; ticks are ignored until restart
    GameOver { won: bool },
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Velocity in pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Speed magnitude per axis captured at spawn, used by paddle deflection
    pub base_speed: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            base_speed: vel.abs(),
        }
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.radius
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.radius
    }
}

/// The player's paddle; y is derived from the canvas height
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per tick
    pub speed: f32,
    pub min_width: f32,
    pub max_width: f32,
}

impl Paddle {
    /// Paddle at its initial width, centered on a canvas
    pub fn centered(canvas_width: f32) -> Self {
        Self {
            x: ((canvas_width - PADDLE_INITIAL_WIDTH) / 2.0).floor(),
            width: PADDLE_INITIAL_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            min_width: PADDLE_MIN_WIDTH,
            max_width: PADDLE_MAX_WIDTH,
        }
    }

    /// Top edge of the paddle's vertical band
    pub fn top(&self, canvas_height: f32) -> f32 {
        canvas_height - self.height - PADDLE_BOTTOM_MARGIN
    }

    /// Bottom edge of the paddle's vertical band
    pub fn bottom(&self, canvas_height: f32) -> f32 {
        canvas_height - PADDLE_BOTTOM_MARGIN
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Resize within [min_width, max_width] and keep the paddle on-screen
    pub fn set_width(&mut self, width: f32, canvas_width: f32) {
        self.width = width.clamp(self.min_width, self.max_width);
        self.clamp_to(canvas_width);
    }

    pub fn clamp_to(&mut self, canvas_width: f32) {
        self.x = self.x.clamp(0.0, (canvas_width - self.width).max(0.0));
    }

    /// Move one tick in the held direction; right wins when both are held
    pub fn steer(&mut self, left: bool, right: bool, canvas_width: f32) {
        if right && self.x < canvas_width - self.width {
            self.x += self.speed;
        } else if left && self.x > 0.0 {
            self.x -= self.speed;
        }
        self.clamp_to(canvas_width);
    }
}

/// A brick in the round grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub pos: Vec2,
    pub size: Vec2,
    /// Hits remaining (0 = destroyed)
    pub status: u8,
    /// Drops a pill when destroyed
    pub special: bool,
    /// Hit-tier color chosen at generation
    pub base_color: u32,
}

impl Brick {
    pub fn new(pos: Vec2, size: Vec2, status: u8, special: bool) -> Self {
        Self {
            pos,
            size,
            status,
            special,
            base_color: tier_color(status),
        }
    }

    pub fn is_live(&self) -> bool {
        self.status > 0
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Take one hit; returns true when this hit destroyed the brick
    pub fn hit(&mut self) -> bool {
        self.status = self.status.saturating_sub(1);
        self.status == 0
    }
}

/// Color for a brick tier (1-3 hits)
pub fn tier_color(status: u8) -> u32 {
    match status {
        3 => 0xD9534F,
        2 => 0xF0AD4E,
        _ => 0x0095DD,
    }
}

/// Brick grid indexed `[column][row]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrickGrid {
    columns: Vec<Vec<Brick>>,
}

impl BrickGrid {
    pub fn from_columns(columns: Vec<Vec<Brick>>) -> Self {
        Self { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Brick> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    pub fn get_mut(&mut self, column: usize, row: usize) -> Option<&mut Brick> {
        self.columns.get_mut(column).and_then(|c| c.get_mut(row))
    }

    /// Column-major iteration
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.columns.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Brick> {
        self.columns.iter_mut().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn live_count(&self) -> usize {
        self.iter().filter(|b| b.is_live()).count()
    }

    /// A non-empty grid with every brick destroyed
    pub fn is_cleared(&self) -> bool {
        !self.is_empty() && self.iter().all(|b| !b.is_live())
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillKind {
    Quiz,
    SpeedUp,
    SpeedReset,
    MultiBall,
    PaddleGrow,
    PaddleShrink,
}

/// A falling collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pill {
    pub kind: PillKind,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
}

impl Pill {
    pub fn new(kind: PillKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            vel: Vec2::new(0.0, PILL_SPEED),
        }
    }
}

/// One `(question, answer)` line in the win results listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: u32,
    pub question: String,
    pub answer: String,
}

/// Produced once when a session ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverPayload {
    pub won: bool,
    pub elapsed_seconds: u64,
    /// Filled only on a win
    pub results: Vec<QuizResult>,
}

/// Notifications for the host, drained after each tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted { round: u32 },
    ScoreChanged { score: u64 },
    CorrectCountChanged { correct: u32, total: u32 },
    PillSpawned { kind: PillKind },
    PillCollected { kind: PillKind },
    QuizOpened { question_id: u32, prompt: String },
    QuizAnswered { correct: bool, feedback: String },
    QuizResumed,
    ManualPaused,
    ManualResumed,
    GameOver(GameOverPayload),
}

/// Session-wide tunables derived from settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub width: f32,
    pub height: f32,
    pub questions_to_win: u32,
    pub base_columns: u32,
    pub base_rows: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            questions_to_win: QUESTIONS_TO_WIN,
            base_columns: BASE_COLUMNS,
            base_rows: BASE_ROWS,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub config: SimConfig,
    /// Current round (1-based)
    pub round: u32,
    /// Persists across rounds; reset on round 1
    pub score: u64,
    /// Distinct questions solved this session
    pub correct_answers: u32,
    pub phase: GamePhase,
    pub quiz: QuizState,
    /// Seconds since the session started (advances while paused, like a wall clock)
    pub session_time: f64,
    /// Frozen elapsed seconds once the game is over
    pub final_elapsed: Option<u64>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: BrickGrid,
    pub pills: Vec<Pill>,
    pub questions: QuestionPool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session in `Ready`; call `round::start_session` to begin play
    pub fn new(seed: u64, config: SimConfig, questions: QuestionPool) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            round: 0,
            score: 0,
            correct_answers: 0,
            phase: GamePhase::Ready,
            quiz: QuizState::Idle,
            session_time: 0.0,
            final_elapsed: None,
            time_ticks: 0,
            paddle: Paddle::centered(config.width),
            balls: Vec::new(),
            bricks: BrickGrid::default(),
            pills: Vec::new(),
            questions,
            events: Vec::new(),
        }
    }

    /// Default canvas and the built-in question pool
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(
            seed,
            SimConfig::default(),
            QuestionPool::new(default_questions()),
        )
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, GamePhase::Paused(_))
    }

    pub fn is_manually_paused(&self) -> bool {
        self.phase == GamePhase::Paused(PauseReason::Manual)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    /// Whole seconds since session start (frozen at game over)
    pub fn elapsed_seconds(&self) -> u64 {
        self.final_elapsed
            .unwrap_or_else(|| self.session_time.max(0.0).floor() as u64)
    }

    /// Spawn a ball; base speed is taken from the velocity magnitude
    pub fn add_ball(&mut self, pos: Vec2, vel: Vec2) {
        self.balls.push(Ball::new(pos, vel));
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// End the session, freeze the clock and publish the payload
    pub fn finish(&mut self, won: bool) {
        if self.is_game_over() {
            return;
        }
        let elapsed_seconds = self.elapsed_seconds();
        self.final_elapsed = Some(elapsed_seconds);
        self.phase = GamePhase::GameOver { won };

        let results = if won {
            self.questions
                .iter()
                .map(|q| QuizResult {
                    id: q.id,
                    question: q.prompt.clone(),
                    answer: q.answer.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };

        log::info!(
            "Game over ({}) after {}s, score {}",
            if won { "win" } else { "loss" },
            elapsed_seconds,
            self.score
        );
        self.push_event(GameEvent::GameOver(GameOverPayload {
            won,
            elapsed_seconds,
            results,
        }));
    }

    /// Stop after an internal fault: no payload, pending events dropped
    pub fn halt(&mut self) {
        if self.final_elapsed.is_none() {
            self.final_elapsed = Some(self.elapsed_seconds());
        }
        self.phase = GamePhase::GameOver { won: false };
        self.events.clear();
    }
}
