//! Game settings
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;
use crate::sim::round::fitted_brick_width;
use crate::sim::{Question, SimConfig, default_questions};

/// Game settings/configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Surface ===
    /// Logical render width
    pub canvas_width: f32,
    /// Logical render height
    pub canvas_height: f32,

    // === Timing ===
    /// Simulation tick interval
    pub tick_interval_ms: u32,
    /// HUD timer refresh interval
    pub timer_interval_ms: u32,

    // === Session ===
    /// Fixed run seed (random per session when absent)
    pub seed: Option<u64>,
    /// Correct answers needed before clearing a round wins the game
    pub questions_to_win: u32,
    /// Round 1 grid columns
    pub base_columns: u32,
    /// Round 1 grid rows
    pub base_rows: u32,

    // === Content ===
    /// Quiz question pool
    pub questions: Vec<Question>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            tick_interval_ms: (SIM_DT * 1000.0).round() as u32,
            timer_interval_ms: (TIMER_PERIOD * 1000.0).round() as u32,

            seed: None,
            questions_to_win: QUESTIONS_TO_WIN,
            base_columns: BASE_COLUMNS,
            base_rows: BASE_ROWS,

            questions: default_questions(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path).map_err(|source| GameError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings that can never produce a playable session
    pub fn validate(&self) -> Result<(), GameError> {
        if !(self.canvas_width.is_finite() && self.canvas_height.is_finite()) {
            return Err(GameError::Config("canvas size must be finite".into()));
        }
        if self.canvas_width < PADDLE_MAX_WIDTH {
            return Err(GameError::Config(format!(
                "canvas width {} is narrower than the widest paddle ({})",
                self.canvas_width, PADDLE_MAX_WIDTH
            )));
        }
        let paddle_band = PADDLE_HEIGHT + PADDLE_BOTTOM_MARGIN + BALL_SPAWN_LIFT + BALL_RADIUS;
        if self.canvas_height <= paddle_band {
            return Err(GameError::Config(format!(
                "canvas height {} leaves no room above the paddle",
                self.canvas_height
            )));
        }
        let widest = self.base_columns.saturating_add(MAX_EXTRA_COLUMNS);
        if widest > MAX_GRID_COLUMNS
            || fitted_brick_width(self.canvas_width, widest) < BRICK_FALLBACK_WIDTH
        {
            return Err(GameError::Config(format!(
                "base_columns {} does not fit a {}px canvas",
                self.base_columns, self.canvas_width
            )));
        }
        let tallest = self.base_rows.saturating_add(MAX_EXTRA_ROWS);
        if tallest > MAX_GRID_ROWS {
            return Err(GameError::Config(format!(
                "base_rows {} exceeds the grid limit ({} rows after growth)",
                self.base_rows, MAX_GRID_ROWS
            )));
        }
        if self.tick_interval_ms == 0 || self.timer_interval_ms == 0 {
            return Err(GameError::Config("tick intervals must be positive".into()));
        }
        if self.questions_to_win == 0 {
            return Err(GameError::Config("questions_to_win must be at least 1".into()));
        }
        if self.questions_to_win as usize > self.questions.len() {
            return Err(GameError::Config(format!(
                "questions_to_win ({}) exceeds the question pool ({})",
                self.questions_to_win,
                self.questions.len()
            )));
        }
        let mut ids: Vec<u32> = self.questions.iter().map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.questions.len() {
            return Err(GameError::Config("question ids must be unique".into()));
        }
        Ok(())
    }

    /// Simulation tick length in seconds
    pub fn tick_dt(&self) -> f32 {
        self.tick_interval_ms as f32 / 1000.0
    }

    /// HUD timer period in seconds
    pub fn timer_period(&self) -> f32 {
        self.timer_interval_ms as f32 / 1000.0
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            width: self.canvas_width,
            height: self.canvas_height,
            questions_to_win: self.questions_to_win,
            base_columns: self.base_columns,
            base_rows: self.base_rows,
        }
    }
}
