//! Error taxonomy
//!
//! Setup failures are fatal before the first tick; tick faults stop the
//! running session. Recoverable problems (degenerate grids, unknown pill tags)
//! never surface here; they are logged and replaced with safe defaults.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Settings that can never produce a playable session
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Render surface or display sinks are unusable
    #[error("setup failed: {0}")]
    Setup(String),

    #[error("failed to read settings from {path}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings")]
    SettingsParse(#[from] serde_json::Error),

    /// Unexpected fault inside a simulation tick (fail-stop)
    #[error("simulation fault: {0}")]
    TickFault(String),
}

impl GameError {
    /// True for errors that prevent a session from ever starting
    pub fn is_fatal_setup(&self) -> bool {
        !matches!(self, GameError::TickFault(_))
    }
}
