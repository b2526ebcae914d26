//! Seams to the host's render surface and display sinks
//!
//! The core only pushes values through these; it never reads them back.

use crate::sim::GameOverPayload;

/// A fixed-size drawing target with rectangle fills.
/// Colors are `0xRRGGBB`.
pub trait RenderSurface {
    /// Logical size (width, height)
    fn size(&self) -> (f32, f32);
    fn clear(&mut self, color: u32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: u32);
}

/// Score/timer/round displays, the quiz modal and blocking notices
pub trait Hud {
    fn set_score(&mut self, score: u64);
    fn set_correct_count(&mut self, correct: u32, total: u32);
    fn set_elapsed(&mut self, seconds: u64);
    fn set_round(&mut self, round: u32);
    /// Show the quiz modal with a prompt, or hide it with `None`
    fn show_quiz(&mut self, prompt: Option<&str>);
    fn set_feedback(&mut self, text: &str);
    /// Center-screen message ("PAUSED", "GET READY!"), `None` hides it
    fn set_banner(&mut self, text: Option<&str>);
    /// Blocking notice for fatal problems
    fn notice(&mut self, message: &str);
    fn game_over(&mut self, payload: &GameOverPayload);
}
