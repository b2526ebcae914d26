//! Host-facing driver: schedules ticks, routes events to the HUD, renders

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::error::GameError;
use crate::renderer;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, QuestionPool, start_session, tick};

use super::host::{Hud, RenderSurface};
use super::input::{InputEvent, InputQueue};
use super::time::FixedSchedule;

pub const BANNER_PAUSED: &str = "PAUSED";
pub const BANNER_GET_READY: &str = "GET READY!";
pub const FAULT_NOTICE: &str = "The game stopped because of an internal error.";

/// One running game bound to a render surface and a HUD
pub struct GameLoop<S: RenderSurface, H: Hud> {
    settings: Settings,
    state: GameState,
    surface: S,
    hud: H,
    input: InputQueue,
    sim_schedule: FixedSchedule,
    timer_schedule: FixedSchedule,
    last_time: Option<f64>,
    sessions: u64,
}

impl<S: RenderSurface, H: Hud> GameLoop<S, H> {
    /// Validate settings and surface. Failures are shown as a notice and returned.
    pub fn new(settings: Settings, surface: S, mut hud: H) -> Result<Self, GameError> {
        if let Err(err) = check_setup(&settings, &surface) {
            log::error!("Setup failed: {err}");
            hud.notice(&err.to_string());
            return Err(err);
        }

        let state = new_state(&settings, 0);
        let sim_schedule = FixedSchedule::new(settings.tick_dt() as f64, MAX_SUBSTEPS);
        let timer_schedule = FixedSchedule::new(settings.timer_period() as f64, 1);

        Ok(Self {
            settings,
            state,
            surface,
            hud,
            input: InputQueue::default(),
            sim_schedule,
            timer_schedule,
            last_time: None,
            sessions: 0,
        })
    }

    /// Start (or restart) a session at round 1 and arm both schedules
    pub fn start(&mut self) {
        self.cancel_schedules();
        self.state = new_state(&self.settings, self.sessions);
        self.sessions += 1;
        self.input.clear();
        self.last_time = None;

        start_session(&mut self.state);
        self.hud.set_elapsed(0);
        self.hud.set_banner(None);
        self.hud.show_quiz(None);
        self.hud.set_feedback("");
        self.dispatch_events();

        self.sim_schedule.arm();
        self.timer_schedule.arm();
        self.render();
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Restart => {
                log::info!("Restart requested");
                self.start();
            }
            other => self.input.push(other),
        }
    }

    /// Advance by host time `now` (seconds). Runs due ticks, then due timer
    /// refreshes, then draws one frame.
    pub fn update(&mut self, now: f64) -> Result<(), GameError> {
        let dt = match self.last_time {
            Some(last) => (now - last).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_time = Some(now);

        let due = self.sim_schedule.advance(dt);
        for _ in 0..due {
            self.run_tick()?;
            if !self.sim_schedule.is_armed() {
                break;
            }
        }

        let refreshes = self.timer_schedule.advance(dt);
        for _ in 0..refreshes {
            self.refresh_timer();
        }

        self.render();
        Ok(())
    }

    /// Run exactly one simulation tick with the next polled input.
    ///
    /// A tick that errors or panics halts the game and returns `TickFault`.
    pub fn run_tick(&mut self) -> Result<(), GameError> {
        if self.state.is_game_over() {
            return Ok(());
        }
        let input = self.input.poll();
        let dt = self.settings.tick_dt();
        let state = &mut self.state;

        let result = match panic::catch_unwind(AssertUnwindSafe(|| tick(state, &input, dt))) {
            Ok(result) => result,
            Err(payload) => Err(GameError::TickFault(panic_message(payload))),
        };

        match result {
            Ok(()) => {
                self.dispatch_events();
                if self.state.is_game_over() {
                    self.cancel_schedules();
                }
                Ok(())
            }
            Err(err) => {
                self.fail_stop(&err);
                Err(err)
            }
        }
    }

    /// Push the elapsed clock to the HUD unless paused or over
    pub fn refresh_timer(&mut self) {
        if self.state.is_paused() || self.state.is_game_over() {
            return;
        }
        self.hud.set_elapsed(self.state.elapsed_seconds());
    }

    pub fn is_running(&self) -> bool {
        self.sim_schedule.is_armed()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    pub fn hud_mut(&mut self) -> &mut H {
        &mut self.hud
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn fail_stop(&mut self, err: &GameError) {
        log::error!("Simulation halted: {err}");
        self.cancel_schedules();
        self.state.halt();
        self.hud.notice(FAULT_NOTICE);
    }

    fn cancel_schedules(&mut self) {
        self.sim_schedule.cancel();
        self.timer_schedule.cancel();
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::RoundStarted { round } => {
                    self.hud.set_round(round);
                    self.hud.show_quiz(None);
                    self.hud.set_banner(None);
                }
                GameEvent::ScoreChanged { score } => self.hud.set_score(score),
                GameEvent::CorrectCountChanged { correct, total } => {
                    self.hud.set_correct_count(correct, total)
                }
                GameEvent::QuizOpened { prompt, .. } => {
                    self.hud.set_feedback("");
                    self.hud.show_quiz(Some(&prompt));
                }
                GameEvent::QuizAnswered { feedback, .. } => {
                    self.hud.set_feedback(&feedback);
                    self.hud.show_quiz(None);
                    self.hud.set_banner(Some(BANNER_GET_READY));
                }
                GameEvent::QuizResumed | GameEvent::ManualResumed => self.hud.set_banner(None),
                GameEvent::ManualPaused => self.hud.set_banner(Some(BANNER_PAUSED)),
                GameEvent::GameOver(payload) => {
                    self.hud.set_banner(None);
                    self.hud.game_over(&payload);
                }
                GameEvent::PillSpawned { .. } | GameEvent::PillCollected { .. } => {}
            }
        }
    }

    fn render(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        renderer::draw_frame(&self.state, &mut self.surface);
    }
}

fn check_setup<S: RenderSurface>(settings: &Settings, surface: &S) -> Result<(), GameError> {
    settings.validate()?;
    let (width, height) = surface.size();
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(GameError::Setup(format!(
            "render surface has no usable area ({width}x{height})"
        )));
    }
    if (width, height) != (settings.canvas_width, settings.canvas_height) {
        log::warn!(
            "Surface is {}x{} but the logical canvas is {}x{}",
            width,
            height,
            settings.canvas_width,
            settings.canvas_height
        );
    }
    Ok(())
}

fn new_state(settings: &Settings, session: u64) -> GameState {
    let seed = settings
        .seed
        .map(|seed| seed.wrapping_add(session))
        .unwrap_or_else(rand::random);
    GameState::new(
        seed,
        settings.sim_config(),
        QuestionPool::new(settings.questions.clone()),
    )
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
