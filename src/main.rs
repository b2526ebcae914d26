//! Quiz Breakout entry point
//!
//! Native builds run a headless session: an autopilot steers the paddle and
//! answers quizzes, and the game-over payload is printed as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use quiz_breakout::renderer::DrawList;
    use quiz_breakout::sim::{Ball, GameOverPayload, GameState, QuizState};
    use quiz_breakout::{GameLoop, Hud, InputEvent, Settings};

    #[derive(Parser, Debug)]
    #[command(name = "quiz-breakout")]
    #[command(about = "Headless Quiz Breakout session driven by an autopilot")]
    pub struct Cli {
        /// JSON settings file (defaults apply to missing fields)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Fixed run seed (overrides the settings file)
        #[arg(long)]
        seed: Option<u64>,
        /// Give up after this many simulation ticks
        #[arg(long, default_value_t = 200_000)]
        max_ticks: u64,
        /// Chance of answering a quiz wrong on purpose
        #[arg(long, default_value_t = 0.25)]
        wrong_answer_rate: f64,
    }

    /// HUD that reports through the log
    #[derive(Debug, Default)]
    pub struct ConsoleHud {
        pub payload: Option<GameOverPayload>,
        pub notices: Vec<String>,
    }

    impl Hud for ConsoleHud {
        fn set_score(&mut self, score: u64) {
            log::debug!("SCORE: {score}");
        }

        fn set_correct_count(&mut self, correct: u32, total: u32) {
            log::info!("QUIZ: {correct} / {total}");
        }

        fn set_elapsed(&mut self, seconds: u64) {
            log::trace!("TIME: {seconds}s");
        }

        fn set_round(&mut self, round: u32) {
            log::info!("ROUND: {round}");
        }

        fn show_quiz(&mut self, prompt: Option<&str>) {
            if let Some(prompt) = prompt {
                log::info!("QUIZ: {prompt}");
            }
        }

        fn set_feedback(&mut self, text: &str) {
            if !text.is_empty() {
                log::info!("{text}");
            }
        }

        fn set_banner(&mut self, text: Option<&str>) {
            if let Some(text) = text {
                log::debug!("[{text}]");
            }
        }

        fn notice(&mut self, message: &str) {
            log::error!("{message}");
            self.notices.push(message.to_string());
        }

        fn game_over(&mut self, payload: &GameOverPayload) {
            self.payload = Some(payload.clone());
        }
    }

    /// Keeps the paddle under the most urgent ball and answers open quizzes
    pub struct Autopilot {
        rng: Pcg32,
        wrong_answer_rate: f64,
        answered: Option<u32>,
        held: (bool, bool),
    }

    impl Autopilot {
        pub fn new(seed: u64, wrong_answer_rate: f64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed),
                wrong_answer_rate: wrong_answer_rate.clamp(0.0, 1.0),
                answered: None,
                held: (false, false),
            }
        }

        /// Inputs for the next tick
        pub fn plan(&mut self, state: &GameState) -> Vec<InputEvent> {
            let mut events = Vec::new();

            let held = steer(state);
            if held != self.held {
                events.push(InputEvent::Left(held.0));
                events.push(InputEvent::Right(held.1));
                self.held = held;
            }

            match state.quiz {
                QuizState::Open { question_id } if self.answered != Some(question_id) => {
                    self.answered = Some(question_id);
                    events.push(InputEvent::SubmitAnswer(self.answer_for(state, question_id)));
                }
                QuizState::Idle => self.answered = None,
                _ => {}
            }
            events
        }

        fn answer_for(&mut self, state: &GameState, question_id: u32) -> String {
            let wrong = self.rng.random_bool(self.wrong_answer_rate);
            match state.questions.get(question_id) {
                Some(question) if !wrong => question.answer.clone(),
                _ => String::from("?"),
            }
        }
    }

    /// Follow the lowest descending ball, or the lowest ball if none descend
    fn steer(state: &GameState) -> (bool, bool) {
        let by_height = |a: &&Ball, b: &&Ball| a.pos.y.total_cmp(&b.pos.y);
        let target = state
            .balls
            .iter()
            .filter(|b| b.vel.y > 0.0)
            .max_by(by_height)
            .or_else(|| state.balls.iter().max_by(by_height));

        let Some(ball) = target else {
            return (false, false);
        };
        let offset = ball.pos.x - state.paddle.center_x();
        let dead_zone = state.paddle.speed;
        (offset < -dead_zone, offset > dead_zone)
    }

    pub fn run(cli: Cli) -> Result<()> {
        let mut settings = match &cli.settings {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if cli.seed.is_some() {
            settings.seed = cli.seed;
        }

        let surface = DrawList::new(settings.canvas_width, settings.canvas_height);
        let tick_secs = settings.tick_dt() as f64;
        let mut game = match GameLoop::new(settings, surface, ConsoleHud::default()) {
            Ok(game) => game,
            Err(err) if err.is_fatal_setup() => {
                return Err(err).context("game setup failed");
            }
            Err(err) => bail!("unexpected error during setup: {err}"),
        };

        game.start();
        let mut pilot = Autopilot::new(game.state().seed, cli.wrong_answer_rate);
        log::info!("Headless run with seed {}", game.state().seed);

        let mut now = 0.0;
        for _ in 0..cli.max_ticks {
            if !game.is_running() {
                break;
            }
            for event in pilot.plan(game.state()) {
                game.handle_input(event);
            }
            now += tick_secs;
            game.update(now).context("simulation halted")?;
        }

        let Some(payload) = game.hud().payload.clone() else {
            bail!(
                "no result after {} ticks (round {}, {} / {} answers)",
                cli.max_ticks,
                game.state().round,
                game.state().correct_answers,
                game.settings().questions_to_win
            );
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Quiz Breakout (headless) starting...");
    headless::run(headless::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `GameLoop` directly; nothing to run here
}
