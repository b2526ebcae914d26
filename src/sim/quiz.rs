//! Vocabulary quiz: question pool, trigger and answer submission
//!
//! A quiz suspends the simulation. Answering closes it, then the tick counts
//! down a short delay before play resumes (or the game is won).

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState, PauseReason};
use crate::consts::*;

/// A question in the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub answer: String,
    /// Solved this session; never reverts until the session restarts
    #[serde(default)]
    pub solved: bool,
}

impl Question {
    pub fn new(id: u32, prompt: &str, answer: &str) -> Self {
        Self {
            id,
            prompt: prompt.to_string(),
            answer: answer.to_string(),
            solved: false,
        }
    }
}

/// The built-in Korean vocabulary pool
pub fn default_questions() -> Vec<Question> {
    vec![
        Question::new(
            1,
            "여러 민족으로 이루어진 국가에서, 자기 민족의 언어를 국어 또는 외국에 상대하여 이르는 말",
            "모국어",
        ),
        Question::new(2, "오라고 청하지 않았는데도 스스로 찾아온 손님", "불청객"),
        Question::new(3, "다른 나라에서 온 사람", "이방인"),
        Question::new(4, "용기나 의욕이 솟아나도록 복돋워 줌", "격려"),
        Question::new(5, "남의 감정, 의견, 주장 따위에 자기도 그렇다고 느낌", "공감"),
        Question::new(6, "서로 밀접하게 연결되어 있는 공통된 느낌", "유대감"),
    ]
}

/// Static pool with per-session solved flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionPool {
    questions: Vec<Question>,
}

impl QuestionPool {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn has_unsolved(&self) -> bool {
        self.questions.iter().any(|q| !q.solved)
    }

    pub fn unsolved_ids(&self) -> Vec<u32> {
        self.questions
            .iter()
            .filter(|q| !q.solved)
            .map(|q| q.id)
            .collect()
    }

    /// Mark a question solved; returns true only the first time
    pub fn mark_solved(&mut self, id: u32) -> bool {
        match self.questions.iter_mut().find(|q| q.id == id) {
            Some(q) if !q.solved => {
                q.solved = true;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        for q in &mut self.questions {
            q.solved = false;
        }
    }
}

/// Quiz modal lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum QuizState {
    Idle,
    /// Modal visible, waiting for an answer
    Open { question_id: u32 },
    /// Answered; simulation resumes when the delay runs out
    Closing { remaining: f32 },
}

impl QuizState {
    /// Modal visibility
    pub fn is_open(&self) -> bool {
        matches!(self, QuizState::Open { .. })
    }
}

/// Trimmed, case-insensitive comparison; the expected answer is not trimmed
pub fn answers_match(player: &str, expected: &str) -> bool {
    player.trim().to_lowercase() == expected.to_lowercase()
}

/// Open a quiz with a random unsolved question.
///
/// No-op while paused (for any reason) or after game over, and when every
/// question is already solved. Returns true when a quiz was opened.
pub fn trigger_quiz(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    let available = state.questions.unsolved_ids();
    if available.is_empty() {
        log::debug!("Quiz trigger ignored: no unsolved questions");
        return false;
    }

    let question_id = available[state.rng.random_range(0..available.len())];
    let Some(question) = state.questions.get(question_id) else {
        return false;
    };
    let prompt = question.prompt.clone();

    state.phase = GamePhase::Paused(PauseReason::Quiz);
    state.quiz = QuizState::Open { question_id };
    log::debug!("Quiz opened: question {}", question_id);
    state.push_event(GameEvent::QuizOpened {
        question_id,
        prompt,
    });
    true
}

/// Grade an answer for the open quiz.
///
/// Returns `None` when no quiz is open, otherwise whether it was correct.
pub fn submit_answer(state: &mut GameState, answer: &str) -> Option<bool> {
    let QuizState::Open { question_id } = state.quiz else {
        return None;
    };
    let expected = state.questions.get(question_id)?.answer.clone();

    let correct = answers_match(answer, &expected);
    let feedback = if correct {
        if state.questions.mark_solved(question_id) {
            state.score += QUIZ_SCORE;
            state.correct_answers += 1;
        }
        state.push_event(GameEvent::ScoreChanged { score: state.score });
        state.push_event(GameEvent::CorrectCountChanged {
            correct: state.correct_answers,
            total: state.config.questions_to_win,
        });
        format!("CORRECT! +{} PTS", QUIZ_SCORE)
    } else {
        format!("INCORRECT. Answer: {}", expected)
    };

    log::debug!("Quiz {} answered ({})", question_id, if correct { "correct" } else { "wrong" });
    state.quiz = QuizState::Closing {
        remaining: QUIZ_RESUME_DELAY,
    };
    state.push_event(GameEvent::QuizAnswered { correct, feedback });
    Some(correct)
}

/// Count down the post-answer delay; resumes play or ends the game when it expires
pub fn advance_resume(state: &mut GameState, dt: f32) {
    let QuizState::Closing { remaining } = state.quiz else {
        return;
    };
    let remaining = remaining - dt;
    if remaining > 0.0 {
        state.quiz = QuizState::Closing { remaining };
        return;
    }

    state.quiz = QuizState::Idle;
    if state.is_game_over() {
        return;
    }
    if state.correct_answers >= state.config.questions_to_win {
        state.finish(true);
        return;
    }
    state.phase = GamePhase::Playing;
    state.push_event(GameEvent::QuizResumed);
}
