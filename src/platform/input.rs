//! Host input events folded into per-tick [`TickInput`]

use std::collections::VecDeque;

use crate::sim::TickInput;

/// Discrete signals from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Left direction pressed (`true`) or released (`false`)
    Left(bool),
    /// Right direction pressed (`true`) or released (`false`)
    Right(bool),
    TogglePause,
    SubmitAnswer(String),
    Restart,
}

/// Held directions plus a queue of one-shot events.
///
/// Each tick polls the held state and consumes at most one one-shot event,
/// so every press is seen by exactly one tick in arrival order.
#[derive(Debug, Default)]
pub struct InputQueue {
    left: bool,
    right: bool,
    pending: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Left(held) => self.left = held,
            InputEvent::Right(held) => self.right = held,
            InputEvent::TogglePause | InputEvent::SubmitAnswer(_) => self.pending.push_back(event),
            InputEvent::Restart => {
                log::debug!("Restart is handled by the game loop, not queued");
            }
        }
    }

    pub fn poll(&mut self) -> TickInput {
        let mut input = TickInput {
            left: self.left,
            right: self.right,
            ..Default::default()
        };
        match self.pending.pop_front() {
            Some(InputEvent::TogglePause) => input.toggle_pause = true,
            Some(InputEvent::SubmitAnswer(answer)) => input.answer = Some(answer),
            _ => {}
        }
        input
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_state_persists_until_release() {
        let mut queue = InputQueue::default();
        queue.push(InputEvent::Left(true));
        assert!(queue.poll().left);
        assert!(queue.poll().left);
        queue.push(InputEvent::Left(false));
        assert!(!queue.poll().left);
    }

    #[test]
    fn test_one_shots_consumed_once_in_order() {
        let mut queue = InputQueue::default();
        queue.push(InputEvent::TogglePause);
        queue.push(InputEvent::SubmitAnswer("공감".into()));
        assert_eq!(queue.pending(), 2);

        let first = queue.poll();
        assert!(first.toggle_pause);
        assert_eq!(first.answer, None);

        let second = queue.poll();
        assert!(!second.toggle_pause);
        assert_eq!(second.answer.as_deref(), Some("공감"));

        assert_eq!(queue.poll(), TickInput::default());
    }

    #[test]
    fn test_restart_is_not_queued() {
        let mut queue = InputQueue::default();
        queue.push(InputEvent::Restart);
        assert_eq!(queue.pending(), 0);
    }
}
