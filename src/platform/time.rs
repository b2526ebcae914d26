//! Fixed-rate schedules driven by host frame time

use crate::consts::MAX_FRAME_DT;

/// Accumulator that turns variable frame deltas into whole fixed periods.
///
/// Canceling drops any accumulated time, so nothing fires after a cancel
/// until the schedule is armed again.
#[derive(Debug, Clone)]
pub struct FixedSchedule {
    period: f64,
    accumulator: f64,
    max_catch_up: u32,
    armed: bool,
}

impl FixedSchedule {
    pub fn new(period_secs: f64, max_catch_up: u32) -> Self {
        Self {
            period: period_secs,
            accumulator: 0.0,
            max_catch_up: max_catch_up.max(1),
            armed: false,
        }
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        self.armed = true;
        self.accumulator = 0.0;
    }

    pub fn cancel(&mut self) {
        self.armed = false;
        self.accumulator = 0.0;
    }

    /// Feed elapsed host time; returns how many periods are due now
    pub fn advance(&mut self, dt: f64) -> u32 {
        if !self.armed || !(self.period > 0.0) {
            return 0;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut due = 0;
        while self.accumulator >= self.period && due < self.max_catch_up {
            self.accumulator -= self.period;
            due += 1;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_never_fires() {
        let mut schedule = FixedSchedule::new(0.016, 8);
        assert_eq!(schedule.advance(1.0), 0);
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut schedule = FixedSchedule::new(0.5, 8);
        schedule.arm();
        assert_eq!(schedule.advance(0.2), 0);
        assert_eq!(schedule.advance(0.2), 0);
        assert_eq!(schedule.advance(0.2), 1);
    }

    #[test]
    fn test_catch_up_is_bounded() {
        let mut schedule = FixedSchedule::new(0.01, 8);
        schedule.arm();
        assert_eq!(schedule.advance(0.2), 8);
        // Backlog is kept for later frames
        assert_eq!(schedule.advance(0.0), 8);
    }

    #[test]
    fn test_cancel_drops_backlog() {
        let mut schedule = FixedSchedule::new(0.01, 2);
        schedule.arm();
        schedule.advance(0.2);
        schedule.cancel();
        assert_eq!(schedule.advance(0.2), 0);
        schedule.arm();
        assert_eq!(schedule.advance(0.0), 0);
    }
}
