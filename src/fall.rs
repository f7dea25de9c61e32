//! Fall scheduler: fixed-cadence countdown that decides when the active piece steps down or lands.

use crate::grid::Grid;
use crate::piece::Piece;
use std::time::Duration;

/// Outcome of one scheduler tick for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallStep {
    /// Timer still running.
    Wait,
    /// Cell below is free; move down one row.
    Fall,
    /// Floor or occupant below; commit at the current position.
    Land,
}

#[derive(Debug, Clone)]
pub struct FallScheduler {
    interval: Duration,
    /// Countdown in nanoseconds; a step is due once it drops below zero.
    timer_ns: i128,
}

impl FallScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timer_ns: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left before the next step is due (zero when already due).
    pub fn remaining(&self) -> Duration {
        Duration::from_nanos(u64::try_from(self.timer_ns.max(0)).unwrap_or(u64::MAX))
    }

    /// Advances the countdown by `elapsed` and reports whether a step is due.
    /// The interval is added back to the remainder, so lateness does not build up.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.timer_ns -= elapsed.as_nanos() as i128;
        if self.timer_ns < 0 {
            self.timer_ns += self.interval.as_nanos() as i128;
            true
        } else {
            false
        }
    }

    /// One tick for `piece` against `grid`. The target cell is checked before anything moves.
    pub fn step(&mut self, elapsed: Duration, piece: &Piece, grid: &Grid) -> FallStep {
        if !self.advance(elapsed) {
            return FallStep::Wait;
        }
        let target = piece.position().below();
        if target.y < 0 || grid.is_occupied(target) {
            FallStep::Land
        } else {
            FallStep::Fall
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{GridPos, PuyoColor};
    use crate::render::VisualHandle;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn piece_at(x: i32, y: i32) -> Piece {
        Piece::new(PuyoColor::Blue, GridPos::new(x, y), VisualHandle(0))
    }

    #[test]
    fn first_tick_is_due_immediately() {
        let mut fall = FallScheduler::new(ms(500));
        assert!(fall.advance(ms(1)));
        assert_eq!(fall.remaining(), ms(499));
    }

    #[test]
    fn zero_elapsed_never_steps() {
        let mut fall = FallScheduler::new(ms(500));
        assert!(!fall.advance(Duration::ZERO));
    }

    #[test]
    fn remainder_accumulates_instead_of_snapping() {
        let mut fall = FallScheduler::new(ms(100));
        assert!(fall.advance(ms(30)));
        // 70 ms left
        assert!(!fall.advance(ms(60)));
        // 10 ms left; 25 ms overshoot carries into the next interval
        assert!(fall.advance(ms(35)));
        assert_eq!(fall.remaining(), ms(75));
        assert!(!fall.advance(ms(75)));
        assert!(fall.advance(ms(1)));
    }

    #[test]
    fn remaining_saturates_for_huge_intervals() {
        let mut fall = FallScheduler::new(Duration::MAX);
        assert!(fall.advance(Duration::from_nanos(1)));
        assert_eq!(fall.remaining(), Duration::from_nanos(u64::MAX));
    }

    #[test]
    fn at_most_one_step_per_tick() {
        let mut fall = FallScheduler::new(ms(100));
        assert!(fall.advance(ms(1000)));
        assert_eq!(fall.remaining(), Duration::ZERO);
    }

    #[test]
    fn lands_on_floor() {
        let grid = Grid::new(6, 12);
        let mut fall = FallScheduler::new(ms(100));
        assert_eq!(fall.step(ms(100), &piece_at(2, 0), &grid), FallStep::Land);
    }

    #[test]
    fn lands_on_occupant_below() {
        let mut grid = Grid::new(6, 12);
        grid.place(piece_at(2, 4)).unwrap();
        let mut fall = FallScheduler::new(ms(100));
        assert_eq!(fall.step(ms(100), &piece_at(2, 5), &grid), FallStep::Land);
        assert_eq!(fall.step(ms(100), &piece_at(3, 5), &grid), FallStep::Fall);
    }

    #[test]
    fn waits_between_steps() {
        let grid = Grid::new(6, 12);
        let piece = piece_at(3, 11);
        let mut fall = FallScheduler::new(ms(100));
        assert_eq!(fall.step(ms(10), &piece, &grid), FallStep::Fall);
        assert_eq!(fall.step(ms(10), &piece, &grid), FallStep::Wait);
    }
}
