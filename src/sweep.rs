//! Stepped back-and-forth motion between two angles.
//!
//! [`Sweep`] is the stepping function on its own: an iterator over the angles a sweep
//! commands, one degree apart. [`ServoController::sweep`](crate::servo::ServoController::sweep)
//! drives it with a delay and a stop poll between steps; callers that want their own loop can
//! iterate it directly.
//!
//! # Counting
//!
//! The position starts at `start` and moves one degree per step toward `end`. A step that
//! would pass the bound lands on the bound instead, so both bounds are always commanded, even
//! when the range is not a whole number of degrees. Once a bound is commanded the direction
//! flips and the next angle moves away from it, so no angle is commanded twice in a row. Only
//! reaching `end` counts as a cycle, so `cycles = 1` is one pass from `start` to `end`,
//! `cycles = 2` is there, back, and there again.
//!
//! A sweep with `start == end` commands that angle once and completes.

use embassy_time::Duration;

use crate::pulse::clamp_degrees;

/// Slowest sweep speed.
pub const MIN_SPEED: f32 = 1.0;

/// Fastest sweep speed.
pub const MAX_SPEED: f32 = 10.0;

/// Step delay in milliseconds at speed 1; speed `s` waits `round(100 / s)` ms.
const SPEED_ONE_DELAY_MS: f32 = 100.0;

/// Positions closer than this to a bound are on it. Absorbs `f32` drift from repeated steps.
const BOUND_TOLERANCE_DEGREES: f32 = 1e-3;

/// How a sweep ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SweepOutcome {
    /// All requested cycles ran.
    Completed {
        /// Cycles run.
        cycles: u32,
    },
    /// The stop input fired first.
    Stopped {
        /// Cycles finished before the stop.
        completed_cycles: u32,
    },
}

/// The angles of a sweep, in command order.
///
/// Inputs are clamped, never rejected: angles to `0.0..=180.0`, speed to `1.0..=10.0`,
/// cycles to at least 1.
///
/// ```
/// use servo_blocks::sweep::Sweep;
///
/// let angles: Vec<f32> = Sweep::new(10.0, 13.0, 10.0, 2).collect();
/// assert_eq!(angles, [10.0, 11.0, 12.0, 13.0, 12.0, 11.0, 10.0, 11.0, 12.0, 13.0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    start: f32,
    end: f32,
    step_delay: Duration,
    cycles: u32,
    position: f32,
    step: f32,
    toward_end: bool,
    completed_cycles: u32,
    finished: bool,
}

impl Sweep {
    /// Plan a sweep from `start_degrees` to `end_degrees` and back, `cycles` times.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "delay is within 10..=100 ms"
    )]
    pub fn new(start_degrees: f32, end_degrees: f32, speed: f32, cycles: u32) -> Self {
        let start = clamp_degrees(start_degrees);
        let end = clamp_degrees(end_degrees);
        let speed = if speed.is_nan() {
            MIN_SPEED
        } else {
            speed.clamp(MIN_SPEED, MAX_SPEED)
        };
        let delay_ms = libm::roundf(SPEED_ONE_DELAY_MS / speed) as u64;
        Self {
            start,
            end,
            step_delay: Duration::from_millis(delay_ms),
            cycles: cycles.max(1),
            position: start,
            step: if end < start { -1.0 } else { 1.0 },
            toward_end: true,
            completed_cycles: 0,
            finished: false,
        }
    }

    /// Clamped start angle.
    #[must_use]
    pub const fn start_degrees(&self) -> f32 {
        self.start
    }

    /// Clamped end angle.
    #[must_use]
    pub const fn end_degrees(&self) -> f32 {
        self.end
    }

    /// Pause after each commanded angle.
    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Requested cycles, at least 1.
    #[must_use]
    pub const fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Cycles finished so far.
    #[must_use]
    pub const fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// Whether every angle has been produced.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    fn is_degenerate(&self) -> bool {
        is_on(self.start, self.end)
    }

    /// The bound the sweep is currently heading to.
    const fn target(&self) -> f32 {
        if self.toward_end {
            self.end
        } else {
            self.start
        }
    }

    fn advance(&mut self) {
        if is_on(self.position, self.target()) {
            if self.toward_end {
                self.completed_cycles = self.completed_cycles.saturating_add(1);
                if self.completed_cycles >= self.cycles {
                    self.finished = true;
                    return;
                }
            }
            self.toward_end = !self.toward_end;
            self.step = -self.step;
        }
        let target = self.target();
        let next = self.position + self.step;
        let passes_target = (next - target) * self.step > 0.0;
        self.position = if passes_target || is_on(next, target) {
            target
        } else {
            next
        };
    }
}

fn is_on(position: f32, bound: f32) -> bool {
    libm::fabsf(position - bound) < BOUND_TOLERANCE_DEGREES
}

impl Iterator for Sweep {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.finished {
            return None;
        }
        let degrees = self.position;
        if self.is_degenerate() {
            self.completed_cycles = self.cycles;
            self.finished = true;
        } else {
            self.advance();
        }
        Some(degrees)
    }
}

impl core::iter::FusedIterator for Sweep {}
