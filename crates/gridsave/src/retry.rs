//! Tick-based bounded retry with exponential backoff.
//!
//! Used for deleting the scratch snapshot file, which can fail transiently
//! while something else still holds the handle.  The schedule is: attempt,
//! wait `first_delay`, attempt, wait `2 * first_delay`, attempt, give up.
//! Giving up is logged and non-fatal.

/// Mutable retry state for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempts_left: u32,
    next_delay_ticks: u32,
    wait_ticks: u32,
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryVerdict {
    /// Wait for the backoff delay, then try again.
    RetryAfterBackoff,
    /// Attempt budget exhausted; stop trying.
    GiveUp,
}

impl RetryState {
    pub fn new(max_attempts: u32, first_delay_ticks: u32) -> Self {
        Self {
            attempts_left: max_attempts,
            next_delay_ticks: first_delay_ticks,
            wait_ticks: 0,
        }
    }

    /// Advance one tick.  Returns `true` when an attempt may run now.
    pub fn tick(&mut self) -> bool {
        if self.wait_ticks > 0 {
            self.wait_ticks -= 1;
            return false;
        }
        true
    }

    /// Record a failed attempt and schedule the next one (doubling the
    /// delay), or give up if the budget is spent.
    pub fn on_failure(&mut self) -> RetryVerdict {
        debug_assert!(self.attempts_left > 0, "on_failure after give-up");
        self.attempts_left = self.attempts_left.saturating_sub(1);
        if self.attempts_left == 0 {
            return RetryVerdict::GiveUp;
        }
        self.wait_ticks = self.next_delay_ticks;
        self.next_delay_ticks *= 2;
        RetryVerdict::RetryAfterBackoff
    }
}
