//! Round counter and the target growth throttle.
//!
//! The round number is the only temporal state the simulation has. It starts
//! at 0 before the first round and is advanced once at the start of each
//! round, so the first round processed is round 1.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Round counter would overflow.
    #[error("round counter overflow: cannot advance beyond u64::MAX")]
    RoundOverflow,
}

/// Monotonic round counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundClock {
    round: u64,
}

impl RoundClock {
    /// A clock that has not run any round yet.
    pub const fn new() -> Self {
        Self { round: 0 }
    }

    /// Advance by one round. Returns the new round number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::RoundOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.round = self.round.checked_add(1).ok_or(ClockError::RoundOverflow)?;
        Ok(self.round)
    }

    /// The most recently started round (0 before the first).
    pub const fn round(&self) -> u64 {
        self.round
    }
}

/// Throttle for periodic target growth.
///
/// The counter increments on every round where it is below the period. On
/// the round it is found at or above the period it resets to 0 and the
/// throttle fires. With a period of 3 it fires on rounds 4, 8, 12, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthThrottle {
    counter: u32,
    period: u32,
}

impl GrowthThrottle {
    /// Create a throttle with the given period.
    pub const fn new(period: u32) -> Self {
        Self { counter: 0, period }
    }

    /// Record one round. Returns `true` on the reset round.
    pub const fn tick(&mut self) -> bool {
        if self.counter >= self.period {
            self.counter = 0;
            true
        } else {
            self.counter = self.counter.saturating_add(1);
            false
        }
    }

    /// Current counter value.
    pub const fn counter(&self) -> u32 {
        self.counter
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero_and_advances() {
        let mut clock = RoundClock::new();
        assert_eq!(clock.round(), 0);
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.round(), 2);
    }

    #[test]
    fn clock_overflow_is_an_error() {
        let mut clock = RoundClock { round: u64::MAX };
        assert!(matches!(clock.advance(), Err(ClockError::RoundOverflow)));
        assert_eq!(clock.round(), u64::MAX);
    }

    #[test]
    fn throttle_fires_every_fourth_round_with_period_three() {
        let mut throttle = GrowthThrottle::new(3);
        let fired: Vec<u64> = (1..=12_u64).filter(|_| throttle.tick()).collect();
        assert_eq!(fired, vec![4, 8, 12]);
        assert_eq!(throttle.counter(), 0);
    }

    #[test]
    fn throttle_with_period_one_fires_every_other_round() {
        let mut throttle = GrowthThrottle::new(1);
        let pattern: Vec<bool> = (0..4).map(|_| throttle.tick()).collect();
        assert_eq!(pattern, vec![false, true, false, true]);
    }
}
