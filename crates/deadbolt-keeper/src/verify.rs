//! The consecutive-deny tracker behind the lockout rule.
//!
//! A verification session tolerates at most `MAX_VERIFY_ROUNDS`
//! back-to-back denied rounds. Any grant resets the count; reaching the
//! bound is not an error but the deliberate terminal state of the session,
//! answered with the alarm timeline instead of another round. The count
//! also resets implicitly when the node restarts, because the tracker
//! lives only as long as one session.

use deadbolt_core::{Verdict, constants::MAX_VERIFY_ROUNDS};

/// Counts consecutive denied rounds within one verification session.
///
/// # Examples
///
/// ```
/// use deadbolt_core::Verdict;
/// use deadbolt_keeper::LockoutTracker;
///
/// let mut tracker = LockoutTracker::new();
/// tracker.record(Verdict::NoMatch);
/// tracker.record(Verdict::NoMatch);
/// assert!(!tracker.lockout_reached());
///
/// tracker.record(Verdict::NoMatch);
/// assert!(tracker.lockout_reached());
/// ```
#[derive(Debug, Default)]
pub struct LockoutTracker {
    consecutive_denies: usize,
}

impl LockoutTracker {
    /// Fresh tracker: no denies recorded.
    #[must_use]
    pub fn new() -> Self {
        LockoutTracker {
            consecutive_denies: 0,
        }
    }

    /// Record one round's verdict. A grant resets the deny count.
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Match => self.consecutive_denies = 0,
            Verdict::NoMatch => self.consecutive_denies += 1,
        }
    }

    /// Denies recorded since the last grant.
    #[must_use]
    pub fn denies(&self) -> usize {
        self.consecutive_denies
    }

    /// Whether the session has hit the lockout bound.
    #[must_use]
    pub fn lockout_reached(&self) -> bool {
        self.consecutive_denies >= MAX_VERIFY_ROUNDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_denies_reach_lockout() {
        let mut tracker = LockoutTracker::new();
        for expected in 1..=3 {
            tracker.record(Verdict::NoMatch);
            assert_eq!(tracker.denies(), expected);
        }
        assert!(tracker.lockout_reached());
    }

    #[test]
    fn test_grant_resets_the_count() {
        let mut tracker = LockoutTracker::new();
        tracker.record(Verdict::NoMatch);
        tracker.record(Verdict::NoMatch);
        tracker.record(Verdict::Match);
        assert_eq!(tracker.denies(), 0);
        assert!(!tracker.lockout_reached());

        // Two more denies still do not lock out.
        tracker.record(Verdict::NoMatch);
        tracker.record(Verdict::NoMatch);
        assert!(!tracker.lockout_reached());
    }

    #[test]
    fn test_fresh_tracker_is_clear() {
        let tracker = LockoutTracker::new();
        assert_eq!(tracker.denies(), 0);
        assert!(!tracker.lockout_reached());
    }
}
