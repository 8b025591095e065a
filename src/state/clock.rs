//! Countdown clock for the pick currently on the clock.
//!
//! The clock never reads the wall time itself: every method takes `now`
//! from the caller, which keeps the engine deterministic under test.

use time::{Duration, OffsetDateTime};

/// Per-pick countdown with pause/resume and live reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftClock {
    /// Configured full duration in seconds, applied on every (re)start.
    duration_secs: u32,
    /// When the running countdown was last started.
    started_at: Option<OffsetDateTime>,
    /// Absolute deadline while the countdown is running.
    deadline: Option<OffsetDateTime>,
    /// Remaining seconds captured at pause time.
    frozen_secs: Option<u32>,
}

impl DraftClock {
    /// Create a stopped clock with the given full duration.
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            started_at: None,
            deadline: None,
            frozen_secs: None,
        }
    }

    /// Configured full duration in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Timestamp of the last start, if the countdown is running.
    pub fn started_at(&self) -> Option<OffsetDateTime> {
        self.started_at
    }

    /// Absolute deadline, if the countdown is running.
    pub fn deadline(&self) -> Option<OffsetDateTime> {
        self.deadline
    }

    /// Start (or restart) a full-duration countdown from `now`.
    pub fn start(&mut self, now: OffsetDateTime) {
        self.started_at = Some(now);
        self.deadline = Some(now + Duration::seconds(i64::from(self.duration_secs)));
        self.frozen_secs = None;
    }

    /// Freeze the remaining time and stop the countdown.
    pub fn pause(&mut self, now: OffsetDateTime) {
        self.frozen_secs = Some(self.remaining_running(now));
        self.started_at = None;
        self.deadline = None;
    }

    /// Restart the countdown from the frozen remainder (or the full
    /// duration when the clock was never started).
    pub fn resume(&mut self, now: OffsetDateTime) {
        let base = self.frozen_secs.unwrap_or(self.duration_secs);
        self.started_at = Some(now);
        self.deadline = Some(now + Duration::seconds(i64::from(base)));
        self.frozen_secs = None;
    }

    /// Rewrite the configured duration.
    ///
    /// A running countdown is re-aimed at `now + seconds` immediately, so
    /// the change can shorten or extend the live deadline. A paused clock
    /// has its frozen remainder replaced instead.
    pub fn set_duration(&mut self, seconds: u32, now: OffsetDateTime) {
        self.duration_secs = seconds;
        if self.deadline.is_some() {
            self.start(now);
        } else if self.frozen_secs.is_some() {
            self.frozen_secs = Some(seconds);
        }
    }

    /// Clear the countdown entirely (draft completed).
    pub fn stop(&mut self) {
        self.started_at = None;
        self.deadline = None;
        self.frozen_secs = None;
    }

    /// Remaining seconds while the countdown is running; zero once the
    /// deadline has passed or when the clock is stopped.
    ///
    /// Sub-second remainders round up, so zero is only reported once the
    /// deadline has actually passed.
    pub fn remaining_running(&self, now: OffsetDateTime) -> u32 {
        match self.deadline {
            Some(deadline) if deadline > now => {
                let left = deadline - now;
                let mut secs = left.whole_seconds();
                if left.subsec_nanoseconds() > 0 {
                    secs += 1;
                }
                u32::try_from(secs).unwrap_or(u32::MAX)
            }
            _ => 0,
        }
    }

    /// Frozen remainder captured at pause, falling back to the full
    /// duration when the clock was never running.
    pub fn remaining_frozen(&self) -> u32 {
        self.frozen_secs.unwrap_or(self.duration_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000 + secs).unwrap()
    }

    #[test]
    fn start_sets_full_deadline() {
        let mut clock = DraftClock::new(90);
        clock.start(at(0));
        assert_eq!(clock.remaining_running(at(0)), 90);
        assert_eq!(clock.remaining_running(at(30)), 60);
        assert_eq!(clock.remaining_running(at(90)), 0);
        assert_eq!(clock.remaining_running(at(500)), 0);
    }

    #[test]
    fn remaining_is_non_increasing_while_running() {
        let mut clock = DraftClock::new(60);
        clock.start(at(0));
        let mut last = u32::MAX;
        for t in 0..70 {
            let remaining = clock.remaining_running(at(t));
            assert!(remaining <= last);
            last = remaining;
        }
    }

    #[test]
    fn pause_freezes_remaining_and_resume_continues() {
        let mut clock = DraftClock::new(90);
        clock.start(at(0));
        clock.pause(at(25));
        assert_eq!(clock.remaining_frozen(), 65);
        // Frozen value does not drain while paused.
        assert_eq!(clock.remaining_running(at(100)), 0);
        clock.resume(at(100));
        assert_eq!(clock.remaining_running(at(100)), 65);
        assert_eq!(clock.remaining_running(at(130)), 35);
    }

    #[test]
    fn set_duration_reaims_running_deadline() {
        let mut clock = DraftClock::new(90);
        clock.start(at(0));
        clock.set_duration(10, at(30));
        assert_eq!(clock.duration_secs(), 10);
        assert_eq!(clock.remaining_running(at(30)), 10);
        assert_eq!(clock.remaining_running(at(41)), 0);
        // Extending works the same way.
        clock.set_duration(300, at(41));
        assert_eq!(clock.remaining_running(at(41)), 300);
    }

    #[test]
    fn set_duration_replaces_frozen_remainder() {
        let mut clock = DraftClock::new(90);
        clock.start(at(0));
        clock.pause(at(10));
        clock.set_duration(45, at(20));
        assert_eq!(clock.remaining_frozen(), 45);
    }

    #[test]
    fn unstarted_clock_reports_full_duration_frozen() {
        let clock = DraftClock::new(120);
        assert_eq!(clock.remaining_frozen(), 120);
        assert_eq!(clock.remaining_running(at(0)), 0);
    }

    #[test]
    fn subsecond_remainder_rounds_up_instead_of_expiring_early() {
        let mut clock = DraftClock::new(30);
        clock.start(at(0));

        let just_before = at(29) + Duration::milliseconds(500);
        assert_eq!(clock.remaining_running(just_before), 1);
        // Exactly at the deadline the countdown reads zero.
        assert_eq!(clock.remaining_running(at(30)), 0);
    }

    #[test]
    fn restart_after_expiry_grants_full_duration() {
        let mut clock = DraftClock::new(30);
        clock.start(at(0));
        assert_eq!(clock.remaining_running(at(60)), 0);
        clock.start(at(60));
        assert_eq!(clock.remaining_running(at(60)), 30);
    }
}
