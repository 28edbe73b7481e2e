use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Fetching,
}

/// Refresh cadence bookkeeping. Timers live outside; this only decides.
///
/// Requests are never cancelled, so several may be in flight at once; the
/// last one to settle wins. The phase is `Fetching` while any are pending.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerState {
    visible: bool,
    in_flight: u32,
    countdown: u8,
    countdown_start: u8,
    last_success: Option<DateTime<Utc>>,
}

impl PollerState {
    pub fn new(countdown_secs: u8) -> Self {
        Self {
            visible: true,
            in_flight: 0,
            countdown: countdown_secs,
            countdown_start: countdown_secs,
            last_success: None,
        }
    }

    pub fn phase(&self) -> PollPhase {
        if self.in_flight > 0 {
            PollPhase::Fetching
        } else {
            PollPhase::Idle
        }
    }

    pub fn countdown(&self) -> u8 {
        self.countdown
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Refresh timer fired. Returns `true` if a request should go out.
    /// Hidden ticks are dropped, not queued.
    pub fn refresh_tick(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.in_flight = self.in_flight.saturating_add(1);
        true
    }

    /// One-second display tick: counts down to zero, then wraps.
    pub fn countdown_tick(&mut self) {
        self.countdown = if self.countdown == 0 {
            self.countdown_start
        } else {
            self.countdown - 1
        };
    }

    pub fn succeeded(&mut self, at: DateTime<Utc>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.countdown = self.countdown_start;
        self.last_success = Some(at);
    }

    pub fn failed(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn hidden_ticks_are_skipped() {
        let mut poller = PollerState::new(5);
        poller.set_visible(false);
        assert!(!poller.refresh_tick());
        assert!(!poller.refresh_tick());
        assert_eq!(poller.phase(), PollPhase::Idle);
        poller.set_visible(true);
        assert!(poller.refresh_tick());
        assert_eq!(poller.in_flight(), 1);
    }

    #[test]
    fn countdown_wraps_and_resets_on_success_only() {
        let mut poller = PollerState::new(5);
        let seen: Vec<u8> = (0..7)
            .map(|_| {
                poller.countdown_tick();
                poller.countdown()
            })
            .collect();
        assert_eq!(seen, [4, 3, 2, 1, 0, 5, 4]);

        poller.refresh_tick();
        poller.failed();
        assert_eq!(poller.countdown(), 4);

        poller.refresh_tick();
        poller.succeeded(at(10));
        assert_eq!(poller.countdown(), 5);
        assert_eq!(poller.last_success(), Some(at(10)));
    }

    #[test]
    fn overlapping_requests_stay_fetching_until_all_settle() {
        let mut poller = PollerState::new(5);
        poller.refresh_tick();
        poller.refresh_tick();
        poller.succeeded(at(1));
        assert_eq!(poller.phase(), PollPhase::Fetching);
        poller.failed();
        assert_eq!(poller.phase(), PollPhase::Idle);
        poller.failed();
        assert_eq!(poller.in_flight(), 0);
    }
}
