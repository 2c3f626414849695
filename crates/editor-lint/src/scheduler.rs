//! Debounced re-lint scheduling.
//!
//! [`ReLintScheduler`] decides *when* to run the diagnostic source. It owns a single timer slot
//! and a single quiet-period deadline:
//!
//! - every document change pushes the deadline to `now + delay`;
//! - a due timer whose deadline has moved on is re-armed for the remaining interval instead of
//!   firing, so a burst of edits produces exactly one run, `delay` after the last edit;
//! - a timer that fires issues a new [`LintRequestId`]. Only the latest issued id is accepted
//!   when results come back, and an edit made while a request is in flight invalidates it.
//!
//! The scheduler does not own a clock or a timer; the host reports the current time and asks
//! [`ReLintScheduler::timer_due`] when to call back.

use std::time::{Duration, Instant};

/// Default quiet period before re-linting.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Default slack when checking a due timer against the deadline.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_millis(10);

/// Identifier of a diagnostic source run. Later runs get larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LintRequestId(u64);

impl LintRequestId {
    /// Raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// No timer pending and no request in flight.
    Idle,
    /// A timer is pending; waiting for the quiet period to elapse.
    ArmedWaitingQuiet,
    /// The source was asked to run and its result has not been reported yet.
    FireRequested,
}

/// What a timer callback should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// No timer is pending (a stale callback).
    Idle,
    /// The pending timer is not due yet.
    NotDue(Instant),
    /// Edits arrived since arming; the timer was re-armed for the given interval.
    Rearmed(Duration),
    /// The quiet period elapsed: run the source for this request.
    Fire(LintRequestId),
}

/// Debounce state machine for one linting session.
#[derive(Debug, Clone)]
pub struct ReLintScheduler {
    delay: Duration,
    tolerance: Duration,
    deadline: Option<Instant>,
    timer_due: Option<Instant>,
    in_flight: Option<LintRequestId>,
    last_issued: u64,
}

impl ReLintScheduler {
    /// Create an idle scheduler.
    pub fn new(delay: Duration, tolerance: Duration) -> Self {
        Self {
            delay,
            tolerance,
            deadline: None,
            timer_due: None,
            in_flight: None,
            last_issued: 0,
        }
    }

    /// Quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Current phase.
    pub fn phase(&self) -> SchedulerPhase {
        if self.timer_due.is_some() {
            SchedulerPhase::ArmedWaitingQuiet
        } else if self.in_flight.is_some() {
            SchedulerPhase::FireRequested
        } else {
            SchedulerPhase::Idle
        }
    }

    /// When the pending timer should fire, if any.
    pub fn timer_due(&self) -> Option<Instant> {
        self.timer_due
    }

    /// The request currently in flight, if any.
    pub fn in_flight(&self) -> Option<LintRequestId> {
        self.in_flight
    }

    /// Arm the initial timer when linting attaches to a document.
    pub fn start(&mut self, now: Instant) {
        let due = now + self.delay;
        self.deadline = Some(due);
        self.timer_due = Some(due);
        tracing::trace!(delay_ms = self.delay.as_millis() as u64, "lint scheduler started");
    }

    /// Record a document change.
    pub fn note_document_changed(&mut self, now: Instant) {
        let deadline = now + self.delay;
        self.deadline = Some(deadline);

        if let Some(stale) = self.in_flight.take() {
            tracing::trace!(request = stale.0, "in-flight lint request superseded by edit");
        }
        if self.timer_due.is_none() {
            self.timer_due = Some(deadline);
            tracing::trace!("lint timer armed");
        }
    }

    /// Handle the pending timer at `now`.
    pub fn on_timer(&mut self, now: Instant) -> TimerOutcome {
        let Some(due) = self.timer_due else {
            return TimerOutcome::Idle;
        };
        if now < due {
            return TimerOutcome::NotDue(due);
        }

        let deadline = self.deadline.unwrap_or(due);
        if now + self.tolerance < deadline {
            let remaining = deadline - now;
            self.timer_due = Some(deadline);
            tracing::trace!(remaining_ms = remaining.as_millis() as u64, "lint timer re-armed");
            return TimerOutcome::Rearmed(remaining);
        }

        self.timer_due = None;
        self.deadline = None;
        TimerOutcome::Fire(self.issue())
    }

    /// Skip the quiet period and request a run right away.
    pub fn force(&mut self) -> LintRequestId {
        self.timer_due = None;
        self.deadline = None;
        self.issue()
    }

    fn issue(&mut self) -> LintRequestId {
        self.last_issued += 1;
        let id = LintRequestId(self.last_issued);
        self.in_flight = Some(id);
        tracing::trace!(request = id.0, "lint request issued");
        id
    }

    /// Report that request `id` finished. Returns `false` if its result must be discarded.
    pub fn complete(&mut self, id: LintRequestId) -> bool {
        if self.in_flight == Some(id) {
            self.in_flight = None;
            true
        } else {
            tracing::trace!(
                request = id.0,
                latest = self.last_issued,
                "discarding stale lint result"
            );
            false
        }
    }
}

impl Default for ReLintScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY, DEFAULT_TOLERANCE)
    }
}
