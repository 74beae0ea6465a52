use std::time::Duration;

use crate::scheduler::TimerId;

/// Remaining-time estimate behind a toast's progress bar.
///
/// The percentage is not clamped. While a toast is hovered the deadline is
/// parked at zero, so a tick landing then reports a negative width, as does a
/// deadline in the past.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressEstimator {
    hide_eta_ms: f64,
    max_hide_time_ms: f64,
    ticker: Option<TimerId>,
}

impl ProgressEstimator {
    /// Record a new countdown of `total` starting at `now`.
    pub fn arm(&mut self, now: Duration, total: Duration) {
        self.max_hide_time_ms = millis(total);
        self.hide_eta_ms = millis(now) + self.max_hide_time_ms;
    }

    /// Forget the deadline; the countdown restarts on the next [`Self::arm`].
    pub const fn park(&mut self) {
        self.hide_eta_ms = 0.0;
    }

    /// `(deadline - now) / total * 100`.
    #[must_use]
    pub fn percentage(&self, now: Duration) -> f64 {
        (self.hide_eta_ms - millis(now)) / self.max_hide_time_ms * 100.0
    }

    #[must_use]
    pub const fn ticker(&self) -> Option<TimerId> {
        self.ticker
    }

    pub const fn set_ticker(&mut self, ticker: TimerId) {
        self.ticker = Some(ticker);
    }

    /// Detach the running ticker so the caller can cancel it.
    pub const fn take_ticker(&mut self) -> Option<TimerId> {
        self.ticker.take()
    }
}

fn millis(value: Duration) -> f64 {
    value.as_secs_f64() * 1000.0
}
