// crates.io
use tokio::time::Instant;
// self
use crate::_prelude::*;

/// Mutable fixed-window counter guarded by [`RateLimiter`](super::RateLimiter).
///
/// `count` only ever grows within a window and resets to zero exactly when the window
/// rolls, at which point `started_at` moves to the observing instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateWindow {
	count: u32,
	started_at: Instant,
}
impl RateWindow {
	/// Opens an empty window at `started_at`.
	pub fn new(started_at: Instant) -> Self {
		Self { count: 0, started_at }
	}

	/// Admissions recorded in the current window.
	pub fn count(&self) -> u32 {
		self.count
	}

	/// Instant the current window opened.
	pub fn started_at(&self) -> Instant {
		self.started_at
	}

	/// Opens a new window if `duration` has elapsed since the current one started.
	///
	/// Returns `true` when the window rolled.
	pub fn roll(&mut self, now: Instant, duration: Duration) -> bool {
		if now.saturating_duration_since(self.started_at) < duration {
			return false;
		}

		self.count = 0;
		self.started_at = now;

		true
	}

	pub(super) fn record_admission(&mut self) {
		self.count += 1;
	}
}
