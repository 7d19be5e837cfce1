//! Fixed-window admission control shared by every submission worker.
//!
//! [`RateLimiter::acquire`] parks the caller until the current window has a free slot or a
//! new window opens. Slots are only consumed on admission, so dropping a pending
//! `acquire` future (cancellation) never leaks capacity. Waiters are not queued: when a
//! window rolls over every sleeper races for the fresh slots, and the fixed window accepts
//! that unfairness in exchange for a constant-size state.

mod window;

pub use window::RateWindow;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use tokio::time::{self, Instant};
// self
use crate::{
	_prelude::*,
	config::RateLimitConfig,
	error::ConfigError,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Admission limiter allowing at most `capacity` acquisitions per `window`.
#[derive(Debug)]
pub struct RateLimiter {
	capacity: u32,
	window: Duration,
	state: Mutex<RateWindow>,
	admitted: AtomicU64,
}
impl RateLimiter {
	/// Creates a limiter whose first window opens now.
	pub fn new(config: RateLimitConfig) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self {
			capacity: config.admissions,
			window: config.window,
			state: Mutex::new(RateWindow::new(Instant::now())),
			admitted: AtomicU64::new(0),
		})
	}

	/// Waits for an admission slot and reserves it.
	pub async fn acquire(&self) {
		let span = FlowSpan::new(FlowKind::Admission, "acquire");

		span.instrument(async {
			let started = Instant::now();
			let mut waited = false;

			loop {
				match self.admit_at(Instant::now()) {
					Ok(()) => break,
					Err(next_window) => {
						waited = true;

						time::sleep_until(next_window).await;
					},
				}
			}

			let stage = if waited { "admitted_after_wait" } else { "admitted" };

			obs::record_flow_outcome(FlowKind::Admission, FlowOutcome::Success);
			obs::record_admission_wait(started.elapsed());
			obs::debug_event(FlowKind::Admission, stage);
		})
		.await
	}

	/// Reserves a slot if one is free in the current window, without waiting.
	pub fn try_acquire(&self) -> bool {
		let admitted = self.admit_at(Instant::now()).is_ok();

		if admitted {
			obs::record_flow_outcome(FlowKind::Admission, FlowOutcome::Success);
		}

		admitted
	}

	/// Slots still free in the current window.
	pub fn available(&self) -> u32 {
		let mut state = self.state.lock();

		state.roll(Instant::now(), self.window);

		self.capacity.saturating_sub(state.count())
	}

	/// Maximum admissions per window.
	pub fn capacity(&self) -> u32 {
		self.capacity
	}

	/// Window length.
	pub fn window(&self) -> Duration {
		self.window
	}

	/// Total admissions granted since construction.
	pub fn admitted(&self) -> u64 {
		self.admitted.load(Ordering::Relaxed)
	}

	/// Admits immediately or returns the instant the next window opens.
	fn admit_at(&self, now: Instant) -> Result<(), Instant> {
		let mut state = self.state.lock();

		state.roll(now, self.window);

		if state.count() < self.capacity {
			state.record_admission();
			self.admitted.fetch_add(1, Ordering::Relaxed);

			Ok(())
		} else {
			Err(state.started_at() + self.window)
		}
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn limiter(window_secs: u64, admissions: u32) -> RateLimiter {
		RateLimiter::new(RateLimitConfig::new(Duration::from_secs(window_secs), admissions))
			.expect("Limiter fixture should be valid.")
	}

	#[test]
	fn out_of_range_config_is_a_configuration_error() {
		let err = RateLimiter::new(RateLimitConfig::new(Duration::from_secs(1), 0))
			.expect_err("Zero capacity must fail construction.");

		assert!(matches!(err, ConfigError::InvalidRateLimit { .. }));

		let err = RateLimiter::new(RateLimitConfig::new(Duration::from_secs(u64::MAX), 1))
			.expect_err("A window past the clock's range must fail construction.");

		assert!(matches!(err, ConfigError::InvalidRateLimit { .. }));
	}

	#[tokio::test(start_paused = true)]
	async fn try_acquire_stops_at_capacity_until_window_rolls() {
		let limiter = limiter(1, 2);

		assert!(limiter.try_acquire());
		assert!(limiter.try_acquire());
		assert!(!limiter.try_acquire());
		assert_eq!(limiter.available(), 0);

		time::advance(Duration::from_secs(1)).await;

		assert_eq!(limiter.available(), 2);
		assert!(limiter.try_acquire());
		assert_eq!(limiter.admitted(), 3);
	}

	#[tokio::test(start_paused = true)]
	async fn acquire_blocks_excess_callers_until_next_window() {
		let limiter = limiter(1, 2);
		let start = Instant::now();
		let mut admitted_at = Vec::new();

		for _ in 0..5 {
			limiter.acquire().await;
			admitted_at.push(start.elapsed());
		}

		assert_eq!(
			admitted_at,
			[0, 0, 1, 1, 2].map(Duration::from_secs).to_vec(),
			"Admissions should come in pairs, one window apart."
		);
	}

	#[tokio::test(start_paused = true)]
	async fn concurrent_callers_never_exceed_capacity_per_window() {
		let limiter = Arc::new(limiter(1, 3));
		let start = Instant::now();
		let tasks = (0..10)
			.map(|_| {
				let limiter = limiter.clone();

				tokio::spawn(async move {
					limiter.acquire().await;

					start.elapsed().as_secs()
				})
			})
			.collect::<Vec<_>>();
		let mut per_window = HashMap::<u64, u32>::new();

		for task in tasks {
			let window = task.await.expect("Acquire task should not panic.");

			*per_window.entry(window).or_default() += 1;
		}

		assert!(per_window.values().all(|count| *count <= 3));
		assert_eq!(per_window.values().sum::<u32>(), 10);
		assert_eq!(per_window.keys().max(), Some(&3));
	}

	#[tokio::test(start_paused = true)]
	async fn cancelled_acquire_does_not_consume_a_slot() {
		let limiter = limiter(1, 1);

		limiter.acquire().await;

		let pending = time::timeout(Duration::from_millis(500), limiter.acquire()).await;

		assert!(pending.is_err(), "Second acquire should still be waiting for the next window.");

		time::advance(Duration::from_millis(500)).await;

		assert!(limiter.try_acquire());
		assert_eq!(limiter.admitted(), 2);
	}
}
