//! Future-style handle resolved exactly once per accepted submission.

// std
use std::task::{Context, Poll};
// crates.io
use tokio::sync::oneshot;
// self
use crate::{
	_prelude::*,
	error::DispatchError,
	submission::SubmissionResult,
};

type Outcome = Result<SubmissionResult>;

/// Creates a connected resolver/handle pair.
pub(crate) fn channel() -> (Resolver, SubmissionHandle) {
	let (tx, rx) = oneshot::channel();

	(Resolver(tx), SubmissionHandle(rx))
}

/// Awaitable outcome of one submission.
///
/// Dropping the handle before the submission is admitted by the rate limiter cancels it;
/// once admitted, the network exchange runs to completion and its outcome is discarded.
#[derive(Debug)]
pub struct SubmissionHandle(oneshot::Receiver<Outcome>);
impl Future for SubmissionHandle {
	type Output = Outcome;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		Pin::new(&mut self.0).poll(cx).map(|received| {
			received.unwrap_or_else(|_| {
				Err(DispatchError::WorkerLost { reason: "submission dropped unresolved".into() }
					.into())
			})
		})
	}
}

/// Worker-side half of a [`SubmissionHandle`].
#[derive(Debug)]
pub(crate) struct Resolver(oneshot::Sender<Outcome>);
impl Resolver {
	/// Returns `true` once the caller dropped its handle.
	pub(crate) fn is_cancelled(&self) -> bool {
		self.0.is_closed()
	}

	/// Completes when the caller drops its handle.
	pub(crate) async fn cancelled(&mut self) {
		self.0.closed().await
	}

	/// Delivers the outcome; a dropped handle silently discards it.
	pub(crate) fn resolve(self, outcome: Outcome) {
		let _ = self.0.send(outcome);
	}
}
