//! Optional observability helpers for client flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `crpt_client.flow` with the `flow`
//!   and `stage` fields, plus events for cache hits, refresh results, and rejected submissions.
//! - Enable `metrics` to increment the `crpt_client_flow_total` counter for every flow
//!   outcome, labeled by `flow` + `outcome`, and to record how long each admission waited for
//!   its window in the `crpt_client_admission_wait_seconds` histogram.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Waiting for a rate-limiter slot.
	Admission,
	/// Challenge/sign/exchange token refresh.
	TokenRefresh,
	/// Document submission unit of work.
	Submission,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Admission => "admission",
			FlowKind::TokenRefresh => "token_refresh",
			FlowKind::Submission => "submission",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Submission refused by the guard before it was queued.
	Rejected,
	/// Handle dropped while the submission still waited for admission.
	Cancelled,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
			FlowOutcome::Rejected => "rejected",
			FlowOutcome::Cancelled => "cancelled",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
