// self
use crate::{_prelude::*, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by client flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("crpt_client.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug-level event for routine progress (admissions, cache hits).
pub fn debug_event(kind: FlowKind, event: &'static str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(flow = kind.as_str(), event);

	#[cfg(not(feature = "tracing"))]
	let _ = (kind, event);
}

/// Emits an info-level event for state changes worth keeping in production logs.
pub fn info_event(kind: FlowKind, event: &'static str) {
	#[cfg(feature = "tracing")]
	tracing::info!(flow = kind.as_str(), event);

	#[cfg(not(feature = "tracing"))]
	let _ = (kind, event);
}

/// Emits a warn-level event carrying the error that ended a flow.
pub fn failure_event(kind: FlowKind, event: &'static str, error: &dyn Display) {
	#[cfg(feature = "tracing")]
	tracing::warn!(flow = kind.as_str(), event, error = %error);

	#[cfg(not(feature = "tracing"))]
	let _ = (kind, event, error);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn events_accept_any_display_error() {
		debug_event(FlowKind::Admission, "admitted");
		info_event(FlowKind::TokenRefresh, "token_refreshed");
		failure_event(FlowKind::Submission, "submission_failed", &"boom");
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(FlowKind::TokenRefresh, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
