//! Parsed outcome of one document submission.

// self
use crate::{_prelude::*, http::scalar_string};

/// Parsed response of `POST /lk/documents/create`.
///
/// Either `value` carries the registered document identifier, or the error fields explain
/// the rejection. Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionResult {
	/// Identifier assigned to the accepted document.
	pub value: Option<String>,
	/// Status code reported by the host, string or numeric on the wire.
	#[serde(deserialize_with = "scalar_string")]
	pub code: Option<String>,
	/// Error message reported by the host.
	pub error_message: Option<String>,
	/// Error description reported by the host.
	pub description: Option<String>,
}
impl SubmissionResult {
	/// Returns `true` when the host accepted the document.
	pub fn is_success(&self) -> bool {
		self.value.is_some() && self.error_message.is_none()
	}
}
