//! Synchronous document-kind check run before any network work is scheduled.

// self
use crate::{
	document::{DocumentFormat, DocumentType},
	error::ValidationError,
	submission::SubmissionRequest,
};

/// Rejects document type/format pairs the client cannot submit yet.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubmissionGuard;
impl SubmissionGuard {
	/// Pairs accepted by [`validate`](Self::validate).
	pub const SUPPORTED: &'static [(DocumentType, DocumentFormat)] =
		&[(DocumentType::IntroduceGoods, DocumentFormat::Manual)];

	/// Accepts `request` only if its type/format pair is supported. Performs no I/O.
	pub fn validate(&self, request: &SubmissionRequest) -> Result<(), ValidationError> {
		self.validate_kind(request.document_type(), request.document_format())
	}

	/// Checks a bare type/format pair.
	pub fn validate_kind(
		&self,
		document_type: DocumentType,
		document_format: DocumentFormat,
	) -> Result<(), ValidationError> {
		if Self::SUPPORTED.contains(&(document_type, document_format)) {
			Ok(())
		} else {
			Err(ValidationError::UnsupportedDocument {
				document_type: document_type.as_str().into(),
				document_format: document_format.as_str().into(),
			})
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_the_supported_pair_passes() {
		let guard = SubmissionGuard;

		for document_type in DocumentType::ALL {
			for document_format in DocumentFormat::ALL {
				let verdict = guard.validate_kind(*document_type, *document_format);
				let supported = *document_type == DocumentType::IntroduceGoods
					&& *document_format == DocumentFormat::Manual;

				assert_eq!(verdict.is_ok(), supported, "{document_type}/{document_format}");
			}
		}
	}

	#[test]
	fn rejection_names_the_pair() {
		let err = SubmissionGuard
			.validate_kind(DocumentType::ShipGoods, DocumentFormat::Manual)
			.expect_err("Shipment documents are not supported.");

		assert_eq!(
			err.to_string(),
			"Document type LP_SHIP_GOODS with format MANUAL is not supported."
		);
	}
}
