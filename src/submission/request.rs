//! Immutable submission requests and the JSON body derived from them.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	document::{DocumentFormat, DocumentType, Encodable, IntroduceGoodsDocument, ProductGroup},
	error::{ConfigError, ValidationError},
};

/// One document to submit, together with the signature material used for both the token
/// refresh and the `signature` field of the body.
#[derive(Clone)]
pub struct SubmissionRequest {
	signature: String,
	document: Arc<dyn Encodable>,
	document_type: DocumentType,
	document_format: DocumentFormat,
	product_group: ProductGroup,
}
impl SubmissionRequest {
	/// Creates a request; the signature must be non-empty.
	pub fn new(
		signature: impl Into<String>,
		document: Arc<dyn Encodable>,
		document_type: DocumentType,
		document_format: DocumentFormat,
		product_group: ProductGroup,
	) -> Result<Self, ValidationError> {
		let signature = signature.into();

		if signature.is_empty() {
			return Err(ValidationError::MissingSignature);
		}

		Ok(Self { signature, document, document_type, document_format, product_group })
	}

	/// Creates a JSON goods-introduction request for `product_group`.
	pub fn introduce_goods(
		signature: impl Into<String>,
		document: IntroduceGoodsDocument,
		product_group: ProductGroup,
	) -> Result<Self, ValidationError> {
		Self::new(
			signature,
			Arc::new(document),
			DocumentType::IntroduceGoods,
			DocumentFormat::Manual,
			product_group,
		)
	}

	/// Raw signature material.
	pub fn signature(&self) -> &str {
		&self.signature
	}

	/// Document type.
	pub fn document_type(&self) -> DocumentType {
		self.document_type
	}

	/// Document format.
	pub fn document_format(&self) -> DocumentFormat {
		self.document_format
	}

	/// Product group; also the `pg` query parameter.
	pub fn product_group(&self) -> ProductGroup {
		self.product_group
	}

	/// Builds the `POST /lk/documents/create` JSON body.
	pub fn to_body(&self) -> Result<Vec<u8>> {
		let body = CreateDocumentBody {
			product_document: STANDARD.encode(self.document.to_canonical_bytes()?),
			signature: STANDARD.encode(self.signature.as_bytes()),
			// The body names the group in upper case; the `pg` parameter uses the wire value.
			product_group: self.product_group.as_str().to_ascii_uppercase(),
			document_type: self.document_type,
			document_format: self.document_format,
		};

		serde_json::to_vec(&body).map_err(|e| ConfigError::from(e).into())
	}
}
impl Debug for SubmissionRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SubmissionRequest")
			.field("document_type", &self.document_type)
			.field("document_format", &self.document_format)
			.field("product_group", &self.product_group)
			.finish_non_exhaustive()
	}
}

#[derive(Serialize)]
struct CreateDocumentBody {
	product_document: String,
	signature: String,
	product_group: String,
	#[serde(rename = "type")]
	document_type: DocumentType,
	document_format: DocumentFormat,
}
