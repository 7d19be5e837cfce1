//! Goods-introduction (`LP_INTRODUCE_GOODS`) payload.

// self
use crate::{_prelude::*, document::Encodable, error::ConfigError};

/// Participant block nested in the document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
	/// Taxpayer number of the participant.
	#[serde(rename = "participantInn", skip_serializing_if = "Option::is_none")]
	pub participant_inn: Option<String>,
}

/// Introduction into circulation of goods produced in the Russian Federation.
///
/// Absent fields are omitted from the JSON body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroduceGoodsDocument {
	/// Participant description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<Description>,
	/// Document identifier.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub doc_id: Option<String>,
	/// Document status.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub doc_status: Option<String>,
	/// Document type label.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub doc_type: Option<String>,
	/// Whether the goods are imported.
	#[serde(rename = "importRequest")]
	pub import_request: bool,
	/// Taxpayer number of the owner.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub owner_inn: Option<String>,
	/// Taxpayer number of the participant.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub participant_inn: Option<String>,
	/// Taxpayer number of the producer.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub producer_inn: Option<String>,
	/// Production date (`YYYY-MM-DD`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub production_date: Option<String>,
	/// Production type.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub production_type: Option<String>,
	/// Products covered by the document.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub products: Vec<ProductItem>,
	/// Registration date.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reg_date: Option<String>,
	/// Registration number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reg_number: Option<String>,
}
impl Encodable for IntroduceGoodsDocument {
	fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
		serde_json::to_vec(self).map_err(|e| ConfigError::from(e).into())
	}
}

/// Single product line of an [`IntroduceGoodsDocument`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductItem {
	/// Conformity certificate type.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub certificate_document: Option<String>,
	/// Conformity certificate date.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub certificate_document_date: Option<String>,
	/// Conformity certificate number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub certificate_document_number: Option<String>,
	/// Taxpayer number of the owner.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub owner_inn: Option<String>,
	/// Taxpayer number of the producer.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub producer_inn: Option<String>,
	/// Production date.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub production_date: Option<String>,
	/// Commodity nomenclature code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tnved_code: Option<String>,
	/// Identification code of the item.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub uit_code: Option<String>,
	/// Identification code of the transport package.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub uitu_code: Option<String>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_document_encodes_only_required_flag() {
		let bytes = IntroduceGoodsDocument::default()
			.to_canonical_bytes()
			.expect("Empty document should encode.");

		assert_eq!(bytes, b"{\"importRequest\":false}");
	}

	#[test]
	fn nested_fields_use_wire_names() {
		let document = IntroduceGoodsDocument {
			description: Some(Description { participant_inn: Some("7700000000".into()) }),
			doc_id: Some("doc-1".into()),
			products: vec![ProductItem { uit_code: Some("010461".into()), ..Default::default() }],
			..Default::default()
		};
		let value: serde_json::Value = serde_json::from_slice(
			&document.to_canonical_bytes().expect("Document should encode."),
		)
		.expect("Encoded document should be valid JSON.");

		assert_eq!(value["description"]["participantInn"], "7700000000");
		assert_eq!(value["doc_id"], "doc-1");
		assert_eq!(value["products"][0]["uit_code"], "010461");
		assert!(value.get("reg_number").is_none());
	}
}
