//! Closed catalogs of document types, formats, and product groups with their wire strings.

// self
use crate::_prelude::*;

macro_rules! def_wire_enum {
	($name:ident, $doc:literal, $kind:literal, { $($(#[$meta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
		#[doc = $doc]
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub enum $name {
			$($(#[$meta])* $variant,)+
		}
		impl $name {
			/// Every variant, in declaration order.
			pub const ALL: &'static [Self] = &[$(Self::$variant),+];

			/// Returns the wire string sent to the API.
			pub const fn as_str(self) -> &'static str {
				match self {
					$(Self::$variant => $wire,)+
				}
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(self.as_str())
			}
		}
		impl FromStr for $name {
			type Err = WireValueError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$($wire => Ok(Self::$variant),)+
					_ => Err(WireValueError { kind: $kind, value: s.to_owned() }),
				}
			}
		}
		impl TryFrom<String> for $name {
			type Error = WireValueError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				value.parse()
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.as_str().to_owned()
			}
		}
	};
}

/// Error returned when a wire string names no known variant.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("`{value}` is not a known {kind}.")]
pub struct WireValueError {
	/// Catalog being parsed.
	pub kind: &'static str,
	/// Rejected input.
	pub value: String,
}

def_wire_enum! { DocumentType, "Document type submitted to the marking API.", "document type", {
	/// Introduction into circulation of goods produced in the Russian Federation.
	IntroduceGoods => "LP_INTRODUCE_GOODS",
	/// Shipment of goods to another participant.
	ShipGoods => "LP_SHIP_GOODS",
	/// Acceptance of shipped goods.
	AcceptGoods => "LP_ACCEPT_GOODS",
} }

def_wire_enum! { DocumentFormat, "Encoding of the submitted document body.", "document format", {
	/// JSON body.
	Manual => "MANUAL",
	/// XML body.
	Xml => "XML",
	/// CSV body.
	Csv => "CSV",
} }

def_wire_enum! { ProductGroup, "Product group; selects the `pg` endpoint parameter.", "product group", {
	/// Light industry (clothes).
	Clothes => "clothes",
	/// Footwear.
	Shoes => "shoes",
	/// Tobacco products.
	Tobacco => "tobacco",
	/// Perfumery.
	Perfumery => "perfumery",
	/// Tires.
	Tires => "tires",
	/// Photo equipment and electronics.
	Electronics => "electronics",
	/// Pharmaceuticals.
	Pharma => "pharma",
	/// Dairy.
	Milk => "milk",
	/// Bicycles.
	Bicycle => "bicycle",
	/// Wheelchairs.
	Wheelchairs => "wheelchairs",
} }

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn every_variant_parses_back_from_its_wire_string() {
		for group in ProductGroup::ALL {
			assert_eq!(group.as_str().parse::<ProductGroup>(), Ok(*group));
		}
		for format in DocumentFormat::ALL {
			assert_eq!(format.as_str().parse::<DocumentFormat>(), Ok(*format));
		}
		for kind in DocumentType::ALL {
			assert_eq!(kind.as_str().parse::<DocumentType>(), Ok(*kind));
		}

		assert_eq!(ProductGroup::ALL.len(), 10);
		assert_eq!(DocumentType::IntroduceGoods.to_string(), "LP_INTRODUCE_GOODS");
	}

	#[test]
	fn unknown_wire_values_are_rejected() {
		let err = "CLOTHES".parse::<ProductGroup>().expect_err("Wire values are case-sensitive.");

		assert_eq!(err.to_string(), "`CLOTHES` is not a known product group.");
		assert!(serde_json::from_str::<DocumentType>("\"LP_UNKNOWN\"").is_err());
	}

	#[test]
	fn serde_uses_wire_strings() {
		let payload = serde_json::to_string(&ProductGroup::Wheelchairs)
			.expect("Product group should serialize.");

		assert_eq!(payload, "\"wheelchairs\"");

		let format: DocumentFormat =
			serde_json::from_str("\"MANUAL\"").expect("Document format should deserialize.");

		assert_eq!(format, DocumentFormat::Manual);
	}
}
