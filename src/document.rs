//! Document payloads and the catalogs describing them.
//!
//! The submission path only depends on [`Encodable`]; concrete payloads such as
//! [`IntroduceGoodsDocument`] decide how they become bytes.

mod introduce_goods;
mod kind;

pub use introduce_goods::*;
pub use kind::*;

// self
use crate::_prelude::*;

/// Capability shared by every document payload: produce the canonical bytes that get
/// base64-encoded into `product_document`.
pub trait Encodable
where
	Self: Send + Sync,
{
	/// Serializes the payload.
	fn to_canonical_bytes(&self) -> Result<Vec<u8>>;
}
