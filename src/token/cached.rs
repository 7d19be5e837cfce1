//! Cached bearer token plus its local expiry.

// self
// crates.io
use time::PrimitiveDateTime;
// self
use crate::{_prelude::*, token::TokenSecret};

/// Token issued by the most recent successful refresh.
///
/// `expires_at` is always `issued_at + ttl - safety_margin`; the pair is written as a whole
/// so readers never see a value from one refresh next to an expiry from another.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
	/// Bearer token value.
	pub value: TokenSecret,
	/// Instant the issuer handed out the token.
	pub issued_at: OffsetDateTime,
	/// Instant after which the token is no longer returned from cache.
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Records a freshly issued token that stays usable for `effective_ttl`.
	///
	/// Lifetimes reaching past the calendar's end saturate at the last representable instant.
	pub fn issue(value: TokenSecret, issued_at: OffsetDateTime, effective_ttl: Duration) -> Self {
		let expires_at = time::Duration::try_from(effective_ttl)
			.ok()
			.and_then(|ttl| issued_at.checked_add(ttl))
			.unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc());

		Self { value, issued_at, expires_at }
	}

	/// Returns `true` while `instant` is strictly before the expiry.
	pub fn is_fresh_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Convenience helper that checks freshness against the current UTC instant.
	pub fn is_fresh(&self) -> bool {
		self.is_fresh_at(OffsetDateTime::now_utc())
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("value", &self.value)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
