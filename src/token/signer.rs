//! Pluggable signing of issuer challenges.

// self
use crate::{_prelude::*, error::SigningError};

/// Signs the challenge payload served by the issuer with caller-supplied key material.
///
/// The output is base64-encoded by the token manager before it is exchanged for a token.
/// Plug a real detached-signature implementation in here; the crate never picks a
/// cryptographic scheme on its own.
pub trait ChallengeSigner
where
	Self: Send + Sync,
{
	/// Produces the signed bytes for `payload` using `signature` as key material.
	fn sign(&self, payload: &str, signature: &str) -> Result<Vec<u8>, SigningError>;
}

/// Reference signer that appends the signature material to the payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConcatSigner;
impl ChallengeSigner for ConcatSigner {
	fn sign(&self, payload: &str, signature: &str) -> Result<Vec<u8>, SigningError> {
		Ok(format!("{payload}{signature}").into_bytes())
	}
}
