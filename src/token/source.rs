//! Seam between the submission workers and whatever hands out bearer tokens.

// self
use crate::{
	_prelude::*,
	token::{TokenManager, TokenSecret},
};

/// Future returned by [`TokenSource::token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenSecret>> + 'a + Send>>;

/// Supplies a bearer token for a submission signed with `signature`.
///
/// [`TokenManager`] is the production source; [`StaticTokenSource`] serves a fixed token
/// where the issuer cannot be reached.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Returns a token usable for the next submission.
	fn token<'a>(&'a self, signature: &'a str) -> TokenFuture<'a>;
}
impl TokenSource for TokenManager {
	fn token<'a>(&'a self, signature: &'a str) -> TokenFuture<'a> {
		Box::pin(self.obtain_token(signature))
	}
}

/// Source that always returns the same pre-issued token and never calls the issuer.
#[derive(Clone, Debug)]
pub struct StaticTokenSource(TokenSecret);
impl StaticTokenSource {
	/// Wraps a pre-issued token.
	pub fn new(token: impl Into<String>) -> Self {
		Self(TokenSecret::new(token))
	}
}
impl TokenSource for StaticTokenSource {
	fn token<'a>(&'a self, _: &'a str) -> TokenFuture<'a> {
		let token = self.0.clone();

		Box::pin(async move { Ok(token) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn static_source_ignores_signature() {
		let source: Arc<dyn TokenSource> = Arc::new(StaticTokenSource::new("fixed"));
		let first = source.token("a").await.expect("Static tokens never fail.");
		let second = source.token("b").await.expect("Static tokens never fail.");

		assert_eq!(first.expose(), "fixed");
		assert_eq!(first, second);
		assert_eq!(
			format!("{:?}", StaticTokenSource::new("fixed")),
			"StaticTokenSource(TokenSecret(\"<redacted>\"))"
		);
	}
}
