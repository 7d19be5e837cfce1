//! Facade wiring the limiter, token manager, guard, and worker pool together.

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	document::{IntroduceGoodsDocument, ProductGroup},
	http::ReqwestHttpClient,
	obs::{self, FlowKind, FlowOutcome},
	rate_limit::RateLimiter,
	submission::{Dispatcher, SubmissionGuard, SubmissionHandle, SubmissionRequest},
	token::{ChallengeSigner, ConcatSigner, TokenManager, TokenMetrics},
};

/// Submits documents to the CRPT host under one shared rate limit and bearer token.
///
/// Requests are validated synchronously by [`SubmissionGuard`]; rejected ones never reach
/// the worker pool, so they cost neither a worker nor an admission slot. Accepted ones
/// return a [`SubmissionHandle`] immediately.
pub struct CrptClient {
	config: ClientConfig,
	guard: SubmissionGuard,
	limiter: Arc<RateLimiter>,
	tokens: Arc<TokenManager>,
	dispatcher: Dispatcher,
}
impl CrptClient {
	/// Creates a client using [`ConcatSigner`] for issuer challenges.
	///
	/// Must be called inside a Tokio runtime; the worker pool starts immediately.
	pub fn new(config: ClientConfig) -> Result<Self> {
		Self::with_signer(config, Arc::new(ConcatSigner))
	}

	/// Creates a client that signs issuer challenges with `signer`.
	pub fn with_signer(config: ClientConfig, signer: Arc<dyn ChallengeSigner>) -> Result<Self> {
		let http = ReqwestHttpClient::from_config(&config)?;

		Self::with_http_client(config, http, signer)
	}

	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		config: ClientConfig,
		http: ReqwestHttpClient,
		signer: Arc<dyn ChallengeSigner>,
	) -> Result<Self> {
		let endpoints = config.validate()?;
		let limiter = Arc::new(RateLimiter::new(config.rate)?);
		let tokens = Arc::new(TokenManager::new(http.clone(), &endpoints, config.token, signer)?);
		let dispatcher = Dispatcher::new(limiter.clone(), tokens.clone(), http, &endpoints)?;

		Ok(Self { config, guard: SubmissionGuard, limiter, tokens, dispatcher })
	}

	/// Validates `request` and hands it to the worker pool.
	pub fn submit(&self, request: SubmissionRequest) -> Result<SubmissionHandle> {
		if let Err(e) = self.guard.validate(&request) {
			obs::record_flow_outcome(FlowKind::Submission, FlowOutcome::Rejected);
			obs::failure_event(FlowKind::Submission, "submission_rejected", &e);

			return Err(e.into());
		}

		self.dispatcher.submit(request)
	}

	/// Submits a JSON goods-introduction document for `product_group`.
	pub fn submit_introduce_goods(
		&self,
		signature: impl Into<String>,
		document: IntroduceGoodsDocument,
		product_group: ProductGroup,
	) -> Result<SubmissionHandle> {
		self.submit(SubmissionRequest::introduce_goods(signature, document, product_group)?)
	}

	/// Admission limiter shared by every worker.
	pub fn rate_limiter(&self) -> &RateLimiter {
		&self.limiter
	}

	/// Token manager shared by every worker.
	pub fn token_manager(&self) -> &TokenManager {
		&self.tokens
	}

	/// Token cache counters.
	pub fn token_metrics(&self) -> &TokenMetrics {
		self.tokens.metrics()
	}

	/// Configuration the client was built from.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Stops accepting submissions and waits for queued ones to finish.
	pub async fn shutdown(&self) {
		self.dispatcher.shutdown().await;
	}
}
impl Debug for CrptClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CrptClient")
			.field("issuer", &self.config.issuer.as_str())
			.field("submission_host", &self.config.submission_host.as_str())
			.field("limiter", &self.limiter)
			.field("dispatcher", &self.dispatcher)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		config::RateLimitConfig,
		document::{DocumentFormat, DocumentType},
		error::{ConfigError, ValidationError},
	};

	#[tokio::test]
	async fn invalid_config_fails_fast() {
		let config = ClientConfig::default().with_rate(RateLimitConfig::new(Duration::ZERO, 1));
		let err = CrptClient::new(config).expect_err("A zero window should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidRateLimit { .. })));
	}

	#[tokio::test]
	async fn unsupported_document_is_rejected_before_admission() {
		let client = CrptClient::new(ClientConfig::default()).expect("Default client should build.");
		let request = SubmissionRequest::new(
			"sig",
			Arc::new(IntroduceGoodsDocument::default()),
			DocumentType::AcceptGoods,
			DocumentFormat::Manual,
			ProductGroup::Tires,
		)
		.expect("Request fixture should be valid.");
		let err = client.submit(request).expect_err("Acceptance documents are not supported.");

		assert!(matches!(err, Error::Validation(ValidationError::UnsupportedDocument { .. })));
		assert_eq!(client.rate_limiter().admitted(), 0);
		assert_eq!(client.rate_limiter().available(), 5);
	}

	#[tokio::test]
	async fn empty_signature_is_rejected_by_the_convenience_entry() {
		let client = CrptClient::new(ClientConfig::default()).expect("Default client should build.");
		let err = client
			.submit_introduce_goods("", IntroduceGoodsDocument::default(), ProductGroup::Milk)
			.expect_err("Empty signatures should be rejected.");

		assert!(matches!(err, Error::Validation(ValidationError::MissingSignature)));
	}
}
