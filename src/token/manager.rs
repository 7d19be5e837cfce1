//! Cached token lifecycle with a single-flight challenge/sign/exchange refresh.
//!
//! [`TokenManager::obtain_token`] answers from the cache while the token is fresh. Once it
//! expires, the first caller takes the refresh guard and runs the round-trip; callers that
//! queue on the guard meanwhile receive that refresh's outcome, success or failure, instead
//! of starting their own. Cache writes happen under the state lock in one assignment.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	config::{Endpoints, TokenConfig},
	error::{ConfigError, HttpStage},
	http::ReqwestHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	token::{
		CachedToken, ChallengeMessage, ChallengeSigner, SignedChallenge, TokenMetrics,
		TokenResponse, TokenSecret,
	},
};

#[derive(Debug, Default)]
struct TokenState {
	cached: Option<CachedToken>,
	/// Bumped every time a refresh round-trip completes.
	generation: u64,
	last_outcome: Option<Result<CachedToken>>,
}

/// Owns the single cached credential and refreshes it on demand.
pub struct TokenManager {
	http: ReqwestHttpClient,
	challenge_url: Url,
	token_url: Url,
	lifetime: TokenConfig,
	signer: Arc<dyn ChallengeSigner>,
	state: Mutex<TokenState>,
	refresh_guard: AsyncMutex<()>,
	metrics: TokenMetrics,
}
impl TokenManager {
	/// Creates a manager that talks to the issuer endpoints in `endpoints`.
	pub fn new(
		http: ReqwestHttpClient,
		endpoints: &Endpoints,
		lifetime: TokenConfig,
		signer: Arc<dyn ChallengeSigner>,
	) -> Result<Self, ConfigError> {
		lifetime.validate()?;

		Ok(Self {
			http,
			challenge_url: endpoints.challenge.clone(),
			token_url: endpoints.token.clone(),
			lifetime,
			signer,
			state: Default::default(),
			refresh_guard: AsyncMutex::new(()),
			metrics: Default::default(),
		})
	}

	/// Returns a fresh token, refreshing it with `signature` when the cache is stale.
	pub async fn obtain_token(&self, signature: &str) -> Result<TokenSecret> {
		self.obtain_token_at(signature, OffsetDateTime::now_utc()).await
	}

	/// Same as [`obtain_token`](Self::obtain_token) with freshness evaluated at `now`.
	pub async fn obtain_token_at(
		&self,
		signature: &str,
		now: OffsetDateTime,
	) -> Result<TokenSecret> {
		let observed = {
			let state = self.state.lock();

			if let Some(token) = state.cached.as_ref().filter(|token| token.is_fresh_at(now)) {
				self.metrics.record_cache_hit();
				obs::debug_event(FlowKind::TokenRefresh, "cache_hit");

				return Ok(token.value.clone());
			}

			state.generation
		};
		let _singleflight = self.refresh_guard.lock().await;

		if let Some(outcome) = self.completed_since(observed, now) {
			self.metrics.record_shared();

			return outcome.map(|token| token.value);
		}

		let outcome = self.refresh(signature).await;
		let mut state = self.state.lock();

		state.generation += 1;

		if let Ok(token) = &outcome {
			state.cached = Some(token.clone());
		}

		state.last_outcome = Some(outcome.clone());

		outcome.map(|token| token.value)
	}

	/// Drops the cached token so the next lookup refreshes.
	pub fn invalidate(&self) {
		self.state.lock().cached = None;
	}

	/// Returns a snapshot of the cached token, fresh or not.
	pub fn cached(&self) -> Option<CachedToken> {
		self.state.lock().cached.clone()
	}

	/// Counters describing cache effectiveness.
	pub fn metrics(&self) -> &TokenMetrics {
		&self.metrics
	}

	/// Outcome of a refresh that finished after `observed`, if it is still usable at `now`.
	fn completed_since(&self, observed: u64, now: OffsetDateTime) -> Option<Result<CachedToken>> {
		let state = self.state.lock();

		if state.generation == observed {
			return None;
		}

		match state.last_outcome.as_ref()? {
			Ok(token) if token.is_fresh_at(now) => Some(Ok(token.clone())),
			Ok(_) => None,
			Err(e) => Some(Err(e.clone())),
		}
	}

	async fn refresh(&self, signature: &str) -> Result<CachedToken> {
		const KIND: FlowKind = FlowKind::TokenRefresh;

		let span = FlowSpan::new(KIND, "refresh");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.metrics.record_refresh();

		let result: Result<CachedToken> = span
			.instrument(async {
				let challenge = self
					.http
					.send(HttpStage::Challenge, self.http.get(self.challenge_url.clone()))
					.await?
					.json::<ChallengeMessage>()?;
				let signed = self.signer.sign(&challenge.data, signature)?;
				let body = SignedChallenge { uuid: challenge.uuid, data: STANDARD.encode(signed) };
				let request = self
					.http
					.post(self.token_url.clone())
					.header(reqwest::header::CONTENT_TYPE, "application/json")
					.body(body.to_body());
				let token = self
					.http
					.send(HttpStage::TokenExchange, request)
					.await?
					.json::<TokenResponse>()?
					.into_token()?;

				Ok(CachedToken::issue(
					TokenSecret::new(token),
					OffsetDateTime::now_utc(),
					self.lifetime.effective_ttl(),
				))
			})
			.await;

		match &result {
			Ok(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				obs::info_event(KIND, "token_refreshed");
			},
			Err(e) => {
				self.metrics.record_failure();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				obs::failure_event(KIND, "token_refresh_failed", e);
			},
		}

		result
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("challenge_url", &self.challenge_url.as_str())
			.field("token_url", &self.token_url.as_str())
			.field("lifetime", &self.lifetime)
			.field("cached", &self.state.lock().cached)
			.finish()
	}
}
