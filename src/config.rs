//! Client configuration: endpoints, admission rate, token lifetime, and transport timeouts.
//!
//! Every duration is (de)serialized as whole seconds so config files stay readable.

// self
use crate::{_prelude::*, error::ConfigError};

/// Top-level configuration consumed by [`CrptClient::new`](crate::client::CrptClient::new).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
	/// Base URL of the token issuer (`/auth/cert/key` and `/auth/cert` live below it).
	pub issuer: Url,
	/// Base URL of the document submission host.
	pub submission_host: Url,
	/// Admission window shared by every submission.
	pub rate: RateLimitConfig,
	/// Token lifetime policy.
	pub token: TokenConfig,
	/// Upper bound on a single HTTP exchange, from connect to last body byte.
	#[serde(with = "secs")]
	pub request_timeout: Duration,
	/// Upper bound on establishing a connection.
	#[serde(with = "secs")]
	pub connect_timeout: Duration,
}
impl ClientConfig {
	const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
	const DEFAULT_ISSUER: &'static str = "https://ismp.crpt.ru/api/v3";
	const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
	const DEFAULT_SUBMISSION_HOST: &'static str = "https://markirovka.crpt.ru/api/v3";

	/// Creates a configuration pointing at the given issuer and submission hosts.
	pub fn new(issuer: Url, submission_host: Url) -> Self {
		Self { issuer, submission_host, ..Self::default() }
	}

	/// Overrides the admission window.
	pub fn with_rate(mut self, rate: RateLimitConfig) -> Self {
		self.rate = rate;

		self
	}

	/// Overrides the token lifetime policy.
	pub fn with_token(mut self, token: TokenConfig) -> Self {
		self.token = token;

		self
	}

	/// Overrides the per-request timeout.
	pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the connect timeout.
	pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
		self.connect_timeout = timeout;

		self
	}

	/// Checks every section and resolves the derived endpoints.
	pub fn validate(&self) -> Result<Endpoints, ConfigError> {
		self.rate.validate()?;
		self.token.validate()?;

		Endpoints::resolve(&self.issuer, &self.submission_host)
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			issuer: Url::parse(Self::DEFAULT_ISSUER).expect("Default issuer URL must parse."),
			submission_host: Url::parse(Self::DEFAULT_SUBMISSION_HOST)
				.expect("Default submission URL must parse."),
			rate: RateLimitConfig::default(),
			token: TokenConfig::default(),
			request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
			connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
		}
	}
}

/// Fixed-window admission parameters: at most `admissions` per `window`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
	/// Window length.
	#[serde(with = "secs")]
	pub window: Duration,
	/// Admissions allowed per window; also the worker pool size.
	pub admissions: u32,
}
impl RateLimitConfig {
	/// Longest accepted window.
	pub const MAX_WINDOW: Duration = Duration::from_secs(366 * 24 * 60 * 60);

	/// Creates a new window description without validating it.
	pub const fn new(window: Duration, admissions: u32) -> Self {
		Self { window, admissions }
	}

	/// Rejects zero capacity, zero-length windows and windows longer than
	/// [`MAX_WINDOW`](Self::MAX_WINDOW).
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.admissions < 1 {
			return Err(ConfigError::InvalidRateLimit {
				reason: "admissions per window must be at least 1",
			});
		}
		if self.window.is_zero() {
			return Err(ConfigError::InvalidRateLimit { reason: "window must be non-zero" });
		}
		if self.window > Self::MAX_WINDOW {
			return Err(ConfigError::InvalidRateLimit { reason: "window must not exceed 366 days" });
		}

		Ok(())
	}
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self::new(Duration::from_secs(5 * 60), 5)
	}
}

/// Token lifetime policy: cached tokens expire `ttl - safety_margin` after issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
	/// Lifetime advertised by the issuer.
	#[serde(with = "secs")]
	pub ttl: Duration,
	/// Portion of the lifetime given up so tokens are replaced before the issuer expires them.
	#[serde(with = "secs")]
	pub safety_margin: Duration,
}
impl TokenConfig {
	/// Longest accepted token lifetime.
	pub const MAX_TTL: Duration = Duration::from_secs(366 * 24 * 60 * 60);

	/// Creates a new lifetime policy without validating it.
	pub const fn new(ttl: Duration, safety_margin: Duration) -> Self {
		Self { ttl, safety_margin }
	}

	/// Lifetime actually applied to cached tokens.
	pub fn effective_ttl(&self) -> Duration {
		self.ttl.saturating_sub(self.safety_margin)
	}

	/// Rejects policies that would cache already-expired tokens or exceed
	/// [`MAX_TTL`](Self::MAX_TTL).
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.ttl > Self::MAX_TTL {
			return Err(ConfigError::InvalidTokenLifetime {
				reason: "token lifetime must not exceed 366 days",
			});
		}
		if self.effective_ttl().is_zero() {
			return Err(ConfigError::InvalidTokenLifetime {
				reason: "safety margin must be shorter than the token lifetime",
			});
		}

		Ok(())
	}
}
impl Default for TokenConfig {
	fn default() -> Self {
		Self::new(Duration::from_secs(10 * 60 * 60), Duration::from_secs(60 * 60))
	}
}

/// Fully resolved endpoint URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// `GET` endpoint serving the challenge to sign.
	pub challenge: Url,
	/// `POST` endpoint exchanging a signed challenge for a token.
	pub token: Url,
	/// `POST` endpoint accepting documents; `pg` is appended per submission.
	pub create_document: Url,
}
impl Endpoints {
	fn resolve(issuer: &Url, submission_host: &Url) -> Result<Self, ConfigError> {
		Ok(Self {
			challenge: join(issuer, "auth/cert/key", "challenge")?,
			token: join(issuer, "auth/cert", "token")?,
			create_document: join(submission_host, "lk/documents/create", "create_document")?,
		})
	}
}

fn join(base: &Url, path: &str, endpoint: &'static str) -> Result<Url, ConfigError> {
	let raw = format!("{}/{path}", base.as_str().trim_end_matches('/'));

	Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
}

mod secs {
	// self
	use crate::_prelude::*;

	pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_u64(value.as_secs())
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		u64::deserialize(deserializer).map(Duration::from_secs)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_config_is_valid() {
		let config = ClientConfig::default();
		let endpoints = config.validate().expect("Default configuration should validate.");

		assert_eq!(config.rate.admissions, 5);
		assert_eq!(config.rate.window, Duration::from_secs(300));
		assert_eq!(config.token.effective_ttl(), Duration::from_secs(9 * 60 * 60));
		assert_eq!(endpoints.challenge.as_str(), "https://ismp.crpt.ru/api/v3/auth/cert/key");
		assert_eq!(endpoints.token.as_str(), "https://ismp.crpt.ru/api/v3/auth/cert");
		assert_eq!(
			endpoints.create_document.as_str(),
			"https://markirovka.crpt.ru/api/v3/lk/documents/create"
		);
	}

	#[test]
	fn rate_limit_rejects_zero_capacity_and_window() {
		let err = RateLimitConfig::new(Duration::from_secs(1), 0)
			.validate()
			.expect_err("Zero admissions should be rejected.");

		assert!(matches!(err, ConfigError::InvalidRateLimit { .. }));

		let err = RateLimitConfig::new(Duration::ZERO, 1)
			.validate()
			.expect_err("Zero-length windows should be rejected.");

		assert!(matches!(err, ConfigError::InvalidRateLimit { .. }));
	}

	#[test]
	fn token_margin_must_leave_positive_lifetime() {
		let err = TokenConfig::new(Duration::from_secs(60), Duration::from_secs(60))
			.validate()
			.expect_err("A margin equal to the lifetime should be rejected.");

		assert!(matches!(err, ConfigError::InvalidTokenLifetime { .. }));
	}

	#[test]
	fn oversized_durations_are_rejected() {
		let err = RateLimitConfig::new(Duration::from_secs(u64::MAX), 1)
			.validate()
			.expect_err("An unbounded window should be rejected.");

		assert!(matches!(err, ConfigError::InvalidRateLimit { .. }));
		assert!(RateLimitConfig::new(RateLimitConfig::MAX_WINDOW, 1).validate().is_ok());

		let err = TokenConfig::new(Duration::from_secs(u64::MAX), Duration::from_secs(60 * 60))
			.validate()
			.expect_err("An unbounded token lifetime should be rejected.");

		assert!(matches!(err, ConfigError::InvalidTokenLifetime { .. }));
	}

	#[test]
	fn endpoints_tolerate_trailing_slash() {
		let config = ClientConfig::new(
			Url::parse("http://127.0.0.1:8080/").expect("Issuer fixture should parse."),
			Url::parse("http://127.0.0.1:9090/api").expect("Submission fixture should parse."),
		);
		let endpoints = config.validate().expect("Local endpoints should validate.");

		assert_eq!(endpoints.challenge.as_str(), "http://127.0.0.1:8080/auth/cert/key");
		assert_eq!(
			endpoints.create_document.as_str(),
			"http://127.0.0.1:9090/api/lk/documents/create"
		);
	}

	#[test]
	fn durations_round_trip_as_seconds() {
		let rate = RateLimitConfig::new(Duration::from_secs(60), 3);
		let payload = serde_json::to_string(&rate).expect("Rate config should serialize.");

		assert_eq!(payload, "{\"window\":60,\"admissions\":3}");

		let config: ClientConfig =
			serde_json::from_str("{\"rate\":{\"window\":1,\"admissions\":1},\"request_timeout\":5}")
				.expect("Partial configuration should deserialize with defaults.");

		assert_eq!(config.rate, RateLimitConfig::new(Duration::from_secs(1), 1));
		assert_eq!(config.request_timeout, Duration::from_secs(5));
		assert_eq!(config.token, TokenConfig::default());
	}
}
