//! Rate-limited, token-aware client for submitting signed documents to the CRPT marking
//! API: a fixed-window admission limiter, a single-flight token cache, and a worker pool
//! that hands back one awaitable handle per submission.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod ext;
pub mod http;
pub mod obs;
pub mod rate_limit;
pub mod submission;
pub mod token;
#[cfg(any(test, feature = "test"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::CrptClient,
		config::{ClientConfig, RateLimitConfig},
		http::ReqwestHttpClient,
		token::{ChallengeSigner, ConcatSigner, TokenManager},
	};

	/// Builds a configuration whose issuer and submission host both live under `base`
	/// (typically an `httpmock` server URL).
	pub fn test_config(base: &str) -> ClientConfig {
		let base = Url::parse(base).expect("Mock server base URL should parse.");

		ClientConfig::new(base.clone(), base)
			.with_request_timeout(Duration::from_secs(5))
			.with_connect_timeout(Duration::from_secs(5))
	}

	/// Builds a reqwest HTTP client sized for `config` that accepts the self-signed
	/// certificates produced by `httpmock`.
	pub fn test_reqwest_http_client(config: &ClientConfig) -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.pool_max_idle_per_host(config.rate.admissions as usize)
			.timeout(config.request_timeout)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a standalone [`TokenManager`] against `base` using [`ConcatSigner`].
	pub fn build_test_token_manager(base: &str) -> TokenManager {
		let config = test_config(base);
		let endpoints = config.validate().expect("Test configuration should validate.");

		TokenManager::new(
			test_reqwest_http_client(&config),
			&endpoints,
			config.token,
			Arc::new(ConcatSigner),
		)
		.expect("Test token manager should build.")
	}

	/// Constructs a [`CrptClient`] against `base` admitting `admissions` submissions per
	/// `window`, signing challenges with [`ConcatSigner`].
	pub fn build_test_client(base: &str, window: Duration, admissions: u32) -> CrptClient {
		build_test_client_with_signer(base, window, admissions, Arc::new(ConcatSigner))
	}

	/// Same as [`build_test_client`] but signs challenges with `signer`.
	pub fn build_test_client_with_signer(
		base: &str,
		window: Duration,
		admissions: u32,
		signer: Arc<dyn ChallengeSigner>,
	) -> CrptClient {
		let config = test_config(base).with_rate(RateLimitConfig::new(window, admissions));
		let http = test_reqwest_http_client(&config);

		CrptClient::with_http_client(config, http, signer).expect("Test client should build.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
