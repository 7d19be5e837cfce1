//! Bearer token acquisition: challenge signing, issuer wire types, and the cached manager.

mod cached;
mod manager;
mod metrics;
mod secret;
mod signer;
mod source;
mod wire;

pub use cached::CachedToken;
pub use manager::TokenManager;
pub use metrics::TokenMetrics;
pub use secret::TokenSecret;
pub use signer::{ChallengeSigner, ConcatSigner};
pub use source::{StaticTokenSource, TokenFuture, TokenSource};
pub use wire::{ChallengeMessage, SignedChallenge, TokenResponse};
