//! Public extension contracts (request signing).
//!
//! Token-issuance signing lives in [`ChallengeSigner`](crate::token::ChallengeSigner); this
//! module covers attaching an issued token to arbitrary request builders.

pub mod request_signer;

pub use request_signer::*;
