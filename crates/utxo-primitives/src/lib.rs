//! Hashing and secp256k1 primitives for script templates.
//!
//! - digests: SHA-256, SHA-256d, RIPEMD-160 and Hash160
//! - public keys with quick format and deep on-curve checks
//! - ECDSA signatures with strict DER decoding

pub mod ec;
pub mod hash;

mod error;
pub use error::PrimitivesError;
