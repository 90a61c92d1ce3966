//! secp256k1 keys and signatures.

pub mod public_key;
pub mod signature;

pub use public_key::PubKey;
pub use signature::Signature;
