//! Scripts and the values that live inside them.
//!
//! Ops and their push semantics, raw scripts, witness stacks, destination
//! hashes, Base58Check addresses, signature encoding rules and network
//! parameters.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod address;
pub mod destination;
pub mod flags;
pub mod network;
pub mod signature;
pub mod witness;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use address::{Address, AddressKind};
pub use chunk::ScriptChunk;
pub use destination::{KeyId, ScriptId, TxDestination, WitKeyId, WitScriptId};
pub use flags::ScriptFlags;
pub use network::Network;
pub use signature::{SigEncodingError, TransactionSignature};
pub use witness::Witness;
