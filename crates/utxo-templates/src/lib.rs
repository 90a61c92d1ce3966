//! Standard script templates.
//!
//! Recognizes, validates, extracts parameters from, and generates the
//! standard locking and unlocking script shapes:
//! - pay-to-pubkey and pay-to-pubkey-hash
//! - pay-to-script-hash
//! - bare multisig
//! - null-data (OP_RETURN) outputs
//! - version 0 witness programs, generic and key-hash / script-hash
//!
//! Every template is a stateless value implementing [`ScriptTemplate`].
//! [`StandardScripts`] holds one of each in classification priority order.

pub mod template;
pub mod tx_out_type;
pub mod null_data;
pub mod multisig;
pub mod script_hash;
pub mod pubkey;
pub mod pubkey_hash;
pub mod witness;
pub mod wit_pubkey_hash;
pub mod wit_script_hash;
pub mod standard;

mod error;
pub use error::TemplateError;
pub use template::{FastCheck, ScriptTemplate};
pub use tx_out_type::TxOutType;
pub use null_data::NullDataTemplate;
pub use multisig::{MultisigParams, MultisigTemplate};
pub use script_hash::{ScriptHashSigParams, ScriptHashTemplate};
pub use pubkey::PubKeyTemplate;
pub use pubkey_hash::{PubKeyHashSigParams, PubKeyHashTemplate};
pub use witness::{WitProgramParams, WitnessTemplate};
pub use wit_pubkey_hash::WitPubKeyHashTemplate;
pub use wit_script_hash::{WitScriptHashParams, WitScriptHashTemplate};
pub use standard::{LockingScriptParams, StandardScripts, StandardTemplate};
