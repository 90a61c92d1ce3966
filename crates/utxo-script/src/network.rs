//! Network parameters consulted by address encoding and script templates.

use serde::{Deserialize, Serialize};

use crate::flags::ScriptFlags;
use crate::ScriptError;

/// Default relay limit for a null-data locking script, in bytes.
pub const DEFAULT_MAX_OP_RETURN_RELAY: usize = 83;

fn default_signature_flags() -> ScriptFlags {
    ScriptFlags::STANDARD_SIGNATURE
}

fn default_max_op_return_relay() -> usize {
    DEFAULT_MAX_OP_RETURN_RELAY
}

/// Chain parameters for one network.
///
/// Only the pieces the template engine needs are carried: Base58 version
/// bytes, the signature strictness used when classifying signature pushes,
/// and the null-data size limit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Human readable name ("main", "test", "regtest" or a custom chain).
    pub name: String,
    /// Version byte of P2PKH addresses.
    pub pubkey_address_prefix: u8,
    /// Version byte of P2SH addresses.
    pub script_address_prefix: u8,
    /// Encoding rules a signature push must pass to be recognised.
    #[serde(default = "default_signature_flags")]
    pub signature_flags: ScriptFlags,
    /// Largest null-data locking script considered standard.
    #[serde(default = "default_max_op_return_relay")]
    pub max_op_return_relay: usize,
}

impl Network {
    /// Bitcoin mainnet (addresses start with '1' or '3').
    pub fn mainnet() -> Self {
        Network {
            name: "main".to_string(),
            pubkey_address_prefix: 0x00,
            script_address_prefix: 0x05,
            signature_flags: default_signature_flags(),
            max_op_return_relay: DEFAULT_MAX_OP_RETURN_RELAY,
        }
    }

    /// Bitcoin testnet (addresses start with 'm', 'n' or '2').
    pub fn testnet() -> Self {
        Network {
            name: "test".to_string(),
            pubkey_address_prefix: 0x6f,
            script_address_prefix: 0xc4,
            signature_flags: default_signature_flags(),
            max_op_return_relay: DEFAULT_MAX_OP_RETURN_RELAY,
        }
    }

    /// Local regression-test network; shares testnet's version bytes.
    pub fn regtest() -> Self {
        Network {
            name: "regtest".to_string(),
            ..Network::testnet()
        }
    }

    /// Load network parameters from a JSON document.
    ///
    /// `signature_flags` and `max_op_return_relay` may be omitted and take
    /// their standard defaults.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::mainnet()
    }
}
