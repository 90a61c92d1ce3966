//! Payment destinations: the hashes a standard locking script commits to.

use std::fmt;

use utxo_primitives::ec::PubKey;
use utxo_primitives::hash::{hash160, sha256};

use crate::opcodes::*;
use crate::{Script, ScriptError};

macro_rules! hash_id {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub fn new(hash: [u8; $len]) -> Self {
                $name(hash)
            }

            /// Wrap a hash given as a slice; fails unless it is exactly `LEN` bytes.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptError> {
                let hash: [u8; $len] =
                    bytes.try_into().map_err(|_| ScriptError::InvalidHashLength {
                        kind: stringify!($name),
                        expected: $len,
                        got: bytes.len(),
                    })?;
                Ok($name(hash))
            }

            pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
                Self::from_bytes(&hex::decode(hex_str)?)
            }

            pub fn to_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }
    };
}

hash_id!(
    /// `hash160` of a public key, paid to by P2PKH.
    KeyId,
    20
);
hash_id!(
    /// `hash160` of a redeem script, paid to by P2SH.
    ScriptId,
    20
);
hash_id!(
    /// `hash160` of a public key, paid to by version 0 witness key hash.
    WitKeyId,
    20
);
hash_id!(
    /// `sha256` of a witness script, paid to by version 0 witness script hash.
    WitScriptId,
    32
);

impl KeyId {
    pub fn from_pubkey(pubkey: &PubKey) -> Self {
        KeyId(pubkey.hash160())
    }

    /// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn locking_script(&self) -> Script {
        let mut bytes = vec![OP_DUP, OP_HASH160, OP_DATA_20];
        bytes.extend_from_slice(&self.0);
        bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        Script::from(bytes)
    }
}

impl ScriptId {
    pub fn from_script(script: &Script) -> Self {
        ScriptId(hash160(script.to_bytes()))
    }

    /// `OP_HASH160 <20> OP_EQUAL`
    pub fn locking_script(&self) -> Script {
        let mut bytes = vec![OP_HASH160, OP_DATA_20];
        bytes.extend_from_slice(&self.0);
        bytes.push(OP_EQUAL);
        Script::from(bytes)
    }
}

impl WitKeyId {
    pub fn from_pubkey(pubkey: &PubKey) -> Self {
        WitKeyId(pubkey.hash160())
    }

    /// `OP_0 <20>`
    pub fn locking_script(&self) -> Script {
        let mut bytes = vec![OP_0, OP_DATA_20];
        bytes.extend_from_slice(&self.0);
        Script::from(bytes)
    }
}

impl WitScriptId {
    pub fn from_script(script: &Script) -> Self {
        WitScriptId(sha256(script.to_bytes()))
    }

    /// `OP_0 <32>`
    pub fn locking_script(&self) -> Script {
        let mut bytes = vec![OP_0, OP_DATA_32];
        bytes.extend_from_slice(&self.0);
        Script::from(bytes)
    }
}

impl From<KeyId> for WitKeyId {
    fn from(id: KeyId) -> Self {
        WitKeyId(id.0)
    }
}

impl From<WitKeyId> for KeyId {
    fn from(id: WitKeyId) -> Self {
        KeyId(id.0)
    }
}

/// Any destination a standard locking script can pay to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxDestination {
    KeyId(KeyId),
    ScriptId(ScriptId),
    WitKeyId(WitKeyId),
    WitScriptId(WitScriptId),
}

impl TxDestination {
    /// The canonical locking script paying to this destination.
    pub fn locking_script(&self) -> Script {
        match self {
            TxDestination::KeyId(id) => id.locking_script(),
            TxDestination::ScriptId(id) => id.locking_script(),
            TxDestination::WitKeyId(id) => id.locking_script(),
            TxDestination::WitScriptId(id) => id.locking_script(),
        }
    }

    /// The raw hash bytes.
    pub fn to_bytes(&self) -> &[u8] {
        match self {
            TxDestination::KeyId(id) => id.to_bytes(),
            TxDestination::ScriptId(id) => id.to_bytes(),
            TxDestination::WitKeyId(id) => id.to_bytes(),
            TxDestination::WitScriptId(id) => id.to_bytes(),
        }
    }
}

impl From<KeyId> for TxDestination {
    fn from(id: KeyId) -> Self {
        TxDestination::KeyId(id)
    }
}

impl From<ScriptId> for TxDestination {
    fn from(id: ScriptId) -> Self {
        TxDestination::ScriptId(id)
    }
}

impl From<WitKeyId> for TxDestination {
    fn from(id: WitKeyId) -> Self {
        TxDestination::WitKeyId(id)
    }
}

impl From<WitScriptId> for TxDestination {
    fn from(id: WitScriptId) -> Self {
        TxDestination::WitScriptId(id)
    }
}
