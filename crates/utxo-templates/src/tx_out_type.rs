//! Classification tags for locking scripts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of locking script an output carries.
///
/// `ColdStake` is reserved for deployment-specific templates; no template in
/// this crate produces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxOutType {
    Nonstandard,
    Pubkey,
    PubkeyHash,
    ScriptHash,
    Multisig,
    NullData,
    Segwit,
    ColdStake,
}

impl TxOutType {
    /// Lowercase name, as used by `Display` and serde.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxOutType::Nonstandard => "nonstandard",
            TxOutType::Pubkey => "pubkey",
            TxOutType::PubkeyHash => "pubkeyhash",
            TxOutType::ScriptHash => "scripthash",
            TxOutType::Multisig => "multisig",
            TxOutType::NullData => "nulldata",
            TxOutType::Segwit => "segwit",
            TxOutType::ColdStake => "coldstake",
        }
    }

    /// `true` for every tag except `Nonstandard`.
    pub fn is_standard(&self) -> bool {
        *self != TxOutType::Nonstandard
    }
}

impl fmt::Display for TxOutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxOutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            TxOutType::Nonstandard,
            TxOutType::Pubkey,
            TxOutType::PubkeyHash,
            TxOutType::ScriptHash,
            TxOutType::Multisig,
            TxOutType::NullData,
            TxOutType::Segwit,
            TxOutType::ColdStake,
        ]
        .into_iter()
        .find(|t| t.as_str() == s)
        .ok_or_else(|| format!("unknown output type '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        for t in [TxOutType::PubkeyHash, TxOutType::NullData, TxOutType::ColdStake] {
            let json = serde_json::to_string(&t).expect("serialize");
            assert_eq!(json, format!("\"{}\"", t));
            assert_eq!(t.to_string().parse::<TxOutType>(), Ok(t));
        }
    }

    #[test]
    fn test_from_str_unknown() {
        assert!("witness_v0_keyhash".parse::<TxOutType>().is_err());
        assert!(!TxOutType::Nonstandard.is_standard());
        assert!(TxOutType::Segwit.is_standard());
    }
}
