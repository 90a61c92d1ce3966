//! secp256k1 public keys as they appear inside scripts.
//!
//! A `PubKey` keeps the exact serialized bytes (33-byte compressed or
//! 65-byte uncompressed/hybrid) so that scripts generated from it are
//! byte-identical to the scripts it was extracted from. The quick format
//! check only inspects length and prefix; the deep check decodes the point
//! on the curve with k256.

use k256::ecdsa::VerifyingKey;
use std::fmt;

use crate::hash::hash160;
use crate::PrimitivesError;

/// Prefix plus x.
pub const COMPRESSED_LEN: usize = 33;

/// Prefix plus x and y.
pub const UNCOMPRESSED_LEN: usize = 65;

/// A serialized secp256k1 public key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PubKey {
    /// The SEC1 serialization, exactly as pushed in a script.
    bytes: Vec<u8>,
}

impl PubKey {
    /// Quick (and optionally deep) validity test for serialized key bytes.
    ///
    /// The quick test accepts 33 bytes starting with 0x02/0x03, or 65 bytes
    /// starting with 0x04/0x06/0x07. With `deep` set the point must also
    /// decode on the curve.
    pub fn check(data: &[u8], deep: bool) -> bool {
        Self::check_range(data, 0, data.len(), deep)
    }

    /// Same as [`PubKey::check`] over `data[offset..offset + count]`.
    ///
    /// Out-of-bounds windows are reported as invalid.
    pub fn check_range(data: &[u8], offset: usize, count: usize, deep: bool) -> bool {
        let Some(window) = offset.checked_add(count).and_then(|end| data.get(offset..end)) else {
            return false;
        };
        let quick = match (count, window.first()) {
            (COMPRESSED_LEN, Some(0x02 | 0x03)) => true,
            (UNCOMPRESSED_LEN, Some(0x04 | 0x06 | 0x07)) => true,
            _ => false,
        };
        if !deep || !quick {
            return quick;
        }
        VerifyingKey::from_sec1_bytes(window).is_ok()
    }

    /// Decode SEC1 bytes that must lie on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let pk = Self::from_bytes_unchecked(bytes)?;
        VerifyingKey::from_sec1_bytes(bytes)?;
        Ok(pk)
    }

    /// Accept any bytes that pass the quick format check.
    pub fn from_bytes_unchecked(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.is_empty() {
            return Err(PrimitivesError::InvalidPublicKey(
                "pubkey bytes are empty".to_string(),
            ));
        }
        if !Self::check(bytes, false) {
            return Err(PrimitivesError::InvalidPublicKey(format!(
                "unexpected prefix 0x{:02x} for {} byte key",
                bytes[0],
                bytes.len()
            )));
        }
        Ok(PubKey { bytes: bytes.to_vec() })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// `true` for the 33-byte compressed form.
    pub fn is_compressed(&self) -> bool {
        self.bytes.len() == COMPRESSED_LEN
    }

    /// `true` if the bytes decode to a point on secp256k1.
    pub fn is_fully_valid(&self) -> bool {
        VerifyingKey::from_sec1_bytes(&self.bytes).is_ok()
    }

    /// The key id committed to by pay-to-pubkey-hash outputs.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.bytes)
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
