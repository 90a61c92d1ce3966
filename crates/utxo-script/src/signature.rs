//! Transaction signatures: a DER-encoded ECDSA signature followed by a
//! one-byte sighash type.

use std::fmt;

use num_bigint::{BigInt, Sign};
use utxo_primitives::ec::Signature;

use crate::flags::ScriptFlags;
use crate::ScriptError;

pub const SIGHASH_ALL: u8 = 0x01;
pub const SIGHASH_NONE: u8 = 0x02;
pub const SIGHASH_SINGLE: u8 = 0x03;
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Half of the secp256k1 group order, big-endian.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// Reasons a signature push fails the encoding rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigEncodingError {
    #[error("signature is empty")]
    Empty,
    #[error("malformed signature: too short: {0} < 8")]
    TooShort(usize),
    #[error("malformed signature: too long: {0} > 72")]
    TooLong(usize),
    #[error("malformed signature: format has wrong type: {0:#x}")]
    InvalidSeqId(u8),
    #[error("malformed signature: bad length: {0} != {1}")]
    InvalidDataLen(usize, usize),
    #[error("malformed signature: S type indicator missing")]
    MissingSTypeId,
    #[error("malformed signature: S length missing")]
    MissingSLen,
    #[error("malformed signature: invalid S length")]
    InvalidSLen,
    #[error("malformed signature: R integer marker: {0:#x} != 0x02")]
    InvalidRIntId(u8),
    #[error("malformed signature: R length is zero")]
    ZeroRLen,
    #[error("malformed signature: R is negative")]
    NegativeR,
    #[error("malformed signature: R value has too much padding")]
    TooMuchRPadding,
    #[error("malformed signature: S integer marker: {0:#x} != 0x02")]
    InvalidSIntId(u8),
    #[error("malformed signature: S length is zero")]
    ZeroSLen,
    #[error("malformed signature: S is negative")]
    NegativeS,
    #[error("malformed signature: S value has too much padding")]
    TooMuchSPadding,
    #[error("signature is not canonical due to unnecessarily high S value")]
    HighS,
    #[error("invalid hash type {0:#x}")]
    InvalidSigHashType(u8),
}

/// A signature as it appears in a script push: DER bytes plus sighash type.
///
/// The exact bytes it was parsed from are kept, so re-serializing never
/// alters a non-canonical encoding.
#[derive(Clone, PartialEq, Eq)]
pub struct TransactionSignature {
    signature: Signature,
    sighash: u8,
    raw: Vec<u8>,
}

impl TransactionSignature {
    /// Build from an ECDSA signature and a sighash type.
    ///
    /// The DER encoding is canonical with low S.
    pub fn new(signature: Signature, sighash: u8) -> Self {
        let mut raw = signature.to_der();
        raw.push(sighash);
        TransactionSignature { signature, sighash, raw }
    }

    /// Parse `<DER signature><sighash byte>`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptError> {
        let (&sighash, der) = bytes.split_last().ok_or(SigEncodingError::Empty)?;
        let signature = Signature::from_der(der)?;
        Ok(TransactionSignature {
            signature,
            sighash,
            raw: bytes.to_vec(),
        })
    }

    /// Parse from a hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn sighash(&self) -> u8 {
        self.sighash
    }

    /// The serialized form, identical to the parsed input when parsed.
    pub fn to_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.raw)
    }

    /// Plausible serialized length for a signature push.
    ///
    /// Accepts 67..=80 bytes, or exactly 9 (the minimal DER signature plus
    /// sighash byte).
    pub fn valid_length(len: usize) -> bool {
        (67..=80).contains(&len) || len == 9
    }

    /// `true` if `sig` passes [`check_signature_encoding`] under `flags`.
    pub fn is_valid(sig: &[u8], flags: ScriptFlags) -> bool {
        check_signature_encoding(sig, flags).is_ok()
    }
}

impl fmt::Debug for TransactionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionSignature({})", self.to_hex())
    }
}

impl fmt::Display for TransactionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Check a `<DER><sighash>` signature push against the encoding rules.
///
/// With none of DER_SIGNATURES, LOW_S or STRICT_ENCODING set every input
/// passes. An empty signature always passes: it is the canonical way to
/// provide a failing signature. STRICT_ENCODING additionally requires the
/// sighash type, ignoring ANYONECANPAY, to be ALL, NONE or SINGLE.
pub fn check_signature_encoding(sig: &[u8], flags: ScriptFlags) -> Result<(), SigEncodingError> {
    if !flags.has_any(&[
        ScriptFlags::DER_SIGNATURES,
        ScriptFlags::LOW_S,
        ScriptFlags::STRICT_ENCODING,
    ]) {
        return Ok(());
    }

    let Some((&sighash, der)) = sig.split_last() else {
        return Ok(());
    };

    check_der_encoding(der, flags.has_flag(ScriptFlags::LOW_S))?;

    if flags.has_flag(ScriptFlags::STRICT_ENCODING) {
        let base = sighash & !SIGHASH_ANYONECANPAY;
        if !(SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base) {
            return Err(SigEncodingError::InvalidSigHashType(sighash));
        }
    }
    Ok(())
}

/// BIP-0066 strict DER rules on a signature without its sighash byte.
fn check_der_encoding(sig: &[u8], low_s: bool) -> Result<(), SigEncodingError> {
    let sig_len = sig.len();
    if sig_len < 8 {
        return Err(SigEncodingError::TooShort(sig_len));
    }
    if sig_len > 72 {
        return Err(SigEncodingError::TooLong(sig_len));
    }
    if sig[0] != 0x30 {
        return Err(SigEncodingError::InvalidSeqId(sig[0]));
    }
    if sig[1] as usize != sig_len - 2 {
        return Err(SigEncodingError::InvalidDataLen(sig[1] as usize, sig_len - 2));
    }

    let r_len = sig[3] as usize;
    let s_type_offset = 4 + r_len;
    let s_len_offset = s_type_offset + 1;

    if s_type_offset >= sig_len {
        return Err(SigEncodingError::MissingSTypeId);
    }
    if s_len_offset >= sig_len {
        return Err(SigEncodingError::MissingSLen);
    }

    let s_offset = s_len_offset + 1;
    let s_len = sig[s_len_offset] as usize;
    if s_offset + s_len != sig_len {
        return Err(SigEncodingError::InvalidSLen);
    }

    if sig[2] != 0x02 {
        return Err(SigEncodingError::InvalidRIntId(sig[2]));
    }
    if r_len == 0 {
        return Err(SigEncodingError::ZeroRLen);
    }
    if sig[4] & 0x80 != 0 {
        return Err(SigEncodingError::NegativeR);
    }
    if r_len > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return Err(SigEncodingError::TooMuchRPadding);
    }

    if sig[s_type_offset] != 0x02 {
        return Err(SigEncodingError::InvalidSIntId(sig[s_type_offset]));
    }
    if s_len == 0 {
        return Err(SigEncodingError::ZeroSLen);
    }
    if sig[s_offset] & 0x80 != 0 {
        return Err(SigEncodingError::NegativeS);
    }
    if s_len > 1 && sig[s_offset] == 0x00 && sig[s_offset + 1] & 0x80 == 0 {
        return Err(SigEncodingError::TooMuchSPadding);
    }

    if low_s {
        let half_order = BigInt::from_bytes_be(Sign::Plus, &HALF_ORDER);
        let s_value = BigInt::from_bytes_be(Sign::Plus, &sig[s_offset..]);
        if s_value > half_order {
            return Err(SigEncodingError::HighS);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIG_HEX: &str = "304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd410220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d0901";
    const HIGH_S_HEX: &str = "30250201010220\
        7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a101";

    fn sig_bytes(hex_str: &str) -> Vec<u8> {
        hex::decode(hex_str).expect("valid hex")
    }

    #[test]
    fn test_parse_roundtrip_keeps_bytes() {
        let sig = TransactionSignature::from_hex(SIG_HEX).expect("valid signature");
        assert_eq!(sig.to_hex(), SIG_HEX);
        assert_eq!(sig.sighash(), SIGHASH_ALL);
        assert!(sig.signature().is_low_s());
    }

    #[test]
    fn test_new_appends_sighash() {
        let parsed = TransactionSignature::from_hex(SIG_HEX).expect("valid signature");
        let rebuilt = TransactionSignature::new(parsed.signature().clone(), SIGHASH_ALL);
        assert_eq!(rebuilt, parsed);
    }

    #[test]
    fn test_from_bytes_rejects_empty_and_garbage() {
        assert!(TransactionSignature::from_bytes(&[]).is_err());
        assert!(TransactionSignature::from_bytes(&[0x01, 0x02, 0x03]).is_err());
    }

    #[test]
    fn test_valid_length() {
        assert!(TransactionSignature::valid_length(9));
        assert!(TransactionSignature::valid_length(67));
        assert!(TransactionSignature::valid_length(71));
        assert!(TransactionSignature::valid_length(80));
        assert!(!TransactionSignature::valid_length(10));
        assert!(!TransactionSignature::valid_length(66));
        assert!(!TransactionSignature::valid_length(81));
    }

    #[test]
    fn test_is_valid_standard_flags() {
        let flags = ScriptFlags::STANDARD_SIGNATURE;
        assert!(TransactionSignature::is_valid(&sig_bytes(SIG_HEX), flags));
        assert!(TransactionSignature::is_valid(&[], flags));
        assert!(!TransactionSignature::is_valid(&[0x30, 0x01], flags));
    }

    #[test]
    fn test_no_flags_accepts_anything() {
        assert!(TransactionSignature::is_valid(&[0xde, 0xad], ScriptFlags::NONE));
    }

    #[test]
    fn test_undefined_sighash_rejected_only_with_strict_encoding() {
        let mut sig = sig_bytes(SIG_HEX);
        *sig.last_mut().unwrap() = 0x04;
        assert_eq!(
            check_signature_encoding(&sig, ScriptFlags::STANDARD_SIGNATURE),
            Err(SigEncodingError::InvalidSigHashType(0x04))
        );
        assert!(check_signature_encoding(&sig, ScriptFlags::DER_SIGNATURES).is_ok());

        *sig.last_mut().unwrap() = SIGHASH_SINGLE | SIGHASH_ANYONECANPAY;
        assert!(check_signature_encoding(&sig, ScriptFlags::STANDARD_SIGNATURE).is_ok());
    }

    #[test]
    fn test_high_s() {
        let sig = sig_bytes(HIGH_S_HEX);
        assert!(check_signature_encoding(&sig, ScriptFlags::STANDARD_SIGNATURE).is_ok());
        assert_eq!(
            check_signature_encoding(&sig, ScriptFlags::LOW_S),
            Err(SigEncodingError::HighS)
        );
    }

    #[test]
    fn test_der_violations() {
        let flags = ScriptFlags::DER_SIGNATURES;
        let mut bad_seq = sig_bytes(SIG_HEX);
        bad_seq[0] = 0x31;
        assert_eq!(
            check_signature_encoding(&bad_seq, flags),
            Err(SigEncodingError::InvalidSeqId(0x31))
        );

        let mut negative_r = sig_bytes(SIG_HEX);
        negative_r[4] = 0x80;
        assert_eq!(
            check_signature_encoding(&negative_r, flags),
            Err(SigEncodingError::NegativeR)
        );

        let mut short = sig_bytes(SIG_HEX);
        short.truncate(8);
        assert!(check_signature_encoding(&short, flags).is_err());
    }
}
