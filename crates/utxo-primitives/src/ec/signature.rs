//! ECDSA signatures as they appear in unlocking scripts.
//!
//! Decoding is strict DER and requires R and S to be non-zero scalars below
//! the group order. No message is verified here.

use k256::ecdsa::Signature as EcdsaSignature;
use k256::elliptic_curve::scalar::IsHigh;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, Scalar};

use crate::PrimitivesError;

/// An ECDSA signature held as big-endian R and S.
///
/// Construction from raw components is unchecked; only [`Signature::from_der`]
/// validates ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Parse `30 <len> 02 <r_len> <r> 02 <s_len> <s>` with minimally encoded
    /// integers and no trailing bytes.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let sig = EcdsaSignature::from_der(bytes)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        let (r, s) = sig.split_bytes();
        Ok(Signature { r: r.into(), s: s.into() })
    }

    /// DER encoding with S replaced by `N - S` when above half the order.
    pub fn to_der(&self) -> Vec<u8> {
        let s = match to_scalar(&self.s) {
            Some(s) if bool::from(s.is_high()) => (-s).to_bytes().into(),
            _ => self.s,
        };
        let r = der_integer(&self.r);
        let s = der_integer(&s);

        let mut out = Vec::with_capacity(6 + r.len() + s.len());
        out.push(0x30);
        out.push((4 + r.len() + s.len()) as u8);
        for int in [r, s] {
            out.push(0x02);
            out.push(int.len() as u8);
            out.extend_from_slice(&int);
        }
        out
    }

    /// `true` if S is at most half the group order. S values outside the
    /// scalar range are never low.
    pub fn is_low_s(&self) -> bool {
        to_scalar(&self.s).is_some_and(|s| !bool::from(s.is_high()))
    }
}

fn to_scalar(bytes: &[u8; 32]) -> Option<Scalar> {
    Option::from(Scalar::from_repr(*FieldBytes::from_slice(bytes)))
}

/// Big-endian magnitude with leading zeros stripped, and a 0x00 prepended
/// when the top bit is set. Zero encodes as a single 0x00.
fn der_integer(value: &[u8; 32]) -> Vec<u8> {
    let start = value.iter().position(|&b| b != 0).unwrap_or(value.len() - 1);
    let trimmed = &value[start..];
    let mut out = Vec::with_capacity(trimmed.len() + 1);
    if trimmed[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}
