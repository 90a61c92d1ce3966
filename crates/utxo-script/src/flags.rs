//! Signature encoding rules, as a bitmask.

use std::ops::{BitAnd, BitOr};

use serde::{Deserialize, Serialize};

/// Which encoding rules a signature push must satisfy.
///
/// Bit positions match the interpreter verify flags so network configs can
/// carry the same numbers. Serializes as the raw `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptFlags(pub u32);

impl ScriptFlags {
    pub const NONE: ScriptFlags = ScriptFlags(0);
    /// Defined sighash type, implies DER.
    pub const STRICT_ENCODING: ScriptFlags = ScriptFlags(1 << 1);
    /// BIP-66 DER.
    pub const DER_SIGNATURES: ScriptFlags = ScriptFlags(1 << 2);
    /// BIP-62 low S.
    pub const LOW_S: ScriptFlags = ScriptFlags(1 << 3);

    pub const STANDARD_SIGNATURE: ScriptFlags =
        ScriptFlags(Self::DER_SIGNATURES.0 | Self::STRICT_ENCODING.0);

    /// `true` if every bit of `flag` is set.
    pub fn has_flag(self, flag: ScriptFlags) -> bool {
        self & flag == flag
    }

    pub fn has_any(self, flags: &[ScriptFlags]) -> bool {
        flags.iter().any(|&f| self.has_flag(f))
    }
}

impl BitOr for ScriptFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        ScriptFlags(self.0 | rhs.0)
    }
}

impl BitAnd for ScriptFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        ScriptFlags(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_ops() {
        let flags = ScriptFlags::NONE | ScriptFlags::LOW_S;
        assert!(flags.has_flag(ScriptFlags::LOW_S));
        assert!(!flags.has_flag(ScriptFlags::STANDARD_SIGNATURE));
        assert!(flags.has_any(&[ScriptFlags::DER_SIGNATURES, ScriptFlags::LOW_S]));
        assert!(!ScriptFlags::NONE.has_any(&[ScriptFlags::LOW_S]));
        assert_eq!(ScriptFlags::STANDARD_SIGNATURE & ScriptFlags::LOW_S, ScriptFlags::NONE);
        // The empty mask is contained in everything.
        assert!(ScriptFlags::NONE.has_flag(ScriptFlags::NONE));
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ScriptFlags::STANDARD_SIGNATURE).unwrap(), "6");
        assert_eq!(serde_json::from_str::<ScriptFlags>("8").unwrap(), ScriptFlags::LOW_S);
    }
}
