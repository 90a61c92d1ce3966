/// Errors raised by script generators when called with arguments outside
/// protocol bounds.
///
/// Malformed scripts never produce these: checks answer `false` and
/// extractions answer `None` instead.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A count must be pushed as a single OP_0..OP_16 opcode.
    #[error("{what} should be less or equal to 16, got {value}")]
    SmallIntegerOutOfRange { what: &'static str, value: usize },

    /// Multisig requires more signatures than it has keys.
    #[error("signature count {required} exceeds key count {keys}")]
    SignatureCountExceedsKeys { required: usize, keys: usize },

    /// Generated null-data script is larger than the template allows.
    #[error("data script too big: {size} bytes exceeds {max}")]
    NullDataTooLarge { size: usize, max: usize },

    /// Witness version outside 0..=16.
    #[error("invalid witness version {0}")]
    InvalidWitnessVersion(u8),

    /// Witness program length outside 2..=32.
    #[error("invalid witness program length {0}")]
    InvalidWitnessProgramLength(usize),

    /// A push-only script was required.
    #[error("script is not push only")]
    NotPushOnly,

    /// Redeem script exceeds the 520-byte push limit.
    #[error("redeem script too large: {0} bytes")]
    RedeemScriptTooLarge(usize),

    /// Address kind does not match the requested template.
    #[error("address {0} is not a {1} address")]
    AddressKindMismatch(String, &'static str),

    /// Error from script crate.
    #[error("script error: {0}")]
    Script(#[from] utxo_script::ScriptError),
}
