/// Everything that can go wrong below the template layer.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    // Script bytes

    /// A push runs past the end of the script.
    #[error("not enough data")]
    DataTooSmall,

    #[error("data too big")]
    DataTooBig,

    /// ASM token that is neither an opcode name nor hex.
    #[error("invalid opcode data")]
    InvalidOpcodeData,

    #[error("use append_push_data for push data funcs: {0}")]
    InvalidOpcodeType(String),

    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    // Destinations and addresses

    #[error("{kind} must be {expected} bytes, got {got}")]
    InvalidHashLength { kind: &'static str, expected: usize, got: usize },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid address length for '{0}'")]
    InvalidAddressLength(String),

    #[error("checksum failed")]
    EncodingChecksumFailed,

    /// Address version byte does not belong to the given network.
    #[error("address version {0:#04x} not supported on {1}")]
    UnsupportedAddress(u8, String),

    // Keys, signatures and configuration

    #[error("signature encoding: {0}")]
    SignatureEncoding(#[from] crate::signature::SigEncodingError),

    #[error("invalid network config: {0}")]
    InvalidNetwork(#[from] serde_json::Error),

    #[error("primitives error: {0}")]
    Primitives(#[from] utxo_primitives::PrimitivesError),
}
