/// Errors from decoding public keys and signatures.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    /// Wrong length or prefix for a serialized key.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// DER framing or scalar range failure.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Well-formed key bytes that do not decode to a curve point.
    #[error("point not on curve")]
    PointNotOnCurve,

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}

impl From<k256::ecdsa::Error> for PrimitivesError {
    fn from(_: k256::ecdsa::Error) -> Self {
        PrimitivesError::PointNotOnCurve
    }
}
