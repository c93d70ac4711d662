use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum X25519Error {
    #[error("invalid {what} size: expected {expected} bytes, got {actual}")]
    InvalidInput {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("peer public key is not a canonical encoding")]
    NonCanonicalPoint,
    #[error("peer public key is outside the prime-order subgroup")]
    SmallOrderPoint,
    #[error("shared secret is all-zero")]
    DegenerateSharedSecret,
    #[error("invalid hex key: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
