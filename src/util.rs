use crate::common::X25519Error;

/// Decode a hex string into raw bytes, ignoring surrounding whitespace.
/// The length is left for the key agreement functions to check.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, X25519Error> {
    Ok(hex::decode(s.trim())?)
}

/// Decode a hex string that must hold exactly 32 bytes.
pub fn hex_to_key(s: &str, what: &'static str) -> Result<[u8; 32], X25519Error> {
    let bytes = hex_to_bytes(s)?;
    bytes.as_slice().try_into().map_err(|_| X25519Error::InvalidInput {
        what,
        expected: 32,
        actual: bytes.len(),
    })
}

#[test]
fn test_hex_to_key() {
    let key = hex_to_key(
        " 0900000000000000000000000000000000000000000000000000000000000000\n",
        "public key",
    )
    .unwrap();
    assert_eq!(key[0], 9);
    assert_eq!(
        hex_to_key("0900", "public key"),
        Err(X25519Error::InvalidInput {
            what: "public key",
            expected: 32,
            actual: 2
        })
    );
    assert!(matches!(hex_to_bytes("0g"), Err(X25519Error::InvalidHex(_))));
}
