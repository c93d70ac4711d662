//! X25519 key agreement over byte strings.
//!
//! The default contract is the permissive one of RFC 7748: any 32 bytes are
//! accepted as a peer public key, and the shared secret may come out all-zero
//! for low-order peers. Callers must reject an all-zero secret before using it
//! as key material, or use [`Validation::Strict`].
use log::{debug, warn};

use crate::common::X25519Error;
use crate::pke::arith::FieldElement;
use crate::pke::codec::{bytes_to_field, compressed_to_bytes, to_compressed, to_projective};
use crate::pke::curve25519::{ProjectivePoint, SUBGROUP_ORDER};
use crate::pke::ladder::{clamp, scalar_mul, Scalar, SCALAR_SIZE};

/// Peer public key checks applied by [`compute_shared_secret_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Reduce the peer key modulo p and accept anything.
    #[default]
    Permissive,
    /// Reject non-canonical encodings, points outside the prime-order
    /// subgroup and an all-zero shared secret.
    Strict,
}

/// Public key for a 32-byte secret: `clamp(secret) * G`.
pub fn derive_public_key(secret: &[u8]) -> Result<[u8; 32], X25519Error> {
    let scalar = clamp(secret)?;
    Ok(base_mul(&scalar))
}

pub(crate) fn base_mul(scalar: &Scalar) -> [u8; 32] {
    let result = scalar_mul(scalar, &ProjectivePoint::BASEPOINT);
    compressed_to_bytes(to_compressed(&result))
}

/// Shared secret `clamp(secret) * peer`, permissive.
///
/// The result is all-zero when the peer key has low order. It is returned
/// as-is; it must not be used as key material.
pub fn compute_shared_secret(secret: &[u8], peer_public: &[u8]) -> Result<[u8; 32], X25519Error> {
    compute_shared_secret_with(secret, peer_public, Validation::Permissive)
}

pub fn compute_shared_secret_with(
    secret: &[u8],
    peer_public: &[u8],
    validation: Validation,
) -> Result<[u8; 32], X25519Error> {
    let scalar = clamp(secret)?;
    let peer_bytes: [u8; 32] = peer_public.try_into().map_err(|_| X25519Error::InvalidInput {
        what: "public key",
        expected: SCALAR_SIZE,
        actual: peer_public.len(),
    })?;

    let u = bytes_to_field(&peer_bytes);
    if validation == Validation::Strict {
        check_peer(&peer_bytes, &u)?;
    }

    let result = scalar_mul(&scalar, &to_projective(Some(u)));
    let shared = compressed_to_bytes(to_compressed(&result));

    if is_all_zero(&shared) {
        if validation == Validation::Strict {
            debug!("rejecting all-zero shared secret");
            return Err(X25519Error::DegenerateSharedSecret);
        }
        warn!("x25519 produced an all-zero shared secret; peer key has low order");
    }
    Ok(shared)
}

/// Strict peer checks: canonical encoding, u != 0 and l * P = O.
/// u = 0 is tested on its own: differential addition with difference (0:1)
/// always yields Z = 0, so the ladder cannot tell it apart from O.
fn check_peer(peer_bytes: &[u8; 32], u: &FieldElement) -> Result<(), X25519Error> {
    if !FieldElement::is_canonical(peer_bytes) {
        debug!("rejecting non-canonical peer public key");
        return Err(X25519Error::NonCanonicalPoint);
    }
    let order = Scalar::from_bytes_unclamped(SUBGROUP_ORDER);
    if u.is_zero() || !scalar_mul(&order, &to_projective(Some(*u))).is_infinity() {
        debug!("rejecting peer public key outside the prime-order subgroup");
        return Err(X25519Error::SmallOrderPoint);
    }
    Ok(())
}

/// Constant-time all-zero test.
pub fn is_all_zero(bytes: &[u8; 32]) -> bool {
    bytes.iter().fold(0u8, |acc, b| acc | b) == 0
}

#[cfg(test)]
const ALICE_SECRET: &str = "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a";
#[cfg(test)]
const BOB_PUBLIC: &str = "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f";

/// u-coordinates of low-order points, plus p and p + 1 (non-canonical 0 and 1).
#[cfg(test)]
const LOW_ORDER: [&str; 7] = [
    "0000000000000000000000000000000000000000000000000000000000000000",
    "0100000000000000000000000000000000000000000000000000000000000000",
    "e0eb7a7c3b41b8ae1656e3faf19fc46ada098deb9c32b1fd866205165f49b800",
    "5f9c95bca3508c24b1d0b1559c83ef5b04445cc4581c8e86d8224eddd09f1157",
    "ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
    "edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
    "eeffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
];

#[test]
fn rfc7748_alice_bob() {
    use hex::FromHex;

    let alice = <[u8; 32]>::from_hex(ALICE_SECRET).unwrap();
    let bob_public = <[u8; 32]>::from_hex(BOB_PUBLIC).unwrap();
    let shared = compute_shared_secret(&alice, &bob_public).unwrap();
    assert_eq!(
        hex::encode(shared),
        "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742"
    );
    assert_eq!(
        compute_shared_secret_with(&alice, &bob_public, Validation::Strict).unwrap(),
        shared
    );
}

#[test]
fn permissive_accepts_low_order() {
    use hex::FromHex;

    let alice = <[u8; 32]>::from_hex(ALICE_SECRET).unwrap();
    for point in LOW_ORDER {
        let peer = <[u8; 32]>::from_hex(point).unwrap();
        let shared = compute_shared_secret(&alice, &peer).unwrap();
        assert!(is_all_zero(&shared), "{}", point);
        assert_eq!(compute_shared_secret(&alice, &peer).unwrap(), shared);
    }
}

#[test]
fn strict_rejects_low_order() {
    use hex::FromHex;

    let alice = <[u8; 32]>::from_hex(ALICE_SECRET).unwrap();
    for point in &LOW_ORDER[..5] {
        let peer = <[u8; 32]>::from_hex(point).unwrap();
        assert_eq!(
            compute_shared_secret_with(&alice, &peer, Validation::Strict),
            Err(X25519Error::SmallOrderPoint),
            "{}",
            point
        );
    }
    for point in &LOW_ORDER[5..] {
        let peer = <[u8; 32]>::from_hex(point).unwrap();
        assert_eq!(
            compute_shared_secret_with(&alice, &peer, Validation::Strict),
            Err(X25519Error::NonCanonicalPoint)
        );
    }
}

#[test]
fn strict_rejects_twist_point() {
    use hex::FromHex;

    // u = 2 lies on the quadratic twist.
    let alice = <[u8; 32]>::from_hex(ALICE_SECRET).unwrap();
    let mut peer = [0u8; 32];
    peer[0] = 2;
    assert!(compute_shared_secret(&alice, &peer).is_ok());
    assert_eq!(
        compute_shared_secret_with(&alice, &peer, Validation::Strict),
        Err(X25519Error::SmallOrderPoint)
    );
}

#[test]
fn non_canonical_reduces_in_permissive_mode() {
    use hex::FromHex;

    // p + 9 is treated as 9.
    let alice = <[u8; 32]>::from_hex(ALICE_SECRET).unwrap();
    let mut nine = [0u8; 32];
    nine[0] = 9;
    let mut nine_plus_p = <[u8; 32]>::from_hex(LOW_ORDER[5]).unwrap();
    nine_plus_p[0] += 9;
    assert_eq!(
        compute_shared_secret(&alice, &nine_plus_p).unwrap(),
        compute_shared_secret(&alice, &nine).unwrap()
    );
    assert_eq!(
        derive_public_key(&alice).unwrap(),
        compute_shared_secret(&alice, &nine).unwrap()
    );
}

#[test]
fn peer_length_checked() {
    let secret = [7u8; 32];
    for len in [0usize, 1, 31, 33, 64] {
        let peer = vec![9u8; len];
        assert_eq!(
            compute_shared_secret(&secret, &peer),
            Err(X25519Error::InvalidInput {
                what: "public key",
                expected: 32,
                actual: len,
            })
        );
    }
}
