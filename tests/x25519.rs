use hex::FromHex;
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use x25519_kex::{
    compute_shared_secret, compute_shared_secret_with, derive_public_key, Validation,
    X25519Error, X25519PrivateKey, X25519PublicKey,
};

fn hex32(s: &str) -> [u8; 32] {
    <[u8; 32]>::from_hex(s).unwrap()
}

const ALICE_SECRET: &str = "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a";
const ALICE_PUBLIC: &str = "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";
const BOB_SECRET: &str = "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb";
const BOB_PUBLIC: &str = "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f";
const SHARED: &str = "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742";

/// RFC 7748 §6.1.
#[test]
fn test_rfc7748_key_agreement() {
    let alice = hex32(ALICE_SECRET);
    let bob = hex32(BOB_SECRET);

    let alice_public = derive_public_key(&alice).unwrap();
    let bob_public = derive_public_key(&bob).unwrap();
    assert_eq!(alice_public, hex32(ALICE_PUBLIC));
    assert_eq!(bob_public, hex32(BOB_PUBLIC));

    assert_eq!(compute_shared_secret(&alice, &bob_public).unwrap(), hex32(SHARED));
    assert_eq!(compute_shared_secret(&bob, &alice_public).unwrap(), hex32(SHARED));
}

#[test]
fn test_rfc7748_typed_keys() {
    let alice = X25519PrivateKey::from_bytes(&hex32(ALICE_SECRET)).unwrap();
    let bob: X25519PrivateKey = BOB_SECRET.parse().unwrap();
    assert_eq!(alice.public_key().to_string(), ALICE_PUBLIC);
    assert_eq!(bob.public_key().to_string(), BOB_PUBLIC);

    let shared = alice.diffie_hellman(&bob.public_key()).unwrap();
    assert_eq!(shared.as_bytes(), &hex32(SHARED));
    let shared = bob
        .diffie_hellman_with(&alice.public_key(), Validation::Strict)
        .unwrap();
    assert_eq!(shared.as_bytes(), &hex32(SHARED));
}

/// RFC 7748 §5.2, first single-multiplication vector.
#[test]
fn test_rfc7748_scalar_mult() {
    let k = hex32("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4");
    let u = hex32("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c");
    assert_eq!(
        compute_shared_secret(&k, &u).unwrap(),
        hex32("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552")
    );
}

/// The second §5.2 vector has bit 255 of u set. Permissive decoding reduces
/// the full 256-bit value modulo p instead of masking the bit, so the RFC
/// result is only reproduced after the caller masks it.
#[test]
fn test_high_bit_of_u_is_reduced() {
    let k = hex32("4b66e9d4d1b4673c5ad22691957d6af5c11b6421e0ea01d42ca4169e7918ba0d");
    let mut u = hex32("e5210f12786811d3f4b7959d0538ae2c31dbe7106fc03c3efc4cd549c715a493");
    assert_eq!(
        compute_shared_secret(&k, &u).unwrap(),
        hex32("d5f33573c9f6b8129483acce1e2534e95d3c41af6b00d0d30437b87cada57e4a")
    );
    assert_eq!(
        compute_shared_secret_with(&k, &u, Validation::Strict),
        Err(X25519Error::NonCanonicalPoint)
    );

    u[31] &= 0x7f;
    assert_eq!(
        compute_shared_secret(&k, &u).unwrap(),
        hex32("95cbde9476e8907d7aade45cb4b873f88b595a68799fa152e6f8f7647aac7957")
    );
}

fn iterate(rounds: usize) -> [u8; 32] {
    let mut k = [0u8; 32];
    k[0] = 9;
    let mut u = k;
    for _ in 0..rounds {
        let next = compute_shared_secret(&k, &u).unwrap();
        u = k;
        k = next;
    }
    k
}

/// RFC 7748 §5.2: k, u = X25519(k, u), k.
#[test]
fn test_rfc7748_iterated_1() {
    assert_eq!(
        iterate(1),
        hex32("422c8e7a6227d7bca1350b3e2bb7279f7897b87bb6854b783c60e80311ae3079")
    );
}

#[test]
fn test_rfc7748_iterated_1000() {
    assert_eq!(
        iterate(1000),
        hex32("684cf59ba83309552800ef566f2f4d3c1c3887c49360e3875f2eb94d99532c51")
    );
}

#[test]
fn test_commutativity() {
    let mut rng = ChaCha20Rng::from_entropy();
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    for _ in 0..16 {
        rng.fill_bytes(&mut a);
        rng.fill_bytes(&mut b);
        let a_public = derive_public_key(&a).unwrap();
        let b_public = derive_public_key(&b).unwrap();
        assert_eq!(
            compute_shared_secret(&a, &b_public).unwrap(),
            compute_shared_secret(&b, &a_public).unwrap()
        );
    }
}

#[test]
fn test_wrong_secret_length() {
    let public = hex32(BOB_PUBLIC);
    for len in [0usize, 1, 31, 33, 64] {
        let secret = vec![0x42u8; len];
        let expected = Err(X25519Error::InvalidInput {
            what: "secret key",
            expected: 32,
            actual: len,
        });
        assert_eq!(derive_public_key(&secret), expected);
        assert_eq!(compute_shared_secret(&secret, &public), expected);
        assert!(X25519PrivateKey::from_bytes(&secret).is_err());
    }
}

/// A zero peer key yields a defined, reproducible all-zero secret that is
/// unsafe as key material.
#[test]
fn test_degenerate_public_key() {
    let mut rng = ChaCha20Rng::from_entropy();
    let mut secret = [0u8; 32];
    rng.fill_bytes(&mut secret);

    let first = compute_shared_secret(&secret, &[0u8; 32]).unwrap();
    let second = compute_shared_secret(&secret, &[0u8; 32]).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, [0u8; 32]);

    let key = X25519PrivateKey::from_bytes(&secret).unwrap();
    let zero = X25519PublicKey::from([0u8; 32]);
    assert_eq!(
        key.diffie_hellman(&zero).unwrap_err(),
        X25519Error::DegenerateSharedSecret
    );
}

#[test]
fn test_secret_clamping_is_applied() {
    // Secrets differing only in clamped bits give the same public key.
    let mut secret = hex32(ALICE_SECRET);
    let public = derive_public_key(&secret).unwrap();
    secret[0] ^= 0x07;
    secret[31] ^= 0xc0;
    assert_eq!(derive_public_key(&secret).unwrap(), public);
}
