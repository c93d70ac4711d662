// Typed X25519 keys over the byte-level functions in `ecdh`.
use std::fmt;
use std::str::FromStr;

use hex::{FromHex, ToHex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::common::X25519Error;
use crate::pke::ecdh::{base_mul, compute_shared_secret_with, is_all_zero, Validation};
use crate::pke::ladder::{clamp_bytes, SCALAR_SIZE};

fn to_array(bytes: &[u8], what: &'static str) -> Result<[u8; SCALAR_SIZE], X25519Error> {
    bytes.try_into().map_err(|_| X25519Error::InvalidInput {
        what,
        expected: SCALAR_SIZE,
        actual: bytes.len(),
    })
}

/// Raw secret key bytes. Clamped each time they are used.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct X25519PrivateKey([u8; SCALAR_SIZE]);

/// Public Key for curve25519
///
/// Any 32-byte integer is a valid public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct X25519PublicKey([u8; SCALAR_SIZE]);

/// Output of [`X25519PrivateKey::diffie_hellman`]. Never all-zero.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SCALAR_SIZE]);

impl X25519PrivateKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, X25519Error> {
        Ok(Self(to_array(bytes, "secret key")?))
    }

    pub fn public_key(&self) -> X25519PublicKey {
        X25519PublicKey(base_mul(&clamp_bytes(self.0)))
    }

    /// Permissive key agreement followed by the all-zero check callers are
    /// required to make. Use [`Self::diffie_hellman_with`] for strict checks.
    pub fn diffie_hellman(&self, peer: &X25519PublicKey) -> Result<SharedSecret, X25519Error> {
        self.diffie_hellman_with(peer, Validation::Permissive)
    }

    pub fn diffie_hellman_with(
        &self,
        peer: &X25519PublicKey,
        validation: Validation,
    ) -> Result<SharedSecret, X25519Error> {
        let shared = SharedSecret(compute_shared_secret_with(&self.0, &peer.0, validation)?);
        if shared.is_degenerate() {
            return Err(X25519Error::DegenerateSharedSecret);
        }
        Ok(shared)
    }
}

impl fmt::Debug for X25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("X25519PrivateKey(..)")
    }
}

impl FromStr for X25519PrivateKey {
    type Err = X25519Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(<[u8; SCALAR_SIZE]>::from_hex(s.trim())?))
    }
}

impl X25519PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, X25519Error> {
        Ok(Self(to_array(bytes, "public key")?))
    }

    /// Return the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; SCALAR_SIZE] {
        &self.0
    }
}

impl From<[u8; SCALAR_SIZE]> for X25519PublicKey {
    fn from(bytes: [u8; SCALAR_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.encode_hex::<String>())
    }
}

impl FromStr for X25519PublicKey {
    type Err = X25519Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(<[u8; SCALAR_SIZE]>::from_hex(s.trim())?))
    }
}

impl Serialize for X25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for X25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; SCALAR_SIZE] {
        &self.0
    }

    /// All-zero secrets come from low-order peer keys.
    pub fn is_degenerate(&self) -> bool {
        is_all_zero(&self.0)
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

#[test]
fn typed_key_exchange_symmetry() {
    use rand::prelude::*;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    rng.fill_bytes(&mut a);
    rng.fill_bytes(&mut b);

    let alice = X25519PrivateKey::from_bytes(&a).unwrap();
    let bob = X25519PrivateKey::from_bytes(&b).unwrap();
    let shared_alice = alice.diffie_hellman(&bob.public_key()).unwrap();
    let shared_bob = bob.diffie_hellman(&alice.public_key()).unwrap();
    assert_eq!(shared_alice.as_bytes(), shared_bob.as_bytes());
    assert!(!shared_alice.is_degenerate());
}

#[test]
fn typed_rejects_all_zero() {
    let key = X25519PrivateKey::from_bytes(&[1u8; 32]).unwrap();
    let zero = X25519PublicKey::from_bytes(&[0u8; 32]).unwrap();
    assert!(matches!(
        key.diffie_hellman(&zero),
        Err(X25519Error::DegenerateSharedSecret)
    ));
    assert!(matches!(
        key.diffie_hellman_with(&zero, Validation::Strict),
        Err(X25519Error::SmallOrderPoint)
    ));
}

#[test]
fn public_key_hex_and_serde() {
    let text = "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";
    let key: X25519PublicKey = text.parse().unwrap();
    assert_eq!(key.to_string(), text);

    #[derive(Serialize, Deserialize)]
    struct Holder {
        key: X25519PublicKey,
    }
    let encoded = toml::to_string(&Holder { key }).unwrap();
    assert_eq!(encoded.trim(), format!("key = \"{}\"", text));
    let decoded: Holder = toml::from_str(&encoded).unwrap();
    assert_eq!(decoded.key, key);

    assert!(matches!(
        "zz".parse::<X25519PublicKey>(),
        Err(X25519Error::InvalidHex(_))
    ));
}

#[test]
fn typed_length_checked() {
    assert!(X25519PrivateKey::from_bytes(&[0u8; 31]).is_err());
    assert!(X25519PrivateKey::from_bytes(&[0u8; 33]).is_err());
    assert!(X25519PublicKey::from_bytes(&[0u8; 31]).is_err());
    assert!(X25519PublicKey::from_bytes(&[0u8; 33]).is_err());
}
