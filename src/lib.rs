//! X25519 Diffie-Hellman key agreement over Curve25519 (RFC 7748).
//!
//! Layers, leaves first: field arithmetic over GF(2^255 - 19)
//! ([`pke::arith`]), x-only projective point operations
//! ([`pke::curve25519`]), the Montgomery ladder ([`pke::ladder`]), byte and
//! point encodings ([`pke::codec`]) and the key agreement entry points
//! ([`pke::ecdh`], [`pke::key`]).
pub mod common;
pub mod pke;
pub mod util;

pub use common::X25519Error;
pub use pke::ecdh::{
    compute_shared_secret, compute_shared_secret_with, derive_public_key, Validation,
};
pub use pke::key::{SharedSecret, X25519PrivateKey, X25519PublicKey};
