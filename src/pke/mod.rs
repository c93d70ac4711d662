pub mod arith;
pub mod codec;
pub mod curve25519;
pub mod ecdh;
pub mod key;
pub mod ladder;
