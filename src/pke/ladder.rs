// Scalar clamping and the x-only Montgomery ladder.
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::common::X25519Error;
use crate::pke::curve25519::ProjectivePoint;

/// X25519 scalar and key size in bytes.
pub const SCALAR_SIZE: usize = 32;

/// A 256-bit scalar, little endian. Only its bits are used, as ladder control.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Scalar(pub(crate) [u8; SCALAR_SIZE]);

impl Scalar {
    /// Use 32 bytes as a scalar without clamping.
    pub fn from_bytes_unclamped(bytes: [u8; SCALAR_SIZE]) -> Self {
        Scalar(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SCALAR_SIZE] {
        &self.0
    }

    /// Bit `i` of the scalar, 0 being the least significant.
    #[inline]
    fn bit(&self, i: usize) -> i64 {
        ((self.0[i >> 3] >> (i & 7)) & 1) as i64
    }
}

impl std::fmt::Debug for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Scalar(..)")
    }
}

/// Turn 32 raw secret bytes into an X25519 scalar (RFC 7748 §5):
/// clear the three low bits, clear bit 255, set bit 254.
pub fn clamp(secret: &[u8]) -> Result<Scalar, X25519Error> {
    let bytes: [u8; SCALAR_SIZE] = secret.try_into().map_err(|_| X25519Error::InvalidInput {
        what: "secret key",
        expected: SCALAR_SIZE,
        actual: secret.len(),
    })?;
    Ok(clamp_bytes(bytes))
}

pub fn clamp_bytes(mut bytes: [u8; SCALAR_SIZE]) -> Scalar {
    bytes[0] &= 248;
    bytes[31] &= 127;
    bytes[31] |= 64;
    Scalar(bytes)
}

/// Compute `s * p`.
///
/// The accumulators start as (O, P) and keep R - Q = P on every step.
/// All 256 bits are processed, most significant first, and each step does
/// one differential addition and one doubling. The bit only picks, through
/// a masked swap, which accumulator receives which result.
pub fn scalar_mul(s: &Scalar, p: &ProjectivePoint) -> ProjectivePoint {
    let mut q = ProjectivePoint::NEUTRAL;
    let mut r = *p;

    for i in (0..256).rev() {
        let bit = s.bit(i);
        q.swap(&mut r, bit);
        let sum = ProjectivePoint::diff_add(&q, &r, p);
        let dbl = q.double();
        q = dbl;
        r = sum;
        q.swap(&mut r, bit);
    }
    q
}

#[cfg(test)]
fn scalar_from_u64(n: u64) -> Scalar {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&n.to_le_bytes());
    Scalar::from_bytes_unclamped(bytes)
}

#[cfg(test)]
fn affine_bytes(q: &ProjectivePoint) -> [u8; 32] {
    (q.x * q.z.inverse()).to_bytes()
}

#[test]
fn clamp_bits() {
    use rand::prelude::*;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let mut raw = [0u8; 32];
    for _ in 0..256 {
        rng.fill_bytes(&mut raw);
        let s = clamp(&raw).unwrap();
        assert_eq!(s.0[0] & 7, 0);
        assert_eq!(s.0[31] & 0x80, 0);
        assert_eq!(s.0[31] & 0x40, 0x40);
        assert_eq!(clamp(&raw).unwrap(), s);
        // Clamping is idempotent.
        assert_eq!(clamp(s.as_bytes()).unwrap(), s);
    }
}

#[test]
fn clamp_rejects_bad_length() {
    for len in [0usize, 1, 31, 33, 64] {
        let raw = vec![0x55u8; len];
        match clamp(&raw) {
            Err(X25519Error::InvalidInput { expected, actual, .. }) => {
                assert_eq!(expected, 32);
                assert_eq!(actual, len);
            }
            other => panic!("unexpected result for length {}: {:?}", len, other),
        }
    }
}

#[test]
fn small_multiples() {
    let g = ProjectivePoint::BASEPOINT;
    assert!(scalar_mul(&scalar_from_u64(0), &g).is_infinity());
    assert_eq!(affine_bytes(&scalar_mul(&scalar_from_u64(1), &g)), affine_bytes(&g));
    assert_eq!(
        affine_bytes(&scalar_mul(&scalar_from_u64(2), &g)),
        affine_bytes(&g.double())
    );
    let g3 = ProjectivePoint::diff_add(&g, &g.double(), &g);
    assert_eq!(affine_bytes(&scalar_mul(&scalar_from_u64(3), &g)), affine_bytes(&g3));
}

#[test]
fn ladder_is_multiplicative() {
    // (a * b) * G == a * (b * G)
    let g = ProjectivePoint::BASEPOINT;
    let (a, b) = (0x1234_5678u64, 0x9abc_def0u64);
    let ab = scalar_mul(&scalar_from_u64(a * b), &g);
    let bg = scalar_mul(&scalar_from_u64(b), &g);
    let bg = ProjectivePoint {
        x: bg.x * bg.z.inverse(),
        z: crate::pke::arith::ONE,
    };
    let a_bg = scalar_mul(&scalar_from_u64(a), &bg);
    assert_eq!(affine_bytes(&ab), affine_bytes(&a_bg));
}

#[test]
fn subgroup_order_annihilates_basepoint() {
    use crate::pke::curve25519::SUBGROUP_ORDER;

    let l = Scalar::from_bytes_unclamped(SUBGROUP_ORDER);
    assert!(scalar_mul(&l, &ProjectivePoint::BASEPOINT).is_infinity());
}
