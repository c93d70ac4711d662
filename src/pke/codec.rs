// Conversions between bytes, field elements and x-only points.
use crate::pke::arith::{FieldElement, ONE};
use crate::pke::curve25519::ProjectivePoint;

/// Decode a little-endian u-coordinate. Values >= p are reduced, not rejected.
pub fn bytes_to_field(bytes: &[u8; 32]) -> FieldElement {
    FieldElement::from_bytes(bytes)
}

pub fn field_to_bytes(x: &FieldElement) -> [u8; 32] {
    x.to_bytes()
}

/// Affine x of a point, or `None` for the point at infinity.
pub fn to_compressed(q: &ProjectivePoint) -> Option<FieldElement> {
    if q.is_infinity() {
        return None;
    }
    Some(q.x * q.z.inverse())
}

/// `None` maps to the neutral element (1:0), `x` to (x:1).
pub fn to_projective(x: Option<FieldElement>) -> ProjectivePoint {
    match x {
        Some(x) => ProjectivePoint { x, z: ONE },
        None => ProjectivePoint::NEUTRAL,
    }
}

/// Encode a compressed point; the point at infinity becomes 32 zero bytes.
pub fn compressed_to_bytes(x: Option<FieldElement>) -> [u8; 32] {
    x.map(|x| field_to_bytes(&x)).unwrap_or([0u8; 32])
}

#[test]
fn infinity_round_trip() {
    let o = to_projective(None);
    assert!(o.is_infinity());
    assert_eq!(to_compressed(&o), None);
    assert_eq!(compressed_to_bytes(None), [0u8; 32]);
}

#[test]
fn compress_normalizes_z() {
    let x = FieldElement::from_u16(9);
    let z = FieldElement::from_u16(7);
    let q = ProjectivePoint { x: x * z, z };
    assert_eq!(to_compressed(&q), Some(x));
    assert_eq!(to_projective(Some(x)), ProjectivePoint { x, z: ONE });
}

#[test]
fn codec_round_trip() {
    use rand::prelude::*;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let mut raw = [0u8; 32];
    for _ in 0..1000 {
        rng.fill_bytes(&mut raw);
        let x = bytes_to_field(&raw);
        assert_eq!(bytes_to_field(&field_to_bytes(&x)), x);
        assert_eq!(to_compressed(&to_projective(Some(x))), Some(x));
    }
}
