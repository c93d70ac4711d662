// Operations over curve25519.
// parameters:
// y^2 = x^3 + 486662x^2 + x mod (2^255 - 19)
// p = 0x7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed
// A = 0x0000000000000000000000000000000000000000000000000000000000076d06
// contains 8*l elements.
//
// Points are tracked as x-only projective pairs (X:Z); y is never computed.
use crate::pke::arith::{FieldElement, ONE, ZERO};

/// Montgomery coefficient A.
pub const A: u32 = 486662;
/// Montgomery coefficient B.
pub const B: u32 = 1;
/// x-coordinate of the base point.
pub const GX: u16 = 9;

/// A + 2, the constant in the doubling formula.
const A_PLUS_2: FieldElement = FieldElement([
    0x6d08, 0x0007, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
]);
const FOUR: FieldElement = FieldElement::from_u16(4);

/// l = 2^252 + 27742317777372353535851937790883648493, little endian.
/// Order of the subgroup generated by G.
pub const SUBGROUP_ORDER: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
];

/// This struct describes an x-only point on curve25519 in projective form.
/// Affine x is `x / z`; `z == 0` is the point at infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectivePoint {
    pub x: FieldElement,
    pub z: FieldElement,
}

impl ProjectivePoint {
    /// The neutral element (1:0).
    pub const NEUTRAL: ProjectivePoint = ProjectivePoint { x: ONE, z: ZERO };

    /// The base point (9:1).
    pub const BASEPOINT: ProjectivePoint = ProjectivePoint {
        x: FieldElement::from_u16(GX),
        z: ONE,
    };

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// Q3 = Q1 + Q2, given the constraint Q2 = Q1 + P.
    ///
    /// Differential addition only works because the difference of the
    /// two inputs is the fixed point `p`. The formula is symmetric in
    /// `q1` and `q2`, so Q1 = Q2 + P is also accepted.
    pub fn diff_add(q1: &Self, q2: &Self, p: &Self) -> Self {
        let s = (q2.x - q2.z) * (q1.x + q1.z);
        let t = (q2.x + q2.z) * (q1.x - q1.z);
        ProjectivePoint {
            x: p.z * (s + t).square(),
            z: p.x * (s - t).square(),
        }
    }

    /// Q3 = 2 * Q1.
    pub fn double(&self) -> Self {
        let sum_sq = (self.x + self.z).square();
        let diff_sq = (self.x - self.z).square();
        let xz = self.x * self.z;
        ProjectivePoint {
            x: sum_sq * diff_sq,
            z: FOUR * xz * (diff_sq + A_PLUS_2 * xz),
        }
    }

    /// Constant-time swap of two points when `bit == 1`.
    pub fn swap(&mut self, q: &mut Self, bit: i64) {
        self.x.swap(&mut q.x, bit);
        self.z.swap(&mut q.z, bit);
    }
}

#[cfg(test)]
fn affine(q: &ProjectivePoint) -> FieldElement {
    q.x * q.z.inverse()
}

#[test]
fn curve_constants() {
    assert_eq!(A_PLUS_2.to_bytes(), {
        let mut b = [0u8; 32];
        b[..4].copy_from_slice(&(A + 2).to_le_bytes());
        b
    });
    assert_eq!(B, 1);

    let l = num_bigint::BigUint::from_bytes_le(&SUBGROUP_ORDER);
    let expected = (num_bigint::BigUint::from(1u8) << 252u32)
        + "27742317777372353535851937790883648493"
            .parse::<num_bigint::BigUint>()
            .unwrap();
    assert_eq!(l, expected);
}

#[test]
fn double_matches_diff_add() {
    // 4G = double(2G) = diff_add(G, 3G, 2G), with 3G = diff_add(G, 2G, G).
    let g = ProjectivePoint::BASEPOINT;
    let g2 = g.double();
    let g3 = ProjectivePoint::diff_add(&g, &g2, &g);
    let g4_dbl = g2.double();
    let g4_add = ProjectivePoint::diff_add(&g, &g3, &g2);
    assert_eq!(affine(&g4_dbl), affine(&g4_add));
    // Symmetric in the two summands.
    assert_eq!(
        affine(&ProjectivePoint::diff_add(&g2, &g, &g)),
        affine(&g3)
    );
}

#[test]
fn neutral_element() {
    let g = ProjectivePoint::BASEPOINT;
    let n = ProjectivePoint::NEUTRAL;
    assert!(n.is_infinity());
    assert!(n.double().is_infinity());
    // O + G with difference G is G.
    assert_eq!(affine(&ProjectivePoint::diff_add(&n, &g, &g)), affine(&g));
}

#[test]
fn doubling_known_value() {
    // x(2G) = 14847277145635483483963372537557091634710985132825781088887140890597596352251
    let expected: num_bigint::BigUint =
        "14847277145635483483963372537557091634710985132825781088887140890597596352251"
            .parse()
            .unwrap();
    let g2 = affine(&ProjectivePoint::BASEPOINT.double());
    assert_eq!(num_bigint::BigUint::from_bytes_le(&g2.to_bytes()), expected);
}
