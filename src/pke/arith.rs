// Arithmetic over GF(p), p = 2^255 - 19.
// Elements are 16 signed limbs of 16 bits each (radix 2^16).
// Every public operation returns a canonical element: all limbs in [0, 2^16)
// and the represented value in [0, p).
use std::ops::{Add, Mul, Sub};

/// p = 2^255 - 19.
pub const P25519: FieldElement = FieldElement([
    0xffed, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff,
    0xffff, 0xffff, 0xffff, 0x7fff,
]);

/// 2p with every limb but the top one at least 2^16, so `a + 2p - b` stays non-negative.
const TWO_P: [i64; 16] = [
    0x1ffda, 0x1fffe, 0x1fffe, 0x1fffe, 0x1fffe, 0x1fffe, 0x1fffe, 0x1fffe, 0x1fffe, 0x1fffe,
    0x1fffe, 0x1fffe, 0x1fffe, 0x1fffe, 0x1fffe, 0xfffe,
];

/// p - 2, little endian. a^(p-2) = a^-1 for a != 0.
const P_MINUS_2: [u8; 32] = [
    0xeb, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
];

pub const ZERO: FieldElement = FieldElement([0; 16]);
pub const ONE: FieldElement = FieldElement([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

/// This struct stores a number over Z_p=2^255-19.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldElement(pub(crate) [i64; 16]);

impl FieldElement {
    /// Small constant, `n < 2^16`.
    pub const fn from_u16(n: u16) -> Self {
        let mut limbs = [0i64; 16];
        limbs[0] = n as i64;
        FieldElement(limbs)
    }

    /// Propagate carries once. The value is preserved modulo p;
    /// 2^256 = 38 (mod p) folds the top carry back into limb 0.
    fn carry(limbs: &mut [i64; 16]) {
        for i in 0..16 {
            let carry = limbs[i] >> 16;
            limbs[i] -= carry << 16;

            if i < 15 {
                limbs[i + 1] += carry;
            } else {
                limbs[0] += 38 * carry;
            }
        }
    }

    /// Bring non-negative limbs of magnitude below 2^47 to the canonical form.
    fn reduce(mut limbs: [i64; 16]) -> Self {
        Self::carry(&mut limbs);
        Self::carry(&mut limbs);
        Self::carry(&mut limbs);

        // value < 2^256 < 3p here: two conditional subtractions of p suffice.
        let mut t = FieldElement(limbs);
        for _ in 0..2 {
            let mut m = FieldElement([0; 16]);
            m.0[0] = t.0[0] - 0xffed;
            for i in 1..15 {
                m.0[i] = t.0[i] - 0xffff - ((m.0[i - 1] >> 16) & 1);
                m.0[i - 1] &= 0xffff;
            }
            m.0[15] = t.0[15] - 0x7fff - ((m.0[14] >> 16) & 1);
            let borrow = (m.0[15] >> 16) & 1;
            m.0[14] &= 0xffff;
            t.swap(&mut m, 1 - borrow);
        }
        t
    }

    /// Constant-time swap of `self` and `q` when `bit == 1`; no-op when `bit == 0`.
    pub fn swap(&mut self, q: &mut Self, bit: i64) {
        let mask = !(bit - 1);
        for i in 0..16 {
            let t = mask & (self.0[i] ^ q.0[i]);
            self.0[i] ^= t;
            q.0[i] ^= t;
        }
    }

    /// Constant-time select: `a` when `bit == 0`, `b` when `bit == 1`.
    pub fn select(a: &Self, b: &Self, bit: i64) -> Self {
        let mask = !(bit - 1);
        let mut ret = [0i64; 16];
        for i in 0..16 {
            ret[i] = a.0[i] ^ (mask & (a.0[i] ^ b.0[i]));
        }
        FieldElement(ret)
    }

    /// Decode 32 little-endian bytes. All 256 bits are read and the value is
    /// reduced modulo p, so encodings in [p, 2^256) are accepted.
    pub fn from_bytes(input: &[u8; 32]) -> Self {
        let mut limbs = [0i64; 16];
        for i in 0..16 {
            limbs[i] = input[2 * i] as i64 | ((input[2 * i + 1] as i64) << 8);
        }
        Self::reduce(limbs)
    }

    /// Little-endian encoding of the canonical value.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut ret = [0u8; 32];
        for i in 0..16 {
            ret[2 * i] = self.0[i] as u8;
            ret[2 * i + 1] = (self.0[i] >> 8) as u8;
        }
        ret
    }

    /// Whether 32 bytes encode a value below p, i.e. decode without reduction.
    pub fn is_canonical(input: &[u8; 32]) -> bool {
        Self::from_bytes(input).to_bytes() == *input
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().fold(0, |acc, limb| acc | limb) == 0
    }

    pub fn square(&self) -> Self {
        *self * *self
    }

    /// self^e for a 256-bit little-endian exponent.
    /// Always 256 squarings and 256 multiplications, whatever the bits of `e`.
    pub fn pow(&self, e: &[u8; 32]) -> Self {
        let mut acc = ONE;
        for i in (0..256).rev() {
            acc = acc.square();
            let bit = ((e[i >> 3] >> (i & 7)) & 1) as i64;
            let product = acc * *self;
            acc = Self::select(&acc, &product, bit);
        }
        acc
    }

    /// inverse: Get multiplicational reverse.
    /// since p is a prime, there is a^(p-1) = 1
    /// therefore, we have a*a^(p-2) = 1,
    /// so, a^(p-2) is inverse and we can compute it in constant time.
    ///
    /// Zero has no inverse; the result for zero is zero.
    pub fn inverse(&self) -> Self {
        self.pow(&P_MINUS_2)
    }
}

impl From<&[u8; 32]> for FieldElement {
    fn from(input: &[u8; 32]) -> Self {
        Self::from_bytes(input)
    }
}

impl From<FieldElement> for [u8; 32] {
    fn from(t: FieldElement) -> Self {
        t.to_bytes()
    }
}

impl Add for FieldElement {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        let mut ret = [0; 16];
        for i in 0..16 {
            ret[i] = self.0[i] + rhs.0[i];
        }
        Self::reduce(ret)
    }
}

impl Sub for FieldElement {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        let mut ret = [0; 16];
        for i in 0..16 {
            ret[i] = self.0[i] + TWO_P[i] - rhs.0[i];
        }
        Self::reduce(ret)
    }
}

impl Mul for FieldElement {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        let mut product = [0i64; 31];
        let mut ret = [0i64; 16];

        for i in 0..16 {
            for j in 0..16 {
                product[i + j] += self.0[i] * rhs.0[j];
            }
        }

        for i in 0..15 {
            product[i] += 38 * product[i + 16];
        }

        ret.copy_from_slice(&product[..16]);
        Self::reduce(ret)
    }
}

#[cfg(test)]
fn to_biguint(a: &FieldElement) -> num_bigint::BigUint {
    num_bigint::BigUint::from_bytes_le(&a.to_bytes())
}

#[cfg(test)]
fn modulus() -> num_bigint::BigUint {
    (num_bigint::BigUint::from(1u8) << 255u32) - 19u32
}

#[test]
fn reduce_on_decode() {
    // p itself and p + 1 reduce to 0 and 1.
    let p = P25519.to_bytes();
    assert_eq!(FieldElement::from_bytes(&p), ZERO);
    let mut p1 = p;
    p1[0] += 1;
    assert_eq!(FieldElement::from_bytes(&p1), ONE);
    assert!(!FieldElement::is_canonical(&p));

    // 2^256 - 1 = 2p + 37.
    let max = FieldElement::from_bytes(&[0xff; 32]);
    assert_eq!(max, FieldElement::from_u16(37));
}

#[test]
fn sub_normalizes_negative() {
    let one = ONE;
    let two = FieldElement::from_u16(2);
    let minus_one = one - two;
    let mut expected = P25519.to_bytes();
    expected[0] -= 1;
    assert_eq!(minus_one.to_bytes(), expected);
    assert_eq!(minus_one + one, ZERO);
    assert_eq!(ZERO - ZERO, ZERO);
}

#[test]
fn arith_matches_biguint() {
    use rand::prelude::*;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::seed_from_u64(25519);
    let p = modulus();
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    for _ in 0..2000 {
        rng.fill_bytes(&mut a);
        rng.fill_bytes(&mut b);
        let x = FieldElement::from_bytes(&a);
        let y = FieldElement::from_bytes(&b);
        let bx = num_bigint::BigUint::from_bytes_le(&a) % &p;
        let by = num_bigint::BigUint::from_bytes_le(&b) % &p;
        assert_eq!(to_biguint(&x), bx);

        assert_eq!(to_biguint(&(x + y)), (&bx + &by) % &p);
        assert_eq!(to_biguint(&(x - y)), (&bx + &p - &by) % &p);
        assert_eq!(to_biguint(&(x * y)), (&bx * &by) % &p);
    }
}

#[test]
fn pow_matches_biguint() {
    use rand::prelude::*;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::seed_from_u64(7748);
    let p = modulus();
    let mut a = [0u8; 32];
    let mut e = [0u8; 32];
    for _ in 0..50 {
        rng.fill_bytes(&mut a);
        rng.fill_bytes(&mut e);
        let x = FieldElement::from_bytes(&a);
        let expected = to_biguint(&x).modpow(&num_bigint::BigUint::from_bytes_le(&e), &p);
        assert_eq!(to_biguint(&x.pow(&e)), expected);
    }
}

#[test]
fn inv25519() {
    use rand::prelude::*;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let mut a = [0u8; 32];
    for _ in 0..2000 {
        rng.fill_bytes(&mut a);
        let b = FieldElement::from_bytes(&a);
        if b.is_zero() {
            continue;
        }
        assert_eq!(b * b.inverse(), ONE);
    }
    assert_eq!(ZERO.inverse(), ZERO);
}

#[test]
fn bytes_round_trip() {
    use rand::prelude::*;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let mut a = [0u8; 32];
    for _ in 0..1000 {
        rng.fill_bytes(&mut a);
        a[31] &= 0x7f;
        let x = FieldElement::from_bytes(&a);
        assert_eq!(FieldElement::from_bytes(&x.to_bytes()), x);
    }
}

#[test]
fn swap_and_select() {
    let mut a = FieldElement::from_u16(3);
    let mut b = FieldElement::from_u16(5);
    a.swap(&mut b, 0);
    assert_eq!((a, b), (FieldElement::from_u16(3), FieldElement::from_u16(5)));
    a.swap(&mut b, 1);
    assert_eq!((a, b), (FieldElement::from_u16(5), FieldElement::from_u16(3)));
    assert_eq!(FieldElement::select(&a, &b, 0), a);
    assert_eq!(FieldElement::select(&a, &b, 1), b);
}
