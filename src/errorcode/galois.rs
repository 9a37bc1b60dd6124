//! Finite field arithmetic for the Reed-Solomon codes.
//!
//! Data Matrix works in GF(256), PDF417 in the prime field GF(929).
//!
//! A GF(256) element is a byte whose bits are the coefficients of a
//! polynomial over GF(2), bit 0 being the constant term. Sums are XOR,
//! products are reduced modulo x^8 + x^5 + x^3 + x^2 + 1 (0x12D). In this
//! field x is primitive, so a product is computed by adding exponents in
//! the precomputed [EXP] and [LOG] tables.
//!
//! GF(929) is the integers modulo 929, 3 generates its multiplicative group.
use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, Mul, Neg, Sub};

/// The field operations the Reed-Solomon encoder needs.
pub trait Field:
    Copy
    + PartialEq
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;

    /// Primitive element, the roots of the generator polynomial are its powers.
    fn primitive() -> Self;
}

const fn exp_table() -> [u8; 255] {
    let mut table = [0u8; 255];
    let mut value: u16 = 1;
    let mut exp = 0;
    while exp < table.len() {
        table[exp] = value as u8;
        value <<= 1;
        if value & 0x100 != 0 {
            value ^= 0x12D;
        }
        exp += 1;
    }
    table
}

const fn log_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut exp = 0;
    while exp < EXP.len() {
        table[EXP[exp] as usize] = exp as u8;
        exp += 1;
    }
    table
}

/// `EXP[i]` is x^i.
const EXP: [u8; 255] = exp_table();

/// Inverse of [EXP], `LOG[0]` is unused.
const LOG: [u8; 256] = log_table();

/// Element of GF(256).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GF(pub u8);

impl Debug for GF {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "GF({})", self.0)
    }
}

impl Field for GF {
    const ZERO: Self = GF(0);
    const ONE: Self = GF(1);

    fn primitive() -> Self {
        GF(2)
    }
}

impl Add for GF {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        // characteristic 2
        GF(self.0 ^ rhs.0)
    }
}

impl Sub for GF {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + rhs
    }
}

impl Mul for GF {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self.0, rhs.0) {
            (0, _) | (_, 0) => GF(0),
            (a, b) => {
                let exp = LOG[a as usize] as usize + LOG[b as usize] as usize;
                GF(EXP[exp % 255])
            }
        }
    }
}

impl Neg for GF {
    type Output = Self;

    fn neg(self) -> Self {
        self
    }
}

impl From<GF> for u8 {
    fn from(a: GF) -> u8 {
        a.0
    }
}

impl From<u8> for GF {
    fn from(i: u8) -> Self {
        GF(i)
    }
}

const P929: u16 = 929;

/// Element of GF(929), always reduced.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GF929(u16);

impl GF929 {
    pub fn new(v: u16) -> Self {
        GF929(v % P929)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl Debug for GF929 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "GF929({})", self.0)
    }
}

impl Field for GF929 {
    const ZERO: Self = GF929(0);
    const ONE: Self = GF929(1);

    fn primitive() -> Self {
        GF929(3)
    }
}

impl Add for GF929 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        GF929((self.0 + rhs.0) % P929)
    }
}

impl Sub for GF929 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        GF929((self.0 + P929 - rhs.0) % P929)
    }
}

impl Mul for GF929 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        GF929(((self.0 as u32 * rhs.0 as u32) % P929 as u32) as u16)
    }
}

impl Neg for GF929 {
    type Output = Self;

    fn neg(self) -> Self {
        GF929((P929 - self.0) % P929)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_tables_inverse() {
        let mut hit = [0usize; 256];
        for (exp, value) in EXP.iter().enumerate() {
            hit[*value as usize] += 1;
            assert_eq!(LOG[*value as usize] as usize, exp);
        }
        // every nonzero byte is a power of x exactly once
        assert_eq!(hit[0], 0);
        assert!(hit[1..].iter().all(|n| *n == 1));
    }

    #[test]
    fn test_gf256_products() {
        assert_eq!(GF(77) * GF::ONE, GF(77));
        assert_eq!(GF(0) * GF(200), GF::ZERO);
        assert_eq!(GF(128) * GF(2), GF(0x2D));
        assert_eq!(GF(2) * GF(4) * GF(8) * GF(16) * GF(32), GF(228));
    }

    #[test]
    fn test_gf256_order() {
        let powers: Vec<GF> = core::iter::successors(Some(GF::ONE), |p| Some(*p * GF::primitive()))
            .take(256)
            .collect();
        assert_eq!(powers[255], GF::ONE);
        assert_eq!(powers[8], GF(45));
        assert!(powers[1..255].iter().all(|p| *p != GF::ONE));
    }

    #[test]
    fn test_gf256_self_inverse() {
        for a in 0..=255 {
            assert_eq!(GF(a) - GF(a), GF::ZERO);
            assert_eq!(-GF(a), GF(a));
        }
    }

    #[test]
    fn gf929_arithmetic() {
        assert_eq!(GF929::new(928) + GF929::new(2), GF929::new(1));
        assert_eq!(GF929::new(1) - GF929::new(2), GF929::new(928));
        assert_eq!(GF929::new(500) * GF929::new(500), GF929::new(99));
        assert_eq!(-GF929::new(0), GF929::ZERO);
        assert_eq!((-GF929::new(5)).value(), 924);
    }

    #[test]
    fn gf929_primitive_order() {
        let mut a = GF929::primitive();
        let mut order = 1;
        while a != GF929::ONE {
            a = a * GF929::primitive();
            order += 1;
        }
        assert_eq!(order, 928);
    }
}
