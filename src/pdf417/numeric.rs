//! Numeric compaction, groups of up to 44 digits as base 900 numbers.
use alloc::vec::Vec;

use arrayvec::ArrayVec;
use awint_core::{Bits, InlAwi};

/// Enough for 45 decimal digits.
type U160 = InlAwi<160, { Bits::unstable_raw_digits(160) }>;

const GROUP: usize = 44;

/// Encode a run of ASCII digits.
///
/// Each group gets a leading 1 before the conversion, so that leading zeros
/// survive. A group of 44 digits needs 15 codewords.
pub(super) fn encode(digits: &[u8], out: &mut Vec<u16>) {
    for group in digits.chunks(GROUP) {
        let mut decimal = ArrayVec::<u8, { GROUP + 1 }>::new();
        decimal.push(b'1');
        decimal.extend(group.iter().cloned());

        let mut value = U160::zero();
        let mut pad0 = U160::zero();
        let mut pad1 = U160::zero();
        if value
            .bytes_radix_(None, &decimal, 10, &mut pad0, &mut pad1)
            .is_err()
        {
            panic!("digit group does not fit 160 bits, this is a bug");
        }

        let mut base900 = ArrayVec::<u16, 16>::new();
        while !value.is_zero() {
            match value.digit_udivide_inplace_(900) {
                Some(rem) => base900.push(rem as u16),
                None => panic!("division by zero, this is a bug"),
            }
        }
        out.extend(base900.iter().rev());
    }
}

#[cfg(test)]
fn enc(digits: &[u8]) -> Vec<u16> {
    let mut out = Vec::new();
    encode(digits, &mut out);
    out
}

#[test]
fn test_short_group() {
    assert_eq!(enc(b"12345678987654321"), vec![190, 232, 499, 20, 504, 721]);
    assert_eq!(enc(b"42"), vec![142]);
}

#[test]
fn test_leading_zeros() {
    // 1000 = 1 * 900 + 100
    assert_eq!(enc(b"000"), vec![1, 100]);
}

#[test]
fn test_groups_of_44() {
    let digits = b"123456789876543211234567898765432112345678987654321";
    #[rustfmt::skip]
    let expected = vec![
        491, 81, 137, 725, 651, 455, 511, 858, 135, 138, 488, 568, 447, 553, 198,
        21, 715, 821,
    ];
    assert_eq!(enc(digits), expected);
}
