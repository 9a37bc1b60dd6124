//! Byte compaction, six bytes in five codewords.
use alloc::vec::Vec;

use super::high_level::{LATCH_BYTE, LATCH_BYTE_6, SHIFT_BYTE};

/// Encode `bytes` including the latch, or the shift for a single byte in text mode.
pub(super) fn encode(bytes: &[u8], in_text: bool, out: &mut Vec<u16>) {
    out.push(if bytes.len() == 1 && in_text {
        SHIFT_BYTE
    } else if bytes.len() % 6 == 0 {
        LATCH_BYTE_6
    } else {
        LATCH_BYTE
    });

    let groups = bytes.chunks_exact(6);
    let rest = groups.remainder();
    for group in groups {
        // 48 bit big endian number
        let mut value = group.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64);
        let mut base900 = [0u16; 5];
        for digit in base900.iter_mut().rev() {
            *digit = (value % 900) as u16;
            value /= 900;
        }
        out.extend_from_slice(&base900);
    }
    out.extend(rest.iter().map(|b| *b as u16));
}

#[cfg(test)]
fn enc(bytes: &[u8], in_text: bool) -> Vec<u16> {
    let mut out = Vec::new();
    encode(bytes, in_text, &mut out);
    out
}

#[test]
fn test_multiple_of_six() {
    assert_eq!(enc(b"alcool", false), vec![924, 163, 238, 432, 766, 244]);
}

#[test]
fn test_not_multiple_of_six() {
    assert_eq!(
        enc(b"encode bin", false),
        vec![901, 169, 883, 224, 680, 517, 32, 98, 105, 110]
    );
}

#[test]
fn test_single_byte() {
    assert_eq!(enc(b"\x1b", true), vec![913, 27]);
    assert_eq!(enc(b"\x1b", false), vec![901, 27]);
}
