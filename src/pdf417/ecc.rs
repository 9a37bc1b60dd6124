//! Reed-Solomon error codewords over GF(929).
use alloc::vec::Vec;

use super::dimensions::ecc_count;
use crate::errorcode::{encode_block, GF929};

/// Compute the error codewords for all data codewords (length descriptor and padding included).
pub(super) fn error_codewords(data: &[u16], level: u8) -> Vec<u16> {
    encode_block(data.iter().map(|cw| GF929::new(*cw)), ecc_count(level))
        .into_iter()
        .map(GF929::value)
        .collect()
}

#[test]
fn test_iso15438_message() {
    // worked message of ISO 15438, level 1
    assert_eq!(
        error_codewords(&[5, 453, 178, 121, 239], 1),
        vec![452, 327, 657, 619]
    );
}

#[test]
fn test_levels() {
    let data = [
        16, 902, 1, 278, 827, 900, 295, 902, 2, 326, 823, 544, 900, 149, 900, 900,
    ];
    assert_eq!(error_codewords(&data, 0), vec![156, 765]);
    assert_eq!(error_codewords(&data, 1), vec![168, 875, 63, 355]);
    assert_eq!(
        error_codewords(&data, 2),
        vec![628, 715, 393, 299, 863, 601, 169, 708]
    );
}

#[test]
fn test_mixed_segments() {
    let data = [
        17, 597, 138, 599, 902, 142, 142, 901, 169, 883, 224, 680, 517, 32, 98, 105, 110,
    ];
    assert_eq!(error_codewords(&data, 0), vec![516, 287]);
}
