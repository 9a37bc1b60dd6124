//! Reed-Solomon error correction codes.
//!
//! The error correction in a Data Matrix and in a PDF417 symbol is done
//! using Reed-Solomon codes, over GF(256) and GF(929) respectively.
//!
//! Only encoding is needed here. The error codewords are the negated
//! remainder of `d(x) * x^k` divided by the generator polynomial, `d` being
//! the data and `k` the number of error codewords.
mod galois;

use alloc::{vec, vec::Vec};

use super::symbol_size::SymbolSize;
pub use galois::{Field, GF, GF929};

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Compute the generator polynomial `(x - a)(x - a^2)...(x - a^len)`.
///
/// `a` is the primitive element of the field. The coefficients are returned
/// highest power first, so the first one is always 1.
pub fn generator<F: Field>(len: usize) -> Vec<F> {
    let mut g = Vec::with_capacity(len + 1);
    g.push(F::ONE);
    let mut root = F::ONE;
    for _ in 0..len {
        root = root * F::primitive();
        g.push(F::ZERO);
        for j in (1..g.len()).rev() {
            g[j] = g[j] - root * g[j - 1];
        }
    }
    g
}

/// Error codewords of a Data Matrix, interleaved as they are placed.
///
/// Larger symbols split the data into several blocks, taking every
/// `ecc_blocks`-th codeword. Each block gets its own error codewords.
pub fn encode_error(data: &[u8], size: SymbolSize) -> Vec<u8> {
    let info = size.info();
    assert!(
        data.len() == info.data_codewords,
        "data does not fill the symbol, this is a bug"
    );
    let generator_poly: Vec<GF> = generator(info.ecc_per_block);
    let blocks = info.ecc_blocks;
    let mut remainder = vec![GF::ZERO; info.ecc_per_block + 1];
    let mut out = vec![0; info.error_codewords()];
    for block in 0..blocks {
        remainder.fill(GF::ZERO);
        let block_data = data.iter().skip(block).step_by(blocks).map(|d| GF(*d));
        ecc_block(block_data, &generator_poly, &mut remainder);
        let block_out = out.iter_mut().skip(block).step_by(blocks);
        for (slot, e) in block_out.zip(&remainder[..info.ecc_per_block]) {
            *slot = e.0;
        }
    }
    out
}

/// Error codewords for one block of data, highest power first.
pub fn encode_block<F: Field, T: Iterator<Item = F>>(data: T, len: usize) -> Vec<F> {
    let g = generator(len);
    let mut ecc = vec![F::ZERO; len + 1];
    ecc_block(data, &g, &mut ecc);
    ecc.truncate(len);
    ecc
}

fn ecc_block<F: Field, T: Iterator<Item = F>>(data: T, g: &[F], ecc: &mut [F]) {
    // synthetic division, ecc holds the running remainder plus one spare slot
    let ecc_len = g.len() - 1;
    for a in data {
        let k = ecc[0] + a;
        for j in 0..ecc_len {
            ecc[j] = ecc[j + 1] - k * g[j + 1];
        }
    }
    for e in ecc[..ecc_len].iter_mut() {
        *e = -*e;
    }
}

#[test]
fn generator_gf256() {
    let g: Vec<u8> = generator::<GF>(5).into_iter().map(u8::from).collect();
    assert_eq!(g, vec![1, 62, 111, 15, 48, 228]);
    let g: Vec<u8> = generator::<GF>(7).into_iter().map(u8::from).collect();
    assert_eq!(g, vec![1, 254, 92, 240, 134, 144, 68, 23]);
    let g: Vec<u8> = generator::<GF>(10).into_iter().map(u8::from).collect();
    assert_eq!(g, vec![1, 61, 110, 255, 116, 248, 223, 166, 185, 24, 28]);
}

#[test]
fn ecc_block_1() {
    let data = [23, 40, 11];
    let ecc: Vec<u8> = encode_block(data.iter().map(|d| GF(*d)), 5)
        .into_iter()
        .map(u8::from)
        .collect();
    assert_eq!(ecc, vec![255, 207, 37, 244, 81]);
}

#[test]
fn ecc_square10() {
    // "123456" in a 10x10 symbol
    assert_eq!(
        encode_error(&[142, 164, 186], SymbolSize::Square10),
        vec![114, 25, 5, 88, 102]
    );
}

#[test]
fn ecc_interleaved_length() {
    let size = SymbolSize::Square144;
    let data = vec![129; size.info().data_codewords];
    let ecc = encode_error(&data, size);
    assert_eq!(ecc.len(), 620);
    // all blocks see the same data except the last two, which are one shorter
    assert_eq!(ecc[0], ecc[1]);
    assert_eq!(ecc[8], ecc[9]);
}
