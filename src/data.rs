//! Data codewords on their own.
//!
//! [DataMatrix](crate::DataMatrix) appends error correction and places the
//! result. [encode_data] stops before that and returns the padded data
//! codewords with the symbol size they were resolved against.
use alloc::vec::Vec;

use flagset::FlagSet;

use crate::encodation::GenericDataEncoder;
pub use crate::encodation::{DataEncodingError, EncodationType};
use crate::symbol_size::{SymbolList, SymbolSize};

/// Run the high-level encoder.
///
/// The smallest symbol in `symbol_list` which can hold the result is picked.
/// Only the modes in `enabled` are used, ASCII is always enabled. With
/// `use_macros` a Macro 05/06 header and trailer are written as a single codeword.
pub fn encode_data(
    data: &[u8],
    symbol_list: &SymbolList,
    enabled: impl Into<FlagSet<EncodationType>>,
    use_macros: bool,
) -> Result<(Vec<u8>, SymbolSize), DataEncodingError> {
    GenericDataEncoder::with_size(data, symbol_list)
        .with_encodation_types(enabled)
        .with_macros(use_macros)
        .encode()
}

#[test]
fn test_digits_in_ascii() {
    let (cw, size) = encode_data(b"123456", &SymbolList::default(), EncodationType::all(), true)
        .unwrap();
    assert_eq!(size, SymbolSize::Square10);
    assert_eq!(cw, vec![142, 164, 186]);
}

#[test]
fn test_deterministic() {
    let data = b"30Q324343430794<OQQ";
    let a = encode_data(data, &SymbolList::default(), EncodationType::all(), true);
    let b = encode_data(data, &SymbolList::default(), EncodationType::all(), true);
    assert_eq!(a, b);
}

#[test]
fn test_even_digits_halve() {
    for n in (2..60).step_by(2) {
        let data: Vec<u8> = (0..n).map(|i| b'0' + (i % 10) as u8).collect();
        let (cw, size) =
            encode_data(&data, &SymbolList::default(), EncodationType::Ascii, false).unwrap();
        let len = if n / 2 < size.info().data_codewords {
            // up to the first pad codeword
            cw.iter().position(|c| *c == 129).unwrap()
        } else {
            cw.len()
        };
        assert_eq!(len, n / 2);
    }
}
