use super::c40::{self, Vals};
use super::{DataEncodingError, EncodingContext};

/// Text values, C40 with the letter cases swapped.
fn text_values(ch: u8) -> Vals {
    let swapped = if ch.is_ascii_alphabetic() { ch ^ 0x20 } else { ch };
    c40::c40_values(swapped)
}

pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), DataEncodingError> {
    c40::encode_generic(ctx, text_values)
}

#[test]
fn test_case_swapped() {
    assert_eq!(text_values(b'a').as_slice(), &[14]);
    assert_eq!(text_values(b'A').as_slice(), &[2, 1]);
    assert_eq!(text_values(b'5').as_slice(), &[9]);
}
