use super::{DataEncodingError, EncodationType, EncodingContext};
use crate::classify::{consecutive_digit_count, is_native_edifact, is_native_x12};

pub(super) const LATCH_C40: u8 = 230;
pub(super) const LATCH_BASE256: u8 = 231;
pub(super) const LATCH_X12: u8 = 238;
pub(super) const LATCH_TEXT: u8 = 239;
pub(super) const LATCH_EDIFACT: u8 = 240;
pub(crate) const PAD: u8 = 129;

pub(super) const UPPER_SHIFT: u8 = 235;

fn starts_with_x12_triplet(rest: &[u8]) -> bool {
    rest.len() >= 3 && rest[..3].iter().cloned().all(is_native_x12)
}

/// Number of codewords ASCII writes for `data`, latches not included.
pub(super) fn codeword_count(data: &[u8]) -> usize {
    let mut count = 0;
    let mut idx = 0;
    while idx < data.len() {
        if consecutive_digit_count(&data[idx..]) >= 2 {
            idx += 2;
            count += 1;
        } else {
            count += if data[idx] >= 128 { 2 } else { 1 };
            idx += 1;
        }
    }
    count
}

/// Encode one step in ASCII.
///
/// A step is a digit pair, a latch to another mode, or a single character.
pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), DataEncodingError> {
    if consecutive_digit_count(ctx.rest()) >= 2 {
        let tens = ctx.eat().unwrap_or(b'0') - b'0';
        let ones = ctx.eat().unwrap_or(b'0') - b'0';
        ctx.push(130 + tens * 10 + ones);
        return Ok(());
    }

    let new_mode = match ctx.look_ahead() {
        // a latch to X12 needs a full triplet ahead
        EncodationType::X12 if !starts_with_x12_triplet(ctx.rest()) => EncodationType::Ascii,
        EncodationType::Edifact if !ctx.peek(0).map_or(false, is_native_edifact) => {
            EncodationType::Ascii
        }
        mode => mode,
    };
    if new_mode != EncodationType::Ascii {
        ctx.push(new_mode.latch_from_ascii());
        ctx.set_mode(new_mode);
        return Ok(());
    }

    if let Some(ch) = ctx.eat() {
        if ch >= 128 {
            ctx.push(UPPER_SHIFT);
        }
        ctx.push((ch & 0x7F) + 1);
    }
    Ok(())
}

#[test]
fn test_codeword_count() {
    assert_eq!(codeword_count(b""), 0);
    assert_eq!(codeword_count(b"A"), 1);
    assert_eq!(codeword_count(b"\xff"), 2);
    assert_eq!(codeword_count(b"123"), 2);
    assert_eq!(codeword_count(b"12\xe4"), 3);
    assert_eq!(codeword_count(b"1A23"), 3);
}

#[test]
fn test_x12_triplet() {
    assert!(starts_with_x12_triplet(b"AB>a"));
    assert!(!starts_with_x12_triplet(b"AB"));
    assert!(!starts_with_x12_triplet(b"Ab>"));
}
