use arrayvec::ArrayVec;

use super::{ascii, DataEncodingError, EncodationType, EncodingContext};
use crate::classify::is_native_edifact;

/// The EDIFACT value returning to ASCII.
const UNLATCH: u8 = 0b011111;

/// Pack up to four 6 bit values into codewords.
///
/// Four values fill three codewords. A shorter segment is cut after one
/// codeword per value, the missing bits are zero.
fn write_segment<T: EncodingContext>(ctx: &mut T, vals: &[u8]) {
    let bits = (0..4).fold(0u32, |acc, i| {
        let v = vals.get(i).cloned().unwrap_or(0) & 0x3F;
        (acc << 6) | u32::from(v)
    });
    let bytes = bits.to_be_bytes();
    for byte in &bytes[1..=vals.len().min(3)] {
        ctx.push(*byte);
    }
}

/// Write the last group, `symbols` ends with the unlatch value.
fn handle_end<T: EncodingContext>(
    ctx: &mut T,
    symbols: ArrayVec<u8, 4>,
) -> Result<(), DataEncodingError> {
    let count = symbols.len();
    if count == 1 {
        // only the unlatch is left, it may be skipped if the rest fits as ASCII
        let mut available = ctx.symbol_size_left(0)?;
        let tail = ctx.rest();
        // codewords in ASCII, more than four characters never fit into two
        let remaining = if tail.len() > 4 {
            tail.len()
        } else {
            ascii::codeword_count(tail)
        };
        if remaining > available {
            available = ctx.symbol_size_left(1)? + 1;
        }
        if remaining <= available && available <= 2 {
            return Ok(());
        }
    }

    let rest = count - 1;
    let mut rest_in_ascii = !ctx.has_more_characters() && rest <= 2;
    if rest <= 2 {
        let available = ctx.symbol_size_left(rest)? + rest;
        if available >= 3 {
            rest_in_ascii = false;
            let written = ctx.codewords().len() + count.min(3);
            ctx.update_symbol_size(written)?;
        }
    }
    if rest_in_ascii {
        ctx.reset_symbol_size();
        ctx.backup(rest);
    } else {
        write_segment(ctx, &symbols);
    }
    Ok(())
}

pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), DataEncodingError> {
    let mut symbols = ArrayVec::<u8, 4>::new();
    while let Some(ch) = ctx.peek(0) {
        if !is_native_edifact(ch) {
            break;
        }
        ctx.eat();
        symbols.push(ch & 0b11_1111);
        if symbols.is_full() {
            write_segment(ctx, &symbols);
            symbols.clear();
            if ctx.look_ahead() != EncodationType::Edifact {
                break;
            }
        }
    }
    symbols.push(UNLATCH);
    handle_end(ctx, symbols)?;
    ctx.set_mode(EncodationType::Ascii);
    Ok(())
}

#[cfg(test)]
use super::tests::FakeContext;

#[test]
fn test_segment_lengths() {
    let vals = [0b100100, 0b110110, 0b011010, 0b000001];
    let expected: [&[u8]; 4] = [
        &[0b1001_0000],
        &[0b1001_0011, 0b0110_0000],
        &[0b1001_0011, 0b0110_0110, 0b1000_0000],
        &[0b1001_0011, 0b0110_0110, 0b1000_0001],
    ];
    for (len, words) in (1..=4).zip(expected) {
        let mut ctx = FakeContext::new(b"", 3);
        write_segment(&mut ctx, &vals[..len]);
        assert_eq!(ctx.codewords, words, "{} values", len);
    }
}

#[test]
fn test_unlatch_segment() {
    let mut ctx = FakeContext::new(b"", 1);
    write_segment(&mut ctx, &[UNLATCH]);
    assert_eq!(ctx.codewords, vec![124]);
}

#[test]
fn test_stops_at_foreign_character() {
    let mut ctx = FakeContext::new(b".A.Ca", 10);
    ctx.mode = EncodationType::Edifact;
    encode(&mut ctx).unwrap();
    // ".A.C" as three codewords, then the unlatch alone
    assert_eq!(ctx.codewords, vec![184, 27, 131, 124]);
    assert_eq!(ctx.rest(), b"a");
    assert_eq!(ctx.mode, EncodationType::Ascii);
}
