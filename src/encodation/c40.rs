use alloc::vec::Vec;

use arrayvec::ArrayVec;
use log::trace;

use super::{DataEncodingError, EncodationType, EncodingContext, UNLATCH};

const SHIFT1: u8 = 0;
const SHIFT2: u8 = 1;
const SHIFT3: u8 = 2;
const UPPER_SHIFT: u8 = 30;

/// Values of one input character, at most four (upper shift plus a shifted value).
pub(super) type Vals = ArrayVec<u8, 4>;

/// Maps a character below 128 to its values.
pub(super) type ValueTable = fn(u8) -> Vals;

fn pair(shift: u8, value: u8) -> Vals {
    let mut vals = Vals::new();
    vals.push(shift);
    vals.push(value);
    vals
}

/// C40 values of a character below 128.
pub(super) fn c40_values(ch: u8) -> Vals {
    let basic = match ch {
        b' ' => Some(3),
        b'0'..=b'9' => Some(ch - b'0' + 4),
        b'A'..=b'Z' => Some(ch - b'A' + 14),
        _ => None,
    };
    if let Some(value) = basic {
        return core::iter::once(value).collect();
    }
    match ch {
        0..=31 => pair(SHIFT1, ch),
        b'!'..=b'/' => pair(SHIFT2, ch - b'!'),
        b':'..=b'@' => pair(SHIFT2, ch - b':' + 15),
        b'['..=b'_' => pair(SHIFT2, ch - b'[' + 22),
        b'`'..=127 => pair(SHIFT3, ch - b'`'),
        _ => panic!("{} is not below 128, this is a bug", ch),
    }
}

/// Pack three values into two codewords.
pub(super) fn push_triplet<T: EncodingContext>(ctx: &mut T, [c1, c2, c3]: [u8; 3]) {
    let packed = 1600 * u16::from(c1) + 40 * u16::from(c2) + u16::from(c3) + 1;
    for byte in packed.to_be_bytes() {
        ctx.push(byte);
    }
}

fn write_triplets<T: EncodingContext>(ctx: &mut T, vals: &[u8]) {
    for triplet in vals.chunks_exact(3) {
        push_triplet(ctx, [triplet[0], triplet[1], triplet[2]]);
    }
}

/// Append the values of `ch` to `buf`, returns how many there were.
fn push_values(buf: &mut Vec<u8>, ch: u8, table: ValueTable) -> usize {
    let before = buf.len();
    if ch >= 128 {
        buf.extend_from_slice(&[SHIFT2, UPPER_SHIFT]);
    }
    buf.extend_from_slice(&table(ch & 0x7F));
    buf.len() - before
}

/// Undo the last character, the symbol is resolved again afterwards.
fn backtrack<T: EncodingContext>(ctx: &mut T, buf: &mut Vec<u8>, sizes: &mut Vec<usize>) {
    let size = sizes.pop().unwrap_or(0);
    buf.truncate(buf.len() - size);
    ctx.backup(1);
    ctx.reset_symbol_size();
    trace!("backtracked one character, {} values left", buf.len());
}

fn handle_end<T: EncodingContext>(ctx: &mut T, mut buf: Vec<u8>) -> Result<(), DataEncodingError> {
    let available = ctx.symbol_size_left(buf.len() / 3 * 2)?;
    match buf.len() % 3 {
        2 => {
            buf.push(SHIFT1);
            write_triplets(ctx, &buf);
            if ctx.has_more_characters() {
                ctx.push(UNLATCH);
            }
        }
        // the last character goes into the single free codeword as ASCII
        1 if available == 1 => {
            write_triplets(ctx, &buf);
            if ctx.has_more_characters() {
                ctx.push(UNLATCH);
            }
            ctx.backup(1);
        }
        0 => {
            write_triplets(ctx, &buf);
            if available > 0 || ctx.has_more_characters() {
                ctx.push(UNLATCH);
            }
        }
        _ => panic!("unexpected C40 end of data state, this is a bug"),
    }
    ctx.set_mode(EncodationType::Ascii);
    Ok(())
}

/// Encode with C40 or Text, depending on `table`.
///
/// Values are collected for the whole run and written at the end,
/// since the end of data rules may take back characters.
pub(super) fn encode_generic<T: EncodingContext>(
    ctx: &mut T,
    table: ValueTable,
) -> Result<(), DataEncodingError> {
    let mode = ctx.mode();
    let mut buf = Vec::new();
    let mut sizes = Vec::new();
    while let Some(ch) = ctx.eat() {
        sizes.push(push_values(&mut buf, ch, table));
        let available = ctx.symbol_size_left(buf.len() / 3 * 2)?;

        if !ctx.has_more_characters() {
            // a final pair is padded with a shift, but only into exactly two free codewords
            if buf.len() % 3 == 2 && available != 2 {
                backtrack(ctx, &mut buf, &mut sizes);
            }
            // a single value may only remain as a one-value character for the last codeword
            while buf.len() % 3 == 1 && (sizes.last().cloned().unwrap_or(0) > 1 || available != 1) {
                backtrack(ctx, &mut buf, &mut sizes);
            }
            break;
        }

        if buf.len() % 3 == 0 && ctx.look_ahead() != mode {
            break;
        }
    }
    handle_end(ctx, buf)
}

pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), DataEncodingError> {
    encode_generic(ctx, c40_values)
}

#[cfg(test)]
fn vals(data: &[u8]) -> Vec<u8> {
    let mut vals = Vec::new();
    for ch in data.iter().cloned() {
        push_values(&mut vals, ch, c40_values);
    }
    vals
}

#[test]
fn test_value_sets() {
    let basic: Vec<u8> = (3..=39).collect();
    assert_eq!(vals(b" 0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ"), basic);

    let controls: Vec<u8> = (0..32).collect();
    let shift1: Vec<u8> = (0..32).flat_map(|v| [SHIFT1, v]).collect();
    assert_eq!(vals(&controls), shift1);

    let shift2: Vec<u8> = (0..27).flat_map(|v| [SHIFT2, v]).collect();
    assert_eq!(vals(b"!\"#$%&'()*+,-./:;<=>?@[\\]^_"), shift2);

    let shift3: Vec<u8> = (0..32).flat_map(|v| [SHIFT3, v]).collect();
    assert_eq!(vals(b"`abcdefghijklmnopqrstuvwxyz{|}~\x7f"), shift3);
}

#[test]
fn test_shift_upper() {
    // 0x80 is upper shift + shift 1 + 0, 0xa0 is upper shift + space
    assert_eq!(
        vals(b"\x80\xFF\xa0"),
        vec![1, 30, 0, 0, 1, 30, 2, 31, 1, 30, 3]
    );
}

#[test]
fn test_aim_triplet() {
    // A = 14, I = 22, M = 26: 1600 * 14 + 40 * 22 + 26 + 1 = 23307
    let mut ctx = super::tests::FakeContext::new(b"", 10);
    push_triplet(&mut ctx, [14, 22, 26]);
    assert_eq!(ctx.codewords, vec![91, 11]);
}
