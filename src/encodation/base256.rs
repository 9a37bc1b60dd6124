use alloc::vec::Vec;

use arrayvec::ArrayVec;

use super::{DataEncodingError, EncodationType, EncodingContext};

/// 255-state randomization of the codeword at 1-based position `pos`.
fn randomize(ch: u8, pos: usize) -> u8 {
    let offset = (149 * pos % 255 + 1) as u8;
    ch.wrapping_add(offset)
}

/// The length field, 0 means "until the end of the symbol".
fn length_field<T: EncodingContext>(
    ctx: &mut T,
    count: usize,
) -> Result<ArrayVec<u8, 2>, DataEncodingError> {
    let space_left = ctx.symbol_size_left(count + 1)?;
    let mut field = ArrayVec::new();
    if !ctx.has_more_characters() && space_left == 0 {
        field.push(0);
    } else if count <= 249 {
        field.push(count as u8);
    } else if count <= 1555 {
        field.push((count / 250 + 249) as u8);
        field.push((count % 250) as u8);
    } else {
        let written = ctx.codewords().len();
        return Err(DataEncodingError::TooMuchData {
            needed: written + count + 2,
            available: written + count + 1 + space_left,
        });
    }
    Ok(field)
}

pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), DataEncodingError> {
    let mut data = Vec::new();
    while let Some(ch) = ctx.eat() {
        data.push(ch);
        if ctx.look_ahead() != EncodationType::Base256 {
            break;
        }
    }
    let field = length_field(ctx, data.len())?;
    for ch in field.iter().chain(data.iter()).cloned() {
        let pos = ctx.codewords().len() + 1;
        ctx.push(randomize(ch, pos));
    }
    ctx.set_mode(EncodationType::Ascii);
    Ok(())
}

#[test]
fn test_randomize() {
    // first data byte 0xab after latch and length in position 3
    assert_eq!(randomize(0xab, 3), 108);
    // a zero length field in position 2
    assert_eq!(randomize(0, 2), 44);
    // wraps around
    assert_eq!(randomize(0xff, 1), 149);
}
