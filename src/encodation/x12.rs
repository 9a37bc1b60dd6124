use arrayvec::ArrayVec;

use super::{c40, DataEncodingError, EncodationType, EncodingContext, UNLATCH};
use crate::classify::is_native_x12;

fn enc(ch: u8) -> u8 {
    match ch {
        b'\r' => 0,
        b'*' => 1,
        b'>' => 2,
        b' ' => 3,
        ch @ b'0'..=b'9' => ch - b'0' + 4,
        ch @ b'A'..=b'Z' => ch - b'A' + 14,
        _ => panic!("not an X12 character, this is a bug"),
    }
}

/// Encode X12 triplets until the look-ahead or a foreign character ends the run.
///
/// An incomplete triplet is never written, its characters are given back to ASCII.
pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), DataEncodingError> {
    let mut buf = ArrayVec::<u8, 3>::new();
    while let Some(ch) = ctx.peek(0) {
        if !is_native_x12(ch) {
            break;
        }
        ctx.eat();
        buf.push(enc(ch));
        if buf.is_full() {
            c40::push_triplet(ctx, [buf[0], buf[1], buf[2]]);
            buf.clear();
            if ctx.look_ahead() != EncodationType::X12 {
                break;
            }
        }
    }

    let available = ctx.symbol_size_left(0)?;
    ctx.backup(buf.len());
    let remaining = ctx.characters_left();
    // a single character in a single free codeword is read as ASCII without unlatch
    if remaining > 1 || available > 1 || remaining != available {
        ctx.push(UNLATCH);
    }
    ctx.set_mode(EncodationType::Ascii);
    Ok(())
}

#[test]
fn test_values() {
    let vals: alloc::vec::Vec<u8> = b"\r*> 09AZ".iter().cloned().map(enc).collect();
    assert_eq!(vals, vec![0, 1, 2, 3, 4, 13, 14, 39]);
}
