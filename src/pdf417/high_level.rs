//! Conversion of the input into PDF417 data codewords.
//!
//! With [Compaction::Auto] the input is split into runs. A run of at least
//! 13 digits goes into numeric compaction, a run of at least five text
//! characters (digits included) into text compaction, and the rest into
//! byte compaction.
use alloc::vec::Vec;

use log::debug;

use super::text::{self, is_text, Submode};
use super::{byte, numeric, Compaction, Pdf417Error};
use crate::classify::consecutive_digit_count;

pub(super) const LATCH_TEXT: u16 = 900;
pub(super) const LATCH_BYTE: u16 = 901;
pub(super) const LATCH_NUMERIC: u16 = 902;
pub(super) const SHIFT_BYTE: u16 = 913;
/// Latch to byte compaction for a multiple of six bytes.
pub(super) const LATCH_BYTE_6: u16 = 924;

const MIN_NUMERIC_RUN: usize = 13;
const MIN_TEXT_RUN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    Byte,
    Numeric,
}

/// Length of the text run at the start of `rest`.
///
/// Digit runs shorter than the numeric threshold are part of the text run.
fn text_run(rest: &[u8]) -> usize {
    let mut idx = 0;
    while idx < rest.len() {
        let digits = consecutive_digit_count(&rest[idx..]);
        if digits >= MIN_NUMERIC_RUN {
            return idx;
        }
        if digits > 0 {
            idx += digits;
            continue;
        }
        if !is_text(rest[idx]) {
            break;
        }
        idx += 1;
    }
    idx
}

/// Length of the byte run at the start of `rest`.
///
/// The run ends where a numeric or a text run would start.
fn byte_run(rest: &[u8]) -> usize {
    for idx in 0..rest.len() {
        let tail = &rest[idx..];
        if consecutive_digit_count(tail) >= MIN_NUMERIC_RUN {
            return idx;
        }
        let text = tail.iter().take(MIN_TEXT_RUN).take_while(|ch| is_text(**ch)).count();
        if text >= MIN_TEXT_RUN {
            return idx;
        }
    }
    rest.len()
}

fn check_all(data: &[u8], valid: impl Fn(u8) -> bool) -> Result<(), Pdf417Error> {
    match data.iter().position(|ch| !valid(*ch)) {
        Some(position) => Err(Pdf417Error::UnencodableCharacter {
            position,
            character: char::from(data[position]),
        }),
        None => Ok(()),
    }
}

/// Encode the data into codewords, without the length descriptor.
///
/// Encoding starts in text compaction, Alpha submode. A forced compaction
/// mode fails on the first character it can not write.
pub fn encode_high_level(data: &[u8], compaction: Compaction) -> Result<Vec<u16>, Pdf417Error> {
    let mut out = Vec::with_capacity(data.len());
    match compaction {
        Compaction::Text => {
            check_all(data, is_text)?;
            text::encode(data, Submode::Alpha, &mut out);
        }
        Compaction::Byte => byte::encode(data, false, &mut out),
        Compaction::Numeric => {
            check_all(data, |ch| ch.is_ascii_digit())?;
            out.push(LATCH_NUMERIC);
            numeric::encode(data, &mut out);
        }
        Compaction::Auto => encode_auto(data, &mut out),
    }
    debug!(
        "{} bytes in {:?} compaction: {} codewords",
        data.len(),
        compaction,
        out.len()
    );
    Ok(out)
}

fn encode_auto(data: &[u8], out: &mut Vec<u16>) {
    let mut mode = Mode::Text;
    let mut submode = Submode::Alpha;
    let mut pos = 0;
    while pos < data.len() {
        let rest = &data[pos..];

        let digits = consecutive_digit_count(rest);
        if digits >= MIN_NUMERIC_RUN {
            out.push(LATCH_NUMERIC);
            mode = Mode::Numeric;
            submode = Submode::Alpha;
            numeric::encode(&rest[..digits], out);
            pos += digits;
            continue;
        }

        let text = text_run(rest);
        if text >= MIN_TEXT_RUN || (text > 0 && text == rest.len()) {
            if mode != Mode::Text {
                out.push(LATCH_TEXT);
                mode = Mode::Text;
                submode = Submode::Alpha;
            }
            submode = text::encode(&rest[..text], submode, out);
            pos += text;
            continue;
        }

        let bytes = byte_run(rest).max(1);
        if bytes == 1 && mode == Mode::Text {
            // a shift keeps text compaction and its submode
            byte::encode(&rest[..1], true, out);
        } else {
            byte::encode(&rest[..bytes], false, out);
            mode = Mode::Byte;
            submode = Submode::Alpha;
        }
        pos += bytes;
    }
}
