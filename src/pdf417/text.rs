//! Text compaction.
//!
//! Two values of 0..30 are packed into one codeword. The values refer to
//! one of four tables, the submodes, with some values reserved for switching
//! between them.
use alloc::vec::Vec;

use log::trace;

/// Table a text value is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Submode {
    Alpha,
    Lower,
    Mixed,
    Punctuation,
}

const MIXED: &[u8; 25] = b"0123456789&\r\t,:#-.$/+%*=^";
const PUNCTUATION: &[u8; 29] = b";<>@[\\]_`~!\r\t,:\n-.$/\"|*()?{}'";

const LATCH_PUNCTUATION: u8 = 25;
const SPACE: u8 = 26;
/// Latch to Lower, in Lower a shift to Alpha.
const LATCH_LOWER: u8 = 27;
/// Latch to Mixed, in Mixed the latch to Alpha.
const LATCH_MIXED: u8 = 28;
/// Shift to Punctuation, in Punctuation the latch to Alpha.
const SHIFT_PUNCTUATION: u8 = 29;

/// Characters text compaction can write.
pub(super) fn is_text(ch: u8) -> bool {
    matches!(ch, b'\t' | b'\n' | b'\r' | 32..=126)
}

fn is_alpha(ch: u8) -> bool {
    ch == b' ' || ch.is_ascii_uppercase()
}

fn is_lower(ch: u8) -> bool {
    ch == b' ' || ch.is_ascii_lowercase()
}

fn mixed_value(ch: u8) -> Option<u8> {
    if ch == b' ' {
        return Some(SPACE);
    }
    MIXED.iter().position(|c| *c == ch).map(|p| p as u8)
}

fn punctuation_value(ch: u8) -> Option<u8> {
    PUNCTUATION.iter().position(|c| *c == ch).map(|p| p as u8)
}

fn letter_value(ch: u8, first: u8) -> u8 {
    if ch == b' ' {
        SPACE
    } else {
        ch - first
    }
}

fn shifted_punctuation(vals: &mut Vec<u8>, ch: u8) {
    match punctuation_value(ch) {
        Some(v) => {
            vals.push(SHIFT_PUNCTUATION);
            vals.push(v);
        }
        None => panic!("{:?} is not a text character, this is a bug", ch as char),
    }
}

/// Encode `data` starting in `submode`, returns the submode at the end.
///
/// All characters must satisfy [is_text]. An odd number of values is
/// completed with a punctuation shift, in Punctuation this returns to Alpha.
pub(super) fn encode(data: &[u8], mut submode: Submode, out: &mut Vec<u16>) -> Submode {
    let mut vals = Vec::with_capacity(data.len() + data.len() / 2);
    let mut idx = 0;
    while let Some(ch) = data.get(idx).cloned() {
        // every branch either writes the character or switches the submode
        match submode {
            Submode::Alpha => {
                if is_alpha(ch) {
                    vals.push(letter_value(ch, b'A'));
                } else if is_lower(ch) {
                    vals.push(LATCH_LOWER);
                    submode = Submode::Lower;
                    continue;
                } else if mixed_value(ch).is_some() {
                    vals.push(LATCH_MIXED);
                    submode = Submode::Mixed;
                    continue;
                } else {
                    shifted_punctuation(&mut vals, ch);
                }
            }
            Submode::Lower => {
                if is_lower(ch) {
                    vals.push(letter_value(ch, b'a'));
                } else if is_alpha(ch) {
                    vals.push(LATCH_LOWER);
                    vals.push(ch - b'A');
                } else if mixed_value(ch).is_some() {
                    vals.push(LATCH_MIXED);
                    submode = Submode::Mixed;
                    continue;
                } else {
                    shifted_punctuation(&mut vals, ch);
                }
            }
            Submode::Mixed => {
                if let Some(v) = mixed_value(ch) {
                    vals.push(v);
                } else if is_alpha(ch) {
                    vals.push(LATCH_MIXED);
                    submode = Submode::Alpha;
                    continue;
                } else if is_lower(ch) {
                    vals.push(LATCH_LOWER);
                    submode = Submode::Lower;
                    continue;
                } else if data.get(idx + 1).and_then(|c| punctuation_value(*c)).is_some() {
                    vals.push(LATCH_PUNCTUATION);
                    submode = Submode::Punctuation;
                    continue;
                } else {
                    shifted_punctuation(&mut vals, ch);
                }
            }
            Submode::Punctuation => match punctuation_value(ch) {
                Some(v) => vals.push(v),
                None => {
                    vals.push(SHIFT_PUNCTUATION);
                    submode = Submode::Alpha;
                    continue;
                }
            },
        }
        idx += 1;
    }

    if vals.len() % 2 == 1 {
        vals.push(SHIFT_PUNCTUATION);
        if submode == Submode::Punctuation {
            submode = Submode::Alpha;
        }
    }
    out.extend(
        vals.chunks_exact(2)
            .map(|pair| pair[0] as u16 * 30 + pair[1] as u16),
    );
    trace!("text run of {} characters ends in {:?}", data.len(), submode);
    submode
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use pretty_assertions::assert_eq;

    use super::{encode, is_text, Submode};

    fn enc(data: &[u8]) -> (Vec<u16>, Submode) {
        let mut out = Vec::new();
        let submode = encode(data, Submode::Alpha, &mut out);
        (out, submode)
    }

    #[test]
    fn test_alpha_lower() {
        assert_eq!(
            enc(b"Test"),
            (vec![19 * 30 + 27, 4 * 30 + 18, 19 * 30 + 29], Submode::Lower)
        );
    }

    #[test]
    fn test_switch_submodes() {
        let (out, submode) = enc(b"abc1D234");
        assert_eq!(
            out,
            vec![27 * 30, 30 + 2, 28 * 30 + 1, 28 * 30 + 3, 28 * 30 + 2, 3 * 30 + 4]
        );
        assert_eq!(submode, Submode::Mixed);
    }

    #[test]
    fn test_digits_in_mixed() {
        let (out, _) = enc(b"encoded 0123456789 as digits");
        #[rustfmt::skip]
        let expected = vec![
            27 * 30 + 4, 13 * 30 + 2, 14 * 30 + 3, 4 * 30 + 3, 26 * 30 + 28, 1,
            2 * 30 + 3, 4 * 30 + 5, 6 * 30 + 7, 8 * 30 + 9, 26 * 30 + 27, 18,
            26 * 30 + 3, 8 * 30 + 6, 8 * 30 + 19, 18 * 30 + 29,
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn test_punctuation_latch_and_shift() {
        let (out, submode) = enc(b"This! Is a `quote (100%)`.");
        #[rustfmt::skip]
        let expected = vec![
            19 * 30 + 27, 7 * 30 + 8, 18 * 30 + 29, 10 * 30 + 26, 27 * 30 + 8,
            18 * 30 + 26, 26, 29 * 30 + 8, 16 * 30 + 20, 14 * 30 + 19, 4 * 30 + 26,
            29 * 30 + 23, 28 * 30 + 1, 0, 21 * 30 + 25, 24 * 30 + 8, 17 * 30 + 29,
        ];
        assert_eq!(out, expected);
        // the filler left Punctuation
        assert_eq!(submode, Submode::Alpha);
    }

    #[test]
    fn test_punctuation_from_lower() {
        // Lower has no latch to Punctuation, every character is shifted
        assert_eq!(enc(b"x;<>y").0, vec![833, 870, 871, 872, 749]);
    }

    #[test]
    fn test_continues_in_submode() {
        let mut out = Vec::new();
        let submode = encode(b"ab", Submode::Lower, &mut out);
        assert_eq!(out, vec![1]);
        assert_eq!(submode, Submode::Lower);
    }

    #[test]
    fn test_text_characters() {
        assert!(is_text(b'\t') && is_text(b'\n') && is_text(b'\r'));
        assert!(is_text(b' ') && is_text(b'~'));
        assert!(!is_text(0x1b) && !is_text(0x7f) && !is_text(0xe4));
    }
}
