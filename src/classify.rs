//! Per-character predicates for the Data Matrix encodation modes.
//!
//! Every mode splits the 256 byte values into characters it can write
//! cheaply ("native"), bytes above 127 which need an upper shift, and
//! everything else. What "everything else" means depends on the mode:
//! C40 and Text reach those characters with a shift value, X12 and EDIFACT
//! can not encode them at all.
use alloc::vec::Vec;

use crate::encodation::EncodationType;

/// Cost class of a byte in one encodation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    Native,
    Extended,
    Other,
}

impl CharClass {
    pub(crate) fn of(mode: EncodationType, ch: u8) -> Self {
        let native = match mode {
            EncodationType::Ascii => ch.is_ascii_digit(),
            EncodationType::C40 => is_native_c40(ch),
            EncodationType::Text => is_native_text(ch),
            EncodationType::X12 => is_native_x12(ch),
            EncodationType::Edifact => is_native_edifact(ch),
            EncodationType::Base256 => true,
        };
        if native {
            Self::Native
        } else if ch >= 128 {
            Self::Extended
        } else {
            Self::Other
        }
    }
}

pub(crate) fn is_native_c40(ch: u8) -> bool {
    matches!(ch, b' ' | b'0'..=b'9' | b'A'..=b'Z')
}

pub(crate) fn is_native_text(ch: u8) -> bool {
    matches!(ch, b' ' | b'0'..=b'9' | b'a'..=b'z')
}

/// Segment terminator, separator and sub-element separator of ANSI X12.
pub(crate) fn is_x12_terminator(ch: u8) -> bool {
    matches!(ch, b'\r' | b'*' | b'>')
}

pub(crate) fn is_native_x12(ch: u8) -> bool {
    is_x12_terminator(ch) || matches!(ch, b' ' | b'0'..=b'9' | b'A'..=b'Z')
}

pub(crate) fn is_native_edifact(ch: u8) -> bool {
    matches!(ch, 32..=94)
}

/// Length of the run of ASCII digits at the start of `data`.
pub(crate) fn consecutive_digit_count(data: &[u8]) -> usize {
    data.iter().take_while(|ch| ch.is_ascii_digit()).count()
}

/// Re-encode `text` as ISO 8859-1, one byte per character.
///
/// Returns the position and the character of the first one above U+00FF.
pub(crate) fn to_latin1(text: &str) -> Result<Vec<u8>, (usize, char)> {
    text.chars()
        .enumerate()
        .map(|(position, ch)| u8::try_from(u32::from(ch)).map_err(|_| (position, ch)))
        .collect()
}

#[test]
fn test_latin1() {
    assert_eq!(to_latin1("Grüße"), Ok(b"Gr\xfc\xdfe".to_vec()));
    assert_eq!(to_latin1("a€b"), Err((1, '€')));
}

#[test]
fn test_digit_count() {
    assert_eq!(consecutive_digit_count(b"A123"), 0);
    assert_eq!(consecutive_digit_count(b"123456"), 6);
    assert_eq!(consecutive_digit_count(b"12x4"), 2);
    assert_eq!(consecutive_digit_count(b""), 0);
}

#[test]
fn test_classes() {
    use CharClass::*;
    assert_eq!(CharClass::of(EncodationType::Ascii, b'7'), Native);
    assert_eq!(CharClass::of(EncodationType::Ascii, b'a'), Other);
    assert_eq!(CharClass::of(EncodationType::C40, b'A'), Native);
    assert_eq!(CharClass::of(EncodationType::C40, b'a'), Other);
    assert_eq!(CharClass::of(EncodationType::Text, b'a'), Native);
    assert_eq!(CharClass::of(EncodationType::Text, b'A'), Other);
    assert_eq!(CharClass::of(EncodationType::X12, b'>'), Native);
    assert_eq!(CharClass::of(EncodationType::X12, b'.'), Other);
    assert_eq!(CharClass::of(EncodationType::Edifact, b'^'), Native);
    assert_eq!(CharClass::of(EncodationType::Edifact, b'a'), Other);
    assert_eq!(CharClass::of(EncodationType::Edifact, 0xfc), Extended);
    assert_eq!(CharClass::of(EncodationType::Base256, 0xfc), Native);
}
