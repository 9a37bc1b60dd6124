use core::fmt::{Debug, Error, Formatter};

use flagset::FlagSet;
use log::trace;

use super::EncodationType;
use crate::classify::{is_native_x12, is_x12_terminator, CharClass};

type C = u32;

const DENUM: C = 12;

/// Fraction with a fixed denominator.
///
/// All per-character costs of the look-ahead are multiples of 1/12.
#[derive(Copy, Clone, PartialEq, Eq)]
struct Frac(C);

impl Debug for Frac {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        f.write_fmt(format_args!("{}", self.0 as f32 / DENUM as f32))
    }
}

impl Frac {
    #[inline]
    fn new(num: C, denum: C) -> Self {
        let mut me = Self(0);
        me.add_mut(num, denum);
        me
    }

    #[inline]
    fn add_mut(&mut self, num: C, denum: C) -> &mut Self {
        debug_assert!(denum > 0 && DENUM % denum == 0);
        self.0 += num * (DENUM / denum);
        self
    }

    #[inline]
    fn ceil_mut(&mut self) -> &mut Self {
        let rest = self.0 % DENUM;
        if rest != 0 {
            self.0 += DENUM - rest;
        }
        self
    }

    /// Smallest whole number of codewords not below this value.
    #[inline]
    fn whole(&self) -> C {
        (self.0 + DENUM - 1) / DENUM
    }
}

#[derive(Debug, Clone)]
struct Costs {
    costs: [Frac; 6],
    enabled: FlagSet<EncodationType>,
}

/// Whole codeword counts of all modes, a disabled mode is never a minimum.
struct Rounded {
    counts: [C; 6],
    min: C,
    min_count: usize,
}

impl Rounded {
    #[inline]
    fn get(&self, mode: EncodationType) -> C {
        self.counts[mode.index()]
    }

    #[inline]
    fn is_min(&self, mode: EncodationType) -> bool {
        self.get(mode) == self.min
    }

    #[inline]
    fn is_unique_min(&self, mode: EncodationType) -> bool {
        self.min_count == 1 && self.is_min(mode)
    }
}

impl Costs {
    fn new(mode: EncodationType, enabled: FlagSet<EncodationType>) -> Self {
        let mut costs = if mode.is_ascii() {
            [
                Frac::new(0, 1),
                Frac::new(1, 1),
                Frac::new(1, 1),
                Frac::new(1, 1),
                Frac::new(1, 1),
                Frac::new(5, 4),
            ]
        } else {
            [
                Frac::new(1, 1),
                Frac::new(2, 1),
                Frac::new(2, 1),
                Frac::new(2, 1),
                Frac::new(2, 1),
                Frac::new(9, 4),
            ]
        };
        costs[mode.index()] = Frac::new(0, 1);
        Self { costs, enabled }
    }

    #[inline]
    fn count(&mut self, ch: u8) {
        use CharClass::*;
        for mode in EncodationType::ALL {
            let cost = &mut self.costs[mode.index()];
            let class = CharClass::of(mode, ch);
            match mode {
                EncodationType::Ascii => match class {
                    Native => cost.add_mut(1, 2),
                    Extended => cost.ceil_mut().add_mut(2, 1),
                    Other => cost.ceil_mut().add_mut(1, 1),
                },
                EncodationType::C40 | EncodationType::Text => match class {
                    Native => cost.add_mut(2, 3),
                    Extended => cost.add_mut(8, 3),
                    Other => cost.add_mut(4, 3),
                },
                EncodationType::X12 => match class {
                    Native => cost.add_mut(2, 3),
                    Extended => cost.add_mut(13, 3),
                    Other => cost.add_mut(10, 3),
                },
                EncodationType::Edifact => match class {
                    Native => cost.add_mut(3, 4),
                    Extended => cost.add_mut(17, 4),
                    Other => cost.add_mut(13, 4),
                },
                // FNC1, Structured Append and friends would cost 4 here
                EncodationType::Base256 => cost.add_mut(1, 1),
            };
        }
    }

    fn round_up(&self) -> Rounded {
        let mut counts = [C::MAX; 6];
        for mode in EncodationType::ALL {
            if self.enabled.contains(mode) {
                counts[mode.index()] = self.costs[mode.index()].whole();
            }
        }
        let min = counts.iter().cloned().min().unwrap_or(0);
        let min_count = counts.iter().filter(|c| **c == min).count();
        Rounded {
            counts,
            min,
            min_count,
        }
    }
}

/// Is X12 preferable over C40 for the data following a tie?
fn x12_advantage(data: &[u8]) -> bool {
    for ch in data.iter().cloned() {
        if is_x12_terminator(ch) {
            return true;
        }
        if !is_native_x12(ch) {
            return false;
        }
    }
    false
}

/// Decide which mode to continue with, the current mode being `encodation`.
///
/// `data` are the characters starting at the next one to encode.
pub(super) fn look_ahead(
    encodation: EncodationType,
    data: &[u8],
    enabled: FlagSet<EncodationType>,
) -> EncodationType {
    let mode = look_ahead_inner(encodation, data, enabled);
    trace!("look-ahead in {:?}: {:?}", encodation, mode);
    mode
}

fn look_ahead_inner(
    encodation: EncodationType,
    data: &[u8],
    enabled: FlagSet<EncodationType>,
) -> EncodationType {
    use EncodationType::*;

    if data.is_empty() {
        return encodation;
    }
    let mut costs = Costs::new(encodation, enabled);

    for (processed, ch) in data.iter().cloned().enumerate().map(|(i, ch)| (i + 1, ch)) {
        costs.count(ch);

        if processed < 4 {
            continue;
        }
        let r = costs.round_up();
        let ascii = r.get(Ascii);
        // is ASCII a strict global minimum?
        if EncodationType::ALL[1..].iter().all(|m| ascii < r.get(*m)) {
            return Ascii;
        }
        if enabled.contains(Base256) {
            let other_min = [C40, Text, X12, Edifact].iter().any(|m| r.is_min(*m));
            if r.get(Base256) < ascii || !other_min {
                return Base256;
            }
        }
        for mode in [Edifact, Text, X12] {
            if r.is_unique_min(mode) {
                return mode;
            }
        }
        if enabled.contains(C40) {
            let c40 = r.get(C40);
            if [Ascii, Base256, Edifact, Text]
                .iter()
                .all(|m| c40 + 1 < r.get(*m))
            {
                if c40 < r.get(X12) {
                    return C40;
                }
                if c40 == r.get(X12) {
                    // starts one past the current character, as barcode4j and ZXing do
                    let after = data.get(processed + 1..).unwrap_or(&[]);
                    return if x12_advantage(after) { X12 } else { C40 };
                }
            }
        }
    }

    let r = costs.round_up();
    if r.is_min(Ascii) {
        return Ascii;
    }
    for mode in [Base256, Edifact, Text, X12] {
        if r.is_unique_min(mode) {
            return mode;
        }
    }
    if enabled.contains(C40) {
        C40
    } else {
        Ascii
    }
}

#[cfg(test)]
fn look(mode: EncodationType, data: &[u8]) -> EncodationType {
    look_ahead(mode, data, EncodationType::all())
}

#[test]
fn test_frac_init() {
    assert_eq!(Frac::new(0, 1).0, 0);
    assert_eq!(Frac::new(1, 2).0, 6);
    assert_eq!(Frac::new(1, 1).0, 12);
}

#[test]
fn test_frac_add_mut() {
    assert_eq!(Frac::new(1, 2).add_mut(3, 4).0, 15);
}

#[test]
fn test_frac_ceil() {
    assert_eq!(Frac::new(1, 2).ceil_mut().0, 12);
    assert_eq!(Frac::new(12, 1).ceil_mut().0, 12 * 12);
    assert_eq!(Frac::new(0, 1).ceil_mut().0, 0);
    assert_eq!(Frac::new(8, 3).whole(), 3);
    assert_eq!(Frac::new(2, 1).whole(), 2);
}

#[test]
fn test_empty_keeps_mode() {
    assert_eq!(look(EncodationType::Text, b""), EncodationType::Text);
}

#[test]
fn test_edifact_switch1() {
    assert_eq!(
        look(EncodationType::Edifact, b".\xFCXX.XXX.XXX.XXX.XXX.XXX.XXX"),
        EncodationType::Ascii,
    );
    assert_eq!(
        look(EncodationType::Ascii, b".\xfcXX.XXX.XXX.XXX.XXX.XXX.XXX"),
        EncodationType::Ascii,
    );
}

#[test]
fn test_c40_to_text() {
    assert_eq!(look(EncodationType::C40, b"AIMaimaimaim"), EncodationType::Text);
}

#[test]
fn test_from_ascii() {
    use EncodationType::*;
    assert_eq!(look(Ascii, b"ABC>ABC123>AB"), X12);
    assert_eq!(look(Ascii, b"aimaimaim"), Text);
    assert_eq!(look(Ascii, b"\xab\xe4\xf6\xfc\xe9\xbb"), Base256);
    assert_eq!(look(Ascii, b".A.C1.3.X"), Edifact);
    assert_eq!(look(Ascii, b"123456"), Ascii);
    assert_eq!(look(Ascii, b"AIMAIMAIM"), C40);
}

#[test]
fn test_disabled_never_wins() {
    use EncodationType::*;
    let no_text = EncodationType::all() - Text;
    assert_ne!(look_ahead(Ascii, b"aimaimaim", no_text), Text);
    let ascii_only: FlagSet<EncodationType> = Ascii.into();
    for data in [&b"AIMAIMAIM"[..], b"aimaimaim", b".A.C1.3.X", b"\xab\xe4\xf6\xfc\xe9\xbb"] {
        assert_eq!(look_ahead(Ascii, data, ascii_only), Ascii);
    }
}
