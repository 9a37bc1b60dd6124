use alloc::vec::Vec;

use flagset::FlagSet;
use pretty_assertions::assert_eq;

use super::{look_ahead, DataEncodingError, EncodationType, EncodingContext, GenericDataEncoder};
use crate::symbol_size::{SymbolList, SymbolSize};


/// Context with a single symbol of fixed capacity.
pub(super) struct FakeContext {
    data: Vec<u8>,
    pos: usize,
    capacity: usize,
    pub(super) codewords: Vec<u8>,
    pub(super) mode: EncodationType,
}

impl FakeContext {
    pub(super) fn new(data: &[u8], capacity: usize) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            capacity,
            codewords: Vec::new(),
            mode: EncodationType::Ascii,
        }
    }
}

impl EncodingContext for FakeContext {
    fn look_ahead(&self) -> EncodationType {
        look_ahead::look_ahead(self.mode, &self.data[self.pos..], EncodationType::all())
    }

    fn mode(&self) -> EncodationType {
        self.mode
    }

    fn set_mode(&mut self, mode: EncodationType) {
        self.mode = mode;
    }

    fn update_symbol_size(&mut self, size_needed: usize) -> Result<usize, DataEncodingError> {
        if size_needed > self.capacity {
            Err(DataEncodingError::TooMuchData {
                needed: size_needed,
                available: self.capacity,
            })
        } else {
            Ok(self.capacity)
        }
    }

    fn reset_symbol_size(&mut self) {}

    fn eat(&mut self) -> Option<u8> {
        let ch = self.data.get(self.pos).cloned();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn backup(&mut self, steps: usize) {
        self.pos -= steps;
    }

    fn rest(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    fn push(&mut self, ch: u8) {
        self.codewords.push(ch);
    }

    fn codewords(&self) -> &[u8] {
        &self.codewords
    }
}

fn enc(data: &[u8]) -> Vec<u8> {
    GenericDataEncoder::with_size(data, &SymbolList::default())
        .encode()
        .unwrap()
        .0
}

fn enc_in(data: &[u8], size: SymbolSize) -> Result<Vec<u8>, DataEncodingError> {
    let list = SymbolList::from(size);
    GenericDataEncoder::with_size(data, &list)
        .encode()
        .map(|(cw, _)| cw)
}

fn enc_with(data: &[u8], types: impl Into<FlagSet<EncodationType>>) -> Vec<u8> {
    GenericDataEncoder::with_size(data, &SymbolList::default())
        .with_encodation_types(types)
        .encode()
        .unwrap()
        .0
}

#[test]
fn test_empty() {
    assert_eq!(enc(b""), vec![129, 175, 70]);
}

#[test]
fn test_ascii_single() {
    assert_eq!(enc(b"A"), vec![66, 129, 70]);
    assert_eq!(enc(b"Hello"), vec![73, 102, 109, 109, 112]);
}

#[test]
fn test_ascii_upper_shift() {
    assert_eq!(enc(b"\xe9"), vec![235, 106, 129]);
}

/// Encode each input with all modes into the default symbol list.
fn check(cases: &[(&[u8], &[u8])]) {
    for (input, expected) in cases {
        assert_eq!(&enc(input)[..], *expected, "encoding {:?}", input);
    }
}

#[test]
fn test_ascii_cases() {
    let cases: &[(&[u8], &[u8])] = &[
        (b"123456", &[142, 164, 186]),
        (b"123456\xa3", &[142, 164, 186, 235, 36]),
        (
            b"30Q324343430794<OQQ",
            &[160, 82, 162, 173, 173, 173, 137, 224, 61, 80, 82, 82],
        ),
        (b" 23\xa3", &[33, 153, 235, 36, 129]),
    ];
    check(cases);
}

#[test]
fn test_c40_cases() {
    let cases: &[(&[u8], &[u8])] = &[
        (b"AIMAIMAIM", &[230, 91, 11, 91, 11, 91, 11, 254]),
        // B fits, but a lone value can not complete a triplet
        (b"AIMAIAB", &[230, 91, 11, 90, 255, 254, 67, 129]),
        // b takes two values, ASCII is shorter overall
        (b"AIMAIAb", &[66, 74, 78, 66, 74, 66, 99, 129]),
        // upper shift characters take four values
        (b"AIMAIMAIM\xcb", &[230, 91, 11, 91, 11, 91, 11, 254, 235, 76]),
        (b"AIMAIMAIM\xeb", &[230, 91, 11, 91, 11, 91, 11, 254, 235, 108]),
        (
            b"A1B2C3D4E5F6G7H8I9J0K1L2",
            &[230, 88, 88, 40, 8, 107, 147, 59, 67, 126, 206, 78, 126, 144, 121, 35, 47, 254],
        ),
        (b"ABCDEFGHIJKL", &[230, 89, 233, 109, 36, 128, 95, 147, 154, 254]),
        // the last character goes into the single remaining codeword
        (b"AIMAIMAIMA", &[230, 91, 11, 91, 11, 91, 11, 66]),
        (
            b"AIMAIMAIMAIMAIMAI",
            &[230, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 254, 66, 74, 129, 237],
        ),
        (
            b"AIMAIMAIMAIMAIMAIMAI",
            &[230, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 254, 66, 74],
        ),
    ];
    check(cases);
}

#[test]
fn test_c40_unlatch_before_padding() {
    assert_eq!(
        enc_in(b"AIMAIMAIMAIMAIMAIMAIM", SymbolSize::Rect12x26).unwrap(),
        vec![230, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 254]
    );
}

#[test]
fn test_c40_last_char_in_ascii_without_unlatch() {
    assert_eq!(
        enc_in(b"AIMAIMAIMAIMAIMAIMAIMA", SymbolSize::Rect12x26).unwrap(),
        vec![230, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 66]
    );
    assert_eq!(
        enc_in(b"AIMAIMAIMAIMAIMA", SymbolSize::Square16).unwrap(),
        vec![230, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 66]
    );
}

#[test]
fn test_c40_too_big() {
    assert_eq!(
        enc_in(b"AIMAIMAIMAI", SymbolSize::Square14),
        Err(DataEncodingError::TooMuchData {
            needed: 10,
            available: 8
        })
    );
}

#[test]
fn test_text_cases() {
    let cases: &[(&[u8], &[u8])] = &[
        (b"aimaimaim", &[239, 91, 11, 91, 11, 91, 11, 254]),
        (b"aimaimaim'", &[239, 91, 11, 91, 11, 91, 11, 254, 40, 129]),
        (b"aimaimaIm", &[239, 91, 11, 91, 11, 87, 218, 110]),
        (b"aimaimaimB", &[239, 91, 11, 91, 11, 91, 11, 254, 67, 129]),
        (
            b"aimaimaim{txt}\x04",
            &[239, 91, 11, 91, 11, 91, 11, 16, 218, 236, 107, 181, 69, 254, 129, 237],
        ),
        // the grave accent is in the shift 3 set
        (
            b"fiykmj*Rh2`,e6",
            &[239, 122, 87, 154, 40, 7, 171, 115, 207, 12, 130, 71, 155, 254, 129, 237],
        ),
    ];
    check(cases);
}

#[test]
fn test_x12_cases() {
    const PREFIX: [u8; 9] = [238, 89, 233, 14, 192, 100, 207, 44, 31];
    let tails: &[(&[u8], &[u8])] = &[
        (b"AB", &[67]),
        (b"ABC", &[254, 67, 68]),
        (b"ABCD", &[96, 82, 254]),
        (b"ABCDE", &[96, 82, 70]),
        (b"ABCDEF", &[96, 82, 254, 70, 71, 129, 237]),
    ];
    for (tail, expected_tail) in tails {
        let mut input = b"ABC>ABC123>".to_vec();
        input.extend_from_slice(tail);
        let mut expected = PREFIX.to_vec();
        expected.extend_from_slice(expected_tail);
        assert_eq!(enc(&input), expected);
    }
    let unlatch: &[(&[u8], &[u8])] = &[
        (b"*DTCP01", &[238, 9, 10, 104, 141, 254, 50, 129]),
        (b"*DTCP0", &[238, 9, 10, 104, 141]),
    ];
    check(unlatch);
}

#[test]
fn test_x12_exact_symbol() {
    assert_eq!(
        enc_in(b"ABC>ABC123>AB", SymbolSize::Rect8x32).unwrap(),
        vec![238, 89, 233, 14, 192, 100, 207, 44, 31, 67]
    );
}

#[test]
fn test_edifact_cases() {
    let cases: &[(&[u8], &[u8])] = &[
        (
            b".A.C1.3.DATA.123DATA.123DATA",
            &[
                240, 184, 27, 131, 198, 236, 238, 16, 21, 1, 187, 28, 179, 16, 21, 1, 187, 28,
                179, 16, 21, 1,
            ],
        ),
        (b".A.C1.3.X.X2..", &[240, 184, 27, 131, 198, 236, 238, 98, 230, 50, 47, 47]),
        (b".A.C1.3.X.X2.", &[240, 184, 27, 131, 198, 236, 238, 98, 230, 50, 47, 129]),
        (b".A.C1.3.X.X2", &[240, 184, 27, 131, 198, 236, 238, 98, 230, 50]),
        (b".A.C1.3.X.X", &[240, 184, 27, 131, 198, 236, 238, 98, 230, 31]),
        (b".A.C1.3.X.", &[240, 184, 27, 131, 198, 236, 238, 98, 231, 192]),
        (b".A.C1.3.X", &[240, 184, 27, 131, 198, 236, 238, 89]),
        // end of data right after a full segment
        (b"CREX-TAN:h", &[240, 13, 33, 88, 181, 64, 78, 124, 59, 105]),
        (b"CREX-TAN:hh", &[240, 13, 33, 88, 181, 64, 78, 124, 59, 105, 105, 129]),
        (b"CREX-TAN:hhh", &[240, 13, 33, 88, 181, 64, 78, 124, 59, 105, 105, 105]),
        // three codewords after the segments, one too many to skip the unlatch
        (b">1>.>>.>\xff", &[240, 251, 31, 174, 251, 235, 190, 124, 235, 128]),
    ];
    check(cases);
}

#[test]
fn test_edifact_end_before_high_bytes() {
    // ">1>." is one full segment, the rest needs two ASCII codewords per byte
    let cases: &[(&[u8], usize, &[u8])] = &[
        (b">1>.\xff", 1, &[124]),
        (b">1>.\xff", 2, &[]),
        (b">1>.\xff", 3, &[124]),
        (b">1>.\xff\xff", 1, &[124]),
        (b">1>.\xff\xff", 2, &[124]),
        (b">1>.\xff\xff", 3, &[124]),
    ];
    for (input, free, end) in cases {
        let mut ctx = FakeContext::new(input, 3 + free);
        ctx.mode = EncodationType::Edifact;
        super::edifact::encode(&mut ctx).unwrap();
        let mut expected = vec![251, 31, 174];
        expected.extend_from_slice(end);
        assert_eq!(ctx.codewords, expected, "{:?} with {} free", input, free);
        assert_eq!(ctx.rest(), &input[4..]);
        assert_eq!(ctx.mode, EncodationType::Ascii);
    }
}

#[test]
fn test_edifact_leaves_for_upper_shift() {
    let words = enc(b".XXX.XXX.XXX.XXX.XXX.XXX.\xFCXX.XXX.XXX.XXX.XXX.XXX.XXX");
    let mut expected = vec![240];
    for _ in 0..6 {
        expected.extend_from_slice(&[185, 134, 24]);
    }
    // a segment holding only the unlatch value, then \xFC in ASCII
    expected.extend_from_slice(&[124, 47, 235, 125, 240]);
    for _ in 0..6 {
        expected.extend_from_slice(&[97, 139, 152]);
    }
    expected.extend_from_slice(&[89, 89]);
    assert_eq!(words, expected);
}

#[test]
fn test_edifact_in_larger_symbol() {
    assert_eq!(
        enc_in(b".A.C1.3.X.X2..", SymbolSize::Square16).unwrap(),
        vec![240, 184, 27, 131, 198, 236, 238, 98, 230, 50, 47, 47]
    );
}

/// Eight high bytes, `len - 9` times 0xB7, then 0xBB.
fn binary_message(len: usize) -> Vec<u8> {
    let mut data = b"\xab\xe4\xf6\xfc\xe9\xe0\xe1-".to_vec();
    data.resize(len - 1, 0xB7);
    data.push(0xBB);
    data
}

#[test]
fn test_base256_cases() {
    let cases: &[(&[u8], &[u8])] = &[
        (b"\xab\xe4\xf6\xfc\xe9\xbb", &[231, 44, 108, 59, 226, 126, 1, 104]),
        (b"\xab\xe4\xf6\xfc\xe9\xe0\xbb", &[231, 51, 108, 59, 226, 126, 1, 141, 254, 129]),
        (b"\xab\xe4\xf6\xfc\xe9\xe0\xe1\xbb", &[231, 44, 108, 59, 226, 126, 1, 141, 36, 147]),
        (
            b"\xab\xe4\xf6\xfc\xe9\xbb 234",
            &[231, 51, 108, 59, 226, 126, 1, 104, 99, 153, 53, 129],
        ),
        (
            b"\xab\xe4\xf6\xfc\xe9\xbb 23\xa3 1234567890123456789",
            &[
                231, 55, 108, 59, 226, 126, 1, 104, 99, 10, 161, 167, 185, 142, 164, 186, 208,
                220, 142, 164, 186, 208, 58, 129, 59, 209, 104, 254, 150, 45,
            ],
        ),
    ];
    check(cases);
}

#[test]
fn test_base256_fills_symbol() {
    assert_eq!(
        enc(&binary_message(20)),
        vec![
            231, 44, 108, 59, 226, 126, 1, 141, 36, 5, 37, 187, 80, 230, 123, 17, 166, 60, 210,
            103, 253, 150
        ]
    );
    // one byte less leaves room for padding
    assert_eq!(
        enc(&binary_message(19)),
        vec![
            231, 63, 108, 59, 226, 126, 1, 141, 36, 5, 37, 187, 80, 230, 123, 17, 166, 60, 210,
            103, 1, 129
        ],
    );
}

#[test]
fn test_base256_two_byte_length() {
    for (len, start, end) in [
        (276, [231u8, 38, 219, 2, 208, 120, 20, 150, 35], [146u8, 40, 194, 129]),
        (277, [231, 38, 220, 2, 208, 120, 20, 150, 35], [146, 40, 190, 87]),
    ] {
        let words = enc(&binary_message(len));
        assert_eq!(&words[..start.len()], &start);
        assert_eq!(&words[words.len() - end.len()..], &end);
    }
}

#[test]
fn test_mode_changes() {
    let cases: &[(&[u8], &[u8])] = &[
        (
            b"AIMAIMAIMAIMaimaimaim",
            &[230, 91, 11, 91, 11, 91, 11, 254, 66, 74, 78, 239, 91, 11, 91, 11, 91, 11],
        ),
        (
            b"aimaimaimaim12345678",
            &[239, 91, 11, 91, 11, 91, 11, 91, 11, 254, 142, 164, 186, 208, 129, 237],
        ),
        // "ld" plus a shift 1 filler in the last triplet
        (
            b"Hello World!",
            &[73, 239, 116, 130, 175, 123, 148, 64, 158, 233, 254, 34],
        ),
    ];
    check(cases);
}

#[test]
fn test_macro_05() {
    assert_eq!(enc(b"[)>\x1E05\x1D\x1E\x04"), vec![236, 129, 70]);
    assert_eq!(
        enc(b"[)>\x1E05\x1D5555\x1C6666\x1E\x04"),
        vec![236, 185, 185, 29, 196, 196, 129, 56]
    );
}

#[test]
fn test_macro_06() {
    assert_eq!(enc(b"[)>\x1E06\x1DAB\x1E\x04"), vec![237, 66, 67]);
}

#[test]
fn test_macro_disabled() {
    let list = SymbolList::default();
    let (words, _) = GenericDataEncoder::with_size(b"[)>\x1E06\x1DAB\x1E\x04", &list)
        .with_macros(false)
        .encode()
        .unwrap();
    assert_ne!(words[0], 237);
    // header without trailer is plain data
    assert_ne!(enc(b"[)>\x1E06\x1DAB")[0], 237);
}

#[test]
fn test_only_ascii() {
    assert_eq!(
        enc_with(b"AIMAIMAIM", EncodationType::Ascii),
        vec![66, 74, 78, 66, 74, 78, 66, 74, 78, 129]
    );
}

#[test]
fn test_single_region_capacity() {
    let list = SymbolList::single_region_squares();
    let (words, size) = GenericDataEncoder::with_size(&[b'1'; 88], &list)
        .encode()
        .unwrap();
    assert_eq!(size, SymbolSize::Square26);
    assert_eq!(words.len(), 44);
    assert_eq!(&words[..3], &[141, 141, 141]);

    let mut data = vec![b'1'; 89];
    data.push(b'A');
    assert!(matches!(
        GenericDataEncoder::with_size(&data, &list).encode(),
        Err(DataEncodingError::TooMuchData { available: 44, .. })
    ));
}

#[test]
fn test_text_run_in_single_region() {
    let list = SymbolList::single_region_squares();
    let (words, _) = GenericDataEncoder::with_size(&[b'a'; 40], &list)
        .encode()
        .unwrap();
    let mut expected = vec![239];
    for _ in 0..13 {
        expected.extend_from_slice(&[89, 191]);
    }
    expected.extend_from_slice(&[254, 98, 129]);
    assert_eq!(words, expected);
}

#[test]
fn test_early_size_check() {
    let data = vec![b'1'; 2 * 1558 + 1];
    assert_eq!(
        GenericDataEncoder::with_size(&data, &SymbolList::default())
            .encode()
            .map(|(cw, _)| cw),
        Err(DataEncodingError::TooMuchData {
            needed: 1559,
            available: 1558
        })
    );
}

#[test]
fn test_empty_symbol_list() {
    let list = SymbolList::with_whitelist(core::iter::empty());
    assert!(matches!(
        GenericDataEncoder::with_size(b"A", &list).encode(),
        Err(DataEncodingError::SymbolListEmpty)
    ));
}

/// xorshift32, enough to spread inputs over the modes.
struct XorShift(u32);

impl XorShift {
    fn below(&mut self, n: usize) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0 as usize % n
    }
}

#[test]
fn test_round_trip() {
    let alphabets: [&[u8]; 9] = [
        b">1.",
        b">1.\xff",
        b".>1\xe4\xe4\xe4",
        b".A\xe4",
        b"AB1 >*\r",
        b"ab1 A",
        b"\xe4\xff.9",
        b"AIM.aim\x80 15",
        b"\x00\x1f~{|`_^",
    ];
    let mut rng = XorShift(0x2545_f491);
    for sizes in [SymbolList::default(), SymbolList::with_extended_rectangles()] {
        for alphabet in alphabets {
            for _ in 0..800 {
                let len = rng.below(31);
                let data: Vec<u8> = (0..len).map(|_| alphabet[rng.below(alphabet.len())]).collect();
                let (words, size) = GenericDataEncoder::with_size(&data, &sizes).encode().unwrap();
                assert_eq!(words.len(), size.num_data_codewords(), "{:?}", data);
                assert_eq!(decode::decode(&words), data, "{:?} as {:?}", data, words);
            }
        }
    }
}

#[test]
fn test_round_trip_macros() {
    for data in [
        &b"[)>\x1E05\x1D\x1E\x04"[..],
        b"[)>\x1E05\x1D>1>.>>.>\xff\x1E\x04",
        b"[)>\x1E06\x1DAIMAIMAIMA\x1E\x04",
    ] {
        let words = enc(data);
        assert_eq!(decode::decode(&words), data);
    }
}
