use flagset::{flags, FlagSet};

use super::{ascii, base256, c40, edifact, text, x12, DataEncodingError, EncodingContext};

flags! {
    /// Encodation modes of Data Matrix.
    ///
    /// A symbol may switch between them at any point. The encoder only uses
    /// the ones enabled in a `FlagSet<EncodationType>`.
    pub enum EncodationType: u8 {
        Ascii   = 0b000001,
        C40     = 0b000010,
        Text    = 0b000100,
        X12     = 0b001000,
        Edifact = 0b010000,
        Base256 = 0b100000,
    }
}

impl EncodationType {
    /// All encodation types, in look-ahead order.
    pub(crate) const ALL: [Self; 6] = [
        Self::Ascii,
        Self::C40,
        Self::Text,
        Self::X12,
        Self::Edifact,
        Self::Base256,
    ];

    /// Position in [`ALL`](Self::ALL).
    pub fn index(&self) -> usize {
        match self {
            Self::Ascii => 0,
            Self::C40 => 1,
            Self::Text => 2,
            Self::X12 => 3,
            Self::Edifact => 4,
            Self::Base256 => 5,
        }
    }

    /// Flag set with every mode enabled.
    pub fn all() -> FlagSet<Self> {
        FlagSet::full()
    }

    pub(super) fn encode<T: EncodingContext>(self, ctx: &mut T) -> Result<(), DataEncodingError> {
        match self {
            Self::Ascii => ascii::encode(ctx),
            Self::C40 => c40::encode(ctx),
            Self::Text => text::encode(ctx),
            Self::X12 => x12::encode(ctx),
            Self::Edifact => edifact::encode(ctx),
            Self::Base256 => base256::encode(ctx),
        }
    }

    pub(crate) fn is_ascii(&self) -> bool {
        matches!(self, EncodationType::Ascii)
    }

    /// Codeword written in ASCII mode to enter this mode.
    pub(super) fn latch_from_ascii(&self) -> u8 {
        match self {
            Self::Ascii => panic!("can not switch from ascii to ascii, this is a bug"),
            Self::C40 => ascii::LATCH_C40,
            Self::Text => ascii::LATCH_TEXT,
            Self::X12 => ascii::LATCH_X12,
            Self::Edifact => ascii::LATCH_EDIFACT,
            Self::Base256 => ascii::LATCH_BASE256,
        }
    }
}

#[test]
fn test_index_matches_order() {
    for (i, mode) in EncodationType::ALL.iter().enumerate() {
        assert_eq!(mode.index(), i);
    }
}
