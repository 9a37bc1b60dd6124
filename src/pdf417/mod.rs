//! PDF417 encoding.
//!
//! The input is compacted into codewords in the range 0..929
//! ([encode_high_level]), prefixed by a length descriptor, padded to fill
//! the rows and followed by Reed-Solomon error codewords.
//!
//! ```rust
//! # use barcode2d::pdf417::{Pdf417, Pdf417Options};
//! let code = Pdf417::encode(b"Hello, World!", Pdf417Options::default().columns(3)).unwrap();
//! for (left, data, right) in code.rows_iter() {
//!     // look up the bar patterns of the codewords
//! }
//! ```
use alloc::vec::Vec;

use log::debug;

mod byte;
mod dimensions;
mod ecc;
mod high_level;
mod numeric;
mod render;
mod text;

pub use high_level::encode_high_level;
pub use render::{Bar, PatternTable};

/// Padding codeword, same as the latch to text compaction.
const PAD: u16 = 900;

/// Errors of the PDF417 encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Pdf417Error {
    #[error("character {character:?} at position {position} can not be encoded")]
    UnencodableCharacter { position: usize, character: char },
    #[error(
        "{needed} data codewords are too many for an automatic error correction level \
         (at most {available}), reduce the message"
    )]
    TooMuchData { needed: usize, available: usize },
    #[error(
        "symbol would need {rows} rows (at most 90), increase the number of columns \
         or lower the error correction level"
    )]
    TooManyRows { rows: usize },
    #[error(
        "symbol would have {rows} rows (at least 3), decrease the number of columns \
         or raise the error correction level"
    )]
    TooFewRows { rows: usize },
    #[error("{0} columns requested, PDF417 has 1 to 30")]
    InvalidColumns(usize),
    #[error("error correction level {0} requested, PDF417 has 0 to 8")]
    InvalidLevel(u8),
    #[error(
        "symbol would hold {needed} codewords (at most 928), reduce the message, \
         change the columns or lower the error correction level"
    )]
    TooManyCodewords { needed: usize },
}

/// Compaction mode of the whole message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compaction {
    /// Switch between the modes depending on the input
    #[default]
    Auto,
    /// Text compaction only, for TAB, LF, CR and printable ASCII
    Text,
    /// Byte compaction only
    Byte,
    /// Numeric compaction only, for digits
    Numeric,
}

/// Error correction level, level `l` adds `2^(l+1)` error codewords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorLevel {
    /// Pick the recommended level for the amount of data
    #[default]
    Auto,
    /// A level from 0 to 8
    Level(u8),
}

/// Settings for [Pdf417::encode].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pdf417Options {
    columns: usize,
    level: ErrorLevel,
    compaction: Compaction,
}

impl Default for Pdf417Options {
    fn default() -> Self {
        Self {
            columns: 4,
            level: ErrorLevel::Auto,
            compaction: Compaction::Auto,
        }
    }
}

impl Pdf417Options {
    /// Number of data columns, 1 to 30. The row count follows from it.
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn level(mut self, level: ErrorLevel) -> Self {
        self.level = level;
        self
    }

    pub fn compaction(mut self, compaction: Compaction) -> Self {
        self.compaction = compaction;
        self
    }
}

/// An encoded PDF417 symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdf417 {
    codewords: Vec<u16>,
    num_data: usize,
    rows: usize,
    columns: usize,
    level: u8,
}

impl Pdf417 {
    pub fn encode(data: &[u8], options: Pdf417Options) -> Result<Self, Pdf417Error> {
        let high_level = encode_high_level(data, options.compaction)?;
        let level = dimensions::resolve_level(options.level, high_level.len())?;
        let ecc_len = dimensions::ecc_count(level);
        let rows = dimensions::rows(high_level.len(), ecc_len, options.columns)?;
        debug!(
            "pdf417 with {} rows and {} columns, error correction level {}",
            rows, options.columns, level
        );

        // the length descriptor counts itself, the data and the padding
        let num_data = rows * options.columns - ecc_len;
        let mut codewords = Vec::with_capacity(rows * options.columns);
        codewords.push(num_data as u16);
        codewords.extend_from_slice(&high_level);
        codewords.resize(num_data, PAD);
        let ecc = ecc::error_codewords(&codewords, level);
        codewords.extend_from_slice(&ecc);

        Ok(Self {
            codewords,
            num_data,
            rows,
            columns: options.columns,
            level,
        })
    }

    /// Encode a string, characters are converted to ISO 8859-1 first.
    pub fn encode_str(text: &str, options: Pdf417Options) -> Result<Self, Pdf417Error> {
        let data = crate::classify::to_latin1(text).map_err(|(position, character)| {
            Pdf417Error::UnencodableCharacter {
                position,
                character,
            }
        })?;
        Self::encode(&data, options)
    }

    /// Length descriptor, data and padding codewords.
    pub fn data_codewords(&self) -> &[u16] {
        &self.codewords[..self.num_data]
    }

    pub fn error_codewords(&self) -> &[u16] {
        &self.codewords[self.num_data..]
    }

    /// All codewords in the order they are written into the rows.
    pub fn codewords(&self) -> &[u16] {
        &self.codewords
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of data columns, row indicators not included.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The error correction level in use.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Iterate over the rows as `(left row indicator, data codewords, right row indicator)`.
    pub fn rows_iter(&self) -> impl Iterator<Item = (u16, &[u16], u16)> + '_ {
        self.codewords
            .chunks(self.columns)
            .enumerate()
            .map(move |(row, data)| {
                let (left, right) =
                    render::row_indicators(row, self.rows, self.columns, self.level);
                (left, data, right)
            })
    }

    /// Lay out the symbol as bars, using `table` for the codeword patterns.
    ///
    /// Each row is start pattern, left row indicator, data, right row
    /// indicator and stop pattern. A quiet zone is not included.
    pub fn bars<T: PatternTable + ?Sized>(&self, table: &T) -> Vec<Bar> {
        render::bars(self, table)
    }
}
