//! High-level data encodation using all six Data Matrix modes.
//!
//! The encoder starts in ASCII and asks the [look-ahead](look_ahead) at
//! every opportunity whether another mode would produce fewer codewords.
//! Every mode other than ASCII hands control back to ASCII when it stops,
//! a switch between two non-ASCII modes therefore always reads
//! "unlatch, latch".
use alloc::vec::Vec;

use flagset::FlagSet;
use log::debug;

use crate::symbol_size::{SymbolList, SymbolSize};

mod ascii;
mod base256;
mod c40;
mod edifact;
mod encodation_type;
mod look_ahead;
mod text;
mod x12;

#[cfg(test)]
mod tests;

pub use encodation_type::EncodationType;

pub(crate) const UNLATCH: u8 = 254;
const MACRO05: u8 = 236;
const MACRO06: u8 = 237;

const MACRO05_HEADER: &[u8] = b"[)>\x1E05\x1D";
const MACRO06_HEADER: &[u8] = b"[)>\x1E06\x1D";
const MACRO_TRAILER: &[u8] = b"\x1E\x04";

/// Errors of the Data Matrix data encodation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataEncodingError {
    /// A character outside of ISO 8859-1 was passed as text.
    #[error("character {character:?} at position {position} can not be encoded")]
    UnencodableCharacter { position: usize, character: char },
    /// No symbol in the list can hold the message.
    #[error(
        "message needs {needed} data codewords but the largest allowed symbol holds {available}, \
         shorten the message or allow larger symbol sizes"
    )]
    TooMuchData { needed: usize, available: usize },
    /// The list of allowed symbol sizes is empty.
    #[error("no symbol sizes to choose from")]
    SymbolListEmpty,
}

/// What a mode encoder sees of the encoder state.
pub(crate) trait EncodingContext {
    /// Ask the look-ahead which mode to continue with, starting from the current mode.
    fn look_ahead(&self) -> EncodationType;

    /// The mode currently encoding.
    fn mode(&self) -> EncodationType;

    /// Tell the main loop to continue in `mode` once the current encoder returns.
    fn set_mode(&mut self, mode: EncodationType);

    /// Resolve the symbol for `size_needed` codewords, returns its data capacity.
    ///
    /// The symbol only grows: if the current one is big enough it is kept,
    /// even if a smaller one would do.
    fn update_symbol_size(&mut self, size_needed: usize) -> Result<usize, DataEncodingError>;

    /// Forget the resolved symbol, the next update looks it up again.
    fn reset_symbol_size(&mut self);

    fn eat(&mut self) -> Option<u8>;

    fn backup(&mut self, steps: usize);

    fn rest(&self) -> &[u8];

    fn push(&mut self, ch: u8);

    /// Get the codewords written so far.
    fn codewords(&self) -> &[u8];

    /// Space left in the symbol once `extra_codewords` more are written.
    ///
    /// The symbol is resolved for the extra codewords first.
    fn symbol_size_left(&mut self, extra_codewords: usize) -> Result<usize, DataEncodingError> {
        let size_used = self.codewords().len() + extra_codewords;
        let capacity = self.update_symbol_size(size_used)?;
        Ok(capacity - size_used)
    }

    fn peek(&self, n: usize) -> Option<u8> {
        self.rest().get(n).cloned()
    }

    /// Number of characters yet to be encoded.
    fn characters_left(&self) -> usize {
        self.rest().len()
    }

    /// Are there more characters to process?
    fn has_more_characters(&self) -> bool {
        !self.rest().is_empty()
    }
}

pub(crate) struct GenericDataEncoder<'a> {
    input: &'a [u8],
    pos: usize,
    /// Input is encoded up to here, a macro trailer is not
    end: usize,
    encodation: EncodationType,
    new_mode: Option<EncodationType>,
    symbol_list: &'a SymbolList,
    symbol_size: Option<SymbolSize>,
    enabled: FlagSet<EncodationType>,
    use_macros: bool,
    codewords: Vec<u8>,
}

impl<'a> EncodingContext for GenericDataEncoder<'a> {
    fn look_ahead(&self) -> EncodationType {
        look_ahead::look_ahead(self.encodation, &self.input[self.pos..], self.enabled)
    }

    fn mode(&self) -> EncodationType {
        self.encodation
    }

    fn set_mode(&mut self, mode: EncodationType) {
        self.new_mode = Some(mode);
    }

    fn update_symbol_size(&mut self, size_needed: usize) -> Result<usize, DataEncodingError> {
        self.resolve_symbol(size_needed).map(|size| size.num_data_codewords())
    }

    fn reset_symbol_size(&mut self) {
        self.symbol_size = None;
    }

    fn eat(&mut self) -> Option<u8> {
        if self.pos < self.end {
            self.pos += 1;
            Some(self.input[self.pos - 1])
        } else {
            None
        }
    }

    fn backup(&mut self, steps: usize) {
        self.pos -= steps;
    }

    fn rest(&self) -> &[u8] {
        &self.input[self.pos..self.end]
    }

    fn push(&mut self, ch: u8) {
        self.codewords.push(ch);
    }

    fn codewords(&self) -> &[u8] {
        &self.codewords
    }
}

impl<'a> GenericDataEncoder<'a> {
    pub(crate) fn with_size(data: &'a [u8], symbol_list: &'a SymbolList) -> Self {
        Self {
            input: data,
            pos: 0,
            end: data.len(),
            encodation: EncodationType::Ascii,
            new_mode: None,
            symbol_list,
            symbol_size: None,
            enabled: EncodationType::all(),
            use_macros: true,
            codewords: Vec::new(),
        }
    }

    /// Restrict the modes the encoder may switch to. ASCII is always enabled.
    pub(crate) fn with_encodation_types(mut self, types: impl Into<FlagSet<EncodationType>>) -> Self {
        self.enabled = types.into() | EncodationType::Ascii;
        self
    }

    /// Recognize the Macro 05/06 header and trailer.
    pub(crate) fn with_macros(mut self, use_macros: bool) -> Self {
        self.use_macros = use_macros;
        self
    }

    fn resolve_symbol(&mut self, size_needed: usize) -> Result<SymbolSize, DataEncodingError> {
        match self.symbol_size {
            Some(size) if size.num_data_codewords() >= size_needed => Ok(size),
            _ => {
                let size = self
                    .symbol_list
                    .first_symbol_big_enough_for(size_needed)
                    .ok_or_else(|| DataEncodingError::TooMuchData {
                        needed: size_needed,
                        available: self.symbol_list.max_data_codewords(),
                    })?;
                self.symbol_size = Some(size);
                Ok(size)
            }
        }
    }

    /// Run the encodation, returns the padded data codewords and the symbol size.
    pub(crate) fn encode(mut self) -> Result<(Vec<u8>, SymbolSize), DataEncodingError> {
        if self.symbol_list.is_empty() {
            return Err(DataEncodingError::SymbolListEmpty);
        }
        self.write_macro_header();

        // two digits per codeword is the best any mode does, fail early otherwise
        let max = self.symbol_list.max_data_codewords();
        if self.characters_left() > 2 * max {
            return Err(DataEncodingError::TooMuchData {
                needed: (self.characters_left() + 1) / 2,
                available: max,
            });
        }
        self.codewords.reserve(max.min(self.characters_left() + 2));

        let mut no_progress_run = 0;
        while self.has_more_characters() {
            let pos = self.pos;
            let mode = self.encodation;
            mode.encode(&mut self)?;
            if let Some(mode) = self.new_mode.take() {
                if mode != self.encodation {
                    debug!("switching from {:?} to {:?} at position {}", self.encodation, mode, self.pos);
                }
                self.encodation = mode;
            }
            if self.pos == pos {
                // a latch followed by a full backtrack is fine once
                no_progress_run += 1;
                if no_progress_run > 2 {
                    panic!("no progress in encoder, this is a bug");
                }
            } else {
                no_progress_run = 0;
            }
        }

        debug_assert!(self.encodation.is_ascii(), "encoder did not return to ASCII, this is a bug");
        let len = self.codewords.len();
        let size = self.resolve_symbol(len)?;
        self.add_padding(size.num_data_codewords());
        debug!("encoded {} data codewords into {:?}", len, size);
        Ok((self.codewords, size))
    }

    fn write_macro_header(&mut self) {
        if !self.use_macros || !self.input.ends_with(MACRO_TRAILER) {
            return;
        }
        let (macro_cw, header) = if self.input.starts_with(MACRO05_HEADER) {
            (MACRO05, MACRO05_HEADER)
        } else if self.input.starts_with(MACRO06_HEADER) {
            (MACRO06, MACRO06_HEADER)
        } else {
            return;
        };
        debug!("macro header detected, writing {}", macro_cw);
        self.push(macro_cw);
        self.pos = header.len();
        self.end = self.input.len() - MACRO_TRAILER.len();
    }

    fn add_padding(&mut self, capacity: usize) {
        if self.codewords.len() < capacity {
            self.push(ascii::PAD);
        }
        while self.codewords.len() < capacity {
            let pos = self.codewords.len() + 1;
            self.push(randomize_253_state(pos));
        }
    }
}

/// Pseudo random padding value ("253 state randomizing").
///
/// `pos` is the 1-based position of the codeword in the data codewords.
fn randomize_253_state(pos: usize) -> u8 {
    let pseudo_random = ((149 * pos) % 253) + 1;
    let tmp = ascii::PAD as usize + pseudo_random;
    if tmp <= 254 {
        tmp as u8
    } else {
        (tmp - 254) as u8
    }
}

#[test]
fn test_randomize_253() {
    // the empty message in a 10x10 symbol is 129, 175, 70
    assert_eq!(randomize_253_state(2), 175);
    assert_eq!(randomize_253_state(3), 70);
    // wraps around above 254
    assert_eq!(randomize_253_state(6), 11);
}
