//! Data Matrix (ECC 200) and PDF417 encoding.
//!
//! Both symbologies turn the input into a sequence of codewords using
//! several compaction modes, switching between them where it saves space.
//! For Data Matrix a look-ahead over the remaining input decides on every
//! switch, for PDF417 the lengths of digit and text runs do.
//!
//! ```rust
//! # use barcode2d::{DataMatrix, SymbolList};
//! let code = DataMatrix::encode(b"Hello, World!", SymbolList::default()).unwrap();
//! print!("{}", code.bitmap().unicode());
//! ```
//!
//! For PDF417 see [Pdf417](pdf417::Pdf417).
extern crate alloc;

mod classify;
mod encodation;
pub mod errorcode;
pub mod placement;
mod symbol_size;

pub mod data;
pub mod pdf417;

use alloc::vec::Vec;

use flagset::FlagSet;
use log::debug;

pub use encodation::{DataEncodingError, EncodationType};
use placement::Bitmap;
pub use symbol_size::{SymbolInfo, SymbolList, SymbolSize};

/// An encoded Data Matrix.
///
/// Holds the codewords and the symbol size, the module grid is computed
/// from them by [bitmap()](Self::bitmap).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMatrix {
    codewords: Vec<u8>,
    num_data: usize,
    size: SymbolSize,
}

impl DataMatrix {
    /// Encode the data with all encodation modes, using the smallest fitting
    /// symbol in `symbol_list`.
    pub fn encode(
        data: &[u8],
        symbol_list: impl Into<SymbolList>,
    ) -> Result<Self, DataEncodingError> {
        Self::builder().with_symbol_list(symbol_list).encode(data)
    }

    /// Encode a string, characters are converted to ISO 8859-1 first.
    ///
    /// Characters outside of ISO 8859-1 are rejected.
    pub fn encode_str(
        text: &str,
        symbol_list: impl Into<SymbolList>,
    ) -> Result<Self, DataEncodingError> {
        Self::builder().with_symbol_list(symbol_list).encode_str(text)
    }

    /// Get a builder to change the allowed modes and the macro handling.
    pub fn builder() -> DataMatrixBuilder {
        DataMatrixBuilder::default()
    }

    /// The data codewords, padding included.
    pub fn data_codewords(&self) -> &[u8] {
        &self.codewords[..self.num_data]
    }

    /// The error correction codewords, interleaved as they are placed.
    pub fn error_codewords(&self) -> &[u8] {
        &self.codewords[self.num_data..]
    }

    /// All codewords, data followed by error correction.
    pub fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    pub fn symbol_size(&self) -> SymbolSize {
        self.size
    }

    /// Place the codewords into the module grid.
    pub fn bitmap(&self) -> Bitmap {
        Bitmap::new(&self.codewords, self.size)
    }
}

/// Builder for a [DataMatrix] with non-default settings.
///
/// ```rust
/// # use barcode2d::{DataMatrix, EncodationType, SymbolList};
/// let code = DataMatrix::builder()
///     .with_symbol_list(SymbolList::default().enforce_square())
///     .with_encodation_types(EncodationType::C40 | EncodationType::Text)
///     .encode(b"only ASCII, C40 and Text")
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DataMatrixBuilder {
    symbol_list: SymbolList,
    enabled: FlagSet<EncodationType>,
    use_macros: bool,
}

impl Default for DataMatrixBuilder {
    fn default() -> Self {
        Self {
            symbol_list: SymbolList::default(),
            enabled: EncodationType::all(),
            use_macros: true,
        }
    }
}

impl DataMatrixBuilder {
    /// Set the symbol sizes to choose from.
    pub fn with_symbol_list(mut self, symbol_list: impl Into<SymbolList>) -> Self {
        self.symbol_list = symbol_list.into();
        self
    }

    /// Restrict the encodation modes, ASCII is always enabled.
    pub fn with_encodation_types(mut self, types: impl Into<FlagSet<EncodationType>>) -> Self {
        self.enabled = types.into() | EncodationType::Ascii;
        self
    }

    /// Write a Macro 05/06 header and trailer as a single codeword (default).
    pub fn with_macros(mut self, use_macros: bool) -> Self {
        self.use_macros = use_macros;
        self
    }

    pub fn encode(&self, data: &[u8]) -> Result<DataMatrix, DataEncodingError> {
        let (mut codewords, size) =
            data::encode_data(data, &self.symbol_list, self.enabled, self.use_macros)?;
        let num_data = codewords.len();
        let ecc = errorcode::encode_error(&codewords, size);
        codewords.extend_from_slice(&ecc);
        debug!(
            "data matrix {:?}: {} data and {} error codewords",
            size,
            num_data,
            ecc.len()
        );
        Ok(DataMatrix {
            codewords,
            num_data,
            size,
        })
    }

    pub fn encode_str(&self, text: &str) -> Result<DataMatrix, DataEncodingError> {
        let data = classify::to_latin1(text).map_err(|(position, character)| {
            DataEncodingError::UnencodableCharacter {
                position,
                character,
            }
        })?;
        self.encode(&data)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_iso16022_message() {
        let code = DataMatrix::encode(b"123456", SymbolSize::Square10).unwrap();
        assert_eq!(code.data_codewords(), &[142, 164, 186]);
        assert_eq!(code.error_codewords(), &[114, 25, 5, 88, 102]);
        assert_eq!(code.codewords().len(), 8);
        assert_eq!(code.symbol_size(), SymbolSize::Square10);
    }

    #[test]
    fn test_bitmap_size() {
        let code = DataMatrix::encode(b"Hello World!", SymbolList::default()).unwrap();
        let bitmap = code.bitmap();
        let info = code.symbol_size().info();
        assert_eq!((bitmap.width(), bitmap.height()), (info.width, info.height));
    }

    #[test]
    fn test_bitmap_in_every_size() {
        for size in enum_iterator::all::<SymbolSize>() {
            let code = DataMatrix::encode(b"A", size).unwrap();
            let bitmap = code.bitmap();
            let info = size.info();
            assert_eq!((bitmap.width(), bitmap.height()), (info.width, info.height), "{:?}", size);
        }
    }

    #[test]
    fn test_encode_str_latin1() {
        let a = DataMatrix::encode_str("Grüße", SymbolList::default()).unwrap();
        let b = DataMatrix::encode(b"Gr\xfc\xdfe", SymbolList::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_str_rejects_non_latin1() {
        assert_eq!(
            DataMatrix::encode_str("5 €", SymbolList::default()),
            Err(DataEncodingError::UnencodableCharacter {
                position: 2,
                character: '€'
            })
        );
    }

    #[test]
    fn test_builder_without_macros() {
        let data = b"[)>\x1E05\x1DAB\x1E\x04";
        let with = DataMatrix::encode(data, SymbolList::default()).unwrap();
        assert_eq!(with.data_codewords()[0], 236);
        let without = DataMatrix::builder().with_macros(false).encode(data).unwrap();
        assert_ne!(without.data_codewords()[0], 236);
    }

    #[test]
    fn test_too_much_data() {
        let err = DataMatrix::encode(&[b'a'; 100], SymbolList::single_region_squares());
        assert!(matches!(
            err,
            Err(DataEncodingError::TooMuchData { available: 44, .. })
        ));
    }
}
