use core::cmp::{Ordering, PartialOrd};
use core::fmt::Debug;
use core::iter::{Extend, FromIterator, IntoIterator};
use core::ops::RangeBounds;

use alloc::collections::BTreeSet;

#[cfg(test)]
use alloc::{vec, vec::Vec};

#[cfg(test)]
use enum_iterator::Sequence;

#[cfg(test)]
use pretty_assertions::assert_eq;

type SymbolCollection = BTreeSet<SymbolSize>;

/// Set of [symbol sizes](SymbolSize) the encoder is allowed to use.
///
/// The encoder resolves the capacity it needs against this list and picks
/// the smallest symbol which can hold the data. The list is kept sorted by
/// data capacity, ties are broken by the symbol's diagonal.
///
/// By [default](SymbolList::default) all standard sizes of ISO 16022 are
/// used, square and rectangular. The selection can be restricted to square or
/// rectangular symbols, to symbols within a size range, or given explicitly.
///
/// ```rust
/// # use barcode2d::{DataMatrix, SymbolList, SymbolSize};
/// // only squares up to 26x26 (a single data region)
/// let code = DataMatrix::encode(b"Hello, World!", SymbolList::single_region_squares());
///
/// // one specific size
/// let code = DataMatrix::encode(b"content to encode", SymbolSize::Square22);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolList {
    symbols: SymbolCollection,
}

impl SymbolList {
    /// Get standard symbol sizes extended by the DMRE rectangles of ISO 21471.
    ///
    /// Be aware that older readers might not recognize these.
    pub fn with_extended_rectangles() -> Self {
        Self::with_whitelist(SYMBOL_SIZES.iter().cloned())
    }

    /// The nine square sizes with a single data region, 10x10 up to 26x26.
    ///
    /// The largest of them holds 44 data codewords.
    pub fn single_region_squares() -> Self {
        Self::default()
            .enforce_square()
            .enforce_width_in(..=26)
    }

    /// Remove all non-square symbols from the current selection.
    pub fn enforce_square(mut self) -> Self {
        self.symbols.retain(|s| s.is_square());
        self
    }

    /// Remove all square symbols from the current selection.
    pub fn enforce_rectangular(mut self) -> Self {
        self.symbols.retain(|s| !s.is_square());
        self
    }

    /// Only keep symbols with width in the given range.
    pub fn enforce_width_in<R: RangeBounds<usize>>(mut self, bounds: R) -> Self {
        self.symbols.retain(|s| bounds.contains(&s.info().width));
        self
    }

    /// Only keep symbols with height in the given range.
    pub fn enforce_height_in<R: RangeBounds<usize>>(mut self, bounds: R) -> Self {
        self.symbols.retain(|s| bounds.contains(&s.info().height));
        self
    }

    /// Create a symbol list containing only the given symbols.
    ///
    /// The input does not need to be sorted.
    pub fn with_whitelist<I>(whitelist: I) -> Self
    where
        I: IntoIterator<Item = SymbolSize>,
    {
        Self::from_iter(whitelist)
    }

    pub fn iter(&self) -> impl Iterator<Item = SymbolSize> + '_ {
        self.symbols.iter().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Check if a symbol size is in this symbol list.
    pub fn contains(&self, symbol_size: &SymbolSize) -> bool {
        self.symbols.contains(symbol_size)
    }

    /// Data capacity of the largest symbol in the list.
    pub fn max_data_codewords(&self) -> usize {
        self.symbols
            .iter()
            .map(|s| s.num_data_codewords())
            .max()
            .unwrap_or(0)
    }

    /// Resolve the capacity: smallest symbol with room for `size_needed` data codewords.
    pub fn first_symbol_big_enough_for(&self, size_needed: usize) -> Option<SymbolSize> {
        self.symbols
            .iter()
            .find(|s| s.num_data_codewords() >= size_needed)
            .cloned()
    }
}

impl IntoIterator for SymbolList {
    type Item = SymbolSize;
    type IntoIter = <SymbolCollection as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.into_iter()
    }
}

impl FromIterator<SymbolSize> for SymbolList {
    fn from_iter<T: IntoIterator<Item = SymbolSize>>(iter: T) -> Self {
        Self {
            symbols: SymbolCollection::from_iter(iter),
        }
    }
}

impl Extend<SymbolSize> for SymbolList {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = SymbolSize>,
    {
        self.symbols.extend(iter);
    }
}

impl Default for SymbolList {
    fn default() -> Self {
        let symbols = SYMBOL_SIZES.iter().cloned().filter(|s| !s.is_dmre());
        Self::with_whitelist(symbols)
    }
}

impl From<SymbolSize> for SymbolList {
    fn from(size: SymbolSize) -> SymbolList {
        SymbolList::with_whitelist([size])
    }
}

impl<const N: usize> From<[SymbolSize; N]> for SymbolList {
    fn from(other: [SymbolSize; N]) -> SymbolList {
        SymbolList::with_whitelist(other)
    }
}

impl From<&SymbolList> for SymbolList {
    fn from(other: &SymbolList) -> SymbolList {
        other.clone()
    }
}

/// Capacity and layout of one symbol size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolInfo {
    /// Number of data codewords the symbol holds
    pub data_codewords: usize,
    /// Number of interleaved error correction blocks
    pub ecc_blocks: usize,
    /// Number of error correction codewords per block
    pub ecc_per_block: usize,
    /// Total width in modules, finder and alignment patterns included
    pub width: usize,
    /// Total height in modules, finder and alignment patterns included
    pub height: usize,
    /// Number of alignment patterns running horizontally through the symbol
    pub(crate) extra_horizontal_alignments: usize,
    /// Number of alignment patterns running vertically through the symbol
    pub(crate) extra_vertical_alignments: usize,
}

impl SymbolInfo {
    pub fn error_codewords(&self) -> usize {
        self.ecc_blocks * self.ecc_per_block
    }

    /// Width of the codeword area, i.e., without finder and alignment patterns.
    pub(crate) fn content_width(&self) -> usize {
        self.width - 2 - self.extra_vertical_alignments * 2
    }

    pub(crate) fn content_height(&self) -> usize {
        self.height - 2 - self.extra_horizontal_alignments * 2
    }

    /// Modules of the codeword area not covered by any codeword.
    ///
    /// Only a few square sizes have them, always four in the lower right corner.
    pub(crate) fn padding_modules(&self) -> usize {
        self.content_width() * self.content_height()
            - (self.data_codewords + self.error_codewords()) * 8
    }
}

/// The symbol sizes supported by Data Matrix.
///
/// The number behind a variant, e.g., [Square10](SymbolSize::Square10),
/// describes the number of modules (the tiny black squares) the symbol is
/// tall/wide.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(Sequence))]
pub enum SymbolSize {
    Square10,
    Square12,
    Square14,
    Square16,
    Square18,
    Square20,
    Square22,
    Square24,
    Square26,
    Square32,
    Square36,
    Square40,
    Square44,
    Square48,
    Square52,
    Square64,
    Square72,
    Square80,
    Square88,
    Square96,
    Square104,
    Square120,
    Square132,
    Square144,
    Rect8x18,
    Rect8x32,
    Rect12x26,
    Rect12x36,
    Rect16x36,
    Rect16x48,
    // rectangular extension of ISO 21471 (DMRE)
    Rect8x48,
    Rect8x64,
    Rect8x80,
    Rect8x96,
    Rect8x120,
    Rect8x144,
    Rect12x64,
    Rect12x88,
    Rect16x64,
    Rect20x36,
    Rect20x44,
    Rect20x64,
    Rect22x48,
    Rect24x48,
    Rect24x64,
    Rect26x40,
    Rect26x48,
    Rect26x64,
}

#[rustfmt::skip]
const SYMBOL_SIZES: &[SymbolSize] = &[
    SymbolSize::Square10, SymbolSize::Square12, SymbolSize::Rect8x18, SymbolSize::Square14,
    SymbolSize::Rect8x32, SymbolSize::Square16, SymbolSize::Rect12x26, SymbolSize::Square18,
    SymbolSize::Rect8x48, SymbolSize::Square20, SymbolSize::Rect12x36, SymbolSize::Rect8x64,
    SymbolSize::Square22, SymbolSize::Rect16x36, SymbolSize::Rect8x80, SymbolSize::Square24,
    SymbolSize::Rect8x96, SymbolSize::Rect12x64, SymbolSize::Square26, SymbolSize::Rect20x36,
    SymbolSize::Rect16x48, SymbolSize::Rect8x120, SymbolSize::Rect20x44, SymbolSize::Square32,
    SymbolSize::Rect16x64, SymbolSize::Rect8x144, SymbolSize::Rect12x88, SymbolSize::Rect26x40,
    SymbolSize::Rect22x48, SymbolSize::Rect24x48, SymbolSize::Rect20x64, SymbolSize::Square36,
    SymbolSize::Rect26x48, SymbolSize::Rect24x64, SymbolSize::Square40, SymbolSize::Rect26x64,
    SymbolSize::Square44, SymbolSize::Square48, SymbolSize::Square52, SymbolSize::Square64,
    SymbolSize::Square72, SymbolSize::Square80, SymbolSize::Square88, SymbolSize::Square96,
    SymbolSize::Square104, SymbolSize::Square120, SymbolSize::Square132, SymbolSize::Square144,
];

/// data codewords, ecc blocks, ecc per block, width, height,
/// horizontal alignments, vertical alignments
macro_rules! info {
    ($data:expr, $blocks:expr, $per_block:expr, $w:expr, $h:expr, $hor:expr, $ver:expr) => {
        SymbolInfo {
            data_codewords: $data,
            ecc_blocks: $blocks,
            ecc_per_block: $per_block,
            width: $w,
            height: $h,
            extra_horizontal_alignments: $hor,
            extra_vertical_alignments: $ver,
        }
    };
}

impl SymbolSize {
    /// Look up the capacity and layout of this size (ISO 16022 table 7, ISO 21471).
    #[rustfmt::skip]
    pub fn info(&self) -> SymbolInfo {
        match self {
            Self::Square10 => info!(3, 1, 5, 10, 10, 0, 0),
            Self::Square12 => info!(5, 1, 7, 12, 12, 0, 0),
            Self::Square14 => info!(8, 1, 10, 14, 14, 0, 0),
            Self::Square16 => info!(12, 1, 12, 16, 16, 0, 0),
            Self::Square18 => info!(18, 1, 14, 18, 18, 0, 0),
            Self::Square20 => info!(22, 1, 18, 20, 20, 0, 0),
            Self::Square22 => info!(30, 1, 20, 22, 22, 0, 0),
            Self::Square24 => info!(36, 1, 24, 24, 24, 0, 0),
            Self::Square26 => info!(44, 1, 28, 26, 26, 0, 0),
            Self::Square32 => info!(62, 1, 36, 32, 32, 1, 1),
            Self::Square36 => info!(86, 1, 42, 36, 36, 1, 1),
            Self::Square40 => info!(114, 1, 48, 40, 40, 1, 1),
            Self::Square44 => info!(144, 1, 56, 44, 44, 1, 1),
            Self::Square48 => info!(174, 1, 68, 48, 48, 1, 1),
            Self::Square52 => info!(204, 2, 42, 52, 52, 1, 1),
            Self::Square64 => info!(280, 2, 56, 64, 64, 3, 3),
            Self::Square72 => info!(368, 4, 36, 72, 72, 3, 3),
            Self::Square80 => info!(456, 4, 48, 80, 80, 3, 3),
            Self::Square88 => info!(576, 4, 56, 88, 88, 3, 3),
            Self::Square96 => info!(696, 4, 68, 96, 96, 3, 3),
            Self::Square104 => info!(816, 6, 56, 104, 104, 3, 3),
            Self::Square120 => info!(1050, 6, 68, 120, 120, 5, 5),
            Self::Square132 => info!(1304, 8, 62, 132, 132, 5, 5),
            Self::Square144 => info!(1558, 10, 62, 144, 144, 5, 5),
            Self::Rect8x18 => info!(5, 1, 7, 18, 8, 0, 0),
            Self::Rect8x32 => info!(10, 1, 11, 32, 8, 0, 1),
            Self::Rect12x26 => info!(16, 1, 14, 26, 12, 0, 0),
            Self::Rect12x36 => info!(22, 1, 18, 36, 12, 0, 1),
            Self::Rect16x36 => info!(32, 1, 24, 36, 16, 0, 1),
            Self::Rect16x48 => info!(49, 1, 28, 48, 16, 0, 1),
            // DMRE
            Self::Rect8x48 => info!(18, 1, 15, 48, 8, 0, 1),
            Self::Rect8x64 => info!(24, 1, 18, 64, 8, 0, 3),
            Self::Rect8x80 => info!(32, 1, 22, 80, 8, 0, 3),
            Self::Rect8x96 => info!(38, 1, 28, 96, 8, 0, 3),
            Self::Rect8x120 => info!(49, 1, 32, 120, 8, 0, 5),
            Self::Rect8x144 => info!(63, 1, 36, 144, 8, 0, 5),
            Self::Rect12x64 => info!(43, 1, 27, 64, 12, 0, 3),
            Self::Rect12x88 => info!(64, 1, 36, 88, 12, 0, 3),
            Self::Rect16x64 => info!(62, 1, 36, 64, 16, 0, 3),
            Self::Rect20x36 => info!(44, 1, 28, 36, 20, 0, 1),
            Self::Rect20x44 => info!(56, 1, 34, 44, 20, 0, 1),
            Self::Rect20x64 => info!(84, 1, 42, 64, 20, 0, 3),
            Self::Rect22x48 => info!(72, 1, 38, 48, 22, 0, 1),
            Self::Rect24x48 => info!(80, 1, 41, 48, 24, 0, 1),
            Self::Rect24x64 => info!(108, 1, 46, 64, 24, 0, 3),
            Self::Rect26x40 => info!(70, 1, 38, 40, 26, 0, 1),
            Self::Rect26x48 => info!(90, 1, 42, 48, 26, 0, 1),
            Self::Rect26x64 => info!(118, 1, 50, 64, 26, 0, 3),
        }
    }

    pub(crate) fn num_data_codewords(&self) -> usize {
        self.info().data_codewords
    }

    pub fn is_square(&self) -> bool {
        let info = self.info();
        info.width == info.height
    }

    /// Symbol is part of the rectangular extension (ISO 21471 DMRE).
    pub fn is_dmre(&self) -> bool {
        let iso16022_rect = matches!(
            self,
            Self::Rect8x18
                | Self::Rect8x32
                | Self::Rect12x26
                | Self::Rect12x36
                | Self::Rect16x36
                | Self::Rect16x48
        );
        !self.is_square() && !iso16022_rect
    }
}

impl SymbolSize {
    /// Capacity first, then the squared diagonal.
    fn sort_key(&self) -> (usize, usize) {
        let SymbolInfo {
            data_codewords,
            width,
            height,
            ..
        } = self.info();
        (data_codewords, width * width + height * height)
    }
}

impl PartialOrd for SymbolSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymbolSize {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

#[test]
fn test_ord_is_total_on_sizes() {
    for a in SYMBOL_SIZES {
        for b in SYMBOL_SIZES {
            assert_eq!(a.cmp(b) == Ordering::Equal, a == b, "{:?} vs {:?}", a, b);
        }
    }
}

#[test]
fn test_symbol_size_table_is_sorted() {
    let mut all: Vec<SymbolSize> = SYMBOL_SIZES.into();
    all.sort_unstable();
    assert_eq!(&all, SYMBOL_SIZES);
}

#[test]
fn test_table_lists_every_size() {
    let mut all: Vec<SymbolSize> = enum_iterator::all::<SymbolSize>().collect();
    all.sort_unstable();
    assert_eq!(&all, SYMBOL_SIZES);
}

#[test]
fn test_codeword_area_matches_codewords() {
    for size in enum_iterator::all::<SymbolSize>() {
        let info = size.info();
        let padding = info.padding_modules();
        assert!(padding == 0 || padding == 4, "{:?}", size);
        assert_eq!(
            padding == 4,
            matches!(
                size,
                SymbolSize::Square12 | SymbolSize::Square16 | SymbolSize::Square20 | SymbolSize::Square24
            ),
        );
    }
}

#[test]
fn test_default_list() {
    let all: Vec<SymbolSize> = SymbolList::default().iter().collect();
    assert_eq!(all.len(), 30);
    assert_eq!(
        &all[..8],
        &[
            SymbolSize::Square10,
            SymbolSize::Square12,
            SymbolSize::Rect8x18,
            SymbolSize::Square14,
            SymbolSize::Rect8x32,
            SymbolSize::Square16,
            SymbolSize::Rect12x26,
            SymbolSize::Square18,
        ]
    );
    assert!(all.iter().all(|s| !s.is_dmre()));
}

#[test]
fn test_single_region_squares() {
    let list = SymbolList::single_region_squares();
    let capacities: Vec<usize> = list.iter().map(|s| s.num_data_codewords()).collect();
    assert_eq!(capacities, vec![3, 5, 8, 12, 18, 22, 30, 36, 44]);
    assert_eq!(list.max_data_codewords(), 44);
}

#[test]
fn test_resolve_capacity_boundary() {
    let list = SymbolList::single_region_squares();
    assert_eq!(list.first_symbol_big_enough_for(44), Some(SymbolSize::Square26));
    assert_eq!(list.first_symbol_big_enough_for(45), None);
    assert_eq!(
        SymbolList::default().first_symbol_big_enough_for(45),
        Some(SymbolSize::Rect16x48)
    );
    assert_eq!(list.first_symbol_big_enough_for(0), Some(SymbolSize::Square10));
}

#[test]
fn test_rectangular_list() {
    let list = SymbolList::default().enforce_rectangular();
    let heights: Vec<(usize, usize)> = list
        .iter()
        .map(|s| (s.info().height, s.info().width))
        .collect();
    assert_eq!(heights, vec![(8, 18), (8, 32), (12, 26), (12, 36), (16, 36), (16, 48)]);
    assert!(list.iter().all(|s| !s.is_dmre()));
}

#[test]
fn test_dmre_heights() {
    let list = SymbolList::with_extended_rectangles().enforce_height_in(..=8);
    let widths: Vec<usize> = list.into_iter().map(|s| s.info().width).collect();
    assert_eq!(widths, vec![18, 32, 48, 64, 80, 96, 120, 144]);
}

#[test]
fn test_size_list_from_single() {
    let list: SymbolList = SymbolSize::Square10.into();
    assert!(list.contains(&SymbolSize::Square10));
    assert_eq!(list.iter().count(), 1);
}
