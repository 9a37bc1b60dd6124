//! Rows of a PDF417 symbol as runs of dark and light modules.
use alloc::vec::Vec;

use super::Pdf417;

/// Start pattern, 17 modules.
const START: u32 = 0b11111111010101000;
/// Stop pattern, 18 modules.
const STOP: u32 = 0b111111101000101001;
const CODEWORD_MODULES: usize = 17;

/// Source of the bar and space patterns of the codewords.
///
/// PDF417 uses three tables ("clusters") of patterns, row `r` is written
/// with cluster `r % 3`, which is cluster 0, 3 or 6 in ISO 15438 numbering.
pub trait PatternTable {
    /// The 17 modules of `codeword` in `cluster`, the most significant of
    /// the lowest 17 bits is the first module, a set bit is dark.
    fn pattern(&self, cluster: usize, codeword: u16) -> u32;
}

/// A run of modules with the same color in one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub row: usize,
    /// Position of the first module, counted from the start of the row
    pub x: usize,
    pub width: usize,
    pub dark: bool,
}

/// Left and right row indicator of `row`.
///
/// They tell a reader the number of rows and columns and the error
/// correction level, each indicator holding one of them depending on the cluster.
pub(super) fn row_indicators(row: usize, rows: usize, columns: usize, level: u8) -> (u16, u16) {
    let rows_value = (rows - 1) / 3;
    let columns_value = columns - 1;
    let level_value = level as usize * 3 + (rows - 1) % 3;
    let base = 30 * (row / 3);
    let (left, right) = match row % 3 {
        0 => (rows_value, columns_value),
        1 => (level_value, rows_value),
        _ => (columns_value, level_value),
    };
    ((base + left) as u16, (base + right) as u16)
}

struct RowWriter<'a> {
    row: usize,
    x: usize,
    run: Option<(usize, bool)>,
    bars: &'a mut Vec<Bar>,
}

impl<'a> RowWriter<'a> {
    fn modules(&mut self, pattern: u32, len: usize) {
        for i in (0..len).rev() {
            self.module((pattern >> i) & 1 == 1);
        }
    }

    fn module(&mut self, dark: bool) {
        match self.run {
            Some((_, run_dark)) if run_dark == dark => (),
            Some((start, run_dark)) => {
                self.flush(start, run_dark);
                self.run = Some((self.x, dark));
            }
            None => self.run = Some((self.x, dark)),
        }
        self.x += 1;
    }

    fn flush(&mut self, start: usize, dark: bool) {
        self.bars.push(Bar {
            row: self.row,
            x: start,
            width: self.x - start,
            dark,
        });
    }

    fn finish(mut self) {
        if let Some((start, dark)) = self.run.take() {
            self.flush(start, dark);
        }
    }
}

/// Compute the bars of all rows, top to bottom and left to right.
pub(super) fn bars<T: PatternTable + ?Sized>(symbol: &Pdf417, table: &T) -> Vec<Bar> {
    let mut bars = Vec::new();
    for (row, (left, data, right)) in symbol.rows_iter().enumerate() {
        let cluster = row % 3;
        let mut writer = RowWriter {
            row,
            x: 0,
            run: None,
            bars: &mut bars,
        };
        writer.modules(START, 17);
        writer.modules(table.pattern(cluster, left), CODEWORD_MODULES);
        for codeword in data {
            writer.modules(table.pattern(cluster, *codeword), CODEWORD_MODULES);
        }
        writer.modules(table.pattern(cluster, right), CODEWORD_MODULES);
        writer.modules(STOP, 18);
        writer.finish();
    }
    bars
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pdf417::{ErrorLevel, Pdf417Options};

    /// A dark module, then the codeword in binary.
    struct Binary;

    impl PatternTable for Binary {
        fn pattern(&self, _cluster: usize, codeword: u16) -> u32 {
            0x10000 | codeword as u32
        }
    }

    #[test]
    fn test_row_indicators() {
        // 4 rows, 2 columns, level 1
        assert_eq!(row_indicators(0, 4, 2, 1), (1, 1));
        assert_eq!(row_indicators(1, 4, 2, 1), (3, 1));
        assert_eq!(row_indicators(2, 4, 2, 1), (1, 3));
        assert_eq!(row_indicators(3, 4, 2, 1), (31, 31));
    }

    #[test]
    fn test_bars() {
        let options = Pdf417Options::default().columns(2).level(ErrorLevel::Level(1));
        let symbol = Pdf417::encode(b"ABCDEFGH", options).unwrap();
        let bars = bars(&symbol, &Binary);

        let row_width = 17 * (symbol.columns() + 3) + 18;
        for row in 0..symbol.rows() {
            let row_bars: Vec<&Bar> = bars.iter().filter(|b| b.row == row).collect();
            assert_eq!(
                row_bars[0],
                &Bar {
                    row,
                    x: 0,
                    width: 8,
                    dark: true
                }
            );
            let width: usize = row_bars.iter().map(|b| b.width).sum();
            assert_eq!(width, row_width);
            for pair in row_bars.windows(2) {
                assert_ne!(pair[0].dark, pair[1].dark);
                assert_eq!(pair[0].x + pair[0].width, pair[1].x);
            }
            let last = row_bars[row_bars.len() - 1];
            assert_eq!((last.x, last.width, last.dark), (row_width - 1, 1, true));
        }
    }
}
