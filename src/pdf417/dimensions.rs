//! Error correction level and symbol dimensions.
use super::{ErrorLevel, Pdf417Error};

pub(super) const MIN_ROWS: usize = 3;
pub(super) const MAX_ROWS: usize = 90;
pub(super) const MAX_COLUMNS: usize = 30;
/// Data and error codewords of a symbol together.
pub(super) const MAX_CODEWORDS: usize = 928;

/// Number of error codewords of a level.
pub(super) fn ecc_count(level: u8) -> usize {
    1 << (level as usize + 1)
}

/// Resolve the error correction level, `data_len` not counting the length descriptor.
///
/// The automatic level follows the recommendation of ISO 15438.
pub(super) fn resolve_level(level: ErrorLevel, data_len: usize) -> Result<u8, Pdf417Error> {
    match level {
        ErrorLevel::Level(l) if l <= 8 => Ok(l),
        ErrorLevel::Level(l) => Err(Pdf417Error::InvalidLevel(l)),
        ErrorLevel::Auto => match data_len {
            0..=40 => Ok(2),
            41..=160 => Ok(3),
            161..=320 => Ok(4),
            321..=863 => Ok(5),
            needed => Err(Pdf417Error::TooMuchData {
                needed,
                available: 863,
            }),
        },
    }
}

/// Number of rows for `data_len` codewords (length descriptor excluded),
/// `ecc_len` error codewords and `columns` data columns.
pub(super) fn rows(data_len: usize, ecc_len: usize, columns: usize) -> Result<usize, Pdf417Error> {
    if columns == 0 || columns > MAX_COLUMNS {
        return Err(Pdf417Error::InvalidColumns(columns));
    }
    let needed = data_len + 1 + ecc_len;
    if needed > MAX_CODEWORDS {
        return Err(Pdf417Error::TooManyCodewords { needed });
    }
    let mut rows = needed / columns + 1;
    if columns * rows >= needed + columns {
        rows -= 1;
    }
    if rows < MIN_ROWS {
        return Err(Pdf417Error::TooFewRows { rows });
    }
    if rows > MAX_ROWS {
        return Err(Pdf417Error::TooManyRows { rows });
    }
    if rows * columns > MAX_CODEWORDS {
        return Err(Pdf417Error::TooManyCodewords {
            needed: rows * columns,
        });
    }
    Ok(rows)
}

#[test]
fn test_ecc_count() {
    assert_eq!(ecc_count(0), 2);
    assert_eq!(ecc_count(2), 8);
    assert_eq!(ecc_count(8), 512);
}

#[test]
fn test_rows() {
    assert_eq!(rows(10, 8, 2), Ok(10));
    // exact fit needs no extra row
    assert_eq!(rows(11, 8, 2), Ok(10));
    assert_eq!(rows(3, 8, 4), Ok(3));
}

#[test]
fn test_rows_out_of_range() {
    assert_eq!(rows(1, 2, 4), Err(Pdf417Error::TooFewRows { rows: 1 }));
    assert_eq!(rows(300, 8, 1), Err(Pdf417Error::TooManyRows { rows: 309 }));
    assert_eq!(rows(10, 8, 31), Err(Pdf417Error::InvalidColumns(31)));
    assert_eq!(rows(10, 8, 0), Err(Pdf417Error::InvalidColumns(0)));
    assert_eq!(
        rows(900, 32, 30),
        Err(Pdf417Error::TooManyCodewords { needed: 933 })
    );
    // 919 codewords take 31 rows of 30
    assert_eq!(
        rows(886, 32, 30),
        Err(Pdf417Error::TooManyCodewords { needed: 930 })
    );
}

#[test]
fn test_auto_level() {
    assert_eq!(resolve_level(ErrorLevel::Auto, 40), Ok(2));
    assert_eq!(resolve_level(ErrorLevel::Auto, 41), Ok(3));
    assert_eq!(resolve_level(ErrorLevel::Auto, 863), Ok(5));
    assert_eq!(
        resolve_level(ErrorLevel::Auto, 864),
        Err(Pdf417Error::TooMuchData {
            needed: 864,
            available: 863
        })
    );
    assert_eq!(resolve_level(ErrorLevel::Level(8), 1), Ok(8));
    assert_eq!(
        resolve_level(ErrorLevel::Level(9), 1),
        Err(Pdf417Error::InvalidLevel(9))
    );
}
