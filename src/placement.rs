//! Arrangement of codewords in a Data Matrix symbol.
//!
//! The codeword area (the symbol without finder and alignment patterns) is
//! filled diagonally, each codeword occupying an "utah" shaped group of
//! eight modules, with four special shapes in the corners (ISO 16022, Annex F).
//! [Bitmap] is the final module grid, finder and alignment patterns included.
use alloc::{string::String, vec, vec::Vec};

use crate::symbol_size::{SymbolInfo, SymbolSize};

/// Module positions of each codeword in the codeword area.
///
/// The first position of a codeword holds its most significant bit.
pub(crate) struct Placement {
    nrow: i32,
    ncol: i32,
    positions: Vec<[usize; 8]>,
    occupied: Vec<bool>,
}

impl Placement {
    pub(crate) fn new(info: &SymbolInfo) -> Self {
        let nrow = info.content_height() as i32;
        let ncol = info.content_width() as i32;
        let mut me = Self {
            nrow,
            ncol,
            positions: Vec::with_capacity(info.data_codewords + info.error_codewords()),
            occupied: vec![false; (nrow * ncol) as usize],
        };
        me.walk();
        me
    }

    fn walk(&mut self) {
        let (nrow, ncol) = (self.nrow, self.ncol);
        let mut row = 4;
        let mut col = 0;
        loop {
            if row == nrow && col == 0 {
                self.corner1();
            }
            if row == nrow - 2 && col == 0 && ncol % 4 != 0 {
                self.corner2();
            }
            if row == nrow - 2 && col == 0 && ncol % 8 == 4 {
                self.corner3();
            }
            if row == nrow + 4 && col == 2 && ncol % 8 == 0 {
                self.corner4();
            }
            // up and to the right
            loop {
                if self.is_free(row, col) {
                    self.utah(row, col);
                }
                row -= 2;
                col += 2;
                if row < 0 || col >= ncol {
                    break;
                }
            }
            row += 1;
            col += 3;
            // down and to the left
            loop {
                if self.is_free(row, col) {
                    self.utah(row, col);
                }
                row += 2;
                col -= 2;
                if row >= nrow || col < 0 {
                    break;
                }
            }
            row += 3;
            col += 1;
            if row >= nrow && col >= ncol {
                break;
            }
        }
    }

    /// Is `(row, col)` inside the area and not yet taken?
    fn is_free(&self, row: i32, col: i32) -> bool {
        (0..self.nrow).contains(&row)
            && (0..self.ncol).contains(&col)
            && !self.occupied[(row * self.ncol + col) as usize]
    }

    /// Index of a module, positions outside the area wrap around.
    fn module(&self, mut row: i32, mut col: i32) -> usize {
        if row < 0 {
            row += self.nrow;
            col += 4 - ((self.nrow + 4) % 8);
        }
        if col < 0 {
            col += self.ncol;
            row += 4 - ((self.ncol + 4) % 8);
        }
        // 26x40 and 26x48 wrap past the last row
        if row >= self.nrow {
            row -= self.nrow;
        }
        (row * self.ncol + col) as usize
    }

    fn add(&mut self, modules: [(i32, i32); 8]) {
        let mut codeword = [0; 8];
        for (slot, (row, col)) in codeword.iter_mut().zip(modules) {
            *slot = self.module(row, col);
            self.occupied[*slot] = true;
        }
        self.positions.push(codeword);
    }

    fn utah(&mut self, r: i32, c: i32) {
        self.add([
            (r - 2, c - 2),
            (r - 2, c - 1),
            (r - 1, c - 2),
            (r - 1, c - 1),
            (r - 1, c),
            (r, c - 2),
            (r, c - 1),
            (r, c),
        ]);
    }

    fn corner1(&mut self) {
        let (h, w) = (self.nrow, self.ncol);
        self.add([
            (h - 1, 0),
            (h - 1, 1),
            (h - 1, 2),
            (0, w - 2),
            (0, w - 1),
            (1, w - 1),
            (2, w - 1),
            (3, w - 1),
        ]);
    }

    fn corner2(&mut self) {
        let (h, w) = (self.nrow, self.ncol);
        self.add([
            (h - 3, 0),
            (h - 2, 0),
            (h - 1, 0),
            (0, w - 4),
            (0, w - 3),
            (0, w - 2),
            (0, w - 1),
            (1, w - 1),
        ]);
    }

    fn corner3(&mut self) {
        let (h, w) = (self.nrow, self.ncol);
        self.add([
            (h - 3, 0),
            (h - 2, 0),
            (h - 1, 0),
            (0, w - 2),
            (0, w - 1),
            (1, w - 1),
            (2, w - 1),
            (3, w - 1),
        ]);
    }

    fn corner4(&mut self) {
        let (h, w) = (self.nrow, self.ncol);
        self.add([
            (h - 1, 0),
            (h - 1, w - 1),
            (0, w - 3),
            (0, w - 2),
            (0, w - 1),
            (1, w - 3),
            (1, w - 2),
            (1, w - 1),
        ]);
    }

    /// Write the codewords into the codeword area, returns the modules row by row.
    pub(crate) fn place(&self, codewords: &[u8], info: &SymbolInfo) -> Vec<bool> {
        if codewords.len() != self.positions.len() {
            panic!(
                "{} codewords for {} positions, this is a bug",
                codewords.len(),
                self.positions.len()
            );
        }
        let mut area = vec![false; self.occupied.len()];
        for (codeword, modules) in codewords.iter().zip(&self.positions) {
            for (bit, idx) in modules.iter().enumerate() {
                area[*idx] = (codeword >> (7 - bit)) & 1 == 1;
            }
        }
        // fixed pattern in the unused lower right corner
        if info.padding_modules() > 0 {
            let (h, w) = (self.nrow as usize, self.ncol as usize);
            area[(h - 1) * w + w - 1] = true;
            area[(h - 2) * w + w - 2] = true;
        }
        area
    }
}

/// The module grid of a Data Matrix symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    bits: Vec<bool>,
}

impl Bitmap {
    /// Place the codewords (data followed by error correction) for `size`.
    pub(crate) fn new(codewords: &[u8], size: SymbolSize) -> Self {
        let info = size.info();
        let area = Placement::new(&info).place(codewords, &info);

        let content_width = info.content_width();
        let region_height = info.content_height() / (info.extra_horizontal_alignments + 1);
        let region_width = content_width / (info.extra_vertical_alignments + 1);

        let mut bits = Vec::with_capacity(info.width * info.height);
        for y in 0..info.height {
            let ry = y % (region_height + 2);
            for x in 0..info.width {
                let rx = x % (region_width + 2);
                let dark = if ry == region_height + 1 || rx == 0 {
                    // solid "L" of the finder pattern
                    true
                } else if ry == 0 {
                    x % 2 == 0
                } else if rx == region_width + 1 {
                    y % 2 == 1
                } else {
                    let row = y / (region_height + 2) * region_height + ry - 1;
                    let col = x / (region_width + 2) * region_width + rx - 1;
                    area[row * content_width + col]
                };
                bits.push(dark);
            }
        }
        Self {
            width: info.width,
            bits,
        }
    }

    /// Return the width of the bitmap (no quiet zone included).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Return the height of the bitmap (no quiet zone included).
    pub fn height(&self) -> usize {
        self.bits.len() / self.width
    }

    /// Is the module at `(x, y)` dark?
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && self.bits.get(y * self.width + x).cloned().unwrap_or(false)
    }

    /// Get an iterator over the dark modules' coordinates `(x, y)`.
    ///
    /// The origin is the top left corner, x grows to the right and y downwards.
    /// The modules are returned in order, incrementing x before y.
    ///
    /// A quiet zone is not included, one module wide at least must be added
    /// when rendering.
    ///
    /// ```rust
    /// # use barcode2d::{DataMatrix, SymbolSize};
    /// let code = DataMatrix::encode(b"Foo", SymbolSize::Square10).unwrap();
    /// for (x, y) in code.bitmap().pixels() {
    ///     // place square/circle at (x, y) to render this Data Matrix
    /// }
    /// ```
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(i, _)| (i % w, i / w))
    }

    /// Compute a unicode representation ("ASCII art") with a quiet zone of one module.
    ///
    /// Two rows of modules make up one line of text, it might look
    /// weird if you are not using a monospaced font.
    pub fn unicode(&self) -> String {
        const CHARS: [char; 4] = [' ', '▄', '▀', '█'];
        let height = self.height();
        let dark = |y: usize, x: usize| -> usize {
            // shifted by one for the quiet zone
            if y == 0 || x == 0 {
                0
            } else {
                self.get(x - 1, y - 1) as usize
            }
        };
        let mut out = String::with_capacity((height / 2 + 2) * (self.width + 3) * 3);
        for y in (0..height + 2).step_by(2) {
            for x in 0..self.width + 2 {
                out.push(CHARS[(dark(y, x) << 1) | dark(y + 1, x)]);
            }
            out.push('\n');
        }
        out
    }
}
