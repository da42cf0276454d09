// Copyright © 2018 Cormac O'Brien
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of this software
// and associated documentation files (the "Software"), to deal in the Software without
// restriction, including without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all copies or
// substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// Returned for any position outside the grid.
pub const OUT_OF_BOUNDS: char = '\0';

/// A read-only 2D view of a block of text, one character per cell.
///
/// Empty lines are dropped. Rows may be ragged: the grid is as wide as its longest row and
/// positions past the end of a shorter row read as [`OUT_OF_BOUNDS`].
#[derive(Clone, Debug)]
pub struct CharGrid {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl CharGrid {
    pub fn new<S>(text: S) -> CharGrid
    where
        S: AsRef<str>,
    {
        let rows: Vec<Vec<char>> = text
            .as_ref()
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().collect())
            .collect();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);

        CharGrid { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the character at `(row, col)`, or [`OUT_OF_BOUNDS`].
    pub fn cell_at(&self, row: isize, col: isize) -> char {
        if row < 0 || col < 0 {
            return OUT_OF_BOUNDS;
        }

        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(OUT_OF_BOUNDS)
    }
}
