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

use std::fmt;

/// Value of a cell that cannot be entered.
pub const INACCESSIBLE: char = '*';

bitflags! {
    /// The sides of a cell with no wall.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Opening: u8 {
        const NORTH = 0b0001;
        const EAST  = 0b0010;
        const SOUTH = 0b0100;
        const WEST  = 0b1000;
    }
}

impl Opening {
    /// The side of the neighbouring cell that faces this side.
    pub fn opposite(self) -> Opening {
        let mut opposite = Opening::empty();
        if self.contains(Opening::NORTH) {
            opposite |= Opening::SOUTH;
        }
        if self.contains(Opening::SOUTH) {
            opposite |= Opening::NORTH;
        }
        if self.contains(Opening::EAST) {
            opposite |= Opening::WEST;
        }
        if self.contains(Opening::WEST) {
            opposite |= Opening::EAST;
        }
        opposite
    }

    /// Row and column offsets of the neighbour across a single side.
    fn step(self) -> (isize, isize) {
        match self {
            Opening::NORTH => (-1, 0),
            Opening::EAST => (0, 1),
            Opening::SOUTH => (1, 0),
            Opening::WEST => (0, -1),
            _ => (0, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub value: char,

    /// An uppercase letter selecting a style variant. Only set on accessible cells.
    pub variation: Option<char>,

    pub opening: Opening,
}

impl Cell {
    pub fn inaccessible() -> Cell {
        Cell {
            value: INACCESSIBLE,
            variation: None,
            opening: Opening::empty(),
        }
    }

    pub fn is_accessible(&self) -> bool {
        self.value != INACCESSIBLE
    }

    /// The texture group of this cell: its variation letter, or 0 for none.
    pub fn group(&self) -> i32 {
        self.variation.map(|v| v as i32).unwrap_or(0)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::inaccessible()
    }
}

/// A rectangular grid of cells, stored row-major with row 0 at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMaze {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl GridMaze {
    /// Creates a maze of inaccessible, fully walled cells.
    pub fn new(height: usize, width: usize) -> GridMaze {
        GridMaze {
            height,
            width,
            cells: vec![Cell::inaccessible(); height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "cell ({}, {}) outside {}x{} maze",
            row,
            col,
            self.height,
            self.width
        );
        row * self.width + col
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[self.index(row, col)]
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        let index = self.index(row, col);
        &mut self.cells[index]
    }

    pub fn has_opening(&self, row: usize, col: usize, side: Opening) -> bool {
        self.cell(row, col).opening.contains(side)
    }

    fn neighbour(&self, row: usize, col: usize, side: Opening) -> Option<(usize, usize)> {
        let (dr, dc) = side.step();
        let r = row as isize + dr;
        let c = col as isize + dc;
        if r < 0 || c < 0 || r as usize >= self.height || c as usize >= self.width {
            return None;
        }

        Some((r as usize, c as usize))
    }

    /// Removes the wall on `side` of the cell, and the matching wall of its neighbour if there is
    /// one.
    pub fn open(&mut self, row: usize, col: usize, side: Opening) {
        self.cell_mut(row, col).opening |= side;
        if let Some((r, c)) = self.neighbour(row, col, side) {
            self.cell_mut(r, c).opening |= side.opposite();
        }
    }

    /// Calls `f` on every cell in row-major order.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, &Cell),
    {
        for row in 0..self.height {
            for col in 0..self.width {
                f(row, col, self.cell(row, col));
            }
        }
    }

    /// Renders the maze with `#` for inaccessible cells and a space for everything else.
    pub fn walls_to_string(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                out.push(if self.cell(row, col).is_accessible() { ' ' } else { '#' });
            }
            out.push('\n');
        }
        out
    }
}

/// Writes the cell values, one row per line.
impl fmt::Display for GridMaze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                write!(f, "{}", self.cell(row, col).value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
