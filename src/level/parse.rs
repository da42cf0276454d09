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

use crate::level::{
    grid::{CharGrid, OUT_OF_BOUNDS},
    maze::{GridMaze, Opening, INACCESSIBLE},
};

fn is_wall(c: char) -> bool {
    c == INACCESSIBLE || c == OUT_OF_BOUNDS
}

/// Builds a maze from a layout layer and a variations layer.
///
/// Two neighbouring cells are open to each other whenever they agree on being walls: two floor
/// cells, or two wall cells. Only the boundary between a wall and a floor is closed, so solid
/// regions form one connected mass.
///
/// Variations are uppercase letters in the second layer; anything else means no variation.
pub fn parse_text_level<S, T>(level_text: S, variations_text: T) -> GridMaze
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let variations_text = match variations_text.as_ref() {
        "" => " ",
        v => v,
    };

    let grid = CharGrid::new(level_text);
    let vars = CharGrid::new(variations_text);

    let height = grid.height();
    let width = grid.width();
    let mut maze = GridMaze::new(height, width);

    let wall_at = |i: usize, j: usize| is_wall(grid.cell_at(i as isize, j as isize));

    for i in 0..height {
        for j in 1..width {
            if wall_at(i, j - 1) == wall_at(i, j) {
                maze.open(i, j - 1, Opening::EAST);
            }
        }
    }

    for j in 0..width {
        for i in 1..height {
            if wall_at(i - 1, j) == wall_at(i, j) {
                maze.open(i - 1, j, Opening::SOUTH);
            }
        }
    }

    for i in 0..height {
        for j in 0..width {
            let value = match grid.cell_at(i as isize, j as isize) {
                OUT_OF_BOUNDS => INACCESSIBLE,
                c => c,
            };
            let variation = match vars.cell_at(i as isize, j as isize) {
                v @ 'A'..='Z' => Some(v),
                _ => None,
            };

            let cell = maze.cell_mut(i, j);
            cell.value = value;
            if cell.is_accessible() {
                cell.variation = variation;
            }
        }
    }

    maze
}
