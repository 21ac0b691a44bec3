//! Conway's rule and toroidal neighbour counting.

use super::{CellState, Grid, Row};

/// Next state of a cell given its live neighbour count (B3/S23).
#[inline]
pub fn next_state(cell: CellState, live_neighbours: u8) -> CellState {
    match (cell, live_neighbours) {
        (CellState::Alive, 2) | (CellState::Alive, 3) => CellState::Alive,
        (CellState::Dead, 3) => CellState::Alive,
        _ => CellState::Dead,
    }
}

/// Count live neighbours of `rows[row][col]`.
///
/// Columns wrap using the row width. `row` must have a row above and below it
/// in `rows`; vertical wraparound is the caller's job.
#[inline]
pub fn live_neighbours(rows: &[Row], row: usize, col: usize) -> u8 {
    let width = rows[row].len();
    let left = (col + width - 1) % width;
    let right = (col + 1) % width;

    let mut count = 0u8;
    for r in [&rows[row - 1], &rows[row], &rows[row + 1]] {
        for c in [left, col, right] {
            if r[c].is_alive() {
                count += 1;
            }
        }
    }
    if rows[row][col].is_alive() {
        count -= 1;
    }
    count
}

/// Apply one generation to the whole torus without partitioning.
pub fn step(grid: &Grid) -> Grid {
    let width = grid.width();
    let height = grid.height();
    if width == 0 || height == 0 {
        return grid.clone();
    }

    let mut next = Grid::new(width, height);
    for y in 0..height {
        let up = (y + height - 1) % height;
        let down = (y + 1) % height;
        let context = [grid.row(up).clone(), grid.row(y).clone(), grid.row(down).clone()];
        for x in 0..width {
            let live = live_neighbours(&context, 1, x);
            next.set(x, y, next_state(grid.get(x, y), live));
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Seed;

    fn grid_from(pattern: &[&str]) -> Grid {
        let rows = pattern
            .iter()
            .map(|line| {
                line.chars()
                    .map(|c| {
                        if c == '#' {
                            CellState::Alive
                        } else {
                            CellState::Dead
                        }
                    })
                    .collect()
            })
            .collect();
        Grid::from_rows(pattern[0].len(), rows)
    }

    #[test]
    fn test_rule_table() {
        for n in 0..=8u8 {
            let survive = if n == 2 || n == 3 {
                CellState::Alive
            } else {
                CellState::Dead
            };
            let birth = if n == 3 {
                CellState::Alive
            } else {
                CellState::Dead
            };
            assert_eq!(next_state(CellState::Alive, n), survive, "alive, {}", n);
            assert_eq!(next_state(CellState::Dead, n), birth, "dead, {}", n);
        }
    }

    #[test]
    fn test_horizontal_wrap() {
        let g = grid_from(&["....", "#..#", "...."]);
        // (0, 1) sees (3, 1) through the left edge
        assert_eq!(live_neighbours(g.rows(), 1, 0), 1);
        assert_eq!(live_neighbours(g.rows(), 1, 3), 1);
        assert_eq!(live_neighbours(g.rows(), 1, 1), 1);
    }

    #[test]
    fn test_blinker_oscillates() {
        let g = grid_from(&[".....", ".....", ".###.", ".....", "....."]);
        let vertical = grid_from(&[".....", "..#..", "..#..", "..#..", "....."]);
        assert_eq!(step(&g), vertical);
        assert_eq!(step(&vertical), g);
    }

    #[test]
    fn test_block_is_still() {
        let g = grid_from(&["....", ".##.", ".##.", "...."]);
        assert_eq!(step(&g), g);
    }

    #[test]
    fn test_vertical_wrap() {
        // Horizontal blinker split across the top and bottom edges turns into a
        // vertical one that uses row 0 and the last row as neighbours.
        let g = grid_from(&[".....", ".....", ".....", ".###."]);
        let next = step(&g);
        assert_eq!(next, grid_from(&["..#..", ".....", "..#..", "..#.."]));
    }

    #[test]
    fn test_glider_translates() {
        let bytes = Seed::glider(1, 1).generate(10, 10);
        let mut g = Grid::from_bytes(10, 10, &bytes).unwrap();
        let start = g.alive_cells();
        for _ in 0..4 {
            g = step(&g);
        }
        let moved: Vec<_> = start
            .iter()
            .map(|c| crate::schema::Cell::new(c.x + 1, c.y + 1))
            .collect();
        let mut after = g.alive_cells();
        after.sort();
        let mut expected = moved;
        expected.sort();
        assert_eq!(after, expected);
    }
}
