//! Band partitioner: splits the grid into contiguous horizontal bands.
//!
//! Geometry is computed once per run. Each generation a worker's view is cut
//! from the grid: its own rows plus one context row above and below, with the
//! top and bottom edges wrapping around.

use super::{Grid, Row};

/// Heights and starting rows of every band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandGeometry {
    heights: Vec<usize>,
    start_rows: Vec<usize>,
}

impl BandGeometry {
    /// Distribute `height` rows over `threads` bands.
    ///
    /// Each band gets `height / threads` rows and the first `height % threads`
    /// bands get one extra, which is what dealing rows out round-robin from
    /// band 0 produces.
    pub fn compute(height: usize, threads: usize) -> Self {
        if threads == 0 {
            return Self {
                heights: Vec::new(),
                start_rows: Vec::new(),
            };
        }

        let base = height / threads;
        let remainder = height % threads;
        let heights: Vec<usize> = (0..threads)
            .map(|i| base + usize::from(i < remainder))
            .collect();

        let mut start_rows = Vec::with_capacity(threads);
        let mut assigned = 0;
        for &h in &heights {
            start_rows.push(assigned);
            assigned += h;
        }

        Self {
            heights,
            start_rows,
        }
    }

    /// Number of bands.
    #[inline]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    #[inline]
    pub fn heights(&self) -> &[usize] {
        &self.heights
    }

    #[inline]
    pub fn start_rows(&self) -> &[usize] {
        &self.start_rows
    }

    /// Half-open row range `[start, end)` of band `index`.
    #[inline]
    pub fn bounds(&self, index: usize) -> (usize, usize) {
        let start = self.start_rows[index];
        (start, start + self.heights[index])
    }
}

/// A band's rows with one neighbour-context row at each end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    rows: Vec<Row>,
}

impl Band {
    /// All rows, context included.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows the band owns, without context.
    #[inline]
    pub fn interior(&self) -> &[Row] {
        &self.rows[1..self.rows.len() - 1]
    }

    /// Number of owned rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len() - 2
    }
}

/// Cut the view for band `band_index`, owning rows `[start_row, end_row)`.
pub fn extract_view(
    grid: &Grid,
    threads: usize,
    band_index: usize,
    start_row: usize,
    end_row: usize,
) -> Band {
    let rows = grid.rows();
    let last = rows.len() - 1;
    let mut view = Vec::with_capacity(end_row - start_row + 2);

    if threads == 1 {
        view.push(rows[last].clone());
        view.extend_from_slice(rows);
        view.push(rows[0].clone());
    } else if band_index == 0 {
        view.push(rows[last].clone());
        view.extend_from_slice(&rows[..=end_row]);
    } else if band_index == threads - 1 {
        view.extend_from_slice(&rows[start_row - 1..]);
        view.push(rows[0].clone());
    } else {
        view.extend_from_slice(&rows[start_row - 1..=end_row]);
    }

    Band { rows: view }
}

/// Concatenate computed bands in band order into a new grid.
pub fn reassemble<I>(width: usize, parts: I) -> Grid
where
    I: IntoIterator<Item = Vec<Row>>,
{
    let rows = parts.into_iter().flatten().collect();
    Grid::from_rows(width, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{CellState, compute_band, step};
    use crate::schema::Seed;
    use proptest::prelude::*;

    /// Grid whose row `y` has only cell `y % width` alive, so rows are distinguishable.
    fn marker_grid(width: usize, height: usize) -> Grid {
        let mut grid = Grid::new(width, height);
        for y in 0..height {
            grid.set(y % width, y, CellState::Alive);
        }
        grid
    }

    #[test]
    fn test_even_geometry() {
        let g = BandGeometry::compute(16, 4);
        assert_eq!(g.heights(), &[4, 4, 4, 4]);
        assert_eq!(g.start_rows(), &[0, 4, 8, 12]);
        assert_eq!(g.bounds(2), (8, 12));
    }

    #[test]
    fn test_remainder_goes_to_first_bands() {
        let g = BandGeometry::compute(11, 4);
        assert_eq!(g.heights(), &[3, 3, 3, 2]);
        assert_eq!(g.start_rows(), &[0, 3, 6, 9]);

        let g = BandGeometry::compute(5, 3);
        assert_eq!(g.heights(), &[2, 2, 1]);
    }

    #[test]
    fn test_zero_threads_is_empty() {
        assert!(BandGeometry::compute(8, 0).is_empty());
    }

    #[test]
    fn test_single_band_wraps_to_itself() {
        let grid = marker_grid(3, 4);
        let band = extract_view(&grid, 1, 0, 0, 4);
        assert_eq!(band.rows().len(), 6);
        assert_eq!(&band.rows()[0], grid.row(3));
        assert_eq!(&band.rows()[5], grid.row(0));
        assert_eq!(band.interior(), grid.rows());
    }

    #[test]
    fn test_edge_bands_wrap() {
        let grid = marker_grid(4, 8);
        let geometry = BandGeometry::compute(8, 3);

        let (s, e) = geometry.bounds(0);
        let first = extract_view(&grid, 3, 0, s, e);
        assert_eq!(&first.rows()[0], grid.row(7));
        assert_eq!(first.interior(), &grid.rows()[0..3]);
        assert_eq!(first.rows().last().unwrap(), grid.row(3));

        let (s, e) = geometry.bounds(1);
        let middle = extract_view(&grid, 3, 1, s, e);
        assert_eq!(&middle.rows()[0], grid.row(2));
        assert_eq!(middle.interior(), &grid.rows()[3..6]);
        assert_eq!(middle.rows().last().unwrap(), grid.row(6));

        let (s, e) = geometry.bounds(2);
        let last = extract_view(&grid, 3, 2, s, e);
        assert_eq!(&last.rows()[0], grid.row(5));
        assert_eq!(last.interior(), &grid.rows()[6..8]);
        assert_eq!(last.rows().last().unwrap(), grid.row(0));
        assert_eq!(last.height(), 2);
    }

    fn distribute_and_reassemble(grid: &Grid, threads: usize) -> Grid {
        let geometry = BandGeometry::compute(grid.height(), threads);
        let parts = (0..geometry.len()).map(|i| {
            let (start, end) = geometry.bounds(i);
            let band = extract_view(grid, threads, i, start, end);
            compute_band(&band, start, |_| {})
        });
        reassemble(grid.width(), parts)
    }

    proptest! {
        #[test]
        fn prop_geometry_covers_height(height in 1usize..300, threads_seed in 0usize..1000) {
            let threads = threads_seed % height + 1;
            let g = BandGeometry::compute(height, threads);
            prop_assert_eq!(g.len(), threads);
            prop_assert_eq!(g.heights().iter().sum::<usize>(), height);
            let max = *g.heights().iter().max().unwrap();
            let min = *g.heights().iter().min().unwrap();
            prop_assert!(max - min <= 1);
            for i in 1..threads {
                let (_, prev_end) = g.bounds(i - 1);
                prop_assert_eq!(g.start_rows()[i], prev_end);
                prop_assert!(g.heights()[i] <= g.heights()[i - 1]);
            }
        }

        #[test]
        fn prop_partitioned_step_matches_sequential(
            width in 1usize..24,
            height in 1usize..24,
            threads_seed in 0usize..64,
            density in 0.0f64..1.0,
            seed in any::<u64>(),
        ) {
            let threads = threads_seed % height + 1;
            let bytes = Seed::random(density, seed).generate(width, height);
            let grid = Grid::from_bytes(width, height, &bytes).unwrap();
            prop_assert_eq!(distribute_and_reassemble(&grid, threads), step(&grid));
        }

        #[test]
        fn prop_top_row_sees_bottom_row(width in 3usize..16, height in 3usize..16, threads_seed in 0usize..16) {
            let threads = threads_seed % height + 1;
            // Three live cells on the last row only: the middle cell of row 0
            // above them has exactly three neighbours and must be born.
            let mut grid = Grid::new(width, height);
            for x in 0..3 {
                grid.set(x, height - 1, CellState::Alive);
            }
            let next = distribute_and_reassemble(&grid, threads);
            prop_assert_eq!(next.get(1, 0), CellState::Alive);
            prop_assert_eq!(next.get(1, height - 2), CellState::Alive);
        }
    }
}
