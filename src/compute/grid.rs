//! Grid model: rows of binary cell states.

use crate::schema::{ALIVE_BYTE, Cell, DEAD_BYTE};

/// State of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    /// Decode from the image wire format. Only 255 is alive.
    #[inline]
    pub fn from_byte(byte: u8) -> Self {
        if byte == ALIVE_BYTE {
            CellState::Alive
        } else {
            CellState::Dead
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        match self {
            CellState::Alive => ALIVE_BYTE,
            CellState::Dead => DEAD_BYTE,
        }
    }

    #[inline]
    pub fn is_alive(self) -> bool {
        self == CellState::Alive
    }
}

/// One grid row.
pub type Row = Vec<CellState>;

/// Fixed-size Height x Width grid, stored as an ordered sequence of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    rows: Vec<Row>,
}

impl Grid {
    /// All-dead grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![vec![CellState::Dead; width]; height],
        }
    }

    /// Build from rows that are all `width` cells long.
    pub fn from_rows(width: usize, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Self { width, rows }
    }

    /// Decode a row-major image. Returns `None` if the length is not `width * height`.
    pub fn from_bytes(width: usize, height: usize, bytes: &[u8]) -> Option<Self> {
        if width.checked_mul(height) != Some(bytes.len()) {
            return None;
        }
        if width == 0 {
            return Some(Self::new(0, height));
        }
        let rows = bytes
            .chunks_exact(width)
            .map(|chunk| chunk.iter().map(|&b| CellState::from_byte(b)).collect())
            .collect();
        Some(Self { width, rows })
    }

    /// Encode as a row-major image.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.rows
            .iter()
            .flat_map(|row| row.iter().map(|c| c.to_byte()))
            .collect()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline]
    pub fn row(&self, y: usize) -> &Row {
        &self.rows[y]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> CellState {
        self.rows[y][x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, state: CellState) {
        self.rows[y][x] = state;
    }

    /// Number of live cells.
    pub fn alive_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|c| c.is_alive()).count())
            .sum()
    }

    /// Coordinates of live cells in row-major order.
    pub fn alive_cells(&self) -> Vec<Cell> {
        let mut cells = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if cell.is_alive() {
                    cells.push(Cell::new(x, y));
                }
            }
        }
        cells
    }
}
