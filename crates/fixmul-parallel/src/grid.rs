//! Write-disjoint shared output storage.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};
use matrix::{Matrix, MatrixError};

/// The shared output of a parallel multiply: one atomic cell per
/// (row, column), each written exactly once by the task that owns it.
///
/// Ownership of a slot is positional, so no two tasks ever race on the same
/// cell; the atomics make each f32 store tear-free and give the finalizer a
/// release/acquire edge to read the finished grid through.
#[derive(Debug)]
pub struct ResultGrid {
    dim: usize,
    cells: Vec<AtomicU32>,
}

impl ResultGrid {
    pub fn new(dim: usize) -> Result<Self, MatrixError> {
        if dim == 0 {
            return Err(MatrixError::Empty);
        }
        let mut cells = Vec::new();
        cells.try_reserve_exact(dim * dim)?;
        for _ in 0..dim * dim {
            cells.push(AtomicU32::new(0));
        }
        Ok(Self { dim, cells })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Publish a finished cell. Each (row, col) has exactly one writer.
    pub(crate) fn store(&self, row: usize, col: usize, value: f32) {
        self.cells[row * self.dim + col].store(value.to_bits(), Ordering::Release);
    }

    pub fn load(&self, row: usize, col: usize) -> f32 {
        f32::from_bits(self.cells[row * self.dim + col].load(Ordering::Acquire))
    }

    /// Copy the grid into a plain matrix. Meaningful only after the
    /// completion barrier has released.
    pub fn to_matrix(&self) -> Result<Matrix, MatrixError> {
        let mut m = Matrix::new(self.dim)?;
        for row in 0..self.dim {
            for col in 0..self.dim {
                m[(row, col)] = self.load(row, col);
            }
        }
        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_load_round_trip() {
        let grid = ResultGrid::new(3).unwrap();
        grid.store(1, 2, 4.25);
        assert_eq!(grid.load(1, 2), 4.25);
        assert_eq!(grid.load(0, 0), 0.0);
    }

    #[test]
    fn test_to_matrix_copies_all_cells() {
        let grid = ResultGrid::new(2).unwrap();
        grid.store(0, 0, 1.0);
        grid.store(0, 1, 2.0);
        grid.store(1, 0, 3.0);
        grid.store(1, 1, 4.0);
        let m = grid.to_matrix().unwrap();
        assert_eq!(m[(1, 0)], 3.0);
        assert_eq!(m.checksum(), 10.0);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(ResultGrid::new(0).unwrap_err(), MatrixError::Empty);
    }
}
