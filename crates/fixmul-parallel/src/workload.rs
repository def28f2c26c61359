//! Decomposition of one multiply into per-cell workers.

use alloc::sync::Arc;
use alloc::vec::Vec;
use matrix::{Matrix, MatrixError};

use crate::{CompletionBarrier, ResultGrid, WaitTimeout};

/// Immutable (row, column) coordinate pair bound to one task at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellTask {
    pub row: usize,
    pub col: usize,
}

/// Generate the N^2 per-cell task descriptors in row-major order.
pub fn cell_tasks(dim: usize) -> impl Iterator<Item = CellTask> {
    (0..dim).flat_map(move |row| (0..dim).map(move |col| CellTask { row, col }))
}

/// State every worker shares: read-only inputs, the write-disjoint output
/// grid, and the completion counter.
struct Shared {
    a: Matrix,
    b: Matrix,
    out: ResultGrid,
    barrier: CompletionBarrier,
}

/// One runnable unit of work, owning its cell for its whole lifetime.
pub struct Worker {
    task: CellTask,
    shared: Arc<Shared>,
}

impl Worker {
    /// The coordinates this worker was bound to at creation.
    pub fn task(&self) -> CellTask {
        self.task
    }

    /// Run to completion: dot product, publish, signal, terminate.
    ///
    /// Consuming `self` is what makes the completion signal exactly-once;
    /// a worker cannot run twice or signal without having published.
    pub fn run(self) {
        let CellTask { row, col } = self.task;
        let shared = &self.shared;
        let dim = shared.out.dim();

        log::trace!("row {row} of A times column {col} of B");
        let mut sum = 0.0f32;
        for k in 0..dim {
            sum += shared.a[(row, k)] * shared.b[(k, col)];
        }

        shared.out.store(row, col, sum);
        shared.barrier.signal();
    }
}

/// A parallel multiply: validated inputs, one worker per output cell, and
/// the barrier its finalizer joins on.
///
/// Hand the workers to the scheduler in any order; they assume nothing
/// about their relative interleaving.
pub struct Workload {
    shared: Arc<Shared>,
}

impl Workload {
    /// Package the operands and the shared output for `dim^2` workers.
    ///
    /// Inputs are validated here, before any task exists; a mismatch
    /// performs zero writes anywhere.
    pub fn new(a: Matrix, b: Matrix) -> Result<Self, MatrixError> {
        if a.dim() != b.dim() {
            return Err(MatrixError::DimensionMismatch);
        }
        let dim = a.dim();
        log::debug!("parallel multiply, dim {dim}, {} workers", dim * dim);
        let out = ResultGrid::new(dim)?;
        let barrier = CompletionBarrier::new(dim * dim);
        Ok(Self {
            shared: Arc::new(Shared {
                a,
                b,
                out,
                barrier,
            }),
        })
    }

    pub fn dim(&self) -> usize {
        self.shared.out.dim()
    }

    /// Create the workers, one per output cell.
    pub fn workers(&self) -> Result<Vec<Worker>, MatrixError> {
        let dim = self.dim();
        let mut workers = Vec::new();
        workers.try_reserve_exact(dim * dim)?;
        for task in cell_tasks(dim) {
            workers.push(Worker {
                task,
                shared: Arc::clone(&self.shared),
            });
        }
        Ok(workers)
    }

    /// The completion barrier the finalizer waits on.
    pub fn barrier(&self) -> &CompletionBarrier {
        &self.shared.barrier
    }

    /// Finalize: wait for every worker, then read the populated grid.
    pub fn join(&self) -> Result<Matrix, MatrixError> {
        self.shared.barrier.wait();
        self.shared.out.to_matrix()
    }

    /// Finalize with a poll budget instead of waiting forever.
    pub fn join_polls(&self, max_polls: u64) -> Result<Matrix, JoinError> {
        self.shared
            .barrier
            .wait_polls(max_polls)
            .map_err(JoinError::Timeout)?;
        self.shared.out.to_matrix().map_err(JoinError::Matrix)
    }
}

/// Why a bounded finalize failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
    /// Not every worker signaled within the poll budget.
    Timeout(WaitTimeout),
    /// Reading the result back failed.
    Matrix(MatrixError),
}

impl core::fmt::Display for JoinError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            JoinError::Timeout(e) => write!(f, "{e}"),
            JoinError::Matrix(e) => write!(f, "{e}"),
        }
    }
}

impl core::error::Error for JoinError {}
