//! Task-parallel matrix multiply.
//!
//! The product is decomposed into one task per output cell, each computing
//! a full dot product independently. Workers share read-only inputs and a
//! write-disjoint output grid, so the only synchronized state is the
//! completion counter behind the barrier. The scheduler that interleaves
//! the workers is a collaborator: this crate only hands out runnable units
//! and the barrier the finalizer joins on.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod barrier;
mod grid;
mod workload;

pub use barrier::{CompletionBarrier, WaitTimeout};
pub use grid::ResultGrid;
pub use workload::{cell_tasks, CellTask, JoinError, Worker, Workload};
