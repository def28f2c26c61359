//! Matrix multiply engines.
//!
//! Two ways to compute the same quantized product: a software triple loop
//! that mirrors the hardware's fixed-point arithmetic, and an offload loop
//! that streams operands through the MAC coprocessor register file. Both
//! produce the identical 8.8/16.16-quantized result for in-domain inputs.

#![no_std]

extern crate alloc;

mod offload;
mod software;

pub use offload::multiply_offload;
pub use software::multiply_software;

use matrix::{Matrix, MatrixError};

/// Validate a multiply's operands before touching any other state.
///
/// A `Matrix` cannot be empty by construction, so dimension agreement is
/// the remaining precondition.
fn check_operands(a: &Matrix, b: &Matrix) -> Result<usize, MatrixError> {
    if a.dim() != b.dim() {
        return Err(MatrixError::DimensionMismatch);
    }
    Ok(a.dim())
}
