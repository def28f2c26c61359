//! Multiply by streaming operands through the MAC coprocessor.

use codec::{decode_accumulator, encode_operand, pack_operands};
use mac::{MacRegisterFile, OPERAND_SLOTS};
use matrix::{Matrix, MatrixError};

/// Multiply `a * b` on the coprocessor, one output cell at a time.
///
/// For each cell the inner loop writes one packed operand pair to slot
/// `k mod 63`. The hardware accumulator covers at most 63 MAC steps, so
/// whenever `k` reaches a positive multiple of 63 the partial sum is
/// drained into the cell before the next write; a final drain after the
/// loop collects the remainder. The call blocks until the full product is
/// computed; there is no overlap between successive cells.
pub fn multiply_offload<R: MacRegisterFile>(
    a: &Matrix,
    b: &Matrix,
    regs: &mut R,
) -> Result<Matrix, MatrixError> {
    let dim = crate::check_operands(a, b)?;
    log::debug!("offload multiply, dim {dim}");

    let mut result = Matrix::new(dim)?;

    for i in 0..dim {
        for j in 0..dim {
            log::trace!("row {i} of A times column {j} of B");
            let mut cell = 0.0f32;
            for k in 0..dim {
                if k != 0 && k % OPERAND_SLOTS == 0 {
                    cell += decode_accumulator(regs.read_accumulator());
                }
                let packed =
                    pack_operands(encode_operand(a[(i, k)]), encode_operand(b[(k, j)]));
                regs.write(k % OPERAND_SLOTS, packed);
            }
            cell += decode_accumulator(regs.read_accumulator());
            result[(i, j)] = cell;
        }
    }

    Ok(result)
}
