//! Software multiply with a hardware-equivalent fixed-point path.

use alloc::vec::Vec;
use codec::{decode_accumulator, encode_operand, mac_product};
use matrix::{Matrix, MatrixError};

/// Multiply `a * b` in software.
///
/// The triple loop keeps two sums per cell: the plain `f32` product sum,
/// and the wrapping 16.16 accumulation of encoded-operand products exactly
/// as the coprocessor would compute it. The visible output is the decoded
/// fixed-point value for every cell; the float path serves only as the
/// in-pass reference and is discarded.
pub fn multiply_software(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    let dim = crate::check_operands(a, b)?;
    log::debug!("software multiply, dim {dim}");

    let mut result = Matrix::new(dim)?;
    let mut fixed = Vec::new();
    fixed.try_reserve_exact(dim * dim)?;
    fixed.resize(dim * dim, 0u32);

    for i in 0..dim {
        for j in 0..dim {
            log::trace!("row {i} of A times column {j} of B");
            let mut float_sum = 0.0f32;
            let mut fixed_sum = 0u32;
            for k in 0..dim {
                let lhs = a[(i, k)];
                let rhs = b[(k, j)];
                fixed_sum = fixed_sum
                    .wrapping_add(mac_product(encode_operand(lhs), encode_operand(rhs)));
                float_sum += lhs * rhs;
            }
            fixed[i * dim + j] = fixed_sum;
            result[(i, j)] = float_sum;
        }
    }

    for i in 0..dim {
        for j in 0..dim {
            result[(i, j)] = decode_accumulator(fixed[i * dim + j]);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_times_ones_is_ones() {
        let a = Matrix::identity(4).unwrap();
        let b = Matrix::ones(4).unwrap();
        let c = multiply_software(&a, &b).unwrap();
        assert_eq!(c, Matrix::ones(4).unwrap());
    }

    #[test]
    fn test_output_is_quantized_not_float() {
        // 0.1 quantizes to 25/256; the product must be the fixed-point
        // value (25/256)^2, not 0.01.
        let mut a = Matrix::new(1).unwrap();
        let mut b = Matrix::new(1).unwrap();
        a[(0, 0)] = 0.1;
        b[(0, 0)] = 0.1;
        let c = multiply_software(&a, &b).unwrap();
        let quantized = 25.0f32 / 256.0;
        assert_eq!(c[(0, 0)], quantized * quantized);
        assert_ne!(c[(0, 0)], 0.1 * 0.1);
    }

    #[test]
    fn test_identity_preserves_quantized_operands() {
        let a = Matrix::pseudo_random(6, 0xDEADBEEF).unwrap();
        let b = Matrix::identity(6).unwrap();
        let c = multiply_software(&a, &b).unwrap();
        // A * I reproduces A up to operand quantization.
        assert!(c.approx_eq(&a, codec::OPERAND_RESOLUTION));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let a = Matrix::ones(3).unwrap();
        let b = Matrix::ones(4).unwrap();
        assert_eq!(
            multiply_software(&a, &b).unwrap_err(),
            MatrixError::DimensionMismatch
        );
    }
}
