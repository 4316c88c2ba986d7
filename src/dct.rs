use crate::error::{CodecError, Result};
use std::f64::consts::PI;

/// Orthonormal DCT-II/DCT-III engine for fixed-length real-valued blocks
pub struct DctEngine {
    length: usize,
    /// cosine_table[k * length + n] = cos(pi * (2n + 1) * k / (2 * length))
    cosine_table: Vec<f64>,
    /// scale_factors[0] = sqrt(1/N), scale_factors[k > 0] = sqrt(2/N)
    scale_factors: Vec<f64>,
}

impl DctEngine {
    /// Creates a new engine with precomputed cosine basis and scale factors
    pub fn new(length: usize) -> Self {
        let mut cosine_table = vec![0f64; length * length];

        for frequency_index in 0..length {
            for sample_index in 0..length {
                cosine_table[frequency_index * length + sample_index] = (PI
                    * (2 * sample_index + 1) as f64
                    * frequency_index as f64
                    / (2 * length) as f64)
                    .cos();
            }
        }

        let scale_factors = (0..length)
            .map(|frequency_index| {
                if frequency_index == 0 {
                    (1.0 / length as f64).sqrt()
                } else {
                    (2.0 / length as f64).sqrt()
                }
            })
            .collect();

        Self {
            length,
            cosine_table,
            scale_factors,
        }
    }

    /// Block length this engine transforms
    pub fn length(&self) -> usize {
        self.length
    }

    /// Computes the forward DCT-II of a block
    pub fn forward(&self, block: &[f64]) -> Result<Vec<f64>> {
        self.check_length(block.len())?;

        let mut coefficients = vec![0f64; self.length];
        for frequency_index in 0..self.length {
            let basis = &self.cosine_table[frequency_index * self.length..][..self.length];

            let mut sum = 0.0;
            for (sample, cosine) in block.iter().zip(basis) {
                sum += sample * cosine;
            }

            coefficients[frequency_index] = self.scale_factors[frequency_index] * sum;
        }

        Ok(coefficients)
    }

    /// Computes the inverse DCT (DCT-III), the exact inverse of [`forward`](Self::forward)
    pub fn inverse(&self, coefficients: &[f64]) -> Result<Vec<f64>> {
        self.check_length(coefficients.len())?;

        let mut samples = vec![0f64; self.length];
        for frequency_index in 0..self.length {
            let scaled = self.scale_factors[frequency_index] * coefficients[frequency_index];
            let basis = &self.cosine_table[frequency_index * self.length..][..self.length];

            for (sample, cosine) in samples.iter_mut().zip(basis) {
                *sample += scaled * cosine;
            }
        }

        Ok(samples)
    }

    fn check_length(&self, actual: usize) -> Result<()> {
        if actual != self.length {
            return Err(CodecError::InvalidInput(format!(
                "block length {} does not match transform length {}",
                actual, self.length
            )));
        }
        Ok(())
    }
}

/// Separable 2D DCT engine over row-major rows x cols blocks
pub struct Dct2dEngine {
    rows: usize,
    cols: usize,
    row_engine: DctEngine,
    column_engine: DctEngine,
}

impl Dct2dEngine {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_engine: DctEngine::new(cols),
            column_engine: DctEngine::new(rows),
        }
    }

    /// Computes the forward 2D DCT-II of a row-major block
    ///
    /// The separable row-then-column passes produce the same result as the
    /// direct double-sum definition with per-axis alpha(u)/alpha(v) scaling.
    pub fn forward(&self, block: &[f64]) -> Result<Vec<f64>> {
        self.check_area(block.len())?;

        // 1D DCT over each row
        let mut transformed = vec![0f64; block.len()];
        for (row_index, row) in block.chunks(self.cols).enumerate() {
            let row_coefficients = self.row_engine.forward(row)?;
            transformed[row_index * self.cols..][..self.cols].copy_from_slice(&row_coefficients);
        }

        // 1D DCT over each column
        let mut column = vec![0f64; self.rows];
        for column_index in 0..self.cols {
            for row_index in 0..self.rows {
                column[row_index] = transformed[row_index * self.cols + column_index];
            }
            let column_coefficients = self.column_engine.forward(&column)?;
            for row_index in 0..self.rows {
                transformed[row_index * self.cols + column_index] = column_coefficients[row_index];
            }
        }

        Ok(transformed)
    }

    /// Computes the inverse 2D DCT, symmetric to [`forward`](Self::forward)
    pub fn inverse(&self, coefficients: &[f64]) -> Result<Vec<f64>> {
        self.check_area(coefficients.len())?;

        // Inverse 1D DCT over each column first
        let mut reconstructed = coefficients.to_vec();
        let mut column = vec![0f64; self.rows];
        for column_index in 0..self.cols {
            for row_index in 0..self.rows {
                column[row_index] = reconstructed[row_index * self.cols + column_index];
            }
            let column_samples = self.column_engine.inverse(&column)?;
            for row_index in 0..self.rows {
                reconstructed[row_index * self.cols + column_index] = column_samples[row_index];
            }
        }

        // Inverse 1D DCT over each row
        for row_index in 0..self.rows {
            let row = &reconstructed[row_index * self.cols..][..self.cols];
            let row_samples = self.row_engine.inverse(row)?;
            reconstructed[row_index * self.cols..][..self.cols].copy_from_slice(&row_samples);
        }

        Ok(reconstructed)
    }

    fn check_area(&self, actual: usize) -> Result<()> {
        if actual != self.rows * self.cols {
            return Err(CodecError::InvalidInput(format!(
                "block length {} does not match {}x{} transform",
                actual, self.rows, self.cols
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn test_signal(length: usize) -> Vec<f64> {
        (0..length)
            .map(|index| (index as f64 * 0.37).sin() + 0.25 * (index as f64 * 1.93).cos())
            .collect()
    }

    #[test]
    fn test_1d_roundtrip_identity() {
        for length in [1, 8, 256] {
            let engine = DctEngine::new(length);
            let signal = test_signal(length);

            let coefficients = engine.forward(&signal).unwrap();
            let reconstructed = engine.inverse(&coefficients).unwrap();

            for (index, (original, recovered)) in
                signal.iter().zip(reconstructed.iter()).enumerate()
            {
                assert!(
                    (original - recovered).abs() < TOLERANCE,
                    "1D roundtrip failed at index {} for length {}: {} vs {}",
                    index,
                    length,
                    original,
                    recovered
                );
            }
        }
    }

    #[test]
    fn test_forward_matches_direct_formula_on_basis_vectors() {
        for length in [1, 8, 256] {
            let engine = DctEngine::new(length);

            for basis_index in [0, length / 2, length - 1] {
                let mut basis_vector = vec![0f64; length];
                basis_vector[basis_index] = 1.0;

                let coefficients = engine.forward(&basis_vector).unwrap();

                for frequency_index in 0..length {
                    let scale = if frequency_index == 0 {
                        (1.0 / length as f64).sqrt()
                    } else {
                        (2.0 / length as f64).sqrt()
                    };
                    let expected = scale
                        * (PI * (2 * basis_index + 1) as f64 * frequency_index as f64
                            / (2 * length) as f64)
                            .cos();

                    assert!(
                        (coefficients[frequency_index] - expected).abs() < TOLERANCE,
                        "coefficient {} of e_{} (length {}) was {}, expected {}",
                        frequency_index,
                        basis_index,
                        length,
                        coefficients[frequency_index],
                        expected
                    );
                }
            }
        }
    }

    #[test]
    fn test_dc_coefficient_of_constant_block() {
        let engine = DctEngine::new(8);
        let coefficients = engine.forward(&[100.0; 8]).unwrap();

        // A constant block has all its energy in the DC coefficient
        assert!((coefficients[0] - 100.0 * 8f64.sqrt()).abs() < TOLERANCE);
        for &coefficient in &coefficients[1..] {
            assert!(coefficient.abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_2d_roundtrip_identity() {
        let engine = Dct2dEngine::new(8, 8);
        let block: Vec<f64> = (0..64).map(|index| ((index * 7) % 256) as f64).collect();

        let coefficients = engine.forward(&block).unwrap();
        let reconstructed = engine.inverse(&coefficients).unwrap();

        for (index, (original, recovered)) in block.iter().zip(reconstructed.iter()).enumerate() {
            assert!(
                (original - recovered).abs() < TOLERANCE,
                "2D roundtrip failed at index {}: {} vs {}",
                index,
                original,
                recovered
            );
        }
    }

    #[test]
    fn test_2d_matches_direct_double_sum() {
        let rows = 4;
        let cols = 8;
        let engine = Dct2dEngine::new(rows, cols);
        let block: Vec<f64> = (0..rows * cols).map(|index| (index as f64 * 0.61).sin()).collect();

        let separable = engine.forward(&block).unwrap();

        for u in 0..rows {
            for v in 0..cols {
                let alpha_u = if u == 0 { (1.0 / rows as f64).sqrt() } else { (2.0 / rows as f64).sqrt() };
                let alpha_v = if v == 0 { (1.0 / cols as f64).sqrt() } else { (2.0 / cols as f64).sqrt() };

                let mut sum = 0.0;
                for x in 0..rows {
                    for y in 0..cols {
                        sum += block[x * cols + y]
                            * (PI * (2 * x + 1) as f64 * u as f64 / (2 * rows) as f64).cos()
                            * (PI * (2 * y + 1) as f64 * v as f64 / (2 * cols) as f64).cos();
                    }
                }
                let direct = alpha_u * alpha_v * sum;

                assert!(
                    (separable[u * cols + v] - direct).abs() < TOLERANCE,
                    "separable and direct 2D DCT disagree at ({}, {})",
                    u,
                    v
                );
            }
        }
    }

    #[test]
    fn test_mismatched_block_length_is_rejected() {
        let engine = DctEngine::new(8);
        assert!(engine.forward(&[0.0; 7]).is_err());
        assert!(engine.inverse(&[0.0; 9]).is_err());

        let engine_2d = Dct2dEngine::new(8, 8);
        assert!(engine_2d.forward(&[0.0; 63]).is_err());
        assert!(engine_2d.inverse(&[0.0; 65]).is_err());
    }
}
