use crate::dct::DctEngine;
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};

/// Default number of samples per transform block
pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// Default magnitude threshold below which coefficients are discarded
pub const DEFAULT_THRESHOLD: f64 = 0.09;

/// Compressed representation of a 1D sample sequence
///
/// One coefficient block per input block, in block order. Carries everything
/// needed to invert: the original length and the codec parameters used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedAudio {
    pub blocks: Vec<Vec<f64>>,
    pub original_length: usize,
    pub block_size: usize,
    pub threshold: f64,
    pub retained_coefficients: usize,
}

/// Compresses a sample sequence by thresholding its per-block DCT coefficients
///
/// The final block is zero-padded to `block_size`. A coefficient survives only
/// when its magnitude strictly exceeds `threshold`; a coefficient exactly equal
/// to the threshold is discarded.
pub fn compress(samples: &[f64], block_size: usize, threshold: f64) -> Result<CompressedAudio> {
    if block_size == 0 {
        return Err(CodecError::InvalidInput(
            "block size must be positive".to_string(),
        ));
    }
    if let Some(position) = samples.iter().position(|sample| !sample.is_finite()) {
        return Err(CodecError::InvalidInput(format!(
            "non-finite sample at index {}",
            position
        )));
    }

    let engine = DctEngine::new(block_size);
    let mut blocks = Vec::with_capacity(samples.len().div_ceil(block_size));
    let mut retained_coefficients = 0usize;
    let mut padded = vec![0f64; block_size];

    for chunk in samples.chunks(block_size) {
        let coefficients = if chunk.len() == block_size {
            engine.forward(chunk)?
        } else {
            padded[..chunk.len()].copy_from_slice(chunk);
            padded[chunk.len()..].fill(0.0);
            engine.forward(&padded)?
        };

        let thresholded = coefficients
            .into_iter()
            .map(|coefficient| {
                if coefficient.abs() > threshold {
                    retained_coefficients += 1;
                    coefficient
                } else {
                    0.0
                }
            })
            .collect();

        blocks.push(thresholded);
    }

    Ok(CompressedAudio {
        blocks,
        original_length: samples.len(),
        block_size,
        threshold,
        retained_coefficients,
    })
}

/// Reconstructs an approximate sample sequence from its compressed form
///
/// Inverse-transforms each block, concatenates in block order and truncates to
/// the recorded original length, discarding the compression-time padding.
pub fn decompress(compressed: &CompressedAudio) -> Result<Vec<f64>> {
    if compressed.block_size == 0 {
        return Err(CodecError::InvalidInput(
            "block size must be positive".to_string(),
        ));
    }

    let engine = DctEngine::new(compressed.block_size);
    let mut samples = Vec::with_capacity(compressed.blocks.len() * compressed.block_size);

    for block in &compressed.blocks {
        samples.extend(engine.inverse(block)?);
    }

    samples.truncate(compressed.original_length);
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signal(length: usize) -> Vec<f64> {
        (0..length)
            .map(|index| {
                let t = index as f64 / 64.0;
                0.6 * (t * std::f64::consts::TAU).sin() + 0.2 * (3.0 * t * std::f64::consts::TAU).sin()
            })
            .collect()
    }

    #[test]
    fn test_length_preservation() {
        for length in [0, 1, 255, 256, 257, 1000] {
            let samples = test_signal(length);
            let compressed = compress(&samples, DEFAULT_BLOCK_SIZE, DEFAULT_THRESHOLD).unwrap();
            let reconstructed = decompress(&compressed).unwrap();

            assert_eq!(
                reconstructed.len(),
                length,
                "decompressed length mismatch for input length {}",
                length
            );
        }
    }

    #[test]
    fn test_block_count_and_shape() {
        let samples = test_signal(1000);
        let compressed = compress(&samples, 256, 0.09).unwrap();

        assert_eq!(compressed.blocks.len(), 4);
        for block in &compressed.blocks {
            assert_eq!(block.len(), 256);
        }
        assert_eq!(compressed.original_length, 1000);
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        let samples = test_signal(256);
        let threshold = 0.09;
        let compressed = compress(&samples, 256, threshold).unwrap();

        let engine = DctEngine::new(256);
        let reference = engine.forward(&samples).unwrap();

        let mut survivors = 0usize;
        for (kept, original) in compressed.blocks[0].iter().zip(reference.iter()) {
            if original.abs() > threshold {
                assert_eq!(*kept, *original, "surviving coefficient was altered");
                survivors += 1;
            } else {
                assert_eq!(*kept, 0.0, "sub-threshold coefficient was not zeroed");
            }
        }
        assert_eq!(compressed.retained_coefficients, survivors);
    }

    #[test]
    fn test_coefficient_exactly_at_threshold_is_discarded() {
        // A single-sample block transforms to itself scaled by sqrt(1/1) = 1,
        // so the lone coefficient equals the input sample exactly.
        let compressed = compress(&[0.09], 1, 0.09).unwrap();
        assert_eq!(compressed.blocks[0][0], 0.0);
        assert_eq!(compressed.retained_coefficients, 0);

        let compressed = compress(&[0.090000001], 1, 0.09).unwrap();
        assert_eq!(compressed.retained_coefficients, 1);
    }

    #[test]
    fn test_roundtrip_at_full_retention_is_lossless() {
        // A negative threshold retains every coefficient
        let samples = test_signal(300);
        let compressed = compress(&samples, 256, -1.0).unwrap();
        let reconstructed = decompress(&compressed).unwrap();

        for (original, recovered) in samples.iter().zip(reconstructed.iter()) {
            assert!((original - recovered).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_input_produces_no_blocks() {
        let compressed = compress(&[], 256, 0.09).unwrap();
        assert!(compressed.blocks.is_empty());
        assert_eq!(compressed.retained_coefficients, 0);
        assert!(decompress(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_non_finite_samples_are_rejected() {
        assert!(compress(&[0.0, f64::NAN], 256, 0.09).is_err());
        assert!(compress(&[f64::INFINITY], 256, 0.09).is_err());
    }

    #[test]
    fn test_zero_block_size_is_rejected() {
        assert!(compress(&[0.5; 16], 0, 0.09).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let samples = test_signal(300);
        let compressed = compress(&samples, 256, 0.09).unwrap();

        let json = serde_json::to_string(&compressed).unwrap();
        let restored: CompressedAudio = serde_json::from_str(&json).unwrap();

        assert_eq!(decompress(&restored).unwrap(), decompress(&compressed).unwrap());
    }
}
