use crate::error::{CodecError, Result};

/// Maximum representable value of an 8-bit pixel, the usual PSNR peak
pub const PIXEL_PEAK: f64 = 255.0;

/// Mean squared error between an original buffer and its reconstruction
///
/// Mismatched lengths and empty buffers are rejected rather than silently
/// truncated to a common prefix.
pub fn mean_squared_error(original: &[f64], reconstructed: &[f64]) -> Result<f64> {
    if original.is_empty() || reconstructed.is_empty() {
        return Err(CodecError::InvalidInput(
            "cannot compute MSE of an empty buffer".to_string(),
        ));
    }
    if original.len() != reconstructed.len() {
        return Err(CodecError::InvalidInput(format!(
            "buffer lengths differ: {} vs {}",
            original.len(),
            reconstructed.len()
        )));
    }

    let sum: f64 = original
        .iter()
        .zip(reconstructed.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum();

    Ok(sum / original.len() as f64)
}

/// Peak signal-to-noise ratio in dB for a given MSE and peak signal value
///
/// A zero MSE means a perfect reconstruction and yields the infinity sentinel.
pub fn peak_signal_to_noise_ratio(mse: f64, max_value: f64) -> f64 {
    if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * ((max_value * max_value) / mse).log10()
    }
}

/// Ratio of original sample/pixel count to retained coefficient count
pub fn compression_ratio(original_size: usize, retained_coefficients: usize) -> Result<f64> {
    if retained_coefficients == 0 {
        return Err(CodecError::InvalidInput(
            "retained coefficient count must be positive".to_string(),
        ));
    }
    Ok(original_size as f64 / retained_coefficients as f64)
}
