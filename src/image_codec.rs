use crate::dct::Dct2dEngine;
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};

/// Side length of the square transform tiles
pub const TILE_SIZE: usize = 8;

/// Default number of coefficients retained per tile
pub const DEFAULT_KEEP_COEFFICIENTS: usize = 32;

/// Compressed representation of a single-channel pixel grid
///
/// One flattened coefficient tile per 8x8 input tile, in row-major tile order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedImage {
    pub tiles: Vec<Vec<f64>>,
    pub width: usize,
    pub height: usize,
    pub tile_size: usize,
    pub keep_coefficients: usize,
    pub retained_coefficients: usize,
}

/// Coefficient indices of one tile in low-frequency-first selection order
///
/// Ascending (row + col) index sum; ties keep row-major order via the stable
/// sort. This diagonal ordering is a deliberate approximation of true zigzag
/// traversal and changes which coefficients are retained for tied diagonals.
fn selection_order(tile_size: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tile_size * tile_size).collect();
    order.sort_by_key(|&index| index / tile_size + index % tile_size);
    order
}

/// Compresses a pixel grid by keeping the lowest-frequency DCT coefficients
/// of each 8x8 tile
///
/// Tiles overrunning the grid boundary replicate the nearest in-bounds pixel,
/// clamped independently per axis.
pub fn compress(
    pixels: &[u8],
    width: usize,
    height: usize,
    keep_coefficients: usize,
) -> Result<CompressedImage> {
    if width == 0 || height == 0 {
        return Err(CodecError::InvalidInput(
            "image dimensions must be positive".to_string(),
        ));
    }
    if pixels.len() != width * height {
        return Err(CodecError::InvalidInput(format!(
            "pixel buffer length {} does not match {}x{} image",
            pixels.len(),
            width,
            height
        )));
    }
    let tile_area = TILE_SIZE * TILE_SIZE;
    if keep_coefficients == 0 || keep_coefficients > tile_area {
        return Err(CodecError::InvalidInput(format!(
            "keep count {} outside 1..={}",
            keep_coefficients, tile_area
        )));
    }

    let engine = Dct2dEngine::new(TILE_SIZE, TILE_SIZE);
    let order = selection_order(TILE_SIZE);
    let mut tiles = Vec::new();
    let mut retained_coefficients = 0usize;
    let mut tile = vec![0f64; tile_area];

    for tile_row in (0..height).step_by(TILE_SIZE) {
        for tile_col in (0..width).step_by(TILE_SIZE) {
            // Extract with edge replication for partial boundary tiles
            for row_offset in 0..TILE_SIZE {
                let source_row = (tile_row + row_offset).min(height - 1);
                for col_offset in 0..TILE_SIZE {
                    let source_col = (tile_col + col_offset).min(width - 1);
                    tile[row_offset * TILE_SIZE + col_offset] =
                        pixels[source_row * width + source_col] as f64;
                }
            }

            let coefficients = engine.forward(&tile)?;

            let mut selected = vec![0f64; tile_area];
            for &index in &order[..keep_coefficients] {
                selected[index] = coefficients[index];
                retained_coefficients += 1;
            }

            tiles.push(selected);
        }
    }

    Ok(CompressedImage {
        tiles,
        width,
        height,
        tile_size: TILE_SIZE,
        keep_coefficients,
        retained_coefficients,
    })
}

/// Reconstructs an approximate pixel grid from its compressed form
///
/// Boundary tiles write back through the same clamped addressing used during
/// compression, so replicated edge pixels resolve to the last tile in
/// row-major order. Values are rounded and clamped to the pixel range.
pub fn decompress(compressed: &CompressedImage) -> Result<Vec<u8>> {
    let width = compressed.width;
    let height = compressed.height;
    let tile_size = compressed.tile_size;

    if width == 0 || height == 0 || tile_size == 0 {
        return Err(CodecError::InvalidInput(
            "image and tile dimensions must be positive".to_string(),
        ));
    }

    let engine = Dct2dEngine::new(tile_size, tile_size);
    let mut pixels = vec![0u8; width * height];
    let mut tile_iter = compressed.tiles.iter();

    for tile_row in (0..height).step_by(tile_size) {
        for tile_col in (0..width).step_by(tile_size) {
            let tile = tile_iter.next().ok_or_else(|| {
                CodecError::InvalidInput("missing coefficient tile".to_string())
            })?;
            let reconstructed = engine.inverse(tile)?;

            for row_offset in 0..tile_size {
                let target_row = (tile_row + row_offset).min(height - 1);
                for col_offset in 0..tile_size {
                    let target_col = (tile_col + col_offset).min(width - 1);
                    let value = reconstructed[row_offset * tile_size + col_offset]
                        .round()
                        .clamp(0.0, 255.0);
                    pixels[target_row * width + target_col] = value as u8;
                }
            }
        }
    }

    Ok(pixels)
}
