//! Mean-threshold perceptual hash.
//!
//! The image is shrunk to a small grayscale grid and every cell becomes one
//! bit: set when brighter than the grid mean. Bits are packed four to a hex
//! digit in raster order. The hash shrugs off compression noise and sub-pixel
//! rendering differences, and misses fine layout changes; it only decides
//! which pages are worth the SSIM pass.

use crate::visual::grayscale::GrayGrid;
use image::DynamicImage;

/// Hash a grid that is already reduced to the hash size.
pub fn hash_grid(grid: &GrayGrid) -> String {
    let mean = grid.mean();
    grid.pixels()
        .chunks(4)
        .map(|nibble| {
            let value = nibble
                .iter()
                .fold(0u32, |acc, &v| (acc << 1) | u32::from(v as f64 > mean));
            // Pad a short trailing chunk so every digit carries 4 bits.
            let value = value << (4 - nibble.len());
            char::from_digit(value, 16).unwrap_or('0')
        })
        .collect()
}

/// Perceptual hash of `image` over a `grid_size`×`grid_size` grid.
pub fn compute_perceptual_hash(image: &DynamicImage, grid_size: u32) -> String {
    hash_grid(&GrayGrid::from_image(image, grid_size))
}

/// Number of differing bits, or `None` when the hashes are not comparable
/// (different lengths or non-hex characters), which stands for infinity.
pub fn hamming_distance(a: &str, b: &str) -> Option<u32> {
    if a.len() != b.len() {
        return None;
    }
    a.chars().zip(b.chars()).try_fold(0u32, |acc, (x, y)| {
        let x = x.to_digit(16)?;
        let y = y.to_digit(16)?;
        Some(acc + (x ^ y).count_ones())
    })
}

/// `1 - distance / bits`; zero for incomparable or empty hashes.
pub fn phash_similarity(a: &str, b: &str) -> f64 {
    let total_bits = a.len() * 4;
    if total_bits == 0 {
        return 0.0;
    }
    match hamming_distance(a, b) {
        Some(distance) => 1.0 - distance as f64 / total_bits as f64,
        None => 0.0,
    }
}
