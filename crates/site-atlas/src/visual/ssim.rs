//! Windowed structural similarity (SSIM) and a coarse pixel diff.

use crate::config::AnalysisConfig;
use crate::visual::grayscale::GrayGrid;
use image::DynamicImage;
use serde::Serialize;

// (0.01 * 255)^2 and (0.03 * 255)^2
const C1: f64 = 6.5025;
const C2: f64 = 58.5225;

/// Luminance delta above which two pixels count as different.
pub const PIXEL_DIFF_THRESHOLD: f32 = 25.0;

/// Mean SSIM over non-overlapping `window`×`window` tiles.
///
/// Grids of different sizes, or a window larger than the grid, score 0.
pub fn ssim(a: &GrayGrid, b: &GrayGrid, window: u32) -> f64 {
    let size = a.size();
    if size != b.size() || window == 0 || window > size {
        return 0.0;
    }

    let n = (window * window) as f64;
    let mut total = 0.0;
    let mut windows = 0usize;

    for y in (0..=size - window).step_by(window as usize) {
        for x in (0..=size - window).step_by(window as usize) {
            let (mut sum_a, mut sum_b) = (0.0f64, 0.0f64);
            let (mut sq_a, mut sq_b, mut cross) = (0.0f64, 0.0f64, 0.0f64);

            for wy in 0..window {
                for wx in 0..window {
                    let va = a.get(x + wx, y + wy) as f64;
                    let vb = b.get(x + wx, y + wy) as f64;
                    sum_a += va;
                    sum_b += vb;
                    sq_a += va * va;
                    sq_b += vb * vb;
                    cross += va * vb;
                }
            }

            let mu_a = sum_a / n;
            let mu_b = sum_b / n;
            let var_a = sq_a / n - mu_a * mu_a;
            let var_b = sq_b / n - mu_b * mu_b;
            let covar = cross / n - mu_a * mu_b;

            let num = (2.0 * mu_a * mu_b + C1) * (2.0 * covar + C2);
            let den = (mu_a * mu_a + mu_b * mu_b + C1) * (var_a + var_b + C2);
            total += num / den;
            windows += 1;
        }
    }

    if windows == 0 {
        0.0
    } else {
        total / windows as f64
    }
}

/// SSIM of two images, each resized independently to the configured grid.
pub fn compute_ssim(a: &DynamicImage, b: &DynamicImage, config: &AnalysisConfig) -> f64 {
    let grid_a = GrayGrid::from_image(a, config.ssim_grid_size);
    let grid_b = GrayGrid::from_image(b, config.ssim_grid_size);
    ssim(&grid_a, &grid_b, config.ssim_window)
}

/// Share of grayscale pixels that differ noticeably between two images.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelDiff {
    pub diff_ratio: f64,
    pub diff_count: usize,
}

/// Compare two images pixel by pixel on a `grid_size`×`grid_size` grid.
pub fn pixel_diff(a: &DynamicImage, b: &DynamicImage, grid_size: u32) -> PixelDiff {
    let grid_a = GrayGrid::from_image(a, grid_size);
    let grid_b = GrayGrid::from_image(b, grid_size);
    let total = grid_a.pixels().len();
    if total == 0 {
        return PixelDiff {
            diff_ratio: 0.0,
            diff_count: 0,
        };
    }

    let diff_count = grid_a
        .pixels()
        .iter()
        .zip(grid_b.pixels())
        .filter(|(va, vb)| (*va - *vb).abs() > PIXEL_DIFF_THRESHOLD)
        .count();

    PixelDiff {
        diff_ratio: diff_count as f64 / total as f64,
        diff_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([value, value, value])))
    }

    fn checker(cell: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(128, 128, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        }))
    }

    #[test]
    fn test_identical_images_score_one() {
        let config = AnalysisConfig::default();
        let score = compute_ssim(&checker(16), &checker(16), &config);
        assert!((score - 1.0).abs() < 1e-9, "score = {score}");
    }

    #[test]
    fn test_opposite_images_score_low() {
        let config = AnalysisConfig::default();
        let score = compute_ssim(&solid(0), &solid(255), &config);
        assert!(score < 0.01, "score = {score}");
    }

    #[test]
    fn test_score_is_symmetric() {
        let config = AnalysisConfig::default();
        let a = checker(16);
        let b = checker(32);
        let ab = compute_ssim(&a, &b, &config);
        let ba = compute_ssim(&b, &a, &config);
        assert!((ab - ba).abs() < 1e-12);
        assert!(ab < 0.75);
    }

    #[test]
    fn test_mismatched_grids_score_zero() {
        let a = GrayGrid::from_image(&solid(10), 16);
        let b = GrayGrid::from_image(&solid(10), 32);
        assert_eq!(ssim(&a, &b, 8), 0.0);
        assert_eq!(ssim(&a, &a, 32), 0.0);
        assert_eq!(ssim(&a, &a, 0), 0.0);
    }

    #[test]
    fn test_pixel_diff() {
        let same = pixel_diff(&solid(100), &solid(110), 32);
        assert_eq!(same.diff_count, 0);
        assert_eq!(same.diff_ratio, 0.0);

        let different = pixel_diff(&solid(0), &solid(200), 32);
        assert_eq!(different.diff_count, 32 * 32);
        assert_eq!(different.diff_ratio, 1.0);
    }
}
