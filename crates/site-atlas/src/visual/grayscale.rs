//! Fixed-size luminance grids used by the image comparators.

use image::imageops::FilterType;
use image::DynamicImage;

/// A square grid of luminance values in `[0, 255]`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayGrid {
    size: u32,
    pixels: Vec<f32>,
}

impl GrayGrid {
    /// Resize `image` to `size`×`size` (aspect ratio ignored) and convert to
    /// luminance with ITU-R BT.601 weights.
    pub fn from_image(image: &DynamicImage, size: u32) -> Self {
        let resized = image
            .resize_exact(size, size, FilterType::Triangle)
            .to_rgb8();
        let pixels = resized
            .pixels()
            .map(|p| 0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32)
            .collect();
        Self { size, pixels }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.pixels[(y * self.size + x) as usize]
    }

    pub fn mean(&self) -> f64 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        self.pixels.iter().map(|&v| v as f64).sum::<f64>() / self.pixels.len() as f64
    }
}
