//! Aspect-ratio comparison and filtering.
use image::RgbaImage;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Relative difference between two aspect ratios: `max / min - 1`.
///
/// `0.0` is a perfect match. Non-positive input never matches.
pub fn aspect_ratio_difference(a: f64, b: f64) -> f64 {
    if a <= 0.0 || b <= 0.0 || !a.is_finite() || !b.is_finite() {
        return f64::INFINITY;
    }
    a.max(b) / a.min(b) - 1.0
}

/// Width over height of an image; `0.0` for a zero-height image.
pub fn image_aspect_ratio(image: &RgbaImage) -> f64 {
    let (w, h) = image.dimensions();
    if h == 0 {
        0.0
    } else {
        w as f64 / h as f64
    }
}

/// Indices of `images` whose aspect ratio lies in `[min, max]`, in input order.
pub fn filter_by_aspect_ratio(images: &[RgbaImage], min: f64, max: f64) -> Vec<usize> {
    images
        .iter()
        .enumerate()
        .filter(|(_, img)| {
            let ratio = image_aspect_ratio(img);
            min <= ratio && ratio <= max
        })
        .map(|(i, _)| i)
        .collect()
}

/// An inclusive aspect-ratio window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AspectFilter {
    pub min: f64,
    pub max: f64,
}

impl Default for AspectFilter {
    fn default() -> Self {
        Self { min: 1.0, max: 1.2 }
    }
}

impl AspectFilter {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn matches(&self, image: &RgbaImage) -> bool {
        let ratio = image_aspect_ratio(image);
        self.min <= ratio && ratio <= self.max
    }

    /// Matching indices, or `None` when nothing matches so the caller can
    /// substitute a default image.
    pub fn apply(&self, images: &[RgbaImage]) -> Option<Vec<usize>> {
        let kept = filter_by_aspect_ratio(images, self.min, self.max);
        debug!(
            "Aspect filter [{}, {}] kept {} of {} images.",
            self.min,
            self.max,
            kept.len(),
            images.len()
        );
        (!kept.is_empty()).then_some(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::new(w, h)
    }

    #[test]
    fn difference_is_symmetric_and_relative() {
        assert_eq!(aspect_ratio_difference(2.0, 1.0), 1.0);
        assert_eq!(aspect_ratio_difference(1.0, 2.0), 1.0);
        assert_eq!(aspect_ratio_difference(1.5, 1.5), 0.0);
        assert!(aspect_ratio_difference(0.0, 1.0).is_infinite());
        assert!(aspect_ratio_difference(1.0, -2.0).is_infinite());
    }

    #[test]
    fn filter_keeps_inclusive_window_in_order() {
        let images = vec![blank(10, 10), blank(30, 10), blank(12, 10), blank(5, 10)];
        assert_eq!(filter_by_aspect_ratio(&images, 1.0, 1.2), vec![0, 2]);
    }

    #[test]
    fn apply_returns_none_without_matches() {
        let images = vec![blank(30, 10)];
        assert_eq!(AspectFilter::default().apply(&images), None);
        assert_eq!(AspectFilter::new(2.0, 4.0).apply(&images), Some(vec![0]));
        assert!(!AspectFilter::default().matches(&blank(4, 0)));
    }
}
