//! Rectangle-fit layout: find the dark region of a background and fit one
//! candidate image into it.
//!
//! The region is the union bounding box of all 8-connected dark components
//! that are large enough to not be noise. Candidates are matched to the region
//! by aspect ratio, scaled to fit inside it, and centered.
use image::{DynamicImage, GrayImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

use crate::path::morphology::{binarize, BinaryMask};

pub mod aspect;
pub mod layout;

pub use aspect::{aspect_ratio_difference, filter_by_aspect_ratio, AspectFilter};
pub use layout::{
    fit_size, fit_within, run_rect_layout, RectLayoutConfig, RectLayoutResult, RectOutcome,
    RectSelection,
};

pub const DEFAULT_DARK_THRESHOLD: u8 = 128;
/// Components whose bounding box covers fewer pixels are ignored.
pub const DEFAULT_MIN_AREA: u32 = 10;

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width over height; `0.0` for a zero-height rect.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    /// Smallest rect containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

/// Bounding box of the dark content of `image`.
pub fn find_dark_bounds(image: &DynamicImage, threshold: u8, min_area: u32) -> Option<Rect> {
    find_dark_bounds_luma(&image.to_luma8(), threshold, min_area)
}

/// Bounding box of all dark components of a luma image.
///
/// Pixels at or below `threshold` are dark. Returns `None` when no component
/// reaches `min_area`.
pub fn find_dark_bounds_luma(luma: &GrayImage, threshold: u8, min_area: u32) -> Option<Rect> {
    let mask = binarize(luma, threshold);
    component_bounds(&mask)
        .into_iter()
        .filter(|r| r.area() >= min_area as u64)
        .reduce(|a, b| a.union(&b))
}

/// Bounding boxes of the 8-connected foreground components, in scan order of
/// their first pixel. Components are the outer borders found by
/// border following; holes and their borders do not add boxes.
pub fn component_bounds(mask: &BinaryMask) -> Vec<Rect> {
    if mask.is_empty() {
        return Vec::new();
    }
    // One pixel of padding so components touching the image edge are closed.
    find_contours::<i32>(&mask.to_gray(1))
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer))
        .filter_map(|c| contour_bounds(&c.points, 1))
        .collect()
}

fn contour_bounds(points: &[Point<i32>], pad: i32) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Rect::new(
        (min_x - pad) as u32,
        (min_y - pad) as u32,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    ))
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;

    fn canvas(w: u32, h: u32) -> GrayImage {
        GrayImage::from_pixel(w, h, Luma([255]))
    }

    fn fill(img: &mut GrayImage, r: Rect) {
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                img.put_pixel(x, y, Luma([0]));
            }
        }
    }

    #[test]
    fn single_block_bounds() {
        let mut img = canvas(50, 40);
        fill(&mut img, Rect::new(10, 5, 20, 8));
        assert_eq!(
            find_dark_bounds_luma(&img, 128, 10),
            Some(Rect::new(10, 5, 20, 8))
        );
    }

    #[test]
    fn union_of_components_ignores_specks() {
        let mut img = canvas(60, 60);
        fill(&mut img, Rect::new(5, 5, 10, 10));
        fill(&mut img, Rect::new(40, 30, 10, 5));
        fill(&mut img, Rect::new(58, 58, 2, 2));
        assert_eq!(
            find_dark_bounds_luma(&img, 128, DEFAULT_MIN_AREA),
            Some(Rect::new(5, 5, 45, 30))
        );
    }

    #[test]
    fn diagonal_pixels_join_one_component() {
        let mut mask = BinaryMask::new(4, 4);
        for i in 0..4 {
            mask.set(i, i, true);
        }
        assert_eq!(component_bounds(&mask), vec![Rect::new(0, 0, 4, 4)]);
    }

    #[test]
    fn ring_counts_once_and_its_island_separately() {
        let mut mask = BinaryMask::new(12, 12);
        for i in 1..11 {
            mask.set(i, 1, true);
            mask.set(i, 10, true);
            mask.set(1, i, true);
            mask.set(10, i, true);
        }
        mask.set(5, 5, true);
        mask.set(6, 5, true);
        assert_eq!(
            component_bounds(&mask),
            vec![Rect::new(1, 1, 10, 10), Rect::new(5, 5, 2, 1)]
        );
    }

    #[test]
    fn components_touching_the_border_keep_their_edges() {
        let mut img = canvas(20, 10);
        fill(&mut img, Rect::new(0, 0, 20, 3));
        fill(&mut img, Rect::new(15, 7, 5, 3));
        assert_eq!(
            find_dark_bounds_luma(&img, 128, 1),
            Some(Rect::new(0, 0, 20, 10))
        );
    }

    #[test]
    fn blank_image_has_no_bounds() {
        assert_eq!(find_dark_bounds_luma(&canvas(8, 8), 128, 1), None);
        assert_eq!(find_dark_bounds_luma(&GrayImage::new(0, 0), 128, 1), None);
    }

    #[test]
    fn rect_helpers() {
        let r = Rect::new(2, 3, 4, 2);
        assert_eq!((r.right(), r.bottom(), r.area()), (6, 5, 8));
        assert_eq!(r.aspect_ratio(), 2.0);
        assert_eq!(Rect::new(0, 0, 3, 0).aspect_ratio(), 0.0);
    }
}
