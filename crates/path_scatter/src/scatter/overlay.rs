//! Debug preview of a layout: every path pixel plus a stamp per selected point.
use glam::{IVec2, UVec2};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::path::Path;

/// Colors and stamp size for [`render_points_preview`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PreviewStyle {
    pub path_color: [u8; 4],
    pub point_color: [u8; 4],
    /// Radius of the disc stamped at each selected point; `0` marks a single pixel.
    pub point_radius_px: i32,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            path_color: [255, 0, 0, 255],
            point_color: [0, 255, 0, 255],
            point_radius_px: 3,
        }
    }
}

/// Render a transparent `size` raster marking `path` and the `selected` points.
///
/// Selected points are drawn after the path, so they stay visible where they
/// overlap it. Anything outside the raster is skipped.
pub fn render_points_preview(
    size: UVec2,
    path: &Path,
    selected: &[IVec2],
    style: &PreviewStyle,
) -> RgbaImage {
    let mut out = RgbaImage::new(size.x, size.y);
    if size.x == 0 || size.y == 0 {
        return out;
    }

    let w_i = size.x as i32;
    let h_i = size.y as i32;
    let path_color = Rgba(style.path_color);
    for p in path.points() {
        if (0..w_i).contains(&p.x) && (0..h_i).contains(&p.y) {
            out.put_pixel(p.x as u32, p.y as u32, path_color);
        }
    }

    let radius = style.point_radius_px.max(0);
    let point_color = Rgba(style.point_color);
    for &p in selected {
        draw_filled_circle_mut(&mut out, (p.x, p.y), radius, point_color);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_path_and_points() {
        let path = Path::new(vec![IVec2::new(1, 1), IVec2::new(8, 8)], 10, 10);
        let img = render_points_preview(
            UVec2::new(10, 10),
            &path,
            &[IVec2::new(8, 8)],
            &PreviewStyle::default(),
        );
        assert_eq!(img.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(8, 8), &Rgba([0, 255, 0, 255]));
        assert_eq!(img.get_pixel(8, 5), &Rgba([0, 255, 0, 255]));
        assert_eq!(img.get_pixel(5, 5)[3], 0);
    }

    #[test]
    fn stamps_are_clipped_at_edges() {
        let path = Path::new(Vec::new(), 4, 4);
        let style = PreviewStyle {
            point_radius_px: 2,
            ..PreviewStyle::default()
        };
        let img = render_points_preview(UVec2::new(4, 4), &path, &[IVec2::new(0, 0)], &style);
        assert_eq!(img.get_pixel(0, 0)[1], 255);
        assert_eq!(img.get_pixel(2, 0)[1], 255);
        assert_eq!(img.get_pixel(2, 2)[3], 0);
    }

    #[test]
    fn zero_radius_marks_one_pixel() {
        let path = Path::new(Vec::new(), 5, 5);
        let style = PreviewStyle {
            point_radius_px: 0,
            ..PreviewStyle::default()
        };
        let img = render_points_preview(UVec2::new(5, 5), &path, &[IVec2::new(2, 2)], &style);
        let marked = img.pixels().filter(|p| p[3] != 0).count();
        assert_eq!(marked, 1);
        assert_eq!(img.get_pixel(2, 2), &Rgba(style.point_color));
    }

    #[test]
    fn stamps_far_outside_are_skipped() {
        let path = Path::new(vec![IVec2::new(1, 1)], 4, 4);
        let img = render_points_preview(
            UVec2::new(4, 4),
            &path,
            &[IVec2::new(-50, 80)],
            &PreviewStyle::default(),
        );
        assert_eq!(img.pixels().filter(|p| p[3] != 0).count(), 1);
    }

    #[test]
    fn empty_size_gives_empty_image() {
        let path = Path::new(Vec::new(), 0, 0);
        let style = PreviewStyle::default();
        let img = render_points_preview(UVec2::ZERO, &path, &[IVec2::ZERO], &style);
        assert_eq!(img.dimensions(), (0, 0));
    }
}
