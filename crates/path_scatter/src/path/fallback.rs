//! Synthetic circular path used when extraction yields too few points.
use std::f32::consts::TAU;

use glam::{IVec2, Vec2};

use crate::path::Path;

/// Build a circle of `count` points around the image center.
///
/// `radius` defaults to a quarter of the shorter image side. Points are clamped
/// into the image, so a circle larger than the image hugs its border.
pub fn circle_path(width: u32, height: u32, radius: Option<f32>, count: usize) -> Path {
    let count = count.max(1);
    let center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
    let radius = radius
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or_else(|| (width.min(height) as f32 / 4.0).max(1.0));

    let max_x = width.saturating_sub(1) as i32;
    let max_y = height.saturating_sub(1) as i32;

    let points = (0..count)
        .map(|i| {
            let theta = TAU * i as f32 / count as f32;
            let p = center + Vec2::new(theta.cos(), theta.sin()) * radius;
            IVec2::new(
                (p.x.round() as i32).clamp(0, max_x),
                (p.y.round() as i32).clamp(0, max_y),
            )
        })
        .collect();

    Path::new(points, width, height)
}
