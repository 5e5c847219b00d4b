//! Solid-color images with a linear alpha ramp.
use image::RgbaImage;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Rgb8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GradientDirection {
    /// Alpha ramps left to right.
    #[default]
    Horizontal,
    /// Alpha ramps top to bottom.
    Vertical,
}

/// A gradient: transparent before `start`, ramping to opaque at `end`, opaque after.
///
/// `start` and `end` are fractions of the ramp axis. `reverse` mirrors the
/// result along that axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GradientSpec {
    pub hex_color: String,
    pub width: u32,
    pub height: u32,
    pub start: f32,
    pub end: f32,
    pub direction: GradientDirection,
    pub reverse: bool,
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self {
            hex_color: "#FFFFFF".into(),
            width: 512,
            height: 512,
            start: 0.0,
            end: 1.0,
            direction: GradientDirection::Horizontal,
            reverse: false,
        }
    }
}

impl GradientSpec {
    pub fn new(hex_color: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            hex_color: hex_color.into(),
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_range(mut self, start: f32, end: f32) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_direction(mut self, direction: GradientDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Parsed color; invalid hex falls back to white.
    pub fn color(&self) -> Rgb8 {
        Rgb8::from_hex(&self.hex_color).unwrap_or_else(|| {
            warn!("Invalid hex color '{}'; using white.", self.hex_color);
            Rgb8::WHITE
        })
    }

    /// Alpha value at each position along the ramp axis of length `size`.
    pub fn alpha_profile(&self, size: u32) -> Vec<u8> {
        let size = size.max(1) as usize;
        let start_frac = finite_or(self.start, 0.0).clamp(0.0, 1.0);
        let end_frac = finite_or(self.end, 1.0).min(1.0).max(start_frac + 0.01);

        let start = ((size as f32 * start_frac) as usize).min(size - 1);
        let end = ((size as f32 * end_frac) as usize).min(size).max(start + 1);
        let ramp = end - start;

        let mut alpha = vec![0u8; size];
        for (i, a) in alpha[start..end].iter_mut().enumerate() {
            *a = if ramp > 1 {
                (255 * i / (ramp - 1)) as u8
            } else {
                0
            };
        }
        for a in &mut alpha[end..] {
            *a = 255;
        }
        if self.reverse {
            alpha.reverse();
        }
        alpha
    }

    /// Render the gradient.
    pub fn render(&self) -> RgbaImage {
        let (w, h) = (self.width.max(1), self.height.max(1));
        let color = self.color();
        let horizontal = self.direction == GradientDirection::Horizontal;
        let profile = self.alpha_profile(if horizontal { w } else { h });

        RgbaImage::from_fn(w, h, |x, y| {
            let i = (if horizontal { x } else { y }) as usize;
            color.to_rgba(profile[i])
        })
    }
}

fn finite_or(v: f32, default: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        default
    }
}
