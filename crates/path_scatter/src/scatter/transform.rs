//! Per-placement jitter: offset, rotation and scale applied to one image.
//!
//! Rotation expands the bounding box so nothing is clipped. Right angles use the
//! exact pixel permutations from `image::imageops`; other angles are resampled
//! bilinearly in premultiplied alpha so transparent edges do not darken.
use glam::{IVec2, Vec2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::rand_range;
use crate::scatter::plan::Placement;

pub const DEFAULT_MAX_OFFSET: u32 = 20;
pub const DEFAULT_MAX_ROTATION: f32 = 45.0;
pub const DEFAULT_MIN_SCALE: f32 = 0.5;
pub const DEFAULT_MAX_SCALE: f32 = 1.5;

const ANGLE_EPSILON: f32 = 1e-4;

/// Bounds for the random jitter drawn per placement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Jitter {
    /// Maximum absolute offset in pixels on each axis.
    pub max_offset: u32,
    /// Maximum absolute rotation in degrees.
    pub max_rotation: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Draw one factor for both axes instead of one per axis.
    pub preserve_aspect_ratio: bool,
}

impl Default for Jitter {
    fn default() -> Self {
        Self {
            max_offset: DEFAULT_MAX_OFFSET,
            max_rotation: DEFAULT_MAX_ROTATION,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            preserve_aspect_ratio: true,
        }
    }
}

impl Jitter {
    /// Jitter that leaves every image untouched.
    pub const NONE: Jitter = Jitter {
        max_offset: 0,
        max_rotation: 0.0,
        min_scale: 1.0,
        max_scale: 1.0,
        preserve_aspect_ratio: true,
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_offset(mut self, max_offset: u32) -> Self {
        self.max_offset = max_offset;
        self
    }

    pub fn with_max_rotation(mut self, max_rotation: f32) -> Self {
        self.max_rotation = max_rotation;
        self
    }

    pub fn with_scale_range(mut self, min_scale: f32, max_scale: f32) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    pub fn with_preserve_aspect_ratio(mut self, preserve: bool) -> Self {
        self.preserve_aspect_ratio = preserve;
        self
    }

    /// Draw one set of transform parameters.
    ///
    /// Draw order is fixed: offset x, offset y, rotation, then one or two scale
    /// factors. Offsets are whole pixels.
    pub fn draw(&self, rng: &mut dyn Rng) -> TransformParams {
        let reach = self.max_offset as f32;
        let offset = Vec2::new(
            rand_range(rng, -reach, reach).round(),
            rand_range(rng, -reach, reach).round(),
        );
        let rotation_degrees = rand_range(rng, -self.max_rotation, self.max_rotation);
        let scale = if self.preserve_aspect_ratio {
            Vec2::splat(rand_range(rng, self.min_scale, self.max_scale))
        } else {
            let sx = rand_range(rng, self.min_scale, self.max_scale);
            let sy = rand_range(rng, self.min_scale, self.max_scale);
            Vec2::new(sx, sy)
        };
        TransformParams {
            offset,
            rotation_degrees,
            scale,
        }
    }
}

/// Concrete jitter values for one placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    pub offset: Vec2,
    pub rotation_degrees: f32,
    pub scale: Vec2,
}

impl TransformParams {
    pub const IDENTITY: TransformParams = TransformParams {
        offset: Vec2::ZERO,
        rotation_degrees: 0.0,
        scale: Vec2::ONE,
    };

    /// Attach these parameters to a point and image index.
    pub fn into_placement(self, point: IVec2, image_index: usize) -> Placement {
        Placement {
            point,
            image_index,
            offset: self.offset,
            rotation_degrees: self.rotation_degrees,
            scale: self.scale,
        }
    }
}

/// A transformed image and the canvas position of its top-left corner.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub image: RgbaImage,
    pub origin: IVec2,
}

/// Draw jitter for `image` at `point` and apply it.
pub fn transform(
    image: &RgbaImage,
    point: IVec2,
    jitter: &Jitter,
    rng: &mut dyn Rng,
) -> (Transformed, TransformParams) {
    let params = jitter.draw(rng);
    let placement = params.into_placement(point, 0);
    (apply_transform(image, &placement), params)
}

/// Rotate, then scale, then center the result on the placement target.
pub fn apply_transform(image: &RgbaImage, placement: &Placement) -> Transformed {
    let rotated = rotate_expand(image, placement.rotation_degrees);
    let scaled = scale_image(&rotated, placement.scale);
    let origin = paste_origin(placement.target(), scaled.dimensions());
    Transformed {
        image: scaled,
        origin,
    }
}

/// Top-left corner that centers an image of `size` on `target`.
pub fn paste_origin(target: Vec2, size: (u32, u32)) -> IVec2 {
    let half = Vec2::new((size.0 / 2) as f32, (size.1 / 2) as f32);
    (target - half).floor().as_ivec2()
}

/// Rotate counter-clockwise by `degrees`, growing the canvas to fit.
pub fn rotate_expand(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 || !degrees.is_finite() {
        return image.clone();
    }

    let normalized = degrees.rem_euclid(360.0);
    let nearest_quarter = (normalized / 90.0).round();
    if (normalized - nearest_quarter * 90.0).abs() < ANGLE_EPSILON {
        return match nearest_quarter as i32 % 4 {
            0 => image.clone(),
            1 => imageops::rotate270(image),
            2 => imageops::rotate180(image),
            _ => imageops::rotate90(image),
        };
    }

    let (sin, cos) = normalized.to_radians().sin_cos();
    let (wf, hf) = (w as f32, h as f32);
    let out_w = ((wf * cos.abs() + hf * sin.abs()) - 1e-3).ceil().max(1.0) as u32;
    let out_h = ((wf * sin.abs() + hf * cos.abs()) - 1e-3).ceil().max(1.0) as u32;

    let src_center = Vec2::new(wf, hf) * 0.5;
    let dst_center = Vec2::new(out_w as f32, out_h as f32) * 0.5;

    let mut out = RgbaImage::new(out_w, out_h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - dst_center;
        let sx = d.x * cos - d.y * sin + src_center.x - 0.5;
        let sy = d.x * sin + d.y * cos + src_center.y - 0.5;
        *px = sample_bilinear(image, sx, sy);
    }
    out
}

fn sample_bilinear(image: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let mut acc = [0.0f32; 4];
    for (dx, dy, weight) in [
        (0, 0, (1.0 - fx) * (1.0 - fy)),
        (1, 0, fx * (1.0 - fy)),
        (0, 1, (1.0 - fx) * fy),
        (1, 1, fx * fy),
    ] {
        if weight <= 0.0 {
            continue;
        }
        let (sx, sy) = (x0 + dx, y0 + dy);
        if sx < 0 || sy < 0 || sx >= image.width() as i64 || sy >= image.height() as i64 {
            continue;
        }
        let p = image.get_pixel(sx as u32, sy as u32).0;
        let a = p[3] as f32 * weight;
        acc[0] += p[0] as f32 * a;
        acc[1] += p[1] as f32 * a;
        acc[2] += p[2] as f32 * a;
        acc[3] += a;
    }

    if acc[3] <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }
    let unpremultiply = |c: f32| (c / acc[3]).round().clamp(0.0, 255.0) as u8;
    Rgba([
        unpremultiply(acc[0]),
        unpremultiply(acc[1]),
        unpremultiply(acc[2]),
        acc[3].round().clamp(0.0, 255.0) as u8,
    ])
}

/// Resize by per-axis factors with Lanczos3. Each side keeps at least one pixel.
pub fn scale_image(image: &RgbaImage, scale: Vec2) -> RgbaImage {
    let (w, h) = image.dimensions();
    let nw = ((w as f32 * scale.x) as u32).max(1);
    let nh = ((h as f32 * scale.y) as u32).max(1);
    if (nw, nh) == (w, h) || w == 0 || h == 0 {
        return image.clone();
    }
    imageops::resize(image, nw, nh, FilterType::Lanczos3)
}
