//! Fit one image from a pool into the dark region of a background.
use glam::{IVec2, UVec2};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as PixelRect;
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::rect::aspect::{aspect_ratio_difference, image_aspect_ratio};
use crate::rect::{find_dark_bounds, Rect, DEFAULT_DARK_THRESHOLD, DEFAULT_MIN_AREA};
use crate::sampling::rand_index;
use crate::scatter::canvas::{Canvas, CompositeSink};
use crate::scatter::seed::resolve_seed;

const REGION_OUTLINE: Rgba<u8> = Rgba([255, 0, 0, 255]);
const IMAGE_OUTLINE: Rgba<u8> = Rgba([0, 255, 0, 255]);
const OUTLINE_WIDTH: u32 = 2;

/// How a candidate is picked among those matching the region's aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RectSelection {
    /// Closest aspect ratio; ties go to the earlier image.
    #[default]
    BestMatch,
    /// Uniformly among matches, from the configured seed.
    Random,
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RectLayoutConfig {
    /// Largest accepted [`aspect_ratio_difference`]; clamped to `[0.01, 0.5]`.
    pub aspect_ratio_threshold: f64,
    /// Return the background as the output image when nothing is placed.
    pub use_background_if_no_match: bool,
    pub selection: RectSelection,
    /// Seed for [`RectSelection::Random`]; `None` or negative draws a fresh one.
    pub seed: Option<i64>,
    pub dark_threshold: u8,
    pub min_area: u32,
}

impl Default for RectLayoutConfig {
    fn default() -> Self {
        Self {
            aspect_ratio_threshold: 0.25,
            use_background_if_no_match: true,
            selection: RectSelection::default(),
            seed: None,
            dark_threshold: DEFAULT_DARK_THRESHOLD,
            min_area: DEFAULT_MIN_AREA,
        }
    }
}

impl RectLayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aspect_ratio_threshold(mut self, threshold: f64) -> Self {
        self.aspect_ratio_threshold = threshold;
        self
    }

    pub fn with_use_background_if_no_match(mut self, enabled: bool) -> Self {
        self.use_background_if_no_match = enabled;
        self
    }

    pub fn with_selection(mut self, selection: RectSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn effective_threshold(&self) -> f64 {
        let t = self.aspect_ratio_threshold;
        let clamped = if t.is_finite() { t.clamp(0.01, 0.5) } else { 0.25 };
        if clamped != t {
            warn!("Clamped 'aspect_ratio_threshold' from {} to {}.", t, clamped);
        }
        clamped
    }
}

/// What the rect layout did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectOutcome {
    /// Pool image `index` was fitted into `region`, top-left at `origin`.
    Placed {
        index: usize,
        region: Rect,
        origin: UVec2,
        size: UVec2,
    },
    /// The background has no dark region.
    NoRegion,
    /// No image is within the aspect ratio threshold of `region`.
    NoMatch { region: Rect },
}

#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RectLayoutResult {
    /// Fitted image on a transparent canvas, or the fallback output.
    pub image: RgbaImage,
    /// Background with the fitted image and region/image outlines.
    pub preview: RgbaImage,
    pub outcome: RectOutcome,
    /// Pool indices that were not placed, in input order.
    pub remaining: Vec<usize>,
}

/// Find the dark region of `background` and fit the best matching image into it.
pub fn run_rect_layout(
    background: &DynamicImage,
    images: &[RgbaImage],
    config: &RectLayoutConfig,
) -> Result<RectLayoutResult> {
    if images.is_empty() {
        return Err(Error::EmptyImagePool);
    }
    let threshold = config.effective_threshold();
    let bg = background.to_rgba8();
    let all: Vec<usize> = (0..images.len()).collect();

    let Some(region) = find_dark_bounds(background, config.dark_threshold, config.min_area) else {
        info!("No dark region found in the background.");
        return Ok(RectLayoutResult {
            image: bg.clone(),
            preview: bg,
            outcome: RectOutcome::NoRegion,
            remaining: all,
        });
    };

    let target = region.aspect_ratio();
    debug!(
        "Dark region at ({}, {}) size {}x{}, aspect ratio {:.2}.",
        region.x, region.y, region.width, region.height, target
    );

    let candidates: Vec<(usize, f64)> = images
        .iter()
        .enumerate()
        .map(|(i, img)| (i, image_aspect_ratio(img)))
        .filter(|&(_, ratio)| aspect_ratio_difference(ratio, target) <= threshold)
        .collect();
    debug!("{} images match the region's aspect ratio.", candidates.len());

    if candidates.is_empty() {
        info!("No image matches the region's aspect ratio.");
        let image = if config.use_background_if_no_match {
            bg.clone()
        } else {
            RgbaImage::new(bg.width(), bg.height())
        };
        return Ok(RectLayoutResult {
            image,
            preview: bg,
            outcome: RectOutcome::NoMatch { region },
            remaining: all,
        });
    }

    let index = match config.selection {
        RectSelection::Random => {
            let mut rng = StdRng::seed_from_u64(resolve_seed(config.seed));
            candidates[rand_index(&mut rng, candidates.len())].0
        }
        RectSelection::BestMatch => {
            let mut best = candidates[0];
            for &c in &candidates[1..] {
                if (c.1 - target).abs() < (best.1 - target).abs() {
                    best = c;
                }
            }
            best.0
        }
    };

    let fitted = fit_within(&images[index], region.width, region.height);
    let (fw, fh) = fitted.dimensions();
    let origin = UVec2::new(
        region.x + region.width.saturating_sub(fw) / 2,
        region.y + region.height.saturating_sub(fh) / 2,
    );
    let at = origin.as_ivec2();

    let mut output = Canvas::transparent(UVec2::new(bg.width(), bg.height()));
    output.composite(&fitted, at);

    let mut preview = bg;
    imageops::overlay(&mut preview, &fitted, at.x as i64, at.y as i64);
    draw_outline(&mut preview, region, REGION_OUTLINE);
    draw_outline(&mut preview, Rect::new(origin.x, origin.y, fw, fh), IMAGE_OUTLINE);

    info!(
        "Placed image {} ({}x{}) in region {}x{}.",
        index, fw, fh, region.width, region.height
    );

    Ok(RectLayoutResult {
        image: output.into_image(),
        preview,
        outcome: RectOutcome::Placed {
            index,
            region,
            origin,
            size: UVec2::new(fw, fh),
        },
        remaining: all.into_iter().filter(|&i| i != index).collect(),
    })
}

/// Largest size with the source aspect ratio that fits in `tw × th`.
///
/// The constrained side matches the target exactly; the other is truncated.
/// Both sides are at least one pixel.
pub fn fit_size(sw: u32, sh: u32, tw: u32, th: u32) -> (u32, u32) {
    let (tw, th) = (tw.max(1), th.max(1));
    if sw == 0 || sh == 0 {
        return (tw, th);
    }
    let aspect = sw as f64 / sh as f64;
    // Cross-multiply to compare aspect ratios without rounding.
    if sw as u64 * th as u64 > tw as u64 * sh as u64 {
        (tw, ((tw as f64 / aspect) as u32).max(1))
    } else {
        (((th as f64 * aspect) as u32).max(1), th)
    }
}

/// Resize `image` to fit inside `tw × th`, keeping its aspect ratio (Lanczos3).
pub fn fit_within(image: &RgbaImage, tw: u32, th: u32) -> RgbaImage {
    let (sw, sh) = image.dimensions();
    let (nw, nh) = fit_size(sw, sh, tw, th);
    if (nw, nh) == (sw, sh) || sw == 0 || sh == 0 {
        return image.clone();
    }
    imageops::resize(image, nw, nh, FilterType::Lanczos3)
}

/// Outline `rect` with a band drawn inward from its edges. The far edge is
/// inclusive, so the outline encloses `rect.right()` and `rect.bottom()`.
fn draw_outline(image: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    for inset in 0..OUTLINE_WIDTH {
        let (Some(w), Some(h)) = (
            (rect.width + 1).checked_sub(2 * inset),
            (rect.height + 1).checked_sub(2 * inset),
        ) else {
            break;
        };
        if w == 0 || h == 0 {
            break;
        }
        let ring = PixelRect::at((rect.x + inset) as i32, (rect.y + inset) as i32).of_size(w, h);
        draw_hollow_rect_mut(image, ring, color);
    }
}

impl RectOutcome {
    pub fn placed_index(&self) -> Option<usize> {
        match self {
            RectOutcome::Placed { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Canvas origin of the placed image, if any.
    pub fn origin(&self) -> Option<IVec2> {
        match self {
            RectOutcome::Placed { origin, .. } => Some(origin.as_ivec2()),
            _ => None,
        }
    }
}
