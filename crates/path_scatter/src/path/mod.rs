//! Guide-image path extraction.
//!
//! A guide image is reduced to a set of pixel coordinates by thresholding, one
//! erosion pass, and skeletonization. Extraction never fails: when too few
//! skeleton pixels survive, a synthetic circle is returned instead and the
//! outcome is tagged as [`PathExtraction::Fallback`].
use std::fmt;

use glam::{IVec2, UVec2};
use image::{DynamicImage, GrayImage};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod fallback;
pub mod morphology;
pub mod trace;

pub const DEFAULT_THRESHOLD: u8 = 128;
pub const DEFAULT_MIN_POINTS: usize = 10;
pub const DEFAULT_MAX_POINTS: usize = 1000;
pub const DEFAULT_FALLBACK_POINTS: usize = 100;

/// Pixel coordinates extracted from a guide image, in `(x, y)` order.
///
/// All points lie inside `[0, width) × [0, height)` of the guide image they were
/// derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    points: Vec<IVec2>,
    width: u32,
    height: u32,
}

impl Path {
    pub fn new(points: Vec<IVec2>, width: u32, height: u32) -> Self {
        let (w, h) = (width.max(1) as i32, height.max(1) as i32);
        debug_assert!(
            points
                .iter()
                .all(|p| (0..w).contains(&p.x) && (0..h).contains(&p.y)),
            "path points must lie inside the guide image"
        );
        Self {
            points,
            width,
            height,
        }
    }

    pub fn points(&self) -> &[IVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Size of the guide image this path belongs to.
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Center of the guide image, used when a point is needed but the path is empty.
    pub fn center(&self) -> IVec2 {
        IVec2::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    pub fn into_points(self) -> Vec<IVec2> {
        self.points
    }
}

/// Order in which extracted skeleton pixels are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathOrder {
    /// Row-major scan order, as produced by the thinning pass.
    ScanOrder,
    /// Chained along the stroke starting at an endpoint.
    #[default]
    Traced,
}

/// Why a synthetic path replaced the extracted one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// The guide image has zero width or height.
    EmptyImage,
    /// The skeleton had fewer points than the configured minimum.
    TooFewPoints { found: usize, minimum: usize },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::EmptyImage => write!(f, "guide image is empty"),
            FallbackReason::TooFewPoints { found, minimum } => {
                write!(f, "found {found} skeleton points, need at least {minimum}")
            }
        }
    }
}

/// Outcome of path extraction.
#[derive(Clone, Debug, PartialEq)]
pub enum PathExtraction {
    Extracted(Path),
    Fallback { path: Path, reason: FallbackReason },
}

impl PathExtraction {
    pub fn path(&self) -> &Path {
        match self {
            PathExtraction::Extracted(path) => path,
            PathExtraction::Fallback { path, .. } => path,
        }
    }

    pub fn into_path(self) -> Path {
        match self {
            PathExtraction::Extracted(path) => path,
            PathExtraction::Fallback { path, .. } => path,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PathExtraction::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            PathExtraction::Extracted(_) => None,
            PathExtraction::Fallback { reason, .. } => Some(*reason),
        }
    }
}

/// Configuration for turning a guide image into a [`Path`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathExtractor {
    /// Luma values at or below this are foreground.
    pub threshold: u8,
    /// Fewer skeleton points than this triggers the circle fallback.
    pub min_points: usize,
    /// Larger skeletons are subsampled by even striding down to this many points.
    pub max_points: usize,
    /// Ordering of the reported points.
    pub order: PathOrder,
    /// Radius of the fallback circle; `None` uses a quarter of the shorter side.
    pub fallback_radius: Option<f32>,
    /// Number of points on the fallback circle.
    pub fallback_points: usize,
}

impl Default for PathExtractor {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_points: DEFAULT_MIN_POINTS,
            max_points: DEFAULT_MAX_POINTS,
            order: PathOrder::default(),
            fallback_radius: None,
            fallback_points: DEFAULT_FALLBACK_POINTS,
        }
    }
}

impl PathExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_point_limits(mut self, min_points: usize, max_points: usize) -> Self {
        self.min_points = min_points;
        self.max_points = max_points;
        self
    }

    pub fn with_order(mut self, order: PathOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_fallback(mut self, radius: Option<f32>, points: usize) -> Self {
        self.fallback_radius = radius;
        self.fallback_points = points;
        self
    }

    /// Extract a path from any image; color input is converted to luma first.
    pub fn extract(&self, guide: &DynamicImage) -> PathExtraction {
        self.extract_luma(&guide.to_luma8())
    }

    /// Extract a path from a luma image.
    pub fn extract_luma(&self, luma: &GrayImage) -> PathExtraction {
        let (w, h) = luma.dimensions();
        let minimum = self.min_points.max(1);
        let maximum = self.max_points.max(minimum);

        if w == 0 || h == 0 {
            warn!("Guide image is {}x{}; using fallback circle.", w, h);
            return self.fallback(w, h, FallbackReason::EmptyImage);
        }

        let mask = morphology::binarize(luma, self.threshold);
        let eroded = morphology::erode(&mask);
        let thinned = if eroded.is_empty() && !mask.is_empty() {
            debug!("Erosion removed every stroke; skeletonizing the unmodified mask.");
            morphology::skeletonize(&mask)
        } else {
            morphology::skeletonize(&eroded)
        };

        let mut points = thinned.foreground_points();
        if points.len() < minimum {
            let reason = FallbackReason::TooFewPoints {
                found: points.len(),
                minimum,
            };
            warn!("Path extraction fell back to a circle: {}.", reason);
            return self.fallback(w, h, reason);
        }

        if self.order == PathOrder::Traced {
            points = trace::trace_order(&points);
        }

        if points.len() > maximum {
            debug!(
                "Subsampling {} skeleton points down to {}.",
                points.len(),
                maximum
            );
            points = subsample_even(&points, maximum);
        }

        PathExtraction::Extracted(Path::new(points, w, h))
    }

    fn fallback(&self, w: u32, h: u32, reason: FallbackReason) -> PathExtraction {
        PathExtraction::Fallback {
            path: fallback::circle_path(w, h, self.fallback_radius, self.fallback_points),
            reason,
        }
    }
}

/// Keep `max` points taken at an even stride, preserving their order.
pub fn subsample_even(points: &[IVec2], max: usize) -> Vec<IVec2> {
    if points.len() <= max {
        return points.to_vec();
    }
    (0..max).map(|i| points[i * points.len() / max]).collect()
}
