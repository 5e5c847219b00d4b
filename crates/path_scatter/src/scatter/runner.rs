//! High-level runner: guide image in, composited layout out.
//!
//! A run moves linearly through [`LayoutStage`]s. Every random draw comes from
//! one `StdRng` seeded at the start of the run, so a run is reproducible from
//! its reported seed.
use std::fmt;

use glam::UVec2;
use image::{DynamicImage, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::path::{PathExtraction, PathExtractor};
use crate::sampling::PlacementMode;
use crate::scatter::canvas::composite;
use crate::scatter::events::{EventSink, LayoutEvent, LayoutEventKind};
use crate::scatter::overlay::{render_points_preview, PreviewStyle};
use crate::scatter::plan::PlacementPlan;
use crate::scatter::seed::{is_fixed, resolve_seed};
use crate::scatter::selection::select_images;
use crate::scatter::transform::{
    transform, Jitter, DEFAULT_MAX_OFFSET, DEFAULT_MAX_ROTATION, DEFAULT_MAX_SCALE,
    DEFAULT_MIN_SCALE,
};

pub const DEFAULT_PLACEMENT_COUNT: usize = 5;
pub const MAX_PLACEMENT_COUNT: usize = 1000;
pub const MAX_OFFSET_LIMIT: i32 = 1000;
pub const MAX_ROTATION_LIMIT: f32 = 360.0;
pub const SCALE_LIMITS: (f32, f32) = (0.01, 10.0);
pub const MAX_THRESHOLD: u8 = 254;

/// Configuration for a layout run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Policy for choosing points and assigning images.
    pub placement_mode: PlacementMode,
    /// Number of images to place.
    pub placement_count: usize,
    /// Maximum absolute pixel offset on each axis.
    pub max_offset: i32,
    /// Maximum absolute rotation in degrees.
    pub max_rotation: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Scale both axes by one factor.
    pub preserve_aspect_ratio: bool,
    /// Fixed seed; `None` or a negative value draws a fresh one per run.
    pub seed: Option<i64>,
    /// Path extraction settings.
    pub extractor: PathExtractor,
    /// Points preview colors.
    pub preview: PreviewStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            placement_mode: PlacementMode::default(),
            placement_count: DEFAULT_PLACEMENT_COUNT,
            max_offset: DEFAULT_MAX_OFFSET as i32,
            max_rotation: DEFAULT_MAX_ROTATION,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            preserve_aspect_ratio: true,
            seed: None,
            extractor: PathExtractor::default(),
            preview: PreviewStyle::default(),
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: PlacementMode) -> Self {
        self.placement_mode = mode;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.placement_count = count;
        self
    }

    pub fn with_max_offset(mut self, max_offset: i32) -> Self {
        self.max_offset = max_offset;
        self
    }

    pub fn with_max_rotation(mut self, degrees: f32) -> Self {
        self.max_rotation = degrees;
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

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_extractor(mut self, extractor: PathExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_preview(mut self, preview: PreviewStyle) -> Self {
        self.preview = preview;
        self
    }

    /// Disable all jitter so images are placed axis-aligned at their points.
    pub fn without_jitter(self) -> Self {
        self.with_max_offset(0)
            .with_max_rotation(0.0)
            .with_scale_range(1.0, 1.0)
    }

    /// Jitter bounds for this configuration. Assumes a sanitized config.
    pub fn jitter(&self) -> Jitter {
        Jitter {
            max_offset: self.max_offset.max(0) as u32,
            max_rotation: self.max_rotation,
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            preserve_aspect_ratio: self.preserve_aspect_ratio,
        }
    }

    /// Clamp out-of-range values in place, logging each clamp.
    pub fn sanitize(&mut self) -> Vec<ParameterClamp> {
        let clamps = self.clamp_in_place();
        for clamp in &clamps {
            warn!("Clamped {}.", clamp);
        }
        clamps
    }

    /// Returns an error naming the first parameter that would be clamped.
    pub fn validate(&self) -> Result<()> {
        let mut trial = self.clone();
        match trial.clamp_in_place().first() {
            Some(clamp) => Err(Error::InvalidConfig(format!(
                "{} must be within range (got {})",
                clamp.name, clamp.requested
            ))),
            None => Ok(()),
        }
    }

    fn clamp_in_place(&mut self) -> Vec<ParameterClamp> {
        let mut clamps = Vec::new();

        let count = self.placement_count.clamp(1, MAX_PLACEMENT_COUNT);
        ParameterClamp::record(
            &mut clamps,
            "placement_count",
            self.placement_count as f64,
            count as f64,
        );
        self.placement_count = count;

        let offset = self.max_offset.clamp(0, MAX_OFFSET_LIMIT);
        ParameterClamp::record(&mut clamps, "max_offset", self.max_offset.into(), offset.into());
        self.max_offset = offset;

        let rotation = clamp_finite(
            self.max_rotation,
            0.0,
            MAX_ROTATION_LIMIT,
            DEFAULT_MAX_ROTATION,
        );
        ParameterClamp::record(
            &mut clamps,
            "max_rotation",
            self.max_rotation.into(),
            rotation.into(),
        );
        self.max_rotation = rotation;

        let (lo, hi) = SCALE_LIMITS;
        let min_scale = clamp_finite(self.min_scale, lo, hi, DEFAULT_MIN_SCALE);
        let max_scale = clamp_finite(self.max_scale, lo, hi, DEFAULT_MAX_SCALE);
        let min_scale_ordered = min_scale.min(max_scale);
        ParameterClamp::record(
            &mut clamps,
            "min_scale",
            self.min_scale.into(),
            min_scale_ordered.into(),
        );
        ParameterClamp::record(
            &mut clamps,
            "max_scale",
            self.max_scale.into(),
            max_scale.into(),
        );
        self.min_scale = min_scale_ordered;
        self.max_scale = max_scale;

        let extractor = &mut self.extractor;
        let threshold = extractor.threshold.min(MAX_THRESHOLD);
        ParameterClamp::record(
            &mut clamps,
            "threshold",
            extractor.threshold.into(),
            threshold.into(),
        );
        extractor.threshold = threshold;

        let min_points = extractor.min_points.max(1);
        ParameterClamp::record(
            &mut clamps,
            "min_points",
            extractor.min_points as f64,
            min_points as f64,
        );
        extractor.min_points = min_points;

        let max_points = extractor.max_points.max(min_points);
        ParameterClamp::record(
            &mut clamps,
            "max_points",
            extractor.max_points as f64,
            max_points as f64,
        );
        extractor.max_points = max_points;

        let fallback_points = extractor.fallback_points.max(1);
        ParameterClamp::record(
            &mut clamps,
            "fallback_points",
            extractor.fallback_points as f64,
            fallback_points as f64,
        );
        extractor.fallback_points = fallback_points;

        clamps
    }
}

fn clamp_finite(value: f32, lo: f32, hi: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        default
    }
}

/// One out-of-range parameter and the value actually used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterClamp {
    pub name: &'static str,
    pub requested: f64,
    pub applied: f64,
}

impl ParameterClamp {
    fn record(out: &mut Vec<ParameterClamp>, name: &'static str, requested: f64, applied: f64) {
        if requested != applied {
            out.push(ParameterClamp {
                name,
                requested,
                applied,
            });
        }
    }
}

impl fmt::Display for ParameterClamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' from {} to {}",
            self.name, self.requested, self.applied
        )
    }
}

/// Linear stages of a layout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayoutStage {
    Init,
    PathExtracted,
    PointsSelected,
    ImagesSelected,
    Composited,
    Done,
}

impl fmt::Display for LayoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayoutStage::Init => "init",
            LayoutStage::PathExtracted => "path-extracted",
            LayoutStage::PointsSelected => "points-selected",
            LayoutStage::ImagesSelected => "images-selected",
            LayoutStage::Composited => "composited",
            LayoutStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Output of a layout run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// Placements composited onto a transparent canvas.
    pub composite: RgbaImage,
    /// Placements composited over the guide image.
    pub composite_with_guide: RgbaImage,
    /// Path pixels and selected points on a transparent canvas.
    pub points_preview: RgbaImage,
    /// The placements, in z-order.
    pub plan: PlacementPlan,
    /// Path extraction outcome.
    pub extraction: PathExtraction,
    /// Seed that reproduces this run.
    pub seed: u64,
    /// Parameters that were clamped before the run.
    pub clamps: Vec<ParameterClamp>,
}

impl LayoutResult {
    pub fn used_fallback_path(&self) -> bool {
        self.extraction.is_fallback()
    }
}

/// Holds a layout configuration and runs it against guides and pools.
#[derive(Debug, Clone)]
pub struct LayoutRunner {
    pub config: LayoutConfig,
}

impl LayoutRunner {
    /// Create a runner, rejecting any out-of-range parameter.
    pub fn try_new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a runner; out-of-range parameters are clamped on each run.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, guide: &DynamicImage, pool: &[RgbaImage]) -> Result<LayoutResult> {
        run_layout_with_events(guide, pool, &self.config, &mut ())
    }

    pub fn run_with_events(
        &self,
        guide: &DynamicImage,
        pool: &[RgbaImage],
        sink: &mut dyn EventSink,
    ) -> Result<LayoutResult> {
        run_layout_with_events(guide, pool, &self.config, sink)
    }
}

/// Run a layout: extract a path from `guide`, place images from `pool` along it,
/// and composite them.
pub fn run_layout(
    guide: &DynamicImage,
    pool: &[RgbaImage],
    config: &LayoutConfig,
) -> Result<LayoutResult> {
    run_layout_with_events(guide, pool, config, &mut ())
}

/// Like [`run_layout`], reporting progress to `sink`.
pub fn run_layout_with_events(
    guide: &DynamicImage,
    pool: &[RgbaImage],
    config: &LayoutConfig,
    sink: &mut dyn EventSink,
) -> Result<LayoutResult> {
    if pool.is_empty() {
        return Err(Error::EmptyImagePool);
    }
    let size = UVec2::new(guide.width(), guide.height());
    if size.x == 0 || size.y == 0 {
        return Err(Error::EmptyGuideImage);
    }

    let mut config = config.clone();
    let clamps = config.sanitize();
    let seed = resolve_seed(config.seed);
    let mut rng = StdRng::seed_from_u64(seed);
    debug!(
        "Layout seed {} ({}).",
        seed,
        if is_fixed(config.seed) { "fixed" } else { "fresh" }
    );

    if sink.wants(LayoutEventKind::ParameterClamped) {
        for clamp in &clamps {
            sink.send(LayoutEvent::ParameterClamped { clamp: *clamp });
        }
    }
    if sink.wants(LayoutEventKind::RunStarted) {
        sink.send(LayoutEvent::RunStarted {
            config: config.clone(),
            seed,
            pool_size: pool.len(),
        });
    }
    enter(LayoutStage::Init);

    let extraction = config.extractor.extract(guide);
    let path = extraction.path();
    if let Some(reason) = extraction.fallback_reason() {
        if sink.wants(LayoutEventKind::Warning) {
            sink.send(LayoutEvent::Warning {
                context: "path".into(),
                message: format!("using fallback circle: {reason}"),
            });
        }
    }
    if sink.wants(LayoutEventKind::PathExtracted) {
        sink.send(LayoutEvent::PathExtracted {
            points: path.len(),
            fallback: extraction.fallback_reason(),
        });
    }
    enter(LayoutStage::PathExtracted);

    let count = config.placement_count;
    let policy = config.placement_mode.policy();
    let points = policy.select_points(path, count, &mut rng);
    if sink.wants(LayoutEventKind::PointsSelected) {
        sink.send(LayoutEvent::PointsSelected {
            points: points.clone(),
        });
    }
    enter(LayoutStage::PointsSelected);

    let selection = select_images(pool, count, policy, &mut rng)?;
    if sink.wants(LayoutEventKind::ImagesSelected) {
        sink.send(LayoutEvent::ImagesSelected {
            assignment: selection.assignment.clone(),
        });
    }
    enter(LayoutStage::ImagesSelected);

    let jitter = config.jitter();
    let mut plan = PlacementPlan::new();
    let mut layers = Vec::with_capacity(points.len());
    let assigned = selection.images.iter().zip(&selection.assignment);
    for (index, (&point, (image, &image_index))) in points.iter().zip(assigned).enumerate() {
        let (layer, params) = transform(image, point, &jitter, &mut rng);
        let placement = params.into_placement(point, image_index);
        if sink.wants(LayoutEventKind::PlacementMade) {
            sink.send(LayoutEvent::PlacementMade {
                index,
                placement: placement.clone(),
                origin: layer.origin,
                size: layer.image.dimensions(),
            });
        }
        plan.placements.push(placement);
        layers.push(layer);
    }
    let (composite, composite_with_guide) = composite(size, &guide.to_rgba8(), &layers);
    enter(LayoutStage::Composited);

    let points_preview = render_points_preview(size, path, &points, &config.preview);

    info!(
        "Placed {} images along a {}-point path ({} mode, seed {}).",
        plan.len(),
        path.len(),
        config.placement_mode,
        seed
    );
    if sink.wants(LayoutEventKind::RunFinished) {
        sink.send(LayoutEvent::RunFinished {
            placements: plan.len(),
            seed,
        });
    }
    enter(LayoutStage::Done);

    Ok(LayoutResult {
        composite,
        composite_with_guide,
        points_preview,
        plan,
        extraction,
        seed,
        clamps,
    })
}

#[inline]
fn enter(stage: LayoutStage) {
    debug!("Layout stage: {}", stage);
}
