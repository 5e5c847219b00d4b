//! Dominant colors by k-means clustering in sRGB.
//!
//! Each restart runs `kmeans_colors` with k-means++ seeding from a seed derived
//! from the config. The restart with the lowest score wins, and its colors are
//! reported from the largest cluster down.
use std::collections::HashSet;

use image::{DynamicImage, RgbaImage};
use kmeans_colors::get_kmeans;
use palette::Srgb;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::Rgb8;

pub const DEFAULT_PALETTE_SEED: u64 = 42;
pub const DEFAULT_MAX_SAMPLES: usize = 65_536;
const CONVERGENCE_TOLERANCE: f32 = 1e-4;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PaletteConfig {
    /// Number of clusters; clamped to `[1, 20]`.
    pub num_colors: usize,
    /// Percentage in `[1, 100]` scaling the iteration budget.
    pub accuracy: u32,
    /// Report complementary colors instead.
    pub complementary: bool,
    /// Colors dropped from the result.
    pub exclude: Vec<Rgb8>,
    /// 1-based index of the selected color; past the end selects the last.
    pub select: usize,
    pub seed: u64,
    /// Pixels beyond this are subsampled by even stride before clustering.
    pub max_samples: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            num_colors: 5,
            accuracy: 80,
            complementary: false,
            exclude: Vec::new(),
            select: 1,
            seed: DEFAULT_PALETTE_SEED,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

impl PaletteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_colors(mut self, num_colors: usize) -> Self {
        self.num_colors = num_colors;
        self
    }

    pub fn with_accuracy(mut self, accuracy: u32) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_complementary(mut self, complementary: bool) -> Self {
        self.complementary = complementary;
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<Rgb8>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_select(mut self, select: usize) -> Self {
        self.select = select;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn clusters(&self) -> usize {
        self.num_colors.clamp(1, 20)
    }

    /// k-means iteration budget per restart.
    pub fn max_iterations(&self) -> usize {
        (512 * self.accuracy.clamp(1, 100) as usize / 100).max(1)
    }

    /// Number of k-means++ restarts; restart `i` uses seed `seed + i`.
    pub fn n_init(&self) -> usize {
        (self.max_iterations() / 100).clamp(1, 10)
    }
}

/// Extracted colors and the selected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub colors: Vec<Rgb8>,
    pub selected: Rgb8,
}

impl Palette {
    /// Colors as `"#rrggbb, #rrggbb, ..."`.
    pub fn to_hex_list(&self) -> String {
        self.colors
            .iter()
            .map(Rgb8::to_hex)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Extract dominant colors from `image`. Fully transparent pixels are ignored.
pub fn extract_palette(image: &DynamicImage, config: &PaletteConfig) -> Palette {
    extract_palette_rgba(&image.to_rgba8(), config)
}

pub fn extract_palette_rgba(image: &RgbaImage, config: &PaletteConfig) -> Palette {
    let pixels = collect_samples(image, config.max_samples.max(1));
    let mut colors = if pixels.is_empty() {
        warn!("Image has no opaque pixels; using gray.");
        vec![Rgb8::GRAY]
    } else {
        dominant_colors(&pixels, config)
    };

    if config.complementary {
        colors = colors.iter().map(Rgb8::complement).collect();
    }
    let before = colors.len();
    colors.retain(|c| !config.exclude.contains(c));
    if colors.len() < before {
        debug!("Excluded {} colors.", before - colors.len());
    }
    if colors.is_empty() {
        warn!("All colors were excluded; using gray.");
        colors.push(Rgb8::GRAY);
    }

    let select = config.select.max(1);
    let selected = match colors.get(select - 1) {
        Some(c) => *c,
        None => {
            warn!(
                "Select index {} out of range for {} colors; using the last.",
                select,
                colors.len()
            );
            colors[colors.len() - 1]
        }
    };
    Palette { colors, selected }
}

fn collect_samples(image: &RgbaImage, max_samples: usize) -> Vec<[u8; 3]> {
    let opaque: Vec<[u8; 3]> = image
        .pixels()
        .filter(|p| p[3] > 0)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    if opaque.len() <= max_samples {
        return opaque;
    }
    (0..max_samples)
        .map(|i| opaque[i * opaque.len() / max_samples])
        .collect()
}

fn distinct_colors(pixels: &[[u8; 3]]) -> usize {
    pixels.iter().collect::<HashSet<_>>().len()
}

fn dominant_colors(pixels: &[[u8; 3]], config: &PaletteConfig) -> Vec<Rgb8> {
    // k-means++ cannot seed more centers than there are distinct colors.
    let k = config.clusters().min(distinct_colors(pixels));
    let max_iter = config.max_iterations();
    let samples: Vec<Srgb<f32>> = pixels
        .iter()
        .map(|p| Srgb::new(p[0], p[1], p[2]).into_format::<f32>())
        .collect();

    let best = (0..config.n_init() as u64)
        .map(|run| {
            let seed = config.seed.wrapping_add(run);
            get_kmeans(k, max_iter, CONVERGENCE_TOLERANCE, false, &samples, seed)
        })
        .min_by(|a, b| a.score.total_cmp(&b.score));
    let Some(best) = best else {
        return vec![Rgb8::GRAY];
    };
    debug!(
        "Clustered {} samples into {} colors (score {:.4}).",
        samples.len(),
        best.centroids.len(),
        best.score
    );

    let mut sizes = vec![0usize; best.centroids.len()];
    for &label in &best.indices {
        if let Some(size) = sizes.get_mut(usize::from(label)) {
            *size += 1;
        }
    }
    let mut order: Vec<usize> = (0..best.centroids.len()).collect();
    order.sort_by(|&a, &b| sizes[b].cmp(&sizes[a]));
    order
        .into_iter()
        .map(|i| {
            let c: Srgb<u8> = best.centroids[i].into_format();
            Rgb8::new(c.red, c.green, c.blue)
        })
        .collect()
}
