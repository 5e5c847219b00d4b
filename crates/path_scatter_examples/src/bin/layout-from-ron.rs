use std::path::PathBuf;

use anyhow::Context;
use path_scatter::prelude::*;
use path_scatter_examples::{diagonal_guide, init_tracing, save_run_result, swatch_pool};
use serde::Deserialize;
use tracing::info;

/// A complete layout scene: a generated guide, a swatch pool and the layout settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct Scene {
    guide_size: u32,
    stroke: u32,
    swatch_size: u32,
    colors: String,
    layout: LayoutConfig,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            guide_size: 512,
            stroke: 4,
            swatch_size: 48,
            colors: "#ff0000, #00ff00, #0000ff".into(),
            layout: LayoutConfig::default(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/layout.ron"));
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let scene: Scene = ron::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    info!("Loaded scene from {}", path.display());

    let guide = diagonal_guide(scene.guide_size, scene.stroke);
    let pool = swatch_pool(scene.swatch_size, &scene.colors);
    let result = LayoutRunner::new(scene.layout).run(&guide, &pool)?;

    for clamp in &result.clamps {
        println!("clamped {clamp}");
    }
    save_run_result(&result, "layout-from-ron")?;
    Ok(())
}
