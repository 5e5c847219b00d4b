//! Shared helpers for the example binaries: logging setup, test inputs and PNG output.
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{DynamicImage, GrayImage, Luma, RgbaImage};
use path_scatter::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber; `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Output file `name` inside the `out/` directory, created on demand.
pub fn output_path(name: &str) -> anyhow::Result<PathBuf> {
    let dir = PathBuf::from("out");
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(dir.join(name))
}

pub fn save_png(image: &RgbaImage, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Write the three rasters of a layout run as `<stem>-composite.png`,
/// `<stem>-guide.png` and `<stem>-points.png`.
pub fn save_run_result(result: &LayoutResult, stem: &str) -> anyhow::Result<()> {
    save_png(&result.composite, output_path(&format!("{stem}-composite.png"))?)?;
    save_png(
        &result.composite_with_guide,
        output_path(&format!("{stem}-guide.png"))?,
    )?;
    save_png(
        &result.points_preview,
        output_path(&format!("{stem}-points.png"))?,
    )?;
    Ok(())
}

/// Write the output and preview of a rect layout.
pub fn save_rect_result(result: &RectLayoutResult, stem: &str) -> anyhow::Result<()> {
    save_png(&result.image, output_path(&format!("{stem}-image.png"))?)?;
    save_png(&result.preview, output_path(&format!("{stem}-preview.png"))?)?;
    Ok(())
}

/// White square with a black diagonal `thickness` pixels wide.
pub fn diagonal_guide(size: u32, thickness: u32) -> DynamicImage {
    let mut img = GrayImage::from_pixel(size, size, Luma([255]));
    for i in 0..size {
        for t in 0..thickness.min(size - i) {
            img.put_pixel(i, i + t, Luma([0]));
        }
    }
    DynamicImage::ImageLuma8(img)
}

pub fn swatch(size: u32, color: Rgb8) -> RgbaImage {
    RgbaImage::from_pixel(size, size, color.to_rgba(255))
}

/// One swatch per color in a comma separated hex list.
pub fn swatch_pool(size: u32, hex_list: &str) -> Vec<RgbaImage> {
    parse_hex_list(hex_list)
        .into_iter()
        .map(|c| swatch(size, c))
        .collect()
}
