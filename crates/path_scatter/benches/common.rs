#![allow(dead_code)]
use std::time::Duration;

use criterion::{Criterion, Throughput};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// White square with a black diagonal `thickness` pixels wide.
pub fn diagonal_guide(size: u32, thickness: u32) -> DynamicImage {
    let mut img = GrayImage::from_pixel(size, size, Luma([255]));
    for i in 0..size {
        for t in 0..thickness {
            if i + t < size {
                img.put_pixel(i, i + t, Luma([0]));
            }
        }
    }
    DynamicImage::ImageLuma8(img)
}

/// White square with isolated black dots every `step` pixels.
pub fn dotted_guide(size: u32, step: u32) -> DynamicImage {
    let mut img = GrayImage::from_pixel(size, size, Luma([255]));
    for y in (0..size).step_by(step as usize) {
        for x in (0..size).step_by(step as usize) {
            img.put_pixel(x, y, Luma([0]));
        }
    }
    DynamicImage::ImageLuma8(img)
}

/// `n` solid swatches of side `size` with distinct hues.
pub fn swatch_pool(n: usize, size: u32) -> Vec<RgbaImage> {
    (0..n)
        .map(|i| {
            let v = (i * 255 / n.max(1)) as u8;
            RgbaImage::from_pixel(size, size, Rgba([v, 255 - v, 128, 255]))
        })
        .collect()
}
