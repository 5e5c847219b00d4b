use image::{DynamicImage, Rgba, RgbaImage};
use path_scatter::prelude::*;
use path_scatter_examples::{init_tracing, save_rect_result};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Light background with a dark 3:2 panel.
    let mut background = RgbaImage::from_pixel(400, 300, Rgba([235, 235, 235, 255]));
    for y in 60..220 {
        for x in 80..320 {
            background.put_pixel(x, y, Rgba([20, 20, 30, 255]));
        }
    }
    let background = DynamicImage::ImageRgba8(background);

    let candidates = vec![
        RgbaImage::from_pixel(100, 100, Rgba([200, 50, 50, 255])),
        RgbaImage::from_pixel(90, 60, Rgba([50, 200, 50, 255])),
        RgbaImage::from_pixel(160, 90, Rgba([50, 50, 200, 255])),
    ];

    let config = RectLayoutConfig::new().with_aspect_ratio_threshold(0.2);
    let result = run_rect_layout(&background, &candidates, &config)?;
    match result.outcome {
        RectOutcome::Placed { index, region, size, .. } => println!(
            "placed image {index} at {}x{} inside region {region:?}",
            size.x, size.y
        ),
        other => println!("nothing placed: {other:?}"),
    }
    println!("unused images: {:?}", result.remaining);

    save_rect_result(&result, "rect-fit-basic")?;
    Ok(())
}
