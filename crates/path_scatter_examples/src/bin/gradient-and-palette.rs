use path_scatter::prelude::*;
use path_scatter_examples::{init_tracing, output_path, save_png};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let gradient = GradientSpec::new("#1d3557", 512, 256).with_range(0.1, 0.8);
    let image = gradient.render();
    save_png(&image, output_path("gradient-horizontal.png")?)?;

    let vertical = GradientSpec::new("#e63946", 256, 512)
        .with_direction(GradientDirection::Vertical)
        .with_reverse(true)
        .render();
    save_png(&vertical, output_path("gradient-vertical.png")?)?;

    // Palette of a composite with several known colors.
    let mut scene = image::RgbaImage::new(300, 100);
    for (x, _, px) in scene.enumerate_pixels_mut() {
        let c = match x / 100 {
            0 => Rgb8::new(230, 57, 70),
            1 => Rgb8::new(69, 123, 157),
            _ => Rgb8::new(241, 250, 238),
        };
        *px = c.to_rgba(255);
    }
    let config = PaletteConfig::new().with_num_colors(3).with_select(2);
    let palette = extract_palette(&image::DynamicImage::ImageRgba8(scene), &config);
    println!("palette: {}", palette.to_hex_list());
    println!("selected: {}", palette.selected);

    let complementary = extract_palette(
        &image::DynamicImage::ImageRgba8(vertical),
        &PaletteConfig::new().with_num_colors(2).with_complementary(true),
    );
    println!("complementary: {}", complementary.to_hex_list());
    Ok(())
}
