use path_scatter::prelude::*;
use path_scatter_examples::{diagonal_guide, init_tracing, save_run_result, swatch};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // 512x512 guide with a thin diagonal, one red swatch placed three times.
    let guide = diagonal_guide(512, 2);
    let pool = vec![swatch(32, Rgb8::new(255, 0, 0))];

    let config = LayoutConfig::new()
        .with_mode(PlacementMode::Sequential)
        .with_count(3)
        .without_jitter();

    let result = LayoutRunner::try_new(config)?.run(&guide, &pool)?;
    for (i, p) in result.plan.iter().enumerate() {
        println!("placement {i}: point ({}, {})", p.point.x, p.point.y);
    }

    save_run_result(&result, "layout-diagonal-sequential")?;
    Ok(())
}
