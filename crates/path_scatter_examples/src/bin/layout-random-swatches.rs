use path_scatter::prelude::*;
use path_scatter_examples::{diagonal_guide, init_tracing, save_run_result, swatch_pool};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let guide = diagonal_guide(512, 2);
    let pool = swatch_pool(32, "#e6194b, #3cb44b, #ffe119, #4363d8, #f58231");

    let config = LayoutConfig::new()
        .with_mode(PlacementMode::Random)
        .with_count(5)
        .with_seed(42);

    // Collect progress events alongside the result.
    let mut events = VecSink::only([
        LayoutEventKind::PathExtracted,
        LayoutEventKind::ImagesSelected,
        LayoutEventKind::RunFinished,
    ]);
    let result = run_layout_with_events(&guide, &pool, &config, &mut events)?;
    for event in events.as_slice() {
        println!("{event:?}");
    }
    println!("seed {} -> images {:?}", result.seed, result.plan.image_indices());

    save_run_result(&result, "layout-random-swatches")?;
    Ok(())
}
