#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    diagonal_guide, init_tracing, output_path, save_png, save_rect_result, save_run_result,
    swatch, swatch_pool,
};
