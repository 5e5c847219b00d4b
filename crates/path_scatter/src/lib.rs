#![forbid(unsafe_code)]
//! path_scatter: Path-guided random image layout.
//!
//! Modules:
//! - path: skeleton path extraction from a guide image (threshold, thinning, ordering, fallback circle)
//! - sampling: placement policies choosing path points and assigning pool images
//! - scatter: jitter transforms, compositing, previews, events and the layout runner
//! - rect: fit one image into the dark region of a background
//! - color: hex colors, alpha gradients and dominant-color palettes
//!
//! For examples and docs, see README and docs.rs.
pub mod color;
pub mod error;
pub mod path;
pub mod rect;
pub mod sampling;
pub mod scatter;

/// Convenient re-exports for common types. Import with `use path_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::color::{
        extract_palette, parse_hex_list, GradientDirection, GradientSpec, Palette, PaletteConfig,
        Rgb8,
    };
    pub use crate::error::{Error, Result};
    pub use crate::path::{FallbackReason, Path, PathExtraction, PathExtractor, PathOrder};
    pub use crate::rect::{
        find_dark_bounds, run_rect_layout, AspectFilter, Rect, RectLayoutConfig,
        RectLayoutResult, RectOutcome, RectSelection,
    };
    pub use crate::sampling::{
        IsometricPolicy, PlacementMode, PlacementPolicy, RandomPolicy, SequentialPolicy,
    };
    pub use crate::scatter::events::{
        EventSink, FnSink, LayoutEvent, LayoutEventKind, MultiSink, VecSink,
    };
    pub use crate::scatter::overlay::{render_points_preview, PreviewStyle};
    pub use crate::scatter::plan::{Placement, PlacementPlan};
    pub use crate::scatter::runner::{
        run_layout, run_layout_with_events, LayoutConfig, LayoutResult, LayoutRunner,
        ParameterClamp,
    };
    pub use crate::scatter::seed::resolve_seed;
    pub use crate::scatter::transform::{Jitter, TransformParams};
}
