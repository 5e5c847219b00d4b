//! Layout pipeline: plans, image selection, transforms, compositing, previews,
//! events, and the runner tying them together.
pub mod canvas;
pub mod events;
pub mod overlay;
pub mod plan;
pub mod runner;
pub mod seed;
pub mod selection;
pub mod transform;
