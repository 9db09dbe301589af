//! Camera transform construction for the Viewspace rendering engine.
//!
//! The crate computes the projection and model-view matrix pair a
//! rendering front end hands to the engine each frame, and exposes the
//! one-shot activation call that hands control over.  The engine itself
//! is intentionally kept outside of the crate so that the transform code
//! remains testable and easy to embed in headless tools.

pub mod config;
pub mod engine;
pub mod transform;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::ViewConfig;
pub use engine::{Bootstrap, Engine, HeadlessEngine};
pub use transform::{
    aspect_for, compute_transforms, format_matrix, Frustum, TransformError, Transforms,
    DEFAULT_MODEL_OFFSET,
};
