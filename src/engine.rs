use anyhow::Result;
use log::info;

use crate::config::ViewConfig;
use crate::transform::{self, Transforms};

/// Boundary to the external rendering engine.
///
/// The engine is opaque to this crate: starting it hands control over,
/// and whatever happens afterwards, including how failures are reported,
/// is the engine's own contract.  Errors returned here are propagated
/// unmodified.
pub trait Engine {
    fn start(&mut self) -> Result<()>;
}

/// One-shot activation handle for an engine.
///
/// `start` consumes the handle, so a second activation is not
/// representable in safe code.
pub struct Bootstrap {
    engine: Box<dyn Engine>,
}

impl Bootstrap {
    pub fn new(engine: Box<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Hands control to the engine.
    pub fn start(mut self) -> Result<()> {
        self.engine.start()
    }
}

/// Engine stand-in for headless runs and tests: computes the transforms
/// for its view and logs them instead of rendering.
pub struct HeadlessEngine {
    config: ViewConfig,
}

impl HeadlessEngine {
    pub fn new(config: ViewConfig) -> Self {
        Self { config }
    }
}

impl Engine for HeadlessEngine {
    fn start(&mut self) -> Result<()> {
        let Transforms {
            projection,
            model_view,
        } = transform::compute_transforms(self.config.frustum(), self.config.offset)?;
        info!(
            "projection matrix:\n{}",
            transform::format_matrix(&projection)
        );
        info!(
            "model-view matrix:\n{}",
            transform::format_matrix(&model_view)
        );
        Ok(())
    }
}
