//! Data-driven render graph.
//!
//! A renderer configuration lists render steps in execution order. The
//! [`RenderGraphCompiler`] turns it into a [`RenderGraph`]: a flat sequence of
//! [`RenderStep`]s plus an arena of the generic passes those steps index. The
//! [`RenderGraphExecutor`] walks the sequence once per frame.
//!
//! | Step kind | Configuration `type` | Dispatch |
//! |-----------|----------------------|----------|
//! | [`RenderStep::ImageMemoryBarrier`] | `ImageMemoryBarrier` | image registry, resolved by name each frame |
//! | [`RenderStep::GenericFullscreen`] | `RenderPassGenericFullscreen` | pass arena, by index |
//! | [`RenderStep::Native`] | any name in the [`RenderStepRegistry`] | registry, by tag |
//!
//! Declaration order is execution order. Nothing is reordered, merged or
//! skipped.

mod compiler;
mod config;
mod executor;
mod generic;
mod registry;
mod step;

pub use compiler::RenderGraphCompiler;
pub use config::RenderGraphConfig;
pub use executor::{ExecutionStats, RenderGraphExecutor};
pub use generic::{
    DescribedFullscreenPass, FullscreenPassDesc, GenericFullscreenPass, GenericPassFactory,
};
pub use registry::{
    GENERIC_FULLSCREEN_NAME, IMAGE_MEMORY_BARRIER_NAME, NativePass, NativePassKind,
    RenderStepRegistry, RenderStepRegistryBuilder,
};
pub use step::{RenderStep, RenderStepTag, ResourceName};

use std::fmt;

use crate::error::{RenderGraphError, RenderGraphResult};

/// Maximum number of generic passes a graph can hold (8-bit index).
pub const MAX_GENERIC_PASSES: usize = 256;

/// A compiled render graph.
///
/// Owns its generic pass instances. Steps refer to them by arena index,
/// never by address, so growing the arena during compilation cannot
/// invalidate earlier steps.
pub struct RenderGraph {
    name: String,
    steps: Vec<RenderStep>,
    generic_passes: Vec<Box<dyn GenericFullscreenPass>>,
}

impl RenderGraph {
    /// Create an empty graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            generic_passes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[RenderStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn generic_pass_count(&self) -> usize {
        self.generic_passes.len()
    }

    /// Generic pass at an arena index.
    pub fn generic_pass(&self, index: u8) -> Option<&dyn GenericFullscreenPass> {
        self.generic_passes
            .get(usize::from(index))
            .map(|pass| pass.as_ref())
    }

    /// Whether the graph has no steps and owns no passes.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.generic_passes.is_empty()
    }

    /// Destroy every generic pass in creation order and drop all steps.
    pub fn clear(&mut self) {
        for pass in &mut self.generic_passes {
            pass.destroy();
        }
        self.generic_passes.clear();
        self.steps.clear();
    }

    pub(crate) fn push_step(&mut self, step: RenderStep) {
        self.steps.push(step);
    }

    /// Move a pass into the arena and return its index together with the
    /// pass, so the caller can initialize it in place.
    pub(crate) fn push_generic_pass(
        &mut self,
        pass: Box<dyn GenericFullscreenPass>,
    ) -> RenderGraphResult<(u8, &mut (dyn GenericFullscreenPass + 'static))> {
        let index = u8::try_from(self.generic_passes.len()).map_err(|_| {
            RenderGraphError::TooManyGenericPasses {
                limit: MAX_GENERIC_PASSES,
            }
        })?;
        self.generic_passes.push(pass);
        Ok((index, self.generic_passes[usize::from(index)].as_mut()))
    }

    pub fn generic_pass_mut(&mut self, index: u8) -> Option<&mut (dyn GenericFullscreenPass + 'static)> {
        self.generic_passes
            .get_mut(usize::from(index))
            .map(|pass| pass.as_mut())
    }

    /// Steps and the pass arena, borrowed separately for execution.
    pub(crate) fn split_mut(&mut self) -> (&[RenderStep], &mut [Box<dyn GenericFullscreenPass>]) {
        (&self.steps, &mut self.generic_passes)
    }
}

impl Default for RenderGraph {
    fn default() -> Self {
        Self::new("unnamed")
    }
}

impl Drop for RenderGraph {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Debug for RenderGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passes: Vec<&str> = self.generic_passes.iter().map(|p| p.name()).collect();
        f.debug_struct("RenderGraph")
            .field("name", &self.name)
            .field("steps", &self.steps)
            .field("generic_passes", &passes)
            .finish()
    }
}
