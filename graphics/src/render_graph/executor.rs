//! Render graph executor.

use std::sync::Arc;

use crate::error::{RenderGraphError, RenderGraphResult};
use crate::services::ImageRegistry;

use super::registry::RenderStepRegistry;
use super::step::RenderStep;
use super::RenderGraph;

/// Counters for one execution of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub steps_executed: usize,
    pub barriers: usize,
    pub generic_passes: usize,
    pub native_passes: usize,
}

/// Runs a compiled graph's steps, once per frame, strictly in order.
///
/// Every step is executed; none is skipped, reordered or run in parallel. A
/// step that cannot be dispatched stops the frame at that step with an
/// error. Steps after it do not run.
pub struct RenderGraphExecutor {
    registry: Arc<RenderStepRegistry>,
}

impl RenderGraphExecutor {
    pub fn new(registry: Arc<RenderStepRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<RenderStepRegistry> {
        &self.registry
    }

    /// Execute every step of `graph`.
    ///
    /// Barrier images are resolved through `images` at this point, so a
    /// re-registered image is picked up by the next execution.
    pub fn execute(
        &self,
        graph: &mut RenderGraph,
        images: &mut dyn ImageRegistry,
        delta_time: f32,
    ) -> RenderGraphResult<ExecutionStats> {
        cadence_core::profile_scope!("execute_render_steps");

        let mut stats = ExecutionStats::default();
        let (steps, generic_passes) = graph.split_mut();

        for (position, step) in steps.iter().enumerate() {
            let result = match step {
                RenderStep::GenericFullscreen { index } => {
                    match generic_passes.get_mut(usize::from(*index)) {
                        Some(pass) => {
                            pass.render(delta_time);
                            stats.generic_passes += 1;
                            Ok(())
                        }
                        None => Err(RenderGraphError::InvalidGenericPassIndex {
                            index: *index,
                            count: generic_passes.len(),
                        }),
                    }
                }
                RenderStep::ImageMemoryBarrier {
                    source,
                    target,
                    image,
                } => match images.resolve(image.as_str()) {
                    Some(handle) => {
                        images.insert_image_memory_barrier(handle, *source, *target);
                        stats.barriers += 1;
                        Ok(())
                    }
                    None => Err(RenderGraphError::UnknownImage(image.to_string())),
                },
                RenderStep::Native { tag } => match self.registry.native_pass(*tag) {
                    Some(pass) => {
                        pass.render(delta_time);
                        stats.native_passes += 1;
                        Ok(())
                    }
                    None => Err(RenderGraphError::UnregisteredTag(*tag)),
                },
            };

            if let Err(err) = result {
                log::error!("Failed to execute render step {position}: {err}");
                return Err(err);
            }

            log::trace!("Executed render step {position}: {step:?}");
            stats.steps_executed += 1;
        }

        Ok(stats)
    }
}
