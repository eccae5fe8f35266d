//! Render graph compilation.
//!
//! Turns a [`RenderGraphConfig`] into a [`RenderGraph`]. Each entry of
//! `renderSteps` becomes exactly one step, in the same position:
//!
//! 1. `ImageMemoryBarrier` needs `sourceImageLayout`, `targetImageLayout` and
//!    `image`. The image is only named here; it does not have to exist until
//!    the step executes.
//! 2. `RenderPassGenericFullscreen` creates a pass through the factory, moves
//!    it into the graph's arena and initialises it with the whole entry.
//! 3. Any name in the [`RenderStepRegistry`] becomes a native step.
//! 4. Anything else is an error.
//!
//! Compilation is all or nothing. On error the partially built graph is
//! dropped, destroying the generic passes it already created.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{RenderGraphError, RenderGraphResult};
use crate::layout::ImageLayout;

use super::config::RenderGraphConfig;
use super::generic::GenericPassFactory;
use super::registry::{GENERIC_FULLSCREEN_NAME, IMAGE_MEMORY_BARRIER_NAME, RenderStepRegistry};
use super::step::{RenderStep, ResourceName};
use super::RenderGraph;

/// Compiles renderer configurations against a registry and a generic pass
/// factory.
pub struct RenderGraphCompiler {
    registry: Arc<RenderStepRegistry>,
    factory: Arc<dyn GenericPassFactory>,
}

impl RenderGraphCompiler {
    pub fn new(registry: Arc<RenderStepRegistry>, factory: impl GenericPassFactory + 'static) -> Self {
        Self::with_shared_factory(registry, Arc::new(factory))
    }

    pub fn with_shared_factory(
        registry: Arc<RenderStepRegistry>,
        factory: Arc<dyn GenericPassFactory>,
    ) -> Self {
        Self { registry, factory }
    }

    /// Registry native steps are resolved against.
    pub fn registry(&self) -> &Arc<RenderStepRegistry> {
        &self.registry
    }

    /// Compile JSON text.
    pub fn compile_str(&self, text: &str) -> RenderGraphResult<RenderGraph> {
        let config: RenderGraphConfig = serde_json::from_str(text)?;
        self.compile(&config)
    }

    /// Compile an already parsed JSON document.
    pub fn compile_value(&self, value: &Value) -> RenderGraphResult<RenderGraph> {
        let config = RenderGraphConfig::deserialize(value)?;
        self.compile(&config)
    }

    /// Compile a configuration into a new graph.
    pub fn compile(&self, config: &RenderGraphConfig) -> RenderGraphResult<RenderGraph> {
        cadence_core::profile_function!();
        log::info!("Loading renderer config '{}'", config.name);

        let mut graph = RenderGraph::new(config.name.as_str());
        for (index, entry) in config.render_steps.iter().enumerate() {
            self.compile_step(&mut graph, index, entry)?;
        }

        log::debug!(
            "Compiled renderer config '{}': {} steps, {} generic passes",
            config.name,
            graph.step_count(),
            graph.generic_pass_count()
        );
        Ok(graph)
    }

    fn compile_step(
        &self,
        graph: &mut RenderGraph,
        index: usize,
        entry: &Value,
    ) -> RenderGraphResult<()> {
        let type_name = entry
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid(index, "missing string field 'type'"))?;

        let step = match type_name {
            IMAGE_MEMORY_BARRIER_NAME => {
                let source = layout_field(index, entry, "sourceImageLayout")?;
                let target = layout_field(index, entry, "targetImageLayout")?;
                let image = string_field(index, entry, "image")?;
                RenderStep::ImageMemoryBarrier {
                    source,
                    target,
                    image: ResourceName::new(image),
                }
            }
            GENERIC_FULLSCREEN_NAME => {
                let (pass_index, pass) = graph.push_generic_pass(self.factory.create())?;
                pass.init(entry)
                    .map_err(|source| RenderGraphError::PassInit { index, source })?;
                RenderStep::GenericFullscreen { index: pass_index }
            }
            name => match self.registry.tag_of(name) {
                Some(tag) => RenderStep::Native { tag },
                None => {
                    return Err(RenderGraphError::UnknownStepType {
                        index,
                        type_name: name.to_string(),
                    });
                }
            },
        };

        log::debug!("Render step {index}: {type_name} -> {step:?}");
        graph.push_step(step);
        Ok(())
    }
}

fn invalid(index: usize, reason: impl Into<String>) -> RenderGraphError {
    RenderGraphError::InvalidStep {
        index,
        reason: reason.into(),
    }
}

fn string_field<'a>(index: usize, entry: &'a Value, field: &str) -> RenderGraphResult<&'a str> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(index, format!("missing string field '{field}'")))
}

fn layout_field(index: usize, entry: &Value, field: &str) -> RenderGraphResult<ImageLayout> {
    let name = string_field(index, entry, field)?;
    ImageLayout::from_name(name).ok_or_else(|| RenderGraphError::UnknownImageLayout {
        index,
        layout: name.to_string(),
    })
}
