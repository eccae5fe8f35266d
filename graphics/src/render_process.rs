//! The render process: owns the compiled graph and runs it every frame.
//!
//! Two entry points are driven by the frame loop:
//!
//! - [`RenderProcess::reload`] rebuilds the graph from the renderer config file.
//! - [`RenderProcess::render_frame`] runs the per-frame preamble (surface,
//!   frustums, culling, draw-call collection) and then executes the graph.
//!
//! The preamble order is a hard contract. Render steps assume culling and
//! draw-call collection already happened for this frame.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RenderGraphResult;
use crate::render_graph::{
    ExecutionStats, GenericPassFactory, RenderGraph, RenderGraphCompiler, RenderGraphExecutor,
    RenderStepRegistry,
};
use crate::services::{FrustumId, RenderServices};

/// What `reload` does with the installed graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReloadPolicy {
    /// Destroy the installed graph first, then load. A failed load leaves an
    /// empty graph.
    #[default]
    ClearThenLoad,
    /// Compile into a temporary and swap only on success. A failed load
    /// leaves the installed graph running.
    KeepPreviousOnFailure,
}

/// Outcome of a reload that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadStatus {
    /// A new graph is installed.
    Loaded { steps: usize, generic_passes: usize },
    /// The config file could not be opened. A warning was logged.
    ConfigUnavailable,
}

/// Owner of the render graph and the per-frame render sequence.
pub struct RenderProcess {
    config_path: PathBuf,
    compiler: RenderGraphCompiler,
    executor: RenderGraphExecutor,
    graph: RenderGraph,
    policy: ReloadPolicy,
    /// Reused every frame: camera frustum followed by shadow frustums.
    active_frustums: Vec<FrustumId>,
}

impl RenderProcess {
    /// Create a process with an empty graph. Call [`reload`](Self::reload)
    /// to load the config.
    pub fn new(
        config_path: impl Into<PathBuf>,
        registry: Arc<RenderStepRegistry>,
        factory: impl GenericPassFactory + 'static,
    ) -> Self {
        Self {
            config_path: config_path.into(),
            compiler: RenderGraphCompiler::new(registry.clone(), factory),
            executor: RenderGraphExecutor::new(registry),
            graph: RenderGraph::default(),
            policy: ReloadPolicy::default(),
            active_frustums: Vec::new(),
        }
    }

    /// Rebuild the graph from the config file.
    pub fn reload(&mut self) -> RenderGraphResult<ReloadStatus> {
        cadence_core::profile_function!();

        if self.policy == ReloadPolicy::ClearThenLoad {
            self.graph.clear();
        }

        let Some(text) = self.read_config() else {
            return Ok(ReloadStatus::ConfigUnavailable);
        };

        let graph = self.compiler.compile_str(&text)?;
        self.graph = graph;

        Ok(ReloadStatus::Loaded {
            steps: self.graph.step_count(),
            generic_passes: self.graph.generic_pass_count(),
        })
    }

    /// Run the frame preamble, execute the graph and end the frame.
    ///
    /// The surface's frame is ended even when execution fails; the execution
    /// error is returned afterwards.
    pub fn render_frame(
        &mut self,
        services: &mut RenderServices<'_>,
        delta_time: f32,
    ) -> RenderGraphResult<ExecutionStats> {
        cadence_core::profile_function!();

        services.surface.resize_if_needed();
        services.surface.begin_frame();

        {
            cadence_core::profile_scope!("preparation_and_culling");

            services.cameras.update_frustums();
            services.shadows.prepare_frustums();
            services.frustums.prepare_for_rendering();

            self.active_frustums.clear();
            self.active_frustums
                .push(services.cameras.active_camera_frustum());
            self.active_frustums
                .extend_from_slice(services.shadows.shadow_frustums());

            services.frustums.cull_nodes(&self.active_frustums);
        }

        {
            cadence_core::profile_scope!("collect_draw_calls");

            services.meshes.collect_visible_draw_calls();
            services.meshes.update_per_instance_data(0);
        }

        let result = self
            .executor
            .execute(&mut self.graph, &mut *services.images, delta_time);

        services.surface.end_frame();
        result
    }

    /// The installed graph.
    pub fn graph(&self) -> &RenderGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut RenderGraph {
        &mut self.graph
    }

    pub fn executor(&self) -> &RenderGraphExecutor {
        &self.executor
    }

    /// Frustums culled against in the most recent frame.
    pub fn active_frustums(&self) -> &[FrustumId] {
        &self.active_frustums
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Change the config file used by the next reload.
    pub fn set_config_path(&mut self, path: impl Into<PathBuf>) {
        self.config_path = path.into();
    }

    pub fn reload_policy(&self) -> ReloadPolicy {
        self.policy
    }

    pub fn set_reload_policy(&mut self, policy: ReloadPolicy) {
        self.policy = policy;
    }

    /// Read the config file. `None` when it is missing or unreadable, which
    /// includes directories and text that is not UTF-8.
    fn read_config(&self) -> Option<String> {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!(
                    "Failed to load renderer config from file '{}': {}",
                    self.config_path.display(),
                    e
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for RenderProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderProcess")
            .field("config_path", &self.config_path)
            .field("policy", &self.policy)
            .field("graph", &self.graph)
            .finish_non_exhaustive()
    }
}
