//! # Cadence Graphics
//!
//! Data-driven render graph for the Cadence engine.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`RenderStepRegistry`] - configuration names to step tags and native passes
//! - [`RenderGraphCompiler`] - renderer config to [`RenderGraph`]
//! - [`RenderGraphExecutor`] - runs a compiled graph once per frame
//! - [`RenderProcess`] - graph reload and the per-frame render sequence
//! - [`services`] - the collaborator traits the render process drives
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use cadence_graphics::render_graph::{
//!     DescribedFullscreenPass, NativePassKind, RenderGraphCompiler, RenderStepRegistry,
//! };
//!
//! let mut builder = RenderStepRegistry::builder();
//! builder.register(NativePassKind::Lighting, |_dt: f32| {}).unwrap();
//! let registry = Arc::new(builder.build());
//!
//! let compiler = RenderGraphCompiler::new(registry, DescribedFullscreenPass::factory());
//! let graph = compiler
//!     .compile_str(r#"{ "name": "demo", "renderSteps": [{ "type": "RenderPassLighting" }] }"#)
//!     .unwrap();
//! assert_eq!(graph.step_count(), 1);
//! ```

pub mod error;
pub mod layout;
pub mod render_graph;
pub mod render_process;
pub mod services;

pub use error::{PassInitError, RenderGraphError, RenderGraphResult};
pub use layout::ImageLayout;
pub use render_graph::{
    ExecutionStats, GenericFullscreenPass, GenericPassFactory, NativePass, NativePassKind,
    RenderGraph, RenderGraphCompiler, RenderGraphConfig, RenderGraphExecutor, RenderStep,
    RenderStepRegistry, RenderStepTag,
};
pub use render_process::{ReloadPolicy, ReloadStatus, RenderProcess};
pub use services::{
    CameraRegistry, FrustumId, FrustumRegistry, ImageHandle, ImageRegistry, MeshRegistry,
    PresentationSurface, RenderServices, ShadowSystem,
};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
pub fn init() {
    log::info!("Cadence Graphics v{} initialized", VERSION);
}
