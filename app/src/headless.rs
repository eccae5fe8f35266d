//! In-memory collaborators for running the frame loop without a GPU.
//!
//! [`HeadlessServices`] implements every collaborator trait with plain
//! bookkeeping and `trace!` logging, [`headless_registry`] registers the
//! built-in native passes as logging passes. Together they let the full frame
//! sequence and any renderer config run in CI or from the command line.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use cadence_graphics::{
    CameraRegistry, FrustumId, FrustumRegistry, ImageHandle, ImageLayout, ImageRegistry,
    MeshRegistry, NativePass, NativePassKind, PresentationSurface, RenderGraphResult,
    RenderServices, RenderStepRegistry, ShadowSystem,
};

use crate::handler::FrameHandler;

// ============================================================================
// Collaborators
// ============================================================================

/// Named images. Handles are assigned in registration order.
#[derive(Debug, Default)]
pub struct HeadlessImages {
    names: HashMap<String, ImageHandle>,
    layouts: HashMap<ImageHandle, ImageLayout>,
    barriers: u64,
}

impl HeadlessImages {
    /// Register `name`, returning its handle. Registering twice returns the
    /// existing handle.
    pub fn register(&mut self, name: &str) -> ImageHandle {
        let next = ImageHandle(self.names.len() as u32);
        *self.names.entry(name.to_string()).or_insert(next)
    }

    /// Layout the image was last transitioned to.
    pub fn layout(&self, image: ImageHandle) -> Option<ImageLayout> {
        self.layouts.get(&image).copied()
    }

    pub fn barrier_count(&self) -> u64 {
        self.barriers
    }
}

impl ImageRegistry for HeadlessImages {
    fn resolve(&self, name: &str) -> Option<ImageHandle> {
        self.names.get(name).copied()
    }

    fn insert_image_memory_barrier(
        &mut self,
        image: ImageHandle,
        source: ImageLayout,
        target: ImageLayout,
    ) {
        log::trace!("Barrier on image {:?}: {} -> {}", image, source, target);
        if let Some(current) = self.layouts.get(&image)
            && *current != source
        {
            log::debug!(
                "Barrier on image {:?} expects {} but the image is in {}",
                image,
                source,
                current
            );
        }
        self.layouts.insert(image, target);
        self.barriers += 1;
    }
}

/// A single camera with a fixed frustum id.
#[derive(Debug)]
pub struct HeadlessCameras {
    frustum: FrustumId,
    updates: u64,
}

impl HeadlessCameras {
    pub fn update_count(&self) -> u64 {
        self.updates
    }
}

impl CameraRegistry for HeadlessCameras {
    fn update_frustums(&mut self) {
        log::trace!("Updating camera frustums");
        self.updates += 1;
    }

    fn active_camera_frustum(&self) -> FrustumId {
        self.frustum
    }
}

/// Shadow cascades with consecutive frustum ids after the camera's.
#[derive(Debug)]
pub struct HeadlessShadows {
    frustums: Vec<FrustumId>,
}

impl ShadowSystem for HeadlessShadows {
    fn prepare_frustums(&mut self) {
        log::trace!("Preparing {} shadow frustums", self.frustums.len());
    }

    fn shadow_frustums(&self) -> &[FrustumId] {
        &self.frustums
    }
}

#[derive(Debug, Default)]
pub struct HeadlessFrustums {
    last_culled: Vec<FrustumId>,
}

impl HeadlessFrustums {
    /// Frustums passed to the most recent cull.
    pub fn last_culled(&self) -> &[FrustumId] {
        &self.last_culled
    }
}

impl FrustumRegistry for HeadlessFrustums {
    fn prepare_for_rendering(&mut self) {
        log::trace!("Preparing frustums for rendering");
    }

    fn cull_nodes(&mut self, frustums: &[FrustumId]) {
        log::trace!("Culling nodes against {} frustums", frustums.len());
        self.last_culled.clear();
        self.last_culled.extend_from_slice(frustums);
    }
}

#[derive(Debug, Default)]
pub struct HeadlessMeshes {
    collections: u64,
}

impl HeadlessMeshes {
    pub fn collection_count(&self) -> u64 {
        self.collections
    }
}

impl MeshRegistry for HeadlessMeshes {
    fn collect_visible_draw_calls(&mut self) {
        log::trace!("Collecting visible draw calls");
        self.collections += 1;
    }

    fn update_per_instance_data(&mut self, stream_index: u32) {
        log::trace!("Updating per-instance data stream {}", stream_index);
    }
}

/// Frame bracketing. Tracks whether a frame is open.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    resize_pending: bool,
    in_frame: bool,
    frames_begun: u64,
    frames_ended: u64,
    resizes: u64,
}

impl HeadlessSurface {
    /// Make the next `resize_if_needed` perform a resize.
    pub fn request_resize(&mut self) {
        self.resize_pending = true;
    }

    pub fn frames_begun(&self) -> u64 {
        self.frames_begun
    }

    pub fn frames_ended(&self) -> u64 {
        self.frames_ended
    }

    pub fn resize_count(&self) -> u64 {
        self.resizes
    }

    /// `true` between `begin_frame` and `end_frame`.
    pub fn in_frame(&self) -> bool {
        self.in_frame
    }
}

impl PresentationSurface for HeadlessSurface {
    fn resize_if_needed(&mut self) {
        if std::mem::take(&mut self.resize_pending) {
            log::debug!("Resizing headless surface");
            self.resizes += 1;
        }
    }

    fn begin_frame(&mut self) {
        if self.in_frame {
            log::warn!("begin_frame called while a frame is already open");
        }
        self.in_frame = true;
        self.frames_begun += 1;
    }

    fn end_frame(&mut self) {
        self.in_frame = false;
        self.frames_ended += 1;
    }
}

/// The full headless collaborator set.
#[derive(Debug)]
pub struct HeadlessServices {
    pub images: HeadlessImages,
    pub cameras: HeadlessCameras,
    pub shadows: HeadlessShadows,
    pub frustums: HeadlessFrustums,
    pub meshes: HeadlessMeshes,
    pub surface: HeadlessSurface,
}

impl HeadlessServices {
    /// Default number of shadow cascades.
    pub const DEFAULT_SHADOW_CASCADES: u32 = 4;

    pub fn new() -> Self {
        Self::with_shadow_cascades(Self::DEFAULT_SHADOW_CASCADES)
    }

    /// One camera frustum (id 0) followed by `cascades` shadow frustums.
    pub fn with_shadow_cascades(cascades: u32) -> Self {
        Self {
            images: HeadlessImages::default(),
            cameras: HeadlessCameras {
                frustum: FrustumId(0),
                updates: 0,
            },
            shadows: HeadlessShadows {
                frustums: (1..=cascades).map(FrustumId).collect(),
            },
            frustums: HeadlessFrustums::default(),
            meshes: HeadlessMeshes::default(),
            surface: HeadlessSurface::default(),
        }
    }

    /// Register an image by name.
    pub fn register_image(&mut self, name: &str) -> ImageHandle {
        self.images.register(name)
    }

    /// Borrow every collaborator for one frame.
    pub fn services(&mut self) -> RenderServices<'_> {
        RenderServices {
            images: &mut self.images,
            cameras: &mut self.cameras,
            shadows: &mut self.shadows,
            frustums: &mut self.frustums,
            meshes: &mut self.meshes,
            surface: &mut self.surface,
        }
    }
}

impl Default for HeadlessServices {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Native passes
// ============================================================================

/// Per-kind render counts shared with the logging passes.
#[derive(Debug, Clone, Default)]
pub struct PassCounts(Arc<Mutex<HashMap<NativePassKind, u64>>>);

impl PassCounts {
    /// Times `kind` rendered so far.
    pub fn get(&self, kind: NativePassKind) -> u64 {
        self.0.lock().get(&kind).copied().unwrap_or(0)
    }

    /// Renders across all kinds.
    pub fn total(&self) -> u64 {
        self.0.lock().values().sum()
    }
}

struct LoggingPass {
    kind: NativePassKind,
    counts: PassCounts,
}

impl NativePass for LoggingPass {
    fn render(&self, delta_time: f32) {
        log::trace!("{} (dt={:.4}s)", self.kind.name(), delta_time);
        *self.counts.0.lock().entry(self.kind).or_insert(0) += 1;
    }
}

/// A registry with every built-in native pass kind as a logging pass.
pub fn headless_registry() -> RenderGraphResult<Arc<RenderStepRegistry>> {
    headless_registry_with_counts(&PassCounts::default())
}

/// Like [`headless_registry`], counting renders into `counts`.
pub fn headless_registry_with_counts(
    counts: &PassCounts,
) -> RenderGraphResult<Arc<RenderStepRegistry>> {
    let mut builder = RenderStepRegistry::builder();
    for kind in NativePassKind::ALL {
        builder.register(
            kind,
            LoggingPass {
                kind,
                counts: counts.clone(),
            },
        )?;
    }
    Ok(Arc::new(builder.build()))
}

// ============================================================================
// Handler
// ============================================================================

/// A handler that integrates a constant velocity with the physics steps and
/// optionally stops after a number of frames.
#[derive(Debug, Default)]
pub struct HeadlessHandler {
    /// Stop once this many frames have pumped events.
    pub stop_after: Option<u64>,
    frames: u64,
    physics_steps: u64,
    simulated_time: f64,
}

impl HeadlessHandler {
    pub fn stopping_after(frames: u64) -> Self {
        Self {
            stop_after: Some(frames),
            ..Default::default()
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn physics_steps(&self) -> u64 {
        self.physics_steps
    }

    /// Time covered by the physics steps taken so far.
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }
}

impl FrameHandler for HeadlessHandler {
    fn pump_events(&mut self) -> bool {
        self.frames += 1;
        self.stop_after.is_none_or(|limit| self.frames < limit)
    }

    fn dispatch_simulation(&mut self, step: f32) {
        self.simulated_time += f64::from(step);
        self.physics_steps += 1;
    }
}
