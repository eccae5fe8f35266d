//! Collaborator interfaces consumed by the render process.
//!
//! The render graph does not own images, cameras, meshes or the swapchain.
//! It reaches them through these narrow traits, one per subsystem, bundled
//! into [`RenderServices`] for a frame.

use crate::layout::ImageLayout;

/// Opaque handle to an image owned by an [`ImageRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// Opaque handle to a frustum owned by a [`FrustumRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrustumId(pub u32);

/// Named GPU images and layout transitions between them.
pub trait ImageRegistry {
    /// Resolve an image by name. Called on every barrier execution, so the
    /// result may change between frames.
    fn resolve(&self, name: &str) -> Option<ImageHandle>;

    /// Record a layout transition barrier for `image`.
    fn insert_image_memory_barrier(
        &mut self,
        image: ImageHandle,
        source: ImageLayout,
        target: ImageLayout,
    );
}

/// Cameras and the frustums derived from them.
pub trait CameraRegistry {
    /// Recompute the frustums of every active camera.
    fn update_frustums(&mut self);

    /// Frustum of the currently active camera.
    fn active_camera_frustum(&self) -> FrustumId;
}

/// Shadow-casting lights.
pub trait ShadowSystem {
    /// Recompute the shadow frustums for this frame.
    fn prepare_frustums(&mut self);

    /// Shadow frustums in registration order.
    fn shadow_frustums(&self) -> &[FrustumId];
}

/// Frustum storage and visibility culling.
pub trait FrustumRegistry {
    /// Bring every active frustum up to date for rendering.
    fn prepare_for_rendering(&mut self);

    /// Cull scene nodes against `frustums`, in order.
    fn cull_nodes(&mut self, frustums: &[FrustumId]);
}

/// Mesh draw-call collection.
pub trait MeshRegistry {
    /// Gather draw calls for everything that survived culling.
    fn collect_visible_draw_calls(&mut self);

    /// Upload per-instance data into the given buffer stream.
    fn update_per_instance_data(&mut self, stream_index: u32);
}

/// Swapchain and frame boundaries.
pub trait PresentationSurface {
    /// Recreate the swapchain if the window size changed.
    fn resize_if_needed(&mut self);

    fn begin_frame(&mut self);

    fn end_frame(&mut self);
}

/// Every collaborator a frame needs, borrowed for the duration of one call.
///
/// One object may implement several traits; it is then split into disjoint
/// borrows by the caller, or the services are held by separate fields.
pub struct RenderServices<'a> {
    pub images: &'a mut dyn ImageRegistry,
    pub cameras: &'a mut dyn CameraRegistry,
    pub shadows: &'a mut dyn ShadowSystem,
    pub frustums: &'a mut dyn FrustumRegistry,
    pub meshes: &'a mut dyn MeshRegistry,
    pub surface: &'a mut dyn PresentationSurface,
}

impl std::fmt::Debug for RenderServices<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderServices").finish_non_exhaustive()
    }
}
