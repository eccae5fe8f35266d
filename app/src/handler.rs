//! Frame handler trait.

/// Game-side hooks invoked by the [`FrameOrchestrator`](crate::FrameOrchestrator).
///
/// Every method has a default no-op implementation, so you only need to
/// implement the ones you care about. Within a frame the hooks run in
/// declaration order, with rendering between [`fire_events`](Self::fire_events)
/// and [`after_render`](Self::after_render).
///
/// # Example
///
/// ```
/// use cadence_app::FrameHandler;
///
/// struct Simulation {
///     position: f32,
///     velocity: f32,
/// }
///
/// impl FrameHandler for Simulation {
///     fn dispatch_simulation(&mut self, step: f32) {
///         self.position += self.velocity * step;
///     }
/// }
/// ```
pub trait FrameHandler {
    /// Clear per-frame input state before events are pumped.
    fn reset_input(&mut self) {}

    /// Process pending platform events.
    ///
    /// Returns `true` to continue running, `false` to request exit. The
    /// current frame still completes.
    fn pump_events(&mut self) -> bool {
        true
    }

    /// Advance game logic by the frame delta.
    fn update_game_state(&mut self, _delta_time: f32) {}

    /// Start one fixed physics step.
    fn dispatch_simulation(&mut self, _step: f32) {}

    /// Block until the step started by
    /// [`dispatch_simulation`](Self::dispatch_simulation) has completed.
    fn sync_simulation(&mut self) {}

    /// Called once after all physics steps of the frame, even when none ran.
    ///
    /// Use this to copy simulated transforms back onto scene nodes.
    fn after_physics(&mut self) {}

    /// Blend post-processing effect volumes for the camera.
    fn blend_post_effects(&mut self) {}

    /// Deliver queued game events.
    fn fire_events(&mut self) {}

    /// Called after the render graph ran, also when rendering failed.
    fn after_render(&mut self) {}
}
