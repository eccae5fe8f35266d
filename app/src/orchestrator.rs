//! The per-frame sequence.
//!
//! [`FrameOrchestrator::run_frame`] drives one frame:
//!
//! 1. tick the [`FrameClock`]
//! 2. reset input, pump events
//! 3. update game state
//! 4. fixed-step physics, then `after_physics`
//! 5. blend post effects, fire events
//! 6. render through the [`RenderProcess`]
//! 7. `after_render`

use cadence_core::{FixedStepAccumulator, FrameClock, FrameTime};
use cadence_graphics::{ExecutionStats, RenderProcess, RenderServices};

use crate::error::FrameError;
use crate::handler::FrameHandler;

/// What happened during one [`FrameOrchestrator::run_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Timing of the frame.
    pub time: FrameTime,
    /// Fixed physics steps taken.
    pub physics_steps: u32,
    /// Render graph execution counters.
    pub render: ExecutionStats,
    /// `false` when the handler asked to stop.
    pub keep_running: bool,
}

/// Owner of the frame clock, the physics accumulator and the render process.
#[derive(Debug)]
pub struct FrameOrchestrator {
    clock: FrameClock,
    physics: FixedStepAccumulator,
    render: RenderProcess,
}

impl FrameOrchestrator {
    pub fn new(clock: FrameClock, physics: FixedStepAccumulator, render: RenderProcess) -> Self {
        Self {
            clock,
            physics,
            render,
        }
    }

    /// Restart timing and drop accumulated physics time. The render graph
    /// stays installed.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.physics.reset();
    }

    /// Run one frame.
    ///
    /// A render failure is returned as [`FrameError::Render`] after
    /// [`FrameHandler::after_render`] ran. The clock has advanced either way,
    /// so the next frame is timed normally.
    pub fn run_frame<H: FrameHandler + ?Sized>(
        &mut self,
        handler: &mut H,
        services: &mut RenderServices<'_>,
    ) -> Result<FrameReport, FrameError> {
        cadence_core::profile_function!();

        let time = self.clock.tick();
        let dt = time.delta_time;
        cadence_core::profile_plot!("delta_time", dt);

        let keep_running;
        let physics_steps;
        {
            cadence_core::profile_scope!("non_render_tasks");

            handler.reset_input();
            keep_running = handler.pump_events();
            if !keep_running {
                log::debug!("Stop requested during frame {}", time.frame);
            }

            handler.update_game_state(dt);

            {
                cadence_core::profile_scope!("physics");
                physics_steps = self.physics.advance(dt, |step| {
                    handler.dispatch_simulation(step);
                    handler.sync_simulation();
                });
                handler.after_physics();
            }
            cadence_core::profile_plot!("physics_steps", physics_steps);

            handler.blend_post_effects();
            handler.fire_events();
        }

        let rendered = {
            cadence_core::profile_scope!("render_tasks");
            self.render.render_frame(services, dt)
        };
        handler.after_render();

        cadence_core::frame_mark!();

        let render = rendered?;
        log::trace!(
            "Frame {} done: dt={:.4}s, {} physics steps, {} render steps",
            time.frame,
            dt,
            physics_steps,
            render.steps_executed
        );

        Ok(FrameReport {
            time,
            physics_steps,
            render,
            keep_running,
        })
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    pub fn physics(&self) -> &FixedStepAccumulator {
        &self.physics
    }

    pub fn render_process(&self) -> &RenderProcess {
        &self.render
    }

    pub fn render_process_mut(&mut self) -> &mut RenderProcess {
        &mut self.render
    }
}
