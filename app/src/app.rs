//! Main application struct and run loop.

use std::sync::Arc;

use cadence_core::FrameClock;
use cadence_graphics::{
    GenericPassFactory, RenderGraphError, RenderProcess, RenderServices, RenderStepRegistry,
    ReloadStatus,
};

use crate::error::{AppResult, FrameError};
use crate::handler::FrameHandler;
use crate::orchestrator::{FrameOrchestrator, FrameReport};
use crate::settings::Settings;

/// Main application struct: settings plus the frame orchestrator.
///
/// # Example
///
/// ```no_run
/// use cadence_app::{App, HeadlessHandler, HeadlessServices, Settings, headless_registry};
/// use cadence_graphics::render_graph::DescribedFullscreenPass;
///
/// let mut app = App::new(
///     Settings::default(),
///     headless_registry().unwrap(),
///     DescribedFullscreenPass::factory(),
/// )
/// .unwrap();
///
/// let mut services = HeadlessServices::new();
/// let mut handler = HeadlessHandler::default();
/// let frames = app.run(&mut handler, &mut services.services(), Some(60)).unwrap();
/// assert_eq!(frames, 60);
/// ```
#[derive(Debug)]
pub struct App {
    settings: Settings,
    orchestrator: FrameOrchestrator,
}

impl App {
    /// Build the frame loop described by `settings` and load the renderer
    /// config.
    ///
    /// A missing or unreadable renderer config is not an error: a warning is logged and
    /// the app starts with an empty render graph. A malformed one is.
    pub fn new(
        settings: Settings,
        registry: Arc<RenderStepRegistry>,
        factory: impl GenericPassFactory + 'static,
    ) -> AppResult<Self> {
        settings.validate()?;

        let mut clock = FrameClock::new(settings.frame_clock_config()?);
        clock.set_wait_strategy(settings.wait_strategy.build());

        let physics = settings.fixed_step()?;

        let mut render = RenderProcess::new(&settings.renderer_config, registry, factory);
        render.set_reload_policy(settings.reload_policy);

        let mut app = Self {
            settings,
            orchestrator: FrameOrchestrator::new(clock, physics, render),
        };
        app.reload_renderer()?;
        Ok(app)
    }

    /// Run frames until the handler stops or `max_frames` frames ran.
    ///
    /// Returns the number of frames run. The first render failure ends the
    /// loop and is returned.
    pub fn run<H: FrameHandler + ?Sized>(
        &mut self,
        handler: &mut H,
        services: &mut RenderServices<'_>,
        max_frames: Option<u64>,
    ) -> Result<u64, FrameError> {
        let mut frames = 0u64;
        loop {
            if max_frames.is_some_and(|max| frames >= max) {
                log::info!("Reached max frames ({}), exiting", frames);
                break;
            }

            let report = self.run_frame(handler, services)?;
            frames += 1;

            if !report.keep_running {
                log::info!("Handler requested exit after {} frames", frames);
                break;
            }
        }
        Ok(frames)
    }

    /// Run a single frame.
    pub fn run_frame<H: FrameHandler + ?Sized>(
        &mut self,
        handler: &mut H,
        services: &mut RenderServices<'_>,
    ) -> Result<FrameReport, FrameError> {
        self.orchestrator.run_frame(handler, services)
    }

    /// Rebuild the render graph from the renderer config. Call between
    /// frames.
    pub fn reload_renderer(&mut self) -> Result<ReloadStatus, RenderGraphError> {
        let status = self.orchestrator.render_process_mut().reload()?;
        if let ReloadStatus::Loaded {
            steps,
            generic_passes,
        } = status
        {
            log::info!(
                "Renderer ready: {} steps, {} generic passes",
                steps,
                generic_passes
            );
        }
        Ok(status)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn orchestrator(&self) -> &FrameOrchestrator {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut FrameOrchestrator {
        &mut self.orchestrator
    }
}
