//! Runs the Cadence frame loop against in-memory collaborators.
//!
//! Useful for validating renderer configs and frame pacing without a GPU:
//!
//! ```bash
//! RUST_LOG=trace cadence-headless --max-frames 3
//! ```

use std::process::ExitCode;

use cadence_app::{
    App, AppArgs, AppError, DefaultAppArgs, HeadlessHandler, HeadlessServices, PassCounts,
    Settings, headless_registry_with_counts,
};
use cadence_graphics::render_graph::DescribedFullscreenPass;

/// Images written by the built-in deferred pipeline.
const PIPELINE_IMAGES: [&str; 6] = [
    "GBufferAlbedo",
    "GBufferNormal",
    "Depth",
    "ShadowAtlas",
    "HDR",
    "Backbuffer",
];

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    cadence_core::init();
    cadence_graphics::init();
    cadence_app::init();

    let args = DefaultAppArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &DefaultAppArgs) -> Result<(), AppError> {
    let mut settings = Settings::load_or_default(args.settings_path())?;
    args.apply_to(&mut settings);
    settings.validate()?;

    let counts = PassCounts::default();
    let registry = headless_registry_with_counts(&counts)?;
    let mut app = App::new(settings, registry, DescribedFullscreenPass::factory())?;

    let mut services = HeadlessServices::new();
    for name in PIPELINE_IMAGES {
        services.register_image(name);
    }

    let mut handler = HeadlessHandler::default();
    let frames = app.run(&mut handler, &mut services.services(), args.max_frames())?;

    log::info!(
        "Ran {} frames in {:.3}s: {} physics steps, {} native pass renders, {} barriers",
        frames,
        app.orchestrator().clock().total_time(),
        handler.physics_steps(),
        counts.total(),
        services.images.barrier_count()
    );
    Ok(())
}
