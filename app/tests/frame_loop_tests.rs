//! Integration tests for the frame orchestrator and the application loop.

mod common;

use std::path::Path;
use std::time::Duration;

use rstest::rstest;
use serde_json::json;

use cadence_app::{
    App, AppError, FrameError, FrameOrchestrator, HeadlessHandler, HeadlessServices, PassCounts,
    Settings, headless_registry, headless_registry_with_counts,
};
use cadence_core::{FixedStepAccumulator, FrameClock, FrameClockConfig, ManualTimeSource};
use cadence_graphics::render_graph::DescribedFullscreenPass;
use cadence_graphics::{
    FrustumId, NativePassKind, RenderGraphError, RenderProcess, ReloadPolicy, ReloadStatus,
};

use common::{Hook, HookLog, RecordingHandler, hook_registry, shipped_renderer_config, write_config};

fn orchestrator(config: &Path, log: &HookLog, time: &ManualTimeSource) -> FrameOrchestrator {
    let clock = FrameClock::new(FrameClockConfig::default()).with_time_source(time.clone());
    let mut render = RenderProcess::new(config, hook_registry(log), DescribedFullscreenPass::factory());
    render.reload().unwrap();
    FrameOrchestrator::new(clock, FixedStepAccumulator::new(0.016), render)
}

fn gbuffer_only() -> serde_json::Value {
    json!({ "renderSteps": [{ "type": "RenderPassGBuffer" }] })
}

// ============================================================================
// Frame sequence
// ============================================================================

#[test]
fn test_hook_order_without_physics_steps() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "renderer.json", &gbuffer_only());
    let log = HookLog::default();
    let time = ManualTimeSource::new();
    let mut frame_loop = orchestrator(&config, &log, &time);

    let mut handler = RecordingHandler::new(&log);
    let mut services = HeadlessServices::new();
    let report = frame_loop
        .run_frame(&mut handler, &mut services.services())
        .unwrap();

    // Frame zero reports the default delta, which does not exceed one step.
    assert_eq!(report.time.frame, 0);
    assert_eq!(report.physics_steps, 0);
    assert!(report.keep_running);
    assert_eq!(
        log.take(),
        vec![
            Hook::ResetInput,
            Hook::PumpEvents,
            Hook::UpdateGameState(report.time.delta_time),
            Hook::AfterPhysics,
            Hook::BlendPostEffects,
            Hook::FireEvents,
            Hook::Render("RenderPassGBuffer"),
            Hook::AfterRender,
        ]
    );
}

#[test]
fn test_physics_steps_dispatch_then_sync() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "renderer.json", &gbuffer_only());
    let log = HookLog::default();
    let time = ManualTimeSource::new();
    let mut frame_loop = orchestrator(&config, &log, &time);

    let mut handler = RecordingHandler::new(&log);
    let mut services = HeadlessServices::new();
    frame_loop
        .run_frame(&mut handler, &mut services.services())
        .unwrap();
    log.take();

    time.advance(Duration::from_millis(40));
    let report = frame_loop
        .run_frame(&mut handler, &mut services.services())
        .unwrap();

    assert_eq!(report.time.frame, 1);
    assert_eq!(report.physics_steps, 3);
    assert_eq!(frame_loop.physics().total_steps(), 3);

    let hooks = log.take();
    let physics: Vec<_> = hooks[3..10].to_vec();
    assert_eq!(
        physics,
        vec![
            Hook::DispatchSimulation(0.016),
            Hook::SyncSimulation,
            Hook::DispatchSimulation(0.016),
            Hook::SyncSimulation,
            Hook::DispatchSimulation(0.016),
            Hook::SyncSimulation,
            Hook::AfterPhysics,
        ]
    );
    assert_eq!(hooks.last(), Some(&Hook::AfterRender));
}

#[test]
fn test_stall_is_clamped_before_physics() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "renderer.json", &gbuffer_only());
    let log = HookLog::default();
    let time = ManualTimeSource::new();
    let mut frame_loop = orchestrator(&config, &log, &time);

    let mut handler = RecordingHandler::new(&log);
    let mut services = HeadlessServices::new();
    frame_loop
        .run_frame(&mut handler, &mut services.services())
        .unwrap();

    time.advance(Duration::from_secs(5));
    let report = frame_loop
        .run_frame(&mut handler, &mut services.services())
        .unwrap();

    assert!((report.time.delta_time - 0.3).abs() < 1e-6);
    // 0.016 + 0.3 of accumulated time never exceeds 19 whole steps.
    assert!(report.physics_steps <= 19);
    assert!(report.physics_steps >= 18);
}

#[test]
fn test_stop_request_completes_frame() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "renderer.json", &gbuffer_only());
    let log = HookLog::default();
    let time = ManualTimeSource::new();
    let mut frame_loop = orchestrator(&config, &log, &time);

    let mut handler = RecordingHandler::new(&log);
    handler.stop_at_frame = Some(1);
    let mut services = HeadlessServices::new();
    let report = frame_loop
        .run_frame(&mut handler, &mut services.services())
        .unwrap();

    assert!(!report.keep_running);
    assert!(log.take().contains(&Hook::Render("RenderPassGBuffer")));
}

#[test]
fn test_render_failure_still_runs_after_render() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        "renderer.json",
        &json!({
            "renderSteps": [
                { "type": "RenderPassGBuffer" },
                { "type": "ImageMemoryBarrier", "sourceImageLayout": "Undefined",
                  "targetImageLayout": "ColorAttachment", "image": "notRegistered" },
                { "type": "RenderPassLighting" }
            ]
        }),
    );
    let log = HookLog::default();
    let time = ManualTimeSource::new();
    let mut frame_loop = orchestrator(&config, &log, &time);

    let mut handler = RecordingHandler::new(&log);
    let mut services = HeadlessServices::new();
    let err = frame_loop
        .run_frame(&mut handler, &mut services.services())
        .unwrap_err();

    assert!(matches!(
        err,
        FrameError::Render(RenderGraphError::UnknownImage(ref name)) if name == "notRegistered"
    ));

    let hooks = log.take();
    assert!(hooks.contains(&Hook::Render("RenderPassGBuffer")));
    assert!(!hooks.contains(&Hook::Render("RenderPassLighting")));
    assert_eq!(hooks.last(), Some(&Hook::AfterRender));

    // The surface frame was closed and the clock advanced.
    assert!(!services.surface.in_frame());
    assert_eq!(services.surface.frames_ended(), 1);
    assert_eq!(frame_loop.clock().frame_count(), 1);
}

#[test]
fn test_preamble_uses_camera_then_shadow_frustums() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "renderer.json", &gbuffer_only());
    let log = HookLog::default();
    let time = ManualTimeSource::new();
    let mut frame_loop = orchestrator(&config, &log, &time);

    let mut handler = RecordingHandler::new(&log);
    let mut services = HeadlessServices::with_shadow_cascades(3);
    frame_loop
        .run_frame(&mut handler, &mut services.services())
        .unwrap();

    let expected = [FrustumId(0), FrustumId(1), FrustumId(2), FrustumId(3)];
    assert_eq!(services.frustums.last_culled(), &expected);
    assert_eq!(frame_loop.render_process().active_frustums(), &expected);
    assert_eq!(services.meshes.collection_count(), 1);
    assert_eq!(services.cameras.update_count(), 1);
}

#[test]
fn test_reset_restarts_timing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "renderer.json", &gbuffer_only());
    let log = HookLog::default();
    let time = ManualTimeSource::new();
    let mut frame_loop = orchestrator(&config, &log, &time);

    let mut handler = RecordingHandler::new(&log);
    let mut services = HeadlessServices::new();
    for _ in 0..3 {
        time.advance(Duration::from_millis(20));
        frame_loop
            .run_frame(&mut handler, &mut services.services())
            .unwrap();
    }

    frame_loop.reset();
    assert_eq!(frame_loop.physics().accumulator(), 0.0);
    assert!(!frame_loop.render_process().graph().is_empty());

    let report = frame_loop
        .run_frame(&mut handler, &mut services.services())
        .unwrap();
    assert_eq!(report.time.frame, 0);
}

// ============================================================================
// App
// ============================================================================

fn settings_with_renderer(path: &Path) -> Settings {
    Settings {
        renderer_config: path.to_path_buf(),
        ..Settings::default()
    }
}

#[rstest]
#[case::frame_limit(Some(5), None, 5)]
#[case::handler_stops(None, Some(3), 3)]
#[case::limit_before_stop(Some(2), Some(4), 2)]
#[case::zero_frames(Some(0), None, 0)]
fn test_run_loop_ends(
    #[case] max_frames: Option<u64>,
    #[case] stop_after: Option<u64>,
    #[case] expected: u64,
) {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "renderer.json", &gbuffer_only());
    let mut app = App::new(
        settings_with_renderer(&config),
        headless_registry().unwrap(),
        DescribedFullscreenPass::factory(),
    )
    .unwrap();

    let mut handler = HeadlessHandler::default();
    handler.stop_after = stop_after;
    let mut services = HeadlessServices::new();
    let frames = app
        .run(&mut handler, &mut services.services(), max_frames)
        .unwrap();

    assert_eq!(frames, expected);
    assert_eq!(services.surface.frames_begun(), expected);
    assert_eq!(app.orchestrator().clock().frame_count(), expected);
}

#[test]
fn test_missing_renderer_config_starts_empty() {
    let app = App::new(
        settings_with_renderer(Path::new("no/such/renderer.json")),
        headless_registry().unwrap(),
        DescribedFullscreenPass::factory(),
    )
    .unwrap();

    assert!(app.orchestrator().render_process().graph().is_empty());
}

#[test]
fn test_unreadable_renderer_config_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::new(
        settings_with_renderer(dir.path()),
        headless_registry().unwrap(),
        DescribedFullscreenPass::factory(),
    )
    .unwrap();

    assert!(app.orchestrator().render_process().graph().is_empty());
}

#[test]
fn test_malformed_renderer_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("renderer.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = App::new(
        settings_with_renderer(&path),
        headless_registry().unwrap(),
        DescribedFullscreenPass::factory(),
    );
    assert!(matches!(
        result,
        Err(AppError::Renderer(RenderGraphError::Parse(_)))
    ));
}

#[test]
fn test_invalid_settings_fail() {
    let settings = Settings {
        physics_step_size: 0.0,
        ..Settings::default()
    };
    let result = App::new(
        settings,
        headless_registry().unwrap(),
        DescribedFullscreenPass::factory(),
    );
    assert!(matches!(result, Err(AppError::Settings(_))));
}

#[rstest]
#[case::huge_max_delta(1e30, 0.016)]
#[case::tiny_step(0.3, 1e-20)]
fn test_unbounded_timing_settings_are_rejected(#[case] max_delta_time: f32, #[case] step: f32) {
    let settings = Settings {
        max_delta_time,
        physics_step_size: step,
        ..Settings::default()
    };
    let result = App::new(
        settings,
        headless_registry().unwrap(),
        DescribedFullscreenPass::factory(),
    );
    assert!(matches!(result, Err(AppError::Settings(_))));
}

#[test]
fn test_reload_between_frames() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "renderer.json", &gbuffer_only());
    let mut app = App::new(
        settings_with_renderer(&config),
        headless_registry().unwrap(),
        DescribedFullscreenPass::factory(),
    )
    .unwrap();

    let mut handler = HeadlessHandler::default();
    let mut services = HeadlessServices::new();
    app.run(&mut handler, &mut services.services(), Some(1))
        .unwrap();

    write_config(
        &dir,
        "renderer.json",
        &json!({
            "renderSteps": [
                { "type": "RenderPassShadow" },
                { "type": "RenderPassGenericFullscreen", "name": "fxaa",
                  "fragmentShader": "fxaa.frag" },
                { "type": "RenderPassPostCombine" }
            ]
        }),
    );
    assert_eq!(
        app.reload_renderer().unwrap(),
        ReloadStatus::Loaded {
            steps: 3,
            generic_passes: 1
        }
    );

    let report = app.run_frame(&mut handler, &mut services.services()).unwrap();
    assert_eq!(report.render.native_passes, 2);
    assert_eq!(report.render.generic_passes, 1);
}

#[test]
fn test_keep_previous_policy_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "renderer.json", &gbuffer_only());
    let settings = Settings {
        reload_policy: ReloadPolicy::KeepPreviousOnFailure,
        ..settings_with_renderer(&config)
    };
    let mut app = App::new(
        settings,
        headless_registry().unwrap(),
        DescribedFullscreenPass::factory(),
    )
    .unwrap();

    std::fs::write(&config, r#"{ "renderSteps": [{ "type": "RenderPassNope" }] }"#).unwrap();
    assert!(app.reload_renderer().is_err());
    assert_eq!(app.orchestrator().render_process().graph().step_count(), 1);
}

#[test]
fn test_shipped_renderer_config_runs() {
    let counts = PassCounts::default();
    let mut app = App::new(
        settings_with_renderer(&shipped_renderer_config()),
        headless_registry_with_counts(&counts).unwrap(),
        DescribedFullscreenPass::factory(),
    )
    .unwrap();

    let mut services = HeadlessServices::new();
    for name in [
        "GBufferAlbedo",
        "GBufferNormal",
        "Depth",
        "ShadowAtlas",
        "HDR",
        "Backbuffer",
    ] {
        services.register_image(name);
    }

    let mut handler = HeadlessHandler::default();
    let report = app.run_frame(&mut handler, &mut services.services()).unwrap();

    assert_eq!(report.render.steps_executed, 19);
    assert_eq!(report.render.barriers, 6);
    assert_eq!(report.render.generic_passes, 2);
    assert_eq!(report.render.native_passes, 11);
    assert_eq!(counts.get(NativePassKind::PerPixelPicking), 0);
    assert_eq!(counts.get(NativePassKind::Lighting), 1);
    assert_eq!(services.images.barrier_count(), 6);
}
