//! Shared helpers for frame loop integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use cadence_app::FrameHandler;
use cadence_graphics::{NativePassKind, RenderStepRegistry};

/// One observable handler hook or render.
#[derive(Debug, Clone, PartialEq)]
pub enum Hook {
    ResetInput,
    PumpEvents,
    UpdateGameState(f32),
    DispatchSimulation(f32),
    SyncSimulation,
    AfterPhysics,
    BlendPostEffects,
    FireEvents,
    Render(&'static str),
    AfterRender,
}

#[derive(Debug, Clone, Default)]
pub struct HookLog(Arc<Mutex<Vec<Hook>>>);

impl HookLog {
    pub fn push(&self, hook: Hook) {
        self.0.lock().push(hook);
    }

    pub fn take(&self) -> Vec<Hook> {
        std::mem::take(&mut *self.0.lock())
    }
}

/// Handler recording every hook. Requests exit once `stop_at_frame` frames
/// pumped events.
pub struct RecordingHandler {
    pub log: HookLog,
    pub stop_at_frame: Option<u64>,
    frames: u64,
}

impl RecordingHandler {
    pub fn new(log: &HookLog) -> Self {
        Self {
            log: log.clone(),
            stop_at_frame: None,
            frames: 0,
        }
    }
}

impl FrameHandler for RecordingHandler {
    fn reset_input(&mut self) {
        self.log.push(Hook::ResetInput);
    }

    fn pump_events(&mut self) -> bool {
        self.log.push(Hook::PumpEvents);
        self.frames += 1;
        self.stop_at_frame.is_none_or(|stop| self.frames < stop)
    }

    fn update_game_state(&mut self, delta_time: f32) {
        self.log.push(Hook::UpdateGameState(delta_time));
    }

    fn dispatch_simulation(&mut self, step: f32) {
        self.log.push(Hook::DispatchSimulation(step));
    }

    fn sync_simulation(&mut self) {
        self.log.push(Hook::SyncSimulation);
    }

    fn after_physics(&mut self) {
        self.log.push(Hook::AfterPhysics);
    }

    fn blend_post_effects(&mut self) {
        self.log.push(Hook::BlendPostEffects);
    }

    fn fire_events(&mut self) {
        self.log.push(Hook::FireEvents);
    }

    fn after_render(&mut self) {
        self.log.push(Hook::AfterRender);
    }
}

/// Registry whose native passes record into the hook log.
pub fn hook_registry(log: &HookLog) -> Arc<RenderStepRegistry> {
    let mut builder = RenderStepRegistry::builder();
    for kind in NativePassKind::ALL {
        let log = log.clone();
        builder
            .register(kind, move |_dt: f32| log.push(Hook::Render(kind.name())))
            .expect("built-in kinds register once");
    }
    Arc::new(builder.build())
}

/// Write a renderer config into `dir` and return its path.
pub fn write_config(dir: &tempfile::TempDir, name: &str, config: &Value) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(config.to_string().as_bytes()).unwrap();
    path
}

/// The renderer config shipped in the workspace's `config/` directory.
pub fn shipped_renderer_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("config")
        .join("renderer_default.json")
}
