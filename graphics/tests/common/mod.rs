//! Common utilities for render graph integration tests.
//!
//! Every collaborator and pass writes into one shared [`CallLog`], so a test
//! can assert on the exact interleaving of preamble calls, barriers and pass
//! renders within a frame.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::thread::ThreadId;

use parking_lot::Mutex;
use serde_json::Value;

use cadence_graphics::{
    CameraRegistry, FrustumId, FrustumRegistry, GenericFullscreenPass, ImageHandle, ImageLayout,
    ImageRegistry, MeshRegistry, NativePassKind, PassInitError, PresentationSurface,
    RenderServices, RenderStepRegistry, ShadowSystem,
};

// ============================================================================
// Call log
// ============================================================================

/// One observable collaborator or pass call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ResizeIfNeeded,
    BeginFrame,
    UpdateFrustums,
    PrepareShadowFrustums,
    PrepareForRendering,
    CullNodes(Vec<FrustumId>),
    CollectDrawCalls,
    UpdatePerInstanceData(u32),
    Barrier {
        image: ImageHandle,
        source: ImageLayout,
        target: ImageLayout,
    },
    Generic {
        id: usize,
        delta_time: f32,
    },
    GenericDestroyed(usize),
    Native(&'static str),
    EndFrame,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.0.lock())
    }

    pub fn snapshot(&self) -> Vec<Call> {
        self.0.lock().clone()
    }
}

// ============================================================================
// Collaborators
// ============================================================================

pub struct RecordingImages {
    log: CallLog,
    names: HashMap<String, ImageHandle>,
}

impl RecordingImages {
    /// Register or re-register an image under a name.
    pub fn register(&mut self, name: &str, handle: ImageHandle) {
        self.names.insert(name.to_string(), handle);
    }
}

impl ImageRegistry for RecordingImages {
    fn resolve(&self, name: &str) -> Option<ImageHandle> {
        self.names.get(name).copied()
    }

    fn insert_image_memory_barrier(
        &mut self,
        image: ImageHandle,
        source: ImageLayout,
        target: ImageLayout,
    ) {
        self.log.push(Call::Barrier {
            image,
            source,
            target,
        });
    }
}

pub struct RecordingCameras {
    log: CallLog,
    pub camera_frustum: FrustumId,
}

impl CameraRegistry for RecordingCameras {
    fn update_frustums(&mut self) {
        self.log.push(Call::UpdateFrustums);
    }

    fn active_camera_frustum(&self) -> FrustumId {
        self.camera_frustum
    }
}

pub struct RecordingShadows {
    log: CallLog,
    pub frustums: Vec<FrustumId>,
}

impl ShadowSystem for RecordingShadows {
    fn prepare_frustums(&mut self) {
        self.log.push(Call::PrepareShadowFrustums);
    }

    fn shadow_frustums(&self) -> &[FrustumId] {
        &self.frustums
    }
}

pub struct RecordingFrustums {
    log: CallLog,
}

impl FrustumRegistry for RecordingFrustums {
    fn prepare_for_rendering(&mut self) {
        self.log.push(Call::PrepareForRendering);
    }

    fn cull_nodes(&mut self, frustums: &[FrustumId]) {
        self.log.push(Call::CullNodes(frustums.to_vec()));
    }
}

pub struct RecordingMeshes {
    log: CallLog,
}

impl MeshRegistry for RecordingMeshes {
    fn collect_visible_draw_calls(&mut self) {
        self.log.push(Call::CollectDrawCalls);
    }

    fn update_per_instance_data(&mut self, stream_index: u32) {
        self.log.push(Call::UpdatePerInstanceData(stream_index));
    }
}

pub struct RecordingSurface {
    log: CallLog,
}

impl PresentationSurface for RecordingSurface {
    fn resize_if_needed(&mut self) {
        self.log.push(Call::ResizeIfNeeded);
    }

    fn begin_frame(&mut self) {
        self.log.push(Call::BeginFrame);
    }

    fn end_frame(&mut self) {
        self.log.push(Call::EndFrame);
    }
}

/// A full set of recording collaborators sharing one log.
pub struct Harness {
    pub log: CallLog,
    pub images: RecordingImages,
    pub cameras: RecordingCameras,
    pub shadows: RecordingShadows,
    pub frustums: RecordingFrustums,
    pub meshes: RecordingMeshes,
    pub surface: RecordingSurface,
}

impl Harness {
    pub fn new() -> Self {
        let log = CallLog::default();
        Self {
            images: RecordingImages {
                log: log.clone(),
                names: HashMap::new(),
            },
            cameras: RecordingCameras {
                log: log.clone(),
                camera_frustum: FrustumId(0),
            },
            shadows: RecordingShadows {
                log: log.clone(),
                frustums: Vec::new(),
            },
            frustums: RecordingFrustums { log: log.clone() },
            meshes: RecordingMeshes { log: log.clone() },
            surface: RecordingSurface { log: log.clone() },
            log,
        }
    }

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

// ============================================================================
// Passes
// ============================================================================

/// Generic pass accepting any configuration and logging its renders.
pub struct RecordingPass {
    id: usize,
    log: CallLog,
    config: Option<Value>,
}

impl GenericFullscreenPass for RecordingPass {
    fn init(&mut self, config: &Value) -> Result<(), PassInitError> {
        if config.get("fail").is_some() {
            return Err(PassInitError::InvalidConfig("asked to fail".to_string()));
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn render(&mut self, delta_time: f32) {
        self.log.push(Call::Generic {
            id: self.id,
            delta_time,
        });
    }

    fn destroy(&mut self) {
        self.log.push(Call::GenericDestroyed(self.id));
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Factory numbering passes in creation order, across compilations.
pub fn recording_factory(
    log: &CallLog,
) -> impl Fn() -> Box<dyn GenericFullscreenPass> + Send + Sync + 'static {
    let log = log.clone();
    let next_id = Arc::new(Mutex::new(0usize));
    move || {
        let mut next = next_id.lock();
        let id = *next;
        *next += 1;
        Box::new(RecordingPass {
            id,
            log: log.clone(),
            config: None,
        }) as Box<dyn GenericFullscreenPass>
    }
}

/// Registry with every built-in native kind logging its name.
pub fn recording_registry(log: &CallLog) -> Arc<RenderStepRegistry> {
    let mut builder = RenderStepRegistry::builder();
    for kind in NativePassKind::ALL {
        let log = log.clone();
        builder
            .register(kind, move |_dt: f32| log.push(Call::Native(kind.name())))
            .expect("built-in kinds register once");
    }
    Arc::new(builder.build())
}

// ============================================================================
// Log capture
// ============================================================================

struct CapturedRecord {
    thread: ThreadId,
    level: log::Level,
    message: String,
}

struct CaptureLogger {
    records: Mutex<Vec<CapturedRecord>>,
}

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.records.lock().push(CapturedRecord {
            thread: std::thread::current().id(),
            level: record.level(),
            message: format!("{}", record.args()),
        });
    }

    fn flush(&self) {}
}

static CAPTURE: OnceLock<&'static CaptureLogger> = OnceLock::new();

fn capture() -> &'static CaptureLogger {
    CAPTURE.get_or_init(|| {
        let logger: &'static CaptureLogger = Box::leak(Box::new(CaptureLogger {
            records: Mutex::new(Vec::new()),
        }));
        // Another logger may already be installed by a different harness.
        let _ = log::set_logger(logger);
        log::set_max_level(log::LevelFilter::Trace);
        logger
    })
}

/// Install the capture logger. Safe to call from every test.
pub fn install_log_capture() {
    capture();
}

/// Messages logged at `level` by the calling thread so far.
///
/// Tests run on their own threads, so records from concurrently running
/// tests are not mixed in.
pub fn captured(level: log::Level) -> Vec<String> {
    let current = std::thread::current().id();
    capture()
        .records
        .lock()
        .iter()
        .filter(|record| record.thread == current && record.level == level)
        .map(|record| record.message.clone())
        .collect()
}
