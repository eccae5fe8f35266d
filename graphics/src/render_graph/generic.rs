//! Generic fullscreen passes.
//!
//! A generic pass is configured by its own entry in the renderer config
//! rather than by fixed code. Instances are created by a
//! [`GenericPassFactory`] at compile time, owned by the compiled
//! [`RenderGraph`](super::RenderGraph) and invoked by index every frame.

use serde::Deserialize;
use serde_json::Value;

use crate::error::PassInitError;

/// A configurable pass instance with its own persistent state.
pub trait GenericFullscreenPass: Send {
    /// Configure the pass from its whole render step entry.
    fn init(&mut self, config: &Value) -> Result<(), PassInitError>;

    fn render(&mut self, delta_time: f32);

    /// Release whatever `init` acquired. Called once before the pass is
    /// dropped by its graph.
    fn destroy(&mut self) {}

    /// Name for logs and debugging.
    fn name(&self) -> &str;
}

/// Creates fresh, uninitialised generic pass instances.
pub trait GenericPassFactory: Send + Sync {
    fn create(&self) -> Box<dyn GenericFullscreenPass>;
}

impl<F> GenericPassFactory for F
where
    F: Fn() -> Box<dyn GenericFullscreenPass> + Send + Sync,
{
    fn create(&self) -> Box<dyn GenericFullscreenPass> {
        self()
    }
}

/// Commonly used fields of a generic fullscreen pass entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullscreenPassDesc {
    pub name: String,
    pub fragment_shader: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub clear_color: Option<[f32; 4]>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl FullscreenPassDesc {
    /// Parse a description out of a render step entry. Unknown fields such
    /// as `type` are ignored.
    pub fn from_config(config: &Value) -> Result<Self, PassInitError> {
        for field in ["name", "fragmentShader"] {
            if config.get(field).is_none() {
                return Err(PassInitError::MissingField(field.to_string()));
            }
        }
        Self::deserialize(config).map_err(|e| PassInitError::InvalidConfig(e.to_string()))
    }
}

/// Generic pass driven by a [`FullscreenPassDesc`].
///
/// Without a GPU backend the pass only tracks how often it ran, which is
/// what the headless app and tests observe.
#[derive(Debug, Default)]
pub struct DescribedFullscreenPass {
    desc: Option<FullscreenPassDesc>,
    render_count: u64,
}

impl DescribedFullscreenPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory producing boxed instances, suitable for the compiler.
    pub fn factory() -> impl GenericPassFactory {
        || Box::new(Self::new()) as Box<dyn GenericFullscreenPass>
    }

    /// Parsed description, once `init` succeeded.
    pub fn desc(&self) -> Option<&FullscreenPassDesc> {
        self.desc.as_ref()
    }

    /// Number of frames this pass actually rendered.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }
}

impl GenericFullscreenPass for DescribedFullscreenPass {
    fn init(&mut self, config: &Value) -> Result<(), PassInitError> {
        let desc = FullscreenPassDesc::from_config(config)?;
        log::debug!(
            "Generic fullscreen pass '{}' uses shader '{}'",
            desc.name,
            desc.fragment_shader
        );
        self.desc = Some(desc);
        Ok(())
    }

    fn render(&mut self, delta_time: f32) {
        let Some(desc) = &self.desc else {
            return;
        };
        if !desc.enabled {
            return;
        }
        log::trace!(
            "Fullscreen pass '{}' ({} -> {}) dt={delta_time}",
            desc.name,
            desc.inputs.join(", "),
            desc.outputs.join(", ")
        );
        self.render_count += 1;
    }

    fn destroy(&mut self) {
        self.desc = None;
    }

    fn name(&self) -> &str {
        self.desc.as_ref().map_or("unnamed", |desc| desc.name.as_str())
    }
}
