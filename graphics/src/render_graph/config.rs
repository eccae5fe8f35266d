//! Renderer configuration document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level renderer configuration.
///
/// ```json
/// {
///   "name": "default",
///   "renderSteps": [
///     { "type": "RenderPassGBuffer" },
///     { "type": "ImageMemoryBarrier", "sourceImageLayout": "ColorAttachment",
///       "targetImageLayout": "ShaderReadOnly", "image": "albedo" }
///   ]
/// }
/// ```
///
/// Steps are kept as raw JSON: each kind interprets its own fields, and
/// generic passes receive their whole entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderGraphConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub render_steps: Vec<Value>,
}

fn default_name() -> String {
    "unnamed".to_string()
}

impl Default for RenderGraphConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            render_steps: Vec::new(),
        }
    }
}

impl RenderGraphConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            render_steps: Vec::new(),
        }
    }

    /// Append a step entry.
    pub fn with_step(mut self, step: Value) -> Self {
        self.render_steps.push(step);
        self
    }
}
