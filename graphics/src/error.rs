//! Render graph error types.

use thiserror::Error;

use crate::render_graph::RenderStepTag;

/// Errors raised while building, compiling or executing a render graph.
#[derive(Error, Debug)]
pub enum RenderGraphError {
    /// The configuration text is not valid JSON or does not have the
    /// expected top-level shape.
    #[error("Failed to parse renderer config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A render step entry is malformed (missing `type` or a required field).
    #[error("Invalid render step {index}: {reason}")]
    InvalidStep { index: usize, reason: String },

    /// A render step names a type that is neither structural nor registered.
    #[error("Unknown render step type '{type_name}' at index {index}")]
    UnknownStepType { index: usize, type_name: String },

    /// A barrier names a layout that has no code.
    #[error("Unknown image layout '{layout}' in render step {index}")]
    UnknownImageLayout { index: usize, layout: String },

    /// A generic fullscreen pass rejected its configuration.
    #[error("Generic fullscreen pass at render step {index} failed to initialize: {source}")]
    PassInit {
        index: usize,
        #[source]
        source: PassInitError,
    },

    /// The graph needs more generic passes than an 8-bit index can address.
    #[error("Too many generic fullscreen passes (limit is {limit})")]
    TooManyGenericPasses { limit: usize },

    /// A step carries a tag with no handler in the registry.
    #[error("No native pass registered for render step tag {0}")]
    UnregisteredTag(RenderStepTag),

    /// A barrier names an image the image registry does not know.
    #[error("Unknown image '{0}' referenced by a barrier")]
    UnknownImage(String),

    /// A step references a generic pass slot that does not exist.
    #[error("Invalid generic pass index {index} (graph has {count} generic passes)")]
    InvalidGenericPassIndex { index: u8, count: usize },

    /// The step registry could not be built.
    #[error("Render step registry error: {0}")]
    Registry(String),
}

/// Result alias for render graph operations.
pub type RenderGraphResult<T> = Result<T, RenderGraphError>;

/// Failure reported by a generic fullscreen pass from `init`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PassInitError {
    #[error("Missing required field '{0}'")]
    MissingField(String),
    #[error("Invalid pass configuration: {0}")]
    InvalidConfig(String),
}
