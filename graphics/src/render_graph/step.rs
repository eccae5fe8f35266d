//! Compiled render steps.

use std::fmt;
use std::sync::Arc;

use crate::layout::ImageLayout;

/// 8-bit discriminator of a render step kind.
///
/// Tags `0` and `1` are structural; native pass kinds start at
/// [`RenderStepTag::FIRST_NATIVE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderStepTag(pub u8);

impl RenderStepTag {
    pub const IMAGE_MEMORY_BARRIER: Self = Self(0);
    pub const GENERIC_FULLSCREEN: Self = Self(1);

    /// First tag available to native passes.
    pub const FIRST_NATIVE: Self = Self(2);

    /// Whether this tag identifies a native pass rather than a structural step.
    pub fn is_native(self) -> bool {
        self >= Self::FIRST_NATIVE
    }
}

impl fmt::Display for RenderStepTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a resource resolved at execution time.
///
/// Cloning shares the string, so a compiled graph can hold many steps naming
/// the same image without duplicating it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName(Arc<str>);

impl ResourceName {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One compiled instruction of a render graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStep {
    /// Layout transition of a named image. The image is looked up by name
    /// every time the step runs.
    ImageMemoryBarrier {
        source: ImageLayout,
        target: ImageLayout,
        image: ResourceName,
    },
    /// Invocation of the generic pass at `index` in the graph's pass arena.
    GenericFullscreen { index: u8 },
    /// Invocation of the native pass registered under `tag`.
    Native { tag: RenderStepTag },
}

impl RenderStep {
    /// Discriminator of this step.
    pub fn tag(&self) -> RenderStepTag {
        match self {
            Self::ImageMemoryBarrier { .. } => RenderStepTag::IMAGE_MEMORY_BARRIER,
            Self::GenericFullscreen { .. } => RenderStepTag::GENERIC_FULLSCREEN,
            Self::Native { tag } => *tag,
        }
    }
}
