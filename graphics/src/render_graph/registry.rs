//! Render step registry.
//!
//! Maps configuration type names to step tags and native pass handlers. The
//! registry is a single table of `(name, tag, handler)` entries: a name is
//! only ever present together with the handler that renders it, so a step the
//! compiler admits always has something to dispatch to.
//!
//! The registry is assembled once through [`RenderStepRegistryBuilder`] and
//! is immutable afterwards. Share it as `Arc<RenderStepRegistry>` between the
//! compiler and the executor.
//!
//! ```
//! use cadence_graphics::render_graph::{NativePassKind, RenderStepRegistry};
//!
//! let mut builder = RenderStepRegistry::builder();
//! builder.register(NativePassKind::Sky, |_dt: f32| {}).unwrap();
//! let registry = builder.build();
//!
//! assert_eq!(registry.tag_of("RenderPassSky"), Some(NativePassKind::Sky.tag()));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{RenderGraphError, RenderGraphResult};

use super::step::RenderStepTag;

/// Configuration type name of an image layout barrier.
pub const IMAGE_MEMORY_BARRIER_NAME: &str = "ImageMemoryBarrier";

/// Configuration type name of a generic fullscreen pass.
pub const GENERIC_FULLSCREEN_NAME: &str = "RenderPassGenericFullscreen";

/// A render pass with fixed code, dispatched by tag.
///
/// The registry is shared and read-only, so `render` takes `&self`. Passes
/// that keep per-frame state use interior mutability.
pub trait NativePass: Send + Sync {
    fn render(&self, delta_time: f32);
}

impl<F> NativePass for F
where
    F: Fn(f32) + Send + Sync,
{
    fn render(&self, delta_time: f32) {
        self(delta_time)
    }
}

/// The built-in native pass kinds and their fixed tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NativePassKind {
    GBuffer = 2,
    Foliage = 3,
    Sky = 4,
    Debug = 5,
    GBufferTransparents = 6,
    PerPixelPicking = 7,
    Shadow = 8,
    Lighting = 9,
    VolumetricLighting = 10,
    Bloom = 11,
    LensFlare = 12,
    PostCombine = 13,
}

impl NativePassKind {
    /// Every built-in kind, in tag order.
    pub const ALL: [NativePassKind; 12] = [
        Self::GBuffer,
        Self::Foliage,
        Self::Sky,
        Self::Debug,
        Self::GBufferTransparents,
        Self::PerPixelPicking,
        Self::Shadow,
        Self::Lighting,
        Self::VolumetricLighting,
        Self::Bloom,
        Self::LensFlare,
        Self::PostCombine,
    ];

    /// First tag handed out to custom pass kinds.
    pub const FIRST_CUSTOM_TAG: RenderStepTag = RenderStepTag(14);

    pub const fn tag(self) -> RenderStepTag {
        RenderStepTag(self as u8)
    }

    /// Configuration type name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::GBuffer => "RenderPassGBuffer",
            Self::Foliage => "RenderPassFoliage",
            Self::Sky => "RenderPassSky",
            Self::Debug => "RenderPassDebug",
            Self::GBufferTransparents => "RenderPassGBufferTransparents",
            Self::PerPixelPicking => "RenderPassPerPixelPicking",
            Self::Shadow => "RenderPassShadow",
            Self::Lighting => "RenderPassLighting",
            Self::VolumetricLighting => "RenderPassVolumetricLighting",
            Self::Bloom => "RenderPassBloom",
            Self::LensFlare => "RenderPassLensFlare",
            Self::PostCombine => "RenderPassPostCombine",
        }
    }
}

struct RegistryEntry {
    name: Arc<str>,
    tag: RenderStepTag,
    pass: Arc<dyn NativePass>,
}

/// Frozen mapping from type names to tags and from tags to native passes.
pub struct RenderStepRegistry {
    /// Indexed by tag value; structural tags are always `None`.
    entries: Vec<Option<RegistryEntry>>,
    /// Name lookup into `entries`.
    tags_by_name: HashMap<Arc<str>, RenderStepTag>,
}

impl RenderStepRegistry {
    /// Start building a registry.
    pub fn builder() -> RenderStepRegistryBuilder {
        RenderStepRegistryBuilder::new()
    }

    /// A registry with no native passes. Only structural steps compile
    /// against it.
    pub fn empty() -> Self {
        RenderStepRegistryBuilder::new().build()
    }

    /// Tag registered for a configuration type name.
    pub fn tag_of(&self, name: &str) -> Option<RenderStepTag> {
        self.tags_by_name.get(name).copied()
    }

    /// Handler registered for a tag.
    pub fn native_pass(&self, tag: RenderStepTag) -> Option<&dyn NativePass> {
        self.entry(tag).map(|entry| entry.pass.as_ref())
    }

    /// Type name registered for a tag.
    pub fn name_of(&self, tag: RenderStepTag) -> Option<&str> {
        self.entry(tag).map(|entry| entry.name.as_ref())
    }

    /// Number of registered native passes.
    pub fn len(&self) -> usize {
        self.tags_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags_by_name.is_empty()
    }

    /// Registered `(name, tag)` pairs in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, RenderStepTag)> {
        self.entries
            .iter()
            .flatten()
            .map(|entry| (entry.name.as_ref(), entry.tag))
    }

    fn entry(&self, tag: RenderStepTag) -> Option<&RegistryEntry> {
        self.entries.get(usize::from(tag.0)).and_then(Option::as_ref)
    }
}

impl fmt::Debug for RenderStepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Builder for [`RenderStepRegistry`].
pub struct RenderStepRegistryBuilder {
    entries: Vec<RegistryEntry>,
    next_custom: u16,
}

impl RenderStepRegistryBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_custom: u16::from(NativePassKind::FIRST_CUSTOM_TAG.0),
        }
    }

    /// Register the handler of a built-in kind.
    pub fn register(
        &mut self,
        kind: NativePassKind,
        pass: impl NativePass + 'static,
    ) -> RenderGraphResult<&mut Self> {
        self.insert(kind.name(), kind.tag(), Arc::new(pass))?;
        Ok(self)
    }

    /// Register an extension pass kind under a new name and return the tag
    /// allocated for it.
    pub fn register_custom(
        &mut self,
        name: &str,
        pass: impl NativePass + 'static,
    ) -> RenderGraphResult<RenderStepTag> {
        let tag = u8::try_from(self.next_custom)
            .map(RenderStepTag)
            .map_err(|_| {
                RenderGraphError::Registry(format!(
                    "No render step tags left for custom pass '{name}'"
                ))
            })?;
        self.insert(name, tag, Arc::new(pass))?;
        self.next_custom += 1;
        Ok(tag)
    }

    /// Whether a name has been registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name.as_ref() == name)
    }

    /// Freeze the registry.
    pub fn build(self) -> RenderStepRegistry {
        let mut entries: Vec<Option<RegistryEntry>> = Vec::new();
        entries.resize_with(usize::from(u8::MAX) + 1, || None);
        let mut tags_by_name = HashMap::with_capacity(self.entries.len());

        for entry in self.entries {
            tags_by_name.insert(entry.name.clone(), entry.tag);
            let slot = usize::from(entry.tag.0);
            entries[slot] = Some(entry);
        }

        log::debug!("Render step registry built with {} native passes", tags_by_name.len());
        RenderStepRegistry {
            entries,
            tags_by_name,
        }
    }

    fn insert(
        &mut self,
        name: &str,
        tag: RenderStepTag,
        pass: Arc<dyn NativePass>,
    ) -> RenderGraphResult<()> {
        if name == IMAGE_MEMORY_BARRIER_NAME || name == GENERIC_FULLSCREEN_NAME {
            return Err(RenderGraphError::Registry(format!(
                "'{name}' is a structural render step and cannot be registered"
            )));
        }
        if self.contains(name) {
            return Err(RenderGraphError::Registry(format!(
                "Render step '{name}' is already registered"
            )));
        }

        self.entries.push(RegistryEntry {
            name: Arc::from(name),
            tag,
            pass,
        });
        Ok(())
    }
}
