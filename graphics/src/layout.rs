//! Image layout states named by barrier steps.
//!
//! Configuration files spell layouts as strings (`"ColorAttachment"`); a
//! compiled barrier carries the 8-bit [`ImageLayout::code`] instead.

use std::fmt;

/// Number of distinct image layout states.
pub const IMAGE_LAYOUT_COUNT: usize = 10;

/// Layout state of a GPU image, as seen by a layout-transition barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ImageLayout {
    /// Contents undefined. Valid only as a source layout in practice.
    #[default]
    Undefined = 0,
    /// Least optimal but usable for anything.
    General = 1,
    /// Color attachment writes.
    ColorAttachment = 2,
    /// Depth/stencil attachment writes.
    DepthStencilAttachment = 3,
    /// Depth testing plus sampling.
    DepthStencilReadOnly = 4,
    /// Shader sampling.
    ShaderReadOnly = 5,
    /// Transfer source.
    TransferSrc = 6,
    /// Transfer destination.
    TransferDst = 7,
    /// Host-written, preinitialized contents.
    Preinitialized = 8,
    /// Presentation to the swapchain.
    PresentSrc = 9,
}

impl ImageLayout {
    /// Every layout, ordered by code.
    pub const ALL: [ImageLayout; IMAGE_LAYOUT_COUNT] = [
        Self::Undefined,
        Self::General,
        Self::ColorAttachment,
        Self::DepthStencilAttachment,
        Self::DepthStencilReadOnly,
        Self::ShaderReadOnly,
        Self::TransferSrc,
        Self::TransferDst,
        Self::Preinitialized,
        Self::PresentSrc,
    ];

    /// The 8-bit code carried by compiled barrier steps.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Name used in renderer configuration files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::General => "General",
            Self::ColorAttachment => "ColorAttachment",
            Self::DepthStencilAttachment => "DepthStencilAttachment",
            Self::DepthStencilReadOnly => "DepthStencilReadOnly",
            Self::ShaderReadOnly => "ShaderReadOnly",
            Self::TransferSrc => "TransferSrc",
            Self::TransferDst => "TransferDst",
            Self::Preinitialized => "Preinitialized",
            Self::PresentSrc => "PresentSrc",
        }
    }

    /// Look up a layout by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layout| layout.name() == name)
    }

    /// Check if this is a depth/stencil layout.
    pub fn is_depth_stencil(self) -> bool {
        matches!(
            self,
            Self::DepthStencilAttachment | Self::DepthStencilReadOnly
        )
    }
}

impl fmt::Display for ImageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
