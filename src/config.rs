//! Renderer configuration and per-draw style.

use crate::backend::TextureFormat;
use crate::geometry::{StitchPolicy, DEFAULT_STORAGE_CAPACITY};

/// Configuration for creating a [`LinesRenderer`](crate::LinesRenderer)
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Debug label prefix for GPU resources
    pub label: String,
    /// Initial vertex storage size in scalar slots
    pub initial_capacity: usize,
    /// Format of the color target the lines are drawn into
    pub color_format: TextureFormat,
    /// How polylines are stitched together
    pub stitch_policy: StitchPolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            label: "lines".to_string(),
            initial_capacity: DEFAULT_STORAGE_CAPACITY,
            color_format: TextureFormat::Bgra8UnormSrgb,
            stitch_policy: StitchPolicy::default(),
        }
    }
}

impl RendererConfig {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_format = format;
        self
    }

    pub fn with_stitch_policy(mut self, policy: StitchPolicy) -> Self {
        self.stitch_policy = policy;
        self
    }
}

/// Appearance shared by every line of one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Full ribbon width in world units
    pub thickness: f32,
    /// Normalized RGB
    pub color: [f32; 3],
    /// Draw triangle edges instead of filled ribbons
    pub wireframe: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            thickness: 0.42,
            color: [0.9, 0.1, 0.1],
            wireframe: false,
        }
    }
}

impl LineStyle {
    pub fn new(thickness: f32, color: [f32; 3]) -> Self {
        Self {
            thickness,
            color,
            wireframe: false,
        }
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }
}
