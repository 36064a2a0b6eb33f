//! Thick line rendering
//!
//! Draws many dynamic polylines of constant thickness in a single GPU draw
//! call. Every line is expanded into a triangle strip whose vertices carry
//! just a 2D point and an ordinal; the vertex shader reads each vertex's
//! neighbours through three strided views of the same buffer and offsets
//! it sideways into a ribbon. Lines are stitched together with degenerate
//! triangles so the whole collection shares one strip.
//!
//! ```no_run
//! use glam::{Mat3, Vec2};
//! use thick_lines::backend::WgpuBackend;
//! use thick_lines::{LineStyle, LinesRenderer, RenderContext, RendererConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut backend = WgpuBackend::new_headless()?;
//! let mut renderer = LinesRenderer::with_builtin_shaders(&mut backend, &RendererConfig::default())?;
//! renderer.add_line(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)]);
//! renderer.rebuild_vertex_buffer();
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod geometry;
pub mod lines;
pub mod renderer;
pub mod shader;

pub use glam;

pub use config::{LineStyle, RendererConfig};
pub use error::{LinesError, LinesResult};
pub use geometry::{GeometryBuilder, LineVertex, StitchPolicy, VertexStorage};
pub use lines::{LineCollection, Polyline};
pub use renderer::{LinesRenderer, RenderContext};
pub use shader::{LinkedProgram, ShaderError, ShaderSources};
