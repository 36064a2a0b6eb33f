//! Line geometry
//!
//! Turns a collection of polylines into one packed vertex buffer that is
//! drawn as a single triangle strip. Separate polylines are joined by
//! zero-area triangles.

mod builder;
mod storage;
mod vertex;

pub use builder::{GeometryBuilder, StitchPolicy, ANCHOR_VERTICES};
pub use storage::{VertexStorage, DEFAULT_STORAGE_CAPACITY};
pub use vertex::{LineVertex, FLOATS_PER_VERTEX, VERTEX_STRIDE};
