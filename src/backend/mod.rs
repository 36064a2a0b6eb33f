//! Backend abstraction layer
//!
//! Provides the device interface the line renderer draws through, with a
//! wgpu implementation and an in-memory dummy implementation.

pub mod dummy;
pub mod traits;
pub mod types;
pub mod wgpu_backend;

pub use dummy::{DummyBackend, DummyCommand};
pub use traits::*;
pub use types::*;
pub use wgpu_backend::WgpuBackend;
