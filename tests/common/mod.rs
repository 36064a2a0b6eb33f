//! Common utilities for line rendering integration tests.

#![allow(dead_code)]

use thick_lines::backend::{
    ColorAttachment, DummyBackend, GraphicsBackend, LoadOp, RenderPassDescriptor, StoreOp,
    TextureFormat, TextureViewHandle, WgpuBackend,
};
use thick_lines::glam::Vec2;
use thick_lines::Polyline;

pub const TARGET_SIZE: u32 = 64;
pub const TARGET_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Install a test logger once per process.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Backends the integration tests can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// In-memory backend, always available
    Dummy,
    /// Headless wgpu device, needs an adapter
    WebGpu,
}

impl Backend {
    /// Check if this backend is enabled for this test run.
    pub fn is_available(&self) -> bool {
        match self {
            Backend::Dummy => true,
            Backend::WebGpu => cfg!(feature = "gpu-tests"),
        }
    }
}

/// Backend instance owned by a test.
pub enum TestBackend {
    Dummy(DummyBackend),
    WebGpu(WgpuBackend),
}

/// A backend plus an offscreen color target to render into.
pub struct TestContext {
    backend: TestBackend,
    pub target: TextureViewHandle,
}

impl TestContext {
    /// Returns `None` when the backend cannot be created on this machine.
    /// The reason is printed so skipped cases show up in the test output.
    pub fn new(backend: Backend) -> Option<Self> {
        init_logging();
        if !backend.is_available() {
            eprintln!("Backend {:?} not enabled, skipping", backend);
            return None;
        }
        match backend {
            Backend::Dummy => {
                let mut dummy = DummyBackend::new();
                let target = dummy
                    .create_render_target(TARGET_SIZE, TARGET_SIZE, TARGET_FORMAT)
                    .ok()?;
                Some(Self {
                    backend: TestBackend::Dummy(dummy),
                    target,
                })
            }
            Backend::WebGpu => {
                let mut wgpu = match WgpuBackend::new_headless() {
                    Ok(backend) => backend,
                    Err(err) => {
                        eprintln!("Backend {:?} not available ({err}), skipping", backend);
                        return None;
                    }
                };
                let target = wgpu
                    .create_render_target(TARGET_SIZE, TARGET_SIZE, TARGET_FORMAT)
                    .ok()?;
                Some(Self {
                    backend: TestBackend::WebGpu(wgpu),
                    target,
                })
            }
        }
    }

    pub fn backend(&mut self) -> &mut dyn GraphicsBackend {
        match &mut self.backend {
            TestBackend::Dummy(dummy) => dummy as &mut dyn GraphicsBackend,
            TestBackend::WebGpu(wgpu) => wgpu,
        }
    }

    /// Begin a frame and a render pass clearing the target to black.
    pub fn begin(&mut self) {
        let target = self.target;
        let backend = self.backend();
        backend.begin_frame().expect("begin_frame");
        backend.begin_render_pass(&RenderPassDescriptor {
            label: Some("lines_test_pass".into()),
            color_attachments: vec![ColorAttachment {
                view: target,
                load_op: LoadOp::Clear(CLEAR_COLOR),
                store_op: StoreOp::Store,
            }],
        });
    }

    pub fn finish(&mut self) {
        let backend = self.backend();
        backend.end_render_pass();
        backend.end_frame().expect("end_frame");
    }

    /// Rendered RGBA8 pixels, or `None` for backends that draw nothing.
    pub fn read_pixels(&self) -> Option<Vec<u8>> {
        match &self.backend {
            TestBackend::Dummy(_) => None,
            TestBackend::WebGpu(wgpu) => {
                Some(wgpu.read_render_target(self.target).expect("readback"))
            }
        }
    }
}

/// Number of pixels whose red channel is above half intensity.
pub fn count_red_pixels(pixels: &[u8]) -> usize {
    pixels.chunks_exact(4).filter(|px| px[0] > 128).count()
}

/// An open polyline with `points` vertices along a sine wave.
pub fn wave(points: usize, offset: f32) -> Polyline {
    (0..points)
        .map(|i| {
            let x = i as f32 * 0.1;
            Vec2::new(x, x.sin() + offset)
        })
        .collect()
}

/// Valid vertex records for `lines` contributing lines with `points` total
/// points: 4 per line, 2 per point and 2 for each stitch in between.
pub fn expected_vertex_count(lines: usize, points: usize) -> usize {
    if lines == 0 {
        return 0;
    }
    4 * lines + 2 * points + 2 * (lines - 1)
}
