use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::rngs::StdRng;
use rand::SeedableRng;
use thick_lines::backend::{DummyBackend, GraphicsBackend, RenderPassDescriptor};
use thick_lines::glam::Vec2;
use thick_lines::lines::DEFAULT_PERTURB_AMPLITUDE;
use thick_lines::{
    GeometryBuilder, LineCollection, LineStyle, LinesRenderer, Polyline, RenderContext,
    RendererConfig, StitchPolicy,
};

fn circle(points: usize, radius: f32) -> Polyline {
    (0..points)
        .map(|i| {
            let angle = i as f32 / points as f32 * std::f32::consts::TAU;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn collection(lines: usize, points: usize) -> LineCollection {
    (0..lines)
        .map(|i| circle(points, 1.0 + i as f32 * 0.05))
        .collect::<Vec<_>>()
        .into()
}

// ---------------------------------------------------------------------------
// Geometry rebuild
// ---------------------------------------------------------------------------

fn bench_rebuild_small(c: &mut Criterion) {
    let lines = collection(4, 16);
    let mut builder = GeometryBuilder::new(StitchPolicy::default());
    c.bench_function("rebuild_4_lines_16_points", |b| {
        b.iter(|| black_box(builder.rebuild(black_box(lines.lines()))));
    });
}

fn bench_rebuild_large(c: &mut Criterion) {
    let lines = collection(256, 256);
    let mut builder = GeometryBuilder::new(StitchPolicy::default());
    c.bench_function("rebuild_256_lines_256_points", |b| {
        b.iter(|| black_box(builder.rebuild(black_box(lines.lines()))));
    });
}

fn bench_rebuild_from_empty_storage(c: &mut Criterion) {
    let lines = collection(64, 128);
    c.bench_function("rebuild_64_lines_with_growth", |b| {
        b.iter(|| {
            let mut builder = GeometryBuilder::new(StitchPolicy::default());
            black_box(builder.rebuild(lines.lines()))
        });
    });
}

fn bench_perturb_and_rebuild(c: &mut Criterion) {
    let mut lines = collection(64, 128);
    let mut builder = GeometryBuilder::new(StitchPolicy::default());
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("perturb_and_rebuild_64_lines", |b| {
        b.iter(|| {
            lines.perturb(&mut rng, DEFAULT_PERTURB_AMPLITUDE);
            black_box(builder.rebuild(lines.lines()))
        });
    });
}

// ---------------------------------------------------------------------------
// Frame submission
// ---------------------------------------------------------------------------

fn bench_dummy_frame(c: &mut Criterion) {
    let mut backend = DummyBackend::new();
    let mut renderer =
        LinesRenderer::with_builtin_shaders(&mut backend, &RendererConfig::default()).unwrap();
    for line in collection(64, 128).lines() {
        renderer.add_line(line.clone());
    }
    renderer.rebuild_vertex_buffer();
    let context = RenderContext::default();
    let style = LineStyle::default();

    c.bench_function("dummy_frame_64_lines", |b| {
        b.iter(|| {
            backend.begin_frame().unwrap();
            backend.begin_render_pass(&RenderPassDescriptor {
                label: None,
                color_attachments: Vec::new(),
            });
            black_box(renderer.render(&mut backend, &context, &style).unwrap());
            backend.end_render_pass();
            backend.end_frame().unwrap();
            backend.clear_commands();
        });
    });
}

criterion_group!(
    benches,
    bench_rebuild_small,
    bench_rebuild_large,
    bench_rebuild_from_empty_storage,
    bench_perturb_and_rebuild,
    bench_dummy_frame,
);
criterion_main!(benches);
