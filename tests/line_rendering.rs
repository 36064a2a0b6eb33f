//! Integration tests for the line renderer.
//!
//! Tests are parameterized with `rstest`. The wgpu cases need a GPU (or a
//! software adapter) and are skipped unless the `gpu-tests` feature is on:
//!
//! ```bash
//! cargo test --test line_rendering
//! cargo test --test line_rendering --features gpu-tests
//! ```

mod common;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;

use common::{count_red_pixels, expected_vertex_count, wave, Backend, TestContext, TARGET_FORMAT};
use thick_lines::glam::{Mat3, Vec2};
use thick_lines::{
    GeometryBuilder, LineStyle, LinesRenderer, RenderContext, RendererConfig, StitchPolicy,
};

fn config() -> RendererConfig {
    RendererConfig::default()
        .with_label("lines_test")
        .with_color_format(TARGET_FORMAT)
}

// ============================================================================
// Geometry
// ============================================================================

#[rstest]
#[case::single_segment(&[2], 8)]
#[case::corner(&[3], 10)]
#[case::two_lines(&[3, 3], 22)]
#[case::three_lines(&[2, 4, 5], expected_vertex_count(3, 11))]
#[case::dots_only(&[1, 1, 1], 0)]
#[case::dots_between(&[1, 3, 1, 2, 1], expected_vertex_count(2, 5))]
fn test_vertex_count(#[case] lengths: &[usize], #[case] expected: usize) {
    let lines: Vec<_> = lengths
        .iter()
        .enumerate()
        .map(|(i, &n)| wave(n, i as f32))
        .collect();

    let mut builder = GeometryBuilder::new(StitchPolicy::ContributingLines);
    assert_eq!(builder.rebuild(&lines), expected);
    assert_eq!(builder.storage().len(), expected * 3);
    assert_eq!(builder.drawable_vertex_count(), expected.saturating_sub(4));
}

#[rstest]
#[case::leading_dot(vec![wave(1, 0.0), wave(3, 1.0)], 11)]
#[case::trailing_dot(vec![wave(3, 0.0), wave(1, 1.0)], 11)]
#[case::both(vec![wave(1, 0.0), wave(3, 1.0), wave(1, 2.0)], 12)]
fn test_collection_position_keeps_boundary_stitches(
    #[case] lines: Vec<Vec<Vec2>>,
    #[case] expected: usize,
) {
    let mut reference = GeometryBuilder::new(StitchPolicy::CollectionPosition);
    assert_eq!(reference.rebuild(&lines), expected);

    let mut builder = GeometryBuilder::new(StitchPolicy::ContributingLines);
    assert_eq!(builder.rebuild(&lines), 10);
}

#[test]
fn test_stitch_repeats_exit_and_entry_points() {
    let first = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
    let second = vec![Vec2::new(5.0, 5.0), Vec2::new(6.0, 5.0)];
    let mut builder = GeometryBuilder::new(StitchPolicy::default());
    builder.rebuild(&[first, second]);

    let vertices = builder.storage().vertices();
    // first line: 2 start + 4 point + 2 close + 1 exit
    let exit = vertices[8];
    let entry = vertices[9];
    assert_eq!(exit.position, [1.0, 0.0]);
    assert_eq!(exit.index, 3.0);
    assert_eq!(entry.position, [5.0, 5.0]);
    assert_eq!(entry.index, 0.0);
}

#[test]
fn test_rebuild_tracks_line_edits() {
    let mut renderer = {
        let mut ctx = TestContext::new(Backend::Dummy).unwrap();
        LinesRenderer::with_builtin_shaders(ctx.backend(), &config()).unwrap()
    };

    renderer.add_line(wave(3, 0.0));
    assert_eq!(renderer.rebuild_vertex_buffer(), 10);

    // growing a line in place
    renderer.lines_mut().last_line_mut().unwrap().push(Vec2::new(9.0, 9.0));
    assert_eq!(renderer.rebuild_vertex_buffer(), 12);

    renderer.add_line(wave(2, 1.0));
    assert_eq!(renderer.rebuild_vertex_buffer(), expected_vertex_count(2, 6));

    renderer.clear_lines();
    assert_eq!(renderer.rebuild_vertex_buffer(), 0);
    assert_eq!(renderer.drawable_vertex_count(), 0);
}

#[test]
fn test_perturb_keeps_vertex_count() {
    let mut ctx = TestContext::new(Backend::Dummy).unwrap();
    let mut renderer =
        LinesRenderer::with_builtin_shaders(ctx.backend(), &config()).unwrap();
    renderer.add_line(wave(16, 0.0));
    renderer.add_line(wave(8, 1.0));
    let before = renderer.rebuild_vertex_buffer();
    let snapshot = renderer.storage().valid_slice().to_vec();

    let mut rng = StdRng::seed_from_u64(42);
    renderer.lines_mut().perturb(&mut rng, 0.01);

    assert_eq!(renderer.rebuild_vertex_buffer(), before);
    assert_ne!(renderer.storage().valid_slice(), snapshot.as_slice());
}

// ============================================================================
// Rendering
// ============================================================================

#[rstest]
#[case::dummy(Backend::Dummy)]
#[case::webgpu(Backend::WebGpu)]
fn test_render_many_lines(#[case] backend: Backend) {
    let Some(mut ctx) = TestContext::new(backend) else {
        return;
    };

    let mut renderer =
        LinesRenderer::with_builtin_shaders(ctx.backend(), &config()).unwrap();
    for i in 0..100 {
        renderer.add_line(wave(50, i as f32 * 0.01));
    }
    let vertices = renderer.rebuild_vertex_buffer();
    assert_eq!(vertices, expected_vertex_count(100, 5000));

    let transform = Mat3::from_scale(Vec2::splat(0.1));
    ctx.begin();
    let drew = renderer
        .render(
            ctx.backend(),
            &RenderContext::new(transform),
            &LineStyle::default(),
        )
        .unwrap();
    ctx.finish();

    assert!(drew);
    if let Some(pixels) = ctx.read_pixels() {
        assert!(count_red_pixels(&pixels) > 0, "no line pixels were rendered");
    }
    renderer.destroy(ctx.backend());
}

#[rstest]
#[case::dummy(Backend::Dummy)]
#[case::webgpu(Backend::WebGpu)]
fn test_render_skips_when_nothing_to_draw(#[case] backend: Backend) {
    let Some(mut ctx) = TestContext::new(backend) else {
        return;
    };

    let mut renderer =
        LinesRenderer::with_builtin_shaders(ctx.backend(), &config()).unwrap();
    renderer.add_line(vec![Vec2::ZERO]);
    renderer.rebuild_vertex_buffer();

    ctx.begin();
    let drew = renderer
        .render(ctx.backend(), &RenderContext::default(), &LineStyle::default())
        .unwrap();
    ctx.finish();

    assert!(!drew);
    if let Some(pixels) = ctx.read_pixels() {
        assert_eq!(count_red_pixels(&pixels), 0);
    }
}

#[rstest]
#[case::dummy(Backend::Dummy)]
#[case::webgpu(Backend::WebGpu)]
fn test_render_after_storage_growth(#[case] backend: Backend) {
    let Some(mut ctx) = TestContext::new(backend) else {
        return;
    };

    let mut renderer = LinesRenderer::with_builtin_shaders(
        ctx.backend(),
        &config().with_initial_capacity(64),
    )
    .unwrap();
    let initial_capacity = renderer.storage().capacity();

    for frame in 0..3 {
        renderer.add_line(wave(40, frame as f32));
        renderer.rebuild_vertex_buffer();

        ctx.begin();
        let drew = renderer
            .render(
                ctx.backend(),
                &RenderContext::default(),
                &LineStyle::default().with_wireframe(frame % 2 == 1),
            )
            .unwrap();
        ctx.finish();
        assert!(drew);
    }

    assert!(renderer.storage().capacity() > initial_capacity);
    if let Some(pixels) = ctx.read_pixels() {
        assert!(count_red_pixels(&pixels) > 0, "no line pixels were rendered");
    }
}
