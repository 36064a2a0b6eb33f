//! Line rendering
//!
//! [`LinesRenderer`] owns the line collection, the geometry builder and the
//! GPU resources needed to draw every line in one triangle-strip draw call.

use glam::Mat3;

use crate::backend::{
    BackendError, BindGroupEntry, BindGroupHandle, BindGroupLayoutEntry, BindingType,
    BlendState, BufferDescriptor, BufferHandle, BufferUsage, ColorTargetState, ColorWrites,
    GraphicsBackend, PrimitiveTopology, RenderPipelineDescriptor, RenderPipelineHandle,
    ShaderStageFlags,
};
use crate::config::{LineStyle, RendererConfig};
use crate::error::LinesResult;
use crate::geometry::{GeometryBuilder, LineVertex, VertexStorage, VERTEX_STRIDE};
use crate::lines::{LineCollection, Polyline};
use crate::shader::{
    LineUniforms, LinkedProgram, ProgramInfo, ShaderSources, FRAGMENT_ENTRY_POINT,
    VERTEX_ENTRY_POINT,
};

/// Vertex-buffer slot and record offset of each strided view.
///
/// Draw vertex `i` reads record `i` as previous, `i + 2` as current and
/// `i + 4` as next point of the same rail.
const PREV_VIEW: (u32, u64) = (0, 0);
const CURRENT_VIEW: (u32, u64) = (1, 2);
const NEXT_VIEW: (u32, u64) = (2, 4);

/// Per-frame inputs supplied by the caller (camera, viewport owner, ...).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// World to normalized device coordinates
    pub transform: Mat3,
}

impl RenderContext {
    pub fn new(transform: Mat3) -> Self {
        Self { transform }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Mat3::IDENTITY)
    }
}

/// Renders an arbitrary number of dynamic lines that share a thickness and
/// color.
///
/// Create once at initialization. Each frame, mutate the lines, call
/// [`rebuild_vertex_buffer`](Self::rebuild_vertex_buffer), then
/// [`render`](Self::render) inside an open render pass.
pub struct LinesRenderer {
    label: String,
    lines: LineCollection,
    builder: GeometryBuilder,
    program: ProgramInfo,
    pipeline: RenderPipelineHandle,
    uniform_buffer: BufferHandle,
    bind_group: BindGroupHandle,
    vertex_buffer: BufferHandle,
    vertex_buffer_size: u64,
}

impl LinesRenderer {
    /// Create a renderer using the shaders shipped with the crate.
    pub fn with_builtin_shaders<B: GraphicsBackend + ?Sized>(
        backend: &mut B,
        config: &RendererConfig,
    ) -> LinesResult<Self> {
        let program = LinkedProgram::link(ShaderSources::builtin())?;
        Self::new(backend, config, program)
    }

    /// Create a renderer for an already linked program.
    pub fn new<B: GraphicsBackend + ?Sized>(
        backend: &mut B,
        config: &RendererConfig,
        program: LinkedProgram,
    ) -> LinesResult<Self> {
        let info = *program.info();
        let label = config.label.as_str();

        // Groups below the uniform group stay empty
        let mut bind_group_layouts = Vec::with_capacity(info.uniforms.group as usize + 1);
        for _ in 0..info.uniforms.group {
            bind_group_layouts.push(backend.create_bind_group_layout(&[])?);
        }
        let uniform_layout = backend.create_bind_group_layout(&[BindGroupLayoutEntry {
            binding: info.uniforms.binding,
            visibility: ShaderStageFlags::VERTEX_FRAGMENT,
            ty: BindingType::UniformBuffer,
        }])?;
        bind_group_layouts.push(uniform_layout);

        let uniform_buffer = backend.create_buffer(
            &BufferDescriptor::new(
                u64::from(info.uniforms.size),
                BufferUsage::UNIFORM | BufferUsage::COPY_DST,
            )
            .with_label(format!("{label}_uniforms")),
        )?;

        let bind_group = backend.create_bind_group(
            uniform_layout,
            &[(
                info.uniforms.binding,
                BindGroupEntry::Buffer {
                    buffer: uniform_buffer,
                    offset: 0,
                    size: None,
                },
            )],
        )?;

        let sources = program.sources();
        let pipeline = backend.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(format!("{label}_pipeline")),
            vertex_shader: sources.vertex.clone(),
            vertex_entry: VERTEX_ENTRY_POINT.to_string(),
            fragment_shader: sources.fragment.clone(),
            fragment_entry: FRAGMENT_ENTRY_POINT.to_string(),
            // order matches the view slots
            vertex_layouts: vec![
                LineVertex::pack_layout(info.attributes.prev),
                LineVertex::pack_layout(info.attributes.current),
                LineVertex::pack_layout(info.attributes.next),
            ],
            bind_group_layouts,
            primitive_topology: PrimitiveTopology::TriangleStrip,
            color_targets: vec![ColorTargetState {
                format: config.color_format,
                blend: Some(BlendState::ALPHA_BLENDING),
                write_mask: ColorWrites::ALL,
            }],
        })?;

        let builder = GeometryBuilder::with_capacity(config.stitch_policy, config.initial_capacity);
        let vertex_buffer_size = builder.storage().capacity_bytes();
        let vertex_buffer = Self::create_vertex_buffer(backend, label, vertex_buffer_size)?;

        log::debug!(
            "Created lines renderer '{}' on {} ({} byte vertex buffer)",
            label,
            backend.name(),
            vertex_buffer_size
        );

        Ok(Self {
            label: config.label.clone(),
            lines: LineCollection::new(),
            builder,
            program: info,
            pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            vertex_buffer_size,
        })
    }

    fn create_vertex_buffer<B: GraphicsBackend + ?Sized>(
        backend: &mut B,
        label: &str,
        size: u64,
    ) -> LinesResult<BufferHandle> {
        Ok(backend.create_buffer(
            &BufferDescriptor::new(size, BufferUsage::VERTEX | BufferUsage::COPY_DST)
                .with_label(format!("{label}_vertices")),
        )?)
    }

    pub fn add_line(&mut self, points: Polyline) {
        self.lines.add_line(points);
    }

    pub fn clear_lines(&mut self) {
        self.lines.clear_lines();
    }

    pub fn lines(&self) -> &LineCollection {
        &self.lines
    }

    /// Mutable access for in-place edits (appending points, perturbation).
    pub fn lines_mut(&mut self) -> &mut LineCollection {
        &mut self.lines
    }

    /// Rebuild the vertex data from the current lines.
    ///
    /// Needed every frame in which any line changed. Returns the number of
    /// valid vertex records.
    pub fn rebuild_vertex_buffer(&mut self) -> usize {
        self.builder.rebuild(self.lines.lines())
    }

    pub fn storage(&self) -> &VertexStorage {
        self.builder.storage()
    }

    /// Number of vertices the next [`render`](Self::render) will draw.
    pub fn drawable_vertex_count(&self) -> usize {
        self.builder.drawable_vertex_count()
    }

    pub fn program_info(&self) -> &ProgramInfo {
        &self.program
    }

    pub fn pipeline(&self) -> RenderPipelineHandle {
        self.pipeline
    }

    pub fn vertex_buffer(&self) -> BufferHandle {
        self.vertex_buffer
    }

    pub fn uniform_buffer(&self) -> BufferHandle {
        self.uniform_buffer
    }

    /// Draw all lines built by the last rebuild.
    ///
    /// Must be called inside an open render pass. Returns `false` and
    /// touches nothing when there is nothing to draw.
    pub fn render<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        context: &RenderContext,
        style: &LineStyle,
    ) -> LinesResult<bool> {
        let drawable = self.builder.drawable_vertex_count();
        if drawable == 0 {
            log::trace!("Lines renderer '{}': nothing to draw", self.label);
            return Ok(false);
        }
        let vertex_count = u32::try_from(drawable).map_err(|_| {
            BackendError::InvalidParameter(format!("{drawable} vertices exceed a single draw"))
        })?;

        self.ensure_vertex_buffer(backend)?;
        backend.write_buffer(self.vertex_buffer, 0, self.builder.storage().as_bytes())?;

        let uniforms = LineUniforms {
            transform: context.transform,
            thickness: style.thickness,
            color: style.color,
            wireframe: style.wireframe,
        };
        backend.write_buffer(self.uniform_buffer, 0, &self.program.uniforms.pack(&uniforms))?;

        backend.set_render_pipeline(self.pipeline);
        backend.set_bind_group(self.program.uniforms.group, self.bind_group);
        for (slot, record_offset) in [PREV_VIEW, CURRENT_VIEW, NEXT_VIEW] {
            backend.set_vertex_buffer(slot, self.vertex_buffer, record_offset * VERTEX_STRIDE);
        }
        backend.draw(0..vertex_count, 0..1);

        log::trace!(
            "Lines renderer '{}': drew {} strip vertices",
            self.label,
            vertex_count
        );
        Ok(true)
    }

    /// Release the GPU buffers owned by this renderer.
    pub fn destroy<B: GraphicsBackend + ?Sized>(self, backend: &mut B) {
        backend.destroy_buffer(self.vertex_buffer);
        backend.destroy_buffer(self.uniform_buffer);
    }

    // Grow the device buffer along with the storage; never shrink.
    fn ensure_vertex_buffer<B: GraphicsBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> LinesResult<()> {
        let required = self.builder.storage().capacity_bytes();
        if required <= self.vertex_buffer_size {
            return Ok(());
        }

        log::debug!(
            "Lines renderer '{}': growing vertex buffer from {} to {} bytes",
            self.label,
            self.vertex_buffer_size,
            required
        );
        let buffer = Self::create_vertex_buffer(backend, &self.label, required)?;
        backend.destroy_buffer(self.vertex_buffer);
        self.vertex_buffer = buffer;
        self.vertex_buffer_size = required;
        Ok(())
    }
}
