//! wgpu backend implementation

use crate::backend::traits::*;
use crate::backend::types::*;
use std::collections::HashMap;
use std::ops::Range;

/// Buffered render pass command
#[derive(Clone)]
enum RenderCommand {
    SetPipeline(RenderPipelineHandle),
    SetBindGroup { index: u32, bind_group: BindGroupHandle },
    SetVertexBuffer { slot: u32, buffer: BufferHandle, offset: u64 },
    Draw { vertices: Range<u32>, instances: Range<u32> },
}

/// Pending render pass with buffered commands
struct PendingRenderPass {
    descriptor: RenderPassDescriptor,
    commands: Vec<RenderCommand>,
}

/// wgpu backend implementation
///
/// Render pass commands are buffered and replayed on
/// [`end_render_pass`](GraphicsBackend::end_render_pass), so no borrow of a
/// `wgpu::RenderPass` ever escapes the backend.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,

    // Resource storage
    buffers: HashMap<u64, wgpu::Buffer>,
    textures: HashMap<u64, (wgpu::Texture, TextureFormat)>,
    texture_views: HashMap<u64, wgpu::TextureView>,
    bind_group_layouts: HashMap<u64, wgpu::BindGroupLayout>,
    bind_groups: HashMap<u64, wgpu::BindGroup>,
    render_pipelines: HashMap<u64, wgpu::RenderPipeline>,

    // Handle counters
    next_buffer_id: u64,
    next_view_id: u64,
    next_layout_id: u64,
    next_bind_group_id: u64,
    next_render_pipeline_id: u64,

    // Command encoding
    encoder: Option<wgpu::CommandEncoder>,

    // Pending pass - commands are buffered here and executed on end_render_pass
    pending_render_pass: Option<PendingRenderPass>,
}

impl WgpuBackend {
    fn convert_texture_format(format: TextureFormat) -> wgpu::TextureFormat {
        match format {
            TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
            TextureFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
        }
    }

    fn convert_buffer_usage(usage: BufferUsage) -> wgpu::BufferUsages {
        let mut result = wgpu::BufferUsages::empty();
        if usage.contains(BufferUsage::COPY_SRC) {
            result |= wgpu::BufferUsages::COPY_SRC;
        }
        if usage.contains(BufferUsage::COPY_DST) {
            result |= wgpu::BufferUsages::COPY_DST;
        }
        if usage.contains(BufferUsage::VERTEX) {
            result |= wgpu::BufferUsages::VERTEX;
        }
        if usage.contains(BufferUsage::UNIFORM) {
            result |= wgpu::BufferUsages::UNIFORM;
        }
        result
    }

    fn convert_vertex_format(format: VertexFormat) -> wgpu::VertexFormat {
        match format {
            VertexFormat::Float32 => wgpu::VertexFormat::Float32,
            VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
        }
    }

    fn convert_blend_factor(factor: BlendFactor) -> wgpu::BlendFactor {
        match factor {
            BlendFactor::One => wgpu::BlendFactor::One,
            BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
        }
    }

    fn convert_blend_operation(op: BlendOperation) -> wgpu::BlendOperation {
        match op {
            BlendOperation::Add => wgpu::BlendOperation::Add,
            BlendOperation::Subtract => wgpu::BlendOperation::Subtract,
        }
    }

    fn convert_blend_component(component: BlendComponent) -> wgpu::BlendComponent {
        wgpu::BlendComponent {
            src_factor: Self::convert_blend_factor(component.src_factor),
            dst_factor: Self::convert_blend_factor(component.dst_factor),
            operation: Self::convert_blend_operation(component.operation),
        }
    }

    /// Wrap an already initialized device, e.g. the one a host application
    /// renders its window with.
    pub fn from_device(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            textures: HashMap::new(),
            texture_views: HashMap::new(),
            bind_group_layouts: HashMap::new(),
            bind_groups: HashMap::new(),
            render_pipelines: HashMap::new(),
            next_buffer_id: 0,
            next_view_id: 0,
            next_layout_id: 0,
            next_bind_group_id: 0,
            next_render_pipeline_id: 0,
            encoder: None,
            pending_render_pass: None,
        }
    }

    /// Create a backend without a surface, for offscreen rendering.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new_headless() -> BackendResult<Self> {
        pollster::block_on(Self::new_headless_async())
    }

    pub async fn new_headless_async() -> BackendResult<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| {
                BackendError::InitializationFailed("no suitable GPU adapter".into())
            })?;

        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("thick_lines_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(|e| BackendError::DeviceCreationFailed(e.to_string()))?;

        Ok(Self::from_device(device, queue))
    }

    /// Create an offscreen color texture and return its view.
    pub fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> BackendResult<TextureViewHandle> {
        if width == 0 || height == 0 {
            return Err(BackendError::TextureCreationFailed(format!(
                "zero sized render target {width}x{height}"
            )));
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("thick_lines_render_target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::convert_texture_format(format),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let id = self.next_view_id;
        self.next_view_id += 1;
        self.textures.insert(id, (texture, format));
        self.texture_views.insert(id, view);

        Ok(TextureViewHandle(id))
    }

    /// Register a view owned by the caller (e.g. the current swapchain image).
    pub fn import_texture_view(&mut self, view: wgpu::TextureView) -> TextureViewHandle {
        let id = self.next_view_id;
        self.next_view_id += 1;
        self.texture_views.insert(id, view);
        TextureViewHandle(id)
    }

    /// Drop a texture view (and its texture, if the backend created it).
    pub fn release_texture_view(&mut self, view: TextureViewHandle) {
        self.texture_views.remove(&view.0);
        self.textures.remove(&view.0);
    }

    /// Copy a render target created by
    /// [`create_render_target`](Self::create_render_target) back to host
    /// memory, rows tightly packed.
    ///
    /// Blocks until the GPU is idle. Call it after `end_frame`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_render_target(&self, view: TextureViewHandle) -> BackendResult<Vec<u8>> {
        let (texture, format) = self
            .textures
            .get(&view.0)
            .ok_or_else(|| BackendError::InvalidHandle(format!("{view:?}")))?;

        let (width, height) = (texture.width(), texture.height());
        let row_bytes = width * format.bytes_per_pixel();
        let padded_row = row_bytes.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("thick_lines_readback"),
            size: u64::from(padded_row) * u64::from(height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("thick_lines_readback"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            texture.size(),
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|_| BackendError::DeviceLost)?
            .map_err(|e| BackendError::InvalidParameter(format!("readback failed: {e}")))?;

        let mut pixels = Vec::with_capacity((row_bytes * height) as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks(padded_row as usize) {
                pixels.extend_from_slice(&row[..row_bytes as usize]);
            }
        }
        staging.unmap();

        log::trace!("Read back {}x{} render target", width, height);
        Ok(pixels)
    }

    /// Get the underlying wgpu device
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Get the underlying wgpu queue
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn push_render_command(&mut self, command: RenderCommand) {
        match self.pending_render_pass.as_mut() {
            Some(pass) => pass.commands.push(command),
            None => log::warn!("WgpuBackend: render command issued outside a render pass; ignored"),
        }
    }
}

impl GraphicsBackend for WgpuBackend {
    fn name(&self) -> &'static str {
        "wgpu"
    }

    fn create_buffer(&mut self, desc: &BufferDescriptor) -> BackendResult<BufferHandle> {
        if desc.size > self.device.limits().max_buffer_size {
            return Err(BackendError::BufferCreationFailed(format!(
                "{} bytes exceeds the device limit",
                desc.size
            )));
        }

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: desc.label.as_deref(),
            size: desc.size,
            usage: Self::convert_buffer_usage(desc.usage),
            mapped_at_creation: false,
        });

        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        self.buffers.insert(id, buffer);

        Ok(BufferHandle(id))
    }

    fn write_buffer(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> BackendResult<()> {
        let buf = self
            .buffers
            .get(&buffer.0)
            .ok_or_else(|| BackendError::InvalidHandle(format!("{buffer:?}")))?;

        if offset + data.len() as u64 > buf.size() {
            return Err(BackendError::InvalidParameter(format!(
                "write of {} bytes at offset {} exceeds buffer size {}",
                data.len(),
                offset,
                buf.size()
            )));
        }

        self.queue.write_buffer(buf, offset, data);
        Ok(())
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        if let Some(buf) = self.buffers.remove(&buffer.0) {
            buf.destroy();
        }
    }

    fn create_bind_group_layout(
        &mut self,
        entries: &[BindGroupLayoutEntry],
    ) -> BackendResult<BindGroupLayoutHandle> {
        let wgpu_entries: Vec<wgpu::BindGroupLayoutEntry> = entries
            .iter()
            .map(|e| {
                let mut visibility = wgpu::ShaderStages::NONE;
                if e.visibility.contains(ShaderStageFlags::VERTEX) {
                    visibility |= wgpu::ShaderStages::VERTEX;
                }
                if e.visibility.contains(ShaderStageFlags::FRAGMENT) {
                    visibility |= wgpu::ShaderStages::FRAGMENT;
                }

                let ty = match e.ty {
                    BindingType::UniformBuffer => wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                };

                wgpu::BindGroupLayoutEntry {
                    binding: e.binding,
                    visibility,
                    ty,
                    count: None,
                }
            })
            .collect();

        let layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: None,
                entries: &wgpu_entries,
            });

        let id = self.next_layout_id;
        self.next_layout_id += 1;
        self.bind_group_layouts.insert(id, layout);

        Ok(BindGroupLayoutHandle(id))
    }

    fn create_bind_group(
        &mut self,
        layout: BindGroupLayoutHandle,
        entries: &[(u32, BindGroupEntry)],
    ) -> BackendResult<BindGroupHandle> {
        let layout_ref = self
            .bind_group_layouts
            .get(&layout.0)
            .ok_or_else(|| BackendError::InvalidHandle(format!("{layout:?}")))?;

        let mut wgpu_entries = Vec::with_capacity(entries.len());
        for (binding, entry) in entries {
            let BindGroupEntry::Buffer {
                buffer,
                offset,
                size,
            } = entry;
            let buf = self
                .buffers
                .get(&buffer.0)
                .ok_or_else(|| BackendError::InvalidHandle(format!("{buffer:?}")))?;
            wgpu_entries.push(wgpu::BindGroupEntry {
                binding: *binding,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: buf,
                    offset: *offset,
                    size: size.and_then(wgpu::BufferSize::new),
                }),
            });
        }

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: layout_ref,
            entries: &wgpu_entries,
        });

        let id = self.next_bind_group_id;
        self.next_bind_group_id += 1;
        self.bind_groups.insert(id, bind_group);

        Ok(BindGroupHandle(id))
    }

    fn create_render_pipeline(
        &mut self,
        desc: &RenderPipelineDescriptor,
    ) -> BackendResult<RenderPipelineHandle> {
        #[cfg(not(target_arch = "wasm32"))]
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: desc.label.as_deref(),
                source: wgpu::ShaderSource::Wgsl(desc.vertex_shader.as_str().into()),
            });
        let fragment_module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: desc.label.as_deref(),
                source: wgpu::ShaderSource::Wgsl(desc.fragment_shader.as_str().into()),
            });

        let layouts: Vec<&wgpu::BindGroupLayout> = desc
            .bind_group_layouts
            .iter()
            .filter_map(|h| self.bind_group_layouts.get(&h.0))
            .collect();

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: None,
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            });

        // Build vertex buffer layouts with proper lifetimes
        let vertex_attrs: Vec<Vec<wgpu::VertexAttribute>> = desc
            .vertex_layouts
            .iter()
            .map(|layout| {
                layout
                    .attributes
                    .iter()
                    .map(|a| wgpu::VertexAttribute {
                        format: Self::convert_vertex_format(a.format),
                        offset: a.offset,
                        shader_location: a.location,
                    })
                    .collect()
            })
            .collect();

        let vertex_buffers: Vec<wgpu::VertexBufferLayout> = desc
            .vertex_layouts
            .iter()
            .zip(vertex_attrs.iter())
            .map(|(layout, attrs)| wgpu::VertexBufferLayout {
                array_stride: layout.array_stride,
                step_mode: match layout.step_mode {
                    VertexStepMode::Vertex => wgpu::VertexStepMode::Vertex,
                    VertexStepMode::Instance => wgpu::VertexStepMode::Instance,
                },
                attributes: attrs,
            })
            .collect();

        let color_targets: Vec<Option<wgpu::ColorTargetState>> = desc
            .color_targets
            .iter()
            .map(|target| {
                Some(wgpu::ColorTargetState {
                    format: Self::convert_texture_format(target.format),
                    blend: target.blend.map(|b| wgpu::BlendState {
                        color: Self::convert_blend_component(b.color),
                        alpha: Self::convert_blend_component(b.alpha),
                    }),
                    write_mask: wgpu::ColorWrites::from_bits_truncate(target.write_mask.0),
                })
            })
            .collect();

        let primitive = wgpu::PrimitiveState {
            topology: match desc.primitive_topology {
                PrimitiveTopology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
                PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
                PrimitiveTopology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
            },
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // both windings occur along a ribbon
            cull_mode: None,
            ..Default::default()
        };

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: desc.label.as_deref(),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: &desc.vertex_entry,
                    buffers: &vertex_buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: &desc.fragment_entry,
                    targets: &color_targets,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive,
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            });

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(BackendError::PipelineCreationFailed(error.to_string()));
        }

        let id = self.next_render_pipeline_id;
        self.next_render_pipeline_id += 1;
        self.render_pipelines.insert(id, pipeline);

        Ok(RenderPipelineHandle(id))
    }

    fn begin_frame(&mut self) -> BackendResult<()> {
        if self.encoder.is_some() {
            return Err(BackendError::InvalidParameter(
                "begin_frame called twice".into(),
            ));
        }
        self.encoder = Some(
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("thick_lines_frame"),
                }),
        );
        Ok(())
    }

    fn end_frame(&mut self) -> BackendResult<()> {
        if self.pending_render_pass.is_some() {
            log::warn!("WgpuBackend: frame ended inside an open render pass; closing it");
            self.end_render_pass();
        }
        let encoder = self.encoder.take().ok_or_else(|| {
            BackendError::InvalidParameter("end_frame without begin_frame".into())
        })?;
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn begin_render_pass(&mut self, desc: &RenderPassDescriptor) {
        // Store the descriptor for later execution
        self.pending_render_pass = Some(PendingRenderPass {
            descriptor: desc.clone(),
            commands: Vec::new(),
        });
    }

    fn end_render_pass(&mut self) {
        let Some(pending) = self.pending_render_pass.take() else {
            return;
        };

        let Some(encoder) = self.encoder.as_mut() else {
            log::warn!("WgpuBackend: render pass ended outside a frame; dropped");
            return;
        };

        let color_attachments: Vec<Option<wgpu::RenderPassColorAttachment>> = pending
            .descriptor
            .color_attachments
            .iter()
            .filter_map(|att| {
                let view = self.texture_views.get(&att.view.0)?;
                Some(Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: match &att.load_op {
                            LoadOp::Clear(color) => wgpu::LoadOp::Clear(wgpu::Color {
                                r: color[0] as f64,
                                g: color[1] as f64,
                                b: color[2] as f64,
                                a: color[3] as f64,
                            }),
                            LoadOp::Load => wgpu::LoadOp::Load,
                        },
                        store: match att.store_op {
                            StoreOp::Store => wgpu::StoreOp::Store,
                            StoreOp::Discard => wgpu::StoreOp::Discard,
                        },
                    },
                }))
            })
            .collect();

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: pending.descriptor.label.as_deref(),
            color_attachments: &color_attachments,
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        for cmd in &pending.commands {
            match cmd {
                RenderCommand::SetPipeline(handle) => {
                    if let Some(pipeline) = self.render_pipelines.get(&handle.0) {
                        render_pass.set_pipeline(pipeline);
                    }
                }
                RenderCommand::SetBindGroup { index, bind_group } => {
                    if let Some(bg) = self.bind_groups.get(&bind_group.0) {
                        render_pass.set_bind_group(*index, bg, &[]);
                    }
                }
                RenderCommand::SetVertexBuffer {
                    slot,
                    buffer,
                    offset,
                } => {
                    if let Some(buf) = self.buffers.get(&buffer.0) {
                        render_pass.set_vertex_buffer(*slot, buf.slice(*offset..));
                    }
                }
                RenderCommand::Draw {
                    vertices,
                    instances,
                } => {
                    render_pass.draw(vertices.clone(), instances.clone());
                }
            }
        }
        // render_pass is dropped here, ending the pass
    }

    fn set_render_pipeline(&mut self, pipeline: RenderPipelineHandle) {
        self.push_render_command(RenderCommand::SetPipeline(pipeline));
    }

    fn set_bind_group(&mut self, index: u32, bind_group: BindGroupHandle) {
        self.push_render_command(RenderCommand::SetBindGroup { index, bind_group });
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferHandle, offset: u64) {
        self.push_render_command(RenderCommand::SetVertexBuffer {
            slot,
            buffer,
            offset,
        });
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        self.push_render_command(RenderCommand::Draw {
            vertices,
            instances,
        });
    }
}
