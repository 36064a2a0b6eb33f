//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations. Buffers live in
//! host memory and every command is recorded, so the draw calls issued by
//! the renderer can be inspected without GPU hardware.

use std::collections::HashMap;
use std::ops::Range;

use crate::backend::traits::*;
use crate::backend::types::*;

/// A command observed by the dummy backend.
#[derive(Debug, Clone, PartialEq)]
pub enum DummyCommand {
    CreateBuffer { buffer: BufferHandle, size: u64 },
    WriteBuffer { buffer: BufferHandle, offset: u64, size: u64 },
    DestroyBuffer(BufferHandle),
    BeginFrame,
    EndFrame,
    BeginRenderPass { label: Option<String> },
    EndRenderPass,
    SetPipeline(RenderPipelineHandle),
    SetBindGroup { index: u32, bind_group: BindGroupHandle },
    SetVertexBuffer { slot: u32, buffer: BufferHandle, offset: u64 },
    Draw { vertices: Range<u32>, instances: Range<u32> },
}

struct DummyBuffer {
    usage: BufferUsage,
    data: Vec<u8>,
}

/// Dummy GPU backend.
#[derive(Default)]
pub struct DummyBackend {
    buffers: HashMap<u64, DummyBuffer>,
    bind_group_layouts: HashMap<u64, Vec<BindGroupLayoutEntry>>,
    bind_groups: HashMap<u64, Vec<(u32, BindGroupEntry)>>,
    pipelines: HashMap<u64, RenderPipelineDescriptor>,
    texture_views: HashMap<u64, (u32, u32, TextureFormat)>,
    next_id: u64,
    in_frame: bool,
    in_pass: bool,
    commands: Vec<DummyCommand>,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a color target view. Nothing is ever rendered into it.
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
        let id = self.allocate_id();
        self.texture_views.insert(id, (width, height, format));
        Ok(TextureViewHandle(id))
    }

    /// Every command recorded so far, in order.
    pub fn commands(&self) -> &[DummyCommand] {
        &self.commands
    }

    /// Forget the recorded commands (resources are kept).
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Current contents of a live buffer.
    pub fn buffer_contents(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer.0).map(|b| b.data.as_slice())
    }

    pub fn buffer_usage(&self, buffer: BufferHandle) -> Option<BufferUsage> {
        self.buffers.get(&buffer.0).map(|b| b.usage)
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn pipeline_descriptor(
        &self,
        pipeline: RenderPipelineHandle,
    ) -> Option<&RenderPipelineDescriptor> {
        self.pipelines.get(&pipeline.0)
    }

    pub fn bind_group_entries(&self, bind_group: BindGroupHandle) -> Option<&[(u32, BindGroupEntry)]> {
        self.bind_groups.get(&bind_group.0).map(Vec::as_slice)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn record_pass_command(&mut self, command: DummyCommand) {
        if !self.in_pass {
            log::warn!("DummyBackend: {:?} issued outside a render pass; ignored", command);
            return;
        }
        self.commands.push(command);
    }
}

impl GraphicsBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn create_buffer(&mut self, desc: &BufferDescriptor) -> BackendResult<BufferHandle> {
        log::trace!(
            "DummyBackend: creating buffer {:?} (size: {})",
            desc.label,
            desc.size
        );
        let size = usize::try_from(desc.size).map_err(|_| BackendError::OutOfMemory)?;
        let id = self.allocate_id();
        self.buffers.insert(
            id,
            DummyBuffer {
                usage: desc.usage,
                data: vec![0; size],
            },
        );
        let buffer = BufferHandle(id);
        self.commands.push(DummyCommand::CreateBuffer {
            buffer,
            size: desc.size,
        });
        Ok(buffer)
    }

    fn write_buffer(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> BackendResult<()> {
        let target = self
            .buffers
            .get_mut(&buffer.0)
            .ok_or_else(|| BackendError::InvalidHandle(format!("{buffer:?}")))?;

        let start = offset as usize;
        let end = start + data.len();
        if end > target.data.len() {
            return Err(BackendError::InvalidParameter(format!(
                "write of {} bytes at offset {} exceeds buffer size {}",
                data.len(),
                offset,
                target.data.len()
            )));
        }
        target.data[start..end].copy_from_slice(data);

        self.commands.push(DummyCommand::WriteBuffer {
            buffer,
            offset,
            size: data.len() as u64,
        });
        Ok(())
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        if self.buffers.remove(&buffer.0).is_some() {
            self.commands.push(DummyCommand::DestroyBuffer(buffer));
        }
    }

    fn create_bind_group_layout(
        &mut self,
        entries: &[BindGroupLayoutEntry],
    ) -> BackendResult<BindGroupLayoutHandle> {
        let id = self.allocate_id();
        self.bind_group_layouts.insert(id, entries.to_vec());
        Ok(BindGroupLayoutHandle(id))
    }

    fn create_bind_group(
        &mut self,
        layout: BindGroupLayoutHandle,
        entries: &[(u32, BindGroupEntry)],
    ) -> BackendResult<BindGroupHandle> {
        let layout_entries = self
            .bind_group_layouts
            .get(&layout.0)
            .ok_or_else(|| BackendError::InvalidHandle(format!("{layout:?}")))?;

        for (binding, entry) in entries {
            if !layout_entries.iter().any(|e| e.binding == *binding) {
                return Err(BackendError::InvalidParameter(format!(
                    "binding {binding} is not part of the layout"
                )));
            }
            let BindGroupEntry::Buffer { buffer, .. } = entry;
            if !self.buffers.contains_key(&buffer.0) {
                return Err(BackendError::InvalidHandle(format!("{buffer:?}")));
            }
        }

        let id = self.allocate_id();
        self.bind_groups.insert(id, entries.to_vec());
        Ok(BindGroupHandle(id))
    }

    fn create_render_pipeline(
        &mut self,
        desc: &RenderPipelineDescriptor,
    ) -> BackendResult<RenderPipelineHandle> {
        if let Some(missing) = desc
            .bind_group_layouts
            .iter()
            .find(|h| !self.bind_group_layouts.contains_key(&h.0))
        {
            return Err(BackendError::PipelineCreationFailed(format!(
                "unknown bind group layout {missing:?}"
            )));
        }
        log::trace!("DummyBackend: creating render pipeline {:?}", desc.label);
        let id = self.allocate_id();
        self.pipelines.insert(id, desc.clone());
        Ok(RenderPipelineHandle(id))
    }

    fn begin_frame(&mut self) -> BackendResult<()> {
        if self.in_frame {
            return Err(BackendError::InvalidParameter(
                "begin_frame called twice".into(),
            ));
        }
        self.in_frame = true;
        self.commands.push(DummyCommand::BeginFrame);
        Ok(())
    }

    fn end_frame(&mut self) -> BackendResult<()> {
        if !self.in_frame {
            return Err(BackendError::InvalidParameter(
                "end_frame without begin_frame".into(),
            ));
        }
        if self.in_pass {
            log::warn!("DummyBackend: frame ended inside an open render pass");
            self.in_pass = false;
        }
        self.in_frame = false;
        self.commands.push(DummyCommand::EndFrame);
        Ok(())
    }

    fn begin_render_pass(&mut self, desc: &RenderPassDescriptor) {
        if !self.in_frame {
            log::warn!("DummyBackend: render pass {:?} begun outside a frame", desc.label);
            return;
        }
        self.in_pass = true;
        self.commands.push(DummyCommand::BeginRenderPass {
            label: desc.label.clone(),
        });
    }

    fn end_render_pass(&mut self) {
        if self.in_pass {
            self.in_pass = false;
            self.commands.push(DummyCommand::EndRenderPass);
        }
    }

    fn set_render_pipeline(&mut self, pipeline: RenderPipelineHandle) {
        self.record_pass_command(DummyCommand::SetPipeline(pipeline));
    }

    fn set_bind_group(&mut self, index: u32, bind_group: BindGroupHandle) {
        self.record_pass_command(DummyCommand::SetBindGroup { index, bind_group });
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferHandle, offset: u64) {
        self.record_pass_command(DummyCommand::SetVertexBuffer {
            slot,
            buffer,
            offset,
        });
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        self.record_pass_command(DummyCommand::Draw {
            vertices,
            instances,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_write_roundtrip() {
        let mut backend = DummyBackend::new();
        let buffer = backend
            .create_buffer(&BufferDescriptor::new(8, BufferUsage::VERTEX | BufferUsage::COPY_DST))
            .unwrap();
        backend.write_buffer(buffer, 4, &[1, 2, 3, 4]).unwrap();
        assert_eq!(backend.buffer_contents(buffer), Some(&[0, 0, 0, 0, 1, 2, 3, 4][..]));
    }

    #[test]
    fn test_write_out_of_bounds_is_rejected() {
        let mut backend = DummyBackend::new();
        let buffer = backend
            .create_buffer(&BufferDescriptor::new(4, BufferUsage::COPY_DST))
            .unwrap();
        let err = backend.write_buffer(buffer, 2, &[0; 4]).unwrap_err();
        assert!(matches!(err, BackendError::InvalidParameter(_)));
    }

    #[test]
    fn test_destroyed_buffer_is_invalid() {
        let mut backend = DummyBackend::new();
        let buffer = backend
            .create_buffer(&BufferDescriptor::new(4, BufferUsage::COPY_DST))
            .unwrap();
        backend.destroy_buffer(buffer);
        assert_eq!(backend.live_buffer_count(), 0);
        assert!(matches!(
            backend.write_buffer(buffer, 0, &[0; 4]),
            Err(BackendError::InvalidHandle(_))
        ));
    }

    #[test]
    fn test_draw_outside_pass_is_ignored() {
        let mut backend = DummyBackend::new();
        backend.draw(0..3, 0..1);
        assert!(backend.commands().is_empty());

        backend.begin_frame().unwrap();
        backend.begin_render_pass(&RenderPassDescriptor {
            label: Some("lines".into()),
            color_attachments: Vec::new(),
        });
        backend.draw(0..3, 0..1);
        backend.end_render_pass();
        backend.end_frame().unwrap();

        assert_eq!(
            backend.commands(),
            &[
                DummyCommand::BeginFrame,
                DummyCommand::BeginRenderPass {
                    label: Some("lines".into())
                },
                DummyCommand::Draw {
                    vertices: 0..3,
                    instances: 0..1
                },
                DummyCommand::EndRenderPass,
                DummyCommand::EndFrame,
            ]
        );
    }

    #[test]
    fn test_frame_nesting_is_checked() {
        let mut backend = DummyBackend::new();
        assert!(backend.end_frame().is_err());
        backend.begin_frame().unwrap();
        assert!(backend.begin_frame().is_err());
    }
}
