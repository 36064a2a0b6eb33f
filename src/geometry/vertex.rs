use crate::backend::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Number of scalar fields in one packed vertex record.
pub const FLOATS_PER_VERTEX: usize = 3;

/// Size of one packed vertex record in bytes.
pub const VERTEX_STRIDE: u64 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;

/// A packed line vertex: world-space anchor + ordinal index.
///
/// The shader reads the same buffer through three strided views
/// (previous/current/next), so every record is read as one `vec3`.
/// The ordinal parity selects which rail of the ribbon the vertex is
/// pushed towards.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub index: f32,
}

impl LineVertex {
    #[inline]
    pub fn new(x: f32, y: f32, index: u32) -> Self {
        Self {
            position: [x, y],
            index: index as f32,
        }
    }

    /// Layout of one strided `vec3` view over the vertex buffer.
    pub fn pack_layout(location: u32) -> VertexBufferLayout {
        VertexBufferLayout {
            array_stride: VERTEX_STRIDE,
            step_mode: VertexStepMode::Vertex,
            attributes: vec![VertexAttribute {
                location,
                format: VertexFormat::Float32x3,
                offset: 0,
            }],
        }
    }
}
