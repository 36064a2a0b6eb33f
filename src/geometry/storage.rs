use super::vertex::{LineVertex, FLOATS_PER_VERTEX};

/// Default number of scalar slots allocated up front.
pub const DEFAULT_STORAGE_CAPACITY: usize = 2048;

/// Capacity-doubling scalar store backing the geometry builder.
///
/// The physical allocation (`capacity`) is tracked separately from the
/// meaningful prefix (`len`). [`reset`](Self::reset) only drops the valid
/// length, so a scene of stable size is rebuilt every frame without
/// reallocating.
#[derive(Debug, Clone)]
pub struct VertexStorage {
    // Always exactly `capacity` long; slots past `len` are stale.
    data: Vec<f32>,
    len: usize,
}

impl Default for VertexStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexStorage {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STORAGE_CAPACITY)
    }

    /// Create a store with `capacity` scalar slots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity.max(1)],
            len: 0,
        }
    }

    /// Append one vertex record, doubling the capacity as often as needed.
    #[inline]
    pub fn append(&mut self, vertex: LineVertex) {
        let start = self.len;
        let end = start + FLOATS_PER_VERTEX;
        self.ensure_capacity(end);
        self.data[start] = vertex.position[0];
        self.data[start + 1] = vertex.position[1];
        self.data[start + 2] = vertex.index;
        self.len = end;
    }

    /// Drop all valid content, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// The valid region as scalars.
    pub fn valid_slice(&self) -> &[f32] {
        &self.data[..self.len]
    }

    /// The valid region as vertex records.
    pub fn vertices(&self) -> &[LineVertex] {
        bytemuck::cast_slice(self.valid_slice())
    }

    /// The valid region as raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.valid_slice())
    }

    /// Valid length in scalars.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn vertex_count(&self) -> usize {
        self.len / FLOATS_PER_VERTEX
    }

    /// Allocated length in scalars.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn capacity_bytes(&self) -> u64 {
        (self.data.len() * std::mem::size_of::<f32>()) as u64
    }

    fn ensure_capacity(&mut self, target: usize) {
        let current = self.data.len();
        if target <= current {
            return;
        }
        let mut new_capacity = current;
        while new_capacity < target {
            new_capacity *= 2;
        }
        log::debug!(
            "Growing vertex storage from {} to {} scalars",
            current,
            new_capacity
        );
        self.data.resize(new_capacity, 0.0);
    }
}
