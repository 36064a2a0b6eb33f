use glam::Vec2;

use super::storage::VertexStorage;
use super::vertex::LineVertex;
use crate::lines::Polyline;

/// Vertices that anchor the strip but are never drawn themselves: the
/// first two records are only read as "previous" and the last two only
/// as "next".
pub const ANCHOR_VERTICES: usize = 4;

/// How the builder decides whether a polyline needs an entry/exit
/// degenerate vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StitchPolicy {
    /// First/last is decided among polylines with at least two points.
    /// Degenerate polylines never cause a missing or dangling stitch.
    #[default]
    ContributingLines,
    /// First/last is decided by raw position in the collection, degenerate
    /// polylines included. A leading or trailing single-point polyline
    /// leaves an extra stitch vertex at the buffer boundary.
    CollectionPosition,
}

/// Walks a line collection and emits the triangle-strip vertex records.
///
/// Every polyline with `n >= 2` points produces, in order:
/// - one entry degenerate (index 0) unless it is the first polyline,
/// - two start vertices at the first point (indices 0, 1),
/// - two vertices per point (indices `2p`, `2p + 1`),
/// - two close vertices repeating the last pair,
/// - one exit degenerate (last index) unless it is the last polyline.
#[derive(Debug, Clone)]
pub struct GeometryBuilder {
    storage: VertexStorage,
    policy: StitchPolicy,
}

impl GeometryBuilder {
    pub fn new(policy: StitchPolicy) -> Self {
        Self {
            storage: VertexStorage::new(),
            policy,
        }
    }

    /// Create a builder whose storage starts with `capacity` scalar slots.
    pub fn with_capacity(policy: StitchPolicy, capacity: usize) -> Self {
        Self {
            storage: VertexStorage::with_capacity(capacity),
            policy,
        }
    }

    pub fn policy(&self) -> StitchPolicy {
        self.policy
    }

    pub fn storage(&self) -> &VertexStorage {
        &self.storage
    }

    /// Clear the storage and refill it from `lines`.
    ///
    /// Returns the number of valid vertex records.
    pub fn rebuild(&mut self, lines: &[Polyline]) -> usize {
        self.storage.reset();

        let contributing = lines.iter().filter(|line| line.len() > 1).count();
        let mut emitted = 0;

        for (position, line) in lines.iter().enumerate() {
            // a single dot isn't a line
            if line.len() < 2 {
                continue;
            }

            let (is_first, is_last) = match self.policy {
                StitchPolicy::ContributingLines => (emitted == 0, emitted + 1 == contributing),
                StitchPolicy::CollectionPosition => (position == 0, position + 1 == lines.len()),
            };

            self.emit_line(line, !is_first, !is_last);
            emitted += 1;
        }

        log::trace!(
            "Rebuilt line geometry: {} of {} lines, {} vertices",
            emitted,
            lines.len(),
            self.storage.vertex_count()
        );

        self.storage.vertex_count()
    }

    pub fn vertex_count(&self) -> usize {
        self.storage.vertex_count()
    }

    /// Number of vertices the triangle strip draw covers, 0 if nothing to draw.
    pub fn drawable_vertex_count(&self) -> usize {
        self.storage.vertex_count().saturating_sub(ANCHOR_VERTICES)
    }

    fn emit_line(&mut self, line: &[Vec2], entry_degenerate: bool, exit_degenerate: bool) {
        let (Some(&first), Some(&last)) = (line.first(), line.last()) else {
            return;
        };

        if entry_degenerate {
            self.push(first, 0);
        }

        // start pair
        self.push(first, 0);
        self.push(first, 1);

        let mut index = 0;
        for &point in line {
            self.push(point, index);
            self.push(point, index + 1);
            index += 2;
        }

        // close pair repeats the last rails
        self.push(last, index - 2);
        self.push(last, index - 1);

        if exit_degenerate {
            self.push(last, index - 1);
        }
    }

    #[inline]
    fn push(&mut self, point: Vec2, index: u32) {
        self.storage.append(LineVertex::new(point.x, point.y, index));
    }
}

impl Default for GeometryBuilder {
    fn default() -> Self {
        Self::new(StitchPolicy::default())
    }
}
