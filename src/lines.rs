//! Line collection
//!
//! An ordered list of polylines. Insertion order is draw order. Lines can
//! only be appended or cleared as a whole.

use glam::Vec2;
use rand::Rng;

/// An ordered sequence of 2D points. Fewer than two points draws nothing.
pub type Polyline = Vec<Vec2>;

/// Default per-axis offset range used by [`LineCollection::perturb`].
pub const DEFAULT_PERTURB_AMPLITUDE: f32 = 0.01;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineCollection {
    lines: Vec<Polyline>,
}

impl LineCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_line(&mut self, points: Polyline) {
        self.lines.push(points);
    }

    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[Polyline] {
        &self.lines
    }

    /// Mutable access to the points of every line.
    ///
    /// The slice itself cannot grow or shrink, so lines can be edited in
    /// place but not removed.
    pub fn lines_mut(&mut self) -> &mut [Polyline] {
        &mut self.lines
    }

    /// The most recently added line, e.g. the one still being drawn.
    pub fn last_line_mut(&mut self) -> Option<&mut Polyline> {
        self.lines.last_mut()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }

    /// Lines that actually produce geometry (two or more points).
    pub fn contributing(&self) -> impl Iterator<Item = &Polyline> + '_ {
        self.lines.iter().filter(|line| line.len() > 1)
    }

    /// Jitter every point by an independent offset in
    /// `[-amplitude / 2, amplitude / 2)` on each axis.
    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R, amplitude: f32) {
        for point in self.lines.iter_mut().flatten() {
            point.x += (rng.gen::<f32>() - 0.5) * amplitude;
            point.y += (rng.gen::<f32>() - 0.5) * amplitude;
        }
    }
}

impl From<Vec<Polyline>> for LineCollection {
    fn from(lines: Vec<Polyline>) -> Self {
        Self { lines }
    }
}
