//! Streamline container and pathway-length metrics

use glam::Vec3;

/// One traced fiber pathway: an ordered sequence of 3-D points plus the
/// metadata downstream statistics need.
///
/// The point storage is owned by composition rather than exposed wholesale;
/// callers get the small mutation surface the toolkit actually uses
/// (append, insert, clear) plus read access as a slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    points: Vec<Vec3>,

    /// Index into the owning collection; -1 until one assigns it.
    pub index: i64,

    /// Per-streamline weight used by downstream statistics. Expected
    /// positive, not enforced here.
    pub weight: f32,
}

/// Sentinel for a streamline not yet owned by a collection.
pub const UNASSIGNED: i64 = -1;

impl Default for Streamline {
    fn default() -> Self {
        Self::new()
    }
}

impl Streamline {
    /// Create an empty streamline with default metadata.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            index: UNASSIGNED,
            weight: 1.0,
        }
    }

    /// Create an empty streamline with room for `capacity` points, for
    /// tracking loops that know their maximum length up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            index: UNASSIGNED,
            weight: 1.0,
        }
    }

    /// Create a streamline of `len` copies of `fill`, for readers that
    /// overwrite points in place.
    pub fn filled(len: usize, fill: Vec3) -> Self {
        Self {
            points: vec![fill; len],
            index: UNASSIGNED,
            weight: 1.0,
        }
    }

    /// Append a point at the end of the pathway.
    pub fn push(&mut self, point: Vec3) {
        self.points.push(point);
    }

    /// Insert a point at `index`, shifting later points back.
    pub fn insert(&mut self, index: usize, point: Vec3) {
        self.points.insert(index, point);
    }

    /// Drop all points past the first `len`, keeping metadata.
    pub fn truncate(&mut self, len: usize) {
        self.points.truncate(len);
    }

    /// Empty the point sequence and reset `index`/`weight` to defaults,
    /// keeping the allocation for pool-style reuse.
    pub fn clear(&mut self) {
        self.points.clear();
        self.index = UNASSIGNED;
        self.weight = 1.0;
    }

    /// Move the contents out, leaving `self` empty with default metadata,
    /// valid and reusable.
    pub fn take(&mut self) -> Streamline {
        std::mem::take(self)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The pathway in traversal order.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Vec3] {
        &mut self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec3> {
        self.points.iter()
    }

    /// Raw little-endian f32 triplet view of the points, for direct
    /// vertex-buffer upload by the visualization layer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }

    /// Exact or approximate pathway length.
    ///
    /// Up to three points this is the exact sum of segment lengths (and
    /// NaN for an empty streamline, which has no defined length). For four
    /// or more points the step size is estimated once from the two points
    /// straddling the midpoint and the approximate formula of
    /// [`length_with_step`](Self::length_with_step) is used; callers that
    /// know the true step size should call that form directly.
    pub fn length(&self) -> f32 {
        if self.points.len() < 4 {
            return self.short_length();
        }
        let mid = self.points.len() / 2;
        let step_size = self.points[mid - 1].distance(self.points[mid]);
        self.length_with_step(step_size)
    }

    /// Approximate pathway length assuming uniform spacing of `step_size`
    /// across the interior: exact on the two end segments, `step_size`
    /// for each of the N-3 interior segments.
    ///
    /// The error grows with irregular spacing; consumers depend on this
    /// specific approximation, so it is kept as-is.
    pub fn length_with_step(&self, step_size: f32) -> f32 {
        let n = self.points.len();
        if n < 4 {
            return self.short_length();
        }
        step_size * (n - 3) as f32
            + self.points[0].distance(self.points[1])
            + self.points[n - 2].distance(self.points[n - 1])
    }

    fn short_length(&self) -> f32 {
        match self.points.as_slice() {
            [] => f32::NAN,
            [_] => 0.0,
            [a, b] => a.distance(*b),
            [a, b, c] => a.distance(*b) + b.distance(*c),
            _ => unreachable!("short_length called with 4+ points"),
        }
    }
}

impl From<Vec<Vec3>> for Streamline {
    /// Adopt an existing point buffer with default metadata.
    fn from(points: Vec<Vec3>) -> Self {
        Self {
            points,
            index: UNASSIGNED,
            weight: 1.0,
        }
    }
}

impl Extend<Vec3> for Streamline {
    fn extend<I: IntoIterator<Item = Vec3>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl std::ops::Index<usize> for Streamline {
    type Output = Vec3;

    fn index(&self, index: usize) -> &Vec3 {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a Streamline {
    type Item = &'a Vec3;
    type IntoIter = std::slice::Iter<'a, Vec3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl IntoIterator for Streamline {
    type Item = Vec3;
    type IntoIter = std::vec::IntoIter<Vec3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}
