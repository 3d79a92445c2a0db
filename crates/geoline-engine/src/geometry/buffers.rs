use super::{vertices_per_segment, LineVertex};

/// Axis-aligned bounds of a buffer set's positions (display CRS).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    fn from_point(p: [f32; 3]) -> Self {
        Self { min: p, max: p }
    }

    fn include(&mut self, p: [f32; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// GPU-ready line geometry: interleaved vertex records plus a triangle-list
/// index buffer.
///
/// Produced whole by [`build_line_buffers`](super::build_line_buffers) and
/// immutable afterwards; a rebuild produces a new set instead of editing this one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferSet {
    vertices: Vec<LineVertex>,
    indices: Vec<u32>,
    bounds: Option<Bounds>,
}

impl BufferSet {
    /// Empty set with room for `segments` expanded segments.
    pub(crate) fn with_segment_capacity(segments: usize) -> Self {
        let count = segments * vertices_per_segment();
        Self {
            vertices: Vec::with_capacity(count),
            indices: Vec::with_capacity(count),
            bounds: None,
        }
    }

    /// Appends one vertex with the next sequential index.
    #[inline]
    pub(crate) fn push(&mut self, vertex: LineVertex) {
        // Callers validate the total count against u32 before building.
        let index = self.vertices.len() as u32;
        match self.bounds.as_mut() {
            Some(b) => b.include(vertex.pos),
            None => self.bounds = Some(Bounds::from_point(vertex.pos)),
        }
        self.vertices.push(vertex);
        self.indices.push(index);
    }

    #[inline]
    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.vertices.len() / vertices_per_segment()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Bounds of all vertex positions; `None` for an empty set.
    #[inline]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Raw bytes of the vertex buffer.
    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes of the index buffer.
    #[inline]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
