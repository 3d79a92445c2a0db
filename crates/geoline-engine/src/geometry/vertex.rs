use bytemuck::{Pod, Zeroable};

/// One expanded line vertex as uploaded to the GPU.
///
/// `prev` equals `pos` at the first point of a polyline and `next` equals `pos`
/// at the last one, so a missing neighbor yields a zero-length delta.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 3],
    pub prev: [f32; 3],
    pub next: [f32; 3],
    /// Side of the line, `+1` or `-1`.
    pub offset: f32,
    /// Stroke width in pixels.
    pub stroke_width: f32,
    pub stroke_color: [f32; 3],
    /// Negative means hidden.
    pub stroke_opacity: f32,
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x3, // prev
        2 => Float32x3, // next
        3 => Float32,   // offset
        4 => Float32,   // stroke_width
        5 => Float32x3, // stroke_color
        6 => Float32    // stroke_opacity
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<LineVertex>(), 15 * 4);
        let layout = LineVertex::layout();
        assert_eq!(layout.array_stride, 60);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 36, 40, 44, 56]);
    }
}
