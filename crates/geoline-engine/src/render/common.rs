//! Shared GPU state descriptions for line rendering.

use super::LineUniforms;

/// Straight (non-premultiplied) alpha: the fragment stage emits
/// `(stroke_color, stroke_opacity)` as is.
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// Returns the `wgpu` minimum binding size for the line uniform buffer.
pub(super) fn line_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<LineUniforms>() as u64)
        .expect("LineUniforms has non-zero size by construction")
}

/// Allocation size for a dynamic buffer holding `len` bytes.
///
/// Rounded up to a power of two so growing data usually still fits.
pub(super) fn dynamic_capacity(len: u64) -> u64 {
    len.next_power_of_two().max(256)
}
