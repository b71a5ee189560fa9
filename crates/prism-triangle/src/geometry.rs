//! CPU-side vertex and uniform layouts shared with `pass_through.wgsl`.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub const VERTICES: [Vertex; 3] = [
    Vertex { position: [1.0, -1.0, 0.0], color: [1.0, 0.0, 0.0] },
    Vertex { position: [-1.0, -1.0, 0.0], color: [0.0, 1.0, 0.0] },
    Vertex { position: [0.0, 1.0, 0.0], color: [0.0, 0.0, 1.0] },
];

/// Number of indices drawn.
pub const INDEX_COUNT: u32 = 3;

/// Triangle indices, padded with one unused entry so the buffer size is a
/// multiple of `wgpu::COPY_BUFFER_ALIGNMENT` (staging copies require it).
pub const INDICES: [u16; 4] = [0, 1, 2, 0];

/// Per-frame uniform block (`Transforms` in the shader).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Transforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
}

impl Default for Transforms {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_shader_locations() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }

    #[test]
    fn uploaded_sizes_respect_copy_alignment() {
        let vertex_bytes = std::mem::size_of_val(&VERTICES) as u64;
        let index_bytes = std::mem::size_of_val(&INDICES) as u64;
        assert_eq!(vertex_bytes % wgpu::COPY_BUFFER_ALIGNMENT, 0);
        assert_eq!(index_bytes % wgpu::COPY_BUFFER_ALIGNMENT, 0);
        assert!(INDEX_COUNT as usize <= INDICES.len());
    }

    #[test]
    fn transforms_block_is_three_column_major_matrices() {
        assert_eq!(std::mem::size_of::<Transforms>(), 3 * 64);

        let t = Transforms {
            model: Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0)),
            ..Transforms::default()
        };
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&t));
        // Translation lives in the last column of `model`.
        assert_eq!(&floats[32 + 12..32 + 15], &[1.0, 2.0, 3.0]);
    }
}
