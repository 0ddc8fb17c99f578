//! The one vertex format the triangle pipeline consumes

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::color::Rgba;

/// Coloured corner of a tessellated triangle, in canvas pixels until
/// `to_clip` maps it for the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn at(p: Vec2, color: Rgba) -> Self {
        Self {
            position: p.to_array(),
            color: color.0,
        }
    }

    /// Pixel space (y down) on a `width` x `height` canvas to NDC (y up)
    pub fn to_clip(self, width: f32, height: f32) -> Self {
        let [x, y] = self.position;
        Self {
            position: [x / width * 2.0 - 1.0, 1.0 - y / height * 2.0],
            ..self
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_mapping_corners() {
        let corner = |x, y| Vertex::at(Vec2::new(x, y), Rgba::WHITE).to_clip(800.0, 600.0).position;
        assert_eq!(corner(0.0, 0.0), [-1.0, 1.0]);
        assert_eq!(corner(800.0, 600.0), [1.0, -1.0]);
        assert_eq!(corner(400.0, 300.0), [0.0, 0.0]);
    }

    #[test]
    fn test_clip_mapping_keeps_colour() {
        let v = Vertex::at(Vec2::new(10.0, 20.0), Rgba::hex(0xff0000));
        assert_eq!(v.to_clip(100.0, 100.0).color, [1.0, 0.0, 0.0, 1.0]);
    }
}
