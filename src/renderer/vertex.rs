//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in an upload buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    /// Byte offset of `color` within a vertex
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 2]>();
}

/// Colors for level elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.06, 0.06, 0.1, 1.0];
    pub const WALL: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const SPAWN: [f32; 4] = [0.2, 0.4, 0.3, 0.5];
    pub const CHECKPOINT: [f32; 4] = [0.3, 0.9, 0.5, 1.0];
    pub const KILL: [f32; 4] = [0.9, 0.2, 0.25, 1.0];
    pub const LEVEL_END: [f32; 4] = [0.9, 0.85, 0.3, 1.0]; // Gold/yellow
    pub const DECORATION: [f32; 4] = [0.35, 0.55, 0.3, 0.35];
    pub const BLOCK: [f32; 4] = [0.6, 0.45, 0.3, 1.0];
    pub const BLOCK_HELD: [f32; 4] = [0.85, 0.65, 0.4, 0.8];
    pub const BLOCK_WAITING: [f32; 4] = [0.7, 0.5, 0.35, 1.0];
    pub const BLOCK_RETURNING: [f32; 4] = [0.6, 0.45, 0.3, 0.5];
    pub const PLAYER: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const PLAYER_LEFT: [f32; 4] = [0.15, 0.7, 0.45, 1.0];
    pub const PLAYER_DASH: [f32; 4] = [0.4, 0.9, 1.0, 1.0];
    pub const PLAYER_EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GHOST: [f32; 4] = [0.4, 0.9, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 24);
        let v = Vertex::new(1.0, 2.0, [0.1, 0.2, 0.3, 0.4]);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), Vertex::STRIDE);
        let color: &[f32] = bytemuck::cast_slice(&bytes[Vertex::COLOR_OFFSET..]);
        assert_eq!(color, &[0.1f32, 0.2, 0.3, 0.4][..]);
    }
}
