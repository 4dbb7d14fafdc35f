//! Per-object instance data for the renderer

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::consts::OBJECT_CELL_SCALE;
use crate::sim::GameObject;

/// One sprite to draw, laid out for direct upload to an instance buffer.
///
/// Positions are in cell units; the renderer multiplies by its cell size and
/// subtracts the camera.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Owning cell (center)
    pub cell: [f32; 2],
    /// Atlas cutout origin (normalized)
    pub uv_origin: [f32; 2],
    /// Atlas cutout size (normalized)
    pub uv_size: [f32; 2],
    /// Drawn size relative to one cell
    pub scale: f32,
}

impl SpriteInstance {
    pub const FLOATS: usize = 7;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_object(object: &GameObject) -> Self {
        let cutout = object.cutout();
        Self {
            cell: object.cell.as_vec2().to_array(),
            uv_origin: cutout.origin.to_array(),
            uv_size: cutout.size.to_array(),
            scale: OBJECT_CELL_SCALE * object.size(),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::from_array(self.cell)
    }
}
