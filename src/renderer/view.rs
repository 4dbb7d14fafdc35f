//! Read-only per-frame snapshot for the renderer
//!
//! Built from shared borrows of the game state; nothing here can mutate the
//! simulation.

use glam::{IVec2, Vec2};
use num_bigint::BigUint;

use super::instance::SpriteInstance;
use crate::sim::{Color, GameState, ObjectId, ObjectKind};

/// Player attributes the renderer draws
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub target: IVec2,
    pub angle: f32,
    pub failed: bool,
    /// Raw value; formatting happens outside the core
    pub currency: BigUint,
    pub misses: u64,
    pub orbit_index: u8,
    pub palette: Vec<Color>,
    pub center_color: Color,
    pub moving_color: Color,
}

/// One live object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectView {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub asset_key: &'static str,
    pub instance: SpriteInstance,
}

/// Render flags of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellView {
    pub visible: bool,
    pub reached: bool,
    pub texture_offset: Vec2,
}

impl Default for CellView {
    /// A cell nobody has looked up yet
    fn default() -> Self {
        Self {
            visible: true,
            reached: false,
            texture_offset: Vec2::ZERO,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub player: PlayerView,
    /// Live objects in ID order
    pub objects: Vec<ObjectView>,
}

impl FrameView {
    pub fn build(state: &GameState) -> Self {
        let player = &state.player;
        let tempo = player.tempo;
        Self {
            player: PlayerView {
                target: player.target,
                angle: player.angle,
                failed: player.is_failed(),
                currency: player.currency.clone(),
                misses: player.misses,
                orbit_index: player.orbit_index,
                palette: player.palette.clone(),
                center_color: player.center_color(),
                moving_color: player.moving_color(),
            },
            objects: state
                .world
                .objects()
                .map(|object| ObjectView {
                    id: object.id,
                    kind: object.kind,
                    asset_key: object.asset_key(tempo),
                    instance: SpriteInstance::from_object(object),
                })
                .collect(),
        }
    }

    /// Instance data ready for upload
    pub fn instances(&self) -> Vec<SpriteInstance> {
        self.objects.iter().map(|o| o.instance).collect()
    }
}

/// Render flags of the cell at `coord` without creating it
pub fn cell_view(state: &GameState, coord: IVec2) -> CellView {
    state
        .world
        .grid()
        .get(coord)
        .map(|grid| CellView {
            visible: grid.is_visible(),
            reached: grid.is_reached(),
            texture_offset: grid.texture_offset(),
        })
        .unwrap_or_default()
}
