//! Render data module
//!
//! Turns a `World` into colored world-space quads plus the camera's view
//! matrix. Nothing here feeds back into the simulation.

pub mod shapes;
pub mod vertex;

pub use vertex::Vertex;

use glam::{IVec2, Mat4, Vec2};

use crate::cell_to_world;
use crate::consts::TILE_SIZE;
use crate::sim::block::BlockState;
use crate::sim::state::World;
use crate::sim::tilemap::TileKind;
use shapes::{centered_square, rect, rect_outline, with_alpha};
use vertex::colors;

/// One frame of draw data, back to front
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub vertices: Vec<Vertex>,
    /// World -> screen pixels
    pub view: Mat4,
    pub clear_color: [f32; 4],
}

impl Frame {
    /// Raw bytes for a vertex buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

fn tile_color(kind: TileKind) -> Option<[f32; 4]> {
    match kind {
        TileKind::Empty => None,
        TileKind::Wall => Some(colors::WALL),
        TileKind::PlayerSpawn => Some(colors::SPAWN),
        TileKind::Checkpoint => Some(colors::CHECKPOINT),
        TileKind::KillBlock => Some(colors::KILL),
        TileKind::LevelEnd => Some(colors::LEVEL_END),
    }
}

fn block_color(state: &BlockState) -> [f32; 4] {
    match state {
        BlockState::Idle => colors::BLOCK,
        BlockState::Dragging => colors::BLOCK_HELD,
        BlockState::WaitBeforeReturn { .. } => colors::BLOCK_WAITING,
        BlockState::Returning { .. } => colors::BLOCK_RETURNING,
    }
}

/// Build the draw list for the current world state
pub fn build_frame(world: &World) -> Frame {
    let mut out = Vec::new();

    // Tiles (only the cells on screen)
    let (min, max) = world.camera.visible_world_rect();
    if let Some((lo, hi)) = world.tilemap.cells_in_rect(min, max) {
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                if let Some(color) = tile_color(world.tilemap.get_tile(x, y)) {
                    let pos = cell_to_world(IVec2::new(x, y));
                    rect(&mut out, pos, Vec2::splat(TILE_SIZE), color);
                }
            }
        }
        // Decorations are textured elsewhere; here they get a placeholder tint
        for (cell, _) in world.tilemap.decorations() {
            if cell.cmpge(lo).all() && cell.cmple(hi).all() {
                rect(&mut out, cell_to_world(cell), Vec2::splat(TILE_SIZE), colors::DECORATION);
            }
        }
    }

    // Blocks
    for (_, block) in world.blocks.iter() {
        let color = block_color(&block.state);
        rect(&mut out, block.pos, block.size, color);
        if block.state == BlockState::Dragging {
            rect_outline(&mut out, block.pos, block.size, 2.0, colors::PLAYER_EYE);
        }
    }

    // Dash afterimages
    let player = &world.player;
    if world.settings.ghost_trails {
        for ghost in &player.ghosts {
            rect(&mut out, ghost.pos, player.size, with_alpha(colors::GHOST, ghost.alpha));
        }
    }

    // Player, squished around the feet
    let scaled = player.size * player.render_scale;
    let feet = Vec2::new(player.pos.x + player.size.x * 0.5, player.pos.y + player.size.y);
    let body = Vec2::new(feet.x - scaled.x * 0.5, feet.y - scaled.y);
    let body_color = if player.is_dashing() {
        colors::PLAYER_DASH
    } else if player.facing < 0.0 {
        colors::PLAYER_LEFT
    } else {
        colors::PLAYER
    };
    rect(&mut out, body, scaled, body_color);
    let eye = Vec2::new(
        body.x + scaled.x * (0.5 + 0.25 * player.facing),
        body.y + scaled.y * 0.3,
    );
    centered_square(&mut out, eye, scaled.x * 0.2, colors::PLAYER_EYE);

    // Particles
    for p in world.particles.particles() {
        centered_square(&mut out, p.pos, p.size, with_alpha(p.color, p.life_fraction()));
    }

    Frame {
        vertices: out,
        view: world.camera.view_matrix(),
        clear_color: colors::BACKGROUND,
    }
}
