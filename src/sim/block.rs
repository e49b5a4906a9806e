//! Draggable blocks and the arena that owns them
//!
//! A block cycles `Idle -> Dragging -> WaitBeforeReturn -> Returning -> Idle`.
//! It is solid while resting (`Idle`, `WaitBeforeReturn`) and passable while
//! moving (`Dragging`, `Returning`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::{BLOCK_RETURN_TICKS, BLOCK_WAIT_TICKS};
use crate::smoothstep;

/// Block state; each variant carries only the data valid in it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BlockState {
    #[default]
    Idle,
    /// Center follows the pointer
    Dragging,
    /// Released, holding position before heading home
    WaitBeforeReturn { ticks_left: u32 },
    /// Easing from `start` back to the origin
    Returning { start: Vec2, elapsed_ticks: u32 },
}

impl BlockState {
    pub fn is_solid(&self) -> bool {
        matches!(self, BlockState::Idle | BlockState::WaitBeforeReturn { .. })
    }
}

/// What happened to a block during one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTransition {
    Grabbed,
    Released,
    StartedReturn,
    Returned,
}

/// Pointer state handed to blocks each tick (world space)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    pub world_pos: Vec2,
    /// Interact went down this tick
    pub pressed: bool,
    /// Interact is held
    pub held: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraggableBlock {
    pub pos: Vec2,
    /// Rest location; fixed for the block's lifetime
    origin: Vec2,
    pub size: Vec2,
    pub state: BlockState,
}

impl DraggableBlock {
    /// A resting block whose origin is its placement position
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            origin: pos,
            size,
            state: BlockState::Idle,
        }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn is_solid(&self) -> bool {
        self.state.is_solid()
    }

    /// Advance one tick
    pub fn update(&mut self, pointer: &PointerInput) -> Option<BlockTransition> {
        match self.state {
            BlockState::Idle => {
                if pointer.pressed && self.bounds().contains_point(pointer.world_pos) {
                    self.state = BlockState::Dragging;
                    self.pos = pointer.world_pos - self.size * 0.5;
                    return Some(BlockTransition::Grabbed);
                }
                None
            }
            BlockState::Dragging => {
                if pointer.held {
                    self.pos = pointer.world_pos - self.size * 0.5;
                    None
                } else {
                    self.state = BlockState::WaitBeforeReturn {
                        ticks_left: BLOCK_WAIT_TICKS,
                    };
                    Some(BlockTransition::Released)
                }
            }
            BlockState::WaitBeforeReturn { ticks_left } => {
                let ticks_left = ticks_left.saturating_sub(1);
                if ticks_left == 0 {
                    self.state = BlockState::Returning {
                        start: self.pos,
                        elapsed_ticks: 0,
                    };
                    Some(BlockTransition::StartedReturn)
                } else {
                    self.state = BlockState::WaitBeforeReturn { ticks_left };
                    None
                }
            }
            BlockState::Returning {
                start,
                elapsed_ticks,
            } => {
                let elapsed_ticks = elapsed_ticks + 1;
                if elapsed_ticks >= BLOCK_RETURN_TICKS {
                    self.pos = self.origin;
                    self.state = BlockState::Idle;
                    Some(BlockTransition::Returned)
                } else {
                    let t = elapsed_ticks as f32 / BLOCK_RETURN_TICKS as f32;
                    self.pos = start.lerp(self.origin, smoothstep(t));
                    self.state = BlockState::Returning {
                        start,
                        elapsed_ticks,
                    };
                    None
                }
            }
        }
    }
}

/// Stable handle into a [`BlockArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owns every draggable block; removal leaves a hole so other ids stay valid
#[derive(Debug, Clone, Default)]
pub struct BlockArena {
    slots: Vec<Option<DraggableBlock>>,
}

impl BlockArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block: DraggableBlock) -> BlockId {
        let id = BlockId(self.slots.len() as u32);
        self.slots.push(Some(block));
        id
    }

    pub fn remove(&mut self, id: BlockId) -> Option<DraggableBlock> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    pub fn get(&self, id: BlockId) -> Option<&DraggableBlock> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut DraggableBlock> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Live blocks in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &DraggableBlock)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|b| (BlockId(i as u32), b)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BlockId, &mut DraggableBlock)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|b| (BlockId(i as u32), b)))
    }

    /// Bounds of every block that currently blocks movement, in insertion order
    pub fn solid_bounds(&self) -> Vec<Aabb> {
        self.iter()
            .filter(|(_, b)| b.is_solid())
            .map(|(_, b)| b.bounds())
            .collect()
    }

    /// Advance every block one tick
    pub fn update(&mut self, pointer: &PointerInput) -> Vec<(BlockId, BlockTransition)> {
        let mut transitions = Vec::new();
        for (id, block) in self.iter_mut() {
            if let Some(transition) = block.update(pointer) {
                log::debug!("block {:?}: {:?} -> {:?}", id, transition, block.state);
                transitions.push((id, transition));
            }
        }
        transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(at: Vec2) -> PointerInput {
        PointerInput {
            world_pos: at,
            pressed: true,
            held: true,
        }
    }

    fn hold(at: Vec2) -> PointerInput {
        PointerInput {
            world_pos: at,
            pressed: false,
            held: true,
        }
    }

    fn release(at: Vec2) -> PointerInput {
        PointerInput {
            world_pos: at,
            pressed: false,
            held: false,
        }
    }

    #[test]
    fn test_press_outside_does_nothing() {
        let mut block = DraggableBlock::new(Vec2::new(40.0, 40.0), Vec2::splat(40.0));
        assert_eq!(block.update(&press(Vec2::new(80.0, 60.0))), None);
        assert_eq!(block.state, BlockState::Idle);
    }

    #[test]
    fn test_holding_without_press_edge_does_not_grab() {
        let mut block = DraggableBlock::new(Vec2::new(40.0, 40.0), Vec2::splat(40.0));
        assert_eq!(block.update(&hold(Vec2::new(60.0, 60.0))), None);
        assert_eq!(block.state, BlockState::Idle);
    }

    #[test]
    fn test_dragging_centers_on_pointer() {
        let mut block = DraggableBlock::new(Vec2::new(40.0, 40.0), Vec2::splat(40.0));
        block.update(&press(Vec2::new(50.0, 50.0)));
        assert_eq!(block.state, BlockState::Dragging);
        block.update(&hold(Vec2::new(300.0, 200.0)));
        assert_eq!(block.pos, Vec2::new(280.0, 180.0));
        assert!(!block.is_solid());
    }

    #[test]
    fn test_full_cycle_returns_to_origin() {
        let origin = Vec2::new(40.0, 40.0);
        let mut block = DraggableBlock::new(origin, Vec2::splat(40.0));

        assert_eq!(block.update(&press(Vec2::new(60.0, 60.0))), Some(BlockTransition::Grabbed));
        assert!(!block.is_solid());
        block.update(&hold(Vec2::new(400.0, 300.0)));
        assert_eq!(block.update(&release(Vec2::new(400.0, 300.0))), Some(BlockTransition::Released));
        let dropped = block.pos;

        // Waits 0.5s in place while solid
        for _ in 0..BLOCK_WAIT_TICKS - 1 {
            assert_eq!(block.update(&release(Vec2::ZERO)), None);
            assert!(block.is_solid());
            assert_eq!(block.pos, dropped);
        }
        assert_eq!(block.update(&release(Vec2::ZERO)), Some(BlockTransition::StartedReturn));
        assert!(!block.is_solid());

        // Eases home over 0.5s
        let mut last_dist = dropped.distance(origin);
        for _ in 0..BLOCK_RETURN_TICKS - 1 {
            assert_eq!(block.update(&release(Vec2::ZERO)), None);
            assert!(!block.is_solid());
            let dist = block.pos.distance(origin);
            assert!(dist < last_dist);
            last_dist = dist;
        }
        assert_eq!(block.update(&release(Vec2::ZERO)), Some(BlockTransition::Returned));
        assert_eq!(block.pos, origin);
        assert_eq!(block.state, BlockState::Idle);
        assert!(block.is_solid());
    }

    #[test]
    fn test_return_follows_smoothstep() {
        let origin = Vec2::ZERO;
        let mut block = DraggableBlock::new(origin, Vec2::splat(40.0));
        block.pos = Vec2::new(300.0, 0.0);
        block.state = BlockState::Returning {
            start: block.pos,
            elapsed_ticks: 0,
        };
        for _ in 0..BLOCK_RETURN_TICKS / 2 {
            block.update(&release(Vec2::ZERO));
        }
        // Halfway in time is halfway in distance for a symmetric ease
        assert!((block.pos.x - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_arena_handles_survive_removal() {
        let mut arena = BlockArena::new();
        let a = arena.insert(DraggableBlock::new(Vec2::ZERO, Vec2::splat(40.0)));
        let b = arena.insert(DraggableBlock::new(Vec2::new(80.0, 0.0), Vec2::splat(40.0)));
        assert_eq!(arena.len(), 2);

        assert!(arena.remove(a).is_some());
        assert!(arena.remove(a).is_none());
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get(b).map(|blk| blk.pos), Some(Vec2::new(80.0, 0.0)));
        assert_eq!(arena.solid_bounds().len(), 1);
    }

    #[test]
    fn test_arena_solid_bounds_skip_dragged() {
        let mut arena = BlockArena::new();
        let id = arena.insert(DraggableBlock::new(Vec2::ZERO, Vec2::splat(40.0)));
        arena.insert(DraggableBlock::new(Vec2::new(80.0, 0.0), Vec2::splat(40.0)));

        let transitions = arena.update(&press(Vec2::new(20.0, 20.0)));
        assert_eq!(transitions, vec![(id, BlockTransition::Grabbed)]);
        let solids = arena.solid_bounds();
        assert_eq!(solids.len(), 1);
        assert_eq!(solids[0].pos, Vec2::new(80.0, 0.0));
    }
}
