//! Render collaborator seam: the core spawns, moves and destroys visuals through `Visuals`
//! and maps grid cells to world space through `Layout`.

use crate::piece::{GridPos, PuyoColor};
use std::collections::BTreeMap;

/// Opaque id of one on-screen piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Affine grid -> world mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_size: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            cell_size: 1.0,
        }
    }
}

impl Layout {
    pub fn grid_to_world(&self, pos: GridPos) -> WorldPos {
        WorldPos {
            x: self.origin_x + self.cell_size * pos.x as f32,
            y: self.origin_y + self.cell_size * pos.y as f32,
            z: 0.0,
        }
    }

    /// Nearest cell to a world position.
    pub fn world_to_grid(&self, world: WorldPos) -> GridPos {
        GridPos::new(
            ((world.x - self.origin_x) / self.cell_size).round() as i32,
            ((world.y - self.origin_y) / self.cell_size).round() as i32,
        )
    }
}

/// What the core needs from whoever draws pieces.
pub trait Visuals {
    fn spawn_visual(&mut self, color: PuyoColor, world: WorldPos) -> VisualHandle;
    fn update_visual(&mut self, handle: VisualHandle, world: WorldPos);
    fn destroy_visual(&mut self, handle: VisualHandle);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub color: PuyoColor,
    pub world: WorldPos,
}

/// In-memory visuals, drawn by the terminal UI.
#[derive(Debug, Default)]
pub struct VisualStore {
    next_id: u64,
    visuals: BTreeMap<VisualHandle, Visual>,
}

impl VisualStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&Visual> {
        self.visuals.get(&handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VisualHandle, &Visual)> {
        self.visuals.iter().map(|(h, v)| (*h, v))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }
}

impl Visuals for VisualStore {
    fn spawn_visual(&mut self, color: PuyoColor, world: WorldPos) -> VisualHandle {
        let handle = VisualHandle(self.next_id);
        self.next_id += 1;
        self.visuals.insert(handle, Visual { color, world });
        handle
    }

    fn update_visual(&mut self, handle: VisualHandle, world: WorldPos) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.world = world;
        } else {
            log::warn!("update for unknown visual {:?}", handle);
        }
    }

    fn destroy_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_none() {
            log::warn!("destroy for unknown visual {:?}", handle);
        }
    }
}
