//! Combo detection: same-colour flood fill from the landed cell, and the clear pass.

use crate::grid::{Grid, GridError};
use crate::piece::{GridPos, Piece, PuyoColor};

/// Group size that gets cleared when no threshold is configured.
pub const DEFAULT_COMBO_THRESHOLD: usize = 4;

/// Connected same-colour cells reached from one seed, in visit order (seed first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combo {
    pub color: PuyoColor,
    pub cells: Vec<GridPos>,
}

impl Combo {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Result of resolving one landing.
#[derive(Debug, PartialEq, Eq)]
pub enum ComboOutcome {
    /// Group met the threshold; these pieces left the grid.
    Cleared(Vec<Piece>),
    /// Group too small; grid untouched.
    Kept { size: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct ComboDetector {
    threshold: usize,
}

impl Default for ComboDetector {
    fn default() -> Self {
        Self::new(DEFAULT_COMBO_THRESHOLD)
    }
}

impl ComboDetector {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Depth-first fill over 4-adjacent cells holding `color`, starting at `seed`.
    /// Uses an explicit stack so deep regions cannot overflow the call stack.
    pub fn scan(&self, grid: &mut Grid, seed: GridPos, color: PuyoColor) -> Combo {
        grid.visited_mut().reset();
        let mut cells = Vec::new();
        let mut stack = vec![seed];

        while let Some(pos) = stack.pop() {
            let same_color = matches!(
                grid.get(pos.x, pos.y),
                Ok(Some(piece)) if piece.color() == color
            );
            if !same_color || grid.visited().is_marked(pos) {
                continue;
            }
            grid.visited_mut().mark(pos);
            cells.push(pos);
            // Reversed so the first neighbour is explored first.
            stack.extend(pos.neighbours().into_iter().rev());
        }

        debug_assert_eq!(cells.len(), grid.visited().count());
        Combo { color, cells }
    }

    /// Removes the whole group if it is at least `threshold` cells.
    pub fn resolve(&self, grid: &mut Grid, combo: &Combo) -> Result<ComboOutcome, GridError> {
        let size = combo.len();
        if size < self.threshold {
            return Ok(ComboOutcome::Kept { size });
        }
        let mut removed = Vec::with_capacity(size);
        for pos in &combo.cells {
            if let Some(piece) = grid.remove(pos.x, pos.y)? {
                removed.push(piece);
            }
        }
        Ok(ComboOutcome::Cleared(removed))
    }
}
