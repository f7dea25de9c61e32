//! Grid store: fixed-size occupancy map of landed pieces, plus the visited map used by combo scans.

use crate::piece::{GridPos, Piece};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    /// The rejected piece is handed back to the caller.
    #[error("cell ({x}, {y}) is already occupied")]
    OccupiedCell { x: i32, y: i32, piece: Piece },
}

/// Per-cell "already scanned" flags. Reset at the start of every combo scan.
#[derive(Debug, Clone)]
pub struct VisitedMap {
    width: usize,
    height: usize,
    marks: Vec<bool>,
}

impl VisitedMap {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            marks: vec![false; width * height],
        }
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        in_bounds.then(|| pos.y as usize * self.width + pos.x as usize)
    }

    pub fn reset(&mut self) {
        self.marks.fill(false);
    }

    /// Marks `pos`; returns false if it was already marked or is out of bounds.
    pub fn mark(&mut self, pos: GridPos) -> bool {
        match self.index(pos) {
            Some(i) if !self.marks[i] => {
                self.marks[i] = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_marked(&self, pos: GridPos) -> bool {
        self.index(pos).is_some_and(|i| self.marks[i])
    }

    /// Number of distinct marked cells.
    pub fn count(&self) -> usize {
        self.marks.iter().filter(|&&m| m).count()
    }
}

/// W x H cells, stored row-major with row 0 at the floor.
#[derive(Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Piece>>,
    visited: VisitedMap,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: (0..width * height).map(|_| None).collect(),
            visited: VisitedMap::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, GridError> {
        if !self.is_in_bounds(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Result<Option<&Piece>, GridError> {
        let i = self.index(x, y)?;
        Ok(self.cells[i].as_ref())
    }

    /// True only for an in-bounds cell holding a piece.
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        matches!(self.get(pos.x, pos.y), Ok(Some(_)))
    }

    /// Writes `piece` into the cell at its own position.
    pub fn place(&mut self, piece: Piece) -> Result<(), GridError> {
        let GridPos { x, y } = piece.position();
        let i = self.index(x, y)?;
        let cell = &mut self.cells[i];
        if cell.is_some() {
            return Err(GridError::OccupiedCell { x, y, piece });
        }
        *cell = Some(piece);
        Ok(())
    }

    /// Empties the cell and returns its piece. Removing from an empty cell is a no-op.
    pub fn remove(&mut self, x: i32, y: i32) -> Result<Option<Piece>, GridError> {
        let i = self.index(x, y)?;
        Ok(self.cells[i].take())
    }

    /// Landed pieces in row-major order, floor first.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.pieces().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn visited(&self) -> &VisitedMap {
        &self.visited
    }

    pub fn visited_mut(&mut self) -> &mut VisitedMap {
        &mut self.visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PuyoColor;
    use crate::render::VisualHandle;

    fn red(x: i32, y: i32) -> Piece {
        Piece::new(PuyoColor::Red, GridPos::new(x, y), VisualHandle(0))
    }

    #[test]
    fn bounds_are_half_open() {
        let grid = Grid::new(6, 12);
        assert!(grid.is_in_bounds(0, 0));
        assert!(grid.is_in_bounds(5, 11));
        assert!(!grid.is_in_bounds(6, 0));
        assert!(!grid.is_in_bounds(0, 12));
        assert!(!grid.is_in_bounds(-1, 3));
        assert!(!grid.is_in_bounds(2, -1));
    }

    #[test]
    fn get_out_of_bounds_fails() {
        let grid = Grid::new(6, 12);
        assert_eq!(
            grid.get(6, 0),
            Err(GridError::OutOfBounds {
                x: 6,
                y: 0,
                width: 6,
                height: 12
            })
        );
        assert!(grid.get(0, -1).is_err());
        assert_eq!(grid.get(0, 0), Ok(None));
    }

    #[test]
    fn place_then_get() {
        let mut grid = Grid::new(6, 12);
        grid.place(red(2, 3)).unwrap();
        let piece = grid.get(2, 3).unwrap().unwrap();
        assert_eq!(piece.position(), GridPos::new(2, 3));
        assert!(grid.is_occupied(GridPos::new(2, 3)));
        assert!(!grid.is_occupied(GridPos::new(3, 3)));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn place_into_occupied_cell_returns_piece() {
        let mut grid = Grid::new(6, 12);
        grid.place(red(1, 1)).unwrap();
        let blue = Piece::new(PuyoColor::Blue, GridPos::new(1, 1), VisualHandle(9));
        match grid.place(blue) {
            Err(GridError::OccupiedCell { x: 1, y: 1, piece }) => {
                assert_eq!(piece.color(), PuyoColor::Blue);
            }
            other => panic!("expected OccupiedCell, got {other:?}"),
        }
        assert_eq!(grid.get(1, 1).unwrap().unwrap().color(), PuyoColor::Red);
    }

    #[test]
    fn place_out_of_bounds_fails() {
        let mut grid = Grid::new(6, 12);
        assert!(matches!(
            grid.place(red(0, 12)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(grid.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut grid = Grid::new(6, 12);
        grid.place(red(4, 0)).unwrap();
        grid.place(red(0, 0)).unwrap();
        assert!(grid.remove(4, 0).unwrap().is_some());
        assert_eq!(grid.remove(4, 0), Ok(None));
        assert_eq!(grid.len(), 1);
        assert!(grid.is_occupied(GridPos::new(0, 0)));
        assert!(grid.remove(-1, 0).is_err());
    }

    #[test]
    fn visited_map_marks_once_and_resets() {
        let mut grid = Grid::new(3, 3);
        let visited = grid.visited_mut();
        assert!(visited.mark(GridPos::new(1, 1)));
        assert!(!visited.mark(GridPos::new(1, 1)));
        assert!(!visited.mark(GridPos::new(3, 1)));
        assert!(visited.is_marked(GridPos::new(1, 1)));
        assert_eq!(visited.count(), 1);
        visited.reset();
        assert_eq!(grid.visited().count(), 0);
    }
}
