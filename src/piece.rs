//! Pieces: colour, grid position and the handle of their on-screen visual.

use crate::render::VisualHandle;
use clap::ValueEnum;

/// Piece colours. Blue, red and green are the default set; yellow and purple can be enabled with `--colors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum PuyoColor {
    Blue,
    Red,
    Green,
    Yellow,
    Purple,
}

impl PuyoColor {
    pub const ALL: [Self; 5] = [Self::Blue, Self::Red, Self::Green, Self::Yellow, Self::Purple];

    /// The classic three-colour set.
    pub const DEFAULT_SET: [Self; 3] = [Self::Blue, Self::Red, Self::Green];

    /// Index into `Theme::puyo`.
    pub fn index(self) -> usize {
        match self {
            Self::Blue => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Purple => 4,
        }
    }
}

/// Cell coordinate: column `x`, row `y`. Row 0 is the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub const fn below(self) -> Self {
        self.offset(0, -1)
    }

    /// Right, left, up, down.
    pub const fn neighbours(self) -> [Self; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

/// One grid occupant. Colour is fixed at spawn; position only changes while the piece is falling.
#[derive(Debug, PartialEq, Eq)]
pub struct Piece {
    color: PuyoColor,
    position: GridPos,
    visual: VisualHandle,
}

impl Piece {
    pub fn new(color: PuyoColor, position: GridPos, visual: VisualHandle) -> Self {
        Self {
            color,
            position,
            visual,
        }
    }

    pub fn color(&self) -> PuyoColor {
        self.color
    }

    pub fn position(&self) -> GridPos {
        self.position
    }

    pub fn visual(&self) -> VisualHandle {
        self.visual
    }

    /// Move one row down. Caller has already checked the target cell.
    pub(crate) fn fall(&mut self) {
        self.position = self.position.below();
    }

    /// Shift by `dx` columns. Caller has already checked the target cell.
    pub(crate) fn move_x(&mut self, dx: i32) {
        self.position = self.position.offset(dx, 0);
    }
}
