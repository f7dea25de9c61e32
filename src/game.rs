//! Game session: owns the grid and the falling piece, and runs spawn -> fall -> land -> combo -> spawn.

use crate::combo::{ComboDetector, ComboOutcome};
use crate::fall::{FallScheduler, FallStep};
use crate::grid::{Grid, GridError};
use crate::piece::{GridPos, Piece, PuyoColor};
use crate::render::{Layout, Visuals};
use crate::{ConfigError, GameConfig};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// What a landing did to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub at: GridPos,
    pub color: PuyoColor,
    /// Connected same-colour cells found from the landed piece, itself included.
    pub group_size: usize,
    /// Pieces removed; 0 when the group was below the threshold.
    pub cleared: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    Idle,
    Fell,
    Landed(Landing),
    GameOver,
}

/// One play session. Visuals are injected so the core never touches rendering state.
#[derive(Debug)]
pub struct Game<V: Visuals> {
    grid: Grid,
    /// Falling piece; not in `grid` until it lands.
    active: Option<Piece>,
    fall: FallScheduler,
    combo: ComboDetector,
    layout: Layout,
    colors: Vec<PuyoColor>,
    rng: SmallRng,
    visuals: V,
    game_over: bool,
}

impl<V: Visuals> Game<V> {
    /// Builds the grid and spawns the first piece.
    pub fn new(config: &GameConfig, visuals: V) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut game = Self {
            grid: Grid::new(config.width as usize, config.height as usize),
            active: None,
            fall: FallScheduler::new(config.fall_interval),
            combo: ComboDetector::new(config.combo_threshold),
            layout: config.layout,
            colors: config.colors.clone(),
            rng: SmallRng::seed_from_u64(seed),
            visuals,
            game_over: false,
        };
        log::info!(
            "new game {}x{} threshold {} seed {}",
            config.width,
            config.height,
            config.combo_threshold,
            seed
        );
        game.spawn();
        Ok(game)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn visuals(&self) -> &V {
        &self.visuals
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn combo_threshold(&self) -> usize {
        self.combo.threshold()
    }

    pub fn fall_interval(&self) -> Duration {
        self.fall.interval()
    }

    /// Time until the falling piece next steps down or lands.
    pub fn next_fall_in(&self) -> Duration {
        self.fall.remaining()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Spawn cell: middle column of the top row.
    pub fn spawn_position(&self) -> GridPos {
        GridPos::new(
            (self.grid.width() / 2) as i32,
            self.grid.height() as i32 - 1,
        )
    }

    /// Creates the next active piece. Returns false (and ends the game) if the spawn cell is taken.
    pub fn spawn(&mut self) -> bool {
        if self.game_over || self.active.is_some() {
            return false;
        }
        let pos = self.spawn_position();
        if self.grid.is_occupied(pos) {
            log::info!("spawn cell ({}, {}) occupied, game over", pos.x, pos.y);
            self.game_over = true;
            return false;
        }
        let Some(&color) = self.colors.choose(&mut self.rng) else {
            log::error!("no colours configured");
            self.game_over = true;
            return false;
        };
        let handle = self
            .visuals
            .spawn_visual(color, self.layout.grid_to_world(pos));
        log::debug!("spawned {:?} at ({}, {})", color, pos.x, pos.y);
        self.active = Some(Piece::new(color, pos, handle));
        true
    }

    /// Advances the session by `elapsed`. At most one fall step happens per call.
    pub fn tick(&mut self, elapsed: Duration) -> Result<TickEvent, GridError> {
        if self.game_over {
            return Ok(TickEvent::GameOver);
        }
        let Some(mut piece) = self.active.take() else {
            return Ok(TickEvent::Idle);
        };
        match self.fall.step(elapsed, &piece, &self.grid) {
            FallStep::Wait => {
                self.active = Some(piece);
                Ok(TickEvent::Idle)
            }
            FallStep::Fall => {
                piece.fall();
                self.visuals
                    .update_visual(piece.visual(), self.layout.grid_to_world(piece.position()));
                self.active = Some(piece);
                Ok(TickEvent::Fell)
            }
            FallStep::Land => {
                let landing = self.land(piece)?;
                self.spawn();
                Ok(TickEvent::Landed(landing))
            }
        }
    }

    /// Commits the landed piece where it is, then scans and clears from its cell.
    fn land(&mut self, piece: Piece) -> Result<Landing, GridError> {
        let at = piece.position();
        let color = piece.color();
        self.grid.place(piece)?;
        log::debug!("landed {:?} at ({}, {})", color, at.x, at.y);

        let combo = self.combo.scan(&mut self.grid, at, color);
        debug_assert!(!combo.is_empty(), "landed cell missing from its own group");
        let group_size = combo.len();
        let cleared = match self.combo.resolve(&mut self.grid, &combo)? {
            ComboOutcome::Cleared(pieces) => {
                for piece in &pieces {
                    self.visuals.destroy_visual(piece.visual());
                }
                log::info!("cleared {} {:?} pieces", pieces.len(), color);
                pieces.len()
            }
            ComboOutcome::Kept { size } => {
                log::debug!("group of {} below threshold {}", size, self.combo.threshold());
                0
            }
        };
        Ok(Landing {
            at,
            color,
            group_size,
            cleared,
        })
    }

    pub fn move_left(&mut self) -> bool {
        self.move_by(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.move_by(1)
    }

    /// Lateral move of the falling piece. Walls and occupied cells silently block it.
    fn move_by(&mut self, dx: i32) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let target = piece.position().offset(dx, 0);
        if !self.grid.is_in_bounds(target.x, target.y) || self.grid.is_occupied(target) {
            log::trace!("move to ({}, {}) blocked", target.x, target.y);
            return false;
        }
        piece.move_x(dx);
        self.visuals
            .update_visual(piece.visual(), self.layout.grid_to_world(piece.position()));
        true
    }
}
