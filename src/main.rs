//! Puyotui: Puyo-style falling piece colour-matching puzzle in the terminal.

mod app;
mod combo;
mod fall;
mod game;
mod grid;
mod input;
mod logging;
mod piece;
mod render;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use combo::DEFAULT_COMBO_THRESHOLD;
use piece::PuyoColor;
use render::Layout;
use std::time::Duration;
use thiserror::Error;

/// Largest accepted grid width or height. Keeps the well's terminal layout within `u16`.
pub const MAX_GRID_SIDE: u16 = 256;

/// Settings for one game session (grid size, cadence, combo size, colours).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    /// Grid -> world mapping handed to the render side.
    pub layout: Layout,
    pub fall_interval: Duration,
    /// Smallest connected group that gets cleared.
    pub combo_threshold: usize,
    /// Colours a new piece is drawn from, uniformly.
    pub colors: Vec<PuyoColor>,
    /// Fixed RNG seed; random when `None`.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 6,
            height: 12,
            layout: Layout::default(),
            fall_interval: Duration::from_millis(500),
            combo_threshold: DEFAULT_COMBO_THRESHOLD,
            colors: PuyoColor::DEFAULT_SET.to_vec(),
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },
    #[error("grid may be at most {max}x{max}, got {width}x{height}")]
    GridTooLarge { width: u16, height: u16, max: u16 },
    #[error("cell size must be a positive number, got {0}")]
    InvalidCellSize(f32),
    #[error("fall interval must be greater than zero")]
    ZeroFallInterval,
    #[error("combo threshold must be at least 1")]
    ZeroThreshold,
    #[error("at least one piece colour is required")]
    NoColors,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_GRID_SIDE || self.height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_GRID_SIDE,
            });
        }
        let cell_size = self.layout.cell_size;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(cell_size));
        }
        if self.fall_interval.is_zero() {
            return Err(ConfigError::ZeroFallInterval);
        }
        if self.combo_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.colors.is_empty() {
            return Err(ConfigError::NoColors);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref(), args.log_level)?;
    let config = args.game_config();
    config.validate()?;
    let theme = theme::Theme::for_palette(args.palette);
    let mut app = App::new(&args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Puyo-style colour-matching puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "puyotui",
    version,
    about = "Puyo-style puzzle in the terminal. Stack falling pieces; groups of one colour that reach the combo size vanish.",
    long_about = "Puyotui is a small terminal puzzle in the style of Puyo Puyo.\n\n\
        Single coloured pieces drop from the top-centre of the well. When a piece lands, every \
        piece of the same colour connected to it (up, down, left, right) is counted; if the group \
        reaches the combo size it is removed.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move    P  Pause    R  Restart (after game over)    Q / Esc  Quit"
)]
pub struct Args {
    /// Grid width in columns.
    #[arg(long, default_value = "6", value_name = "COLS")]
    pub width: u16,

    /// Grid height in rows.
    #[arg(long, default_value = "12", value_name = "ROWS")]
    pub height: u16,

    /// Time between automatic one-row drops, in milliseconds.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub fall_interval_ms: u64,

    /// Smallest connected same-colour group that is cleared.
    #[arg(long, default_value = "4", value_name = "N")]
    pub combo_threshold: usize,

    /// World units per grid cell (used by the grid -> world mapping).
    #[arg(long, default_value = "1.0", value_name = "SIZE")]
    pub cell_size: f32,

    /// Piece colours to draw from, comma separated.
    #[arg(long, value_delimiter = ',', default_value = "blue,red,green")]
    pub colors: Vec<PuyoColor>,

    /// Seed for piece colours (reproducible sessions).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Colour palette: normal, high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Append log output to this file (nothing is logged without it).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<std::path::PathBuf>,

    /// Log level for --log-file: off, error, warn, info, debug, trace.
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: log::LevelFilter,
}

impl Args {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.width,
            height: self.height,
            layout: Layout {
                cell_size: self.cell_size,
                ..Layout::default()
            },
            fall_interval: Duration::from_millis(self.fall_interval_ms),
            combo_threshold: self.combo_threshold,
            colors: self.colors.clone(),
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
