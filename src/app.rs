//! App: terminal init, main loop, tick and key handling.

use crate::game::{Game, Landing, TickEvent};
use crate::input::{key_to_action, Action};
use crate::render::VisualStore;
use crate::theme::Theme;
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    frame_interval: Duration,
    game: Game<VisualStore>,
    screen: Screen,
    paused: bool,
    last_tick: Instant,
    /// Most recent landing, shown in the sidebar.
    last_landing: Option<Landing>,
}

impl App {
    pub fn new(args: &Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let game = Game::new(&config, VisualStore::new())?;
        Ok(Self {
            config,
            theme,
            frame_interval: Duration::from_secs_f64(1.0 / args.frame_rate.max(1.0)),
            game,
            screen: Screen::Playing,
            paused: false,
            last_tick: Instant::now(),
            last_landing: None,
        })
    }

    fn reset_game(&mut self) -> Result<()> {
        self.game = Game::new(&self.config, VisualStore::new())?;
        self.screen = Screen::Playing;
        self.paused = false;
        self.last_tick = Instant::now();
        self.last_landing = None;
        Ok(())
    }

    /// Returns true when the app should exit.
    fn apply_action(&mut self, action: Action) -> Result<bool> {
        match (self.screen, action) {
            (_, Action::Quit) => return Ok(true),
            (Screen::Playing, Action::Pause) => {
                self.paused = !self.paused;
                // Time spent paused does not count towards the fall timer.
                self.last_tick = Instant::now();
            }
            (Screen::Playing, Action::MoveLeft) if !self.paused => {
                self.game.move_left();
            }
            (Screen::Playing, Action::MoveRight) if !self.paused => {
                self.game.move_right();
            }
            (Screen::GameOver, Action::Restart) => self.reset_game()?,
            _ => {}
        }
        Ok(false)
    }

    /// Feeds the time since the last call into the game.
    fn update(&mut self, now: Instant) -> Result<()> {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        if self.screen != Screen::Playing || self.paused {
            return Ok(());
        }
        if let TickEvent::Landed(landing) = self.game.tick(elapsed)? {
            self.last_landing = Some(landing);
        }
        if self.game.is_game_over() {
            self.screen = Screen::GameOver;
        }
        Ok(())
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{
                disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
            },
        };

        enable_raw_mode()?;
        let result = execute!(std::io::stdout(), EnterAlternateScreen)
            .map_err(anyhow::Error::from)
            .and_then(|()| {
                let backend = ratatui::backend::CrosstermBackend::new(std::io::stdout());
                let mut terminal = DefaultTerminal::new(backend)?;
                self.last_tick = Instant::now();
                self.run_loop(&mut terminal)
            });

        // Restore even when setup or the loop failed.
        let leave = execute!(std::io::stdout(), LeaveAlternateScreen);
        let raw = disable_raw_mode();
        first_error(result, leave, raw)
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let frame_start = Instant::now();
            self.update(frame_start)?;

            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &self.game,
                    &self.theme,
                    self.screen,
                    self.paused,
                    self.last_landing,
                )
            })?;

            let timeout = self.frame_interval.saturating_sub(frame_start.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        // Only the initial press counts; held keys do not repeat moves.
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.apply_action(key_to_action(key))? {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Run error first, then the restore steps in order.
fn first_error(
    run: Result<()>,
    leave: std::io::Result<()>,
    raw: std::io::Result<()>,
) -> Result<()> {
    run?;
    leave?;
    raw?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{GridPos, PuyoColor};
    use clap::Parser;

    fn app(width: u16, height: u16) -> App {
        let args = Args::try_parse_from(["puyotui"]).unwrap();
        let config = GameConfig {
            width,
            height,
            fall_interval: Duration::from_millis(100),
            colors: vec![PuyoColor::Blue],
            seed: Some(3),
            ..GameConfig::default()
        };
        App::new(&args, config, Theme::default()).unwrap()
    }

    #[test]
    fn pause_freezes_the_fall() {
        let mut app = app(6, 12);
        let start = app.last_tick;
        app.apply_action(Action::Pause).unwrap();
        assert!(app.paused);
        app.update(start + Duration::from_secs(5)).unwrap();
        assert_eq!(app.game.active().unwrap().position(), GridPos::new(3, 11));
        assert!(!app.apply_action(Action::MoveLeft).unwrap());
        assert_eq!(app.game.active().unwrap().position(), GridPos::new(3, 11));
    }

    #[test]
    fn moves_reach_the_game() {
        let mut app = app(6, 12);
        app.apply_action(Action::MoveRight).unwrap();
        assert_eq!(app.game.active().unwrap().position(), GridPos::new(4, 11));
    }

    #[test]
    fn game_over_then_restart() {
        let mut app = app(1, 1);
        let mut now = app.last_tick;
        for _ in 0..3 {
            now += Duration::from_millis(100);
            app.update(now).unwrap();
        }
        assert_eq!(app.screen, Screen::GameOver);
        assert!(app.last_landing.is_some());
        app.apply_action(Action::Restart).unwrap();
        assert_eq!(app.screen, Screen::Playing);
        assert!(app.game.grid().is_empty());
        assert!(app.game.active().is_some());
    }

    #[test]
    fn restore_errors_do_not_hide_the_run_error() {
        let io = |msg: &str| Err(std::io::Error::other(msg.to_string()));
        let err = first_error(Err(anyhow::anyhow!("draw failed")), io("leave"), io("raw"));
        assert_eq!(err.unwrap_err().to_string(), "draw failed");
        let err = first_error(Ok(()), Ok(()), io("raw"));
        assert_eq!(err.unwrap_err().to_string(), "raw");
        assert!(first_error(Ok(()), Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn quit_from_any_screen() {
        let mut app = app(6, 12);
        assert!(app.apply_action(Action::Quit).unwrap());
        app.screen = Screen::GameOver;
        assert!(app.apply_action(Action::Quit).unwrap());
    }
}
