//! Layout and drawing: well, sidebar, pause and game-over overlays.

use crate::app::Screen;
use crate::game::{Game, Landing};
use crate::render::VisualStore;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// Each grid cell is two terminal columns wide so pieces look roughly square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;
const PIECE_SYMBOL: &str = "●";

/// Well size in terminal cells, border included.
fn well_size(width: usize, height: usize) -> (u16, u16) {
    let cols = u16::try_from(width).unwrap_or(u16::MAX);
    let rows = u16::try_from(height).unwrap_or(u16::MAX);
    (
        cols.saturating_mul(CELL_WIDTH).saturating_add(2),
        rows.saturating_add(2),
    )
}

/// Terminal cell for grid (x, y). Row 0 is drawn at the bottom.
fn cell_origin(board: Rect, grid_height: usize, x: i32, y: i32) -> Option<(u16, u16)> {
    if x < 0 || y < 0 || y as usize >= grid_height {
        return None;
    }
    let col = u16::try_from(x)
        .ok()?
        .checked_mul(CELL_WIDTH)?
        .checked_add(board.x)?;
    let row = u16::try_from(grid_height - 1 - y as usize)
        .ok()?
        .checked_add(board.y)?;
    (col.saturating_add(CELL_WIDTH) <= board.right() && row < board.bottom())
        .then_some((col, row))
}

pub fn draw(
    frame: &mut Frame,
    game: &Game<VisualStore>,
    theme: &Theme,
    screen: Screen,
    paused: bool,
    last_landing: Option<Landing>,
) {
    let area = frame.area();
    let grid = game.grid();
    let (pw, ph) = well_size(grid.width(), grid.height());
    let total_w = pw.saturating_add(SIDEBAR_WIDTH);

    // Center horizontally
    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);

    // Center vertically
    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);

    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert_chunks[1]);

    draw_well(frame, game, theme, inner[0]);
    draw_sidebar(frame, game, theme, inner[1], last_landing);

    match screen {
        Screen::Playing if paused => draw_overlay(
            frame,
            theme,
            area,
            " Paused ",
            " P - Resume    Q - Quit ",
            Color::Yellow,
        ),
        Screen::Playing => {}
        Screen::GameOver => draw_overlay(
            frame,
            theme,
            area,
            " Game over ",
            " R - Restart    Q - Quit ",
            Color::Red,
        ),
    }
}

fn draw_well(frame: &mut Frame, game: &Game<VisualStore>, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line))
        .style(Style::default().bg(theme.bg));
    let board = block.inner(area);
    block.render(area, frame.buffer_mut());

    let layout = game.layout();
    let height = game.grid().height();
    let buf = frame.buffer_mut();
    // Pieces are drawn where the render side last put them, not read from the grid.
    for (_, visual) in game.visuals().iter() {
        let pos = layout.world_to_grid(visual.world);
        let Some((col, row)) = cell_origin(board, height, pos.x, pos.y) else {
            continue;
        };
        let style = Style::default()
            .fg(theme.puyo_color(visual.color))
            .bg(theme.bg);
        buf[(col, row)].set_symbol(PIECE_SYMBOL).set_style(style);
    }
}

fn draw_sidebar(
    frame: &mut Frame,
    game: &Game<VisualStore>,
    theme: &Theme,
    area: Rect,
    last_landing: Option<Landing>,
) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let mut lines = vec![
        Line::from(Span::styled("Puyotui", title_style)),
        Line::from(""),
    ];
    if let Some(piece) = game.active() {
        lines.push(Line::from(vec![
            Span::styled("Falling: ", title_style),
            Span::styled(
                PIECE_SYMBOL,
                Style::default().fg(theme.puyo_color(piece.color())),
            ),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("On board: ", title_style),
        Span::styled(game.grid().len().to_string(), fg_style),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Fall: ", title_style),
        Span::styled(format!("{} ms", game.fall_interval().as_millis()), fg_style),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Next drop: ", title_style),
        Span::styled(format!("{} ms", game.next_fall_in().as_millis()), fg_style),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Combo size: ", title_style),
        Span::styled(game.combo_threshold().to_string(), fg_style),
    ]));
    if let Some(landing) = last_landing {
        let text = if landing.cleared > 0 {
            format!("cleared {}", landing.cleared)
        } else {
            format!("group of {}", landing.group_size)
        };
        lines.push(Line::from(vec![
            Span::styled("Last: ", title_style),
            Span::styled(text, fg_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("←/→ h/l  move", fg_style)));
    lines.push(Line::from(Span::styled("p        pause", fg_style)));
    lines.push(Line::from(Span::styled("q        quit", fg_style)));
    Paragraph::new(Text::from(lines)).render(inner, frame.buffer_mut());
}

fn draw_overlay(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    title: &str,
    hint: &str,
    accent: Color,
) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Black).bg(accent),
        )),
        Line::from(""),
        Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .style(Style::default().bg(theme.bg)),
    );
    Clear.render(popup, frame.buffer_mut());
    p.render(popup, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameConfig, MAX_GRID_SIDE};
    use crate::piece::PuyoColor;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn row_zero_is_drawn_at_the_bottom() {
        let board = Rect::new(1, 1, 12, 12);
        assert_eq!(cell_origin(board, 12, 0, 0), Some((1, 12)));
        assert_eq!(cell_origin(board, 12, 5, 11), Some((11, 1)));
        assert_eq!(cell_origin(board, 12, 6, 0), None);
        assert_eq!(cell_origin(board, 12, 0, 12), None);
        assert_eq!(cell_origin(board, 12, -1, 0), None);
    }

    #[test]
    fn oversized_well_saturates() {
        assert_eq!(well_size(40_000, 4), (u16::MAX, 6));
        assert_eq!(well_size(usize::MAX, usize::MAX), (u16::MAX, u16::MAX));
        let board = Rect::new(1, 1, 12, 12);
        assert_eq!(cell_origin(board, 12, 40_000, 0), None);
    }

    #[test]
    fn largest_grid_draws_on_a_small_terminal() {
        let config = GameConfig {
            width: MAX_GRID_SIDE,
            height: MAX_GRID_SIDE,
            seed: Some(2),
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
        let game = Game::new(&config, VisualStore::new()).unwrap();
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| draw(f, &game, &theme, Screen::Playing, true, None))
            .unwrap();
    }

    #[test]
    fn falling_piece_is_drawn_in_the_spawn_cell() {
        let config = GameConfig {
            colors: vec![PuyoColor::Green],
            seed: Some(1),
            ..GameConfig::default()
        };
        let game = Game::new(&config, VisualStore::new()).unwrap();
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(40, 14)).unwrap();
        terminal
            .draw(|f| draw(f, &game, &theme, Screen::Playing, false, None))
            .unwrap();

        let buf = terminal.backend().buffer();
        let (pw, _) = well_size(6, 12);
        let left = (40 - (pw + SIDEBAR_WIDTH)) / 2;
        // Column 3 of the top row, inside the border.
        let cell = &buf[(left + 1 + 3 * CELL_WIDTH, 1)];
        assert_eq!(cell.symbol(), PIECE_SYMBOL);
        assert_eq!(cell.fg, theme.puyo_color(PuyoColor::Green));
    }
}
