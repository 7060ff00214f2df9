use herdfall_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, SessionStatsDisplay, color, style};

/// Full game view: stats on the left, board in the middle, next piece on the
/// right and an optional banner line under the board.
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    banner: Option<&'a str>,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            banner: None,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn banner(self, banner: Option<&'a str>) -> Self {
        Self { banner, ..self }
    }

    pub fn height(&self) -> u16 {
        let (board, next, stats) = self.panels();
        let center = board.height() + 1;
        center.max(next.height()).max(stats.height())
    }

    fn border_style(&self) -> Color {
        match self.session.session_state() {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        }
    }

    fn panel_block(&self, title: &'a str) -> Block<'a> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::symmetric(
                self.horizontal_padding,
                self.vertical_padding,
            ))
            .border_style(self.border_style())
            .style(style::DEFAULT)
    }

    fn panels(&self) -> (BoardDisplay<'a>, PieceDisplay<'a>, SessionStatsDisplay<'a>) {
        let session = self.session;
        let game_board = BoardDisplay::new(session.board(), session.overlay())
            .falling_piece(session.current_piece())
            .block(
                Block::bordered()
                    .border_style(self.border_style())
                    .style(style::DEFAULT),
            );
        // The board keeps its last state on game over; no ghost to chase
        let game_board = if session.is_game_over() {
            game_board
        } else {
            game_board.ghost(session.ghost_piece())
        };
        let next_panel = PieceDisplay::new()
            .piece(session.next_piece())
            .block(self.panel_block("NEXT"));
        let session_stats = SessionStatsDisplay::new(session).block(self.panel_block("STATS"));
        (game_board, next_panel, session_stats)
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let (game_board, next_panel, session_stats) = self.panels();

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area, banner_area] = Layout::vertical([
            Constraint::Length(game_board.height()),
            Constraint::Length(1),
        ])
        .areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        if let Some(banner) = self.banner {
            Line::styled(banner, style::BANNER)
                .centered()
                .render(banner_area, buf);
        }

        let popup = match self.session.session_state() {
            SessionState::Playing => None,
            SessionState::Paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            SessionState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
