use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use stonefall_engine::{GameSession, SessionState};
use stonefall_evaluator::heuristic::BoardEvaluation;

use crate::view::widgets::{
    BoardDisplay, EvaluationDisplay, PieceDisplay, SessionStatsDisplay, color, style,
};

/// The whole play screen: hold and stats on the left, the board in the
/// middle, next piece and evaluation on the right.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    evaluation: Option<&'a BoardEvaluation>,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            evaluation: None,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn evaluation(self, evaluation: Option<&'a BoardEvaluation>) -> Self {
        Self { evaluation, ..self }
    }

    fn popup(&self) -> Option<(Text<'static>, Style)> {
        match self.session.session_state() {
            SessionState::Playing => None,
            SessionState::NotStarted => Some((
                Text::from("PRESS SPACE TO START"),
                Style::new().fg(color::BLACK).bg(color::WHITE),
            )),
            SessionState::Paused => Some((
                Text::from("PAUSED"),
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            SessionState::GameOver => Some((
                Text::from(vec![
                    Line::from("GAME OVER!"),
                    Line::from(format!("SCORE: {}", self.session.stats().score())),
                    Line::from("PRESS SPACE"),
                ]),
                Style::new().fg(color::WHITE).bg(color::RED),
            )),
        }
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
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.session.session_state() {
            SessionState::NotStarted | SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style)
        };

        let game_board = BoardDisplay::new(self.session.board())
            .ghost(self.session.ghost_piece())
            .active_piece(self.session.active_piece().copied())
            .block(Block::bordered().border_style(border_style).style(style));
        let hold_panel = PieceDisplay::new()
            .shape(self.session.held_piece().map(|piece| *piece.shape()))
            .block(panel("HOLD"));
        let next_panel = PieceDisplay::new()
            .shape(self.session.next_piece().map(|piece| *piece.shape()))
            .block(panel("NEXT"));
        let session_stats = SessionStatsDisplay::new(self.session.stats()).block(panel("STATS"));
        let evaluation = EvaluationDisplay::new(self.evaluation).block(panel("EVAL"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), session_stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(u16::max(next_panel.width(), evaluation.width())),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(session_stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(session_stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let [next_area, evaluation_area] = Layout::vertical([
            Constraint::Length(next_panel.height()),
            Constraint::Length(evaluation.height()),
        ])
        .spacing(1)
        .areas(right_column);
        let next_area = next_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(next_panel.width())]).flex(Flex::Start),
        )[0];
        let evaluation_area = evaluation_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(evaluation.width())]).flex(Flex::Start),
        )[0];

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);
        evaluation.render(evaluation_area, buf);

        if let Some((text, style)) = self.popup() {
            let block = Block::new().style(style);
            let text_height = u16::try_from(text.height()).unwrap_or(u16::MAX);
            let text = text.style(style).centered();
            let area = board_area.centered(
                Constraint::Length(game_board_width),
                Constraint::Length(text_height.saturating_add(2)),
            );
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(
                inner.centered_vertically(Constraint::Length(text_height)),
                buf,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> stonefall_engine::PieceSeed {
        "0123456789abcdef0123456789abcdef".parse().unwrap()
    }

    fn render(display: &SessionDisplay) -> Buffer {
        let area = Rect::new(0, 0, 80, 26);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        buf
    }

    fn contains_text(buf: &Buffer, needle: &str) -> bool {
        (0..buf.area.height).any(|y| {
            let line: String = (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect();
            line.contains(needle)
        })
    }

    #[test]
    fn test_popup_follows_session_state() {
        let mut session = GameSession::with_seed(seed());
        let buf = render(&SessionDisplay::new(&session));
        assert!(contains_text(&buf, "PRESS SPACE TO START"));

        session.start();
        let buf = render(&SessionDisplay::new(&session));
        assert!(!contains_text(&buf, "PRESS SPACE"));
        assert!(contains_text(&buf, "HOLD"));
        assert!(contains_text(&buf, "NEXT"));
        assert!(contains_text(&buf, "STATS"));
        assert!(contains_text(&buf, "EVAL"));

        session.toggle_pause();
        let buf = render(&SessionDisplay::new(&session));
        assert!(contains_text(&buf, "PAUSED"));
    }

    #[test]
    fn test_game_over_popup_shows_score() {
        let mut session = GameSession::with_seed(seed());
        session.start();
        while !session.session_state().is_game_over() {
            let _ = session.insta_drop();
        }
        let buf = render(&SessionDisplay::new(&session));
        assert!(contains_text(&buf, "GAME OVER!"));
        assert!(contains_text(
            &buf,
            &format!("SCORE: {}", session.stats().score())
        ));
    }
}
