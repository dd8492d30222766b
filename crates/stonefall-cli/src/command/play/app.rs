use chrono::{DateTime, Utc};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use stonefall_engine::{GameSession, PieceSeed};
use stonefall_evaluator::heuristic::{BoardEvaluation, HeuristicEvaluator};

use crate::{
    schema::session_summary::SessionSummary,
    tui::{App, Tui},
    view::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay},
};

const KEY_BINDINGS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↓"], "Soft Drop"),
    (&["↑"], "Rotate"),
    (&["Enter"], "Hard Drop"),
    (&["C", "Tab"], "Hold"),
    (&["P"], "Pause"),
    (&["Space"], "Start"),
    (&["Q", "Esc"], "Quit"),
];

#[derive(Debug)]
pub struct PlayApp {
    seed: PieceSeed,
    session: GameSession,
    evaluator: HeuristicEvaluator,
    evaluation: Option<BoardEvaluation>,
    evaluated_spawn: usize,
    games_played: usize,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(seed: PieceSeed, evaluator: HeuristicEvaluator) -> Self {
        Self {
            seed,
            session: GameSession::with_seed(seed),
            evaluator,
            evaluation: None,
            evaluated_spawn: 0,
            games_played: 0,
            is_exiting: false,
        }
    }

    pub fn summary(&self, recorded_at: DateTime<Utc>) -> SessionSummary {
        SessionSummary {
            recorded_at,
            seed: self.seed,
            games_played: self.games_played,
            final_stats: self.session.stats().clone(),
            final_evaluation: self.evaluation,
        }
    }

    fn start(&mut self) {
        if self.session.start() {
            self.games_played += 1;
        }
    }

    /// Syncs the gravity timer with the session and re-evaluates the board
    /// after every spawn.
    ///
    /// The evaluated board is the one seen at spawn time, before the lock's
    /// completed rows were cleared.
    fn refresh(&mut self, tui: &mut Tui) {
        let interval = self
            .session
            .session_state()
            .is_playing()
            .then(|| self.session.drop_interval());
        if tui.tick_interval() != interval {
            tui.set_tick_interval(interval);
        }

        if self.session.spawned_pieces() != self.evaluated_spawn {
            self.evaluated_spawn = self.session.spawned_pieces();
            self.evaluation = Some(self.evaluator.evaluate(self.session.spawn_board()));
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        self.refresh(tui);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        let Some(event) = event.as_key_event() else {
            return;
        };
        if event.kind != KeyEventKind::Press {
            return;
        }

        // Rejected moves leave the session untouched, so errors are ignored
        match event.code {
            KeyCode::Esc | KeyCode::Char('q') => self.is_exiting = true,
            KeyCode::Left => _ = self.session.try_move(-1),
            KeyCode::Right => _ = self.session.try_move(1),
            KeyCode::Down => _ = self.session.soft_drop(),
            KeyCode::Up => _ = self.session.try_rotate(),
            KeyCode::Enter => _ = self.session.insta_drop(),
            KeyCode::Char('c') | KeyCode::Tab => _ = self.session.try_hold(),
            KeyCode::Char('p') => self.session.toggle_pause(),
            KeyCode::Char(' ') => self.start(),
            _ => {}
        }
        self.refresh(tui);
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display =
            SessionDisplay::new(&self.session).evaluation(self.evaluation.as_ref());
        let help = KeyBindingDisplay::new(KEY_BINDINGS);

        let [main_area, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(KeyBindingDisplay::height()),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, tui: &mut Tui) {
        self.session.gravity_tick();
        self.refresh(tui);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyEvent, KeyModifiers};
    use stonefall_engine::SessionState;

    use super::*;

    fn app() -> PlayApp {
        let seed = "00112233445566778899aabbccddeeff".parse().unwrap();
        PlayApp::new(seed, HeuristicEvaluator::default())
    }

    fn press(app: &mut PlayApp, tui: &mut Tui, code: KeyCode) {
        app.handle_event(tui, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_ticks_only_while_playing() {
        let mut app = app();
        let mut tui = Tui::new();
        app.init(&mut tui);
        assert_eq!(tui.tick_interval(), None);

        press(&mut app, &mut tui, KeyCode::Char(' '));
        assert_eq!(app.session.session_state(), SessionState::Playing);
        assert_eq!(tui.tick_interval(), Some(Duration::from_millis(1000)));

        press(&mut app, &mut tui, KeyCode::Char('p'));
        assert_eq!(app.session.session_state(), SessionState::Paused);
        assert_eq!(tui.tick_interval(), None);

        press(&mut app, &mut tui, KeyCode::Char('p'));
        assert_eq!(tui.tick_interval(), Some(Duration::from_millis(1000)));
    }

    #[test]
    fn test_evaluates_on_spawn() {
        let mut app = app();
        let mut tui = Tui::new();
        app.init(&mut tui);
        assert!(app.evaluation.is_none());

        press(&mut app, &mut tui, KeyCode::Char(' '));
        assert_eq!(
            app.evaluation.map(|e| e.metrics),
            Some(Default::default())
        );

        press(&mut app, &mut tui, KeyCode::Enter);
        assert_eq!(app.evaluated_spawn, app.session.spawned_pieces());
        let evaluation = app.evaluation.unwrap();
        assert!(evaluation.metrics.height_sum > 0);
    }

    #[test]
    fn test_evaluation_sees_rows_completed_by_the_lock() {
        let mut app = app();
        let mut tui = Tui::new();
        app.init(&mut tui);
        press(&mut app, &mut tui, KeyCode::Char(' '));

        for _ in 0..40 {
            press(&mut app, &mut tui, KeyCode::Enter);
            let evaluation = app.evaluation.unwrap();
            assert_eq!(evaluation, app.evaluator.evaluate(app.session.spawn_board()));
            assert_eq!(
                evaluation.metrics.completed_lines,
                app.session.spawn_board().filled_rows().len()
            );
            if app.session.session_state().is_game_over() {
                break;
            }
        }
    }

    #[test]
    fn test_counts_games_and_ignores_space_while_playing() {
        let mut app = app();
        let mut tui = Tui::new();
        app.init(&mut tui);

        press(&mut app, &mut tui, KeyCode::Char(' '));
        press(&mut app, &mut tui, KeyCode::Char(' '));
        assert_eq!(app.games_played, 1);

        while !app.session.session_state().is_game_over() {
            press(&mut app, &mut tui, KeyCode::Enter);
        }
        assert_eq!(tui.tick_interval(), None);

        press(&mut app, &mut tui, KeyCode::Char(' '));
        assert_eq!(app.games_played, 2);
        assert_eq!(app.session.stats().score(), 0);
    }

    #[test]
    fn test_gravity_tick_moves_piece_down() {
        let mut app = app();
        let mut tui = Tui::new();
        app.init(&mut tui);
        press(&mut app, &mut tui, KeyCode::Char(' '));

        let y = app.session.active_piece().unwrap().y();
        app.update(&mut tui);
        assert_eq!(app.session.active_piece().unwrap().y(), y + 1);
        // Gravity awards no points
        assert_eq!(app.session.stats().score(), 0);
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Esc, KeyCode::Char('q')] {
            let mut app = app();
            let mut tui = Tui::new();
            assert!(!app.should_exit());
            press(&mut app, &mut tui, code);
            assert!(app.should_exit());
        }
    }

    #[test]
    fn test_seed_reproduces_whole_session() {
        let play_session = || {
            let mut app = app();
            let mut tui = Tui::new();
            app.init(&mut tui);
            for _ in 0..2 {
                press(&mut app, &mut tui, KeyCode::Char(' '));
                while !app.session.session_state().is_game_over() {
                    press(&mut app, &mut tui, KeyCode::Left);
                    press(&mut app, &mut tui, KeyCode::Enter);
                }
            }
            app.summary(Utc::now())
        };

        let first = play_session();
        let second = play_session();
        assert_eq!(first.games_played, 2);
        assert_eq!(first.seed, second.seed);
        assert_eq!(first.final_stats, second.final_stats);
        assert_eq!(first.final_evaluation, second.final_evaluation);
    }

    #[test]
    fn test_summary() {
        let mut app = app();
        let mut tui = Tui::new();
        app.init(&mut tui);
        press(&mut app, &mut tui, KeyCode::Char(' '));
        press(&mut app, &mut tui, KeyCode::Enter);

        let summary = app.summary(Utc::now());
        assert_eq!(summary.seed, app.seed);
        assert_eq!(summary.games_played, 1);
        assert_eq!(summary.final_stats.completed_pieces(), 1);
        assert_eq!(summary.final_evaluation, app.evaluation);
    }
}
