use std::time::Duration;

use crate::{
    CommandError, PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PiecePosition},
    },
};

use super::{
    GameStats,
    piece_generator::{PieceSeed, PieceSource, RandomPieceSource},
};

/// Lifecycle of a [`GameSession`].
///
/// `NotStarted` and `GameOver` accept the same commands: only
/// [`GameSession::start`] has an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    NotStarted,
    Playing,
    Paused,
    GameOver,
}

/// A single game: board, pieces, statistics and the play state machine.
///
/// The session is driven from outside. The presentation layer calls
/// [`gravity_tick`](Self::gravity_tick) once per [`drop_interval`](Self::drop_interval)
/// and forwards player commands. Gameplay commands are rejected unless the
/// session is [`SessionState::Playing`].
///
/// # Example
///
/// ```
/// use stonefall_engine::{GameSession, SessionState};
///
/// let mut session = GameSession::new();
/// assert_eq!(session.session_state(), SessionState::NotStarted);
///
/// session.start();
/// session.try_move(-1).ok();
/// session.insta_drop().unwrap();
///
/// assert_eq!(session.stats().completed_pieces(), 1);
/// ```
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    spawn_board: Board,
    active: Option<Piece>,
    next: Option<Piece>,
    held: Option<Piece>,
    stats: GameStats,
    session_state: SessionState,
    source: Box<dyn PieceSource>,
    spawned_pieces: usize,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session drawing pieces from a randomly seeded generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(Box::new(RandomPieceSource::new()))
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_source(Box::new(RandomPieceSource::with_seed(seed)))
    }

    #[must_use]
    pub fn with_source(source: Box<dyn PieceSource>) -> Self {
        Self {
            board: Board::INITIAL,
            spawn_board: Board::INITIAL,
            active: None,
            next: None,
            held: None,
            stats: GameStats::new(),
            session_state: SessionState::NotStarted,
            source,
            spawned_pieces: 0,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the board as it was when the active piece spawned.
    ///
    /// A lock spawns the next piece before clearing rows, so this board
    /// still contains the rows the lock completed.
    #[must_use]
    pub fn spawn_board(&self) -> &Board {
        &self.spawn_board
    }

    /// Returns the piece under player control, `None` before the first start.
    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    /// Returns the preview piece, parked in [`PiecePosition::PREVIEW_SLOT`].
    #[must_use]
    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    /// Returns the held piece, parked in [`PiecePosition::HOLD_SLOT`].
    #[must_use]
    pub fn held_piece(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    /// Returns where the active piece would land if dropped straight down.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<Piece> {
        self.active
            .map(|piece| piece.simulate_drop_position(&self.board))
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Returns the interval between gravity ticks for the current level.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.stats.drop_interval()
    }

    /// Returns how many pieces have been spawned since the session was created.
    ///
    /// The counter only grows, so observers can compare it against a previous
    /// value to detect a new spawn.
    #[must_use]
    pub fn spawned_pieces(&self) -> usize {
        self.spawned_pieces
    }

    /// Starts a new game if none is running.
    ///
    /// Resets the board, statistics and held piece, then spawns the first
    /// piece. Returns `false` without changing anything while a game is
    /// playing or paused.
    pub fn start(&mut self) -> bool {
        if !matches!(
            self.session_state,
            SessionState::NotStarted | SessionState::GameOver
        ) {
            return false;
        }
        self.board = Board::INITIAL;
        self.stats = GameStats::new();
        self.held = None;
        self.session_state = SessionState::Playing;
        self.next = Some(self.generate_piece());
        self.spawn_next();
        true
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            state @ (SessionState::NotStarted | SessionState::GameOver) => state,
        };
    }

    /// Shifts the active piece by `dx` columns.
    pub fn try_move(&mut self, dx: i32) -> Result<(), CommandError> {
        let piece = self.playing_piece()?.shifted(dx);
        self.set_active_piece(piece)
    }

    /// Rotates the active piece by 90 degrees in place.
    ///
    /// There are no wall kicks: a rotation that collides is rejected and the
    /// original orientation is kept.
    pub fn try_rotate(&mut self) -> Result<(), CommandError> {
        let piece = self.playing_piece()?.rotated();
        self.set_active_piece(piece)
    }

    /// Swaps the active piece with the held one.
    ///
    /// The previously held piece takes over the active piece's position and
    /// the active piece moves to the hold slot. With an empty hold slot the
    /// next piece is spawned instead.
    ///
    /// A swap whose incoming piece would collide is rejected. An overlapping
    /// piece would later be merged additively into filled cells, leaving
    /// values that are not a valid color index.
    pub fn try_hold(&mut self) -> Result<(), CommandError> {
        let active = self.playing_piece()?;
        let stored = active.moved_to(PiecePosition::HOLD_SLOT);
        match self.held {
            Some(held) => {
                let incoming = held.moved_to(active.position());
                if incoming.check_collision(&self.board) {
                    return Err(PieceCollisionError.into());
                }
                self.active = Some(incoming);
                self.held = Some(stored);
            }
            None => {
                self.held = Some(stored);
                self.spawn_next();
            }
        }
        Ok(())
    }

    /// Moves the active piece down one row, locking it if it is blocked.
    ///
    /// A manual drop awards one point before moving. On lock the piece is
    /// merged into the board, the next piece is spawned (which may end the
    /// game), filled rows are cleared and the lock is scored.
    ///
    /// Returns `true` if the piece was locked. Does nothing and returns
    /// `false` unless the session is playing.
    pub fn drop_piece(&mut self, manual: bool) -> bool {
        let Ok(active) = self.playing_piece() else {
            return false;
        };
        if manual {
            self.stats.add_soft_drop_point();
        }

        let moved = active.down();
        if !moved.check_collision(&self.board) {
            self.active = Some(moved);
            return false;
        }

        self.board.join_piece(&moved);
        self.spawn_next();
        let cleared_lines = self.board.clear_filled_rows();
        self.stats.complete_piece_drop(cleared_lines);
        true
    }

    /// Player-requested single-row drop.
    pub fn soft_drop(&mut self) -> bool {
        self.drop_piece(true)
    }

    /// Timer-driven single-row drop.
    pub fn gravity_tick(&mut self) -> bool {
        self.drop_piece(false)
    }

    /// Drops the active piece until it locks, scoring every row as manual.
    pub fn insta_drop(&mut self) -> Result<(), CommandError> {
        self.playing_piece()?;
        while !self.drop_piece(true) {}
        Ok(())
    }

    fn playing_piece(&self) -> Result<Piece, CommandError> {
        match (self.session_state, self.active) {
            (SessionState::Playing, Some(piece)) => Ok(piece),
            _ => Err(CommandError::NotPlaying),
        }
    }

    fn set_active_piece(&mut self, piece: Piece) -> Result<(), CommandError> {
        if piece.check_collision(&self.board) {
            return Err(PieceCollisionError.into());
        }
        self.active = Some(piece);
        Ok(())
    }

    fn generate_piece(&mut self) -> Piece {
        Piece::new(self.source.next_kind())
    }

    fn spawn_next(&mut self) {
        let next = match self.next.take() {
            Some(piece) => piece,
            None => self.generate_piece(),
        };
        let active = next.spawned();
        self.active = Some(active);
        self.next = Some(self.generate_piece());
        self.spawn_board.clone_from(&self.board);
        self.spawned_pieces += 1;

        if active.check_collision(&self.board) {
            self.session_state = SessionState::GameOver;
        }
    }
}
