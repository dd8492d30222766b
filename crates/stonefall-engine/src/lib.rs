pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board")]
pub struct PieceCollisionError;

/// Reasons a gameplay command was rejected by [`GameSession`].
///
/// Rejected commands never change the session, so callers driven by user input
/// usually discard this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CommandError {
    #[display("session is not playing")]
    NotPlaying,
    #[display("piece colliding when applying command")]
    PieceCollision(PieceCollisionError),
}

impl From<PieceCollisionError> for CommandError {
    fn from(err: PieceCollisionError) -> Self {
        Self::PieceCollision(err)
    }
}
