use thiserror::Error;

/// Coarse classification used by the transport to pick a status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    StateConflict,
    ResourceExhausted,
    Internal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),

    #[error("missing player id")]
    MissingPlayerId,

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("player is dead")]
    PlayerDead,

    #[error("ghosts are frozen")]
    GhostsFrozen,

    #[error("match is already locked")]
    AlreadyLocked,

    #[error("at least 2 players are required to lock, have {count}")]
    InsufficientPlayers { count: usize },

    #[error("match is locked, new players cannot join")]
    MatchLocked,

    #[error("chat message is empty")]
    EmptyMessage,

    #[error("no free cell available in the maze")]
    NoFreeCell,

    #[error("maze of {cols}x{rows} is not playable")]
    InvalidMazeSize { cols: i32, rows: i32 },
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDirection(_) | Self::MissingPlayerId | Self::EmptyMessage => {
                ErrorKind::Validation
            }
            Self::UnknownPlayer(_) => ErrorKind::NotFound,
            Self::PlayerDead
            | Self::GhostsFrozen
            | Self::AlreadyLocked
            | Self::InsufficientPlayers { .. }
            | Self::MatchLocked => ErrorKind::StateConflict,
            Self::NoFreeCell => ErrorKind::ResourceExhausted,
            Self::InvalidMazeSize { .. } => ErrorKind::Internal,
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            GameError::InvalidDirection("north".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(GameError::UnknownPlayer("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(GameError::GhostsFrozen.kind(), ErrorKind::StateConflict);
        assert_eq!(
            GameError::InsufficientPlayers { count: 1 }.kind(),
            ErrorKind::StateConflict
        );
        assert_eq!(GameError::NoFreeCell.kind(), ErrorKind::ResourceExhausted);
        assert_eq!(
            GameError::InvalidMazeSize { cols: 2, rows: 2 }.kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn messages_carry_detail() {
        assert_eq!(
            GameError::InsufficientPlayers { count: 1 }.to_string(),
            "at least 2 players are required to lock, have 1"
        );
        assert_eq!(
            GameError::InvalidDirection("north".into()).to_string(),
            "invalid direction: \"north\""
        );
    }
}
