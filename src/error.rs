use thiserror::Error;

/// Failure to read the turn protocol. Always fatal.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input ended while reading {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("expected {expected}, got {token:?}")]
    Parse {
        expected: &'static str,
        token: String,
    },
    #[error("invalid track: {0}")]
    Track(String),
    #[error("failed to read input")]
    Io(#[from] std::io::Error),
}

/// Failure to read a command line back, used by the local referee.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("command is missing {0}")]
    Missing(&'static str),
    #[error("bad coordinate {0:?}")]
    Coordinate(String),
    #[error("bad thrust {0:?}")]
    Thrust(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config")]
    Json(#[from] serde_json::Error),
}

/// Failure while driving a local match through the text protocol.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("player {player} input")]
    Input {
        player: usize,
        #[source]
        source: InputError,
    },
    #[error("player {player} sent a bad command")]
    Command {
        player: usize,
        #[source]
        source: CommandError,
    },
    #[error("player {player} sent {got} commands, expected {expected}")]
    CommandCount {
        player: usize,
        expected: usize,
        got: usize,
    },
    #[error("failed to write commands")]
    Io(#[from] std::io::Error),
}
