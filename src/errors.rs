use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Pokemon Arena battle engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArenaError {
    /// Fatal problem detected while building a battle or loading its resources
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// A battle snapshot could not be written or restored
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    /// The battle actor is no longer reachable
    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),
}

/// Errors raised while constructing battle participants or loading static data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A player was constructed without any Pokemon
    #[error("Player '{player}' must have at least one Pokemon")]
    EmptyRoster { player: String },
    /// The type effectiveness table could not be found
    #[error("Type chart not found at {}", path.display())]
    TypeChartMissing { path: PathBuf },
    /// Damage was needed before any type chart was installed
    #[error("Type chart has not been initialized")]
    TypeChartUninitialized,
    /// The type effectiveness table has no usable structure
    #[error("Malformed type chart: {0}")]
    TypeChartMalformed(String),
    /// A configuration file was missing or unreadable
    #[error("Could not load config {}: {reason}", path.display())]
    ConfigFile { path: PathBuf, reason: String },
    /// A team did not have the size its game mode requires
    #[error("Team must have {expected} Pokemon, got {actual}")]
    TeamSize { expected: usize, actual: usize },
    /// A species name did not match any dex entry
    #[error("Unknown species: {0}")]
    UnknownSpecies(String),
}

/// Errors surfaced while saving or restoring a battle snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// The bytes do not start with the snapshot marker
    #[error("Not a battle snapshot")]
    BadMagic,
    /// The snapshot was written by an incompatible engine version
    #[error("Snapshot version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u16, expected: u16 },
    /// The bytes could not be decoded
    #[error("Malformed snapshot: {0}")]
    Malformed(String),
    /// The snapshot decoded but describes an impossible battle
    #[error("Invalid snapshot: {0}")]
    Invalid(String),
    /// The battle could not be encoded
    #[error("Could not encode snapshot: {0}")]
    Encode(String),
    /// The snapshot file could not be read or written
    #[error("Snapshot I/O failed: {0}")]
    Io(String),
}

/// Errors from talking to a running battle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    /// The battle task has stopped and no longer accepts commands
    #[error("Battle runner has shut down")]
    Closed,
}

/// Type alias for Results using ArenaError
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Type alias for Results using PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_messages() {
        let err = ConfigError::EmptyRoster {
            player: "Ash".to_string(),
        };
        assert_eq!(err.to_string(), "Player 'Ash' must have at least one Pokemon");

        let err = PersistenceError::VersionMismatch {
            found: 9,
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "Snapshot version 9 is not supported (expected 1)"
        );
    }

    #[test]
    fn test_wraps_into_arena_error() {
        let err: ArenaError = RunnerError::Closed.into();
        assert_eq!(err, ArenaError::Runner(RunnerError::Closed));
        assert_eq!(err.to_string(), "Runner error: Battle runner has shut down");
    }
}
