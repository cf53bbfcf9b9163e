//! Engine error type.
//!
//! Argument guards that the type system cannot express (non-finite vectors)
//! and level-source failures. These are precondition violations: the engine
//! never catches them itself, the caller decides whether to abort or skip.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("could not read levels from {}: {source}", path.display())]
    LevelSource {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("level source contains no levels")]
    NoLevels,

    #[error("level {index} does not exist ({count} available)")]
    LevelIndex { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
