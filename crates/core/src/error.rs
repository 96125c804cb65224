//! Unified error types for classgeo.
//!
//! `Error` is the taxonomy shared by every component. `RefreshError` tags an
//! `Error` with the pipeline stage it escaped from.

use std::fmt;

use tokio_rusqlite::rusqlite;

/// Unified error types for classgeo.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network or I/O failure while fetching the source page.
    #[error("FETCH_ERROR: {0}")]
    Fetch(String),

    /// The fetched document could not be parsed.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// The expected data literal is absent from the page.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// The extracted literal is not a valid map object set.
    #[error("DECODE_ERROR: {0}")]
    Decode(String),

    /// A coordinate field is not a finite decimal number.
    #[error("VALUE_FORMAT_ERROR: {0}")]
    ValueFormat(String),

    /// The feature collection could not be serialized.
    #[error("ENCODE_ERROR: {0}")]
    Encode(String),

    /// SQLite store I/O failure (distinct from a miss).
    #[error("STORE_ERROR: {0}")]
    Store(tokio_rusqlite::Error),

    /// Store failure from a backend other than SQLite.
    #[error("STORE_ERROR: {0}")]
    StoreUnavailable(String),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// The request-scoped deadline elapsed before the operation finished.
    #[error("DEADLINE_EXCEEDED: {0}")]
    DeadlineExceeded(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Store(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Store(tokio_rusqlite::Error::Close(c)),
            _ => Error::Store(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Store(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(tokio_rusqlite::Error::Error(err))
    }
}

/// Pipeline stage an error escaped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Extract,
    Decode,
    Transform,
    Serialize,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "fetch",
            Stage::Extract => "extract",
            Stage::Decode => "decode",
            Stage::Transform => "transform",
            Stage::Serialize => "serialize",
            Stage::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// A regeneration failure, tagged with the stage that produced it.
///
/// The wrapped error keeps its kind; callers that care about the cause
/// match on [`RefreshError::kind`].
#[derive(Debug, thiserror::Error)]
#[error("location data refresh error at {stage}: {source}")]
pub struct RefreshError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl RefreshError {
    pub fn new(stage: Stage, source: Error) -> Self {
        Self { stage, source }
    }

    /// The underlying error, unchanged in kind.
    pub fn kind(&self) -> &Error {
        &self.source
    }
}

/// Extension for tagging a result with its pipeline stage.
pub trait StageExt<T> {
    fn at_stage(self, stage: Stage) -> Result<T, RefreshError>;
}

impl<T> StageExt<T> for Result<T, Error> {
    fn at_stage(self, stage: Stage) -> Result<T, RefreshError> {
        self.map_err(|e| RefreshError::new(stage, e))
    }
}
