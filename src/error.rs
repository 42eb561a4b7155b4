// Error types for the spectrum engine. The app layer wraps these in anyhow;
// the engine itself exposes typed errors so callers can match on them.

use std::fmt;

/// Precondition violations raised by the reducer and the visualizer loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A caller passed a value outside the accepted domain (zero bars,
    /// non-positive normalization maximum, decay factor outside `(0, 1)`...).
    InvalidArgument { name: &'static str, reason: String },
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { name, reason } => {
                write!(f, "invalid argument `{}`: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Reasons a signal source could not hand out a frame on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// The source exists but has nothing to give yet (engine warming up,
    /// output suspended). Also raised for a frame the loop cannot normalize.
    Unavailable(&'static str),
    /// The producer on the other side has gone away.
    Disconnected,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "signal source unavailable: {}", reason),
            Self::Disconnected => write!(f, "signal source disconnected"),
        }
    }
}

impl std::error::Error for SourceError {}
