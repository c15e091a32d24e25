//! Error types for route-table construction.
//!
//! Construction runs once, before the server accepts traffic, so every error
//! here is fatal for the run. Silent skips (ineligible identifiers, manifests
//! without a route or controller) are not errors and never surface here.
//!
//! # Design
//!
//! This module uses an opaque `Error` struct paired with an `ErrorKind` enum,
//! following the `std::io::Error` pattern. Internal error sources can change
//! without breaking consumers.
//!
//! # Example
//!
//! ```rust
//! use axum_route_gen::{Error, ErrorKind};
//!
//! let error = Error::invalid_pattern("unclosed character class in `routes/[a-z`");
//!
//! match error.kind() {
//!     ErrorKind::InvalidPattern => println!("Bad glob: {}", error),
//!     ErrorKind::Load => println!("Route unit failed to load: {}", error),
//!     _ => println!("Other error: {}", error),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
///
/// This enum is marked `#[non_exhaustive]`, so new variants may be added
/// in future versions without breaking existing code. Always include a
/// wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Missing or malformed configuration (raised before discovery).
    #[error("configuration error")]
    Configuration,

    /// The discovery glob could not be parsed.
    #[error("invalid pattern")]
    InvalidPattern,

    /// A route unit failed to load.
    #[error("load error")]
    Load,

    /// The dispatcher refused a grouping or registration.
    #[error("dispatch error")]
    Dispatch,

    /// I/O error (file operations, directory walking).
    #[error("I/O error")]
    Io,

    /// Internal/unexpected error.
    #[error("internal error")]
    Internal,
}

/// An error that can occur while constructing a route table.
///
/// Use [`Error::kind()`] to determine the category of error for matching,
/// and the `Display` implementation to get a human-readable message.
///
/// ```rust
/// use axum_route_gen::{Error, ErrorKind};
///
/// let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
/// let err = Error::new(ErrorKind::Io, io_err);
/// assert_eq!(err.kind(), ErrorKind::Io);
/// ```
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Creates a new error with the given kind and source.
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns a stable identifier for this error, suitable for log filtering.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::InvalidPattern => "INVALID_PATTERN",
            ErrorKind::Load => "LOAD_ERROR",
            ErrorKind::Dispatch => "DISPATCH_ERROR",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Consumes the error and returns the inner error source.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.source
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    /// Creates an invalid glob pattern error.
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern, msg.into())
    }

    /// Creates a load error for the given route unit.
    pub fn load(identifier: impl AsRef<str>, msg: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Load,
            format!("Failed to load route unit `{}`: {}", identifier.as_ref(), msg),
        )
    }

    /// Creates a dispatch error.
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Dispatch, msg.into())
    }

    /// Creates an I/O error from a message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, msg.into())
    }

    /// Creates an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg.into())
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

// ============================================================================
// Tests
// ============================================================================
