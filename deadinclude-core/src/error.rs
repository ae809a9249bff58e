//! Typed error handling for deadinclude.
//!
//! The include analysis itself never fails: malformed syntax degrades to
//! "nothing recorded". These errors cover the edges around it (reading
//! files, lexing unreadable input, loading config, rewriting sources).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deadinclude operations.
#[derive(Error, Debug)]
pub enum DeadincludeError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Source text the lexer could not tokenize
    #[error("Lex error in {path}: {message}")]
    Lex {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<u32>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Fix operation errors
    #[error("Fix error: {message}")]
    Fix { message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DeadincludeError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a lex error at a given line.
    pub fn lex_at(path: impl Into<PathBuf>, message: impl Into<String>, line: u32) -> Self {
        Self::Lex {
            path: path.into(),
            message: message.into(),
            line: Some(line),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a fix error.
    pub fn fix(message: impl Into<String>) -> Self {
        Self::Fix {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the run can skip the file and continue).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Lex { .. } | Self::Io { .. } | Self::Config { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Lex { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for deadinclude results.
pub type DeadincludeResult<T> = Result<T, DeadincludeError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> DeadincludeResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> DeadincludeResult<T> {
        self.map_err(|e| DeadincludeError::io(path, e))
    }
}
