//! Error types for adocgen library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for adocgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for adocgen library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The output directory could not be created.
    #[error("Could not create output directory {}: {source}", path.display())]
    CreateOutputDir { path: PathBuf, source: io::Error },

    /// An output file could not be opened for writing.
    #[error("Could not open file {} for writing: {source}", path.display())]
    OpenFile { path: PathBuf, source: io::Error },

    /// An external renderer (dot, mscgen, plantuml, dia) failed.
    #[error("External tool '{tool}' failed: {message}")]
    ExternalTool { tool: String, message: String },

    /// The documentation model could not be decoded.
    #[error("Model decoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// The documentation model is inconsistent.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// A compound requested by name does not exist in the project.
    #[error("Compound not found: {0}")]
    CompoundNotFound(String),
}

/// Severity of a non-fatal rendering problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A non-fatal problem encountered while rendering.
///
/// Rendering never stops on these; they are logged through `tracing`
/// and collected so callers can report them afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Returns `true` for error diagnostics.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "warning: {}", self.message),
            Severity::Error => write!(f, "error: {}", self.message),
        }
    }
}
