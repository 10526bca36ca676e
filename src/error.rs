//! Error types for dalgen.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for generation runs.
///
/// Every variant is fatal: a run that hits one of these stops without
/// producing output. Template defects are not errors at this level, they
/// end up inline in the generated body instead.
#[derive(Debug, Error)]
pub enum GenError {
    /// A directive block is structurally malformed.
    #[error("{}:{}: {}", .file.display(), .line, .message)]
    Directive {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// A command name is not in the registry.
    #[error("Command '{0}' is not defined")]
    UnknownCommand(String),

    /// A template alteration names a command that does not exist.
    #[error("Cannot alter template of unknown command '{0}'")]
    UnknownAlteration(String),

    /// Invalid or missing setting.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external source formatter failed.
    #[error("Formatter '{command}' failed: {message}")]
    Formatter { command: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// Create a directive error at the given source location.
    pub fn directive(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Directive {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for dalgen operations.
pub type GenResult<T> = Result<T, GenError>;
