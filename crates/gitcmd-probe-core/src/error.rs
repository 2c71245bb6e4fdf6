//! # Gitcmd Probe Errors
//!
//! Defines [`ProbeError`], the error enum for every fallible probe operation:
//! opening the dynamic library, binding its symbols, marshalling arguments
//! into C strings, loading configuration and writing the report.
//!
//! A `NULL` result from a library function is not an error; it is reported as
//! [`CallOutcome::Absent`](crate::library::CallOutcome::Absent).
use std::error::Error as StdError;
use std::ffi::NulError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ProbeError {
    /// The dynamic library could not be found or opened.
    #[error("{source}")]
    LoadingError {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// A required export is missing from an otherwise loadable library.
    #[error("missing symbol {symbol} in '{}': {source}", path.display())]
    MissingSymbol {
        symbol: &'static str,
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// An optional export was needed by a probe case but was not bound at load time.
    #[error("symbol {symbol} is not exported by the loaded library")]
    UnboundSymbol { symbol: &'static str },

    #[error("argument '{field}' cannot be passed as a C string: {source}")]
    InvalidArgument {
        field: String,
        #[source]
        source: NulError,
    },

    #[error("Config error for '{}': {message}", path.display())]
    Config {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    #[error("Unknown or unsupported config format for path: {}", path.display())]
    UnsupportedConfigFormat { path: PathBuf },

    #[error("I/O error during operation '{operation}' on path '{}': {source}", path.display())]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the report to its output stream failed.
    #[error("Failed to write report: {0}")]
    Output(#[source] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, ProbeError>;

impl ProbeError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ProbeError::Io {
            source,
            operation: operation.into(),
            path: path.into(),
        }
    }

    /// True for errors raised while opening the library or binding its symbols.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, ProbeError::LoadingError { .. } | ProbeError::MissingSymbol { .. })
    }
}
