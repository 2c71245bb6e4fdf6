//! # Gitcmd Probe Core
//!
//! Loads a prebuilt `libgitcmd` dynamic library, binds its exported C
//! functions and drives them through a sequence of probe cases.
//!
//! The modules are:
//! - [`error`]: the [`ProbeError`] type shared by every module.
//! - [`library`]: symbol binding ([`GitCmdLibrary`]), the [`GitCmdApi`] seam
//!   and the [`LibString`] guard that owns strings returned by the library.
//! - [`probe`]: probe cases, the runner and its report.
//! - [`config`]: file based configuration (JSON, YAML, TOML).
pub mod config;
pub mod error;
pub mod library;
pub mod probe;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export key public types for easier use by the binary
pub use config::{ConfigFormat, ProbeConfig};
pub use error::{ProbeError, Result};
pub use library::{CallOutcome, GitCmdApi, GitCmdLibrary, LibString};
pub use probe::{CaseReport, ProbeCall, ProbeCase, ProbeReport, ProbeRunner, RealFileReport};
