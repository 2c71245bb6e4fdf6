//! # Probe Configuration
//!
//! A probe run is described by a [`ProbeConfig`]: where the library lives and
//! which cases to run. Configuration files are read in the format named by
//! their extension:
//!
//! - `.json`: always available
//! - `.yaml` / `.yml`: requires the `yaml-config` feature
//! - `.toml`: requires the `toml-config` feature
//!
//! ```toml
//! library_path = "build/libgitcmd.so"
//! extended = false
//! real_file = false
//!
//! [[cases]]
//! title = "AddFileC (NULL input)"
//! call = "add_file"
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, Result};
use crate::probe::ProbeCase;


/// Library location used when neither the config nor the command line names one.
pub const DEFAULT_LIBRARY_PATH: &str = "build/libgitcmd.so";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    pub library_path: PathBuf,
    /// Run the extended built-in suite when `cases` is empty
    pub extended: bool,
    /// Explicit cases; empty means the built-in suite
    pub cases: Vec<ProbeCase>,
    /// Run the real-file suite instead of any case list
    pub real_file: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            library_path: PathBuf::from(DEFAULT_LIBRARY_PATH),
            extended: false,
            cases: Vec::new(),
            real_file: false,
        }
    }
}

impl ProbeConfig {
    /// Reads and validates a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ProbeError::UnsupportedConfigFormat { path: path.to_path_buf() })?;
        let contents = fs::read_to_string(path).map_err(|e| ProbeError::io(e, "read config", path))?;
        debug!("Parsing {} config from {}", format.extension(), path.display());
        let config = Self::parse(&contents, format, path)?;
        config.validate(path)?;
        Ok(config)
    }

    /// Parses `contents` in `format`; `path` is only used in error messages.
    pub fn parse(contents: &str, format: ConfigFormat, path: &Path) -> Result<Self> {
        let parse_error = |e: Box<dyn std::error::Error + Send + Sync>| ProbeError::Config {
            path: path.to_path_buf(),
            message: format!("Failed to deserialize from {}", format.extension()),
            source: Some(e),
        };
        match format {
            ConfigFormat::Json => serde_json::from_str(contents).map_err(|e| parse_error(Box::new(e))),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| parse_error(Box::new(e))),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| parse_error(Box::new(e))),
        }
    }

    /// Checks that every case has a title and C-representable arguments.
    pub fn validate(&self, path: &Path) -> Result<()> {
        if self.real_file && !self.cases.is_empty() {
            return Err(ProbeError::Config {
                path: path.to_path_buf(),
                message: "real_file cannot be combined with explicit cases".to_string(),
                source: None,
            });
        }
        for (i, case) in self.cases.iter().enumerate() {
            if case.title.trim().is_empty() {
                return Err(ProbeError::Config {
                    path: path.to_path_buf(),
                    message: format!("case {} has an empty title", i + 1),
                    source: None,
                });
            }
            case.call.c_args().map_err(|e| ProbeError::Config {
                path: path.to_path_buf(),
                message: format!("case {} ('{}') has an invalid argument", i + 1, case.title),
                source: Some(Box::new(e)),
            })?;
        }
        Ok(())
    }

    /// The cases this config runs. Not used when `real_file` is set; that
    /// suite builds its cases around a scratch file at run time.
    pub fn suite(&self) -> Vec<ProbeCase> {
        if !self.cases.is_empty() {
            self.cases.clone()
        } else if self.extended {
            ProbeCase::extended_suite()
        } else {
            ProbeCase::standard_suite()
        }
    }
}
