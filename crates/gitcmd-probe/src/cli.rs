use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use gitcmd_probe_core::{ProbeConfig, Result};

/// gitcmd-probe: loads libgitcmd and exercises its C entry points
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Configuration file (.json, .yaml, .yml or .toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the shared library; overrides the config file
    #[arg(short, long, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Also run the GetFileC and NULL-input GetFileLogC checks
    #[arg(long)]
    pub extended: bool,

    /// Run log/add/get against a freshly created real file instead
    #[arg(long, conflicts_with = "extended")]
    pub real: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl CliArgs {
    /// Loads the config file, if any, and applies command-line overrides.
    pub fn resolve_config(&self) -> Result<ProbeConfig> {
        let mut config = match &self.config {
            Some(path) => ProbeConfig::load(path)?,
            None => ProbeConfig::default(),
        };
        if let Some(library) = &self.library {
            config.library_path = library.clone();
        }
        if self.extended {
            config.extended = true;
        }
        if self.real {
            config.real_file = true;
        }
        Ok(config)
    }
}
