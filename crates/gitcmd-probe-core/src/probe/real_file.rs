use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use tempfile::TempDir;

use crate::error::{ProbeError, Result};
use crate::probe::case::{ProbeCall, ProbeCase};

pub const TEST_FILE_NAME: &str = "test_anybakup.txt";
pub const OUTPUT_FILE_NAME: &str = "test_output.txt";
pub const TEST_FILE_CONTENT: &str = "Hello, this is a test file for anybakup!\n";

/// A scratch directory holding a real file for the library to work on, and
/// the path `GetFileC` is asked to write its copy to. Both are removed by
/// [`RealFileFixture::cleanup`], or on drop if the run fails first.
#[derive(Debug)]
pub struct RealFileFixture {
    dir: TempDir,
    test_file: PathBuf,
    output_file: PathBuf,
}

impl RealFileFixture {
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("gitcmd-probe-")
            .tempdir()
            .map_err(|e| ProbeError::io(e, "create scratch directory", std::env::temp_dir()))?;
        let test_file = dir.path().join(TEST_FILE_NAME);
        let output_file = dir.path().join(OUTPUT_FILE_NAME);
        fs::write(&test_file, TEST_FILE_CONTENT)
            .map_err(|e| ProbeError::io(e, "create test file", &test_file))?;
        debug!("Created test file {}", test_file.display());
        Ok(Self {
            dir,
            test_file,
            output_file,
        })
    }

    pub fn test_file(&self) -> &Path {
        &self.test_file
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Log, add, then fetch `HEAD` of the test file into the output path.
    pub fn suite(&self) -> Vec<ProbeCase> {
        let test_file = self.test_file.to_string_lossy().into_owned();
        vec![
            ProbeCase::new(
                "GetFileLogC (real file)",
                ProbeCall::GetFileLog { file_path: Some(test_file.clone()) },
            ),
            ProbeCase::new(
                "AddFileC (real file)",
                ProbeCall::AddFile { file_path: Some(test_file.clone()) },
            ),
            ProbeCase::new(
                "GetFileC (real file)",
                ProbeCall::GetFile {
                    file_path: Some(test_file),
                    commit: Some("HEAD".to_string()),
                    target: Some(self.output_file.to_string_lossy().into_owned()),
                },
            ),
        ]
    }

    /// Records whether `GetFileC` produced the output file, and what it holds.
    pub fn inspect_output(&self) -> Result<RealFileReport> {
        let output_content = match fs::read(&self.output_file) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(ProbeError::io(e, "read output file", &self.output_file)),
        };
        Ok(RealFileReport {
            test_file: self.test_file.clone(),
            output_file: self.output_file.clone(),
            output_created: output_content.is_some(),
            output_content,
        })
    }

    /// Removes the test file, the output file and their directory.
    pub fn cleanup(self) -> Result<()> {
        let dir = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|e| ProbeError::io(e, "remove test files", dir))
    }
}

/// What the real-file run left behind at the `GetFileC` target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealFileReport {
    pub test_file: PathBuf,
    pub output_file: PathBuf,
    pub output_created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_content: Option<String>,
}

impl RealFileReport {
    pub fn write_created(test_file: &Path, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Created test file: {}", test_file.display())
    }

    pub fn write_output_check(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        match &self.output_content {
            Some(content) => {
                writeln!(out, "Output file {} was created successfully", self.output_file.display())?;
                writeln!(out, "File content:")?;
                write!(out, "{}", content)?;
                if !content.ends_with('\n') {
                    writeln!(out)?;
                }
                Ok(())
            }
            None => writeln!(
                out,
                "Output file {} was not created (expected if file not in repo)",
                self.output_file.display()
            ),
        }
    }

    pub fn write_cleanup(out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Cleaned up test files")
    }
}
