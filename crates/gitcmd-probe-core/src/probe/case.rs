use std::ffi::CString;

use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, Result};
use crate::library::{ADD_FILE_SYMBOL, GET_FILE_LOG_SYMBOL, GET_FILE_SYMBOL};

/// Path used by the built-in cases; it must not exist on the probing host.
pub const NONEXISTENT_FILE: &str = "/non/existent/file.txt";

/// One library call. `None` arguments are passed as null pointers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum ProbeCall {
    GetFileLog {
        #[serde(default)]
        file_path: Option<String>,
    },
    AddFile {
        #[serde(default)]
        file_path: Option<String>,
    },
    GetFile {
        #[serde(default)]
        file_path: Option<String>,
        #[serde(default)]
        commit: Option<String>,
        #[serde(default)]
        target: Option<String>,
    },
}

impl ProbeCall {
    /// The exported symbol this call invokes.
    pub fn symbol(&self) -> &'static str {
        match self {
            ProbeCall::GetFileLog { .. } => GET_FILE_LOG_SYMBOL,
            ProbeCall::AddFile { .. } => ADD_FILE_SYMBOL,
            ProbeCall::GetFile { .. } => GET_FILE_SYMBOL,
        }
    }

    /// Converts the arguments to C strings, in call order.
    pub fn c_args(&self) -> Result<Vec<Option<CString>>> {
        match self {
            ProbeCall::GetFileLog { file_path } | ProbeCall::AddFile { file_path } => {
                Ok(vec![to_c_arg("file_path", file_path)?])
            }
            ProbeCall::GetFile { file_path, commit, target } => Ok(vec![
                to_c_arg("file_path", file_path)?,
                to_c_arg("commit", commit)?,
                to_c_arg("target", target)?,
            ]),
        }
    }
}

fn to_c_arg(field: &str, value: &Option<String>) -> Result<Option<CString>> {
    value
        .as_deref()
        .map(|v| {
            CString::new(v).map_err(|e| ProbeError::InvalidArgument {
                field: field.to_string(),
                source: e,
            })
        })
        .transpose()
}

/// A titled call, printed as `=== Test N: <title> ===`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeCase {
    pub title: String,
    #[serde(flatten)]
    pub call: ProbeCall,
}

impl ProbeCase {
    pub fn new(title: impl Into<String>, call: ProbeCall) -> Self {
        Self {
            title: title.into(),
            call,
        }
    }

    /// The three cases every run performs.
    pub fn standard_suite() -> Vec<ProbeCase> {
        vec![
            ProbeCase::new(
                "GetFileLogC (non-existent file)",
                ProbeCall::GetFileLog { file_path: Some(NONEXISTENT_FILE.to_string()) },
            ),
            ProbeCase::new(
                "AddFileC (non-existent file)",
                ProbeCall::AddFile { file_path: Some(NONEXISTENT_FILE.to_string()) },
            ),
            ProbeCase::new("AddFileC (NULL input)", ProbeCall::AddFile { file_path: None }),
        ]
    }

    /// The standard cases followed by the `GetFileC` and null-input checks.
    pub fn extended_suite() -> Vec<ProbeCase> {
        let mut cases = Self::standard_suite();
        cases.extend([
            ProbeCase::new(
                "GetFileC (NULL target)",
                ProbeCall::GetFile {
                    file_path: Some("somefile.txt".to_string()),
                    commit: Some("HEAD".to_string()),
                    target: None,
                },
            ),
            ProbeCase::new(
                "GetFileC (NULL file path)",
                ProbeCall::GetFile {
                    file_path: None,
                    commit: Some("HEAD".to_string()),
                    target: Some("/tmp/output.txt".to_string()),
                },
            ),
            ProbeCase::new("GetFileLogC (NULL input)", ProbeCall::GetFileLog { file_path: None }),
        ]);
        cases
    }
}
