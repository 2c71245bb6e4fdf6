//! # Gitcmd Library Binding
//!
//! Opens `libgitcmd` with `libloading` and binds its C exports:
//!
//! | Symbol        | Signature                                              | Required |
//! |---------------|--------------------------------------------------------|----------|
//! | `GetFileLogC` | `char* (const char* file_path)`                        | yes      |
//! | `AddFileC`    | `char* (const char* file_path)`                        | yes      |
//! | `FreeString`  | `void (char* str)`                                     | yes      |
//! | `GetFileC`    | `char* (const char* file, const char* commit, const char* target)` | no |
//!
//! Every function may return `NULL` to signal "no result". Non-null results
//! are wrapped in a [`LibString`] so they are released through `FreeString`
//! exactly once. Callers work against the [`GitCmdApi`] trait so the probe
//! can run against a mock in tests.
use std::borrow::Cow;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};
use std::ptr;

use libloading::{Library, Symbol};
use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{ProbeError, Result};

mod lib_string;
pub use lib_string::{FreeStringFn, LibString};

#[cfg(test)]
mod tests;

pub const GET_FILE_LOG_SYMBOL: &str = "GetFileLogC";
pub const ADD_FILE_SYMBOL: &str = "AddFileC";
pub const GET_FILE_SYMBOL: &str = "GetFileC";
pub const FREE_STRING_SYMBOL: &str = "FreeString";

type SingleArgFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;
type GetFileFn = unsafe extern "C" fn(*const c_char, *const c_char, *const c_char) -> *mut c_char;

/// What a library call produced. `NULL` is a distinct "no value" variant,
/// never an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum CallOutcome {
    Present(String),
    Absent,
}

impl CallOutcome {
    /// Decodes and releases a library result. The guard is dropped, and
    /// therefore freed, before this returns.
    pub fn from_result(result: Option<LibString<'_>>) -> Self {
        match result {
            Some(text) => {
                let decoded = text.to_string_lossy();
                if matches!(decoded, Cow::Owned(_)) {
                    warn!("Library returned non UTF-8 text; decoded lossily");
                }
                CallOutcome::Present(decoded.into_owned())
            }
            None => CallOutcome::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, CallOutcome::Present(_))
    }
}

/// The calls the probe makes into `libgitcmd`.
///
/// `None` arguments are passed to the library as null pointers.
pub trait GitCmdApi {
    /// File name of the loaded library, used in the report banner.
    fn library_name(&self) -> &str;

    /// Whether calls to `symbol` can be made. Required exports are always bound.
    fn has_symbol(&self, symbol: &str) -> bool;

    fn get_file_log(&self, file_path: Option<&CStr>) -> Option<LibString<'_>>;

    fn add_file(&self, file_path: Option<&CStr>) -> Option<LibString<'_>>;

    /// Fails with [`ProbeError::UnboundSymbol`] when the library does not export `GetFileC`.
    fn get_file(
        &self,
        file_path: Option<&CStr>,
        commit: Option<&CStr>,
        target: Option<&CStr>,
    ) -> Result<Option<LibString<'_>>>;
}

fn opt_ptr(arg: Option<&CStr>) -> *const c_char {
    arg.map_or(ptr::null(), CStr::as_ptr)
}

/// A loaded `libgitcmd` with its exports bound.
///
/// The function pointers are copied out of their `Symbol`s; they stay valid
/// because `library` is kept alive for as long as this value exists.
pub struct GitCmdLibrary {
    path: PathBuf,
    name: String,
    get_file_log: SingleArgFn,
    add_file: SingleArgFn,
    get_file: Option<GetFileFn>,
    free_string: FreeStringFn,
    _library: Library,
}

impl GitCmdLibrary {
    /// Opens the library at `path` and binds its exports.
    ///
    /// Opening runs the library's initialisers, which is the caller's trust
    /// decision: the library at `path` is assumed to implement the `libgitcmd`
    /// C ABI.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading library {}", path.display());
        let library = unsafe { Library::new(path) }.map_err(|e| ProbeError::LoadingError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let get_file_log: SingleArgFn = unsafe { bind(&library, path, GET_FILE_LOG_SYMBOL)? };
        let add_file: SingleArgFn = unsafe { bind(&library, path, ADD_FILE_SYMBOL)? };
        let free_string: FreeStringFn = unsafe { bind(&library, path, FREE_STRING_SYMBOL)? };
        let get_file: Option<GetFileFn> = match unsafe { bind(&library, path, GET_FILE_SYMBOL) } {
            Ok(f) => Some(f),
            Err(e) => {
                debug!("Optional symbol unavailable: {}", e);
                None
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Loaded {} (GetFileC bound: {})", name, get_file.is_some());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            get_file_log,
            add_file,
            get_file,
            free_string,
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_get_file(&self) -> bool {
        self.get_file.is_some()
    }
}

/// Looks up `symbol` and copies the function pointer out of the `Symbol`.
///
/// # Safety
/// `T` must match the exported function's real signature.
unsafe fn bind<T: Copy>(library: &Library, path: &Path, symbol: &'static str) -> Result<T> {
    let mut name = Vec::with_capacity(symbol.len() + 1);
    name.extend_from_slice(symbol.as_bytes());
    name.push(0);
    let sym: Symbol<T> = unsafe { library.get(&name) }.map_err(|e| ProbeError::MissingSymbol {
        symbol,
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(*sym)
}

impl GitCmdApi for GitCmdLibrary {
    fn library_name(&self) -> &str {
        &self.name
    }

    fn has_symbol(&self, symbol: &str) -> bool {
        match symbol {
            GET_FILE_LOG_SYMBOL | ADD_FILE_SYMBOL | FREE_STRING_SYMBOL => true,
            GET_FILE_SYMBOL => self.get_file.is_some(),
            _ => false,
        }
    }

    fn get_file_log(&self, file_path: Option<&CStr>) -> Option<LibString<'_>> {
        debug!("Calling {}({:?})", GET_FILE_LOG_SYMBOL, file_path);
        let raw = unsafe { (self.get_file_log)(opt_ptr(file_path)) };
        unsafe { LibString::from_raw(raw, self.free_string) }
    }

    fn add_file(&self, file_path: Option<&CStr>) -> Option<LibString<'_>> {
        debug!("Calling {}({:?})", ADD_FILE_SYMBOL, file_path);
        let raw = unsafe { (self.add_file)(opt_ptr(file_path)) };
        unsafe { LibString::from_raw(raw, self.free_string) }
    }

    fn get_file(
        &self,
        file_path: Option<&CStr>,
        commit: Option<&CStr>,
        target: Option<&CStr>,
    ) -> Result<Option<LibString<'_>>> {
        let get_file = self
            .get_file
            .ok_or(ProbeError::UnboundSymbol { symbol: GET_FILE_SYMBOL })?;
        debug!("Calling {}({:?}, {:?}, {:?})", GET_FILE_SYMBOL, file_path, commit, target);
        let raw = unsafe { get_file(opt_ptr(file_path), opt_ptr(commit), opt_ptr(target)) };
        Ok(unsafe { LibString::from_raw(raw, self.free_string) })
    }
}

impl std::fmt::Debug for GitCmdLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitCmdLibrary")
            .field("path", &self.path)
            .field("get_file_bound", &self.get_file.is_some())
            .finish()
    }
}
