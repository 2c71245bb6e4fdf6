//! In-process stand-in for `libgitcmd` used by the unit tests.
//!
//! Strings are allocated with `CString::into_raw` and released by
//! [`mock_free_string`], which counts releases per thread so tests running in
//! parallel do not see each other's frees.
use std::cell::{Cell, RefCell};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::error::{ProbeError, Result};
use crate::library::{GitCmdApi, LibString, GET_FILE_SYMBOL};

thread_local! {
    static ALLOCATED: Cell<usize> = const { Cell::new(0) };
    static FREED: Cell<usize> = const { Cell::new(0) };
}

pub(crate) unsafe extern "C" fn mock_free_string(ptr: *mut c_char) {
    assert!(!ptr.is_null(), "FreeString called with NULL");
    FREED.with(|f| f.set(f.get() + 1));
    drop(unsafe { CString::from_raw(ptr) });
}

pub(crate) fn allocated_count() -> usize {
    ALLOCATED.with(Cell::get)
}

pub(crate) fn freed_count() -> usize {
    FREED.with(Cell::get)
}

/// Allocates `text` the way the library would and hands ownership to a guard.
pub(crate) fn alloc_lib_string<'a>(text: &str) -> LibString<'a> {
    let raw = CString::new(text).expect("test text has no NUL").into_raw();
    ALLOCATED.with(|a| a.set(a.get() + 1));
    unsafe { LibString::from_raw(raw, mock_free_string) }.expect("non-null")
}

/// Allocates raw bytes, so tests can hand back invalid UTF-8.
pub(crate) fn alloc_lib_bytes<'a>(bytes: &[u8]) -> LibString<'a> {
    let raw = CString::new(bytes).expect("test bytes have no NUL").into_raw();
    ALLOCATED.with(|a| a.set(a.get() + 1));
    unsafe { LibString::from_raw(raw, mock_free_string) }.expect("non-null")
}

/// One recorded call: symbol name and its arguments, `None` for null pointers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub symbol: &'static str,
    pub args: Vec<Option<String>>,
}

/// Canned replies per function; `None` replies return NULL.
#[derive(Default)]
pub(crate) struct MockGitCmd {
    pub log_reply: Option<&'static str>,
    pub add_reply: Option<&'static str>,
    pub get_reply: Option<&'static str>,
    pub get_file_bound: bool,
    pub calls: RefCell<Vec<RecordedCall>>,
}

impl MockGitCmd {
    pub fn new() -> Self {
        Self {
            get_file_bound: true,
            ..Default::default()
        }
    }

    fn record(&self, symbol: &'static str, args: &[Option<&CStr>]) {
        let args = args
            .iter()
            .map(|a| a.map(|s| s.to_string_lossy().into_owned()))
            .collect();
        self.calls.borrow_mut().push(RecordedCall { symbol, args });
    }

    fn reply<'a>(reply: Option<&str>) -> Option<LibString<'a>> {
        reply.map(alloc_lib_string)
    }
}

impl GitCmdApi for MockGitCmd {
    fn library_name(&self) -> &str {
        "libgitcmd-mock.so"
    }

    fn has_symbol(&self, symbol: &str) -> bool {
        symbol != GET_FILE_SYMBOL || self.get_file_bound
    }

    fn get_file_log(&self, file_path: Option<&CStr>) -> Option<LibString<'_>> {
        self.record("GetFileLogC", &[file_path]);
        Self::reply(self.log_reply)
    }

    fn add_file(&self, file_path: Option<&CStr>) -> Option<LibString<'_>> {
        self.record("AddFileC", &[file_path]);
        Self::reply(self.add_reply)
    }

    fn get_file(
        &self,
        file_path: Option<&CStr>,
        commit: Option<&CStr>,
        target: Option<&CStr>,
    ) -> Result<Option<LibString<'_>>> {
        if !self.get_file_bound {
            return Err(ProbeError::UnboundSymbol { symbol: GET_FILE_SYMBOL });
        }
        self.record("GetFileC", &[file_path, commit, target]);
        Ok(Self::reply(self.get_reply))
    }
}
