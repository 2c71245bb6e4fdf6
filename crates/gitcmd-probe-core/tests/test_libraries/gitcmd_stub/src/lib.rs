//! Minimal library exporting the libgitcmd C ABI for the probe's tests.
//!
//! It only honours the observable contract: NULL when there is no result,
//! heap strings that must go back through `FreeString`. A live-allocation
//! counter lets tests check that every returned string was released.
#![allow(non_snake_case)]

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::Path;
use std::ptr;
use std::sync::atomic::{AtomicI64, Ordering};

static OUTSTANDING: AtomicI64 = AtomicI64::new(0);

fn give(text: String) -> *mut c_char {
    match CString::new(text) {
        Ok(s) => {
            OUTSTANDING.fetch_add(1, Ordering::SeqCst);
            s.into_raw()
        }
        Err(_) => ptr::null_mut(),
    }
}

unsafe fn arg<'a>(p: *const c_char) -> Option<&'a str> {
    if p.is_null() {
        None
    } else {
        CStr::from_ptr(p).to_str().ok()
    }
}

/// NULL for a null or missing path, otherwise a one-line fake history.
#[no_mangle]
pub unsafe extern "C" fn GetFileLogC(file_path: *const c_char) -> *mut c_char {
    match arg(file_path) {
        Some(path) if Path::new(path).exists() => give(format!("commit 0000000 ADD {}", path)),
        _ => ptr::null_mut(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn AddFileC(file_path: *const c_char) -> *mut c_char {
    match arg(file_path) {
        None => give("error: file path is nil".to_string()),
        Some(path) if !Path::new(path).exists() => {
            give(format!("error: stat {}: no such file or directory", path))
        }
        Some(path) => give(format!("success: dest=repo{}, result=true", path)),
    }
}

/// Copies an existing file to `target`; the commit is accepted but ignored.
#[no_mangle]
pub unsafe extern "C" fn GetFileC(
    file_path: *const c_char,
    commit: *const c_char,
    target: *const c_char,
) -> *mut c_char {
    match (arg(file_path), arg(target)) {
        (Some(file), Some(target)) => {
            let commit = arg(commit).unwrap_or("HEAD");
            match std::fs::copy(file, target) {
                Ok(_) => give("success: file retrieved".to_string()),
                Err(_) => give(format!("error: {} not found at {} (target {})", file, commit, target)),
            }
        }
        _ => give("error: file path or target is nil".to_string()),
    }
}

#[no_mangle]
pub unsafe extern "C" fn FreeString(s: *mut c_char) {
    if !s.is_null() {
        OUTSTANDING.fetch_sub(1, Ordering::SeqCst);
        drop(CString::from_raw(s));
    }
}

/// Strings handed out and not yet freed.
#[no_mangle]
pub extern "C" fn gitcmd_stub_outstanding() -> i64 {
    OUTSTANDING.load(Ordering::SeqCst)
}
