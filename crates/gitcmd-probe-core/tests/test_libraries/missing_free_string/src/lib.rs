#![allow(non_snake_case)]

// Exports the call functions but not FreeString, so the probe must refuse to
// load it: results could never be released.

use std::os::raw::c_char;
use std::ptr;

#[no_mangle]
pub extern "C" fn GetFileLogC(_file_path: *const c_char) -> *mut c_char {
    ptr::null_mut()
}

#[no_mangle]
pub extern "C" fn AddFileC(_file_path: *const c_char) -> *mut c_char {
    ptr::null_mut()
}

// Misnamed on purpose; the probe looks for "FreeString".
#[no_mangle]
pub extern "C" fn free_string(_s: *mut c_char) {}
