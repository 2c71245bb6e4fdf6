use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_char;
use std::ptr::NonNull;

/// Signature of the library's `FreeString` export.
pub type FreeStringFn = unsafe extern "C" fn(*mut c_char);

/// A NUL-terminated string allocated by the dynamic library.
///
/// The guard owns the pointer: dropping it hands the pointer back to the
/// library's `FreeString` exactly once. The `'lib` lifetime keeps the guard
/// from outliving the library that allocated it, since the free function
/// lives in that library's code.
pub struct LibString<'lib> {
    ptr: NonNull<c_char>,
    free: FreeStringFn,
    _library: PhantomData<&'lib ()>,
}

impl<'lib> LibString<'lib> {
    /// Takes ownership of a string returned by the library. Returns `None`
    /// for a null pointer, in which case `free` is never called.
    ///
    /// # Safety
    /// If `ptr` is non-null it must point to a NUL-terminated string that was
    /// allocated by the library, is not owned by anything else, and may be
    /// released with `free`. `free` must stay callable for `'lib`.
    pub unsafe fn from_raw(ptr: *mut c_char, free: FreeStringFn) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self {
            ptr,
            free,
            _library: PhantomData,
        })
    }

    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: from_raw's contract guarantees a live NUL-terminated string.
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }

    /// Decodes the string as UTF-8, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        self.as_c_str().to_string_lossy()
    }
}

impl Drop for LibString<'_> {
    fn drop(&mut self) {
        // SAFETY: the pointer came from the library and this is the only owner.
        unsafe { (self.free)(self.ptr.as_ptr()) }
    }
}

impl fmt::Debug for LibString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LibString").field(&self.as_c_str()).finish()
    }
}
