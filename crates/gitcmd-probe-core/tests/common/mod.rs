#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Tests that read the stub's allocation counter hold this while they run.
static STUB_LOCK: Mutex<()> = Mutex::new(());

pub fn lock_stub() -> MutexGuard<'static, ()> {
    STUB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// Helper function to compile a fixture library
// Returns the path to the compiled shared library.
pub fn compile_test_library(lib_name: &str, project_subpath: &str) -> Result<PathBuf, String> {
    let base_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")); // crates/gitcmd-probe-core
    let project_path = base_dir.join(project_subpath);
    let target_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("test_libraries");

    let output = Command::new(env!("CARGO"))
        .current_dir(&project_path)
        .arg("build")
        .arg("--target-dir")
        .arg(&target_dir)
        .output()
        .map_err(|e| format!("Failed to execute cargo build for {}: {}", lib_name, e))?;

    if !output.status.success() {
        return Err(format!(
            "Failed to compile test library {}: cargo build exited with status {:?}.\nStderr:\n{}",
            lib_name,
            output.status,
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    // On Linux, it's lib<name>.so. On macOS, lib<name>.dylib. On Windows, <name>.dll.
    let lib_filename = if cfg!(target_os = "windows") {
        format!("{}.dll", lib_name)
    } else if cfg!(target_os = "macos") {
        format!("lib{}.dylib", lib_name)
    } else {
        format!("lib{}.so", lib_name)
    };
    let lib_path = target_dir.join("debug").join(&lib_filename);

    if !lib_path.exists() {
        return Err(format!(
            "Compiled library not found at {}. Project path: {}",
            lib_path.display(),
            project_path.display()
        ));
    }
    Ok(lib_path)
}

pub fn gitcmd_stub() -> &'static Path {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        compile_test_library("gitcmd_stub", "tests/test_libraries/gitcmd_stub")
            .expect("Failed to compile gitcmd_stub")
    })
}

pub fn missing_free_string() -> &'static Path {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        compile_test_library("missing_free_string", "tests/test_libraries/missing_free_string")
            .expect("Failed to compile missing_free_string")
    })
}

/// Reads the stub's count of strings handed out and not yet freed.
pub fn stub_outstanding(lib_path: &Path) -> i64 {
    // Opening an already loaded library returns the same instance, so this
    // sees the counter the probe's calls updated.
    let library = unsafe { libloading::Library::new(lib_path) }.expect("reopen stub");
    let outstanding: libloading::Symbol<unsafe extern "C" fn() -> i64> =
        unsafe { library.get(b"gitcmd_stub_outstanding\0") }.expect("counter symbol");
    unsafe { outstanding() }
}
