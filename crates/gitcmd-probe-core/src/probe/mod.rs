//! # Probe Cases and Runner
//!
//! A probe is a linear sequence of [`ProbeCase`]s run against one loaded
//! library. Each case makes one call, prints either `Result: <text>` or
//! `Error: Function returned NULL`, and releases whatever the library
//! returned before the next case starts.
//!
//! The real-file suite ([`ProbeRunner::run_real_file`]) additionally creates a
//! scratch file for the calls to act on and reports whether `GetFileC` wrote
//! its target.
mod case;
mod real_file;
mod report;
mod runner;

pub use case::{ProbeCall, ProbeCase, NONEXISTENT_FILE};
pub use real_file::{RealFileFixture, RealFileReport, OUTPUT_FILE_NAME, TEST_FILE_CONTENT, TEST_FILE_NAME};
pub use report::{CaseReport, ProbeReport, COMPLETED_MESSAGE, NULL_RESULT_MESSAGE};
pub use runner::ProbeRunner;
