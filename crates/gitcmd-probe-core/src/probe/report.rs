use std::io::{self, Write};

use serde::Serialize;

use crate::library::CallOutcome;
use crate::probe::real_file::RealFileReport;

pub const NULL_RESULT_MESSAGE: &str = "Error: Function returned NULL";
pub const COMPLETED_MESSAGE: &str = "=== All tests completed ===";

/// Result of one probe case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    /// 1-based position in the suite
    pub index: usize,
    pub title: String,
    pub symbol: &'static str,
    pub outcome: CallOutcome,
}

impl CaseReport {
    pub fn write_header(index: usize, title: &str, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "=== Test {}: {} ===", index, title)
    }

    pub fn write_outcome(outcome: &CallOutcome, out: &mut dyn Write) -> io::Result<()> {
        match outcome {
            CallOutcome::Present(text) => writeln!(out, "Result: {}", text),
            CallOutcome::Absent => writeln!(out, "{}", NULL_RESULT_MESSAGE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub library: String,
    pub cases: Vec<CaseReport>,
    /// Set by the real-file suite only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_file: Option<RealFileReport>,
}

impl ProbeReport {
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            cases: Vec::new(),
            real_file: None,
        }
    }

    pub fn write_banner(library: &str, out: &mut dyn Write) -> io::Result<()> {
        let header = format!("Testing {} from Rust", library);
        writeln!(out, "{}", header)?;
        writeln!(out, "{}", "=".repeat(header.chars().count()))
    }

    pub fn write_footer(out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", COMPLETED_MESSAGE)
    }

    /// Writes the whole report in console form.
    pub fn write_text(&self, out: &mut dyn Write) -> io::Result<()> {
        Self::write_banner(&self.library, out)?;
        if let Some(real_file) = &self.real_file {
            RealFileReport::write_created(&real_file.test_file, out)?;
        }
        for case in &self.cases {
            CaseReport::write_header(case.index, &case.title, out)?;
            CaseReport::write_outcome(&case.outcome, out)?;
        }
        if let Some(real_file) = &self.real_file {
            real_file.write_output_check(out)?;
            RealFileReport::write_cleanup(out)?;
        }
        Self::write_footer(out)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn present_count(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_present()).count()
    }

    pub fn absent_count(&self) -> usize {
        self.cases.len() - self.present_count()
    }
}
