use std::io::Write;

use log::info;

use crate::error::{ProbeError, Result};
use crate::library::{CallOutcome, GitCmdApi};
use crate::probe::case::{ProbeCall, ProbeCase};
use crate::probe::real_file::{RealFileFixture, RealFileReport};
use crate::probe::report::{CaseReport, ProbeReport};

/// Runs probe cases one after another against a bound library.
pub struct ProbeRunner<'a, A: GitCmdApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: GitCmdApi + ?Sized> ProbeRunner<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Performs one call. Any string the library returns is decoded and
    /// released before this returns.
    pub fn call(&self, call: &ProbeCall) -> Result<CallOutcome> {
        let args = call.c_args()?;
        let arg = |i: usize| args.get(i).and_then(|a| a.as_deref());
        let outcome = match call {
            ProbeCall::GetFileLog { .. } => CallOutcome::from_result(self.api.get_file_log(arg(0))),
            ProbeCall::AddFile { .. } => CallOutcome::from_result(self.api.add_file(arg(0))),
            ProbeCall::GetFile { .. } => {
                CallOutcome::from_result(self.api.get_file(arg(0), arg(1), arg(2))?)
            }
        };
        Ok(outcome)
    }

    /// Fails if any case names an unbound symbol or carries an argument that
    /// cannot be passed as a C string. Nothing has been written when this fails.
    pub fn check(&self, cases: &[ProbeCase]) -> Result<()> {
        for case in cases {
            let symbol = case.call.symbol();
            if !self.api.has_symbol(symbol) {
                return Err(ProbeError::UnboundSymbol { symbol });
            }
            case.call.c_args()?;
        }
        Ok(())
    }

    /// Runs `cases` in order, writing each case to `out` as soon as its call
    /// returns, and collects the outcomes into a report.
    pub fn run(&self, cases: &[ProbeCase], out: &mut dyn Write) -> Result<ProbeReport> {
        self.check(cases)?;
        let mut report = ProbeReport::new(self.api.library_name());
        ProbeReport::write_banner(&report.library, out).map_err(ProbeError::Output)?;
        self.run_cases(cases, &mut report, out)?;
        ProbeReport::write_footer(out).map_err(ProbeError::Output)?;
        self.log_summary(&report);
        Ok(report)
    }

    /// Creates a real test file, runs log/add/get against it, reports whether
    /// `GetFileC` wrote its target, then removes both files.
    pub fn run_real_file(&self, out: &mut dyn Write) -> Result<ProbeReport> {
        let fixture = RealFileFixture::create()?;
        let cases = fixture.suite();
        self.check(&cases)?;

        let mut report = ProbeReport::new(self.api.library_name());
        ProbeReport::write_banner(&report.library, out).map_err(ProbeError::Output)?;
        RealFileReport::write_created(fixture.test_file(), out).map_err(ProbeError::Output)?;
        self.run_cases(&cases, &mut report, out)?;

        let real_file = fixture.inspect_output()?;
        real_file.write_output_check(out).map_err(ProbeError::Output)?;
        fixture.cleanup()?;
        RealFileReport::write_cleanup(out).map_err(ProbeError::Output)?;
        info!(
            "GetFileC target {} created: {}",
            real_file.output_file.display(),
            real_file.output_created
        );
        report.real_file = Some(real_file);

        ProbeReport::write_footer(out).map_err(ProbeError::Output)?;
        self.log_summary(&report);
        Ok(report)
    }

    fn run_cases(&self, cases: &[ProbeCase], report: &mut ProbeReport, out: &mut dyn Write) -> Result<()> {
        for (i, case) in cases.iter().enumerate() {
            let index = i + 1;
            CaseReport::write_header(index, &case.title, out).map_err(ProbeError::Output)?;
            let outcome = self.call(&case.call)?;
            CaseReport::write_outcome(&outcome, out).map_err(ProbeError::Output)?;
            out.flush().map_err(ProbeError::Output)?;
            info!(
                "Test {} ({}) -> {}",
                index,
                case.call.symbol(),
                if outcome.is_present() { "result" } else { "NULL" }
            );
            report.cases.push(CaseReport {
                index,
                title: case.title.clone(),
                symbol: case.call.symbol(),
                outcome,
            });
        }
        Ok(())
    }

    fn log_summary(&self, report: &ProbeReport) {
        info!(
            "Completed {} tests: {} with results, {} NULL",
            report.cases.len(),
            report.present_count(),
            report.absent_count()
        );
    }
}
