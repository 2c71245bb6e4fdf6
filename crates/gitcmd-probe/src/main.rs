mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use gitcmd_probe_core::probe::ProbeRunner;
use gitcmd_probe_core::{GitCmdLibrary, ProbeConfig, ProbeError, Result};
use log::{error, info};

use cli::{CliArgs, OutputFormat};

fn main() -> ExitCode {
    // Parse command-line arguments
    let args = CliArgs::parse();

    // Logs go to stderr; stdout carries only the report.
    if let Err(e) = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Config load failed: {:?}", e);
            println!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let library = match GitCmdLibrary::load(&config.library_path) {
        Ok(library) => library,
        Err(e) => {
            error!("Library load failed: {:?}", e);
            println!("Error loading library: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&library, &config, args.format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Probe failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(library: &GitCmdLibrary, config: &ProbeConfig, format: OutputFormat) -> Result<()> {
    let runner = ProbeRunner::new(library);
    let execute = |out: &mut dyn Write| {
        if config.real_file {
            info!("Running the real-file suite against {}", library.path().display());
            runner.run_real_file(out)
        } else {
            let cases = config.suite();
            info!("Running {} tests against {}", cases.len(), library.path().display());
            runner.run(&cases, out)
        }
    };

    match format {
        OutputFormat::Text => {
            execute(&mut io::stdout().lock())?;
        }
        OutputFormat::Json => {
            let report = execute(&mut io::sink())?;
            writeln!(io::stdout().lock(), "{}", report.to_json()?).map_err(ProbeError::Output)?;
        }
    }
    Ok(())
}
