use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use synvm_core::debug::Debugger;
use synvm_core::io::StdIo;
use synvm_core::vm::Machine;

mod config;

/// Interpreter and debugger for Synacor architecture program images.
#[derive(Parser)]
#[command(name = "synvm", version)]
struct Args {
    /// Path to the program binary (little-endian 16-bit words).
    program: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // Usage errors exit 1; --help and --version are clean exits.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let image = match std::fs::read(&args.program) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("synvm: cannot read {}: {e}", args.program.display());
            return ExitCode::FAILURE;
        }
    };

    let mut machine = Machine::new(StdIo::new());
    let words = machine.load_image(&image);
    log::debug!("loaded {words} words from {}", args.program.display());

    // The debugger rides along in passive mode: it only takes over on a
    // breakpoint or a fault. Plain runs behave as pure stdio passthrough.
    let mut debugger = Debugger::new();
    config::Config::load().apply(&mut debugger);

    match machine.run_with_hook(&mut debugger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
