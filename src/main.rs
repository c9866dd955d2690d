//! ChalkX - command-line entry point for the blackboard tools and analysis proxy

use std::process::ExitCode;

use chalkx::cli;

fn main() -> ExitCode {
    cli::run()
}
