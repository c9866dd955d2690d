//! Serve command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::{merge_cli_overrides, CliOverrides};
use crate::logging::init_tracing;
use crate::proxy;

use super::{load_settings, runtime, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the serve command - run the analysis proxy until Ctrl+C
pub fn run_serve(config_path: Option<&Path>, overrides: &CliOverrides) -> ExitCode {
    let mut config = match load_settings(config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };
    merge_cli_overrides(&mut config, overrides);

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("Error: {}", issue);
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    init_tracing(&config.logging);

    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(code) => return code,
    };

    match runtime.block_on(proxy::run(&config)) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "proxy stopped");
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
