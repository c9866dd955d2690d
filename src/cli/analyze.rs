//! Analyze command implementation

use std::path::Path;
use std::process::ExitCode;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::analysis::AnalyzeRequest;
use crate::client::AnalysisClient;
use crate::logging::init_tracing;

use super::{load_settings, runtime, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Execute the analyze command - submit a PNG and print the analysis text
pub fn run_analyze(config_path: Option<&Path>, input: &Path, url: Option<&str>) -> ExitCode {
    let config = match load_settings(config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };
    init_tracing(&config.logging);

    let bytes = match std::fs::read(input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: Cannot read input file '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    if !bytes.starts_with(PNG_SIGNATURE) {
        eprintln!("Error: '{}' is not a PNG image", input.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let request = AnalyzeRequest::new(STANDARD.encode(&bytes));
    let client = AnalysisClient::new(url.unwrap_or(&config.backend.url));

    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(code) => return code,
    };

    match runtime.block_on(client.analyze(&request)) {
        Ok(result) => {
            println!("{}", result);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
