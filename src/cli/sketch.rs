//! Sketch command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::output::{output_path, save_png};
use crate::sketch::{load_sketch, SketchError};

use super::{load_settings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the sketch command - replay a stroke script and save the board
pub fn run_sketch(
    config_path: Option<&Path>,
    input: &Path,
    output: Option<&Path>,
    analyze: bool,
    url: Option<&str>,
) -> ExitCode {
    let config = match load_settings(config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let sketch = match load_sketch(input) {
        Ok(sketch) => sketch,
        Err(SketchError::Io(e)) => {
            eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    #[allow(unused_mut)]
    let mut board = match sketch.render(&config.canvas) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let path = output_path(input, output);
    if let Err(e) = save_png(board.canvas(), &path) {
        eprintln!("Error: Failed to save '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved {}", path.display());

    if !analyze {
        return ExitCode::from(EXIT_SUCCESS);
    }

    #[cfg(feature = "server")]
    {
        crate::logging::init_tracing(&config.logging);
        let runtime = match super::runtime() {
            Ok(runtime) => runtime,
            Err(code) => return code,
        };
        let client = crate::client::AnalysisClient::new(url.unwrap_or(&config.backend.url));
        runtime.block_on(client.analyze_board(&mut board));

        if let Some(error) = board.error() {
            eprintln!("Error: {}", error);
            return ExitCode::from(EXIT_ERROR);
        }
        if let Some(result) = board.result() {
            println!("{}", result);
        }
        ExitCode::from(EXIT_SUCCESS)
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = url;
        eprintln!("Error: --analyze needs chalkx built with the \"server\" feature");
        ExitCode::from(EXIT_INVALID_ARGS)
    }
}
