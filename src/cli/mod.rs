//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

#[cfg(feature = "server")]
mod analyze;
mod palette;
#[cfg(feature = "server")]
mod serve;
mod sketch;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{apply_env_overrides, load_config, ChalkxConfig};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// ChalkX - sketch on a blackboard and have the drawing analyzed
#[derive(Parser)]
#[command(name = "chalkx")]
#[command(about = "ChalkX - freehand blackboard with an image analysis proxy")]
#[command(version)]
pub struct Cli {
    /// Path to chalkx.toml (default: search upwards from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the analysis proxy (POST /api/analyze)
    #[cfg(feature = "server")]
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Base URL of the analysis backend
        #[arg(long)]
        backend_url: Option<String>,
    },

    /// Submit a PNG image for analysis and print the result
    #[cfg(feature = "server")]
    Analyze {
        /// PNG file to analyze
        input: PathBuf,

        /// Server to submit to (default: the configured backend)
        #[arg(long)]
        url: Option<String>,
    },

    /// Replay a stroke script onto a blank board and save it as PNG
    Sketch {
        /// Sketch script (JSON)
        input: PathBuf,

        /// Output file or directory (default: blackboard.png next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also submit the drawing for analysis
        #[arg(long)]
        analyze: bool,

        /// Server to submit to with --analyze (default: the configured backend)
        #[arg(long)]
        url: Option<String>,
    },

    /// List the chalk color swatches
    Palette {
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },
}

/// Load chalkx.toml (or defaults) and apply `CHALKX_*` environment overrides.
pub(crate) fn load_settings(path: Option<&Path>) -> Result<ChalkxConfig, ExitCode> {
    let mut config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };
    if let Err(e) = apply_env_overrides(&mut config) {
        eprintln!("Error: {}", e);
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }
    Ok(config)
}

/// Build the runtime used by commands that talk HTTP.
#[cfg(feature = "server")]
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, ExitCode> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build().map_err(|e| {
        eprintln!("Error: Failed to start async runtime: {}", e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        #[cfg(feature = "server")]
        Commands::Serve { host, port, backend_url } => {
            let overrides = crate::config::CliOverrides { host, port, backend_url };
            serve::run_serve(config_path, &overrides)
        }
        #[cfg(feature = "server")]
        Commands::Analyze { input, url } => analyze::run_analyze(config_path, &input, url.as_deref()),
        Commands::Sketch { input, output, analyze, url } => {
            sketch::run_sketch(config_path, &input, output.as_deref(), analyze, url.as_deref())
        }
        Commands::Palette { json } => palette::run_palette(json),
    }
}
