//! PNG file output and download naming

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::canvas::{Canvas, CanvasError};

/// File name the page offers when downloading the board.
pub const DEFAULT_DOWNLOAD_NAME: &str = "blackboard.png";

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Encoding error
    #[error("Image error: {0}")]
    Encode(#[from] CanvasError),
}

/// Write the canvas to `path` as PNG, creating parent directories.
pub fn save_png(canvas: &Canvas, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let png = canvas.to_png()?;
    std::fs::write(path, png)?;
    Ok(())
}

/// Where to write a rendered sketch.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `blackboard.png` next to the input |
/// | `-o out.png` | `out.png` |
/// | `-o dir/` | `dir/blackboard.png` |
pub fn output_path(input: &Path, output_arg: Option<&Path>) -> PathBuf {
    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(DEFAULT_DOWNLOAD_NAME)
            } else {
                output.to_path_buf()
            }
        }
        None => match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(DEFAULT_DOWNLOAD_NAME),
            _ => PathBuf::from(DEFAULT_DOWNLOAD_NAME),
        },
    }
}
