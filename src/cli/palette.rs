//! Palette command implementation

use std::process::ExitCode;

use crate::color::{parse_color, PALETTE};

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the palette command - list the chalk swatches
pub fn run_palette(json: bool) -> ExitCode {
    if json {
        return match serde_json::to_string_pretty(&PALETTE) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    println!("Chalk colors:");
    for hex in PALETTE {
        println!("  {} {}", swatch(hex), hex);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Two-cell truecolor block for `hex`, or blanks if it does not parse.
fn swatch(hex: &str) -> String {
    match parse_color(hex) {
        Ok(color) => {
            let [r, g, b, _] = color.0;
            format!("\x1b[48;2;{};{};{}m  \x1b[0m", r, g, b)
        }
        Err(_) => "  ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swatch_uses_truecolor_background() {
        assert_eq!(swatch("#FF8000"), "\x1b[48;2;255;128;0m  \x1b[0m");
    }

    #[test]
    fn test_swatch_invalid_color() {
        assert_eq!(swatch("nope"), "  ");
    }
}
