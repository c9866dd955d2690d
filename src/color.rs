//! Color parsing and the board's built-in colors
//!
//! Brush colors arrive as CSS color strings from the page or from sketch
//! scripts. Supported formats:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`, `oklch()`
//! - Named: `red`, `white`, `orange`, etc.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Board background. The eraser paints with this color.
pub const BACKGROUND: Rgba<u8> = Rgba([0x1a, 0x1a, 0x1a, 0xff]);

/// Default chalk color.
pub const DEFAULT_BRUSH: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

/// The swatches offered by the color picker, in display order.
pub const PALETTE: [&str; 12] = [
    "#FFFFFF", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF", "#FFA500",
    "#800080", "#FFC0CB", "#A52A2A", "#008000",
];

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a CSS color string into an RGBA color.
///
/// Hex strings take a fast path; everything else goes through lightningcss.
///
/// ```
/// use chalkx::color::parse_color;
///
/// assert_eq!(parse_color("#FFA500").unwrap(), image::Rgba([255, 165, 0, 255]));
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("blue").unwrap(), image::Rgba([0, 0, 255, 255]));
/// assert_eq!(parse_color("hsl(0, 100%, 50%)").unwrap(), image::Rgba([255, 0, 0, 255]));
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    match s.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => parse_css_color(s),
    }
}

/// Format a color as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
pub fn to_hex(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 0xff {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

fn parse_hex(hex: &str) -> Result<Rgba<u8>, ColorError> {
    let digits: Vec<u8> = hex.chars().map(hex_value).collect::<Result<_, _>>()?;

    match digits.len() {
        // Short forms double each digit: #F00 -> #FF0000
        3 | 4 => {
            let mut rgba = [0xffu8; 4];
            for (slot, d) in rgba.iter_mut().zip(&digits) {
                *slot = d * 17;
            }
            Ok(Rgba(rgba))
        }
        6 | 8 => {
            let mut rgba = [0xffu8; 4];
            for (slot, pair) in rgba.iter_mut().zip(digits.chunks(2)) {
                *slot = pair[0] * 16 + pair[1];
            }
            Ok(Rgba(rgba))
        }
        len => Err(ColorError::InvalidLength(len)),
    }
}

fn hex_value(c: char) -> Result<u8, ColorError> {
    c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c))
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        // Float colors show up when components use `none`
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgba([
                unit_to_byte(rgb.r),
                unit_to_byte(rgb.g),
                unit_to_byte(rgb.b),
                unit_to_byte(rgb.alpha),
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
