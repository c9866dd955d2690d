//! Replayable stroke scripts
//!
//! A sketch is a JSON document listing strokes in canvas coordinates:
//!
//! ```json
//! {
//!   "width": 400,
//!   "height": 300,
//!   "strokes": [
//!     { "tool": "pencil", "color": "#FF0000", "size": 8, "points": [[20, 20], [200, 150]] },
//!     { "tool": "eraser", "points": [[100, 85]] }
//!   ]
//! }
//! ```
//!
//! Strokes are replayed through a [`Board`] the way pointer input is:
//! a dot at the first point, then a segment to each following point.
//! Color and size changes stick for later strokes, as they do on the page.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;
use crate::canvas::MAX_CANVAS_SIDE;
use crate::color::{parse_color, ColorError};
use crate::config::CanvasConfig;
use crate::geometry::Point;
use crate::tool::Tool;

/// Error type for loading or replaying a sketch
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("Failed to read sketch: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid sketch: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid canvas color: {0}")]
    Color(#[from] ColorError),
    #[error(
        "canvas size {width}x{height} must be between 1 and {max} pixels per side",
        max = MAX_CANVAS_SIDE
    )]
    Size { width: u32, height: u32 },
    #[error("stroke {stroke}: {source}")]
    StrokeColor {
        stroke: usize,
        #[source]
        source: ColorError,
    },
    #[error("stroke {stroke} has no points")]
    EmptyStroke { stroke: usize },
}

/// One pointer-down to pointer-up gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default)]
    pub tool: Tool,
    /// Chalk color; keeps the previous color when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Size for `tool`, clamped to its range; keeps the previous size when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    pub points: Vec<(f64, f64)>,
}

/// A whole script: optional canvas overrides plus strokes in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

/// Parse a sketch from JSON text.
pub fn parse_sketch(json: &str) -> Result<Sketch, SketchError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a sketch file.
pub fn load_sketch(path: &Path) -> Result<Sketch, SketchError> {
    let contents = fs::read_to_string(path)?;
    parse_sketch(&contents)
}

fn side_in_range(side: u32) -> bool {
    (1..=MAX_CANVAS_SIDE).contains(&side)
}

impl Sketch {
    /// A blank board for this sketch, with `defaults` filling in what the
    /// script leaves out.
    pub fn board(&self, defaults: &CanvasConfig) -> Result<Board, SketchError> {
        let config = CanvasConfig {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            background: self.background.clone().unwrap_or_else(|| defaults.background.clone()),
            ..defaults.clone()
        };
        if !side_in_range(config.width) || !side_in_range(config.height) {
            return Err(SketchError::Size { width: config.width, height: config.height });
        }
        Ok(Board::from_config(&config)?)
    }

    /// Draw every stroke onto `board`.
    ///
    /// Stops at the first invalid stroke; strokes before it stay drawn.
    pub fn replay(&self, board: &mut Board) -> Result<(), SketchError> {
        for (index, stroke) in self.strokes.iter().enumerate() {
            let Some((&first, rest)) = stroke.points.split_first() else {
                return Err(SketchError::EmptyStroke { stroke: index });
            };

            board.set_tool(stroke.tool);
            if let Some(color) = &stroke.color {
                let color = parse_color(color)
                    .map_err(|source| SketchError::StrokeColor { stroke: index, source })?;
                board.set_color(color);
            }
            if let Some(size) = stroke.size {
                board.set_size(size);
            }

            board.start_at(Point::from(first));
            for &point in rest {
                board.draw_to(Point::from(point));
            }
            board.stop_drawing();
        }
        Ok(())
    }

    /// A new board with the sketch drawn on it.
    pub fn render(&self, defaults: &CanvasConfig) -> Result<Board, SketchError> {
        let mut board = self.board(defaults)?;
        self.replay(&mut board)?;
        Ok(board)
    }
}
