//! Canvas coordinates and the mapping from pointer positions.
//!
//! The board's backing raster rarely matches the size it is displayed at,
//! so pointer positions reported in viewport ("client") coordinates are
//! rescaled by the ratio of backing-store size to displayed size.

use serde::{Deserialize, Serialize};

/// Largest width the board will be fitted to.
pub const MAX_CANVAS_WIDTH: f64 = 800.0;

/// Fraction of the container width the board occupies.
pub const CONTAINER_FILL: f64 = 0.95;

/// A sub-pixel position in canvas (backing-store) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Where the canvas element sits on screen, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// A rect displaying a canvas at its natural size at the origin.
    pub fn identity(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }
}

/// Map a client-space position onto a canvas of `canvas_size` pixels.
///
/// Returns `None` when the canvas is not displayed (zero-sized rect).
///
/// ```
/// use chalkx::geometry::{to_canvas_point, DisplayRect, Point};
///
/// // An 800x600 raster shown at half size, offset by (10, 20).
/// let rect = DisplayRect::new(10.0, 20.0, 400.0, 300.0);
/// let p = to_canvas_point(110.0, 70.0, rect, (800, 600)).unwrap();
/// assert_eq!(p, Point::new(200.0, 100.0));
/// ```
pub fn to_canvas_point(
    client_x: f64,
    client_y: f64,
    rect: DisplayRect,
    canvas_size: (u32, u32),
) -> Option<Point> {
    if rect.width.is_nan() || rect.height.is_nan() || rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let scale_x = canvas_size.0 as f64 / rect.width;
    let scale_y = canvas_size.1 as f64 / rect.height;
    Some(Point::new((client_x - rect.left) * scale_x, (client_y - rect.top) * scale_y))
}

/// Backing-store size for a board placed in a container `container_width` wide.
///
/// The width is 95% of the container capped at 800, and the aspect ratio is
/// fixed at 4:3. Fractional sizes truncate to whole pixels.
pub fn fitted_size(container_width: f64) -> (u32, u32) {
    let width = (container_width * CONTAINER_FILL).min(MAX_CANVAS_WIDTH).max(0.0);
    let height = width * 3.0 / 4.0;
    (width as u32, height as u32)
}
