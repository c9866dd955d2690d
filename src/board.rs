//! The blackboard session: canvas, tools, the stroke in progress and the
//! state of the analysis request.
//!
//! A [`Board`] is driven by pointer events exactly the way the page drives
//! it: a press starts a stroke with a dot, each move joins the previous
//! sample to the new one, and release or leaving the canvas ends the stroke.
//! Only one analysis may be in flight at a time.

use image::Rgba;

use crate::analysis::{AnalysisError, AnalyzeRequest};
use crate::canvas::Canvas;
use crate::color::{parse_color, ColorError, BACKGROUND};
use crate::config::CanvasConfig;
use crate::geometry::{fitted_size, to_canvas_point, DisplayRect, Point};
use crate::tool::{Brush, Tool};

/// Drawing and analysis state for one page session.
#[derive(Debug, Clone)]
pub struct Board {
    canvas: Canvas,
    brush: Brush,
    drawing: bool,
    last_point: Option<Point>,
    analyzing: bool,
    result: Option<String>,
    error: Option<String>,
}

impl Board {
    /// A blank `width` x `height` board with the default background.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, BACKGROUND)
    }

    pub fn with_background(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            canvas: Canvas::new(width, height, background),
            brush: Brush::new(background),
            drawing: false,
            last_point: None,
            analyzing: false,
            result: None,
            error: None,
        }
    }

    /// A board using the size, colors and brush sizes from `[canvas]`.
    pub fn from_config(config: &CanvasConfig) -> Result<Self, ColorError> {
        let background = parse_color(&config.background)?;
        let mut board = Self::with_background(config.width, config.height, background);
        board.brush.set_color(parse_color(&config.color)?);
        board.brush.set_size_of(Tool::Pencil, config.pencil_size);
        board.brush.set_size_of(Tool::Eraser, config.eraser_size);
        Ok(board)
    }

    /// A board sized for a container `container_width` wide.
    pub fn fitted(container_width: f64) -> Self {
        let (w, h) = fitted_size(container_width);
        Self::new(w, h)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    pub fn tool(&self) -> Tool {
        self.brush.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.brush.set_tool(tool);
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.brush.set_color(color);
    }

    /// Set the active tool's size; returns the clamped size.
    pub fn set_size(&mut self, size: u32) -> u32 {
        self.brush.set_size(size)
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    /// Pointer pressed at a client position.
    pub fn start_drawing(&mut self, client_x: f64, client_y: f64, rect: DisplayRect) {
        self.drawing = true;
        if let Some(point) = to_canvas_point(client_x, client_y, rect, self.canvas.dimensions()) {
            self.start_at(point);
        }
    }

    /// Pointer moved to a client position. Ignored unless a stroke is active.
    pub fn draw(&mut self, client_x: f64, client_y: f64, rect: DisplayRect) {
        if !self.drawing {
            return;
        }
        if let Some(point) = to_canvas_point(client_x, client_y, rect, self.canvas.dimensions()) {
            self.draw_to(point);
        }
    }

    /// Pointer released, cancelled or left the canvas.
    pub fn stop_drawing(&mut self) {
        self.drawing = false;
        self.last_point = None;
    }

    /// Start a stroke at a canvas coordinate, marking it with a dot.
    pub fn start_at(&mut self, point: Point) {
        self.drawing = true;
        self.last_point = Some(point);
        self.canvas.draw_dot(point, self.brush.size() as f64, self.brush.paint());
    }

    /// Extend the active stroke to a canvas coordinate.
    pub fn draw_to(&mut self, point: Point) {
        if !self.drawing {
            return;
        }
        if let Some(last) = self.last_point {
            self.canvas.draw_line(last, point, self.brush.size() as f64, self.brush.paint());
            self.last_point = Some(point);
        }
    }

    /// Resize the backing raster, keeping the drawing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.resize(width, height);
    }

    /// Refit to a container `container_width` wide, keeping the drawing.
    pub fn fit_to_container(&mut self, container_width: f64) -> (u32, u32) {
        let (w, h) = fitted_size(container_width);
        self.canvas.resize(w, h);
        (w, h)
    }

    /// Wipe the board and forget any result or error.
    pub fn clear(&mut self) {
        self.canvas.clear();
        self.result = None;
        self.error = None;
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// Text of the last successful analysis.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Message of the last failed analysis, until dismissed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Capture the drawing and mark an analysis as in flight.
    ///
    /// Clears the previous result and error. Refused while another
    /// analysis is running; a capture failure is recorded as the error.
    pub fn begin_analysis(&mut self) -> Result<AnalyzeRequest, AnalysisError> {
        if self.analyzing {
            return Err(AnalysisError::InFlight);
        }
        self.result = None;
        self.error = None;
        match self.canvas.to_base64_png() {
            Ok(image) => {
                self.analyzing = true;
                Ok(AnalyzeRequest::new(image))
            }
            Err(e) => {
                let err = AnalysisError::from(e);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Record how the in-flight analysis ended.
    pub fn finish_analysis(&mut self, outcome: Result<String, AnalysisError>) {
        self.analyzing = false;
        match outcome {
            Ok(text) => {
                self.result = Some(text);
                self.error = None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "analysis failed");
                self.result = None;
                self.error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_BRUSH;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn rect(board: &Board) -> DisplayRect {
        let (w, h) = board.canvas().dimensions();
        DisplayRect::identity(w, h)
    }

    #[test]
    fn test_fresh_board_has_no_result_or_error() {
        let board = Board::new(80, 60);
        assert!(board.result().is_none());
        assert!(board.error().is_none());
        assert!(!board.is_analyzing());
        assert!(board.canvas().is_blank());
    }

    #[test]
    fn test_two_points_are_joined() {
        let mut board = Board::new(100, 50);
        board.set_color(RED);
        board.set_size(6);
        let r = rect(&board);
        board.start_drawing(10.0, 25.0, r);
        board.draw(90.0, 25.0, r);
        board.stop_drawing();

        for x in 10..90 {
            assert_eq!(board.canvas().pixel(x, 24), Some(RED), "gap at x={}", x);
        }
        // 6 wide: three pixels above and below the center line
        assert_eq!(board.canvas().pixel(50, 22), Some(RED));
        assert_eq!(board.canvas().pixel(50, 18), Some(BACKGROUND));
    }

    #[test]
    fn test_move_without_press_draws_nothing() {
        let mut board = Board::new(40, 30);
        let r = rect(&board);
        board.draw(10.0, 10.0, r);
        board.draw(20.0, 20.0, r);
        assert!(board.canvas().is_blank());
        assert!(board.last_point().is_none());
    }

    #[test]
    fn test_stop_ends_stroke() {
        let mut board = Board::new(60, 30);
        let r = rect(&board);
        board.start_drawing(5.0, 5.0, r);
        board.stop_drawing();
        assert!(!board.is_drawing());
        board.draw(55.0, 25.0, r);
        assert_eq!(board.canvas().pixel(30, 15), Some(BACKGROUND));
    }

    #[test]
    fn test_scaled_display() {
        // 200x150 raster shown at half size at (100, 100)
        let mut board = Board::new(200, 150);
        let r = DisplayRect::new(100.0, 100.0, 100.0, 75.0);
        board.start_drawing(150.0, 137.5, r);
        assert_eq!(board.last_point(), Some(Point::new(100.0, 75.0)));
        assert_eq!(board.canvas().pixel(100, 75), Some(DEFAULT_BRUSH));
    }

    #[test]
    fn test_eraser_restores_background() {
        let mut board = Board::new(60, 40);
        board.set_size(10);
        board.start_at(Point::new(30.0, 20.0));
        board.stop_drawing();
        assert_eq!(board.canvas().pixel(30, 20), Some(DEFAULT_BRUSH));

        board.set_tool(Tool::Eraser);
        board.start_at(Point::new(30.0, 20.0));
        board.stop_drawing();
        assert!(board.canvas().is_blank());
    }

    #[test]
    fn test_clear_resets_canvas_and_messages() {
        let mut board = Board::new(40, 30);
        board.start_at(Point::new(20.0, 15.0));
        board.stop_drawing();
        board.begin_analysis().unwrap();
        board.finish_analysis(Err(AnalysisError::MissingResult));
        assert!(board.error().is_some());

        board.clear();
        assert!(board.canvas().is_blank());
        assert!(board.error().is_none());
        assert!(board.result().is_none());
    }

    #[test]
    fn test_analysis_is_exclusive() {
        let mut board = Board::new(40, 30);
        let request = board.begin_analysis().unwrap();
        assert!(!request.image.is_empty());
        assert!(board.is_analyzing());
        assert!(matches!(board.begin_analysis(), Err(AnalysisError::InFlight)));

        board.finish_analysis(Ok("$2 + 2 = 4$".to_string()));
        assert!(!board.is_analyzing());
        assert_eq!(board.result(), Some("$2 + 2 = 4$"));
        assert!(board.begin_analysis().is_ok());
        // Starting a new analysis clears the previous result
        assert!(board.result().is_none());
    }

    #[test]
    fn test_failed_analysis_sets_dismissible_error() {
        let mut board = Board::new(40, 30);
        board.begin_analysis().unwrap();
        board.finish_analysis(Err(AnalysisError::Rejected("quota exceeded".to_string())));
        assert_eq!(board.error(), Some("quota exceeded"));
        assert!(board.result().is_none());
        board.dismiss_error();
        assert!(board.error().is_none());
    }

    #[test]
    fn test_empty_board_cannot_be_captured() {
        let mut board = Board::new(0, 0);
        let err = board.begin_analysis().unwrap_err();
        assert!(matches!(err, AnalysisError::Capture(_)));
        assert!(!board.is_analyzing());
        assert!(board.error().is_some());
    }

    #[test]
    fn test_from_config() {
        let config = CanvasConfig {
            width: 64,
            height: 48,
            background: "#000000".to_string(),
            color: "yellow".to_string(),
            pencil_size: 3,
            eraser_size: 40,
        };
        let board = Board::from_config(&config).unwrap();
        assert_eq!(board.canvas().dimensions(), (64, 48));
        assert_eq!(board.canvas().background(), Rgba([0, 0, 0, 255]));
        assert_eq!(board.brush().color(), Rgba([255, 255, 0, 255]));
        assert_eq!(board.brush().size_of(Tool::Pencil), 3);
        assert_eq!(board.brush().size_of(Tool::Eraser), 40);

        let bad = CanvasConfig { color: "#zzz".to_string(), ..config };
        assert!(Board::from_config(&bad).is_err());
    }

    #[test]
    fn test_fit_to_container_keeps_drawing() {
        let mut board = Board::fitted(400.0);
        assert_eq!(board.canvas().dimensions(), (380, 285));
        board.set_size(20);
        board.start_at(Point::new(190.0, 142.0));
        board.stop_drawing();

        assert_eq!(board.fit_to_container(1000.0), (800, 600));
        assert_ne!(board.canvas().pixel(400, 299), Some(BACKGROUND));
    }
}
