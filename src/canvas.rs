//! The board's pixel raster.
//!
//! A [`Canvas`] owns an RGBA image that is always fully opaque: it starts out
//! filled with the background color, chalk is composited on top of it, and
//! erasing paints the background back rather than clearing alpha.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::imageops::{self, FilterType};
use image::{ImageEncoder, Rgba, RgbaImage};
use thiserror::Error;

use crate::geometry::Point;
use crate::shapes::{rasterize_capsule, rasterize_disc};

/// Prefix of a PNG data URL as produced by a browser canvas.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Largest raster side in pixels. Larger requests are clamped to it.
pub const MAX_CANVAS_SIDE: u32 = 8192;

fn clamp_side(side: u32) -> u32 {
    side.min(MAX_CANVAS_SIDE)
}

/// Error type for canvas export
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A zero-sized raster has no PNG representation
    #[error("canvas is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
    /// PNG encoding failed
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// An opaque RGBA drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl Canvas {
    /// Create a `width` x `height` canvas filled with `background`.
    ///
    /// Each side is clamped to [`MAX_CANVAS_SIDE`].
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        let (width, height) = (clamp_side(width), clamp_side(height));
        Self { image: RgbaImage::from_pixel(width, height, background), background }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    /// The underlying raster.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Color at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let (w, h) = self.dimensions();
        (x < w && y < h).then(|| *self.image.get_pixel(x, y))
    }

    /// Whether every pixel is the background color.
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| *p == self.background)
    }

    /// Reset every pixel to the background.
    pub fn clear(&mut self) {
        let background = self.background;
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
    }

    /// Fill a circle of diameter `size` centered on `center`.
    pub fn draw_dot(&mut self, center: Point, size: f64, color: Rgba<u8>) {
        let (w, h) = self.dimensions();
        let image = &mut self.image;
        rasterize_disc(center, size / 2.0, w, h, |x, y, coverage| {
            blend(image.get_pixel_mut(x, y), color, coverage);
        });
    }

    /// Stroke a segment `size` wide with round caps.
    ///
    /// Consecutive pointer samples are joined with this so fast strokes
    /// leave no gaps.
    pub fn draw_line(&mut self, start: Point, end: Point, size: f64, color: Rgba<u8>) {
        let (w, h) = self.dimensions();
        let image = &mut self.image;
        rasterize_capsule(start, end, size / 2.0, w, h, |x, y, coverage| {
            blend(image.get_pixel_mut(x, y), color, coverage);
        });
    }

    /// Change the raster size, keeping what was drawn.
    ///
    /// The old raster is copied aside, the new one is filled with the
    /// background, and the copy is drawn stretched to the new dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (clamp_side(width), clamp_side(height));
        if self.dimensions() == (width, height) {
            return;
        }
        let previous = std::mem::replace(
            &mut self.image,
            RgbaImage::from_pixel(width, height, self.background),
        );
        if previous.width() == 0 || previous.height() == 0 || width == 0 || height == 0 {
            return;
        }
        let scaled = imageops::resize(&previous, width, height, FilterType::Triangle);
        for (dst, src) in self.image.pixels_mut().zip(scaled.pixels()) {
            blend(dst, *src, 1.0);
        }
    }

    /// Encode the raster as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, CanvasError> {
        let (width, height) = self.dimensions();
        if width == 0 || height == 0 {
            return Err(CanvasError::Empty { width, height });
        }
        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png).write_image(
            self.image.as_raw(),
            width,
            height,
            image::ColorType::Rgba8,
        )?;
        Ok(png)
    }

    /// PNG bytes as standard base64, the payload the analysis service expects.
    pub fn to_base64_png(&self) -> Result<String, CanvasError> {
        Ok(STANDARD.encode(self.to_png()?))
    }

    /// PNG as a `data:` URL, suitable for a download link.
    pub fn to_data_url(&self) -> Result<String, CanvasError> {
        Ok(format!("{}{}", PNG_DATA_URL_PREFIX, self.to_base64_png()?))
    }
}

/// Composite `color` over `dst` (source-over) scaled by `coverage`.
fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = (color[3] as f32 / 255.0) * coverage;
    if alpha <= 0.0 {
        return;
    }
    if alpha >= 1.0 {
        *dst = color;
        return;
    }
    for c in 0..3 {
        let mixed = color[c] as f32 * alpha + dst[c] as f32 * (1.0 - alpha);
        dst[c] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    let out_alpha = 255.0 * alpha + dst[3] as f32 * (1.0 - alpha);
    dst[3] = out_alpha.round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BACKGROUND, DEFAULT_BRUSH};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn test_new_canvas_is_background() {
        let canvas = Canvas::new(8, 6, BACKGROUND);
        assert_eq!(canvas.dimensions(), (8, 6));
        assert!(canvas.is_blank());
        assert_eq!(canvas.pixel(7, 5), Some(BACKGROUND));
        assert_eq!(canvas.pixel(8, 0), None);
    }

    #[test]
    fn test_draw_dot_paints_center() {
        let mut canvas = Canvas::new(20, 20, BACKGROUND);
        canvas.draw_dot(Point::new(10.0, 10.0), 5.0, DEFAULT_BRUSH);
        assert_eq!(canvas.pixel(10, 10), Some(DEFAULT_BRUSH));
        assert_eq!(canvas.pixel(0, 0), Some(BACKGROUND));
    }

    #[test]
    fn test_draw_line_connects_points() {
        let mut canvas = Canvas::new(40, 20, BACKGROUND);
        canvas.draw_line(Point::new(5.0, 10.0), Point::new(35.0, 10.0), 4.0, RED);
        for x in 5..35 {
            assert_eq!(canvas.pixel(x, 9), Some(RED), "gap at x={}", x);
            assert_eq!(canvas.pixel(x, 10), Some(RED), "gap at x={}", x);
        }
        // Outside the stroke width
        assert_eq!(canvas.pixel(20, 15), Some(BACKGROUND));
        assert_eq!(canvas.pixel(20, 4), Some(BACKGROUND));
    }

    #[test]
    fn test_partial_coverage_blends() {
        let mut canvas = Canvas::new(10, 10, Rgba([0, 0, 0, 255]));
        canvas.draw_dot(Point::new(5.0, 5.0), 3.0, Rgba([255, 255, 255, 255]));
        // (6, 5) samples at distance ~1.58 from center: coverage ~0.42
        let edge = canvas.pixel(6, 5).unwrap();
        assert!(edge[0] > 0 && edge[0] < 255, "expected blended edge, got {:?}", edge);
        assert_eq!(edge[3], 255);
    }

    #[test]
    fn test_clear_restores_background() {
        let mut canvas = Canvas::new(10, 10, BACKGROUND);
        canvas.draw_line(Point::new(0.0, 0.0), Point::new(10.0, 10.0), 3.0, RED);
        assert!(!canvas.is_blank());
        canvas.clear();
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_resize_preserves_content() {
        let mut canvas = Canvas::new(40, 30, BACKGROUND);
        canvas.draw_dot(Point::new(10.0, 10.0), 6.0, RED);
        canvas.resize(80, 60);
        assert_eq!(canvas.dimensions(), (80, 60));
        // Content scales with the raster: (10, 10) -> (20, 20)
        assert_eq!(canvas.pixel(20, 20), Some(RED));
        assert_eq!(canvas.pixel(70, 50), Some(BACKGROUND));
    }

    #[test]
    fn test_oversized_sides_are_clamped() {
        let mut canvas = Canvas::new(4_000_000_000, 2, BACKGROUND);
        assert_eq!(canvas.dimensions(), (MAX_CANVAS_SIDE, 2));

        canvas.resize(2, u32::MAX);
        assert_eq!(canvas.dimensions(), (2, MAX_CANVAS_SIDE));
    }

    #[test]
    fn test_resize_same_size_is_noop() {
        let mut canvas = Canvas::new(10, 10, BACKGROUND);
        canvas.draw_dot(Point::new(3.0, 3.0), 2.0, RED);
        let before = canvas.clone();
        canvas.resize(10, 10);
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_resize_from_empty() {
        let mut canvas = Canvas::new(0, 0, BACKGROUND);
        canvas.resize(4, 3);
        assert_eq!(canvas.dimensions(), (4, 3));
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_to_png_magic() {
        let canvas = Canvas::new(4, 3, BACKGROUND);
        let png = canvas.to_png().unwrap();
        assert_eq!(&png[0..4], &[0x89, 0x50, 0x4E, 0x47]);

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(*decoded.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_to_png_empty_canvas_errors() {
        let canvas = Canvas::new(0, 5, BACKGROUND);
        assert!(matches!(canvas.to_png(), Err(CanvasError::Empty { width: 0, height: 5 })));
    }

    #[test]
    fn test_data_url_prefix() {
        let canvas = Canvas::new(2, 2, BACKGROUND);
        let url = canvas.to_data_url().unwrap();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));
        assert_eq!(&url[PNG_DATA_URL_PREFIX.len()..], canvas.to_base64_png().unwrap());
    }
}
