//! WASM API module for browser/JS interop
//!
//! Exposes a [`WasmBoard`] the page drives from its pointer and toolbar
//! events. The page owns the `<canvas>` element and the `fetch` call; this
//! side owns the pixels and the analysis state.

use wasm_bindgen::prelude::*;

use crate::analysis::{interpret_reply, AnalysisError};
use crate::board::Board;
use crate::color::{parse_color, to_hex, PALETTE};
use crate::geometry::DisplayRect;
use crate::output::DEFAULT_DOWNLOAD_NAME;
use crate::tool::Tool;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// The blackboard as seen from JavaScript.
#[wasm_bindgen]
pub struct WasmBoard {
    board: Board,
}

#[wasm_bindgen]
impl WasmBoard {
    /// A blank board of the given raster size, each side clamped to
    /// [`MAX_CANVAS_SIDE`](crate::canvas::MAX_CANVAS_SIDE).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WasmBoard {
        WasmBoard { board: Board::new(width, height) }
    }

    /// A board sized for a container `container_width` CSS pixels wide.
    pub fn fitted(container_width: f64) -> WasmBoard {
        WasmBoard { board: Board::fitted(container_width) }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.board.canvas().width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.board.canvas().height()
    }

    /// Raw RGBA pixel data (4 bytes per pixel), ready for `ImageData`.
    pub fn pixels(&self) -> Vec<u8> {
        self.board.canvas().image().as_raw().clone()
    }

    /// `pointerdown`; `left`..`height` is the element's bounding rect.
    pub fn pointer_down(
        &mut self,
        client_x: f64,
        client_y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) {
        self.board.start_drawing(client_x, client_y, DisplayRect::new(left, top, width, height));
    }

    /// `pointermove`
    pub fn pointer_move(
        &mut self,
        client_x: f64,
        client_y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) {
        self.board.draw(client_x, client_y, DisplayRect::new(left, top, width, height));
    }

    /// `pointerup`, `pointerleave` or `pointercancel`
    pub fn pointer_up(&mut self) {
        self.board.stop_drawing();
    }

    #[wasm_bindgen(getter)]
    pub fn tool(&self) -> String {
        self.board.tool().label().to_ascii_lowercase()
    }

    /// Select `"pencil"` or `"eraser"`. Unknown names are ignored.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match name.parse::<Tool>() {
            Ok(tool) => {
                self.board.set_tool(tool);
                true
            }
            Err(_) => false,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn color(&self) -> String {
        to_hex(self.board.brush().color())
    }

    /// Set the chalk color from any CSS color. Returns false if it does not parse.
    pub fn set_color(&mut self, color: &str) -> bool {
        match parse_color(color) {
            Ok(color) => {
                self.board.set_color(color);
                true
            }
            Err(_) => false,
        }
    }

    /// Size of the active tool.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> u32 {
        self.board.brush().size()
    }

    /// Set the active tool's size; returns the size after clamping.
    pub fn set_size(&mut self, size: u32) -> u32 {
        self.board.set_size(size)
    }

    pub fn clear(&mut self) {
        self.board.clear();
    }

    /// Refit after a window resize. Returns `[width, height]`.
    pub fn fit_to_container(&mut self, container_width: f64) -> Vec<u32> {
        let (w, h) = self.board.fit_to_container(container_width);
        vec![w, h]
    }

    /// PNG `data:` URL for the download link.
    pub fn to_data_url(&self) -> Option<String> {
        self.board.canvas().to_data_url().ok()
    }

    #[wasm_bindgen(getter)]
    pub fn analyzing(&self) -> bool {
        self.board.is_analyzing()
    }

    /// JSON body for `POST /api/analyze`, or `None` while one is in flight.
    pub fn analysis_payload(&mut self) -> Option<String> {
        let request = self.board.begin_analysis().ok()?;
        match serde_json::to_string(&request) {
            Ok(json) => Some(json),
            Err(e) => {
                self.board.finish_analysis(Err(AnalysisError::InvalidBody(e.to_string())));
                None
            }
        }
    }

    /// Record the reply to the request built by [`Self::analysis_payload`].
    /// Returns true when a result was received.
    pub fn finish_analysis(&mut self, status: u16, body: &str) -> bool {
        let outcome = interpret_reply(status, body.as_bytes());
        let ok = outcome.is_ok();
        self.board.finish_analysis(outcome);
        ok
    }

    /// Record a request that never got a reply.
    pub fn fail_analysis(&mut self, message: &str) {
        self.board.finish_analysis(Err(AnalysisError::Transport(message.to_string())));
    }

    #[wasm_bindgen(getter)]
    pub fn result(&self) -> Option<String> {
        self.board.result().map(str::to_string)
    }

    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.board.error().map(str::to_string)
    }

    pub fn dismiss_error(&mut self) {
        self.board.dismiss_error();
    }
}

/// The color swatches shown in the toolbar.
#[wasm_bindgen]
pub fn palette() -> Vec<String> {
    PALETTE.iter().map(|c| c.to_string()).collect()
}

/// File name for the download link.
#[wasm_bindgen]
pub fn download_name() -> String {
    DEFAULT_DOWNLOAD_NAME.to_string()
}
