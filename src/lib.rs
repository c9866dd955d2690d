//! ChalkX - a freehand blackboard with an image analysis proxy
//!
//! This library provides:
//! - A pixel canvas with pencil and eraser strokes, resizing and PNG export
//! - Board state for one drawing session, including the analysis request
//! - A proxy server forwarding `POST /api/analyze` to the analysis backend
//! - Browser bindings (feature `wasm`)

pub mod analysis;
pub mod board;
pub mod canvas;
pub mod cli;
pub mod color;
pub mod config;
pub mod geometry;
pub mod output;
pub mod shapes;
pub mod sketch;
pub mod tool;

#[cfg(feature = "server")]
pub mod client;
#[cfg(feature = "server")]
pub mod logging;
#[cfg(feature = "server")]
pub mod proxy;

#[cfg(feature = "wasm")]
pub mod wasm;
