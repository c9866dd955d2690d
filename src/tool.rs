//! Drawing tools and brush settings

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color::{BACKGROUND, DEFAULT_BRUSH};

/// Which tool the pointer draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
}

impl Tool {
    /// Smallest and largest brush size, inclusive.
    pub fn size_range(self) -> (u32, u32) {
        match self {
            Tool::Pencil => (1, 20),
            Tool::Eraser => (1, 50),
        }
    }

    pub fn default_size(self) -> u32 {
        match self {
            Tool::Pencil => 5,
            Tool::Eraser => 20,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Eraser => "Eraser",
        }
    }
}

impl std::str::FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pencil" => Ok(Tool::Pencil),
            "eraser" => Ok(Tool::Eraser),
            other => Err(format!("unknown tool '{}', expected pencil or eraser", other)),
        }
    }
}

/// Current tool plus the settings it draws with.
///
/// Pencil and eraser remember their own sizes, so switching tools keeps
/// each one's last size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    tool: Tool,
    color: Rgba<u8>,
    pencil_size: u32,
    eraser_size: u32,
    background: Rgba<u8>,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(BACKGROUND)
    }
}

impl Brush {
    /// A pencil with default sizes; the eraser paints `background`.
    pub fn new(background: Rgba<u8>) -> Self {
        Self {
            tool: Tool::Pencil,
            color: DEFAULT_BRUSH,
            pencil_size: Tool::Pencil.default_size(),
            eraser_size: Tool::Eraser.default_size(),
            background,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// The chosen chalk color (kept while erasing).
    pub fn color(&self) -> Rgba<u8> {
        self.color
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.color = color;
    }

    /// Size of `tool`, independent of which tool is active.
    pub fn size_of(&self, tool: Tool) -> u32 {
        match tool {
            Tool::Pencil => self.pencil_size,
            Tool::Eraser => self.eraser_size,
        }
    }

    /// Size of the active tool.
    pub fn size(&self) -> u32 {
        self.size_of(self.tool)
    }

    /// Set the active tool's size, clamped to its range. Returns the size applied.
    pub fn set_size(&mut self, size: u32) -> u32 {
        self.set_size_of(self.tool, size)
    }

    /// Set a specific tool's size, clamped to its range. Returns the size applied.
    pub fn set_size_of(&mut self, tool: Tool, size: u32) -> u32 {
        let (min, max) = tool.size_range();
        let size = size.clamp(min, max);
        match tool {
            Tool::Pencil => self.pencil_size = size,
            Tool::Eraser => self.eraser_size = size,
        }
        size
    }

    /// The color the active tool puts on the canvas.
    pub fn paint(&self) -> Rgba<u8> {
        match self.tool {
            Tool::Pencil => self.color,
            Tool::Eraser => self.background,
        }
    }
}
