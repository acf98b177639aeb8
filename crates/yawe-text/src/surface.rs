#![forbid(unsafe_code)]

//! The drawing surface the layout engine measures and paints through.
//!
//! The engine never owns a surface: hosts hand one in for each measurement
//! or paint call. [`HeadlessSurface`] is a deterministic in-memory surface
//! for tests and tooling that records every call.
//!
//! # Example
//!
//! ```
//! use yawe_style::{Color, FontDescriptor};
//! use yawe_text::surface::{DrawingSurface, HeadlessSurface};
//!
//! let mut surface = HeadlessSurface::new();
//! surface.set_font(&FontDescriptor::parse("20px serif").unwrap());
//! assert_eq!(surface.measure_text("Hi"), 20.0);
//! surface.fill_text("Hi", 0.0, 24.0, Color::BLACK);
//! assert_eq!(surface.painted_text(), vec!["Hi"]);
//! ```

use unicode_width::UnicodeWidthChar;
use yawe_style::{Color, FontDescriptor};

/// An axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// 2D surface capabilities the engine relies on.
///
/// Mirrors the subset of a canvas 2D context the editor uses: a current
/// font, text measurement, and two fill operations.
pub trait DrawingSurface {
    /// Make `font` the current font for measurement and text fills.
    fn set_font(&mut self, font: &FontDescriptor);

    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f32;

    /// Fill `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Fill `text` with its baseline origin at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color);
}

/// One recorded call on a [`HeadlessSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetFont(String),
    FillRect { rect: Rect, color: Color },
    FillText {
        text: String,
        x: f32,
        y: f32,
        color: Color,
    },
}

/// Deterministic recording surface.
///
/// Metrics: every character advances `display_width(ch) × size / 2` pixels
/// (so ASCII at 20px is 10px wide, CJK 20px), plus one pixel per visible
/// character when the font is bold. Zero-width characters measure 0.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    font: Option<FontDescriptor>,
    commands: Vec<DrawCommand>,
    measure_calls: usize,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of a single character under the headless metrics.
    #[must_use]
    pub fn char_advance(font: &FontDescriptor, ch: char) -> f32 {
        let cells = ch.width().unwrap_or(0);
        if cells == 0 {
            return 0.0;
        }
        let bold = if font.flags().contains(yawe_style::StyleFlags::BOLD) {
            1.0
        } else {
            0.0
        };
        cells as f32 * font.size() as f32 / 2.0 + bold
    }

    /// Current font, if one was set.
    #[must_use]
    pub fn font(&self) -> Option<&FontDescriptor> {
        self.font.as_ref()
    }

    /// Number of `measure_text` calls so far.
    #[must_use]
    pub fn measure_calls(&self) -> usize {
        self.measure_calls
    }

    /// All recorded paint and font calls, oldest first.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded calls.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Text of every `fill_text` call, in order.
    #[must_use]
    pub fn painted_text(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every filled rectangle with its color, in order.
    #[must_use]
    pub fn filled_rects(&self) -> Vec<(Rect, Color)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSurface for HeadlessSurface {
    fn set_font(&mut self, font: &FontDescriptor) {
        self.commands.push(DrawCommand::SetFont(font.to_string()));
        self.font = Some(font.clone());
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        self.measure_calls += 1;
        match &self.font {
            Some(font) => text.chars().map(|ch| Self::char_advance(font, ch)).sum(),
            None => 0.0,
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }
}
