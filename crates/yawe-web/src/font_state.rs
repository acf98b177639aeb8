#![forbid(unsafe_code)]

//! Tracks the font last assigned to a context.
//!
//! Assigning `ctx.font` makes the browser reparse the CSS font string, and
//! the engine sets the font before every measurement and paint. Skipping
//! assignments that would not change anything keeps repaints cheap.

use yawe_style::FontDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontState {
    current: Option<String>,
}

impl FontState {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// CSS font string currently applied, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Record `font` as current. Returns the CSS string to assign, or `None`
    /// when the context already uses it.
    pub fn switch_to(&mut self, font: &FontDescriptor) -> Option<&str> {
        let css = font.to_string();
        if self.current.as_deref() == Some(css.as_str()) {
            return None;
        }
        self.current = Some(css);
        self.current.as_deref()
    }

    /// Forget the current font, e.g. after the canvas was resized and its
    /// state reset.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
