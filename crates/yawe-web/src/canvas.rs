#![forbid(unsafe_code)]

//! `DrawingSurface` over a canvas 2D context.

use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yawe_style::{Color, FontDescriptor};
use yawe_text::{DrawingSurface, Rect};

use crate::SurfaceError;
use crate::font_state::FontState;

/// Paints onto one `<canvas>` element.
#[derive(Debug)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    font: FontState,
}

impl CanvasSurface {
    /// Attach to `canvas`, acquiring its 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(SurfaceError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::UnexpectedContext)?;
        Ok(Self {
            canvas,
            ctx,
            font: FontState::new(),
        })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Resize the backing store. The context state (including the font)
    /// resets, so the next `set_font` is always applied.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.font.invalidate();
    }

    /// Clear the whole canvas before a repaint.
    pub fn clear(&self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }
}

impl DrawingSurface for CanvasSurface {
    fn set_font(&mut self, font: &FontDescriptor) {
        if let Some(css) = self.font.switch_to(font) {
            self.ctx.set_font(css);
        }
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width() as f32,
            Err(err) => {
                warn!(?err, "measureText failed");
                0.0
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.width),
            f64::from(rect.height),
        );
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_string());
        if let Err(err) = self.ctx.fill_text(text, f64::from(x), f64::from(y)) {
            warn!(?err, "fillText failed");
        }
    }
}
