#![forbid(unsafe_code)]

//! Browser backend for yawe.
//!
//! # Role in yawe
//! `yawe-web` implements [`DrawingSurface`](yawe_text::DrawingSurface) on
//! top of a `<canvas>` 2D context, so an
//! [`EditorState`](https://docs.rs/yawe-runtime) can measure and paint in a
//! browser. Element attributes, DOM events and shadow-DOM templating stay
//! with the host page.
//!
//! The canvas surface only exists on `wasm32`; the font bookkeeping it
//! relies on is plain Rust and builds everywhere.

pub mod font_state;

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use font_state::FontState;

/// Failures while attaching to a canvas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// `getContext("2d")` threw or returned null.
    #[error("canvas 2d context unavailable")]
    ContextUnavailable,
    /// The returned object was not a `CanvasRenderingContext2d`.
    #[error("canvas context has unexpected type")]
    UnexpectedContext,
}
