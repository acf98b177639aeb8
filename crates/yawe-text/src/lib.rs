#![forbid(unsafe_code)]

//! Measurement, wrapping and painting of styled text for the yawe editor.
//!
//! # Role in yawe
//! `yawe-text` is the layout engine. It owns the document model (runs,
//! lines, documents), the selection model and the greedy line breaker, and
//! paints through a host-supplied [`DrawingSurface`].
//!
//! # Primary responsibilities
//! - **GlyphWidthCache**: per-font character widths, measured once.
//! - **StyledRun**: characters plus widths in lockstep, one style.
//! - **WrappedLine**: greedy wrapping shared by height, paint and caret.
//! - **SelectionModel**: (line, run, char) endpoints with direction.
//! - **LayoutDriver**: one repaint pass over a [`Document`].
//!
//! # How it fits in the system
//! `yawe-runtime` holds one instance of each model per editor and drives
//! it from host events; `yawe-web` provides the canvas-backed surface.

pub mod cache;
pub mod document;
pub mod driver;
pub mod error;
pub mod line;
pub mod run;
pub mod selection;
pub mod surface;

pub use cache::{CacheStats, GlyphWidthCache, Measurer};
pub use document::Document;
pub use driver::{LayoutDriver, PaintState, RepaintStats};
pub use error::{LayoutError, Result};
pub use line::{CaretPlacement, RowSegment, VisualRow, WrappedLine};
pub use run::{RunFont, RunSelection, StyledRun};
pub use selection::{LineSelection, SelectionModel, TextPoint};
pub use surface::{DrawCommand, DrawingSurface, HeadlessSurface, Rect};
