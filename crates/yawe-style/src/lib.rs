#![forbid(unsafe_code)]

//! Formatting vocabulary for the yawe editor.
//!
//! This crate provides:
//! - [`Color`] and [`SelectionColors`] parsed from hex attribute values
//! - [`StyleFlags`] for bold/italic/underline emphasis
//! - [`RunColors`] for the color set a text run paints with
//! - [`FontDescriptor`] for validated font strings used as cache keys

/// Hex colors and focused/blurred pairs.
pub mod color;
/// Font descriptor grammar.
pub mod font;
/// Emphasis flags and run color sets.
pub mod style;

pub use color::{Color, ColorError, SelectionColors};
pub use font::{FontDescriptor, FontError, is_valid_family, leading_for};
pub use style::{ColorOverrides, RunColors, StyleFlags};
