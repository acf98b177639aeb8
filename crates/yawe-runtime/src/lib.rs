#![forbid(unsafe_code)]

//! Per-editor runtime for yawe.
//!
//! # Role in yawe
//! `yawe-runtime` turns the layout engine into a usable editor instance.
//! Each [`EditorState`] owns its configuration, document, selection, glyph
//! width cache and timers; instances share nothing.
//!
//! # Primary responsibilities
//! - **EditorConfig**: validated, immutable settings and host attributes.
//! - **ResizeDebouncer / BlinkTimer**: cancelable deadlines polled by the host.
//! - **EditorState**: focus, typing, selection and repaint entry points.
//!
//! # How it fits in the system
//! Hosts (the canvas frontend in `yawe-web`, or tests with a
//! [`HeadlessSurface`](yawe_text::HeadlessSurface)) forward events and
//! call [`EditorState::repaint`] whenever a tick or edit asks for it.

pub mod config;
pub mod editor;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod scheduler;

pub use config::{ATTRIBUTES, ConfigError, EditorConfig};
pub use editor::{EditorState, TickOutcome};
pub use error::{EditorError, Result};
pub use scheduler::{BlinkTimer, ResizeAction, ResizeDebouncer, ScheduledTask};
