//! Core glyph-metrics cache for the `abc_cache` debugger plugin.
//!
//! This crate holds everything the hooks need except the hooks themselves:
//! the font registry and its per-font glyph ABC width caches, the active-font
//! tracker, the single-owner thread gate, the diagnostics report, and the
//! single-slot system-parameters cache. It contains no platform-specific
//! code; the operating system is reached through the [`Gdi`] trait.

#![deny(unsafe_code)]

pub mod context;
pub mod font;
pub mod gate;
pub mod glyph;
pub mod handle;
pub mod param_cache;
pub mod report;
pub mod tracker;

pub use context::{Gdi, HookContext};
pub use font::{FontData, FontId, FontRegistry, FontStats};
pub use gate::ThreadGate;
pub use glyph::{Abc, GlyphQuery};
pub use handle::{FontHandle, ObjectHandle, SurfaceHandle};
pub use param_cache::{ParamCache, ParamStats};
pub use report::Report;
pub use tracker::ActiveFont;
