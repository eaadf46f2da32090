//! x64dbg plugin that memoizes `GetCharABCWidthsI` per font.
//!
//! The debugger's GUI asks gdi32 for glyph ABC widths on every repaint of
//! every text view. This plugin hooks `SelectObject` and `GetCharABCWidthsI`
//! (plus, optionally, one `SystemParametersInfoW` query), answers repeated
//! queries from a per-font cache kept by `abccache_core`, and registers a
//! command that prints the cache counters to the debugger log.
//!
//! Everything Win32-specific lives behind `cfg(windows)`; configuration and
//! logging are plain Rust and are tested on every platform.

pub mod config;
pub mod error;
pub mod logger;

#[cfg(windows)]
mod hooks;
#[cfg(windows)]
mod host;
#[cfg(windows)]
mod platform_windows;
#[cfg(windows)]
mod plugin;

pub use config::Config;
pub use error::PluginError;

/// Name reported to the debugger and used as the log prefix.
pub const PLUGIN_NAME: &str = "abc_cache";

/// Plugin version reported to the debugger.
pub const PLUGIN_VERSION: i32 = 1;
