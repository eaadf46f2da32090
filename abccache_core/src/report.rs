//! Diagnostics report printed by the plugin command.

use std::fmt;

use crate::font::{FontRegistry, FontStats};
use crate::handle::FontHandle;
use crate::param_cache::ParamStats;

/// Point-in-time copy of every counter the plugin keeps.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub fonts: Vec<(FontHandle, FontStats)>,
    pub params: Option<ParamStats>,
}

impl Report {
    pub fn collect(registry: &FontRegistry, params: Option<ParamStats>) -> Self {
        Self {
            fonts: registry.stats().collect(),
            params,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "font count: {}", self.fonts.len())?;
        for (font, stats) in &self.fonts {
            writeln!(f)?;
            writeln!(f, "{font}")?;
            writeln!(
                f,
                "count: {}, hits: {}, misses: {}",
                stats.count, stats.hits, stats.misses
            )?;
        }
        if let Some(params) = self.params {
            let state = if params.cached { "cached" } else { "uncached" };
            writeln!(f)?;
            writeln!(
                f,
                "SystemParametersInfoW({:#x}): {state}, hits: {}, misses: {}",
                params.action, params.hits, params.misses
            )?;
        }
        Ok(())
    }
}
