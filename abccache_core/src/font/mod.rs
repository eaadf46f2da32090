//! Per-font glyph width caches and the registry that owns them.

mod registry;

pub use registry::{FontId, FontRegistry};

use std::collections::HashMap;

use crate::glyph::{Abc, GlyphQuery};

/// Cache and counters for one font handle.
///
/// `count` is bumped once per attributed query; every query then lands in
/// exactly one of `hits` or `misses`, so `count == hits + misses` holds
/// between calls.
#[derive(Debug, Default)]
pub struct FontData {
    count: u64,
    hits: u64,
    misses: u64,
    glyphs: HashMap<u32, Abc>,
}

/// Snapshot of a font's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontStats {
    pub count: u64,
    pub hits: u64,
    pub misses: u64,
    /// Number of distinct glyph indices cached.
    pub glyphs: usize,
}

impl FontData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute one more query to this font.
    pub fn record_query(&mut self) {
        self.count += 1;
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Fill `out` from the cache, left to right.
    ///
    /// Stops at the first uncached glyph and returns `false`; the records
    /// before the gap have already been written. An empty request is fully
    /// cached.
    pub fn lookup(&self, query: &GlyphQuery<'_>, out: &mut [Abc]) -> bool {
        for (position, slot) in out.iter_mut().enumerate() {
            match self.glyphs.get(&query.glyph(position)) {
                Some(abc) => *slot = *abc,
                None => return false,
            }
        }
        true
    }

    /// Store every requested glyph from a filled output buffer, overwriting
    /// existing entries.
    pub fn store(&mut self, query: &GlyphQuery<'_>, filled: &[Abc]) {
        self.glyphs.reserve(filled.len());
        for (position, abc) in filled.iter().enumerate() {
            self.glyphs.insert(query.glyph(position), *abc);
        }
    }

    pub fn stats(&self) -> FontStats {
        FontStats {
            count: self.count,
            hits: self.hits,
            misses: self.misses,
            glyphs: self.glyphs.len(),
        }
    }
}
