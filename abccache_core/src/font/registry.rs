//! Font handle → `FontData` registry with index-stable storage.
//!
//! Records are appended to a `Vec` and never removed, so a `FontId` handed
//! out once stays valid for the registry's lifetime regardless of later
//! insertions. The hash map only translates handles into ids.

use std::collections::HashMap;

use crate::handle::FontHandle;

use super::{FontData, FontStats};

/// Stable index of a record inside a `FontRegistry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(usize);

/// Owns every `FontData` observed during the process lifetime.
#[derive(Debug, Default)]
pub struct FontRegistry {
    ids: HashMap<FontHandle, FontId>,
    fonts: Vec<(FontHandle, FontData)>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of an already registered font.
    pub fn find(&self, font: FontHandle) -> Option<FontId> {
        self.ids.get(&font).copied()
    }

    /// Id for `font`, creating an empty record the first time it is seen.
    pub fn get_or_insert(&mut self, font: FontHandle) -> FontId {
        if let Some(id) = self.find(font) {
            return id;
        }
        let id = FontId(self.fonts.len());
        self.fonts.push((font, FontData::new()));
        self.ids.insert(font, id);
        log::trace!("abc cache: registered font {font}");
        id
    }

    pub fn get_mut(&mut self, id: FontId) -> &mut FontData {
        &mut self.fonts[id.0].1
    }

    /// Counters for every font, in registration order.
    pub fn stats(&self) -> impl Iterator<Item = (FontHandle, FontStats)> + '_ {
        self.fonts.iter().map(|(font, data)| (*font, data.stats()))
    }

    /// Drop every record. Outstanding `FontId`s become meaningless.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.fonts.clear();
    }
}
