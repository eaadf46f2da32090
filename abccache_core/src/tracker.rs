//! Active-font tracker.
//!
//! Remembers which registry record belongs to the font most recently
//! selected into the most recently observed device context, so repeated
//! metrics queries on that context skip the current-font lookup.

use crate::font::FontId;
use crate::handle::SurfaceHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    surface: SurfaceHandle,
    font: FontId,
}

/// Last (surface, font record) pair observed on the owning thread.
#[derive(Debug, Default)]
pub struct ActiveFont {
    entry: Option<Entry>,
}

impl ActiveFont {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for `surface` if it is the tracked surface.
    pub fn resolve(&self, surface: SurfaceHandle) -> Option<FontId> {
        self.entry
            .filter(|e| e.surface == surface)
            .map(|e| e.font)
    }

    pub fn set(&mut self, surface: SurfaceHandle, font: FontId) {
        self.entry = Some(Entry { surface, font });
    }

    /// Forget the tracked pair; the next query re-resolves via the registry.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::ActiveFont;
    use crate::font::FontRegistry;
    use crate::handle::{FontHandle, SurfaceHandle};

    #[test]
    fn empty_tracker_resolves_nothing() {
        let tracker = ActiveFont::new();
        assert!(tracker.resolve(SurfaceHandle(1)).is_none());
    }

    #[test]
    fn resolves_only_tracked_surface() {
        let mut reg = FontRegistry::new();
        let id = reg.get_or_insert(FontHandle(0x10));

        let mut tracker = ActiveFont::new();
        tracker.set(SurfaceHandle(1), id);
        assert_eq!(tracker.resolve(SurfaceHandle(1)), Some(id));
        assert!(tracker.resolve(SurfaceHandle(2)).is_none());
    }

    #[test]
    fn set_overwrites_and_clear_resets() {
        let mut reg = FontRegistry::new();
        let a = reg.get_or_insert(FontHandle(0x10));
        let b = reg.get_or_insert(FontHandle(0x20));

        let mut tracker = ActiveFont::new();
        tracker.set(SurfaceHandle(1), a);
        tracker.set(SurfaceHandle(1), b);
        assert_eq!(tracker.resolve(SurfaceHandle(1)), Some(b));

        tracker.clear();
        assert!(tracker.resolve(SurfaceHandle(1)).is_none());
    }
}
