//! Hook context: the state shared by the selection and metrics hooks.
//!
//! One `HookContext` exists per loaded plugin. It bundles the thread gate,
//! the font registry with its active-font tracker, and the parameter cache.
//! The registry sits behind a mutex that the hooks only ever `try_lock`:
//! the owning thread never waits, and if the lock is taken (diagnostics on
//! the command thread, or a reentrant call from inside the real
//! implementation) the call is forwarded uncached.
//!
//! Forwarded calls are not counted. A metrics query that arrives while the
//! diagnostics command holds the lock appears in neither `count`, `hits`
//! nor `misses`, and a selection that arrives then leaves the tracker
//! flagged stale so the next query re-resolves the surface's font.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::font::FontRegistry;
use crate::gate::ThreadGate;
use crate::glyph::{Abc, GlyphQuery};
use crate::handle::{FontHandle, ObjectHandle, SurfaceHandle};
use crate::param_cache::ParamCache;
use crate::report::Report;
use crate::tracker::ActiveFont;

/// The operating system as seen by the hooks.
///
/// The plugin implements this over gdi32 and the detour trampolines; tests
/// use a recording fake.
pub trait Gdi {
    /// Font currently selected into `surface`.
    fn current_font(&self, surface: SurfaceHandle) -> FontHandle;

    /// `Some` if `object` is a font.
    fn as_font(&self, object: ObjectHandle) -> Option<FontHandle>;

    /// Forward a metrics query to the real `GetCharABCWidthsI`.
    ///
    /// The request length is `out.len()`.
    fn char_abc_widths(
        &self,
        surface: SurfaceHandle,
        query: &GlyphQuery<'_>,
        out: &mut [Abc],
    ) -> bool;
}

/// Registry plus tracker, only touched by the owning thread (and by the
/// diagnostics command while it holds the lock).
#[derive(Debug, Default)]
struct GlyphCache {
    registry: FontRegistry,
    active: ActiveFont,
}

#[derive(Debug, Default)]
pub struct HookContext {
    gate: ThreadGate,
    cache: Mutex<GlyphCache>,
    /// Set when a selection could not update the tracker.
    tracker_stale: AtomicBool,
    params: ParamCache,
}

impl HookContext {
    pub fn new(params: ParamCache) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn gate(&self) -> &ThreadGate {
        &self.gate
    }

    pub fn params(&self) -> &ParamCache {
        &self.params
    }

    /// Called after a successful real `SelectObject(surface, object)`.
    ///
    /// On the owning thread a selected font becomes the active font for
    /// `surface`, registering it if it is new. Other objects and other
    /// threads leave the tracker alone.
    pub fn object_selected<G: Gdi>(
        &self,
        gdi: &G,
        thread: u32,
        surface: SurfaceHandle,
        object: ObjectHandle,
    ) {
        if !self.gate.admit_selection(thread) {
            return;
        }
        let Some(font) = gdi.as_font(object) else {
            return;
        };
        let Some(mut cache) = self.cache.try_lock() else {
            self.tracker_stale.store(true, Ordering::Relaxed);
            return;
        };
        let id = cache.registry.get_or_insert(font);
        cache.active.set(surface, id);
    }

    /// Hooked `GetCharABCWidthsI`.
    ///
    /// Serves the whole batch from the per-font cache when every glyph is
    /// present, otherwise forwards the full batch and caches its result.
    ///
    /// The request length is `out.len()`. An explicit index array of any
    /// other length is forwarded uncached.
    pub fn char_abc_widths<G: Gdi>(
        &self,
        gdi: &G,
        thread: u32,
        surface: SurfaceHandle,
        query: GlyphQuery<'_>,
        out: &mut [Abc],
    ) -> bool {
        if !self.gate.admit_query(thread) {
            return gdi.char_abc_widths(surface, &query, out);
        }
        if query.indices.is_some_and(|indices| indices.len() != out.len()) {
            log::debug!("abc cache: index array does not match output length, forwarding");
            return gdi.char_abc_widths(surface, &query, out);
        }
        let Some(mut guard) = self.cache.try_lock() else {
            return gdi.char_abc_widths(surface, &query, out);
        };
        let cache = &mut *guard;

        if self.tracker_stale.swap(false, Ordering::Relaxed) {
            cache.active.clear();
        }

        let id = match cache.active.resolve(surface) {
            Some(id) => id,
            None => {
                let id = cache.registry.get_or_insert(gdi.current_font(surface));
                cache.active.set(surface, id);
                id
            }
        };

        // From here on only `id` is used; the tracker may be overwritten.
        let font = cache.registry.get_mut(id);
        font.record_query();

        if font.lookup(&query, out) {
            font.record_hit();
            return true;
        }

        font.record_miss();
        if !gdi.char_abc_widths(surface, &query, out) {
            return false;
        }
        cache.registry.get_mut(id).store(&query, out);
        true
    }

    /// Hooked `SystemParametersInfoW` for a caller buffer.
    pub fn system_parameters<F>(&self, action: u32, buf: &mut [u8], original: F) -> bool
    where
        F: FnOnce(&mut [u8]) -> bool,
    {
        self.params.query(action, buf, original)
    }

    /// Snapshot every counter. Blocks while the owning thread is inside a
    /// metrics call.
    pub fn report(&self) -> Report {
        let cache = self.cache.lock();
        Report::collect(&cache.registry, self.params.stats())
    }

    /// Release every cached font. Used on plugin teardown.
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        cache.active.clear();
        cache.registry.clear();
    }
}
