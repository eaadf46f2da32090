//! Single-slot cache for one process-constant `SystemParametersInfoW` query.
//!
//! The first successful real call for the cached action has its output
//! buffer copied and retained; later calls with a buffer of exactly the
//! retained length are answered from that copy. Any other length, and any
//! other action, goes to the real implementation.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// `SPI_GETNONCLIENTMETRICS`: the non-client area metrics, including the
/// caption/menu/status/message `LOGFONTW`s.
pub const SPI_GETNONCLIENTMETRICS: u32 = 0x0029;

#[derive(Debug, Default)]
pub struct ParamCache {
    action: Option<u32>,
    slot: OnceLock<Box<[u8]>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Snapshot of the cache state for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamStats {
    pub action: u32,
    /// Whether a result has been retained yet.
    pub cached: bool,
    pub hits: u64,
    pub misses: u64,
}

impl ParamCache {
    /// Cache results of `action`.
    pub fn new(action: u32) -> Self {
        Self {
            action: Some(action),
            ..Self::default()
        }
    }

    /// A cache that forwards everything.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// The cached action, if enabled.
    pub fn action(&self) -> Option<u32> {
        self.action
    }

    /// Whether calls for `action` are candidates for caching.
    pub fn caches(&self, action: u32) -> bool {
        self.action == Some(action)
    }

    /// Answer a query for `action` into `buf`, calling `original` when the
    /// retained copy cannot serve it.
    ///
    /// `original` fills the buffer it is given and reports success.
    pub fn query<F>(&self, action: u32, buf: &mut [u8], original: F) -> bool
    where
        F: FnOnce(&mut [u8]) -> bool,
    {
        if !self.caches(action) || buf.is_empty() {
            return original(buf);
        }

        if let Some(saved) = self.slot.get() {
            if saved.len() == buf.len() {
                buf.copy_from_slice(saved);
                self.hits.fetch_add(1, Ordering::Relaxed);
                return true;
            }
            log::debug!(
                "param cache: size {} does not match retained {}, forwarding",
                buf.len(),
                saved.len()
            );
            self.misses.fetch_add(1, Ordering::Relaxed);
            return original(buf);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        if !original(buf) {
            return false;
        }
        // Another thread may have won the race; either copy is equivalent.
        if self.slot.set(Box::from(&*buf)).is_ok() {
            log::debug!("param cache: retained {} bytes for action {action:#x}", buf.len());
        }
        true
    }

    pub fn stats(&self) -> Option<ParamStats> {
        let action = self.action?;
        Some(ParamStats {
            action,
            cached: self.slot.get().is_some(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        })
    }
}
