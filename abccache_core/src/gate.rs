//! Single-owner thread gate.
//!
//! The first thread to issue a metrics query becomes the owner for the rest
//! of the process lifetime. Only the owner participates in caching; every
//! other thread is forwarded to the real implementation untouched.

use std::sync::atomic::{AtomicU32, Ordering};

/// Sentinel for "no owner yet". Windows never hands out thread id 0.
const UNSET: u32 = 0;

#[derive(Debug, Default)]
pub struct ThreadGate {
    owner: AtomicU32,
}

impl ThreadGate {
    pub const fn new() -> Self {
        Self {
            owner: AtomicU32::new(UNSET),
        }
    }

    /// Gate check for the metrics hook.
    ///
    /// Claims ownership for `thread` if nobody owns the gate yet, then
    /// reports whether `thread` is the owner.
    pub fn admit_query(&self, thread: u32) -> bool {
        match self
            .owner
            .compare_exchange(UNSET, thread, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                log::debug!("abc cache: thread {thread} owns the glyph cache");
                true
            }
            Err(owner) => owner == thread,
        }
    }

    /// Gate check for the selection hook. Never claims ownership.
    pub fn admit_selection(&self, thread: u32) -> bool {
        let owner = self.owner.load(Ordering::Acquire);
        owner != UNSET && owner == thread
    }

    /// Owning thread, if one has been captured.
    pub fn owner(&self) -> Option<u32> {
        match self.owner.load(Ordering::Acquire) {
            UNSET => None,
            owner => Some(owner),
        }
    }
}
