//! LRU (Least Recently Used) replacement policy.
//!
//! Hardware LRU is usually a counter with an auto-loading mechanism; here a
//! monotonic counter plus a VPN → last-touch map simulates it. Not something
//! to drop into a real OS or hardware.

use std::collections::BTreeMap;

use crate::common::{PageFlags, PageIdx, Result};
use crate::memory::Memory;

/// Evicts the page with the least-recent logical timestamp.
pub struct Lru<M: Memory> {
    memory: M,

    /// VPN → logical timestamp of its most recent access.
    ///
    /// BTreeMap so the minimum scan visits VPNs in ascending order, which
    /// fixes the tie-break deterministically.
    stamps: BTreeMap<PageIdx, u64>,

    /// Increments on every access, hit or fault.
    counter: u64,
}

impl<M: Memory> Lru<M> {
    /// Create an LRU policy bound to `memory`.
    pub fn new(memory: M) -> Self {
        Self {
            memory,
            stamps: BTreeMap::new(),
            counter: 0,
        }
    }

    /// Access a page, faulting and evicting as needed.
    ///
    /// The timestamp is recorded before the contract call, so the faulting
    /// page itself always carries the newest stamp.
    ///
    /// # Errors
    /// Propagates a fault that survives the load/retry, plus any fatal
    /// contract error.
    pub fn access(&mut self, vpn: PageIdx, rights: PageFlags) -> Result<()> {
        self.stamps.insert(vpn, self.counter);
        self.counter += 1;

        if self.memory.access(vpn, rights).is_ok() {
            return Ok(());
        }

        let mut ppn = self.memory.free_ppage();
        let mut evicted = None;
        if !ppn.is_valid() {
            let lru = self.least_recent();
            ppn = self.memory.ppage(lru);
            self.stamps.remove(&lru);
            evicted = Some(lru);
        }
        self.memory.load(vpn, ppn, evicted)?;
        self.memory.access(vpn, rights)?;

        Ok(())
    }

    /// The resident VPN with the minimum timestamp.
    ///
    /// # Panics
    /// Panics if the map holds no candidate while no frame is free. That is
    /// an invariant violation, unreachable with `num_ppages() > 0` and
    /// correct bookkeeping, so it is treated as a defect rather than an
    /// error.
    fn least_recent(&self) -> PageIdx {
        self.stamps
            .iter()
            // Every entry except the page being faulted in is resident, and
            // that page carries the newest stamp, so the minimum is always a
            // resident page when one exists.
            .min_by_key(|&(_, &stamp)| stamp)
            .map(|(&vpn, _)| vpn)
            .unwrap_or_else(|| panic!("no free frame and no page to evict"))
    }

    /// The bound memory instance.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Consume the policy, returning the memory instance.
    pub fn into_memory(self) -> M {
        self.memory
    }
}
