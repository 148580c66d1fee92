//! Clock (second chance) replacement policy.

use crate::common::{PageFlags, PageIdx, Result};
use crate::memory::Memory;

/// Fixed-capacity circular buffer of resident VPNs with a rotating hand.
///
/// A plain `Vec` plus an integer hand index: insertion and overwrite are
/// index arithmetic, so there is no iterator to invalidate. The ring grows
/// one slot per insert until physical memory is full and never shrinks.
#[derive(Debug)]
pub(crate) struct ClockRing {
    slots: Vec<PageIdx>,
    hand: usize,
}

impl ClockRing {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            hand: 0,
        }
    }

    /// Insert a VPN at the hand position and advance past it.
    ///
    /// The hand keeps pointing at the slot it pointed at before, which is
    /// now one position further along; scan order is preserved.
    pub(crate) fn insert(&mut self, vpn: PageIdx) {
        if self.slots.is_empty() {
            self.slots.push(vpn);
            self.hand = 0;
        } else {
            self.slots.insert(self.hand, vpn);
            self.hand = (self.hand + 1) % self.slots.len();
        }
    }

    /// The VPN under the hand.
    ///
    /// # Panics
    /// Panics if the ring is empty. Scans only run once the ring holds
    /// every frame.
    pub(crate) fn current(&self) -> PageIdx {
        self.slots[self.hand]
    }

    /// Replace the VPN under the hand.
    pub(crate) fn set_current(&mut self, vpn: PageIdx) {
        self.slots[self.hand] = vpn;
    }

    /// Move the hand one slot forward, wrapping.
    pub(crate) fn advance(&mut self) {
        self.hand = (self.hand + 1) % self.slots.len();
    }

    /// Current hand position, for detecting a completed sweep.
    pub(crate) fn position(&self) -> usize {
        self.hand
    }
}

/// Circular approximate-LRU scan over the ACCESSED bit.
///
/// On eviction the hand sweeps the ring: a clear ACCESSED bit makes a page
/// the victim; a set bit is cleared (the "second chance") and the hand moves
/// on. Because the first full sweep clears every bit, the second sweep is
/// guaranteed to find a victim - the scan is bounded by construction.
pub struct Clock<M: Memory> {
    memory: M,
    ring: ClockRing,
}

impl<M: Memory> Clock<M> {
    /// Create a Clock policy bound to `memory`.
    pub fn new(memory: M) -> Self {
        let capacity = memory.num_ppages();
        Self {
            memory,
            ring: ClockRing::with_capacity(capacity),
        }
    }

    /// Access a page, faulting and evicting as needed.
    ///
    /// # Errors
    /// Propagates a fault that survives the load/retry, plus any fatal
    /// contract error.
    pub fn access(&mut self, vpn: PageIdx, rights: PageFlags) -> Result<()> {
        if self.memory.access(vpn, rights).is_ok() {
            return Ok(());
        }

        let (ppn, evicted) = self.find_victim(vpn);
        self.memory.load(vpn, ppn, evicted)?;
        self.memory.access(vpn, rights)?;

        Ok(())
    }

    /// Pick the frame to load `vpn` into.
    ///
    /// A free frame grows the ring; otherwise the two-sweep scan selects a
    /// victim whose ring slot is overwritten in place.
    fn find_victim(&mut self, vpn: PageIdx) -> (PageIdx, Option<PageIdx>) {
        let free = self.memory.free_ppage();
        if free.is_valid() {
            self.ring.insert(vpn);
            return (free, None);
        }

        let start = self.ring.position();
        for _sweep in 0..2 {
            loop {
                let candidate = self.ring.current();
                let flags = self.memory.vflag(candidate);
                if !flags.contains(PageFlags::ACCESSED) {
                    let ppn = self.memory.ppage(candidate);
                    self.ring.set_current(vpn);
                    self.ring.advance();
                    return (ppn, Some(candidate));
                }
                // Second chance: strip the bit and move on.
                self.memory
                    .set_vflag(candidate, flags.without(PageFlags::ACCESSED));
                self.ring.advance();
                if self.ring.position() == start {
                    break;
                }
            }
        }
        // Sweep one cleared every ACCESSED bit, so sweep two must hit.
        unreachable!("clock scan did not terminate within two sweeps");
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
