//! FIFO (First-In-First-Out) replacement policy.

use std::collections::VecDeque;

use crate::common::{PageFlags, PageIdx, Result};
use crate::memory::Memory;

/// Evicts pages in the order they were loaded.
///
/// The queue tracks currently resident VPNs, front = oldest load. Re-accessing
/// a resident page does not reorder it; only load order matters.
pub struct Fifo<M: Memory> {
    memory: M,

    /// Resident VPNs in load order (front = oldest).
    queue: VecDeque<PageIdx>,
}

impl<M: Memory> Fifo<M> {
    /// Create a FIFO policy bound to `memory`.
    pub fn new(memory: M) -> Self {
        Self {
            memory,
            queue: VecDeque::new(),
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

        let (ppn, evicted) = self.find_victim();
        self.memory.load(vpn, ppn, evicted)?;
        if let Some(evicted_vpn) = evicted {
            // Eviction goes by VPN value, not queue position.
            self.queue.retain(|&v| v != evicted_vpn);
        }
        self.queue.push_back(vpn);
        self.memory.access(vpn, rights)?;

        Ok(())
    }

    /// Pick the frame to load into: a free frame if one exists, otherwise
    /// the frame of the oldest resident page (dequeued as the victim).
    fn find_victim(&mut self) -> (PageIdx, Option<PageIdx>) {
        let free = self.memory.free_ppage();
        if free.is_valid() {
            return (free, None);
        }

        let victim = self
            .queue
            .pop_front()
            .unwrap_or_else(|| panic!("no free frame and no page to evict"));
        (self.memory.ppage(victim), Some(victim))
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
