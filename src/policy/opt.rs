//! OPT (optimal/offline) replacement policy.
//!
//! OPT is not implementable on real hardware - it needs the future. Given
//! the complete access trace up front it evicts the resident page whose next
//! reuse is furthest away, which makes it the theoretical best case every
//! online policy is measured against.

use std::collections::BTreeMap;

use crate::common::{AccessTrace, Error, PageFlags, PageIdx, Result};
use crate::memory::Memory;

/// Evicts the resident page with the furthest next reuse.
///
/// Construction takes the full trace and the virtual address space size.
/// Every `access` call must replay the next unconsumed trace entry exactly;
/// the policy verifies this and fails fatally on desynchronization, because
/// a lookahead computed against one trace is meaningless for another.
pub struct Opt<M: Memory> {
    memory: M,

    /// Size of the virtual address space; VPNs must stay below it.
    num_vpages: u32,

    /// The trace being replayed, also the lookahead oracle.
    trace: AccessTrace,

    /// Index of the next unconsumed trace entry.
    step: usize,

    /// Per-VPN index of its next occurrence in the remaining trace.
    next_access: Vec<Option<usize>>,

    /// PPN → VPN reverse map, maintained on every load.
    ///
    /// Real hardware has no such structure; it exists purely so the victim
    /// scan can walk frames in ascending order.
    frame_owner: BTreeMap<PageIdx, PageIdx>,
}

impl<M: Memory> Opt<M> {
    /// Create an OPT policy bound to `memory`.
    ///
    /// `num_vpages` declares the virtual address space; `trace` is the exact
    /// sequence the driver will replay through [`access`](Opt::access).
    pub fn new(memory: M, num_vpages: u32, trace: AccessTrace) -> Self {
        Self {
            memory,
            num_vpages,
            next_access: vec![None; num_vpages as usize],
            trace,
            step: 0,
            frame_owner: BTreeMap::new(),
        }
    }

    /// Access a page, faulting and evicting as needed.
    ///
    /// # Errors
    /// - [`Error::InvalidVpn`] if `vpn` is outside the declared space
    /// - [`Error::StepOutOfBound`] if the trace is already fully consumed
    /// - [`Error::StepOutOfSync`] if (vpn, rights) differ from the next
    ///   trace entry
    /// - a fault that survives the load/retry
    pub fn access(&mut self, vpn: PageIdx, rights: PageFlags) -> Result<()> {
        self.consume_step(vpn, rights)?;

        if self.memory.access(vpn, rights).is_ok() {
            return Ok(());
        }

        let (ppn, evicted) = self.find_victim();
        self.memory.load(vpn, ppn, evicted)?;
        self.frame_owner.insert(ppn, vpn);
        self.memory.access(vpn, rights)?;

        Ok(())
    }

    /// Validate the access against the trace, advance the step index, and
    /// recompute the lookahead.
    fn consume_step(&mut self, vpn: PageIdx, rights: PageFlags) -> Result<()> {
        if vpn.0 >= self.num_vpages {
            return Err(Error::InvalidVpn(vpn));
        }
        if self.step >= self.trace.len() {
            return Err(Error::StepOutOfBound(self.step));
        }
        let (expected_vpn, expected_rights) = self.trace[self.step];
        if expected_vpn != vpn || expected_rights != rights {
            return Err(Error::StepOutOfSync {
                step: self.step,
                expected: expected_vpn,
                got: vpn,
            });
        }
        self.step += 1;
        self.recompute_lookahead();

        Ok(())
    }

    /// Rebuild `next_access` from the remaining trace.
    ///
    /// O(virtual-space + remaining-trace) per step. Fine for an offline
    /// baseline; an incremental per-VPN queue of future positions would
    /// observably behave the same.
    fn recompute_lookahead(&mut self) {
        self.next_access.fill(None);
        for (i, &(vpn, _)) in self.trace.iter().enumerate().skip(self.step) {
            let slot = &mut self.next_access[vpn.index()];
            if slot.is_none() {
                *slot = Some(i);
            }
        }
    }

    /// Pick the frame to load into: a free frame if one exists, otherwise
    /// the frame whose page has the furthest next access.
    ///
    /// Frames are scanned in ascending order; a page with no future
    /// occurrence is taken immediately, and the first-found furthest page
    /// wins ties.
    fn find_victim(&self) -> (PageIdx, Option<PageIdx>) {
        let free = self.memory.free_ppage();
        if free.is_valid() {
            return (free, None);
        }

        let mut best: Option<(PageIdx, PageIdx, usize)> = None;
        for frame in 0..self.memory.num_ppages() {
            let ppn = PageIdx::new(frame as u32);
            let Some(&vpn) = self.frame_owner.get(&ppn) else {
                // A frame nothing claims is as good as free.
                return (ppn, None);
            };
            match self.next_access[vpn.index()] {
                // Never used again: infinite distance, evict immediately.
                None => return (ppn, Some(vpn)),
                Some(next) => {
                    if best.map_or(true, |(_, _, best_next)| next > best_next) {
                        best = Some((ppn, vpn, next));
                    }
                }
            }
        }

        let (ppn, vpn, _) = best
            .unwrap_or_else(|| panic!("no free frame and no page to evict"));
        (ppn, Some(vpn))
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
