//! Memory contract - the abstract MMU surface every policy drives.
//!
//! # Components
//! - [`Memory`] - the contract trait
//! - [`SimMemory`] - the reference implementation (page table + frame bitmap)
//! - [`FaultStats`] - per-kind fault counters

mod sim;

pub use sim::{FaultStats, SimMemory};

use crate::common::{PageFault, PageFlags, PageIdx, Result};

/// The abstract memory/MMU contract.
///
/// An implementation owns the page table and the physical frame allocation
/// state. It is the only component allowed to raise a page fault; policies
/// learn they must evict/load exclusively by `access` returning
/// [`PageFault`].
///
/// # Invariant
/// The number of resident (VALID) entries never exceeds
/// [`num_ppages`](Memory::num_ppages), and a frame is associated with exactly
/// one VALID entry or none. A frame transitions free → allocated only through
/// [`load`](Memory::load).
pub trait Memory {
    /// Access a page.
    ///
    /// Succeeds only if the entry is resident (VALID) and the access rights
    /// are compatible. On success, sets DIRTY if `rights` includes WRITE,
    /// otherwise ACCESSED.
    ///
    /// # Errors
    /// [`PageFault`] tagged Write, Read, or Exec - checked in that priority
    /// order against `rights` - when the page is not resident.
    fn access(&mut self, vpn: PageIdx, rights: PageFlags) -> std::result::Result<(), PageFault>;

    /// Load a virtual page into a physical frame.
    ///
    /// Binds `vpn` to `ppn`, sets VALID, and clears ACCESSED/DIRTY for the
    /// new entry. If `evicted` names a resident page, its DIRTY bit decides
    /// whether a (logical) write-back occurs, after which its
    /// VALID/ACCESSED/DIRTY bits are cleared.
    ///
    /// # Errors
    /// [`Error::InvalidPpn`](crate::Error::InvalidPpn) if `ppn` is out of
    /// range.
    fn load(&mut self, vpn: PageIdx, ppn: PageIdx, evicted: Option<PageIdx>) -> Result<()>;

    /// The physical frame `vpn` is bound to, or [`PageIdx::INVALID`] if the
    /// page was never loaded.
    fn ppage(&self, vpn: PageIdx) -> PageIdx;

    /// The flags of `vpn`. [`PageFlags::NONE`] for a never-seen page.
    fn vflag(&self, vpn: PageIdx) -> PageFlags;

    /// Overwrite the flags of `vpn`, returning the previous value.
    fn set_vflag(&mut self, vpn: PageIdx, flags: PageFlags) -> PageFlags;

    /// The lowest-index unallocated frame, or [`PageIdx::INVALID`] if none.
    fn free_ppage(&self) -> PageIdx;

    /// The number of physical frames.
    fn num_ppages(&self) -> usize;

    /// Clear all state: page table, frame allocations, counters.
    fn reset(&mut self);
}
