//! Reference implementation of the memory contract.

use std::collections::BTreeMap;
use std::fmt;

use crate::common::{Error, PageFault, PageFlags, PageIdx, Result};
use crate::memory::Memory;

/// A page table entry: the frame a virtual page is bound to, plus its flags.
///
/// Entries are retained after eviction (with VALID cleared) so the final
/// page table dump shows every page the trace ever touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pte {
    flags: PageFlags,
    ppn: PageIdx,
}

/// Fault counters maintained by [`SimMemory`].
///
/// Plain fields, not atomics: the whole engine is single-threaded by
/// construction, and the counters are read between policy calls.
///
/// # Example
/// ```
/// use pgsub::{SimMemory, Memory, PageIdx, PageFlags};
///
/// let mut mem = SimMemory::new(2);
/// assert!(mem.access(PageIdx::new(0), PageFlags::READ).is_err());
/// assert_eq!(mem.stats().read_faults, 1);
/// assert_eq!(mem.stats().total(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultStats {
    /// Faults raised for read accesses.
    pub read_faults: u64,

    /// Faults raised for write accesses.
    pub write_faults: u64,

    /// Faults raised for execute accesses.
    pub exec_faults: u64,

    /// Evictions of DIRTY pages, i.e. logical write-backs.
    pub write_backs: u64,
}

impl FaultStats {
    /// Total number of page faults across all kinds.
    pub fn total(&self) -> u64 {
        self.read_faults + self.write_faults + self.exec_faults
    }

    /// Faults per access, given the number of accesses issued.
    pub fn fault_rate(&self, num_ops: usize) -> f64 {
        if num_ops == 0 {
            0.0
        } else {
            self.total() as f64 / num_ops as f64
        }
    }
}

impl fmt::Display for FaultStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Faults {{ read: {}, write: {}, exec: {}, write_backs: {} }}",
            self.read_faults, self.write_faults, self.exec_faults, self.write_backs
        )
    }
}

/// Reference implementation of [`Memory`].
///
/// Maintains the page table and the free-frame bitmap, classifies faults,
/// and does the write-back bookkeeping on eviction. No data is stored and
/// no I/O happens; "write-back" is a counter tick.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────┐
/// │                    SimMemory                      │
/// │  ┌──────────────────┐  ┌───────────────────────┐  │
/// │  │   page_table     │  │ frame_alloc: Vec<bool>│  │
/// │  │ VPN → (flags,PPN)│─▶│ [used][used][free]... │  │
/// │  └──────────────────┘  └───────────────────────┘  │
/// │  ┌──────────────────────────────────────────────┐ │
/// │  │ stats: read/write/exec faults, write-backs   │ │
/// │  └──────────────────────────────────────────────┘ │
/// └───────────────────────────────────────────────────┘
/// ```
///
/// # Usage
/// ```
/// use pgsub::{SimMemory, Memory, PageIdx, PageFlags};
///
/// let mut mem = SimMemory::new(4);
///
/// // First touch faults; the caller (a policy) loads and retries.
/// assert!(mem.access(PageIdx::new(7), PageFlags::READ).is_err());
/// let ppn = mem.free_ppage();
/// mem.load(PageIdx::new(7), ppn, None).unwrap();
/// assert!(mem.access(PageIdx::new(7), PageFlags::READ).is_ok());
/// ```
#[derive(Debug)]
pub struct SimMemory {
    /// Number of physical frames (immutable after construction).
    num_ppages: usize,

    /// Maps virtual pages to (flags, frame). BTreeMap so dumps and scans
    /// iterate in ascending VPN order.
    page_table: BTreeMap<PageIdx, Pte>,

    /// One bool per physical frame; true = allocated.
    frame_alloc: Vec<bool>,

    /// Fault and write-back counters.
    stats: FaultStats,
}

impl SimMemory {
    /// Create a memory with `num_ppages` physical frames.
    ///
    /// # Panics
    /// Panics if `num_ppages` is 0.
    pub fn new(num_ppages: usize) -> Self {
        assert!(num_ppages > 0, "num_ppages must be > 0");

        Self {
            num_ppages,
            page_table: BTreeMap::new(),
            frame_alloc: vec![false; num_ppages],
            stats: FaultStats::default(),
        }
    }

    /// Current fault counters.
    pub fn stats(&self) -> &FaultStats {
        &self.stats
    }

    /// Number of resident (VALID) pages.
    pub fn resident_count(&self) -> usize {
        self.page_table
            .values()
            .filter(|pte| pte.flags.contains(PageFlags::VALID))
            .count()
    }

    /// Resident VPNs in ascending order, with their frames.
    pub fn resident_pages(&self) -> impl Iterator<Item = (PageIdx, PageIdx)> + '_ {
        self.page_table
            .iter()
            .filter(|(_, pte)| pte.flags.contains(PageFlags::VALID))
            .map(|(&vpn, pte)| (vpn, pte.ppn))
    }

    /// Render the page table as a markdown table, every entry ever seen.
    pub fn dump_page_table(&self) -> String {
        let mut out = String::from("|VPN|PPN|Flags|\n|-|-|-|\n");
        for (vpn, pte) in &self.page_table {
            out.push_str(&format!(
                "|{}|{}|{}|\n",
                vpn.0,
                pte.ppn.0,
                pte.flags.status_str()
            ));
        }
        out
    }
}

impl Memory for SimMemory {
    fn access(&mut self, vpn: PageIdx, rights: PageFlags) -> std::result::Result<(), PageFault> {
        match self.page_table.get_mut(&vpn) {
            Some(pte) if pte.flags.contains(PageFlags::VALID) => {
                // Resident: record the touch. Writes dirty the page,
                // everything else marks it accessed.
                if rights.contains(PageFlags::WRITE) {
                    pte.flags |= PageFlags::DIRTY;
                } else {
                    pte.flags |= PageFlags::ACCESSED;
                }
                Ok(())
            }
            _ => {
                // Classification priority: write before read before exec.
                Err(if rights.contains(PageFlags::WRITE) {
                    self.stats.write_faults += 1;
                    PageFault::Write(vpn)
                } else if rights.contains(PageFlags::READ) {
                    self.stats.read_faults += 1;
                    PageFault::Read(vpn)
                } else {
                    self.stats.exec_faults += 1;
                    PageFault::Exec(vpn)
                })
            }
        }
    }

    fn load(&mut self, vpn: PageIdx, ppn: PageIdx, evicted: Option<PageIdx>) -> Result<()> {
        if ppn.index() >= self.num_ppages {
            return Err(Error::InvalidPpn(ppn));
        }

        if let Some(evicted_vpn) = evicted {
            if let Some(pte) = self.page_table.get_mut(&evicted_vpn) {
                if pte.flags.contains(PageFlags::DIRTY) {
                    self.stats.write_backs += 1;
                }
                // Entry kept for diagnostics; only the status bits drop.
                pte.flags = pte
                    .flags
                    .without(PageFlags::VALID | PageFlags::ACCESSED | PageFlags::DIRTY);
            }
        }

        self.page_table.insert(
            vpn,
            Pte {
                flags: PageFlags::VALID,
                ppn,
            },
        );
        self.frame_alloc[ppn.index()] = true;

        Ok(())
    }

    fn ppage(&self, vpn: PageIdx) -> PageIdx {
        self.page_table
            .get(&vpn)
            .map_or(PageIdx::INVALID, |pte| pte.ppn)
    }

    fn vflag(&self, vpn: PageIdx) -> PageFlags {
        self.page_table
            .get(&vpn)
            .map_or(PageFlags::NONE, |pte| pte.flags)
    }

    fn set_vflag(&mut self, vpn: PageIdx, flags: PageFlags) -> PageFlags {
        let pte = self.page_table.entry(vpn).or_insert(Pte {
            flags: PageFlags::NONE,
            ppn: PageIdx::INVALID,
        });
        std::mem::replace(&mut pte.flags, flags)
    }

    fn free_ppage(&self) -> PageIdx {
        self.frame_alloc
            .iter()
            .position(|&used| !used)
            .map_or(PageIdx::INVALID, |i| PageIdx::new(i as u32))
    }

    fn num_ppages(&self) -> usize {
        self.num_ppages
    }

    fn reset(&mut self) {
        self.page_table.clear();
        self.frame_alloc.fill(false);
        self.stats = FaultStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_unloaded_faults() {
        let mut mem = SimMemory::new(2);

        assert_eq!(
            mem.access(PageIdx::new(0), PageFlags::READ),
            Err(PageFault::Read(PageIdx::new(0)))
        );
        assert_eq!(
            mem.access(PageIdx::new(0), PageFlags::RW),
            Err(PageFault::Write(PageIdx::new(0)))
        );
        assert_eq!(
            mem.access(PageIdx::new(0), PageFlags::EXEC),
            Err(PageFault::Exec(PageIdx::new(0)))
        );

        assert_eq!(mem.stats().read_faults, 1);
        assert_eq!(mem.stats().write_faults, 1);
        assert_eq!(mem.stats().exec_faults, 1);
        assert_eq!(mem.stats().total(), 3);
    }

    #[test]
    fn test_fault_priority_write_over_read() {
        // RW access to a missing page classifies as a write fault.
        let mut mem = SimMemory::new(1);
        assert_eq!(
            mem.access(PageIdx::new(5), PageFlags::READ | PageFlags::WRITE),
            Err(PageFault::Write(PageIdx::new(5)))
        );
    }

    #[test]
    fn test_load_then_access_never_faults() {
        let mut mem = SimMemory::new(2);

        mem.load(PageIdx::new(3), PageIdx::new(0), None).unwrap();
        assert!(mem.access(PageIdx::new(3), PageFlags::READ).is_ok());
        assert!(mem.access(PageIdx::new(3), PageFlags::WRITE).is_ok());
        assert!(mem.access(PageIdx::new(3), PageFlags::EXEC).is_ok());
    }

    #[test]
    fn test_access_sets_status_bits() {
        let mut mem = SimMemory::new(2);
        mem.load(PageIdx::new(3), PageIdx::new(0), None).unwrap();

        // Freshly loaded: VALID only.
        assert_eq!(mem.vflag(PageIdx::new(3)), PageFlags::VALID);

        mem.access(PageIdx::new(3), PageFlags::READ).unwrap();
        assert!(mem.vflag(PageIdx::new(3)).contains(PageFlags::ACCESSED));
        assert!(!mem.vflag(PageIdx::new(3)).contains(PageFlags::DIRTY));

        mem.access(PageIdx::new(3), PageFlags::WRITE).unwrap();
        assert!(mem.vflag(PageIdx::new(3)).contains(PageFlags::DIRTY));
    }

    #[test]
    fn test_load_invalid_ppn() {
        let mut mem = SimMemory::new(2);

        let result = mem.load(PageIdx::new(0), PageIdx::new(2), None);
        assert_eq!(result, Err(Error::InvalidPpn(PageIdx::new(2))));

        let result = mem.load(PageIdx::new(0), PageIdx::INVALID, None);
        assert_eq!(result, Err(Error::InvalidPpn(PageIdx::INVALID)));
    }

    #[test]
    fn test_eviction_clears_status_keeps_entry() {
        let mut mem = SimMemory::new(1);

        mem.load(PageIdx::new(0), PageIdx::new(0), None).unwrap();
        mem.access(PageIdx::new(0), PageFlags::READ).unwrap();

        mem.load(PageIdx::new(1), PageIdx::new(0), Some(PageIdx::new(0)))
            .unwrap();

        // Old entry retained, but no longer resident or accessed.
        let flags = mem.vflag(PageIdx::new(0));
        assert!(!flags.contains(PageFlags::VALID));
        assert!(!flags.contains(PageFlags::ACCESSED));
        assert_eq!(mem.ppage(PageIdx::new(0)), PageIdx::new(0));
        assert_eq!(mem.resident_count(), 1);
    }

    #[test]
    fn test_dirty_eviction_counts_write_back() {
        let mut mem = SimMemory::new(1);

        mem.load(PageIdx::new(0), PageIdx::new(0), None).unwrap();
        mem.access(PageIdx::new(0), PageFlags::WRITE).unwrap();
        mem.load(PageIdx::new(1), PageIdx::new(0), Some(PageIdx::new(0)))
            .unwrap();
        assert_eq!(mem.stats().write_backs, 1);

        // Clean eviction does not write back.
        mem.access(PageIdx::new(1), PageFlags::READ).unwrap();
        mem.load(PageIdx::new(2), PageIdx::new(0), Some(PageIdx::new(1)))
            .unwrap();
        assert_eq!(mem.stats().write_backs, 1);
    }

    #[test]
    fn test_free_ppage_lowest_first() {
        let mut mem = SimMemory::new(3);
        assert_eq!(mem.free_ppage(), PageIdx::new(0));

        mem.load(PageIdx::new(10), PageIdx::new(0), None).unwrap();
        assert_eq!(mem.free_ppage(), PageIdx::new(1));

        mem.load(PageIdx::new(11), PageIdx::new(1), None).unwrap();
        mem.load(PageIdx::new(12), PageIdx::new(2), None).unwrap();
        assert_eq!(mem.free_ppage(), PageIdx::INVALID);
    }

    #[test]
    fn test_set_vflag_round_trip() {
        let mut mem = SimMemory::new(2);

        // Never-seen page: previous flags are empty.
        let prev = mem.set_vflag(PageIdx::new(9), PageFlags::SOFTWARE);
        assert_eq!(prev, PageFlags::NONE);
        assert_eq!(mem.vflag(PageIdx::new(9)), PageFlags::SOFTWARE);

        // Overwrite returns what was there before.
        let prev = mem.set_vflag(PageIdx::new(9), PageFlags::NONE);
        assert_eq!(prev, PageFlags::SOFTWARE);
    }

    #[test]
    fn test_vflag_never_seen() {
        let mem = SimMemory::new(2);
        assert_eq!(mem.vflag(PageIdx::new(100)), PageFlags::NONE);
        assert_eq!(mem.ppage(PageIdx::new(100)), PageIdx::INVALID);
    }

    #[test]
    fn test_reset() {
        let mut mem = SimMemory::new(2);
        mem.load(PageIdx::new(0), PageIdx::new(0), None).unwrap();
        let _ = mem.access(PageIdx::new(5), PageFlags::READ);

        mem.reset();

        assert_eq!(mem.resident_count(), 0);
        assert_eq!(mem.free_ppage(), PageIdx::new(0));
        assert_eq!(mem.stats().total(), 0);
        assert_eq!(mem.vflag(PageIdx::new(0)), PageFlags::NONE);
    }

    #[test]
    fn test_dump_page_table() {
        let mut mem = SimMemory::new(2);
        mem.load(PageIdx::new(4), PageIdx::new(0), None).unwrap();
        mem.access(PageIdx::new(4), PageFlags::READ).unwrap();

        let dump = mem.dump_page_table();
        assert!(dump.starts_with("|VPN|PPN|Flags|"));
        assert!(dump.contains("|4|0|A-V|"));
    }

    #[test]
    fn test_fault_rate() {
        let mut mem = SimMemory::new(1);
        let _ = mem.access(PageIdx::new(0), PageFlags::READ);
        mem.load(PageIdx::new(0), PageIdx::new(0), None).unwrap();
        mem.access(PageIdx::new(0), PageFlags::READ).unwrap();

        assert_eq!(mem.stats().fault_rate(2), 0.5);
        assert_eq!(FaultStats::default().fault_rate(0), 0.0);
    }
}
