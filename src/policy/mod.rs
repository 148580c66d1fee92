//! Eviction policy implementations.
//!
//! # Components
//! - [`Fifo`] - evicts in load order
//! - [`Lru`] - evicts by least-recent logical timestamp
//! - [`Clock`] - circular approximate-LRU scan over the ACCESSED bit
//! - [`NruClock`] - circular scan partitioned by (ACCESSED, DIRTY) class
//! - [`Opt`] - offline optimal baseline with full-trace lookahead
//! - [`Policy`] - closed union over the five kinds
//!
//! # The fault/retry protocol
//! Every policy's `access` entry point runs the same loop: attempt the
//! contract access; on a fault, compute (frame, evicted page) per the
//! policy's algorithm, call `load`, and retry once. The retry only faults
//! again on a genuine permission mismatch, which propagates to the caller
//! unretried.

mod clock;
mod fifo;
mod lru;
mod nru_clock;
mod opt;

pub use clock::Clock;
pub use fifo::Fifo;
pub use lru::Lru;
pub use nru_clock::NruClock;
pub use opt::Opt;

use crate::common::{AccessTrace, PageFlags, PageIdx, Result};
use crate::memory::Memory;

/// Discriminant of the available policy kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// First-in-first-out.
    Fifo,
    /// Least recently used.
    Lru,
    /// Second-chance circular scan.
    Clock,
    /// Class-aware circular scan (enhanced clock).
    NruClock,
    /// Offline optimal.
    Opt,
}

/// A page replacement policy bound to one memory instance.
///
/// A closed union: the kind is selected once at construction and dispatch
/// is a `match`, not an open trait object. Drivers that know their concrete
/// policy can use the individual types directly; this enum exists for the
/// "pick an algorithm at runtime" case.
///
/// # Example
/// ```
/// use pgsub::{Policy, SimMemory, PageIdx, PageFlags};
///
/// let mut policy = Policy::lru(SimMemory::new(3));
/// policy.access(PageIdx::new(7), PageFlags::READ).unwrap();
/// assert_eq!(policy.memory().stats().total(), 1);
/// ```
pub enum Policy<M: Memory> {
    /// FIFO policy.
    Fifo(Fifo<M>),
    /// LRU policy.
    Lru(Lru<M>),
    /// Clock policy.
    Clock(Clock<M>),
    /// Enhanced Clock policy.
    NruClock(NruClock<M>),
    /// OPT policy.
    Opt(Opt<M>),
}

impl<M: Memory> Policy<M> {
    /// A FIFO policy bound to `memory`.
    pub fn fifo(memory: M) -> Self {
        Policy::Fifo(Fifo::new(memory))
    }

    /// An LRU policy bound to `memory`.
    pub fn lru(memory: M) -> Self {
        Policy::Lru(Lru::new(memory))
    }

    /// A Clock policy bound to `memory`.
    pub fn clock(memory: M) -> Self {
        Policy::Clock(Clock::new(memory))
    }

    /// An Enhanced Clock policy bound to `memory`.
    pub fn nru_clock(memory: M) -> Self {
        Policy::NruClock(NruClock::new(memory))
    }

    /// An OPT policy bound to `memory`, replaying `trace` over a virtual
    /// space of `num_vpages` pages.
    pub fn opt(memory: M, num_vpages: u32, trace: AccessTrace) -> Self {
        Policy::Opt(Opt::new(memory, num_vpages, trace))
    }

    /// Which kind this policy is.
    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Fifo(_) => PolicyKind::Fifo,
            Policy::Lru(_) => PolicyKind::Lru,
            Policy::Clock(_) => PolicyKind::Clock,
            Policy::NruClock(_) => PolicyKind::NruClock,
            Policy::Opt(_) => PolicyKind::Opt,
        }
    }

    /// Access a page through the bound policy.
    ///
    /// # Errors
    /// Whatever the concrete policy's `access` returns.
    pub fn access(&mut self, vpn: PageIdx, rights: PageFlags) -> Result<()> {
        match self {
            Policy::Fifo(p) => p.access(vpn, rights),
            Policy::Lru(p) => p.access(vpn, rights),
            Policy::Clock(p) => p.access(vpn, rights),
            Policy::NruClock(p) => p.access(vpn, rights),
            Policy::Opt(p) => p.access(vpn, rights),
        }
    }

    /// Feed an entire trace through the policy, in order.
    ///
    /// # Errors
    /// Stops at and returns the first error.
    pub fn run_trace(&mut self, trace: &AccessTrace) -> Result<()> {
        for &(vpn, rights) in trace {
            self.access(vpn, rights)?;
        }
        Ok(())
    }

    /// The bound memory instance.
    pub fn memory(&self) -> &M {
        match self {
            Policy::Fifo(p) => p.memory(),
            Policy::Lru(p) => p.memory(),
            Policy::Clock(p) => p.memory(),
            Policy::NruClock(p) => p.memory(),
            Policy::Opt(p) => p.memory(),
        }
    }

    /// Consume the policy, returning the memory instance.
    pub fn into_memory(self) -> M {
        match self {
            Policy::Fifo(p) => p.into_memory(),
            Policy::Lru(p) => p.into_memory(),
            Policy::Clock(p) => p.into_memory(),
            Policy::NruClock(p) => p.into_memory(),
            Policy::Opt(p) => p.into_memory(),
        }
    }
}
