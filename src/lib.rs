//! pgsub - A virtual-memory page replacement simulator with pluggable
//! eviction policies.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          pgsub                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │              Driver (external)                      │    │
//! │  │        feeds an ordered access trace                │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! │                              ↓                              │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │      Eviction Policies (policy/)  [Swappable]       │    │
//! │  │   ┌─────────────────────────────────────────────┐   │    │
//! │  │   │   FIFO | LRU | Clock | NRU-Clock | OPT      │   │    │
//! │  │   │      (selected once at construction)        │   │    │
//! │  │   └─────────────────────────────────────────────┘   │    │
//! │  │     fault → select victim → load → retry            │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! │                              ↓                              │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │           Memory Contract (memory/)                 │    │
//! │  │   SimMemory: page table + frame bitmap + faults     │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageIdx, PageFlags, Error, AccessTrace)
//! - [`memory`] - The memory/MMU contract and its reference implementation
//! - [`policy`] - The five eviction policies and the closed policy union
//!
//! # Quick Start
//! ```
//! use pgsub::{Policy, SimMemory, PageIdx, PageFlags};
//!
//! // Three physical frames, LRU replacement.
//! let mut policy = Policy::lru(SimMemory::new(3));
//!
//! for vpn in [7u32, 0, 1, 2, 0, 3] {
//!     policy.access(PageIdx::new(vpn), PageFlags::READ).unwrap();
//! }
//!
//! let mem = policy.into_memory();
//! println!("{}", mem.stats());
//! println!("{}", mem.dump_page_table());
//! ```
//!
//! The whole engine is synchronous and single-threaded: one policy instance
//! owns one memory instance, trace entries are processed strictly in order,
//! and the only failure-is-expected path is the page-fault/retry loop.

pub mod common;
pub mod memory;
pub mod policy;

// Re-export commonly used items at crate root for convenience
pub use common::{AccessTrace, Error, PageFault, PageFlags, PageIdx, Result};
pub use memory::{FaultStats, Memory, SimMemory};
pub use policy::{Clock, Fifo, Lru, NruClock, Opt, Policy, PolicyKind};
