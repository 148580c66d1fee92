//! Error types for pgsub.
//!
//! Faults come in two classes with very different handling:
//! - [`PageFault`] drives policy logic. It is raised only by the memory
//!   contract's `access` and is caught by every policy's fault/retry loop.
//! - [`Error`] aborts the run. Its variants indicate caller misuse (a trace
//!   fed out of order, an index outside the declared ranges) and are never
//!   retried.
//!
//! A third class - "no victim found while the frame set is full" - is a
//! programmer error, not a runtime condition, and panics instead.

use thiserror::Error;

use crate::common::PageIdx;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// A page fault raised by the memory contract's `access`.
///
/// The variant records which kind of access faulted, classified in priority
/// order: WRITE before READ before EXEC. The payload is the faulting VPN.
///
/// This is the recoverable error class: policies catch it, select a victim,
/// load the page, and retry. It only surfaces to the caller when the retry
/// itself faults (a genuine permission mismatch).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PageFault {
    /// Read access to a non-resident page.
    #[error("page fault - read not loaded: vpn {0}")]
    Read(PageIdx),

    /// Write access to a non-resident page.
    #[error("page fault - write not loaded: vpn {0}")]
    Write(PageIdx),

    /// Execute access to a non-resident page.
    #[error("page fault - exec not loaded: vpn {0}")]
    Exec(PageIdx),
}

impl PageFault {
    /// The VPN the fault was raised for.
    pub fn vpn(&self) -> PageIdx {
        match *self {
            PageFault::Read(vpn) | PageFault::Write(vpn) | PageFault::Exec(vpn) => vpn,
        }
    }
}

/// All fatal errors in pgsub.
///
/// By having a single error type, error handling stays consistent across
/// the contract and every policy.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A page fault that survived the retry, i.e. a permission mismatch
    /// that loading the page could not resolve.
    #[error(transparent)]
    Fault(#[from] PageFault),

    /// An OPT access that does not match the next unconsumed trace entry.
    #[error("trace out of sync at step {step}: expected vpn {expected}, got vpn {got}")]
    StepOutOfSync {
        /// Index of the trace entry the access was checked against.
        step: usize,
        /// VPN the trace expected at this step.
        expected: PageIdx,
        /// VPN the caller actually accessed.
        got: PageIdx,
    },

    /// An OPT access issued after the trace was fully consumed.
    #[error("trace exhausted: step {0} is out of bounds")]
    StepOutOfBound(usize),

    /// A VPN at or beyond the declared virtual address space size.
    #[error("invalid vpn: {0}")]
    InvalidVpn(PageIdx),

    /// A PPN at or beyond the physical frame count.
    #[error("invalid ppn: {0}")]
    InvalidPpn(PageIdx),
}
