//! Page index type.

use std::fmt;

/// Identifies a page, virtual or physical.
///
/// Using `u32` because:
/// 1. Virtual address spaces rarely exceed 48 bits, and with 4KB pages
///    (12 bits of offset) 32 bits of index cover anything a simulation needs
/// 2. 4,294,967,295 pages × 4KB = 16TB of addressable memory
/// 3. The all-ones value is free to serve as the "no page" sentinel
///
/// The same type covers both VPNs and PPNs; which one a value means is
/// determined by the parameter it is passed through.
///
/// # Example
/// ```
/// use pgsub::PageIdx;
///
/// let vpn = PageIdx::new(42);
/// assert!(vpn.is_valid());
/// assert_eq!(vpn.0, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageIdx(pub u32);

impl PageIdx {
    /// Invalid/sentinel page index.
    ///
    /// Used to represent "no page": an unmapped VPN, or "no free frame".
    pub const INVALID: PageIdx = PageIdx(u32::MAX);

    /// Create a new PageIdx.
    #[inline]
    pub fn new(idx: u32) -> Self {
        PageIdx(idx)
    }

    /// Check if this page index is valid (not the sentinel value).
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// The index as a `usize`, for table lookups.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PageIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "Page(INVALID)")
        } else {
            write!(f, "Page({})", self.0)
        }
    }
}
