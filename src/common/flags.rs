//! Page flag bitfield.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Flags attached to a page table entry, packed into one byte.
///
/// The low nibble holds access rights, the high nibble holds status bits.
/// The exact bit values are fixed: traces and page-table dumps encode them
/// numerically, so they must not shift between versions.
///
/// | Bit  | Name     | Meaning                                   |
/// |------|----------|-------------------------------------------|
/// | 0x01 | READ     | page may be read                          |
/// | 0x02 | WRITE    | page may be written                       |
/// | 0x04 | EXEC     | page may be executed                      |
/// | 0x10 | ACCESSED | page was touched since the bit was cleared|
/// | 0x20 | DIRTY    | page was written since it was loaded      |
/// | 0x40 | VALID    | page is resident in a physical frame      |
/// | 0x80 | SOFTWARE | reserved for software use (RSW)           |
///
/// Status bits are owned by the memory contract. Policies may read and clear
/// ACCESSED/DIRTY through [`set_vflag`](crate::memory::Memory::set_vflag)
/// but must not fabricate VALID.
///
/// # Example
/// ```
/// use pgsub::PageFlags;
///
/// let rights = PageFlags::READ | PageFlags::WRITE;
/// assert!(rights.contains(PageFlags::WRITE));
/// assert!(!rights.contains(PageFlags::EXEC));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PageFlags(pub u8);

impl PageFlags {
    /// No flags set. What `vflag` reports for a never-seen VPN.
    pub const NONE: PageFlags = PageFlags(0);

    /// Read access right.
    pub const READ: PageFlags = PageFlags(0x01);
    /// Write access right.
    pub const WRITE: PageFlags = PageFlags(0x02);
    /// Execute access right.
    pub const EXEC: PageFlags = PageFlags(0x04);

    /// Page was accessed (read or executed) since this bit was last cleared.
    pub const ACCESSED: PageFlags = PageFlags(0x10);
    /// Page was written since it was loaded; eviction requires a write-back.
    pub const DIRTY: PageFlags = PageFlags(0x20);
    /// Page is resident.
    pub const VALID: PageFlags = PageFlags(0x40);
    /// Reserved software bit (RSW).
    pub const SOFTWARE: PageFlags = PageFlags(0x80);

    /// Read + write.
    pub const RW: PageFlags = PageFlags(0x01 | 0x02);
    /// Read + execute.
    pub const RX: PageFlags = PageFlags(0x01 | 0x04);
    /// Read + write + execute.
    pub const RWX: PageFlags = PageFlags(0x01 | 0x02 | 0x04);

    /// Check whether every bit in `other` is set in `self`.
    #[inline]
    pub fn contains(self, other: PageFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check whether any bit in `other` is set in `self`.
    #[inline]
    pub fn intersects(self, other: PageFlags) -> bool {
        self.0 & other.0 != 0
    }

    /// A copy with the bits in `other` set.
    #[inline]
    #[must_use]
    pub fn with(self, other: PageFlags) -> PageFlags {
        PageFlags(self.0 | other.0)
    }

    /// A copy with the bits in `other` cleared.
    #[inline]
    #[must_use]
    pub fn without(self, other: PageFlags) -> PageFlags {
        PageFlags(self.0 & !other.0)
    }

    /// Render the access-right bits as `RWX` with `-` placeholders.
    pub fn rights_str(self) -> String {
        [
            if self.contains(Self::READ) { 'R' } else { '-' },
            if self.contains(Self::WRITE) { 'W' } else { '-' },
            if self.contains(Self::EXEC) { 'X' } else { '-' },
        ]
        .iter()
        .collect()
    }

    /// Render the status bits as `ADV` with `-` placeholders.
    pub fn status_str(self) -> String {
        [
            if self.contains(Self::ACCESSED) { 'A' } else { '-' },
            if self.contains(Self::DIRTY) { 'D' } else { '-' },
            if self.contains(Self::VALID) { 'V' } else { '-' },
        ]
        .iter()
        .collect()
    }
}

impl BitOr for PageFlags {
    type Output = PageFlags;

    #[inline]
    fn bitor(self, rhs: PageFlags) -> PageFlags {
        PageFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for PageFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: PageFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for PageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rights_str(), self.status_str())
    }
}
