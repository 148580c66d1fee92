//! Common types and utilities shared across pgsub.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Page indices and the invalid-page sentinel
//! - Page flag bitfields
//! - Error types
//! - The access trace type

pub mod error;
mod flags;
mod page_idx;

pub use error::{Error, PageFault, Result};
pub use flags::PageFlags;
pub use page_idx::PageIdx;

/// An ordered, finite, replayable sequence of (VPN, access rights) pairs.
///
/// Consumed strictly in order by the driver; the OPT policy additionally
/// uses it as a lookahead oracle.
pub type AccessTrace = Vec<(PageIdx, PageFlags)>;
