//! Error types for the flowwalk wire formats.
//!
//! Wire decoding has exactly one failure mode at this layer: the datagram
//! ended before the structure being read did. Everything richer (illegal set
//! ids, unknown templates) is a walking concern and lives with the walker.

use thiserror::Error;

/// A read ran past the end of the datagram.
///
/// Latched by [`Cursor`](crate::Cursor) on the first out-of-range access and
/// reported by every later [`Cursor::check`](crate::Cursor::check) call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unexpected end of datagram")]
pub struct Truncated;

/// Convenient Result type alias for wire decoding.
pub type Result<T> = std::result::Result<T, Truncated>;
