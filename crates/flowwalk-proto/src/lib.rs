//! # flowwalk wire formats
//!
//! This crate implements the byte-level framing shared by IPFIX (RFC 7011)
//! and NetFlow v9 (RFC 3954): message headers, set headers, template headers
//! and template field specifiers, together with the [`Cursor`] used to read
//! them out of a datagram.
//!
//! ## Implementation Notes
//!
//! - **Zero-Copy Reading**: every multi-byte structure is read either through
//!   the borrowing [`Cursor`] or by casting with
//!   [`zerocopy`](https://docs.rs/zerocopy) over big-endian byte-array
//!   fields. Nothing in this crate copies payload bytes; slices handed out by
//!   [`Cursor::take`] borrow the original datagram.
//!
//! - **Sticky Truncation**: flow exporters emit densely packed, self-framed
//!   structures, so a length that runs past the end of the datagram can only
//!   mean corruption. The cursor latches the first out-of-range access as a
//!   [`Truncated`] error and keeps returning zero values afterwards, which
//!   lets decoders read a whole fixed layout and check for truncation once.
//!
//! - **Explicit Validation**: unknown versions and illegal set identifiers
//!   are classified, never guessed at. [`SetKind::classify`] is total over
//!   `(version, set_id)` and reports reserved ids explicitly so the caller
//!   can reject them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cursor;
pub mod errors;
pub mod message;
pub mod set;
pub mod template;

pub use cursor::Cursor;
pub use errors::{Result, Truncated};
pub use message::{MessageHeader, IPFIX_VERSION, NETFLOW_V9_VERSION};
pub use set::{SetHeader, SetKind, TemplateHeader, DATA_SET_MIN, SET_HEADER_LEN};
pub use template::{FieldSpecifier, VARIABLE_LENGTH};
