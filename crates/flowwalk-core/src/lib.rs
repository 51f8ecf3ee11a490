//! # flowwalk core
//!
//! The datagram walker and its field-identity filter: the hot-path building
//! block a flow collector puts between its UDP receiver and whatever
//! assembles flow tuples. One call walks one datagram; the caller's callback
//! sees each field value that passes the filter, as a borrow of the input
//! buffer, plus an end-of-record marker after every data record that emitted
//! at least one field.
//!
//! This crate is pure logic, decoupled from every transport concern:
//!
//! ```text
//!      ┌─────────────────────────────┐
//!      │ flowwalk-core               │
//!      │ - per-packet state machine  │
//!      │ - template cache            │
//!      │ - identity filter           │
//!      └─────────────────────────────┘
//!         ↑ bytes in        ↓ callbacks out
//! ┌──────────────────────────────────────┐
//! │ the collector (sockets, threads, IE  │
//! │ registry, template persistence, ...) │
//! └──────────────────────────────────────┘
//! ```
//!
//! # Key Principles
//!
//! - No I/O, no threads, no clocks: [`Walker::walk_buffer`] runs to
//!   completion on the caller's thread and the callback is invoked inline.
//! - No state beyond one packet: templates live only for the datagram that
//!   declared them. Cross-datagram template persistence belongs to the
//!   caller.
//! - No copies: every value slice handed to the callback borrows the input
//!   buffer, and the callback's signature carries that lifetime.
//! - A walker owns mutable scratch arenas, so one walker serves one worker;
//!   a [`Filter`], once built, is plain read-only data and can be shared
//!   across walkers behind an `Arc`.
//!
//! # Modules
//!
//! - [`walker`]: the per-datagram state machine and callback plumbing
//! - [`filter`]: header predicate plus per-enterprise field bitmaps
//! - [`bitmap`]: dense 65 536-bit membership bitmap
//! - [`templates`]: per-packet template cache with a reusable specifier arena

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bitmap;
pub mod filter;
pub mod templates;
pub mod walker;

pub use bitmap::FieldBitmap;
pub use filter::{Filter, HeaderFilter};
pub use walker::{CallbackError, Record, WalkError, Walker, WalkerConfig};
