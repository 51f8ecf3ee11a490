//! Forward byte cursor with a sticky truncation latch.
//!
//! The cursor is the single access path for everything dynamically shaped in
//! a datagram: set bodies, template records and field values. It borrows the
//! input, so every slice it hands out is a view into the caller's buffer.
//!
//! # Sticky Errors
//!
//! The first read that would run past the end of the input latches
//! [`Truncated`]. From then on the integer primitives return zero and
//! [`take`](Cursor::take) returns the empty slice, without touching the
//! buffer again. Decoders read whole fixed layouts straight through and call
//! [`check`](Cursor::check) once at the next decision point, instead of
//! testing every individual read.

use crate::errors::{Result, Truncated};

/// Forward reader over a borrowed byte range.
///
/// Integers are big endian, as both IPFIX and NetFlow v9 mandate network
/// byte order throughout.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    truncated: bool,
}

impl<'a> Cursor<'a> {
    /// Create a cursor over `buf`, positioned at its first byte.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, truncated: false }
    }

    /// Bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// True when no bytes are left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True once any read has run past the end of the input.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Report the sticky latch as a result.
    ///
    /// # Errors
    ///
    /// Returns [`Truncated`] if any earlier read over-ran the input.
    pub fn check(&self) -> Result<()> {
        if self.truncated {
            Err(Truncated)
        } else {
            Ok(())
        }
    }

    /// Consume `n` bytes and return them as a sub-slice of the input.
    ///
    /// On over-run (or once the latch is set) this consumes nothing and
    /// returns the empty slice; the caller sees the failure through
    /// [`check`](Cursor::check).
    pub fn take(&mut self, n: usize) -> &'a [u8] {
        if self.truncated || n > self.buf.len() {
            self.truncated = true;
            return &[];
        }
        let (head, rest) = self.buf.split_at(n);
        self.buf = rest;
        head
    }

    /// Read a `u8`, or 0 after an over-run.
    pub fn u8(&mut self) -> u8 {
        self.array::<1>()[0]
    }

    /// Read a big-endian `u16`, or 0 after an over-run.
    pub fn u16(&mut self) -> u16 {
        u16::from_be_bytes(self.array())
    }

    /// Read a big-endian `u32`, or 0 after an over-run.
    pub fn u32(&mut self) -> u32 {
        u32::from_be_bytes(self.array())
    }

    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        let bytes = self.take(N);
        if bytes.len() == N {
            out.copy_from_slice(bytes);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn reads_in_order() {
        let mut cur = Cursor::new(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0xaa, 0xbb]);
        assert_eq!(cur.u8(), 0x01);
        assert_eq!(cur.u16(), 0x0203);
        assert_eq!(cur.u32(), 0x0405_0607);
        assert_eq!(cur.take(2), &[0xaa, 0xbb]);
        assert!(cur.is_empty());
        assert!(cur.check().is_ok());
    }

    #[test]
    fn over_run_latches() {
        let mut cur = Cursor::new(&[0x01, 0x02]);
        assert_eq!(cur.u32(), 0);
        assert!(cur.truncated());
        assert_eq!(cur.check(), Err(Truncated));

        // later reads keep returning zero even though two bytes remain
        assert_eq!(cur.remaining(), 2);
        assert_eq!(cur.u8(), 0);
        assert_eq!(cur.u16(), 0);
        assert_eq!(cur.take(1), &[] as &[u8]);
    }

    #[test]
    fn take_borrows_the_input() {
        let buf = [0u8; 16];
        let mut cur = Cursor::new(&buf);
        let head = cur.take(4);
        let tail = cur.take(12);
        let range = buf.as_ptr_range();
        assert!(range.contains(&head.as_ptr()));
        assert!(range.contains(&tail.as_ptr()));
    }

    #[test]
    fn zero_length_take_is_fine() {
        let mut cur = Cursor::new(&[0x01]);
        assert_eq!(cur.take(0), &[] as &[u8]);
        assert!(cur.check().is_ok());
        assert_eq!(cur.remaining(), 1);
    }

    proptest! {
        // Reads never consume more than the input holds, and a cursor that
        // stayed within bounds never reports truncation.
        #[test]
        fn consumption_is_bounded(buf in prop::collection::vec(any::<u8>(), 0..64),
                                  takes in prop::collection::vec(0usize..16, 0..16)) {
            let mut cur = Cursor::new(&buf);
            let mut consumed = 0usize;
            let mut over_ran = false;
            for n in takes {
                let got = cur.take(n);
                if over_ran || consumed + n > buf.len() {
                    over_ran = true;
                    prop_assert!(got.is_empty());
                } else {
                    prop_assert_eq!(got.len(), n);
                    consumed += n;
                }
            }
            prop_assert_eq!(cur.truncated(), over_ran);
            if !over_ran {
                prop_assert_eq!(cur.remaining(), buf.len() - consumed);
            }
        }
    }
}
