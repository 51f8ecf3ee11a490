//! Message headers for both supported protocol versions.
//!
//! The two layouts share their first two bytes (the version), then diverge:
//!
//! ```text
//! IPFIX (16 bytes):       version, length, export_time, sequence, domain_id
//! NetFlow v9 (20 bytes):  version, count, sys_uptime, unix_secs, sequence,
//!                         source_id
//! ```
//!
//! Both decode into the single [`MessageHeader`] value so that everything
//! downstream (filtering, the callback context) is version-agnostic. Fields
//! a version does not carry are zero: `length` for v9, `record_count` and
//! `sys_uptime` for IPFIX. The v9 `source_id` maps onto `domain_id`, which
//! plays the same stream-scoping role.

use std::mem::size_of;

use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::cursor::Cursor;

/// Version value carried by IPFIX messages.
pub const IPFIX_VERSION: u16 = 10;

/// Version value carried by NetFlow v9 messages.
pub const NETFLOW_V9_VERSION: u16 = 9;

/// IPFIX message header after the version word (big endian on the wire).
///
/// Fields are raw byte arrays so that all bit patterns are valid and the
/// struct can be cast directly from untrusted datagram bytes.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable)]
struct RawIpfixBody {
    length: [u8; 2],
    export_time: [u8; 4],
    sequence: [u8; 4],
    domain_id: [u8; 4],
}

/// NetFlow v9 message header after the version word.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable)]
struct RawV9Body {
    record_count: [u8; 2],
    sys_uptime: [u8; 4],
    unix_secs: [u8; 4],
    sequence: [u8; 4],
    source_id: [u8; 4],
}

/// Decoded message header, uniform across protocol versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    /// Protocol version: [`IPFIX_VERSION`] or [`NETFLOW_V9_VERSION`].
    pub version: u16,
    /// Total message length in bytes. IPFIX only; 0 for v9.
    pub length: u16,
    /// Export timestamp, seconds since the unix epoch.
    pub export_time: u32,
    /// Exporter sequence number.
    pub sequence: u32,
    /// Observation domain (IPFIX) or source id (v9).
    pub domain_id: u32,
    /// Records in the message as counted by the exporter. v9 only; 0 for
    /// IPFIX.
    pub record_count: u16,
    /// Exporter uptime in milliseconds. v9 only; 0 for IPFIX.
    pub sys_uptime: u32,
}

impl MessageHeader {
    /// Wire size of the IPFIX message header.
    pub const IPFIX_SIZE: usize = 16;

    /// Wire size of the NetFlow v9 message header.
    pub const V9_SIZE: usize = 20;

    /// Read the message header for whichever version the datagram declares.
    ///
    /// Unknown versions consume only the version word, leaving every other
    /// field zero; the caller is expected to reject the version. A truncated
    /// header leaves the cursor latched and the unread fields zero.
    pub fn read(cur: &mut Cursor<'_>) -> Self {
        let version = cur.u16();
        match version {
            IPFIX_VERSION => Self::read_ipfix_body(cur),
            NETFLOW_V9_VERSION => Self::read_v9_body(cur),
            _ => Self { version, ..Self::default() },
        }
    }

    fn read_ipfix_body(cur: &mut Cursor<'_>) -> Self {
        let Ok(raw) = RawIpfixBody::ref_from_bytes(cur.take(size_of::<RawIpfixBody>())) else {
            return Self { version: IPFIX_VERSION, ..Self::default() };
        };
        Self {
            version: IPFIX_VERSION,
            length: u16::from_be_bytes(raw.length),
            export_time: u32::from_be_bytes(raw.export_time),
            sequence: u32::from_be_bytes(raw.sequence),
            domain_id: u32::from_be_bytes(raw.domain_id),
            record_count: 0,
            sys_uptime: 0,
        }
    }

    fn read_v9_body(cur: &mut Cursor<'_>) -> Self {
        let Ok(raw) = RawV9Body::ref_from_bytes(cur.take(size_of::<RawV9Body>())) else {
            return Self { version: NETFLOW_V9_VERSION, ..Self::default() };
        };
        Self {
            version: NETFLOW_V9_VERSION,
            length: 0,
            export_time: u32::from_be_bytes(raw.unix_secs),
            sequence: u32::from_be_bytes(raw.sequence),
            domain_id: u32::from_be_bytes(raw.source_id),
            record_count: u16::from_be_bytes(raw.record_count),
            sys_uptime: u32::from_be_bytes(raw.sys_uptime),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_body_sizes() {
        assert_eq!(size_of::<RawIpfixBody>() + 2, MessageHeader::IPFIX_SIZE);
        assert_eq!(size_of::<RawV9Body>() + 2, MessageHeader::V9_SIZE);
    }

    #[test]
    fn decode_ipfix_header() {
        let bytes = [
            0x00, 0x0a, // version 10
            0x05, 0x78, // length 1400
            0x5d, 0xf0, 0x0a, 0xc2, // export time
            0x00, 0x00, 0x00, 0xd2, // sequence 210
            0x00, 0x00, 0x00, 0x07, // domain 7
        ];
        let mut cur = Cursor::new(&bytes);
        let header = MessageHeader::read(&mut cur);
        assert!(cur.check().is_ok());
        assert!(cur.is_empty());
        assert_eq!(
            header,
            MessageHeader {
                version: 10,
                length: 1400,
                export_time: 0x5df0_0ac2,
                sequence: 210,
                domain_id: 7,
                record_count: 0,
                sys_uptime: 0,
            }
        );
    }

    #[test]
    fn decode_v9_header() {
        let bytes = [
            0x00, 0x09, // version 9
            0x00, 0x1f, // count 31
            0x19, 0x8a, 0xfa, 0xc4, // sys uptime
            0x5d, 0xef, 0xcb, 0xd8, // unix secs
            0x00, 0x10, 0x3e, 0x57, // sequence
            0x00, 0x00, 0x00, 0x00, // source id
        ];
        let mut cur = Cursor::new(&bytes);
        let header = MessageHeader::read(&mut cur);
        assert!(cur.check().is_ok());
        assert!(cur.is_empty());
        assert_eq!(header.version, 9);
        assert_eq!(header.record_count, 31);
        assert_eq!(header.sys_uptime, 0x198a_fac4);
        assert_eq!(header.export_time, 0x5def_cbd8);
        assert_eq!(header.sequence, 0x0010_3e57);
        assert_eq!(header.domain_id, 0);
        assert_eq!(header.length, 0);
    }

    #[test]
    fn unknown_version_reads_only_the_version() {
        let bytes = [0x00, 0x07, 0xff, 0xff];
        let mut cur = Cursor::new(&bytes);
        let header = MessageHeader::read(&mut cur);
        assert_eq!(header.version, 7);
        assert_eq!(header.domain_id, 0);
        assert_eq!(cur.remaining(), 2);
        assert!(cur.check().is_ok());
    }

    #[test]
    fn short_header_latches_the_cursor() {
        let bytes = [0x00, 0x0a, 0x00, 0x10];
        let mut cur = Cursor::new(&bytes);
        let header = MessageHeader::read(&mut cur);
        assert_eq!(header.version, 10);
        assert_eq!(header.length, 0);
        assert!(cur.truncated());
    }
}
