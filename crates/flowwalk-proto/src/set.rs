//! Set framing and per-version set-id dispatch.
//!
//! A message body is a run of sets, each a 4-byte header followed by
//! `length - 4` bytes of body. What a set id means depends on the protocol
//! version; the two standards picked different numbers for the same roles:
//!
//! | set id   | IPFIX            | NetFlow v9       |
//! |----------|------------------|------------------|
//! | 0        | illegal          | template set     |
//! | 1        | illegal          | options template |
//! | 2        | template set     | illegal          |
//! | 3        | options template | illegal          |
//! | 4..255   | reserved         | reserved         |
//! | >= 256   | data set         | data set         |

use crate::cursor::Cursor;
use crate::message::{IPFIX_VERSION, NETFLOW_V9_VERSION};

/// Wire size of a set header.
pub const SET_HEADER_LEN: usize = 4;

/// Smallest set id that names a data set (and the template describing it).
pub const DATA_SET_MIN: u16 = 256;

/// IPFIX template sets use this id.
pub const IPFIX_TEMPLATE_SET: u16 = 2;

/// IPFIX options template sets use this id.
pub const IPFIX_OPTIONS_TEMPLATE_SET: u16 = 3;

/// NetFlow v9 template sets use this id.
pub const V9_TEMPLATE_SET: u16 = 0;

/// NetFlow v9 options template sets use this id.
pub const V9_OPTIONS_TEMPLATE_SET: u16 = 1;

/// 4-byte set header: id plus total length including the header itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetHeader {
    /// Set id; meaning is version-dependent, see [`SetKind::classify`].
    pub set_id: u16,
    /// Total set length in bytes, header included. Valid sets have
    /// `length >= 4`.
    pub length: u16,
}

impl SetHeader {
    /// Read a set header off the cursor.
    pub fn read(cur: &mut Cursor<'_>) -> Self {
        Self { set_id: cur.u16(), length: cur.u16() }
    }

    /// Body length, or `None` when the advertised length cannot even cover
    /// the header (a framing error).
    #[must_use]
    pub fn body_len(&self) -> Option<usize> {
        (self.length as usize).checked_sub(SET_HEADER_LEN)
    }
}

/// 4-byte template record header: template id plus field count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateHeader {
    /// Template id; data templates use ids >= [`DATA_SET_MIN`].
    pub template_id: u16,
    /// Number of field specifiers that follow.
    pub field_count: u16,
}

impl TemplateHeader {
    /// Read a template header off the cursor.
    pub fn read(cur: &mut Cursor<'_>) -> Self {
        Self { template_id: cur.u16(), field_count: cur.u16() }
    }
}

/// How a set body must be interpreted under a given protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    /// Template records defining the shape of later data sets.
    Template,
    /// Options template records; recognised but not decoded.
    OptionsTemplate,
    /// Data records laid out per a previously declared template.
    Data,
    /// Reserved or version-illegal set id. Must be rejected, not skipped:
    /// its body has no known framing.
    Illegal,
}

impl SetKind {
    /// Classify a set id under a protocol version.
    ///
    /// Total over all inputs; ids that are reserved, or that belong to the
    /// other version, come back as [`SetKind::Illegal`].
    #[must_use]
    pub const fn classify(version: u16, set_id: u16) -> Self {
        if set_id >= DATA_SET_MIN {
            return Self::Data;
        }
        match (version, set_id) {
            (IPFIX_VERSION, IPFIX_TEMPLATE_SET) => Self::Template,
            (IPFIX_VERSION, IPFIX_OPTIONS_TEMPLATE_SET) => Self::OptionsTemplate,
            (NETFLOW_V9_VERSION, V9_TEMPLATE_SET) => Self::Template,
            (NETFLOW_V9_VERSION, V9_OPTIONS_TEMPLATE_SET) => Self::OptionsTemplate,
            _ => Self::Illegal,
        }
    }
}
