//! Template field specifiers.
//!
//! A template record is a [`TemplateHeader`](crate::TemplateHeader) followed
//! by `field_count` specifiers. Each specifier is `u16 field_id, u16 length`;
//! when the field id carries the enterprise bit (the high bit), the bit is
//! stripped and a `u32` enterprise id follows. Enterprise id 0 is the IANA
//! namespace.

use crate::cursor::Cursor;

/// Length value marking a variable-length field.
///
/// Values of such fields carry their own length prefix: one byte, or three
/// bytes (`0xff` then a `u16`) for lengths of 255 and up.
pub const VARIABLE_LENGTH: u16 = 0xffff;

const ENTERPRISE_BIT: u16 = 0x8000;

/// One column of a template: field identity plus encoded length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpecifier {
    /// Field id with the enterprise bit stripped.
    pub field_id: u16,
    /// Encoded length in bytes, or [`VARIABLE_LENGTH`].
    pub length: u16,
    /// Enterprise namespace, 0 for IANA fields.
    pub enterprise_id: u32,
}

impl FieldSpecifier {
    /// Read one specifier off the cursor.
    pub fn read(cur: &mut Cursor<'_>) -> Self {
        let mut field_id = cur.u16();
        let length = cur.u16();
        let mut enterprise_id = 0;
        if field_id & ENTERPRISE_BIT != 0 {
            field_id &= !ENTERPRISE_BIT;
            enterprise_id = cur.u32();
        }
        Self { field_id, length, enterprise_id }
    }

    /// True when values of this field carry their own length prefix.
    #[must_use]
    pub fn is_variable_length(&self) -> bool {
        self.length == VARIABLE_LENGTH
    }

    /// Smallest number of bytes one value of this field can occupy: the
    /// declared length for fixed fields, the one-byte short prefix for
    /// variable-length fields.
    #[must_use]
    pub fn min_encoded_len(&self) -> usize {
        if self.is_variable_length() {
            1
        } else {
            self.length as usize
        }
    }
}
