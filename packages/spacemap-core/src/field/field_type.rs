//! Semantic field types and their wire widths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Signed 32-bit integer
    Num32,
    /// Signed 64-bit integer
    Num64,
    /// Unsigned 32-bit integer
    UNum32,
    /// Unsigned 64-bit integer
    UNum64,
    /// Variable-length UTF-8 text
    String,
}

impl FieldType {
    /// Wire width in bytes, `None` for variable-length types.
    pub fn width(self) -> Option<usize> {
        match self {
            FieldType::Num32 | FieldType::UNum32 => Some(4),
            FieldType::Num64 | FieldType::UNum64 => Some(8),
            FieldType::String => None,
        }
    }

    /// Returns true for integer types.
    pub fn is_numeric(self) -> bool {
        !matches!(self, FieldType::String)
    }

    /// Returns true for signed integer types.
    pub fn is_signed(self) -> bool {
        matches!(self, FieldType::Num32 | FieldType::Num64)
    }

    /// Inclusive range of representable integers, `None` for text.
    pub fn bounds(self) -> Option<(i128, i128)> {
        match self {
            FieldType::Num32 => Some((i32::MIN as i128, i32::MAX as i128)),
            FieldType::Num64 => Some((i64::MIN as i128, i64::MAX as i128)),
            FieldType::UNum32 => Some((0, u32::MAX as i128)),
            FieldType::UNum64 => Some((0, u64::MAX as i128)),
            FieldType::String => None,
        }
    }

    /// Name used in declarations and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Num32 => "num32",
            FieldType::Num64 => "num64",
            FieldType::UNum32 => "u_num32",
            FieldType::UNum64 => "u_num64",
            FieldType::String => "string",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
