//! Field declarations, field types and typed values.

#[allow(clippy::module_inception)]
mod field;
mod field_type;
mod value;

pub use field::{Field, FieldBuilder};
pub use field_type::FieldType;
pub use value::Value;
