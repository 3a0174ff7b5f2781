//! Field descriptor: declared position, identity flags, validation and wire coercion.

use crate::error::{FieldError, ValidationError};

use super::field_type::FieldType;
use super::value::Value;

/// A typed slot in a model's tuple layout.
///
/// # Invariants
///
/// - `position` equals the field's declaration order within its model and is
///   the tuple offset the field occupies in the store
/// - immutable once the owning schema is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    ty: FieldType,
    position: usize,
    primary_key: bool,
    db_index: Option<u32>,
}

/// Declaration of a field before its position is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBuilder {
    name: String,
    ty: FieldType,
    primary_key: bool,
    db_index: Option<u32>,
}

impl FieldBuilder {
    /// Creates a new field declaration with the given name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            primary_key: false,
            db_index: None,
        }
    }

    /// Marks the field as the model's primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Backs the field with the numbered store index.
    ///
    /// Fields sharing an index number form a composite key, ordered by
    /// declaration.
    #[must_use]
    pub fn db_index(mut self, index: u32) -> Self {
        self.db_index = Some(index);
        self
    }

    /// Returns the declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub(crate) fn declared_index(&self) -> Option<u32> {
        self.db_index
    }

    pub(crate) fn set_db_index(&mut self, index: u32) {
        self.db_index = Some(index);
    }

    /// Builds the field at the given tuple position.
    pub(crate) fn build_with_position(self, position: usize) -> Field {
        Field {
            name: self.name,
            ty: self.ty,
            position,
            primary_key: self.primary_key,
            db_index: self.db_index,
        }
    }
}

impl Field {
    /// Creates a new field declaration with the given name and type.
    #[must_use]
    pub fn builder(name: impl Into<String>, ty: FieldType) -> FieldBuilder {
        FieldBuilder::new(name, ty)
    }

    /// Signed 32-bit integer field.
    #[must_use]
    pub fn num32(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldType::Num32)
    }

    /// Signed 64-bit integer field.
    #[must_use]
    pub fn num64(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldType::Num64)
    }

    /// Unsigned 32-bit integer field.
    #[must_use]
    pub fn unum32(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldType::UNum32)
    }

    /// Unsigned 64-bit integer field.
    #[must_use]
    pub fn unum64(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldType::UNum64)
    }

    /// Text field.
    #[must_use]
    pub fn string(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(name, FieldType::String)
    }

    /// Returns the name of the field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type of the field.
    pub fn ty(&self) -> FieldType {
        self.ty
    }

    /// Returns the tuple position of the field.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns true if this field is the model's primary key.
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Returns the number of the index backing this field, if any.
    pub fn db_index(&self) -> Option<u32> {
        self.db_index
    }

    /// Validates a value against the field's type and range.
    ///
    /// Integers are range-checked without wraparound and normalized to
    /// `Value::Int` for signed fields and `Value::UInt` for unsigned ones.
    pub fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        match (self.ty, value) {
            (FieldType::String, Value::Str(s)) => Ok(Value::Str(s)),
            (FieldType::String, other) => Err(ValidationError::new(
                &self.name,
                format!("expected string, got {}", other.kind()),
            )),
            (ty, value) => {
                let wide = value.as_i128().ok_or_else(|| {
                    ValidationError::new(
                        &self.name,
                        format!("expected {}, got {}", ty, value.kind()),
                    )
                })?;
                let (min, max) = ty
                    .bounds()
                    .ok_or_else(|| ValidationError::new(&self.name, "type has no range"))?;
                if wide < min || wide > max {
                    return Err(ValidationError::new(
                        &self.name,
                        format!("{} outside {} range [{}, {}]", wide, ty, min, max),
                    ));
                }
                if ty.is_signed() {
                    Ok(Value::Int(wide as i64))
                } else {
                    Ok(Value::UInt(wide as u64))
                }
            }
        }
    }

    /// Validates a value and encodes it to the store's wire bytes.
    ///
    /// Integers are little-endian at the field's width; text is raw UTF-8.
    pub fn to_wire(&self, value: &Value) -> Result<Vec<u8>, ValidationError> {
        match (self.ty, self.validate(value.clone())?) {
            (FieldType::Num32, Value::Int(v)) => Ok((v as i32).to_le_bytes().to_vec()),
            (FieldType::Num64, Value::Int(v)) => Ok(v.to_le_bytes().to_vec()),
            (FieldType::UNum32, Value::UInt(v)) => Ok((v as u32).to_le_bytes().to_vec()),
            (FieldType::UNum64, Value::UInt(v)) => Ok(v.to_le_bytes().to_vec()),
            (FieldType::String, Value::Str(s)) => Ok(s.into_bytes()),
            (ty, other) => Err(ValidationError::new(
                &self.name,
                format!("cannot encode {} as {}", other.kind(), ty),
            )),
        }
    }

    /// Encodes an increment for this field.
    ///
    /// Unsigned fields also take negative increments down to minus their
    /// maximum, sent modulo the field width so wrapping addition subtracts.
    pub fn delta_to_wire(&self, value: &Value) -> Result<Vec<u8>, ValidationError> {
        let Some((_, max)) = self.ty.bounds().filter(|_| !self.ty.is_signed()) else {
            return self.to_wire(value);
        };
        match value.as_i128() {
            Some(delta) if delta < 0 => {
                if delta < -max {
                    return Err(ValidationError::new(
                        &self.name,
                        format!("increment {} outside {} range [{}, {}]", delta, self.ty, -max, max),
                    ));
                }
                self.to_wire(&Value::UInt((delta + max + 1) as u64))
            }
            _ => self.to_wire(value),
        }
    }

    /// Decodes wire bytes stored at this field's position.
    ///
    /// A value of the wrong width is a schema mismatch, never coerced.
    pub fn from_wire(&self, bytes: &[u8]) -> Result<Value, FieldError> {
        if let Some(expected) = self.ty.width() {
            if bytes.len() != expected {
                return Err(FieldError::WireWidth {
                    field: self.name.clone(),
                    expected,
                    actual: bytes.len(),
                });
            }
        }

        let value = match self.ty {
            FieldType::Num32 => Value::Int(i32::from_le_bytes(self.fixed::<4>(bytes)?) as i64),
            FieldType::Num64 => Value::Int(i64::from_le_bytes(self.fixed::<8>(bytes)?)),
            FieldType::UNum32 => Value::UInt(u32::from_le_bytes(self.fixed::<4>(bytes)?) as u64),
            FieldType::UNum64 => Value::UInt(u64::from_le_bytes(self.fixed::<8>(bytes)?)),
            FieldType::String => {
                let text = std::str::from_utf8(bytes).map_err(|_| FieldError::InvalidText {
                    field: self.name.clone(),
                })?;
                Value::Str(text.to_string())
            }
        };
        Ok(value)
    }

    /// Parses a textual literal according to the field's type.
    pub fn parse(&self, text: &str) -> Result<Value, ValidationError> {
        if !self.ty.is_numeric() {
            return Ok(Value::Str(text.to_string()));
        }

        let value = if let Ok(v) = text.parse::<i64>() {
            Value::Int(v)
        } else if let Ok(v) = text.parse::<u64>() {
            Value::UInt(v)
        } else {
            return Err(ValidationError::new(
                &self.name,
                format!("'{}' is not an integer", text),
            ));
        };
        self.validate(value)
    }

    fn fixed<const N: usize>(&self, bytes: &[u8]) -> Result<[u8; N], FieldError> {
        bytes.try_into().map_err(|_| FieldError::WireWidth {
            field: self.name.clone(),
            expected: N,
            actual: bytes.len(),
        })
    }
}
