//! Named partial mutations applied by `Record::update`.

use std::fmt;

use crate::error::OrmError;
use crate::field::Value;
use crate::schema::Schema;
use crate::store::{WireOp, WireOperator};

/// Separator between a field name and an operation suffix, as in `count__add`.
const SUFFIX_SEPARATOR: &str = "__";

/// Kind of partial mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Assign the operand
    Set,
    /// Atomic numeric increment (wrapping); negative on unsigned fields subtracts
    Add,
    /// Bitwise AND
    BitAnd,
    /// Bitwise OR
    BitOr,
    /// Bitwise XOR
    BitXor,
}

impl OperationKind {
    /// Parses an operation suffix.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "set" => Some(OperationKind::Set),
            "add" => Some(OperationKind::Add),
            "and" => Some(OperationKind::BitAnd),
            "or" => Some(OperationKind::BitOr),
            "xor" => Some(OperationKind::BitXor),
            _ => None,
        }
    }

    /// Returns the suffix naming this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Set => "set",
            OperationKind::Add => "add",
            OperationKind::BitAnd => "and",
            OperationKind::BitOr => "or",
            OperationKind::BitXor => "xor",
        }
    }

    /// Returns true if the kind only applies to integer fields.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, OperationKind::Set)
    }

    fn wire_operator(&self) -> WireOperator {
        match self {
            OperationKind::Set => WireOperator::Assign,
            OperationKind::Add => WireOperator::Add,
            OperationKind::BitAnd => WireOperator::BitAnd,
            OperationKind::BitOr => WireOperator::BitOr,
            OperationKind::BitXor => WireOperator::BitXor,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mutation of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    field: String,
    kind: OperationKind,
    operand: Value,
}

impl Operation {
    /// Creates an operation of the given kind.
    pub fn new(field: impl Into<String>, kind: OperationKind, operand: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            kind,
            operand: operand.into(),
        }
    }

    /// Assigns `operand` to the field.
    pub fn set(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Self::new(field, OperationKind::Set, operand)
    }

    /// Adds `operand` to an integer field.
    pub fn add(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Self::new(field, OperationKind::Add, operand)
    }

    pub fn and(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Self::new(field, OperationKind::BitAnd, operand)
    }

    pub fn or(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Self::new(field, OperationKind::BitOr, operand)
    }

    pub fn xor(field: impl Into<String>, operand: impl Into<Value>) -> Self {
        Self::new(field, OperationKind::BitXor, operand)
    }

    /// Parses a keyed operation such as `count__add`.
    ///
    /// A bare field name means `set`.
    ///
    /// # Returns
    /// `Err(OrmError::UnknownOperation)` if the suffix names no operation.
    pub fn parse(key: &str, operand: impl Into<Value>) -> Result<Self, OrmError> {
        let Some((field, suffix)) = key.split_once(SUFFIX_SEPARATOR) else {
            return Ok(Self::set(key, operand));
        };
        let kind = OperationKind::from_suffix(suffix).ok_or_else(|| OrmError::UnknownOperation {
            field: field.to_string(),
            operation: suffix.to_string(),
        })?;
        Ok(Self::new(field, kind, operand))
    }

    /// Returns the target field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the operation kind.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the operand.
    pub fn operand(&self) -> &Value {
        &self.operand
    }

    /// Resolves the target field and encodes the operand at its width.
    pub(crate) fn to_wire(&self, schema: &Schema) -> Result<WireOp, OrmError> {
        let field = schema.require_field(&self.field)?;
        if self.kind.is_numeric() && !field.ty().is_numeric() {
            return Err(OrmError::UnsupportedOperation {
                field: self.field.clone(),
                operation: self.kind.as_str(),
                field_type: field.ty(),
            });
        }
        let operand = match self.kind {
            OperationKind::Add => field.delta_to_wire(&self.operand)?,
            _ => field.to_wire(&self.operand)?,
        };
        Ok(WireOp {
            position: field.position(),
            operator: self.kind.wire_operator(),
            operand,
        })
    }
}
