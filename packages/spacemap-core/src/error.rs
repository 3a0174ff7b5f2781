//! Mapping engine error types.

use thiserror::Error;

use crate::field::FieldType;

/// Crate result alias.
pub type Result<T, E = OrmError> = std::result::Result<T, E>;

/// A value failed its field's type or range contract.
///
/// Always produced before any store access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for field '{field}': {reason}")]
pub struct ValidationError {
    /// Field the value was destined for
    pub field: String,
    /// Human readable reason
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Schema-level mismatches between a query, a model declaration and stored data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Field is not declared on the model
    #[error("Field '{field}' is not declared on model '{model}'")]
    UnknownField { model: String, field: String },

    /// Field exists but no index backs it
    #[error("Field '{field}' of model '{model}' is not queryable: no db_index")]
    NotIndexed { model: String, field: String },

    /// Queried field set matches no declared index
    #[error("No index of model '{model}' matches the fields {fields:?}")]
    NoMatchingIndex { model: String, fields: Vec<String> },

    /// Query carries no constraints
    #[error("Query on model '{model}' has no field constraints")]
    EmptyQuery { model: String },

    /// Same field constrained twice in one query
    #[error("Field '{field}' constrained more than once in a query on model '{model}'")]
    DuplicateQueryField { model: String, field: String },

    /// Stored tuple arity differs from the declared field count
    #[error("Tuple for model '{model}' has {actual} elements, expected {expected}")]
    TupleLength {
        model: String,
        expected: usize,
        actual: usize,
    },

    /// Stored value has the wrong byte width for its field
    #[error("Stored value for field '{field}' is {actual} bytes, expected {expected}")]
    WireWidth {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Stored text is not valid UTF-8
    #[error("Stored value for field '{field}' is not valid UTF-8")]
    InvalidText { field: String },

    /// Field declared twice on one model
    #[error("Field '{field}' declared more than once on model '{model}'")]
    DuplicateField { model: String, field: String },

    /// More than one primary key declared
    #[error("Model '{model}' declares primary keys '{first}' and '{second}'")]
    MultiplePrimaryKeys {
        model: String,
        first: String,
        second: String,
    },

    /// Primary key without db_index while index 0 belongs to other fields
    #[error("Primary key '{field}' of model '{model}' has no db_index and index 0 is taken")]
    PrimaryIndexConflict { model: String, field: String },

    /// Model declares no fields
    #[error("Model '{model}' declares no fields")]
    EmptySchema { model: String },
}

/// Connection registry errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Alias was never registered or has been disposed
    #[error("Connection alias '{alias}' is not registered")]
    NotRegistered { alias: String },

    /// Alias already bound
    #[error("Connection alias '{alias}' is already registered")]
    AlreadyRegistered { alias: String },
}

/// Errors surfaced by a store implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Space not found
    #[error("Space {space} not found")]
    SpaceNotFound { space: u32 },

    /// Space already exists
    #[error("Space {space} already exists")]
    SpaceExists { space: u32 },

    /// Index not found in space
    #[error("Index {index} not found in space {space}")]
    IndexNotFound { space: u32, index: u32 },

    /// Unique index would hold two tuples with one key
    #[error("Duplicate key in unique index {index} of space {space}")]
    DuplicateKey { space: u32, index: u32 },

    /// Key is empty or longer than the index part count
    #[error("Key for index {index} of space {space} has {actual} parts, index has {expected}")]
    KeyArity {
        space: u32,
        index: u32,
        expected: usize,
        actual: usize,
    },

    /// Tuple does not cover an indexed position
    #[error("Tuple of {len} elements does not cover position {position} of index {index} in space {space}")]
    TupleTooShort {
        space: u32,
        index: u32,
        position: usize,
        len: usize,
    },

    /// Update operation cannot be applied
    #[error("Invalid update operand at position {position}: {reason}")]
    InvalidOperand { position: usize, reason: String },

    /// Space or index layout is malformed
    #[error("Invalid space definition: {0}")]
    InvalidDefinition(String),

    /// Stored procedure not known to the store
    #[error("Unknown procedure '{0}'")]
    UnknownProcedure(String),

    /// Bad procedure argument
    #[error("Invalid procedure argument: {0}")]
    InvalidArgument(String),

    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,

    /// Opaque transport failure
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Mapping engine errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrmError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// `get` matched no rows
    #[error("{model} matching query does not exist")]
    DoesNotExist { model: String },

    /// `get` matched more than one row
    #[error("get() on {model} returned more than one object (at least {count})")]
    MultipleObjectsReturned { model: String, count: usize },

    /// Operation needs a primary key the model does not declare
    #[error("Model '{model}' declares no primary key, required by {operation}")]
    MissingPrimaryKey {
        model: String,
        operation: &'static str,
    },

    /// Update operation suffix not recognised
    #[error("Unknown update operation '{operation}' for field '{field}'")]
    UnknownOperation { field: String, operation: String },

    /// Update operation not applicable to the field's type
    #[error("Operation '{operation}' is not applicable to {field_type} field '{field}'")]
    UnsupportedOperation {
        field: String,
        operation: &'static str,
        field_type: FieldType,
    },

    /// Field has no value where one is required
    #[error("Field '{field}' of model '{model}' has no value")]
    MissingValue { model: String, field: String },

    /// Declaration file could not be read or parsed
    #[error("Definition error: {0}")]
    Definition(String),
}

impl OrmError {
    /// Returns true for field type/range violations.
    pub fn is_validation(&self) -> bool {
        matches!(self, OrmError::Validation(_))
    }

    /// Returns true for schema-level mismatches.
    pub fn is_field_error(&self) -> bool {
        matches!(self, OrmError::Field(_))
    }

    /// Returns true for caller misuse: missing primary key, unknown or
    /// inapplicable update operation, unassigned field.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            OrmError::MissingPrimaryKey { .. }
                | OrmError::UnknownOperation { .. }
                | OrmError::UnsupportedOperation { .. }
                | OrmError::MissingValue { .. }
        )
    }

    /// Returns true when `get` found nothing for the named model.
    pub fn is_does_not_exist(&self, model: &str) -> bool {
        matches!(self, OrmError::DoesNotExist { model: m } if m == model)
    }

    /// Returns true when `get` found several rows for the named model.
    pub fn is_multiple_objects_returned(&self, model: &str) -> bool {
        matches!(self, OrmError::MultipleObjectsReturned { model: m, .. } if m == model)
    }
}
