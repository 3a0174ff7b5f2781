//! Translation between field-ordered values and positional wire tuples.

use std::collections::BTreeMap;

use crate::error::{FieldError, OrmError};
use crate::field::Value;
use crate::schema::Schema;
use crate::store::{Tuple, WireValue};

/// Encodes values held in declaration order into a wire tuple.
///
/// Every value is re-validated; an unassigned field is an error.
pub fn encode(schema: &Schema, values: &[Option<Value>]) -> Result<Tuple, OrmError> {
    let mut tuple = Vec::with_capacity(schema.len());
    for (position, field) in schema.fields().iter().enumerate() {
        let value = values
            .get(position)
            .and_then(Option::as_ref)
            .ok_or_else(|| OrmError::MissingValue {
                model: schema.model_name().to_string(),
                field: field.name().to_string(),
            })?;
        tuple.push(field.to_wire(value)?);
    }
    Ok(tuple)
}

/// Decodes a stored tuple into values in declaration order.
///
/// With `check_tuple_length` enabled the tuple must have exactly one element
/// per field; otherwise trailing elements beyond the declared fields are
/// ignored. A tuple shorter than the schema is always rejected.
pub fn decode(schema: &Schema, tuple: &[WireValue]) -> Result<Vec<Value>, FieldError> {
    let expected = schema.len();
    let strict = schema.meta().check_tuple_length;
    if tuple.len() < expected || (strict && tuple.len() != expected) {
        tracing::warn!(
            model = schema.model_name(),
            expected,
            actual = tuple.len(),
            "stored tuple does not match declared fields"
        );
        return Err(FieldError::TupleLength {
            model: schema.model_name().to_string(),
            expected,
            actual: tuple.len(),
        });
    }

    schema
        .fields()
        .iter()
        .zip(tuple)
        .map(|(field, bytes)| field.from_wire(bytes))
        .collect()
}

/// Builds a wire key from values keyed by tuple position.
///
/// Key parts follow `positions`, not the order the caller supplied the
/// values in.
pub fn encode_key(
    schema: &Schema,
    positions: &[usize],
    values: &BTreeMap<usize, Value>,
) -> Result<Vec<WireValue>, OrmError> {
    let mut key = Vec::with_capacity(positions.len());
    for &position in positions {
        let field = &schema.fields()[position];
        let value = values.get(&position).ok_or_else(|| OrmError::MissingValue {
            model: schema.model_name().to_string(),
            field: field.name().to_string(),
        })?;
        key.push(field.to_wire(value)?);
    }
    Ok(key)
}
