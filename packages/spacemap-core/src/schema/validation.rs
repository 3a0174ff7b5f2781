//! Build-time checks for model declarations.

use std::collections::HashSet;

use crate::error::FieldError;
use crate::field::FieldBuilder;

/// Validates that the model declares at least one field and no name twice.
pub(crate) fn validate_field_names(model: &str, fields: &[FieldBuilder]) -> Result<(), FieldError> {
    if fields.is_empty() {
        return Err(FieldError::EmptySchema {
            model: model.to_string(),
        });
    }

    let mut seen_names = HashSet::new();
    for field in fields {
        if !seen_names.insert(field.name()) {
            return Err(FieldError::DuplicateField {
                model: model.to_string(),
                field: field.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Locates the single primary-key declaration, if any.
///
/// # Returns
/// `Ok(Some(position))` for one primary key, `Ok(None)` for none, and
/// `FieldError::MultiplePrimaryKeys` otherwise.
pub(crate) fn locate_primary_key(
    model: &str,
    fields: &[FieldBuilder],
) -> Result<Option<usize>, FieldError> {
    let mut found: Option<usize> = None;
    for (position, field) in fields.iter().enumerate() {
        if !field.is_primary_key() {
            continue;
        }
        if let Some(first) = found {
            return Err(FieldError::MultiplePrimaryKeys {
                model: model.to_string(),
                first: fields[first].name().to_string(),
                second: field.name().to_string(),
            });
        }
        found = Some(position);
    }
    Ok(found)
}

/// Backs an unindexed primary key with index 0.
///
/// Fails when index 0 is already declared by other fields.
pub(crate) fn assign_primary_index(
    model: &str,
    fields: &mut [FieldBuilder],
    primary_key: Option<usize>,
) -> Result<(), FieldError> {
    let Some(position) = primary_key else {
        return Ok(());
    };
    if fields[position].declared_index().is_some() {
        return Ok(());
    }

    if fields.iter().any(|f| f.declared_index() == Some(0)) {
        return Err(FieldError::PrimaryIndexConflict {
            model: model.to_string(),
            field: fields[position].name().to_string(),
        });
    }
    fields[position].set_db_index(0);
    Ok(())
}
