//! Query entry point: keyword equality constraints to index-numbered store calls.

use std::collections::BTreeMap;

use crate::codec;
use crate::error::{OrmError, Result};
use crate::field::Value;
use crate::store::WireValue;

use super::record::Record;
use super::Model;

/// Resolved index and wire key for one set of equality constraints.
struct Lookup {
    index: u32,
    key: Vec<WireValue>,
}

/// Per-model query interface, obtained from [`Model::objects`].
///
/// Constraints are `(field, value)` pairs naming indexed fields; order does
/// not matter. See [`Schema::resolve_index`](crate::Schema::resolve_index)
/// for how a field set maps to an index and key. Index resolution and value
/// validation both complete before the store is contacted.
#[derive(Debug, Clone)]
pub struct Manager {
    model: Model,
}

impl Manager {
    pub(crate) fn new(model: Model) -> Self {
        Self { model }
    }

    /// Fetches the single record matching the constraints.
    ///
    /// # Returns
    /// `Err(OrmError::DoesNotExist)` when nothing matches,
    /// `Err(OrmError::MultipleObjectsReturned)` when more than one row does.
    pub fn get<I, K, V>(&self, constraints: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let lookup = self.lookup(constraints)?;
        let connection = self.model.connection()?;
        let rows = connection
            .store()
            .select(connection.space(), lookup.index, &lookup.key, Some(2))?;

        tracing::debug!(
            model = self.model.name(),
            space = connection.space(),
            index = lookup.index,
            rows = rows.len(),
            "get"
        );
        match rows.as_slice() {
            [] => Err(OrmError::DoesNotExist {
                model: self.model.name().to_string(),
            }),
            [row] => Record::from_tuple(self.model.clone(), row),
            _ => Err(OrmError::MultipleObjectsReturned {
                model: self.model.name().to_string(),
                count: rows.len(),
            }),
        }
    }

    /// Fetches every record matching the constraints, in store order.
    pub fn filter<I, K, V>(&self, constraints: I) -> Result<Vec<Record>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let lookup = self.lookup(constraints)?;
        let connection = self.model.connection()?;
        let rows = connection
            .store()
            .select(connection.space(), lookup.index, &lookup.key, None)?;

        tracing::debug!(
            model = self.model.name(),
            space = connection.space(),
            index = lookup.index,
            rows = rows.len(),
            "filter"
        );
        rows.iter()
            .map(|row| Record::from_tuple(self.model.clone(), row))
            .collect()
    }

    /// Builds a record from `(field, value)` pairs and saves it.
    pub fn create<I, K, V>(&self, values: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = self.model.new_record(values)?;
        record.save()?;
        Ok(record)
    }

    /// Deletes the first tuple matching the constraints.
    ///
    /// # Returns
    /// `true` if a tuple was removed; no match is not an error.
    pub fn delete<I, K, V>(&self, constraints: I) -> Result<bool>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let lookup = self.lookup(constraints)?;
        let connection = self.model.connection()?;
        let removed = connection
            .store()
            .delete(connection.space(), lookup.index, &lookup.key)?
            .is_some();

        tracing::debug!(
            model = self.model.name(),
            space = connection.space(),
            index = lookup.index,
            removed,
            "delete"
        );
        Ok(removed)
    }

    /// Resolves the index and encodes a validated key.
    fn lookup<I, K, V>(&self, constraints: I) -> Result<Lookup>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let schema = self.model.schema();
        let constraints: Vec<(K, Value)> = constraints
            .into_iter()
            .map(|(name, value)| (name, value.into()))
            .collect();

        let resolved = schema.resolve_index(constraints.iter().map(|(name, _)| name.as_ref()))?;

        let mut values = BTreeMap::new();
        for (name, value) in constraints {
            let field = schema.require_field(name.as_ref())?;
            values.insert(field.position(), field.validate(value)?);
        }
        let key = codec::encode_key(schema, &resolved.positions, &values)?;
        Ok(Lookup {
            index: resolved.index,
            key,
        })
    }
}
