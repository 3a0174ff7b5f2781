//! Model instances and their persistence lifecycle.

use std::collections::BTreeMap;
use std::fmt;

use crate::codec;
use crate::error::{OrmError, Result};
use crate::field::Value;
use crate::store::{Tuple, WireValue};

use super::operation::Operation;
use super::Model;

/// One instance of a model.
///
/// Values are held in declaration order. `exists_in_db` is set once the
/// record has been loaded from or written to the store and cleared by
/// [`Record::delete`]. A failed operation leaves the record unchanged.
#[derive(Clone)]
pub struct Record {
    model: Model,
    values: Vec<Option<Value>>,
    exists_in_db: bool,
}

impl Record {
    pub(crate) fn blank(model: Model) -> Self {
        let values = vec![None; model.schema().len()];
        Self {
            model,
            values,
            exists_in_db: false,
        }
    }

    /// Decodes a stored tuple into a persisted record.
    pub(crate) fn from_tuple(model: Model, tuple: &[WireValue]) -> Result<Self> {
        let values = codec::decode(model.schema(), tuple)?;
        Ok(Self {
            model,
            values: values.into_iter().map(Some).collect(),
            exists_in_db: true,
        })
    }

    /// Returns the record's model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Returns true if the record mirrors a stored tuple.
    pub fn exists_in_db(&self) -> bool {
        self.exists_in_db
    }

    /// Returns a field's value, or `None` if the field is unknown or unassigned.
    pub fn get(&self, field: &str) -> Option<&Value> {
        let position = self.model.schema().position(field)?;
        self.values[position].as_ref()
    }

    /// Validates and assigns a field's value.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let field = self.model.schema().require_field(field)?;
        let value = field.validate(value.into())?;
        self.values[field.position()] = Some(value);
        Ok(())
    }

    /// Returns the primary-key value, if the model declares one and it is set.
    pub fn pk(&self) -> Option<&Value> {
        let field = self.model.schema().primary_key_field()?;
        self.values[field.position()].as_ref()
    }

    /// Iterates `(field, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.model
            .schema()
            .field_order()
            .zip(self.values.iter().map(Option::as_ref))
    }

    /// Encodes the record into its wire tuple.
    pub fn to_tuple(&self) -> Result<Tuple> {
        codec::encode(self.model.schema(), &self.values)
    }

    /// Renders the record as a JSON object keyed by field name.
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .iter()
            .map(|(name, value)| {
                let json = match value {
                    Some(Value::Int(v)) => serde_json::Value::from(*v),
                    Some(Value::UInt(v)) => serde_json::Value::from(*v),
                    Some(Value::Str(s)) => serde_json::Value::from(s.as_str()),
                    None => serde_json::Value::Null,
                };
                (name.to_string(), json)
            })
            .collect();
        serde_json::Value::Object(object)
    }

    /// Writes every field to the store.
    ///
    /// A record not yet stored is inserted or replaces the tuple sharing its
    /// primary index key. A stored record is replaced in full, which needs a
    /// primary key.
    pub fn save(&mut self) -> Result<&Self> {
        let schema = self.model.schema();
        if self.exists_in_db && schema.primary_key_field().is_none() {
            return Err(OrmError::MissingPrimaryKey {
                model: schema.model_name().to_string(),
                operation: "save",
            });
        }

        let tuple = codec::encode(schema, &self.values)?;
        let connection = self.model.connection()?;
        let stored = connection.store().replace(connection.space(), tuple)?;
        let values = codec::decode(schema, &stored)?;

        tracing::debug!(
            model = schema.model_name(),
            space = connection.space(),
            inserted = !self.exists_in_db,
            "record saved"
        );
        self.values = values.into_iter().map(Some).collect();
        self.exists_in_db = true;
        Ok(self)
    }

    /// Applies all operations to the stored tuple in one store command.
    ///
    /// The record is refreshed from the tuple the store returns.
    pub fn update(&mut self, operations: impl IntoIterator<Item = Operation>) -> Result<&Self> {
        let schema = self.model.schema();
        let (index, key) = self.primary_key_lookup("update")?;
        let ops = operations
            .into_iter()
            .map(|op| op.to_wire(schema))
            .collect::<Result<Vec<_>>>()?;

        let connection = self.model.connection()?;
        let stored = connection
            .store()
            .update(connection.space(), index, &key, &ops)?
            .ok_or_else(|| OrmError::DoesNotExist {
                model: schema.model_name().to_string(),
            })?;
        let values = codec::decode(schema, &stored)?;

        tracing::debug!(
            model = schema.model_name(),
            space = connection.space(),
            ops = ops.len(),
            "record updated"
        );
        self.values = values.into_iter().map(Some).collect();
        self.exists_in_db = true;
        Ok(self)
    }

    /// Deletes the stored tuple by primary key.
    ///
    /// # Returns
    /// `true` if a tuple was removed.
    pub fn delete(&mut self) -> Result<bool> {
        let (index, key) = self.primary_key_lookup("delete")?;
        let connection = self.model.connection()?;
        let removed = connection
            .store()
            .delete(connection.space(), index, &key)?
            .is_some();

        tracing::debug!(
            model = self.model.name(),
            space = connection.space(),
            removed,
            "record deleted"
        );
        self.exists_in_db = false;
        Ok(removed)
    }

    /// Index number and wire key addressing this record by primary key.
    fn primary_key_lookup(&self, operation: &'static str) -> Result<(u32, Vec<WireValue>)> {
        let schema = self.model.schema();
        let index = schema
            .primary_index()
            .ok_or_else(|| OrmError::MissingPrimaryKey {
                model: schema.model_name().to_string(),
                operation,
            })?;

        let positions = schema.index_positions(index).unwrap_or_default();
        let values: BTreeMap<usize, Value> = positions
            .iter()
            .filter_map(|&p| self.values[p].clone().map(|v| (p, v)))
            .collect();
        let key = codec::encode_key(schema, positions, &values)?;
        Ok((index, key))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.model.name() == other.model.name() && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.model.name());
        for (name, value) in self.iter() {
            s.field(name, &value);
        }
        s.field("exists_in_db", &self.exists_in_db).finish()
    }
}
