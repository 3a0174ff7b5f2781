//! Immutable model schema.
//!
//! Each schema has:
//! - Fields in declaration order, which is also their tuple position
//! - An optional primary-key field
//! - A map from index number to the ordered fields forming that index

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::ModelMeta;
use crate::error::FieldError;
use crate::field::{Field, FieldBuilder};

use super::validation;

/// Tuple layout and index map of one model.
#[derive(Debug, Clone)]
pub struct Schema {
    model: String,
    fields: Vec<Field>,
    positions: HashMap<String, usize>,
    primary_key: Option<usize>,
    indexes: BTreeMap<u32, Vec<usize>>,
    meta: ModelMeta,
}

impl Schema {
    /// Builds a schema from ordered field declarations.
    ///
    /// # Arguments
    /// * `model` - Model name, used in errors and logs
    /// * `fields` - Field declarations; declaration order is tuple order
    /// * `meta` - Connection alias and decode strictness
    ///
    /// # Returns
    /// `Result<Schema, FieldError>` containing the schema or the first
    /// declaration problem found.
    pub fn build(
        model: impl Into<String>,
        mut fields: Vec<FieldBuilder>,
        meta: ModelMeta,
    ) -> Result<Self, FieldError> {
        let model = model.into();

        validation::validate_field_names(&model, &fields)?;
        let primary_key = validation::locate_primary_key(&model, &fields)?;
        validation::assign_primary_index(&model, &mut fields, primary_key)?;

        let fields: Vec<Field> = fields
            .into_iter()
            .enumerate()
            .map(|(position, builder)| builder.build_with_position(position))
            .collect();

        let positions = fields
            .iter()
            .map(|f| (f.name().to_string(), f.position()))
            .collect();

        let mut indexes: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for field in &fields {
            if let Some(index) = field.db_index() {
                indexes.entry(index).or_default().push(field.position());
            }
        }

        Ok(Self {
            model,
            fields,
            positions,
            primary_key,
            indexes,
            meta,
        })
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Returns the model metadata.
    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the number of declared fields (the expected tuple length).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order: field i occupies tuple offset i.
    pub fn field_order(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::name)
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.positions.get(name).map(|&p| &self.fields[p])
    }

    /// Looks up a field by name, failing with `FieldError::UnknownField`.
    pub fn require_field(&self, name: &str) -> Result<&Field, FieldError> {
        self.field(name).ok_or_else(|| FieldError::UnknownField {
            model: self.model.clone(),
            field: name.to_string(),
        })
    }

    /// Returns the tuple position of a field.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Returns the primary-key field, if declared.
    pub fn primary_key_field(&self) -> Option<&Field> {
        self.primary_key.map(|p| &self.fields[p])
    }

    /// Returns the index number backing the primary key.
    pub fn primary_index(&self) -> Option<u32> {
        self.primary_key_field().and_then(Field::db_index)
    }

    /// Returns the declared index numbers in ascending order.
    pub fn index_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.indexes.keys().copied()
    }

    /// Returns the field names forming an index, in declaration order.
    pub fn index_fields(&self, index: u32) -> Option<Vec<&str>> {
        self.indexes
            .get(&index)
            .map(|positions| positions.iter().map(|&p| self.fields[p].name()).collect())
    }

    /// Returns the tuple positions forming an index, in declaration order.
    pub fn index_positions(&self, index: u32) -> Option<&[usize]> {
        self.indexes.get(&index).map(Vec::as_slice)
    }

    /// Resolves the index and key layout for a set of queried fields.
    ///
    /// Keyword order does not matter. Queried fields are grouped by index
    /// number; the lowest number is the index addressed, and the key lists
    /// the groups in ascending number, each in declaration order. Every group
    /// but the last must name all fields of its index, the last a leading
    /// run of them, so a single field of a composite index yields a prefix
    /// key.
    pub fn resolve_index<'a, I>(&self, names: I) -> Result<IndexKey, FieldError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut queried = BTreeSet::new();
        for name in names {
            let field = self.require_field(name)?;
            if field.db_index().is_none() {
                return Err(FieldError::NotIndexed {
                    model: self.model.clone(),
                    field: name.to_string(),
                });
            }
            if !queried.insert(field.position()) {
                return Err(FieldError::DuplicateQueryField {
                    model: self.model.clone(),
                    field: name.to_string(),
                });
            }
        }

        let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for &position in &queried {
            if let Some(index) = self.fields[position].db_index() {
                groups.entry(index).or_default().push(position);
            }
        }

        let Some(&index) = groups.keys().next() else {
            return Err(FieldError::EmptyQuery {
                model: self.model.clone(),
            });
        };

        let last = groups.len() - 1;
        let spans = groups.iter().enumerate().all(|(n, (number, positions))| {
            self.indexes.get(number).is_some_and(|declared| {
                if n == last {
                    declared.starts_with(positions)
                } else {
                    declared == positions
                }
            })
        });
        if !spans {
            return Err(FieldError::NoMatchingIndex {
                model: self.model.clone(),
                fields: queried
                    .iter()
                    .map(|&p| self.fields[p].name().to_string())
                    .collect(),
            });
        }

        Ok(IndexKey {
            index,
            positions: groups.into_values().flatten().collect(),
        })
    }
}

/// Index number and ordered key positions resolved for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexKey {
    pub index: u32,
    /// Tuple positions of the key parts, in key order.
    pub positions: Vec<usize>,
}
