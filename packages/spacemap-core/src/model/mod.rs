//! Models, records and the per-model query manager.
//!
//! A [`Model`] pairs an immutable [`Schema`] with the connection registry its
//! alias is resolved against. The alias is looked up again on every store
//! operation, so registering or disposing a connection takes effect
//! immediately for all records and managers of the model.

mod manager;
mod operation;
mod record;

use std::fmt;
use std::sync::Arc;

use crate::config::ModelMeta;
use crate::connection::{Connection, ConnectionRegistry};
use crate::error::{FieldError, Result};
use crate::field::{FieldBuilder, Value};
use crate::schema::{ModelDefinition, Schema};

pub use manager::Manager;
pub use operation::{Operation, OperationKind};
pub use record::Record;

struct ModelInner {
    schema: Schema,
    registry: Arc<ConnectionRegistry>,
}

/// A declared model. Cheap to clone.
#[derive(Clone)]
pub struct Model {
    inner: Arc<ModelInner>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name())
            .field("db_alias", &self.schema().meta().db_alias)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Starts declaring a model.
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(name)
    }

    /// Starts a model declaration from a parsed definition.
    pub fn from_definition(definition: &ModelDefinition) -> ModelBuilder {
        ModelBuilder::new(definition.name.clone())
            .fields(definition.field_builders())
            .meta(definition.meta.clone())
    }

    /// Returns the model name.
    pub fn name(&self) -> &str {
        self.inner.schema.model_name()
    }

    /// Returns the model schema.
    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    /// Returns the query manager.
    pub fn objects(&self) -> Manager {
        Manager::new(self.clone())
    }

    /// Resolves the model's alias to its space and store.
    pub fn connection(&self) -> Result<Connection> {
        Ok(self.inner.registry.get(&self.schema().meta().db_alias)?)
    }

    /// Builds an unsaved record from `(field, value)` pairs.
    ///
    /// Every value is validated; fields not mentioned stay unassigned.
    pub fn new_record<I, K, V>(&self, values: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Record::blank(self.clone());
        for (name, value) in values {
            record.set(name.as_ref(), value)?;
        }
        Ok(record)
    }
}

/// Collects field declarations and metadata for a [`Model`].
#[derive(Debug)]
pub struct ModelBuilder {
    name: String,
    fields: Vec<FieldBuilder>,
    meta: ModelMeta,
    registry: Option<Arc<ConnectionRegistry>>,
}

impl ModelBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            meta: ModelMeta::default(),
            registry: None,
        }
    }

    /// Appends a field; declaration order is tuple order.
    #[must_use]
    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends several fields.
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldBuilder>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Connection alias the model resolves on every operation.
    #[must_use]
    pub fn db_alias(mut self, alias: impl Into<String>) -> Self {
        self.meta.db_alias = alias.into();
        self
    }

    /// Whether fetched tuples must have exactly one element per field.
    #[must_use]
    pub fn check_tuple_length(mut self, check: bool) -> Self {
        self.meta.check_tuple_length = check;
        self
    }

    /// Replaces all metadata.
    #[must_use]
    pub fn meta(mut self, meta: ModelMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Resolves aliases against `registry` instead of the process-wide one.
    #[must_use]
    pub fn registry(mut self, registry: Arc<ConnectionRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Validates the declarations and builds the model.
    pub fn build(self) -> Result<Model, FieldError> {
        let schema = Schema::build(self.name, self.fields, self.meta)?;
        tracing::debug!(
            model = schema.model_name(),
            fields = schema.len(),
            db_alias = %schema.meta().db_alias,
            "model declared"
        );
        Ok(Model {
            inner: Arc::new(ModelInner {
                schema,
                registry: self.registry.unwrap_or_else(ConnectionRegistry::global),
            }),
        })
    }
}
