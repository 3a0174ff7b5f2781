//! Declarative model definitions loaded from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ModelMeta;
use crate::error::OrmError;
use crate::field::{FieldBuilder, FieldType};

/// Model definition file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Model name
    pub name: String,
    /// Field definitions in tuple order
    pub fields: Vec<FieldDefinition>,
    /// Connection alias and decode strictness
    #[serde(default)]
    pub meta: ModelMeta,
}

/// Field entry of a model definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Field type
    pub r#type: FieldType,
    /// Primary key flag
    #[serde(default)]
    pub primary_key: bool,
    /// Backing index number
    #[serde(default)]
    pub db_index: Option<u32>,
}

impl FieldDefinition {
    /// Converts the entry into a field declaration.
    pub fn to_builder(&self) -> FieldBuilder {
        let mut builder = FieldBuilder::new(self.name.clone(), self.r#type);
        if self.primary_key {
            builder = builder.primary_key();
        }
        if let Some(index) = self.db_index {
            builder = builder.db_index(index);
        }
        builder
    }
}

impl ModelDefinition {
    /// Parses a definition from JSON text.
    pub fn from_json(text: &str) -> Result<Self, OrmError> {
        serde_json::from_str(text).map_err(|e| OrmError::Definition(e.to_string()))
    }

    /// Reads and parses a definition file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, OrmError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| OrmError::Definition(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Field declarations in tuple order.
    pub fn field_builders(&self) -> Vec<FieldBuilder> {
        self.fields.iter().map(FieldDefinition::to_builder).collect()
    }
}
