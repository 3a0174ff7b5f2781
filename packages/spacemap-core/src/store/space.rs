//! Space and index layouts for the in-memory store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Layout of one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceDefinition {
    /// Space number
    pub space: u32,
    /// Indexes; index 0 is the primary index
    pub indexes: Vec<IndexDefinition>,
}

/// Layout of one index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Index number
    pub index: u32,
    /// Tuple positions forming the key, in key order
    pub parts: Vec<usize>,
    /// Whether two tuples may share a key
    #[serde(default = "default_unique")]
    pub unique: bool,
}

fn default_unique() -> bool {
    true
}

impl SpaceDefinition {
    /// Creates a space with no indexes.
    pub fn new(space: u32) -> Self {
        Self {
            space,
            indexes: Vec::new(),
        }
    }

    /// Adds an index. Returns self for method chaining.
    #[must_use]
    pub fn with_index(mut self, index: u32, parts: impl Into<Vec<usize>>, unique: bool) -> Self {
        self.indexes.push(IndexDefinition {
            index,
            parts: parts.into(),
            unique,
        });
        self
    }

    /// Validates the layout.
    ///
    /// Index 0 must exist and be unique, index numbers must be distinct and
    /// every index must have at least one part.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        for index in &self.indexes {
            if !seen.insert(index.index) {
                return Err(StoreError::InvalidDefinition(format!(
                    "space {} declares index {} twice",
                    self.space, index.index
                )));
            }
            if index.parts.is_empty() {
                return Err(StoreError::InvalidDefinition(format!(
                    "index {} of space {} has no parts",
                    index.index, self.space
                )));
            }
        }

        match self.indexes.iter().find(|i| i.index == 0) {
            Some(primary) if primary.unique => Ok(()),
            Some(_) => Err(StoreError::InvalidDefinition(format!(
                "primary index of space {} must be unique",
                self.space
            ))),
            None => Err(StoreError::InvalidDefinition(format!(
                "space {} has no primary index",
                self.space
            ))),
        }
    }
}

/// Parses a JSON array of space definitions.
pub fn load_space_definitions(text: &str) -> Result<Vec<SpaceDefinition>, StoreError> {
    let spaces: Vec<SpaceDefinition> =
        serde_json::from_str(text).map_err(|e| StoreError::InvalidDefinition(e.to_string()))?;
    for space in &spaces {
        space.validate()?;
    }
    Ok(spaces)
}
