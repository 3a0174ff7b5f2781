//! Model metadata configuration.

use serde::{Deserialize, Serialize};

/// Alias used by models that do not name one.
pub const DEFAULT_ALIAS: &str = "default";

/// Per-model metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMeta {
    /// Connection alias resolved on every store operation
    pub db_alias: String,
    /// Reject decoded tuples whose length differs from the field count
    pub check_tuple_length: bool,
}

impl Default for ModelMeta {
    fn default() -> Self {
        Self {
            db_alias: DEFAULT_ALIAS.to_string(),
            check_tuple_length: true,
        }
    }
}
