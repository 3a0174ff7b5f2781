//! Model schema: tuple layout, primary key and index map.

mod definition;
#[allow(clippy::module_inception)]
mod schema;
pub(crate) mod validation;

pub use definition::{FieldDefinition, ModelDefinition};
pub use schema::{IndexKey, Schema};
