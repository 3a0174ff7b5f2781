//! Object-tuple mapping for space/index tuple stores.
//!
//! Provides typed field declarations, immutable model schemas, records with
//! identity tracking, and a manager that translates field equality queries
//! into index-numbered store operations.

pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
pub mod field;
pub mod model;
pub mod schema;
pub mod store;

pub use config::{ModelMeta, DEFAULT_ALIAS};
pub use connection::{Connection, ConnectionRegistry};
pub use error::{ConnectionError, FieldError, OrmError, Result, StoreError, ValidationError};
pub use field::{Field, FieldBuilder, FieldType, Value};
pub use model::{Manager, Model, ModelBuilder, Operation, OperationKind, Record};
pub use schema::{FieldDefinition, IndexKey, ModelDefinition, Schema};
pub use store::{
    IndexDefinition, MemoryStore, SpaceDefinition, Store, Tuple, WireOp, WireOperator, WireValue,
};
