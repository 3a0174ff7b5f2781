//! Store capability consumed by the mapping engine, plus an in-memory store.
//!
//! The engine never speaks a wire protocol itself: every read and write goes
//! through [`Store`], addressed by space number and index number.

mod memory;
mod space;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use space::{load_space_definitions, IndexDefinition, SpaceDefinition};

/// One stored tuple element in wire form.
pub type WireValue = Vec<u8>;

/// An ordered, positional tuple as held by a space.
pub type Tuple = Vec<WireValue>;

/// Update operator applied by the store to one tuple position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireOperator {
    Assign,
    Add,
    BitAnd,
    BitOr,
    BitXor,
}

/// A single positional update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireOp {
    /// Tuple position to modify
    pub position: usize,
    /// Operator to apply
    pub operator: WireOperator,
    /// Operand in wire form
    pub operand: WireValue,
}

/// Store capability keyed by space number and index number.
///
/// Implementations own transport, framing and authentication. Every call is
/// one synchronous round trip.
pub trait Store: Send + Sync {
    /// Selects tuples whose index key equals `key`, in store order.
    ///
    /// A key shorter than the index matches on its leading parts.
    fn select(
        &self,
        space: u32,
        index: u32,
        key: &[WireValue],
        limit: Option<usize>,
    ) -> Result<Vec<Tuple>, StoreError>;

    /// Inserts a tuple, failing on a duplicate unique key.
    fn insert(&self, space: u32, tuple: Tuple) -> Result<Tuple, StoreError>;

    /// Inserts a tuple or replaces the one sharing its primary key.
    fn replace(&self, space: u32, tuple: Tuple) -> Result<Tuple, StoreError>;

    /// Applies all `ops` to the first tuple matching `key` as one command.
    ///
    /// Returns the updated tuple, or `None` when no tuple matched.
    fn update(
        &self,
        space: u32,
        index: u32,
        key: &[WireValue],
        ops: &[WireOp],
    ) -> Result<Option<Tuple>, StoreError>;

    /// Deletes the first tuple matching `key`, returning it if one existed.
    fn delete(
        &self,
        space: u32,
        index: u32,
        key: &[WireValue],
    ) -> Result<Option<Tuple>, StoreError>;

    /// Invokes an administrative stored procedure.
    fn call(&self, procedure: &str, args: &[WireValue]) -> Result<Vec<Tuple>, StoreError>;
}
