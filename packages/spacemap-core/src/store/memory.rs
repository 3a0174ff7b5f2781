//! In-memory store implementing the full store capability.
//!
//! Each space has:
//! - Declared indexes (index 0 is the unique primary index)
//! - Tuples kept in insertion order
//!
//! Lookups scan tuples and compare key bytes at the index's part positions.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::StoreError;

use super::space::{IndexDefinition, SpaceDefinition};
use super::{Store, Tuple, WireOp, WireOperator, WireValue};

/// Procedure that empties the space named by its single argument.
const CLEAR_SPACE: &str = "clear_space";

#[derive(Debug)]
struct Space {
    number: u32,
    indexes: BTreeMap<u32, IndexDefinition>,
    tuples: Vec<Tuple>,
}

impl Space {
    fn new(definition: SpaceDefinition) -> Self {
        Self {
            number: definition.space,
            indexes: definition
                .indexes
                .into_iter()
                .map(|i| (i.index, i))
                .collect(),
            tuples: Vec::new(),
        }
    }

    fn index(&self, index: u32) -> Result<&IndexDefinition, StoreError> {
        self.indexes.get(&index).ok_or(StoreError::IndexNotFound {
            space: self.number,
            index,
        })
    }

    /// Resolves an index and checks the key against its parts.
    ///
    /// A key may name a leading subset of the parts; it may not be empty or
    /// longer than the index.
    fn keyed_index(&self, index: u32, key: &[WireValue]) -> Result<&IndexDefinition, StoreError> {
        let definition = self.index(index)?;
        if key.is_empty() || key.len() > definition.parts.len() {
            return Err(StoreError::KeyArity {
                space: self.number,
                index,
                expected: definition.parts.len(),
                actual: key.len(),
            });
        }
        Ok(definition)
    }

    /// Positions of tuples matching the key, in store order.
    fn matching(&self, definition: &IndexDefinition, key: &[WireValue]) -> Vec<usize> {
        self.tuples
            .iter()
            .enumerate()
            .filter(|(_, tuple)| key_matches(tuple, &definition.parts, key))
            .map(|(position, _)| position)
            .collect()
    }

    /// Checks the tuple covers every indexed position.
    fn check_coverage(&self, tuple: &Tuple) -> Result<(), StoreError> {
        for definition in self.indexes.values() {
            for &position in &definition.parts {
                if position >= tuple.len() {
                    return Err(StoreError::TupleTooShort {
                        space: self.number,
                        index: definition.index,
                        position,
                        len: tuple.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks unique indexes against every stored tuple except `skip`.
    fn check_unique(&self, tuple: &Tuple, skip: Option<usize>) -> Result<(), StoreError> {
        for definition in self.indexes.values().filter(|i| i.unique) {
            let key = extract_key(tuple, &definition.parts);
            let conflict = self
                .tuples
                .iter()
                .enumerate()
                .any(|(position, stored)| {
                    Some(position) != skip && key_matches(stored, &definition.parts, &key)
                });
            if conflict {
                return Err(StoreError::DuplicateKey {
                    space: self.number,
                    index: definition.index,
                });
            }
        }
        Ok(())
    }

    fn primary_parts(&self) -> Result<&[usize], StoreError> {
        Ok(&self.index(0)?.parts)
    }
}

/// Returns true if the tuple's bytes at the leading `parts` equal `key`.
fn key_matches(tuple: &Tuple, parts: &[usize], key: &[WireValue]) -> bool {
    parts
        .iter()
        .zip(key)
        .all(|(&position, expected)| tuple.get(position) == Some(expected))
}

fn extract_key(tuple: &Tuple, parts: &[usize]) -> Vec<WireValue> {
    parts
        .iter()
        .filter_map(|&position| tuple.get(position).cloned())
        .collect()
}

/// Applies one arithmetic or bitwise operator to little-endian integers.
fn apply_numeric(
    position: usize,
    operator: WireOperator,
    current: &[u8],
    operand: &[u8],
) -> Result<WireValue, StoreError> {
    if current.len() != operand.len() {
        return Err(StoreError::InvalidOperand {
            position,
            reason: format!(
                "operand is {} bytes, stored value is {}",
                operand.len(),
                current.len()
            ),
        });
    }

    macro_rules! combine {
        ($t:ty, $n:literal) => {{
            let mut a = [0u8; $n];
            let mut b = [0u8; $n];
            a.copy_from_slice(current);
            b.copy_from_slice(operand);
            let (a, b) = (<$t>::from_le_bytes(a), <$t>::from_le_bytes(b));
            let result = match operator {
                WireOperator::Add => a.wrapping_add(b),
                WireOperator::BitAnd => a & b,
                WireOperator::BitOr => a | b,
                WireOperator::BitXor => a ^ b,
                WireOperator::Assign => b,
            };
            Ok(result.to_le_bytes().to_vec())
        }};
    }

    match current.len() {
        4 => combine!(u32, 4),
        8 => combine!(u64, 8),
        other => Err(StoreError::InvalidOperand {
            position,
            reason: format!("arithmetic on a {}-byte value", other),
        }),
    }
}

/// HashMap-backed store of spaces for tests, tools and development.
#[derive(Debug, Default)]
pub struct MemoryStore {
    spaces: RwLock<HashMap<u32, Space>>,
    requests: AtomicU64,
}

impl MemoryStore {
    /// Creates a store with no spaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given spaces.
    pub fn with_spaces(
        definitions: impl IntoIterator<Item = SpaceDefinition>,
    ) -> Result<Self, StoreError> {
        let store = Self::new();
        for definition in definitions {
            store.create_space(definition)?;
        }
        Ok(store)
    }

    /// Creates an empty space.
    pub fn create_space(&self, definition: SpaceDefinition) -> Result<(), StoreError> {
        definition.validate()?;
        let mut spaces = self.spaces.write().map_err(|_| StoreError::LockPoisoned)?;
        if spaces.contains_key(&definition.space) {
            return Err(StoreError::SpaceExists {
                space: definition.space,
            });
        }
        tracing::debug!(space = definition.space, indexes = definition.indexes.len(), "space created");
        spaces.insert(definition.space, Space::new(definition));
        Ok(())
    }

    /// Number of capability calls served so far.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Acquire)
    }

    /// Number of tuples in a space.
    pub fn len(&self, space: u32) -> Result<usize, StoreError> {
        self.with_space(space, |s| Ok(s.tuples.len()))
    }

    /// Snapshot of a space's tuples in store order.
    pub fn tuples(&self, space: u32) -> Result<Vec<Tuple>, StoreError> {
        self.with_space(space, |s| Ok(s.tuples.clone()))
    }

    fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::AcqRel);
    }

    fn with_space<R>(
        &self,
        space: u32,
        f: impl FnOnce(&Space) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let spaces = self.spaces.read().map_err(|_| StoreError::LockPoisoned)?;
        let space = spaces.get(&space).ok_or(StoreError::SpaceNotFound { space })?;
        f(space)
    }

    fn with_space_mut<R>(
        &self,
        space: u32,
        f: impl FnOnce(&mut Space) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut spaces = self.spaces.write().map_err(|_| StoreError::LockPoisoned)?;
        let space = spaces
            .get_mut(&space)
            .ok_or(StoreError::SpaceNotFound { space })?;
        f(space)
    }
}

impl Store for MemoryStore {
    fn select(
        &self,
        space: u32,
        index: u32,
        key: &[WireValue],
        limit: Option<usize>,
    ) -> Result<Vec<Tuple>, StoreError> {
        self.record_request();
        self.with_space(space, |s| {
            let definition = s.keyed_index(index, key)?;
            let limit = limit.unwrap_or(usize::MAX);
            Ok(s.tuples
                .iter()
                .filter(|tuple| key_matches(tuple, &definition.parts, key))
                .take(limit)
                .cloned()
                .collect())
        })
    }

    fn insert(&self, space: u32, tuple: Tuple) -> Result<Tuple, StoreError> {
        self.record_request();
        self.with_space_mut(space, |s| {
            s.check_coverage(&tuple)?;
            s.check_unique(&tuple, None)?;
            s.tuples.push(tuple.clone());
            Ok(tuple)
        })
    }

    fn replace(&self, space: u32, tuple: Tuple) -> Result<Tuple, StoreError> {
        self.record_request();
        self.with_space_mut(space, |s| {
            s.check_coverage(&tuple)?;
            let parts = s.primary_parts()?;
            let key = extract_key(&tuple, parts);
            let existing = s
                .tuples
                .iter()
                .position(|stored| key_matches(stored, parts, &key));
            s.check_unique(&tuple, existing)?;
            match existing {
                Some(position) => s.tuples[position] = tuple.clone(),
                None => s.tuples.push(tuple.clone()),
            }
            Ok(tuple)
        })
    }

    fn update(
        &self,
        space: u32,
        index: u32,
        key: &[WireValue],
        ops: &[WireOp],
    ) -> Result<Option<Tuple>, StoreError> {
        self.record_request();
        self.with_space_mut(space, |s| {
            let definition = s.keyed_index(index, key)?;
            let Some(&target) = s.matching(definition, key).first() else {
                return Ok(None);
            };

            let mut updated = s.tuples[target].clone();
            for op in ops {
                let current = updated.get(op.position).ok_or_else(|| StoreError::InvalidOperand {
                    position: op.position,
                    reason: format!("tuple has {} elements", updated.len()),
                })?;
                let next = match op.operator {
                    WireOperator::Assign => op.operand.clone(),
                    operator => apply_numeric(op.position, operator, current, &op.operand)?,
                };
                updated[op.position] = next;
            }

            let parts = s.primary_parts()?;
            if extract_key(&updated, parts) != extract_key(&s.tuples[target], parts) {
                return Err(StoreError::InvalidOperand {
                    position: parts[0],
                    reason: "primary key cannot be modified".to_string(),
                });
            }
            s.check_unique(&updated, Some(target))?;

            s.tuples[target] = updated.clone();
            Ok(Some(updated))
        })
    }

    fn delete(
        &self,
        space: u32,
        index: u32,
        key: &[WireValue],
    ) -> Result<Option<Tuple>, StoreError> {
        self.record_request();
        self.with_space_mut(space, |s| {
            let definition = s.keyed_index(index, key)?;
            Ok(s.matching(definition, key)
                .first()
                .copied()
                .map(|target| s.tuples.remove(target)))
        })
    }

    fn call(&self, procedure: &str, args: &[WireValue]) -> Result<Vec<Tuple>, StoreError> {
        self.record_request();
        if procedure != CLEAR_SPACE {
            return Err(StoreError::UnknownProcedure(procedure.to_string()));
        }

        let [arg] = args else {
            return Err(StoreError::InvalidArgument(format!(
                "{} expects 1 argument, got {}",
                CLEAR_SPACE,
                args.len()
            )));
        };
        let space = std::str::from_utf8(arg)
            .ok()
            .and_then(|text| text.trim().parse::<u32>().ok())
            .ok_or_else(|| {
                StoreError::InvalidArgument(format!("{} expects a space number", CLEAR_SPACE))
            })?;

        self.with_space_mut(space, |s| {
            tracing::debug!(space, removed = s.tuples.len(), "space cleared");
            s.tuples.clear();
            Ok(Vec::new())
        })
    }
}
