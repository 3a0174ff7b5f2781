//! Shared fixture: one in-memory store behind a private connection registry.

use std::sync::Arc;

use spacemap_core::{
    ConnectionRegistry, Field, MemoryStore, Model, SpaceDefinition, Store, Tuple, DEFAULT_ALIAS,
};

pub const NEW_SPACE_ALIAS: &str = "the_new_space";
pub const COMPOSITE_ALIAS: &str = "composite_primary_key";

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub registry: Arc<ConnectionRegistry>,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(
            MemoryStore::with_spaces([
                SpaceDefinition::new(0).with_index(0, [0], true),
                SpaceDefinition::new(1)
                    .with_index(0, [0], true)
                    .with_index(1, [1], false),
                SpaceDefinition::new(2)
                    .with_index(0, [0, 1], true)
                    .with_index(1, [0, 1], true)
                    .with_index(2, [1], false),
            ])
            .unwrap(),
        );

        let registry = Arc::new(ConnectionRegistry::new());
        registry.register(DEFAULT_ALIAS, 0, store.clone()).unwrap();
        registry.register(NEW_SPACE_ALIAS, 1, store.clone()).unwrap();
        registry.register(COMPOSITE_ALIAS, 2, store.clone()).unwrap();

        Self { store, registry }
    }

    /// `pk` (num64, primary, index 0), `data` (string) on the default alias.
    pub fn record_model(&self) -> Model {
        Model::builder("Record")
            .field(Field::num64("pk").primary_key().db_index(0))
            .field(Field::string("data"))
            .registry(self.registry.clone())
            .build()
            .unwrap()
    }

    /// Like [`Fixture::record_model`] but accepting tuples with trailing elements.
    pub fn loose_record_model(&self) -> Model {
        Model::builder("Record")
            .field(Field::num64("pk").primary_key().db_index(0))
            .field(Field::string("data"))
            .check_tuple_length(false)
            .registry(self.registry.clone())
            .build()
            .unwrap()
    }

    /// `pk`, `user_id` (num32, non-unique index 1), `data` on space 1.
    pub fn user_model(&self) -> Model {
        Model::builder("UserRecord")
            .field(Field::num64("pk").primary_key().db_index(0))
            .field(Field::num32("user_id").db_index(1))
            .field(Field::string("data"))
            .db_alias(NEW_SPACE_ALIAS)
            .registry(self.registry.clone())
            .build()
            .unwrap()
    }

    /// `sid` (primary, index 1) and `uid` (index 2) on space 2, whose index 1
    /// spans both.
    pub fn session_model(&self) -> Model {
        Model::builder("Session")
            .field(Field::num64("sid").primary_key().db_index(1))
            .field(Field::num32("uid").db_index(2))
            .field(Field::string("data"))
            .db_alias(COMPOSITE_ALIAS)
            .registry(self.registry.clone())
            .build()
            .unwrap()
    }

    /// `sid` and `uid` share index 1, so the primary key spans both.
    pub fn pair_model(&self) -> Model {
        Model::builder("Pair")
            .field(Field::num64("sid").primary_key().db_index(1))
            .field(Field::num32("uid").db_index(1))
            .field(Field::string("data"))
            .db_alias(COMPOSITE_ALIAS)
            .registry(self.registry.clone())
            .build()
            .unwrap()
    }

    /// Indexed by `user_id` but with no primary key.
    pub fn keyless_model(&self) -> Model {
        Model::builder("Keyless")
            .field(Field::num64("user_id").db_index(0))
            .field(Field::string("data"))
            .registry(self.registry.clone())
            .build()
            .unwrap()
    }

    /// Number of store calls made so far.
    pub fn requests(&self) -> u64 {
        self.store.request_count()
    }

    /// Writes a raw tuple, bypassing the mapping layer.
    pub fn raw_insert(&self, space: u32, tuple: Tuple) {
        self.store.insert(space, tuple).unwrap();
    }
}

pub fn num64(v: i64) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

pub fn num32(v: i32) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

pub fn text(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}
