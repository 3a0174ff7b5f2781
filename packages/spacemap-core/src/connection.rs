//! Process-wide registry of connection aliases.
//!
//! Lookups happen on every model operation while registration and disposal
//! are configuration-time events, so the alias map is published through an
//! `ArcSwap` and replaced copy-on-write.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use crate::error::ConnectionError;
use crate::store::Store;

/// A resolved alias: space number plus the transport that reaches it.
#[derive(Clone)]
pub struct Connection {
    alias: String,
    space: u32,
    store: Arc<dyn Store>,
}

impl Connection {
    /// Returns the alias this connection was registered under.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the space number.
    pub fn space(&self) -> u32 {
        self.space
    }

    /// Returns the transport.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("alias", &self.alias)
            .field("space", &self.space)
            .finish_non_exhaustive()
    }
}

/// Alias → connection map.
pub struct ConnectionRegistry {
    entries: ArcSwap<HashMap<String, Connection>>,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("aliases", &self.aliases())
            .finish()
    }
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Returns the process-wide registry used by models that do not name one.
    pub fn global() -> Arc<ConnectionRegistry> {
        static GLOBAL: OnceLock<Arc<ConnectionRegistry>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(ConnectionRegistry::new()))
            .clone()
    }

    /// Binds an alias to a space reached through `store`.
    ///
    /// # Returns
    /// `Err(ConnectionError::AlreadyRegistered)` if the alias is bound.
    pub fn register(
        &self,
        alias: impl Into<String>,
        space: u32,
        store: Arc<dyn Store>,
    ) -> Result<(), ConnectionError> {
        let alias = alias.into();
        let connection = Connection {
            alias: alias.clone(),
            space,
            store,
        };

        let mut outcome = Ok(());
        self.entries.rcu(|current| {
            let mut next = HashMap::clone(current);
            if next.contains_key(&alias) {
                outcome = Err(ConnectionError::AlreadyRegistered {
                    alias: alias.clone(),
                });
            } else {
                outcome = Ok(());
                next.insert(alias.clone(), connection.clone());
            }
            next
        });

        if outcome.is_ok() {
            tracing::info!(alias = %alias, space, "connection registered");
        }
        outcome
    }

    /// Resolves an alias.
    pub fn get(&self, alias: &str) -> Result<Connection, ConnectionError> {
        self.entries
            .load()
            .get(alias)
            .cloned()
            .ok_or_else(|| ConnectionError::NotRegistered {
                alias: alias.to_string(),
            })
    }

    /// Removes an alias, dropping this registry's handle on its transport.
    ///
    /// # Returns
    /// `true` if the alias was registered.
    pub fn dispose(&self, alias: &str) -> bool {
        let mut removed = false;
        self.entries.rcu(|current| {
            let mut next = HashMap::clone(current);
            removed = next.remove(alias).is_some();
            next
        });

        if removed {
            tracing::info!(alias = %alias, "connection disposed");
        }
        removed
    }

    /// Returns true if the alias is registered.
    pub fn contains(&self, alias: &str) -> bool {
        self.entries.load().contains_key(alias)
    }

    /// Returns the registered aliases, sorted.
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.entries.load().keys().cloned().collect();
        aliases.sort();
        aliases
    }
}
