use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info};

use crate::db::config::Config;
use crate::db::identity::normalize_identity;
use crate::db::mutate;
use crate::db::sink::Sink;
use crate::db::store::{Record, Store};
use crate::error::Result;
use crate::query::view::{self, ListQuery, ListResult};

/// The store facade handed to transport layers.
///
/// Reads take a shared lock, mutations an exclusive one; a successful
/// mutation is followed by a full-state write through the sink before
/// the lock is released.
pub struct Database {
    store: RwLock<Store>,
    config: Config,
    sink: Box<dyn Sink>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish()
    }
}

impl Database {
    /// Opens a database over a deserialized dataset with the default
    /// configuration.
    pub fn open(value: Value, sink: impl Sink + 'static) -> Result<Database> {
        Self::open_with_config(value, sink, Config::default())
    }

    /// Opens a database with an explicit configuration. The dataset's
    /// shape is validated and record identity normalized before any
    /// request is served.
    pub fn open_with_config(
        value: Value,
        sink: impl Sink + 'static,
        config: Config,
    ) -> Result<Database> {
        let mut store = Store::from_value(value)?;
        normalize_identity(&mut store, config.id_bytes);
        info!(collections = store.names().count(), "store opened");
        Ok(Database {
            store: RwLock::new(store),
            config,
            sink: Box::new(sink),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A deep copy of the current state, for hosts that need to inspect
    /// or re-serialize it.
    pub fn snapshot(&self) -> Value {
        self.store.read().to_value()
    }

    /// Answers a list request. `None` when the collection is unknown.
    pub fn list(&self, name: &str, query: &ListQuery) -> Option<ListResult> {
        view::list(&self.store.read(), &self.config, name, query)
    }

    /// Fetches one record by id, with optional embeds.
    pub fn get_by_id(&self, name: &str, id: &str, embeds: &[String]) -> Option<Value> {
        view::get_by_id(&self.store.read(), &self.config, name, id, embeds)
    }

    /// Appends a record with a fresh id; see [`mutate::create`].
    pub fn create(&self, name: &str, body: Record) -> Result<Option<Value>> {
        let mut store = self.store.write();
        let created = mutate::create(&mut store, &self.config, name, body);
        self.persist_if(&store, created, "create", name)
    }

    /// Replaces a singular resource wholesale.
    pub fn replace(&self, name: &str, body: Record) -> Result<Option<Value>> {
        let mut store = self.store.write();
        let replaced = mutate::replace_singular(&mut store, name, body);
        self.persist_if(&store, replaced, "replace", name)
    }

    /// Shallow-merges into a singular resource.
    pub fn patch(&self, name: &str, body: Record) -> Result<Option<Value>> {
        let mut store = self.store.write();
        let patched = mutate::patch_singular(&mut store, name, body);
        self.persist_if(&store, patched, "patch", name)
    }

    /// Replaces a record by id, preserving its identity.
    pub fn replace_by_id(&self, name: &str, id: &str, body: Record) -> Result<Option<Value>> {
        let mut store = self.store.write();
        let replaced = mutate::replace_by_id(&mut store, name, id, body);
        self.persist_if(&store, replaced, "replace_by_id", name)
    }

    /// Shallow-merges over a record by id, preserving its identity.
    pub fn patch_by_id(&self, name: &str, id: &str, body: Record) -> Result<Option<Value>> {
        let mut store = self.store.write();
        let patched = mutate::patch_by_id(&mut store, name, id, body);
        self.persist_if(&store, patched, "patch_by_id", name)
    }

    /// Deletes a record by id, nullifying foreign keys that referenced
    /// it and cascading into the listed dependent collections.
    pub fn destroy_by_id(
        &self,
        name: &str,
        id: &str,
        dependents: &[String],
    ) -> Result<Option<Value>> {
        let mut store = self.store.write();
        let removed = mutate::destroy_by_id(&mut store, &self.config, name, id, dependents);
        self.persist_if(&store, removed, "destroy_by_id", name)
    }

    fn persist_if(
        &self,
        store: &Store,
        outcome: Option<Value>,
        operation: &'static str,
        name: &str,
    ) -> Result<Option<Value>> {
        match outcome {
            Some(record) => {
                debug!(%operation, collection = %name, "mutation applied");
                self.sink.write(store)?;
                Ok(Some(record))
            }
            None => {
                debug!(%operation, collection = %name, "mutation target not found");
                Ok(None)
            }
        }
    }
}
