use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::{
    catalog::table_schema::TableSchema,
    error::{DbResult, Error},
    exec::query::ValuesScan,
};

/// Identifier of a table, unique within a catalog.
pub type TableId = u32;

/// A backing store for a single table's tuples.
///
/// Implementations must be shareable across tasks; the catalog hands
/// out clones of the same `Arc`.
pub trait DbFile: Send + Sync {
    /// Returns the identifier of this file's table.
    fn id(&self) -> TableId;

    /// Returns the schema of the tuples this file stores.
    fn schema(&self) -> &TableSchema;

    /// Returns a scan operator over this file's tuples.
    fn scan(&self) -> DbResult<ValuesScan>;
}

/// A registered table: its backing file plus catalog metadata.
#[derive(Clone)]
pub struct Table {
    pub file: Arc<dyn DbFile>,
    pub name: String,
    pub primary_key: String,
}

/// The database catalog, which tracks all registered tables.
///
/// All lookups go through the table name or the table ID. Both maps are
/// concurrent, so the catalog may be shared freely between tasks.
#[derive(Default)]
pub struct Catalog {
    by_name: DashMap<String, Table>,
    names_by_id: DashMap<TableId, String>,
}

impl Catalog {
    /// Creates a new, empty catalog.
    pub fn new() -> Catalog {
        Catalog::default()
    }

    /// Registers a table under the given name.
    ///
    /// A table that collides with an existing one, by name or by ID,
    /// replaces it. The last writer wins.
    pub fn add_table(&self, file: Arc<dyn DbFile>, name: impl Into<String>, primary_key: impl Into<String>) {
        let name = name.into();
        let id = file.id();

        // Drop the stale twin entries of whatever this registration
        // shadows, so that the two maps stay consistent.
        if let Some((_, old_name)) = self.names_by_id.remove(&id) {
            if old_name != name {
                self.by_name.remove(&old_name);
            }
        }
        if let Some((_, old)) = self.by_name.remove(&name) {
            if old.file.id() != id {
                self.names_by_id.remove(&old.file.id());
            }
        }

        info!(%name, id, "registering table");
        self.names_by_id.insert(id, name.clone());
        self.by_name.insert(
            name.clone(),
            Table {
                file,
                name,
                primary_key: primary_key.into(),
            },
        );
    }

    /// Returns the ID of the table with the given name.
    pub fn table_id(&self, name: &str) -> DbResult<TableId> {
        self.by_name
            .get(name)
            .map(|table| table.file.id())
            .ok_or_else(|| Error::TableNotFound(name.into()))
    }

    /// Returns the name of the table with the given ID.
    pub fn table_name(&self, id: TableId) -> DbResult<String> {
        self.names_by_id
            .get(&id)
            .map(|name| name.clone())
            .ok_or(Error::TableIdNotFound(id))
    }

    /// Returns the schema of the table with the given ID.
    pub fn schema(&self, id: TableId) -> DbResult<TableSchema> {
        self.table(id).map(|table| table.file.schema().clone())
    }

    /// Returns the backing file of the table with the given ID.
    pub fn file(&self, id: TableId) -> DbResult<Arc<dyn DbFile>> {
        self.table(id).map(|table| table.file)
    }

    /// Returns the primary key column name of the table with the given
    /// ID.
    pub fn primary_key(&self, id: TableId) -> DbResult<String> {
        self.table(id).map(|table| table.primary_key)
    }

    /// Returns the IDs of all registered tables, in no particular
    /// order.
    pub fn table_ids(&self) -> Vec<TableId> {
        self.names_by_id.iter().map(|entry| *entry.key()).collect()
    }

    /// Unregisters all tables.
    pub fn clear(&self) {
        self.by_name.clear();
        self.names_by_id.clear();
    }

    fn table(&self, id: TableId) -> DbResult<Table> {
        let name = self.table_name(id)?;
        self.by_name
            .get(&name)
            .map(|table| table.clone())
            .ok_or(Error::TableIdNotFound(id))
    }
}
