use crate::{
    catalog::{
        registry::{DbFile, TableId},
        table_schema::TableSchema,
    },
    error::DbResult,
    exec::{query::ValuesScan, tuple::Tuple},
};

/// An in-memory table file: all tuples live in one vector.
pub struct MemFile {
    id: TableId,
    schema: TableSchema,
    rows: Vec<Tuple>,
}

impl MemFile {
    /// Creates a new in-memory file with the given rows.
    ///
    /// Every row must match the schema; see [`ValuesScan::new`].
    pub fn new(id: TableId, schema: TableSchema, rows: Vec<Tuple>) -> DbResult<MemFile> {
        // Piggyback on the scan's validation, then keep the rows.
        let _ = ValuesScan::new(schema.clone(), rows.clone())?;
        Ok(MemFile { id, schema, rows })
    }

    /// Returns the number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the file stores no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl DbFile for MemFile {
    fn id(&self) -> TableId {
        self.id
    }

    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    fn scan(&self) -> DbResult<ValuesScan> {
        ValuesScan::new(self.schema.clone(), self.rows.clone())
    }
}
