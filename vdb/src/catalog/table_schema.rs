use crate::{
    catalog::{column::Column, ty::Type},
    error::{DbResult, Error},
};

/// A table (or operator output) schema: an ordered list of columns.
///
/// The column count is fixed at construction. This in-memory vector is
/// assumed to be in the same order as the fields appear in tuples.
#[derive(Debug, Clone)]
pub struct TableSchema {
    columns: Vec<Column>,
}

impl TableSchema {
    /// Creates a new schema from the given columns.
    pub fn new(columns: Vec<Column>) -> TableSchema {
        TableSchema { columns }
    }

    /// Returns the number of columns.
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Returns the columns, in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column at the given 0-based index.
    pub fn column_at(&self, index: usize) -> DbResult<&Column> {
        self.columns.get(index).ok_or(Error::ColumnOutOfBounds {
            index,
            len: self.columns.len(),
        })
    }

    /// Returns the index of the first column with the given name,
    /// compared case-insensitively.
    ///
    /// This is a linear operation which, in the worst case, scans over
    /// all of the schema's columns.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| {
            col.name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }

    /// Returns the number of bytes required to store one tuple of this
    /// schema.
    pub fn byte_len(&self) -> usize {
        self.columns.iter().map(|col| col.ty.byte_len()).sum()
    }

    /// Returns the schema of a joined row: this schema's columns
    /// followed by `other`'s.
    pub fn concat(&self, other: &TableSchema) -> TableSchema {
        let columns = self
            .columns
            .iter()
            .chain(other.columns.iter())
            .cloned()
            .collect();
        TableSchema { columns }
    }

    /// Returns the type sequence, in order.
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        self.columns.iter().map(|col| col.ty)
    }
}

/// Schemas compare by type sequence only; names are descriptive.
impl PartialEq for TableSchema {
    fn eq(&self, other: &Self) -> bool {
        self.types().eq(other.types())
    }
}

impl Eq for TableSchema {}
