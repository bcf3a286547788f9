use crate::{
    error::{DbResult, Error},
    exec::value::Value,
};

/// A single row: an ordered sequence of values.
///
/// A tuple does not carry its schema. The operator that produced it
/// knows the layout; the tuple is just the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    values: Vec<Value>,
}

impl Tuple {
    /// Creates a new tuple from the given values.
    pub fn new(values: Vec<Value>) -> Tuple {
        Tuple { values }
    }

    /// Returns the number of fields.
    pub fn arity(&self) -> usize {
        self.values.len()
    }

    /// Returns the value of the field at the given 0-based index.
    pub fn field(&self, index: usize) -> DbResult<&Value> {
        self.values.get(index).ok_or(Error::ColumnOutOfBounds {
            index,
            len: self.values.len(),
        })
    }

    /// Replaces the value of the field at the given 0-based index.
    pub fn set_field(&mut self, index: usize, value: Value) -> DbResult<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(Error::ColumnOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Returns all values, in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns a joined row: this tuple's values followed by `other`'s.
    pub fn concat(&self, other: &Tuple) -> Tuple {
        let values = self
            .values
            .iter()
            .chain(other.values.iter())
            .cloned()
            .collect();
        Tuple { values }
    }
}
