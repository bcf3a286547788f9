use async_trait::async_trait;

use crate::{
    catalog::table_schema::TableSchema,
    error::{DbResult, Error},
    exec::{
        query::{BoxedOperator, ExecCtx, NodeState, Operator},
        tuple::Tuple,
    },
};

/// A leaf operator that produces a fixed, in-memory list of tuples.
pub struct ValuesScan {
    schema: TableSchema,
    rows: Vec<Tuple>,
    cursor: usize,
    state: NodeState,
}

impl ValuesScan {
    /// Creates a new scan over the given rows.
    ///
    /// Every row must match the schema in arity and in type sequence.
    pub fn new(schema: TableSchema, rows: Vec<Tuple>) -> DbResult<ValuesScan> {
        for (i, row) in rows.iter().enumerate() {
            if row.arity() != schema.arity() {
                return Err(Error::ExecError(format!(
                    "row {i} has arity {}, but the schema has {}",
                    row.arity(),
                    schema.arity()
                )));
            }
            for (value, column) in row.values().iter().zip(schema.columns()) {
                if value.type_of() != column.ty {
                    return Err(Error::ExecError(format!(
                        "row {i} has a `{}` value in a `{}` column",
                        value.type_of().name(),
                        column.ty.name()
                    )));
                }
            }
        }

        Ok(ValuesScan {
            schema,
            rows,
            cursor: 0,
            state: NodeState::Closed,
        })
    }
}

#[async_trait]
impl Operator for ValuesScan {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    async fn open(&mut self, _ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.open()?;
        self.cursor = 0;
        Ok(())
    }

    async fn next(&mut self, _ctx: &ExecCtx<'_>) -> DbResult<Option<Tuple>> {
        self.state.ensure_open()?;
        let row = self.rows.get(self.cursor).cloned();
        if row.is_some() {
            self.cursor += 1;
        }
        Ok(row)
    }

    async fn rewind(&mut self, _ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.ensure_open()?;
        self.cursor = 0;
        Ok(())
    }

    async fn close(&mut self, _ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.close()
    }

    fn children(&self) -> Vec<&dyn Operator> {
        Vec::new()
    }

    fn set_children(&mut self, children: Vec<BoxedOperator>) -> DbResult<()> {
        if !children.is_empty() {
            return Err(Error::ChildrenArity {
                expected: 0,
                actual: children.len(),
            });
        }
        Ok(())
    }
}
