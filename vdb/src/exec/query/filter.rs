use async_trait::async_trait;
use tracing::trace;

use crate::{
    catalog::table_schema::TableSchema,
    error::{DbResult, Error},
    exec::{
        predicate::Predicate,
        query::{BoxedOperator, ExecCtx, NodeState, Operator},
        tuple::Tuple,
    },
};

/// An operator that keeps only the child tuples matching a predicate.
///
/// The child is drained at `open`, with the predicate applied exactly
/// once per input tuple. Rewinds replay the buffered matches without
/// re-evaluating anything.
pub struct Filter {
    predicate: Predicate,
    child: BoxedOperator,
    buffered: Vec<Tuple>,
    cursor: usize,
    state: NodeState,
}

impl Filter {
    /// Creates a new filter over the given child.
    pub fn new(predicate: Predicate, child: BoxedOperator) -> Filter {
        Filter {
            predicate,
            child,
            buffered: Vec::new(),
            cursor: 0,
            state: NodeState::Closed,
        }
    }

    /// Returns the filter's predicate.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

#[async_trait]
impl Operator for Filter {
    fn schema(&self) -> &TableSchema {
        self.child.schema()
    }

    async fn open(&mut self, ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.open()?;
        self.child.open(ctx).await?;

        self.buffered.clear();
        self.cursor = 0;
        while let Some(tuple) = self.child.next(ctx).await? {
            if self.predicate.eval(Some(&tuple))? {
                self.buffered.push(tuple);
            }
        }
        trace!(matched = self.buffered.len(), "filter buffered its input");
        Ok(())
    }

    async fn next(&mut self, _ctx: &ExecCtx<'_>) -> DbResult<Option<Tuple>> {
        self.state.ensure_open()?;
        let row = self.buffered.get(self.cursor).cloned();
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

    async fn close(&mut self, ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.close()?;
        self.child.close(ctx).await?;
        self.buffered.clear();
        self.cursor = 0;
        Ok(())
    }

    fn children(&self) -> Vec<&dyn Operator> {
        vec![self.child.as_ref()]
    }

    fn set_children(&mut self, mut children: Vec<BoxedOperator>) -> DbResult<()> {
        if children.len() != 1 {
            return Err(Error::ChildrenArity {
                expected: 1,
                actual: children.len(),
            });
        }
        self.child = children.remove(0);
        Ok(())
    }
}
