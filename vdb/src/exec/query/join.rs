use async_trait::async_trait;
use tracing::trace;

use crate::{
    catalog::table_schema::TableSchema,
    error::{DbResult, Error},
    exec::{
        predicate::JoinPredicate,
        query::{BoxedOperator, ExecCtx, NodeState, Operator},
        tuple::Tuple,
    },
};

/// A nested loop join of two children.
///
/// Both sides are buffered at `open`; `next` then walks the cross
/// product in left-major order, emitting the concatenation of each
/// matching pair.
pub struct Join {
    predicate: JoinPredicate,
    left: BoxedOperator,
    right: BoxedOperator,
    schema: TableSchema,
    left_buf: Vec<Tuple>,
    right_buf: Vec<Tuple>,
    li: usize,
    ri: usize,
    state: NodeState,
}

impl Join {
    /// Creates a new join of the given children.
    pub fn new(predicate: JoinPredicate, left: BoxedOperator, right: BoxedOperator) -> Join {
        let schema = left.schema().concat(right.schema());
        Join {
            predicate,
            left,
            right,
            schema,
            left_buf: Vec::new(),
            right_buf: Vec::new(),
            li: 0,
            ri: 0,
            state: NodeState::Closed,
        }
    }

    /// Returns the join's predicate.
    pub fn predicate(&self) -> &JoinPredicate {
        &self.predicate
    }
}

#[async_trait]
impl Operator for Join {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    async fn open(&mut self, ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.open()?;
        self.left.open(ctx).await?;
        self.right.open(ctx).await?;

        self.left_buf.clear();
        self.right_buf.clear();
        self.li = 0;
        self.ri = 0;
        while let Some(tuple) = self.left.next(ctx).await? {
            self.left_buf.push(tuple);
        }
        while let Some(tuple) = self.right.next(ctx).await? {
            self.right_buf.push(tuple);
        }
        trace!(
            left = self.left_buf.len(),
            right = self.right_buf.len(),
            "join buffered its inputs"
        );
        Ok(())
    }

    async fn next(&mut self, _ctx: &ExecCtx<'_>) -> DbResult<Option<Tuple>> {
        self.state.ensure_open()?;

        while let Some(left) = self.left_buf.get(self.li) {
            while let Some(right) = self.right_buf.get(self.ri) {
                self.ri += 1;
                if self.predicate.eval(Some(left), Some(right))? {
                    return Ok(Some(left.concat(right)));
                }
            }
            self.ri = 0;
            self.li += 1;
        }
        Ok(None)
    }

    async fn rewind(&mut self, _ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.ensure_open()?;
        self.li = 0;
        self.ri = 0;
        Ok(())
    }

    async fn close(&mut self, ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.close()?;
        self.left.close(ctx).await?;
        self.right.close(ctx).await?;
        self.left_buf.clear();
        self.right_buf.clear();
        self.li = 0;
        self.ri = 0;
        Ok(())
    }

    fn children(&self) -> Vec<&dyn Operator> {
        vec![self.left.as_ref(), self.right.as_ref()]
    }

    fn set_children(&mut self, children: Vec<BoxedOperator>) -> DbResult<()> {
        let actual = children.len();
        let mut children = children.into_iter();
        match (children.next(), children.next()) {
            (Some(left), Some(right)) if actual == 2 => {
                self.schema = left.schema().concat(right.schema());
                self.left = left;
                self.right = right;
                Ok(())
            }
            _ => Err(Error::ChildrenArity {
                expected: 2,
                actual,
            }),
        }
    }
}
