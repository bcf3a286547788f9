use async_trait::async_trait;
use tracing::trace;

use crate::{
    catalog::{table_schema::TableSchema, ty::Type},
    error::{DbResult, Error},
    exec::{
        aggregate::{build_aggregator, AggregateIter, AggregateOp},
        query::{BoxedOperator, ExecCtx, NodeState, Operator},
        tuple::Tuple,
    },
};

/// An operator that reduces its child's tuples into one row per group.
///
/// The whole child stream is folded at `open`; `next` then yields the
/// materialized result rows. Without a grouping column there is one
/// output row, or none at all if the child produced no tuples.
pub struct Aggregate {
    child: BoxedOperator,
    group_col: Option<usize>,
    agg_col: usize,
    op: AggregateOp,
    agg_ty: Type,
    group_ty: Option<Type>,
    schema: TableSchema,
    results: Option<AggregateIter>,
    state: NodeState,
}

impl Aggregate {
    /// Creates a new aggregation over the given child.
    ///
    /// Fails if either column index is out of bounds for the child's
    /// schema, or if the reduction is not defined for the aggregated
    /// column's type.
    pub fn new(
        child: BoxedOperator,
        group_col: Option<usize>,
        agg_col: usize,
        op: AggregateOp,
    ) -> DbResult<Aggregate> {
        let (agg_ty, group_ty, schema) = resolve(child.schema(), group_col, agg_col, op)?;

        Ok(Aggregate {
            child,
            group_col,
            agg_col,
            op,
            agg_ty,
            group_ty,
            schema,
            results: None,
            state: NodeState::Closed,
        })
    }

    /// Returns the 0-based index of the grouping column, if any.
    pub fn group_field(&self) -> Option<usize> {
        self.group_col
    }

    /// Returns the 0-based index of the aggregated column.
    pub fn aggregate_field(&self) -> usize {
        self.agg_col
    }

    /// Returns the reduction applied to the aggregated column.
    pub fn aggregate_op(&self) -> AggregateOp {
        self.op
    }
}

#[async_trait]
impl Operator for Aggregate {
    fn schema(&self) -> &TableSchema {
        &self.schema
    }

    async fn open(&mut self, ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.open()?;
        self.child.open(ctx).await?;

        let group = self.group_col.zip(self.group_ty);
        let mut aggregator = build_aggregator(self.agg_ty, group, self.agg_col, self.op)?;
        let mut merged = 0_usize;
        while let Some(tuple) = self.child.next(ctx).await? {
            aggregator.merge(&tuple)?;
            merged += 1;
        }
        trace!(merged, op = %self.op, "aggregate folded its input");

        self.results = Some(aggregator.results()?);
        Ok(())
    }

    async fn next(&mut self, _ctx: &ExecCtx<'_>) -> DbResult<Option<Tuple>> {
        self.state.ensure_open()?;
        match &mut self.results {
            Some(results) => Ok(results.next()),
            None => Err(Error::NotOpen),
        }
    }

    async fn rewind(&mut self, ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.ensure_open()?;
        self.child.rewind(ctx).await?;
        if let Some(results) = &mut self.results {
            results.rewind();
        }
        Ok(())
    }

    async fn close(&mut self, ctx: &ExecCtx<'_>) -> DbResult<()> {
        self.state.close()?;
        self.child.close(ctx).await?;
        self.results = None;
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
        let child = children.remove(0);

        // The new child's schema may differ, so the column types go
        // through the same checks as at construction. On failure the
        // operator is left untouched.
        let (agg_ty, group_ty, schema) =
            resolve(child.schema(), self.group_col, self.agg_col, self.op)?;
        self.agg_ty = agg_ty;
        self.group_ty = group_ty;
        self.schema = schema;
        self.child = child;
        Ok(())
    }
}

/// Resolves the column types and the output schema against a child
/// schema. Shared by construction and child replacement, so both fail
/// with the same errors.
fn resolve(
    child_schema: &TableSchema,
    group_col: Option<usize>,
    agg_col: usize,
    op: AggregateOp,
) -> DbResult<(Type, Option<Type>, TableSchema)> {
    let agg_ty = child_schema.column_at(agg_col)?.ty;
    if agg_ty == Type::Text && op != AggregateOp::Count {
        return Err(Error::TextAggregate(op));
    }

    let group_ty = match group_col {
        Some(col) => Some(child_schema.column_at(col)?.ty),
        None => None,
    };

    // Build a throwaway aggregator just to fix the output schema, so
    // that `schema` is available before `open`.
    let schema = build_aggregator(agg_ty, group_col.zip(group_ty), agg_col, op)?
        .schema()
        .clone();
    Ok((agg_ty, group_ty, schema))
}
