use async_trait::async_trait;

use crate::{catalog::registry::Catalog, catalog::table_schema::TableSchema, error::DbResult, exec::tuple::Tuple};

mod aggregate;
mod filter;
mod join;
mod values_scan;

pub use aggregate::Aggregate;
pub use filter::Filter;
pub use join::Join;
pub use values_scan::ValuesScan;

/// The execution context, threaded through every operator call.
pub struct ExecCtx<'a> {
    pub catalog: &'a Catalog,
}

pub type BoxedOperator = Box<dyn Operator>;

/// A node in a pull-based query plan.
///
/// The lifecycle is `open`, any interleaving of `next` and `rewind`,
/// then `close`. Every method other than `open` requires the operator
/// to be open, and `open` requires it not to be.
#[async_trait]
pub trait Operator: Send {
    /// Returns the schema of the tuples this operator produces.
    fn schema(&self) -> &TableSchema;

    /// Acquires whatever state the operator needs to start producing
    /// tuples.
    async fn open(&mut self, ctx: &ExecCtx<'_>) -> DbResult<()>;

    /// Produces the next tuple, or `None` once the stream is finished.
    async fn next(&mut self, ctx: &ExecCtx<'_>) -> DbResult<Option<Tuple>>;

    /// Restarts the stream at its first tuple.
    async fn rewind(&mut self, ctx: &ExecCtx<'_>) -> DbResult<()>;

    /// Releases the operator's state. The operator may be re-opened
    /// afterwards.
    async fn close(&mut self, ctx: &ExecCtx<'_>) -> DbResult<()>;

    /// Returns the operator's inputs, left to right.
    fn children(&self) -> Vec<&dyn Operator>;

    /// Replaces the operator's inputs. The number of children must
    /// match the operator's arity.
    fn set_children(&mut self, children: Vec<BoxedOperator>) -> DbResult<()>;
}

/// Whether an operator is between `open` and `close`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NodeState {
    Closed,
    Open,
}

impl NodeState {
    /// Transitions to open, failing if already open.
    fn open(&mut self) -> DbResult<()> {
        match self {
            NodeState::Open => Err(crate::error::Error::AlreadyOpen),
            NodeState::Closed => {
                *self = NodeState::Open;
                Ok(())
            }
        }
    }

    /// Fails unless the operator is open.
    fn ensure_open(self) -> DbResult<()> {
        match self {
            NodeState::Open => Ok(()),
            NodeState::Closed => Err(crate::error::Error::NotOpen),
        }
    }

    /// Transitions to closed, failing if not open.
    fn close(&mut self) -> DbResult<()> {
        self.ensure_open()?;
        *self = NodeState::Closed;
        Ok(())
    }
}
