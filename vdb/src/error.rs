use crate::{catalog::registry::TableId, exec::aggregate::AggregateOp};

pub type DbResult<T, E = Error> = Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The given table name is not registered in the catalog.
    #[error("table `{0}` not found")]
    TableNotFound(String),

    /// The given table ID is not registered in the catalog.
    #[error("table with id `{0}` not found")]
    TableIdNotFound(TableId),

    /// A column index was out of bounds for the tuple or schema it was
    /// applied to.
    #[error("column index {index} out of bounds (arity {len})")]
    ColumnOutOfBounds { index: usize, len: usize },

    /// Two values of different kinds were compared.
    #[error("cannot compare `{lhs}` with `{rhs}`")]
    MismatchedTypes {
        lhs: &'static str,
        rhs: &'static str,
    },

    /// Text columns only support the `count` reduction.
    #[error("`{0}` is not supported over text columns")]
    TextAggregate(AggregateOp),

    /// `open` was called on an operator that is already open.
    #[error("operator is already open")]
    AlreadyOpen,

    /// An operator method was called outside the open state.
    #[error("operator is not open")]
    NotOpen,

    /// A tuple was merged into an aggregator after its results were
    /// already taken.
    #[error("aggregator has already produced its results")]
    MergeAfterResults,

    /// `set_children` was called with the wrong number of children.
    #[error("expected {expected} children, but got {actual}")]
    ChildrenArity { expected: usize, actual: usize },

    /// A generic execution error.
    #[error("execution error: {0}")]
    ExecError(String),

    /// Malformed bytes for a declared type. Kept as a distinct kind so
    /// that callers can tell "bad data" apart from "bad plan".
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The byte source ended before a whole value could be read.
    #[error("truncated value: expected {expected} bytes, but found {actual}")]
    Truncated { expected: usize, actual: usize },

    /// A text length prefix exceeded the fixed column width.
    #[error("text length {len} exceeds the maximum of {max}")]
    TextTooLong { len: usize, max: usize },

    /// UTF-8 error while decoding a text value.
    #[error("utf-8 error while decoding text value")]
    InvalidUtf8,

    /// An unrecognized type name in a schema definition.
    #[error("unknown type name `{0}`")]
    UnknownTypeName(String),
}
