use std::fmt;

use crate::{
    error::DbResult,
    exec::{tuple::Tuple, value::Value},
};

/// A comparison operator between two values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Like => "LIKE",
        };
        f.write_str(repr)
    }
}

/// A comparison of one tuple field against a constant operand.
#[derive(Debug, Clone)]
pub struct Predicate {
    column: usize,
    op: CmpOp,
    operand: Value,
}

impl Predicate {
    /// Creates a new predicate over the given 0-based column index.
    pub fn new(column: usize, op: CmpOp, operand: Value) -> Predicate {
        Predicate {
            column,
            op,
            operand,
        }
    }

    /// Returns the 0-based index of the compared column.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the comparison operator.
    pub fn op(&self) -> CmpOp {
        self.op
    }

    /// Returns the constant operand.
    pub fn operand(&self) -> &Value {
        &self.operand
    }

    /// Evaluates this predicate against the given tuple.
    ///
    /// An absent tuple never matches.
    pub fn eval(&self, tuple: Option<&Tuple>) -> DbResult<bool> {
        let Some(tuple) = tuple else {
            return Ok(false);
        };
        tuple.field(self.column)?.compare(self.op, &self.operand)
    }
}

/// A comparison between one field of each of two tuples.
#[derive(Debug, Clone)]
pub struct JoinPredicate {
    left: usize,
    op: CmpOp,
    right: usize,
}

impl JoinPredicate {
    /// Creates a new join predicate over the given 0-based column
    /// indexes, the first into the left tuple and the second into the
    /// right one.
    pub fn new(left: usize, op: CmpOp, right: usize) -> JoinPredicate {
        JoinPredicate { left, op, right }
    }

    /// Returns the 0-based index of the compared left column.
    pub fn left(&self) -> usize {
        self.left
    }

    /// Returns the comparison operator.
    pub fn op(&self) -> CmpOp {
        self.op
    }

    /// Returns the 0-based index of the compared right column.
    pub fn right(&self) -> usize {
        self.right
    }

    /// Evaluates this predicate against the given pair of tuples.
    ///
    /// If either tuple is absent, the pair never matches.
    pub fn eval(&self, left: Option<&Tuple>, right: Option<&Tuple>) -> DbResult<bool> {
        let (Some(left), Some(right)) = (left, right) else {
            return Ok(false);
        };
        left.field(self.left)?
            .compare(self.op, right.field(self.right)?)
    }
}
