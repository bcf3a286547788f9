use std::fmt;

use bytes::BufMut;

use crate::{
    catalog::ty::Type,
    config::TEXT_LEN,
    error::{DbResult, DecodeError, Error},
    exec::predicate::CmpOp,
};

/// A single field value of a tuple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i32),
    Text(String),
}

impl Value {
    /// Returns the type of this value.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Text(_) => Type::Text,
        }
    }

    /// Returns the inner integer, if this is an int value.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(int) => Some(*int),
            Value::Text(_) => None,
        }
    }

    /// Returns the inner string, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Int(_) => None,
            Value::Text(text) => Some(text),
        }
    }

    /// Applies the given comparison against `other`.
    ///
    /// Both values must be of the same type. For int values, `Like`
    /// degenerates to equality; for text values it is a substring
    /// match, and the ordered comparisons are lexicographic.
    pub fn compare(&self, op: CmpOp, other: &Value) -> DbResult<bool> {
        match (self, other) {
            (Value::Int(lhs), Value::Int(rhs)) => Ok(match op {
                CmpOp::Eq | CmpOp::Like => lhs == rhs,
                CmpOp::Ne => lhs != rhs,
                CmpOp::Lt => lhs < rhs,
                CmpOp::Le => lhs <= rhs,
                CmpOp::Gt => lhs > rhs,
                CmpOp::Ge => lhs >= rhs,
            }),
            (Value::Text(lhs), Value::Text(rhs)) => Ok(match op {
                CmpOp::Eq => lhs == rhs,
                CmpOp::Ne => lhs != rhs,
                CmpOp::Lt => lhs < rhs,
                CmpOp::Le => lhs <= rhs,
                CmpOp::Gt => lhs > rhs,
                CmpOp::Ge => lhs >= rhs,
                CmpOp::Like => lhs.contains(rhs.as_str()),
            }),
            (lhs, rhs) => Err(Error::MismatchedTypes {
                lhs: lhs.type_of().name(),
                rhs: rhs.type_of().name(),
            }),
        }
    }

    /// Encodes this value into the given byte sink, in the same layout
    /// that [`Type::decode`](crate::catalog::ty::Type::decode) reads.
    pub fn encode(&self, buf: &mut impl BufMut) -> DbResult<()> {
        match self {
            Value::Int(int) => buf.put_i32(*int),
            Value::Text(text) => {
                let len = text.len();
                if len > TEXT_LEN {
                    return Err(DecodeError::TextTooLong {
                        len,
                        max: TEXT_LEN,
                    }
                    .into());
                }
                buf.put_u32(len as u32);
                buf.put_slice(text.as_bytes());
                buf.put_bytes(0, TEXT_LEN - len);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(int) => write!(f, "{int}"),
            Value::Text(text) => write!(f, "{text}"),
        }
    }
}
