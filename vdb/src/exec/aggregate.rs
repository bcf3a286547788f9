use std::{collections::HashMap, fmt};

use crate::{
    catalog::{column::Column, table_schema::TableSchema, ty::Type},
    error::{DbResult, Error},
    exec::{tuple::Tuple, value::Value},
};

/// A reduction applied over one column of a tuple stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AggregateOp {
    Count,
    Min,
    Max,
    Sum,
    Avg,
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            AggregateOp::Count => "count",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Sum => "sum",
            AggregateOp::Avg => "avg",
        };
        f.write_str(repr)
    }
}

/// Incremental state of one aggregation, fed one tuple at a time.
///
/// The lifecycle is merge-then-drain: once [`results`](Self::results)
/// has been taken, further merges are rejected.
pub trait Aggregator: Send {
    /// Returns the schema of the result rows.
    fn schema(&self) -> &TableSchema;

    /// Folds one input tuple into the aggregation state.
    fn merge(&mut self, tuple: &Tuple) -> DbResult<()>;

    /// Seals the aggregation and returns an iterator over its result
    /// rows.
    fn results(&mut self) -> DbResult<AggregateIter>;
}

/// Constructs the aggregator for the given input column type.
///
/// Fails upfront if the reduction is not defined for the type, rather
/// than on the first merged tuple.
pub fn build_aggregator(
    ty: Type,
    group: Option<(usize, Type)>,
    agg_col: usize,
    op: AggregateOp,
) -> DbResult<Box<dyn Aggregator>> {
    match ty {
        Type::Int => Ok(Box::new(IntAggregator::new(group, agg_col, op))),
        Type::Text => Ok(Box::new(TextAggregator::new(group, agg_col, op)?)),
    }
}

/// Shared grouping state: the raw values seen so far, keyed by group.
///
/// A stream without grouping uses the `None` key, so it collapses into
/// a single group.
struct Groups {
    group_col: Option<usize>,
    agg_col: usize,
    map: HashMap<Option<Value>, Vec<Value>>,
    schema: TableSchema,
    sealed: bool,
}

impl Groups {
    fn new(group: Option<(usize, Type)>, agg_col: usize) -> Groups {
        let mut columns = Vec::new();
        if let Some((_, group_ty)) = group {
            columns.push(Column::new("group_value", group_ty));
        }
        columns.push(Column::new("aggregate_value", Type::Int));

        Groups {
            group_col: group.map(|(col, _)| col),
            agg_col,
            map: HashMap::new(),
            schema: TableSchema::new(columns),
            sealed: false,
        }
    }

    fn merge(&mut self, tuple: &Tuple) -> DbResult<()> {
        if self.sealed {
            return Err(Error::MergeAfterResults);
        }

        let key = match self.group_col {
            Some(col) => Some(tuple.field(col)?.clone()),
            None => None,
        };
        let value = tuple.field(self.agg_col)?.clone();
        self.map.entry(key).or_default().push(value);
        Ok(())
    }

    /// Seals the state and emits one result row per group, reduced by
    /// `reduce`. Group output order is unspecified.
    fn results(
        &mut self,
        reduce: impl Fn(&[Value]) -> DbResult<i32>,
    ) -> DbResult<AggregateIter> {
        self.sealed = true;

        let mut rows = Vec::with_capacity(self.map.len());
        for (key, values) in &self.map {
            let reduced = Value::Int(reduce(values)?);
            let row = match key {
                Some(group) => Tuple::new(vec![group.clone(), reduced]),
                None => Tuple::new(vec![reduced]),
            };
            rows.push(row);
        }

        Ok(AggregateIter::new(self.schema.clone(), rows))
    }
}

/// Aggregator over an int column. Supports all reductions.
pub struct IntAggregator {
    op: AggregateOp,
    groups: Groups,
}

impl IntAggregator {
    pub fn new(group: Option<(usize, Type)>, agg_col: usize, op: AggregateOp) -> IntAggregator {
        IntAggregator {
            op,
            groups: Groups::new(group, agg_col),
        }
    }
}

impl Aggregator for IntAggregator {
    fn schema(&self) -> &TableSchema {
        &self.groups.schema
    }

    fn merge(&mut self, tuple: &Tuple) -> DbResult<()> {
        self.groups.merge(tuple)
    }

    fn results(&mut self) -> DbResult<AggregateIter> {
        let op = self.op;
        self.groups.results(|values| {
            let ints = values
                .iter()
                .map(|value| {
                    value.as_int().ok_or(Error::MismatchedTypes {
                        lhs: Type::Int.name(),
                        rhs: value.type_of().name(),
                    })
                })
                .collect::<DbResult<Vec<i32>>>()?;

            // Groups are never empty: a group only exists because at
            // least one tuple was merged into it.
            let reduced = match op {
                AggregateOp::Count => ints.len() as i32,
                AggregateOp::Min => ints.iter().copied().fold(i32::MAX, i32::min),
                AggregateOp::Max => ints.iter().copied().fold(i32::MIN, i32::max),
                AggregateOp::Sum => ints.iter().map(|&int| int as i64).sum::<i64>() as i32,
                AggregateOp::Avg => {
                    let sum: i64 = ints.iter().map(|&int| int as i64).sum();
                    (sum / ints.len() as i64) as i32
                }
            };
            Ok(reduced)
        })
    }
}

/// Aggregator over a text column. Only `count` is defined.
pub struct TextAggregator {
    groups: Groups,
}

impl TextAggregator {
    pub fn new(
        group: Option<(usize, Type)>,
        agg_col: usize,
        op: AggregateOp,
    ) -> DbResult<TextAggregator> {
        if op != AggregateOp::Count {
            return Err(Error::TextAggregate(op));
        }
        Ok(TextAggregator {
            groups: Groups::new(group, agg_col),
        })
    }
}

impl Aggregator for TextAggregator {
    fn schema(&self) -> &TableSchema {
        &self.groups.schema
    }

    fn merge(&mut self, tuple: &Tuple) -> DbResult<()> {
        self.groups.merge(tuple)
    }

    fn results(&mut self) -> DbResult<AggregateIter> {
        self.groups.results(|values| Ok(values.len() as i32))
    }
}

/// A rewindable cursor over materialized aggregation results.
pub struct AggregateIter {
    schema: TableSchema,
    rows: Vec<Tuple>,
    cursor: usize,
}

impl AggregateIter {
    fn new(schema: TableSchema, rows: Vec<Tuple>) -> AggregateIter {
        AggregateIter {
            schema,
            rows,
            cursor: 0,
        }
    }

    /// Returns the schema of the result rows.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns the next result row, if any.
    pub fn next(&mut self) -> Option<Tuple> {
        let row = self.rows.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(row)
    }

    /// Restarts the cursor at the first result row.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge_all(agg: &mut dyn Aggregator, rows: &[(i32, i32)]) {
        for &(group, value) in rows {
            let tuple = Tuple::new(vec![Value::Int(group), Value::Int(value)]);
            agg.merge(&tuple).unwrap();
        }
    }

    fn collect(mut iter: AggregateIter) -> Vec<Tuple> {
        let mut rows = Vec::new();
        while let Some(row) = iter.next() {
            rows.push(row);
        }
        rows
    }

    #[test]
    fn test_avg_truncates_toward_zero() {
        let mut agg = IntAggregator::new(None, 1, AggregateOp::Avg);
        merge_all(&mut agg, &[(0, 3), (0, 4)]);

        let rows = collect(agg.results().unwrap());
        assert_eq!(rows, vec![Tuple::new(vec![Value::Int(3)])]);
    }

    #[test]
    fn test_grouped_sum() {
        let mut agg = IntAggregator::new(Some((0, Type::Int)), 1, AggregateOp::Sum);
        merge_all(&mut agg, &[(1, 10), (2, 5), (1, 20)]);

        let mut rows = collect(agg.results().unwrap());
        rows.sort_by_key(|row| row.field(0).unwrap().as_int());
        assert_eq!(
            rows,
            vec![
                Tuple::new(vec![Value::Int(1), Value::Int(30)]),
                Tuple::new(vec![Value::Int(2), Value::Int(5)]),
            ]
        );
    }

    #[test]
    fn test_min_max() {
        let mut agg = IntAggregator::new(None, 1, AggregateOp::Min);
        merge_all(&mut agg, &[(0, 7), (0, -2), (0, 4)]);
        let rows = collect(agg.results().unwrap());
        assert_eq!(rows, vec![Tuple::new(vec![Value::Int(-2)])]);

        let mut agg = IntAggregator::new(None, 1, AggregateOp::Max);
        merge_all(&mut agg, &[(0, 7), (0, -2), (0, 4)]);
        let rows = collect(agg.results().unwrap());
        assert_eq!(rows, vec![Tuple::new(vec![Value::Int(7)])]);
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        let mut agg = IntAggregator::new(None, 0, AggregateOp::Count);
        let rows = collect(agg.results().unwrap());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_merge_after_results_is_rejected() {
        let mut agg = IntAggregator::new(None, 0, AggregateOp::Count);
        agg.merge(&Tuple::new(vec![Value::Int(1)])).unwrap();
        let _ = agg.results().unwrap();

        let result = agg.merge(&Tuple::new(vec![Value::Int(2)]));
        assert!(matches!(result, Err(Error::MergeAfterResults)));
    }

    #[test]
    fn test_text_count() {
        let mut agg = TextAggregator::new(Some((0, Type::Int)), 1, AggregateOp::Count).unwrap();
        for name in ["a", "b", "c"] {
            let tuple = Tuple::new(vec![Value::Int(1), Value::Text(name.into())]);
            agg.merge(&tuple).unwrap();
        }

        let rows = collect(agg.results().unwrap());
        assert_eq!(rows, vec![Tuple::new(vec![Value::Int(1), Value::Int(3)])]);
    }

    #[test]
    fn test_text_rejects_ordered_reductions() {
        let result = TextAggregator::new(None, 0, AggregateOp::Sum);
        assert!(matches!(result, Err(Error::TextAggregate(AggregateOp::Sum))));
    }
}
