use vdb::{
    catalog::{column::Column, registry::Catalog, table_schema::TableSchema, ty::Type},
    exec::{
        predicate::{CmpOp, JoinPredicate},
        query::{ExecCtx, Join, Operator, ValuesScan},
        tuple::Tuple,
        value::Value,
    },
};

mod test_utils;
use test_utils::{collect, people_scan, setup_tracing};

fn cities_scan() -> ValuesScan {
    let schema = TableSchema::new(vec![
        Column::new("person_id", Type::Int),
        Column::new("city", Type::Text),
    ]);
    let rows = [(1, "london"), (3, "manchester"), (9, "nowhere")]
        .into_iter()
        .map(|(id, city)| Tuple::new(vec![Value::Int(id), Value::Text(city.into())]))
        .collect();
    ValuesScan::new(schema, rows).unwrap()
}

#[tokio::test]
async fn join_emits_concatenated_matches() {
    setup_tracing();
    let catalog = Catalog::new();
    let ctx = ExecCtx { catalog: &catalog };

    let pred = JoinPredicate::new(0, CmpOp::Eq, 0);
    let mut plan = Join::new(pred, Box::new(people_scan()), Box::new(cities_scan()));
    assert_eq!(plan.schema().arity(), 5);

    let mut rows = collect(&ctx, &mut plan).await.unwrap();
    rows.sort_by_key(|row| row.field(0).unwrap().as_int());
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        Tuple::new(vec![
            Value::Int(1),
            Value::Text("ada".into()),
            Value::Int(36),
            Value::Int(1),
            Value::Text("london".into()),
        ])
    );
    assert_eq!(rows[1].field(4).unwrap(), &Value::Text("manchester".into()));
}

#[tokio::test]
async fn join_with_inequality_predicate() {
    setup_tracing();
    let catalog = Catalog::new();
    let ctx = ExecCtx { catalog: &catalog };

    // Every (person, city) pair where the person's id is below the
    // city's person_id.
    let pred = JoinPredicate::new(0, CmpOp::Lt, 0);
    let mut plan = Join::new(pred, Box::new(people_scan()), Box::new(cities_scan()));

    let rows = collect(&ctx, &mut plan).await.unwrap();
    // id 1: {3, 9}; id 2: {3, 9}; id 3: {9}; id 4: {9}.
    assert_eq!(rows.len(), 6);
}

#[tokio::test]
async fn join_rewind_restarts_the_cross_product() {
    setup_tracing();
    let catalog = Catalog::new();
    let ctx = ExecCtx { catalog: &catalog };

    let pred = JoinPredicate::new(0, CmpOp::Eq, 0);
    let mut plan = Join::new(pred, Box::new(people_scan()), Box::new(cities_scan()));

    plan.open(&ctx).await.unwrap();
    let mut first_pass = Vec::new();
    while let Some(tuple) = plan.next(&ctx).await.unwrap() {
        first_pass.push(tuple);
    }

    plan.rewind(&ctx).await.unwrap();
    let mut second_pass = Vec::new();
    while let Some(tuple) = plan.next(&ctx).await.unwrap() {
        second_pass.push(tuple);
    }
    assert_eq!(first_pass, second_pass);

    plan.close(&ctx).await.unwrap();
}

#[tokio::test]
async fn join_with_empty_side_is_empty() {
    setup_tracing();
    let catalog = Catalog::new();
    let ctx = ExecCtx { catalog: &catalog };

    let schema = TableSchema::new(vec![Column::new("person_id", Type::Int)]);
    let empty = ValuesScan::new(schema, Vec::new()).unwrap();

    let pred = JoinPredicate::new(0, CmpOp::Eq, 0);
    let mut plan = Join::new(pred, Box::new(people_scan()), Box::new(empty));

    let rows = collect(&ctx, &mut plan).await.unwrap();
    assert!(rows.is_empty());
}
