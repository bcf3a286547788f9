#![allow(dead_code)]

use vdb::{
    catalog::{column::Column, table_schema::TableSchema, ty::Type},
    error::DbResult,
    exec::{
        query::{ExecCtx, Operator, ValuesScan},
        tuple::Tuple,
        value::Value,
    },
};

/// Sets up tracing subscriber.
pub fn setup_tracing() {
    use tracing_subscriber::{
        fmt::{format::FmtSpan, layer},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or("warn".into());
    let fmt_layer = layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}

/// Schema of the `people` test table: `(id int, name text, age int)`.
pub fn people_schema() -> TableSchema {
    TableSchema::new(vec![
        Column::new("id", Type::Int),
        Column::new("name", Type::Text),
        Column::new("age", Type::Int),
    ])
}

/// A handful of `people` rows.
pub fn people_rows() -> Vec<Tuple> {
    [
        (1, "ada", 36),
        (2, "grace", 45),
        (3, "alan", 41),
        (4, "edsger", 36),
    ]
    .into_iter()
    .map(|(id, name, age)| {
        Tuple::new(vec![
            Value::Int(id),
            Value::Text(name.into()),
            Value::Int(age),
        ])
    })
    .collect()
}

/// A scan over the `people` rows.
pub fn people_scan() -> ValuesScan {
    ValuesScan::new(people_schema(), people_rows()).expect("rows should match the schema")
}

/// Opens the plan, drains it and closes it.
pub async fn collect(ctx: &ExecCtx<'_>, plan: &mut dyn Operator) -> DbResult<Vec<Tuple>> {
    plan.open(ctx).await?;
    let mut rows = Vec::new();
    while let Some(tuple) = plan.next(ctx).await? {
        rows.push(tuple);
    }
    plan.close(ctx).await?;
    Ok(rows)
}
