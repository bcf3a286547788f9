use std::{
    io::{self, Write},
    str::FromStr,
    sync::Arc,
};

use tracing::info;
use vdb::{
    catalog::{column::Column, registry::DbFile, table_schema::TableSchema, ty::Type},
    error::DbResult,
    exec::{
        aggregate::AggregateOp,
        predicate::{CmpOp, Predicate},
        query::{Aggregate, Filter, Operator, ValuesScan},
        tuple::Tuple,
        value::Value,
    },
    io::memory::MemFile,
    Db,
};

const TABLE: &str = "people";
const TABLE_ID: u32 = 1;

#[tokio::main]
async fn main() -> DbResult<()> {
    setup_tracing();

    let db = Db::new();
    let mut rows: Vec<Tuple> = Vec::new();
    register(&db, &rows)?;

    loop {
        println!("Pick a command: `insert`, `select`, `filter`, `aggregate` or `quit`.");
        match &*input::<String>("cmd> ") {
            "insert" => {
                let id: i32 = input("id (int)> ");
                let name: String = input("name (text)> ");
                let age: i32 = input("age (int)> ");
                rows.push(Tuple::new(vec![
                    Value::Int(id),
                    Value::Text(name),
                    Value::Int(age),
                ]));
                register(&db, &rows)?;
                println!("ok");
            }
            "select" => {
                let mut scan = scan(&db)?;
                print_all(&db, &mut scan).await?;
            }
            "filter" => {
                let min_age: i32 = input("minimum age (int)> ");
                let pred = Predicate::new(2, CmpOp::Ge, Value::Int(min_age));
                let mut plan = Filter::new(pred, Box::new(scan(&db)?));
                print_all(&db, &mut plan).await?;
            }
            "aggregate" => {
                // Average age, over the whole table.
                let mut plan =
                    Aggregate::new(Box::new(scan(&db)?), None, 2, AggregateOp::Avg)?;
                print_all(&db, &mut plan).await?;
            }
            "quit" => break,
            _ => {
                println!("invalid option; try again.");
            }
        }
    }

    Ok(())
}

fn people_schema() -> TableSchema {
    TableSchema::new(vec![
        Column::new("id", Type::Int),
        Column::new("name", Type::Text),
        Column::new("age", Type::Int),
    ])
}

/// Re-registers the in-memory table with the current rows.
fn register(db: &Db, rows: &[Tuple]) -> DbResult<()> {
    info!(rows = rows.len(), "registering demo table");
    let file = MemFile::new(TABLE_ID, people_schema(), rows.to_vec())?;
    db.catalog().add_table(Arc::new(file), TABLE, "id");
    Ok(())
}

fn scan(db: &Db) -> DbResult<ValuesScan> {
    let id = db.catalog().table_id(TABLE)?;
    db.catalog().file(id)?.scan()
}

async fn print_all(db: &Db, plan: &mut dyn Operator) -> DbResult<()> {
    println!("{}", "-".repeat(50));
    db.execute::<io::Error, _>(plan, |tuple| {
        let cells: Vec<String> = tuple.values().iter().map(ToString::to_string).collect();
        println!("{}", cells.join(" | "));
        Ok(())
    })
    .await?
    .map_err(|error| vdb::error::Error::ExecError(error.to_string()))?;
    println!("{}", "-".repeat(50));
    Ok(())
}

/// Sets up tracing subscriber.
fn setup_tracing() {
    use tracing_subscriber::{
        fmt::{format::FmtSpan, layer},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or("warn".into());
    let fmt_layer = layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

/// Gets a value from the stdin.
fn input<T: FromStr>(prompt: &str) -> T {
    let mut buf = String::new();
    loop {
        print!("{prompt}");
        io::stdout().flush().expect("stdout should be writable");
        buf.clear();
        if io::stdin().read_line(&mut buf).expect("stdin should be readable") == 0 {
            println!("\nbye");
            std::process::exit(0);
        }
        match T::from_str(buf.trim()) {
            Ok(val) => break val,
            Err(_) => println!("try again."),
        }
    }
}
