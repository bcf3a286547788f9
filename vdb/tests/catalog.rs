use std::sync::Arc;

use vdb::{
    catalog::registry::DbFile,
    error::Error,
    exec::{query::ExecCtx, tuple::Tuple, value::Value},
    io::memory::MemFile,
    Db,
};

mod test_utils;
use test_utils::{collect, people_rows, people_schema, setup_tracing};

fn people_file(id: u32) -> Arc<MemFile> {
    Arc::new(MemFile::new(id, people_schema(), people_rows()).unwrap())
}

#[tokio::test]
async fn register_and_look_up() {
    setup_tracing();
    let db = Db::new();

    db.catalog().add_table(people_file(1), "people", "id");

    let id = db.catalog().table_id("people").unwrap();
    assert_eq!(id, 1);
    assert_eq!(db.catalog().table_name(1).unwrap(), "people");
    assert_eq!(db.catalog().primary_key(1).unwrap(), "id");
    assert_eq!(db.catalog().schema(1).unwrap(), people_schema());
}

#[tokio::test]
async fn missing_lookups_fail() {
    setup_tracing();
    let db = Db::new();

    assert!(matches!(
        db.catalog().table_id("nope"),
        Err(Error::TableNotFound(_))
    ));
    assert!(matches!(
        db.catalog().table_name(7),
        Err(Error::TableIdNotFound(7))
    ));
}

#[tokio::test]
async fn name_collision_last_writer_wins() {
    setup_tracing();
    let db = Db::new();

    db.catalog().add_table(people_file(1), "people", "id");
    db.catalog().add_table(people_file(2), "people", "id");

    assert_eq!(db.catalog().table_id("people").unwrap(), 2);
    // The shadowed table's ID no longer resolves.
    assert!(db.catalog().table_name(1).is_err());
    assert_eq!(db.catalog().table_ids(), vec![2]);
}

#[tokio::test]
async fn id_collision_last_writer_wins() {
    setup_tracing();
    let db = Db::new();

    db.catalog().add_table(people_file(1), "old_name", "id");
    db.catalog().add_table(people_file(1), "new_name", "id");

    assert_eq!(db.catalog().table_name(1).unwrap(), "new_name");
    assert!(matches!(
        db.catalog().table_id("old_name"),
        Err(Error::TableNotFound(_))
    ));
    assert_eq!(db.catalog().table_ids(), vec![1]);
}

#[tokio::test]
async fn clear_unregisters_everything() {
    setup_tracing();
    let db = Db::new();

    db.catalog().add_table(people_file(1), "people", "id");
    db.catalog().clear();

    assert!(db.catalog().table_ids().is_empty());
    assert!(db.catalog().table_id("people").is_err());
}

#[tokio::test]
async fn execute_scans_a_registered_table() {
    setup_tracing();
    let db = Db::new();
    db.catalog().add_table(people_file(1), "people", "id");

    let id = db.catalog().table_id("people").unwrap();
    let mut scan = db.catalog().file(id).unwrap().scan().unwrap();

    let mut names = Vec::new();
    db.execute::<std::convert::Infallible, _>(&mut scan, |tuple| {
        if let Value::Text(name) = tuple.field(1).unwrap() {
            names.push(name.clone());
        }
        Ok(())
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(names, vec!["ada", "grace", "alan", "edsger"]);
}

#[tokio::test]
async fn execute_stops_on_callback_error() {
    setup_tracing();
    let db = Db::new();
    db.catalog().add_table(people_file(1), "people", "id");

    let id = db.catalog().table_id("people").unwrap();
    let mut scan = db.catalog().file(id).unwrap().scan().unwrap();

    let mut seen = 0_usize;
    let outcome = db
        .execute::<&str, _>(&mut scan, |_| {
            seen += 1;
            if seen == 2 {
                Err("stop")
            } else {
                Ok(())
            }
        })
        .await
        .unwrap();
    assert_eq!(outcome, Err("stop"));
    assert_eq!(seen, 2);

    // The plan was closed, so it can be re-opened by another run.
    let catalog = db.catalog();
    let ctx = ExecCtx { catalog };
    let rows: Vec<Tuple> = collect(&ctx, &mut scan).await.unwrap();
    assert_eq!(rows.len(), 4);
}
